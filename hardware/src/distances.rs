// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Distance matrices attached to a [`Topology`](crate::topology::Topology).
//!
//! A distance matrix relates a set of topology objects pairwise: `values[i * n + j]` is the
//! distance (latency, bandwidth, ...) from `objects[i]` to `objects[j]`.  Matrices are added in
//! three steps, each of which may fail independently:
//!
//! 1. [`Topology::distances_create`](crate::topology::Topology::distances_create) checks the name
//!    and kind and returns a [`PendingDistances`],
//! 2. [`Topology::distances_attach`](crate::topology::Topology::distances_attach) moves the objects
//!    and values into the pending matrix,
//! 3. [`Topology::distances_commit`](crate::topology::Topology::distances_commit) stores it in the
//!    topology.
//!
//! A [`PendingDistances`] which is dropped before commit takes its values with it.

use bitflags::bitflags;

use crate::topology::NodeId;

bitflags! {
    /// What a distance matrix contains and where its values come from.
    ///
    /// A valid kind has exactly one `FROM_*` flag and exactly one `MEANS_*` flag.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
    #[cfg_attr(
        any(test, feature = "serde"),
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct DistancesKind: u32 {
        /// Values were provided by the operating system or a device runtime.
        const FROM_OS = 1 << 0;
        /// Values were provided by the user.
        const FROM_USER = 1 << 1;
        /// Values are latencies: lower is better.
        const MEANS_LATENCY = 1 << 2;
        /// Values are bandwidths: higher is better.
        const MEANS_BANDWIDTH = 1 << 3;
        /// The objects are not all of the same type.
        const HETEROGENEOUS_TYPES = 1 << 4;
    }
}

bitflags! {
    /// Options for committing a distance matrix.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub struct DistancesAddFlags: u32 {
        /// Let the topology create groups of objects which are close to each other.
        const GROUP = 1 << 0;
        /// Grouping may use approximate distances.
        const GROUP_INACCURATE = 1 << 1;
    }
}

impl DistancesKind {
    /// Returns true if the kind has exactly one source and exactly one meaning.
    #[must_use]
    pub fn is_valid(self) -> bool {
        let from = self & (Self::FROM_OS | Self::FROM_USER);
        let means = self & (Self::MEANS_LATENCY | Self::MEANS_BANDWIDTH);
        from.bits().count_ones() == 1 && means.bits().count_ones() == 1
    }
}

/// Errors returned while adding a distance matrix.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DistancesError {
    /// Matrices must be named.
    #[error("distance matrix name may not be empty")]
    EmptyName,
    /// The kind does not have exactly one source and one meaning.
    #[error("invalid distance matrix kind {0:?}")]
    InvalidKind(DistancesKind),
    /// No objects were given.
    #[error("distance matrix {0} has no objects")]
    NoObjects(String),
    /// The number of values is not the square of the number of objects.
    #[error("distance matrix {name} expects {expected} values, got {found}")]
    SizeMismatch {
        /// Name of the matrix.
        name: String,
        /// `objects * objects`.
        expected: usize,
        /// Number of values given.
        found: usize,
    },
    /// An object is unknown to the topology or not inserted in its tree.
    #[error("object {0} is not part of the topology")]
    UnknownObject(NodeId),
    /// An object appears twice.
    #[error("object {0} appears more than once")]
    DuplicateObject(NodeId),
    /// Values must be attached before the matrix is committed.
    #[error("distance matrix {0} has no values attached")]
    NotAttached(String),
    /// Values were already attached.
    #[error("distance matrix {0} already has values attached")]
    AlreadyAttached(String),
}

/// A distance matrix which has been created but not yet committed.
#[derive(Debug)]
pub struct PendingDistances {
    pub(crate) name: String,
    pub(crate) kind: DistancesKind,
    pub(crate) matrix: Option<(Vec<NodeId>, Vec<u64>)>,
}

impl PendingDistances {
    /// Name of the matrix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the matrix.
    #[must_use]
    pub fn kind(&self) -> DistancesKind {
        self.kind
    }

    /// Returns true once objects and values were attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.matrix.is_some()
    }
}

/// A committed distance matrix.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Distances {
    name: String,
    kind: DistancesKind,
    objects: Vec<NodeId>,
    values: Vec<u64>,
}

impl Distances {
    pub(crate) fn new(
        name: String,
        kind: DistancesKind,
        objects: Vec<NodeId>,
        values: Vec<u64>,
    ) -> Self {
        Self {
            name,
            kind,
            objects,
            values,
        }
    }

    /// Name of the matrix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the matrix.
    #[must_use]
    pub fn kind(&self) -> DistancesKind {
        self.kind
    }

    /// The objects, in matrix order.
    #[must_use]
    pub fn objects(&self) -> &[NodeId] {
        &self.objects
    }

    /// The values, row major.
    #[must_use]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the matrix relates no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Position of `object` in the matrix.
    #[must_use]
    pub fn index_of(&self, object: NodeId) -> Option<usize> {
        self.objects.iter().position(|&x| x == object)
    }

    /// Value from `from` to `to`, if both objects are in the matrix.
    #[must_use]
    pub fn value(&self, from: NodeId, to: NodeId) -> Option<u64> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        self.values.get(i * self.objects.len() + j).copied()
    }
}
