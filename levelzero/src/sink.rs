// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Where bandwidth matrices are published.

use hardware::distances::{DistancesAddFlags, DistancesError, DistancesKind, PendingDistances};
use hardware::topology::{NodeId, Topology};

/// A store of distance matrices, filled in three separately failing steps.
pub trait DistancesSink {
    /// A matrix which was created but not committed yet.
    type Pending;

    /// Start a matrix.
    ///
    /// # Errors
    ///
    /// Fails if the sink refuses the name or kind.
    fn create(&mut self, name: &str, kind: DistancesKind) -> Result<Self::Pending, DistancesError>;

    /// Hand objects and values over to a pending matrix.
    ///
    /// The values belong to the sink from here on, whether or not the call succeeds.
    ///
    /// # Errors
    ///
    /// Fails if the objects or values are rejected.
    fn attach(
        &mut self,
        pending: &mut Self::Pending,
        objects: Vec<NodeId>,
        values: Vec<u64>,
    ) -> Result<(), DistancesError>;

    /// Store a pending matrix.
    ///
    /// # Errors
    ///
    /// Fails if the matrix can not be stored.
    fn commit(&mut self, pending: Self::Pending, flags: DistancesAddFlags)
    -> Result<(), DistancesError>;
}

impl DistancesSink for Topology {
    type Pending = PendingDistances;

    fn create(&mut self, name: &str, kind: DistancesKind) -> Result<PendingDistances, DistancesError> {
        self.distances_create(name, kind)
    }

    fn attach(
        &mut self,
        pending: &mut PendingDistances,
        objects: Vec<NodeId>,
        values: Vec<u64>,
    ) -> Result<(), DistancesError> {
        self.distances_attach(pending, objects, values)
    }

    fn commit(
        &mut self,
        pending: PendingDistances,
        flags: DistancesAddFlags,
    ) -> Result<(), DistancesError> {
        self.distances_commit(pending, flags)
    }
}
