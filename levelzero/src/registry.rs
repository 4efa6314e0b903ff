// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The ordered list of discovered device nodes.
//!
//! A node's position in the [`Registry`] is its row and column in the bandwidth matrix.  Discovery
//! registers a root device and its subdevices as one block ([`Registry::add_block`]) so that the
//! block is contiguous: root first, then subdevices in subdevice order.

use hardware::topology::NodeId;
use tracing::debug;

/// The registry grows by this many entries at a time (eight devices with four subdevices each).
pub const GROWTH_BATCH: usize = 40;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to grow registry from {capacity} entries to hold {requested} more")]
    Grow { capacity: usize, requested: usize },
}

/// Device nodes in discovery order.
///
/// The registry does not own the nodes; the topology does.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registry {
    nodes: Vec<NodeId>,
}

impl Registry {
    /// An empty registry, with no capacity.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Make room for `additional` more nodes, growing by whole batches.
    fn reserve(&mut self, additional: usize) -> Result<(), RegistryError> {
        let spare = self.nodes.capacity() - self.nodes.len();
        if spare >= additional {
            return Ok(());
        }
        let batches = (additional - spare).div_ceil(GROWTH_BATCH);
        let grow = spare + batches * GROWTH_BATCH;
        debug!(
            "growing registry from {} to {} entries",
            self.nodes.capacity(),
            self.nodes.len() + grow
        );
        self.nodes
            .try_reserve_exact(grow)
            .map_err(|_| RegistryError::Grow {
                capacity: self.nodes.capacity(),
                requested: additional,
            })
    }

    /// Append a node.
    ///
    /// Returns the position of the node.
    ///
    /// # Errors
    ///
    /// Fails if the registry can not grow; the node is not added.
    pub fn add(&mut self, node: NodeId) -> Result<usize, RegistryError> {
        self.reserve(1)?;
        self.nodes.push(node);
        Ok(self.nodes.len() - 1)
    }

    /// Append a root device followed by its subdevices.
    ///
    /// Returns the position of the root.  Either the whole block is added or nothing is.
    ///
    /// # Errors
    ///
    /// Fails if the registry can not grow.
    pub fn add_block(&mut self, root: NodeId, subdevices: &[NodeId]) -> Result<usize, RegistryError> {
        self.reserve(1 + subdevices.len())?;
        let position = self.nodes.len();
        self.nodes.push(root);
        self.nodes.extend_from_slice(subdevices);
        Ok(position)
    }

    /// Position of `node`, by linear scan.
    #[must_use]
    pub fn find(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&x| x == node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes the registry can hold before growing again.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}
