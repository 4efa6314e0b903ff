// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors
//
// # Hardware topology representation

//! The `hardware` crate provides the topology that accelerator discovery backends populate.
//!
//! ## Overview
//!
//! A [`Topology`](topology::Topology) is a tree of objects rooted at a `Machine`.  I/O objects
//! (PCI bridges, PCI devices, OS devices) carry typed [`NodeAttributes`], and every object carries
//! free-form info attributes.  Backends use the topology to
//!
//! - find the PCI object a device sits behind,
//! - insert OS devices (and sub-devices) under it,
//! - publish distance matrices relating those devices (see [`distances`]).
//!
//! The tree can be frozen into a [`Node`] snapshot for inspection or serialization.
//!
//! ## Features
//!
//! - `serde`: Adds serialization support for all types using serde.

#![deny(clippy::pedantic, clippy::unwrap_used)]

use std::collections::BTreeMap;

use crate::os::OsDeviceAttributes;
use crate::pci::PciDeviceAttributes;
use crate::pci::bridge::BridgeAttributes;
use crate::topology::NodeId;

pub mod distances;
pub mod os;
pub mod pci;
pub mod topology;

/// Hardware component attributes for different node types.
///
/// # Examples
///
/// ```
/// # use accel_hardware::NodeAttributes;
/// #
/// fn print_node_info(attrs: &NodeAttributes) {
///     match attrs {
///         NodeAttributes::Pci(pci) => {
///             println!("PCI device: {}:{:04x}", pci.vendor_id(), pci.device_id());
///         }
///         NodeAttributes::OsDevice(os) => {
///             println!("OS device: {:?}", os.types());
///         }
///         NodeAttributes::Bridge(_) => {}
///     }
/// }
/// ```
#[derive(
    Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, strum::Display, strum::EnumIs,
)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type")
)]
pub enum NodeAttributes {
    /// Attributes for a PCI device.
    Pci(PciDeviceAttributes),
    /// Attributes for a PCI bridge.
    Bridge(BridgeAttributes),
    /// Attributes for an operating system device.
    OsDevice(OsDeviceAttributes),
}

/// A node in a frozen copy of the hardware topology tree.
///
/// Each node represents a hardware component in the system and can have:
/// - The id of the topology object it was copied from
/// - A type (e.g., `"Machine"`, `"PCIDevice"`, `"OSDevice"`)
/// - An optional subtype for more specific categorization
/// - Optional OS-assigned index
/// - Optional human-readable name
/// - Key-value properties for additional metadata
/// - Optional attributes specific to the node type
/// - Zero or more child nodes
///
/// # Examples
///
/// ```
/// # use accel_hardware::Node;
/// #
/// fn count_gpus(node: &Node) -> usize {
///     node.into_iter()
///         .filter(|n| n.type_() == "OSDevice" && n.subtype() == Some("LevelZero"))
///         .count()
/// }
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Node {
    id: NodeId,
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "type"))]
    type_: String,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(skip_serializing_if = "Option::is_none")
    )]
    subtype: Option<String>,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(skip_serializing_if = "Option::is_none")
    )]
    os_index: Option<usize>,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(skip_serializing_if = "Option::is_none")
    )]
    name: Option<String>,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    properties: BTreeMap<String, String>,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(skip_serializing_if = "Option::is_none")
    )]
    attributes: Option<NodeAttributes>,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    children: Vec<Node>,
}

impl Node {
    /// Returns the id of the topology object this node was copied from.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the type of this node (e.g., `"Machine"`, `"PCIDevice"`, `"OSDevice"`).
    #[must_use]
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// Returns the optional subtype providing more specific categorization.
    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Returns the OS-assigned index for this node, if available.
    #[must_use]
    pub fn os_index(&self) -> Option<usize> {
        self.os_index
    }

    /// Returns the human-readable name of this node, if available.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the key-value properties associated with this node.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Returns the specific attributes for this node type, if available.
    #[must_use]
    pub fn attributes(&self) -> Option<&NodeAttributes> {
        self.attributes.as_ref()
    }

    /// Returns a slice of this node's children.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Depth first iteration over this node and its descendants.
    pub fn iter(&self) -> std::vec::IntoIter<&Node> {
        self.into_iter()
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;

    type IntoIter = std::vec::IntoIter<&'a Node>;

    fn into_iter(self) -> Self::IntoIter {
        let mut elems = vec![];
        elems.push(self);
        for child in self.children() {
            elems.extend(child.into_iter());
        }
        elems.into_iter()
    }
}
