// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A mutable hardware topology.
//!
//! [`Topology`] owns every object in an arena and hands out copyable [`NodeId`]s.  Objects are
//! allocated detached, decorated (name, subtype, info attributes, typed attributes) and then
//! inserted under a parent.  Once inserted, an object belongs to the tree for the lifetime of the
//! topology; callers keep only the [`NodeId`].
//!
//! Discovery backends use the topology to
//!
//! - find where a device should be attached given its PCI address
//!   ([`Topology::find_pci_parent_by_busid`]),
//! - record info attributes on objects and on the topology itself,
//! - publish distance matrices (see [`crate::distances`]).

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::Node;
use crate::NodeAttributes;
use crate::distances::{
    Distances, DistancesAddFlags, DistancesError, DistancesKind, PendingDistances,
};
use crate::pci::address::PciAddress;

/// Handle to an object of a [`Topology`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[repr(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// The raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The type of a topology object.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    strum::Display,
    strum::EnumIs,
    strum::EnumIter,
)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ObjectType {
    /// The whole machine; the root of every topology.
    Machine,
    /// A processor package.
    Package,
    /// A NUMA memory node.
    #[strum(serialize = "NUMANode")]
    NumaNode,
    /// A group of objects created for structure.
    Group,
    /// A PCI bridge.
    Bridge,
    /// A PCI device.
    #[strum(serialize = "PCIDevice")]
    PciDevice,
    /// An operating system device.
    #[strum(serialize = "OSDevice")]
    OsDevice,
    /// Anything else.
    Misc,
}

impl ObjectType {
    /// Returns true for the I/O object types (bridges, PCI devices and OS devices).
    #[must_use]
    pub fn is_io(self) -> bool {
        matches!(self, Self::Bridge | Self::PciDevice | Self::OsDevice)
    }
}

/// Which objects of a given type a topology keeps.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum::Display)]
pub enum TypeFilter {
    /// Keep every object.
    #[default]
    KeepAll,
    /// Keep no object of this type.
    KeepNone,
    /// Keep only objects which bring structure to the tree.
    KeepStructure,
    /// Keep only objects that are likely to matter to users.
    KeepImportant,
}

bitflags! {
    /// Topology wide options.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct TopologyFlags: u32 {
        /// Do not gather distance matrices.
        const NO_DISTANCES = 1 << 0;
    }
}

/// Errors raised while manipulating the tree.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TopologyError {
    /// The id does not belong to this topology.
    #[error("unknown object {0}")]
    UnknownObject(NodeId),
    /// The object already has a parent.
    #[error("object {0} is already inserted")]
    AlreadyInserted(NodeId),
    /// The parent must itself be part of the tree.
    #[error("parent {0} is not inserted in the tree")]
    DetachedParent(NodeId),
    /// Objects can not be inserted under themselves, and the root can not be moved.
    #[error("object {0} can not be inserted under {1}")]
    InvalidParent(NodeId, NodeId),
}

/// An object of the topology.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Object {
    type_: ObjectType,
    subtype: Option<String>,
    os_index: Option<usize>,
    name: Option<String>,
    infos: BTreeMap<String, String>,
    attributes: Option<NodeAttributes>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Object {
    fn new(type_: ObjectType, os_index: Option<usize>) -> Self {
        Self {
            type_,
            subtype: None,
            os_index,
            name: None,
            infos: BTreeMap::new(),
            attributes: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The object type.
    #[must_use]
    pub fn type_(&self) -> ObjectType {
        self.type_
    }

    /// A finer classification, e.g. the runtime which exposed an OS device.
    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// The OS-assigned index, if any.
    #[must_use]
    pub fn os_index(&self) -> Option<usize> {
        self.os_index
    }

    /// The object name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Info attributes.
    #[must_use]
    pub fn infos(&self) -> &BTreeMap<String, String> {
        &self.infos
    }

    /// Info attribute `key`, if set.
    #[must_use]
    pub fn info(&self, key: &str) -> Option<&str> {
        self.infos.get(key).map(String::as_str)
    }

    /// Typed attributes.
    #[must_use]
    pub fn attributes(&self) -> Option<&NodeAttributes> {
        self.attributes.as_ref()
    }

    /// The parent object, `None` for the root and for detached objects.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A hardware topology.
#[derive(Clone, Debug)]
pub struct Topology {
    objects: Vec<Object>,
    filters: BTreeMap<ObjectType, TypeFilter>,
    flags: TopologyFlags,
    infos: BTreeMap<String, String>,
    distances: Vec<Distances>,
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

impl Topology {
    const ROOT: NodeId = NodeId(0);

    /// Create a topology holding only its root `Machine` object.
    ///
    /// I/O object types default to [`TypeFilter::KeepImportant`], everything else to
    /// [`TypeFilter::KeepAll`].
    #[must_use]
    pub fn new() -> Self {
        let filters = ObjectType::iter()
            .filter(|type_| type_.is_io())
            .map(|type_| (type_, TypeFilter::KeepImportant))
            .collect();
        Self {
            objects: vec![Object::new(ObjectType::Machine, Some(0))],
            filters,
            flags: TopologyFlags::empty(),
            infos: BTreeMap::new(),
            distances: Vec::new(),
        }
    }

    /// Replace the topology flags.
    #[must_use]
    pub fn with_flags(mut self, flags: TopologyFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The topology flags.
    #[must_use]
    pub fn flags(&self) -> TopologyFlags {
        self.flags
    }

    /// Set the filter for objects of `type_`.
    pub fn set_type_filter(&mut self, type_: ObjectType, filter: TypeFilter) {
        self.filters.insert(type_, filter);
    }

    /// The filter for objects of `type_`.
    #[must_use]
    pub fn type_filter(&self, type_: ObjectType) -> TypeFilter {
        self.filters.get(&type_).copied().unwrap_or_default()
    }

    /// The root object.
    #[must_use]
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Number of objects, inserted or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// A topology always has a root, so this is always false.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up an object.
    #[must_use]
    pub fn object(&self, id: NodeId) -> Option<&Object> {
        self.objects.get(id.index())
    }

    fn object_mut(&mut self, id: NodeId) -> Result<&mut Object, TopologyError> {
        self.objects
            .get_mut(id.index())
            .ok_or(TopologyError::UnknownObject(id))
    }

    /// Iterate over all objects, inserted or not, in allocation order.
    pub fn objects(&self) -> impl Iterator<Item = (NodeId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (NodeId(index), object))
    }

    /// Iterate over the objects of type `type_` which are part of the tree.
    pub fn objects_with_type(&self, type_: ObjectType) -> impl Iterator<Item = NodeId> + '_ {
        self.objects()
            .filter(move |(id, object)| object.type_ == type_ && self.is_inserted(*id))
            .map(|(id, _)| id)
    }

    /// Returns true if `id` is the root or has been inserted under a parent.
    #[must_use]
    pub fn is_inserted(&self, id: NodeId) -> bool {
        id == Self::ROOT || self.object(id).is_some_and(|object| object.parent.is_some())
    }

    /// Allocate a detached object.
    pub fn alloc(&mut self, type_: ObjectType, os_index: Option<usize>) -> NodeId {
        let id = NodeId(self.objects.len());
        self.objects.push(Object::new(type_, os_index));
        id
    }

    /// Insert the detached object `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if either object is unknown, if `child` is already inserted (or is the root), or if
    /// `parent` is not part of the tree.
    pub fn insert_by_parent(&mut self, parent: NodeId, child: NodeId) -> Result<(), TopologyError> {
        if parent == child || child == Self::ROOT {
            return Err(TopologyError::InvalidParent(child, parent));
        }
        if self.object(parent).is_none() {
            return Err(TopologyError::UnknownObject(parent));
        }
        if !self.is_inserted(parent) {
            return Err(TopologyError::DetachedParent(parent));
        }
        let object = self.object_mut(child)?;
        if object.parent.is_some() {
            return Err(TopologyError::AlreadyInserted(child));
        }
        object.parent = Some(parent);
        self.object_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Set the name of an object.
    ///
    /// # Errors
    ///
    /// Fails if the object is unknown.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TopologyError> {
        self.object_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Set the subtype of an object.
    ///
    /// # Errors
    ///
    /// Fails if the object is unknown.
    pub fn set_subtype(
        &mut self,
        id: NodeId,
        subtype: impl Into<String>,
    ) -> Result<(), TopologyError> {
        self.object_mut(id)?.subtype = Some(subtype.into());
        Ok(())
    }

    /// Set the typed attributes of an object.
    ///
    /// # Errors
    ///
    /// Fails if the object is unknown.
    pub fn set_attributes(
        &mut self,
        id: NodeId,
        attributes: NodeAttributes,
    ) -> Result<(), TopologyError> {
        self.object_mut(id)?.attributes = Some(attributes);
        Ok(())
    }

    /// Mutable access to the typed attributes of an object.
    pub fn attributes_mut(&mut self, id: NodeId) -> Option<&mut NodeAttributes> {
        self.objects.get_mut(id.index())?.attributes.as_mut()
    }

    /// Add (or replace) info attribute `key` on an object.
    ///
    /// # Errors
    ///
    /// Fails if the object is unknown.
    pub fn add_info(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), TopologyError> {
        self.object_mut(id)?.infos.insert(key.into(), value.into());
        Ok(())
    }

    /// Info attribute `key` of an object.
    #[must_use]
    pub fn info(&self, id: NodeId, key: &str) -> Option<&str> {
        self.object(id)?.info(key)
    }

    /// Add (or replace) a topology wide info attribute.
    pub fn add_topology_info(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.infos.insert(key.into(), value.into());
    }

    /// Topology wide info attributes.
    #[must_use]
    pub fn topology_infos(&self) -> &BTreeMap<String, String> {
        &self.infos
    }

    /// Find the object a device at `address` should be attached under.
    ///
    /// Returns the PCI device with that exact address if the tree has one, otherwise the
    /// narrowest bridge whose downstream bus range covers the address, otherwise `None`.
    #[must_use]
    pub fn find_pci_parent_by_busid(&self, address: PciAddress) -> Option<NodeId> {
        let device = self
            .objects_with_type(ObjectType::PciDevice)
            .find(|&id| match self.object(id).and_then(Object::attributes) {
                Some(NodeAttributes::Pci(pci)) => pci.address() == address,
                _ => false,
            });
        if device.is_some() {
            return device;
        }
        let bridge = self
            .objects_with_type(ObjectType::Bridge)
            .filter_map(|id| match self.object(id).and_then(Object::attributes) {
                Some(NodeAttributes::Bridge(bridge)) if bridge.covers(address) => {
                    Some((bridge.width(), id))
                }
                _ => None,
            })
            .min();
        if bridge.is_none() {
            debug!("no pci parent found for {address}");
        }
        bridge.map(|(_, id)| id)
    }

    /// Create a distance matrix named `name`.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or the kind is not valid (see [`DistancesKind::is_valid`]).
    pub fn distances_create(
        &mut self,
        name: impl Into<String>,
        kind: DistancesKind,
    ) -> Result<PendingDistances, DistancesError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DistancesError::EmptyName);
        }
        if !kind.is_valid() {
            return Err(DistancesError::InvalidKind(kind));
        }
        Ok(PendingDistances {
            name,
            kind,
            matrix: None,
        })
    }

    /// Attach objects and values to a pending matrix.
    ///
    /// The values are owned by `pending` from here on, including on failure.
    ///
    /// # Errors
    ///
    /// Fails if values were already attached, if there are no objects, if `values` is not
    /// `objects.len()` squared, or if an object is unknown, detached or repeated.
    pub fn distances_attach(
        &self,
        pending: &mut PendingDistances,
        objects: Vec<NodeId>,
        values: Vec<u64>,
    ) -> Result<(), DistancesError> {
        if pending.matrix.is_some() {
            return Err(DistancesError::AlreadyAttached(pending.name.clone()));
        }
        if objects.is_empty() {
            return Err(DistancesError::NoObjects(pending.name.clone()));
        }
        let expected = objects.len() * objects.len();
        if values.len() != expected {
            return Err(DistancesError::SizeMismatch {
                name: pending.name.clone(),
                expected,
                found: values.len(),
            });
        }
        for (index, &object) in objects.iter().enumerate() {
            if !self.is_inserted(object) {
                return Err(DistancesError::UnknownObject(object));
            }
            if objects[..index].contains(&object) {
                return Err(DistancesError::DuplicateObject(object));
            }
        }
        pending.matrix = Some((objects, values));
        Ok(())
    }

    /// Store a pending matrix in the topology.
    ///
    /// # Errors
    ///
    /// Fails if no values were attached.
    pub fn distances_commit(
        &mut self,
        pending: PendingDistances,
        flags: DistancesAddFlags,
    ) -> Result<(), DistancesError> {
        let PendingDistances { name, kind, matrix } = pending;
        let Some((objects, values)) = matrix else {
            return Err(DistancesError::NotAttached(name));
        };
        debug!(
            "committing distance matrix {name} ({} objects, kind {kind:?}, flags {flags:?})",
            objects.len()
        );
        self.distances
            .push(Distances::new(name, kind, objects, values));
        Ok(())
    }

    /// All committed distance matrices.
    #[must_use]
    pub fn distances(&self) -> &[Distances] {
        &self.distances
    }

    /// The first committed matrix named `name`.
    #[must_use]
    pub fn distances_by_name(&self, name: &str) -> Option<&Distances> {
        self.distances.iter().find(|d| d.name() == name)
    }

    /// Build a [`Node`] tree from the objects reachable from the root.
    #[must_use]
    pub fn snapshot(&self) -> Node {
        self.snapshot_from(Self::ROOT)
    }

    fn snapshot_from(&self, id: NodeId) -> Node {
        let object = &self.objects[id.index()];
        Node {
            id,
            type_: object.type_.to_string(),
            subtype: object.subtype.clone(),
            os_index: object.os_index,
            name: object.name.clone(),
            properties: object.infos.clone(),
            attributes: object.attributes.clone(),
            children: object
                .children
                .iter()
                .map(|&child| self.snapshot_from(child))
                .collect(),
        }
    }
}
