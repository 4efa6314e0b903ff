// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Fabric port collection.
//!
//! Every device contributes the ports of its management view to one [`PortList`].  A port is kept
//! only once its owner is known and its link is up (healthy or degraded); the list is what the
//! bandwidth matrix is built from.

use hardware::topology::NodeId;
use tracing::debug;

use crate::config::DiscoveryConfig;
use crate::ze::ZeRuntime;
use crate::ze::types::{FabricPortProperties, FabricPortState};

/// The port list grows by this many entries per newly discovered port.
pub const PORT_GROWTH_FACTOR: usize = 8;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PortListError {
    #[error("failed to grow port list from {capacity} entries to hold {requested} more")]
    Grow { capacity: usize, requested: usize },
}

/// A usable fabric port.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Port {
    /// The device or subdevice the port belongs to.
    pub owner: NodeId,
    /// The root device, when `owner` is one of its subdevices.
    pub root: Option<NodeId>,
    pub properties: FabricPortProperties,
    pub state: FabricPortState,
}

/// Usable ports of all devices, in discovery order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PortList {
    ports: Vec<Port>,
}

impl PortList {
    #[must_use]
    pub fn new() -> Self {
        Self { ports: Vec::new() }
    }

    /// Make room for `discovered` more ports.
    ///
    /// Grows by [`PORT_GROWTH_FACTOR`] times `discovered`, and only when the spare capacity is too
    /// small.
    ///
    /// # Errors
    ///
    /// Fails if the list can not grow; nothing changes.
    pub fn reserve(&mut self, discovered: usize) -> Result<(), PortListError> {
        let spare = self.ports.capacity() - self.ports.len();
        if spare >= discovered {
            return Ok(());
        }
        let grow = spare + PORT_GROWTH_FACTOR * discovered;
        self.ports
            .try_reserve_exact(grow)
            .map_err(|_| PortListError::Grow {
                capacity: self.ports.capacity(),
                requested: discovered,
            })
    }

    /// Append a port. Returns its position.
    pub fn push(&mut self, port: Port) -> usize {
        self.ports.push(port);
        self.ports.len() - 1
    }

    #[must_use]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.ports.capacity()
    }
}

impl std::ops::Index<usize> for PortList {
    type Output = Port;

    fn index(&self, index: usize) -> &Port {
        &self.ports[index]
    }
}

/// Collect the usable fabric ports of one device into `ports`.
///
/// `subdevices` maps subdevice ids to their nodes; `None` marks a subdevice which was not
/// created.  Returns the number of ports kept.
pub fn scan<R: ZeRuntime>(
    runtime: &R,
    sysman: &R::SysmanDevice,
    root: NodeId,
    subdevices: &[Option<NodeId>],
    ports: &mut PortList,
    config: &DiscoveryConfig,
) -> usize {
    let handles = match runtime.fabric_ports(sysman) {
        Ok(handles) if !handles.is_empty() => handles,
        Ok(_) => return 0,
        Err(error) => {
            debug!("no fabric ports for {root}: {error}");
            return 0;
        }
    };
    debug!("device {root} has {} fabric ports", handles.len());
    if let Err(error) = ports.reserve(handles.len()) {
        debug!("dropping fabric ports of {root}: {error}");
        return 0;
    }

    let mut kept = 0;
    for (index, handle) in handles.iter().enumerate() {
        let properties = match runtime.fabric_port_properties(handle) {
            Ok(properties) => properties,
            Err(error) => {
                debug!("  port #{index}: no properties: {error}");
                continue;
            }
        };
        let (owner, parent) = if properties.on_subdevice {
            let id = properties.subdevice_id;
            debug!("  port #{index} is on subdevice #{id}");
            match usize::try_from(id).ok().and_then(|id| subdevices.get(id)) {
                Some(Some(subdevice)) => (*subdevice, Some(root)),
                Some(None) => {
                    debug!("    subdevice #{id} was not created, ignoring");
                    continue;
                }
                None => {
                    diagnostic!(
                        config,
                        "fabric port #{index} of {root} on unexpected subdevice #{id}"
                    );
                    continue;
                }
            }
        } else {
            (root, None)
        };
        let state = match runtime.fabric_port_state(handle) {
            Ok(state) => state,
            Err(error) => {
                debug!("  port #{index}: no state: {error}");
                continue;
            }
        };
        if !state.status.is_usable() {
            debug!("    status {} isn't healthy or degraded", state.status);
            continue;
        }
        let position = ports.push(Port {
            owner,
            root: parent,
            properties,
            state,
        });
        let port = &ports[position];
        debug!(
            "    status is {}, this will be port #{position}, {} connected to remote {}",
            port.state.status, port.properties.port_id, port.state.remote_port_id
        );
        kept += 1;
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryConfigBuilder;
    use crate::testing::{FakeDevice, FakePort, FakeRuntime};
    use crate::ze::ResultCode;
    use crate::ze::types::{FabricPortId, FabricPortStatus};
    use hardware::topology::{ObjectType, Topology};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    struct Fixture {
        runtime: FakeRuntime,
        gpu: usize,
        root: NodeId,
        subdevices: Vec<Option<NodeId>>,
    }

    fn fixture() -> Fixture {
        let mut runtime = FakeRuntime::new();
        let driver = runtime.add_driver();
        let gpu = runtime.add_device(driver, FakeDevice::gpu(1));
        let mut topology = Topology::new();
        let root = topology.alloc(ObjectType::OsDevice, None);
        let first = topology.alloc(ObjectType::OsDevice, None);
        let third = topology.alloc(ObjectType::OsDevice, None);
        Fixture {
            runtime,
            gpu,
            root,
            subdevices: vec![Some(first), None, Some(third)],
        }
    }

    fn id(port: u8) -> FabricPortId {
        FabricPortId::new(1, 0, port)
    }

    #[test]
    fn growth_is_eight_times_the_discovered_count() {
        let mut ports = PortList::new();
        ports.reserve(3).unwrap();
        assert_eq!(ports.capacity(), 24);
        // enough spare room, no growth
        ports.reserve(24).unwrap();
        assert_eq!(ports.capacity(), 24);
        ports.reserve(25).unwrap();
        assert_eq!(ports.capacity(), 24 + 200);
    }

    #[test]
    fn owners_are_resolved() {
        let mut f = fixture();
        f.runtime
            .add_port(f.gpu, FakePort::xelink(None, id(1), id(9), 1 << 30));
        f.runtime
            .add_port(f.gpu, FakePort::xelink(Some(2), id(2), id(9), 1 << 30));
        let mut ports = PortList::new();
        let kept = scan(
            &f.runtime,
            &f.gpu,
            f.root,
            &f.subdevices,
            &mut ports,
            &DiscoveryConfig::default(),
        );
        assert_eq!(kept, 2);
        assert_eq!(ports[0].owner, f.root);
        assert_eq!(ports[0].root, None);
        assert_eq!(Some(ports[1].owner), f.subdevices[2]);
        assert_eq!(ports[1].root, Some(f.root));
    }

    #[test]
    #[traced_test]
    fn unusable_ports_are_dropped() {
        let mut f = fixture();
        for (port, status) in [
            (1, FabricPortStatus::Healthy),
            (2, FabricPortStatus::Degraded),
            (3, FabricPortStatus::Failed),
            (4, FabricPortStatus::Disabled),
            (5, FabricPortStatus::Unknown),
        ] {
            f.runtime.add_port(
                f.gpu,
                FakePort::new("XeLink", None, id(port), id(9), status, 1 << 30),
            );
        }
        let mut broken = FakePort::xelink(None, id(6), id(9), 1 << 30);
        broken.properties = Err(ResultCode::ErrorUnknown.into());
        f.runtime.add_port(f.gpu, broken);
        let mut stateless = FakePort::xelink(None, id(7), id(9), 1 << 30);
        stateless.state = Err(ResultCode::ErrorDeviceLost.into());
        f.runtime.add_port(f.gpu, stateless);

        let mut ports = PortList::new();
        let kept = scan(
            &f.runtime,
            &f.gpu,
            f.root,
            &f.subdevices,
            &mut ports,
            &DiscoveryConfig::default(),
        );
        assert_eq!(kept, 2);
        let kept: Vec<_> = ports
            .ports()
            .iter()
            .map(|port| port.properties.port_id.port_number)
            .collect();
        assert_eq!(kept, vec![1, 2]);
        assert!(logs_contain("isn't healthy or degraded"));
    }

    #[test]
    #[traced_test]
    fn ports_on_missing_subdevices_are_skipped() {
        let mut f = fixture();
        // a hole left by a subdevice which failed to be created
        f.runtime
            .add_port(f.gpu, FakePort::xelink(Some(1), id(1), id(9), 1 << 30));
        // out of range
        f.runtime
            .add_port(f.gpu, FakePort::xelink(Some(7), id(2), id(9), 1 << 30));
        let config = DiscoveryConfigBuilder::default()
            .show_all_errors(true)
            .build()
            .unwrap();
        let mut ports = PortList::new();
        let kept = scan(
            &f.runtime,
            &f.gpu,
            f.root,
            &f.subdevices,
            &mut ports,
            &config,
        );
        assert_eq!(kept, 0);
        assert!(ports.is_empty());
        assert!(logs_contain("was not created"));
        assert!(logs_contain("on unexpected subdevice #7"));
    }

    #[test]
    fn devices_without_ports_are_silent() {
        let mut f = fixture();
        let mut ports = PortList::new();
        assert_eq!(
            scan(
                &f.runtime,
                &f.gpu,
                f.root,
                &f.subdevices,
                &mut ports,
                &DiscoveryConfig::default()
            ),
            0
        );
        assert_eq!(ports.capacity(), 0);
        f.runtime.device_mut(f.gpu).fabric_ports_error = Some(ResultCode::ErrorNotAvailable.into());
        assert_eq!(
            scan(
                &f.runtime,
                &f.gpu,
                f.root,
                &f.subdevices,
                &mut ports,
                &DiscoveryConfig::default()
            ),
            0
        );
    }
}
