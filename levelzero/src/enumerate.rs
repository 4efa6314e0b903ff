// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Driver, device and subdevice enumeration.

use hardware::NodeAttributes;
use hardware::os::{OsDeviceAttributes, OsDeviceType};
use hardware::topology::{NodeId, ObjectType, Topology, TopologyFlags};
use tracing::debug;

use crate::config::DiscoveryConfig;
use crate::keys;
use crate::ports::{self, PortList};
use crate::properties::{
    collect_command_queue_groups, collect_memory, collect_properties, set_info,
};
use crate::registry::Registry;
use crate::ze::types::PciProperties;
use crate::ze::{ZeResult, ZeRuntime};

/// Everything a pass over the drivers found.
#[derive(Debug, Default)]
pub(crate) struct Enumeration {
    pub registry: Registry,
    pub ports: PortList,
    /// Number of nodes inserted in the topology.
    pub added: usize,
}

/// Walk every driver and add its devices to `topology`.
pub(crate) fn enumerate<R: ZeRuntime>(
    runtime: &R,
    topology: &mut Topology,
    config: &DiscoveryConfig,
) -> Enumeration {
    let mut found = Enumeration::default();
    let drivers = match runtime.drivers() {
        Ok(drivers) => drivers,
        Err(error) => {
            diagnostic!(config, "failed to list drivers: {error}");
            return found;
        }
    };
    let sysman_drivers = match runtime.sysman_drivers() {
        Ok(sysman_drivers) => sysman_drivers,
        Err(error) => {
            diagnostic!(config, "failed to list management drivers: {error}");
            return found;
        }
    };
    if drivers.len() != sysman_drivers.len() {
        diagnostic!(
            config,
            "found {} management drivers vs {} drivers",
            sysman_drivers.len(),
            drivers.len()
        );
        return found;
    }
    debug!("found {} drivers", drivers.len());

    let mut counter = 0usize;
    for (driver_index, (driver, sysman_driver)) in drivers.iter().zip(&sysman_drivers).enumerate()
    {
        let devices = match runtime.devices(driver) {
            Ok(devices) if !devices.is_empty() => devices,
            Ok(_) => continue,
            Err(error) => {
                debug!("no devices in driver #{driver_index}: {error}");
                continue;
            }
        };
        debug!("found {} devices in driver #{driver_index}", devices.len());
        for (device_index, device) in devices.iter().enumerate() {
            let location = Location {
                counter,
                driver_index,
                device_index,
            };
            if add_device(
                runtime,
                device,
                sysman_driver,
                location,
                topology,
                &mut found,
                config,
            ) {
                counter += 1;
            }
        }
    }
    found
}

/// Where a device was found, and the counter it is named after.
#[derive(Clone, Copy, Debug)]
struct Location {
    counter: usize,
    driver_index: usize,
    device_index: usize,
}

/// Add one root device and its subdevices. Returns false if the device was skipped.
fn add_device<R: ZeRuntime>(
    runtime: &R,
    device: &R::Device,
    sysman_driver: &R::SysmanDriver,
    location: Location,
    topology: &mut Topology,
    found: &mut Enumeration,
    config: &DiscoveryConfig,
) -> bool {
    let Location {
        counter,
        driver_index,
        device_index,
    } = location;
    let properties = match runtime.device_properties(device) {
        Ok(properties) => properties,
        Err(error) => {
            diagnostic!(
                config,
                "failed to get properties ({error}), skipping driver #{driver_index} device #{device_index}"
            );
            return false;
        }
    };
    let sysman = match runtime.sysman_device_by_uuid(sysman_driver, properties.uuid) {
        Ok(sysman) => sysman.handle,
        Err(error) => {
            diagnostic!(
                config,
                "failed to find management device ({error}), skipping driver #{driver_index} device #{device_index}"
            );
            return false;
        }
    };

    let root = create_os_device(topology, format!("ze{counter}"));
    set_info(topology, root, keys::DRIVER_INDEX, driver_index.to_string());
    set_info(topology, root, keys::DRIVER_DEVICE_INDEX, device_index.to_string());
    collect_properties(
        runtime,
        device,
        &sysman,
        root,
        Some(&properties),
        topology,
        config,
    );
    collect_command_queue_groups(runtime, device, root, topology);

    let subdevices = add_subdevices(runtime, device, sysman_driver, location, topology, config);

    collect_memory(runtime, &sysman, root, &subdevices, topology, config);
    if !topology.flags().contains(TopologyFlags::NO_DISTANCES) {
        ports::scan(
            runtime,
            &sysman,
            root,
            &subdevices,
            &mut found.ports,
            config,
        );
    }

    let parent = place(runtime, device, &sysman, topology);
    if let Err(error) = topology.insert_by_parent(parent, root) {
        debug!("failed to insert {root} under {parent}: {error}");
        return false;
    }
    let inserted = insert_subdevices(topology, root, subdevices.into_iter().flatten());
    if !inserted.is_empty() {
        set_info(topology, root, keys::SUBDEVICES, inserted.len().to_string());
    }
    found.added += 1 + inserted.len();
    if let Err(error) = found.registry.add_block(root, &inserted) {
        debug!("{root} is left out of the bandwidth matrix: {error}");
    }
    true
}

/// Create the subdevice nodes of a device.
///
/// Position `k` of the result holds subdevice `k`, `None` where the subdevice could not be
/// created.
fn add_subdevices<R: ZeRuntime>(
    runtime: &R,
    device: &R::Device,
    sysman_driver: &R::SysmanDriver,
    location: Location,
    topology: &mut Topology,
    config: &DiscoveryConfig,
) -> Vec<Option<NodeId>> {
    let Location {
        counter,
        driver_index,
        device_index,
    } = location;
    let handles = match runtime.subdevices(device) {
        Ok(handles) => handles,
        Err(error) if error.is_invalid_argument() => return Vec::new(),
        Err(error) => {
            debug!("failed to list subdevices of ze{counter}: {error}");
            return Vec::new();
        }
    };
    debug!("ze{counter} has {} subdevices", handles.len());

    handles
        .iter()
        .enumerate()
        .map(|(k, subdevice)| {
            let properties = match runtime.device_properties(subdevice) {
                Ok(properties) => properties,
                Err(error) => {
                    diagnostic!(
                        config,
                        "failed to get subdevice properties ({error}), skipping driver #{driver_index} device #{device_index} subdevice #{k}"
                    );
                    return None;
                }
            };
            let sysman = match runtime.sysman_device_by_uuid(sysman_driver, properties.uuid) {
                Ok(sysman) => sysman.handle,
                Err(error) => {
                    diagnostic!(
                        config,
                        "failed to find subdevice management device ({error}), skipping driver #{driver_index} device #{device_index} subdevice #{k}"
                    );
                    return None;
                }
            };
            let node = create_os_device(topology, format!("ze{counter}.{k}"));
            set_info(topology, node, keys::SUBDEVICE_ID, k.to_string());
            collect_properties(runtime, subdevice, &sysman, node, None, topology, config);
            collect_command_queue_groups(runtime, subdevice, node, topology);
            Some(node)
        })
        .collect()
}

/// Insert the subdevices under `root`, returning those which made it into the tree.
fn insert_subdevices(
    topology: &mut Topology,
    root: NodeId,
    subdevices: impl IntoIterator<Item = NodeId>,
) -> Vec<NodeId> {
    subdevices
        .into_iter()
        .filter(|&subdevice| match topology.insert_by_parent(root, subdevice) {
            Ok(()) => true,
            Err(error) => {
                debug!("failed to insert {subdevice} under {root}: {error}");
                false
            }
        })
        .collect()
}

/// Allocate a detached, named Level Zero OS device.
fn create_os_device(topology: &mut Topology, name: String) -> NodeId {
    let node = topology.alloc(ObjectType::OsDevice, None);
    let attributes = NodeAttributes::OsDevice(OsDeviceAttributes::new(
        OsDeviceType::COPROC | OsDeviceType::GPU,
    ));
    let named = topology
        .set_name(node, name)
        .and_then(|()| topology.set_subtype(node, keys::SUBTYPE))
        .and_then(|()| topology.set_attributes(node, attributes));
    if let Err(error) = named {
        debug!("failed to set up {node}: {error}");
    }
    node
}

/// Find the object a device sits under, recording its link speed when it is a PCI device.
///
/// The core extension is asked first, then the management API.  Devices which can not be placed
/// go under the topology root.
fn place<R: ZeRuntime>(
    runtime: &R,
    device: &R::Device,
    sysman: &R::SysmanDevice,
    topology: &mut Topology,
) -> NodeId {
    let queries: [&dyn Fn() -> ZeResult<PciProperties>; 2] = [
        &|| runtime.pci_properties_ext(device),
        &|| runtime.sysman_pci_properties(sysman),
    ];
    for query in queries {
        let pci = match query() {
            Ok(pci) => pci,
            Err(error) => {
                debug!("no pci properties: {error}");
                continue;
            }
        };
        if let Some(parent) = attach_pci(topology, pci) {
            return parent;
        }
    }
    topology.root()
}

fn attach_pci(topology: &mut Topology, pci: PciProperties) -> Option<NodeId> {
    let parent = topology.find_pci_parent_by_busid(pci.address)?;
    let bandwidth = u64::try_from(pci.max_bandwidth).unwrap_or(0);
    if bandwidth > 0
        && let Some(NodeAttributes::Pci(attributes)) = topology.attributes_mut(parent)
    {
        debug!("link speed of {parent} is {bandwidth} B/s");
        attributes.set_max_bandwidth(bandwidth);
    }
    Some(parent)
}
