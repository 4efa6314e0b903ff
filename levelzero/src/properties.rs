// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Attribute collectors.
//!
//! Each collector queries one facet of a device and records it as `LevelZero*` info attributes of
//! the device node.  A failing query only leaves its attributes out.

use hardware::topology::{NodeId, Topology};
use tracing::debug;

use crate::config::DiscoveryConfig;
use crate::keys;
use crate::ze::ZeRuntime;
use crate::ze::types::{DeviceProperties, DevicePropertyFlags, DeviceType, MemoryClass};

/// Set an info attribute, logging the (unexpected) case where the node is gone.
pub(crate) fn set_info(
    topology: &mut Topology,
    node: NodeId,
    key: impl Into<String>,
    value: impl Into<String>,
) {
    if let Err(error) = topology.add_info(node, key, value) {
        debug!("can not annotate {node}: {error}");
    }
}

/// Record type, compute geometry and UUID of a device, and the management strings of a root
/// device.
///
/// `properties` are queried from `device` when not given.
pub fn collect_properties<R: ZeRuntime>(
    runtime: &R,
    device: &R::Device,
    sysman: &R::SysmanDevice,
    node: NodeId,
    properties: Option<&DeviceProperties>,
    topology: &mut Topology,
    config: &DiscoveryConfig,
) {
    let queried;
    let properties = match properties {
        Some(properties) => properties,
        None => match runtime.device_properties(device) {
            Ok(properties) => {
                queried = properties;
                &queried
            }
            Err(error) => {
                debug!("no properties for {node}: {error}");
                return;
            }
        },
    };

    let type_ = match DeviceType::from_raw(properties.device_type) {
        Some(type_) => type_.to_string(),
        None => {
            diagnostic!(
                config,
                "unexpected device type {} for {node}",
                properties.device_type
            );
            "Unknown".to_string()
        }
    };
    set_info(topology, node, keys::DEVICE_TYPE, type_);
    for (key, value) in [
        (keys::NUM_SLICES, properties.num_slices),
        (keys::NUM_SUBSLICES_PER_SLICE, properties.num_subslices_per_slice),
        (keys::NUM_EUS_PER_SUBSLICE, properties.num_eus_per_subslice),
        (keys::NUM_THREADS_PER_EU, properties.num_threads_per_eu),
    ] {
        set_info(topology, node, key, value.to_string());
    }
    set_info(topology, node, keys::UUID, properties.uuid.to_string());

    if properties.flags.contains(DevicePropertyFlags::SUBDEVICE) {
        return;
    }

    let sysman_properties = match runtime.sysman_properties(sysman) {
        Ok(sysman_properties) => sysman_properties,
        Err(error) => {
            debug!("no management properties for {node}: {error}");
            return;
        }
    };
    for (key, value) in [
        (keys::VENDOR, sysman_properties.vendor_name),
        (keys::MODEL, sysman_properties.model_name),
        (keys::BRAND, sysman_properties.brand_name),
        (keys::SERIAL_NUMBER, sysman_properties.serial_number),
        (keys::BOARD_NUMBER, sysman_properties.board_number),
    ] {
        if value.eq_ignore_ascii_case(keys::UNKNOWN) {
            continue;
        }
        set_info(topology, node, key, value);
    }
}

/// Record the command queue groups of a device, as `{queues}*0x{flags}` per group.
pub fn collect_command_queue_groups<R: ZeRuntime>(
    runtime: &R,
    device: &R::Device,
    node: NodeId,
    topology: &mut Topology,
) {
    let groups = match runtime.command_queue_groups(device) {
        Ok(groups) => groups,
        Err(error) => {
            debug!("no command queue groups for {node}: {error}");
            return;
        }
    };
    set_info(topology, node, keys::CQ_GROUPS, groups.len().to_string());
    for (index, group) in groups.iter().enumerate() {
        set_info(
            topology,
            node,
            keys::cq_group(index),
            format!("{}*0x{:x}", group.num_queues, group.flags.bits()),
        );
    }
}

/// Memory of a device and its subdevices, in kilobytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemoryTotals {
    pub hbm_kb: u64,
    pub ddr_kb: u64,
}

/// Sum up the memory modules of a device.
///
/// Modules on a subdevice are recorded on that subdevice node, then every HBM and DDR module is
/// added to the totals recorded on `root`.  `subdevices` maps subdevice ids to their nodes;
/// `None` marks a subdevice which was not created.
pub fn collect_memory<R: ZeRuntime>(
    runtime: &R,
    sysman: &R::SysmanDevice,
    root: NodeId,
    subdevices: &[Option<NodeId>],
    topology: &mut Topology,
    config: &DiscoveryConfig,
) -> MemoryTotals {
    let mut totals = MemoryTotals::default();
    let modules = match runtime.memory_modules(sysman) {
        Ok(modules) => modules,
        Err(error) => {
            debug!("no memory modules for {root}: {error}");
            return totals;
        }
    };
    debug!("device {root} has {} memory modules", modules.len());

    for (index, module) in modules.iter().enumerate() {
        let properties = match runtime.memory_properties(module) {
            Ok(properties) => properties,
            Err(error) => {
                debug!("  memory module #{index}: no properties: {error}");
                continue;
            }
        };
        let mut size = properties.physical_size;
        if size == 0 {
            // some runtimes only report the size through the live state
            match runtime.memory_state(module) {
                Ok(state) => size = state.size,
                Err(error) => debug!("  memory module #{index}: no state: {error}"),
            }
        }
        let class = MemoryClass::from_raw(properties.memory_type);
        let kb = size >> 10;

        if properties.on_subdevice {
            let id = properties.subdevice_id;
            match usize::try_from(id).ok().and_then(|id| subdevices.get(id)) {
                Some(Some(subdevice)) if kb > 0 => {
                    set_info(topology, *subdevice, keys::memory_size(class), kb.to_string());
                }
                Some(_) => {}
                None => diagnostic!(
                    config,
                    "memory module #{index} of {root} on unexpected subdevice #{id}"
                ),
            }
        }
        match class {
            MemoryClass::Hbm => totals.hbm_kb = totals.hbm_kb.saturating_add(kb),
            MemoryClass::Ddr => totals.ddr_kb = totals.ddr_kb.saturating_add(kb),
            MemoryClass::Other => {}
        }
    }

    if totals.hbm_kb > 0 {
        set_info(topology, root, keys::HBM_SIZE, totals.hbm_kb.to_string());
    }
    if totals.ddr_kb > 0 {
        set_info(topology, root, keys::DDR_SIZE, totals.ddr_kb.to_string());
    }
    totals
}
