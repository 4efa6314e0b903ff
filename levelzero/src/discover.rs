// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The discovery pass.

use hardware::topology::{ObjectType, Topology, TypeFilter};
use tracing::debug;

use crate::bandwidth::{self, Publication};
use crate::config::DiscoveryConfig;
use crate::enumerate::{Enumeration, enumerate};
use crate::keys;
use crate::ze::ZeRuntime;

/// What a discovery pass did.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Devices and subdevices added to the topology.
    pub added: usize,
    /// Usable fabric ports found.
    pub ports: usize,
    pub publication: Publication,
}

/// Add the devices of `runtime` to `topology`, then publish their XeLink bandwidth matrix.
///
/// Discovery never fails: whatever can not be queried is left out, and a runtime which can not be
/// initialized adds nothing.
pub fn discover<R: ZeRuntime>(
    runtime: &R,
    topology: &mut Topology,
    config: &DiscoveryConfig,
) -> Discovery {
    if topology.type_filter(ObjectType::OsDevice) == TypeFilter::KeepNone {
        debug!("OS devices are filtered out, skipping Level Zero discovery");
        return Discovery::default();
    }
    if let Err(error) = runtime.init() {
        diagnostic!(config, "failed to initialize Level Zero: {error}");
        return Discovery::default();
    }
    if let Err(error) = runtime.sysman_init() {
        diagnostic!(config, "failed to initialize Level Zero management: {error}");
        return Discovery::default();
    }

    let Enumeration {
        registry,
        ports,
        added,
    } = enumerate(runtime, topology, config);
    debug!(
        "added {added} devices, {} registered, {} usable ports",
        registry.len(),
        ports.len()
    );

    let publication = match bandwidth::build(&registry, &ports, topology, config) {
        Some(matrix) => bandwidth::publish(topology, &registry, matrix, config),
        None => Publication::Nothing,
    };

    if added > 0 {
        topology.add_topology_info(keys::BACKEND, keys::BACKEND_NAME);
    }
    Discovery {
        added,
        ports: ports.len(),
        publication,
    }
}
