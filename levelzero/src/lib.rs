// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors
//
// # Level Zero accelerator discovery

//! Discovers the accelerators exposed by a Level Zero runtime and adds them to a
//! [`Topology`](hardware::topology::Topology).
//!
//! ## Overview
//!
//! A discovery pass ([`discover`]) walks drivers, devices and subdevices, creates one OS device
//! per device and subdevice, and annotates each with `LevelZero*` info attributes (type, compute
//! geometry, UUID, vendor strings, command queue groups, memory sizes).  Devices are attached
//! under the PCI object they sit behind, subdevices under their device.
//!
//! Along the way the fabric ports of every device are collected.  Once all devices are known,
//! ports are paired by their remote port identity and the receive bandwidth of each XeLink is
//! summed into a device by device matrix, which is published as the `XeLinkBandwidth` distance
//! matrix of the topology.
//!
//! Every device is recorded in a [`Registry`](registry::Registry) whose order is the row and
//! column order of that matrix.
//!
//! ## Features
//!
//! - `testing`: Exposes [`testing::FakeRuntime`], an in-memory runtime.
//! - `serde`: Adds serialization support for configuration and identity types.

#![deny(clippy::pedantic, clippy::unwrap_used)]

/// Advisory diagnostic about a value the runtime should not have reported.
///
/// Only emitted when [`DiscoveryConfig::show_all_errors`](config::DiscoveryConfig) is set, and
/// never changes what discovery does next.
macro_rules! diagnostic {
    ($config:expr, $($arg:tt)+) => {
        if $config.show_all_errors() {
            tracing::warn!($($arg)+);
        }
    };
}

pub mod bandwidth;
pub mod config;
pub mod discover;
mod enumerate;
pub mod keys;
pub mod ports;
pub mod properties;
pub mod registry;
pub mod sink;
pub mod ze;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{DiscoveryConfig, DiscoveryConfigBuilder};
pub use discover::{Discovery, discover};
