// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! PCI device and bridge attributes.

pub mod address;
pub mod bridge;
pub mod vendor;

use crate::pci::address::PciAddress;
use crate::pci::vendor::VendorId;

/// Attributes of a PCI device object.
///
/// The link speed is kept as the raw maximum bandwidth (bytes per second) reported by whoever
/// discovered the link; [`PciDeviceAttributes::link_speed`] converts it to GB/s on demand.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PciDeviceAttributes {
    address: PciAddress,
    vendor_id: VendorId,
    device_id: u16,
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(skip_serializing_if = "Option::is_none")
    )]
    max_bandwidth: Option<u64>,
}

impl PciDeviceAttributes {
    /// Create attributes for a device at `address`, with unknown link speed.
    #[must_use]
    pub fn new(address: PciAddress, vendor_id: VendorId, device_id: u16) -> Self {
        Self {
            address,
            vendor_id,
            device_id,
            max_bandwidth: None,
        }
    }

    /// The bus address of the device.
    #[must_use]
    pub fn address(&self) -> PciAddress {
        self.address
    }

    /// The PCI vendor of the device.
    #[must_use]
    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    /// The vendor specific device id.
    #[must_use]
    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    /// Maximum link bandwidth in bytes per second, if known.
    #[must_use]
    pub fn max_bandwidth(&self) -> Option<u64> {
        self.max_bandwidth
    }

    /// Link speed in GB/s, if known.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn link_speed(&self) -> Option<f32> {
        self.max_bandwidth
            .map(|bandwidth| (bandwidth as f64 / 1_000_000_000.0) as f32)
    }

    /// Record the maximum link bandwidth (bytes per second).
    pub fn set_max_bandwidth(&mut self, bandwidth: u64) {
        self.max_bandwidth = Some(bandwidth);
    }
}
