// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! PCI bridge attributes.

use std::ops::RangeInclusive;

use crate::pci::address::PciAddress;

/// Attributes of a PCI bridge: the domain and bus range found downstream of it.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BridgeAttributes {
    domain: u32,
    secondary_bus: u8,
    subordinate_bus: u8,
}

impl BridgeAttributes {
    /// Create bridge attributes covering buses `secondary_bus..=subordinate_bus` of `domain`.
    ///
    /// Returns `None` if the range is empty.
    #[must_use]
    pub fn new(domain: u32, secondary_bus: u8, subordinate_bus: u8) -> Option<Self> {
        if secondary_bus > subordinate_bus {
            return None;
        }
        Some(Self {
            domain,
            secondary_bus,
            subordinate_bus,
        })
    }

    /// The domain of the downstream buses.
    #[must_use]
    pub fn domain(&self) -> u32 {
        self.domain
    }

    /// The downstream bus range.
    #[must_use]
    pub fn buses(&self) -> RangeInclusive<u8> {
        self.secondary_bus..=self.subordinate_bus
    }

    /// Number of buses behind the bridge.
    #[must_use]
    pub fn width(&self) -> u16 {
        u16::from(self.subordinate_bus - self.secondary_bus) + 1
    }

    /// Returns true if `address` sits somewhere below this bridge.
    #[must_use]
    pub fn covers(&self, address: PciAddress) -> bool {
        self.domain == address.domain() && self.buses().contains(&address.bus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_downstream_buses_only() {
        let bridge = BridgeAttributes::new(0, 0x10, 0x1f).unwrap();
        assert!(bridge.covers(PciAddress::try_from("0000:10:00.0").unwrap()));
        assert!(bridge.covers(PciAddress::try_from("0000:1f:03.1").unwrap()));
        assert!(!bridge.covers(PciAddress::try_from("0000:20:00.0").unwrap()));
        assert!(!bridge.covers(PciAddress::try_from("0001:10:00.0").unwrap()));
        assert_eq!(bridge.width(), 16);
        assert!(BridgeAttributes::new(0, 2, 1).is_none());
    }
}
