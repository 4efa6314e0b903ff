// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! PCI vendor IDs.
//!
//! Device runtimes report the PCI vendor of each accelerator they expose.  This module provides
//! the [`VendorId`] type for carrying those 16-bit identifiers around the topology.
//!
//! # Examples
//!
//! ```
//! use accel_hardware::pci::vendor::VendorId;
//!
//! assert_eq!(format!("{}", VendorId::INTEL), "8086");
//!
//! let vendor = VendorId::try_from("10de".to_string()).unwrap();
//! assert_eq!(vendor, VendorId::new(0x10de));
//! ```

/// A 16-bit PCI vendor identifier.
///
/// The special value `0xFFFF` is reserved and indicates an invalid/non-existent device.
///
/// # Display
///
/// The `Display` and `LowerHex` implementations format the vendor ID as a 4-digit hexadecimal
/// value with leading zeros.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    num_derive::FromPrimitive,
    num_derive::ToPrimitive,
)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
#[repr(transparent)]
pub struct VendorId(u16);

impl VendorId {
    /// Intel Corporation.
    pub const INTEL: VendorId = VendorId(0x8086);

    /// Creates a new vendor ID.
    #[must_use]
    pub fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw vendor ID value.
    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }

    /// Checks if this vendor ID is the reserved invalid value.
    ///
    /// ```
    /// use accel_hardware::pci::vendor::VendorId;
    ///
    /// assert!(!VendorId::INTEL.is_invalid());
    /// assert!(VendorId::new(0xFFFF).is_invalid());
    /// ```
    #[must_use]
    pub fn is_invalid(self) -> bool {
        self.0 == 0xFFFF
    }
}

impl TryFrom<u32> for VendorId {
    type Error = std::num::TryFromIntError;

    /// Runtimes report vendor ids as 32-bit values; only the low 16 bits are meaningful.
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(VendorId(u16::try_from(value)?))
    }
}

impl std::fmt::LowerHex for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

impl std::fmt::Display for VendorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:x}")
    }
}

impl From<VendorId> for String {
    fn from(value: VendorId) -> Self {
        format!("{value:x}")
    }
}

impl TryFrom<String> for VendorId {
    type Error = std::num::ParseIntError;

    /// Parses a vendor ID from a hexadecimal string of 1-4 digits.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let id = u16::from_str_radix(&value, 16)?;
        Ok(VendorId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::VendorId;
    use num_traits::FromPrimitive;

    #[test]
    fn from_runtime_value() {
        assert_eq!(VendorId::try_from(0x8086_u32).unwrap(), VendorId::INTEL);
        assert!(VendorId::try_from(0x1_0000_u32).is_err());
        assert_eq!(VendorId::from_u16(0x8086), Some(VendorId::INTEL));
    }

    #[test]
    fn hex_round_trip_through_serde() {
        let yaml = serde_yaml_ng::to_string(&VendorId::INTEL).unwrap();
        assert!(yaml.contains("8086"));
        let back: VendorId = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back, VendorId::INTEL);
    }
}
