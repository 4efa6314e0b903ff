// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! PCI bus addresses.
//!
//! A [`PciAddress`] identifies a PCI function by domain, bus, device and function number.  It is
//! what device runtimes report to locate their hardware, and what the topology uses to find the
//! object a device should be attached under.
//!
//! # Examples
//!
//! ```
//! use accel_hardware::pci::address::PciAddress;
//!
//! let addr = PciAddress::try_from("0000:3a:00.0").unwrap();
//! assert_eq!(addr.bus(), 0x3a);
//! assert_eq!(addr.to_string(), "0000:3a:00.0");
//! ```

use std::fmt::{Display, Formatter};

/// Errors which can occur when parsing a [`PciAddress`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidPciAddress {
    /// The string does not have the `dddd:bb:dd.f` shape.
    #[error("invalid pci address syntax: {0}")]
    Syntax(String),
    /// One of the components is not a valid hex number for its width.
    #[error("invalid pci address component {component} in {address}")]
    Component {
        /// Name of the offending component.
        component: &'static str,
        /// The full address which failed to parse.
        address: String,
    },
    /// Device numbers are 5 bits wide.
    #[error("pci device number {0:#x} out of range (max 0x1f)")]
    Device(u8),
    /// Function numbers are 3 bits wide.
    #[error("pci function number {0:#x} out of range (max 0x7)")]
    Function(u8),
}

/// A PCI domain / bus / device / function address.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct PciAddress {
    domain: u32,
    bus: u8,
    device: u8,
    function: u8,
}

impl PciAddress {
    /// Largest legal device number.
    pub const MAX_DEVICE: u8 = 0x1f;
    /// Largest legal function number.
    pub const MAX_FUNCTION: u8 = 0x7;

    /// Create a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if `device` or `function` do not fit in their bit width.
    pub fn new(domain: u32, bus: u8, device: u8, function: u8) -> Result<Self, InvalidPciAddress> {
        if device > Self::MAX_DEVICE {
            return Err(InvalidPciAddress::Device(device));
        }
        if function > Self::MAX_FUNCTION {
            return Err(InvalidPciAddress::Function(function));
        }
        Ok(Self {
            domain,
            bus,
            device,
            function,
        })
    }

    /// The PCI domain (segment).
    #[must_use]
    pub fn domain(&self) -> u32 {
        self.domain
    }

    /// The bus number.
    #[must_use]
    pub fn bus(&self) -> u8 {
        self.bus
    }

    /// The device number.
    #[must_use]
    pub fn device(&self) -> u8 {
        self.device
    }

    /// The function number.
    #[must_use]
    pub fn function(&self) -> u8 {
        self.function
    }
}

impl Display for PciAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04x}:{:02x}:{:02x}.{:x}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

impl From<PciAddress> for String {
    fn from(value: PciAddress) -> Self {
        value.to_string()
    }
}

impl TryFrom<&str> for PciAddress {
    type Error = InvalidPciAddress;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let syntax = || InvalidPciAddress::Syntax(value.to_string());
        let component = |component| InvalidPciAddress::Component {
            component,
            address: value.to_string(),
        };
        let (domain, rest) = value.split_once(':').ok_or_else(syntax)?;
        let (bus, rest) = rest.split_once(':').ok_or_else(syntax)?;
        let (device, function) = rest.split_once('.').ok_or_else(syntax)?;
        let domain = u32::from_str_radix(domain, 16).map_err(|_| component("domain"))?;
        let bus = u8::from_str_radix(bus, 16).map_err(|_| component("bus"))?;
        let device = u8::from_str_radix(device, 16).map_err(|_| component("device"))?;
        let function = u8::from_str_radix(function, 16).map_err(|_| component("function"))?;
        Self::new(domain, bus, device, function)
    }
}

impl TryFrom<String> for PciAddress {
    type Error = InvalidPciAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PciAddress::try_from(value.as_str())
    }
}
