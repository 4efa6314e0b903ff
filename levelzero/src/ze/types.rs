// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Plain data returned by the Level Zero runtime.
//!
//! Values which the runtime may report outside of the documented range (device and memory types)
//! are kept raw here and classified by the collectors.

use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use hardware::pci::address::PciAddress;
use num_traits::FromPrimitive;

/// Number of bytes in a device UUID.
pub const DEVICE_UUID_SIZE: usize = 16;

/// The universally unique id of a device or subdevice.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[repr(transparent)]
pub struct DeviceUuid(pub [u8; DEVICE_UUID_SIZE]);

impl Display for DeviceUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Classified device type.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    num_derive::FromPrimitive,
    num_derive::ToPrimitive,
    strum::Display,
    strum::EnumIs,
)]
#[repr(u32)]
pub enum DeviceType {
    #[strum(serialize = "GPU")]
    Gpu = 1,
    #[strum(serialize = "CPU")]
    Cpu = 2,
    #[strum(serialize = "FPGA")]
    Fpga = 3,
    #[strum(serialize = "MCA")]
    Mca = 4,
    #[strum(serialize = "VPU")]
    Vpu = 5,
}

impl DeviceType {
    /// Classify a raw device type, `None` if unrecognized.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::from_u32(raw)
    }
}

bitflags! {
    /// Device property flags.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct DevicePropertyFlags: u32 {
        const INTEGRATED = 1 << 0;
        /// The device is a subdevice of another device.
        const SUBDEVICE = 1 << 1;
        const ECC = 1 << 2;
        const ONDEMANDPAGING = 1 << 3;
    }
}

/// Static properties of a device or subdevice.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeviceProperties {
    /// Raw device type, see [`DeviceType`].
    pub device_type: u32,
    pub vendor_id: u32,
    pub device_id: u32,
    pub flags: DevicePropertyFlags,
    pub subdevice_id: u32,
    pub uuid: DeviceUuid,
    pub name: String,
    pub num_slices: u32,
    pub num_subslices_per_slice: u32,
    pub num_eus_per_subslice: u32,
    pub num_threads_per_eu: u32,
}

/// Management properties of a device.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SysmanProperties {
    pub vendor_name: String,
    pub model_name: String,
    pub brand_name: String,
    pub serial_number: String,
    pub board_number: String,
}

/// The management handle of a device, as resolved from its UUID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SysmanDeviceRef<H> {
    pub handle: H,
    /// The UUID designates a subdevice of `handle`.
    pub on_subdevice: bool,
    pub subdevice_id: u32,
}

bitflags! {
    /// What a command queue group can be used for.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct CommandQueueGroupFlags: u32 {
        const COMPUTE = 1 << 0;
        const COPY = 1 << 1;
        const COOPERATIVE_KERNELS = 1 << 2;
        const METRICS = 1 << 3;
        const _ = !0;
    }
}

/// Properties of a command queue group.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommandQueueGroupProperties {
    pub flags: CommandQueueGroupFlags,
    pub num_queues: u32,
}

/// Classified memory module type.
///
/// Raw values past `Lpddr5` exist (SRAM, caches, ...) but are not sized by discovery.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
#[repr(u32)]
pub enum MemoryType {
    Hbm = 0,
    Ddr = 1,
    Ddr3 = 2,
    Ddr4 = 3,
    Ddr5 = 4,
    Lpddr = 5,
    Lpddr3 = 6,
    Lpddr4 = 7,
    Lpddr5 = 8,
}

/// How a memory module is accounted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::EnumIs)]
pub enum MemoryClass {
    #[strum(serialize = "HBM")]
    Hbm,
    #[strum(serialize = "DDR")]
    Ddr,
    /// Any other memory; not accumulated.
    #[strum(serialize = "Memory")]
    Other,
}

impl MemoryClass {
    /// Classify a raw memory type.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        match MemoryType::from_u32(raw) {
            Some(MemoryType::Hbm) => Self::Hbm,
            Some(_) => Self::Ddr,
            None => Self::Other,
        }
    }
}

/// Static properties of a memory module.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemoryProperties {
    /// Raw memory type, see [`MemoryType`].
    pub memory_type: u32,
    pub on_subdevice: bool,
    pub subdevice_id: u32,
    /// Physical size in bytes, 0 if unknown.
    pub physical_size: u64,
}

/// Live state of a memory module.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemoryState {
    pub free: u64,
    pub size: u64,
}

/// Identity of a fabric port, unique across the fabric.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct FabricPortId {
    pub fabric_id: u32,
    pub attach_id: u32,
    pub port_number: u8,
}

impl FabricPortId {
    #[must_use]
    pub fn new(fabric_id: u32, attach_id: u32, port_number: u8) -> Self {
        Self {
            fabric_id,
            attach_id,
            port_number,
        }
    }
}

impl Display for FabricPortId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.fabric_id, self.attach_id, self.port_number)
    }
}

/// Static properties of a fabric port.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FabricPortProperties {
    /// Link technology, e.g. `XeLink`.
    pub model: String,
    pub on_subdevice: bool,
    pub subdevice_id: u32,
    pub port_id: FabricPortId,
}

/// Speed of one direction of a fabric link.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FabricPortSpeed {
    /// Bits per second, negative if unknown.
    pub bit_rate: i64,
    /// Number of lanes, negative if unknown.
    pub width: i32,
}

impl FabricPortSpeed {
    /// The bit rate converted with a 20 bit shift, 0 if unknown.
    #[must_use]
    pub fn megabytes(&self) -> u64 {
        u64::try_from(self.bit_rate).map_or(0, |rate| rate >> 20)
    }
}

/// Operational status of a fabric port.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    num_derive::FromPrimitive,
    num_derive::ToPrimitive,
    strum::Display,
    strum::EnumIs,
)]
#[repr(u32)]
pub enum FabricPortStatus {
    #[default]
    Unknown = 0,
    Healthy = 1,
    Degraded = 2,
    Failed = 3,
    Disabled = 4,
}

impl FabricPortStatus {
    /// Ports in these states carry traffic.
    #[must_use]
    pub fn is_usable(self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

/// Live state of a fabric port.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FabricPortState {
    pub status: FabricPortStatus,
    /// The port at the other end of the link.
    pub remote_port_id: FabricPortId,
    pub rx_speed: FabricPortSpeed,
    pub tx_speed: FabricPortSpeed,
}

/// PCI location and link speed of a device.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PciProperties {
    pub address: PciAddress,
    /// Maximum bandwidth in bytes per second, negative or 0 if unknown.
    pub max_bandwidth: i64,
}
