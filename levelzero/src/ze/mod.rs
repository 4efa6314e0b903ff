// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The Level Zero runtime, as seen by discovery.
//!
//! [`ZeRuntime`] covers the handful of core (`ze*`) and management (`zes*`) calls discovery needs.
//! Handles are opaque to discovery; it only stores them, clones them and hands them back.
//! Every call may fail with a [`ZeError`], and discovery decides how far each failure reaches.

pub mod result;
pub mod types;

use std::fmt::Debug;

pub use result::{ResultCode, ZeError, ZeResult};

use crate::ze::types::{
    CommandQueueGroupProperties, DeviceProperties, DeviceUuid, FabricPortProperties,
    FabricPortState, MemoryProperties, MemoryState, PciProperties, SysmanDeviceRef,
    SysmanProperties,
};

/// Access to a Level Zero driver stack.
pub trait ZeRuntime {
    /// A core driver.
    type Driver: Clone + Debug;
    /// A management driver.
    type SysmanDriver: Clone + Debug;
    /// A core device or subdevice.
    type Device: Clone + Debug;
    /// A management device.
    type SysmanDevice: Clone + Debug;
    /// A memory module of a management device.
    type MemoryModule: Clone + Debug;
    /// A fabric port of a management device.
    type FabricPort: Clone + Debug;

    /// Initialize the core API.
    ///
    /// # Errors
    ///
    /// Fails if no usable driver stack is present.
    fn init(&self) -> ZeResult<()>;

    /// Initialize the management API.
    ///
    /// # Errors
    ///
    /// Fails if no usable driver stack is present.
    fn sysman_init(&self) -> ZeResult<()>;

    /// The core drivers.
    ///
    /// # Errors
    ///
    /// Fails if the drivers can not be listed.
    fn drivers(&self) -> ZeResult<Vec<Self::Driver>>;

    /// The management drivers, in the same order as [`ZeRuntime::drivers`].
    ///
    /// # Errors
    ///
    /// Fails if the drivers can not be listed.
    fn sysman_drivers(&self) -> ZeResult<Vec<Self::SysmanDriver>>;

    /// Root devices of a driver.
    ///
    /// # Errors
    ///
    /// Fails if the devices can not be listed.
    fn devices(&self, driver: &Self::Driver) -> ZeResult<Vec<Self::Device>>;

    /// Static properties of a device.
    ///
    /// # Errors
    ///
    /// Fails if the properties can not be read.
    fn device_properties(&self, device: &Self::Device) -> ZeResult<DeviceProperties>;

    /// Resolve the management device behind a core device UUID.
    ///
    /// # Errors
    ///
    /// Fails if no management device has that UUID.
    fn sysman_device_by_uuid(
        &self,
        driver: &Self::SysmanDriver,
        uuid: DeviceUuid,
    ) -> ZeResult<SysmanDeviceRef<Self::SysmanDevice>>;

    /// Management properties of a device.
    ///
    /// # Errors
    ///
    /// Fails if the properties can not be read.
    fn sysman_properties(&self, device: &Self::SysmanDevice) -> ZeResult<SysmanProperties>;

    /// Command queue groups of a device.
    ///
    /// # Errors
    ///
    /// Fails if the groups can not be listed.
    fn command_queue_groups(
        &self,
        device: &Self::Device,
    ) -> ZeResult<Vec<CommandQueueGroupProperties>>;

    /// Subdevices of a device.
    ///
    /// # Errors
    ///
    /// Devices without subdevices may report [`ResultCode::ErrorInvalidArgument`].
    fn subdevices(&self, device: &Self::Device) -> ZeResult<Vec<Self::Device>>;

    /// Memory modules of a management device, including those of its subdevices.
    ///
    /// # Errors
    ///
    /// Fails if the modules can not be listed.
    fn memory_modules(&self, device: &Self::SysmanDevice) -> ZeResult<Vec<Self::MemoryModule>>;

    /// Static properties of a memory module.
    ///
    /// # Errors
    ///
    /// Fails if the properties can not be read.
    fn memory_properties(&self, module: &Self::MemoryModule) -> ZeResult<MemoryProperties>;

    /// Live state of a memory module.
    ///
    /// # Errors
    ///
    /// Fails if the state can not be read.
    fn memory_state(&self, module: &Self::MemoryModule) -> ZeResult<MemoryState>;

    /// Fabric ports of a management device, including those of its subdevices.
    ///
    /// # Errors
    ///
    /// Fails if the ports can not be listed.
    fn fabric_ports(&self, device: &Self::SysmanDevice) -> ZeResult<Vec<Self::FabricPort>>;

    /// Static properties of a fabric port.
    ///
    /// # Errors
    ///
    /// Fails if the properties can not be read.
    fn fabric_port_properties(&self, port: &Self::FabricPort) -> ZeResult<FabricPortProperties>;

    /// Live state of a fabric port.
    ///
    /// # Errors
    ///
    /// Fails if the state can not be read.
    fn fabric_port_state(&self, port: &Self::FabricPort) -> ZeResult<FabricPortState>;

    /// PCI location of a device through the core extension.
    ///
    /// # Errors
    ///
    /// Fails if the extension is not supported.
    fn pci_properties_ext(&self, device: &Self::Device) -> ZeResult<PciProperties>;

    /// PCI location of a device through the management API.
    ///
    /// # Errors
    ///
    /// Fails if the properties can not be read.
    fn sysman_pci_properties(&self, device: &Self::SysmanDevice) -> ZeResult<PciProperties>;
}
