// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! An in-memory Level Zero runtime.
//!
//! [`FakeRuntime`] holds drivers, devices, memory modules and fabric ports in flat arenas and
//! hands out their indices as handles.  Every query answers from a field that tests may replace
//! with an error.

use crate::ze::types::{
    CommandQueueGroupProperties, DEVICE_UUID_SIZE, DeviceProperties, DevicePropertyFlags,
    DeviceType, DeviceUuid, FabricPortId, FabricPortProperties, FabricPortSpeed, FabricPortState,
    FabricPortStatus, MemoryProperties, MemoryState, PciProperties, SysmanDeviceRef,
    SysmanProperties,
};
use crate::ze::{ResultCode, ZeError, ZeResult, ZeRuntime};

/// A UUID whose first byte is `tag`.
#[must_use]
pub fn uuid(tag: u8) -> DeviceUuid {
    let mut bytes = [0u8; DEVICE_UUID_SIZE];
    bytes[0] = tag;
    DeviceUuid(bytes)
}

/// A driver and the indices of its root devices.
#[derive(Clone, Debug, Default)]
pub struct FakeDriver {
    pub devices: Vec<usize>,
    /// Returned instead of the device list when set.
    pub devices_error: Option<ZeError>,
}

/// A device or subdevice.
#[derive(Clone, Debug)]
pub struct FakeDevice {
    pub properties: ZeResult<DeviceProperties>,
    /// Returned by the UUID lookup instead of this device when set.
    pub sysman_lookup_error: Option<ZeError>,
    pub sysman_properties: ZeResult<SysmanProperties>,
    pub command_queue_groups: ZeResult<Vec<CommandQueueGroupProperties>>,
    /// Returned instead of the subdevice list when set.
    pub subdevices_error: Option<ZeError>,
    pub memory_modules_error: Option<ZeError>,
    pub fabric_ports_error: Option<ZeError>,
    pub pci_ext: ZeResult<PciProperties>,
    pub sysman_pci: ZeResult<PciProperties>,
    subdevices: Vec<usize>,
    memory: Vec<usize>,
    ports: Vec<usize>,
    is_subdevice: bool,
    subdevice_id: u32,
}

impl FakeDevice {
    /// A device with the given properties and no optional capabilities.
    #[must_use]
    pub fn new(properties: DeviceProperties) -> Self {
        Self {
            properties: Ok(properties),
            sysman_lookup_error: None,
            sysman_properties: Ok(SysmanProperties {
                vendor_name: "unknown".to_string(),
                model_name: "unknown".to_string(),
                brand_name: "unknown".to_string(),
                serial_number: "unknown".to_string(),
                board_number: "unknown".to_string(),
            }),
            command_queue_groups: Ok(Vec::new()),
            subdevices_error: None,
            memory_modules_error: None,
            fabric_ports_error: None,
            pci_ext: Err(ResultCode::ErrorUnsupportedFeature.into()),
            sysman_pci: Err(ResultCode::ErrorUnsupportedFeature.into()),
            subdevices: Vec::new(),
            memory: Vec::new(),
            ports: Vec::new(),
            is_subdevice: false,
            subdevice_id: 0,
        }
    }

    /// A root GPU identified by `uuid(tag)`.
    #[must_use]
    pub fn gpu(tag: u8) -> Self {
        Self::new(DeviceProperties {
            device_type: DeviceType::Gpu as u32,
            vendor_id: 0x8086,
            device_id: 0x0bd5,
            uuid: uuid(tag),
            name: "Intel(R) Data Center GPU Max 1550".to_string(),
            num_slices: 1,
            num_subslices_per_slice: 64,
            num_eus_per_subslice: 8,
            num_threads_per_eu: 8,
            ..DeviceProperties::default()
        })
    }

    /// Subdevice `id` of a GPU, identified by `uuid(tag)`.
    #[must_use]
    pub fn subdevice(tag: u8, id: u32) -> Self {
        let mut device = Self::gpu(tag);
        if let Ok(properties) = device.properties.as_mut() {
            properties.flags |= DevicePropertyFlags::SUBDEVICE;
            properties.subdevice_id = id;
        }
        device
    }

    /// Replace the management strings.
    #[must_use]
    pub fn with_sysman(mut self, properties: SysmanProperties) -> Self {
        self.sysman_properties = Ok(properties);
        self
    }
}

/// A memory module.
#[derive(Clone, Debug)]
pub struct FakeMemory {
    pub properties: ZeResult<MemoryProperties>,
    pub state: ZeResult<MemoryState>,
}

impl FakeMemory {
    /// A module of raw type `memory_type` and `size` bytes, on subdevice `subdevice` if any.
    #[must_use]
    pub fn new(memory_type: u32, subdevice: Option<u32>, size: u64) -> Self {
        Self {
            properties: Ok(MemoryProperties {
                memory_type,
                on_subdevice: subdevice.is_some(),
                subdevice_id: subdevice.unwrap_or_default(),
                physical_size: size,
            }),
            state: Ok(MemoryState {
                free: size,
                size,
            }),
        }
    }
}

/// A fabric port.
#[derive(Clone, Debug)]
pub struct FakePort {
    pub properties: ZeResult<FabricPortProperties>,
    pub state: ZeResult<FabricPortState>,
}

impl FakePort {
    /// A port of model `model` wired to `remote`, receiving at `bit_rate`.
    #[must_use]
    pub fn new(
        model: &str,
        subdevice: Option<u32>,
        id: FabricPortId,
        remote: FabricPortId,
        status: FabricPortStatus,
        bit_rate: i64,
    ) -> Self {
        let speed = FabricPortSpeed { bit_rate, width: 4 };
        Self {
            properties: Ok(FabricPortProperties {
                model: model.to_string(),
                on_subdevice: subdevice.is_some(),
                subdevice_id: subdevice.unwrap_or_default(),
                port_id: id,
            }),
            state: Ok(FabricPortState {
                status,
                remote_port_id: remote,
                rx_speed: speed,
                tx_speed: speed,
            }),
        }
    }

    /// A healthy XeLink port.
    #[must_use]
    pub fn xelink(
        subdevice: Option<u32>,
        id: FabricPortId,
        remote: FabricPortId,
        bit_rate: i64,
    ) -> Self {
        Self::new(
            "XeLink",
            subdevice,
            id,
            remote,
            FabricPortStatus::Healthy,
            bit_rate,
        )
    }
}

/// A deterministic runtime made of the objects added to it.
#[derive(Clone, Debug)]
pub struct FakeRuntime {
    pub init: ZeResult<()>,
    pub sysman_init: ZeResult<()>,
    pub drivers_error: Option<ZeError>,
    /// Number of management drivers reported, defaults to the number of core drivers.
    pub sysman_driver_count: Option<usize>,
    drivers: Vec<FakeDriver>,
    devices: Vec<FakeDevice>,
    memory: Vec<FakeMemory>,
    ports: Vec<FakePort>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRuntime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            init: Ok(()),
            sysman_init: Ok(()),
            drivers_error: None,
            sysman_driver_count: None,
            drivers: Vec::new(),
            devices: Vec::new(),
            memory: Vec::new(),
            ports: Vec::new(),
        }
    }

    pub fn add_driver(&mut self) -> usize {
        self.drivers.push(FakeDriver::default());
        self.drivers.len() - 1
    }

    pub fn driver_mut(&mut self, driver: usize) -> &mut FakeDriver {
        &mut self.drivers[driver]
    }

    pub fn add_device(&mut self, driver: usize, device: FakeDevice) -> usize {
        self.devices.push(device);
        let index = self.devices.len() - 1;
        self.drivers[driver].devices.push(index);
        index
    }

    pub fn add_subdevice(&mut self, parent: usize, mut device: FakeDevice) -> usize {
        device.is_subdevice = true;
        device.subdevice_id =
            u32::try_from(self.devices[parent].subdevices.len()).unwrap_or(u32::MAX);
        self.devices.push(device);
        let index = self.devices.len() - 1;
        self.devices[parent].subdevices.push(index);
        index
    }

    pub fn device_mut(&mut self, device: usize) -> &mut FakeDevice {
        &mut self.devices[device]
    }

    /// Add a memory module to the management view of root device `device`.
    pub fn add_memory(&mut self, device: usize, memory: FakeMemory) -> usize {
        self.memory.push(memory);
        let index = self.memory.len() - 1;
        self.devices[device].memory.push(index);
        index
    }

    /// Add a fabric port to the management view of root device `device`.
    pub fn add_port(&mut self, device: usize, port: FakePort) -> usize {
        self.ports.push(port);
        let index = self.ports.len() - 1;
        self.devices[device].ports.push(index);
        index
    }

    fn device(&self, device: usize) -> ZeResult<&FakeDevice> {
        self.devices
            .get(device)
            .ok_or(ZeError::Code(ResultCode::ErrorInvalidNullHandle))
    }

    fn fail_or<T>(error: Option<ZeError>, value: impl FnOnce() -> T) -> ZeResult<T> {
        match error {
            Some(error) => Err(error),
            None => Ok(value()),
        }
    }
}

impl ZeRuntime for FakeRuntime {
    type Driver = usize;
    type SysmanDriver = usize;
    type Device = usize;
    type SysmanDevice = usize;
    type MemoryModule = usize;
    type FabricPort = usize;

    fn init(&self) -> ZeResult<()> {
        self.init
    }

    fn sysman_init(&self) -> ZeResult<()> {
        self.sysman_init
    }

    fn drivers(&self) -> ZeResult<Vec<usize>> {
        Self::fail_or(self.drivers_error, || (0..self.drivers.len()).collect())
    }

    fn sysman_drivers(&self) -> ZeResult<Vec<usize>> {
        Ok((0..self.sysman_driver_count.unwrap_or(self.drivers.len())).collect())
    }

    fn devices(&self, driver: &usize) -> ZeResult<Vec<usize>> {
        let driver = self
            .drivers
            .get(*driver)
            .ok_or(ZeError::Code(ResultCode::ErrorInvalidNullHandle))?;
        Self::fail_or(driver.devices_error, || driver.devices.clone())
    }

    fn device_properties(&self, device: &usize) -> ZeResult<DeviceProperties> {
        self.device(*device)?.properties.clone()
    }

    fn sysman_device_by_uuid(
        &self,
        _driver: &usize,
        uuid: DeviceUuid,
    ) -> ZeResult<SysmanDeviceRef<usize>> {
        let (handle, device) = self
            .devices
            .iter()
            .enumerate()
            .find(|(_, device)| {
                device
                    .properties
                    .as_ref()
                    .is_ok_and(|properties| properties.uuid == uuid)
            })
            .ok_or(ZeError::Code(ResultCode::ErrorInvalidArgument))?;
        Self::fail_or(device.sysman_lookup_error, || SysmanDeviceRef {
            handle,
            on_subdevice: device.is_subdevice,
            subdevice_id: device.subdevice_id,
        })
    }

    fn sysman_properties(&self, device: &usize) -> ZeResult<SysmanProperties> {
        self.device(*device)?.sysman_properties.clone()
    }

    fn command_queue_groups(&self, device: &usize) -> ZeResult<Vec<CommandQueueGroupProperties>> {
        self.device(*device)?.command_queue_groups.clone()
    }

    fn subdevices(&self, device: &usize) -> ZeResult<Vec<usize>> {
        let device = self.device(*device)?;
        if let Some(error) = device.subdevices_error {
            return Err(error);
        }
        if device.subdevices.is_empty() {
            return Err(ResultCode::ErrorInvalidArgument.into());
        }
        Ok(device.subdevices.clone())
    }

    fn memory_modules(&self, device: &usize) -> ZeResult<Vec<usize>> {
        let device = self.device(*device)?;
        Self::fail_or(device.memory_modules_error, || device.memory.clone())
    }

    fn memory_properties(&self, module: &usize) -> ZeResult<MemoryProperties> {
        self.memory
            .get(*module)
            .ok_or(ZeError::Code(ResultCode::ErrorInvalidNullHandle))?
            .properties
    }

    fn memory_state(&self, module: &usize) -> ZeResult<MemoryState> {
        self.memory
            .get(*module)
            .ok_or(ZeError::Code(ResultCode::ErrorInvalidNullHandle))?
            .state
    }

    fn fabric_ports(&self, device: &usize) -> ZeResult<Vec<usize>> {
        let device = self.device(*device)?;
        Self::fail_or(device.fabric_ports_error, || device.ports.clone())
    }

    fn fabric_port_properties(&self, port: &usize) -> ZeResult<FabricPortProperties> {
        self.ports
            .get(*port)
            .ok_or(ZeError::Code(ResultCode::ErrorInvalidNullHandle))?
            .properties
            .clone()
    }

    fn fabric_port_state(&self, port: &usize) -> ZeResult<FabricPortState> {
        self.ports
            .get(*port)
            .ok_or(ZeError::Code(ResultCode::ErrorInvalidNullHandle))?
            .state
    }

    fn pci_properties_ext(&self, device: &usize) -> ZeResult<PciProperties> {
        self.device(*device)?.pci_ext
    }

    fn sysman_pci_properties(&self, device: &usize) -> ZeResult<PciProperties> {
        self.device(*device)?.sysman_pci
    }
}
