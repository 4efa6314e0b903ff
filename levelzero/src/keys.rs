// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Info attribute keys and values written by discovery.

use crate::ze::types::MemoryClass;

pub const SUBTYPE: &str = "LevelZero";
pub const BACKEND: &str = "Backend";
pub const BACKEND_NAME: &str = "LevelZero";

pub const DRIVER_INDEX: &str = "LevelZeroDriverIndex";
pub const DRIVER_DEVICE_INDEX: &str = "LevelZeroDriverDeviceIndex";
pub const DEVICE_TYPE: &str = "LevelZeroDeviceType";
pub const NUM_SLICES: &str = "LevelZeroNumSlices";
pub const NUM_SUBSLICES_PER_SLICE: &str = "LevelZeroNumSubslicesPerSlice";
pub const NUM_EUS_PER_SUBSLICE: &str = "LevelZeroNumEUsPerSubslice";
pub const NUM_THREADS_PER_EU: &str = "LevelZeroNumThreadsPerEU";
pub const UUID: &str = "LevelZeroUUID";

pub const VENDOR: &str = "LevelZeroVendor";
pub const MODEL: &str = "LevelZeroModel";
pub const BRAND: &str = "LevelZeroBrand";
pub const SERIAL_NUMBER: &str = "LevelZeroSerialNumber";
pub const BOARD_NUMBER: &str = "LevelZeroBoardNumber";

pub const CQ_GROUPS: &str = "LevelZeroCQGroups";

/// Number of subdevices registered right after a root device.
pub const SUBDEVICES: &str = "LevelZeroSubdevices";
pub const SUBDEVICE_ID: &str = "LevelZeroSubdeviceID";

pub const HBM_SIZE: &str = "LevelZeroHBMSize";
pub const DDR_SIZE: &str = "LevelZeroDDRSize";

/// Management strings equal to this (ignoring case) are not recorded.
pub const UNKNOWN: &str = "unknown";

/// Key of command queue group `index`.
#[must_use]
pub fn cq_group(index: usize) -> String {
    format!("LevelZeroCQGroup{index}")
}

/// Key of the per-subdevice size of memory of class `class` (`HBM`, `DDR`, `Memory`).
#[must_use]
pub fn memory_size(class: MemoryClass) -> String {
    format!("LevelZero{class}Size")
}
