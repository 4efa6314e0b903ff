// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Operating system device attributes.
//!
//! OS devices are the leaves of the topology: things the operating system (or a device runtime)
//! gives a name to, such as GPUs, co-processors, network interfaces or block devices.

use bitflags::bitflags;

bitflags! {
    /// The kinds an OS device belongs to.  A device may be several kinds at once (a GPU exposed by
    /// a compute runtime is both `GPU` and `COPROC`).
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
    #[cfg_attr(
        any(test, feature = "serde"),
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct OsDeviceType: u32 {
        /// Block storage.
        const STORAGE = 1 << 0;
        /// Display or compute GPU.
        const GPU = 1 << 1;
        /// Network interface.
        const NETWORK = 1 << 2;
        /// OpenFabrics / RDMA interface.
        const OPENFABRICS = 1 << 3;
        /// DMA engine.
        const DMA = 1 << 4;
        /// Co-processor driven by a compute runtime.
        const COPROC = 1 << 5;
        /// Memory-like device.
        const MEMORY = 1 << 6;
    }
}

/// Attributes of an OS device object.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct OsDeviceAttributes {
    types: OsDeviceType,
}

impl OsDeviceAttributes {
    /// Create attributes for a device of the given kinds.
    #[must_use]
    pub fn new(types: OsDeviceType) -> Self {
        Self { types }
    }

    /// The kinds of this device.
    #[must_use]
    pub fn types(&self) -> OsDeviceType {
        self.types
    }
}
