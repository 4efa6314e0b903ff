// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Discovery settings.

use derive_builder::Builder;

/// Environment variable which turns on advisory diagnostics.
pub const SHOW_ALL_ERRORS_ENV: &str = "ACCEL_SHOW_ALL_ERRORS";

/// Link technology aggregated into the bandwidth matrix.
pub const DEFAULT_LINK_MODEL: &str = "XeLink";

/// Bandwidth (MB/s) assumed between a device and itself or its subdevices.
pub const DEFAULT_LOCAL_BANDWIDTH: u64 = 1_000_000;

/// Name of the published bandwidth matrix.
pub const DEFAULT_DISTANCES_NAME: &str = "XeLinkBandwidth";

/// Settings of a discovery pass. We derive a builder type `DiscoveryConfigBuilder` with a default
/// for each field.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DiscoveryConfig {
    /// Emit advisory diagnostics (unexpected values reported by the runtime).
    #[builder(default)]
    show_all_errors: bool,

    /// Only links whose ports report this model are aggregated (case-sensitive).
    #[builder(setter(into), default = DEFAULT_LINK_MODEL.to_string())]
    link_model: String,

    /// Value written between a device and itself or its subdevices.
    #[builder(default = DEFAULT_LOCAL_BANDWIDTH)]
    local_bandwidth: u64,

    #[builder(setter(into), default = DEFAULT_DISTANCES_NAME.to_string())]
    distances_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            show_all_errors: false,
            link_model: DEFAULT_LINK_MODEL.to_string(),
            local_bandwidth: DEFAULT_LOCAL_BANDWIDTH,
            distances_name: DEFAULT_DISTANCES_NAME.to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Defaults, with diagnostics enabled if [`SHOW_ALL_ERRORS_ENV`] is set to anything but `0`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            show_all_errors: show_all_errors_from(std::env::var(SHOW_ALL_ERRORS_ENV).ok().as_deref()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn show_all_errors(&self) -> bool {
        self.show_all_errors
    }

    #[must_use]
    pub fn link_model(&self) -> &str {
        &self.link_model
    }

    #[must_use]
    pub fn local_bandwidth(&self) -> u64 {
        self.local_bandwidth
    }

    #[must_use]
    pub fn distances_name(&self) -> &str {
        &self.distances_name
    }
}

fn show_all_errors_from(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.is_empty() && value != "0")
}
