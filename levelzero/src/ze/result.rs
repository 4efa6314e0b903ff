// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Level Zero result codes.

use num_traits::FromPrimitive;

/// Result codes returned by the Level Zero core and sysman APIs.
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
)]
#[repr(u32)]
pub enum ResultCode {
    Success = 0,
    NotReady = 1,
    ErrorDeviceLost = 0x7000_0001,
    ErrorOutOfHostMemory = 0x7000_0002,
    ErrorOutOfDeviceMemory = 0x7000_0003,
    ErrorModuleBuildFailure = 0x7000_0004,
    ErrorInsufficientPermissions = 0x7001_0000,
    ErrorNotAvailable = 0x7001_0001,
    ErrorUninitialized = 0x7800_0001,
    ErrorUnsupportedVersion = 0x7800_0002,
    ErrorUnsupportedFeature = 0x7800_0003,
    ErrorInvalidArgument = 0x7800_0004,
    ErrorInvalidNullHandle = 0x7800_0005,
    ErrorHandleObjectInUse = 0x7800_0006,
    ErrorInvalidNullPointer = 0x7800_0007,
    ErrorInvalidSize = 0x7800_0008,
    ErrorUnsupportedSize = 0x7800_0009,
    ErrorUnknown = 0x7fff_fffe,
}

/// A failed Level Zero call.
///
/// Codes this crate does not know about are kept raw so they survive the trip to the logs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum ZeError {
    #[error("level zero call failed: {0}")]
    Code(ResultCode),
    #[error("level zero call failed with unrecognized code {0:#010x}")]
    Unrecognized(u32),
}

impl ZeError {
    /// Classify a raw result code.
    #[must_use]
    pub fn new(raw: u32) -> Self {
        ResultCode::from_u32(raw).map_or(Self::Unrecognized(raw), Self::Code)
    }

    /// The raw result code.
    #[must_use]
    pub fn raw(&self) -> u32 {
        match self {
            Self::Code(code) => *code as u32,
            Self::Unrecognized(raw) => *raw,
        }
    }

    /// The result code, if it is one this crate knows.
    #[must_use]
    pub fn code(&self) -> Option<ResultCode> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns true if the call rejected one of its arguments.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        self.code() == Some(ResultCode::ErrorInvalidArgument)
    }
}

impl From<ResultCode> for ZeError {
    fn from(code: ResultCode) -> Self {
        Self::Code(code)
    }
}

/// Result of a Level Zero call.
pub type ZeResult<T> = Result<T, ZeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_named() {
        let error = ZeError::from(ResultCode::ErrorInvalidArgument);
        assert_eq!(error.raw(), 0x7800_0004);
        assert!(error.is_invalid_argument());
        assert_eq!(
            error.to_string(),
            "level zero call failed: ErrorInvalidArgument"
        );
    }

    #[test]
    fn unknown_codes_survive() {
        let error = ZeError::new(0x7abc_0000);
        assert_eq!(error.code(), None);
        assert!(!error.is_invalid_argument());
        assert!(error.to_string().contains("0x7abc0000"));
        assert!(error.to_string().contains("unrecognized"));
    }
}
