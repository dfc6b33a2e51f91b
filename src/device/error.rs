use std::io;
use thiserror::Error;

/// Enum representing possible failures when initializing or accessing the GPIO controller.
///
/// Initialization can fail in these ways, each needing a different remedy:
/// - RevisionUnknown - The host is not a recognized board, so no pin layout can be trusted.
/// - IdentifierUnreadable - The revision identifier (`/proc/cpuinfo`) exists but can't be read.
/// - PermissionDenied - The device file exists but this process may not open it. Run as root or join the `gpio` group.
/// - MappingFailed - The device file is missing or can't be memory-mapped. The platform is probably unsupported.
///
/// RegisterAccess is returned by register implementations that can fail after initialization.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("unrecognized hardware revision, this library only runs on a Raspberry Pi")]
    RevisionUnknown,
    #[error("failed to read hardware revision from {path}")]
    IdentifierUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("no permission to open {path}")]
    PermissionDenied {
        path: String,
        #[source]
        source: nix::Error,
    },
    #[error("failed to map GPIO registers from {path}")]
    MappingFailed {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to access GPIO registers")]
    RegisterAccess(#[source] io::Error),
}

/// Enum representing possible failures when configuring or using a single pin.
///
/// - InvalidDirection / InvalidPullMode - A raw numeric code doesn't name a direction or pull resistor mode.
/// - NotConfiguredAsOutput - Client tries to drive a pin this process hasn't claimed as an output.
/// - NotConfigured - Client tries to read a pin this process hasn't configured at all.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PinError {
    #[error("invalid direction code: {0}")]
    InvalidDirection(u8),
    #[error("invalid pull resistor code: {0}")]
    InvalidPullMode(u8),
    #[error("native pin {0} has not been set up as an output")]
    NotConfiguredAsOutput(u8),
    #[error("native pin {0} has not been set up")]
    NotConfigured(u8),
}
