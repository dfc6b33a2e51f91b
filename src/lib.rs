//! This crate exposes the GPIO interface of the original 26-pin [Raspberry Pi](https://www.raspberrypi.com/) boards for programmatic use in Rust.
//!
//! Pins are addressed by *channel*, either as a position on the P1 header (`NumberingMode::PhysicalHeader`) or as the
//! BCM2835 controller's own pin number (`NumberingMode::NativeController`). The board revision is detected once from
//! `/proc/cpuinfo`, since revision A and revision B boards route a few header positions to different controller pins.
//!
//! A pin has to be configured before this crate will touch it: `write` only drives pins configured as outputs, and `read`
//! only reads pins configured in either direction. `cleanup` returns every configured pin to a floating input, and runs
//! automatically when the `Gpio` context is dropped unless `Config::cleanup_on_drop` is turned off.
//!
//! ```no_run
//! use rpi_mmap_gpio::{Direction, Gpio, NumberingMode, PullMode, Value};
//!
//! fn main() -> Result<(), rpi_mmap_gpio::GpioError> {
//!     let mut gpio = Gpio::new()?;
//!     gpio.set_numbering_mode(NumberingMode::PhysicalHeader);
//!
//!     gpio.configure(11, Direction::Output, PullMode::Off, Some(Value::Low))?;
//!     gpio.write(11, Value::High)?;
//!     gpio.cleanup()
//! }
//! ```
//!
//! Configured pins can also be handed out as `InputPin`/`OutputPin`, which implement the relevant
//! [`embedded_hal`](https://crates.io/crates/embedded-hal) digital traits so this crate can be used with driver
//! implementations using `embedded_hal` generic traits.
//!
//! The register access is behind the `Registers` trait. Enable the `mock` feature to get `device::mock::MockRegisters`,
//! an in-memory register bank for testing code that uses this crate without a board.

use thiserror::Error;

mod channel;
mod config;
pub mod device;
mod gpio;
mod pin_map;
mod registry;
mod revision;

pub use channel::{Channel, ChannelError, ChannelTranslator, NumberingMode};
pub use config::{Config, DeviceAccess};
pub use device::error::{DeviceError, PinError};
pub use device::{Direction, Function, InputPin, MappedRegisters, OutputPin, PullMode, Registers, Value};
pub use gpio::{Advisory, Gpio};
pub use pin_map::{HardwareRevision, HeaderGroup, HeaderPosition, PinMap, RevisionA, RevisionB};
pub use registry::{PinState, PinStateRegistry, NUM_PINS};
pub use revision::{classify, host_revision, CpuInfo, RevisionResolver, StaticIdentifier, SystemIdentifier};

/// Main error type for this crate.
///
/// For more details, see `ChannelError`, `PinError` and `DeviceError` enums documentation.
#[derive(Error, Debug)]
pub enum GpioError {
    #[error("error while translating a channel")]
    Channel(#[from] ChannelError),
    #[error("error while operating on a pin")]
    Pin(#[from] PinError),
    #[error("error while operating on a device")]
    Device(#[from] DeviceError),
}

pub type GpioResult<T> = Result<T, GpioError>;
