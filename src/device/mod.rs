use derive_try_from_primitive::TryFromPrimitive;
use std::fmt;
use std::ops::Not;

pub mod error;
mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod pin;

use crate::GpioResult;

pub use memory::MappedRegisters;
pub use pin::{InputPin, OutputPin};

/// Enum representing the logic level of a given pin.
///
/// This usually correlates to electric low/high state of voltage for GPIO pins,
/// but keep in mind that this can be changed by pull-up/pull-down resistors.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Value {
    High = 1,
    Low = 0,
}

impl From<bool> for Value {
    fn from(high: bool) -> Self {
        if high {
            Value::High
        } else {
            Value::Low
        }
    }
}

impl Not for Value {
    type Output = Value;

    fn not(self) -> Value {
        match self {
            Value::High => Value::Low,
            Value::Low => Value::High,
        }
    }
}

/// Direction of a pin. The numeric codes are the ones accepted by `Gpio::configure_codes`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Direction {
    Output = 0,
    Input = 1,
}

/// State of the pin's internal pull resistor.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum PullMode {
    Off = 0,
    PullDown = 1,
    PullUp = 2,
}

impl Default for PullMode {
    fn default() -> Self {
        PullMode::Off
    }
}

/// Hardware function currently selected for a pin, encoded as in the function select registers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

impl Function {
    pub fn is_alternate(self) -> bool {
        !matches!(self, Function::Input | Function::Output)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Register-level access to the GPIO controller.
///
/// Implementations are stateless with respect to pin ownership: they touch the registers they are told to touch.
/// All bookkeeping lives in `Gpio`. Every method takes a native pin number.
pub trait Registers {
    /// Sets the pull resistor, then selects the input or output function.
    fn set_direction(&mut self, pin: u8, direction: Direction, pull: PullMode) -> GpioResult<()>;

    fn set_pull(&mut self, pin: u8, pull: PullMode) -> GpioResult<()>;

    fn write_level(&mut self, pin: u8, value: Value) -> GpioResult<()>;

    fn read_level(&self, pin: u8) -> GpioResult<Value>;

    fn function(&self, pin: u8) -> GpioResult<Function>;
}
