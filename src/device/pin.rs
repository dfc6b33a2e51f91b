use embedded_hal::digital::v2 as eh;

use super::{Direction, PullMode, Registers, Value};
use crate::{Gpio, GpioError, GpioResult};

/// Abstraction over a GPIO pin configured for reading.
///
/// This is obtainable by using `input_pin` method of `Gpio` struct. It borrows the context mutably, so the pin's
/// configuration can't change behind its back while it is alive. Dropping the handle keeps the pin configured.
#[derive(Debug)]
pub struct InputPin<'gpio, R: Registers> {
    gpio: &'gpio mut Gpio<R>,
    pin: u8,
}

/// Abstraction over a GPIO pin configured for writing.
///
/// This is obtainable by using `output_pin` method of `Gpio` struct. It borrows the context mutably, so the pin's
/// configuration can't change behind its back while it is alive. Dropping the handle keeps the pin configured.
#[derive(Debug)]
pub struct OutputPin<'gpio, R: Registers> {
    gpio: &'gpio mut Gpio<R>,
    pin: u8,
}

impl<'gpio, R: Registers> InputPin<'gpio, R> {
    pub(crate) fn new(gpio: &'gpio mut Gpio<R>, pin: u8) -> Self {
        Self { gpio, pin }
    }

    /// Native pin number.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn get_value(&self) -> GpioResult<Value> {
        self.gpio.read_native(self.pin)
    }

    pub fn into_output(self, initial: Value) -> GpioResult<OutputPin<'gpio, R>> {
        self.gpio
            .configure_native(self.pin, Direction::Output, PullMode::Off, Some(initial))?;
        Ok(OutputPin::new(self.gpio, self.pin))
    }
}

impl<'gpio, R: Registers> OutputPin<'gpio, R> {
    pub(crate) fn new(gpio: &'gpio mut Gpio<R>, pin: u8) -> Self {
        Self { gpio, pin }
    }

    /// Native pin number.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn set_value(&mut self, value: Value) -> GpioResult<()> {
        self.gpio.write_native(self.pin, value)
    }

    /// Level the pin is currently driven to.
    pub fn get_value(&self) -> GpioResult<Value> {
        self.gpio.read_native(self.pin)
    }

    pub fn into_input(self, pull: PullMode) -> GpioResult<InputPin<'gpio, R>> {
        self.gpio
            .configure_native(self.pin, Direction::Input, pull, None)?;
        Ok(InputPin::new(self.gpio, self.pin))
    }
}

impl<'gpio, R: Registers> eh::InputPin for InputPin<'gpio, R> {
    type Error = GpioError;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.get_value()? == Value::High)
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|v| !v)
    }
}

impl<'gpio, R: Registers> eh::OutputPin for OutputPin<'gpio, R> {
    type Error = GpioError;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_value(Value::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_value(Value::High)
    }
}

impl<'gpio, R: Registers> eh::StatefulOutputPin for OutputPin<'gpio, R> {
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.get_value()? == Value::High)
    }

    fn is_set_low(&self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|v| !v)
    }
}

impl<'gpio, R: Registers> eh::toggleable::Default for OutputPin<'gpio, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{MockRegisters, Op};
    use crate::{Config, HardwareRevision, NumberingMode, PinState};
    use embedded_hal::digital::v2::{InputPin as _, OutputPin as _, StatefulOutputPin as _, ToggleableOutputPin as _};

    fn board() -> (Gpio<MockRegisters>, MockRegisters) {
        let registers = MockRegisters::new();
        let inspector = registers.clone();
        let mut gpio =
            Gpio::initialize(HardwareRevision::RevisionB, &Config::default(), |_| Ok(registers)).unwrap();
        gpio.set_numbering_mode(NumberingMode::PhysicalHeader);
        (gpio, inspector)
    }

    #[test]
    fn output_pin_drives_and_toggles() {
        let (mut gpio, registers) = board();
        {
            let mut led = gpio.output_pin(11, Value::Low).unwrap();
            led.set_high().unwrap();
            assert!(led.is_set_high().unwrap());
            led.toggle().unwrap();
            assert!(led.is_set_low().unwrap());
        }

        assert_eq!(
            registers.ops(),
            vec![
                Op::WriteLevel(17, Value::Low),
                Op::SetDirection(17, Direction::Output, PullMode::Off),
                Op::WriteLevel(17, Value::High),
                Op::WriteLevel(17, Value::Low)
            ]
        );
        assert_eq!(gpio.pin_state(11).unwrap(), PinState::Output);
    }

    #[test]
    fn input_pin_reads_levels() {
        let (mut gpio, registers) = board();
        registers.set_input_level(22, Value::High);

        let button = gpio.input_pin(15, PullMode::PullUp).unwrap();
        assert!(button.is_high().unwrap());
        assert!(!button.is_low().unwrap());
        assert_eq!(registers.pull(22), PullMode::PullUp);
    }

    #[test]
    fn pins_convert_between_directions() {
        let (mut gpio, _registers) = board();

        let input = gpio.input_pin(12, PullMode::Off).unwrap();
        let mut output = input.into_output(Value::High).unwrap();
        assert_eq!(output.get_value().unwrap(), Value::High);
        output.set_low().unwrap();

        let input = output.into_input(PullMode::PullDown).unwrap();
        assert_eq!(input.pin(), 18);
        assert_eq!(gpio.pin_state(12).unwrap(), PinState::Input);
    }
}
