//! This example demonstrates the usage of embedded_hal trait usage.
//!
//! The main benefit over the blinking_led example is that `blink_led`
//! can be used for _any_ device with embedded-hal digital pins abstraction.
//!
//! This example assumes that GPIO 17 (physical pin #11) is connected to diode's anode (+).
//! Make sure to put resistor to reduce current flowing through the diode.

use embedded_hal::digital::v2::*;
use rpi_mmap_gpio::{Gpio, NumberingMode, Value};
use std::error::Error;
use std::thread::sleep;
use std::time::Duration;

fn blink_led<T: OutputPin<Error = impl Error + 'static>>(mut pin: T, times: usize) -> Result<(), Box<dyn Error>> {
    let blink_interval = Duration::from_millis(500);

    for _ in 0..times {
        pin.set_high()?;
        sleep(blink_interval);
        pin.set_low()?;
        sleep(blink_interval);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut gpio = Gpio::new()?;
    gpio.set_numbering_mode(NumberingMode::NativeController);
    let led_pin = gpio.output_pin(17, Value::Low)?;

    blink_led(led_pin, 10)?;
    // Pins are returned to inputs when `gpio` is dropped.
    Ok(())
}
