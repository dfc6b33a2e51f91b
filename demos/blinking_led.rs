//! A very basic example of a program blinking a LED diode using native library API.
//!
//! This example assumes that physical pin #11 (GPIO 17) is connected to diode's anode (+).
//! Make sure to put resistor to reduce current flowing through the diode.

use rpi_mmap_gpio::{Direction, Gpio, NumberingMode, PullMode, Value};
use std::error::Error;
use std::thread::sleep;
use std::time::Duration;

const LED: i32 = 11;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut gpio = Gpio::new()?;
    gpio.set_numbering_mode(NumberingMode::PhysicalHeader);
    gpio.configure(LED, Direction::Output, PullMode::Off, Some(Value::Low))?;

    let blink_interval = Duration::from_millis(500);
    let mut value = Value::Low;

    for _ in 0..20 {
        value = !value;
        gpio.write(LED, value)?;
        sleep(blink_interval);
    }

    gpio.cleanup()?;
    Ok(())
}
