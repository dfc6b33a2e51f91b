//! The GPIO context: pin configuration, access and teardown.
//!
//! `Gpio` owns everything that describes the controller for this process: the register bank, the pin map of the
//! detected board revision, the numbering mode, the record of configured pins and the warnings flag.
//! Every operation translates its channel first and checks the record before touching the hardware.
use log::{debug, error, info, warn};
use std::fmt;

use crate::channel::{ChannelTranslator, NumberingMode};
use crate::config::Config;
use crate::device::error::{DeviceError, PinError};
use crate::device::{Direction, Function, InputPin, MappedRegisters, OutputPin, PullMode, Registers, Value};
use crate::pin_map::{self, HardwareRevision, HeaderPosition};
use crate::registry::{PinState, PinStateRegistry};
use crate::revision::host_revision;
use crate::GpioResult;

/// Reason to suspect that a pin is already claimed by someone else.
///
/// Advisories are logged and handed back by `configure`, never returned as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// The pin is routed to a peripheral (UART, SPI, PWM...) rather than GPIO.
    AlternateFunction(Function),
    /// The pin is driven as an output, but not by this process.
    UntrackedOutput,
}

impl Advisory {
    pub fn detect(function: Function, state: PinState) -> Option<Self> {
        if function.is_alternate() {
            Some(Advisory::AlternateFunction(function))
        } else if function == Function::Output && state == PinState::Unconfigured {
            Some(Advisory::UntrackedOutput)
        } else {
            None
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::AlternateFunction(function) => {
                write!(f, "pin is assigned to alternate function {}", function)
            }
            Advisory::UntrackedOutput => write!(f, "pin is already an output set up outside this program"),
        }
    }
}

/// GPIO controller context.
///
/// Construct it with `Gpio::new` on a board, or with `Gpio::initialize` to pick the register implementation.
/// Set a numbering mode with `set_numbering_mode` before using any channel-based method.
///
/// **Not thread-safe.** Wrap the context in a `Mutex` if several threads need it; two unsynchronized
/// configure/write sequences on the same pin have no defined outcome.
pub struct Gpio<R: Registers> {
    registers: R,
    translator: ChannelTranslator,
    registry: PinStateRegistry,
    warnings: bool,
    cleanup_on_drop: bool,
}

impl Gpio<MappedRegisters> {
    /// Detects the board revision and maps the GPIO registers with default options.
    pub fn new() -> GpioResult<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> GpioResult<Self> {
        Self::initialize(host_revision()?, &config, MappedRegisters::map)
    }
}

impl<R: Registers> Gpio<R> {
    /// Selects the pin map for `revision`, maps the registers and starts with every pin unconfigured.
    ///
    /// An unknown revision fails with `DeviceError::RevisionUnknown` before `map_registers` is called.
    pub fn initialize<F>(revision: HardwareRevision, config: &Config, map_registers: F) -> GpioResult<Self>
    where
        F: FnOnce(&Config) -> GpioResult<R>,
    {
        let map = pin_map::for_revision(revision).ok_or(DeviceError::RevisionUnknown)?;
        let registers = map_registers(config)?;

        info!("GPIO initialized for {:?}", revision);

        Ok(Self {
            registers,
            translator: ChannelTranslator::new(map),
            registry: PinStateRegistry::new(),
            warnings: config.warnings,
            cleanup_on_drop: config.cleanup_on_drop,
        })
    }

    pub fn revision(&self) -> HardwareRevision {
        self.translator.map().revision()
    }

    /// Sets how channel numbers are interpreted. Setting it again replaces the previous mode.
    ///
    /// `NumberingMode::Unset` turns translation off again: every channel-based method then fails with
    /// `ChannelError::ModeNotSet` until another mode is set. Recorded pin states are kept.
    pub fn set_numbering_mode(&mut self, mode: NumberingMode) {
        self.translator.set_mode(mode);
    }

    pub fn numbering_mode(&self) -> NumberingMode {
        self.translator.mode()
    }

    pub fn set_warnings(&mut self, enabled: bool) {
        self.warnings = enabled;
    }

    pub fn warnings(&self) -> bool {
        self.warnings
    }

    pub fn channel_to_native(&self, channel: i32) -> GpioResult<u8> {
        Ok(self.translator.translate_raw(channel)?)
    }

    /// Header and position a native pin is wired to.
    pub fn native_to_channel(&self, native: u8) -> GpioResult<HeaderPosition> {
        Ok(self.translator.native_to_header(native)?)
    }

    /// Configured state of a channel, as recorded by this context.
    pub fn pin_state(&self, channel: i32) -> GpioResult<PinState> {
        let pin = self.channel_to_native(channel)?;
        Ok(self.registry.get(pin))
    }

    /// Configures a channel as input or output.
    ///
    /// Pull resistors are always disabled on outputs. With an `initial` level, an output is driven to that level
    /// before its direction changes so the pin never glitches through the wrong level.
    /// Logs a warning when the pin looks claimed by a peripheral or another program, unless warnings are disabled.
    /// The logged advisory is also returned; configuration goes ahead either way.
    pub fn configure(
        &mut self,
        channel: i32,
        direction: Direction,
        pull: PullMode,
        initial: Option<Value>,
    ) -> GpioResult<Option<Advisory>> {
        let pin = self.channel_to_native(channel)?;
        self.configure_native(pin, direction, pull, initial)
    }

    /// `configure` taking raw numeric codes for direction, pull resistor and initial level.
    ///
    /// Pull codes are not checked for outputs, which always get `PullMode::Off`.
    /// An initial level code other than 0 or 1 is ignored.
    pub fn configure_codes(
        &mut self,
        channel: i32,
        direction: u8,
        pull: u8,
        initial: Option<u8>,
    ) -> GpioResult<Option<Advisory>> {
        let pin = self.channel_to_native(channel)?;
        let direction = Direction::try_from(direction).map_err(PinError::InvalidDirection)?;
        let pull = match direction {
            Direction::Output => PullMode::Off,
            Direction::Input => PullMode::try_from(pull).map_err(PinError::InvalidPullMode)?,
        };
        let initial = initial.and_then(|code| Value::try_from(code).ok());

        self.configure_native(pin, direction, pull, initial)
    }

    pub(crate) fn configure_native(
        &mut self,
        pin: u8,
        direction: Direction,
        pull: PullMode,
        initial: Option<Value>,
    ) -> GpioResult<Option<Advisory>> {
        let pull = match direction {
            Direction::Output => PullMode::Off,
            Direction::Input => pull,
        };

        let advisory = if self.warnings {
            let function = self.registers.function(pin)?;
            Advisory::detect(function, self.registry.get(pin))
        } else {
            None
        };
        if let Some(advisory) = advisory {
            warn!(
                "native pin {}: {}, continuing anyway. Use set_warnings(false) to disable warnings.",
                pin, advisory
            );
        }

        if let (Direction::Output, Some(level)) = (direction, initial) {
            self.registers.write_level(pin, level)?;
        }
        self.registers.set_direction(pin, direction, pull)?;

        self.registry.set(pin, PinState::from(direction));
        debug!("native pin {} configured as {:?} (pull {:?})", pin, direction, pull);

        Ok(advisory)
    }

    /// Drives a channel previously configured as an output.
    pub fn write(&mut self, channel: i32, value: Value) -> GpioResult<()> {
        let pin = self.channel_to_native(channel)?;
        self.write_native(pin, value)
    }

    pub(crate) fn write_native(&mut self, pin: u8, value: Value) -> GpioResult<()> {
        if self.registry.get(pin) != PinState::Output {
            return Err(PinError::NotConfiguredAsOutput(pin).into());
        }

        self.registers.write_level(pin, value)
    }

    /// Reads the level of a configured channel. Outputs read back the level they are driven to.
    pub fn read(&self, channel: i32) -> GpioResult<Value> {
        let pin = self.channel_to_native(channel)?;
        self.read_native(pin)
    }

    pub(crate) fn read_native(&self, pin: u8) -> GpioResult<Value> {
        if self.registry.get(pin) == PinState::Unconfigured {
            return Err(PinError::NotConfigured(pin).into());
        }

        self.registers.read_level(pin)
    }

    /// Sets the pull resistor of a channel **without checking whether this context configured it**.
    ///
    /// This is an escape hatch: it can bias a pin that belongs to a peripheral or another program.
    /// Prefer passing the pull mode to `configure`.
    pub fn set_pull(&mut self, channel: i32, pull: PullMode) -> GpioResult<()> {
        let pin = self.channel_to_native(channel)?;
        self.registers.set_pull(pin, pull)
    }

    /// `set_pull` taking a raw pull resistor code.
    pub fn set_pull_code(&mut self, channel: i32, pull: u8) -> GpioResult<()> {
        let pin = self.channel_to_native(channel)?;
        let pull = PullMode::try_from(pull).map_err(PinError::InvalidPullMode)?;
        self.registers.set_pull(pin, pull)
    }

    /// Hardware function currently selected for a channel, whether or not this context configured it.
    pub fn function(&self, channel: i32) -> GpioResult<Function> {
        let pin = self.channel_to_native(channel)?;
        self.registers.function(pin)
    }

    /// Returns a single channel to a floating input and forgets it. Does nothing for unconfigured channels.
    pub fn release(&mut self, channel: i32) -> GpioResult<()> {
        let pin = self.channel_to_native(channel)?;
        self.release_native(pin)
    }

    fn release_native(&mut self, pin: u8) -> GpioResult<()> {
        if self.registry.get(pin) == PinState::Unconfigured {
            return Ok(());
        }

        self.registers.set_direction(pin, Direction::Input, PullMode::Off)?;
        self.registry.set(pin, PinState::Unconfigured);
        Ok(())
    }

    /// Reverts every pin configured by this context to a floating input.
    ///
    /// Calling it when nothing is configured does nothing. If a register write fails, the pins reverted so far stay
    /// unconfigured and the rest stay recorded, so `cleanup` can be called again.
    pub fn cleanup(&mut self) -> GpioResult<()> {
        let configured: Vec<u8> = self.registry.configured().map(|(pin, _)| pin).collect();
        if configured.is_empty() {
            return Ok(());
        }

        for &pin in &configured {
            self.release_native(pin)?;
        }
        self.registry.reset_all();

        info!("released {} GPIO pin(s)", configured.len());
        Ok(())
    }

    /// Configures a channel as input and returns an `embedded_hal` input pin for it.
    pub fn input_pin(&mut self, channel: i32, pull: PullMode) -> GpioResult<InputPin<'_, R>> {
        let pin = self.channel_to_native(channel)?;
        self.configure_native(pin, Direction::Input, pull, None)?;
        Ok(InputPin::new(self, pin))
    }

    /// Configures a channel as output, driven to `initial`, and returns an `embedded_hal` output pin for it.
    pub fn output_pin(&mut self, channel: i32, initial: Value) -> GpioResult<OutputPin<'_, R>> {
        let pin = self.channel_to_native(channel)?;
        self.configure_native(pin, Direction::Output, PullMode::Off, Some(initial))?;
        Ok(OutputPin::new(self, pin))
    }
}

impl<R: Registers> Drop for Gpio<R> {
    fn drop(&mut self) {
        if !self.cleanup_on_drop {
            return;
        }

        if let Err(err) = self.cleanup() {
            error!("failed to release GPIO pins: {}", err);
        }
    }
}

impl<R: Registers> fmt::Debug for Gpio<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gpio")
            .field("revision", &self.revision())
            .field("mode", &self.numbering_mode())
            .field("warnings", &self.warnings)
            .field("configured", &self.registry.configured().count())
            .finish()
    }
}
