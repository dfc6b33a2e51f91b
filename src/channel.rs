//! Translation of caller-supplied channel numbers into native controller pins.
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::pin_map::{HeaderGroup, HeaderPosition, PinMap, MAX_HEADER_NATIVE_PIN};

/// How plain integer channel numbers passed to `Gpio` are interpreted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NumberingMode {
    Unset,
    /// Position on the P1 header (1..=26).
    PhysicalHeader,
    /// Native controller pin number (0..=31).
    NativeController,
}

impl Default for NumberingMode {
    fn default() -> Self {
        NumberingMode::Unset
    }
}

/// A channel tagged with the numbering scheme it is expressed in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    Header(u8),
    Native(u8),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Header(position) => write!(f, "header pin {}", position),
            Channel::Native(pin) => write!(f, "native pin {}", pin),
        }
    }
}

/// Enum representing possible failures when translating a channel into a native pin.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    #[error("pin numbering mode has not been set")]
    ModeNotSet,
    #[error("channel {0} is outside of the valid range")]
    OutOfRange(i32),
    #[error("{0} is not a GPIO pin on this board")]
    NotMapped(Channel),
}

impl Channel {
    const HEADER_RANGE: RangeInclusive<u8> = 1..=26;
    const NATIVE_RANGE: RangeInclusive<u8> = 0..=MAX_HEADER_NATIVE_PIN;

    /// Tags a raw channel number with the given numbering mode.
    pub fn from_raw(mode: NumberingMode, raw: i32) -> Result<Self, ChannelError> {
        if mode == NumberingMode::Unset {
            return Err(ChannelError::ModeNotSet);
        }

        let number = u8::try_from(raw).map_err(|_| ChannelError::OutOfRange(raw))?;
        Ok(match mode {
            NumberingMode::NativeController => Channel::Native(number),
            _ => Channel::Header(number),
        })
    }

    fn number(&self) -> u8 {
        match *self {
            Channel::Header(n) | Channel::Native(n) => n,
        }
    }

    fn in_range(&self) -> bool {
        match self {
            Channel::Header(n) => Self::HEADER_RANGE.contains(n),
            Channel::Native(n) => Self::NATIVE_RANGE.contains(n),
        }
    }
}

/// Converts channels into native pins using the pin map of the detected board revision.
///
/// Every method here is a pure lookup. Nothing is written to the hardware or to the pin registry,
/// so translation is safe to repeat while validating a request.
#[derive(Copy, Clone, Debug)]
pub struct ChannelTranslator {
    map: &'static dyn PinMap,
    mode: NumberingMode,
}

impl ChannelTranslator {
    pub fn new(map: &'static dyn PinMap) -> Self {
        Self {
            map,
            mode: NumberingMode::Unset,
        }
    }

    pub fn map(&self) -> &'static dyn PinMap {
        self.map
    }

    pub fn mode(&self) -> NumberingMode {
        self.mode
    }

    /// `NumberingMode::Unset` makes every raw translation fail with `ChannelError::ModeNotSet` again.
    pub fn set_mode(&mut self, mode: NumberingMode) {
        self.mode = mode;
    }

    /// Translates a raw channel number in the current numbering mode.
    pub fn translate_raw(&self, raw: i32) -> Result<u8, ChannelError> {
        let channel = Channel::from_raw(self.mode, raw)?;
        self.translate(channel)
    }

    /// Translates a tagged channel, independent of the current numbering mode.
    pub fn translate(&self, channel: Channel) -> Result<u8, ChannelError> {
        if !channel.in_range() {
            return Err(ChannelError::OutOfRange(channel.number() as i32));
        }

        match channel {
            Channel::Header(position) => self
                .map
                .header_to_native(HeaderPosition::p1(position))
                .ok_or(ChannelError::NotMapped(channel)),
            // Native pins that aren't routed to a header are off-limits.
            Channel::Native(pin) => self
                .map
                .native_to_header(pin)
                .map(|_| pin)
                .ok_or(ChannelError::NotMapped(channel)),
        }
    }

    pub fn header_to_native(&self, header: HeaderPosition) -> Result<u8, ChannelError> {
        let channel = Channel::Header(header.position);
        match header.group {
            HeaderGroup::P1 if !channel.in_range() => Err(ChannelError::OutOfRange(header.position as i32)),
            _ => self.map.header_to_native(header).ok_or(ChannelError::NotMapped(channel)),
        }
    }

    pub fn native_to_header(&self, native: u8) -> Result<HeaderPosition, ChannelError> {
        let channel = Channel::Native(native);
        if !channel.in_range() {
            return Err(ChannelError::OutOfRange(native as i32));
        }

        self.map
            .native_to_header(native)
            .ok_or(ChannelError::NotMapped(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin_map::{RevisionA, RevisionB};

    fn translator(map: &'static dyn PinMap, mode: NumberingMode) -> ChannelTranslator {
        let mut translator = ChannelTranslator::new(map);
        translator.set_mode(mode);
        translator
    }

    #[test]
    fn fails_until_mode_is_set() {
        let translator = ChannelTranslator::new(&RevisionB);
        assert_eq!(translator.translate_raw(11), Err(ChannelError::ModeNotSet));
    }

    #[test]
    fn header_mode_rejects_channels_outside_1_to_26() {
        let translator = translator(&RevisionB, NumberingMode::PhysicalHeader);
        for raw in [-1, 0, 27, 40, 300] {
            assert_eq!(translator.translate_raw(raw), Err(ChannelError::OutOfRange(raw)));
        }
    }

    #[test]
    fn native_mode_rejects_channels_outside_0_to_31() {
        let translator = translator(&RevisionA, NumberingMode::NativeController);
        for raw in [-5, 32, 53, 1000] {
            assert_eq!(translator.translate_raw(raw), Err(ChannelError::OutOfRange(raw)));
        }
    }

    #[test]
    fn header_mode_translates_through_the_revision_table() {
        let translator = translator(&RevisionB, NumberingMode::PhysicalHeader);
        assert_eq!(translator.translate_raw(11), Ok(17));
        assert_eq!(translator.translate_raw(13), Ok(27));
        assert_eq!(translator.translate_raw(26), Ok(7));
    }

    #[test]
    fn header_mode_rejects_power_pins() {
        let translator = translator(&RevisionB, NumberingMode::PhysicalHeader);
        assert_eq!(
            translator.translate_raw(6),
            Err(ChannelError::NotMapped(Channel::Header(6)))
        );
    }

    #[test]
    fn native_mode_rejects_pins_missing_from_the_header() {
        let rev_a = translator(&RevisionA, NumberingMode::NativeController);
        let rev_b = translator(&RevisionB, NumberingMode::NativeController);

        assert_eq!(rev_a.translate_raw(21), Ok(21));
        assert_eq!(
            rev_b.translate_raw(21),
            Err(ChannelError::NotMapped(Channel::Native(21)))
        );
        assert_eq!(rev_b.translate_raw(28), Ok(28));
        assert_eq!(
            rev_a.translate_raw(28),
            Err(ChannelError::NotMapped(Channel::Native(28)))
        );
    }

    #[test]
    fn tagged_channels_ignore_the_current_mode() {
        let translator = ChannelTranslator::new(&RevisionB);
        assert_eq!(translator.translate(Channel::Header(11)), Ok(17));
        assert_eq!(translator.translate(Channel::Native(17)), Ok(17));
        assert_eq!(
            translator.translate(Channel::Header(0)),
            Err(ChannelError::OutOfRange(0))
        );
    }

    #[test]
    fn header_and_native_lookups_are_inverse() {
        for map in [&RevisionA as &'static dyn PinMap, &RevisionB] {
            let translator = ChannelTranslator::new(map);
            for native in 0..=MAX_HEADER_NATIVE_PIN {
                if let Ok(header) = translator.native_to_header(native) {
                    assert_eq!(translator.header_to_native(header), Ok(native));
                }
            }
            for position in 1..=26 {
                if let Ok(native) = translator.header_to_native(HeaderPosition::p1(position)) {
                    assert_eq!(
                        translator.native_to_header(native),
                        Ok(HeaderPosition::p1(position))
                    );
                }
            }
        }
    }

    #[test]
    fn native_to_header_reports_p5_group() {
        let translator = ChannelTranslator::new(&RevisionB);
        assert_eq!(translator.native_to_header(30), Ok(HeaderPosition::p5(5)));
        assert_eq!(translator.native_to_header(40), Err(ChannelError::OutOfRange(40)));
    }
}
