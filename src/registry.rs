use crate::device::Direction;

/// Number of native pins the controller addresses.
pub const NUM_PINS: usize = 54;

/// Direction a native pin has been configured with by this process.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PinState {
    Unconfigured,
    Input,
    Output,
}

impl Default for PinState {
    fn default() -> Self {
        PinState::Unconfigured
    }
}

impl From<Direction> for PinState {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Input => PinState::Input,
            Direction::Output => PinState::Output,
        }
    }
}

/// Record of every native pin's configured direction.
///
/// Plain storage: deciding whether a transition is allowed belongs to `Gpio`.
/// Pins outside the controller's range read as `Unconfigured` and can't be set.
#[derive(Clone, Debug)]
pub struct PinStateRegistry {
    states: [PinState; NUM_PINS],
}

impl Default for PinStateRegistry {
    fn default() -> Self {
        Self {
            states: [PinState::Unconfigured; NUM_PINS],
        }
    }
}

impl PinStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pin: u8) -> PinState {
        self.states
            .get(pin as usize)
            .copied()
            .unwrap_or(PinState::Unconfigured)
    }

    pub fn set(&mut self, pin: u8, state: PinState) {
        if let Some(slot) = self.states.get_mut(pin as usize) {
            *slot = state;
        }
    }

    pub fn reset_all(&mut self) {
        self.states = [PinState::Unconfigured; NUM_PINS];
    }

    /// Native pins currently configured as input or output, in ascending order.
    pub fn configured(&self) -> impl Iterator<Item = (u8, PinState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| **state != PinState::Unconfigured)
            .map(|(pin, state)| (pin as u8, *state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unconfigured() {
        let registry = PinStateRegistry::new();
        assert!((0..NUM_PINS as u8).all(|pin| registry.get(pin) == PinState::Unconfigured));
        assert_eq!(registry.configured().count(), 0);
    }

    #[test]
    fn tracks_configured_pins() {
        let mut registry = PinStateRegistry::new();
        registry.set(17, PinState::Output);
        registry.set(4, PinState::Input);

        assert_eq!(registry.get(17), PinState::Output);
        assert_eq!(
            registry.configured().collect::<Vec<_>>(),
            vec![(4, PinState::Input), (17, PinState::Output)]
        );

        registry.reset_all();
        assert_eq!(registry.configured().count(), 0);
    }

    #[test]
    fn ignores_pins_beyond_the_controller() {
        let mut registry = PinStateRegistry::new();
        registry.set(200, PinState::Output);
        assert_eq!(registry.get(200), PinState::Unconfigured);
    }
}
