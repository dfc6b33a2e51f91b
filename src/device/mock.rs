//! In-memory register bank for testing without hardware.
use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use super::error::DeviceError;
use super::{Direction, Function, PullMode, Registers, Value};
use crate::registry::NUM_PINS;
use crate::{GpioError, GpioResult};

/// Hardware operation recorded by `MockRegisters`, in the order it was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    SetDirection(u8, Direction, PullMode),
    SetPull(u8, PullMode),
    WriteLevel(u8, Value),
}

#[derive(Debug)]
struct MockState {
    functions: [Function; NUM_PINS],
    levels: [Value; NUM_PINS],
    pulls: [PullMode; NUM_PINS],
    ops: Vec<Op>,
    fail_writes: bool,
}

/// Mock register bank.
///
/// Clones share the same state, so a test can keep one handle for inspection while `Gpio` owns the other.
/// Writing a level to a pin is reflected by subsequent reads of that pin, as on real hardware where the output
/// latch can be read back.
#[derive(Debug, Clone)]
pub struct MockRegisters {
    state: Rc<RefCell<MockState>>,
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegisters {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                functions: [Function::Input; NUM_PINS],
                levels: [Value::Low; NUM_PINS],
                pulls: [PullMode::Off; NUM_PINS],
                ops: Vec::new(),
                fail_writes: false,
            })),
        }
    }

    /// Presets the function a pin reports, e.g. to simulate firmware having claimed it.
    pub fn set_function(&self, pin: u8, function: Function) {
        self.state.borrow_mut().functions[pin as usize] = function;
    }

    /// Simulates an external signal on an input pin.
    pub fn set_input_level(&self, pin: u8, value: Value) {
        self.state.borrow_mut().levels[pin as usize] = value;
    }

    /// Makes every subsequent write fail with `DeviceError::RegisterAccess`.
    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    pub fn pull(&self, pin: u8) -> PullMode {
        self.state.borrow().pulls[pin as usize]
    }

    fn record(&self, op: Op) -> GpioResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(GpioError::Device(DeviceError::RegisterAccess(io::Error::new(
                io::ErrorKind::Other,
                "injected register failure",
            ))));
        }

        state.ops.push(op);
        Ok(())
    }
}

impl Registers for MockRegisters {
    fn set_direction(&mut self, pin: u8, direction: Direction, pull: PullMode) -> GpioResult<()> {
        self.record(Op::SetDirection(pin, direction, pull))?;

        let mut state = self.state.borrow_mut();
        state.pulls[pin as usize] = pull;
        state.functions[pin as usize] = match direction {
            Direction::Input => Function::Input,
            Direction::Output => Function::Output,
        };
        Ok(())
    }

    fn set_pull(&mut self, pin: u8, pull: PullMode) -> GpioResult<()> {
        self.record(Op::SetPull(pin, pull))?;
        self.state.borrow_mut().pulls[pin as usize] = pull;
        Ok(())
    }

    fn write_level(&mut self, pin: u8, value: Value) -> GpioResult<()> {
        self.record(Op::WriteLevel(pin, value))?;
        self.state.borrow_mut().levels[pin as usize] = value;
        Ok(())
    }

    fn read_level(&self, pin: u8) -> GpioResult<Value> {
        Ok(self.state.borrow().levels[pin as usize])
    }

    fn function(&self, pin: u8) -> GpioResult<Function> {
        Ok(self.state.borrow().functions[pin as usize])
    }
}
