use byteorder::{ByteOrder, NativeEndian};
use log::info;
use memmap::{MmapMut, MmapOptions};
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use std::fs::File;
use std::io;
use std::mem::size_of;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

use super::error::DeviceError;
use super::{Direction, Function, PullMode, Registers, Value};
use crate::config::{Config, DeviceAccess};
use crate::{GpioError, GpioResult};

/// Memory-mapped GPIO register block of the BCM2835 controller.
///
/// This struct owns the memory mapping needed to access GPIO-related registers. It also owns the file handle for the device file
/// provided by your operating system.
#[derive(Debug)]
pub struct MappedRegisters {
    _file_handle: File,
    map: MmapMut,
}

impl MappedRegisters {
    const GPIO_OFFSET: u64 = 0x20_0000;
    const BLOCK_SIZE: usize = 4096;
    const GPIOMEM: &'static str = "/dev/gpiomem";

    /* Register positions, in 32-bit words from the start of the GPIO block.
     * Function select packs 10 pins per register (3 bits each), every other register packs 32 pins.
     */
    const GPFSEL0: usize = 0x00;
    const GPSET0: usize = 0x07;
    const GPCLR0: usize = 0x0A;
    const GPLEV0: usize = 0x0D;
    const GPPUD: usize = 0x25;
    const GPPUDCLK0: usize = 0x26;

    // The pull resistor control signal needs 150 core cycles to settle.
    const PULL_SETTLE: Duration = Duration::from_micros(5);

    /// Opens and memory-maps the device file selected by `config`.
    ///
    /// This constructor fails with `DeviceError::PermissionDenied` when the device file can't be opened by this user, and with
    /// `DeviceError::MappingFailed` when it doesn't exist or can't be mapped.
    pub fn map(config: &Config) -> GpioResult<Self> {
        use nix::unistd::Uid;

        let gpiomem_available = Path::new(Self::GPIOMEM).exists();
        let (path, offset) = Self::device_location(config, Uid::current().is_root(), gpiomem_available);

        let (file_handle, map) = Self::load_device_file(&path, offset)?;
        info!("mapped GPIO registers from {}", path.display());

        Ok(Self {
            _file_handle: file_handle,
            map,
        })
    }

    /// Device file and mapping offset for `config`.
    ///
    /// `Auto` takes `/dev/gpiomem` whenever it exists, on every board and as any user.
    /// Only root on a system without it falls back to `/dev/mem` at `peripheral_base`.
    fn device_location(config: &Config, is_root: bool, gpiomem_available: bool) -> (PathBuf, u64) {
        match &config.device {
            DeviceAccess::Auto if !gpiomem_available && is_root => Self::mem(config),
            DeviceAccess::Mem => Self::mem(config),
            DeviceAccess::Auto | DeviceAccess::GpioMem => (PathBuf::from(Self::GPIOMEM), 0),
            DeviceAccess::Custom(path) => (path.clone(), 0),
        }
    }

    fn mem(config: &Config) -> (PathBuf, u64) {
        (
            PathBuf::from("/dev/mem"),
            config.peripheral_base + Self::GPIO_OFFSET,
        )
    }

    fn load_device_file(device_path: &Path, offset: u64) -> GpioResult<(File, MmapMut)> {
        use std::os::unix::io::FromRawFd;

        let path = device_path.display().to_string();

        let mut open_flags = OFlag::empty();
        open_flags.insert(OFlag::O_RDWR);
        open_flags.insert(OFlag::O_SYNC);
        open_flags.insert(OFlag::O_CLOEXEC);

        let file_fd = open(device_path, open_flags, Mode::empty()).map_err(|err| {
            match err.as_errno() {
                Some(Errno::EACCES) | Some(Errno::EPERM) => DeviceError::PermissionDenied {
                    path: path.clone(),
                    source: err,
                },
                _ => DeviceError::MappingFailed {
                    path: path.clone(),
                    source: io::Error::new(io::ErrorKind::Other, err),
                },
            }
        })?;

        // SAFETY: Validity of file_fd is checked by Nix.
        let handle = unsafe { File::from_raw_fd(file_fd) };

        let mut map_opts = MmapOptions::new();
        map_opts.offset(offset);
        map_opts.len(Self::BLOCK_SIZE);

        // SAFETY: File handle is valid at this point.
        let map = unsafe {
            map_opts
                .map_mut(&handle)
                .map_err(|source| DeviceError::MappingFailed { path, source })?
        };

        Ok((handle, map))
    }

    fn read(&self, word: usize) -> u32 {
        NativeEndian::read_u32(&self.map[word * size_of::<u32>()..])
    }

    fn write(&mut self, word: usize, value: u32) {
        NativeEndian::write_u32(&mut self.map[word * size_of::<u32>()..], value);
    }

    fn bank(pin: u8) -> (usize, u32) {
        ((pin / 32) as usize, 1 << (pin % 32))
    }

    fn fsel(pin: u8) -> (usize, u32) {
        (Self::GPFSEL0 + (pin / 10) as usize, (pin % 10) as u32 * 3)
    }
}

impl Registers for MappedRegisters {
    fn set_direction(&mut self, pin: u8, direction: Direction, pull: PullMode) -> GpioResult<()> {
        self.set_pull(pin, pull)?;

        let (word, shift) = Self::fsel(pin);
        let cleared = self.read(word) & !(0b111 << shift);
        let selected = match direction {
            Direction::Input => cleared,
            Direction::Output => cleared | (Function::Output as u32) << shift,
        };
        self.write(word, selected);

        Ok(())
    }

    fn set_pull(&mut self, pin: u8, pull: PullMode) -> GpioResult<()> {
        let (bank, mask) = Self::bank(pin);

        self.write(Self::GPPUD, pull as u32);
        sleep(Self::PULL_SETTLE);
        self.write(Self::GPPUDCLK0 + bank, mask);
        sleep(Self::PULL_SETTLE);
        self.write(Self::GPPUD, 0);
        self.write(Self::GPPUDCLK0 + bank, 0);

        Ok(())
    }

    fn write_level(&mut self, pin: u8, value: Value) -> GpioResult<()> {
        let (bank, mask) = Self::bank(pin);
        match value {
            Value::High => self.write(Self::GPSET0 + bank, mask),
            Value::Low => self.write(Self::GPCLR0 + bank, mask),
        }

        Ok(())
    }

    fn read_level(&self, pin: u8) -> GpioResult<Value> {
        let (bank, mask) = Self::bank(pin);
        Ok(Value::from(self.read(Self::GPLEV0 + bank) & mask != 0))
    }

    fn function(&self, pin: u8) -> GpioResult<Function> {
        let (word, shift) = Self::fsel(pin);
        let code = ((self.read(word) >> shift) & 0b111) as u8;

        Function::try_from(code).map_err(|code| {
            GpioError::Device(DeviceError::RegisterAccess(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected function select code {:#05b}", code),
            )))
        })
    }
}
