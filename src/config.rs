use std::path::PathBuf;

/// Which device file exposes the GPIO registers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeviceAccess {
    /// `/dev/gpiomem` whenever it exists, for root too. Root falls back to `/dev/mem` when it doesn't.
    Auto,
    /// `/dev/mem`, mapped at the controller's physical address. Requires root.
    Mem,
    /// `/dev/gpiomem`, which exposes only the GPIO block at offset 0.
    GpioMem,
    /// Any other file laid out like `/dev/gpiomem`.
    Custom(PathBuf),
}

/// Options used when initializing a `Gpio` context.
#[derive(Clone, Debug)]
pub struct Config {
    /// Initial state of the "pin already in use" advisories.
    pub warnings: bool,
    /// Run `cleanup` when the context is dropped.
    pub cleanup_on_drop: bool,
    pub device: DeviceAccess,
    /// Physical base address of the peripheral bus. Only used when `/dev/mem` is mapped.
    ///
    /// Defaults to the BCM2835 address of the 26-pin boards. Later SoCs moved the bus (`0x3F00_0000` on BCM2836/2837),
    /// so set it when forcing `DeviceAccess::Mem` on those.
    pub peripheral_base: u64,
}

impl Config {
    pub const BCM2835_PERIPHERAL_BASE: u64 = 0x2000_0000;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warnings: true,
            cleanup_on_drop: true,
            device: DeviceAccess::Auto,
            peripheral_base: Self::BCM2835_PERIPHERAL_BASE,
        }
    }
}
