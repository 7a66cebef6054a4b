#![no_std]
// Must be first to share macros across crate
pub(crate) mod fmt;

mod chip;
pub mod cmd;

pub use chip::{EccMode, NandChip, Partition};

/// Value passed to [RawNand::cmd_ctrl] when only the control lines change
/// and there is no byte to latch.
pub const CMD_NONE: i32 = -1;

/// Selector passed to [RawNand::select_chip] to deselect every chip.
pub const CHIP_DESELECT: i32 = -1;

bitflags::bitflags! {
    /// Control line state passed alongside a command or address byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CtrlFlags: u32 {
        /// Chip enable asserted
        const NCE = 0x01;
        /// Command latch enable: the byte is a command
        const CLE = 0x02;
        /// Address latch enable: the byte is an address cycle
        const ALE = 0x04;
        /// The control lines changed since the previous call
        const CTRL_CHANGE = 0x80;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CtrlFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CtrlFlags({=u32:#04x})", self.bits());
    }
}

/// Primitive operations a raw NAND controller provides to the generic flash layer.
///
/// This is the operation table the flash layer drives to identify the device,
/// move pages and poll for completion. Implementations talk to the hardware directly
/// and cannot fail; bus faults surface later as ECC errors in the flash layer.
///
/// The flash layer serialises all calls. Nothing here waits: [RawNand::dev_ready]
/// is a single poll and any retry or timeout policy belongs to the caller.
pub trait RawNand {
    /// The flash layer context populated by the controller
    fn chip(&self) -> &NandChip;

    /// Assert chip enable for `chip`, or deassert it when `chip` is [CHIP_DESELECT].
    fn select_chip(&mut self, chip: i32);

    /// Latch `cmd` as a command when `ctrl` contains [CtrlFlags::CLE], otherwise
    /// as an address cycle. [CMD_NONE] latches nothing.
    fn cmd_ctrl(&mut self, cmd: i32, ctrl: CtrlFlags);

    /// Fill `buf` from the data register, in ascending order.
    fn read_buf(&mut self, buf: &mut [u8]);

    /// Send `buf` to the data register, in ascending order.
    fn write_buf(&mut self, buf: &[u8]);

    /// Check the ready/busy line. `true` once the device is ready.
    fn dev_ready(&mut self) -> bool;

    /// Read a single byte from the data register
    fn read_byte(&mut self) -> u8 {
        let mut byte = [0u8; 1];
        self.read_buf(&mut byte);
        byte[0]
    }

    /// Write a single byte to the data register
    fn write_byte(&mut self, byte: u8) {
        self.write_buf(&[byte]);
    }
}

pub trait NandFlashError: core::fmt::Debug {
    /// Convert a specific flash layer error into a generic error kind
    fn kind(&self) -> NandFlashErrorKind;
}

/// Flash layer error kinds.
///
/// Flash layer implementations must map their error to those generic error kinds through the
/// [`NandFlashError`] trait.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum NandFlashErrorKind {
    /// No device answered the identification sequence.
    NoDevice,

    /// A device answered but is not supported by the flash layer.
    Unsupported,

    /// The device never reported ready within the flash layer's budget.
    Timeout,

    /// A partition lies outside the device.
    OutOfBounds,

    /// Error specific to the implementation.
    Other,
}

/// The generic flash layer that sits on top of a [RawNand] controller.
///
/// The controller driver hands itself to [FlashLayer::scan] once the hardware is
/// ready, registers its partitions, and calls [FlashLayer::release] before it
/// unmaps its registers.
pub trait FlashLayer {
    /// Errors returned by this flash layer.
    type Error: NandFlashError;

    /// Identify up to `max_chips` devices through the operation table.
    fn scan<C: RawNand>(&mut self, chip: &mut C, max_chips: usize) -> Result<(), Self::Error>;

    /// Register the partitions found on the scanned device.
    fn add_partitions(&mut self, partitions: &'static [Partition]) -> Result<(), Self::Error>;

    /// Drop every reference to the controller. After this returns the flash layer
    /// must not call into `chip` again.
    fn release<C: RawNand>(&mut self, chip: &mut C);
}
