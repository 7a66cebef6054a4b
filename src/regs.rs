//! S5PV210 NAND flash controller register definitions
//!
//! Offsets are relative to the base of the controller's register window. Only
//! the registers up to and including NFSTAT are modelled; the 8-bit ECC block
//! above them is never touched by this driver.
//!
//! | Register | Offset | Access |
//! |---|---|---|
//! | NFCONF | 0x00 | 32 bit |
//! | NFCONT | 0x04 | 32 bit, read-modify-write |
//! | NFCMMD | 0x08 | 8 bit write |
//! | NFADDR | 0x0C | 8 bit write |
//! | NFDATA | 0x10 | 8 or 32 bit, auto-advancing |
//! | NFSTAT | 0x28 | 8 bit read |

use crate::bus::RegisterBus;

/// Configuration register
pub const NFCONF: usize = 0x00;
/// Control register
pub const NFCONT: usize = 0x04;
/// Command latch register
pub const NFCMMD: usize = 0x08;
/// Address latch register
pub const NFADDR: usize = 0x0C;
/// Data register
pub const NFDATA: usize = 0x10;
/// Main area ECC data registers
pub const NFMECCD0: usize = 0x14;
pub const NFMECCD1: usize = 0x18;
/// Spare area ECC data register
pub const NFSECCD: usize = 0x1C;
/// Block lock start/end address
pub const NFSBLK: usize = 0x20;
pub const NFEBLK: usize = 0x24;
/// Status register
pub const NFSTAT: usize = 0x28;

/// Bytes a register window must span to reach every register above
pub const REGISTER_MAP_SIZE: usize = NFSTAT + 4;

/// Native access width of NFDATA
pub const WORD_SIZE: usize = 4;

// NFCONT bits
/// Controller enable (MODE)
pub const NFCONT_ENABLE: u32 = 1 << 0;
/// nFCE0 output level. Set deasserts chip enable.
pub const NFCONT_NFCE: u32 = 1 << 1;
/// Value written at init: controller on, chip deselected
pub const NFCONT_INIT: u32 = NFCONT_ENABLE | NFCONT_NFCE;

// NFSTAT bits
/// RnB line: set when the device is ready
pub const NFSTAT_READY: u8 = 1 << 0;

/// Named accessors for the controller registers over a [RegisterBus].
///
/// Construction checks the bus spans [REGISTER_MAP_SIZE] bytes, so every accessor
/// stays inside the window.
#[derive(Debug)]
pub struct Registers<B> {
    bus: B,
}

impl<B: RegisterBus> Registers<B> {
    /// Wrap `bus`, handing it back if it is too small for the register map.
    pub fn new(bus: B) -> Result<Self, B> {
        if bus.size() < REGISTER_MAP_SIZE {
            return Err(bus);
        }
        Ok(Registers { bus })
    }

    /// The underlying register window
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give the register window back, e.g. to unmap it
    pub fn into_bus(self) -> B {
        self.bus
    }

    pub fn read_control(&mut self) -> u32 {
        self.bus.read32(NFCONT)
    }

    pub fn write_control(&mut self, value: u32) {
        self.bus.write32(NFCONT, value)
    }

    pub fn write_command(&mut self, cmd: u8) {
        self.bus.write8(NFCMMD, cmd)
    }

    pub fn write_address(&mut self, addr: u8) {
        self.bus.write8(NFADDR, addr)
    }

    pub fn read_status(&mut self) -> u8 {
        self.bus.read8(NFSTAT)
    }

    pub fn read_data_byte(&mut self) -> u8 {
        self.bus.read8(NFDATA)
    }

    pub fn write_data_byte(&mut self, byte: u8) {
        self.bus.write8(NFDATA, byte)
    }

    /// Fill `buf` with whole words from NFDATA. Trailing bytes short of a word are left alone.
    pub fn read_data_words(&mut self, buf: &mut [u8]) {
        self.bus.read32_rep(NFDATA, buf)
    }

    /// Send the whole words of `buf` to NFDATA. Trailing bytes short of a word are skipped.
    pub fn write_data_words(&mut self, buf: &[u8]) {
        self.bus.write32_rep(NFDATA, buf)
    }
}
