//! Standard ONFI / legacy NAND command opcodes.
//!
//! The flash layer sends these through [crate::RawNand::cmd_ctrl] with
//! [crate::CtrlFlags::CLE] set.

/// Read page, first cycle
pub const READ0: u8 = 0x00;
/// Read page, confirm cycle for large page devices
pub const READSTART: u8 = 0x30;
/// Read the manufacturer and device ID
pub const READID: u8 = 0x90;
/// Read the status register
pub const STATUS: u8 = 0x70;
/// Reset the device
pub const RESET: u8 = 0xFF;
/// Serial data input, first cycle of page program
pub const SEQIN: u8 = 0x80;
/// Page program confirm
pub const PAGEPROG: u8 = 0x10;
/// Block erase, first cycle
pub const ERASE1: u8 = 0x60;
/// Block erase confirm
pub const ERASE2: u8 = 0xD0;
