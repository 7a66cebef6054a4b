//! Driver for the NAND flash controller of the Samsung S5PV210.
//!
//! The controller is brought up from a [PlatformDevice] through a host [Platform]
//! that maps its register window, and handed to a generic [embedded_nand::FlashLayer]
//! as a [embedded_nand::RawNand] operation table. The flash layer owns the NAND
//! protocol; this crate only moves bytes between the controller registers and the
//! flash layer's buffers.
//!
//! ```ignore
//! let nand = s5pv210_nand::probe(&pdev, &mut platform, &mut flash_layer)?;
//! // ... flash layer in use ...
//! nand.remove(&mut flash_layer, &mut platform);
//! ```
#![no_std]
// Must be first to share macros across crate
pub(crate) mod fmt;

extern crate alloc;

mod bus;
mod controller;
mod error;
mod lifecycle;
mod platform;
pub mod regs;

pub use bus::{Mmio, RegisterBus};
pub use controller::NandController;
pub use embedded_nand;
pub use error::Error;
pub use lifecycle::{probe, Registered, MAX_CHIPS};
pub use platform::{
    NandPlatformData, NandSet, Platform, PlatformDevice, Resource, DRIVER_NAME,
    S5PV210_NAND_BASE,
};
