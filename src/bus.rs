//! Register access backends
//!
//! [RegisterBus] is the seam between the register map and the hardware. [Mmio]
//! drives a real memory mapped window; [crate::test::SimRegisters] is a register
//! file that records every access.

use core::ptr::{self, NonNull};

/// Byte and word access to a window of device registers.
///
/// Offsets are bytes from the start of the window. Reads take `&mut self` because
/// reading a FIFO register such as NFDATA advances the device.
///
/// # Panics
///
/// An access that does not lie entirely inside the window, or a word access that
/// is not 4 byte aligned, is a caller bug. [Mmio] panics on both rather than touch
/// memory outside the mapping.
pub trait RegisterBus {
    /// Size of the window in bytes
    fn size(&self) -> usize;

    fn read8(&mut self, offset: usize) -> u8;

    fn read32(&mut self, offset: usize) -> u32;

    fn write8(&mut self, offset: usize, value: u8);

    fn write32(&mut self, offset: usize, value: u32);

    /// Read `buf.len() / 4` words from the same register into `buf`, in native byte order.
    fn read32_rep(&mut self, offset: usize, buf: &mut [u8]) {
        for word in buf.chunks_exact_mut(4) {
            word.copy_from_slice(&self.read32(offset).to_ne_bytes());
        }
    }

    /// Write `buf.len() / 4` words from `buf` to the same register, in native byte order.
    fn write32_rep(&mut self, offset: usize, buf: &[u8]) {
        for word in buf.chunks_exact(4) {
            self.write32(offset, u32::from_ne_bytes([word[0], word[1], word[2], word[3]]));
        }
    }
}

/// A memory mapped register window accessed with volatile loads and stores
#[derive(Debug)]
pub struct Mmio {
    base: NonNull<u8>,
    size: usize,
}

impl Mmio {
    /// Wrap a mapped register window.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    /// - `base` points to `size` bytes of device registers that stay mapped for the
    ///   lifetime of the returned value
    /// - `base` is 4 byte aligned
    /// - No other code accesses the same window while this value exists
    pub unsafe fn new(base: NonNull<u8>, size: usize) -> Self {
        Mmio { base, size }
    }

    /// Base of the window, for handing back to the platform's unmap call
    pub fn as_ptr(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    fn check(&self, offset: usize, width: usize) {
        assert!(
            offset < self.size && self.size - offset >= width,
            "register access at {:#x} outside window of {:#x} bytes",
            offset,
            self.size
        );
        assert!(offset % width == 0, "unaligned register access at {:#x}", offset);
    }
}

impl RegisterBus for Mmio {
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn read8(&mut self, offset: usize) -> u8 {
        self.check(offset, 1);
        unsafe { ptr::read_volatile(self.base.as_ptr().add(offset)) }
    }

    #[inline]
    fn read32(&mut self, offset: usize) -> u32 {
        self.check(offset, 4);
        unsafe { ptr::read_volatile(self.base.as_ptr().add(offset) as *const u32) }
    }

    #[inline]
    fn write8(&mut self, offset: usize, value: u8) {
        self.check(offset, 1);
        unsafe { ptr::write_volatile(self.base.as_ptr().add(offset), value) }
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        self.check(offset, 4);
        unsafe { ptr::write_volatile(self.base.as_ptr().add(offset) as *mut u32, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::{NFCONT, NFSTAT, REGISTER_MAP_SIZE};
    use test_log::test;

    // Plain memory standing in for the register window
    fn window(backing: &mut [u32; REGISTER_MAP_SIZE / 4]) -> Mmio {
        let base = NonNull::new(backing.as_mut_ptr() as *mut u8).unwrap();
        unsafe { Mmio::new(base, REGISTER_MAP_SIZE) }
    }

    #[test]
    fn test_word_access() {
        let mut backing = [0u32; REGISTER_MAP_SIZE / 4];
        let mut mmio = window(&mut backing);
        mmio.write32(NFCONT, 0xDEAD_BEEF);
        assert_eq!(mmio.read32(NFCONT), 0xDEAD_BEEF);
        drop(mmio);
        assert_eq!(backing[NFCONT / 4], 0xDEAD_BEEF);
    }

    #[test]
    fn test_byte_access() {
        let mut backing = [0u32; REGISTER_MAP_SIZE / 4];
        backing[NFSTAT / 4] = u32::from_ne_bytes([0x01, 0, 0, 0]);
        let mut mmio = window(&mut backing);
        assert_eq!(mmio.read8(NFSTAT), 0x01);
        mmio.write8(NFSTAT + 1, 0x5A);
        assert_eq!(mmio.read32(NFSTAT), u32::from_ne_bytes([0x01, 0x5A, 0, 0]));
    }

    #[test]
    #[should_panic(expected = "outside window")]
    fn test_read_past_window() {
        let mut backing = [0u32; REGISTER_MAP_SIZE / 4];
        let mut mmio = window(&mut backing);
        mmio.read32(0x1000);
    }

    #[test]
    #[should_panic(expected = "outside window")]
    fn test_word_straddles_end() {
        let mut backing = [0u32; REGISTER_MAP_SIZE / 4];
        let mut mmio = window(&mut backing);
        mmio.write32(REGISTER_MAP_SIZE - 2, 0);
    }

    #[test]
    #[should_panic(expected = "unaligned")]
    fn test_unaligned_word() {
        let mut backing = [0u32; REGISTER_MAP_SIZE / 4];
        let mut mmio = window(&mut backing);
        mmio.read32(NFCONT + 1);
    }

    #[test]
    fn test_repeated_word_access() {
        let mut backing = [0u32; REGISTER_MAP_SIZE / 4];
        let mut mmio = window(&mut backing);
        // Same register every time: only the last word survives in plain memory
        mmio.write32_rep(NFCONT, &[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut buf = [0u8; 8];
        mmio.read32_rep(NFCONT, &mut buf);
        assert_eq!(buf, [5, 6, 7, 8, 5, 6, 7, 8]);
    }
}
