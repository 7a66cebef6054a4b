use embedded_nand::{CtrlFlags, NandChip, RawNand, CHIP_DESELECT, CMD_NONE};

use crate::bus::RegisterBus;
use crate::error::Error;
use crate::platform::{NandSet, Platform, Resource};
use crate::regs::{Registers, NFCONT_INIT, NFCONT_NFCE, NFDATA, NFSTAT_READY, WORD_SIZE};

/// One S5PV210 NAND controller with its register window mapped.
///
/// Owns the register window exclusively and carries the [NandChip] context handed
/// to the flash layer. The flash layer drives the controller through the
/// [RawNand] operation table, which is only reachable once the hardware is
/// initialised; see [NandController::init].
///
/// Give the window back with [NandController::teardown], or through
/// [crate::Registered::remove] once registered.
#[derive(Debug)]
#[must_use = "call teardown() to unmap the registers"]
pub struct NandController<W> {
    pub(crate) regs: Registers<W>,
    pub(crate) res: Resource,
    pub(crate) set: NandSet,
    pub(crate) chip: NandChip,
}

impl<W: RegisterBus> NandController<W> {
    /// Map the register window of `res`, enable the controller and deselect the chip.
    ///
    /// The window is given back to the platform if it is too small for the register map.
    pub(crate) fn init_hw<P>(res: &Resource, platform: &mut P) -> Result<Registers<W>, Error>
    where
        P: Platform<Window = W>,
    {
        let mapping_failure = Error::MappingFailure {
            start: res.start,
            size: res.size,
        };
        let Some(window) = platform.ioremap(res) else {
            error!("ioremap failed");
            return Err(mapping_failure);
        };
        let mut regs = match Registers::new(window) {
            Ok(regs) => regs,
            Err(window) => {
                error!("Register window of {} bytes too small", window.size());
                platform.iounmap(window);
                return Err(mapping_failure);
            }
        };
        debug!("Mapped registers at {:x} ({} bytes)", res.start, res.size);

        regs.write_control(NFCONT_INIT);
        Ok(regs)
    }

    /// Physical resource the register window was mapped from
    pub fn resource(&self) -> &Resource {
        &self.res
    }

    /// NAND set supplied by the platform
    pub fn nand_set(&self) -> &NandSet {
        &self.set
    }

    /// The mapped register window, for inspection
    pub fn window(&self) -> &W {
        self.regs.bus()
    }
}

/// Physical address of NFDATA for a window mapped from `res`
pub(crate) fn data_register(res: &Resource) -> u64 {
    res.start + NFDATA as u64
}

impl<W: RegisterBus> RawNand for NandController<W> {
    fn chip(&self) -> &NandChip {
        &self.chip
    }

    fn select_chip(&mut self, chip: i32) {
        let mut cur = self.regs.read_control();

        if chip == CHIP_DESELECT {
            cur |= NFCONT_NFCE;
        } else {
            cur &= !NFCONT_NFCE;
        }

        self.regs.write_control(cur);
    }

    fn cmd_ctrl(&mut self, cmd: i32, ctrl: CtrlFlags) {
        // No separate register for the control lines alone
        if cmd == CMD_NONE {
            return;
        }

        if ctrl.contains(CtrlFlags::CLE) {
            self.regs.write_command(cmd as u8);
        } else {
            self.regs.write_address(cmd as u8);
        }
    }

    fn read_buf(&mut self, buf: &mut [u8]) {
        let (words, rest) = buf.split_at_mut(buf.len() & !(WORD_SIZE - 1));
        self.regs.read_data_words(words);

        for byte in rest {
            *byte = self.regs.read_data_byte();
        }
    }

    fn write_buf(&mut self, buf: &[u8]) {
        let (words, rest) = buf.split_at(buf.len() & !(WORD_SIZE - 1));
        self.regs.write_data_words(words);

        for &byte in rest {
            self.regs.write_data_byte(byte);
        }
    }

    fn dev_ready(&mut self) -> bool {
        self.regs.read_status() & NFSTAT_READY != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::{NFADDR, NFCMMD, NFCONT, NFCONT_ENABLE, NFSTAT, REGISTER_MAP_SIZE};
    use crate::test::{Access, SimRegisters};
    use alloc::vec::Vec;
    use embedded_nand::EccMode;
    use test_log::test;

    const SELECTORS: [i32; 7] = [CHIP_DESELECT, 0, 1, 7, -2, i32::MIN, i32::MAX];

    fn controller() -> NandController<SimRegisters> {
        let res = Resource::new(0xB0E0_0000, REGISTER_MAP_SIZE as u64);
        NandController {
            regs: Registers::new(SimRegisters::new(REGISTER_MAP_SIZE)).unwrap(),
            chip: NandChip::new(data_register(&res)),
            res,
            set: NandSet {
                name: "NAND",
                partitions: &[],
            },
        }
    }

    fn count(accesses: &[Access], f: impl Fn(&Access) -> bool) -> usize {
        accesses.iter().filter(|a| f(a)).count()
    }

    #[test]
    fn test_chip_context() {
        let nand = controller();
        assert_eq!(nand.chip().io_addr_r, 0xB0E0_0010);
        assert_eq!(nand.chip().io_addr_w, 0xB0E0_0010);
        assert_eq!(nand.chip().ecc_mode, EccMode::Soft);
        assert_eq!(nand.chip().chip_delay_us, 20);
    }

    /// Only the chip enable bit may change, whatever else is set in NFCONT
    #[test]
    fn test_select_chip_preserves_other_bits() {
        let mut nand = controller();
        for pattern in [0, u32::MAX, 0xA5A5_A5A5, 0x5A5A_5A5A, NFCONT_ENABLE, NFCONT_NFCE] {
            for selector in SELECTORS {
                nand.regs.bus_mut().set_register(NFCONT, pattern);
                nand.select_chip(selector);
                let cur = nand.regs.bus_mut().register(NFCONT);
                assert_eq!(cur & !NFCONT_NFCE, pattern & !NFCONT_NFCE);
                assert_eq!(cur & NFCONT_NFCE != 0, selector == CHIP_DESELECT);
            }
        }
    }

    #[test]
    fn test_select_chip_idempotent() {
        let mut nand = controller();
        nand.regs.bus_mut().set_register(NFCONT, NFCONT_INIT);
        for _ in 0..3 {
            nand.select_chip(0);
            assert_eq!(nand.regs.bus_mut().register(NFCONT), NFCONT_ENABLE);
        }
        for _ in 0..3 {
            nand.select_chip(CHIP_DESELECT);
            assert_eq!(nand.regs.bus_mut().register(NFCONT), NFCONT_INIT);
        }
        // One read and one write per call
        assert_eq!(nand.regs.bus_mut().accesses().len(), 12);
    }

    #[test]
    fn test_cmd_none_is_noop() {
        let mut nand = controller();
        for ctrl in [
            CtrlFlags::CLE | CtrlFlags::NCE | CtrlFlags::CTRL_CHANGE,
            CtrlFlags::ALE | CtrlFlags::NCE | CtrlFlags::CTRL_CHANGE,
            CtrlFlags::NCE,
            CtrlFlags::empty(),
        ] {
            nand.cmd_ctrl(CMD_NONE, ctrl);
        }
        assert!(nand.regs.bus_mut().accesses().is_empty());
    }

    #[test]
    fn test_cmd_ctrl_routing() {
        let mut nand = controller();
        for byte in 0..=u8::MAX {
            nand.regs.bus_mut().clear_accesses();
            nand.cmd_ctrl(byte as i32, CtrlFlags::CLE | CtrlFlags::NCE);
            assert_eq!(nand.regs.bus_mut().accesses(), &[Access::Write8(NFCMMD, byte)]);

            nand.regs.bus_mut().clear_accesses();
            nand.cmd_ctrl(byte as i32, CtrlFlags::ALE | CtrlFlags::NCE);
            assert_eq!(nand.regs.bus_mut().accesses(), &[Access::Write8(NFADDR, byte)]);
        }
    }

    #[test]
    fn test_write_buf_six_bytes() {
        let mut nand = controller();
        nand.write_buf(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(
            nand.regs.bus_mut().accesses(),
            &[
                Access::Write32(NFDATA, u32::from_ne_bytes([1, 2, 3, 4])),
                Access::Write8(NFDATA, 5),
                Access::Write8(NFDATA, 6),
            ]
        );
    }

    /// Every length splits into whole words first, then the remaining bytes,
    /// and reading back from the echoing data register reproduces the buffer
    #[test]
    fn test_transfer_split_and_order() {
        for len in 0..=37usize {
            let mut nand = controller();
            let data: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(37) ^ 0x5A).collect();

            nand.write_buf(&data);
            let writes = nand.regs.bus_mut().accesses().to_vec();
            assert_eq!(count(&writes, |a| matches!(a, Access::Write32(NFDATA, _))), len / 4);
            assert_eq!(count(&writes, |a| matches!(a, Access::Write8(NFDATA, _))), len % 4);
            assert_eq!(writes.len(), len / 4 + len % 4);
            assert!(writes[..len / 4]
                .iter()
                .all(|a| matches!(a, Access::Write32(..))));

            nand.regs.bus_mut().clear_accesses();
            let mut readback = alloc::vec![0u8; len];
            nand.read_buf(&mut readback);
            let reads = nand.regs.bus_mut().accesses();
            assert_eq!(count(reads, |a| *a == Access::Read32(NFDATA)), len / 4);
            assert_eq!(count(reads, |a| *a == Access::Read8(NFDATA)), len % 4);
            assert_eq!(reads.len(), len / 4 + len % 4);
            assert!(reads[..len / 4].iter().all(|a| *a == Access::Read32(NFDATA)));

            assert_eq!(readback, data);
        }
    }

    #[test]
    fn test_single_byte_access() {
        let mut nand = controller();
        nand.write_byte(0x70);
        assert_eq!(nand.read_byte(), 0x70);
        assert_eq!(
            nand.regs.bus_mut().accesses(),
            &[Access::Write8(NFDATA, 0x70), Access::Read8(NFDATA)]
        );
    }

    #[test]
    fn test_dev_ready_reads_status_only() {
        let mut nand = controller();
        nand.regs.bus_mut().set_register(NFSTAT, 0xFE);
        assert!(!nand.dev_ready());
        nand.regs.bus_mut().set_register(NFSTAT, 0x01);
        assert!(nand.dev_ready());
        nand.regs.bus_mut().set_register(NFSTAT, 0xFF);
        assert!(nand.dev_ready());

        assert_eq!(nand.regs.bus_mut().register(NFSTAT), 0xFF);
        assert!(nand
            .regs
            .bus()
            .accesses()
            .iter()
            .all(|a| *a == Access::Read8(NFSTAT)));
    }
}
