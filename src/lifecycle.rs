use alloc::boxed::Box;
use core::mem::MaybeUninit;

use embedded_nand::{FlashLayer, NandChip, NandFlashError};

use crate::bus::RegisterBus;
use crate::controller::{data_register, NandController};
use crate::error::Error;
use crate::platform::{Platform, PlatformDevice};

/// Chips scanned per controller
pub const MAX_CHIPS: usize = 1;

impl<W: RegisterBus> NandController<W> {
    /// Allocate the controller state, map and enable the hardware.
    ///
    /// Fails without allocating anything when the platform data carries no NAND
    /// set. On any later failure everything acquired so far is released.
    pub fn init<P>(pdev: &PlatformDevice, platform: &mut P) -> Result<Box<Self>, Error>
    where
        P: Platform<Window = W>,
    {
        let Some(set) = pdev.nand_set() else {
            error!("Can not find platform data");
            return Err(Error::MisconfiguredPlatform);
        };

        let Some(state) = platform.alloc_state(MaybeUninit::<Self>::uninit()) else {
            error!("No memory for flash info");
            return Err(Error::ResourceExhausted);
        };

        let res = pdev.resource;
        let regs = Self::init_hw(&res, platform)?;
        let chip = NandChip::new(data_register(&res));
        trace!("Chip data register at {:x}", chip.io_addr_r);

        Ok(Box::write(
            state,
            NandController {
                regs,
                res,
                set,
                chip,
            },
        ))
    }

    /// Hand the controller to `layer`: scan for the chip, then register the
    /// board's partitions.
    ///
    /// A failed scan tears the controller down. A failed partition registration
    /// releases the controller from the flash layer first.
    pub fn register<L, P>(
        mut self: Box<Self>,
        layer: &mut L,
        platform: &mut P,
    ) -> Result<Registered<W>, Error>
    where
        L: FlashLayer,
        P: Platform<Window = W>,
    {
        if let Err(e) = layer.scan(&mut *self, MAX_CHIPS) {
            let kind = e.kind();
            warn!("NAND scan failed: {:?}", kind);
            self.teardown(platform);
            return Err(Error::FlashLayer(kind));
        }

        if let Err(e) = layer.add_partitions(self.set.partitions) {
            let kind = e.kind();
            error!("Failed to add {} partitions: {:?}", self.set.partitions.len(), kind);
            layer.release(&mut *self);
            self.teardown(platform);
            return Err(Error::FlashLayer(kind));
        }

        info!(
            "Registered {} with {} partitions",
            self.set.name,
            self.set.partitions.len()
        );
        Ok(Registered { controller: self })
    }

    /// Unmap the register window and free the controller state.
    ///
    /// This is the only path that unmaps the window of a controller that was
    /// never registered; dropping it leaves the window mapped.
    pub fn teardown<P>(self: Box<Self>, platform: &mut P)
    where
        P: Platform<Window = W>,
    {
        let this = *self;
        debug!("Unmapping registers at {:x}", this.res.start);
        platform.iounmap(this.regs.into_bus());
    }
}

/// A controller the flash layer has scanned and registered partitions for.
///
/// Tear it down with [Registered::remove], which has the flash layer let go of
/// the controller before its registers are unmapped. Dropping the value instead
/// releases neither: the flash layer is not told and the window stays mapped.
#[derive(Debug)]
#[must_use = "call remove() to release the flash layer and unmap the registers"]
pub struct Registered<W> {
    controller: Box<NandController<W>>,
}

impl<W: RegisterBus> Registered<W> {
    pub fn controller(&self) -> &NandController<W> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut NandController<W> {
        &mut self.controller
    }

    /// Release the controller from `layer`, then unmap and free it.
    pub fn remove<L, P>(self, layer: &mut L, platform: &mut P)
    where
        L: FlashLayer,
        P: Platform<Window = W>,
    {
        let mut controller = self.controller;
        layer.release(&mut *controller);
        controller.teardown(platform);
    }
}

/// Bring up the controller described by `pdev` and register it with `layer`.
pub fn probe<L, P>(
    pdev: &PlatformDevice,
    platform: &mut P,
    layer: &mut L,
) -> Result<Registered<P::Window>, Error>
where
    L: FlashLayer,
    P: Platform,
{
    info!("S5PV210 NAND Driver");
    let controller = NandController::init(pdev, platform)?;
    controller.register(layer, platform)
}
