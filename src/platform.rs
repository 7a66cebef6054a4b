use alloc::boxed::Box;
use core::alloc::Layout;

use embedded_nand::Partition;

use crate::bus::RegisterBus;

/// Name the controller is matched by in the board's device table
pub const DRIVER_NAME: &str = "s3c2410-nand";

/// Physical base of the S5PV210 NAND controller
pub const S5PV210_NAND_BASE: u64 = 0xB0E0_0000;

/// A physical memory region handed over by the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    pub start: u64,
    pub size: u64,
}

impl Resource {
    pub const fn new(start: u64, size: u64) -> Self {
        Resource { start, size }
    }

    /// First byte past the end of the region
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

/// One set of chips on the controller and how the flash is split up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NandSet {
    pub name: &'static str,
    pub partitions: &'static [Partition],
}

/// Board specific NAND configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NandPlatformData {
    pub sets: Option<NandSet>,
}

/// The device the host runtime binds this driver to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlatformDevice {
    pub name: &'static str,
    /// Register window of the controller
    pub resource: Resource,
    pub platform_data: Option<NandPlatformData>,
}

impl PlatformDevice {
    /// The NAND set from the platform data, if the board supplied one
    pub fn nand_set(&self) -> Option<NandSet> {
        self.platform_data.and_then(|data| data.sets)
    }
}

/// Services the host platform provides to the driver.
///
/// Mapping is allowed to fail; every window handed out by [Platform::ioremap] is
/// given back through [Platform::iounmap] exactly once.
pub trait Platform {
    /// Register window produced by a successful mapping
    type Window: RegisterBus;

    /// Map `res` into addressable memory. `None` if the mapping cannot be made.
    fn ioremap(&mut self, res: &Resource) -> Option<Self::Window>;

    /// Release a window returned by [Platform::ioremap]
    fn iounmap(&mut self, window: Self::Window);

    /// Move `value` to the heap, or `None` when memory is exhausted.
    fn alloc_state<T>(&mut self, value: T) -> Option<Box<T>> {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
            return Some(Box::new(value));
        }
        // Safety: layout has a non-zero size
        let ptr = unsafe { alloc::alloc::alloc(layout) } as *mut T;
        if ptr.is_null() {
            return None;
        }
        // Safety: ptr is non-null and was allocated with the layout of T
        unsafe {
            ptr.write(value);
            Some(Box::from_raw(ptr))
        }
    }
}
