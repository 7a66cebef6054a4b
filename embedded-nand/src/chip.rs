use core::fmt::Display;

/// Where the flash layer computes and checks ECC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EccMode {
    /// No ECC
    None,
    /// ECC computed in software by the flash layer
    #[default]
    Soft,
    /// ECC computed by the controller
    Hardware,
}

/// Context the controller fills in before handing itself to the flash layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NandChip {
    /// Physical address of the register data is read from
    pub io_addr_r: u64,
    /// Physical address of the register data is written to
    pub io_addr_w: u64,
    /// ECC scheme the flash layer must use
    pub ecc_mode: EccMode,
    /// Fixed delay in microseconds for waits that cannot poll the ready line
    pub chip_delay_us: u32,
}

impl NandChip {
    /// Chip delay used when the controller does not say otherwise
    pub const DEFAULT_CHIP_DELAY_US: u32 = 20;

    /// Context for a controller whose data register sits at `io_addr`.
    pub fn new(io_addr: u64) -> Self {
        NandChip {
            io_addr_r: io_addr,
            io_addr_w: io_addr,
            ecc_mode: EccMode::Soft,
            chip_delay_us: Self::DEFAULT_CHIP_DELAY_US,
        }
    }
}

impl Default for NandChip {
    fn default() -> Self {
        Self::new(0)
    }
}

/// A named region of the flash device handed to the flash layer at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Partition {
    pub name: &'static str,
    /// Byte offset from the start of the device
    pub offset: u64,
    /// Size in bytes
    pub size: u64,
}

impl Partition {
    pub const fn new(name: &'static str, offset: u64, size: u64) -> Self {
        Partition { name, offset, size }
    }

    /// First byte past the end of the partition
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:#010x}-{:#010x} : \"{}\"",
            self.offset,
            self.end(),
            self.name
        )
    }
}
