use embedded_nand::NandFlashErrorKind;

/// Error type for bringing up and registering the controller.
///
/// Only the lifecycle can fail. Once a [crate::NandController] exists its
/// primitive operations have no error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No memory for the controller state
    #[error("No memory for flash info")]
    ResourceExhausted,
    /// The register window could not be mapped, or is smaller than the register map
    #[error("Failed to map registers at {start:#x} (size {size:#x})")]
    MappingFailure { start: u64, size: u64 },
    /// The platform supplied no NAND set
    #[error("Can not find platform data")]
    MisconfiguredPlatform,
    /// The flash layer rejected the device during scan or partition registration
    #[error("Flash layer error: {0:?}")]
    FlashLayer(NandFlashErrorKind),
}
