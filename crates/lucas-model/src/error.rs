/// Malformed parameters or inputs.
///
/// Every variant is a caller mistake. Searches that end without a perfect
/// code are reported through outcome values, never through this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("vertex width must be at least 1")]
    EmptyWidth,

    #[error("vertex width {n} exceeds the supported maximum of {max}")]
    WidthTooLarge { n: u32, max: u32 },

    #[error("forbidden run length must be at least 2, got {s}")]
    RunTooShort { s: u32 },

    #[error("vertex has width {found}, expected {expected}")]
    WidthMismatch { expected: u32, found: u32 },

    #[error("invalid character '{found}' at position {position} (expected '0' or '1')")]
    InvalidBit { found: char, position: usize },

    #[error("bit pattern {bits:#x} does not fit in {n} bits")]
    BitsOutOfRange { bits: u64, n: u32 },

    #[error("exhaustive enumeration of 2^{n} vertices exceeds the limit of 2^{max}")]
    EnumerationTooLarge { n: u32, max: u32 },

    #[error("Hamming redundancy must be at least 2, got {r}")]
    RedundancyTooSmall { r: u32 },

    #[error("Hamming redundancy {r} exceeds the supported maximum of {max}")]
    RedundancyTooLarge { r: u32, max: u32 },

    #[error("width {n} is not a Hamming length (2^r - 1)")]
    NotHammingLength { n: u32 },
}
