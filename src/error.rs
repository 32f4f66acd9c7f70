use std::fmt;

use thiserror::Error;

/// Errors that abort decoding of the affected part of a ROM image.
///
/// An `InvalidChrLength` failure only concerns tile decoding; sections and
/// metadata that were already extracted stay usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RomError {
    /// The image does not start with the `NES<EOF>` signature (or is shorter
    /// than a header).
    #[error("not an iNES/NES 2.0 image (missing NES<EOF> signature)")]
    NotARom,

    /// A declared section does not fit inside the image.
    #[error("corrupt header: {section} section does not fit in the {image_len}-byte image")]
    CorruptHeader {
        section: &'static str,
        image_len: usize,
    },

    /// CHR-ROM must be a whole number of 16-byte tile groups.
    #[error("CHR-ROM length {0} is not a multiple of 16")]
    InvalidChrLength(usize),
}

/// Non-fatal findings collected while parsing. The section set is still
/// returned; consumers decide how much to trust it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseWarning {
    /// iNES only: the declared trainer+PRG+CHR sizes do not sum to the actual
    /// post-header length. Sections are sliced best-effort, clamped to the
    /// image.
    SizeMismatch { declared: usize, actual: usize },
    /// An iNES header byte in the unused 8..=15 range is not zero.
    NonZeroPadding { index: usize, value: u8 },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseWarning::SizeMismatch { declared, actual } => write!(
                f,
                "declared sizes sum to {declared} bytes but the image holds {actual} after the header"
            ),
            ParseWarning::NonZeroPadding { index, value } => {
                write!(f, "header byte {index} should be zero but is {value:#04X}")
            }
        }
    }
}
