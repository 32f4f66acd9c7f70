//! ROM container decoding: header classification, section extraction and
//! derived metadata for the iNES and NES 2.0 formats.

pub mod header;
pub mod ines;
pub mod metadata;
pub mod nes2;
pub mod section;

pub use header::{Flags6, Flags7, HeaderFields, RomFormat, HEADER_LEN};
pub use metadata::{ConsoleType, ExpansionDevice, Mirroring, RomMetadata, Timing};
pub use section::SectionSet;

use log::{debug, warn};

use crate::error::{ParseWarning, RomError};

/// A decoded ROM image: format revision, section views into the caller's
/// buffer, derived metadata and any non-fatal findings.
#[derive(Debug)]
pub struct Rom<'a> {
    pub format: RomFormat,
    pub sections: SectionSet<'a>,
    pub metadata: RomMetadata,
    pub warnings: Vec<ParseWarning>,
}

impl<'a> Rom<'a> {
    /// Classifies the image and runs the matching section extractor.
    ///
    /// The two formats are a closed set, so dispatch is a plain match; there
    /// is no fallback beyond the byte-7 revision test.
    pub fn parse(image: &'a [u8]) -> Result<Self, RomError> {
        let header = HeaderFields::parse(image)?;
        let format = header.format();
        let (sections, metadata, warnings) = match format {
            RomFormat::INes => ines::extract(image, header),
            RomFormat::Nes2 => nes2::extract(image, header)?,
        };

        for warning in &warnings {
            warn!("{warning}");
        }
        debug!(
            "{format:?}: trainer {} B, PRG-ROM {} B, CHR-ROM {} B, misc {} B",
            sections.trainer.map_or(0, <[u8]>::len),
            sections.prg_rom.len(),
            sections.chr_rom.len(),
            sections.misc_rom.len(),
        );

        Ok(Self {
            format,
            sections,
            metadata,
            warnings,
        })
    }
}

/// Convenience wrapper: which format revision an image uses, without
/// extracting it.
pub fn classify(image: &[u8]) -> Result<RomFormat, RomError> {
    Ok(HeaderFields::parse(image)?.format())
}
