use bitflags::bitflags;

use crate::bits::is_bit_set;
use crate::error::RomError;

/// Every `.nes` image starts with `NES` followed by the MS-DOS end-of-file
/// character.
const MAGIC: [u8; 4] = *b"NES\x1A";

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 16;

bitflags! {
    /// Header byte 6: mirroring, battery, trainer, four-screen and the low
    /// nibble of the mapper number.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags6: u8 {
        const VERTICAL_MIRRORING = 0b0000_0001;
        const BATTERY            = 0b0000_0010;
        const TRAINER            = 0b0000_0100;
        const FOUR_SCREEN        = 0b0000_1000;
    }
}

bitflags! {
    /// Header byte 7: console type, format revision bits and the next nibble
    /// of the mapper number.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags7: u8 {
        const VS_SYSTEM     = 0b0000_0001;
        const PLAYCHOICE_10 = 0b0000_0010;
        // Bits 2-3 together identify the header revision; see
        // `HeaderFields::format`.
    }
}

/// The two container format revisions this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomFormat {
    /// The original iNES layout: byte-granular sizes, sparse metadata.
    INes,
    /// NES 2.0: 12-bit mapper numbers, exponent-form sizes, RAM sizes,
    /// timing and expansion-device metadata.
    Nes2,
}

/// Read-only view of the 16-byte header.
///
/// Construction validates only the signature; everything else is interpreted
/// by the per-format extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    bytes: [u8; HEADER_LEN],
}

impl HeaderFields {
    /// Captures the header from the start of a ROM image, or `NotARom` if the
    /// image is shorter than a header or the signature does not match.
    pub fn parse(image: &[u8]) -> Result<Self, RomError> {
        if image.len() < HEADER_LEN || image[..4] != MAGIC {
            return Err(RomError::NotARom);
        }
        let mut bytes = [0u8; HEADER_LEN];
        bytes.copy_from_slice(&image[..HEADER_LEN]);
        Ok(Self { bytes })
    }

    /// NES 2.0 iff byte 7 bit 3 is set and bit 2 is clear; anything else is
    /// plain iNES.
    pub fn format(&self) -> RomFormat {
        if is_bit_set(self.bytes[7], 3) && !is_bit_set(self.bytes[7], 2) {
            RomFormat::Nes2
        } else {
            RomFormat::INes
        }
    }

    /// PRG-ROM size field (byte 4). Unit interpretation is format specific.
    pub fn prg_units(&self) -> u8 {
        self.bytes[4]
    }

    /// CHR-ROM size field (byte 5). Unit interpretation is format specific.
    pub fn chr_units(&self) -> u8 {
        self.bytes[5]
    }

    pub fn flags6(&self) -> Flags6 {
        Flags6::from_bits_truncate(self.bytes[6])
    }

    pub fn flags7(&self) -> Flags7 {
        Flags7::from_bits_truncate(self.bytes[7])
    }

    /// The raw header bytes, for fields beyond the named accessors.
    pub fn raw(&self) -> &[u8; HEADER_LEN] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with_byte7(byte7: u8) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[..4].copy_from_slice(&MAGIC);
        bytes[7] = byte7;
        bytes
    }

    #[test]
    fn rejects_bad_signature() {
        assert_eq!(HeaderFields::parse(b"NES\x00rest-of-header"), Err(RomError::NotARom));
        assert_eq!(HeaderFields::parse(b"SNES\x1Arest-of-hdr"), Err(RomError::NotARom));
        assert_eq!(HeaderFields::parse(&[]), Err(RomError::NotARom));
    }

    #[test]
    fn rejects_truncated_header() {
        assert_eq!(HeaderFields::parse(b"NES\x1A"), Err(RomError::NotARom));
    }

    #[test]
    fn routes_on_byte7_bits_2_and_3() {
        // Only (bit3, bit2) == (1, 0) selects NES 2.0.
        let cases = [
            (0b0000_0000, RomFormat::INes),
            (0b0000_0100, RomFormat::INes),
            (0b0000_1000, RomFormat::Nes2),
            (0b0000_1100, RomFormat::INes),
            (0b1111_1011, RomFormat::INes),
            (0b1111_1000, RomFormat::Nes2),
        ];
        for (byte7, expected) in cases {
            let header = HeaderFields::parse(&header_with_byte7(byte7)).unwrap();
            assert_eq!(header.format(), expected, "byte7 = {byte7:#010b}");
        }
    }

    #[test]
    fn exposes_size_fields() {
        let mut bytes = header_with_byte7(0);
        bytes[4] = 2;
        bytes[5] = 1;
        let header = HeaderFields::parse(&bytes).unwrap();
        assert_eq!(header.prg_units(), 2);
        assert_eq!(header.chr_units(), 1);
    }
}
