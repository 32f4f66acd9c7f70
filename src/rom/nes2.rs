//! Section extractor for the NES 2.0 revision of the container.
//!
//! NES 2.0 widens the size fields (12-bit bank counts or an exponent form),
//! the mapper number (12 bits plus a submapper), and adds RAM sizes, timing
//! and expansion-device metadata. Unlike iNES extraction, a section that does
//! not fit in the image is a fatal `CorruptHeader`.

use crate::bits::{high_nibble, low_nibble, merge_nibbles};
use crate::error::{ParseWarning, RomError};
use crate::rom::header::{Flags6, HeaderFields, HEADER_LEN};
use crate::rom::ines::{CHR_UNIT, PRG_UNIT};
use crate::rom::metadata::{ConsoleType, ExpansionDevice, Mirroring, RomMetadata, Timing};
use crate::rom::section::{battery_window, SectionSet, TRAINER_LEN};

/// Decodes one of the two size fields.
///
/// `msb_nibble` comes from header byte 9. Value `0xF` switches the size byte
/// itself into exponent-multiplier form (top 6 bits = exponent, bottom 2 =
/// multiplier code, size in bytes = 2^E * (2*MM + 1)); any other nibble is
/// the high part of a 12-bit bank count. `None` on arithmetic overflow, which
/// the caller treats the same as exceeding the image.
fn rom_size(size_byte: u8, msb_nibble: u8, unit: usize) -> Option<usize> {
    if msb_nibble == 0xF {
        let exponent = u32::from(size_byte >> 2);
        let multiplier = usize::from(size_byte & 0b11);
        1usize
            .checked_shl(exponent)?
            .checked_mul(2 * multiplier + 1)
    } else {
        (usize::from(msb_nibble) << 8 | usize::from(size_byte)).checked_mul(unit)
    }
}

/// Partitions a NES 2.0 image and derives its metadata.
pub(crate) fn extract(
    image: &[u8],
    header: HeaderFields,
) -> Result<(SectionSet<'_>, RomMetadata, Vec<ParseWarning>), RomError> {
    let flags6 = header.flags6();
    let raw = header.raw();

    let bounds_error = |section: &'static str| RomError::CorruptHeader {
        section,
        image_len: image.len(),
    };

    let prg_len = rom_size(header.prg_units(), low_nibble(raw[9]), PRG_UNIT)
        .ok_or_else(|| bounds_error("PRG-ROM"))?;
    let chr_len = rom_size(header.chr_units(), high_nibble(raw[9]), CHR_UNIT)
        .ok_or_else(|| bounds_error("CHR-ROM"))?;
    let trainer_len = if flags6.contains(Flags6::TRAINER) {
        TRAINER_LEN
    } else {
        0
    };

    let prg_start = HEADER_LEN + trainer_len;
    if prg_start > image.len() {
        return Err(bounds_error("trainer"));
    }
    let prg_end = prg_start
        .checked_add(prg_len)
        .filter(|&end| end <= image.len())
        .ok_or_else(|| bounds_error("PRG-ROM"))?;
    let chr_end = prg_end
        .checked_add(chr_len)
        .filter(|&end| end <= image.len())
        .ok_or_else(|| bounds_error("CHR-ROM"))?;

    let metadata = derive_metadata(header);

    let chr_ram: Option<&[u8]> = if metadata.uses_chr_ram { Some(&[]) } else { None };
    let sections = SectionSet {
        header: &image[..HEADER_LEN],
        trainer: (trainer_len > 0).then(|| &image[HEADER_LEN..prg_start]),
        prg_rom: &image[prg_start..prg_end],
        chr_rom: &image[prg_end..chr_end],
        prg_ram: metadata.battery.then(|| battery_window(image)),
        chr_ram,
        // Whatever follows CHR-ROM is the miscellaneous ROM area.
        misc_rom: &image[chr_end..],
        play_choice_inst_rom: None,
        play_choice_prom: None,
    };

    Ok((sections, metadata, Vec::new()))
}

fn derive_metadata(header: HeaderFields) -> RomMetadata {
    let flags6 = header.flags6();
    let raw = header.raw();

    let mirroring = if flags6.contains(Flags6::FOUR_SCREEN) {
        Mirroring::FourScreen
    } else if flags6.contains(Flags6::VERTICAL_MIRRORING) {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    };

    // 12-bit mapper: byte 6 high nibble | byte 7 high nibble | byte 8 low
    // nibble, least significant first.
    let mapper = merge_nibbles(high_nibble(raw[7]), high_nibble(raw[6])) as u16
        | (low_nibble(raw[8]) as u16) << 8;

    let console_bits = raw[7] & 0b11;
    let console = match console_bits {
        1 => ConsoleType::VsSystem,
        2 => ConsoleType::PlayChoice10,
        3 => ConsoleType::Extended {
            console: console_bits,
            vs_ppu: low_nibble(raw[13]),
            vs_hardware: high_nibble(raw[13]),
        },
        _ => ConsoleType::NesFamicom,
    };

    let chr_ram_size = ram_size(low_nibble(raw[11]));

    RomMetadata {
        mapper,
        submapper: high_nibble(raw[8]),
        mirroring,
        battery: flags6.contains(Flags6::BATTERY),
        console,
        timing: Timing::from_nes2_bits(raw[12]),
        prg_ram_size: ram_size(low_nibble(raw[10])),
        prg_nvram_size: ram_size(high_nibble(raw[10])),
        chr_ram_size,
        chr_nvram_size: ram_size(high_nibble(raw[11])),
        uses_chr_ram: chr_ram_size > 0,
        expansion: ExpansionDevice(raw[15] & 0b0011_1111),
        misc_rom_chips: raw[14] & 0b11,
    }
}

/// RAM-size nibbles encode `64 << n` bytes; zero means absent.
fn ram_size(nibble: u8) -> usize {
    if nibble == 0 {
        0
    } else {
        64usize << nibble
    }
}
