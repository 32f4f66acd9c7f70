//! Section extractor for the original iNES layout.
//!
//! iNES declares sizes in whole 16 KiB / 8 KiB banks and leaves most of the
//! header unused. Extraction is best-effort by design: a size mismatch is
//! reported as a warning and the sections are sliced as declared, clamped to
//! the image, so downstream consumers can still work with damaged dumps.

use crate::bits::{high_nibble, is_bit_set, merge_nibbles};
use crate::error::ParseWarning;
use crate::rom::header::{Flags6, Flags7, HeaderFields, HEADER_LEN};
use crate::rom::metadata::{ConsoleType, ExpansionDevice, Mirroring, RomMetadata, Timing};
use crate::rom::section::{battery_window, SectionSet, TRAINER_LEN};

/// PRG-ROM size unit: 16 KiB banks.
pub const PRG_UNIT: usize = 16 * 1024;
/// CHR-ROM size unit: 8 KiB banks.
pub const CHR_UNIT: usize = 8 * 1024;
/// PRG-RAM declared-size unit (header byte 8): 8 KiB.
const PRG_RAM_UNIT: usize = 8 * 1024;

/// PlayChoice-10 dumps append an 8 KiB INST-ROM and 32 PROM bytes after the
/// CHR-ROM; the layout reserves exactly this much.
const PLAYCHOICE_INST_LEN: usize = 8 * 1024;
const PLAYCHOICE_PROM_LEN: usize = 32;

/// Partitions an iNES image and derives its metadata.
///
/// Never fails: the signature was already validated and everything else
/// degrades to warnings plus clamped slices.
pub(crate) fn extract(
    image: &[u8],
    header: HeaderFields,
) -> (SectionSet<'_>, RomMetadata, Vec<ParseWarning>) {
    let mut warnings = Vec::new();
    let flags6 = header.flags6();
    let raw = header.raw();

    let prg_len = header.prg_units() as usize * PRG_UNIT;
    let chr_len = header.chr_units() as usize * CHR_UNIT;
    // Zero CHR banks means the board carries CHR-RAM; iNES does not say how
    // much.
    let uses_chr_ram = header.chr_units() == 0;
    let trainer_len = if flags6.contains(Flags6::TRAINER) {
        TRAINER_LEN
    } else {
        0
    };

    let body_len = image.len() - HEADER_LEN;
    let declared = trainer_len + prg_len + chr_len;
    if declared != body_len {
        warnings.push(ParseWarning::SizeMismatch {
            declared,
            actual: body_len,
        });
    }
    for (index, &value) in raw.iter().enumerate().skip(8) {
        if value != 0 {
            warnings.push(ParseWarning::NonZeroPadding { index, value });
        }
    }

    let trainer_end = (HEADER_LEN + trainer_len).min(image.len());
    let prg_end = (trainer_end + prg_len).min(image.len());
    let chr_end = (prg_end + chr_len).min(image.len());

    let metadata = derive_metadata(header, uses_chr_ram);

    // The iNES layout does not model anything past CHR-ROM, with one
    // exception: PlayChoice-10 dumps whose remainder is exactly the reserved
    // INST-ROM + PROM layout.
    let remainder = &image[chr_end..];
    let (play_choice_inst_rom, play_choice_prom) = if metadata.console == ConsoleType::PlayChoice10
        && remainder.len() == PLAYCHOICE_INST_LEN + PLAYCHOICE_PROM_LEN
    {
        let (inst, prom) = remainder.split_at(PLAYCHOICE_INST_LEN);
        (Some(inst), Some(prom))
    } else {
        (None, None)
    };

    let chr_ram: Option<&[u8]> = if uses_chr_ram { Some(&[]) } else { None };
    let sections = SectionSet {
        header: &image[..HEADER_LEN],
        trainer: (trainer_len > 0).then(|| &image[HEADER_LEN..trainer_end]),
        prg_rom: &image[trainer_end..prg_end],
        chr_rom: &image[prg_end..chr_end],
        prg_ram: metadata.battery.then(|| battery_window(image)),
        chr_ram,
        misc_rom: &[],
        play_choice_inst_rom,
        play_choice_prom,
    };

    (sections, metadata, warnings)
}

fn derive_metadata(header: HeaderFields, uses_chr_ram: bool) -> RomMetadata {
    let flags6 = header.flags6();
    let flags7 = header.flags7();
    let raw = header.raw();

    let mirroring = if flags6.contains(Flags6::FOUR_SCREEN) {
        Mirroring::FourScreen
    } else if flags6.contains(Flags6::VERTICAL_MIRRORING) {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    };

    let console = if flags7.contains(Flags7::VS_SYSTEM) {
        ConsoleType::VsSystem
    } else if flags7.contains(Flags7::PLAYCHOICE_10) {
        ConsoleType::PlayChoice10
    } else {
        ConsoleType::NesFamicom
    };

    // Byte 9 bit 0 is the original TV-system flag; byte 10 is a later,
    // rarely-honored refinement consulted only when byte 9 claims NTSC.
    let timing = if is_bit_set(raw[9], 0) {
        Timing::Pal
    } else {
        match raw[10] & 0b11 {
            0 => Timing::Ntsc,
            2 => Timing::Pal,
            _ => Timing::MultiRegion,
        }
    };

    // Byte 8 declares PRG-RAM in 8 KiB units; zero reads as one unit for
    // compatibility.
    let prg_ram_units = raw[8].max(1) as usize;

    RomMetadata {
        mapper: merge_nibbles(high_nibble(raw[7]), high_nibble(raw[6])) as u16,
        submapper: 0,
        mirroring,
        battery: flags6.contains(Flags6::BATTERY),
        console,
        timing,
        prg_ram_size: prg_ram_units * PRG_RAM_UNIT,
        prg_nvram_size: 0,
        chr_ram_size: 0,
        chr_nvram_size: 0,
        uses_chr_ram,
        expansion: ExpansionDevice(0),
        misc_rom_chips: 0,
    }
}
