//! End-to-end decoding of synthetic ROM images.

use nesrip::chr::decode_chr;
use nesrip::rom::{ConsoleType, Mirroring, Rom, RomFormat, Timing};
use nesrip::RomError;

const PRG_BANK: usize = 16 * 1024;
const CHR_BANK: usize = 8 * 1024;

fn image(header_tail: &[(usize, u8)], body_len: usize) -> Vec<u8> {
    let mut image = b"NES\x1A".to_vec();
    image.resize(16, 0);
    for &(index, value) in header_tail {
        image[index] = value;
    }
    image.resize(16 + body_len, 0);
    image
}

#[test]
fn minimal_ines_rom_decodes_to_blank_tiles() {
    let image = image(&[(4, 1), (5, 1)], PRG_BANK + CHR_BANK);
    let rom = Rom::parse(&image).unwrap();

    assert_eq!(rom.format, RomFormat::INes);
    assert!(rom.warnings.is_empty());
    assert_eq!(rom.sections.prg_rom.len(), PRG_BANK);
    assert_eq!(rom.sections.chr_rom.len(), CHR_BANK);
    assert_eq!(rom.metadata.mapper, 0);
    assert_eq!(rom.metadata.mirroring, Mirroring::Horizontal);
    assert_eq!(rom.metadata.console, ConsoleType::NesFamicom);
    assert_eq!(rom.metadata.timing, Timing::Ntsc);

    let tiles = decode_chr(rom.sections.chr_rom).unwrap();
    assert_eq!(tiles.len(), 512);
    assert!(tiles
        .iter()
        .all(|tile| tile.pixels().iter().all(|&p| p == 0)));
}

#[test]
fn nes2_rom_with_trainer_and_misc_rom() {
    let mut image = image(
        &[
            (4, 1),
            (5, 1),
            (6, 0b0000_0100), // trainer
            (7, 0b0000_1000), // NES 2.0
            (12, 0x03),       // Dendy
            (14, 0x01),
        ],
        512 + PRG_BANK + CHR_BANK,
    );
    image.extend(vec![0xEEu8; 64]); // miscellaneous ROM

    let rom = Rom::parse(&image).unwrap();
    assert_eq!(rom.format, RomFormat::Nes2);
    assert!(rom.warnings.is_empty());
    assert_eq!(rom.sections.trainer.unwrap().len(), 512);
    assert_eq!(rom.sections.prg_rom.len(), PRG_BANK);
    assert_eq!(rom.sections.chr_rom.len(), CHR_BANK);
    assert_eq!(rom.sections.misc_rom.len(), 64);
    assert_eq!(rom.metadata.timing, Timing::Dendy);
    assert_eq!(rom.metadata.misc_rom_chips, 1);

    // The file-order sections partition the whole image.
    let partitioned = rom.sections.header.len()
        + rom.sections.trainer.unwrap().len()
        + rom.sections.prg_rom.len()
        + rom.sections.chr_rom.len()
        + rom.sections.misc_rom.len();
    assert_eq!(partitioned, image.len());
}

#[test]
fn garbage_is_not_a_rom() {
    assert_eq!(
        Rom::parse(b"definitely not a cartridge image").unwrap_err(),
        RomError::NotARom
    );
}

#[test]
fn chr_failure_leaves_sections_usable() {
    // One PRG bank, CHR declared as one bank but truncated mid-tile.
    let image = image(&[(4, 1), (5, 1)], PRG_BANK + 24);
    let rom = Rom::parse(&image).unwrap();

    assert!(!rom.warnings.is_empty());
    assert_eq!(rom.sections.prg_rom.len(), PRG_BANK);
    assert_eq!(rom.sections.chr_rom.len(), 24);
    assert_eq!(
        decode_chr(rom.sections.chr_rom).unwrap_err(),
        RomError::InvalidChrLength(24)
    );
    // PRG-ROM and metadata stay valid regardless.
    assert_eq!(rom.metadata.mapper, 0);
}
