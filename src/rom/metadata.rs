//! Descriptive metadata derived from the header, and the static lookup
//! tables behind it.
//!
//! The tables map raw flag codes to the names the NES 2.0 specification
//! assigns them. They are pure data; every unmapped code resolves to
//! an explicit "Unknown/Undefined" rather than an error.

use std::fmt;

/// Nametable arrangement requested by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    /// Horizontal arrangement, unless the mapper overrides it.
    Horizontal,
    Vertical,
    /// Cartridge supplies four-screen VRAM; the mirroring bit is ignored.
    FourScreen,
}

impl fmt::Display for Mirroring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mirroring::Horizontal => "horizontal (or mapper controlled)",
            Mirroring::Vertical => "vertical",
            Mirroring::FourScreen => "four-screen VRAM",
        })
    }
}

/// Console the image targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleType {
    NesFamicom,
    VsSystem,
    PlayChoice10,
    /// NES 2.0 extended console type: the 2-bit selector from byte 7 plus the
    /// Vs. System PPU/hardware codes from byte 13's nibbles.
    Extended {
        console: u8,
        vs_ppu: u8,
        vs_hardware: u8,
    },
}

impl fmt::Display for ConsoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConsoleType::NesFamicom => f.write_str("Nintendo Entertainment System/Family Computer"),
            ConsoleType::VsSystem => f.write_str("Nintendo Vs. System"),
            ConsoleType::PlayChoice10 => f.write_str("Nintendo PlayChoice-10"),
            ConsoleType::Extended { console, vs_ppu, vs_hardware } => write!(
                f,
                "{} (Vs. PPU: {}, Vs. hardware: {})",
                extended_console_description(console),
                vs_ppu_description(vs_ppu),
                vs_hardware_description(vs_hardware),
            ),
        }
    }
}

/// CPU/PPU timing, which doubles as the release region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Ntsc,
    Pal,
    MultiRegion,
    Dendy,
    Unknown,
}

impl Timing {
    /// NES 2.0 header byte 12, bits 0-1.
    pub fn from_nes2_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Timing::Ntsc,
            1 => Timing::Pal,
            2 => Timing::MultiRegion,
            3 => Timing::Dendy,
            _ => Timing::Unknown,
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Timing::Ntsc => "NTSC (RP2C02)",
            Timing::Pal => "PAL (RP2C07)",
            Timing::MultiRegion => "multi-region",
            Timing::Dendy => "Dendy (UMC 6527P)",
            Timing::Unknown => "unknown",
        })
    }
}

/// Default expansion device code (NES 2.0 header byte 15, bits 0-5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionDevice(pub u8);

impl ExpansionDevice {
    pub fn description(self) -> &'static str {
        EXPANSION_DEVICES
            .get(self.0 as usize)
            .copied()
            .unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for ExpansionDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Everything the header says about the cartridge beyond raw section bytes.
/// Computed once per image and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomMetadata {
    /// Mapper number; 0-255 for iNES, 0-4095 for NES 2.0.
    pub mapper: u16,
    /// NES 2.0 submapper; always 0 for iNES.
    pub submapper: u8,
    pub mirroring: Mirroring,
    /// Battery-backed (or otherwise non-volatile) memory present.
    pub battery: bool,
    pub console: ConsoleType,
    pub timing: Timing,
    /// PRG-RAM size in bytes (iNES: declared in 8 KiB units by byte 8).
    pub prg_ram_size: usize,
    /// NES 2.0 only; 0 when absent.
    pub prg_nvram_size: usize,
    /// NES 2.0 only; 0 when absent. iNES boards report CHR-RAM presence via
    /// `uses_chr_ram` without a size.
    pub chr_ram_size: usize,
    /// NES 2.0 only; 0 when absent.
    pub chr_nvram_size: usize,
    /// The board uses CHR-RAM rather than CHR-ROM.
    pub uses_chr_ram: bool,
    pub expansion: ExpansionDevice,
    /// Number of miscellaneous ROM chips (NES 2.0 header byte 14, bits 0-1).
    pub misc_rom_chips: u8,
}

const UNKNOWN: &str = "Unknown/Undefined";

/// NES 2.0 extended console types. Codes 0-2 are taken by the regular
/// consoles, so the table starts being meaningful at 3.
pub fn extended_console_description(code: u8) -> &'static str {
    match code {
        3 => "Regular Famiclone, but with CPU that supports Decimal Mode (e.g. Bit Corporation Creator)",
        4 => "V.R. Technology VT01 with monochrome palette",
        5 => "V.R. Technology VT01 with red/cyan STN palette",
        6 => "V.R. Technology VT02",
        7 => "V.R. Technology VT03",
        8 => "V.R. Technology VT09",
        9 => "V.R. Technology VT32",
        10 => "V.R. Technology VT369",
        11 => "UMC UM6578",
        _ => UNKNOWN,
    }
}

/// Vs. System PPU types (NES 2.0 header byte 13, low nibble).
pub fn vs_ppu_description(code: u8) -> &'static str {
    VS_PPU_TYPES.get(code as usize).copied().unwrap_or(UNKNOWN)
}

static VS_PPU_TYPES: [&str; 13] = [
    "RP2C03B",
    "RP2C03G",
    "RP2C04-0001",
    "RP2C04-0002",
    "RP2C04-0003",
    "RP2C04-0004",
    "RC2C03B",
    "RC2C03C",
    "RC2C05-01 ($2002 AND $?? =$1B)",
    "RC2C05-02 ($2002 AND $3F =$3D)",
    "RC2C05-03 ($2002 AND $1F =$1C)",
    "RC2C05-04 ($2002 AND $1F =$1B)",
    "RC2C05-05 ($2002 AND $1F =unknown)",
];

/// Vs. System hardware variants (NES 2.0 header byte 13, high nibble).
pub fn vs_hardware_description(code: u8) -> &'static str {
    VS_HARDWARE_TYPES.get(code as usize).copied().unwrap_or(UNKNOWN)
}

static VS_HARDWARE_TYPES: [&str; 7] = [
    "Vs. Unisystem (normal)",
    "Vs. Unisystem (RBI Baseball protection)",
    "Vs. Unisystem (TKO Boxing protection)",
    "Vs. Unisystem (Super Xevious protection)",
    "Vs. Unisystem (Vs. Ice Climber Japan protection)",
    "Vs. Dual System (normal)",
    "Vs. Dual System (Raid on Bungeling Bay protection)",
];

static EXPANSION_DEVICES: [&str; 53] = [
    "Unspecified",
    "Standard NES/Famicom controllers",
    "NES Four Score/Satellite with two additional standard controllers",
    "Famicom Four Players Adapter with two additional standard controllers",
    "Vs. System",
    "Vs. System with reversed inputs",
    "Vs. Pinball (Japan)",
    "Vs. Zapper",
    "Zapper ($4017)",
    "Two Zappers",
    "Bandai Hyper Shot Lightgun",
    "Power Pad Side A",
    "Power Pad Side B",
    "Family Trainer Side A",
    "Family Trainer Side B",
    "Arkanoid Vaus Controller (NES)",
    "Arkanoid Vaus Controller (Famicom)",
    "Two Vaus Controllers plus Famicom Data Recorder",
    "Konami Hyper Shot Controller",
    "Coconuts Pachinko Controller",
    "Exciting Boxing Punching Bag (Blowup Doll)",
    "Jissen Mahjong Controller",
    "Party Tap",
    "Oeka Kids Tablet",
    "Sunsoft Barcode Battler",
    "Miracle Piano Keyboard",
    "Pokkun Moguraa (Whack-a-Mole Mat and Mallet)",
    "Top Rider (Inflatable Bicycle)",
    "Double-Fisted (Requires or allows use of two controllers by one player)",
    "Famicom 3D System",
    "Doremikko Keyboard",
    "R.O.B. Gyro Set",
    "Famicom Data Recorder (don't emulate keyboard)",
    "ASCII Turbo File",
    "IGS Storage Battle Box",
    "Family BASIC Keyboard plus Famicom Data Recorder",
    "Dongda PEC-586 Keyboard",
    "Bit Corp. Bit-79 Keyboard",
    "Subor Keyboard",
    "Subor Keyboard plus mouse (3x8-bit protocol)",
    "Subor Keyboard plus mouse (24-bit protocol)",
    "SNES Mouse ($4017.d0)",
    "Multicart",
    "Two SNES controllers replacing the two standard NES controllers",
    "RacerMate Bicycle",
    "U-Force",
    "R.O.B. Stack-Up",
    "City Patrolman Lightgun",
    "Sharp C1 Cassette Interface",
    "Standard Controller with swapped Left-Right/Up-Down/B-A",
    "Excalibor Sudoku Pad",
    "ABL Pinball",
    "Golden Nugget Casino extra buttons",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_codes_resolve_to_unknown() {
        assert_eq!(extended_console_description(0), UNKNOWN);
        assert_eq!(extended_console_description(12), UNKNOWN);
        assert_eq!(vs_ppu_description(13), UNKNOWN);
        assert_eq!(vs_hardware_description(7), UNKNOWN);
        assert_eq!(ExpansionDevice(53).description(), UNKNOWN);
        assert_eq!(ExpansionDevice(0x3F).description(), UNKNOWN);
    }

    #[test]
    fn known_codes_resolve_to_their_names() {
        assert_eq!(vs_ppu_description(0), "RP2C03B");
        assert_eq!(vs_hardware_description(5), "Vs. Dual System (normal)");
        assert_eq!(ExpansionDevice(8).description(), "Zapper ($4017)");
        assert_eq!(
            ExpansionDevice(52).description(),
            "Golden Nugget Casino extra buttons"
        );
        assert_eq!(extended_console_description(11), "UMC UM6578");
    }

    #[test]
    fn nes2_timing_covers_all_codes() {
        assert_eq!(Timing::from_nes2_bits(0), Timing::Ntsc);
        assert_eq!(Timing::from_nes2_bits(1), Timing::Pal);
        assert_eq!(Timing::from_nes2_bits(2), Timing::MultiRegion);
        assert_eq!(Timing::from_nes2_bits(3), Timing::Dendy);
        // Higher bits are masked off before the lookup.
        assert_eq!(Timing::from_nes2_bits(0b111), Timing::Dendy);
    }
}
