use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use nesrip::chr::{self, TILE_BYTES};
use nesrip::render;
use nesrip::rom::{ConsoleType, Rom, RomFormat, SectionSet};

/// Tiles per sheet row; one pattern-table row.
const SHEET_COLUMNS: usize = 16;

#[derive(Parser)]
#[command(version, about = "Dump iNES / NES 2.0 ROM sections and rip CHR tiles to PNG")]
struct Cli {
    /// Path to the .nes image
    rom: PathBuf,

    /// Output directory for dumps and images
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Write each section as a raw .bin file
    #[arg(long)]
    dump: bool,

    /// Write one grayscale PNG per CHR tile
    #[arg(long)]
    tiles: bool,

    /// Compose all CHR tiles into a single sprite-sheet PNG
    #[arg(long)]
    sheet: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let image = fs::read(&cli.rom).with_context(|| format!("reading {}", cli.rom.display()))?;
    let rom = Rom::parse(&image)?;
    print_report(&cli.rom, &image, &rom);

    if cli.dump || cli.tiles || cli.sheet {
        fs::create_dir_all(&cli.out)
            .with_context(|| format!("creating {}", cli.out.display()))?;
    }
    if cli.dump {
        dump_sections(&cli.out, &rom.sections)?;
    }

    if cli.tiles || cli.sheet {
        // A CHR decode failure leaves the report and dumps intact.
        match chr::decode_chr(rom.sections.chr_rom) {
            Ok(tiles) if tiles.is_empty() => println!("No CHR-ROM tiles to render."),
            Ok(tiles) => {
                if cli.tiles {
                    write_tiles(&cli.out, &tiles)?;
                }
                if cli.sheet {
                    write_sheet(&cli.out, &tiles)?;
                }
            }
            Err(err) => warn!("skipping tile rendering: {err}"),
        }
    }

    Ok(())
}

fn print_report(path: &Path, image: &[u8], rom: &Rom) {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let meta = &rom.metadata;

    println!("ROM: {name} ({} bytes)", image.len());
    println!(
        "Format: {}",
        match rom.format {
            RomFormat::INes => "iNES",
            RomFormat::Nes2 => "NES 2.0",
        }
    );
    match rom.format {
        RomFormat::INes => println!("Mapper: {}", meta.mapper),
        RomFormat::Nes2 => println!("Mapper: {} (submapper {})", meta.mapper, meta.submapper),
    }
    println!("Mirroring: {}", meta.mirroring);
    println!("Console: {}", meta.console);
    println!("Timing: {}", meta.timing);
    println!(
        "Battery-backed memory: {}",
        if meta.battery { "yes" } else { "no" }
    );
    if meta.prg_ram_size > 0 {
        println!("PRG-RAM: {} bytes", meta.prg_ram_size);
    }
    if meta.prg_nvram_size > 0 {
        println!("PRG-NVRAM: {} bytes", meta.prg_nvram_size);
    }
    if meta.uses_chr_ram {
        match meta.chr_ram_size {
            0 => println!("CHR-RAM: present (size not declared)"),
            size => println!("CHR-RAM: {size} bytes"),
        }
    }
    if meta.chr_nvram_size > 0 {
        println!("CHR-NVRAM: {} bytes", meta.chr_nvram_size);
    }
    if rom.format == RomFormat::Nes2 {
        println!("Default expansion device: {}", meta.expansion);
    }

    println!("Sections:");
    let sections = &rom.sections;
    let mut offset = 0usize;
    let mut section_line = |label: &str, bytes: &[u8]| {
        if !bytes.is_empty() {
            println!(
                "  {label}: {offset:#07X}..{:#07X} ({} bytes)",
                offset + bytes.len(),
                bytes.len()
            );
        }
        offset += bytes.len();
    };
    section_line("header", sections.header);
    section_line("trainer", sections.trainer.unwrap_or(&[]));
    section_line("PRG-ROM", sections.prg_rom);
    section_line("CHR-ROM", sections.chr_rom);
    section_line("misc ROM", sections.misc_rom);
    if meta.misc_rom_chips > 0 {
        println!("  misc ROM chips: {}", meta.misc_rom_chips);
    }
    if meta.console == ConsoleType::PlayChoice10 {
        if let Some(inst) = sections.play_choice_inst_rom {
            println!("  PlayChoice INST-ROM: {} bytes", inst.len());
        }
        if let Some(prom) = sections.play_choice_prom {
            println!("  PlayChoice PROM: {} bytes", prom.len());
        }
    }

    if sections.chr_rom.len() % TILE_BYTES == 0 {
        println!("CHR tiles: {}", sections.chr_rom.len() / TILE_BYTES);
    }
}

fn dump_sections(out: &Path, sections: &SectionSet) -> Result<()> {
    let dump = |file: &str, bytes: &[u8]| -> Result<()> {
        let path = out.join(file);
        fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))
    };
    dump("header.bin", sections.header)?;
    dump("prg_rom.bin", sections.prg_rom)?;
    dump("chr_rom.bin", sections.chr_rom)?;
    if let Some(trainer) = sections.trainer {
        dump("trainer.bin", trainer)?;
    }
    if let Some(prg_ram) = sections.prg_ram {
        dump("prg_ram.bin", prg_ram)?;
    }
    if !sections.misc_rom.is_empty() {
        dump("misc_rom.bin", sections.misc_rom)?;
    }
    if let Some(inst) = sections.play_choice_inst_rom {
        dump("playchoice_inst_rom.bin", inst)?;
    }
    if let Some(prom) = sections.play_choice_prom {
        dump("playchoice_prom.bin", prom)?;
    }
    Ok(())
}

fn write_tiles(out: &Path, tiles: &[chr::Tile]) -> Result<()> {
    for (index, tile) in tiles.iter().enumerate() {
        // Pattern table 0 ("left") is the first half of the tile sequence.
        let bank = if index < tiles.len() / 2 { "left" } else { "right" };
        let path = out.join(format!("tile{index:04}_{bank}.png"));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        render::write_tile_png(BufWriter::new(file), tile)
            .with_context(|| format!("encoding {}", path.display()))?;
    }
    println!("Wrote {} tile images.", tiles.len());
    Ok(())
}

fn write_sheet(out: &Path, tiles: &[chr::Tile]) -> Result<()> {
    let path = out.join("sheet.png");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    render::write_sheet_png(BufWriter::new(file), tiles, SHEET_COLUMNS)
        .with_context(|| format!("encoding {}", path.display()))?;
    println!("Wrote {}.", path.display());
    Ok(())
}
