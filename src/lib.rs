//! Decode NES cartridge dumps (iNES / NES 2.0) into their memory sections
//! and rip the CHR-ROM into 8x8 2-bit tiles.
//!
//! The pipeline: [`rom::Rom::parse`] classifies the header and partitions the
//! image into a borrowed [`rom::SectionSet`] plus derived [`rom::RomMetadata`];
//! [`chr::decode_chr`] turns the CHR-ROM section into [`chr::Tile`] values;
//! [`render`] turns tiles into grayscale PNGs. Everything is synchronous and
//! side-effect free; the image buffer is only ever borrowed read-only.

pub mod bits;
pub mod chr;
pub mod error;
pub mod render;
pub mod rom;

pub use chr::{decode_chr, Tile};
pub use error::{ParseWarning, RomError};
pub use rom::{Rom, RomFormat};
