//! Tile rendering: 2-bit pixel indices to grayscale PNG images.
//!
//! Consumes the decoder's [`Tile`] values; it never looks back at the ROM
//! image. Tiles keep their CHR-ROM order, left to right and top to bottom,
//! in sheet composition.

use std::io::Write;

use crate::chr::{Tile, TILE_DIM};

/// The four pixel indices spread evenly over the 8-bit grayscale range.
pub const GRAY_RAMP: [u8; 4] = [0, 85, 170, 255];

/// Maps a tile's pixel indices onto the grayscale ramp.
pub fn tile_luma(tile: &Tile) -> [u8; TILE_DIM * TILE_DIM] {
    let mut luma = [0u8; TILE_DIM * TILE_DIM];
    for (out, &pixel) in luma.iter_mut().zip(tile.pixels()) {
        *out = GRAY_RAMP[pixel as usize];
    }
    luma
}

/// Writes a single tile as an 8x8 grayscale PNG.
pub fn write_tile_png<W: Write>(writer: W, tile: &Tile) -> Result<(), png::EncodingError> {
    write_gray_png(writer, TILE_DIM as u32, TILE_DIM as u32, &tile_luma(tile))
}

/// Composes tiles into a sprite-sheet grid of `columns` tiles per row (the
/// last row padded with blank pixels) and writes it as one grayscale PNG.
/// Writes nothing for an empty tile list.
pub fn write_sheet_png<W: Write>(
    writer: W,
    tiles: &[Tile],
    columns: usize,
) -> Result<(), png::EncodingError> {
    assert!(columns > 0, "sheet needs at least one column");
    if tiles.is_empty() {
        return Ok(());
    }

    let rows = (tiles.len() + columns - 1) / columns;
    let width = columns * TILE_DIM;
    let height = rows * TILE_DIM;
    let mut luma = vec![0u8; width * height];

    for (index, tile) in tiles.iter().enumerate() {
        let pixels = tile_luma(tile);
        let origin_x = (index % columns) * TILE_DIM;
        let origin_y = (index / columns) * TILE_DIM;
        for row in 0..TILE_DIM {
            let dest = (origin_y + row) * width + origin_x;
            luma[dest..dest + TILE_DIM]
                .copy_from_slice(&pixels[row * TILE_DIM..(row + 1) * TILE_DIM]);
        }
    }

    write_gray_png(writer, width as u32, height as u32, &luma)
}

fn write_gray_png<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    luma: &[u8],
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.write_header()?.write_image_data(luma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chr::TILE_BYTES;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn solid_tile(low_byte: u8, high_byte: u8) -> Tile {
        let mut group = [0u8; TILE_BYTES];
        group[..8].fill(low_byte);
        group[8..].fill(high_byte);
        Tile::decode(&group)
    }

    #[test]
    fn luma_uses_the_gray_ramp() {
        assert_eq!(tile_luma(&solid_tile(0x00, 0x00)), [0u8; 64]);
        assert_eq!(tile_luma(&solid_tile(0xFF, 0x00)), [85u8; 64]);
        assert_eq!(tile_luma(&solid_tile(0x00, 0xFF)), [170u8; 64]);
        assert_eq!(tile_luma(&solid_tile(0xFF, 0xFF)), [255u8; 64]);
    }

    #[test]
    fn tile_png_has_the_png_signature() {
        let mut bytes = Vec::new();
        write_tile_png(&mut bytes, &solid_tile(0, 0)).unwrap();
        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }

    #[test]
    fn sheet_grid_dimensions_and_placement() {
        // Three tiles in two columns: 16x16 sheet, bottom-right blank.
        let tiles = [
            solid_tile(0xFF, 0xFF),
            solid_tile(0xFF, 0x00),
            solid_tile(0x00, 0xFF),
        ];
        let mut bytes = Vec::new();
        write_sheet_png(&mut bytes, &tiles, 2).unwrap();

        let decoder = png::Decoder::new(&bytes[..]);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (16, 16));

        let sheet = &buf[..info.buffer_size()];
        assert_eq!(sheet[0], 255); // tile 0, top-left
        assert_eq!(sheet[8], 85); // tile 1 starts at column 8
        assert_eq!(sheet[8 * 16], 170); // tile 2 starts at row 8
        assert_eq!(sheet[8 * 16 + 8], 0); // padded corner stays blank
    }

    #[test]
    fn empty_tile_list_writes_nothing() {
        let mut bytes = Vec::new();
        write_sheet_png(&mut bytes, &[], 16).unwrap();
        assert!(bytes.is_empty());
    }
}
