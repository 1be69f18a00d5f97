#![forbid(unsafe_code)]

//! Module for writing PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Automatic Encoding
//!
//! Just call [`encode`] with the rows of your raster and the palette.
//!
//! ```
//! use indexed_png::{png::encode, RGBA8888};
//! let palette = [RGBA8888::new(255, 0, 0, 255)];
//! let png: Vec<u8> = encode(&[[0_u8]], &palette).unwrap();
//! assert!(indexed_png::png::is_png_header_correct(&png));
//! ```
//!
//! ## Manual Encoding
//!
//! [`encode`] is only three calls in a row, and you can make them yourself if
//! you want to hold onto the intermediate data:
//!
//! 1) [`validate_raster`](crate::validate_raster) checks the raster's shape and
//!    indexes, and gives back a [`RasterView`](crate::RasterView) with the
//!    image's width and height.
//! 2) [`filter_scanlines`] turns the view into filtered scanline bytes, one
//!    filter type byte and then `width * 4` bytes of RGBA for each line.
//! 3) [`write_png`] compresses the scanline bytes and puts them into the PNG
//!    container.
//!
//! ## What Gets Written
//!
//! The output is always the smallest legal arrangement of a PNG:
//!
//! * The signature.
//! * An `IHDR`: bit depth 8, color type 6 (RGBA), no interlacing.
//! * Exactly one `IDAT`, holding the whole zlib stream.
//! * An `IEND`.
//!
//! There's no palette chunk (the palette is expanded into the pixels) and no
//! ancillary chunks of any kind. Every scanline uses filter type 0. The zlib
//! stream is always made at the same compression level, so encoding the same
//! input twice gives the same bytes.
//!
//! ## Checking The Output
//!
//! [`RawPngChunkIter`] walks the chunks of any byte slice, and each
//! [`PngRawChunk`] can check its own CRC. This is enough to check a PNG's
//! framing and header without decoding any pixels.

use core::fmt::{Debug, Write};

use alloc::vec::Vec;

use crate::{
  validate_raster, EncodeError, Integer, MalformedRaster, Palmap, RasterView, PNG_MAX_DIMENSION,
  RGBA8888,
};

mod crc32;
pub use crc32::*;

mod raw_chunk;
pub use raw_chunk::*;

mod ihdr;
pub use ihdr::*;

mod filter;
pub use filter::*;

mod writer;
pub use writer::*;

/// Encodes an indexed raster as a PNG.
///
/// * `rows` is the raster, top row first. All rows must be the same non-zero
///   length.
/// * `palette` gives the color of each index.
///
/// Either the whole PNG comes back, or an error does. See [`EncodeError`] for
/// what can go wrong.
pub fn encode<R, I>(rows: &[R], palette: &[RGBA8888]) -> Result<Vec<u8>, EncodeError>
where
  R: AsRef<[I]>,
  I: Integer,
{
  let view = validate_raster(rows, palette)?;
  let (width, height) = (view.width(), view.height());
  let filtered = filter_scanlines(view, palette)?;
  write_png(width, height, &filtered)
}

impl<I: Integer> Palmap<I> {
  /// Encodes this image as a PNG.
  ///
  /// The `indexes` must hold exactly `width * height` entries, otherwise this
  /// is a [`MalformedRaster::IndexCount`] error.
  pub fn to_png_bytes(&self) -> Result<Vec<u8>, EncodeError> {
    let expected = (self.width as usize)
      .checked_mul(self.height as usize)
      .ok_or(EncodeError::CheckedMath)?;
    match (self.width, self.height) {
      (0, _) => return Err(MalformedRaster::EmptyRow.into()),
      (_, 0) => return Err(MalformedRaster::NoRows.into()),
      _ if self.indexes.len() != expected => {
        return Err(MalformedRaster::IndexCount { expected, found: self.indexes.len() }.into())
      }
      _ => (),
    }
    let rows: Vec<&[I]> = self.rows().collect();
    encode(&rows, &self.palette)
  }
}
