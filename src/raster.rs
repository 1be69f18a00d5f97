#![forbid(unsafe_code)]

//! Indexed rasters and their validation.
//!
//! A raster is given as a slice of rows, and each row is a slice of palette
//! indexes. Anything that's `AsRef<[I]>` works as a row, so `&[Vec<u8>]`,
//! `&[[u16; 8]]`, and `&[&[i32]]` are all fine.

use crate::{EncodeError, Integer, MalformedRaster, RGBA8888};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// The largest width or height that PNG allows.
pub const PNG_MAX_DIMENSION: u32 = (1 << 31) - 1;

/// A raster which has passed [`validate_raster`].
///
/// Holding one of these means:
/// * `width` and `height` are both non-zero and within [`PNG_MAX_DIMENSION`].
/// * Every row has exactly `width` entries.
/// * Every entry is a valid position in the palette it was checked against.
#[derive(Debug)]
pub struct RasterView<'r, R> {
  width: u32,
  height: u32,
  rows: &'r [R],
}
impl<R> Clone for RasterView<'_, R> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}
impl<R> Copy for RasterView<'_, R> {}
impl<'r, R> RasterView<'r, R> {
  /// Width in pixels.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }
  /// Height in pixels.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }
  /// The validated rows.
  #[inline]
  #[must_use]
  pub const fn rows(&self) -> &'r [R] {
    self.rows
  }
}

#[inline]
fn palette_position<I: Integer>(i: I, palette_len: usize) -> Option<usize> {
  usize::try_from(i.to_i128()).ok().filter(|&p| p < palette_len)
}

/// Checks that a raster is a non-empty rectangle and that every index is in
/// bounds for the palette.
///
/// Cells are checked row by row, left to right, and the first problem found
/// is the one reported.
pub fn validate_raster<'r, R, I>(
  rows: &'r [R], palette: &[RGBA8888],
) -> Result<RasterView<'r, R>, EncodeError>
where
  R: AsRef<[I]>,
  I: Integer,
{
  let width = match rows.first() {
    None => return Err(MalformedRaster::NoRows.into()),
    Some(first) if first.as_ref().is_empty() => return Err(MalformedRaster::EmptyRow.into()),
    Some(first) => first.as_ref().len(),
  };
  for (row, r) in rows.iter().enumerate() {
    let found = r.as_ref().len();
    if found != width {
      log::debug!("raster: row {row} is {found} wide, expected {width}");
      return Err(MalformedRaster::RaggedRow { row, expected: width, found }.into());
    }
  }
  let width = u32::try_from(width)?;
  let height = u32::try_from(rows.len())?;
  if width > PNG_MAX_DIMENSION || height > PNG_MAX_DIMENSION {
    return Err(EncodeError::DimensionsTooLarge);
  }
  for (row, r) in rows.iter().enumerate() {
    for (column, i) in r.as_ref().iter().copied().enumerate() {
      if palette_position(i, palette.len()).is_none() {
        let index = i.to_i128();
        log::debug!("raster: index {index} at ({column},{row}) not in palette of {}", palette.len());
        return Err(EncodeError::PaletteIndexOutOfRange {
          row,
          column,
          index,
          palette_len: palette.len(),
        });
      }
    }
  }
  log::trace!("raster: validated {width}x{height} against {} palette entries", palette.len());
  Ok(RasterView { width, height, rows })
}

/// An owned indexed-color image.
///
/// Indexes are stored row-major, top row first.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct Palmap<I> {
  pub width: u32,
  pub height: u32,
  pub indexes: Vec<I>,
  pub palette: Vec<RGBA8888>,
}
#[cfg(feature = "alloc")]
impl<I: Integer> Palmap<I> {
  /// Validates rows of indexes against the palette and packs them up.
  pub fn try_from_rows<R: AsRef<[I]>>(
    rows: &[R], palette: Vec<RGBA8888>,
  ) -> Result<Self, EncodeError> {
    let view = validate_raster(rows, &palette)?;
    let count = (view.width() as usize)
      .checked_mul(view.height() as usize)
      .ok_or(EncodeError::CheckedMath)?;
    let mut indexes: Vec<I> = Vec::new();
    indexes.try_reserve(count)?;
    for r in view.rows() {
      indexes.extend_from_slice(r.as_ref());
    }
    Ok(Self { width: view.width(), height: view.height(), indexes, palette })
  }

  /// Gets the index at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<I> {
    if x < self.width && y < self.height {
      let i = (y as usize) * (self.width as usize) + (x as usize);
      self.indexes.get(i).copied()
    } else {
      None
    }
  }

  /// Iterates the rows of the image, top to bottom.
  ///
  /// If `indexes` doesn't hold a whole number of rows the partial row at the
  /// end is skipped.
  #[inline]
  pub fn rows(&self) -> core::slice::ChunksExact<'_, I> {
    self.indexes.chunks_exact((self.width as usize).max(1))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const PAL3: [RGBA8888; 3] =
    [RGBA8888::new(0, 0, 0, 255), RGBA8888::new(255, 255, 255, 255), RGBA8888::new(0, 0, 0, 0)];

  #[test]
  fn test_validate_accepts_rectangle() {
    let rows = [[0_u8, 1, 2], [2, 1, 0]];
    let view = validate_raster(&rows, &PAL3).unwrap();
    assert_eq!((view.width(), view.height()), (3, 2));
    assert_eq!(view.rows().len(), 2);
  }

  #[test]
  fn test_validate_rejects_ragged() {
    let rows: [&[u8]; 2] = [&[0, 0], &[0]];
    assert_eq!(
      validate_raster(&rows, &PAL3).unwrap_err(),
      EncodeError::MalformedRaster(MalformedRaster::RaggedRow { row: 1, expected: 2, found: 1 })
    );
  }

  #[test]
  fn test_validate_rejects_empty() {
    let no_rows: [[u8; 1]; 0] = [];
    assert_eq!(
      validate_raster(&no_rows, &PAL3).unwrap_err(),
      EncodeError::MalformedRaster(MalformedRaster::NoRows)
    );
    let empty_rows: [[u8; 0]; 2] = [[], []];
    assert_eq!(
      validate_raster(&empty_rows, &PAL3).unwrap_err(),
      EncodeError::MalformedRaster(MalformedRaster::EmptyRow)
    );
  }

  #[test]
  fn test_validate_rejects_bad_index() {
    let rows = [[0_u32, 1], [5, 0]];
    assert_eq!(
      validate_raster(&rows, &PAL3).unwrap_err(),
      EncodeError::PaletteIndexOutOfRange { row: 1, column: 0, index: 5, palette_len: 3 }
    );
    let rows = [[0_i32, -1]];
    assert_eq!(
      validate_raster(&rows, &PAL3).unwrap_err(),
      EncodeError::PaletteIndexOutOfRange { row: 0, column: 1, index: -1, palette_len: 3 }
    );
    // an empty palette can't satisfy any index.
    let rows = [[0_u8]];
    assert!(matches!(
      validate_raster(&rows, &[]),
      Err(EncodeError::PaletteIndexOutOfRange { palette_len: 0, .. })
    ));
  }

  #[test]
  fn test_shape_checked_before_indexes() {
    let rows: [&[u8]; 2] = [&[9, 9], &[9]];
    assert!(matches!(validate_raster(&rows, &PAL3), Err(EncodeError::MalformedRaster(_))));
  }

  #[test]
  #[cfg(feature = "alloc")]
  fn test_palmap_from_rows() {
    let rows = [[0_u8, 1, 2], [2, 1, 0]];
    let palmap = Palmap::try_from_rows(&rows, PAL3.to_vec()).unwrap();
    assert_eq!(palmap.width, 3);
    assert_eq!(palmap.height, 2);
    assert_eq!(palmap.indexes, [0, 1, 2, 2, 1, 0]);
    assert_eq!(palmap.get(0, 1), Some(2));
    assert_eq!(palmap.get(3, 0), None);
    assert_eq!(palmap.get(0, 2), None);
    let collected: Vec<&[u8]> = palmap.rows().collect();
    assert_eq!(collected, [&[0, 1, 2][..], &[2, 1, 0][..]]);
  }
}
