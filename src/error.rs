use core::{fmt, num::TryFromIntError};

/// The ways that a raster can fail to be a proper rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedRaster {
  /// The raster has no rows at all.
  NoRows,
  /// The first row has no pixels, so the image would be zero pixels wide.
  EmptyRow,
  /// A row doesn't have the same length as the first row.
  RaggedRow {
    /// Which row (counting from 0 at the top).
    row: usize,
    /// The width set by the first row.
    expected: usize,
    /// The length this row actually had.
    found: usize,
  },
  /// A [`Palmap`](crate::Palmap) whose `indexes` don't fill exactly
  /// `width * height` entries.
  IndexCount {
    /// `width * height`
    expected: usize,
    /// `indexes.len()`
    found: usize,
  },
}

/// An error from the `indexed_png` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeError {
  /// The raster is empty or isn't rectangular.
  MalformedRaster(MalformedRaster),

  /// A raster cell names a palette entry that doesn't exist.
  ///
  /// Negative indexes end up here too.
  PaletteIndexOutOfRange {
    /// row of the bad cell
    row: usize,
    /// column of the bad cell
    column: usize,
    /// the index value found in the cell
    index: i128,
    /// number of entries the palette actually has
    palette_len: usize,
  },

  /// A palette channel given as a loose integer isn't within `0..=255`.
  ChannelOutOfRange {
    /// which palette entry
    entry: usize,
    /// which channel of the entry (0 = red ... 3 = alpha)
    channel: usize,
    /// the value found
    value: i128,
  },

  /// The image is too large.
  ///
  /// PNG limits the width, height, and each chunk's length to `2^31 - 1`.
  DimensionsTooLarge,

  /// Filtered scanline data isn't the length its image size calls for.
  ///
  /// Only [`write_png`](crate::png::write_png) can report this, when it's
  /// handed data that didn't come from a matching
  /// [`filter_scanlines`](crate::png::filter_scanlines) call.
  ScanlineLength {
    /// `height * (1 + width * 4)`
    expected: usize,
    /// the length actually given
    found: usize,
  },

  /// A checked math operation failed.
  CheckedMath,

  /// The allocator couldn't give us enough space.
  Alloc,

  /// The deflate compressor reported an internal error.
  CompressionFailure,
}
impl From<MalformedRaster> for EncodeError {
  #[inline]
  fn from(m: MalformedRaster) -> Self {
    Self::MalformedRaster(m)
  }
}
#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for EncodeError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TryFromIntError> for EncodeError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::DimensionsTooLarge
  }
}

impl fmt::Display for MalformedRaster {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NoRows => write!(f, "raster has no rows"),
      Self::EmptyRow => write!(f, "raster rows have no pixels"),
      Self::RaggedRow { row, expected, found } => {
        write!(f, "row {row} has {found} pixels, expected {expected}")
      }
      Self::IndexCount { expected, found } => {
        write!(f, "image has {found} indexes, expected {expected}")
      }
    }
  }
}
impl fmt::Display for EncodeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MalformedRaster(m) => write!(f, "malformed raster: {m}"),
      Self::PaletteIndexOutOfRange { row, column, index, palette_len } => write!(
        f,
        "palette index {index} at row {row}, column {column} is out of range for a palette of {palette_len} entries"
      ),
      Self::ChannelOutOfRange { entry, channel, value } => {
        write!(f, "palette entry {entry} channel {channel} has value {value}, outside 0..=255")
      }
      Self::DimensionsTooLarge => write!(f, "image dimensions exceed the PNG limit"),
      Self::ScanlineLength { expected, found } => {
        write!(f, "filtered scanline data is {found} bytes, expected {expected}")
      }
      Self::CheckedMath => write!(f, "image size computation overflowed"),
      Self::Alloc => write!(f, "allocation failed"),
      Self::CompressionFailure => write!(f, "deflate compression failed"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}
