use super::*;

/// Filter type 0: the scanline's bytes are stored as-is.
pub const FILTER_TYPE_NONE: u8 = 0;

/// Number of bytes [`filter_scanlines`] will produce for an image.
///
/// Each line is one filter type byte followed by 4 bytes per pixel.
#[inline]
#[must_use]
pub const fn filtered_len(width: u32, height: u32) -> Option<usize> {
  match IHDR::rgba8(width, height).bytes_per_filterline() {
    Some(per_line) => per_line.checked_mul(height as usize),
    None => None,
  }
}

/// Expands a validated raster into filtered PNG scanline data.
///
/// Every line gets [`FILTER_TYPE_NONE`], followed by the RGBA bytes of each
/// pixel's palette color. The output is what goes into the zlib compressor.
///
/// `palette` should be the same palette that the view was validated against.
///
/// ## Failure
/// * [`EncodeError::PaletteIndexOutOfRange`] if it wasn't, and the palette is
///   too short.
/// * [`EncodeError::CheckedMath`] if the output size doesn't fit in `usize`.
/// * [`EncodeError::Alloc`] if the output can't be allocated.
pub fn filter_scanlines<R, I>(
  view: RasterView<'_, R>, palette: &[RGBA8888],
) -> Result<Vec<u8>, EncodeError>
where
  R: AsRef<[I]>,
  I: Integer,
{
  let len = filtered_len(view.width(), view.height()).ok_or(EncodeError::CheckedMath)?;
  let mut filtered: Vec<u8> = Vec::new();
  filtered.try_reserve_exact(len)?;
  for (y, row) in view.rows().iter().enumerate() {
    filtered.push(FILTER_TYPE_NONE);
    for (x, i) in row.as_ref().iter().copied().enumerate() {
      // only reachable when called with a different palette than the view was
      // validated against.
      let color = usize::try_from(i.to_i128()).ok().and_then(|p| palette.get(p)).ok_or(
        EncodeError::PaletteIndexOutOfRange {
          row: y,
          column: x,
          index: i.to_i128(),
          palette_len: palette.len(),
        },
      )?;
      filtered.extend_from_slice(bytemuck::bytes_of(color));
    }
  }
  debug_assert_eq!(filtered.len(), len);
  log::trace!("png: filtered {} bytes of scanline data", filtered.len());
  Ok(filtered)
}

#[test]
fn test_filter_scanlines_layout() {
  let palette = [RGBA8888::new(1, 2, 3, 4), RGBA8888::new(5, 6, 7, 8)];
  let rows = [[0_u8, 1], [1, 1], [0, 0]];
  let view = validate_raster(&rows, &palette).unwrap();
  let filtered = filter_scanlines(view, &palette).unwrap();
  assert_eq!(filtered.len(), filtered_len(2, 3).unwrap());
  assert_eq!(filtered.len(), 3 * (1 + 2 * 4));
  assert_eq!(
    filtered,
    [
      0, 1, 2, 3, 4, 5, 6, 7, 8, //
      0, 5, 6, 7, 8, 5, 6, 7, 8, //
      0, 1, 2, 3, 4, 1, 2, 3, 4, //
    ]
  );
}

#[test]
fn test_filtered_len() {
  assert_eq!(filtered_len(1, 1), Some(5));
  assert_eq!(filtered_len(10, 2), Some(82));
}
