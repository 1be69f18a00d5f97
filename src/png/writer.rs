use super::*;

use miniz_oxide::deflate::core::{
  compress, create_comp_flags_from_zip_params, CompressorOxide, TDEFLFlush, TDEFLStatus,
};

/// The 8 bytes that every PNG data stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// The compression level used for image data.
///
/// This is zlib's default level. It's fixed so that the same image always
/// encodes to the same bytes.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Compresses bytes into a zlib data stream.
///
/// ## Failure
/// * [`EncodeError::CompressionFailure`] if the compressor reports an error
///   status.
/// * [`EncodeError::Alloc`] if the output buffer can't grow.
pub fn zlib_compress(data: &[u8], level: u8) -> Result<Vec<u8>, EncodeError> {
  // positive window bits selects a zlib header and adler32 trailer.
  let flags = create_comp_flags_from_zip_params(i32::from(level), 1, 0);
  let mut compressor = CompressorOxide::new(flags);
  let mut out: Vec<u8> = Vec::new();
  let start_len = (data.len() / 2).max(64);
  out.try_reserve_exact(start_len)?;
  out.resize(start_len, 0);
  let mut in_pos = 0;
  let mut out_pos = 0;
  loop {
    let (status, bytes_in, bytes_out) =
      compress(&mut compressor, &data[in_pos..], &mut out[out_pos..], TDEFLFlush::Finish);
    in_pos += bytes_in;
    out_pos += bytes_out;
    match status {
      TDEFLStatus::Done => {
        out.truncate(out_pos);
        log::trace!("png: compressed {} bytes to {}", data.len(), out.len());
        return Ok(out);
      }
      TDEFLStatus::Okay => {
        if out.len() - out_pos < 32 {
          let extra = out.len();
          out.try_reserve_exact(extra)?;
          out.resize(out.len() + extra, 0);
        }
      }
      other => {
        log::error!("png: compressor failed with {other:?}");
        return Err(EncodeError::CompressionFailure);
      }
    }
  }
}

/// Appends one complete chunk (length, type, data, CRC) to `out`.
///
/// ## Failure
/// * [`EncodeError::DimensionsTooLarge`] if `data` is longer than PNG allows
///   for a single chunk.
/// * [`EncodeError::Alloc`] if `out` can't grow.
pub fn write_chunk(
  out: &mut Vec<u8>, chunk_type: PngChunkType, data: &[u8],
) -> Result<(), EncodeError> {
  let len = u32::try_from(data.len())?;
  if len > PNG_MAX_DIMENSION {
    return Err(EncodeError::DimensionsTooLarge);
  }
  out.try_reserve(12 + data.len())?;
  out.extend_from_slice(&len.to_be_bytes());
  out.extend_from_slice(&chunk_type.0);
  out.extend_from_slice(data);
  out.extend_from_slice(&chunk_crc(chunk_type.0, data).to_be_bytes());
  Ok(())
}

/// Wraps filtered scanline data into a complete PNG.
///
/// The output is the signature, an `IHDR` for an 8-bit RGBA image of the given
/// size, a single `IDAT` with all of the compressed data, and an `IEND`.
///
/// `filtered` must be exactly what [`filter_scanlines`] gives for an image of
/// this size: `height` lines of one filter byte plus `width * 4` color bytes.
///
/// ## Failure
/// * [`MalformedRaster::EmptyRow`] if `width` is 0, and
///   [`MalformedRaster::NoRows`] if `height` is 0.
/// * [`EncodeError::DimensionsTooLarge`] if either dimension is over
///   [`PNG_MAX_DIMENSION`].
/// * [`EncodeError::ScanlineLength`] if `filtered` is the wrong length.
/// * [`EncodeError::CheckedMath`] if the expected length overflows `usize`.
/// * Anything that [`zlib_compress`] or [`write_chunk`] can return.
pub fn write_png(width: u32, height: u32, filtered: &[u8]) -> Result<Vec<u8>, EncodeError> {
  if width == 0 {
    return Err(MalformedRaster::EmptyRow.into());
  }
  if height == 0 {
    return Err(MalformedRaster::NoRows.into());
  }
  if width > PNG_MAX_DIMENSION || height > PNG_MAX_DIMENSION {
    return Err(EncodeError::DimensionsTooLarge);
  }
  let expected = filtered_len(width, height).ok_or(EncodeError::CheckedMath)?;
  if filtered.len() != expected {
    log::debug!("png: got {} bytes of scanlines for {width}x{height}", filtered.len());
    return Err(EncodeError::ScanlineLength { expected, found: filtered.len() });
  }
  let ihdr = IHDR::rgba8(width, height);
  let compressed = zlib_compress(filtered, DEFAULT_COMPRESSION_LEVEL)?;
  let mut png: Vec<u8> = Vec::new();
  png.try_reserve_exact(PNG_SIGNATURE.len() + 25 + 12 + compressed.len() + 12)?;
  png.extend_from_slice(&PNG_SIGNATURE);
  write_chunk(&mut png, PngChunkType::IHDR, &ihdr.to_bytes())?;
  write_chunk(&mut png, PngChunkType::IDAT, &compressed)?;
  write_chunk(&mut png, PngChunkType::IEND, &[])?;
  log::trace!("png: wrote {width}x{height} image, {} bytes", png.len());
  Ok(png)
}

#[test]
fn test_write_chunk_framing() {
  let mut out = Vec::new();
  write_chunk(&mut out, PngChunkType::IEND, &[]).unwrap();
  assert_eq!(out, [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);

  let mut out = Vec::new();
  write_chunk(&mut out, PngChunkType(*b"abCd"), &[9, 8, 7]).unwrap();
  assert_eq!(&out[..11], &[0, 0, 0, 3, b'a', b'b', b'C', b'd', 9, 8, 7]);
  assert_eq!(out[11..], chunk_crc(*b"abCd", &[9, 8, 7]).to_be_bytes());
}

#[test]
fn test_zlib_compress_inflates_back() {
  let data: Vec<u8> = (0..5000_u32).map(|i| (i % 7) as u8).collect();
  let z = zlib_compress(&data, DEFAULT_COMPRESSION_LEVEL).unwrap();
  // zlib header: deflate with a 32k window
  assert_eq!(z[0], 0x78);
  assert_eq!(((u16::from(z[0]) << 8) | u16::from(z[1])) % 31, 0);
  assert!(z.len() < data.len());
  assert_eq!(miniz_oxide::inflate::decompress_to_vec_zlib(&z).unwrap(), data);
  let empty = zlib_compress(&[], DEFAULT_COMPRESSION_LEVEL).unwrap();
  assert!(miniz_oxide::inflate::decompress_to_vec_zlib(&empty).unwrap().is_empty());
}

#[test]
fn test_write_png_layout() {
  let png = write_png(1, 1, &[0, 255, 0, 0, 255]).unwrap();
  assert!(is_png_header_correct(&png));
  let chunks: Vec<PngRawChunk<'_>> = RawPngChunkIter::new(&png).collect();
  let types: Vec<PngChunkType> = chunks.iter().map(|c| c.chunk_type()).collect();
  assert_eq!(types, [PngChunkType::IHDR, PngChunkType::IDAT, PngChunkType::IEND]);
  assert!(chunks.iter().all(PngRawChunk::crc_is_correct));
  assert_eq!(chunks[0].data(), &IHDR::rgba8(1, 1).to_bytes());
}

#[test]
fn test_write_png_rejects_zero_dimensions() {
  assert_eq!(write_png(0, 1, &[0]), Err(EncodeError::MalformedRaster(MalformedRaster::EmptyRow)));
  assert_eq!(write_png(1, 0, &[]), Err(EncodeError::MalformedRaster(MalformedRaster::NoRows)));
  assert_eq!(write_png(0, 0, &[]), Err(EncodeError::MalformedRaster(MalformedRaster::EmptyRow)));
}

#[test]
fn test_write_png_rejects_oversize_dimensions() {
  let too_big = PNG_MAX_DIMENSION + 1;
  assert_eq!(write_png(too_big, 1, &[]), Err(EncodeError::DimensionsTooLarge));
  assert_eq!(write_png(1, too_big, &[]), Err(EncodeError::DimensionsTooLarge));
  assert_eq!(write_png(u32::MAX, u32::MAX, &[]), Err(EncodeError::DimensionsTooLarge));
}

#[test]
fn test_write_png_rejects_wrong_scanline_length() {
  // one line of a 2x1 image is 9 bytes.
  assert_eq!(write_png(2, 1, &[0; 8]), Err(EncodeError::ScanlineLength { expected: 9, found: 8 }));
  assert_eq!(write_png(2, 1, &[0; 10]), Err(EncodeError::ScanlineLength { expected: 9, found: 10 }));
  assert_eq!(write_png(1, 2, &[]), Err(EncodeError::ScanlineLength { expected: 10, found: 0 }));
  assert!(write_png(2, 1, &[0; 9]).is_ok());
}
