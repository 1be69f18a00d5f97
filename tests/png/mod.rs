use indexed_png::{
  encode,
  png::{is_png_header_correct, PngChunkType, PngColorType, RawPngChunkIter, IHDR},
  palette_from_channels, EncodeError, MalformedRaster, Palmap, RGBA8888,
};

/// Reads back what the encoder wrote: the header, and the pixels as RGBA.
///
/// Only handles what the encoder produces, and checks that it does produce
/// exactly that.
fn read_back(png: &[u8]) -> (IHDR, Vec<RGBA8888>) {
  assert!(is_png_header_correct(png));
  let chunks: Vec<_> = RawPngChunkIter::new(png).collect();
  let types: Vec<PngChunkType> = chunks.iter().map(|c| c.chunk_type()).collect();
  assert_eq!(types, [PngChunkType::IHDR, PngChunkType::IDAT, PngChunkType::IEND]);
  // nothing after IEND
  let framed: usize = 8 + chunks.iter().map(|c| 12 + c.data().len()).sum::<usize>();
  assert_eq!(framed, png.len());

  let ihdr = IHDR::try_from(chunks[0].data()).unwrap();
  let filtered = miniz_oxide::inflate::decompress_to_vec_zlib(chunks[1].data()).unwrap();
  let line_len = 1 + ihdr.width as usize * 4;
  assert_eq!(filtered.len(), line_len * ihdr.height as usize);
  let mut pixels = Vec::new();
  for line in filtered.chunks_exact(line_len) {
    assert_eq!(line[0], 0, "every line should use filter type 0");
    for p in line[1..].chunks_exact(4) {
      pixels.push(RGBA8888::new(p[0], p[1], p[2], p[3]));
    }
  }
  (ihdr, pixels)
}

/// Decodes with the `png` crate, which shares no code with this one.
///
/// Gives back the width, the height, and the pixels.
fn decode_with_png_crate(png: &[u8]) -> (u32, u32, Vec<RGBA8888>) {
  let mut reader = png_decoder::Decoder::new(png).read_info().unwrap();
  let info = reader.info();
  assert_eq!(info.color_type, png_decoder::ColorType::Rgba);
  assert_eq!(info.bit_depth, png_decoder::BitDepth::Eight);
  assert!(!info.interlaced);
  let (width, height) = (info.width, info.height);
  let mut buf = vec![0_u8; reader.output_buffer_size()];
  let frame = reader.next_frame(&mut buf).unwrap();
  assert_eq!((frame.width, frame.height), (width, height));
  let pixels = buf[..frame.buffer_size()]
    .chunks_exact(4)
    .map(|p| RGBA8888::new(p[0], p[1], p[2], p[3]))
    .collect();
  (width, height, pixels)
}

fn rand_raster(width: usize, height: usize, palette_len: usize) -> Vec<Vec<u16>> {
  let bytes = super::rand_bytes(width * height * 2);
  let indexes: Vec<u16> =
    bytes.chunks_exact(2).map(|b| u16::from_le_bytes([b[0], b[1]]) % palette_len as u16).collect();
  indexes.chunks_exact(width).map(<[u16]>::to_vec).collect()
}

fn rand_palette(len: usize) -> Vec<RGBA8888> {
  super::rand_bytes(len * 4).chunks_exact(4).map(|c| RGBA8888::new(c[0], c[1], c[2], c[3])).collect()
}

#[test]
fn test_single_red_pixel() {
  let palette = palette_from_channels(&[[255, 0, 0, 255]]).unwrap();
  let png = encode(&[[0_u8]], &palette).unwrap();
  let (ihdr, pixels) = read_back(&png);
  assert_eq!((ihdr.width, ihdr.height), (1, 1));
  assert_eq!(pixels, [RGBA8888::new(255, 0, 0, 255)]);
  assert_eq!(decode_with_png_crate(&png), (1, 1, vec![RGBA8888::new(255, 0, 0, 255)]));
}

#[test]
fn test_header_fields() {
  let palette = [RGBA8888::default(); 2];
  let raster = vec![vec![0_u8, 1, 0, 1, 0, 1, 0]; 3];
  let png = encode(&raster, &palette).unwrap();
  let (ihdr, _) = read_back(&png);
  assert_eq!(ihdr.width, 7);
  assert_eq!(ihdr.height, 3);
  assert_eq!(ihdr.bit_depth, 8);
  assert_eq!(ihdr.color_type, PngColorType::RGBA);
  assert!(!ihdr.is_interlaced);
  // and the raw bytes agree: compression, filter, and interlace are all 0.
  let ihdr_chunk = RawPngChunkIter::new(&png).next().unwrap();
  assert_eq!(&ihdr_chunk.data()[8..], &[8, 6, 0, 0, 0]);
}

#[test]
fn test_round_trip_random_images() {
  for (width, height, palette_len) in [(1, 1, 1), (3, 5, 2), (16, 16, 16), (33, 7, 300), (200, 3, 5)]
  {
    let palette = rand_palette(palette_len);
    let raster = rand_raster(width, height, palette_len);
    let png = encode(&raster, &palette).unwrap();
    let (ihdr, pixels) = read_back(&png);
    assert_eq!((ihdr.width as usize, ihdr.height as usize), (width, height));
    let expected: Vec<RGBA8888> =
      raster.iter().flatten().map(|&i| palette[usize::from(i)]).collect();
    assert_eq!(pixels, expected, "{width}x{height} with {palette_len} colors");
    let (png_width, png_height, png_pixels) = decode_with_png_crate(&png);
    assert_eq!((png_width as usize, png_height as usize), (width, height));
    assert_eq!(png_pixels, expected, "png crate: {width}x{height} with {palette_len} colors");
  }
}

#[test]
fn test_row_order_is_top_to_bottom() {
  let palette = [RGBA8888::new(1, 1, 1, 1), RGBA8888::new(2, 2, 2, 2), RGBA8888::new(3, 3, 3, 3)];
  let raster: [&[i32]; 3] = [&[0, 0], &[1, 1], &[2, 0]];
  let (_, pixels) = read_back(&encode(&raster, &palette).unwrap());
  assert_eq!(pixels, [palette[0], palette[0], palette[1], palette[1], palette[2], palette[0]]);
}

#[test]
fn test_deterministic_output() {
  let palette = rand_palette(8);
  let raster = rand_raster(40, 25, 8);
  let a = encode(&raster, &palette).unwrap();
  let b = encode(&raster, &palette).unwrap();
  assert_eq!(a, b);
}

#[test]
fn test_every_chunk_crc_verifies() {
  let palette = rand_palette(4);
  let raster = rand_raster(20, 20, 4);
  let png = encode(&raster, &palette).unwrap();
  let mut count = 0;
  for chunk in RawPngChunkIter::new(&png) {
    assert!(chunk.crc_is_correct(), "{chunk:?}");
    count += 1;
  }
  assert_eq!(count, 3);
}

#[test]
fn test_ragged_raster_rejected() {
  let palette = [RGBA8888::default()];
  let raster: [&[u8]; 2] = [&[0, 0], &[0]];
  assert_eq!(
    encode(&raster, &palette),
    Err(EncodeError::MalformedRaster(MalformedRaster::RaggedRow { row: 1, expected: 2, found: 1 }))
  );
}

#[test]
fn test_empty_raster_rejected() {
  let palette = [RGBA8888::default()];
  let no_rows: Vec<Vec<u8>> = Vec::new();
  assert_eq!(encode(&no_rows, &palette), Err(EncodeError::MalformedRaster(MalformedRaster::NoRows)));
  let empty_row: Vec<Vec<u8>> = vec![Vec::new()];
  assert_eq!(
    encode(&empty_row, &palette),
    Err(EncodeError::MalformedRaster(MalformedRaster::EmptyRow))
  );
}

#[test]
fn test_out_of_range_index_rejected() {
  let palette = [RGBA8888::default(); 3];
  let raster = [[0_u8, 1], [2, 5]];
  let err = encode(&raster, &palette).unwrap_err();
  assert_eq!(err, EncodeError::PaletteIndexOutOfRange { row: 1, column: 1, index: 5, palette_len: 3 });
  assert!(err.to_string().contains("palette index 5"));

  let raster = [[-3_i64]];
  assert!(matches!(
    encode(&raster, &palette),
    Err(EncodeError::PaletteIndexOutOfRange { index: -3, .. })
  ));
}

#[test]
fn test_palmap_encodes_like_rows() {
  let palette = rand_palette(6);
  let raster = rand_raster(9, 4, 6);
  let palmap = Palmap::try_from_rows(&raster, palette.clone()).unwrap();
  assert_eq!(palmap.to_png_bytes().unwrap(), encode(&raster, &palette).unwrap());

  let short = Palmap { width: 3, height: 2, indexes: vec![0_u8; 5], palette: palette.clone() };
  assert_eq!(
    short.to_png_bytes(),
    Err(EncodeError::MalformedRaster(MalformedRaster::IndexCount { expected: 6, found: 5 }))
  );
  let flat = Palmap { width: 3, height: 0, indexes: Vec::<u8>::new(), palette };
  assert_eq!(flat.to_png_bytes(), Err(EncodeError::MalformedRaster(MalformedRaster::NoRows)));
}

#[test]
fn test_flat_images_compress_well() {
  let palette = [RGBA8888::new(10, 20, 30, 255)];
  let raster = vec![vec![0_u8; 256]; 256];
  let png = encode(&raster, &palette).unwrap();
  // 256 * (1 + 256 * 4) bytes of scanlines, almost all of it repeats.
  assert!(png.len() < 8192, "{}", png.len());
  let (_, pixels) = read_back(&png);
  assert!(pixels.iter().all(|p| *p == palette[0]));
}

#[test]
fn test_RawPngChunkIter_no_panics() {
  // even totally random data should never panic the iterator!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    for chunk in RawPngChunkIter::new(&v) {
      let _ = chunk.crc_is_correct();
    }
  }
  // nor should a real PNG that's been cut short anywhere.
  let png = encode(&[[0_u8, 0], [0, 0]], &[RGBA8888::default()]).unwrap();
  for end in 0..png.len() {
    let count = RawPngChunkIter::new(&png[..end]).count();
    assert!(count < 3);
  }
  assert_eq!(RawPngChunkIter::new(&png).count(), 3);
}
