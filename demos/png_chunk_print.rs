use indexed_png::{
  encode,
  png::{PngChunkType, RawPngChunkIter, IHDR},
  RGBA8888,
};

/// A little 8x8 heart, `0` is transparent.
const HEART: [[u8; 8]; 8] = [
  [0, 1, 1, 0, 0, 1, 1, 0],
  [1, 2, 2, 1, 1, 2, 2, 1],
  [1, 2, 2, 2, 2, 2, 2, 1],
  [1, 2, 2, 2, 2, 2, 2, 1],
  [0, 1, 2, 2, 2, 2, 1, 0],
  [0, 0, 1, 2, 2, 1, 0, 0],
  [0, 0, 0, 1, 1, 0, 0, 0],
  [0, 0, 0, 0, 0, 0, 0, 0],
];

/// Encodes a sample sprite, prints its chunks, and optionally saves it.
///
/// `cargo run --example png_chunk_print -- heart.png`
fn main() {
  let args: Vec<String> = std::env::args().collect();
  println!("ARGS: {args:?}");
  let palette =
    [RGBA8888::new(0, 0, 0, 0), RGBA8888::new(40, 0, 0, 255), RGBA8888::new(230, 30, 60, 255)];
  let png = match encode(&HEART, &palette) {
    Ok(png) => png,
    Err(e) => {
      println!("{e}");
      return;
    }
  };
  println!("encoded {} bytes.", png.len());
  for (n, raw_chunk) in RawPngChunkIter::new(&png).enumerate() {
    println!("{n}: {raw_chunk:?} crc_ok: {}", raw_chunk.crc_is_correct());
    if raw_chunk.chunk_type() == PngChunkType::IHDR {
      println!("   {:?}", IHDR::try_from(raw_chunk.data()));
    }
  }
  if let Some(file_arg) = args.get(1) {
    let path = std::path::Path::new(file_arg);
    print!("Writing `{}`... ", path.display());
    match std::fs::write(path, &png) {
      Ok(()) => println!("done."),
      Err(e) => println!("{e:?}"),
    }
  }
}
