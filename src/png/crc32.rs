//! The CRC-32 used by PNG chunks (ISO 3309, reflected polynomial
//! `0xEDB88320`).
//!
//! The table is built at compile time, so there's no lazy static or other
//! global state involved in checksumming.

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

#[inline]
fn update_crc(mut crc: u32, iter: impl Iterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// Computes the CRC-32 of all bytes from the iterator.
///
/// For a chunk, the bytes are the chunk type followed by the chunk data (the
/// length field is *not* included).
#[inline]
#[must_use]
pub fn png_crc(iter: impl Iterator<Item = u8>) -> u32 {
  update_crc(u32::MAX, iter) ^ u32::MAX
}

/// The CRC of a chunk with the given type and data.
#[inline]
#[must_use]
pub fn chunk_crc(chunk_type: [u8; 4], data: &[u8]) -> u32 {
  png_crc(chunk_type.iter().copied().chain(data.iter().copied()))
}

#[test]
fn test_png_crc_check_value() {
  // the standard CRC-32 check value.
  assert_eq!(png_crc(b"123456789".iter().copied()), 0xCBF4_3926);
  assert_eq!(png_crc(core::iter::empty()), 0);
}

#[test]
fn test_chunk_crc_known_chunks() {
  // every PNG ends with this exact IEND chunk.
  assert_eq!(chunk_crc(*b"IEND", &[]), 0xAE42_6082);
  // IHDR for a 1x1, 8-bit, RGBA image.
  let ihdr = [0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0];
  assert_eq!(chunk_crc(*b"IHDR", &ihdr), 0x1F15_C489);
}

#[test]
fn test_update_crc_chaining() {
  // feeding the bytes in pieces gives the same CRC as feeding them all at once.
  let head = update_crc(u32::MAX, b"1234".iter().copied());
  assert_eq!(update_crc(head, b"56789".iter().copied()) ^ u32::MAX, 0xCBF4_3926);
  let data = [0_u8, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0];
  let typed = update_crc(u32::MAX, b"IHDR".iter().copied());
  assert_eq!(update_crc(typed, data.iter().copied()) ^ u32::MAX, chunk_crc(*b"IHDR", &data));
}
