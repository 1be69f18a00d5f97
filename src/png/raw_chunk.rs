use super::*;

/// A four byte PNG chunk type code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngChunkType {
  /// Image Header
  pub const IHDR: Self = Self(*b"IHDR");
  /// Image Data
  pub const IDAT: Self = Self(*b"IDAT");
  /// Image End
  pub const IEND: Self = Self(*b"IEND");

  /// Critical chunks have an uppercase first letter.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    (self.0[0] & 32) == 0
  }
  /// Public chunks have an uppercase second letter.
  #[inline]
  #[must_use]
  pub const fn is_public(self) -> bool {
    (self.0[1] & 32) == 0
  }
}
impl Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// An unparsed chunk from a PNG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PngRawChunk<'b> {
  pub(crate) type_: PngChunkType,
  pub(crate) data: &'b [u8],
  pub(crate) declared_crc: u32,
}
impl Debug for PngRawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngRawChunk")
      .field("type_", &self.type_)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> PngRawChunk<'b> {
  /// The chunk's type code.
  #[inline]
  #[must_use]
  pub const fn chunk_type(&self) -> PngChunkType {
    self.type_
  }
  /// The chunk's data bytes.
  #[inline]
  #[must_use]
  pub const fn data(&self) -> &'b [u8] {
    self.data
  }
  /// The CRC value stored after the chunk data.
  #[inline]
  #[must_use]
  pub const fn declared_crc(&self) -> u32 {
    self.declared_crc
  }
  /// Computes the CRC that the chunk *should* have.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    chunk_crc(self.type_.0, self.data)
  }
  /// If the declared and actual CRC values match.
  #[inline]
  #[must_use]
  pub fn crc_is_correct(&self) -> bool {
    self.declared_crc == self.actual_crc()
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Iteration ends at the first chunk that doesn't fully fit in the remaining
/// bytes. Any input at all is fine, garbage bytes just give garbage chunks (or
/// none), never a panic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawPngChunkIter<'b>(pub(crate) &'b [u8]);
impl<'b> RawPngChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG signature automatically.
  ///
  /// The signature isn't checked, use [`is_png_header_correct`] for that.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }
}
impl<'b> Iterator for RawPngChunkIter<'b> {
  type Item = PngRawChunk<'b>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    let (len_bytes, rest) = try_split_array::<4>(self.0)?;
    let (type_bytes, rest) = try_split_array::<4>(rest)?;
    let chunk_len = u32::from_be_bytes(len_bytes) as usize;
    if rest.len() < chunk_len {
      self.0 = &[];
      return None;
    }
    let (data, rest) = rest.split_at(chunk_len);
    let (crc_bytes, rest) = try_split_array::<4>(rest)?;
    self.0 = rest;
    Some(PngRawChunk {
      type_: PngChunkType(type_bytes),
      data,
      declared_crc: u32::from_be_bytes(crc_bytes),
    })
  }
}

#[inline]
fn try_split_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let mut a = [0_u8; N];
    a.copy_from_slice(head);
    Some((a, tail))
  } else {
    None
  }
}

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not* PNG
///   data.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

#[test]
fn test_chunk_type_properties() {
  assert!(PngChunkType::IHDR.is_critical());
  assert!(PngChunkType::IEND.is_public());
  assert!(!PngChunkType(*b"tEXt").is_critical());
  assert!(!PngChunkType(*b"prVt").is_public());
  assert_eq!(alloc::format!("{:?}", PngChunkType::IDAT), "IDAT");
}

#[test]
fn test_raw_chunk_iter_truncation() {
  // signature, then a complete IEND, then a chunk that claims 10 data bytes.
  let mut bytes = alloc::vec::Vec::new();
  bytes.extend_from_slice(&PNG_SIGNATURE);
  bytes.extend_from_slice(&[0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]);
  bytes.extend_from_slice(&[0, 0, 0, 10, b'I', b'D', b'A', b'T', 1, 2, 3]);
  let mut it = RawPngChunkIter::new(&bytes);
  let iend = it.next().unwrap();
  assert_eq!(iend.chunk_type(), PngChunkType::IEND);
  assert!(iend.data().is_empty());
  assert!(iend.crc_is_correct());
  assert!(it.next().is_none());
  assert!(it.next().is_none());

  assert!(RawPngChunkIter::new(&[1, 2, 3]).next().is_none());
  assert!(is_png_header_correct(&bytes));
  assert!(!is_png_header_correct(&bytes[1..]));
}
