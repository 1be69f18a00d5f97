use super::*;

/// The types of color that PNG supports.
///
/// The encoder only ever writes [`PngColorType::RGBA`], but headers read back
/// with [`IHDR::try_from`] can name any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(()),
    })
  }
}

/// Image Header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// if the image data is stored interlaced.
  pub is_interlaced: bool,
}
impl IHDR {
  /// The header this crate writes: 8-bit RGBA, not interlaced.
  #[inline]
  #[must_use]
  pub const fn rgba8(width: u32, height: u32) -> Self {
    Self {
      width,
      height,
      bit_depth: 8,
      color_type: PngColorType::RGBA,
      is_interlaced: false,
    }
  }

  /// The 13 data bytes of the header chunk.
  ///
  /// Compression method and filter method are always 0, the only values PNG
  /// defines.
  #[inline]
  #[must_use]
  pub const fn to_bytes(&self) -> [u8; 13] {
    let [w0, w1, w2, w3] = self.width.to_be_bytes();
    let [h0, h1, h2, h3] = self.height.to_be_bytes();
    [
      w0,
      w1,
      w2,
      w3,
      h0,
      h1,
      h2,
      h3,
      self.bit_depth,
      self.color_type as u8,
      0,
      0,
      self.is_interlaced as u8,
    ]
  }

  /// Bytes in one filtered scanline: the filter type byte plus pixel data.
  ///
  /// Lines with less than 8 bits per pixel can end on a partial byte, so this
  /// rounds up.
  #[inline]
  #[must_use]
  pub const fn bytes_per_filterline(&self) -> Option<usize> {
    let bits_per_pixel = (self.bit_depth as usize) * self.color_type.channel_count();
    match bits_per_pixel.checked_mul(self.width as usize) {
      Some(bits) => Some(1 + bits / 8 + (bits % 8 != 0) as usize),
      None => None,
    }
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = ();
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, 0, 0, interlace_method] => {
        Ok(Self {
          width: u32::from_be_bytes([*w0, *w1, *w2, *w3]),
          height: u32::from_be_bytes([*h0, *h1, *h2, *h3]),
          bit_depth: match *color_type {
            0 if [1, 2, 4, 8, 16].contains(bit_depth) => *bit_depth,
            2 if [8, 16].contains(bit_depth) => *bit_depth,
            3 if [1, 2, 4, 8].contains(bit_depth) => *bit_depth,
            4 if [8, 16].contains(bit_depth) => *bit_depth,
            6 if [8, 16].contains(bit_depth) => *bit_depth,
            _ => return Err(()),
          },
          color_type: PngColorType::try_from(*color_type)?,
          is_interlaced: match interlace_method {
            0 => false,
            1 => true,
            _ => return Err(()),
          },
        })
      }
      _ => Err(()),
    }
  }
}

#[test]
fn test_ihdr_bytes() {
  let ihdr = IHDR::rgba8(0x0102_0304, 7);
  assert_eq!(ihdr.to_bytes(), [1, 2, 3, 4, 0, 0, 0, 7, 8, 6, 0, 0, 0]);
  assert_eq!(IHDR::try_from(&ihdr.to_bytes()[..]), Ok(ihdr));
  assert_eq!(ihdr.bytes_per_filterline(), Some(1 + 0x0102_0304 * 4));
}

#[test]
fn test_ihdr_parse_rejects_nonsense() {
  // wrong length
  assert!(IHDR::try_from(&[0_u8; 12][..]).is_err());
  // color type 6 can't be 4-bit
  assert!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 4, 6, 0, 0, 0][..]).is_err());
  // unknown compression method
  assert!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 1, 0, 0][..]).is_err());
  // unknown interlace method
  assert!(IHDR::try_from(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 2][..]).is_err());
}
