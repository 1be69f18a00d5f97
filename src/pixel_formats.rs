//! Module for pixel formats.
//!
//! PNG output from this crate is always 8-bits per channel RGBA, so that's the
//! only pixel format defined here. Palettes are slices of [`RGBA8888`].
//!
//! Producers that keep their data in some other integer type (raster indexes
//! as `i32`, palette channels as `i64` from a JSON parser, etc) can hand that
//! data over directly: anything implementing [`Integer`] is accepted, and out
//! of range values become errors rather than being truncated.

use bytemuck::{Pod, Zeroable};

use crate::EncodeError;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// An 8-bits per channel RGBA pixel.
///
/// The memory layout is `[r, g, b, a]`, which is also the order that PNG
/// stores the channels of a color type 6 pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8888 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl RGBA8888 {
  /// Makes a color from its four channels.
  #[inline]
  #[must_use]
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }
}
impl From<[u8; 4]> for RGBA8888 {
  #[inline]
  fn from([r, g, b, a]: [u8; 4]) -> Self {
    Self { r, g, b, a }
  }
}
impl From<RGBA8888> for [u8; 4] {
  #[inline]
  fn from(RGBA8888 { r, g, b, a }: RGBA8888) -> Self {
    [r, g, b, a]
  }
}

/// A primitive integer type which widens to `i128` without loss.
///
/// Used for raster indexes and loosely typed palette channels. This is a
/// sealed-in-practice helper: it's implemented for all the primitive integers
/// except `u128`, and there's no reason to implement it for anything else.
pub trait Integer: Copy {
  /// The value as an `i128`.
  fn to_i128(self) -> i128;
}
macro_rules! impl_integer {
  ($($t:ty),*) => {
    $(
      impl Integer for $t {
        #[inline]
        fn to_i128(self) -> i128 {
          self as i128
        }
      }
    )*
  };
}
impl_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, i128);

/// Converts loosely typed `[r, g, b, a]` entries into a palette.
///
/// ## Failure
/// * [`EncodeError::ChannelOutOfRange`] for the first channel that isn't in
///   `0..=255`.
/// * [`EncodeError::Alloc`] if the output can't be allocated.
#[cfg(feature = "alloc")]
pub fn palette_from_channels<C: Integer>(
  entries: &[[C; 4]],
) -> Result<Vec<RGBA8888>, EncodeError> {
  let mut palette: Vec<RGBA8888> = Vec::new();
  palette.try_reserve(entries.len())?;
  for (entry, channels) in entries.iter().enumerate() {
    let mut out = [0_u8; 4];
    for (channel, (o, c)) in out.iter_mut().zip(channels.iter().copied()).enumerate() {
      let value = c.to_i128();
      *o = u8::try_from(value).map_err(|_| {
        log::debug!("palette: entry {entry} channel {channel} out of range: {value}");
        EncodeError::ChannelOutOfRange { entry, channel, value }
      })?;
    }
    palette.push(RGBA8888::from(out));
  }
  Ok(palette)
}

#[test]
fn test_rgba8888_layout() {
  let c = RGBA8888::new(1, 2, 3, 4);
  assert_eq!(bytemuck::bytes_of(&c), &[1, 2, 3, 4]);
  assert_eq!(<[u8; 4]>::from(c), [1, 2, 3, 4]);
  assert_eq!(core::mem::size_of::<RGBA8888>(), 4);
  assert_eq!(core::mem::align_of::<RGBA8888>(), 1);
}

#[test]
#[cfg(feature = "alloc")]
fn test_palette_from_channels() {
  let palette = palette_from_channels(&[[255_i64, 0, 0, 255], [0, 0, 0, 0]]).unwrap();
  assert_eq!(palette, [RGBA8888::new(255, 0, 0, 255), RGBA8888::new(0, 0, 0, 0)]);

  assert_eq!(
    palette_from_channels(&[[0_i32, 0, 0, 0], [1, 2, 256, 4]]),
    Err(EncodeError::ChannelOutOfRange { entry: 1, channel: 2, value: 256 })
  );
  assert_eq!(
    palette_from_channels(&[[-1_i16, 0, 0, 0]]),
    Err(EncodeError::ChannelOutOfRange { entry: 0, channel: 0, value: -1 })
  );
  assert_eq!(palette_from_channels::<u8>(&[]), Ok(Vec::new()));
}
