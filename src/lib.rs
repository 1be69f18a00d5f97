#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for encoding palette-indexed rasters as PNG images.
//!
//! You give it rows of palette indexes and a palette of RGBA colors, and you
//! get back the bytes of a PNG file. The palette is expanded into the pixels,
//! so the PNG is always 8-bit RGBA, which any PNG reader can display.
//!
//! ```
//! use indexed_png::{encode, RGBA8888};
//! let palette = [RGBA8888::new(0, 0, 0, 0), RGBA8888::new(255, 255, 255, 255)];
//! let raster = [
//!   [0_u8, 1, 0],
//!   [1, 1, 1],
//!   [0, 1, 0],
//! ];
//! let png: Vec<u8> = encode(&raster, &palette).unwrap();
//! // the file is yours to save or send along.
//! ```
//!
//! The encoder is a plain function: no global state, no I/O, and the same
//! input always gives the same output bytes.
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade. Nothing is
//! printed unless the application installs a logger.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod error;
pub use error::*;

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod raster;
pub use raster::*;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "png")]
pub use png::encode;
