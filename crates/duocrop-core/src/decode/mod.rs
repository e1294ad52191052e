//! Source image decoding.
//!
//! This module provides functionality for:
//! - Decoding the upload formats accepted by the crop flow (JPEG, PNG, WebP)
//! - Applying EXIF orientation so natural dimensions match what the user sees
//! - Exact-size resizing used by the rasterizer
//!
//! # Architecture
//!
//! Decoding runs once per session when the user selects a file. The decoded
//! RGB buffer is then shared read-only by preview and export rasterization.
//!
//! # Examples
//!
//! ```ignore
//! use duocrop_core::decode::decode_image;
//!
//! let bytes = std::fs::read("portrait.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, get_orientation};
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
