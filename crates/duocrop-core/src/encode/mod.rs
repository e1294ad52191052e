//! Derivative encoding.
//!
//! Both derivatives are written as lossy JPEG at a fixed quality. The
//! [`OutputFormat`] enum carries the content type and file extension handed to
//! the storage collaborator so those never drift from the actual bytes.
//!
//! # Examples
//!
//! ```ignore
//! use duocrop_core::decode::DecodedImage;
//! use duocrop_core::encode::{encode, OutputFormat};
//!
//! let image = DecodedImage::filled(640, 360, [128, 128, 128]);
//! let bytes = encode(&image, OutputFormat::Jpeg, 90).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod encoder;

pub use encoder::{encode, EncodeError, OutputFormat};
