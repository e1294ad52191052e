//! Encoding of rendered derivatives into upload-ready bytes.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur while encoding a derivative.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Container format of an encoded derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
}

impl OutputFormat {
    /// MIME type passed to storage alongside the bytes.
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension used when building storage paths.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Whether the `quality` setting is meaningful for this format.
    pub fn is_lossy(self) -> bool {
        matches!(self, OutputFormat::Jpeg)
    }
}

/// Encode an RGB image.
///
/// `quality` is clamped to 1..=100 (90 matches the canvas export quality the
/// derivatives were originally produced at).
pub fn encode(image: &DecodedImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::with_capacity(expected / 8));
    match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
                .write_image(&image.pixels, width, height, ExtendedColorType::Rgb8)
                .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        }
    }

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: encoding the same pixels twice yields the same bytes.
        #[test]
        fn prop_encoding_is_deterministic(
            (width, height) in (1u32..=24, 1u32..=24),
            quality in 1u8..=100,
            value in any::<u8>(),
        ) {
            let img = DecodedImage::filled(width, height, [value, value / 2, 255 - value]);
            let a = encode(&img, OutputFormat::Jpeg, quality).unwrap();
            let b = encode(&img, OutputFormat::Jpeg, quality).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: any non-empty surface encodes to a JPEG of the same size.
        #[test]
        fn prop_output_keeps_dimensions(
            (width, height) in (1u32..=40, 1u32..=40),
        ) {
            let img = DecodedImage::filled(width, height, [90, 140, 30]);
            let jpeg = encode(&img, OutputFormat::Jpeg, 90).unwrap();
            let decoded = image::load_from_memory(&jpeg).unwrap();
            prop_assert_eq!((decoded.width(), decoded.height()), (width, height));
        }
    }
}
