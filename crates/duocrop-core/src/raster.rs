//! Rasterization of a natural-space region into a fixed-size derivative.
//!
//! The pipeline is: snap the region to the source pixel grid, copy it out,
//! resample to the exact target size, encode. Sampling always happens on the
//! full-resolution source, so the result is independent of how large the
//! editor was on screen when the crop was made.

use serde::{Deserialize, Serialize};

use crate::decode::{resize, DecodedImage, FilterType};
use crate::encode::{encode, EncodeError, OutputFormat};
use crate::error::CropError;
use crate::geometry::Rect;
use crate::source::SourceImage;
use crate::transform::crop_pixels;

/// Target size and encoding of one derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_quality")]
    pub quality: u8,
}

/// Quality the derivatives are encoded at unless configured otherwise.
pub const DEFAULT_QUALITY: u8 = 90;

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl OutputSpec {
    pub fn jpeg(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: OutputFormat::Jpeg,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// An encoded derivative ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDerivative {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl EncodedDerivative {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Render `region` of `image` to a `width × height` bitmap.
///
/// `region` is in natural-space pixels of `image`. Parts of the region that
/// fall outside the image are clamped away before resampling.
pub fn render_region(
    image: &DecodedImage,
    region: Rect,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, CropError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height }.into());
    }
    if image.is_empty() {
        return Err(CropError::SourceUnavailable);
    }

    let pixels = region.to_pixel_rect(image.width, image.height);
    let cropped = crop_pixels(image, pixels)?;
    resize(&cropped, width, height, filter)
        .map_err(|e| CropError::from(EncodeError::EncodingFailed(e.to_string())))
}

/// Samples crops from a source and encodes them at an exact size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rasterizer {
    filter: FilterType,
}

impl Rasterizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> FilterType {
        self.filter
    }

    /// Render and encode `region` (natural space) of `source` per `target`.
    ///
    /// # Errors
    ///
    /// - `CropError::SourceUnavailable` if the source holds no pixels
    /// - `CropError::Encoding` for a zero-sized target or encoder failure
    pub fn rasterize(
        &self,
        source: &SourceImage,
        region: Rect,
        target: &OutputSpec,
    ) -> Result<EncodedDerivative, CropError> {
        let rendered = render_region(source.pixels(), region, target.width, target.height, self.filter)?;
        let bytes = encode(&rendered, target.format, target.quality)?;
        Ok(EncodedDerivative {
            width: rendered.width,
            height: rendered.height,
            format: target.format,
            bytes,
        })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
