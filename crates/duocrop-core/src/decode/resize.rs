//! Exact-size resampling.
//!
//! Derivatives always come out at the configured size regardless of the crop
//! extent, so there is deliberately no aspect-preserving variant here.

use super::{DecodeError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// Returns a new `DecodedImage`; the input is only borrowed.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target size or a pixel
/// buffer that does not match the declared dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let view = image.as_image_view().ok_or_else(|| {
        DecodeError::CorruptedFile(format!(
            "pixel buffer of {} bytes does not hold {}x{} RGB",
            image.pixels.len(),
            image.width,
            image.height
        ))
    })?;

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());
    Ok(DecodedImage::from_rgb_image(resized))
}
