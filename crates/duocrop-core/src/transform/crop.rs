//! Natural-space pixel extraction.
//!
//! Copies an integer pixel rectangle out of a decoded RGB image. The
//! rectangle is produced by [`Rect::to_pixel_rect`](crate::geometry::Rect::to_pixel_rect)
//! after the display → natural mapping, so it is already snapped to the grid.

use crate::decode::DecodedImage;
use crate::encode::EncodeError;
use crate::geometry::PixelRect;

/// Copy `region` out of `image`.
///
/// # Behavior
///
/// - A region extending past the image edge is clamped to the image
/// - Minimum output dimension is 1x1 pixels
/// - A region covering the whole image returns a copy of the original
///
/// # Errors
///
/// `EncodeError::InvalidPixelData` if the buffer length does not match
/// `width * height * 3`.
pub fn crop_pixels(image: &DecodedImage, region: PixelRect) -> Result<DecodedImage, EncodeError> {
    let expected = image.width as usize * image.height as usize * 3;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    if region.x == 0 && region.y == 0 && region.width >= image.width && region.height >= image.height {
        return Ok(image.clone());
    }

    let left = region.x.min(image.width.saturating_sub(1));
    let top = region.y.min(image.height.saturating_sub(1));
    let right = left.saturating_add(region.width).min(image.width);
    let bottom = top.saturating_add(region.height).min(image.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    let src_stride = image.width as usize * 3;
    let row_len = out_width as usize * 3;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    for y in top..top + out_height {
        let start = y as usize * src_stride + left as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(out_width, out_height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: output never exceeds the source and is at least 1x1.
        #[test]
        fn prop_output_bounded(
            (width, height) in (1u32..=60, 1u32..=60),
            (x, y, w, h) in (0u32..=80, 0u32..=80, 0u32..=80, 0u32..=80),
        ) {
            let img = create_test_image(width, height);
            let result = crop_pixels(&img, PixelRect { x, y, width: w, height: h }).unwrap();

            prop_assert!(result.width >= 1 && result.height >= 1);
            prop_assert!(result.width <= width && result.height <= height);
            prop_assert_eq!(result.pixels.len(), (result.width * result.height * 3) as usize);
        }

        /// Property: every output pixel is the source pixel at the offset position.
        #[test]
        fn prop_pixels_come_from_offset(
            (width, height) in (10u32..=60, 10u32..=60),
            (fx, fy) in (0.0f64..0.5, 0.0f64..0.5),
        ) {
            let img = create_test_image(width, height);
            let x = (fx * width as f64) as u32;
            let y = (fy * height as f64) as u32;
            let region = PixelRect { x, y, width: width / 2, height: height / 2 };
            let result = crop_pixels(&img, region).unwrap();

            for oy in 0..result.height {
                for ox in 0..result.width {
                    prop_assert_eq!(result.pixel(ox, oy), img.pixel(x + ox, y + oy));
                }
            }
        }
    }
}
