//! Display ↔ natural space scaling.

use crate::error::CropError;
use crate::geometry::{Dimensions, Rect};

/// Per-axis scale between the on-screen rendering and the source pixels.
///
/// `sx = natural.width / display.width`, `sy = natural.height / display.height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    display: Dimensions,
    natural: Dimensions,
    sx: f64,
    sy: f64,
}

impl CoordinateTransform {
    /// # Errors
    ///
    /// `CropError::InvalidState` when either size has a zero side, which
    /// happens when the image has not been laid out yet.
    pub fn new(display: Dimensions, natural: Dimensions) -> Result<Self, CropError> {
        if display.is_empty() {
            return Err(CropError::InvalidState("image has not been displayed yet"));
        }
        if natural.is_empty() {
            return Err(CropError::InvalidState("source image has no pixels"));
        }
        Ok(Self {
            display,
            natural,
            sx: natural.width / display.width,
            sy: natural.height / display.height,
        })
    }

    pub fn display(&self) -> Dimensions {
        self.display
    }

    pub fn natural(&self) -> Dimensions {
        self.natural
    }

    /// `(sx, sy)`
    pub fn scale(&self) -> (f64, f64) {
        (self.sx, self.sy)
    }

    pub fn to_natural(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x * self.sx,
            rect.y * self.sy,
            rect.width * self.sx,
            rect.height * self.sy,
        )
    }

    pub fn to_display(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x / self.sx,
            rect.y / self.sy,
            rect.width / self.sx,
            rect.height / self.sy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_scale() {
        let t = CoordinateTransform::new(
            Dimensions::new(600.0, 800.0),
            Dimensions::new(3000.0, 4000.0),
        )
        .unwrap();
        assert_eq!(t.scale(), (5.0, 5.0));

        let natural = t.to_natural(Rect::new(50.0, 50.0, 400.0, 225.0));
        assert_eq!(natural, Rect::new(250.0, 250.0, 2000.0, 1125.0));
    }

    #[test]
    fn test_non_uniform_scale() {
        let t = CoordinateTransform::new(
            Dimensions::new(100.0, 50.0),
            Dimensions::new(200.0, 200.0),
        )
        .unwrap();
        assert_eq!(t.scale(), (2.0, 4.0));
        assert_eq!(
            t.to_natural(Rect::new(10.0, 10.0, 20.0, 5.0)),
            Rect::new(20.0, 40.0, 40.0, 20.0)
        );
    }

    #[test]
    fn test_upscaled_display() {
        // Small source shown larger than its natural size
        let t = CoordinateTransform::new(
            Dimensions::new(800.0, 450.0),
            Dimensions::new(160.0, 90.0),
        )
        .unwrap();
        assert_eq!(t.scale(), (0.2, 0.2));
    }

    #[test]
    fn test_zero_display_is_invalid_state() {
        let natural = Dimensions::new(3000.0, 4000.0);
        for display in [
            Dimensions::new(0.0, 800.0),
            Dimensions::new(600.0, 0.0),
            Dimensions::default(),
        ] {
            assert!(matches!(
                CoordinateTransform::new(display, natural),
                Err(CropError::InvalidState(_))
            ));
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
