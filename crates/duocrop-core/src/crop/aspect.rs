//! Aspect ratios and the centered default crop.

use serde::{Deserialize, Serialize};

use crate::geometry::{Dimensions, Rect};

/// A width:height ratio such as 16:9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Wide card thumbnail.
    pub const CARD: AspectRatio = AspectRatio::new(16, 9);
    /// Tall detail portrait.
    pub const DETAIL: AspectRatio = AspectRatio::new(2, 3);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn value(self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Whether a `width × height` surface has this ratio within `tolerance`
    /// (relative).
    pub fn matches(self, width: u32, height: u32, tolerance: f64) -> bool {
        if height == 0 {
            return false;
        }
        let actual = width as f64 / height as f64;
        ((actual - self.value()) / self.value()).abs() <= tolerance
    }
}

/// Compute the centered default crop for a freshly displayed image.
///
/// The crop starts at `coverage` of the display width with the height implied
/// by `aspect`. When that height would not fit (the image is wider than the
/// target ratio allows at that coverage), the height is clamped to the full
/// display height and the width recomputed from it. The rectangle is then
/// centered on both axes.
///
/// `coverage` is clamped into `(0, 1]`.
pub fn centered_crop(display: Dimensions, aspect: AspectRatio, coverage: f64) -> Rect {
    let ratio = aspect.value();
    let coverage = if coverage > 0.0 { coverage.min(1.0) } else { 1.0 };

    let mut width = display.width * coverage;
    let mut height = width / ratio;

    if height > display.height {
        height = display.height;
        width = height * ratio;
    }

    Rect::new(
        (display.width - width) / 2.0,
        (display.height - height) / 2.0,
        width,
        height,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
