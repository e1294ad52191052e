//! Rectangles and sizes shared by the crop, transform and raster modules.
//!
//! Floating point values are used for both display space and natural space so
//! that sub-pixel crop positions survive the display → natural mapping. Only
//! the final pixel sampling snaps to the integer grid via [`PixelRect`].

use serde::{Deserialize, Serialize};

/// Width and height of an image surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (or not a positive finite number).
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

/// An axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Check containment in `[0, width] × [0, height]` with a small tolerance
    /// for accumulated floating point error.
    pub fn fits_within(&self, bounds: Dimensions) -> bool {
        const EPS: f64 = 1e-6;
        self.x >= -EPS
            && self.y >= -EPS
            && self.width >= 0.0
            && self.height >= 0.0
            && self.right() <= bounds.width + EPS
            && self.bottom() <= bounds.height + EPS
    }

    pub fn approx_eq(&self, other: &Rect, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }

    /// Snap to the integer pixel grid of an image of `bounds_w × bounds_h`.
    ///
    /// Edges are rounded independently, then clamped into the image. The
    /// result is never smaller than 1×1 so that a degenerate crop still
    /// samples one source pixel.
    pub fn to_pixel_rect(&self, bounds_w: u32, bounds_h: u32) -> PixelRect {
        let left = self.x.round().clamp(0.0, bounds_w as f64) as u32;
        let top = self.y.round().clamp(0.0, bounds_h as f64) as u32;
        let right = self.right().round().clamp(0.0, bounds_w as f64) as u32;
        let bottom = self.bottom().round().clamp(0.0, bounds_h as f64) as u32;

        let left = left.min(bounds_w.saturating_sub(1));
        let top = top.min(bounds_h.saturating_sub(1));

        PixelRect {
            x: left,
            y: top,
            width: right.saturating_sub(left).max(1),
            height: bottom.saturating_sub(top).max(1),
        }
    }
}

/// A rectangle on the integer pixel grid of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
