//! Interactive crop rectangle locked to an aspect ratio.
//!
//! # Resizing model
//!
//! Every handle fixes an anchor on each axis:
//!
//! | Handle | x anchor      | y anchor      | driven by |
//! |--------|---------------|---------------|-----------|
//! | E / W  | left / right  | center        | dx        |
//! | N / S  | center        | bottom / top  | dy        |
//! | corner | opposite edge | opposite edge | dx or dy, whichever moves more |
//!
//! The new width is clamped so the rectangle stays inside the display on both
//! axes around those anchors, then the height is derived from the width. The
//! ratio is therefore exact after every step; only the position can carry
//! floating point noise, and that is clamped back into bounds.

use serde::{Deserialize, Serialize};

use super::aspect::{centered_crop, AspectRatio};
use crate::geometry::{Dimensions, Rect};

/// Floor for the configured minimum width, in display pixels.
///
/// A zero-width crop has no defined aspect, so resizing never goes below one
/// pixel even when the host asks for less.
pub const MIN_CROP_EXTENT: f64 = 1.0;

/// Resize handle on the crop overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

/// Where one axis of the rectangle is pinned while resizing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Anchor {
    /// Leading edge (left/top) stays put, rectangle grows toward +.
    Start(f64),
    /// Trailing edge (right/bottom) stays put, rectangle grows toward −.
    End(f64),
    /// Midpoint stays put, rectangle grows both ways.
    Center(f64),
}

impl Anchor {
    /// Largest extent that keeps the rectangle inside `[0, bound]`.
    fn max_extent(self, bound: f64) -> f64 {
        match self {
            Anchor::Start(a) => bound - a,
            Anchor::End(b) => b,
            Anchor::Center(c) => 2.0 * c.min(bound - c),
        }
    }

    /// Leading coordinate for a rectangle of `extent` around this anchor.
    fn origin(self, extent: f64) -> f64 {
        match self {
            Anchor::Start(a) => a,
            Anchor::End(b) => b - extent,
            Anchor::Center(c) => c - extent / 2.0,
        }
    }
}

impl std::str::FromStr for Handle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Handle::ALL
            .into_iter()
            .find(|h| h.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown resize handle: {s}"))
    }
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
        Handle::NE,
        Handle::NW,
        Handle::SE,
        Handle::SW,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::NE => "ne",
            Handle::NW => "nw",
            Handle::SE => "se",
            Handle::SW => "sw",
        }
    }

    fn anchors(self, r: &Rect) -> (Anchor, Anchor) {
        let (cx, cy) = r.center();
        let left = Anchor::Start(r.x);
        let right = Anchor::End(r.right());
        let top = Anchor::Start(r.y);
        let bottom = Anchor::End(r.bottom());
        match self {
            Handle::E => (left, Anchor::Center(cy)),
            Handle::W => (right, Anchor::Center(cy)),
            Handle::S => (Anchor::Center(cx), top),
            Handle::N => (Anchor::Center(cx), bottom),
            Handle::SE => (left, top),
            Handle::NE => (left, bottom),
            Handle::SW => (right, top),
            Handle::NW => (right, bottom),
        }
    }

    /// Sign of the width change for a positive pointer delta on each axis.
    /// Zero means the axis does not drive this handle.
    fn drive(self) -> (f64, f64) {
        match self {
            Handle::E => (1.0, 0.0),
            Handle::W => (-1.0, 0.0),
            Handle::S => (0.0, 1.0),
            Handle::N => (0.0, -1.0),
            Handle::SE => (1.0, 1.0),
            Handle::NE => (1.0, -1.0),
            Handle::SW => (-1.0, 1.0),
            Handle::NW => (-1.0, -1.0),
        }
    }
}

/// One mode's crop rectangle in display space.
///
/// All mutation goes through methods that re-establish the invariants:
/// `region.width / region.height == aspect` and containment in the display.
#[derive(Debug, Clone, PartialEq)]
pub struct CropState {
    aspect: AspectRatio,
    display: Dimensions,
    coverage: f64,
    min_width: f64,
    region: Rect,
    completed: Option<Rect>,
}

impl CropState {
    /// Create a state initialized with the centered default crop.
    pub fn new(display: Dimensions, aspect: AspectRatio, coverage: f64, min_width: f64) -> Self {
        let region = centered_crop(display, aspect, coverage);
        log::debug!(
            "Initialized {}:{} crop at {:?} on {}x{} display",
            aspect.width,
            aspect.height,
            region,
            display.width,
            display.height
        );
        Self {
            aspect,
            display,
            coverage,
            min_width: min_width.max(MIN_CROP_EXTENT),
            region,
            completed: None,
        }
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn display(&self) -> Dimensions {
        self.display
    }

    /// The live rectangle, including in-progress drags.
    pub fn region(&self) -> Rect {
        self.region
    }

    /// The rectangle captured at the end of the last interaction.
    pub fn completed(&self) -> Option<Rect> {
        self.completed
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    /// Move by a pointer delta, stopping at the display edges.
    pub fn translate(&mut self, dx: f64, dy: f64) -> Rect {
        self.move_to(self.region.x + dx, self.region.y + dy)
    }

    /// Place the top-left corner at `(x, y)`, clamped so the rectangle stays
    /// inside the display.
    pub fn move_to(&mut self, x: f64, y: f64) -> Rect {
        let max_x = (self.display.width - self.region.width).max(0.0);
        let max_y = (self.display.height - self.region.height).max(0.0);
        self.region.x = finite_or(x, self.region.x).clamp(0.0, max_x);
        self.region.y = finite_or(y, self.region.y).clamp(0.0, max_y);
        self.region
    }

    /// Drag `handle` by a pointer delta.
    pub fn resize(&mut self, handle: Handle, dx: f64, dy: f64) -> Rect {
        let ratio = self.aspect.value();
        let (drive_x, drive_y) = handle.drive();
        let dx = finite_or(dx, 0.0);
        let dy = finite_or(dy, 0.0);

        let from_x = drive_x * dx;
        let from_y = drive_y * dy * ratio;
        let delta = if from_y.abs() > from_x.abs() { from_y } else { from_x };

        let (ax, ay) = handle.anchors(&self.region);
        let max_width = ax
            .max_extent(self.display.width)
            .min(ay.max_extent(self.display.height) * ratio)
            .max(0.0);
        let min_width = self.min_width.min(max_width);
        let width = (self.region.width + delta).clamp(min_width, max_width);
        let height = width / ratio;

        self.region = Rect::new(ax.origin(width), ay.origin(height), width, height);
        self.clamp_position();
        self.region
    }

    /// Replace the rectangle with one supplied by the host UI.
    ///
    /// The width is kept (raised to the minimum width if needed) and the
    /// height re-derived from the aspect ratio around the rectangle's center;
    /// the result is shrunk to fit and then moved back inside the display.
    pub fn set_region(&mut self, rect: Rect) -> Rect {
        let width = finite_or(rect.width, self.region.width).max(self.min_width);
        self.region = self.fit(rect, width);
        self.region
    }

    /// Capture the current rectangle as the completed crop.
    pub fn complete(&mut self) -> Rect {
        self.completed = Some(self.region);
        self.region
    }

    /// Restore the centered default.
    pub fn reset(&mut self) -> Rect {
        self.region = centered_crop(self.display, self.aspect, self.coverage);
        self.region
    }

    /// Follow a change of the displayed image size.
    ///
    /// Both the live and the completed rectangle are scaled by the width
    /// ratio (the displayed image keeps its aspect) and then re-fitted. The
    /// minimum width is not applied here: a small crop shrinks with the
    /// display so it keeps covering the same part of the image.
    pub fn relayout(&mut self, display: Dimensions) {
        if display.is_empty() || display == self.display {
            return;
        }
        let factor = display.width / self.display.width;
        self.display = display;

        let live = scale_rect(self.region, factor);
        self.region = self.fit(live, live.width);
        self.completed = self
            .completed
            .map(|done| scale_rect(done, factor))
            .map(|done| self.fit(done, done.width));
    }

    /// Rectangle of `width` (at the locked aspect) centered on `rect`'s
    /// center, shrunk to fit the display and moved inside it.
    fn fit(&self, rect: Rect, width: f64) -> Rect {
        let ratio = self.aspect.value();
        let mut width = if width > 0.0 { width } else { self.region.width };
        let mut height = width / ratio;
        if height > self.display.height {
            height = self.display.height;
            width = height * ratio;
        }
        if width > self.display.width {
            width = self.display.width;
            height = width / ratio;
        }

        let (cx, cy) = rect.center();
        let (cx, cy) = (finite_or(cx, 0.0), finite_or(cy, 0.0));
        let max_x = (self.display.width - width).max(0.0);
        let max_y = (self.display.height - height).max(0.0);
        Rect::new(
            (cx - width / 2.0).clamp(0.0, max_x),
            (cy - height / 2.0).clamp(0.0, max_y),
            width,
            height,
        )
    }

    fn clamp_position(&mut self) {
        let max_x = (self.display.width - self.region.width).max(0.0);
        let max_y = (self.display.height - self.region.height).max(0.0);
        self.region.x = self.region.x.clamp(0.0, max_x);
        self.region.y = self.region.y.clamp(0.0, max_y);
    }
}

fn scale_rect(r: Rect, factor: f64) -> Rect {
    Rect::new(r.x * factor, r.y * factor, r.width * factor, r.height * factor)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn card_state() -> CropState {
        CropState::new(Dimensions::new(600.0, 800.0), AspectRatio::CARD, 0.8, 16.0)
    }

    #[test]
    fn test_handle_labels_parse_back() {
        for handle in Handle::ALL {
            assert_eq!(handle.label().parse::<Handle>(), Ok(handle));
        }
        assert_eq!(" SE ".parse::<Handle>(), Ok(Handle::SE));
        assert!("x".parse::<Handle>().is_err());
    }

    fn assert_valid(state: &CropState) {
        let r = state.region();
        assert!(
            (r.aspect() - state.aspect().value()).abs() < 1e-9,
            "aspect drifted: {:?}",
            r
        );
        assert!(r.fits_within(state.display()), "out of bounds: {:?}", r);
    }

    #[test]
    fn test_new_is_not_completed() {
        let state = card_state();
        assert!(!state.is_completed());
        assert_eq!(state.completed(), None);
        assert_valid(&state);
    }

    #[test]
    fn test_translate_clamps_at_edges() {
        let mut state = card_state();
        let r = state.translate(-1000.0, -1000.0);
        assert_eq!((r.x, r.y), (0.0, 0.0));

        let r = state.translate(5000.0, 5000.0);
        assert!((r.right() - 600.0).abs() < EPS);
        assert!((r.bottom() - 800.0).abs() < EPS);
        assert_valid(&state);
    }

    #[test]
    fn test_move_to_exact_position() {
        let mut state = card_state();
        state.set_region(Rect::new(0.0, 0.0, 400.0, 225.0));
        let r = state.move_to(50.0, 50.0);
        assert!(r.approx_eq(&Rect::new(50.0, 50.0, 400.0, 225.0), EPS));
    }

    #[test]
    fn test_resize_se_grows_from_top_left() {
        let mut state = card_state();
        let before = state.region();
        let r = state.resize(Handle::SE, 32.0, 0.0);
        assert!((r.x - before.x).abs() < EPS);
        assert!((r.y - before.y).abs() < EPS);
        assert!((r.width - (before.width + 32.0)).abs() < EPS);
        assert_valid(&state);
    }

    #[test]
    fn test_resize_nw_keeps_bottom_right() {
        let mut state = card_state();
        let before = state.region();
        let r = state.resize(Handle::NW, 16.0, 9.0);
        assert!((r.right() - before.right()).abs() < EPS);
        assert!((r.bottom() - before.bottom()).abs() < EPS);
        assert!(r.width < before.width);
        assert_valid(&state);
    }

    #[test]
    fn test_resize_corner_uses_dominant_axis() {
        let mut state = card_state();
        let before = state.region();
        // dy * 16/9 = 32 > dx = 1
        let r = state.resize(Handle::SE, 1.0, 18.0);
        assert!((r.width - (before.width + 32.0)).abs() < EPS);
    }

    #[test]
    fn test_resize_side_handle_keeps_cross_axis_centered() {
        let mut state = card_state();
        let before = state.region();
        let r = state.resize(Handle::E, 40.0, 0.0);
        assert!((r.x - before.x).abs() < EPS);
        assert!((r.center().1 - before.center().1).abs() < EPS);

        let before = state.region();
        let r = state.resize(Handle::N, 0.0, -9.0);
        assert!((r.bottom() - before.bottom()).abs() < EPS);
        assert!((r.center().0 - before.center().0).abs() < EPS);
        assert!((r.width - (before.width + 16.0)).abs() < EPS);
        assert_valid(&state);
    }

    #[test]
    fn test_resize_clamped_to_display() {
        let mut state = card_state();
        let r = state.resize(Handle::SE, 10_000.0, 0.0);
        // Anchored at x = 60, so at most 540 wide
        assert!((r.width - 540.0).abs() < EPS);
        assert_valid(&state);

        let r = state.resize(Handle::W, 10_000.0, 10_000.0);
        assert!(r.width <= 600.0 + EPS);
        assert_valid(&state);
    }

    #[test]
    fn test_resize_respects_min_width() {
        let mut state = card_state();
        let r = state.resize(Handle::SE, -10_000.0, 0.0);
        assert!((r.width - 16.0).abs() < EPS);
        assert!((r.height - 9.0).abs() < EPS);
        assert_valid(&state);
    }

    #[test]
    fn test_resize_ignores_non_finite_delta() {
        let mut state = card_state();
        let before = state.region();
        state.resize(Handle::SE, f64::NAN, f64::INFINITY);
        assert_eq!(state.region(), before);
    }

    #[test]
    fn test_set_region_snaps_aspect() {
        let mut state = card_state();
        let r = state.set_region(Rect::new(100.0, 100.0, 320.0, 100.0));
        assert!((r.height - 180.0).abs() < EPS);
        // Centered on the requested center (260, 150)
        assert!((r.center().0 - 260.0).abs() < EPS);
        assert!((r.center().1 - 150.0).abs() < EPS);
    }

    #[test]
    fn test_set_region_shrinks_oversized() {
        let mut state = CropState::new(Dimensions::new(300.0, 100.0), AspectRatio::DETAIL, 0.8, 0.0);
        let r = state.set_region(Rect::new(0.0, 0.0, 1000.0, 10.0));
        assert!((r.height - 100.0).abs() < EPS);
        assert_valid(&state);
    }

    #[test]
    fn test_zero_min_width_still_keeps_aspect() {
        let mut state = CropState::new(Dimensions::new(150.0, 200.0), AspectRatio::CARD, 0.8, 0.0);
        let r = state.resize(Handle::SE, -10_000.0, 0.0);
        assert!((r.width - MIN_CROP_EXTENT).abs() < EPS);
        assert!(r.height > 0.0);
        assert_valid(&state);

        let r = state.set_region(Rect::new(10.0, 10.0, 0.0, 0.0));
        assert!(r.width >= MIN_CROP_EXTENT);
        assert_valid(&state);
    }

    #[test]
    fn test_complete_snapshots_region() {
        let mut state = card_state();
        state.translate(10.0, 10.0);
        let done = state.complete();
        state.translate(20.0, 0.0);
        assert_eq!(state.completed(), Some(done));
        assert_ne!(state.region(), done);
    }

    #[test]
    fn test_reset_restores_default_only() {
        let mut state = card_state();
        let default = state.region();
        state.resize(Handle::SE, -100.0, 0.0);
        state.complete();
        let completed = state.completed();

        assert_eq!(state.reset(), default);
        assert_eq!(state.completed(), completed);
    }

    #[test]
    fn test_relayout_scales_proportionally() {
        let mut state = card_state();
        state.set_region(Rect::new(50.0, 50.0, 400.0, 225.0));
        state.complete();

        state.relayout(Dimensions::new(300.0, 400.0));
        let r = state.region();
        assert!(r.approx_eq(&Rect::new(25.0, 25.0, 200.0, 112.5), 1e-9));
        assert!(state
            .completed()
            .unwrap()
            .approx_eq(&Rect::new(25.0, 25.0, 200.0, 112.5), 1e-9));
        assert_valid(&state);
    }

    #[test]
    fn test_relayout_shrinks_below_min_width() {
        let mut state = card_state();
        state.resize(Handle::SE, -10_000.0, 0.0);
        let done = state.complete();
        assert!((done.width - 16.0).abs() < EPS);

        state.relayout(Dimensions::new(60.0, 80.0));
        let expected = Rect::new(done.x * 0.1, done.y * 0.1, 1.6, 0.9);
        assert!(state.region().approx_eq(&expected, 1e-9), "{:?}", state.region());
        assert!(state.completed().unwrap().approx_eq(&expected, 1e-9));
        assert_valid(&state);

        // Growing back restores the same rectangle.
        state.relayout(Dimensions::new(600.0, 800.0));
        assert!(state.completed().unwrap().approx_eq(&done, 1e-9));
    }

    #[test]
    fn test_relayout_ignores_empty_display() {
        let mut state = card_state();
        let before = state.clone();
        state.relayout(Dimensions::new(0.0, 0.0));
        assert_eq!(state, before);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
