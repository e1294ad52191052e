//! Aspect-constrained crop regions.
//!
//! Each derivative mode owns one [`CropState`]. The state only exposes
//! mutations that keep the rectangle at its fixed aspect ratio and inside the
//! displayed image, so no intermediate invalid rectangle is ever observable.

mod aspect;
mod state;

pub use aspect::{centered_crop, AspectRatio};
pub use state::{CropState, Handle};
