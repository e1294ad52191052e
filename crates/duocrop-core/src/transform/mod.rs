//! Coordinate mapping and pixel extraction.
//!
//! # Coordinate System
//!
//! - Display space: pixels of the scaled rendering the user drags over
//! - Natural space: pixels of the decoded source at full resolution
//! - Origin is the top-left corner in both spaces
//!
//! Crop regions are edited in display space and converted with
//! [`CoordinateTransform::to_natural`] right before sampling, so output
//! quality never depends on how large the editor happens to be on screen.

mod crop;
mod scale;

pub use crop::crop_pixels;
pub use scale::CoordinateTransform;
