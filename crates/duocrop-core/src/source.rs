//! File selection, validation and the session's hold on the source pixels.

use std::fmt;
use std::sync::Arc;

use crate::decode::{decode_image, DecodedImage};
use crate::error::{CropError, ValidationError};
use crate::geometry::Dimensions;

/// Default upper bound on the size of a selected file (10 MiB).
pub const MAX_SOURCE_BYTES: u64 = 10 * 1024 * 1024;

/// A file picked by the user, before any decoding.
#[derive(Clone)]
pub struct SelectedFile {
    pub name: String,
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Check type and size of a selected file.
///
/// Runs before decoding so an oversized file is rejected without touching its
/// contents.
pub fn validate_selection(file: &SelectedFile, max_bytes: u64) -> Result<(), ValidationError> {
    if !file.content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            content_type: file.content_type.clone(),
        });
    }
    if file.size() > max_bytes {
        return Err(ValidationError::TooLarge {
            size: file.size(),
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Validate and decode a selected file into a shareable source.
pub fn load_selection(file: &SelectedFile, max_bytes: u64) -> Result<SourceImage, ValidationError> {
    validate_selection(file, max_bytes)?;
    let image = decode_image(&file.bytes)?;
    Ok(SourceImage::new(image))
}

/// Read-only handle to decoded source pixels.
///
/// Cloning is cheap and clones may be sent to other threads; the pixels are
/// never mutated after decoding.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<DecodedImage>,
}

impl SourceImage {
    pub fn new(image: DecodedImage) -> Self {
        Self {
            pixels: Arc::new(image),
        }
    }

    pub fn pixels(&self) -> &DecodedImage {
        &self.pixels
    }

    /// Full-resolution size.
    pub fn natural_size(&self) -> Dimensions {
        Dimensions::from(self.pixels.dimensions())
    }
}

/// Callback invoked once the session lets go of the source.
pub type ReleaseHook = Box<dyn FnOnce()>;

/// The session's owning reference to its source.
///
/// Released exactly once: explicitly through [`SourceLease::release`], or on
/// drop if that never happened.
pub struct SourceLease {
    source: Option<SourceImage>,
    on_release: Option<ReleaseHook>,
}

impl SourceLease {
    pub fn new(source: SourceImage, on_release: Option<ReleaseHook>) -> Self {
        Self {
            source: Some(source),
            on_release,
        }
    }

    /// # Errors
    ///
    /// `CropError::SourceUnavailable` after release.
    pub fn get(&self) -> Result<&SourceImage, CropError> {
        self.source.as_ref().ok_or(CropError::SourceUnavailable)
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }

    /// Drop the session's reference and run the release hook. Later calls do
    /// nothing.
    pub fn release(&mut self) {
        if self.source.take().is_some() {
            log::debug!("Released source image");
        }
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

impl Drop for SourceLease {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SourceLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceLease")
            .field("source", &self.source)
            .field("has_release_hook", &self.on_release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_hook() -> (Rc<Cell<u32>>, ReleaseHook) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, Box::new(move || inner.set(inner.get() + 1)))
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([1, 2, 3]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_rejects_non_image_type() {
        let file = SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(matches!(
            validate_selection(&file, MAX_SOURCE_BYTES),
            Err(ValidationError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_file_without_decoding() {
        // 11 MB of zeros is not a valid image; size must be checked first
        let file = SelectedFile::new("big.jpg", "image/jpeg", vec![0; 11 * 1024 * 1024]);
        assert!(matches!(
            load_selection(&file, MAX_SOURCE_BYTES),
            Err(ValidationError::TooLarge { limit: MAX_SOURCE_BYTES, .. })
        ));
    }

    #[test]
    fn test_accepts_limit_exactly() {
        let file = SelectedFile::new("edge.png", "image/png", vec![0; 1024]);
        assert!(validate_selection(&file, 1024).is_ok());
        assert!(validate_selection(&file, 1023).is_err());
    }

    #[test]
    fn test_content_type_case_insensitive() {
        let file = SelectedFile::new("a.PNG", "Image/PNG", vec![0; 4]);
        assert!(validate_selection(&file, MAX_SOURCE_BYTES).is_ok());
    }

    #[test]
    fn test_undecodable_image() {
        let file = SelectedFile::new("fake.png", "image/png", vec![1, 2, 3, 4]);
        assert!(matches!(
            load_selection(&file, MAX_SOURCE_BYTES),
            Err(ValidationError::Undecodable(_))
        ));
    }

    #[test]
    fn test_load_selection_decodes() {
        let file = SelectedFile::new("p.png", "image/png", png_bytes(30, 20));
        let source = load_selection(&file, MAX_SOURCE_BYTES).unwrap();
        assert_eq!(source.natural_size(), Dimensions::new(30.0, 20.0));
    }

    #[test]
    fn test_lease_release_runs_hook_once() {
        let (count, hook) = counting_hook();
        let mut lease = SourceLease::new(SourceImage::new(DecodedImage::filled(2, 2, [0; 3])), Some(hook));

        assert!(lease.get().is_ok());
        lease.release();
        lease.release();
        assert!(lease.is_released());
        assert!(matches!(lease.get(), Err(CropError::SourceUnavailable)));
        drop(lease);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_lease_drop_releases() {
        let (count, hook) = counting_hook();
        let lease = SourceLease::new(SourceImage::new(DecodedImage::filled(2, 2, [0; 3])), Some(hook));
        drop(lease);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_lease_drops_its_pixel_reference() {
        let source = SourceImage::new(DecodedImage::filled(2, 2, [0; 3]));
        let weak = Arc::downgrade(&source.pixels);
        let mut lease = SourceLease::new(source, None);
        assert!(weak.upgrade().is_some());
        lease.release();
        assert!(weak.upgrade().is_none());
    }
}
