//! Live previews of the current crops.
//!
//! Previews go through the same [`Rasterizer`] as the final export, only at a
//! smaller [`OutputSpec`], so what the user sees cannot drift from what gets
//! saved.

use crate::error::CropError;
use crate::geometry::Rect;
use crate::mode::{Mode, PerMode};
use crate::raster::{EncodedDerivative, OutputSpec, Rasterizer};
use crate::source::SourceImage;
use crate::transform::CoordinateTransform;

/// What the host should show for one mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Preview {
    /// No completed crop yet.
    #[default]
    Placeholder,
    Ready(EncodedDerivative),
}

impl Preview {
    pub fn is_ready(&self) -> bool {
        matches!(self, Preview::Ready(_))
    }

    pub fn derivative(&self) -> Option<&EncodedDerivative> {
        match self {
            Preview::Ready(d) => Some(d),
            Preview::Placeholder => None,
        }
    }
}

/// Holds the latest preview per mode.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    rasterizer: Rasterizer,
    outputs: PerMode<OutputSpec>,
    previews: PerMode<Preview>,
}

impl PreviewRenderer {
    pub fn new(rasterizer: Rasterizer, outputs: PerMode<OutputSpec>) -> Self {
        Self {
            rasterizer,
            outputs,
            previews: PerMode::default(),
        }
    }

    /// Recompute `mode`'s preview from scratch.
    ///
    /// Without a completed crop the slot goes back to the placeholder. On
    /// error the previous preview is left as it was.
    pub fn refresh(
        &mut self,
        mode: Mode,
        source: &SourceImage,
        transform: &CoordinateTransform,
        completed: Option<Rect>,
    ) -> Result<&Preview, CropError> {
        let preview = match completed {
            None => Preview::Placeholder,
            Some(region) => {
                let natural = transform.to_natural(region);
                let derivative = self.rasterizer.rasterize(source, natural, &self.outputs[mode])?;
                log::debug!(
                    "Refreshed {} preview from natural region {:?} ({} bytes)",
                    mode,
                    natural,
                    derivative.len()
                );
                Preview::Ready(derivative)
            }
        };
        self.previews[mode] = preview;
        Ok(&self.previews[mode])
    }

    pub fn get(&self, mode: Mode) -> &Preview {
        &self.previews[mode]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodedImage, FilterType};
    use crate::geometry::Dimensions;

    fn setup() -> (PreviewRenderer, SourceImage, CoordinateTransform) {
        let renderer = PreviewRenderer::new(
            Rasterizer::new(FilterType::Bilinear),
            PerMode::new(OutputSpec::jpeg(160, 90), OutputSpec::jpeg(160, 240)),
        );
        let source = SourceImage::new(DecodedImage::filled(600, 800, [90, 120, 150]));
        let transform =
            CoordinateTransform::new(Dimensions::new(300.0, 400.0), source.natural_size()).unwrap();
        (renderer, source, transform)
    }

    #[test]
    fn test_starts_with_placeholders() {
        let (renderer, _, _) = setup();
        for mode in Mode::ALL {
            assert_eq!(renderer.get(mode), &Preview::Placeholder);
        }
    }

    #[test]
    fn test_refresh_renders_at_preview_size() {
        let (mut renderer, source, transform) = setup();
        let preview = renderer
            .refresh(Mode::Detail, &source, &transform, Some(Rect::new(10.0, 10.0, 200.0, 300.0)))
            .unwrap();
        let derivative = preview.derivative().unwrap();
        assert_eq!((derivative.width, derivative.height), (160, 240));
        assert!(!renderer.get(Mode::Card).is_ready());
    }

    #[test]
    fn test_refresh_without_completed_crop_is_placeholder() {
        let (mut renderer, source, transform) = setup();
        renderer
            .refresh(Mode::Card, &source, &transform, Some(Rect::new(0.0, 0.0, 160.0, 90.0)))
            .unwrap();
        assert!(renderer.get(Mode::Card).is_ready());
        renderer.refresh(Mode::Card, &source, &transform, None).unwrap();
        assert_eq!(renderer.get(Mode::Card), &Preview::Placeholder);
    }

    #[test]
    fn test_failed_refresh_keeps_previous() {
        let (mut renderer, source, transform) = setup();
        renderer
            .refresh(Mode::Card, &source, &transform, Some(Rect::new(0.0, 0.0, 160.0, 90.0)))
            .unwrap();
        let empty = SourceImage::new(DecodedImage::new(0, 0, vec![]));
        let result = renderer.refresh(Mode::Card, &empty, &transform, Some(Rect::new(0.0, 0.0, 16.0, 9.0)));
        assert!(matches!(result, Err(CropError::SourceUnavailable)));
        assert!(renderer.get(Mode::Card).is_ready());
    }
}
