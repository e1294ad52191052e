//! Final derivative generation.

use crate::error::CropError;
use crate::geometry::Rect;
use crate::mode::{Mode, PerMode};
use crate::raster::{EncodedDerivative, OutputSpec, Rasterizer};
use crate::source::SourceImage;
use crate::transform::CoordinateTransform;

/// Both encoded derivatives of one export.
pub type ExportResult = PerMode<EncodedDerivative>;

/// Renders the completed crops at their full output sizes.
#[derive(Debug, Clone)]
pub struct ExportPipeline {
    rasterizer: Rasterizer,
    outputs: PerMode<OutputSpec>,
}

impl ExportPipeline {
    pub fn new(rasterizer: Rasterizer, outputs: PerMode<OutputSpec>) -> Self {
        Self { rasterizer, outputs }
    }

    pub fn outputs(&self) -> &PerMode<OutputSpec> {
        &self.outputs
    }

    /// Rasterize both completed crops.
    ///
    /// # Errors
    ///
    /// - `CropError::IncompleteCrop` if either mode has no completed crop;
    ///   nothing is rendered in that case
    /// - any rasterization error of either mode
    pub fn run(
        &self,
        source: &SourceImage,
        transform: &CoordinateTransform,
        completed: PerMode<Option<Rect>>,
    ) -> Result<ExportResult, CropError> {
        let regions = completed.try_map(|mode, rect| {
            rect.map(|r| transform.to_natural(r))
                .ok_or(CropError::IncompleteCrop(mode))
        })?;

        let result = self.render_both(source, &regions)?;
        log::info!(
            "Exported card {}x{} ({} bytes) and detail {}x{} ({} bytes)",
            result.card.width,
            result.card.height,
            result.card.len(),
            result.detail.width,
            result.detail.height,
            result.detail.len()
        );
        Ok(result)
    }

    fn render_one(
        &self,
        mode: Mode,
        source: &SourceImage,
        regions: &PerMode<Rect>,
    ) -> Result<EncodedDerivative, CropError> {
        self.rasterizer.rasterize(source, regions[mode], &self.outputs[mode])
    }

    #[cfg(feature = "parallel")]
    fn render_both(
        &self,
        source: &SourceImage,
        regions: &PerMode<Rect>,
    ) -> Result<ExportResult, CropError> {
        let (card, detail) = rayon::join(
            || self.render_one(Mode::Card, source, regions),
            || self.render_one(Mode::Detail, source, regions),
        );
        Ok(PerMode::new(card?, detail?))
    }

    #[cfg(not(feature = "parallel"))]
    fn render_both(
        &self,
        source: &SourceImage,
        regions: &PerMode<Rect>,
    ) -> Result<ExportResult, CropError> {
        Ok(PerMode::new(
            self.render_one(Mode::Card, source, regions)?,
            self.render_one(Mode::Detail, source, regions)?,
        ))
    }
}
