//! The crop session: one source image, two crops, two derivatives.
//!
//! A session is created from a validated file, follows the displayed image
//! size, routes pointer edits to the active mode, keeps previews current and
//! finally exports and publishes both derivatives. It owns the only lease on
//! the source pixels and releases it exactly once, whether the session ends by
//! a successful save, by cancellation, or by being dropped.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::crop::{CropState, Handle};
use crate::error::CropError;
use crate::export::{ExportPipeline, ExportResult};
use crate::geometry::{Dimensions, Rect};
use crate::mode::{Mode, PerMode};
use crate::preview::{Preview, PreviewRenderer};
use crate::publish::{publish, DerivativePaths, DerivativeStorage, RecordStore};
use crate::raster::Rasterizer;
use crate::source::{load_selection, ReleaseHook, SelectedFile, SourceImage, SourceLease};
use crate::transform::CoordinateTransform;

const CLOSED: CropError = CropError::InvalidState("session is closed");
const NOT_DISPLAYED: CropError = CropError::InvalidState("image has not been displayed yet");

/// Progress of the save action, for the host UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Failed { message: String },
}

pub struct CropSession {
    config: EngineConfig,
    lease: SourceLease,
    transform: Option<CoordinateTransform>,
    crops: Option<PerMode<CropState>>,
    active: Mode,
    previews: PreviewRenderer,
    pipeline: ExportPipeline,
    save_state: SaveState,
    closed: bool,
}

impl CropSession {
    /// Validate and decode `file` and start a session on it.
    ///
    /// # Errors
    ///
    /// `CropError::Validation` for a non-image, oversized or undecodable
    /// file; `CropError::Config` for an unusable configuration. No session
    /// exists in either case.
    pub fn open(file: &SelectedFile, config: EngineConfig) -> Result<Self, CropError> {
        Self::open_with_release(file, config, None)
    }

    /// Like [`CropSession::open`], with a hook run once the session lets go
    /// of the source. The hook is dropped unrun when opening fails.
    pub fn open_with_release(
        file: &SelectedFile,
        config: EngineConfig,
        on_release: Option<ReleaseHook>,
    ) -> Result<Self, CropError> {
        config.validate()?;
        let source = load_selection(file, config.max_source_bytes).map_err(|e| {
            log::warn!("Rejected {:?}: {e}", file.name);
            e
        })?;
        log::info!(
            "Opened crop session for {:?} ({}x{})",
            file.name,
            source.pixels().width,
            source.pixels().height
        );
        Self::from_source(source, config, on_release)
    }

    /// Start a session on already decoded pixels.
    pub fn from_source(
        source: SourceImage,
        config: EngineConfig,
        on_release: Option<ReleaseHook>,
    ) -> Result<Self, CropError> {
        config.validate()?;
        let rasterizer = Rasterizer::new(config.filter);
        Ok(Self {
            previews: PreviewRenderer::new(rasterizer, config.previews()),
            pipeline: ExportPipeline::new(rasterizer, config.outputs()),
            lease: SourceLease::new(source, on_release),
            config,
            transform: None,
            crops: None,
            active: Mode::default(),
            save_state: SaveState::Idle,
            closed: false,
        })
    }

    fn ensure_open(&self) -> Result<(), CropError> {
        if self.closed {
            Err(CLOSED)
        } else {
            Ok(())
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Full-resolution size of the source.
    pub fn natural_size(&self) -> Result<Dimensions, CropError> {
        self.ensure_open()?;
        Ok(self.lease.get()?.natural_size())
    }

    /// Report the size the image is rendered at.
    ///
    /// The first call places both crops at their centered default. Later
    /// calls (window resize) rescale existing crops proportionally.
    pub fn on_image_displayed(&mut self, display: Dimensions) -> Result<(), CropError> {
        self.ensure_open()?;
        let natural = self.lease.get()?.natural_size();
        let transform = CoordinateTransform::new(display, natural)?;
        self.transform = Some(transform);

        match self.crops.as_mut() {
            None => {
                let config = &self.config;
                self.crops = Some(PerMode::from_fn(|mode| {
                    CropState::new(
                        display,
                        config.modes[mode].aspect,
                        config.initial_coverage,
                        config.min_crop_width,
                    )
                }));
            }
            Some(crops) => {
                for mode in Mode::ALL {
                    crops[mode].relayout(display);
                }
                for mode in Mode::ALL {
                    self.refresh_preview(mode)?;
                }
            }
        }
        Ok(())
    }

    pub fn is_displayed(&self) -> bool {
        self.crops.is_some()
    }

    pub fn active_mode(&self) -> Mode {
        self.active
    }

    /// Switch which crop pointer edits apply to. The other crop is untouched.
    pub fn set_active_mode(&mut self, mode: Mode) -> Result<(), CropError> {
        self.ensure_open()?;
        if self.active != mode {
            log::debug!("Active crop mode {} -> {}", self.active, mode);
            self.active = mode;
        }
        Ok(())
    }

    pub fn crop(&self, mode: Mode) -> Result<&CropState, CropError> {
        self.ensure_open()?;
        self.crops.as_ref().map(|c| &c[mode]).ok_or(NOT_DISPLAYED)
    }

    /// The completed crop of `mode` mapped to natural pixels.
    pub fn natural_region(&self, mode: Mode) -> Result<Option<Rect>, CropError> {
        let completed = self.crop(mode)?.completed();
        let transform = self.transform.as_ref().ok_or(NOT_DISPLAYED)?;
        Ok(completed.map(|r| transform.to_natural(r)))
    }

    fn active_crop_mut(&mut self) -> Result<&mut CropState, CropError> {
        self.ensure_open()?;
        let active = self.active;
        self.crops.as_mut().map(|c| &mut c[active]).ok_or(NOT_DISPLAYED)
    }

    /// Move the active crop by a pointer delta.
    pub fn drag(&mut self, dx: f64, dy: f64) -> Result<Rect, CropError> {
        Ok(self.active_crop_mut()?.translate(dx, dy))
    }

    /// Drag a resize handle of the active crop.
    pub fn resize(&mut self, handle: Handle, dx: f64, dy: f64) -> Result<Rect, CropError> {
        Ok(self.active_crop_mut()?.resize(handle, dx, dy))
    }

    /// Replace the active crop with a host-supplied rectangle, normalized to
    /// the mode's aspect and the display bounds.
    pub fn set_region(&mut self, rect: Rect) -> Result<Rect, CropError> {
        Ok(self.active_crop_mut()?.set_region(rect))
    }

    /// End of a pointer interaction: capture the active crop and refresh its
    /// preview.
    pub fn complete_interaction(&mut self) -> Result<&Preview, CropError> {
        let mode = self.active;
        self.active_crop_mut()?.complete();
        self.refresh_preview(mode)
    }

    /// Put the active crop back to its centered default. Counts as a
    /// completed interaction; the other mode is left alone.
    pub fn reset_active(&mut self) -> Result<&Preview, CropError> {
        let mode = self.active;
        let crop = self.active_crop_mut()?;
        crop.reset();
        crop.complete();
        log::debug!("Reset {mode} crop");
        self.refresh_preview(mode)
    }

    fn refresh_preview(&mut self, mode: Mode) -> Result<&Preview, CropError> {
        let source = self.lease.get()?;
        let transform = self.transform.as_ref().ok_or(NOT_DISPLAYED)?;
        let completed = self.crops.as_ref().and_then(|c| c[mode].completed());
        self.previews.refresh(mode, source, transform, completed)
    }

    pub fn preview(&self, mode: Mode) -> Result<&Preview, CropError> {
        self.ensure_open()?;
        Ok(self.previews.get(mode))
    }

    fn completed_crops(&self) -> PerMode<Option<Rect>> {
        match &self.crops {
            Some(crops) => PerMode::new(crops.card.completed(), crops.detail.completed()),
            None => PerMode::new(None, None),
        }
    }

    /// Whether the save action should be enabled.
    pub fn can_save(&self) -> bool {
        let completed = self.completed_crops();
        !self.closed
            && self.save_state != SaveState::Saving
            && completed.card.is_some()
            && completed.detail.is_some()
    }

    pub fn save_state(&self) -> &SaveState {
        &self.save_state
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn fail(&mut self, err: &CropError) {
        log::error!("Saving crops failed: {err}");
        self.save_state = SaveState::Failed {
            message: err.to_string(),
        };
    }

    fn render_exports(&mut self) -> Result<ExportResult, CropError> {
        self.ensure_open()?;
        self.save_state = SaveState::Saving;
        let completed = self.completed_crops();
        let result = match (self.lease.get(), self.transform.as_ref()) {
            (Ok(source), Some(transform)) => self.pipeline.run(source, transform, completed),
            (Err(e), _) => Err(e),
            (_, None) => Err(NOT_DISPLAYED),
        };
        if let Err(e) = &result {
            self.fail(e);
        }
        result
    }

    /// Render both derivatives at their output sizes without publishing.
    ///
    /// The session stays open either way; a failure is recorded in
    /// [`CropSession::save_state`].
    pub fn export(&mut self) -> Result<ExportResult, CropError> {
        let result = self.render_exports()?;
        self.save_state = SaveState::Idle;
        Ok(result)
    }

    /// Export, upload and record both derivatives.
    ///
    /// On success the session closes and releases the source. On failure it
    /// stays open with both crops intact so the user can retry.
    pub fn save(
        &mut self,
        storage: &mut dyn DerivativeStorage,
        records: &mut dyn RecordStore,
        paths: &DerivativePaths,
    ) -> Result<PerMode<String>, CropError> {
        let result = self.render_exports()?;
        match publish(&result, paths, storage, records) {
            Ok(urls) => {
                self.save_state = SaveState::Idle;
                self.finish();
                Ok(urls)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn finish(&mut self) {
        if !self.closed {
            self.closed = true;
            self.lease.release();
            log::debug!("Closed crop session");
        }
    }

    /// Abandon the session without saving.
    pub fn cancel(mut self) {
        if !self.closed {
            log::info!("Crop session cancelled");
        }
        self.finish();
    }

    /// End the session. Equivalent to [`CropSession::cancel`] unless the
    /// session already closed itself after a save.
    pub fn close(mut self) {
        self.finish();
    }
}

impl std::fmt::Debug for CropSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropSession")
            .field("active", &self.active)
            .field("crops", &self.crops)
            .field("save_state", &self.save_state)
            .field("closed", &self.closed)
            .finish()
    }
}
