//! Crop session bindings.
//!
//! # Example
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const session = new JsCropSession(file.name, file.type, bytes, undefined,
//!   () => URL.revokeObjectURL(objectUrl));
//!
//! session.on_image_displayed(img.width, img.height);
//! session.drag(dx, dy);
//! const preview = session.complete_interaction(); // JsDerivative | undefined
//!
//! if (session.can_save()) {
//!   const paths = session.storage_paths(userId, characterId);
//!   const result = session.export();
//!   // upload result.card.bytes() to paths.card, result.detail.bytes() to paths.detail
//!   session.close();
//! }
//! ```

use duocrop_core::{
    CropError, CropSession, DerivativePaths, DerivativeStorage, Dimensions, EngineConfig, Mode,
    PerMode, PersistenceError, Preview, RecordStore, Rect, SelectedFile, UploadError,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{parse_handle, parse_mode, JsDerivative, JsExportResult};

fn to_js(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn preview_to_js(preview: &Preview) -> Option<JsDerivative> {
    preview.derivative().map(JsDerivative::from)
}

/// Live and completed rectangle of one mode, in display pixels.
#[derive(Serialize)]
struct RegionView {
    region: Rect,
    completed: Option<Rect>,
}

/// A crop session driven from JavaScript.
///
/// Dropping the JS object (or calling `free()`) releases the source just like
/// `cancel()`.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: Option<CropSession>,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Validate and decode a selected file.
    ///
    /// # Arguments
    /// * `config` - optional engine configuration object; defaults apply to
    ///   omitted fields
    /// * `on_release` - optional callback invoked once the source is no longer
    ///   needed (e.g. to revoke an object URL)
    ///
    /// # Errors
    /// Throws the validation message ("Please select an image file", size
    /// limit) when the file is rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(
        name: String,
        content_type: String,
        bytes: Vec<u8>,
        config: JsValue,
        on_release: Option<js_sys::Function>,
    ) -> Result<JsCropSession, JsValue> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?
        };
        let hook = on_release.map(|f| -> Box<dyn FnOnce()> {
            Box::new(move || {
                if let Err(e) = f.call0(&JsValue::NULL) {
                    log::warn!("Release callback threw: {:?}", e);
                }
            })
        });

        let file = SelectedFile::new(name, content_type, bytes);
        let inner = CropSession::open_with_release(&file, config, hook).map_err(to_js)?;
        Ok(JsCropSession { inner: Some(inner) })
    }

    /// Natural (full-resolution) width of the source.
    #[wasm_bindgen(getter)]
    pub fn natural_width(&self) -> Result<f64, JsValue> {
        Ok(self.session()?.natural_size().map_err(to_js)?.width)
    }

    #[wasm_bindgen(getter)]
    pub fn natural_height(&self) -> Result<f64, JsValue> {
        Ok(self.session()?.natural_size().map_err(to_js)?.height)
    }

    /// Report the rendered size of the image (call again on window resize).
    pub fn on_image_displayed(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.session_mut()?
            .on_image_displayed(Dimensions::new(width, height))
            .map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn active_mode(&self) -> Result<String, JsValue> {
        Ok(self.session()?.active_mode().label().to_string())
    }

    /// Switch the active mode ("card" or "detail").
    pub fn set_active_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = parse_mode(mode).map_err(|e| JsValue::from_str(&e))?;
        self.session_mut()?.set_active_mode(mode).map_err(to_js)
    }

    /// `{ region, completed }` of a mode, in display pixels.
    pub fn region(&self, mode: &str) -> Result<JsValue, JsValue> {
        let mode = parse_mode(mode).map_err(|e| JsValue::from_str(&e))?;
        let crop = self.session()?.crop(mode).map_err(to_js)?;
        to_value(&RegionView {
            region: crop.region(),
            completed: crop.completed(),
        })
    }

    /// Move the active crop; returns the new rectangle.
    pub fn drag(&mut self, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        let rect = self.session_mut()?.drag(dx, dy).map_err(to_js)?;
        to_value(&rect)
    }

    /// Drag a resize handle ("n", "s", "e", "w", "ne", "nw", "se", "sw").
    pub fn resize(&mut self, handle: &str, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        let handle = parse_handle(handle).map_err(|e| JsValue::from_str(&e))?;
        let rect = self.session_mut()?.resize(handle, dx, dy).map_err(to_js)?;
        to_value(&rect)
    }

    /// Replace the active crop with a rectangle from the host UI.
    pub fn set_region(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<JsValue, JsValue> {
        let rect = self
            .session_mut()?
            .set_region(Rect::new(x, y, width, height))
            .map_err(to_js)?;
        to_value(&rect)
    }

    /// Pointer released: capture the crop and return the fresh preview.
    pub fn complete_interaction(&mut self) -> Result<Option<JsDerivative>, JsValue> {
        let preview = self.session_mut()?.complete_interaction().map_err(to_js)?;
        Ok(preview_to_js(preview))
    }

    /// Reset the active mode to its centered default.
    pub fn reset_active(&mut self) -> Result<Option<JsDerivative>, JsValue> {
        let preview = self.session_mut()?.reset_active().map_err(to_js)?;
        Ok(preview_to_js(preview))
    }

    /// Current preview of a mode, or `undefined` for the placeholder.
    pub fn preview(&self, mode: &str) -> Result<Option<JsDerivative>, JsValue> {
        let mode = parse_mode(mode).map_err(|e| JsValue::from_str(&e))?;
        Ok(preview_to_js(self.session()?.preview(mode).map_err(to_js)?))
    }

    pub fn can_save(&self) -> bool {
        self.inner.as_ref().is_some_and(CropSession::can_save)
    }

    /// `{ state: "idle" | "saving" | "failed", message? }`
    pub fn save_state(&self) -> Result<JsValue, JsValue> {
        to_value(self.session()?.save_state())
    }

    /// Storage object names for this save: `{ card, detail }`.
    pub fn storage_paths(&self, owner: &str, record_id: Option<String>) -> Result<JsValue, JsValue> {
        let paths = self.paths(owner, record_id.as_deref())?;
        let outputs = self.session()?.config().outputs();
        to_value(&PerMode::new(
            paths.path(Mode::Card, outputs.card.format),
            paths.path(Mode::Detail, outputs.detail.format),
        ))
    }

    /// Render both derivatives at full output size.
    pub fn export(&mut self) -> Result<JsExportResult, JsValue> {
        let result = self.session_mut()?.export().map_err(to_js)?;
        Ok(JsExportResult::from(result))
    }

    /// Export and publish through synchronous callbacks.
    ///
    /// * `upload(path, bytes, contentType, overwrite)` must return the public URL
    ///   or throw
    /// * `store({ card, detail })` must persist the URLs or throw
    ///
    /// On success the session closes; on failure it stays open for a retry.
    pub fn save_with(
        &mut self,
        owner: &str,
        record_id: Option<String>,
        upload: js_sys::Function,
        store: js_sys::Function,
    ) -> Result<JsValue, JsValue> {
        let paths = self.paths(owner, record_id.as_deref())?;
        let mut storage = JsStorage { upload };
        let mut records = JsRecords { store };
        let session = self.session_mut()?;
        let urls = session
            .save(&mut storage, &mut records, &paths)
            .map_err(to_js)?;
        if session.is_closed() {
            self.inner = None;
        }
        to_value(&urls)
    }

    /// Discard the session and release the source.
    pub fn cancel(&mut self) {
        if let Some(session) = self.inner.take() {
            session.cancel();
        }
    }

    /// Close after the host finished its own uploads.
    pub fn close(&mut self) {
        if let Some(session) = self.inner.take() {
            session.close();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn is_closed(&self) -> bool {
        self.inner.as_ref().map_or(true, CropSession::is_closed)
    }
}

impl JsCropSession {
    fn session(&self) -> Result<&CropSession, JsValue> {
        self.inner
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Crop session has been closed"))
    }

    fn session_mut(&mut self) -> Result<&mut CropSession, JsValue> {
        self.inner
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Crop session has been closed"))
    }

    fn paths(&self, owner: &str, record_id: Option<&str>) -> Result<DerivativePaths, JsValue> {
        let folder = &self.session()?.config().storage_folder;
        let now = js_sys::Date::now().max(0.0) as u64;
        Ok(DerivativePaths::new(owner, record_id, folder, now))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

struct JsStorage {
    upload: js_sys::Function,
}

impl DerivativeStorage for JsStorage {
    fn upload(
        &mut self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
        overwrite: bool,
    ) -> Result<String, UploadError> {
        let args = js_sys::Array::of4(
            &JsValue::from_str(path),
            &js_sys::Uint8Array::from(bytes),
            &JsValue::from_str(content_type),
            &JsValue::from_bool(overwrite),
        );
        let url = self
            .upload
            .apply(&JsValue::NULL, &args)
            .map_err(|e| UploadError::new(path, describe(&e)))?;
        url.as_string()
            .ok_or_else(|| UploadError::new(path, "upload callback did not return a URL"))
    }
}

struct JsRecords {
    store: js_sys::Function,
}

impl RecordStore for JsRecords {
    fn store_references(&mut self, urls: &PerMode<String>) -> Result<(), PersistenceError> {
        let value = serde_wasm_bindgen::to_value(urls).map_err(|e| PersistenceError(e.to_string()))?;
        self.store
            .call1(&JsValue::NULL, &value)
            .map(|_| ())
            .map_err(|e| PersistenceError(describe(&e)))
    }
}
