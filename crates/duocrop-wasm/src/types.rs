//! WASM-compatible wrapper types for derivatives.
//!
//! Encoded bytes live in WASM memory until JavaScript asks for them, at which
//! point a copy is handed over as a `Uint8Array`.

use duocrop_core::crop::Handle;
use duocrop_core::{EncodedDerivative, ExportResult, Mode};
use wasm_bindgen::prelude::*;

/// One encoded derivative (preview or final output).
#[wasm_bindgen]
pub struct JsDerivative {
    width: u32,
    height: u32,
    content_type: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsDerivative {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// MIME type to upload the bytes with, e.g. `image/jpeg`.
    #[wasm_bindgen(getter)]
    pub fn content_type(&self) -> String {
        self.content_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// Returns the encoded bytes as a Uint8Array (copied).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<&EncodedDerivative> for JsDerivative {
    fn from(derivative: &EncodedDerivative) -> Self {
        Self {
            width: derivative.width,
            height: derivative.height,
            content_type: derivative.content_type().to_string(),
            bytes: derivative.bytes.clone(),
        }
    }
}

/// Both final derivatives of an export.
#[wasm_bindgen]
pub struct JsExportResult {
    card: EncodedDerivative,
    detail: EncodedDerivative,
}

#[wasm_bindgen]
impl JsExportResult {
    #[wasm_bindgen(getter)]
    pub fn card(&self) -> JsDerivative {
        JsDerivative::from(&self.card)
    }

    #[wasm_bindgen(getter)]
    pub fn detail(&self) -> JsDerivative {
        JsDerivative::from(&self.detail)
    }
}

impl From<ExportResult> for JsExportResult {
    fn from(result: ExportResult) -> Self {
        Self {
            card: result.card,
            detail: result.detail,
        }
    }
}

/// Parse a mode name coming from JavaScript ("card" or "detail").
pub(crate) fn parse_mode(value: &str) -> Result<Mode, String> {
    value.parse()
}

/// Parse a resize handle name ("n", "se", ...).
pub(crate) fn parse_handle(value: &str) -> Result<Handle, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use duocrop_core::encode::OutputFormat;
    use duocrop_core::PerMode;

    fn derivative(width: u32, height: u32) -> EncodedDerivative {
        EncodedDerivative {
            width,
            height,
            format: OutputFormat::Jpeg,
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
        }
    }

    #[test]
    fn test_js_derivative_from_core() {
        let js = JsDerivative::from(&derivative(640, 360));
        assert_eq!((js.width(), js.height()), (640, 360));
        assert_eq!(js.content_type(), "image/jpeg");
        assert_eq!(js.byte_length(), 4);
        assert_eq!(&js.bytes()[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_export_result_getters() {
        let result = JsExportResult::from(PerMode::new(derivative(640, 360), derivative(400, 600)));
        assert_eq!(result.card().width(), 640);
        assert_eq!(result.detail().height(), 600);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("card"), Ok(Mode::Card));
        assert_eq!(parse_mode("Detail"), Ok(Mode::Detail));
        assert!(parse_mode("banner").is_err());
    }

    #[test]
    fn test_parse_handle() {
        assert_eq!(parse_handle("se"), Ok(Handle::SE));
        assert_eq!(parse_handle("N"), Ok(Handle::N));
        assert!(parse_handle("middle").is_err());
    }
}
