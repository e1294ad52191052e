//! Duocrop WASM - WebAssembly bindings for the crop session
//!
//! This crate exposes the duocrop-core session to JavaScript/TypeScript so
//! the crop modal can run entirely in the browser.
//!
//! # Module Structure
//!
//! - `session` - `JsCropSession`, the interactive crop session
//! - `types` - WASM-compatible wrappers for encoded derivatives
//! - `logger` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, set_log_level } from '@duocrop/wasm';
//!
//! await init();
//! set_log_level('debug');
//!
//! const session = new JsCropSession(file.name, file.type, bytes);
//! ```

use wasm_bindgen::prelude::*;

mod logger;
mod session;
mod types;

pub use session::JsCropSession;
pub use types::{JsDerivative, JsExportResult};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Change console verbosity ("error", "warn", "info", "debug", "trace" or "off").
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).map_err(|e| JsValue::from_str(&e))?;
    logger::install(filter);
    Ok(())
}

fn parse_level(level: &str) -> Result<log::LevelFilter, String> {
    level
        .trim()
        .parse::<log::LevelFilter>()
        .map_err(|_| format!("unknown log level: {level}"))
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
