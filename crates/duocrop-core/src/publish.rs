//! Handing finished derivatives to storage and the owning record.
//!
//! Storage and the record store are collaborators supplied by the host; this
//! module only fixes the order of calls and the naming of uploaded objects.

use crate::encode::OutputFormat;
use crate::error::{CropError, PersistenceError, UploadError};
use crate::export::ExportResult;
use crate::mode::{Mode, PerMode};

/// Object storage for encoded derivatives.
pub trait DerivativeStorage {
    /// Store `bytes` at `path` and return the public URL.
    fn upload(
        &mut self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
        overwrite: bool,
    ) -> Result<String, UploadError>;
}

/// The record that references the two derivatives.
pub trait RecordStore {
    fn store_references(&mut self, urls: &PerMode<String>) -> Result<(), PersistenceError>;
}

/// Storage object names for one save.
///
/// Layout: `{owner}/{folder}/{record}-{timestamp_ms}-{unique}-{mode}.{ext}`,
/// with `record` set to `new` for records that do not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivativePaths {
    base: String,
}

impl DerivativePaths {
    /// Paths with a fresh 8-character random id.
    pub fn new(owner: &str, record_id: Option<&str>, folder: &str, timestamp_ms: u64) -> Self {
        let unique = uuid::Uuid::new_v4().simple().to_string();
        Self::with_unique_id(owner, record_id, folder, timestamp_ms, &unique[..8])
    }

    pub fn with_unique_id(
        owner: &str,
        record_id: Option<&str>,
        folder: &str,
        timestamp_ms: u64,
        unique: &str,
    ) -> Self {
        let record = record_id.filter(|id| !id.is_empty()).unwrap_or("new");
        Self {
            base: format!("{owner}/{folder}/{record}-{timestamp_ms}-{unique}"),
        }
    }

    pub fn path(&self, mode: Mode, format: OutputFormat) -> String {
        format!("{}-{}.{}", self.base, mode.label(), format.extension())
    }
}

/// Upload both derivatives, then update the record.
///
/// Card is uploaded before Detail. The first failing upload aborts the save
/// and the record store is never called; uploads that already went through
/// are not rolled back.
pub fn publish(
    result: &ExportResult,
    paths: &DerivativePaths,
    storage: &mut dyn DerivativeStorage,
    records: &mut dyn RecordStore,
) -> Result<PerMode<String>, CropError> {
    let mut upload = |mode: Mode| -> Result<String, CropError> {
        let derivative = &result[mode];
        let path = paths.path(mode, derivative.format);
        let url = storage
            .upload(&path, &derivative.bytes, derivative.content_type(), true)
            .map_err(|e| {
                log::error!("Failed to upload {mode} derivative: {e}");
                e
            })?;
        log::debug!("Uploaded {mode} derivative to {path}");
        Ok(url)
    };

    let card = upload(Mode::Card)?;
    let detail = upload(Mode::Detail)?;
    let urls = PerMode::new(card, detail);

    records.store_references(&urls).map_err(|e| {
        log::error!("Failed to store derivative references: {e}");
        e
    })?;
    log::info!("Published derivatives {} and {}", urls.card, urls.detail);
    Ok(urls)
}
