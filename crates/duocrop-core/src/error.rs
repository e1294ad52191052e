//! Error taxonomy for crop sessions.
//!
//! Lower-level modules keep their own error enums (`DecodeError`,
//! `EncodeError`); everything that crosses the session boundary is folded
//! into [`CropError`].

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::mode::Mode;

/// Rejection of a selected file before any session exists.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The declared content type is not an image type.
    #[error("Please select an image file (got {content_type:?})")]
    NotAnImage { content_type: String },

    /// The file exceeds the configured size ceiling.
    #[error("Image must be at most {limit} bytes (got {size})")]
    TooLarge { size: u64, limit: u64 },

    /// The bytes could not be decoded as a supported image.
    #[error("Unreadable image: {0}")]
    Undecodable(#[from] DecodeError),
}

/// Failure reported by the storage collaborator for a single derivative.
#[derive(Debug, Error)]
#[error("Upload of {path} failed: {reason}")]
pub struct UploadError {
    pub path: String,
    pub reason: String,
}

impl UploadError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by the record store when saving derivative references.
#[derive(Debug, Error)]
#[error("Record update failed: {0}")]
pub struct PersistenceError(pub String);

/// Configuration that cannot be parsed or does not describe a usable engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced by the crop engine.
#[derive(Debug, Error)]
pub enum CropError {
    /// The selected file was rejected; no session was created.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation is not allowed in the current session state.
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Rasterization was requested without loaded source pixels.
    #[error("Source image is not loaded or has already been released")]
    SourceUnavailable,

    /// The output surface could not be produced or encoded.
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    /// A derivative upload failed. Never retried locally.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Both uploads succeeded but the owning record could not be updated.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Export was invoked before both modes had a completed crop.
    #[error("Crop for {0} has not been completed")]
    IncompleteCrop(Mode),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
