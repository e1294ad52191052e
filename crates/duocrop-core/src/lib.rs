//! Duocrop Core - dual-region crop and derivative generation
//!
//! Takes one uploaded source image and produces two fixed-size derivatives
//! from two independently chosen, aspect-locked crop regions: a wide 16:9
//! "card" (640x360) and a tall 2:3 "detail" (400x600), both JPEG.
//!
//! # Module Structure
//!
//! - `geometry` - Display/natural space rectangles and sizes
//! - `transform` - Display to natural coordinate mapping, pixel extraction
//! - `crop` - Aspect-constrained crop state and the centered default
//! - `decode` / `encode` - Source decoding (JPEG, PNG, WebP) and JPEG output
//! - `raster` - Region to fixed-size encoded derivative
//! - `preview` / `export` - Small live previews and the final export
//! - `source` - File validation and the source pixel lease
//! - `publish` - Storage and record collaborators
//! - `session` - The crop session tying it all together
//!
//! # Usage
//!
//! ```ignore
//! use duocrop_core::{CropSession, Dimensions, EngineConfig, SelectedFile};
//!
//! let file = SelectedFile::new("portrait.jpg", "image/jpeg", bytes);
//! let mut session = CropSession::open(&file, EngineConfig::default())?;
//! session.on_image_displayed(Dimensions::new(600.0, 800.0))?;
//! session.drag(12.0, -4.0)?;
//! session.complete_interaction()?;
//! ```

pub mod config;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod mode;
pub mod preview;
pub mod publish;
pub mod raster;
pub mod session;
pub mod source;
pub mod transform;

pub use config::{EngineConfig, ModeConfig};
pub use crop::{centered_crop, AspectRatio, CropState, Handle};
pub use error::{ConfigError, CropError, PersistenceError, UploadError, ValidationError};
pub use export::{ExportPipeline, ExportResult};
pub use geometry::{Dimensions, PixelRect, Rect};
pub use mode::{Mode, PerMode};
pub use preview::{Preview, PreviewRenderer};
pub use publish::{publish, DerivativePaths, DerivativeStorage, RecordStore};
pub use raster::{EncodedDerivative, OutputSpec, Rasterizer};
pub use session::{CropSession, SaveState};
pub use source::{validate_selection, SelectedFile, SourceImage, SourceLease, MAX_SOURCE_BYTES};
pub use transform::CoordinateTransform;
