//! inkdash-core: Core traits and policies for the inkdash dashboard.
//!
//! This crate contains the `DataSource` capability trait, the source
//! `Registry`, the quiet-hours policy, the error taxonomy and shared
//! constants.

pub mod constants;
mod data_source;
pub mod error;
pub mod quiet_hours;
mod registry;

pub use constants::{
    DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_WIDTH, DEFAULT_PROVIDER_TIMEOUT,
    DEFAULT_REFRESH_INTERVAL, MAX_DISPLAY_DIMENSION, MIN_DISPLAY_HEIGHT, MIN_DISPLAY_WIDTH,
    SCREENSHOT_PATH,
};
pub use data_source::{BoxedDataSource, DataSource, SourceMetadata};
pub use error::{ConfigError, DisplayWriteError, RenderError, Unavailable};
pub use quiet_hours::{is_quiet, QuietHours};
pub use registry::{Registry, SourceFactory};

// Re-export types used in trait signatures for convenience
pub use inkdash_types::{DataPoint, FieldMetadata, FieldType, FieldValue, FrameResult};
