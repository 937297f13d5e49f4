//! inkdash-types: Shared data types for the inkdash e-paper dashboard.
//!
//! This crate contains pure data types (field metadata, per-cycle data
//! points, layout region configuration) shared across all inkdash crates.
//! It has no rendering or network dependencies.

pub mod field;
pub mod frame;
pub mod region;

// Re-export commonly used types at the crate root for convenience
pub use field::{ids, FieldMetadata, FieldType};
pub use frame::{DataPoint, FieldValue, FrameResult};
pub use region::{FontSize, HAlign, IconTable, LayoutRegion, Rect, RegionFormat, PLACEHOLDER};
