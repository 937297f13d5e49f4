//! inkdash-render: 1-bit layout and rendering for the e-paper dashboard.
//!
//! Everything here draws with `embedded-graphics` onto an in-memory canvas;
//! nothing touches hardware or the network.

pub mod canvas;
pub mod format;
pub mod icons;
pub mod layout;
pub mod shapes;
pub mod text;

pub use canvas::{Bitmap, Canvas};
pub use icons::{AssetStore, IconKind};
pub use layout::{
    scale_rect, standard_regions, year_end_regions, DashboardLayout, BASE_HEIGHT, BASE_WIDTH,
};
