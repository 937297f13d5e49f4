//! inkdash: a low-power e-paper dashboard
//!
//! This library provides the pieces the `inkdash` binary wires together:
//! - Environment configuration
//! - The refresh scheduler (fetch, render, update, sleep)
//! - Display drivers (screenshot file, log-only)
//!
//! Data sources live in `inkdash-sources`, the layout engine in
//! `inkdash-render`.

pub mod config;
pub mod core;
pub mod drivers;

// Re-export commonly used types
pub use config::Settings;
pub use core::{CycleOutcome, CycleReport, DisplayMode, RefreshScheduler, ScheduleState};
pub use drivers::{DisplayDriver, LogDriver, ScreenshotWriter};
