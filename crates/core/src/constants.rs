//! Shared constants for the application

use std::time::Duration;

/// Refresh interval used when `REFRESH_INTERVAL` is not set
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Per-provider fetch deadline used when `PROVIDER_TIMEOUT` is not set
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Panel resolution (7.5" Waveshare class e-paper)
pub const DEFAULT_DISPLAY_WIDTH: u32 = 800;
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 480;

/// File written instead of pushing to the panel in screenshot mode
pub const SCREENSHOT_PATH: &str = "screenshot.bmp";

/// Smallest canvas the standard layout can be drawn on
pub const MIN_DISPLAY_WIDTH: u32 = 200;
pub const MIN_DISPLAY_HEIGHT: u32 = 120;

/// Largest accepted panel dimension
pub const MAX_DISPLAY_DIMENSION: u32 = 4096;
