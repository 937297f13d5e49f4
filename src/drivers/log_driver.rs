use inkdash_core::DisplayWriteError;
use inkdash_render::Bitmap;

use super::DisplayDriver;

/// Stand-in used when no panel is attached: logs each frame's fingerprint
#[derive(Debug, Default)]
pub struct LogDriver {
    pushed: u64,
}

impl LogDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames pushed so far
    pub fn pushed(&self) -> u64 {
        self.pushed
    }
}

impl DisplayDriver for LogDriver {
    fn name(&self) -> &str {
        "log"
    }

    fn push(&mut self, bitmap: &Bitmap) -> Result<(), DisplayWriteError> {
        self.pushed += 1;
        log::info!(
            "Frame #{}: {}x{} fingerprint {:016x}, {} ink pixels",
            self.pushed,
            bitmap.width(),
            bitmap.height(),
            bitmap.fingerprint(),
            bitmap.ink_count()
        );
        Ok(())
    }

    fn sleep(&mut self) -> Result<(), DisplayWriteError> {
        log::debug!("Panel sleep");
        Ok(())
    }
}
