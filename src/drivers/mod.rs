//! Display drivers
//!
//! The scheduler is the only writer to a driver, one frame at a time.
//! The physical e-paper panel driver lives outside this crate and plugs in
//! through `DisplayDriver`.

mod log_driver;
mod screenshot;

pub use log_driver::LogDriver;
pub use screenshot::ScreenshotWriter;

use inkdash_core::DisplayWriteError;
use inkdash_render::Bitmap;

/// Output for rendered frames
pub trait DisplayDriver: Send {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Show a frame
    fn push(&mut self, bitmap: &Bitmap) -> Result<(), DisplayWriteError>;

    /// Put the panel into its low-power state after a push
    fn sleep(&mut self) -> Result<(), DisplayWriteError> {
        Ok(())
    }
}

impl<T: DisplayDriver + ?Sized> DisplayDriver for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn push(&mut self, bitmap: &Bitmap) -> Result<(), DisplayWriteError> {
        (**self).push(bitmap)
    }

    fn sleep(&mut self) -> Result<(), DisplayWriteError> {
        (**self).sleep()
    }
}
