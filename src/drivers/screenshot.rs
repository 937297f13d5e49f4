//! Screenshot mode: frames are written to a 1-bit BMP file

use bmp_monochrome::Bmp;
use inkdash_core::{DisplayWriteError, SCREENSHOT_PATH};
use inkdash_render::Bitmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::DisplayDriver;

/// Writes every pushed frame to the same file, replacing the previous one
pub struct ScreenshotWriter {
    path: PathBuf,
}

impl ScreenshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ScreenshotWriter {
    fn default() -> Self {
        Self::new(SCREENSHOT_PATH)
    }
}

impl DisplayDriver for ScreenshotWriter {
    fn name(&self) -> &str {
        "screenshot"
    }

    fn push(&mut self, bitmap: &Bitmap) -> Result<(), DisplayWriteError> {
        // bmp-monochrome: true is black, which is ink on the canvas too
        let bmp = Bmp::new(bitmap.rows()).map_err(|e| DisplayWriteError::Encode(e.to_string()))?;
        let mut out = BufWriter::new(File::create(&self.path)?);
        bmp.write(&mut out)
            .map_err(|e| DisplayWriteError::Encode(e.to_string()))?;
        out.flush()?;
        log::info!("Saved screenshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdash_render::Canvas;

    #[test]
    fn test_writes_bmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screenshot.bmp");
        let mut writer = ScreenshotWriter::new(&path);

        writer.push(&Canvas::new(80, 48).finish()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"BM");
        let width = i32::from_le_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]);
        let height = i32::from_le_bytes([bytes[22], bytes[23], bytes[24], bytes[25]]);
        assert_eq!(width, 80);
        assert_eq!(height.abs(), 48);
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let mut writer = ScreenshotWriter::new("/nonexistent/dir/screenshot.bmp");
        let err = writer.push(&Canvas::new(8, 8).finish()).unwrap_err();
        assert!(matches!(err, DisplayWriteError::Io(_)));
    }
}
