//! 1-bit canvas and the immutable bitmap it produces
//!
//! Pixels are packed MSB-first, one row after another, rows padded to a
//! whole byte. A set bit is ink (black on the panel).

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};

use inkdash_types::Rect;

/// Unwrap the result of drawing onto an infallible target
pub(crate) fn drawn<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Mutable drawing surface owned by one render pass
pub struct Canvas {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a blank (all white) canvas
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    fn set(&mut self, x: i32, y: i32, ink: bool) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let index = y as usize * self.stride + x as usize / 8;
        let mask = 0x80u8 >> (x as usize % 8);
        if ink {
            self.data[index] |= mask;
        } else {
            self.data[index] &= !mask;
        }
    }

    /// Freeze the canvas into a bitmap
    pub fn finish(self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: self.data,
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

/// Rendered frame. Immutable once produced.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Packed pixel data (MSB-first, set bit = ink)
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether the pixel at (x, y) is ink. Out-of-range reads are white.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y as usize * self.stride + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// Rows of pixels, top to bottom (`true` = ink)
    pub fn rows(&self) -> Vec<Vec<bool>> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.pixel(x, y)).collect())
            .collect()
    }

    /// Number of ink pixels
    pub fn ink_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Number of ink pixels inside a rectangle
    pub fn ink_in(&self, area: &Rect) -> usize {
        let mut count = 0;
        for y in area.y.max(0)..area.bottom().min(self.height as i64) as i32 {
            for x in area.x.max(0)..area.right().min(self.width as i64) as i32 {
                if self.pixel(x as u32, y as u32) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Whether two bitmaps have identical pixels inside `area`
    pub fn same_in(&self, other: &Bitmap, area: &Rect) -> bool {
        for y in area.y.max(0)..area.bottom() as i32 {
            for x in area.x.max(0)..area.right() as i32 {
                if self.pixel(x as u32, y as u32) != other.pixel(x as u32, y as u32) {
                    return false;
                }
            }
        }
        true
    }

    /// Content fingerprint used to detect unchanged frames
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_blank_canvas() {
        let bitmap = Canvas::new(13, 4).finish();
        assert_eq!(bitmap.stride(), 2);
        assert_eq!(bitmap.as_bytes().len(), 8);
        assert_eq!(bitmap.ink_count(), 0);
    }

    #[test]
    fn test_draw_and_read_back() {
        let mut canvas = Canvas::new(16, 16);
        drawn(
            Rectangle::new(Point::new(2, 3), Size::new(4, 2))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(&mut canvas),
        );
        let bitmap = canvas.finish();
        assert_eq!(bitmap.ink_count(), 8);
        assert!(bitmap.pixel(2, 3));
        assert!(bitmap.pixel(5, 4));
        assert!(!bitmap.pixel(6, 4));
        assert_eq!(bitmap.ink_in(&Rect::new(0, 0, 4, 4)), 2);
    }

    #[test]
    fn test_out_of_range_pixels_are_ignored() {
        let mut canvas = Canvas::new(4, 4);
        drawn(canvas.draw_iter([
            Pixel(Point::new(-1, 0), BinaryColor::On),
            Pixel(Point::new(4, 0), BinaryColor::On),
            Pixel(Point::new(0, 0), BinaryColor::On),
        ]));
        assert_eq!(canvas.finish().ink_count(), 1);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = Canvas::new(8, 8).finish();
        let b = Canvas::new(8, 8).finish();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut canvas = Canvas::new(8, 8);
        drawn(canvas.draw_iter([Pixel(Point::new(1, 1), BinaryColor::On)]));
        assert_ne!(canvas.finish().fingerprint(), a.fingerprint());
    }

    #[test]
    fn test_rows() {
        let mut canvas = Canvas::new(3, 2);
        drawn(canvas.draw_iter([Pixel(Point::new(2, 1), BinaryColor::On)]));
        let rows = canvas.finish().rows();
        assert_eq!(rows, vec![vec![false, false, false], vec![false, false, true]]);
    }
}
