//! Text fitting and drawing
//!
//! Text never leaves its region: a region first tries the fonts for its
//! nominal size from largest to smallest, then truncates with `..` using the
//! smallest font, and finally all drawing is clipped to the region.

use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use std::convert::Infallible;

use inkdash_types::{FontSize, HAlign, Rect};

/// Marker appended to truncated text
pub const ELLIPSIS: &str = "..";

/// A mono font drawn at an integer scale
#[derive(Clone, Copy)]
pub struct FontChoice {
    pub font: &'static MonoFont<'static>,
    pub scale: u32,
}

impl FontChoice {
    const fn new(font: &'static MonoFont<'static>, scale: u32) -> Self {
        Self { font, scale }
    }

    /// Pixel width of `chars` glyphs
    pub fn text_width(&self, chars: usize) -> u32 {
        if chars == 0 {
            return 0;
        }
        let n = chars as u32;
        let glyph = self.font.character_size.width;
        (n * glyph + (n - 1) * self.font.character_spacing) * self.scale
    }

    pub fn line_height(&self) -> u32 {
        self.font.character_size.height * self.scale
    }
}

impl std::fmt::Debug for FontChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self.font.character_size;
        write!(f, "{}x{}@{}", size.width, size.height, self.scale)
    }
}

const HUGE: &[FontChoice] = &[
    FontChoice::new(&FONT_10X20, 4),
    FontChoice::new(&FONT_10X20, 3),
    FontChoice::new(&FONT_10X20, 2),
    FontChoice::new(&FONT_10X20, 1),
    FontChoice::new(&FONT_6X10, 1),
];

const LARGE: &[FontChoice] = &[
    FontChoice::new(&FONT_10X20, 2),
    FontChoice::new(&FONT_10X20, 1),
    FontChoice::new(&FONT_9X15, 1),
    FontChoice::new(&FONT_6X10, 1),
];

const MEDIUM: &[FontChoice] = &[
    FontChoice::new(&FONT_10X20, 1),
    FontChoice::new(&FONT_9X15, 1),
    FontChoice::new(&FONT_6X10, 1),
];

const SMALL: &[FontChoice] = &[FontChoice::new(&FONT_6X10, 1)];

/// Font candidates for a nominal size, largest first
pub fn candidates(size: FontSize) -> &'static [FontChoice] {
    match size {
        FontSize::Huge => HUGE,
        FontSize::Large => LARGE,
        FontSize::Medium => MEDIUM,
        FontSize::Small => SMALL,
    }
}

/// Text and font chosen for a region
#[derive(Debug, Clone)]
pub struct Fitted {
    pub text: String,
    pub choice: FontChoice,
}

impl Fitted {
    pub fn width(&self) -> u32 {
        self.choice.text_width(self.text.chars().count())
    }

    pub fn height(&self) -> u32 {
        self.choice.line_height()
    }
}

/// Pick the largest candidate font that fits `width` x `height`, truncating
/// with the smallest candidate when none does
pub fn fit_text(text: &str, width: u32, height: u32, size: FontSize) -> Fitted {
    let fonts = candidates(size);
    let chars = text.chars().count();

    for choice in fonts {
        if choice.text_width(chars) <= width && choice.line_height() <= height {
            return Fitted {
                text: text.to_string(),
                choice: *choice,
            };
        }
    }

    let smallest = fonts[fonts.len() - 1];
    Fitted {
        text: truncate(text, smallest, width),
        choice: smallest,
    }
}

/// Longest prefix of `text` that fits `width` together with the ellipsis
fn truncate(text: &str, choice: FontChoice, width: u32) -> String {
    let chars = text.chars().count();
    if choice.text_width(chars) <= width {
        return text.to_string();
    }
    let marker = ELLIPSIS.chars().count();
    let mut keep = chars;
    while keep > 0 && choice.text_width(keep + marker) > width {
        keep -= 1;
    }
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Draw target adapter that magnifies every pixel into a `scale` x `scale`
/// block placed relative to `origin`
pub struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<'a, D> Scaled<'a, D> {
    pub fn new(inner: &'a mut D, origin: Point, scale: u32) -> Self {
        Self {
            inner,
            origin,
            scale: scale.max(1),
        }
    }
}

impl<D> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(u16::MAX as u32, u16::MAX as u32))
    }
}

impl<D> DrawTarget for Scaled<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let s = self.scale as i32;
        for Pixel(point, color) in pixels {
            let block = Rectangle::new(
                self.origin + Point::new(point.x * s, point.y * s),
                Size::new(self.scale, self.scale),
            );
            self.inner.fill_solid(&block, color)?;
        }
        Ok(())
    }
}

/// Fit `text` into `bounds` and draw it, vertically centred
pub fn draw_fitted_text<D>(
    target: &mut D,
    bounds: &Rect,
    text: &str,
    size: FontSize,
    align: HAlign,
) -> Result<(), Infallible>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let fitted = fit_text(text, bounds.width, bounds.height, size);
    draw_line(target, bounds, &fitted, align)
}

/// Draw one already-fitted line inside `bounds`
pub fn draw_line<D>(target: &mut D, bounds: &Rect, fitted: &Fitted, align: HAlign) -> Result<(), Infallible>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    if fitted.text.is_empty() {
        return Ok(());
    }
    let free_w = bounds.width.saturating_sub(fitted.width()) as i32;
    let free_h = bounds.height.saturating_sub(fitted.height()) as i32;
    let x = match align {
        HAlign::Left => bounds.x,
        HAlign::Center => bounds.x + free_w / 2,
        HAlign::Right => bounds.x + free_w,
    };
    let y = bounds.y + free_h / 2;

    let area = Rectangle::new(
        Point::new(bounds.x, bounds.y),
        Size::new(bounds.width, bounds.height),
    );
    let mut clipped = target.clipped(&area);
    let style = MonoTextStyle::new(fitted.choice.font, BinaryColor::On);

    if fitted.choice.scale == 1 {
        Text::with_baseline(&fitted.text, Point::new(x, y), style, Baseline::Top).draw(&mut clipped)?;
    } else {
        let mut scaled = Scaled::new(&mut clipped, Point::new(x, y), fitted.choice.scale);
        Text::with_baseline(&fitted.text, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
    }
    Ok(())
}
