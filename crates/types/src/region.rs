//! Layout region configuration
//!
//! A `LayoutRegion` binds one or more fields to a fixed rectangle on the
//! canvas together with the rule used to turn the values into pixels.
//! Regions are static configuration and are never mutated at runtime.

use serde::{Deserialize, Serialize};

/// Text shown in place of a value whose provider failed this cycle
pub const PLACEHOLDER: &str = "--";

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Whether this rectangle lies completely inside a `width` x `height` canvas
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width > 0
            && self.height > 0
            && self.right() <= width as i64
            && self.bottom() <= height as i64
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }
}

/// Nominal text size; the renderer picks a concrete font for each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Small,
    Medium,
    Large,
    Huge,
}

/// Horizontal alignment of text inside a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Lookup table used to map a condition code to an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTable {
    /// OpenWeather `main` condition codes (Clear, Clouds, Rain, ...)
    Weather,
    /// Price trend codes (up, down, flat)
    Trend,
}

/// How a region turns its bound field(s) into pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum RegionFormat {
    /// Fixed caption, no field
    Caption { text: String, size: FontSize },
    /// Any value rendered through a `{}` template
    Text { template: String, size: FontSize },
    /// Numeric value with fixed decimals, optional thousands grouping and sign
    Number {
        template: String,
        decimals: u8,
        #[serde(default)]
        grouping: bool,
        #[serde(default)]
        signed: bool,
        size: FontSize,
    },
    /// Timestamp rendered with a chrono format pattern
    DateTime { pattern: String, size: FontSize },
    /// Condition code drawn as an icon centred in the region
    Icon { table: IconTable },
    /// Percentage drawn as a progress ring with the value in the middle
    Ring,
    /// Four numbers in a 2x2 cross (day/week/month/year)
    Cross,
    /// Titled list of text items, one per line
    List { title: String },
}

/// A fixed rectangular area bound to one or more fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRegion {
    /// Region identifier (used in logs and errors)
    pub id: String,
    pub bounds: Rect,
    /// Bound fields, in the order the format expects them
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(flatten)]
    pub format: RegionFormat,
    #[serde(default)]
    pub align: HAlign,
}

impl LayoutRegion {
    pub fn new(id: impl Into<String>, bounds: Rect, format: RegionFormat) -> Self {
        Self {
            id: id.into(),
            bounds,
            fields: Vec::new(),
            format,
            align: HAlign::Left,
        }
    }

    /// Bind a field to this region
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }

    /// First bound field, if any
    pub fn primary_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(0, 0, 800, 480).fits_within(800, 480));
        assert!(!Rect::new(1, 0, 800, 480).fits_within(800, 480));
        assert!(!Rect::new(-1, 0, 10, 10).fits_within(800, 480));
        assert!(!Rect::new(0, 0, 0, 10).fits_within(800, 480));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 100, 100);
        assert!(a.intersects(&Rect::new(50, 50, 100, 100)));
        // Touching edges do not overlap
        assert!(!a.intersects(&Rect::new(100, 0, 10, 10)));
    }

    #[test]
    fn test_region_serialization() {
        let region = LayoutRegion::new(
            "btc",
            Rect::new(10, 20, 100, 30),
            RegionFormat::Number {
                template: "${}".to_string(),
                decimals: 0,
                grouping: true,
                signed: false,
                size: FontSize::Large,
            },
        )
        .field("btc_price")
        .align(HAlign::Center);

        let json = serde_json::to_string(&region).unwrap();
        assert!(json.contains("\"format\":\"number\""));

        let back: LayoutRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);
        assert_eq!(back.primary_field(), Some("btc_price"));
    }
}
