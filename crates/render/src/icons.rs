//! Icon lookup and drawing
//!
//! Condition codes map to an `IconKind` through a lookup table. Unknown codes
//! fall back to a default icon, unavailable values use `NoData`. Each kind is
//! drawn procedurally unless an asset with its name was loaded, in which case
//! the asset image is used.

use anyhow::{Context, Result};
use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{BinaryColor, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, Triangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use std::collections::HashMap;
use std::convert::Infallible;
use std::path::Path;
use tinybmp::Bmp;

use inkdash_core::RenderError;
use inkdash_types::{IconTable, Rect};

use crate::canvas::drawn;

/// Every drawable icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Sun,
    Cloud,
    Rain,
    Snow,
    Thunder,
    Fog,
    TrendUp,
    TrendDown,
    TrendFlat,
    NoData,
}

impl IconKind {
    pub const ALL: [IconKind; 10] = [
        IconKind::Sun,
        IconKind::Cloud,
        IconKind::Rain,
        IconKind::Snow,
        IconKind::Thunder,
        IconKind::Fog,
        IconKind::TrendUp,
        IconKind::TrendDown,
        IconKind::TrendFlat,
        IconKind::NoData,
    ];

    /// Asset file stem (`<name>.bmp`)
    pub fn asset_name(&self) -> &'static str {
        match self {
            IconKind::Sun => "sun",
            IconKind::Cloud => "cloud",
            IconKind::Rain => "rain",
            IconKind::Snow => "snow",
            IconKind::Thunder => "thunder",
            IconKind::Fog => "fog",
            IconKind::TrendUp => "trend_up",
            IconKind::TrendDown => "trend_down",
            IconKind::TrendFlat => "trend_flat",
            IconKind::NoData => "no_data",
        }
    }

    /// Map a weather condition code (OpenWeather `main`, case-insensitive).
    /// Unknown codes fall back to `Cloud`.
    pub fn weather(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "clear" | "sun" | "sunny" => IconKind::Sun,
            "clouds" | "cloud" | "cloudy" => IconKind::Cloud,
            "rain" | "drizzle" | "shower" => IconKind::Rain,
            "snow" | "sleet" => IconKind::Snow,
            "thunderstorm" | "thunder" => IconKind::Thunder,
            "mist" | "fog" | "haze" | "smoke" | "dust" | "sand" | "ash" | "squall"
            | "tornado" => IconKind::Fog,
            other => {
                log::debug!("Unknown weather code '{}', using default icon", other);
                IconKind::Cloud
            }
        }
    }

    /// Map a price trend code. Unknown codes fall back to `TrendFlat`.
    pub fn trend(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "up" => IconKind::TrendUp,
            "down" => IconKind::TrendDown,
            _ => IconKind::TrendFlat,
        }
    }

    pub fn lookup(table: IconTable, code: &str) -> Self {
        match table {
            IconTable::Weather => IconKind::weather(code),
            IconTable::Trend => IconKind::trend(code),
        }
    }
}

/// Raw icon images keyed by asset name
///
/// Bytes are kept as loaded and decoded when drawn, so a malformed file
/// surfaces as a `RenderError` for the cycle that needs it.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    images: HashMap<String, Vec<u8>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<name>.bmp` for every known icon present in `dir`
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut store = Self::new();
        for kind in IconKind::ALL {
            let path = dir.join(format!("{}.bmp", kind.asset_name()));
            if !path.exists() {
                continue;
            }
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read icon {}", path.display()))?;
            log::debug!("Loaded icon asset {}", path.display());
            store.insert(kind.asset_name(), bytes);
        }
        log::info!("Loaded {} icon assets from {}", store.len(), dir.display());
        Ok(store)
    }

    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) {
        self.images.insert(name.to_string(), bytes);
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.images.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Draw `kind` centred in `bounds`, clipped to it
pub fn draw_icon<D>(
    target: &mut D,
    bounds: &Rect,
    kind: IconKind,
    assets: &AssetStore,
) -> Result<(), RenderError>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let area = Rectangle::new(
        Point::new(bounds.x, bounds.y),
        Size::new(bounds.width, bounds.height),
    );
    let mut clipped = target.clipped(&area);
    let (cx, cy) = bounds.center();
    let center = Point::new(cx, cy);

    if let Some(bytes) = assets.get(kind.asset_name()) {
        return draw_asset(&mut clipped, kind.asset_name(), bytes, center);
    }

    let size = bounds.width.min(bounds.height) as f32 * 0.8;
    drawn(draw_procedural(&mut clipped, kind, center, size));
    Ok(())
}

fn draw_asset<D>(target: &mut D, name: &str, bytes: &[u8], center: Point) -> Result<(), RenderError>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let bmp = Bmp::<Rgb888>::from_slice(bytes).map_err(|e| RenderError::Asset {
        name: name.to_string(),
        reason: format!("{:?}", e),
    })?;
    let size = bmp.size();
    let top_left = center - Point::new(size.width as i32 / 2, size.height as i32 / 2);

    // Dark pixels are ink; the rest stays paper
    let ink = bmp.pixels().filter_map(|Pixel(p, c)| {
        let luma = (c.r() as u32 + c.g() as u32 + c.b() as u32) / 3;
        (luma < 128).then_some(Pixel(p + top_left, BinaryColor::On))
    });
    drawn(target.draw_iter(ink));
    Ok(())
}

fn at(center: Point, dx: f32, dy: f32) -> Point {
    Point::new(center.x + dx.round() as i32, center.y + dy.round() as i32)
}

fn outlined(width: u32) -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyleBuilder::new()
        .stroke_color(BinaryColor::On)
        .stroke_width(width)
        .fill_color(BinaryColor::Off)
        .build()
}

fn draw_procedural<D>(target: &mut D, kind: IconKind, c: Point, size: f32) -> Result<(), Infallible>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let s = size / 40.0;
    let line_w = ((2.0 * s) as u32).max(1);
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, line_w);
    let fill = PrimitiveStyle::with_fill(BinaryColor::On);

    match kind {
        IconKind::Sun => {
            let r = size / 3.0;
            Circle::with_center(c, (2.0 * r) as u32).into_styled(stroke).draw(target)?;
            for step in 0..8 {
                let angle = (step as f32 * 45.0).to_radians();
                let (sin, cos) = angle.sin_cos();
                let inner = r + size * 0.125;
                let outer = r + size * 0.25;
                Line::new(at(c, cos * inner, sin * inner), at(c, cos * outer, sin * outer))
                    .into_styled(stroke)
                    .draw(target)?;
            }
        }
        IconKind::Cloud => draw_cloud(target, c, s, line_w)?,
        IconKind::Rain => {
            draw_cloud(target, c, s, line_w)?;
            for dx in [-8.0, 0.0, 8.0] {
                Line::new(at(c, dx * s, 20.0 * s), at(c, dx * s, 30.0 * s))
                    .into_styled(stroke)
                    .draw(target)?;
            }
        }
        IconKind::Snow => {
            draw_cloud(target, c, s, line_w)?;
            for (dx, dy) in [(-10.0, 21.0), (0.0, 24.0), (10.0, 21.0)] {
                Circle::with_center(at(c, dx * s, dy * s), ((4.0 * s) as u32).max(2))
                    .into_styled(fill)
                    .draw(target)?;
            }
        }
        IconKind::Thunder => {
            draw_cloud(target, c, s, line_w)?;
            let bolt = [(2.0, 10.0), (-5.0, 20.0), (0.0, 20.0), (-3.0, 30.0)];
            for pair in bolt.windows(2) {
                Line::new(at(c, pair[0].0 * s, pair[0].1 * s), at(c, pair[1].0 * s, pair[1].1 * s))
                    .into_styled(stroke)
                    .draw(target)?;
            }
        }
        IconKind::Fog => {
            for (i, half) in [16.0, 12.0, 16.0, 10.0].iter().enumerate() {
                let dy = -12.0 + i as f32 * 8.0;
                Line::new(at(c, -half * s, dy * s), at(c, half * s, dy * s))
                    .into_styled(stroke)
                    .draw(target)?;
            }
        }
        IconKind::TrendUp => {
            Triangle::new(at(c, 0.0, -14.0 * s), at(c, -14.0 * s, 10.0 * s), at(c, 14.0 * s, 10.0 * s))
                .into_styled(fill)
                .draw(target)?;
        }
        IconKind::TrendDown => {
            Triangle::new(at(c, 0.0, 14.0 * s), at(c, -14.0 * s, -10.0 * s), at(c, 14.0 * s, -10.0 * s))
                .into_styled(fill)
                .draw(target)?;
        }
        IconKind::TrendFlat => {
            Rectangle::with_corners(at(c, -14.0 * s, -3.0 * s), at(c, 14.0 * s, 3.0 * s))
                .into_styled(fill)
                .draw(target)?;
        }
        IconKind::NoData => {
            let half = 14.0 * s;
            Rectangle::with_corners(at(c, -half, -half), at(c, half, half))
                .into_styled(stroke)
                .draw(target)?;
            let font = if half * 2.0 >= 30.0 { &FONT_10X20 } else { &FONT_6X10 };
            let text_style = TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build();
            Text::with_text_style("?", c, MonoTextStyle::new(font, BinaryColor::On), text_style)
                .draw(target)?;
        }
    }
    Ok(())
}

fn draw_cloud<D>(target: &mut D, c: Point, s: f32, line_w: u32) -> Result<(), Infallible>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let c = at(c, 0.0, 5.0 * s);
    let d = (20.0 * s) as u32;
    Circle::with_center(at(c, -10.0 * s, 5.0 * s), d).into_styled(outlined(line_w)).draw(target)?;
    Circle::with_center(at(c, 10.0 * s, 5.0 * s), d).into_styled(outlined(line_w)).draw(target)?;
    Circle::with_center(at(c, 0.0, -5.0 * s), d).into_styled(outlined(line_w)).draw(target)?;
    Rectangle::with_corners(at(c, -10.0 * s, 0.0), at(c, 10.0 * s, 10.0 * s))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(target)?;
    Line::new(at(c, -10.0 * s, 15.0 * s), at(c, 10.0 * s, 15.0 * s))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, line_w))
        .draw(target)?;
    Ok(())
}
