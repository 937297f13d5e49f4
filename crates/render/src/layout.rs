//! Dashboard layout engine
//!
//! A `DashboardLayout` is a fixed list of regions on a fixed-size canvas.
//! `render` is a pure function of the `FrameResult`: the same frame always
//! produces the same bitmap. Every region draws something for every frame,
//! so an unavailable value shows its placeholder instead of a hole.

use chrono::format::{Item, StrftimeItems};
use std::collections::BTreeSet;
use std::fmt::Write;

use inkdash_core::{RenderError, MIN_DISPLAY_HEIGHT, MIN_DISPLAY_WIDTH};
use inkdash_types::{
    ids, FieldValue, FontSize, FrameResult, HAlign, IconTable, LayoutRegion, Rect, RegionFormat,
    PLACEHOLDER,
};

use crate::canvas::{drawn, Bitmap, Canvas};
use crate::format::{apply_template, format_number, value_text};
use crate::icons::{draw_icon, AssetStore, IconKind};
use crate::shapes::{draw_cross, draw_list, draw_ring};
use crate::text::draw_fitted_text;

/// Canvas size the standard regions are designed for
pub const BASE_WIDTH: u32 = 800;
pub const BASE_HEIGHT: u32 = 480;

/// Regions bound to a fixed-size canvas, plus the icon assets they may use
#[derive(Debug, Clone)]
pub struct DashboardLayout {
    width: u32,
    height: u32,
    regions: Vec<LayoutRegion>,
    assets: AssetStore,
}

impl DashboardLayout {
    /// Build and validate a layout
    pub fn new(width: u32, height: u32, regions: Vec<LayoutRegion>) -> Result<Self, RenderError> {
        let layout = Self {
            width,
            height,
            regions,
            assets: AssetStore::new(),
        };
        layout.validate()?;
        Ok(layout)
    }

    /// The standard dashboard scaled to `width` x `height`. Canvases below
    /// `MIN_DISPLAY_WIDTH` x `MIN_DISPLAY_HEIGHT` are rejected.
    pub fn standard(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::scaled(width, height, standard_regions())
    }

    /// The New Year's Eve contribution summary scaled to `width` x `height`,
    /// with the same minimum canvas as `standard`
    pub fn year_end(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::scaled(width, height, year_end_regions())
    }

    fn scaled(width: u32, height: u32, regions: Vec<LayoutRegion>) -> Result<Self, RenderError> {
        if width < MIN_DISPLAY_WIDTH || height < MIN_DISPLAY_HEIGHT {
            return Err(RenderError::Layout(format!(
                "{}x{} canvas is smaller than the {}x{} minimum",
                width, height, MIN_DISPLAY_WIDTH, MIN_DISPLAY_HEIGHT
            )));
        }
        let regions = regions
            .into_iter()
            .map(|mut region| {
                region.bounds = scale_rect(&region.bounds, width, height);
                region
            })
            .collect();
        Self::new(width, height, regions)
    }

    pub fn with_assets(mut self, assets: AssetStore) -> Self {
        self.assets = assets;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn regions(&self) -> &[LayoutRegion] {
        &self.regions
    }

    pub fn region(&self, id: &str) -> Option<&LayoutRegion> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Every field bound by some region, sorted
    pub fn fields(&self) -> Vec<String> {
        self.regions
            .iter()
            .flat_map(|r| r.fields.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check that regions fit the canvas, do not overlap and are well formed
    pub fn validate(&self) -> Result<(), RenderError> {
        for (i, region) in self.regions.iter().enumerate() {
            self.check_bounds(region)?;
            check_format(region)?;
            if let Some(other) = self.regions[..i].iter().find(|o| o.bounds.intersects(&region.bounds)) {
                return Err(RenderError::Layout(format!(
                    "regions '{}' and '{}' overlap",
                    other.id, region.id
                )));
            }
        }
        Ok(())
    }

    fn check_bounds(&self, region: &LayoutRegion) -> Result<(), RenderError> {
        if region.bounds.fits_within(self.width, self.height) {
            Ok(())
        } else {
            Err(RenderError::RegionOutOfBounds {
                region: region.id.clone(),
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Render one frame
    pub fn render(&self, frame: &FrameResult) -> Result<Bitmap, RenderError> {
        let mut canvas = Canvas::new(self.width, self.height);
        for region in &self.regions {
            self.check_bounds(region)?;
            self.render_region(&mut canvas, region, frame)?;
        }
        let bitmap = canvas.finish();
        log::trace!(
            "Rendered {} regions ({} of {} fields available)",
            self.regions.len(),
            frame.available_count(),
            frame.len()
        );
        Ok(bitmap)
    }

    fn render_region(
        &self,
        canvas: &mut Canvas,
        region: &LayoutRegion,
        frame: &FrameResult,
    ) -> Result<(), RenderError> {
        let bounds = &region.bounds;
        let value = |index: usize| bound_value(frame, region, index);

        match &region.format {
            RegionFormat::Caption { text, size } => {
                drawn(draw_fitted_text(canvas, bounds, text, *size, region.align));
            }
            RegionFormat::Text { template, size } => {
                let text = apply_template(template, &value_text(value(0)));
                drawn(draw_fitted_text(canvas, bounds, &text, *size, region.align));
            }
            RegionFormat::Number {
                template,
                decimals,
                grouping,
                signed,
                size,
            } => {
                let number = match value(0).as_f64() {
                    Some(n) => format_number(n, *decimals, *grouping, *signed),
                    None => PLACEHOLDER.to_string(),
                };
                let text = apply_template(template, &number);
                drawn(draw_fitted_text(canvas, bounds, &text, *size, region.align));
            }
            RegionFormat::DateTime { pattern, size } => {
                let text = match value(0).as_timestamp() {
                    Some(ts) => {
                        let mut out = String::new();
                        write!(out, "{}", ts.format_with_items(StrftimeItems::new(pattern))).map_err(
                            |_| RenderError::Layout(format!("region '{}': bad date pattern", region.id)),
                        )?;
                        out
                    }
                    None => PLACEHOLDER.to_string(),
                };
                drawn(draw_fitted_text(canvas, bounds, &text, *size, region.align));
            }
            RegionFormat::Icon { table } => {
                let kind = match value(0) {
                    FieldValue::Unavailable => IconKind::NoData,
                    other => IconKind::lookup(*table, other.as_str().unwrap_or_default()),
                };
                draw_icon(canvas, bounds, kind, &self.assets)?;
            }
            RegionFormat::Ring => {
                drawn(draw_ring(canvas, bounds, value(0).as_f64()));
            }
            RegionFormat::Cross => {
                let values = [
                    value(0).as_f64(),
                    value(1).as_f64(),
                    value(2).as_f64(),
                    value(3).as_f64(),
                ];
                drawn(draw_cross(canvas, bounds, values));
            }
            RegionFormat::List { title } => {
                drawn(draw_list(canvas, bounds, title, value(0).as_list()));
            }
        }
        Ok(())
    }
}

fn bound_value<'a>(frame: &'a FrameResult, region: &LayoutRegion, index: usize) -> &'a FieldValue {
    match region.fields.get(index) {
        Some(field) => frame.value(field),
        None => &FieldValue::Unavailable,
    }
}

fn check_format(region: &LayoutRegion) -> Result<(), RenderError> {
    let needed = match &region.format {
        RegionFormat::Caption { .. } => 0,
        RegionFormat::Cross => 4,
        _ => 1,
    };
    if region.fields.len() < needed {
        return Err(RenderError::Layout(format!(
            "region '{}' needs {} field(s), has {}",
            region.id,
            needed,
            region.fields.len()
        )));
    }
    if let RegionFormat::DateTime { pattern, .. } = &region.format {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(RenderError::Layout(format!(
                "region '{}': invalid date pattern '{}'",
                region.id, pattern
            )));
        }
    }
    Ok(())
}

/// Map a rectangle designed for the base canvas onto `width` x `height`.
/// Edges are scaled independently so touching regions never start to overlap.
pub fn scale_rect(rect: &Rect, width: u32, height: u32) -> Rect {
    let sx = |v: i64| (v * width as i64 / BASE_WIDTH as i64) as i32;
    let sy = |v: i64| (v * height as i64 / BASE_HEIGHT as i64) as i32;
    let x0 = sx(rect.x as i64);
    let y0 = sy(rect.y as i64);
    let x1 = sx(rect.right());
    let y1 = sy(rect.bottom());
    Rect::new(x0, y0, (x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32)
}

const FOOTER_X: i32 = 20;
const FOOTER_SLOT: i32 = 190;
const FOOTER_Y: i32 = 362;
const CAPTION_Y: i32 = 446;

fn footer_caption(id: &str, slot: i32, text: &str) -> LayoutRegion {
    LayoutRegion::new(
        id,
        Rect::new(FOOTER_X + slot * FOOTER_SLOT, CAPTION_Y, FOOTER_SLOT as u32, 28),
        RegionFormat::Caption {
            text: text.to_string(),
            size: FontSize::Medium,
        },
    )
    .align(HAlign::Center)
}

/// Regions of the standard 800x480 dashboard
///
/// Header: date, time, weather icon with temperature and description.
/// Middle: three task columns. Footer: week ring, commit cross, BTC price
/// and VPS ring.
pub fn standard_regions() -> Vec<LayoutRegion> {
    let mut regions = vec![
        LayoutRegion::new(
            "date",
            Rect::new(20, 12, 300, 36),
            RegionFormat::DateTime {
                pattern: "%Y-%m-%d %a".to_string(),
                size: FontSize::Large,
            },
        )
        .field(ids::TIMESTAMP),
        LayoutRegion::new(
            "time",
            Rect::new(20, 52, 300, 44),
            RegionFormat::DateTime {
                pattern: "%H:%M".to_string(),
                size: FontSize::Large,
            },
        )
        .field(ids::TIMESTAMP),
        LayoutRegion::new(
            "weather_icon",
            Rect::new(440, 10, 80, 80),
            RegionFormat::Icon {
                table: IconTable::Weather,
            },
        )
        .field(ids::WEATHER_CONDITION),
        LayoutRegion::new(
            "weather_temp",
            Rect::new(530, 14, 250, 40),
            RegionFormat::Number {
                template: "{}°C".to_string(),
                decimals: 1,
                grouping: false,
                signed: false,
                size: FontSize::Large,
            },
        )
        .field(ids::WEATHER_TEMP),
        LayoutRegion::new(
            "weather_desc",
            Rect::new(530, 58, 250, 34),
            RegionFormat::Text {
                template: "{}".to_string(),
                size: FontSize::Medium,
            },
        )
        .field(ids::WEATHER_DESC),
    ];

    for (i, (id, title, field)) in [
        ("goals", "Goals", ids::TODO_GOALS),
        ("must", "Must", ids::TODO_MUST),
        ("optional", "Optional", ids::TODO_OPTIONAL),
    ]
    .into_iter()
    .enumerate()
    {
        regions.push(
            LayoutRegion::new(
                id,
                Rect::new(20 + i as i32 * 260, 110, 240, 240),
                RegionFormat::List {
                    title: title.to_string(),
                },
            )
            .field(field),
        );
    }

    let slot_x = |slot: i32| FOOTER_X + slot * FOOTER_SLOT;

    regions.push(
        LayoutRegion::new("week_ring", Rect::new(slot_x(0) + 55, FOOTER_Y, 80, 80), RegionFormat::Ring)
            .field(ids::WEEK_PROGRESS),
    );
    regions.push(footer_caption("week_caption", 0, "Weekly"));

    regions.push(
        LayoutRegion::new(
            "commits",
            Rect::new(slot_x(1) + 20, FOOTER_Y, 150, 80),
            RegionFormat::Cross,
        )
        .field(ids::COMMITS_DAY)
        .field(ids::COMMITS_WEEK)
        .field(ids::COMMITS_MONTH)
        .field(ids::COMMITS_YEAR),
    );
    regions.push(footer_caption("commits_caption", 1, "Commits"));

    regions.push(
        LayoutRegion::new(
            "btc_price",
            Rect::new(slot_x(2), FOOTER_Y + 10, 150, 40),
            RegionFormat::Number {
                template: "${}".to_string(),
                decimals: 0,
                grouping: true,
                signed: false,
                size: FontSize::Large,
            },
        )
        .field(ids::BTC_PRICE)
        .align(HAlign::Center),
    );
    regions.push(
        LayoutRegion::new(
            "btc_trend",
            Rect::new(slot_x(2) + 150, FOOTER_Y + 10, 40, 40),
            RegionFormat::Icon {
                table: IconTable::Trend,
            },
        )
        .field(ids::BTC_TREND),
    );
    regions.push(
        LayoutRegion::new(
            "btc_change",
            Rect::new(slot_x(2), CAPTION_Y, FOOTER_SLOT as u32, 28),
            RegionFormat::Number {
                template: "BTC ({}%)".to_string(),
                decimals: 1,
                grouping: false,
                signed: true,
                size: FontSize::Medium,
            },
        )
        .field(ids::BTC_CHANGE)
        .align(HAlign::Center),
    );

    regions.push(
        LayoutRegion::new("vps_ring", Rect::new(slot_x(3) + 55, FOOTER_Y, 80, 80), RegionFormat::Ring)
            .field(ids::VPS_USAGE),
    );
    regions.push(footer_caption("vps_caption", 3, "VPS Data"));

    regions
}

fn centered_caption(id: &str, bounds: Rect, text: &str) -> LayoutRegion {
    LayoutRegion::new(
        id,
        bounds,
        RegionFormat::Caption {
            text: text.to_string(),
            size: FontSize::Medium,
        },
    )
    .align(HAlign::Center)
}

/// Regions of the 800x480 year-end screen: year title, total contributions,
/// busiest day and daily average
pub fn year_end_regions() -> Vec<LayoutRegion> {
    vec![
        LayoutRegion::new(
            "year_title",
            Rect::new(40, 24, 720, 48),
            RegionFormat::DateTime {
                pattern: "%Y GitHub Summary".to_string(),
                size: FontSize::Large,
            },
        )
        .field(ids::TIMESTAMP)
        .align(HAlign::Center),
        LayoutRegion::new(
            "year_total",
            Rect::new(150, 96, 500, 80),
            RegionFormat::Number {
                template: "{}".to_string(),
                decimals: 0,
                grouping: true,
                signed: false,
                size: FontSize::Huge,
            },
        )
        .field(ids::COMMITS_YEAR)
        .align(HAlign::Center),
        centered_caption("year_total_caption", Rect::new(150, 180, 500, 32), "Total Contributions"),
        LayoutRegion::new(
            "year_max_day",
            Rect::new(60, 250, 330, 36),
            RegionFormat::Number {
                template: "Max Day: {}".to_string(),
                decimals: 0,
                grouping: true,
                signed: false,
                size: FontSize::Medium,
            },
        )
        .field(ids::COMMITS_MAX_DAY)
        .align(HAlign::Center),
        LayoutRegion::new(
            "year_daily_avg",
            Rect::new(410, 250, 330, 36),
            RegionFormat::Number {
                template: "Daily Avg: {}".to_string(),
                decimals: 1,
                grouping: false,
                signed: false,
                size: FontSize::Medium,
            },
        )
        .field(ids::COMMITS_DAILY_AVG)
        .align(HAlign::Center),
        centered_caption("year_farewell", Rect::new(100, 420, 600, 36), "See you next year!"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use inkdash_types::DataPoint;

    fn full_frame(layout: &DashboardLayout) -> FrameResult {
        let mut frame = FrameResult::with_fields(layout.fields());
        let ts = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 14, 9, 26, 0)
            .unwrap();
        let points = vec![
            DataPoint::new(ids::TIMESTAMP, ts),
            DataPoint::new(ids::WEEK_PROGRESS, 35.0),
            DataPoint::new(ids::WEATHER_TEMP, 18.4),
            DataPoint::new(ids::WEATHER_CONDITION, FieldValue::Icon("Rain".into())),
            DataPoint::new(ids::WEATHER_DESC, "light rain"),
            DataPoint::new(ids::COMMITS_DAY, 3u64),
            DataPoint::new(ids::COMMITS_WEEK, 17u64),
            DataPoint::new(ids::COMMITS_MONTH, 60u64),
            DataPoint::new(ids::COMMITS_YEAR, 412u64),
            DataPoint::new(ids::VPS_USAGE, 72.0),
            DataPoint::new(ids::BTC_PRICE, 67432.0),
            DataPoint::new(ids::BTC_CHANGE, 1.8),
            DataPoint::new(ids::BTC_TREND, FieldValue::Icon("up".into())),
            DataPoint::new(ids::TODO_GOALS, vec!["Ship v1".to_string()]),
            DataPoint::new(ids::TODO_MUST, vec!["Pay rent".to_string(), "Gym".to_string()]),
            DataPoint::new(ids::TODO_OPTIONAL, Vec::<String>::new()),
        ];
        for point in points {
            assert!(frame.record(point));
        }
        frame
    }

    #[test]
    fn test_standard_layout_binds_every_field() {
        let layout = DashboardLayout::standard(800, 480).unwrap();
        assert_eq!(layout.fields().len(), 16);
        assert!(layout.fields().contains(&ids::BTC_TREND.to_string()));
    }

    #[test]
    fn test_standard_layout_scales() {
        for (w, h) in [(400, 300), (640, 384), (1304, 984)] {
            let layout = DashboardLayout::standard(w, h).unwrap();
            assert!(layout.regions().iter().all(|r| r.bounds.fits_within(w, h)));
        }
    }

    #[test]
    fn test_tiny_canvas_rejected() {
        for (w, h) in [(21, 480), (800, 40), (1, 1)] {
            assert!(
                matches!(DashboardLayout::standard(w, h), Err(RenderError::Layout(_))),
                "{}x{} should be rejected",
                w,
                h
            );
        }
    }

    #[test]
    fn test_smallest_canvas_renders() {
        let layout = DashboardLayout::standard(MIN_DISPLAY_WIDTH, MIN_DISPLAY_HEIGHT).unwrap();
        let empty = FrameResult::with_fields(layout.fields());
        assert!(layout.render(&empty).is_ok());
        assert!(layout.render(&full_frame(&layout)).is_ok());
    }

    #[test]
    fn test_year_end_screen() {
        let layout = DashboardLayout::year_end(800, 480).unwrap();
        assert_eq!(
            layout.fields(),
            vec![ids::COMMITS_DAILY_AVG, ids::COMMITS_MAX_DAY, ids::COMMITS_YEAR, ids::TIMESTAMP]
        );

        let ts = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 12, 31, 9, 0, 0)
            .unwrap();
        let mut frame = FrameResult::with_fields(layout.fields());
        for point in [
            DataPoint::new(ids::TIMESTAMP, ts),
            DataPoint::new(ids::COMMITS_YEAR, 1234u64),
            DataPoint::new(ids::COMMITS_MAX_DAY, 41u64),
            DataPoint::new(ids::COMMITS_DAILY_AVG, 3.37),
        ] {
            assert!(frame.record(point));
        }
        let full = layout.render(&frame).unwrap();
        let empty = layout.render(&FrameResult::with_fields(layout.fields())).unwrap();
        for region in layout.regions() {
            assert!(full.ink_in(&region.bounds) > 0, "{} is blank", region.id);
            assert!(empty.ink_in(&region.bounds) > 0, "{} has no placeholder", region.id);
        }
        let total = layout.region("year_total").unwrap().bounds;
        assert!(!full.same_in(&empty, &total));
    }

    #[test]
    fn test_year_end_screen_scales() {
        for (w, h) in [(MIN_DISPLAY_WIDTH, MIN_DISPLAY_HEIGHT), (400, 300), (1304, 984)] {
            let layout = DashboardLayout::year_end(w, h).unwrap();
            assert!(layout.regions().iter().all(|r| r.bounds.fits_within(w, h)));
            assert!(layout.render(&FrameResult::with_fields(layout.fields())).is_ok());
        }
        assert!(DashboardLayout::year_end(21, 480).is_err());
    }

    #[test]
    fn test_render_is_deterministic() {
        let layout = DashboardLayout::standard(800, 480).unwrap();
        let frame = full_frame(&layout);
        let a = layout.render(&frame).unwrap();
        let b = layout.render(&frame).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!((a.width(), a.height()), (800, 480));
    }

    #[test]
    fn test_failed_field_only_changes_its_region() {
        let layout = DashboardLayout::standard(800, 480).unwrap();
        let frame = full_frame(&layout);
        let mut failed = frame.clone();
        failed.mark_unavailable(ids::VPS_USAGE);

        let ok = layout.render(&frame).unwrap();
        let partial = layout.render(&failed).unwrap();
        assert_ne!(ok, partial);

        let vps = layout.region("vps_ring").unwrap().bounds;
        for region in layout.regions() {
            if region.id != "vps_ring" {
                assert!(ok.same_in(&partial, &region.bounds), "{} changed", region.id);
            }
        }
        // The failed slot still draws its placeholder ring
        assert!(partial.ink_in(&vps) > 0);
    }

    #[test]
    fn test_all_unavailable_renders_placeholders_everywhere() {
        let layout = DashboardLayout::standard(800, 480).unwrap();
        let frame = FrameResult::with_fields(layout.fields());
        let bitmap = layout.render(&frame).unwrap();
        for region in layout.regions() {
            assert!(bitmap.ink_in(&region.bounds) > 0, "{} is blank", region.id);
        }
    }

    #[test]
    fn test_unknown_weather_code_uses_default_icon() {
        let layout = DashboardLayout::standard(800, 480).unwrap();
        let mut frame = full_frame(&layout);
        frame.record(DataPoint::new(ids::WEATHER_CONDITION, FieldValue::Icon("Clouds".into())));
        let clouds = layout.render(&frame).unwrap();
        frame.record(DataPoint::new(ids::WEATHER_CONDITION, FieldValue::Icon("Plasma".into())));
        let unknown = layout.render(&frame).unwrap();
        assert_eq!(clouds, unknown);
    }

    #[test]
    fn test_region_out_of_bounds() {
        let region = LayoutRegion::new(
            "wide",
            Rect::new(700, 0, 200, 20),
            RegionFormat::Caption {
                text: "x".into(),
                size: FontSize::Small,
            },
        );
        let err = DashboardLayout::new(800, 480, vec![region]).unwrap_err();
        assert!(matches!(err, RenderError::RegionOutOfBounds { ref region, .. } if region == "wide"));
    }

    #[test]
    fn test_overlapping_regions_rejected() {
        let caption = |id: &str, x| {
            LayoutRegion::new(
                id,
                Rect::new(x, 0, 100, 20),
                RegionFormat::Caption {
                    text: id.into(),
                    size: FontSize::Small,
                },
            )
        };
        assert!(DashboardLayout::new(800, 480, vec![caption("a", 0), caption("b", 100)]).is_ok());
        assert!(matches!(
            DashboardLayout::new(800, 480, vec![caption("a", 0), caption("b", 50)]),
            Err(RenderError::Layout(_))
        ));
    }

    #[test]
    fn test_bad_date_pattern_rejected() {
        let region = LayoutRegion::new(
            "date",
            Rect::new(0, 0, 100, 20),
            RegionFormat::DateTime {
                pattern: "%Q".into(),
                size: FontSize::Small,
            },
        )
        .field(ids::TIMESTAMP);
        assert!(matches!(DashboardLayout::new(800, 480, vec![region]), Err(RenderError::Layout(_))));
    }

    #[test]
    fn test_malformed_asset_aborts_render() {
        let mut assets = AssetStore::new();
        assets.insert("trend_up", vec![0x42, 0x4d, 0, 0]);
        let layout = DashboardLayout::standard(800, 480).unwrap().with_assets(assets);
        let frame = full_frame(&layout);
        assert!(matches!(layout.render(&frame), Err(RenderError::Asset { .. })));
    }
}
