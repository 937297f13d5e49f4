//! Composite widgets: progress ring, number cross and titled list

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle, Line, PrimitiveStyle, Rectangle};
use std::convert::Infallible;

use inkdash_types::{FontSize, HAlign, Rect, PLACEHOLDER};

use crate::format::format_number;
use crate::text::{draw_fitted_text, draw_line, fit_text};

const LIST_TITLE_HEIGHT: u32 = 24;
const LIST_ROW_HEIGHT: u32 = 22;
const LIST_ROW_GAP: u32 = 2;

fn clip_area(bounds: &Rect) -> Rectangle {
    Rectangle::new(
        Point::new(bounds.x, bounds.y),
        Size::new(bounds.width, bounds.height),
    )
}

/// Ring stroke for a given diameter
pub fn ring_thickness(diameter: u32) -> u32 {
    (diameter / 12).max(3)
}

/// Draw a progress ring filled clockwise from 12 o'clock by `percent`
/// (clamped to 0..=100) with the value in the middle. `None` draws the
/// empty ring with a `--%` label.
pub fn draw_ring<D>(target: &mut D, bounds: &Rect, percent: Option<f64>) -> Result<(), Infallible>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let mut clipped = target.clipped(&clip_area(bounds));
    let diameter = bounds.width.min(bounds.height);
    if diameter < 8 {
        return Ok(());
    }
    let (cx, cy) = bounds.center();
    let center = Point::new(cx, cy);
    let thickness = ring_thickness(diameter);

    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut clipped)?;

    let track = diameter - thickness;
    let label = match percent {
        Some(p) if p.is_finite() => {
            let p = p.clamp(0.0, 100.0);
            let style = PrimitiveStyle::with_stroke(BinaryColor::On, thickness);
            if p >= 100.0 {
                Circle::with_center(center, track).into_styled(style).draw(&mut clipped)?;
            } else if p > 0.0 {
                let sweep = (360.0 * p / 100.0) as f32;
                Arc::with_center(center, track, Angle::from_degrees(-90.0), Angle::from_degrees(sweep))
                    .into_styled(style)
                    .draw(&mut clipped)?;
            }
            format!("{}%", format_number(p, 0, false, false))
        }
        _ => format!("{}%", PLACEHOLDER),
    };

    let inner = diameter.saturating_sub(2 * thickness + 4);
    let side = (inner as f32 * 0.75) as u32;
    let label_box = Rect::new(cx - side as i32 / 2, cy - side as i32 / 2, side, side);
    draw_fitted_text(&mut clipped, &label_box, &label, FontSize::Medium, HAlign::Center)
}

/// Draw four numbers in a 2x2 cross: top-left, top-right, bottom-left,
/// bottom-right. Missing values show the placeholder.
pub fn draw_cross<D>(target: &mut D, bounds: &Rect, values: [Option<f64>; 4]) -> Result<(), Infallible>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let mut clipped = target.clipped(&clip_area(bounds));
    let (cx, cy) = bounds.center();
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 2);

    Line::new(Point::new(cx, bounds.y + 4), Point::new(cx, bounds.bottom() as i32 - 5))
        .into_styled(stroke)
        .draw(&mut clipped)?;
    Line::new(Point::new(bounds.x + 4, cy), Point::new(bounds.right() as i32 - 5, cy))
        .into_styled(stroke)
        .draw(&mut clipped)?;

    let cell_w = (bounds.width / 2).saturating_sub(2);
    let cell_h = (bounds.height / 2).saturating_sub(2);
    if cell_w == 0 || cell_h == 0 {
        return Ok(());
    }
    let cells = [
        Rect::new(bounds.x, bounds.y, cell_w, cell_h),
        Rect::new(cx + 2, bounds.y, cell_w, cell_h),
        Rect::new(bounds.x, cy + 2, cell_w, cell_h),
        Rect::new(cx + 2, cy + 2, cell_w, cell_h),
    ];
    for (cell, value) in cells.iter().zip(values) {
        let text = match value {
            Some(v) => format_number(v, 0, false, false),
            None => PLACEHOLDER.to_string(),
        };
        draw_fitted_text(&mut clipped, cell, &text, FontSize::Medium, HAlign::Center)?;
    }
    Ok(())
}

/// Draw a titled list, one item per row. Items that do not fit vertically
/// are dropped. `None` shows a single placeholder row.
pub fn draw_list<D>(
    target: &mut D,
    bounds: &Rect,
    title: &str,
    items: Option<&[String]>,
) -> Result<(), Infallible>
where
    D: DrawTarget<Color = BinaryColor, Error = Infallible>,
{
    let mut clipped = target.clipped(&clip_area(bounds));

    let title_box = Rect::new(bounds.x, bounds.y, bounds.width, LIST_TITLE_HEIGHT.min(bounds.height));
    draw_fitted_text(&mut clipped, &title_box, title, FontSize::Medium, HAlign::Left)?;
    let rule_y = bounds.y + LIST_TITLE_HEIGHT as i32;
    Line::new(Point::new(bounds.x, rule_y), Point::new(bounds.right() as i32 - 1, rule_y))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut clipped)?;

    let placeholder = [PLACEHOLDER.to_string()];
    let (rows, bullet): (&[String], &str) = match items {
        Some(items) => (items, "- "),
        None => (&placeholder, ""),
    };

    let mut y = rule_y + LIST_ROW_GAP as i32 + 2;
    for (shown, item) in rows.iter().enumerate() {
        if y as i64 + LIST_ROW_HEIGHT as i64 > bounds.bottom() {
            log::trace!("List '{}' dropped {} rows", title, rows.len() - shown);
            break;
        }
        let row = Rect::new(bounds.x, y, bounds.width, LIST_ROW_HEIGHT);
        let fitted = fit_text(&format!("{}{}", bullet, item), row.width, row.height, FontSize::Medium);
        draw_line(&mut clipped, &row, &fitted, HAlign::Left)?;
        y += (LIST_ROW_HEIGHT + LIST_ROW_GAP) as i32;
    }
    Ok(())
}
