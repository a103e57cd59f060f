//! Reference raster renderer for draw plans.
//!
//! Paints a [`DrawPlan`] onto an RGBA image for previews and debugging. Text
//! labels are painted as their background plate only; glyph rendering belongs
//! to the UI shell.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::draw::{Alignment, Color, DrawPlan, Primitive, TextLabel};
use crate::error::Result;
use crate::types::{Point, Rect, Size};

/// Approximate advance of one glyph relative to the font size.
const GLYPH_ASPECT: f32 = 0.6;

/// Render a plan onto a transparent canvas of the viewport's size.
pub fn render_plan(plan: &DrawPlan, viewport: Size) -> RgbaImage {
    let width = viewport.width.max(0.0).round() as u32;
    let height = viewport.height.max(0.0).round() as u32;
    let mut img = RgbaImage::new(width, height);
    paint_plan(&mut img, plan);
    img
}

/// Paint a plan onto an existing image, e.g. a camera frame.
pub fn paint_plan(img: &mut RgbaImage, plan: &DrawPlan) {
    for primitive in plan.iter() {
        match primitive {
            Primitive::Circle {
                center,
                radius,
                color,
            } => draw_circle(img, *center, *radius, *color),
            Primitive::Text(label) => draw_label_plate(img, label),
            Primitive::Polyline {
                points,
                color,
                width,
            } => {
                for pair in points.windows(2) {
                    draw_thick_line(img, pair[0], pair[1], *width, *color);
                }
            }
            Primitive::Rect { rect, color, width } => draw_rect(img, rect, *width, *color),
        }
    }
}

/// Render a plan and write it as a PNG file.
pub fn save_png<P: AsRef<Path>>(plan: &DrawPlan, viewport: Size, path: P) -> Result<()> {
    render_plan(plan, viewport).save(path)?;
    Ok(())
}

/// Screen-space box covered by a label's background plate.
pub fn label_bounds(label: &TextLabel) -> Rect {
    let width = label.text.chars().count() as f32 * label.size * GLYPH_ASPECT;
    let x = match label.alignment {
        Alignment::Left => label.origin.x,
        Alignment::Center => label.origin.x - width / 2.0,
        Alignment::Right => label.origin.x - width,
    };
    Rect::new(x, label.origin.y, width, label.size)
}

fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Color) {
    let (img_w, img_h) = img.dimensions();
    if x < 0 || y < 0 || x >= img_w as i32 || y >= img_h as i32 {
        return;
    }

    let dst = img.get_pixel(x as u32, y as u32).0;
    let alpha = color.a as f32 / 255.0;
    let src = color.to_array();
    let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    let out_alpha = (color.a as f32 + dst[3] as f32 * (1.0 - alpha)).round() as u8;
    img.put_pixel(
        x as u32,
        y as u32,
        Rgba([
            mix(src[0], dst[0]),
            mix(src[1], dst[1]),
            mix(src[2], dst[2]),
            out_alpha,
        ]),
    );
}

fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Color) {
    for py in y..y + h {
        for px in x..x + w {
            blend_pixel(img, px, py, color);
        }
    }
}

fn draw_rect(img: &mut RgbaImage, rect: &Rect, stroke: f32, color: Color) {
    let x = rect.x.round() as i32;
    let y = rect.y.round() as i32;
    let w = rect.width.round() as i32;
    let h = rect.height.round() as i32;
    let t = (stroke.round() as i32).clamp(1, (w.min(h) / 2).max(1));

    // Top and bottom edges
    fill_rect(img, x, y, w, t, color);
    fill_rect(img, x, y + h - t, w, t, color);
    // Left and right edges, without repainting the corners
    fill_rect(img, x, y + t, t, h - 2 * t, color);
    fill_rect(img, x + w - t, y + t, t, h - 2 * t, color);
}

fn draw_circle(img: &mut RgbaImage, center: Point, radius: f32, color: Color) {
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    let r = radius.round() as i32;

    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                blend_pixel(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_line(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        blend_pixel(img, x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_thick_line(img: &mut RgbaImage, from: Point, to: Point, width: f32, color: Color) {
    let half = ((width.round() as i32).max(1) - 1) / 2;
    let (x0, y0) = (from.x.round() as i32, from.y.round() as i32);
    let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);

    // Offset across the dominant axis.
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    for offset in -half..=half {
        if steep {
            draw_line(img, x0 + offset, y0, x1 + offset, y1, color);
        } else {
            draw_line(img, x0, y0 + offset, x1, y1 + offset, color);
        }
    }
}

fn draw_label_plate(img: &mut RgbaImage, label: &TextLabel) {
    let bounds = label_bounds(label);
    fill_rect(
        img,
        bounds.x.round() as i32,
        bounds.y.round() as i32,
        bounds.width.round() as i32,
        bounds.height.round() as i32,
        label.background,
    );
}
