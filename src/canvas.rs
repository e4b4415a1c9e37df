// src/canvas.rs

//! Off-screen raster surface for chart and flowchart artifacts.
//!
//! Each render call owns its own [`Canvas`]; the surface is dropped as soon
//! as it is encoded, so no drawing state survives across artifacts. Glyphs
//! are not rasterized here: text is recorded as [`TextMark`]s in canvas
//! coordinates and drawn as vector text by the PDF composer once the image
//! is placed on a page.

use crate::color::Color;
use image::{Rgb, RgbImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkAlign {
    Left,
    Center,
    Right,
}

/// A piece of text anchored to a canvas position.
///
/// `x`/`y` are canvas pixels (`y` grows downward, `y` is the text baseline);
/// `size` is the final font size in points, used as-is when the image is
/// placed.
#[derive(Debug, Clone)]
pub struct TextMark {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub align: MarkAlign,
    /// Rotated 90 degrees counter-clockwise (vertical axis titles).
    pub rotated: bool,
}

/// A finished artifact: raw RGB pixels plus the text overlay.
#[derive(Debug, Clone)]
pub struct ArtifactImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub marks: Vec<TextMark>,
}

pub struct Canvas {
    img: RgbImage,
    marks: Vec<TextMark>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let img = RgbImage::from_pixel(width, height, Rgb([fill.r, fill.g, fill.b]));
        Self { img, marks: Vec::new() }
    }

    pub fn width(&self) -> f32 {
        self.img.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.img.height() as f32
    }

    fn set(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, Rgb([color.r, color.g, color.b]));
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = (x + w).ceil() as i64;
        let y1 = (y + h).ceil() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.set(px, py, color);
            }
        }
    }

    /// Straight line with square caps, stamped at sub-pixel steps.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, thickness: f32, color: Color) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        let steps = (len * 2.0).ceil().max(1.0) as i64;
        let half = (thickness / 2.0).max(0.5);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let cx = x0 + dx * t;
            let cy = y0 + dy * t;
            self.fill_rect(cx - half, cy - half, half * 2.0, half * 2.0, color);
        }
    }

    /// Horizontal dashed line (used for chart gridlines).
    pub fn draw_dashed_hline(&mut self, x0: f32, x1: f32, y: f32, thickness: f32, color: Color) {
        let (on, off) = (12.0, 8.0);
        let mut x = x0;
        while x < x1 {
            let seg_end = (x + on).min(x1);
            self.draw_line(x, y, seg_end, y, thickness, color);
            x = seg_end + off;
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;
        let r2 = r * r;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.set(px, py, color);
                }
            }
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, thickness: f32, color: Color) {
        let outer = r + thickness / 2.0;
        let inner = (r - thickness / 2.0).max(0.0);
        let x0 = (cx - outer).floor() as i64;
        let x1 = (cx + outer).ceil() as i64;
        let y0 = (cy - outer).floor() as i64;
        let y1 = (cy + outer).ceil() as i64;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d2 = dx * dx + dy * dy;
                if d2 <= outer * outer && d2 >= inner * inner {
                    self.set(px, py, color);
                }
            }
        }
    }

    /// Filled pie wedge. Angles are degrees in math orientation (counter-
    /// clockwise from the positive x axis); the sweep runs CCW from
    /// `start_deg` through `sweep_deg`.
    pub fn fill_wedge(&mut self, cx: f32, cy: f32, r: f32, start_deg: f32, sweep_deg: f32, color: Color) {
        if sweep_deg <= 0.0 {
            return;
        }
        let x0 = (cx - r).floor() as i64;
        let x1 = (cx + r).ceil() as i64;
        let y0 = (cy - r).floor() as i64;
        let y1 = (cy + r).ceil() as i64;
        let r2 = r * r;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                // canvas y grows downward; flip into math orientation
                let dy = cy - (py as f32 + 0.5);
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let ang = dy.atan2(dx).to_degrees();
                let rel = (ang - start_deg).rem_euclid(360.0);
                if rel <= sweep_deg {
                    self.set(px, py, color);
                }
            }
        }
    }

    pub fn fill_triangle(&mut self, p: [(f32, f32); 3], color: Color) {
        let min_x = p.iter().map(|q| q.0).fold(f32::INFINITY, f32::min).floor() as i64;
        let max_x = p.iter().map(|q| q.0).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;
        let min_y = p.iter().map(|q| q.1).fold(f32::INFINITY, f32::min).floor() as i64;
        let max_y = p.iter().map(|q| q.1).fold(f32::NEG_INFINITY, f32::max).ceil() as i64;

        let edge = |a: (f32, f32), b: (f32, f32), c: (f32, f32)| -> f32 {
            (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
        };
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let q = (px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(p[1], p[2], q);
                let w1 = edge(p[2], p[0], q);
                let w2 = edge(p[0], p[1], q);
                let all_pos = w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0;
                let all_neg = w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0;
                if all_pos || all_neg {
                    self.set(px, py, color);
                }
            }
        }
    }

    pub fn text(&mut self, mark: TextMark) {
        self.marks.push(mark);
    }

    pub fn finish(self) -> ArtifactImage {
        let width = self.img.width();
        let height = self.img.height();
        ArtifactImage { width, height, rgb: self.img.into_raw(), marks: self.marks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(img: &ArtifactImage, x: u32, y: u32) -> (u8, u8, u8) {
        let i = ((y * img.width + x) * 3) as usize;
        (img.rgb[i], img.rgb[i + 1], img.rgb[i + 2])
    }

    #[test]
    fn new_canvas_is_filled() {
        let canvas = Canvas::new(10, 10, Color::rgb(1, 2, 3));
        let img = canvas.finish();
        assert_eq!(img.rgb.len(), 10 * 10 * 3);
        assert_eq!(pixel(&img, 5, 5), (1, 2, 3));
    }

    #[test]
    fn fill_rect_sets_interior_only() {
        let mut canvas = Canvas::new(20, 20, Color::WHITE);
        canvas.fill_rect(5.0, 5.0, 10.0, 10.0, Color::BLACK);
        let img = canvas.finish();
        assert_eq!(pixel(&img, 10, 10), (0, 0, 0));
        assert_eq!(pixel(&img, 2, 2), (255, 255, 255));
    }

    #[test]
    fn drawing_out_of_bounds_is_clamped() {
        let mut canvas = Canvas::new(8, 8, Color::WHITE);
        canvas.fill_rect(-5.0, -5.0, 100.0, 100.0, Color::BLACK);
        let img = canvas.finish();
        assert_eq!(pixel(&img, 0, 0), (0, 0, 0));
        assert_eq!(pixel(&img, 7, 7), (0, 0, 0));
    }

    #[test]
    fn wedge_quarter_covers_expected_quadrant() {
        let mut canvas = Canvas::new(100, 100, Color::WHITE);
        // 90..180 degrees CCW: upper-left quadrant in canvas coordinates
        canvas.fill_wedge(50.0, 50.0, 40.0, 90.0, 90.0, Color::BLACK);
        let img = canvas.finish();
        assert_eq!(pixel(&img, 30, 30), (0, 0, 0));
        assert_eq!(pixel(&img, 70, 30), (255, 255, 255));
        assert_eq!(pixel(&img, 70, 70), (255, 255, 255));
    }

    #[test]
    fn marks_survive_finish() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.text(TextMark {
            x: 5.0,
            y: 5.0,
            text: "hello".into(),
            size: 9.0,
            color: Color::BLACK,
            bold: false,
            align: MarkAlign::Center,
            rotated: false,
        });
        let img = canvas.finish();
        assert_eq!(img.marks.len(), 1);
        assert_eq!(img.marks[0].text, "hello");
    }
}
