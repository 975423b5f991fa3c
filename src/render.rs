//! Procedural rendering of the SAFE app icon.
//!
//! The icon is a vertical purple gradient with a white alert triangle in the
//! middle, an exclamation mark inside the triangle and a "SAFE" caption near
//! the bottom edge. Every measurement is a fixed ratio of the icon size, so
//! all resolutions share the same relative geometry.

use crate::draw::{fill_circle, fill_convex_polygon, fill_rect, fill_row};
use crate::font::{default_chain, load_caption_font, FontSource};
use anyhow::{anyhow, Result};
use image::{Rgb, RgbImage};
use log::warn;

/// Caption drawn under the triangle.
pub const CAPTION: &str = "SAFE";

/// Colours used by the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Top of the gradient, also used for the exclamation mark (#667eea).
    pub start: Rgb<u8>,
    /// Bottom of the gradient (#764ba2).
    pub end: Rgb<u8>,
    /// Triangle and caption.
    pub foreground: Rgb<u8>,
}

pub const PALETTE: Palette = Palette {
    start: Rgb([102, 126, 234]),
    end: Rgb([118, 75, 162]),
    foreground: Rgb([255, 255, 255]),
};

impl Palette {
    /// Gradient colour for row `row` of an icon `size` pixels tall.
    pub fn gradient_at(&self, row: u32, size: u32) -> Rgb<u8> {
        if size == 0 {
            return self.start;
        }
        let ratio = row as f64 / size as f64;
        let lerp = |from: u8, to: u8| {
            let value = from as f64 + (to as f64 - from as f64) * ratio;
            value as u8
        };

        Rgb([
            lerp(self.start[0], self.end[0]),
            lerp(self.start[1], self.end[1]),
            lerp(self.start[2], self.end[2]),
        ])
    }
}

/// Pixel geometry of the icon at one size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub size: u32,
    pub center: (i32, i32),
    pub triangle_size: i32,
    pub bar_width: i32,
    pub bar_height: i32,
    pub dot_radius: i32,
    pub font_size: u32,
}

impl Geometry {
    pub fn new(size: u32) -> Self {
        let ratio = |r: f64| (size as f64 * r) as i32;
        let center = (size / 2) as i32;

        Self {
            size,
            center: (center, center),
            triangle_size: ratio(0.4),
            bar_width: ratio(0.04),
            bar_height: ratio(0.15),
            dot_radius: ratio(0.03),
            font_size: ratio(0.12) as u32,
        }
    }

    /// Apex, bottom-left and bottom-right vertices of the alert triangle.
    pub fn triangle(&self) -> [(i32, i32); 3] {
        let (cx, cy) = self.center;
        let half = self.triangle_size / 2;
        [(cx, cy - half), (cx - half, cy + half), (cx + half, cy + half)]
    }

    /// Inclusive corners of the exclamation bar.
    pub fn bar(&self) -> ((i32, i32), (i32, i32)) {
        let (cx, cy) = self.center;
        let x = cx - self.bar_width / 2;
        let y = cy - self.bar_height / 2;
        ((x, y), (x + self.bar_width, y + self.bar_height))
    }

    /// Centre of the exclamation dot.
    pub fn dot_center(&self) -> (i32, i32) {
        let (cx, cy) = self.center;
        let gap = (self.dot_radius as f64 * 1.5) as i32;
        (cx, cy + self.bar_height / 2 + gap)
    }

    /// Top edge of the caption line box.
    pub fn caption_top(&self) -> i32 {
        (self.size as f64 * 0.85) as i32 - (self.font_size / 2) as i32
    }
}

/// Render the icon at `size` x `size` using the default caption font chain.
pub fn render(size: u32) -> RgbImage {
    render_with_fonts(size, &default_chain())
}

/// Render the icon, resolving the caption font from `fonts`.
///
/// Caption failures are logged and the icon is returned without text.
pub fn render_with_fonts(size: u32, fonts: &[FontSource]) -> RgbImage {
    let geometry = Geometry::new(size);
    let mut canvas = RgbImage::new(size, size);

    draw_background(&mut canvas, &PALETTE);
    draw_alert(&mut canvas, &geometry, &PALETTE);

    if let Err(err) = draw_caption(&mut canvas, &geometry, fonts, PALETTE.foreground) {
        warn!("Could not add text to {size}x{size} icon: {err:#}");
    }

    canvas
}

fn draw_background(canvas: &mut RgbImage, palette: &Palette) {
    let size = canvas.height();
    for row in 0..size {
        fill_row(canvas, row, palette.gradient_at(row, size));
    }
}

fn draw_alert(canvas: &mut RgbImage, geometry: &Geometry, palette: &Palette) {
    fill_convex_polygon(canvas, &geometry.triangle(), palette.foreground);

    let ((x0, y0), (x1, y1)) = geometry.bar();
    fill_rect(canvas, x0, y0, x1, y1, palette.start);

    let (dx, dy) = geometry.dot_center();
    fill_circle(canvas, dx, dy, geometry.dot_radius, palette.start);
}

fn draw_caption(
    canvas: &mut RgbImage,
    geometry: &Geometry,
    fonts: &[FontSource],
    color: Rgb<u8>,
) -> Result<()> {
    if geometry.font_size == 0 {
        return Err(anyhow!("icon too small for a caption"));
    }

    let font = load_caption_font(fonts)?;
    let extent = font
        .measure(CAPTION, geometry.font_size)
        .ok_or_else(|| anyhow!("caption {CAPTION:?} has no visible glyphs"))?;

    let ink_x = (geometry.size as i32 - extent.width as i32) / 2;
    font.draw(
        canvas,
        CAPTION,
        geometry.font_size,
        ink_x - extent.left,
        geometry.caption_top(),
        color,
    );

    Ok(())
}
