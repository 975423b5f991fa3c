//! Raster primitives used by the icon renderer.
//!
//! Every primitive clips to the canvas, so callers can pass geometry that
//! partially (or entirely) falls outside the image without panicking.
//! Rectangles and circles are filled inclusively, matching how the icon
//! geometry is specified in terms of corner coordinates.

use image::{Rgb, RgbImage};

/// Fill a single row with a solid colour.
pub fn fill_row(canvas: &mut RgbImage, y: u32, color: Rgb<u8>) {
    if y >= canvas.height() {
        return;
    }
    for x in 0..canvas.width() {
        canvas.put_pixel(x, y, color);
    }
}

/// Fill the rectangle spanned by `(x0, y0)` and `(x1, y1)`, both corners included.
pub fn fill_rect(canvas: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    let (x0, x1) = (x0.min(x1), x0.max(x1));
    let (y0, y1) = (y0.min(y1), y0.max(y1));

    for y in y0..=y1 {
        fill_span(canvas, y, x0, x1, color);
    }
}

/// Fill a disc of the given radius around `(cx, cy)`.
///
/// A pixel is inside when its offset from the centre lies within the radius.
pub fn fill_circle(canvas: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    if radius < 0 {
        return;
    }
    let r2 = i64::from(radius) * i64::from(radius);

    for dy in -radius..=radius {
        // Widest dx on this row that still satisfies dx² + dy² <= r²
        let remaining = r2 - i64::from(dy) * i64::from(dy);
        let half = (remaining as f64).sqrt() as i32;
        fill_span(canvas, cy + dy, cx - half, cx + half, color);
    }
}

/// Fill a convex polygon, edges included.
///
/// For each scanline the leftmost and rightmost edge crossings are filled,
/// which is exact for convex shapes such as the alert triangle.
pub fn fill_convex_polygon(canvas: &mut RgbImage, points: &[(i32, i32)], color: Rgb<u8>) {
    if points.is_empty() {
        return;
    }

    let top = points.iter().map(|p| p.1).min().unwrap_or(0);
    let bottom = points.iter().map(|p| p.1).max().unwrap_or(0);

    for y in top..=bottom {
        let mut left = i32::MAX;
        let mut right = i32::MIN;

        for (i, &(ax, ay)) in points.iter().enumerate() {
            let (bx, by) = points[(i + 1) % points.len()];
            if y < ay.min(by) || y > ay.max(by) {
                continue;
            }

            if ay == by {
                left = left.min(ax.min(bx));
                right = right.max(ax.max(bx));
            } else {
                let t = (y - ay) as f32 / (by - ay) as f32;
                let x = (ax as f32 + t * (bx - ax) as f32).round() as i32;
                left = left.min(x);
                right = right.max(x);
            }
        }

        if left <= right {
            fill_span(canvas, y, left, right, color);
        }
    }
}

/// Blend `color` over the pixel at `(x, y)` with the given coverage in `[0, 1]`.
pub fn blend_pixel(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);

    for channel in 0..3 {
        let under = pixel[channel] as f32;
        let over = color[channel] as f32;
        pixel[channel] = (under + (over - under) * coverage).round() as u8;
    }
}

// Inclusive horizontal span, clipped to the canvas.
fn fill_span(canvas: &mut RgbImage, y: i32, x0: i32, x1: i32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    if y < 0 || y as u32 >= height || width == 0 {
        return;
    }

    let start = x0.max(0);
    let end = x1.min(width as i32 - 1);
    for x in start..=end {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}
