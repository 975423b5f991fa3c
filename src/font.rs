//! Caption fonts.
//!
//! The caption font is resolved from an ordered chain of [`FontSource`]s.
//! The first source that yields a usable font wins; [`FontSource::Builtin`]
//! never fails, so a chain ending with it always produces a font.

use crate::draw::{blend_pixel, fill_rect};
use anyhow::{anyhow, Context, Result};
use fontdb::{Database, Source};
use image::{Rgb, RgbImage};
use log::debug;
use rusttype::{point, Font, Scale};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Preferred caption font, looked up by file name.
pub const PRIMARY_FONT: &str = "arialbd.ttf";
/// Used when the primary font is not installed.
pub const SECONDARY_FONT: &str = "arial.ttf";

/// One alternative in the caption font chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A font file name matched against the installed system fonts.
    Named(&'static str),
    /// An explicit path to a TrueType/OpenType file.
    Path(PathBuf),
    /// The built-in 5x7 bitmap font.
    Builtin,
}

/// The chain used for the SAFE caption: bold font, regular font, built-in.
pub fn default_chain() -> Vec<FontSource> {
    vec![
        FontSource::Named(PRIMARY_FONT),
        FontSource::Named(SECONDARY_FONT),
        FontSource::Builtin,
    ]
}

/// A font ready to lay out caption text.
pub enum CaptionFont {
    Outline(Font<'static>),
    Bitmap,
}

impl fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionFont::Outline(_) => f.write_str("CaptionFont::Outline"),
            CaptionFont::Bitmap => f.write_str("CaptionFont::Bitmap"),
        }
    }
}

/// Measured ink of a laid-out string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    /// Horizontal distance from the pen origin to the first inked column.
    pub left: i32,
    pub width: u32,
    pub height: u32,
}

/// Try each source in order and return the first font that loads.
///
/// The system font database is only scanned when the chain reaches a
/// [`FontSource::Named`] entry, and at most once per call.
pub fn load_caption_font(chain: &[FontSource]) -> Result<CaptionFont> {
    let mut system: Option<Database> = None;

    for source in chain {
        let loaded = match source {
            FontSource::Named(name) => {
                load_named(system.get_or_insert_with(system_fonts), name)
            }
            FontSource::Path(path) => load_font_file(path),
            FontSource::Builtin => Ok(CaptionFont::Bitmap),
        };

        match loaded {
            Ok(font) => return Ok(font),
            Err(err) => debug!("Font source {:?} unavailable: {:#}", source, err),
        }
    }

    Err(anyhow!(
        "No usable caption font among {} source(s)",
        chain.len()
    ))
}

/// Database of the fonts installed on this machine.
pub fn system_fonts() -> Database {
    let mut db = Database::new();
    db.load_system_fonts();
    db
}

fn load_named(db: &Database, name: &str) -> Result<CaptionFont> {
    let face = db
        .faces()
        .find(|face| {
            face_path(&face.source)
                .and_then(|path| path.file_name())
                .and_then(|f| f.to_str())
                .map_or(false, |f| f.eq_ignore_ascii_case(name))
        })
        .with_context(|| format!("Font {name} is not installed"))?;

    let data = db
        .with_face_data(face.id, |data, _| data.to_vec())
        .with_context(|| format!("Failed to read font data for {name}"))?;
    let font = Font::try_from_vec_and_index(data, face.index)
        .ok_or_else(|| anyhow!("{name} is not a usable TrueType font"))?;
    Ok(CaptionFont::Outline(font))
}

/// File backing a face, if it was loaded from disk.
pub fn face_path(source: &Source) -> Option<&Path> {
    match source {
        Source::File(path) | Source::SharedFile(path, _) => Some(path.as_path()),
        _ => None,
    }
}

fn load_font_file(path: &Path) -> Result<CaptionFont> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file {}", path.display()))?;
    let font = Font::try_from_vec(data)
        .ok_or_else(|| anyhow!("{} is not a usable TrueType font", path.display()))?;
    Ok(CaptionFont::Outline(font))
}

/// First installed `.ttf` file that rusttype can lay out.
#[cfg(test)]
pub(crate) fn any_system_font_file() -> Option<PathBuf> {
    let db = system_fonts();
    let found = db
        .faces()
        .filter_map(|face| face_path(&face.source))
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| e.eq_ignore_ascii_case("ttf"))
        })
        .find(|path| {
            load_font_file(path)
                .ok()
                .and_then(|font| font.measure("SAFE", 48))
                .is_some()
        })
        .map(Path::to_path_buf);
    found
}

impl CaptionFont {
    /// Measure the ink of `text` at the given pixel size.
    ///
    /// Returns `None` when nothing would be drawn.
    pub fn measure(&self, text: &str, px: u32) -> Option<TextExtent> {
        match self {
            CaptionFont::Outline(font) => {
                let scale = Scale::uniform(px as f32);
                let ascent = font.v_metrics(scale).ascent;

                let (mut min_x, mut max_x) = (i32::MAX, i32::MIN);
                let (mut min_y, mut max_y) = (i32::MAX, i32::MIN);
                for glyph in font.layout(text, scale, point(0.0, ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        min_x = min_x.min(bb.min.x);
                        max_x = max_x.max(bb.max.x);
                        min_y = min_y.min(bb.min.y);
                        max_y = max_y.max(bb.max.y);
                    }
                }

                if min_x >= max_x {
                    return None;
                }
                Some(TextExtent {
                    left: min_x,
                    width: (max_x - min_x) as u32,
                    height: (max_y - min_y) as u32,
                })
            }
            CaptionFont::Bitmap => bitmap::measure(text, px),
        }
    }

    /// Draw `text` with its pen origin at `x` and the top of its line box at `top`.
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        px: u32,
        x: i32,
        top: i32,
        color: Rgb<u8>,
    ) {
        match self {
            CaptionFont::Outline(font) => {
                let scale = Scale::uniform(px as f32);
                let ascent = font.v_metrics(scale).ascent;

                for glyph in font.layout(text, scale, point(x as f32, top as f32 + ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            blend_pixel(
                                canvas,
                                bb.min.x + gx as i32,
                                bb.min.y + gy as i32,
                                color,
                                coverage,
                            );
                        });
                    }
                }
            }
            CaptionFont::Bitmap => bitmap::draw(canvas, text, px, x, top, color),
        }
    }
}

/// Built-in 5x7 font, scaled up in whole-pixel blocks.
mod bitmap {
    use super::*;

    const COLS: u32 = 5;
    const ROWS: u32 = 7;
    const ADVANCE: u32 = COLS + 1;

    // Block size for a requested pixel height, never below one pixel
    fn block(px: u32) -> u32 {
        (px / ROWS).max(1)
    }

    pub fn measure(text: &str, px: u32) -> Option<TextExtent> {
        let chars = text.chars().count() as u32;
        if chars == 0 || !text.chars().any(|c| glyph(c).iter().any(|row| *row != 0)) {
            return None;
        }

        let block = block(px);
        Some(TextExtent {
            left: 0,
            width: (chars * ADVANCE - 1) * block,
            height: ROWS * block,
        })
    }

    pub fn draw(canvas: &mut RgbImage, text: &str, px: u32, x: i32, top: i32, color: Rgb<u8>) {
        let block = block(px) as i32;

        for (i, c) in text.chars().enumerate() {
            let origin = x + i as i32 * ADVANCE as i32 * block;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..COLS {
                    if bits & (1 << (COLS - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = origin + col as i32 * block;
                    let y0 = top + row as i32 * block;
                    fill_rect(canvas, x0, y0, x0 + block - 1, y0 + block - 1, color);
                }
            }
        }
    }

    /// Row bitmaps, most significant of the low five bits is the leftmost column.
    pub fn glyph(c: char) -> [u8; 7] {
        match c.to_ascii_uppercase() {
            'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
            'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
            'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
            'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
            'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
            'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
            'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
            'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
            'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
            'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
            'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
            'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
            'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
            'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
            'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
            'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
            'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
            'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
            'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
            'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
            'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
            'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
            '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
            '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
            _ => [0; 7],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_chain_prefers_bold_font() {
        assert_eq!(
            default_chain(),
            vec![
                FontSource::Named(PRIMARY_FONT),
                FontSource::Named(SECONDARY_FONT),
                FontSource::Builtin,
            ]
        );
    }

    #[test]
    fn named_lookup_finds_installed_font() {
        let Some(path) = any_system_font_file() else {
            println!("no system TrueType fonts installed, skipping");
            return;
        };
        let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
            return;
        };
        // `Named` only takes static names
        let name: &'static str = Box::leak(name.to_uppercase().into_boxed_str());

        let font =
            load_caption_font(&[FontSource::Named(name)]).expect("installed font loads");
        assert!(matches!(font, CaptionFont::Outline(_)));
    }

    #[test]
    fn outline_draw_respects_measured_ink() {
        let Some(path) = any_system_font_file() else {
            println!("no system TrueType fonts installed, skipping");
            return;
        };
        let font = load_caption_font(&[FontSource::Path(path)]).expect("font loads");
        let extent = font.measure("SAFE", 48).expect("ink");

        let mut canvas = RgbImage::from_pixel(400, 120, Rgb([0, 0, 0]));
        let (ink_x, top) = (20, 10);
        font.draw(
            &mut canvas,
            "SAFE",
            48,
            ink_x - extent.left,
            top,
            Rgb([255, 255, 255]),
        );

        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty(), "nothing drawn");

        let first = inked.iter().map(|p| p.0).min().unwrap_or(0);
        let last = inked.iter().map(|p| p.0).max().unwrap_or(0);
        let highest = inked.iter().map(|p| p.1).min().unwrap_or(0);

        // Left bearing is subtracted, so ink starts at the requested column
        let ink_start = ink_x as u32;
        assert!(
            first >= ink_start && first <= ink_start + 1,
            "ink starts at {first}"
        );
        assert!(last < ink_start + extent.width, "ink ends at {last}");
        // Baseline sits at top + ascent, so capitals never rise above the line box
        assert!(highest >= top as u32, "ink rises to row {highest}");

        // Edges are anti-aliased, not just on/off
        assert!(canvas.pixels().any(|p| p[0] > 0 && p[0] < 255));
    }

    #[test]
    fn builtin_always_loads() {
        let font = load_caption_font(&[FontSource::Builtin]).expect("builtin font");
        assert!(matches!(font, CaptionFont::Bitmap));
    }

    #[test]
    fn chain_falls_through_missing_sources() {
        let chain = [
            FontSource::Named("definitely-not-installed-4f1c.ttf"),
            FontSource::Path(PathBuf::from("/nonexistent/font.ttf")),
            FontSource::Builtin,
        ];
        let font = load_caption_font(&chain).expect("chain should end at builtin");
        assert!(matches!(font, CaptionFont::Bitmap));
    }

    #[test]
    fn exhausted_chain_is_an_error() {
        let chain = [FontSource::Named("definitely-not-installed-4f1c.ttf")];
        assert!(load_caption_font(&chain).is_err());
        assert!(load_caption_font(&[]).is_err());
    }

    #[test]
    fn garbage_font_file_is_rejected() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"this is not a font").expect("write");

        let chain = [FontSource::Path(file.path().to_path_buf())];
        assert!(load_caption_font(&chain).is_err());
    }

    #[test]
    fn bitmap_measure_scales_with_size() {
        let font = CaptionFont::Bitmap;
        let small = font.measure("SAFE", 14).expect("ink");
        let large = font.measure("SAFE", 28).expect("ink");

        assert_eq!(small, TextExtent { left: 0, width: 46, height: 14 });
        assert_eq!(large.width, small.width * 2);
        assert!(font.measure("", 14).is_none());
        assert!(font.measure("   ", 14).is_none());
    }

    #[test]
    fn bitmap_draw_stays_within_measured_box() {
        let mut canvas = RgbImage::from_pixel(64, 32, Rgb([0, 0, 0]));
        let font = CaptionFont::Bitmap;
        let extent = font.measure("SAFE", 7).expect("ink");
        font.draw(&mut canvas, "SAFE", 7, 2, 3, Rgb([255, 255, 255]));

        for (x, y, pixel) in canvas.enumerate_pixels() {
            if pixel[0] == 255 {
                assert!(x >= 2 && x < 2 + extent.width);
                assert!(y >= 3 && y < 3 + extent.height);
            }
        }
        // Top-left of the S is blank, the next column is inked
        assert_eq!(canvas.get_pixel(2, 3)[0], 0);
        assert_eq!(canvas.get_pixel(3, 3)[0], 255);
    }

    #[test]
    fn lowercase_maps_to_uppercase_glyphs() {
        assert_eq!(bitmap::glyph('s'), bitmap::glyph('S'));
        assert_eq!(bitmap::glyph('~'), [0; 7]);
    }
}
