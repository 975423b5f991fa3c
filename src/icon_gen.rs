use crate::render::render;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, RgbImage,
};
use serde::Deserialize;
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Default location of the generated icons, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "assets/icon";

#[derive(Debug)]
pub struct Args {
    pub output: PathBuf,
}

/// One file of the output manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub filename: String,
    pub size: u32,
}

/// Files produced on every run, in generation order.
pub fn manifest() -> Result<Vec<ManifestEntry>> {
    let manifest_json = r#"
    [
      { "filename": "safe_app_icon.png", "size": 1024 },
      { "filename": "icon-192.png", "size": 192 },
      { "filename": "icon-512.png", "size": 512 }
    ]
    "#;

    serde_json::from_str(manifest_json).context("Invalid icon manifest")
}

pub fn generate_icons(args: Args) -> Result<()> {
    // Ensure the output directory exists
    create_dir_all(&args.output).context("Can't create output directory")?;

    println!("Generating SAFE app icons...");

    for entry in manifest()? {
        println!(
            "  Creating {} ({}x{})...",
            entry.filename, entry.size, entry.size
        );
        let icon = render(entry.size);
        save_png(&icon, &args.output.join(&entry.filename))?;
        println!("  ✓ Generated {}", entry.filename);
    }

    let output_dir = args
        .output
        .canonicalize()
        .unwrap_or_else(|_| args.output.clone());

    println!();
    println!("✓ All icons generated successfully!");
    println!("Icons saved in: {}", output_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Run: flutter pub get");
    println!("  2. Run: flutter pub run flutter_launcher_icons");
    println!("  3. Build your app!");

    Ok(())
}

fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image.as_raw(), &mut out_file, image.width())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode a square RGB image as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, size: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, size, size, ColorType::Rgb8)?;
    Ok(())
}
