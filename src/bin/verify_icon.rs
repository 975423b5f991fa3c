use image::io::Reader as ImageReader;
use safe_icon_gen::render::PALETTE;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/icon/safe_app_icon.png".to_string());

    let img = ImageReader::open(&path)
        .expect("Failed to open image")
        .decode()
        .expect("Failed to decode image");

    let rgb_img = img.to_rgb8();
    let width = img.width();
    let height = img.height();

    println!("Checking icon: {}", path);
    println!("Image dimensions: {}x{}", width, height);
    if width != height {
        println!("⚠ Icon is not square");
    }

    let top = rgb_img.get_pixel(0, 0);
    println!("\nTop-left pixel: RGB [{}, {}, {}]", top[0], top[1], top[2]);
    if *top == PALETTE.start {
        println!("✓ Gradient starts at the palette colour");
    } else {
        println!("⚠ Unexpected gradient start colour");
    }

    // The triangle base is the widest white run in the upper 80% of the icon
    let caption_limit = height * 8 / 10;
    let widest = (0..caption_limit)
        .map(|y| {
            (0..width)
                .filter(|&x| *rgb_img.get_pixel(x, y) == PALETTE.foreground)
                .count() as u32
        })
        .max()
        .unwrap_or(0);
    let ratio = widest as f32 / width as f32;

    println!("\nTriangle analysis:");
    println!("  Widest white run: {} px ({:.1}% of width)", widest, ratio * 100.0);

    if (0.37..=0.43).contains(&ratio) {
        println!("✓ Alert triangle detected!");
    } else {
        println!("⚠ Alert triangle may not be properly drawn");
    }
}
