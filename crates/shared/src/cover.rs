use ab_glyph::{FontRef, PxScale};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fs;
use std::path::Path;

const COVER_SIZE: u32 = 1400;
/// Alpha of the dark layer composited over the gradient, out of 255.
const OVERLAY_ALPHA: u32 = 120;
const TITLE_SCALE: f32 = 80.0;

/// Render cover art for an episode: vertical gradient, dark overlay, title
/// centered in white. The title is drawn on a single line and may overflow
/// the canvas for very long headlines.
pub fn render_cover(title: &str, font_path: &Path, out_path: &Path) -> Result<()> {
    let mut img = RgbaImage::new(COVER_SIZE, COVER_SIZE);

    for y in 0..COVER_SIZE {
        let (r, g, b) = gradient_row(y, COVER_SIZE);
        for x in 0..COVER_SIZE {
            img.put_pixel(x, y, Rgba([shade(r), shade(g), shade(b), 255]));
        }
    }

    let font_data = fs::read(font_path)
        .with_context(|| format!("Failed to read cover font {}", font_path.display()))?;
    let font = FontRef::try_from_slice(&font_data)
        .with_context(|| format!("Failed to parse cover font {}", font_path.display()))?;

    let scale = PxScale::from(TITLE_SCALE);
    let (text_w, text_h) = text_size(scale, &font, title);
    let x = (COVER_SIZE as i32 - text_w as i32) / 2;
    let y = (COVER_SIZE as i32 - text_h as i32) / 2;
    draw_text_mut(&mut img, Rgba([255, 255, 255, 255]), x, y, scale, &font, title);

    image::DynamicImage::ImageRgba8(img)
        .to_rgb8()
        .save(out_path)
        .with_context(|| format!("Failed to save cover art {}", out_path.display()))?;

    Ok(())
}

/// Gradient color at row `y`: white at the top fading to a deep blue at the
/// bottom.
fn gradient_row(y: u32, height: u32) -> (u8, u8, u8) {
    let ratio = y as f32 / height as f32;
    let r = (255.0 * (1.0 - ratio) + 30.0 * ratio) as u8;
    let g = (255.0 * (1.0 - ratio) + 60.0 * ratio) as u8;
    let b = (255.0 * (1.0 - ratio) + 180.0 * ratio) as u8;
    (r, g, b)
}

/// Composite a channel under the semi-transparent black overlay.
fn shade(channel: u8) -> u8 {
    (channel as u32 * (255 - OVERLAY_ALPHA) / 255) as u8
}
