//! Conversion between files on disk and engine canvases.

use std::path::Path;

use anyhow::{anyhow, Context};
use image::RgbImage;
use wingcut::Canvas;

pub fn load_canvas(path: &Path) -> anyhow::Result<Canvas> {
    let img = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .into_rgb8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let pixels = img.pixels().map(|p| p.0).collect();
    Ok(Canvas::new(width, height, pixels))
}

pub fn save_canvas(canvas: &Canvas, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let raw = canvas.pixels().iter().flatten().copied().collect();
    let img = RgbImage::from_raw(canvas.width() as u32, canvas.height() as u32, raw)
        .ok_or_else(|| anyhow!("canvas buffer does not match {}x{}", canvas.width(), canvas.height()))?;
    img.save(path)
        .with_context(|| format!("failed to save {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_keeps_pixels() {
        let mut canvas = Canvas::new_filled(7, 5, [255, 255, 255]);
        canvas[(3, 2)] = [12, 34, 56];
        let path = common::test_utils::test_output_path("wingcut_cli_round_trip.png");

        save_canvas(&canvas, &path).unwrap();
        let loaded = load_canvas(&path).unwrap();
        assert_eq!(loaded, canvas);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_canvas(Path::new("nowhere/moth.jpg")).unwrap_err();
        assert!(format!("{err:#}").contains("nowhere/moth.jpg"));
    }
}
