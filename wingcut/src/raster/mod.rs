//! Rasters used by the engine: colour canvases, boolean masks and helpers to
//! move between them.

mod buffer2;
pub mod drawing;

pub use buffer2::Buffer2;

use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

/// Colour working raster, RGB order.
pub type Canvas = Buffer2<Rgb>;

/// Binary raster; `true` marks foreground.
pub type Mask = Buffer2<bool>;

pub const WHITE: Rgb = [255, 255, 255];
pub const BLACK: Rgb = [0, 0, 0];
pub const RED: Rgb = [255, 0, 0];
pub const BLUE: Rgb = [0, 0, 255];

const CHECKER_DARK: Rgb = [0, 0, 0];
const CHECKER_LIGHT: Rgb = [125, 125, 125];

/// Axis-aligned pixel rectangle, `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64 && x < self.right() as f64 && y >= self.y as f64 && y < self.bottom() as f64
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    /// Tight bounds of the foreground of `mask`, `None` when it is empty.
    pub fn of_mask(mask: &Mask) -> Option<Rect> {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;

        for y in 0..mask.height() {
            for (x, &set) in mask.row(y).iter().enumerate() {
                if set {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }

        (min_x != usize::MAX).then(|| Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

/// Luma with the fixed-point BT.601 weights common image libraries use.
#[inline]
pub fn luma(rgb: &Rgb) -> u8 {
    let [r, g, b] = *rgb;
    ((r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + 8192) >> 14) as u8
}

pub fn grayscale(canvas: &Canvas) -> Buffer2<u8> {
    canvas.map(luma)
}

/// Inverted binary threshold: pixels at or below `threshold` become
/// foreground, so dark specimen parts on a light background are kept.
pub fn binarize_inv(canvas: &Canvas, threshold: u8) -> Mask {
    canvas.map(|rgb| luma(rgb) <= threshold)
}

pub fn count_set(mask: &Mask) -> usize {
    mask.pixels().iter().filter(|&&v| v).count()
}

/// Alternating dark/light squares used wherever nothing is available to show.
pub fn checkerboard(width: usize, height: usize, block: usize) -> Canvas {
    let block = block.max(1);
    let mut canvas = Canvas::new_filled(width, height, CHECKER_DARK);
    for y in 0..height {
        for (x, pixel) in canvas.row_mut(y).iter_mut().enumerate() {
            if (x / block + y / block) % 2 == 0 {
                *pixel = CHECKER_LIGHT;
            }
        }
    }
    canvas
}

/// Nearest-neighbour resample to `width` x `height`.
pub fn resize_nearest(canvas: &Canvas, width: usize, height: usize) -> Canvas {
    let mut out = Canvas::new_filled(width, height, WHITE);
    if canvas.is_empty() {
        return out;
    }
    for y in 0..height {
        let sy = (y * canvas.height() / height.max(1)).min(canvas.height() - 1);
        for x in 0..width {
            let sx = (x * canvas.width() / width.max(1)).min(canvas.width() - 1);
            out[(x, y)] = canvas[(sx, sy)];
        }
    }
    out
}

/// Blends every pixel towards black by `factor` in `[0, 1]`.
pub fn dim(canvas: &Canvas, factor: f32) -> Canvas {
    let keep = (1.0 - factor).clamp(0.0, 1.0);
    canvas.map(|rgb| rgb.map(|c| (c as f32 * keep).round() as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_extremes() {
        assert_eq!(luma(&WHITE), 255);
        assert_eq!(luma(&BLACK), 0);
        assert_eq!(luma(&[128, 128, 128]), 128);
    }

    #[test]
    fn binarize_keeps_dark_pixels() {
        let mut canvas = Canvas::new_filled(4, 1, WHITE);
        canvas[(1, 0)] = BLACK;
        canvas[(2, 0)] = [250, 250, 250];
        let mask = binarize_inv(&canvas, 250);
        assert_eq!(mask.pixels(), &[false, true, true, false]);
    }

    #[test]
    fn mask_bounds() {
        let mut mask = Mask::new_filled(10, 10, false);
        assert_eq!(Rect::of_mask(&mask), None);
        mask[(2, 3)] = true;
        mask[(6, 4)] = true;
        assert_eq!(Rect::of_mask(&mask), Some(Rect::new(2, 3, 5, 2)));
    }

    #[test]
    fn checkerboard_alternates_per_block() {
        let board = checkerboard(20, 20, 10);
        assert_eq!(board[(0, 0)], CHECKER_LIGHT);
        assert_eq!(board[(10, 0)], CHECKER_DARK);
        assert_eq!(board[(10, 10)], CHECKER_LIGHT);
    }

    #[test]
    fn resize_preserves_corners() {
        let mut canvas = Canvas::new_filled(4, 4, WHITE);
        canvas[(0, 0)] = RED;
        canvas[(3, 3)] = BLUE;
        let small = resize_nearest(&canvas, 2, 2);
        assert_eq!(small[(0, 0)], RED);
        assert_eq!(small[(1, 1)], WHITE);
        let big = resize_nearest(&canvas, 8, 8);
        assert_eq!(big[(7, 7)], BLUE);
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
        assert!(!a.intersects(&Rect::new(10, 0, 5, 5)));
        assert!(a.contains(9.5, 0.0));
    }
}
