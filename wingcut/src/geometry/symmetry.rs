use log::{debug, info, warn};

use super::MirrorLine;
use crate::raster::Canvas;

/// Cosine distance between the block left of column `x` and the mirrored
/// block right of it, both `min(x, width - x)` columns wide.
///
/// Returns `None` when the blocks are empty (`x` at or outside the edges).
pub fn mirror_distance(canvas: &Canvas, x: i32) -> Option<f64> {
    let width = canvas.width() as i32;
    if x <= 0 || x >= width {
        return None;
    }
    let half = x.min(width - x) as usize;
    let x = x as usize;

    // Integer accumulation keeps a perfectly mirrored pair at exactly zero.
    let mut dot = 0u64;
    let mut norm_left = 0u64;
    let mut norm_right = 0u64;

    for y in 0..canvas.height() {
        let row = canvas.row(y);
        for k in 0..half {
            let left = row[x - 1 - k];
            let right = row[x + k];
            for c in 0..3 {
                let a = left[c] as u64;
                let b = right[c] as u64;
                dot += a * b;
                norm_left += a * a;
                norm_right += b * b;
            }
        }
    }

    if norm_left == 0 || norm_right == 0 {
        return Some(if norm_left == norm_right { 0.0 } else { 1.0 });
    }

    let similarity = dot as f64 / (norm_left as f64 * norm_right as f64).sqrt();
    Some(1.0 - similarity)
}

/// Searches `[start_x - radius, start_x + radius)` for the column with the
/// smallest mirror distance and re-centres on it until the best column stops
/// moving.
///
/// Ties keep the first (leftmost) column seen.
pub fn refine_symmetry_line(canvas: &Canvas, start_x: i32, radius: i32) -> Option<MirrorLine> {
    let width = canvas.width() as i32;
    if width < 2 || canvas.height() == 0 {
        return None;
    }

    let mut line_x = start_x.clamp(1, width - 1);

    // Each step strictly improves the distance, so a fixed point is reached
    // well before visiting every column.
    for _ in 0..width {
        let mut best: Option<(i32, f64)> = None;
        for x in (line_x - radius)..(line_x + radius) {
            let Some(distance) = mirror_distance(canvas, x) else {
                continue;
            };
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((x, distance));
            }
        }

        let Some((best_x, distance)) = best else {
            break;
        };
        debug!("symmetry search around {} picked {} ({:.6})", line_x, best_x, distance);

        if best_x == line_x {
            let line = MirrorLine::vertical(line_x, canvas.height());
            info!("generate mirror line x={}", line.x);
            return Some(line);
        }
        line_x = best_x;
    }

    warn!("symmetry search did not settle, keeping x={}", line_x);
    Some(MirrorLine::vertical(line_x, canvas.height()))
}

/// Symmetry line search starting from the horizontal centre of the canvas.
pub fn find_symmetry_line(canvas: &Canvas, radius: i32) -> Option<MirrorLine> {
    refine_symmetry_line(canvas, canvas.width() as i32 / 2, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{BLACK, WHITE};

    /// White canvas with a black band `[x0, x1)` and its mirror around `axis`.
    fn mirrored_bands(width: usize, height: usize, axis: usize, x0: usize, x1: usize) -> Canvas {
        let mut canvas = Canvas::new_filled(width, height, WHITE);
        canvas.fill_rect(x0, 10, x1, height - 10, BLACK);
        canvas.fill_rect(2 * axis - x1, 10, 2 * axis - x0, height - 10, BLACK);
        canvas
    }

    #[test]
    fn perfect_mirror_has_zero_distance() {
        let canvas = mirrored_bands(60, 30, 30, 10, 20);
        assert_eq!(mirror_distance(&canvas, 30), Some(0.0));
        assert!(mirror_distance(&canvas, 31).unwrap() > 0.0);
    }

    #[test]
    fn edges_have_no_distance() {
        let canvas = Canvas::new_filled(10, 4, WHITE);
        assert_eq!(mirror_distance(&canvas, 0), None);
        assert_eq!(mirror_distance(&canvas, 10), None);
    }

    #[test]
    fn finds_centre_of_symmetric_canvas() {
        let canvas = mirrored_bands(120, 40, 60, 20, 40);
        let line = find_symmetry_line(&canvas, 10).unwrap();
        assert_eq!(line, MirrorLine::vertical(60, 40));

        let again = refine_symmetry_line(&canvas, line.x, 10).unwrap();
        assert_eq!(again, line);
    }

    #[test]
    fn walks_towards_an_off_centre_axis() {
        // Specimen mirrored around column 70 on a 120 wide canvas.
        let canvas = mirrored_bands(120, 40, 70, 50, 62);
        let line = find_symmetry_line(&canvas, 10).unwrap();
        assert_eq!(line.x, 70);
    }

    #[test]
    fn uniform_canvas_keeps_first_seen_column() {
        let canvas = Canvas::new_filled(100, 10, WHITE);
        // Every column is a perfect mirror, so the leftmost candidate wins
        // each round until the window is clipped by the canvas edge.
        let line = find_symmetry_line(&canvas, 10).unwrap();
        assert_eq!(line.x, 1);
        assert_eq!(refine_symmetry_line(&canvas, line.x, 10).unwrap(), line);
    }

    #[test]
    fn tiny_canvas_has_no_line() {
        assert!(find_symmetry_line(&Canvas::new_filled(1, 5, WHITE), 10).is_none());
        assert!(find_symmetry_line(&Canvas::new_filled(0, 0, WHITE), 10).is_none());
    }
}
