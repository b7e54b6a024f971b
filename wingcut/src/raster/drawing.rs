//! Drawing primitives for rasters.
//!
//! Works on any [`Buffer2`], so the same routines paint colour canvases and
//! boolean masks.

use glam::{IVec2, Vec2};

use super::Buffer2;

/// Draw a line using a stepped walk with perpendicular thickness.
///
/// # Arguments
/// * `buffer` - The raster to draw on
/// * `start` - Start point
/// * `end` - End point
/// * `value` - Sample written to every covered pixel
/// * `thickness` - Line thickness in pixels
pub fn draw_line<T: Clone>(
    buffer: &mut Buffer2<T>,
    start: Vec2,
    end: Vec2,
    value: &T,
    thickness: f32,
) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();

    if length < 0.001 {
        put(buffer, start.x.round() as i32, start.y.round() as i32, value);
        return;
    }

    // Perpendicular direction for thickness
    let px = -dy / length;
    let py = dx / length;

    let half_thick = thickness / 2.0;
    let thick_steps = (thickness.ceil() as i32).max(1);

    let steps = (length.ceil() as usize).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let lx = start.x + dx * t;
        let ly = start.y + dy * t;

        for j in -thick_steps..=thick_steps {
            let offset = j as f32 * 0.5;
            if offset.abs() > half_thick {
                continue;
            }

            let x = (lx + px * offset).round() as i32;
            let y = (ly + py * offset).round() as i32;
            put(buffer, x, y, value);
        }
    }
}

/// Draw a filled circle (dot).
pub fn draw_dot<T: Clone>(buffer: &mut Buffer2<T>, center: Vec2, radius: f32, value: &T) {
    let r_sq = radius * radius;

    let x_min = (center.x - radius).floor() as i32;
    let x_max = (center.x + radius).ceil() as i32;
    let y_min = (center.y - radius).floor() as i32;
    let y_max = (center.y + radius).ceil() as i32;

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dx * dx + dy * dy <= r_sq {
                put(buffer, x, y, value);
            }
        }
    }
}

/// Connect consecutive points with lines, rounding the joints.
///
/// A single point is drawn as a dot so a click without drag still marks the
/// raster.
pub fn draw_polyline<T: Clone>(
    buffer: &mut Buffer2<T>,
    points: &[IVec2],
    value: &T,
    thickness: f32,
) {
    let radius = (thickness / 2.0).max(0.5);
    match points {
        [] => {}
        [single] => draw_dot(buffer, single.as_vec2(), radius, value),
        _ => {
            for pair in points.windows(2) {
                draw_line(buffer, pair[0].as_vec2(), pair[1].as_vec2(), value, thickness);
            }
            if thickness > 2.0 {
                for point in points {
                    draw_dot(buffer, point.as_vec2(), radius, value);
                }
            }
        }
    }
}

/// Draw a full-height vertical line at column `x`.
pub fn draw_vertical<T: Clone>(buffer: &mut Buffer2<T>, x: i32, value: &T, thickness: u32) {
    let half = thickness as i32 / 2;
    let height = buffer.height();
    for col in (x - half)..(x - half + thickness.max(1) as i32) {
        if col < 0 || col as usize >= buffer.width() {
            continue;
        }
        for y in 0..height {
            *buffer.get_mut(col as usize, y) = value.clone();
        }
    }
}

#[inline]
fn put<T: Clone>(buffer: &mut Buffer2<T>, x: i32, y: i32, value: &T) {
    if buffer.contains(x, y) {
        *buffer.get_mut(x as usize, y as usize) = value.clone();
    }
}
