//! Outer contour tracing and solid region filling.

use glam::IVec2;

use super::labeling::{ComponentMetric, Connectivity, LabelMap};
use crate::error::{Error, Result};
use crate::raster::Mask;

/// Clockwise (y down) Moore neighbourhood, starting east.
const NEIGHBOURS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(1, 1),
    IVec2::new(0, 1),
    IVec2::new(-1, 1),
    IVec2::new(-1, 0),
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
];

const WEST: usize = 4;

/// A solid region mask together with its outer boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledRegion {
    pub mask: Mask,
    pub contour: Vec<IVec2>,
}

/// Paints `pixels` onto a blank `width` x `height` raster, keeps the largest
/// 8-connected blob and returns it with interior holes filled plus its outer
/// contour.
pub fn fill_connected_region(width: usize, height: usize, pixels: &[IVec2]) -> Result<FilledRegion> {
    let mut painted = Mask::new_default(width, height);
    for p in pixels {
        if painted.contains(p.x, p.y) {
            painted[(p.x as usize, p.y as usize)] = true;
        }
    }

    let map = LabelMap::new(&painted, Connectivity::Eight);
    let largest = map
        .ranked_by(ComponentMetric::Area)
        .first()
        .map(|s| s.label)
        .ok_or(Error::EmptyRegion)?;
    let blob = map.mask_of(largest);

    let contour = trace_outer_contour(&blob)?;
    let mask = fill_holes(&blob);

    Ok(FilledRegion { mask, contour })
}

/// Moore-neighbour trace of the outer boundary of the blob holding the first
/// foreground pixel in raster order. Points are clockwise, start not repeated.
pub fn trace_outer_contour(mask: &Mask) -> Result<Vec<IVec2>> {
    let start_idx = mask
        .pixels()
        .iter()
        .position(|&set| set)
        .ok_or(Error::EmptyRegion)?;
    let start = IVec2::new(
        (start_idx % mask.width()) as i32,
        (start_idx / mask.width()) as i32,
    );

    let is_set = |p: IVec2| mask.get_checked(p.x, p.y).copied().unwrap_or(false);

    let limit = 4 * mask.len() + 8;
    let mut contour = vec![start];
    let mut current = start;
    let mut backtrack = WEST;
    let mut first_step = None;

    for _ in 0..limit {
        let Some(dir) = (1..=8)
            .map(|i| (backtrack + i) % 8)
            .find(|&d| is_set(current + NEIGHBOURS[d]))
        else {
            // isolated pixel
            return Ok(contour);
        };
        let next = current + NEIGHBOURS[dir];

        match first_step {
            None => first_step = Some(next),
            Some(first) if current == start && next == first => {
                if contour.len() > 1 && contour.last() == Some(&start) {
                    contour.pop();
                }
                return Ok(contour);
            }
            Some(_) => {}
        }

        let previous = current + NEIGHBOURS[(dir + 7) % 8];
        backtrack = NEIGHBOURS
            .iter()
            .position(|&n| next + n == previous)
            .unwrap_or(WEST);
        contour.push(next);
        current = next;
    }

    Err(Error::ContourNotClosed(limit))
}

/// Marks every pixel not 4-reachable from the border through background.
fn fill_holes(blob: &Mask) -> Mask {
    let width = blob.width();
    let height = blob.height();
    let mut outside = Mask::new_default(width, height);
    let mut stack = Vec::new();

    for x in 0..width {
        stack.push((x, 0));
        stack.push((x, height - 1));
    }
    for y in 0..height {
        stack.push((0, y));
        stack.push((width - 1, y));
    }

    while let Some((x, y)) = stack.pop() {
        if blob[(x, y)] || outside[(x, y)] {
            continue;
        }
        outside[(x, y)] = true;
        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    outside.map(|&o| !o)
}

/// Rasterizes a closed contour: boundary pixels plus an even-odd scanline
/// fill of the polygon through their centres.
pub fn fill_contour(contour: &[IVec2], width: usize, height: usize) -> Mask {
    let mut mask = Mask::new_default(width, height);
    if contour.is_empty() {
        return mask;
    }

    let mut crossings = Vec::new();
    for y in 0..height as i32 {
        crossings.clear();
        for (i, &a) in contour.iter().enumerate() {
            let b = contour[(i + 1) % contour.len()];
            if a.y == b.y {
                continue;
            }
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if y < lo.y || y >= hi.y {
                continue;
            }
            let t = (y - lo.y) as f64 / (hi.y - lo.y) as f64;
            crossings.push(lo.x as f64 + t * (hi.x - lo.x) as f64);
        }
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let x0 = pair[0].ceil().max(0.0) as usize;
            let x1 = pair[1].floor().min(width as f64 - 1.0);
            if x1 < 0.0 {
                continue;
            }
            for x in x0..=x1 as usize {
                mask[(x, y as usize)] = true;
            }
        }
    }

    for p in contour {
        if mask.contains(p.x, p.y) {
            mask[(p.x as usize, p.y as usize)] = true;
        }
    }

    mask
}
