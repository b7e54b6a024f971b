//! Region carving: turns the user's traces and the threshold into the five
//! component regions.
//!
//! Every run recomputes the whole [`ComponentSet`] from the original canvas;
//! nothing is patched incrementally.
//!
//! Per side, the lowest point of the track splits the side into a forewing
//! band (above) and a backwing band (below). The part of the forewing band
//! that lies under the dense track curve is handed over to the backwing band.
//! The body is carved from what remains once all four wings are erased.


use glam::{DVec2, IVec2};
use log::debug;

use crate::component::{Component, ComponentKind, ComponentSet};
use crate::error::{Error, Result};
use crate::geometry::{
    centroid_distance_tiebreak, fill_connected_region, interpolate_track, nth_largest_component,
    ComponentMetric, Connectivity, LabelMap,
};
use crate::raster::{binarize_inv, drawing, Canvas, Mask, WHITE};
use crate::store::{Side, TraceStore};

/// Body candidates considered by the centroid tie-break.
const BODY_CANDIDATES: usize = 5;

/// Whether the store holds enough input for a carving run.
pub fn can_carve(store: &TraceStore) -> bool {
    store.mirror_shift.is_some()
        && (!store.track(Side::Left).is_empty() || !store.track(Side::Right).is_empty())
}

/// Carves `original` according to `store`.
///
/// Sides whose geometry is unusable are skipped and stay unpopulated.
/// `eliminate_thickness` is the stroke width erase strokes are burned with.
pub fn carve(original: &Canvas, store: &TraceStore, eliminate_thickness: f32) -> Result<ComponentSet> {
    if original.is_empty() {
        return Err(Error::EmptyCanvas);
    }
    let shift = store.mirror_shift.ok_or(Error::ShiftNotConfirmed)?;
    if !can_carve(store) {
        return Err(Error::NoTracks);
    }
    let mirror_x = store.mirror_line.x;
    if !original.contains(mirror_x, 0) {
        return Err(Error::MirrorOutOfCanvas {
            x: mirror_x,
            width: original.width(),
        });
    }

    let base = burn_eliminate_blocks(original, store.eliminate_blocks(), eliminate_thickness);
    let threshold = store.threshold.get();
    let mut set = ComponentSet::default();

    for side in [Side::Left, Side::Right] {
        let track = store.track(side);
        if track.is_empty() {
            continue;
        }
        let boundary = match side {
            Side::Left => store.mirror_line.left_boundary(shift),
            Side::Right => store.mirror_line.right_boundary(shift),
        };
        let Some(band) = SideBand::new(side, boundary, original.width()) else {
            debug!("skipping {side:?} side, boundary x={boundary} is outside the canvas");
            continue;
        };

        let (forewing, backwing) = split_wings(&base, track, band);

        let (fore_kind, back_kind) = match side {
            Side::Left => (ComponentKind::ForewingLeft, ComponentKind::BackwingLeft),
            Side::Right => (ComponentKind::ForewingRight, ComponentKind::BackwingRight),
        };
        *set.slot_mut(fore_kind) = carve_largest(&base, &forewing, threshold)?;
        *set.slot_mut(back_kind) = carve_largest(&base, &backwing, threshold)?;
    }

    if set.wings_complete() {
        set.body = carve_body(&base, store, &set, threshold)?;
    }

    Ok(set)
}

fn burn_eliminate_blocks(original: &Canvas, blocks: &[Vec<IVec2>], thickness: f32) -> Canvas {
    let mut canvas = original.clone();
    for block in blocks {
        drawing::draw_polyline(&mut canvas, block, &WHITE, thickness);
    }
    canvas
}

/// Columns belonging to one side: `[0, boundary)` on the left,
/// `[boundary, width)` on the right.
#[derive(Debug, Clone, Copy)]
struct SideBand {
    start: usize,
    end: usize,
}

impl SideBand {
    fn new(side: Side, boundary: i32, width: usize) -> Option<Self> {
        let band = match side {
            Side::Left if boundary > 0 && boundary as usize <= width => Self {
                start: 0,
                end: boundary as usize,
            },
            Side::Right if boundary >= 0 && (boundary as usize) < width => Self {
                start: boundary as usize,
                end: width,
            },
            _ => return None,
        };
        Some(band)
    }

    fn blank_outside(&self, canvas: &mut Canvas) {
        let (w, h) = (canvas.width(), canvas.height());
        canvas.fill_rect(0, 0, self.start, h, WHITE);
        canvas.fill_rect(self.end, 0, w, h, WHITE);
    }
}

/// Builds the forewing and backwing working copies of one side.
fn split_wings(base: &Canvas, track: &[IVec2], band: SideBand) -> (Canvas, Canvas) {
    let (width, height) = (base.width(), base.height());
    let y_split = track
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(0)
        .clamp(0, height as i32) as usize;

    let mut forewing = base.clone();
    band.blank_outside(&mut forewing);
    forewing.fill_rect(0, y_split, width, height, WHITE);

    let remainder = clear_downward(&mut forewing, &interpolate_track(track));

    let mut backwing = base.clone();
    band.blank_outside(&mut backwing);
    backwing.fill_rect(0, 0, width, y_split, WHITE);
    for (idx, &moved) in remainder.pixels().iter().enumerate() {
        if moved {
            backwing[idx] = base[idx];
        }
    }

    (forewing, backwing)
}

/// Whitens every column of `canvas` from the curve down and returns the
/// mask of pixels that were not already white.
fn clear_downward(canvas: &mut Canvas, curve: &[IVec2]) -> Mask {
    let mut erased = Mask::new_default(canvas.width(), canvas.height());
    for p in curve {
        if p.x < 0 || p.x as usize >= canvas.width() {
            continue;
        }
        let x = p.x as usize;
        for y in p.y.max(0) as usize..canvas.height() {
            if canvas[(x, y)] != WHITE {
                erased[(x, y)] = true;
                canvas[(x, y)] = WHITE;
            }
        }
    }
    erased
}

/// Solid fill of the largest dark region of `working`, coloured from `base`.
fn carve_largest(base: &Canvas, working: &Canvas, threshold: u8) -> Result<Option<Component>> {
    let binary = binarize_inv(working, threshold);
    let Some(pixels) = nth_largest_component(&binary, 1, ComponentMetric::Area) else {
        return Ok(None);
    };
    fill_component(base, &pixels)
}

fn fill_component(base: &Canvas, pixels: &[IVec2]) -> Result<Option<Component>> {
    let region = fill_connected_region(base.width(), base.height(), pixels)?;
    Ok(Component::cut(base, region.mask, region.contour))
}

fn carve_body(
    base: &Canvas,
    store: &TraceStore,
    set: &ComponentSet,
    threshold: u8,
) -> Result<Option<Component>> {
    let mut exclude_wings = base.clone();
    for (_, wing) in set.iter() {
        for (idx, &covered) in wing.mask.pixels().iter().enumerate() {
            if covered {
                exclude_wings[idx] = WHITE;
            }
        }
    }

    let reference = body_reference(store, base.height());
    let map = LabelMap::new(&binarize_inv(&exclude_wings, threshold), Connectivity::Four);
    let Some(label) = centroid_distance_tiebreak(&map, reference, BODY_CANDIDATES) else {
        return Ok(None);
    };
    fill_component(base, &map.pixels_of(label))
}

/// Midpoint of the lowest points of both tracks, falling back to whichever
/// track exists, then to the canvas centre row on the mirror line.
fn body_reference(store: &TraceStore, height: usize) -> DVec2 {
    let lowest = |side| {
        store
            .track(side)
            .iter()
            .copied()
            .max_by_key(|p: &IVec2| p.y)
            .map(|p| p.as_dvec2())
    };

    match (lowest(Side::Left), lowest(Side::Right)) {
        (Some(l), Some(r)) => (l + r) / 2.0,
        (Some(p), None) | (None, Some(p)) => p,
        (None, None) => DVec2::new(store.mirror_line.x as f64, height as f64 / 2.0),
    }
}
