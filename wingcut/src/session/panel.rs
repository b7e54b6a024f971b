//! Annotated view of the canvas: mirror line, body boundaries, tracks and
//! erase strokes drawn over the original.

use crate::raster::{dim, drawing, Canvas, BLACK, BLUE, RED, WHITE};
use crate::store::Side;

use super::Session;

const LINE_THICKNESS: u32 = 2;

/// 5x7 glyphs for the error caption, one bit per pixel, MSB left.
const GLYPHS: [[u8; 7]; 5] = [
    [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f], // E
    [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11], // R
    [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11], // R
    [0x0e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e], // O
    [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11], // R
];

pub(super) fn render_panel(session: &Session) -> Canvas {
    let store = &session.store;
    let config = &session.config;
    let mut panel = session.original.clone();
    let mirror_x = store.mirror_line.x;

    drawing::draw_vertical(&mut panel, mirror_x, &BLACK, LINE_THICKNESS);

    let boundaries = match (store.mirror_shift, session.interaction.preview_shift()) {
        (Some(shift), _) => Some((shift, BLUE)),
        (None, Some(shift)) => Some((shift, RED)),
        (None, None) => None,
    };
    if let Some((shift, color)) = boundaries {
        drawing::draw_vertical(&mut panel, store.mirror_line.left_boundary(shift), &color, LINE_THICKNESS);
        drawing::draw_vertical(&mut panel, store.mirror_line.right_boundary(shift), &color, LINE_THICKNESS);
    }

    for side in [Side::Left, Side::Right] {
        drawing::draw_polyline(&mut panel, store.track(side), &BLACK, config.track_thickness);
    }

    let strokes = store
        .eliminate_blocks()
        .iter()
        .map(Vec::as_slice)
        .chain(session.interaction.eliminate_stroke());
    for stroke in strokes {
        drawing::draw_polyline(&mut panel, stroke, &WHITE, config.eliminate_thickness);
    }

    panel
}

/// Dimmed copy of `original` with a red "ERROR" caption in the middle.
pub(super) fn error_placeholder(original: &Canvas) -> Canvas {
    let mut canvas = dim(original, 0.6);
    let scale = (canvas.width() / 60).max(1);
    let glyph_w = 6 * scale;
    let text_w = GLYPHS.len() * glyph_w;
    let text_h = 7 * scale;
    let x0 = canvas.width().saturating_sub(text_w) / 2;
    let y0 = canvas.height().saturating_sub(text_h) / 2;

    for (i, glyph) in GLYPHS.iter().enumerate() {
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..5 {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let x = x0 + i * glyph_w + col * scale;
                let y = y0 + row * scale;
                canvas.fill_rect(x, y, x + scale, y + scale, RED);
            }
        }
    }
    canvas
}
