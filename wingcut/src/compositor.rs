//! Side-by-side preview of the carved components.
//!
//! Layout, left to right: left wing column, gutter, body, gutter, right wing
//! column. Each wing column stacks the forewing above the backwing. Missing
//! components are shown as checkerboard placeholders.

use crate::component::{ComponentKind, ComponentSet};
use crate::raster::{checkerboard, resize_nearest, Canvas, WHITE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub gutter_width: usize,
    pub checker_block: usize,
    pub max_height: usize,
}

/// Builds the preview for `set`, carved from a `width` x `height` canvas.
pub fn compose(set: &ComponentSet, width: usize, height: usize, layout: &Layout) -> Canvas {
    let part = |kind: ComponentKind, w: usize, h: usize| match set.get(kind) {
        Some(component) => component.pixels.clone(),
        None => checkerboard(w.max(1), h.max(1), layout.checker_block),
    };
    let wing = |kind| part(kind, width / 4, height / 4);

    let fore_left = wing(ComponentKind::ForewingLeft);
    let back_left = wing(ComponentKind::BackwingLeft);
    let fore_right = wing(ComponentKind::ForewingRight);
    let back_right = wing(ComponentKind::BackwingRight);
    let body = part(ComponentKind::Body, width / 8, height / 2);

    let column_width = [&fore_left, &back_left, &fore_right, &back_right]
        .iter()
        .map(|c| c.width())
        .max()
        .unwrap_or(1);
    let left = stack_column(&fore_left, &back_left, column_width);
    let right = stack_column(&fore_right, &back_right, column_width);

    let total_height = left.height().max(right.height()).max(body.height());
    let gutter = checkerboard(layout.gutter_width, total_height, layout.checker_block);

    let total_width = 2 * column_width + body.width() + 2 * layout.gutter_width;
    let mut preview = Canvas::new_filled(total_width, total_height, WHITE);

    let mut x = 0;
    for piece in [&left, &gutter, &body, &gutter, &right] {
        preview.blit(piece, x, (total_height - piece.height()) / 2);
        x += piece.width();
    }

    fit_height(preview, layout.max_height)
}

/// Stacks `top` above `bottom`, both padded to `width`. The top crop gets the
/// smaller half of an odd padding on its left, the bottom crop the larger.
fn stack_column(top: &Canvas, bottom: &Canvas, width: usize) -> Canvas {
    let mut column = Canvas::new_filled(width, top.height() + bottom.height(), WHITE);
    let top_pad = width - top.width();
    let bottom_pad = width - bottom.width();
    column.blit(top, top_pad / 2, 0);
    column.blit(bottom, bottom_pad.div_ceil(2), top.height());
    column
}

/// Uniformly downscales `canvas` so its height is at most `max_height`.
fn fit_height(canvas: Canvas, max_height: usize) -> Canvas {
    if max_height == 0 || canvas.height() <= max_height {
        return canvas;
    }
    let width = (canvas.width() * max_height + canvas.height() / 2) / canvas.height();
    resize_nearest(&canvas, width.max(1), max_height)
}
