use glam::IVec2;
use strum_macros::{Display, EnumIter, EnumString};

use crate::raster::{Canvas, Mask, Rect, Rgb, WHITE};

/// The five anatomical regions carved out of a specimen image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ComponentKind {
    ForewingLeft,
    ForewingRight,
    BackwingLeft,
    BackwingRight,
    Body,
}

impl ComponentKind {
    /// Suffix used for exported component images, e.g. `<stem>_fore_left.png`.
    pub fn file_suffix(self) -> &'static str {
        match self {
            ComponentKind::ForewingLeft => "fore_left",
            ComponentKind::ForewingRight => "fore_right",
            ComponentKind::BackwingLeft => "back_left",
            ComponentKind::BackwingRight => "back_right",
            ComponentKind::Body => "body",
        }
    }
}

/// One carved region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Colour pixels of `rect`, white outside the fill mask.
    pub pixels: Canvas,
    pub contour: Vec<IVec2>,
    pub rect: Rect,
    /// Full-canvas fill mask.
    pub mask: Mask,
}

impl Component {
    /// Cuts the region described by `mask` out of `original`.
    ///
    /// Returns `None` for an empty mask.
    pub fn cut(original: &Canvas, mask: Mask, contour: Vec<IVec2>) -> Option<Self> {
        let rect = Rect::of_mask(&mask)?;
        let mut pixels = Canvas::new_filled(rect.width, rect.height, WHITE);
        for y in 0..rect.height {
            for x in 0..rect.width {
                let (sx, sy) = (rect.x + x, rect.y + y);
                if mask[(sx, sy)] {
                    pixels[(x, y)] = original[(sx, sy)];
                }
            }
        }

        Some(Self {
            pixels,
            contour,
            rect,
            mask,
        })
    }

    /// Mean colour of the pixels under the fill mask.
    pub fn mean_color(&self) -> Rgb {
        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for y in 0..self.rect.height {
            for x in 0..self.rect.width {
                if !self.mask[(self.rect.x + x, self.rect.y + y)] {
                    continue;
                }
                let px = self.pixels[(x, y)];
                for c in 0..3 {
                    sum[c] += px[c] as u64;
                }
                count += 1;
            }
        }
        if count == 0 {
            return WHITE;
        }
        sum.map(|s| ((s + count / 2) / count) as u8)
    }
}

/// Carving output; each entry is present only once carved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSet {
    pub forewing_left: Option<Component>,
    pub forewing_right: Option<Component>,
    pub backwing_left: Option<Component>,
    pub backwing_right: Option<Component>,
    pub body: Option<Component>,
}

impl ComponentSet {
    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        match kind {
            ComponentKind::ForewingLeft => self.forewing_left.as_ref(),
            ComponentKind::ForewingRight => self.forewing_right.as_ref(),
            ComponentKind::BackwingLeft => self.backwing_left.as_ref(),
            ComponentKind::BackwingRight => self.backwing_right.as_ref(),
            ComponentKind::Body => self.body.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, kind: ComponentKind) -> &mut Option<Component> {
        match kind {
            ComponentKind::ForewingLeft => &mut self.forewing_left,
            ComponentKind::ForewingRight => &mut self.forewing_right,
            ComponentKind::BackwingLeft => &mut self.backwing_left,
            ComponentKind::BackwingRight => &mut self.backwing_right,
            ComponentKind::Body => &mut self.body,
        }
    }

    /// Populated entries in [`ComponentKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentKind, &Component)> {
        use strum::IntoEnumIterator;
        ComponentKind::iter().filter_map(move |kind| self.get(kind).map(|c| (kind, c)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn wings_complete(&self) -> bool {
        self.forewing_left.is_some()
            && self.forewing_right.is_some()
            && self.backwing_left.is_some()
            && self.backwing_right.is_some()
    }
}
