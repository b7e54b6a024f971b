//! Persisted form of a session.
//!
//! Points are stored as `[x, y]` integer pairs so the record stays plain JSON.

use std::collections::BTreeMap;
use std::time::Instant;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::component::ComponentKind;
use crate::error::{Error, RecordError};
use crate::geometry::{fill_contour, MirrorLine};
use crate::raster::{Mask, Rgb};
use crate::session::{band_fits, LoopState, Session};
use crate::store::{Side, Threshold};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingLabel {
    #[serde(default)]
    pub left: Vec<IVec2>,
    #[serde(default)]
    pub right: Vec<IVec2>,
    #[serde(default)]
    pub eliminate: Vec<Vec<IVec2>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub name: String,
    #[serde(default)]
    pub state: LoopState,
    #[serde(default)]
    pub threshold: Threshold,
    pub mirror_line: MirrorLine,
    #[serde(default)]
    pub mirror_shift: Option<u32>,
    #[serde(default)]
    pub tracking_label: TrackingLabel,
    /// Mean colour per component name.
    #[serde(default)]
    pub components_color: BTreeMap<String, Rgb>,
    /// Outer contour per component name.
    #[serde(default)]
    pub components_contour: BTreeMap<String, Vec<IVec2>>,
}

impl SessionRecord {
    /// Rebuilds the fill mask of `kind` from its stored contour.
    pub fn component_mask(&self, kind: ComponentKind, width: usize, height: usize) -> Option<Mask> {
        self.components_contour
            .get(&kind.to_string())
            .map(|contour| fill_contour(contour, width, height))
    }
}

impl Session {
    pub fn to_record(&self) -> SessionRecord {
        let store = self.store();
        let components = self.components();

        SessionRecord {
            name: self.name().to_string(),
            state: self.status().state,
            threshold: store.threshold,
            mirror_line: store.mirror_line,
            mirror_shift: store.mirror_shift,
            tracking_label: TrackingLabel {
                left: store.track(Side::Left).to_vec(),
                right: store.track(Side::Right).to_vec(),
                eliminate: store.eliminate_blocks().to_vec(),
            },
            components_color: components
                .iter()
                .map(|(kind, c)| (kind.to_string(), c.mean_color()))
                .collect(),
            components_contour: components
                .iter()
                .map(|(kind, c)| (kind.to_string(), c.contour.clone()))
                .collect(),
        }
    }

    /// Replaces the annotations with those of `record` and queues a carve.
    ///
    /// Components are never taken from the record; they are carved again.
    pub fn restore(&mut self, record: SessionRecord, now: Instant) -> Result<(), RecordError> {
        if record.name != self.name() {
            return Err(RecordError::NameMismatch {
                record: record.name,
                session: self.name().to_string(),
            });
        }

        let width = self.original().width();
        let line = record.mirror_line;
        if line.x < 0 || line.x as usize >= width {
            return Err(Error::MirrorOutOfCanvas { x: line.x, width }.into());
        }
        if let Some(shift) = record.mirror_shift {
            if !band_fits(line, shift, width) {
                return Err(Error::BoundaryOutOfCanvas {
                    x: line.x,
                    shift,
                    width,
                }
                .into());
            }
        }

        let height = self.original().height();
        let TrackingLabel {
            left,
            right,
            eliminate,
        } = record.tracking_label;
        for (side, track) in [(Side::Left, &left), (Side::Right, &right)] {
            let band = record
                .mirror_shift
                .map(|shift| wing_band(side, line, shift, width));
            if let Some(&point) = track.iter().find(|p| {
                !band.is_some_and(|(lo, hi)| lo < p.x && p.x < hi) || p.y < 0 || p.y as usize >= height
            }) {
                return Err(RecordError::TrackOutOfBand { side, point });
            }
        }

        let in_canvas = |p: &IVec2| p.x >= 0 && p.y >= 0 && (p.x as usize) < width && (p.y as usize) < height;
        let eliminate: Vec<Vec<IVec2>> = eliminate
            .into_iter()
            .map(|block| block.into_iter().filter(in_canvas).collect::<Vec<_>>())
            .filter(|block| !block.is_empty())
            .collect();

        let store = self.store_mut();
        store.mirror_line = line;
        store.mirror_shift = record.mirror_shift;
        store.threshold = record.threshold;
        store.restore_labels(left, right, eliminate);

        self.after_restore(record.state, now);
        Ok(())
    }
}

/// Open column interval a track point of `side` must fall in.
fn wing_band(side: Side, line: MirrorLine, shift: u32, width: usize) -> (i32, i32) {
    match side {
        Side::Left => (0, line.left_boundary(shift)),
        Side::Right => (line.right_boundary(shift), i32::try_from(width).unwrap_or(i32::MAX)),
    }
}
