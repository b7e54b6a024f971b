//! Mutable user annotations: mirror line, body width, tracks, erase strokes
//! and the binarization threshold.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;
use crate::geometry::MirrorLine;

/// Binarization cutoff, always inside `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Threshold(u8);

impl Threshold {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 254;

    pub fn new(value: i32) -> Result<Self, ThresholdError> {
        if (Self::MIN as i32..=Self::MAX as i32).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ThresholdError(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Moves the threshold by `delta`; out of range leaves `self` untouched.
    pub fn adjust(&mut self, delta: i32) -> Result<(), ThresholdError> {
        *self = Self::new(self.0 as i32 + delta)?;
        Ok(())
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(250)
    }
}

impl TryFrom<i32> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for i32 {
    fn from(value: Threshold) -> Self {
        value.0 as i32
    }
}

/// Left or right half of the specimen, as seen in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// What a call to [`TraceStore::reset`] undid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetLevel {
    Labels,
    BodyWidth,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStore {
    pub mirror_line: MirrorLine,
    pub mirror_shift: Option<u32>,
    pub threshold: Threshold,
    left: Vec<IVec2>,
    right: Vec<IVec2>,
    eliminate: Vec<Vec<IVec2>>,
    undo_buffer: Vec<Vec<IVec2>>,
    left_drawn: bool,
    right_drawn: bool,
}

impl TraceStore {
    pub fn new(mirror_line: MirrorLine, threshold: Threshold) -> Self {
        Self {
            mirror_line,
            mirror_shift: None,
            threshold,
            left: Vec::new(),
            right: Vec::new(),
            eliminate: Vec::new(),
            undo_buffer: Vec::new(),
            left_drawn: false,
            right_drawn: false,
        }
    }

    pub fn track(&self, side: Side) -> &[IVec2] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn track_mut(&mut self, side: Side) -> &mut Vec<IVec2> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn was_drawn(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_drawn,
            Side::Right => self.right_drawn,
        }
    }

    pub fn set_drawn(&mut self, side: Side, drawn: bool) {
        match side {
            Side::Left => self.left_drawn = drawn,
            Side::Right => self.right_drawn = drawn,
        }
    }

    pub fn eliminate_blocks(&self) -> &[Vec<IVec2>] {
        &self.eliminate
    }

    pub fn undo_buffer(&self) -> &[Vec<IVec2>] {
        &self.undo_buffer
    }

    pub fn has_labels(&self) -> bool {
        !self.left.is_empty()
            || !self.right.is_empty()
            || !self.eliminate.is_empty()
            || !self.undo_buffer.is_empty()
            || self.left_drawn
            || self.right_drawn
    }

    /// Either boundary of the body column, once its width is confirmed.
    pub fn boundary(&self, side: Side) -> Option<i32> {
        self.mirror_shift.map(|shift| match side {
            Side::Left => self.mirror_line.left_boundary(shift),
            Side::Right => self.mirror_line.right_boundary(shift),
        })
    }

    /// Undoes one level: labeling data first, then the body width.
    pub fn reset(&mut self) -> ResetLevel {
        if self.has_labels() {
            self.left.clear();
            self.right.clear();
            self.eliminate.clear();
            self.undo_buffer.clear();
            self.left_drawn = false;
            self.right_drawn = false;
            ResetLevel::Labels
        } else if self.mirror_shift.is_some() {
            self.mirror_shift = None;
            ResetLevel::BodyWidth
        } else {
            ResetLevel::Nothing
        }
    }

    /// Records a finished erase stroke. Empty strokes are ignored.
    pub fn push_eliminate_block(&mut self, block: Vec<IVec2>) -> bool {
        if block.is_empty() {
            return false;
        }
        self.eliminate.push(block);
        self.undo_buffer.clear();
        true
    }

    pub fn undo_eliminate(&mut self) -> bool {
        match self.eliminate.pop() {
            Some(block) => {
                self.undo_buffer.push(block);
                true
            }
            None => false,
        }
    }

    pub fn redo_eliminate(&mut self) -> bool {
        match self.undo_buffer.pop() {
            Some(block) => {
                self.eliminate.push(block);
                true
            }
            None => false,
        }
    }

    pub(crate) fn restore_labels(
        &mut self,
        left: Vec<IVec2>,
        right: Vec<IVec2>,
        eliminate: Vec<Vec<IVec2>>,
    ) {
        self.left_drawn = !left.is_empty();
        self.right_drawn = !right.is_empty();
        self.left = left;
        self.right = right;
        self.eliminate = eliminate;
        self.undo_buffer.clear();
    }
}
