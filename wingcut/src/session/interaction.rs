use glam::IVec2;
use log::info;

use crate::store::Side;

/// Pointer-driven editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Body width not confirmed yet; the pointer previews it.
    #[default]
    Idle,
    /// Body width confirmed, ready for tracks.
    BodyConfirmed,
    LeftDrawing,
    RightDrawing,
}

impl InteractionMode {
    pub fn drawing(side: Side) -> Self {
        match side {
            Side::Left => InteractionMode::LeftDrawing,
            Side::Right => InteractionMode::RightDrawing,
        }
    }

    pub fn drawing_side(self) -> Option<Side> {
        match self {
            InteractionMode::LeftDrawing => Some(Side::Left),
            InteractionMode::RightDrawing => Some(Side::Right),
            _ => None,
        }
    }
}

/// Transient interaction state. The erase stroke is tracked apart from the
/// mode since it can happen in any of them.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    mode: InteractionMode,
    eliminate_stroke: Option<Vec<IVec2>>,
    preview_shift: Option<u32>,
}

impl InteractionState {
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_erasing(&self) -> bool {
        self.eliminate_stroke.is_some()
    }

    pub fn eliminate_stroke(&self) -> Option<&[IVec2]> {
        self.eliminate_stroke.as_deref()
    }

    pub fn preview_shift(&self) -> Option<u32> {
        self.preview_shift
    }

    pub fn set_preview_shift(&mut self, shift: Option<u32>) {
        self.preview_shift = shift;
    }

    pub fn start_eliminate(&mut self, pos: IVec2) {
        self.eliminate_stroke = Some(vec![pos]);
    }

    pub fn extend_eliminate(&mut self, pos: IVec2) {
        if let Some(stroke) = self.eliminate_stroke.as_mut() {
            stroke.push(pos);
        }
    }

    pub fn finish_eliminate(&mut self) -> Option<Vec<IVec2>> {
        self.eliminate_stroke.take()
    }

    pub fn transition_to(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            info!("interaction transitioning to {:?}", mode);
        }
        self.mode = mode;
        self.preview_shift = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let state = InteractionState::default();
        assert_eq!(state.mode(), InteractionMode::Idle);
        assert!(!state.is_erasing());
    }

    #[test]
    fn transition_clears_preview() {
        let mut state = InteractionState::default();
        state.set_preview_shift(Some(12));
        state.transition_to(InteractionMode::BodyConfirmed);
        assert_eq!(state.preview_shift(), None);
        assert_eq!(state.mode().drawing_side(), None);
        assert_eq!(
            InteractionMode::drawing(Side::Right).drawing_side(),
            Some(Side::Right)
        );
    }

    #[test]
    fn eliminate_stroke_collects_points() {
        let mut state = InteractionState::default();
        state.extend_eliminate(IVec2::ZERO);
        assert!(!state.is_erasing());

        state.start_eliminate(IVec2::new(1, 1));
        state.extend_eliminate(IVec2::new(2, 2));
        assert_eq!(state.finish_eliminate(), Some(vec![IVec2::new(1, 1), IVec2::new(2, 2)]));
        assert_eq!(state.finish_eliminate(), None);
    }
}
