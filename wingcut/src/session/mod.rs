//! One editing session over a single specimen image.
//!
//! The session owns the original canvas, the user's annotations and the
//! carved components. It is driven by [`PointerHandler`] / [`KeyHandler`]
//! events plus periodic [`Session::tick`] calls that let debounced recompute
//! jobs run.

mod input;
mod interaction;
mod panel;
#[cfg(test)]
mod tests;

pub use input::{Button, Flow, Key, KeyHandler, PointerEvent, PointerHandler};
pub use interaction::{InteractionMode, InteractionState};

use std::time::{Duration, Instant};

use glam::IVec2;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::carving::{can_carve, carve};
use crate::component::ComponentSet;
use crate::compositor::{compose, Layout};
use crate::config::SessionConfig;
use crate::debounce::Debouncer;
use crate::error::{Error, Result};
use crate::geometry::{find_symmetry_line, MirrorLine};
use crate::raster::Canvas;
use crate::store::{ResetLevel, Side, TraceStore};

/// Progress of the current image, persisted with its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    #[default]
    None,
    Done,
    Pause,
    Exit,
}

/// What the navigation loop should do once the session stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Save,
    Quit,
    Next,
    Previous,
    NavNext,
    NavPrevious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub state: LoopState,
    pub action: Option<Action>,
    pub modified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecomputeStats {
    pub runs: u64,
    pub failures: u64,
    pub last_duration: Option<Duration>,
}

#[derive(Debug)]
pub struct Session {
    name: String,
    original: Canvas,
    config: SessionConfig,
    store: TraceStore,
    interaction: InteractionState,
    components: ComponentSet,
    preview: Canvas,
    debouncer: Debouncer,
    status: SessionStatus,
    stats: RecomputeStats,
}

impl Session {
    /// Starts a session on `original`, locating the symmetry axis first.
    pub fn new(name: impl Into<String>, original: Canvas, config: SessionConfig) -> Result<Self> {
        if original.is_empty() {
            return Err(Error::EmptyCanvas);
        }
        let mirror_line = find_symmetry_line(&original, config.symmetry_radius)
            .unwrap_or_else(|| MirrorLine::vertical(original.width() as i32 / 2, original.height()));
        let store = TraceStore::new(mirror_line, config.threshold);
        let layout = layout(&config);
        let preview = compose(&ComponentSet::default(), original.width(), original.height(), &layout);

        Ok(Self {
            name: name.into(),
            debouncer: Debouncer::new(config.debounce),
            original,
            config,
            store,
            interaction: InteractionState::default(),
            components: ComponentSet::default(),
            preview,
            status: SessionStatus::default(),
            stats: RecomputeStats::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original(&self) -> &Canvas {
        &self.original
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &TraceStore {
        &self.store
    }

    pub fn mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    /// Latest composite of the carved components.
    pub fn preview(&self) -> &Canvas {
        &self.preview
    }

    /// The original with all annotations drawn over it.
    pub fn panel(&self) -> Canvas {
        panel::render_panel(self)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn stats(&self) -> RecomputeStats {
        self.stats
    }

    pub fn has_pending_recompute(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Whether the driver should ask about unsaved changes before leaving.
    pub fn needs_save_prompt(&self) -> bool {
        self.status.modified && matches!(self.status.action, Some(Action::Next | Action::Previous))
    }

    pub fn mark_saved(&mut self) {
        self.status.modified = false;
    }

    /// Clears the terminal action so the same session can keep running.
    pub fn resume(&mut self) {
        self.status.action = None;
        self.status.state = LoopState::None;
    }

    /// Lets a debounced recompute run if its window has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.debouncer.poll(now) {
            self.recompute();
        }
    }

    /// Runs any pending recompute right away; it counts towards the
    /// debounce window like any other run.
    pub fn flush(&mut self, now: Instant) {
        if self.debouncer.run_now(now) {
            self.recompute();
        }
    }

    fn request_recompute(&mut self, now: Instant) {
        if self.debouncer.request(now) {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        let layout = layout(&self.config);
        let (width, height) = (self.original.width(), self.original.height());

        if !can_carve(&self.store) {
            self.components = ComponentSet::default();
            self.preview = compose(&self.components, width, height, &layout);
            return;
        }

        let started = Instant::now();
        let result = carve(&self.original, &self.store, self.config.eliminate_thickness);
        let elapsed = started.elapsed();
        self.stats.runs += 1;
        self.stats.last_duration = Some(elapsed);

        match result {
            Ok(components) => {
                debug!(
                    "carved {} components in {:.1} ms",
                    components.iter().count(),
                    elapsed.as_secs_f64() * 1000.0
                );
                self.components = components;
                self.preview = compose(&self.components, width, height, &layout);
            }
            Err(err) => {
                error!("carving {} failed: {err}", self.name);
                self.stats.failures += 1;
                self.components = ComponentSet::default();
                self.preview = panel::error_placeholder(&self.original);
            }
        }
    }

    fn touch(&mut self, now: Instant) {
        self.status.modified = true;
        self.request_recompute(now);
    }

    fn in_canvas_band(&self, shift: u32) -> bool {
        band_fits(self.store.mirror_line, shift, self.original.width())
    }

    fn confirm_body_width(&mut self, x: i32) {
        let shift = (x - self.store.mirror_line.x).unsigned_abs();
        if !self.in_canvas_band(shift) {
            warn!("body width {shift} puts a boundary outside the canvas, ignored");
            return;
        }
        info!("confirm body width, shift={shift}");
        self.store.mirror_shift = Some(shift);
        self.status.modified = true;
        self.interaction.transition_to(InteractionMode::BodyConfirmed);
    }

    fn start_track(&mut self, x: i32) {
        let (Some(left), Some(right)) = (self.store.boundary(Side::Left), self.store.boundary(Side::Right))
        else {
            return;
        };
        let side = if x < left {
            Side::Left
        } else if x > right {
            Side::Right
        } else {
            warn!("x={x} is not a valid region for labeling");
            return;
        };

        let other = side.opposite();
        self.store.track_mut(side).clear();
        if !self.store.was_drawn(other) {
            self.store.track_mut(other).clear();
        }
        self.store.set_drawn(side, false);
        self.interaction.transition_to(InteractionMode::drawing(side));
    }

    /// Whether `pos` lies on the canvas, strictly inside the outer band of
    /// `side`.
    fn inside_band(&self, side: Side, pos: IVec2) -> bool {
        if pos.y < 0 || pos.y as usize >= self.original.height() {
            return false;
        }
        let x = pos.x;
        match (side, self.store.boundary(side)) {
            (Side::Left, Some(boundary)) => 0 < x && x < boundary,
            (Side::Right, Some(boundary)) => boundary < x && (x as usize) < self.original.width(),
            (_, None) => false,
        }
    }

    fn extend_track(&mut self, side: Side, pos: IVec2, now: Instant) {
        if !self.inside_band(side, pos) {
            self.finish_track(side, now);
            return;
        }
        self.store.track_mut(side).push(pos);

        let other = side.opposite();
        if !self.store.was_drawn(other) {
            let mirrored = self.store.mirror_line.reflect(pos);
            if self.inside_band(other, mirrored) {
                self.store.track_mut(other).push(mirrored);
            }
        }
        self.status.modified = true;
    }

    fn finish_track(&mut self, side: Side, now: Instant) {
        self.store.set_drawn(side, true);
        self.interaction.transition_to(InteractionMode::BodyConfirmed);
        self.touch(now);
    }

    fn nudge_mirror(&mut self, step: i32, now: Instant) {
        if self.store.was_drawn(Side::Left) || self.store.was_drawn(Side::Right) {
            warn!("mirror line is locked once a side has been drawn");
            return;
        }
        let moved = self.store.mirror_line.shifted(step, self.original.width());
        if moved == self.store.mirror_line {
            return;
        }
        if let Some(shift) = self.store.mirror_shift {
            if !band_fits(moved, shift, self.original.width()) {
                warn!("mirror line x={} would push the body boundaries off the canvas", moved.x);
                return;
            }
        }
        info!("mirror line x={}", moved.x);
        self.store.mirror_line = moved;
        self.touch(now);
    }

    fn adjust_threshold(&mut self, delta: i32, now: Instant) {
        match self.store.threshold.adjust(delta) {
            Ok(()) => {
                info!("threshold {}", self.store.threshold.get());
                self.touch(now);
            }
            Err(err) => warn!("{err}"),
        }
    }

    fn reset(&mut self, now: Instant) {
        let level = self.store.reset();
        info!("reset {level:?}");
        match level {
            ResetLevel::Labels => {
                self.interaction.finish_eliminate();
                let mode = if self.store.mirror_shift.is_some() {
                    InteractionMode::BodyConfirmed
                } else {
                    InteractionMode::Idle
                };
                self.interaction.transition_to(mode);
            }
            ResetLevel::BodyWidth => self.interaction.transition_to(InteractionMode::Idle),
            ResetLevel::Nothing => return,
        }
        self.components = ComponentSet::default();
        self.preview = compose(
            &self.components,
            self.original.width(),
            self.original.height(),
            &layout(&self.config),
        );
        self.touch(now);
    }

    fn finish(&mut self, state: Option<LoopState>, action: Action) -> Flow {
        if let Some(state) = state {
            self.status.state = state;
        }
        self.status.action = Some(action);
        Flow::Break
    }

    pub(crate) fn store_mut(&mut self) -> &mut TraceStore {
        &mut self.store
    }

    /// Puts the interaction mode in line with a store loaded from elsewhere
    /// and queues a recompute.
    pub(crate) fn after_restore(&mut self, state: LoopState, now: Instant) {
        self.interaction = InteractionState::default();
        if self.store.mirror_shift.is_some() {
            self.interaction.transition_to(InteractionMode::BodyConfirmed);
        }
        self.status = SessionStatus {
            state,
            action: None,
            modified: false,
        };
        self.request_recompute(now);
    }
}

/// Whether both body boundaries around `line` lie inside `[0, width)`.
pub(crate) fn band_fits(line: MirrorLine, shift: u32, width: usize) -> bool {
    line.left_boundary(shift) >= 0 && (line.right_boundary(shift) as usize) < width
}

fn layout(config: &SessionConfig) -> Layout {
    Layout {
        gutter_width: config.gutter_width,
        checker_block: config.checker_block,
        max_height: config.preview_max_height,
    }
}

impl PointerHandler for Session {
    fn on_pointer(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { button: Button::Right, pos } => {
                self.interaction.start_eliminate(pos);
            }
            PointerEvent::Up { button: Button::Right, .. } => {
                if let Some(stroke) = self.interaction.finish_eliminate() {
                    if self.store.push_eliminate_block(stroke) {
                        self.touch(now);
                    }
                }
            }
            PointerEvent::Down { button: Button::Left, pos } => match self.interaction.mode() {
                InteractionMode::Idle => {
                    let shift = (pos.x - self.store.mirror_line.x).unsigned_abs();
                    self.interaction.set_preview_shift(Some(shift));
                }
                InteractionMode::BodyConfirmed => self.start_track(pos.x),
                InteractionMode::LeftDrawing | InteractionMode::RightDrawing => {}
            },
            PointerEvent::Up { button: Button::Left, pos } => match self.interaction.mode() {
                InteractionMode::Idle => self.confirm_body_width(pos.x),
                InteractionMode::BodyConfirmed => {}
                InteractionMode::LeftDrawing => self.finish_track(Side::Left, now),
                InteractionMode::RightDrawing => self.finish_track(Side::Right, now),
            },
            PointerEvent::Move { pos } => {
                self.interaction.extend_eliminate(pos);
                match self.interaction.mode() {
                    InteractionMode::Idle => {
                        let shift = (pos.x - self.store.mirror_line.x).unsigned_abs();
                        self.interaction.set_preview_shift(Some(shift));
                    }
                    InteractionMode::BodyConfirmed => {}
                    InteractionMode::LeftDrawing => self.extend_track(Side::Left, pos, now),
                    InteractionMode::RightDrawing => self.extend_track(Side::Right, pos, now),
                }
            }
        }
    }
}

impl KeyHandler for Session {
    fn on_key(&mut self, key: Key, now: Instant) -> Flow {
        match key {
            Key::Char('+') | Key::Char('=') => self.adjust_threshold(1, now),
            Key::Char('-') | Key::Char('_') => self.adjust_threshold(-1, now),
            Key::Left | Key::Char('a') => self.nudge_mirror(-1, now),
            Key::Right | Key::Char('d') => self.nudge_mirror(1, now),
            Key::PageDown => self.nudge_mirror(-10, now),
            Key::PageUp => self.nudge_mirror(10, now),
            Key::Char('z') => {
                if self.store.undo_eliminate() {
                    self.touch(now);
                }
            }
            Key::Char('x') => {
                if self.store.redo_eliminate() {
                    self.touch(now);
                }
            }
            Key::Char('r') => self.reset(now),
            Key::Space | Key::Char(' ') => return self.finish(Some(LoopState::Done), Action::Save),
            Key::Char('q') => return self.finish(Some(LoopState::Pause), Action::Save),
            Key::Char('n') => return self.finish(Some(LoopState::Pause), Action::Next),
            Key::Char('p') => return self.finish(Some(LoopState::Pause), Action::Previous),
            Key::Down => return self.finish(None, Action::NavNext),
            Key::Up => return self.finish(None, Action::NavPrevious),
            Key::Escape => return self.finish(Some(LoopState::Exit), Action::Quit),
            Key::Char(_) => {}
        }
        Flow::Continue
    }
}
