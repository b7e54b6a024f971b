use std::time::{Duration, Instant};

use glam::IVec2;

use super::*;
use crate::raster::{BLACK, WHITE};

fn specimen() -> Canvas {
    let mut canvas = Canvas::new_filled(600, 400, WHITE);
    canvas.fill_rect(100, 60, 230, 300, BLACK);
    canvas.fill_rect(370, 60, 500, 300, BLACK);
    canvas.fill_rect(280, 100, 320, 300, BLACK);
    canvas
}

fn session() -> Session {
    Session::new("specimen.png", specimen(), SessionConfig::default()).unwrap()
}

fn down(x: i32, y: i32) -> PointerEvent {
    PointerEvent::Down {
        button: Button::Left,
        pos: IVec2::new(x, y),
    }
}

fn up(x: i32, y: i32) -> PointerEvent {
    PointerEvent::Up {
        button: Button::Left,
        pos: IVec2::new(x, y),
    }
}

fn moved(x: i32, y: i32) -> PointerEvent {
    PointerEvent::Move { pos: IVec2::new(x, y) }
}

fn confirmed(now: Instant) -> Session {
    let mut s = session();
    s.on_pointer(down(250, 200), now);
    s.on_pointer(up(250, 200), now);
    s
}

#[test]
fn starts_idle_on_symmetry_axis() {
    let s = session();
    assert_eq!(s.mode(), InteractionMode::Idle);
    assert_eq!(s.store().mirror_line.x, 300);
    assert!(s.components().is_empty());
    assert!(!s.preview().is_empty());
}

#[test]
fn empty_canvas_is_rejected() {
    let err = Session::new("x", Canvas::new_default(0, 0), SessionConfig::default()).unwrap_err();
    assert_eq!(err, Error::EmptyCanvas);
}

#[test]
fn idle_pointer_previews_then_confirms() {
    let now = Instant::now();
    let mut s = session();
    s.on_pointer(moved(240, 10), now);
    assert_eq!(s.interaction.preview_shift(), Some(60));
    assert_eq!(s.store().mirror_shift, None);

    s.on_pointer(up(350, 10), now);
    assert_eq!(s.store().mirror_shift, Some(50));
    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);
    assert!(s.status().modified);
}

#[test]
fn body_width_outside_canvas_is_ignored() {
    let now = Instant::now();
    let mut s = session();
    // a 300 px half width puts the right boundary at column 600
    s.on_pointer(up(0, 10), now);
    assert_eq!(s.store().mirror_shift, None);
    assert_eq!(s.mode(), InteractionMode::Idle);
}

#[test]
fn press_inside_body_band_is_rejected() {
    let now = Instant::now();
    let mut s = confirmed(now);
    s.on_pointer(down(290, 100), now);
    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);
}

#[test]
fn left_drag_mirrors_onto_undrawn_right() {
    let now = Instant::now();
    let mut s = confirmed(now);
    s.on_pointer(down(200, 50), now);
    assert_eq!(s.mode(), InteractionMode::LeftDrawing);
    s.on_pointer(moved(180, 60), now);
    s.on_pointer(moved(190, 70), now);
    s.on_pointer(up(190, 70), now);

    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);
    assert_eq!(s.store().track(Side::Left), &[IVec2::new(180, 60), IVec2::new(190, 70)]);
    assert_eq!(s.store().track(Side::Right), &[IVec2::new(420, 60), IVec2::new(410, 70)]);
    assert!(s.store().was_drawn(Side::Left));
    assert!(!s.store().was_drawn(Side::Right));
}

#[test]
fn drawn_side_is_not_overwritten_by_mirroring() {
    let now = Instant::now();
    let mut s = confirmed(now);
    s.on_pointer(down(400, 50), now);
    s.on_pointer(moved(420, 80), now);
    s.on_pointer(up(420, 80), now);
    assert_eq!(s.store().track(Side::Left), &[IVec2::new(180, 80)]);

    s.on_pointer(down(200, 50), now);
    // right was drawn, so it survives and is not extended
    assert_eq!(s.store().track(Side::Right), &[IVec2::new(420, 80)]);
    assert!(s.store().track(Side::Left).is_empty());
    s.on_pointer(moved(150, 90), now);
    assert_eq!(s.store().track(Side::Right), &[IVec2::new(420, 80)]);
    assert_eq!(s.store().track(Side::Left), &[IVec2::new(150, 90)]);
}

#[test]
fn leaving_the_band_ends_the_track() {
    let now = Instant::now();
    let mut s = confirmed(now);
    s.on_pointer(down(200, 50), now);
    s.on_pointer(moved(240, 60), now);
    s.on_pointer(moved(260, 60), now);
    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);
    assert!(s.store().was_drawn(Side::Left));
    s.on_pointer(moved(230, 60), now);
    assert_eq!(s.store().track(Side::Left), &[IVec2::new(240, 60)]);
}

#[test]
fn dragging_off_the_canvas_ends_the_track() {
    let now = Instant::now();
    let mut s = confirmed(now);
    s.on_pointer(down(200, 350), now);
    s.on_pointer(moved(200, 399), now);
    s.on_pointer(moved(200, 400), now);
    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);
    assert_eq!(s.store().track(Side::Left), &[IVec2::new(200, 399)]);

    let record = s.to_record();
    let mut restored = session();
    restored.restore(record, now).unwrap();
    assert_eq!(restored.store().track(Side::Left), &[IVec2::new(200, 399)]);
}

#[test]
fn first_carve_runs_immediately_then_debounces() {
    let start = Instant::now();
    let mut s = confirmed(start);
    s.on_pointer(down(200, 50), start);
    for y in 51..=150 {
        s.on_pointer(moved(200, y), start);
    }
    s.on_pointer(up(200, 150), start);
    assert_eq!(s.stats().runs, 1);
    assert!(s.components().wings_complete());

    for step in 0..20 {
        s.on_key(Key::Char('-'), start + Duration::from_millis(step));
    }
    assert_eq!(s.stats().runs, 1);
    assert!(s.has_pending_recompute());

    s.tick(start + Duration::from_millis(200));
    assert_eq!(s.stats().runs, 1);
    s.tick(start + Duration::from_millis(501));
    assert_eq!(s.stats().runs, 2);
    assert!(!s.has_pending_recompute());
}

#[test]
fn flush_runs_pending_job() {
    let start = Instant::now();
    let mut s = confirmed(start);
    s.on_key(Key::Char('+'), start);
    s.on_key(Key::Char('-'), start);
    assert!(s.has_pending_recompute());
    s.flush(start);
    assert!(!s.has_pending_recompute());
}

#[test]
fn flush_counts_towards_the_debounce_window() {
    let start = Instant::now();
    let mut s = confirmed(start);
    s.on_pointer(down(200, 50), start);
    s.on_pointer(moved(200, 150), start);
    s.on_pointer(up(200, 150), start);
    assert_eq!(s.stats().runs, 1);

    let flushed_at = start + Duration::from_millis(600);
    s.on_key(Key::Char('-'), start + Duration::from_millis(100));
    s.flush(flushed_at);
    assert_eq!(s.stats().runs, 2);

    // past the window of the first run, inside the window of the flush
    s.on_key(Key::Char('-'), flushed_at + Duration::from_millis(100));
    assert_eq!(s.stats().runs, 2);
    s.tick(flushed_at + Duration::from_millis(400));
    assert_eq!(s.stats().runs, 2);
    s.tick(flushed_at + Duration::from_millis(501));
    assert_eq!(s.stats().runs, 3);
}

#[test]
fn threshold_keys_are_bounded() {
    let now = Instant::now();
    let mut s = session();
    for _ in 0..10 {
        s.on_key(Key::Char('+'), now);
    }
    assert_eq!(s.store().threshold.get(), 254);
    s.on_key(Key::Char('-'), now);
    assert_eq!(s.store().threshold.get(), 253);
}

#[test]
fn nudges_are_locked_after_drawing() {
    let now = Instant::now();
    let mut s = session();
    s.on_key(Key::Left, now);
    s.on_key(Key::Char('d'), now);
    s.on_key(Key::PageUp, now);
    assert_eq!(s.store().mirror_line.x, 310);
    s.on_key(Key::PageDown, now);
    assert_eq!(s.store().mirror_line.x, 300);

    s.on_pointer(up(250, 0), now);
    s.on_pointer(down(200, 50), now);
    s.on_pointer(up(200, 50), now);
    s.on_key(Key::Right, now);
    assert_eq!(s.store().mirror_line.x, 300);
}

#[test]
fn nudge_cannot_push_the_body_band_off_the_canvas() {
    let now = Instant::now();
    let mut s = session();
    // right boundary at 590
    s.on_pointer(up(10, 10), now);
    assert_eq!(s.store().mirror_shift, Some(290));

    for _ in 0..10 {
        s.on_key(Key::Right, now);
    }
    assert_eq!(s.store().mirror_line.x, 309);
    s.on_key(Key::PageUp, now);
    assert_eq!(s.store().mirror_line.x, 309);
    assert_eq!(s.store().boundary(Side::Right), Some(599));

    s.on_key(Key::PageDown, now);
    assert_eq!(s.store().mirror_line.x, 299);
}

#[test]
fn erase_strokes_with_undo_and_redo() {
    let now = Instant::now();
    let mut s = session();
    let right_down = PointerEvent::Down {
        button: Button::Right,
        pos: IVec2::new(10, 10),
    };
    let right_up = PointerEvent::Up {
        button: Button::Right,
        pos: IVec2::new(30, 10),
    };
    s.on_pointer(right_down, now);
    s.on_pointer(moved(20, 10), now);
    s.on_pointer(right_up, now);
    assert_eq!(s.store().eliminate_blocks(), &[vec![IVec2::new(10, 10), IVec2::new(20, 10)]]);

    s.on_key(Key::Char('z'), now);
    assert!(s.store().eliminate_blocks().is_empty());
    s.on_key(Key::Char('x'), now);
    assert_eq!(s.store().eliminate_blocks().len(), 1);
}

#[test]
fn reset_walks_back_two_levels() {
    let now = Instant::now();
    let mut s = confirmed(now);
    s.on_pointer(down(200, 50), now);
    s.on_pointer(moved(200, 60), now);
    s.on_pointer(up(200, 60), now);

    s.on_key(Key::Char('r'), now);
    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);
    assert!(s.store().track(Side::Left).is_empty());
    assert_eq!(s.store().mirror_shift, Some(50));

    s.on_key(Key::Char('r'), now);
    assert_eq!(s.mode(), InteractionMode::Idle);
    assert_eq!(s.store().mirror_shift, None);
    assert!(s.components().is_empty());
}

fn erase(s: &mut Session, now: Instant) {
    let pos = IVec2::new(10, 10);
    s.on_pointer(PointerEvent::Down { button: Button::Right, pos }, now);
    s.on_pointer(PointerEvent::Up { button: Button::Right, pos }, now);
}

#[test]
fn reset_of_idle_erase_strokes_stays_idle() {
    let now = Instant::now();
    let mut s = session();
    erase(&mut s, now);
    assert_eq!(s.store().eliminate_blocks().len(), 1);

    s.on_key(Key::Char('r'), now);
    assert_eq!(s.mode(), InteractionMode::Idle);
    assert!(s.store().eliminate_blocks().is_empty());

    s.on_pointer(down(250, 200), now);
    s.on_pointer(up(250, 200), now);
    assert_eq!(s.store().mirror_shift, Some(50));
    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);
}

#[test]
fn reset_levels_from_labels_drawn_before_the_body_width() {
    let now = Instant::now();
    let mut s = session();
    erase(&mut s, now);
    s.on_pointer(up(250, 200), now);
    assert_eq!(s.mode(), InteractionMode::BodyConfirmed);

    let mut levels = Vec::new();
    for _ in 0..3 {
        levels.push(s.store().clone().reset());
        s.on_key(Key::Char('r'), now);
    }
    assert_eq!(levels, [ResetLevel::Labels, ResetLevel::BodyWidth, ResetLevel::Nothing]);
    assert_eq!(s.mode(), InteractionMode::Idle);
    assert_eq!(s.store().mirror_shift, None);
}

#[test]
fn terminal_keys_set_state_and_action() {
    let now = Instant::now();
    let cases = [
        (Key::Space, LoopState::Done, Action::Save),
        (Key::Char('q'), LoopState::Pause, Action::Save),
        (Key::Char('n'), LoopState::Pause, Action::Next),
        (Key::Char('p'), LoopState::Pause, Action::Previous),
        (Key::Escape, LoopState::Exit, Action::Quit),
        (Key::Down, LoopState::None, Action::NavNext),
        (Key::Up, LoopState::None, Action::NavPrevious),
    ];
    for (key, state, action) in cases {
        let mut s = session();
        assert_eq!(s.on_key(key, now), Flow::Break);
        assert_eq!(s.status().state, state);
        assert_eq!(s.status().action, Some(action));
    }
    assert_eq!(session().on_key(Key::Char('k'), now), Flow::Continue);
}

#[test]
fn save_prompt_only_for_modified_next_previous() {
    let now = Instant::now();
    let mut s = session();
    s.on_key(Key::Char('n'), now);
    assert!(!s.needs_save_prompt());

    let mut s = confirmed(now);
    s.on_key(Key::Char('p'), now);
    assert!(s.needs_save_prompt());
    s.mark_saved();
    assert!(!s.needs_save_prompt());

    s.resume();
    assert_eq!(s.status().action, None);
}

#[test]
fn panel_shows_annotations() {
    let now = Instant::now();
    let mut s = session();
    s.on_pointer(moved(250, 0), now);
    assert_eq!(s.panel()[(250, 10)], crate::raster::RED);

    s.on_pointer(up(250, 0), now);
    let panel = s.panel();
    assert_eq!(panel[(250, 10)], crate::raster::BLUE);
    assert_eq!(panel[(350, 10)], crate::raster::BLUE);
    assert_eq!(panel[(300, 10)], BLACK);
    assert_eq!(panel[(50, 10)], WHITE);
}
