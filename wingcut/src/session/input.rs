//! Host-agnostic input events.
//!
//! A GUI or a scripted driver translates its own events into these and feeds
//! them to a [`Session`](super::Session).

use std::time::Instant;

use glam::IVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Left,
    Right,
}

/// Pointer activity in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { button: Button, pos: IVec2 },
    Move { pos: IVec2 },
    Up { button: Button, pos: IVec2 },
}

impl PointerEvent {
    pub fn pos(&self) -> IVec2 {
        match *self {
            PointerEvent::Down { pos, .. }
            | PointerEvent::Move { pos }
            | PointerEvent::Up { pos, .. } => pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Space,
    Escape,
}

/// Whether the driving loop should keep feeding events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Break,
}

pub trait PointerHandler {
    fn on_pointer(&mut self, event: PointerEvent, now: Instant);
}

pub trait KeyHandler {
    fn on_key(&mut self, key: Key, now: Instant) -> Flow;
}
