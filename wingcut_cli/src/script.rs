//! Scripted interaction: a YAML list of pointer/key steps replayed against a
//! session on a virtual clock.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use wingcut::{Button, Flow, Key, KeyHandler, PointerEvent, PointerHandler, Session};

/// Virtual time between two consecutive steps.
const DEFAULT_STEP_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Pointer(PointerEvent),
    /// Press at `from`, move in `steps` increments to `to`, release.
    Drag {
        button: Button,
        from: IVec2,
        to: IVec2,
        #[serde(default = "default_drag_steps")]
        steps: u32,
    },
    Key(Key),
    /// Advances the virtual clock by this many milliseconds.
    Wait(u64),
}

fn default_drag_steps() -> u32 {
    10
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Answer given when leaving an image with unsaved changes.
    pub save_on_prompt: bool,
    pub step_ms: Option<u64>,
    /// Steps for images without an entry in `images`.
    pub default: Vec<Step>,
    /// Steps keyed by image file name.
    pub images: BTreeMap<String, Vec<Step>>,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        common::serde::deserialize(&bytes, common::SerdeFormat::Yaml)
            .with_context(|| format!("invalid script {}", path.display()))
    }

    pub fn steps_for(&self, name: &str) -> &[Step] {
        self.images.get(name).map_or(&self.default, |steps| steps)
    }

    /// Feeds the steps for `session` until one of them ends the session, then
    /// lets any debounced carve finish.
    pub fn replay(&self, session: &mut Session, start: Instant) -> Flow {
        let step = Duration::from_millis(self.step_ms.unwrap_or(DEFAULT_STEP_MS));
        let mut clock = VirtualClock::new(start, step);

        let steps = self.steps_for(session.name()).to_vec();
        let mut flow = Flow::Continue;
        for s in steps {
            flow = apply(session, s, &mut clock);
            if flow == Flow::Break {
                break;
            }
        }
        session.flush(clock.tick());
        flow
    }
}

#[derive(Debug)]
struct VirtualClock {
    now: Instant,
    step: Duration,
}

impl VirtualClock {
    fn new(start: Instant, step: Duration) -> Self {
        Self { now: start, step }
    }

    fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    fn tick(&mut self) -> Instant {
        self.advance(self.step)
    }
}

fn apply(session: &mut Session, step: Step, clock: &mut VirtualClock) -> Flow {
    match step {
        Step::Pointer(event) => {
            let now = clock.tick();
            session.on_pointer(event, now);
            session.tick(now);
        }
        Step::Drag {
            button,
            from,
            to,
            steps,
        } => {
            session.on_pointer(PointerEvent::Down { button, pos: from }, clock.tick());
            let steps = steps.max(1) as i32;
            for i in 1..=steps {
                let pos = from + (to - from) * i / steps;
                let now = clock.tick();
                session.on_pointer(PointerEvent::Move { pos }, now);
                session.tick(now);
            }
            let now = clock.tick();
            session.on_pointer(PointerEvent::Up { button, pos: to }, now);
            session.tick(now);
        }
        Step::Key(key) => {
            let now = clock.tick();
            let flow = session.on_key(key, now);
            session.tick(now);
            return flow;
        }
        Step::Wait(ms) => {
            let now = clock.advance(Duration::from_millis(ms));
            session.tick(now);
        }
    }
    Flow::Continue
}
