use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, MutexGuard};

use crate::session::{Flow, Key, KeyHandler, PointerEvent, PointerHandler, Session};

/// A [`Session`] behind a mutex, for hosts that deliver input and timer
/// ticks from different threads. Every event and carve runs under the lock,
/// so carving never overlaps a trace mutation.
#[derive(Debug, Clone)]
pub struct SharedSession(Arc<Mutex<Session>>);

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock()
    }

    pub fn on_pointer(&self, event: PointerEvent, now: Instant) {
        self.0.lock().on_pointer(event, now);
    }

    pub fn on_key(&self, key: Key, now: Instant) -> Flow {
        self.0.lock().on_key(key, now)
    }

    pub fn tick(&self, now: Instant) {
        self.0.lock().tick(now);
    }

    /// Returns the session if this is the last handle.
    pub fn try_into_inner(self) -> Option<Session> {
        Arc::try_unwrap(self.0).ok().map(Mutex::into_inner)
    }
}

impl From<Session> for SharedSession {
    fn from(session: Session) -> Self {
        Self::new(session)
    }
}
