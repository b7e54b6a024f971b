//! Rate limiting for the recompute job.
//!
//! Time is passed in by the caller, so a driver can use the wall clock or a
//! virtual one.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Job {
    enqueued_at: Instant,
    status: JobStatus,
}

/// Collapses bursts of recompute requests into at most one run per window.
///
/// A request made while a previous one has not run yet replaces it. A pending
/// request runs once more than `window` has passed since the last run; the
/// very first request runs straight away.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Option<Job>,
    last_done: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_done: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .is_some_and(|job| job.status == JobStatus::Idle)
    }

    /// Enqueues a job; returns whether it is due right now.
    pub fn request(&mut self, now: Instant) -> bool {
        self.pending = Some(Job {
            enqueued_at: now,
            status: JobStatus::Idle,
        });
        self.poll(now)
    }

    /// Returns `true` if the pending job should run now and marks it done.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(job) = self.pending.as_mut() else {
            return false;
        };
        if job.status == JobStatus::Done {
            return false;
        }

        let due = match self.last_done {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.window,
        };
        if due {
            job.status = JobStatus::Done;
            self.last_done = Some(now);
        }
        due
    }

    /// Runs the pending job now regardless of the window, counting it as the
    /// latest run. Returns whether there was anything to run.
    pub fn run_now(&mut self, now: Instant) -> bool {
        if !self.is_pending() {
            return false;
        }
        if let Some(job) = self.pending.as_mut() {
            job.status = JobStatus::Done;
        }
        self.last_done = Some(now);
        true
    }

    /// Drops a job that has not run yet.
    pub fn cancel(&mut self) {
        if self.is_pending() {
            self.pending = None;
        }
    }

    /// When the job queued last was enqueued, if it has not run yet.
    pub fn pending_since(&self) -> Option<Instant> {
        self.pending
            .filter(|job| job.status == JobStatus::Idle)
            .map(|job| job.enqueued_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn first_request_runs_immediately() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        assert!(d.request(start));
        assert!(!d.is_pending());
        assert!(!d.poll(start + Duration::from_secs(5)));
    }

    #[test]
    fn burst_collapses_to_two_runs() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        let mut runs = 0;
        for i in 0..100 {
            if d.request(start + Duration::from_millis(i)) {
                runs += 1;
            }
        }
        assert_eq!(runs, 1);
        assert!(d.is_pending());
        assert_eq!(d.pending_since(), Some(start + Duration::from_millis(99)));

        assert!(!d.poll(start + WINDOW));
        assert!(d.poll(start + WINDOW + Duration::from_millis(1)));
        runs += 1;
        assert!(!d.poll(start + Duration::from_secs(10)));
        assert_eq!(runs, 2);
    }

    #[test]
    fn spaced_requests_all_run() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        for i in 0..5 {
            assert!(d.request(start + Duration::from_millis(600 * i)));
        }
    }

    #[test]
    fn forced_run_restarts_the_window() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        assert!(d.request(start));
        d.request(start + Duration::from_millis(10));
        assert!(d.run_now(start + Duration::from_millis(600)));
        assert!(!d.run_now(start + Duration::from_millis(601)));

        // 700 ms after the first run but only 100 ms after the forced one
        assert!(!d.request(start + Duration::from_millis(700)));
        assert!(d.poll(start + Duration::from_millis(1101)));
    }

    #[test]
    fn cancel_drops_pending() {
        let start = Instant::now();
        let mut d = Debouncer::new(WINDOW);
        d.request(start);
        d.request(start + Duration::from_millis(10));
        d.cancel();
        assert!(!d.poll(start + Duration::from_secs(1)));
    }
}
