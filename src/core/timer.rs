//! Owned, cancelable timer queue.
//!
//! Components never hand closures to the host's `setTimeout`. Instead each one
//! owns a `Timers<T>` whose payloads describe what to do when the deadline
//! passes, and the orchestrator drains due entries from its loop. Cancelling
//! everything a component has scheduled is therefore a single `clear()`.

use smallvec::SmallVec;

/// Milliseconds on the host's monotonic clock.
pub type Millis = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    id: TimerId,
    at: Millis,
    payload: T,
}

#[derive(Clone, Debug)]
pub struct Timers<T> {
    next_id: u64,
    entries: SmallVec<[Entry<T>; 8]>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: SmallVec::new(),
        }
    }

    pub fn schedule(&mut self, at: Millis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, at, payload });
        id
    }

    /// Returns false when the timer already fired or was never scheduled here.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.at).min()
    }

    /// Remove and return the earliest entry whose deadline is `<= now`.
    /// Entries sharing a deadline come out in the order they were scheduled.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.at <= now)
            .min_by_key(|(_, e)| (e.at, e.id))
            .map(|(i, _)| i)?;
        let entry = self.entries.remove(idx);
        Some((entry.at, entry.payload))
    }
}

/// Haunting clock derived from frame deltas. Each step is capped so a tab
/// returning from the background resumes where it left off instead of
/// replaying every deadline it slept through.
#[derive(Clone, Debug)]
pub struct FrameClock {
    elapsed_ms: f64,
    max_step_ms: f64,
    last_step_ms: f64,
}

impl FrameClock {
    pub fn new(max_step_ms: f64) -> Self {
        Self {
            elapsed_ms: 0.0,
            max_step_ms,
            last_step_ms: 0.0,
        }
    }

    /// Advance by a wall-clock delta and return the new time.
    pub fn advance(&mut self, dt_ms: f64) -> Millis {
        let step = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, self.max_step_ms)
        } else {
            0.0
        };
        self.elapsed_ms += step;
        self.last_step_ms = step;
        self.now()
    }

    pub fn now(&self) -> Millis {
        self.elapsed_ms as Millis
    }

    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn last_step_secs(&self) -> f32 {
        (self.last_step_ms / 1000.0) as f32
    }
}
