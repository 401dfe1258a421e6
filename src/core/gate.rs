use super::constants::EVENT_COOLDOWN;
use super::timer::Millis;

/// Shared mutual-exclusion + cooldown for major events.
///
/// A started event holds the gate until `busy_until` and the gate releases
/// itself once that instant passes; callers never release it. The next event
/// additionally waits for [`EVENT_COOLDOWN`] measured from the previous start.
///
/// The host is single-threaded and cooperative, so `can_start` followed by
/// `start` cannot be interleaved with another scheduler's check. A
/// multi-threaded host would need to wrap both calls in one lock.
#[derive(Clone, Debug, Default)]
pub struct EventGate {
    busy_until: Option<Millis>,
    last_start: Option<Millis>,
}

impl EventGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, now: Millis) -> bool {
        matches!(self.busy_until, Some(until) if now < until)
    }

    pub fn can_start(&self, now: Millis) -> bool {
        let cooled = match self.last_start {
            Some(t) => now.saturating_sub(t) >= EVENT_COOLDOWN,
            None => true,
        };
        !self.is_active(now) && cooled
    }

    pub fn start(&mut self, now: Millis, duration: Millis) {
        self.busy_until = Some(now.saturating_add(duration));
        self.last_start = Some(now);
    }

    /// Force-release. The cooldown clock keeps counting from the last start.
    pub fn reset(&mut self) {
        self.busy_until = None;
    }

    pub fn busy_until(&self) -> Option<Millis> {
        self.busy_until
    }
}
