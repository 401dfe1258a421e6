use super::constants::{INTENSITY_RAMP_MS, INTENSITY_SCALE_INTERVAL};
use super::timer::Millis;

/// Escalation factor for a given time on page: linear from 1x at zero to 2x
/// at [`INTENSITY_RAMP_MS`], flat afterwards.
pub fn scale_for(time_on_page: Millis) -> f32 {
    1.0 + (time_on_page as f32 / INTENSITY_RAMP_MS as f32).min(1.0)
}

/// Fixed-rate escalation timer. Only the cosmetic `intensity` escalates;
/// scheduling frequencies are left to the user and the night boost.
#[derive(Clone, Debug, Default)]
pub struct IntensityController {
    next: Option<Millis>,
    time_on_page: Millis,
}

impl IntensityController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Millis) {
        if self.next.is_none() {
            self.next = Some(now + INTENSITY_SCALE_INTERVAL);
        }
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.next
    }

    pub fn pending_timers(&self) -> usize {
        usize::from(self.next.is_some())
    }

    pub fn time_on_page(&self) -> Millis {
        self.time_on_page
    }

    pub fn scale(&self) -> f32 {
        scale_for(self.time_on_page)
    }

    /// Accumulate one interval and return the new scale, if the deadline passed.
    pub fn run_due(&mut self, now: Millis) -> Option<(Millis, f32)> {
        let at = self.next.filter(|at| *at <= now)?;
        self.next = Some(at + INTENSITY_SCALE_INTERVAL);
        self.time_on_page += INTENSITY_SCALE_INTERVAL;
        Some((at, self.scale()))
    }
}
