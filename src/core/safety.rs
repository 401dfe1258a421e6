use super::collab::PageProbe;
use super::constants::SAFETY_CHECK_INTERVAL;
use super::timer::Millis;

/// Why a page sample was judged unsafe, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsafeReason {
    FullscreenOrCall,
    FocusedInput,
    LoginPage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe(UnsafeReason),
}

impl Verdict {
    pub fn is_safe(self) -> bool {
        matches!(self, Verdict::Safe)
    }
}

/// First matching condition wins; later probes are not consulted.
pub fn evaluate(page: &dyn PageProbe) -> Verdict {
    if page.is_fullscreen_or_call() {
        Verdict::Unsafe(UnsafeReason::FullscreenOrCall)
    } else if page.has_focused_input() {
        Verdict::Unsafe(UnsafeReason::FocusedInput)
    } else if page.looks_like_login() {
        Verdict::Unsafe(UnsafeReason::LoginPage)
    } else {
        Verdict::Safe
    }
}

/// Fixed-rate page sampler. Owns one pending deadline and nothing else.
#[derive(Clone, Debug, Default)]
pub struct SafetyMonitor {
    next: Option<Millis>,
    last: Option<Verdict>,
}

impl SafetyMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: Millis) {
        if self.next.is_none() {
            self.next = Some(now + SAFETY_CHECK_INTERVAL);
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

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last
    }

    /// Sample the page if the deadline has passed; reschedules at a fixed rate
    /// from the deadline, not from `now`.
    pub fn run_due(&mut self, now: Millis, page: &dyn PageProbe) -> Option<(Millis, Verdict)> {
        let at = self.next.filter(|at| *at <= now)?;
        self.next = Some(at + SAFETY_CHECK_INTERVAL);
        let verdict = evaluate(page);
        self.last = Some(verdict);
        Some((at, verdict))
    }
}
