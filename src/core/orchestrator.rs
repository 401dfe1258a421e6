//! Page-level state machine composing the schedulers, the safety monitor and
//! the intensity controller.
//!
//! ```text
//! Uninitialized --init--> DisabledOnSite (inert for the rest of the page load)
//!               --init--> Active <--stop/start--> Suspended
//! any           --panic/destroy--> Destroyed
//! ```
//!
//! One instance exists per page. The host owns it, drives it with
//! [`Orchestrator::advance`] and hands it inbound messages; nothing reaches it
//! through globals.

use super::ambient::AmbientScheduler;
use super::collab::{AudioSink, PageProbe, Renderer, Stage};
use super::constants::REDUCED_MOTION_INTENSITY_CAP;
use super::effects::EffectIds;
use super::gate::EventGate;
use super::intensity::IntensityController;
use super::messages::{parse_message, Message, Response, UNKNOWN_MESSAGE};
use super::safety::{SafetyMonitor, Verdict};
use super::scheduler::{EffectScheduler, Family};
use super::settings::{Settings, SettingsPatch};
use super::timer::Millis;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    DisabledOnSite,
    Active,
    Suspended,
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Due {
    Safety,
    Intensity,
    Major(usize),
    Ambient,
}

// Derive independent per-component RNG seeds from one base seed
fn mix_seed(seed: u64, i: u64) -> u64 {
    seed ^ i.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

pub struct Orchestrator<R: Renderer, A: AudioSink, P: PageProbe> {
    lifecycle: Lifecycle,
    /// User settings as last received, clamped.
    settings: Rc<Settings>,
    /// Snapshot the schedulers currently read (night boost + escalated intensity).
    effective: Rc<Settings>,
    gate: EventGate,
    ids: EffectIds,
    majors: [EffectScheduler; 3],
    ambient: AmbientScheduler,
    safety: SafetyMonitor,
    intensity: IntensityController,
    audio_ready: bool,
    drone_on: bool,
    renderer: R,
    audio: A,
    page: P,
}

impl<R: Renderer, A: AudioSink, P: PageProbe> Orchestrator<R, A, P> {
    pub fn new(renderer: R, audio: A, page: P, seed: u64) -> Self {
        let settings = Rc::new(Settings::default());
        let majors = Family::ALL
            .map(|f| EffectScheduler::new(f, settings.clone(), mix_seed(seed, f as u64)));
        Self {
            lifecycle: Lifecycle::Uninitialized,
            effective: settings.clone(),
            ambient: AmbientScheduler::new(settings.clone(), mix_seed(seed, 3)),
            settings,
            gate: EventGate::new(),
            ids: EffectIds::default(),
            majors,
            safety: SafetyMonitor::new(),
            intensity: IntensityController::new(),
            audio_ready: false,
            drone_on: false,
            renderer,
            audio,
            page,
        }
    }

    // ------------------------------------------------------------ accessors

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn effective_settings(&self) -> &Settings {
        &self.effective
    }

    pub fn gate(&self) -> &EventGate {
        &self.gate
    }

    pub fn scheduler(&self, family: Family) -> &EffectScheduler {
        &self.majors[family as usize]
    }

    pub fn ambient(&self) -> &AmbientScheduler {
        &self.ambient
    }

    pub fn time_on_page(&self) -> Millis {
        self.intensity.time_on_page()
    }

    pub fn audio_ready(&self) -> bool {
        self.audio_ready
    }

    pub fn drone_on(&self) -> bool {
        self.drone_on
    }

    /// Timers owned by the effect schedulers (gated and ambient).
    pub fn effect_timers(&self) -> usize {
        self.majors.iter().map(|s| s.pending_timers()).sum::<usize>()
            + self.ambient.pending_timers()
    }

    /// Every outstanding timer, including the monitor and intensity samplers.
    pub fn pending_timers(&self) -> usize {
        self.effect_timers() + self.safety.pending_timers() + self.intensity.pending_timers()
    }

    pub fn live_instances(&self) -> usize {
        self.majors.iter().map(|s| s.live_instances()).sum()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    // ------------------------------------------------------------ lifecycle

    /// Adopt the fetched settings and decide whether this page is haunted at
    /// all. The site check runs here only; later changes to the page are the
    /// safety monitor's business. Calling it twice is a no-op.
    pub fn init(&mut self, now: Millis, fetched: anyhow::Result<Settings>) {
        if self.lifecycle != Lifecycle::Uninitialized {
            return;
        }
        let mut settings = match fetched {
            Ok(s) => s.clamped(),
            Err(e) => {
                log::warn!("settings unavailable, using defaults: {:#}", e);
                Settings::default()
            }
        };

        let host = self.page.hostname();
        if settings.blocks_host(&host) || self.page.looks_like_login() {
            log::info!("haunting disabled on this site for safety ({})", host);
            self.settings = Rc::new(settings);
            self.lifecycle = Lifecycle::DisabledOnSite;
            return;
        }

        if self.page.prefers_reduced_motion() {
            settings.intensity = settings.intensity.min(REDUCED_MOTION_INTENSITY_CAP);
        }
        let enabled = settings.enabled;
        self.settings = Rc::new(settings);
        self.lifecycle = Lifecycle::Suspended;
        if enabled {
            self.start(now);
        }
        self.intensity.start(now);
        self.safety.start(now);
        log::info!("haunting initialized (enabled={})", enabled);
    }

    /// Begin a fresh scheduling cycle for every enabled family.
    pub fn start(&mut self, now: Millis) {
        if self.lifecycle != Lifecycle::Suspended {
            return;
        }
        self.lifecycle = Lifecycle::Active;
        self.effective = Rc::new(self.derive_effective());
        self.push_effective();
        self.start_enabled_families(now);
        self.ambient.start(now, &mut self.renderer);
        if self.audio_ready && self.settings.audio {
            self.set_drone(true);
        }
        log::debug!("haunting active at {}", now);
    }

    /// Suspend: cancel all effect timers and live sprites, silence the drone.
    /// Corruption residue stays on the page until `panic`.
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Active {
            self.lifecycle = Lifecycle::Suspended;
        }
        self.stop_effects();
    }

    /// Full visual cleanup. Persisting `enabled = false` is the background's job.
    pub fn panic(&mut self) {
        self.settings = Rc::new(self.settings.merged(&SettingsPatch::enabled(false)));
        self.stop_effects();
        self.renderer.cleanup();
        self.gate.reset();
        self.safety.cancel();
        self.intensity.cancel();
        self.lifecycle = Lifecycle::Destroyed;
        log::info!("panic: all effects removed");
    }

    /// Page teardown.
    pub fn destroy(&mut self) {
        self.safety.cancel();
        self.intensity.cancel();
        self.stop_effects();
        self.renderer.cleanup();
        if self.audio_ready {
            self.audio.teardown();
            self.audio_ready = false;
        }
        self.lifecycle = Lifecycle::Destroyed;
    }

    /// First click or keypress: the platform only allows audio from here on.
    pub fn on_user_interaction(&mut self) {
        if self.audio_ready
            || matches!(
                self.lifecycle,
                Lifecycle::Uninitialized | Lifecycle::DisabledOnSite | Lifecycle::Destroyed
            )
        {
            return;
        }
        match self.audio.init() {
            Ok(()) => {
                self.audio_ready = true;
                self.audio.set_volume(self.settings.audio_volume);
                if self.lifecycle == Lifecycle::Active && self.settings.audio {
                    self.set_drone(true);
                }
            }
            Err(e) => log::warn!("audio init failed: {}", e),
        }
    }

    /// Whether a user gesture could still unlock audio. Gesture listeners
    /// detach once this turns false.
    pub fn wants_gesture(&self) -> bool {
        !self.audio_ready && matches!(self.lifecycle, Lifecycle::Active | Lifecycle::Suspended)
    }

    // ------------------------------------------------------------ time

    /// Run every timer due at or before `now`, in deadline order across all
    /// components. Each entry runs with its own deadline as the current time.
    pub fn advance(&mut self, now: Millis) {
        if !matches!(self.lifecycle, Lifecycle::Active | Lifecycle::Suspended) {
            return;
        }
        while let Some(due) = self.earliest_due(now) {
            match due {
                Due::Safety => {
                    if let Some((at, verdict)) = self.safety.run_due(now, &self.page) {
                        self.on_verdict(at, verdict);
                    }
                }
                Due::Intensity => {
                    if let Some((_, scale)) = self.intensity.run_due(now) {
                        self.on_scale(scale);
                    }
                }
                Due::Major(i) => {
                    let cues = self.cues_enabled();
                    let mut stage = Stage {
                        gate: &mut self.gate,
                        ids: &mut self.ids,
                        renderer: &mut self.renderer,
                        audio: &mut self.audio,
                        audio_ready: cues,
                    };
                    self.majors[i].run_due(now, &mut stage);
                }
                Due::Ambient => {
                    let cues = self.cues_enabled();
                    let mut stage = Stage {
                        gate: &mut self.gate,
                        ids: &mut self.ids,
                        renderer: &mut self.renderer,
                        audio: &mut self.audio,
                        audio_ready: cues,
                    };
                    self.ambient.run_due(now, &mut stage);
                }
            }
            if !matches!(self.lifecycle, Lifecycle::Active | Lifecycle::Suspended) {
                break;
            }
        }
    }

    fn earliest_due(&self, now: Millis) -> Option<Due> {
        // Order breaks ties: safety first so a suspension wins over a firing
        // due at the same instant.
        let candidates = [
            (self.safety.next_due(), Due::Safety),
            (self.intensity.next_due(), Due::Intensity),
            (self.majors[0].next_due(), Due::Major(0)),
            (self.majors[1].next_due(), Due::Major(1)),
            (self.majors[2].next_due(), Due::Major(2)),
            (self.ambient.next_due(), Due::Ambient),
        ];
        candidates
            .iter()
            .enumerate()
            .filter_map(|(rank, (at, due))| at.filter(|t| *t <= now).map(|t| (t, rank, *due)))
            .min_by_key(|(t, rank, _)| (*t, *rank))
            .map(|(_, _, due)| due)
    }

    fn on_verdict(&mut self, at: Millis, verdict: Verdict) {
        match (verdict, self.lifecycle) {
            (Verdict::Unsafe(reason), Lifecycle::Active) => {
                log::info!("suspending: {:?}", reason);
                self.stop();
            }
            (Verdict::Safe, Lifecycle::Suspended) if self.settings.enabled => {
                log::info!("page safe again, resuming");
                self.start(at);
            }
            _ => {}
        }
    }

    fn on_scale(&mut self, scale: f32) {
        let escalated = self.settings.intensity * scale;
        self.effective = Rc::new(self.effective.with_intensity(escalated));
        if self.lifecycle == Lifecycle::Active {
            self.push_effective();
        }
        log::debug!("intensity scale {:.2} -> {:.2}", scale, escalated);
    }

    // ------------------------------------------------------------ messages

    pub fn handle_message(&mut self, now: Millis, message: Message) -> Response {
        match message {
            Message::GetSettings => return Response::with_settings((*self.settings).clone()),
            Message::UpdateSettings { settings } => {
                let next = self.settings.merged(&settings);
                self.apply_settings(now, next);
            }
            Message::Panic => self.panic(),
            Message::Enable => {
                let next = self.settings.merged(&SettingsPatch::enabled(true));
                self.apply_settings(now, next);
            }
            Message::Disable => {
                let next = self.settings.merged(&SettingsPatch::enabled(false));
                self.apply_settings(now, next);
            }
        }
        Response::ok()
    }

    /// Parse and dispatch a JSON message. Unknown types leave state untouched.
    pub fn handle_json(&mut self, now: Millis, text: &str) -> Response {
        match parse_message(text) {
            Ok(message) => self.handle_message(now, message),
            Err(e) => {
                log::debug!("rejected message: {:?}", e);
                Response::failure(UNKNOWN_MESSAGE)
            }
        }
    }

    fn apply_settings(&mut self, now: Millis, next: Settings) {
        self.settings = Rc::new(next);
        if self.audio_ready {
            self.audio.set_volume(self.settings.audio_volume);
        }
        match self.lifecycle {
            Lifecycle::Suspended if self.settings.enabled => {
                if self.safety.last_verdict().map_or(true, Verdict::is_safe) {
                    self.start(now);
                } else {
                    log::debug!("enable deferred: page currently unsafe");
                }
            }
            Lifecycle::Active if !self.settings.enabled => self.stop(),
            Lifecycle::Active => {
                self.effective = Rc::new(self.derive_effective());
                self.push_effective();
                self.start_enabled_families(now);
                self.set_drone(self.audio_ready && self.settings.audio);
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------ helpers

    /// One-shot cues need both a live context and the `audio` toggle.
    fn cues_enabled(&self) -> bool {
        self.audio_ready && self.settings.audio
    }

    fn derive_effective(&self) -> Settings {
        let hour = self.page.local_hour();
        let escalated = self.settings.intensity * self.intensity.scale();
        self.settings.with_night_boost(hour).with_intensity(escalated)
    }

    fn push_effective(&mut self) {
        for s in self.majors.iter_mut() {
            s.update_settings(self.effective.clone());
        }
        self.ambient
            .update_settings(self.effective.clone(), &mut self.renderer);
    }

    fn start_enabled_families(&mut self, now: Millis) {
        let settings = self.settings.clone();
        for s in self.majors.iter_mut() {
            if s.family().toggled_on(&settings) {
                s.start(now);
            }
        }
    }

    fn stop_effects(&mut self) {
        for s in self.majors.iter_mut() {
            s.stop(&mut self.renderer);
        }
        self.ambient.stop(&mut self.renderer);
        self.set_drone(false);
    }

    fn set_drone(&mut self, on: bool) {
        if on == self.drone_on {
            return;
        }
        if on {
            self.audio.start_drone();
        } else {
            self.audio.stop_drone();
        }
        self.drone_on = on;
    }
}
