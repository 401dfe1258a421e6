//! Gated effect schedulers: one instance per major family.
//!
//! Each scheduler runs a perpetual randomized-interval loop. A tick proposes
//! one firing; it only goes ahead when the family is enabled and the shared
//! [`EventGate`](super::gate::EventGate) is open. Whatever happens, the next
//! tick is scheduled from the settings current at that moment, so cadence
//! changes apply from the next cycle on.

use super::cadence::Cadence;
use super::collab::{Renderer, Stage};
use super::constants::*;
use super::effects::{pick, AudioCue, CorruptionKind, EffectId, GhostBehavior, SpiderBehavior};
use super::settings::Settings;
use super::timer::{Millis, Timers};
use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Ghost,
    Spider,
    Corruption,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Ghost, Family::Spider, Family::Corruption];

    pub fn name(self) -> &'static str {
        match self {
            Family::Ghost => "ghost",
            Family::Spider => "spider",
            Family::Corruption => "corruption",
        }
    }

    pub fn cadence(self) -> Cadence {
        match self {
            Family::Ghost => Cadence::new(GHOST_MIN, GHOST_MAX, GHOST_JITTER),
            Family::Spider => Cadence::new(SPIDER_MIN, SPIDER_MAX, SPIDER_JITTER),
            Family::Corruption => Cadence::new(CORRUPTION_MIN, CORRUPTION_MAX, CORRUPTION_JITTER),
        }
    }

    /// How long one firing holds the event gate.
    pub fn gate_window(self) -> Millis {
        match self {
            Family::Ghost => GHOST_GATE_MS,
            Family::Spider => SPIDER_GATE_MS,
            Family::Corruption => CORRUPTION_GATE_MS,
        }
    }

    pub fn frequency(self, s: &Settings) -> f32 {
        match self {
            Family::Ghost => s.ghost_frequency,
            Family::Spider => s.spider_frequency,
            Family::Corruption => s.distortion_frequency,
        }
    }

    pub fn toggled_on(self, s: &Settings) -> bool {
        match self {
            Family::Ghost => s.ghosts,
            Family::Spider => s.spiders,
            Family::Corruption => s.corruption,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    Tick,
    SpawnSpider,
    /// Drop a sprite from the live set; the sprite itself may already be gone.
    Forget(EffectId),
}

pub struct EffectScheduler {
    family: Family,
    settings: Rc<Settings>,
    rng: StdRng,
    timers: Timers<Task>,
    live: FnvHashMap<EffectId, Millis>,
    running: bool,
    fired: u64,
}

impl EffectScheduler {
    pub fn new(family: Family, settings: Rc<Settings>, seed: u64) -> Self {
        Self {
            family,
            settings,
            rng: StdRng::seed_from_u64(seed),
            timers: Timers::new(),
            live: FnvHashMap::default(),
            running: false,
            fired: 0,
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &Rc<Settings> {
        &self.settings
    }

    /// Number of firings that passed the gate since construction.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn live_instances(&self) -> usize {
        self.live.len()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// Begin a fresh cycle. Calling it on a running scheduler is a no-op.
    pub fn start(&mut self, now: Millis) {
        if self.running {
            return;
        }
        self.running = true;
        self.schedule_tick(now);
    }

    /// Takes effect on the next scheduled tick.
    pub fn update_settings(&mut self, settings: Rc<Settings>) {
        self.settings = settings;
    }

    /// Cancel every pending timer and force-destroy every live sprite.
    pub fn stop(&mut self, renderer: &mut dyn Renderer) {
        self.timers.clear();
        for (id, _) in self.live.drain() {
            renderer.destroy(id);
        }
        self.running = false;
    }

    /// Run the earliest task due at or before `now`. Returns false if none was due.
    pub fn run_due(&mut self, now: Millis, stage: &mut Stage<'_>) -> bool {
        let Some((at, task)) = self.timers.pop_due(now) else {
            return false;
        };
        match task {
            Task::Tick => {
                let s = self.settings.clone();
                if s.enabled && self.family.toggled_on(&s) && stage.gate.can_start(at) {
                    self.fire(at, stage);
                } else {
                    log::trace!("[{}] tick at {} skipped", self.family.name(), at);
                }
                self.schedule_tick(at);
            }
            Task::SpawnSpider => self.spawn_spider(at, stage),
            Task::Forget(id) => {
                self.live.remove(&id);
            }
        }
        true
    }

    /// Fire immediately, bypassing the tick checks but still marking the gate.
    pub fn fire(&mut self, at: Millis, stage: &mut Stage<'_>) {
        self.fired += 1;
        stage.gate.start(at, self.family.gate_window());
        match self.family {
            Family::Ghost => self.spawn_ghost(at, stage),
            Family::Spider => {
                let count = if self.rng.gen_bool(SPIDER_CLUSTER_CHANCE) {
                    self.rng.gen_range(SPIDER_CLUSTER_MIN..=SPIDER_CLUSTER_MAX)
                } else {
                    1
                };
                log::debug!("[spider] spawning {} at {}", count, at);
                self.spawn_spider(at, stage);
                for i in 1..count {
                    self.timers.schedule(
                        at + SPIDER_CLUSTER_STAGGER * i as Millis,
                        Task::SpawnSpider,
                    );
                }
            }
            Family::Corruption => {
                let kind = pick(&CorruptionKind::ALL, &mut self.rng);
                let intensity = self.settings.intensity;
                if !stage.renderer.apply_corruption(kind, intensity) {
                    log::debug!("[corruption] {:?} found no targets", kind);
                }
            }
        }
    }

    fn schedule_tick(&mut self, from: Millis) {
        let s = self.settings.clone();
        let interval = self
            .family
            .cadence()
            .sample(self.family.frequency(&s), &mut self.rng);
        self.timers.schedule(from + interval, Task::Tick);
    }

    fn spawn_ghost(&mut self, at: Millis, stage: &mut Stage<'_>) {
        let behavior = pick(&GhostBehavior::ALL, &mut self.rng);
        let id = stage.ids.next_id();
        stage
            .renderer
            .spawn_ghost(id, behavior, self.settings.intensity);
        self.track(id, at, GHOST_LIFETIME);
        if behavior == GhostBehavior::Stare {
            stage.cue(AudioCue::Heartbeat);
        } else if self.rng.gen_bool(GHOST_WHISPER_CHANCE) {
            stage.cue(AudioCue::Whisper);
        }
        log::debug!("[ghost] {:?} {} at {}", id, behavior.name(), at);
    }

    fn spawn_spider(&mut self, at: Millis, stage: &mut Stage<'_>) {
        let behavior = pick(&SpiderBehavior::ALL, &mut self.rng);
        let id = stage.ids.next_id();
        stage
            .renderer
            .spawn_spider(id, behavior, self.settings.intensity);
        self.track(id, at, SPIDER_LIFETIME);
        if self.rng.gen_bool(SPIDER_CRAWL_CHANCE) {
            stage.cue(AudioCue::Crawling);
        }
    }

    fn track(&mut self, id: EffectId, at: Millis, lifetime: Millis) {
        self.live.insert(id, at);
        self.timers.schedule(at + lifetime, Task::Forget(id));
    }
}
