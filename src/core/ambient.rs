//! Ungated environmental layer: fog, shadows, glitches, blood and flickers.
//!
//! Sub-effects each keep their own repeating schedule and never consult the
//! event gate, so they may overlap each other and any major event. Fog is a
//! continuous layer switched on and off wholesale by the `fog` toggle.

use super::cadence::uniform;
use super::collab::{Renderer, Stage};
use super::constants::*;
use super::effects::{pick, AmbientEffect, Edge, GlitchKind};
use super::settings::Settings;
use super::timer::{Millis, Timers};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    Shadow,
    Glitch,
    Blood,
    Drip,
    Flicker,
}

pub struct AmbientScheduler {
    settings: Rc<Settings>,
    rng: StdRng,
    timers: Timers<Task>,
    fog_on: bool,
    running: bool,
}

impl AmbientScheduler {
    pub fn new(settings: Rc<Settings>, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
            timers: Timers::new(),
            fog_on: false,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fog_on(&self) -> bool {
        self.fog_on
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// Every sub-effect gets a first proposal right away, then its own cadence.
    pub fn start(&mut self, now: Millis, renderer: &mut dyn Renderer) {
        if self.running {
            return;
        }
        self.running = true;
        if self.settings.fog {
            self.set_fog(true, renderer);
        }
        for task in [Task::Shadow, Task::Glitch, Task::Blood, Task::Flicker] {
            self.timers.schedule(now, task);
        }
    }

    pub fn stop(&mut self, renderer: &mut dyn Renderer) {
        self.set_fog(false, renderer);
        self.timers.clear();
        self.running = false;
    }

    /// Fog follows its toggle immediately; the other sub-effects pick up the
    /// new snapshot on their next tick.
    pub fn update_settings(&mut self, settings: Rc<Settings>, renderer: &mut dyn Renderer) {
        self.settings = settings;
        if self.running {
            let want = self.settings.fog;
            self.set_fog(want, renderer);
        }
    }

    pub fn run_due(&mut self, now: Millis, stage: &mut Stage<'_>) -> bool {
        let Some((at, task)) = self.timers.pop_due(now) else {
            return false;
        };
        let s = self.settings.clone();
        match task {
            Task::Shadow => {
                if s.enabled && s.shadows {
                    let edge = pick(&Edge::ALL, &mut self.rng);
                    stage.renderer.ambient(AmbientEffect::Shadow { edge });
                }
                self.repeat(at, SHADOW_EVERY, Task::Shadow);
            }
            Task::Glitch => {
                if s.enabled && s.glitches {
                    let glitch = pick(&GlitchKind::ALL, &mut self.rng);
                    stage.renderer.ambient(AmbientEffect::Glitch { glitch });
                }
                self.repeat(at, GLITCH_EVERY, Task::Glitch);
            }
            Task::Blood => {
                let drips: u32 = self.rng.gen_range(1..3);
                self.drip(stage);
                for i in 1..drips {
                    self.timers
                        .schedule(at + BLOOD_DRIP_STAGGER * i as Millis, Task::Drip);
                }
                self.repeat(at, BLOOD_EVERY, Task::Blood);
            }
            Task::Drip => self.drip(stage),
            Task::Flicker => {
                if s.enabled && self.rng.gen_bool(FLICKER_CHANCE) {
                    let silhouettes = self.rng.gen_range(1..3);
                    stage
                        .renderer
                        .ambient(AmbientEffect::Flicker { silhouettes });
                }
                self.repeat(at, FLICKER_EVERY, Task::Flicker);
            }
        }
        true
    }

    fn drip(&mut self, stage: &mut Stage<'_>) {
        if self.settings.enabled && self.settings.blood {
            let x_frac = self.rng.gen_range(0.0..1.0);
            stage.renderer.ambient(AmbientEffect::BloodDrip { x_frac });
        }
    }

    fn repeat(&mut self, at: Millis, every: (Millis, Millis), task: Task) {
        let wait = uniform(every, &mut self.rng);
        self.timers.schedule(at + wait, task);
    }

    fn set_fog(&mut self, on: bool, renderer: &mut dyn Renderer) {
        match (self.fog_on, on) {
            (false, true) => renderer.start_fog(),
            (true, false) => renderer.stop_fog(),
            _ => return,
        }
        self.fog_on = on;
    }
}
