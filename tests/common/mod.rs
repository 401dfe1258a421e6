// Recording fakes for the collaborator traits, shared by the host-side tests.

#![allow(dead_code)]

use haunted_web::core::*;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Ghost(EffectId, GhostBehavior),
    Spider(EffectId, SpiderBehavior),
    Destroy(EffectId),
    Corrupt(CorruptionKind),
    FogOn,
    FogOff,
    Ambient(AmbientEffect),
    Cleanup,
}

/// Keeps every call plus the set of sprites and residue a real page would show.
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
    pub live: BTreeSet<EffectId>,
    pub residue: usize,
    pub fog: bool,
    pub has_targets: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            live: BTreeSet::new(),
            residue: 0,
            fog: false,
            has_targets: true,
        }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn ghosts(&self) -> usize {
        self.count(|c| matches!(c, Call::Ghost(..)))
    }

    pub fn spiders(&self) -> usize {
        self.count(|c| matches!(c, Call::Spider(..)))
    }

    pub fn corruptions(&self) -> usize {
        self.count(|c| matches!(c, Call::Corrupt(..)))
    }

    /// Tagged elements still in the "document".
    pub fn tagged_elements(&self) -> usize {
        self.live.len() + self.residue + usize::from(self.fog)
    }
}

impl Renderer for RecordingRenderer {
    fn spawn_ghost(&mut self, id: EffectId, behavior: GhostBehavior, _intensity: f32) {
        self.live.insert(id);
        self.calls.push(Call::Ghost(id, behavior));
    }

    fn spawn_spider(&mut self, id: EffectId, behavior: SpiderBehavior, _intensity: f32) {
        self.live.insert(id);
        self.calls.push(Call::Spider(id, behavior));
    }

    fn destroy(&mut self, id: EffectId) {
        self.live.remove(&id);
        self.calls.push(Call::Destroy(id));
    }

    fn apply_corruption(&mut self, kind: CorruptionKind, _intensity: f32) -> bool {
        self.calls.push(Call::Corrupt(kind));
        if self.has_targets {
            self.residue += 1;
        }
        self.has_targets
    }

    fn start_fog(&mut self) {
        self.fog = true;
        self.calls.push(Call::FogOn);
    }

    fn stop_fog(&mut self) {
        self.fog = false;
        self.calls.push(Call::FogOff);
    }

    fn ambient(&mut self, effect: AmbientEffect) {
        self.calls.push(Call::Ambient(effect));
    }

    fn cleanup(&mut self) {
        self.live.clear();
        self.residue = 0;
        self.fog = false;
        self.calls.push(Call::Cleanup);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Sound {
    Init,
    Volume(f32),
    DroneOn,
    DroneOff,
    Cue(AudioCue),
    Teardown,
}

#[derive(Default)]
pub struct RecordingAudio {
    pub calls: Vec<Sound>,
    /// Number of upcoming `init` calls that fail.
    pub failing_inits: u32,
}

impl RecordingAudio {
    pub fn drone_on(&self) -> bool {
        let last = self
            .calls
            .iter()
            .rev()
            .find(|s| matches!(s, Sound::DroneOn | Sound::DroneOff));
        last == Some(&Sound::DroneOn)
    }
}

impl AudioSink for RecordingAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        self.calls.push(Sound::Init);
        if self.failing_inits > 0 {
            self.failing_inits -= 1;
            return Err(AudioError::ContextUnavailable("blocked".into()));
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Sound::Volume(volume));
    }

    fn start_drone(&mut self) {
        self.calls.push(Sound::DroneOn);
    }

    fn stop_drone(&mut self) {
        self.calls.push(Sound::DroneOff);
    }

    fn play(&mut self, cue: AudioCue) {
        self.calls.push(Sound::Cue(cue));
    }

    fn teardown(&mut self) {
        self.calls.push(Sound::Teardown);
    }
}

#[derive(Clone, Debug)]
pub struct FakePage {
    pub fullscreen: bool,
    pub focused_input: bool,
    pub login: bool,
    pub reduced_motion: bool,
    pub host: String,
    pub hour: u32,
}

impl Default for FakePage {
    fn default() -> Self {
        Self {
            fullscreen: false,
            focused_input: false,
            login: false,
            reduced_motion: false,
            host: "example.com".into(),
            hour: 12,
        }
    }
}

impl PageProbe for FakePage {
    fn is_fullscreen_or_call(&self) -> bool {
        self.fullscreen
    }

    fn has_focused_input(&self) -> bool {
        self.focused_input
    }

    fn looks_like_login(&self) -> bool {
        self.login
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn hostname(&self) -> String {
        self.host.clone()
    }

    fn local_hour(&self) -> u32 {
        self.hour
    }
}

pub type TestOrchestrator = Orchestrator<RecordingRenderer, RecordingAudio, FakePage>;

pub fn orchestrator(page: FakePage, seed: u64) -> TestOrchestrator {
    Orchestrator::new(RecordingRenderer::new(), RecordingAudio::default(), page, seed)
}

/// Orchestrator initialised at t=0 with the given settings.
pub fn started(settings: Settings, page: FakePage, seed: u64) -> TestOrchestrator {
    let mut o = orchestrator(page, seed);
    o.init(0, Ok(settings));
    o
}

/// Settings with every family and ambient toggle off.
pub fn quiet() -> Settings {
    Settings {
        ghosts: false,
        spiders: false,
        fog: false,
        audio: false,
        glitches: false,
        corruption: false,
        shadows: false,
        blood: false,
        ..Settings::default()
    }
}

/// Advance in fixed steps, calling `each` after every step.
pub fn run(
    o: &mut TestOrchestrator,
    from: Millis,
    to: Millis,
    step: Millis,
    mut each: impl FnMut(&mut TestOrchestrator, Millis),
) {
    let mut t = from;
    while t < to {
        t = (t + step).min(to);
        o.advance(t);
        each(o, t);
    }
}
