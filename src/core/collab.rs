//! Seams between the scheduling core and the page it runs in.
//!
//! The core decides *when* something happens; implementations of these traits
//! decide what it looks and sounds like. The browser build implements them on
//! top of `web_sys`; tests use recording fakes.

use super::effects::{
    AmbientEffect, AudioCue, CorruptionKind, EffectId, EffectIds, GhostBehavior, SpiderBehavior,
};
use super::gate::EventGate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("audio graph error: {0}")]
    Graph(String),
}

pub trait Renderer {
    fn spawn_ghost(&mut self, id: EffectId, behavior: GhostBehavior, intensity: f32);
    fn spawn_spider(&mut self, id: EffectId, behavior: SpiderBehavior, intensity: f32);
    /// Force-destroy a sprite, cancelling any animation it still runs.
    /// Unknown or already-expired ids are ignored.
    fn destroy(&mut self, id: EffectId);
    /// Returns false when the page has nothing to corrupt (no links, no text).
    fn apply_corruption(&mut self, kind: CorruptionKind, intensity: f32) -> bool;
    fn start_fog(&mut self);
    fn stop_fog(&mut self);
    fn ambient(&mut self, effect: AmbientEffect);
    /// Remove every tagged element and reset inline root style overrides.
    fn cleanup(&mut self);
}

pub trait AudioSink {
    fn init(&mut self) -> Result<(), AudioError>;
    fn set_volume(&mut self, volume: f32);
    fn start_drone(&mut self);
    fn stop_drone(&mut self);
    fn play(&mut self, cue: AudioCue);
    fn teardown(&mut self);
}

/// Read-only view of the page's safety-relevant state.
pub trait PageProbe {
    fn is_fullscreen_or_call(&self) -> bool;
    fn has_focused_input(&self) -> bool;
    fn looks_like_login(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
    fn hostname(&self) -> String;
    fn local_hour(&self) -> u32;
}

/// Borrowed collaborators handed to a scheduler for one poll/stop call.
pub struct Stage<'a> {
    pub gate: &'a mut EventGate,
    pub ids: &'a mut EffectIds,
    pub renderer: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioSink,
    /// Audio cues are only played once the context exists.
    pub audio_ready: bool,
}

impl<'a> Stage<'a> {
    pub fn cue(&mut self, cue: AudioCue) {
        if self.audio_ready {
            self.audio.play(cue);
        }
    }
}
