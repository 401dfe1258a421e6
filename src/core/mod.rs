//! Platform-independent haunting logic. Everything here runs on the host in
//! tests; the browser glue in the crate root only implements the traits in
//! [`collab`] and drives [`Orchestrator::advance`] from the frame loop.

pub mod ambient;
pub mod cadence;
pub mod collab;
pub mod constants;
pub mod effects;
pub mod gate;
pub mod intensity;
pub mod messages;
pub mod orchestrator;
pub mod safety;
pub mod scheduler;
pub mod settings;
pub mod timer;

pub use collab::{AudioError, AudioSink, PageProbe, Renderer, Stage};
pub use effects::*;
pub use gate::EventGate;
pub use messages::{parse_message, Message, MessageError, Response, UNKNOWN_MESSAGE};
pub use orchestrator::{Lifecycle, Orchestrator};
pub use safety::{UnsafeReason, Verdict};
pub use scheduler::{EffectScheduler, Family};
pub use settings::{Settings, SettingsPatch};
pub use timer::{FrameClock, Millis, TimerId, Timers};
