//! Closed sets of effect variants handed to the renderer and audio collaborators.

use rand::seq::SliceRandom;
use rand::Rng;

/// Arena key for a live sprite; allocated by the core, owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

#[derive(Clone, Debug, Default)]
pub struct EffectIds {
    next: u64,
}

impl EffectIds {
    pub fn next_id(&mut self) -> EffectId {
        self.next += 1;
        EffectId(self.next)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostBehavior {
    Slide,
    Teleport,
    Follow,
    Peek,
    Stare,
    Crawl,
}

impl GhostBehavior {
    pub const ALL: [GhostBehavior; 6] = [
        GhostBehavior::Slide,
        GhostBehavior::Teleport,
        GhostBehavior::Follow,
        GhostBehavior::Peek,
        GhostBehavior::Stare,
        GhostBehavior::Crawl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GhostBehavior::Slide => "slide",
            GhostBehavior::Teleport => "teleport",
            GhostBehavior::Follow => "follow",
            GhostBehavior::Peek => "peek",
            GhostBehavior::Stare => "stare",
            GhostBehavior::Crawl => "crawl",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpiderBehavior {
    Walk,
    Drop,
    Inspect,
}

impl SpiderBehavior {
    pub const ALL: [SpiderBehavior; 3] = [
        SpiderBehavior::Walk,
        SpiderBehavior::Drop,
        SpiderBehavior::Inspect,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CorruptionKind {
    TextMutation,
    LayoutTilt,
    CursorCorruption,
    ColorShift,
    LinkSabotage,
}

impl CorruptionKind {
    pub const ALL: [CorruptionKind; 5] = [
        CorruptionKind::TextMutation,
        CorruptionKind::LayoutTilt,
        CorruptionKind::CursorCorruption,
        CorruptionKind::ColorShift,
        CorruptionKind::LinkSabotage,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn name(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        }
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlitchKind {
    RgbSplit,
    Static,
    Tear,
}

impl GlitchKind {
    pub const ALL: [GlitchKind; 3] = [GlitchKind::RgbSplit, GlitchKind::Static, GlitchKind::Tear];

    pub fn name(self) -> &'static str {
        match self {
            GlitchKind::RgbSplit => "rgb-split",
            GlitchKind::Static => "static",
            GlitchKind::Tear => "tear",
        }
    }
}

/// Ungated decorative effect. Positions are fractions of the viewport so the
/// core never needs to know the page size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AmbientEffect {
    Shadow { edge: Edge },
    Glitch { glitch: GlitchKind },
    BloodDrip { x_frac: f32 },
    Flicker { silhouettes: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Whisper,
    Heartbeat,
    Crawling,
}

/// Uniform pick from a non-empty variant table.
pub fn pick<T: Copy, R: Rng + ?Sized>(all: &[T], rng: &mut R) -> T {
    *all.choose(rng).unwrap_or(&all[0])
}
