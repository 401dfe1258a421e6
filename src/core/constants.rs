/// Scheduling and safety tuning constants.
///
/// All durations are milliseconds on the host's monotonic clock. Keeping them
/// here keeps magic numbers out of the schedulers and lets the host-side tests
/// assert their relationships.
use super::timer::Millis;

// Minimum spacing between the starts of two major events (ghost, spider, corruption)
pub const EVENT_COOLDOWN: Millis = 2_000;

// Ghost cadence and bookkeeping
pub const GHOST_MIN: Millis = 5_000;
pub const GHOST_MAX: Millis = 30_000;
pub const GHOST_JITTER: Millis = 5_000;
pub const GHOST_GATE_MS: Millis = 8_000; // how long a ghost holds the event gate
pub const GHOST_LIFETIME: Millis = 15_000; // live-set bookkeeping, not a forced destroy

// Spider cadence and bookkeeping
pub const SPIDER_MIN: Millis = 10_000;
pub const SPIDER_MAX: Millis = 45_000;
pub const SPIDER_JITTER: Millis = 5_000;
pub const SPIDER_GATE_MS: Millis = 12_000;
pub const SPIDER_LIFETIME: Millis = 20_000;
pub const SPIDER_CLUSTER_CHANCE: f64 = 0.1;
pub const SPIDER_CLUSTER_MIN: u32 = 2;
pub const SPIDER_CLUSTER_MAX: u32 = 5; // inclusive
pub const SPIDER_CLUSTER_STAGGER: Millis = 500;

// Corruption cadence
pub const CORRUPTION_MIN: Millis = 3_000;
pub const CORRUPTION_MAX: Millis = 20_000;
pub const CORRUPTION_JITTER: Millis = 2_000;
pub const CORRUPTION_GATE_MS: Millis = 4_000;

// Ambient sub-effect cadences (uniform ranges)
pub const SHADOW_EVERY: (Millis, Millis) = (10_000, 30_000);
pub const GLITCH_EVERY: (Millis, Millis) = (15_000, 45_000);
pub const BLOOD_EVERY: (Millis, Millis) = (20_000, 60_000);
pub const FLICKER_EVERY: (Millis, Millis) = (20_000, 60_000);
pub const BLOOD_DRIP_STAGGER: Millis = 500;
pub const FLICKER_CHANCE: f64 = 0.2;

// Audio cue probabilities
pub const GHOST_WHISPER_CHANCE: f64 = 0.3;
pub const SPIDER_CRAWL_CHANCE: f64 = 0.4;

// Safety monitor sampling period (fixed rate, no jitter)
pub const SAFETY_CHECK_INTERVAL: Millis = 1_000;

// Intensity escalation
pub const INTENSITY_SCALE_INTERVAL: Millis = 60_000;
pub const INTENSITY_RAMP_MS: Millis = 300_000; // time on page to reach the 2x ceiling
pub const NIGHT_BOOST: f32 = 1.5;
pub const NIGHT_START_HOUR: u32 = 19;
pub const NIGHT_END_HOUR: u32 = 6;

// Accessibility: reduced-motion users never exceed this intensity
pub const REDUCED_MOTION_INTENSITY_CAP: f32 = 0.2;

// Class prefix carried by every element this system inserts into a page
pub const TAG_PREFIX: &str = "haunted-";

/// Longest frame delta fed to the haunting clock, in ms.
pub const MAX_FRAME_STEP_MS: f64 = 250.0;

// Hostname fragments that disable haunting outright
pub const UNSAFE_DOMAINS: &[&str] = &[
    "bank",
    "paypal",
    "stripe",
    "checkout",
    "payment",
    "gov",
    "irs",
    "medicare",
    "healthcare",
    "login",
    "signin",
    "auth",
    "meet",
    "zoom",
    "teams",
    "webex",
];
