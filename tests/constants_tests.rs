// Host-side tests for constants and their mathematical relationships.

use haunted_web::core::constants::*;
use haunted_web::core::intensity::scale_for;
use haunted_web::core::settings::is_night_hour;

#[test]
#[allow(clippy::assertions_on_constants)]
fn cadence_windows_are_ordered() {
    assert!(GHOST_MIN < GHOST_MAX);
    assert!(SPIDER_MIN < SPIDER_MAX);
    assert!(CORRUPTION_MIN < CORRUPTION_MAX);

    // Ghosts are the most common apparition, spiders the rarest
    assert!(GHOST_MAX < SPIDER_MAX);
    assert!(CORRUPTION_MAX < GHOST_MAX);

    for (lo, hi) in [SHADOW_EVERY, GLITCH_EVERY, BLOOD_EVERY, FLICKER_EVERY] {
        assert!(lo > 0 && lo < hi);
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn gate_windows_outlast_the_cooldown() {
    assert!(GHOST_GATE_MS > EVENT_COOLDOWN);
    assert!(SPIDER_GATE_MS > EVENT_COOLDOWN);
    assert!(CORRUPTION_GATE_MS > EVENT_COOLDOWN);

    // bookkeeping keeps a sprite at least as long as it holds the gate
    assert!(GHOST_LIFETIME >= GHOST_GATE_MS);
    assert!(SPIDER_LIFETIME >= SPIDER_GATE_MS);

    // a full cluster finishes spawning inside its own gate window
    assert!(SPIDER_CLUSTER_STAGGER * (SPIDER_CLUSTER_MAX as u64 - 1) < SPIDER_GATE_MS);
    assert!(SPIDER_CLUSTER_MIN >= 2 && SPIDER_CLUSTER_MIN <= SPIDER_CLUSTER_MAX);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn probabilities_are_probabilities() {
    for p in [
        SPIDER_CLUSTER_CHANCE,
        FLICKER_CHANCE,
        GHOST_WHISPER_CHANCE,
        SPIDER_CRAWL_CHANCE,
    ] {
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn safety_and_escalation_timing() {
    // unsafe pages must be noticed within a second
    assert!(SAFETY_CHECK_INTERVAL <= 1_000);
    assert_eq!(INTENSITY_RAMP_MS % INTENSITY_SCALE_INTERVAL, 0);
    assert_eq!(scale_for(INTENSITY_RAMP_MS), 2.0);

    // a capped frame step stays well under one monitor tick
    assert!(MAX_FRAME_STEP_MS < SAFETY_CHECK_INTERVAL as f64);

    assert!(REDUCED_MOTION_INTENSITY_CAP > 0.0 && REDUCED_MOTION_INTENSITY_CAP < 1.0);
    assert!(NIGHT_BOOST > 1.0);
}

#[test]
fn night_window_spans_eleven_hours() {
    let night = (0..24).filter(|h| is_night_hour(*h)).count();
    assert_eq!(night, 11);
}

#[test]
fn sensitive_fragments_are_lowercase_and_distinct() {
    for d in UNSAFE_DOMAINS {
        assert_eq!(*d, d.to_ascii_lowercase());
        assert!(!d.is_empty());
    }
    let mut sorted: Vec<_> = UNSAFE_DOMAINS.to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), UNSAFE_DOMAINS.len());
    assert!(TAG_PREFIX.ends_with('-'));
}
