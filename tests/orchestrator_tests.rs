// Host-side tests for the page orchestrator: lifecycle, safety suspension,
// escalation, gate exclusivity and audio unlock, driven with recording fakes.

mod common;

use common::*;
use haunted_web::core::constants::*;
use haunted_web::core::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn init_starts_active_with_monitor_and_escalation() {
    let o = started(Settings::default(), FakePage::default(), 1);
    assert_eq!(o.lifecycle(), Lifecycle::Active);
    for family in Family::ALL {
        assert!(o.scheduler(family).is_running(), "{} idle", family.name());
    }
    assert!(o.ambient().is_running());
    assert!(o.renderer().fog);
    // 3 ticks + 4 ambient sub-effects + safety + intensity
    assert_eq!(o.pending_timers(), 9);
}

#[test]
fn init_is_one_shot() {
    let mut o = started(Settings::default(), FakePage::default(), 1);
    let before = o.pending_timers();
    o.init(0, Ok(quiet()));
    assert_eq!(o.settings(), &Settings::default());
    assert_eq!(o.pending_timers(), before);
}

#[test]
fn failed_fetch_falls_back_to_defaults() {
    let mut o = orchestrator(FakePage::default(), 2);
    o.init(0, Err(anyhow::anyhow!("storage offline")));
    assert_eq!(o.lifecycle(), Lifecycle::Active);
    assert_eq!(o.settings(), &Settings::default());
}

#[test]
fn disabled_at_init_waits_suspended() {
    let settings = Settings {
        enabled: false,
        ..Settings::default()
    };
    let mut o = started(settings, FakePage::default(), 3);
    assert_eq!(o.lifecycle(), Lifecycle::Suspended);
    assert_eq!(o.effect_timers(), 0);
    assert_eq!(o.pending_timers(), 2);

    o.advance(5_000);
    assert_eq!(o.lifecycle(), Lifecycle::Suspended);
    assert!(o.renderer().calls.is_empty());

    o.handle_message(5_000, Message::Enable);
    assert_eq!(o.lifecycle(), Lifecycle::Active);
    assert!(o.scheduler(Family::Ghost).is_running());
}

#[test]
fn sensitive_host_stays_inert() {
    let page = FakePage {
        host: "mybank-login.com".into(),
        ..FakePage::default()
    };
    let mut o = started(Settings::default(), page, 4);
    assert_eq!(o.lifecycle(), Lifecycle::DisabledOnSite);

    let r = o.handle_message(10, Message::Enable);
    assert!(r.success);
    o.on_user_interaction();
    o.advance(120_000);

    assert_eq!(o.lifecycle(), Lifecycle::DisabledOnSite);
    assert_eq!(o.pending_timers(), 0);
    assert!(o.renderer().calls.is_empty());
    assert!(o.audio().calls.is_empty());
}

#[test]
fn blacklisted_host_and_login_page_are_skipped() {
    let listed = Settings {
        blacklist: vec!["example.com".into()],
        ..Settings::default()
    };
    let o = started(listed, FakePage::default(), 5);
    assert_eq!(o.lifecycle(), Lifecycle::DisabledOnSite);

    let login = FakePage {
        login: true,
        ..FakePage::default()
    };
    let o = started(Settings::default(), login, 5);
    assert_eq!(o.lifecycle(), Lifecycle::DisabledOnSite);
}

#[test]
fn reduced_motion_caps_intensity() {
    let page = FakePage {
        reduced_motion: true,
        ..FakePage::default()
    };
    let o = started(Settings::default(), page.clone(), 6);
    assert!(approx(o.settings().intensity, REDUCED_MOTION_INTENSITY_CAP));

    let gentle = Settings {
        intensity: 0.1,
        ..Settings::default()
    };
    let o = started(gentle, page, 6);
    assert!(approx(o.settings().intensity, 0.1));
}

#[test]
fn night_boost_raises_effective_frequencies() {
    let page = FakePage {
        hour: 23,
        ..FakePage::default()
    };
    let o = started(Settings::default(), page, 7);
    let eff = o.effective_settings();
    assert!(approx(eff.ghost_frequency, 0.45));
    assert!(approx(eff.spider_frequency, 0.3));
    assert!(approx(eff.distortion_frequency, 0.6));
    // user settings untouched
    assert!(approx(o.settings().ghost_frequency, 0.3));
    assert!(approx(
        o.scheduler(Family::Ghost).settings().ghost_frequency,
        0.45
    ));
}

#[test]
fn stop_twice_leaves_nothing_behind() {
    let mut o = started(Settings::default(), FakePage::default(), 8);
    run(&mut o, 0, 60_000, 250, |_, _| {});

    o.handle_message(60_000, Message::Disable);
    o.handle_message(60_000, Message::Disable);
    o.stop();

    assert_eq!(o.lifecycle(), Lifecycle::Suspended);
    assert_eq!(o.effect_timers(), 0);
    assert_eq!(o.live_instances(), 0);
    assert!(!o.renderer().fog);
    // the monitor and escalation keep sampling
    assert_eq!(o.pending_timers(), 2);

    let calls = o.renderer().calls.len();
    run(&mut o, 60_000, 120_000, 250, |_, _| {});
    assert_eq!(o.renderer().calls.len(), calls);
}

#[test]
fn fullscreen_suspends_within_one_monitor_tick() {
    let mut o = started(Settings::default(), FakePage::default(), 9);
    o.advance(500);
    o.page_mut().fullscreen = true;
    o.advance(500 + SAFETY_CHECK_INTERVAL);
    assert_eq!(o.lifecycle(), Lifecycle::Suspended);
    assert_eq!(o.effect_timers(), 0);
    assert_eq!(o.live_instances(), 0);

    o.page_mut().fullscreen = false;
    o.advance(500 + 2 * SAFETY_CHECK_INTERVAL);
    assert_eq!(o.lifecycle(), Lifecycle::Active);
    assert!(o.scheduler(Family::Spider).is_running());
}

#[test]
fn focused_input_suspends_and_blur_resumes() {
    let mut o = started(Settings::default(), FakePage::default(), 10);
    o.page_mut().focused_input = true;
    o.advance(1_000);
    assert_eq!(o.lifecycle(), Lifecycle::Suspended);

    // typing for a while keeps it suspended
    run(&mut o, 1_000, 30_000, 100, |o, _| {
        assert_eq!(o.lifecycle(), Lifecycle::Suspended);
    });

    o.page_mut().focused_input = false;
    o.advance(31_000);
    assert_eq!(o.lifecycle(), Lifecycle::Active);
}

#[test]
fn enable_while_unsafe_waits_for_a_safe_sample() {
    let mut o = started(Settings::default(), FakePage::default(), 11);
    o.handle_message(100, Message::Disable);
    o.page_mut().fullscreen = true;
    o.advance(1_000);

    o.handle_message(1_200, Message::Enable);
    assert_eq!(o.lifecycle(), Lifecycle::Suspended);
    assert!(o.settings().enabled);

    o.page_mut().fullscreen = false;
    o.advance(2_000);
    assert_eq!(o.lifecycle(), Lifecycle::Active);
}

#[test]
fn intensity_escalates_to_the_ceiling_and_holds() {
    let mut o = started(Settings::default(), FakePage::default(), 12);
    assert!(approx(o.effective_settings().intensity, 0.5));

    run(&mut o, 0, 240_000, 1_000, |_, _| {});
    assert!(approx(o.effective_settings().intensity, 0.9));

    run(&mut o, 240_000, 300_000, 1_000, |_, _| {});
    assert!(approx(o.effective_settings().intensity, 1.0));
    assert!(approx(o.scheduler(Family::Ghost).settings().intensity, 1.0));

    run(&mut o, 300_000, 600_000, 1_000, |_, _| {});
    assert!(approx(o.effective_settings().intensity, 1.0));
    assert_eq!(o.time_on_page(), 600_000);
    // the user's own value never moves
    assert!(approx(o.settings().intensity, 0.5));
}

#[test]
fn ghost_only_page_shows_ghosts_and_flickers_only() {
    let settings = Settings {
        ghosts: true,
        ghost_frequency: 1.0,
        ..quiet()
    };
    let mut o = started(settings, FakePage::default(), 13);

    let mut starts = Vec::new();
    let mut seen = 0;
    run(&mut o, 0, 120_000, 10, |o, _| {
        let fired = o.scheduler(Family::Ghost).fired();
        if fired != seen {
            seen = fired;
            let until = o.gate().busy_until().unwrap();
            starts.push(until - GHOST_GATE_MS);
        }
    });

    let r = o.renderer();
    assert_eq!(r.spiders(), 0);
    assert_eq!(r.corruptions(), 0);
    assert!(!r.calls.contains(&Call::FogOn));
    assert_eq!(
        r.count(|c| matches!(
            c,
            Call::Ambient(AmbientEffect::Shadow { .. })
                | Call::Ambient(AmbientEffect::Glitch { .. })
                | Call::Ambient(AmbientEffect::BloodDrip { .. })
        )),
        0
    );

    assert!(starts.len() >= 6, "only {} ghosts", starts.len());
    assert_eq!(r.ghosts(), starts.len());
    for pair in starts.windows(2) {
        assert!(
            pair[1] - pair[0] >= GHOST_GATE_MS,
            "ghosts at {} and {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn major_events_never_overlap_or_crowd() {
    let settings = Settings {
        ghost_frequency: 1.0,
        spider_frequency: 1.0,
        distortion_frequency: 1.0,
        ..Settings::default()
    };
    let mut o = started(settings, FakePage::default(), 14);

    let mut seen = [0u64; 3];
    let mut starts: Vec<(Millis, Family)> = Vec::new();
    run(&mut o, 0, 600_000, 100, |o, _| {
        for family in Family::ALL {
            let fired = o.scheduler(family).fired();
            if fired != seen[family as usize] {
                seen[family as usize] = fired;
                let until = o.gate().busy_until().unwrap();
                starts.push((until - family.gate_window(), family));
            }
        }
    });

    assert!(starts.len() > 10);
    for pair in starts.windows(2) {
        let ((a, fa), (b, fb)) = (pair[0], pair[1]);
        let spacing = fa.gate_window().max(EVENT_COOLDOWN);
        assert!(
            b >= a + spacing,
            "{} at {} then {} at {}",
            fa.name(),
            a,
            fb.name(),
            b
        );
    }
}

#[test]
fn panic_clears_the_page_and_releases_the_gate() {
    let settings = Settings {
        ghosts: true,
        corruption: true,
        ghost_frequency: 1.0,
        distortion_frequency: 1.0,
        ..quiet()
    };
    let mut o = started(settings, FakePage::default(), 15);

    // a live ghost on top of corruption residue
    let mut t = 0;
    while o.live_instances() == 0 || o.renderer().residue == 0 {
        t += 100;
        assert!(t <= 120_000, "no ghost over corrupted page");
        o.advance(t);
    }
    assert!(o.gate().is_active(t));
    assert!(o.renderer().tagged_elements() >= 2);

    let r = o.handle_message(t, Message::Panic);
    assert!(r.success);
    assert_eq!(o.lifecycle(), Lifecycle::Destroyed);
    assert!(!o.settings().enabled);
    assert_eq!(o.live_instances(), 0);
    assert_eq!(o.pending_timers(), 0);
    assert_eq!(o.renderer().tagged_elements(), 0);
    assert_eq!(o.renderer().residue, 0);
    assert!(o.renderer().live.is_empty());
    assert_eq!(o.renderer().calls.last(), Some(&Call::Cleanup));
    assert!(!o.gate().is_active(t));
    assert!(o.gate().can_start(t + EVENT_COOLDOWN));

    let calls = o.renderer().calls.len();
    o.advance(t + 100_000);
    assert_eq!(o.renderer().calls.len(), calls);
}

#[test]
fn corruption_residue_survives_stop_until_panic() {
    let settings = Settings {
        corruption: true,
        distortion_frequency: 1.0,
        ..quiet()
    };
    let mut o = started(settings, FakePage::default(), 16);
    run(&mut o, 0, 30_000, 100, |_, _| {});
    assert!(o.renderer().residue > 0);

    o.stop();
    assert!(o.renderer().residue > 0);

    o.panic();
    assert_eq!(o.renderer().residue, 0);
}

#[test]
fn destroy_tears_down_audio_and_page() {
    let mut o = started(Settings::default(), FakePage::default(), 17);
    o.on_user_interaction();
    o.advance(10_000);
    o.destroy();

    assert_eq!(o.lifecycle(), Lifecycle::Destroyed);
    assert_eq!(o.pending_timers(), 0);
    assert!(!o.audio_ready());
    assert_eq!(o.audio().calls.last(), Some(&Sound::Teardown));
    assert_eq!(o.renderer().calls.last(), Some(&Call::Cleanup));
}

#[test]
fn first_interaction_unlocks_audio_once() {
    let mut o = orchestrator(FakePage::default(), 18);
    o.on_user_interaction();
    assert!(o.audio().calls.is_empty());

    o.init(0, Ok(Settings::default()));
    o.on_user_interaction();
    o.on_user_interaction();
    assert_eq!(
        o.audio().calls,
        vec![Sound::Init, Sound::Volume(0.5), Sound::DroneOn]
    );
    assert!(o.drone_on());
}

#[test]
fn audio_init_failure_retries_on_next_gesture() {
    let audio = RecordingAudio {
        failing_inits: 1,
        ..RecordingAudio::default()
    };
    let mut o = Orchestrator::new(RecordingRenderer::new(), audio, FakePage::default(), 19);
    o.init(0, Ok(Settings::default()));

    o.on_user_interaction();
    assert!(!o.audio_ready());
    assert!(!o.audio().drone_on());
    // effects keep running without sound
    assert_eq!(o.lifecycle(), Lifecycle::Active);

    o.on_user_interaction();
    assert!(o.audio_ready());
    assert!(o.audio().drone_on());
    assert_eq!(o.audio().calls.iter().filter(|s| **s == Sound::Init).count(), 2);
}

#[test]
fn drone_follows_suspension_and_audio_toggle() {
    let mut o = started(Settings::default(), FakePage::default(), 20);
    o.on_user_interaction();
    assert!(o.audio().drone_on());

    o.page_mut().fullscreen = true;
    o.advance(1_000);
    assert!(!o.audio().drone_on());

    o.page_mut().fullscreen = false;
    o.advance(2_000);
    assert!(o.audio().drone_on());

    let patch = SettingsPatch {
        audio: Some(false),
        audio_volume: Some(0.2),
        ..SettingsPatch::default()
    };
    o.handle_message(2_500, Message::UpdateSettings { settings: patch });
    assert!(!o.audio().drone_on());
    assert!(o.audio().calls.contains(&Sound::Volume(0.2)));
    let drone_events = o
        .audio()
        .calls
        .iter()
        .filter(|s| matches!(s, Sound::DroneOn | Sound::DroneOff))
        .count();
    assert_eq!(drone_events, 4);

    o.handle_message(2_600, Message::Disable);
    let after = o
        .audio()
        .calls
        .iter()
        .filter(|s| matches!(s, Sound::DroneOn | Sound::DroneOff))
        .count();
    assert_eq!(after, drone_events);
}

#[test]
fn cues_stay_silent_until_audio_is_ready() {
    let settings = Settings {
        ghosts: true,
        spiders: true,
        audio: true,
        ghost_frequency: 1.0,
        spider_frequency: 1.0,
        ..quiet()
    };
    let mut o = started(settings, FakePage::default(), 21);
    run(&mut o, 0, 120_000, 100, |_, _| {});
    assert!(o.renderer().ghosts() > 0);
    assert!(o.audio().calls.is_empty());
}

#[test]
fn audio_toggle_off_silences_cues_too() {
    let settings = Settings {
        ghosts: true,
        spiders: true,
        audio: false,
        ghost_frequency: 1.0,
        spider_frequency: 1.0,
        ..quiet()
    };
    let mut o = started(settings, FakePage::default(), 22);
    o.on_user_interaction();
    assert!(o.audio_ready());
    run(&mut o, 0, 300_000, 100, |_, _| {});

    assert!(o.renderer().ghosts() > 0 && o.renderer().spiders() > 0);
    assert!(!o.audio().drone_on());
    let cues = o.audio().calls.iter().filter(|s| matches!(s, Sound::Cue(_))).count();
    assert_eq!(cues, 0);

    // switching sound back on brings the cues with it
    o.handle_message(
        300_000,
        Message::UpdateSettings {
            settings: SettingsPatch {
                audio: Some(true),
                ..SettingsPatch::default()
            },
        },
    );
    run(&mut o, 300_000, 600_000, 100, |_, _| {});
    assert!(o.audio().calls.iter().any(|s| matches!(s, Sound::Cue(_))));
}

#[test]
fn gesture_is_wanted_until_audio_unlocks() {
    let audio = RecordingAudio {
        failing_inits: 1,
        ..RecordingAudio::default()
    };
    let mut o = Orchestrator::new(RecordingRenderer::new(), audio, FakePage::default(), 23);
    assert!(!o.wants_gesture());

    o.init(0, Ok(Settings::default()));
    assert!(o.wants_gesture());

    // a failed unlock keeps listening
    o.on_user_interaction();
    assert!(o.wants_gesture());

    o.on_user_interaction();
    assert!(!o.wants_gesture());

    let inert = started(
        Settings::default(),
        FakePage {
            host: "mybank-login.com".into(),
            ..FakePage::default()
        },
        23,
    );
    assert!(!inert.wants_gesture());

    let mut gone = started(Settings::default(), FakePage::default(), 23);
    gone.handle_message(10, Message::Panic);
    assert!(!gone.wants_gesture());
}
