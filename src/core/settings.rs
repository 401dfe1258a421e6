//! User-facing settings record.
//!
//! `Settings` mirrors the flat key-value record kept in extension storage.
//! Values are never edited in place once shared: updates build a new snapshot
//! and schedulers swap their `Rc<Settings>` pointer, so a tick never observes
//! half of an update.

use super::constants::{NIGHT_BOOST, NIGHT_END_HOUR, NIGHT_START_HOUR, UNSAFE_DOMAINS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub enabled: bool,
    pub intensity: f32,
    pub ghost_frequency: f32,
    pub spider_frequency: f32,
    pub distortion_frequency: f32,
    pub audio_volume: f32,
    pub night_mode_aggression: bool,

    pub ghosts: bool,
    pub spiders: bool,
    pub fog: bool,
    pub audio: bool,
    pub glitches: bool,
    pub corruption: bool,
    pub shadows: bool,
    pub blood: bool,

    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 0.5,
            ghost_frequency: 0.3,
            spider_frequency: 0.2,
            distortion_frequency: 0.4,
            audio_volume: 0.5,
            night_mode_aggression: true,
            ghosts: true,
            spiders: true,
            fog: true,
            audio: true,
            glitches: true,
            corruption: true,
            shadows: true,
            blood: true,
            whitelist: Vec::new(),
            blacklist: Vec::new(),
        }
    }
}

/// Partial update as sent by the popup: only present keys change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghost_frequency: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spider_frequency: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distortion_frequency: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_volume: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night_mode_aggression: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghosts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spiders: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glitches: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corruption: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadows: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<Vec<String>>,
}

impl SettingsPatch {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }
}

#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl Settings {
    /// Copy with every frequency/intensity/volume field forced into [0, 1].
    pub fn clamped(&self) -> Self {
        Self {
            intensity: unit(self.intensity),
            ghost_frequency: unit(self.ghost_frequency),
            spider_frequency: unit(self.spider_frequency),
            distortion_frequency: unit(self.distortion_frequency),
            audio_volume: unit(self.audio_volume),
            ..self.clone()
        }
    }

    /// New snapshot with the patch applied on top of `self`, clamped.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        let p = patch.clone();
        Self {
            enabled: p.enabled.unwrap_or(self.enabled),
            intensity: p.intensity.unwrap_or(self.intensity),
            ghost_frequency: p.ghost_frequency.unwrap_or(self.ghost_frequency),
            spider_frequency: p.spider_frequency.unwrap_or(self.spider_frequency),
            distortion_frequency: p.distortion_frequency.unwrap_or(self.distortion_frequency),
            audio_volume: p.audio_volume.unwrap_or(self.audio_volume),
            night_mode_aggression: p.night_mode_aggression.unwrap_or(self.night_mode_aggression),
            ghosts: p.ghosts.unwrap_or(self.ghosts),
            spiders: p.spiders.unwrap_or(self.spiders),
            fog: p.fog.unwrap_or(self.fog),
            audio: p.audio.unwrap_or(self.audio),
            glitches: p.glitches.unwrap_or(self.glitches),
            corruption: p.corruption.unwrap_or(self.corruption),
            shadows: p.shadows.unwrap_or(self.shadows),
            blood: p.blood.unwrap_or(self.blood),
            whitelist: p.whitelist.unwrap_or_else(|| self.whitelist.clone()),
            blacklist: p.blacklist.unwrap_or_else(|| self.blacklist.clone()),
        }
        .clamped()
    }

    /// Apply the night-time cadence boost if enabled and `hour` is at night.
    /// Only the three scheduling frequencies change.
    pub fn with_night_boost(&self, hour: u32) -> Self {
        if !(self.night_mode_aggression && is_night_hour(hour)) {
            return self.clone();
        }
        Self {
            ghost_frequency: (self.ghost_frequency * NIGHT_BOOST).min(1.0),
            spider_frequency: (self.spider_frequency * NIGHT_BOOST).min(1.0),
            distortion_frequency: (self.distortion_frequency * NIGHT_BOOST).min(1.0),
            ..self.clone()
        }
    }

    pub fn with_intensity(&self, intensity: f32) -> Self {
        Self {
            intensity,
            ..self.clone()
        }
    }

    /// Whether this host must never be haunted: the user's whitelist and
    /// blacklist plus the built-in sensitive-domain fragments.
    pub fn blocks_host(&self, hostname: &str) -> bool {
        let host = hostname.to_ascii_lowercase();
        let listed = |entries: &[String]| {
            entries
                .iter()
                .map(|s| s.trim().to_ascii_lowercase())
                .any(|s| !s.is_empty() && host.contains(&s))
        };
        listed(&self.whitelist)
            || listed(&self.blacklist)
            || UNSAFE_DOMAINS.iter().any(|d| host.contains(d))
    }
}

/// Night covers [19:00, 24:00) and [00:00, 06:00) local time.
#[inline]
pub fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"ghosts":false,"ghostFrequency":0.9}"#).unwrap();
        assert!(!s.ghosts);
        assert_eq!(s.ghost_frequency, 0.9);
        assert_eq!(s.spider_frequency, Settings::default().spider_frequency);
        assert!(s.enabled);
    }

    #[test]
    fn merge_clamps_and_keeps_untouched_fields() {
        let base = Settings::default();
        let patch = SettingsPatch {
            intensity: Some(3.0),
            spider_frequency: Some(-1.0),
            blacklist: Some(vec!["example".into()]),
            ..SettingsPatch::default()
        };
        let next = base.merged(&patch);
        assert_eq!(next.intensity, 1.0);
        assert_eq!(next.spider_frequency, 0.0);
        assert_eq!(next.ghost_frequency, base.ghost_frequency);
        assert_eq!(next.blacklist, vec!["example".to_string()]);
        // base untouched
        assert_eq!(base.intensity, 0.5);
    }

    #[test]
    fn night_boost_applies_only_at_night_and_caps_at_one() {
        let s = Settings {
            ghost_frequency: 0.8,
            spider_frequency: 0.2,
            ..Settings::default()
        };
        let day = s.with_night_boost(12);
        assert_eq!(day, s);
        let night = s.with_night_boost(23);
        assert_eq!(night.ghost_frequency, 1.0);
        assert!((night.spider_frequency - 0.3).abs() < 1e-6);
        assert_eq!(night.intensity, s.intensity);

        let off = Settings {
            night_mode_aggression: false,
            ..s.clone()
        };
        assert_eq!(off.with_night_boost(2), off);
    }

    #[test]
    fn night_hours_wrap_midnight() {
        assert!(is_night_hour(19));
        assert!(is_night_hour(0));
        assert!(is_night_hour(5));
        assert!(!is_night_hour(6));
        assert!(!is_night_hour(18));
    }

    #[test]
    fn blocks_sensitive_and_listed_hosts() {
        let s = Settings {
            whitelist: vec!["quiet.example".into()],
            blacklist: vec!["news".into()],
            ..Settings::default()
        };
        assert!(s.blocks_host("mybank-login.com"));
        assert!(s.blocks_host("WWW.PAYPAL.COM"));
        assert!(s.blocks_host("docs.quiet.example"));
        assert!(s.blocks_host("news.site.org"));
        assert!(!s.blocks_host("spooky.example.org"));
    }
}
