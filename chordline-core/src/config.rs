use std::path::{Path, PathBuf};

use chordline_types::PitchClass;
use serde::Deserialize;

use crate::editor::EditorSettings;
use crate::geometry::Geometry;
use crate::viewport::clamp_zoom;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    layout: LayoutConfig,
    #[serde(default)]
    history: HistoryConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    bpm: Option<u16>,
    key: Option<String>,
    octave: Option<i32>,
    repeat: Option<bool>,
}

#[derive(Deserialize, Default)]
struct LayoutConfig {
    beat_width: Option<f64>,
    track_height: Option<f64>,
    header_height: Option<f64>,
    timeline_beats: Option<u32>,
    max_canvas_width: Option<f64>,
}

#[derive(Deserialize, Default)]
struct HistoryConfig {
    max_depth: Option<usize>,
}

pub struct Config {
    defaults: DefaultsConfig,
    layout: LayoutConfig,
    history: HistoryConfig,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    pub fn load_from(user_path: Option<&Path>) -> Self {
        let mut base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::warn!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        });

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_defaults(&mut base.defaults, user.defaults);
                            merge_layout(&mut base.layout, user.layout);
                            merge_history(&mut base.history, user.history);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            defaults: base.defaults,
            layout: base.layout,
            history: base.history,
        }
    }

    pub fn editor_settings(&self) -> EditorSettings {
        let fallback = EditorSettings::default();
        let fallback_geo = fallback.geometry;
        EditorSettings {
            bpm: self.defaults.bpm.filter(|b| *b > 0).unwrap_or(fallback.bpm),
            key: self
                .defaults
                .key
                .as_deref()
                .and_then(PitchClass::parse)
                .unwrap_or(fallback.key),
            octave: self.defaults.octave.map(|o| o.clamp(0, 8)).unwrap_or(fallback.octave),
            repeat: self.defaults.repeat.unwrap_or(fallback.repeat),
            geometry: Geometry {
                beat_width: self
                    .layout
                    .beat_width
                    .map(clamp_zoom)
                    .unwrap_or(fallback_geo.beat_width),
                track_height: self
                    .layout
                    .track_height
                    .map(clamp_zoom)
                    .unwrap_or(fallback_geo.track_height),
                header_height: self
                    .layout
                    .header_height
                    .filter(|h| h.is_finite() && *h >= 0.0)
                    .unwrap_or(fallback_geo.header_height),
            },
            timeline_beats: self
                .layout
                .timeline_beats
                .filter(|b| *b > 0)
                .unwrap_or(fallback.timeline_beats),
            max_canvas_width: self
                .layout
                .max_canvas_width
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(fallback.max_canvas_width),
            history_depth: self
                .history
                .max_depth
                .unwrap_or(fallback.history_depth)
                .max(1),
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chordline").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.bpm.is_some() {
        base.bpm = user.bpm;
    }
    if user.key.is_some() {
        base.key = user.key;
    }
    if user.octave.is_some() {
        base.octave = user.octave;
    }
    if user.repeat.is_some() {
        base.repeat = user.repeat;
    }
}

fn merge_layout(base: &mut LayoutConfig, user: LayoutConfig) {
    if user.beat_width.is_some() {
        base.beat_width = user.beat_width;
    }
    if user.track_height.is_some() {
        base.track_height = user.track_height;
    }
    if user.header_height.is_some() {
        base.header_height = user.header_height;
    }
    if user.timeline_beats.is_some() {
        base.timeline_beats = user.timeline_beats;
    }
    if user.max_canvas_width.is_some() {
        base.max_canvas_width = user.max_canvas_width;
    }
}

fn merge_history(base: &mut HistoryConfig, user: HistoryConfig) {
    if user.max_depth.is_some() {
        base.max_depth = user.max_depth;
    }
}
