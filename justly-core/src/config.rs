use std::path::{Path, PathBuf};

use serde::Deserialize;

use justly_types::{Song, SongParameter};

use crate::state::undo::DEFAULT_UNDO_DEPTH;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    editor: EditorConfig,
    #[serde(default)]
    playback: PlaybackConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    starting_key: Option<f64>,
    starting_velocity: Option<f64>,
    starting_tempo: Option<f64>,
    gain: Option<f64>,
}

#[derive(Deserialize, Default)]
struct EditorConfig {
    undo_depth: Option<usize>,
}

#[derive(Deserialize, Default)]
struct PlaybackConfig {
    midi_port: Option<String>,
}

pub struct Config {
    defaults: DefaultsConfig,
    editor: EditorConfig,
    playback: PlaybackConfig,
}

impl Config {
    /// Embedded defaults merged with `<config_dir>/justly/config.toml`.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Embedded defaults merged with the file at `path`, if it exists. A
    /// malformed or unreadable file is logged and ignored.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_defaults(&mut base.defaults, user.defaults);
                            merge_editor(&mut base.editor, user.editor);
                            merge_playback(&mut base.playback, user.playback);
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
            editor: base.editor,
            playback: base.playback,
        }
    }

    /// Blank song carrying the configured starting values, clamped into range.
    pub fn new_song(&self) -> Song {
        let mut song = Song::new();
        let values = [
            (SongParameter::StartingKey, self.defaults.starting_key),
            (SongParameter::StartingVelocity, self.defaults.starting_velocity),
            (SongParameter::StartingTempo, self.defaults.starting_tempo),
            (SongParameter::Gain, self.defaults.gain),
        ];
        for (parameter, value) in values {
            if let Some(value) = value {
                song.set_parameter(parameter, value);
            }
        }
        song
    }

    /// Undo depth (clamped to 1..=100000).
    pub fn undo_depth(&self) -> usize {
        self.editor
            .undo_depth
            .unwrap_or(DEFAULT_UNDO_DEPTH)
            .clamp(1, 100_000)
    }

    pub fn midi_port(&self) -> Option<&str> {
        self.playback.midi_port.as_deref()
    }
}

pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("justly"))
}

fn user_config_path() -> Option<PathBuf> {
    user_config_dir().map(|d| d.join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.starting_key.is_some() {
        base.starting_key = user.starting_key;
    }
    if user.starting_velocity.is_some() {
        base.starting_velocity = user.starting_velocity;
    }
    if user.starting_tempo.is_some() {
        base.starting_tempo = user.starting_tempo;
    }
    if user.gain.is_some() {
        base.gain = user.gain;
    }
}

fn merge_editor(base: &mut EditorConfig, user: EditorConfig) {
    if user.undo_depth.is_some() {
        base.undo_depth = user.undo_depth;
    }
}

fn merge_playback(base: &mut PlaybackConfig, user: PlaybackConfig) {
    if user.midi_port.is_some() {
        base.midi_port = user.midi_port;
    }
}
