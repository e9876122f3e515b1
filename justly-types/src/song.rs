//! The score tree: a song of chords, each holding pitched and unpitched notes.

use serde::{Deserialize, Serialize};

use crate::catalog::{InstrumentRef, PercussionInstrumentRef, PercussionSetRef};
use crate::interval::Interval;
use crate::rational::Rational;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitchedNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<InstrumentRef>,
    #[serde(default, skip_serializing_if = "Interval::is_default")]
    pub interval: Interval,
    #[serde(default, skip_serializing_if = "Rational::is_default")]
    pub beats: Rational,
    #[serde(default, skip_serializing_if = "Rational::is_default")]
    pub velocity_ratio: Rational,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub words: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnpitchedNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percussion_set: Option<PercussionSetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percussion_instrument: Option<PercussionInstrumentRef>,
    #[serde(default, skip_serializing_if = "Rational::is_default")]
    pub beats: Rational,
    #[serde(default, skip_serializing_if = "Rational::is_default")]
    pub velocity_ratio: Rational,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub words: String,
}

/// A timed group of simultaneous notes. The chord's own interval, velocity
/// and tempo ratios modulate the running state before its notes play, and
/// its catalog references become the fallback for notes that name none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<InstrumentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percussion_set: Option<PercussionSetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percussion_instrument: Option<PercussionInstrumentRef>,
    #[serde(default, skip_serializing_if = "Interval::is_default")]
    pub interval: Interval,
    #[serde(default, skip_serializing_if = "Rational::is_default")]
    pub beats: Rational,
    #[serde(default, skip_serializing_if = "Rational::is_default")]
    pub velocity_ratio: Rational,
    #[serde(default, skip_serializing_if = "Rational::is_default")]
    pub tempo_ratio: Rational,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub words: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pitched_notes: Vec<PitchedNote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unpitched_notes: Vec<UnpitchedNote>,
}

pub const DEFAULT_STARTING_KEY: f64 = 220.0;
pub const MIN_STARTING_KEY: f64 = 60.0;
pub const MAX_STARTING_KEY: f64 = 440.0;

pub const DEFAULT_STARTING_VELOCITY: f64 = 10.0;
pub const MIN_STARTING_VELOCITY: f64 = 0.0;
pub const MAX_STARTING_VELOCITY: f64 = 127.0;

pub const DEFAULT_STARTING_TEMPO: f64 = 100.0;
pub const MIN_STARTING_TEMPO: f64 = 25.0;
pub const MAX_STARTING_TEMPO: f64 = 200.0;

pub const DEFAULT_GAIN: f64 = 5.0;
pub const MIN_GAIN: f64 = 0.0;
pub const MAX_GAIN: f64 = 10.0;

fn default_gain() -> f64 {
    DEFAULT_GAIN
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Song {
    #[serde(default = "default_gain")]
    pub gain: f64,
    pub starting_key: f64,
    pub starting_velocity: f64,
    pub starting_tempo: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_instrument: Option<InstrumentRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chords: Vec<Chord>,
}

impl Song {
    pub fn new() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            starting_key: DEFAULT_STARTING_KEY,
            starting_velocity: DEFAULT_STARTING_VELOCITY,
            starting_tempo: DEFAULT_STARTING_TEMPO,
            starting_instrument: None,
            chords: Vec::new(),
        }
    }

    pub fn parameter(&self, parameter: SongParameter) -> f64 {
        match parameter {
            SongParameter::Gain => self.gain,
            SongParameter::StartingKey => self.starting_key,
            SongParameter::StartingVelocity => self.starting_velocity,
            SongParameter::StartingTempo => self.starting_tempo,
        }
    }

    /// Set a song-level scalar, clamped into its range.
    pub fn set_parameter(&mut self, parameter: SongParameter, value: f64) {
        let value = parameter.clamp(value);
        match parameter {
            SongParameter::Gain => self.gain = value,
            SongParameter::StartingKey => self.starting_key = value,
            SongParameter::StartingVelocity => self.starting_velocity = value,
            SongParameter::StartingTempo => self.starting_tempo = value,
        }
    }
}

impl Default for Song {
    fn default() -> Self {
        Self::new()
    }
}

/// Song-level continuous controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SongParameter {
    Gain,
    StartingKey,
    StartingVelocity,
    StartingTempo,
}

impl SongParameter {
    pub const ALL: [SongParameter; 4] = [
        SongParameter::Gain,
        SongParameter::StartingKey,
        SongParameter::StartingVelocity,
        SongParameter::StartingTempo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SongParameter::Gain => "gain",
            SongParameter::StartingKey => "starting key",
            SongParameter::StartingVelocity => "starting velocity",
            SongParameter::StartingTempo => "starting tempo",
        }
    }

    pub fn range(self) -> (f64, f64) {
        match self {
            SongParameter::Gain => (MIN_GAIN, MAX_GAIN),
            SongParameter::StartingKey => (MIN_STARTING_KEY, MAX_STARTING_KEY),
            SongParameter::StartingVelocity => (MIN_STARTING_VELOCITY, MAX_STARTING_VELOCITY),
            SongParameter::StartingTempo => (MIN_STARTING_TEMPO, MAX_STARTING_TEMPO),
        }
    }

    pub fn default_value(self) -> f64 {
        match self {
            SongParameter::Gain => DEFAULT_GAIN,
            SongParameter::StartingKey => DEFAULT_STARTING_KEY,
            SongParameter::StartingVelocity => DEFAULT_STARTING_VELOCITY,
            SongParameter::StartingTempo => DEFAULT_STARTING_TEMPO,
        }
    }

    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.range();
        if value.is_nan() {
            return self.default_value();
        }
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_song_values() {
        let song = Song::new();
        assert_eq!(song.starting_key, 220.0);
        assert_eq!(song.starting_velocity, 10.0);
        assert_eq!(song.starting_tempo, 100.0);
        assert_eq!(song.gain, 5.0);
        assert!(song.chords.is_empty());
    }

    #[test]
    fn set_parameter_clamps() {
        let mut song = Song::new();
        song.set_parameter(SongParameter::StartingTempo, 1000.0);
        assert_eq!(song.starting_tempo, MAX_STARTING_TEMPO);
        song.set_parameter(SongParameter::Gain, -1.0);
        assert_eq!(song.gain, MIN_GAIN);
        song.set_parameter(SongParameter::StartingKey, f64::NAN);
        assert_eq!(song.starting_key, DEFAULT_STARTING_KEY);
    }

    #[test]
    fn default_heavy_chord_serializes_compactly() {
        let chord = Chord {
            pitched_notes: vec![PitchedNote::default()],
            ..Chord::default()
        };
        let json = serde_json::to_string(&chord).unwrap();
        assert_eq!(json, r#"{"pitched_notes":[{}]}"#);
        let back: Chord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chord);
    }

    #[test]
    fn song_requires_starting_values() {
        assert!(serde_json::from_str::<Song>(r#"{"starting_key":220}"#).is_err());
        let song: Song = serde_json::from_str(
            r#"{"starting_key":220,"starting_velocity":10,"starting_tempo":100}"#,
        )
        .unwrap();
        assert_eq!(song.gain, DEFAULT_GAIN);
    }
}
