use std::fmt;

/// Which note list a note belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Pitched,
    Unpitched,
}

/// Position of a note: 0-based chord row and note row. Messages show them
/// 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotePosition {
    pub chord: usize,
    pub kind: NoteKind,
    pub note: usize,
}

impl fmt::Display for NotePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            NoteKind::Pitched => "pitched note",
            NoteKind::Unpitched => "unpitched note",
        };
        write!(f, "chord {}, {} {}", self.chord + 1, kind, self.note + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Instrument,
    PercussionSet,
    PercussionInstrument,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferenceKind::Instrument => "instrument",
            ReferenceKind::PercussionSet => "percussion set",
            ReferenceKind::PercussionInstrument => "percussion instrument",
        })
    }
}

/// A non-fatal problem found while scheduling. Playback continues; the
/// note is dropped, substituted or clamped as described.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackWarning {
    /// Every channel was busy; the note was skipped.
    OutOfChannels(NotePosition),
    /// Neither the note nor any earlier chord named one; `substitute` was used.
    MissingReference {
        position: NotePosition,
        kind: ReferenceKind,
        substitute: &'static str,
    },
    VelocityClamped {
        position: NotePosition,
        velocity: f64,
    },
    /// The note is outside the MIDI key range; it was skipped.
    PitchOutOfRange {
        position: NotePosition,
        midi: f64,
    },
    /// The note would end past the pass time limit; it was skipped.
    DurationOutOfRange {
        position: NotePosition,
        end_time: f64,
    },
    /// The chord starts past the pass time limit; it and every later chord
    /// were skipped.
    PassTooLong { chord: usize },
}

impl PlaybackWarning {
    /// The note concerned, if the warning is about a single note.
    pub fn position(&self) -> Option<NotePosition> {
        match self {
            PlaybackWarning::OutOfChannels(position)
            | PlaybackWarning::MissingReference { position, .. }
            | PlaybackWarning::VelocityClamped { position, .. }
            | PlaybackWarning::PitchOutOfRange { position, .. }
            | PlaybackWarning::DurationOutOfRange { position, .. } => Some(*position),
            PlaybackWarning::PassTooLong { .. } => None,
        }
    }
}

impl fmt::Display for PlaybackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackWarning::OutOfChannels(position) => {
                write!(f, "out of channels for {}", position)
            }
            PlaybackWarning::MissingReference {
                position,
                kind,
                substitute,
            } => write!(f, "no {} for {}; using {}", kind, position, substitute),
            PlaybackWarning::VelocityClamped { position, velocity } => write!(
                f,
                "velocity {:.0} exceeds 127 for {}; playing at 127",
                velocity, position
            ),
            PlaybackWarning::PitchOutOfRange { position, midi } => {
                write!(f, "MIDI key {:.1} is out of range for {}", midi, position)
            }
            PlaybackWarning::DurationOutOfRange { position, end_time } => write!(
                f,
                "{} would end at {:.0} ms, past the playback limit; skipped",
                position, end_time
            ),
            PlaybackWarning::PassTooLong { chord } => write!(
                f,
                "chord {} starts past the playback limit; stopping there",
                chord + 1
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_one_based() {
        let position = NotePosition {
            chord: 1,
            kind: NoteKind::Unpitched,
            note: 0,
        };
        assert_eq!(
            PlaybackWarning::OutOfChannels(position).to_string(),
            "out of channels for chord 2, unpitched note 1"
        );
        let warning = PlaybackWarning::MissingReference {
            position,
            kind: ReferenceKind::PercussionSet,
            substitute: "Standard",
        };
        assert_eq!(
            warning.to_string(),
            "no percussion set for chord 2, unpitched note 1; using Standard"
        );
    }
}
