use crate::catalog::InstrumentRef;
use crate::song::{Chord, Song};

/// Read-only access to a score, shared by the editor document and plain
/// [`Song`] values so playback does not depend on how the score is stored.
pub trait ScoreView {
    fn starting_key(&self) -> f64;
    fn starting_velocity(&self) -> f64;
    fn starting_tempo(&self) -> f64;
    fn gain(&self) -> f64;
    fn starting_instrument(&self) -> Option<InstrumentRef>;
    fn chord_count(&self) -> usize;
    fn chord(&self, row: usize) -> Option<&Chord>;
}

impl ScoreView for Song {
    fn starting_key(&self) -> f64 {
        self.starting_key
    }

    fn starting_velocity(&self) -> f64 {
        self.starting_velocity
    }

    fn starting_tempo(&self) -> f64 {
        self.starting_tempo
    }

    fn gain(&self) -> f64 {
        self.gain
    }

    fn starting_instrument(&self) -> Option<InstrumentRef> {
        self.starting_instrument
    }

    fn chord_count(&self) -> usize {
        self.chords.len()
    }

    fn chord(&self, row: usize) -> Option<&Chord> {
        self.chords.get(row)
    }
}
