//! Per-row column enumerations and typed cell access.
//!
//! Rows are a closed set: chords, pitched notes and unpitched notes. Each
//! kind has a fixed, ordered column list; a column range such as
//! `instrument..=velocity_ratio` is a contiguous slice of that list.

use serde::{Deserialize, Serialize};

use crate::catalog::{InstrumentRef, PercussionInstrumentRef, PercussionSetRef};
use crate::interval::Interval;
use crate::rational::Rational;
use crate::song::{Chord, PitchedNote, UnpitchedNote};
use crate::ValueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    Chord,
    PitchedNote,
    UnpitchedNote,
}

impl RowKind {
    pub fn column_count(self) -> usize {
        self.column_names().len()
    }

    pub fn column_names(self) -> &'static [&'static str] {
        match self {
            RowKind::Chord => &CHORD_COLUMNS,
            RowKind::PitchedNote => &PITCHED_NOTE_COLUMNS,
            RowKind::UnpitchedNote => &UNPITCHED_NOTE_COLUMNS,
        }
    }

    pub fn column_name(self, column: usize) -> Option<&'static str> {
        self.column_names().get(column).copied()
    }

    /// Plural name used in messages ("cannot paste chords as pitched notes").
    pub fn plural_name(self) -> &'static str {
        match self {
            RowKind::Chord => "chords",
            RowKind::PitchedNote => "pitched notes",
            RowKind::UnpitchedNote => "unpitched notes",
        }
    }
}

pub const CHORD_INSTRUMENT_COLUMN: usize = 0;
pub const CHORD_PERCUSSION_SET_COLUMN: usize = 1;
pub const CHORD_PERCUSSION_INSTRUMENT_COLUMN: usize = 2;
pub const CHORD_INTERVAL_COLUMN: usize = 3;
pub const CHORD_BEATS_COLUMN: usize = 4;
pub const CHORD_VELOCITY_RATIO_COLUMN: usize = 5;
pub const CHORD_TEMPO_RATIO_COLUMN: usize = 6;
pub const CHORD_WORDS_COLUMN: usize = 7;

const CHORD_COLUMNS: [&str; 8] = [
    "instrument",
    "percussion_set",
    "percussion_instrument",
    "interval",
    "beats",
    "velocity_ratio",
    "tempo_ratio",
    "words",
];

pub const PITCHED_NOTE_INSTRUMENT_COLUMN: usize = 0;
pub const PITCHED_NOTE_INTERVAL_COLUMN: usize = 1;
pub const PITCHED_NOTE_BEATS_COLUMN: usize = 2;
pub const PITCHED_NOTE_VELOCITY_RATIO_COLUMN: usize = 3;
pub const PITCHED_NOTE_WORDS_COLUMN: usize = 4;

const PITCHED_NOTE_COLUMNS: [&str; 5] = ["instrument", "interval", "beats", "velocity_ratio", "words"];

pub const UNPITCHED_NOTE_PERCUSSION_SET_COLUMN: usize = 0;
pub const UNPITCHED_NOTE_PERCUSSION_INSTRUMENT_COLUMN: usize = 1;
pub const UNPITCHED_NOTE_BEATS_COLUMN: usize = 2;
pub const UNPITCHED_NOTE_VELOCITY_RATIO_COLUMN: usize = 3;
pub const UNPITCHED_NOTE_WORDS_COLUMN: usize = 4;

const UNPITCHED_NOTE_COLUMNS: [&str; 5] = [
    "percussion_set",
    "percussion_instrument",
    "beats",
    "velocity_ratio",
    "words",
];

/// The typed value held by one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Instrument(Option<InstrumentRef>),
    PercussionSet(Option<PercussionSetRef>),
    PercussionInstrument(Option<PercussionInstrumentRef>),
    Interval(Interval),
    Rational(Rational),
    Words(String),
}

impl CellValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Instrument(_) => "an instrument",
            CellValue::PercussionSet(_) => "a percussion set",
            CellValue::PercussionInstrument(_) => "a percussion instrument",
            CellValue::Interval(_) => "an interval",
            CellValue::Rational(_) => "a rational",
            CellValue::Words(_) => "words",
        }
    }
}

/// A row of the score with column-addressed cells.
pub trait Row: Clone + Default + PartialEq + std::fmt::Debug {
    const KIND: RowKind;

    fn cell(&self, column: usize) -> Result<CellValue, ValueError>;

    /// Store `value` in `column`. The value must already be in range; only
    /// its type is checked here.
    fn set_cell(&mut self, column: usize, value: CellValue) -> Result<(), ValueError>;

    /// Copy columns `left..=right` of `source` into `self`.
    fn copy_columns_from(&mut self, source: &Self, left: usize, right: usize) -> Result<(), ValueError> {
        for column in left..=right {
            self.set_cell(column, source.cell(column)?)?;
        }
        Ok(())
    }
}

fn no_such_column(kind: RowKind, column: usize) -> ValueError {
    ValueError::NoSuchColumn {
        kind: kind.plural_name(),
        column,
    }
}

fn wrong_type(kind: RowKind, column: usize, expected: &'static str) -> ValueError {
    ValueError::WrongCellType {
        column: kind.column_name(column).unwrap_or("?"),
        expected,
    }
}

impl Row for Chord {
    const KIND: RowKind = RowKind::Chord;

    fn cell(&self, column: usize) -> Result<CellValue, ValueError> {
        Ok(match column {
            CHORD_INSTRUMENT_COLUMN => CellValue::Instrument(self.instrument),
            CHORD_PERCUSSION_SET_COLUMN => CellValue::PercussionSet(self.percussion_set),
            CHORD_PERCUSSION_INSTRUMENT_COLUMN => {
                CellValue::PercussionInstrument(self.percussion_instrument)
            }
            CHORD_INTERVAL_COLUMN => CellValue::Interval(self.interval),
            CHORD_BEATS_COLUMN => CellValue::Rational(self.beats),
            CHORD_VELOCITY_RATIO_COLUMN => CellValue::Rational(self.velocity_ratio),
            CHORD_TEMPO_RATIO_COLUMN => CellValue::Rational(self.tempo_ratio),
            CHORD_WORDS_COLUMN => CellValue::Words(self.words.clone()),
            _ => return Err(no_such_column(Self::KIND, column)),
        })
    }

    fn set_cell(&mut self, column: usize, value: CellValue) -> Result<(), ValueError> {
        match (column, value) {
            (CHORD_INSTRUMENT_COLUMN, CellValue::Instrument(v)) => self.instrument = v,
            (CHORD_PERCUSSION_SET_COLUMN, CellValue::PercussionSet(v)) => self.percussion_set = v,
            (CHORD_PERCUSSION_INSTRUMENT_COLUMN, CellValue::PercussionInstrument(v)) => {
                self.percussion_instrument = v
            }
            (CHORD_INTERVAL_COLUMN, CellValue::Interval(v)) => self.interval = v,
            (CHORD_BEATS_COLUMN, CellValue::Rational(v)) => self.beats = v,
            (CHORD_VELOCITY_RATIO_COLUMN, CellValue::Rational(v)) => self.velocity_ratio = v,
            (CHORD_TEMPO_RATIO_COLUMN, CellValue::Rational(v)) => self.tempo_ratio = v,
            (CHORD_WORDS_COLUMN, CellValue::Words(v)) => self.words = v,
            (column, _) if column >= Self::KIND.column_count() => {
                return Err(no_such_column(Self::KIND, column))
            }
            (column, _) => {
                let expected = Chord::default().cell(column)?.type_name();
                return Err(wrong_type(Self::KIND, column, expected));
            }
        }
        Ok(())
    }
}

impl Row for PitchedNote {
    const KIND: RowKind = RowKind::PitchedNote;

    fn cell(&self, column: usize) -> Result<CellValue, ValueError> {
        Ok(match column {
            PITCHED_NOTE_INSTRUMENT_COLUMN => CellValue::Instrument(self.instrument),
            PITCHED_NOTE_INTERVAL_COLUMN => CellValue::Interval(self.interval),
            PITCHED_NOTE_BEATS_COLUMN => CellValue::Rational(self.beats),
            PITCHED_NOTE_VELOCITY_RATIO_COLUMN => CellValue::Rational(self.velocity_ratio),
            PITCHED_NOTE_WORDS_COLUMN => CellValue::Words(self.words.clone()),
            _ => return Err(no_such_column(Self::KIND, column)),
        })
    }

    fn set_cell(&mut self, column: usize, value: CellValue) -> Result<(), ValueError> {
        match (column, value) {
            (PITCHED_NOTE_INSTRUMENT_COLUMN, CellValue::Instrument(v)) => self.instrument = v,
            (PITCHED_NOTE_INTERVAL_COLUMN, CellValue::Interval(v)) => self.interval = v,
            (PITCHED_NOTE_BEATS_COLUMN, CellValue::Rational(v)) => self.beats = v,
            (PITCHED_NOTE_VELOCITY_RATIO_COLUMN, CellValue::Rational(v)) => self.velocity_ratio = v,
            (PITCHED_NOTE_WORDS_COLUMN, CellValue::Words(v)) => self.words = v,
            (column, _) if column >= Self::KIND.column_count() => {
                return Err(no_such_column(Self::KIND, column))
            }
            (column, _) => {
                let expected = PitchedNote::default().cell(column)?.type_name();
                return Err(wrong_type(Self::KIND, column, expected));
            }
        }
        Ok(())
    }
}

impl Row for UnpitchedNote {
    const KIND: RowKind = RowKind::UnpitchedNote;

    fn cell(&self, column: usize) -> Result<CellValue, ValueError> {
        Ok(match column {
            UNPITCHED_NOTE_PERCUSSION_SET_COLUMN => CellValue::PercussionSet(self.percussion_set),
            UNPITCHED_NOTE_PERCUSSION_INSTRUMENT_COLUMN => {
                CellValue::PercussionInstrument(self.percussion_instrument)
            }
            UNPITCHED_NOTE_BEATS_COLUMN => CellValue::Rational(self.beats),
            UNPITCHED_NOTE_VELOCITY_RATIO_COLUMN => CellValue::Rational(self.velocity_ratio),
            UNPITCHED_NOTE_WORDS_COLUMN => CellValue::Words(self.words.clone()),
            _ => return Err(no_such_column(Self::KIND, column)),
        })
    }

    fn set_cell(&mut self, column: usize, value: CellValue) -> Result<(), ValueError> {
        match (column, value) {
            (UNPITCHED_NOTE_PERCUSSION_SET_COLUMN, CellValue::PercussionSet(v)) => {
                self.percussion_set = v
            }
            (UNPITCHED_NOTE_PERCUSSION_INSTRUMENT_COLUMN, CellValue::PercussionInstrument(v)) => {
                self.percussion_instrument = v
            }
            (UNPITCHED_NOTE_BEATS_COLUMN, CellValue::Rational(v)) => self.beats = v,
            (UNPITCHED_NOTE_VELOCITY_RATIO_COLUMN, CellValue::Rational(v)) => {
                self.velocity_ratio = v
            }
            (UNPITCHED_NOTE_WORDS_COLUMN, CellValue::Words(v)) => self.words = v,
            (column, _) if column >= Self::KIND.column_count() => {
                return Err(no_such_column(Self::KIND, column))
            }
            (column, _) => {
                let expected = UnpitchedNote::default().cell(column)?.type_name();
                return Err(wrong_type(Self::KIND, column, expected));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_counts() {
        assert_eq!(RowKind::Chord.column_count(), 8);
        assert_eq!(RowKind::PitchedNote.column_count(), 5);
        assert_eq!(RowKind::UnpitchedNote.column_count(), 5);
        assert_eq!(RowKind::Chord.column_name(CHORD_TEMPO_RATIO_COLUMN), Some("tempo_ratio"));
    }

    #[test]
    fn set_and_get_cell() {
        let mut note = PitchedNote::default();
        let fifth = Interval::new(3, 2, 0).unwrap();
        note.set_cell(PITCHED_NOTE_INTERVAL_COLUMN, CellValue::Interval(fifth))
            .unwrap();
        assert_eq!(
            note.cell(PITCHED_NOTE_INTERVAL_COLUMN).unwrap(),
            CellValue::Interval(fifth)
        );
    }

    #[test]
    fn wrong_type_is_rejected() {
        let mut chord = Chord::default();
        let err = chord
            .set_cell(CHORD_BEATS_COLUMN, CellValue::Words("x".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "column beats expects a rational");
        assert!(chord.set_cell(99, CellValue::Words("x".into())).is_err());
        assert!(chord.cell(8).is_err());
    }

    #[test]
    fn copy_columns_only_touches_range() {
        let source = UnpitchedNote {
            beats: Rational::new(2, 1).unwrap(),
            velocity_ratio: Rational::new(1, 2).unwrap(),
            words: "hit".into(),
            ..UnpitchedNote::default()
        };
        let mut target = UnpitchedNote::default();
        target
            .copy_columns_from(&source, UNPITCHED_NOTE_BEATS_COLUMN, UNPITCHED_NOTE_VELOCITY_RATIO_COLUMN)
            .unwrap();
        assert_eq!(target.beats, source.beats);
        assert_eq!(target.velocity_ratio, source.velocity_ratio);
        assert!(target.words.is_empty());
    }
}
