use std::fmt;

use serde::{Deserialize, Serialize};

use justly_types::RowKind;

/// Stable handle for a chord in the document arena. Handles survive
/// insertion and removal of other chords; undo and redo of a structural
/// edit restore the same handles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChordId(u32);

impl ChordId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which ordered list a row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowsParent {
    /// The song's chords.
    Song,
    PitchedNotes(ChordId),
    UnpitchedNotes(ChordId),
}

impl RowsParent {
    pub fn row_kind(self) -> RowKind {
        match self {
            RowsParent::Song => RowKind::Chord,
            RowsParent::PitchedNotes(_) => RowKind::PitchedNote,
            RowsParent::UnpitchedNotes(_) => RowKind::UnpitchedNote,
        }
    }

    pub fn chord(self) -> Option<ChordId> {
        match self {
            RowsParent::Song => None,
            RowsParent::PitchedNotes(id) | RowsParent::UnpitchedNotes(id) => Some(id),
        }
    }
}

impl fmt::Display for RowsParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowsParent::Song => write!(f, "chords"),
            RowsParent::PitchedNotes(id) => write!(f, "pitched notes of chord #{}", id),
            RowsParent::UnpitchedNotes(id) => write!(f, "unpitched notes of chord #{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub parent: RowsParent,
    pub row: usize,
    pub column: usize,
}

impl CellAddress {
    pub fn new(parent: RowsParent, row: usize, column: usize) -> Self {
        Self {
            parent,
            row,
            column,
        }
    }
}

/// A rectangle of cells: `row_count` rows starting at `first_row`, columns
/// `left_column..=right_column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub parent: RowsParent,
    pub first_row: usize,
    pub row_count: usize,
    pub left_column: usize,
    pub right_column: usize,
}

impl CellRange {
    pub fn new(
        parent: RowsParent,
        first_row: usize,
        row_count: usize,
        left_column: usize,
        right_column: usize,
    ) -> Self {
        Self {
            parent,
            first_row,
            row_count,
            left_column,
            right_column,
        }
    }

    /// Every column of `row_count` rows.
    pub fn whole_rows(parent: RowsParent, first_row: usize, row_count: usize) -> Self {
        let last_column = parent.row_kind().column_count() - 1;
        Self::new(parent, first_row, row_count, 0, last_column)
    }
}
