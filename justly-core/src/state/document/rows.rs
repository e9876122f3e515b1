use justly_types::{Chord, PitchedNote, Row, RowKind, UnpitchedNote};

/// A contiguous run of rows of a single kind, used for structural edits,
/// cell-range snapshots and clipboard payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum RowBlock {
    Chords(Vec<Chord>),
    PitchedNotes(Vec<PitchedNote>),
    UnpitchedNotes(Vec<UnpitchedNote>),
}

impl RowBlock {
    pub fn kind(&self) -> RowKind {
        match self {
            RowBlock::Chords(_) => RowKind::Chord,
            RowBlock::PitchedNotes(_) => RowKind::PitchedNote,
            RowBlock::UnpitchedNotes(_) => RowKind::UnpitchedNote,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RowBlock::Chords(rows) => rows.len(),
            RowBlock::PitchedNotes(rows) => rows.len(),
            RowBlock::UnpitchedNotes(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `count` default rows of `kind`.
    pub fn defaults(kind: RowKind, count: usize) -> Self {
        match kind {
            RowKind::Chord => RowBlock::Chords(default_rows(count)),
            RowKind::PitchedNote => RowBlock::PitchedNotes(default_rows(count)),
            RowKind::UnpitchedNote => RowBlock::UnpitchedNotes(default_rows(count)),
        }
    }

    /// Keep only the first `count` rows.
    pub fn truncate(&mut self, count: usize) {
        match self {
            RowBlock::Chords(rows) => rows.truncate(count),
            RowBlock::PitchedNotes(rows) => rows.truncate(count),
            RowBlock::UnpitchedNotes(rows) => rows.truncate(count),
        }
    }
}

fn default_rows<R: Row>(count: usize) -> Vec<R> {
    vec![R::default(); count]
}
