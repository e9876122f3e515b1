//! The score document: single source of truth for the song tree.
//!
//! Chords live in an arena (`chord_order` + `chords`) so note lists are
//! addressed through a stable [`ChordId`] rather than a position that
//! shifts under structural edits. Every mutator here is raw: no undo
//! bookkeeping and no range validation of values. Commands in
//! [`crate::state::command`] wrap them.

mod address;
mod changes;
mod rows;
mod template;

pub use address::{CellAddress, CellRange, ChordId, RowsParent};
pub use changes::ModelChange;
pub use rows::RowBlock;

use std::collections::HashMap;
use std::fmt;

use justly_types::{
    CellValue, Chord, InstrumentRef, Row, RowKind, ScoreView, Song, SongParameter, ValueError,
};

use super::persistence::portable;

/// Addressing errors. These indicate a caller bug (stale address, wrong
/// row kind) rather than bad user data.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    NoSuchChord(ChordId),
    NoSuchRow {
        parent: RowsParent,
        row: usize,
        count: usize,
    },
    InsertOutOfRange {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    RangeOutOfBounds {
        parent: RowsParent,
        first_row: usize,
        row_count: usize,
        count: usize,
    },
    InvalidColumns {
        kind: RowKind,
        left_column: usize,
        right_column: usize,
    },
    KindMismatch {
        expected: RowKind,
        found: RowKind,
    },
    ChordIdsMismatch {
        rows: usize,
        ids: usize,
    },
    ChordIdInUse(ChordId),
    Value(ValueError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchChord(id) => write!(f, "no chord #{}", id),
            Self::NoSuchRow { parent, row, count } => {
                write!(f, "row {} is out of range for {} ({} rows)", row, parent, count)
            }
            Self::InsertOutOfRange {
                parent,
                first_row,
                count,
            } => write!(
                f,
                "cannot insert at row {} of {} ({} rows)",
                first_row, parent, count
            ),
            Self::RangeOutOfBounds {
                parent,
                first_row,
                row_count,
                count,
            } => write!(
                f,
                "rows {}..{} are out of range for {} ({} rows)",
                first_row,
                first_row.saturating_add(*row_count),
                parent,
                count
            ),
            Self::InvalidColumns {
                kind,
                left_column,
                right_column,
            } => write!(
                f,
                "columns {}..={} are invalid for {}",
                left_column,
                right_column,
                kind.plural_name()
            ),
            Self::KindMismatch { expected, found } => write!(
                f,
                "expected {} but got {}",
                expected.plural_name(),
                found.plural_name()
            ),
            Self::ChordIdsMismatch { rows, ids } => {
                write!(f, "{} chords were given {} ids", rows, ids)
            }
            Self::ChordIdInUse(id) => write!(f, "chord #{} already exists", id),
            Self::Value(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<ValueError> for DocumentError {
    fn from(e: ValueError) -> Self {
        Self::Value(e)
    }
}

pub type DocumentResult<T = ()> = Result<T, DocumentError>;

#[derive(Debug, Clone)]
pub struct Document {
    gain: f64,
    starting_key: f64,
    starting_velocity: f64,
    starting_tempo: f64,
    starting_instrument: Option<InstrumentRef>,
    chord_order: Vec<ChordId>,
    chords: HashMap<ChordId, Chord>,
    next_chord_id: u32,
    revision: u64,
    changes: Vec<ModelChange>,
}

impl Document {
    pub fn new() -> Self {
        Self::from_song(Song::new())
    }

    pub fn from_song(song: Song) -> Self {
        Self::from_song_with_ids(song, 0)
    }

    fn from_song_with_ids(song: Song, next_chord_id: u32) -> Self {
        let mut document = Self {
            gain: song.gain,
            starting_key: song.starting_key,
            starting_velocity: song.starting_velocity,
            starting_tempo: song.starting_tempo,
            starting_instrument: song.starting_instrument,
            chord_order: Vec::with_capacity(song.chords.len()),
            chords: HashMap::with_capacity(song.chords.len()),
            next_chord_id,
            revision: 0,
            changes: Vec::new(),
        };
        for chord in song.chords {
            let id = document.allocate_chord_id();
            document.chord_order.push(id);
            document.chords.insert(id, chord);
        }
        document
    }

    pub fn to_song(&self) -> Song {
        Song {
            gain: self.gain,
            starting_key: self.starting_key,
            starting_velocity: self.starting_velocity,
            starting_tempo: self.starting_tempo,
            starting_instrument: self.starting_instrument,
            chords: self
                .chord_order
                .iter()
                .filter_map(|id| self.chords.get(id).cloned())
                .collect(),
        }
    }

    /// Replace the whole song (file load). Chord ids are never reused.
    pub fn replace_song(&mut self, song: Song) {
        let next_chord_id = self.next_chord_id;
        let revision = self.revision;
        let mut changes = std::mem::take(&mut self.changes);
        *self = Self::from_song_with_ids(song, next_chord_id);
        self.revision = revision + 1;
        changes.push(ModelChange::Reset);
        self.changes = changes;
    }

    fn allocate_chord_id(&mut self) -> ChordId {
        let id = ChordId::new(self.next_chord_id);
        self.next_chord_id += 1;
        id
    }

    /// Reserve fresh ids for chords about to be inserted.
    pub fn reserve_chord_ids(&mut self, count: usize) -> Vec<ChordId> {
        (0..count).map(|_| self.allocate_chord_id()).collect()
    }

    /// Incremented on every structural mutation; an address captured at an
    /// older revision must be recomputed before use.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drain queued change notifications.
    pub fn take_changes(&mut self) -> Vec<ModelChange> {
        std::mem::take(&mut self.changes)
    }

    // ── song-level values ─────────────────────────────────────────

    pub fn parameter(&self, parameter: SongParameter) -> f64 {
        match parameter {
            SongParameter::Gain => self.gain,
            SongParameter::StartingKey => self.starting_key,
            SongParameter::StartingVelocity => self.starting_velocity,
            SongParameter::StartingTempo => self.starting_tempo,
        }
    }

    pub fn set_parameter_directly(&mut self, parameter: SongParameter, value: f64) {
        match parameter {
            SongParameter::Gain => self.gain = value,
            SongParameter::StartingKey => self.starting_key = value,
            SongParameter::StartingVelocity => self.starting_velocity = value,
            SongParameter::StartingTempo => self.starting_tempo = value,
        }
        self.changes.push(ModelChange::ParameterChanged(parameter));
    }

    // ── chord arena ───────────────────────────────────────────────

    pub fn chord_id(&self, row: usize) -> Option<ChordId> {
        self.chord_order.get(row).copied()
    }

    pub fn chord_row(&self, id: ChordId) -> Option<usize> {
        self.chord_order.iter().position(|&other| other == id)
    }

    pub fn chord_ids(&self) -> &[ChordId] {
        &self.chord_order
    }

    pub fn chord_by_id(&self, id: ChordId) -> DocumentResult<&Chord> {
        self.chords.get(&id).ok_or(DocumentError::NoSuchChord(id))
    }

    fn chord_by_id_mut(&mut self, id: ChordId) -> DocumentResult<&mut Chord> {
        self.chords.get_mut(&id).ok_or(DocumentError::NoSuchChord(id))
    }

    fn chord_at_row(&self, row: usize) -> DocumentResult<&Chord> {
        let count = self.chord_order.len();
        let id = self.chord_id(row).ok_or(DocumentError::NoSuchRow {
            parent: RowsParent::Song,
            row,
            count,
        })?;
        self.chord_by_id(id)
    }

    // ── queries ───────────────────────────────────────────────────

    fn rows_len(&self, parent: RowsParent) -> DocumentResult<usize> {
        match parent {
            RowsParent::Song => Ok(self.chord_order.len()),
            RowsParent::PitchedNotes(id) => Ok(self.chord_by_id(id)?.pitched_notes.len()),
            RowsParent::UnpitchedNotes(id) => Ok(self.chord_by_id(id)?.unpitched_notes.len()),
        }
    }

    /// Number of rows under `parent`; 0 for a chord that no longer exists.
    pub fn get_child_count(&self, parent: RowsParent) -> usize {
        self.rows_len(parent).unwrap_or(0)
    }

    pub fn get_cell(&self, address: CellAddress) -> DocumentResult<CellValue> {
        let CellAddress {
            parent,
            row,
            column,
        } = address;
        let value = match parent {
            RowsParent::Song => self.chord_at_row(row)?.cell(column)?,
            RowsParent::PitchedNotes(id) => {
                row_at(&self.chord_by_id(id)?.pitched_notes, parent, row)?.cell(column)?
            }
            RowsParent::UnpitchedNotes(id) => {
                row_at(&self.chord_by_id(id)?.unpitched_notes, parent, row)?.cell(column)?
            }
        };
        Ok(value)
    }

    /// Clone `row_count` rows starting at `first_row`.
    pub fn rows(
        &self,
        parent: RowsParent,
        first_row: usize,
        row_count: usize,
    ) -> DocumentResult<RowBlock> {
        self.check_range(parent, first_row, row_count)?;
        let range = first_row..first_row + row_count;
        Ok(match parent {
            RowsParent::Song => RowBlock::Chords(
                self.chord_order[range]
                    .iter()
                    .map(|&id| self.chord_by_id(id).cloned())
                    .collect::<DocumentResult<Vec<_>>>()?,
            ),
            RowsParent::PitchedNotes(id) => {
                RowBlock::PitchedNotes(self.chord_by_id(id)?.pitched_notes[range].to_vec())
            }
            RowsParent::UnpitchedNotes(id) => {
                RowBlock::UnpitchedNotes(self.chord_by_id(id)?.unpitched_notes[range].to_vec())
            }
        })
    }

    /// Schema-shaped export of a row range for the clipboard.
    pub fn copy_range(
        &self,
        parent: RowsParent,
        first_row: usize,
        row_count: usize,
    ) -> DocumentResult<String> {
        Ok(portable::rows_to_portable(&self.rows(parent, first_row, row_count)?))
    }

    fn check_range(&self, parent: RowsParent, first_row: usize, row_count: usize) -> DocumentResult {
        let count = self.rows_len(parent)?;
        match first_row.checked_add(row_count) {
            Some(end) if end <= count => Ok(()),
            _ => Err(DocumentError::RangeOutOfBounds {
                parent,
                first_row,
                row_count,
                count,
            }),
        }
    }

    fn check_kind(parent: RowsParent, rows: &RowBlock) -> DocumentResult {
        if parent.row_kind() != rows.kind() {
            return Err(DocumentError::KindMismatch {
                expected: parent.row_kind(),
                found: rows.kind(),
            });
        }
        Ok(())
    }

    pub fn check_columns(kind: RowKind, left_column: usize, right_column: usize) -> DocumentResult {
        if left_column > right_column || right_column >= kind.column_count() {
            return Err(DocumentError::InvalidColumns {
                kind,
                left_column,
                right_column,
            });
        }
        Ok(())
    }

    // ── raw mutators ──────────────────────────────────────────────

    pub fn set_cell_directly(&mut self, address: CellAddress, value: CellValue) -> DocumentResult {
        let CellAddress {
            parent,
            row,
            column,
        } = address;
        match parent {
            RowsParent::Song => {
                let count = self.chord_order.len();
                let id = self.chord_id(row).ok_or(DocumentError::NoSuchRow {
                    parent,
                    row,
                    count,
                })?;
                self.chord_by_id_mut(id)?.set_cell(column, value)?;
            }
            RowsParent::PitchedNotes(id) => {
                let notes = &mut self.chord_by_id_mut(id)?.pitched_notes;
                row_at_mut(notes, parent, row)?.set_cell(column, value)?;
            }
            RowsParent::UnpitchedNotes(id) => {
                let notes = &mut self.chord_by_id_mut(id)?.unpitched_notes;
                row_at_mut(notes, parent, row)?.set_cell(column, value)?;
            }
        }
        self.changes.push(ModelChange::CellsChanged {
            parent,
            first_row: row,
            last_row: row,
            left_column: column,
            right_column: column,
        });
        Ok(())
    }

    /// Overwrite columns `left_column..=right_column` of the rows starting at
    /// `first_row` with the same columns of `new_rows`. Row count and order
    /// are unchanged.
    pub fn replace_cell_range_directly(
        &mut self,
        parent: RowsParent,
        first_row: usize,
        left_column: usize,
        right_column: usize,
        new_rows: &RowBlock,
    ) -> DocumentResult {
        Self::check_kind(parent, new_rows)?;
        Self::check_columns(parent.row_kind(), left_column, right_column)?;
        self.check_range(parent, first_row, new_rows.len())?;
        if new_rows.is_empty() {
            return Ok(());
        }

        match (parent, new_rows) {
            (RowsParent::Song, RowBlock::Chords(sources)) => {
                for (offset, source) in sources.iter().enumerate() {
                    let id = self.chord_order[first_row + offset];
                    self.chord_by_id_mut(id)?
                        .copy_columns_from(source, left_column, right_column)?;
                }
            }
            (RowsParent::PitchedNotes(id), RowBlock::PitchedNotes(sources)) => {
                let targets = &mut self.chord_by_id_mut(id)?.pitched_notes;
                copy_columns(&mut targets[first_row..], sources, left_column, right_column)?;
            }
            (RowsParent::UnpitchedNotes(id), RowBlock::UnpitchedNotes(sources)) => {
                let targets = &mut self.chord_by_id_mut(id)?.unpitched_notes;
                copy_columns(&mut targets[first_row..], sources, left_column, right_column)?;
            }
            _ => unreachable!("row kind checked above"),
        }

        self.changes.push(ModelChange::CellsChanged {
            parent,
            first_row,
            last_row: first_row + new_rows.len() - 1,
            left_column,
            right_column,
        });
        Ok(())
    }

    /// Insert `rows` before `first_row`. Chord blocks need one id per chord
    /// (from [`Document::reserve_chord_ids`] or a prior removal).
    pub fn insert_rows_directly(
        &mut self,
        first_row: usize,
        parent: RowsParent,
        rows: &RowBlock,
        chord_ids: &[ChordId],
    ) -> DocumentResult {
        Self::check_kind(parent, rows)?;
        let count = self.rows_len(parent)?;
        if first_row > count {
            return Err(DocumentError::InsertOutOfRange {
                parent,
                first_row,
                count,
            });
        }
        if let RowBlock::Chords(chords) = rows {
            if chords.len() != chord_ids.len() {
                return Err(DocumentError::ChordIdsMismatch {
                    rows: chords.len(),
                    ids: chord_ids.len(),
                });
            }
            if let Some(&id) = chord_ids.iter().find(|id| self.chords.contains_key(id)) {
                return Err(DocumentError::ChordIdInUse(id));
            }
        }

        let inserted = rows.len();
        self.changes.push(ModelChange::RowsAboutToBeInserted {
            parent,
            first_row,
            count: inserted,
        });
        match (parent, rows) {
            (RowsParent::Song, RowBlock::Chords(chords)) => {
                self.chord_order
                    .splice(first_row..first_row, chord_ids.iter().copied());
                for (&id, chord) in chord_ids.iter().zip(chords) {
                    self.chords.insert(id, chord.clone());
                    self.next_chord_id = self.next_chord_id.max(id.get() + 1);
                }
            }
            (RowsParent::PitchedNotes(id), RowBlock::PitchedNotes(notes)) => {
                let target = &mut self.chord_by_id_mut(id)?.pitched_notes;
                target.splice(first_row..first_row, notes.iter().cloned());
            }
            (RowsParent::UnpitchedNotes(id), RowBlock::UnpitchedNotes(notes)) => {
                let target = &mut self.chord_by_id_mut(id)?.unpitched_notes;
                target.splice(first_row..first_row, notes.iter().cloned());
            }
            _ => unreachable!("row kind checked above"),
        }
        self.revision += 1;
        self.changes.push(ModelChange::RowsInserted {
            parent,
            first_row,
            count: inserted,
        });
        Ok(())
    }

    /// Remove `row_count` rows starting at `first_row`, returning them (and,
    /// for chords, their ids) so the removal can be reverted.
    pub fn remove_rows_directly(
        &mut self,
        first_row: usize,
        row_count: usize,
        parent: RowsParent,
    ) -> DocumentResult<(RowBlock, Vec<ChordId>)> {
        self.check_range(parent, first_row, row_count)?;
        self.changes.push(ModelChange::RowsAboutToBeRemoved {
            parent,
            first_row,
            count: row_count,
        });
        let range = first_row..first_row + row_count;
        let removed = match parent {
            RowsParent::Song => {
                let ids: Vec<ChordId> = self.chord_order.drain(range).collect();
                let chords = ids
                    .iter()
                    .filter_map(|id| self.chords.remove(id))
                    .collect();
                (RowBlock::Chords(chords), ids)
            }
            RowsParent::PitchedNotes(id) => {
                let notes = &mut self.chord_by_id_mut(id)?.pitched_notes;
                (RowBlock::PitchedNotes(notes.drain(range).collect()), Vec::new())
            }
            RowsParent::UnpitchedNotes(id) => {
                let notes = &mut self.chord_by_id_mut(id)?.unpitched_notes;
                (RowBlock::UnpitchedNotes(notes.drain(range).collect()), Vec::new())
            }
        };
        self.revision += 1;
        self.changes.push(ModelChange::RowsRemoved {
            parent,
            first_row,
            count: row_count,
        });
        Ok(removed)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreView for Document {
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
        self.chord_order.len()
    }

    fn chord(&self, row: usize) -> Option<&Chord> {
        self.chord_order.get(row).and_then(|id| self.chords.get(id))
    }
}

fn row_at<R>(rows: &[R], parent: RowsParent, row: usize) -> DocumentResult<&R> {
    rows.get(row).ok_or(DocumentError::NoSuchRow {
        parent,
        row,
        count: rows.len(),
    })
}

fn row_at_mut<R>(rows: &mut [R], parent: RowsParent, row: usize) -> DocumentResult<&mut R> {
    let count = rows.len();
    rows.get_mut(row).ok_or(DocumentError::NoSuchRow { parent, row, count })
}

fn copy_columns<R: Row>(
    targets: &mut [R],
    sources: &[R],
    left_column: usize,
    right_column: usize,
) -> DocumentResult {
    for (target, source) in targets.iter_mut().zip(sources) {
        target.copy_columns_from(source, left_column, right_column)?;
    }
    Ok(())
}
