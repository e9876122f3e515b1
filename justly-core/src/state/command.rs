//! Reversible edits. Each command stores everything it needs to apply and
//! revert itself as plain data, captured when the command is built, so
//! redo and undo are pure replays against the document.

use justly_types::{CellValue, SongParameter};

use super::document::{
    CellAddress, ChordId, Document, DocumentResult, RowBlock, RowsParent,
};

/// Identifies commands that may be folded together on the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKey {
    Parameter(SongParameter),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetCell {
        address: CellAddress,
        old: CellValue,
        new: CellValue,
    },
    /// Rewrite a rectangle of cells. `old_rows` and `new_rows` hold whole
    /// rows; only `left_column..=right_column` of them is applied.
    ReplaceCells {
        parent: RowsParent,
        first_row: usize,
        left_column: usize,
        right_column: usize,
        old_rows: RowBlock,
        new_rows: RowBlock,
    },
    InsertRows {
        parent: RowsParent,
        first_row: usize,
        rows: RowBlock,
        chord_ids: Vec<ChordId>,
    },
    RemoveRows {
        parent: RowsParent,
        first_row: usize,
        rows: RowBlock,
        chord_ids: Vec<ChordId>,
    },
    SetParameter {
        parameter: SongParameter,
        old: f64,
        new: f64,
    },
}

impl Command {
    pub fn set_cell(
        document: &Document,
        address: CellAddress,
        new: CellValue,
    ) -> DocumentResult<Self> {
        Ok(Command::SetCell {
            address,
            old: document.get_cell(address)?,
            new,
        })
    }

    /// Snapshot the rows currently covered so the replacement can be undone.
    pub fn replace_cells(
        document: &Document,
        parent: RowsParent,
        first_row: usize,
        left_column: usize,
        right_column: usize,
        new_rows: RowBlock,
    ) -> DocumentResult<Self> {
        Document::check_columns(parent.row_kind(), left_column, right_column)?;
        let old_rows = document.rows(parent, first_row, new_rows.len())?;
        Ok(Command::ReplaceCells {
            parent,
            first_row,
            left_column,
            right_column,
            old_rows,
            new_rows,
        })
    }

    /// Reserves chord ids up front so every redo inserts the same handles.
    pub fn insert_rows(
        document: &mut Document,
        parent: RowsParent,
        first_row: usize,
        rows: RowBlock,
    ) -> Self {
        let chord_ids = match &rows {
            RowBlock::Chords(chords) => document.reserve_chord_ids(chords.len()),
            _ => Vec::new(),
        };
        Command::InsertRows {
            parent,
            first_row,
            rows,
            chord_ids,
        }
    }

    pub fn remove_rows(
        document: &Document,
        parent: RowsParent,
        first_row: usize,
        count: usize,
    ) -> DocumentResult<Self> {
        let rows = document.rows(parent, first_row, count)?;
        let chord_ids = match parent {
            RowsParent::Song => document.chord_ids()[first_row..first_row + count].to_vec(),
            _ => Vec::new(),
        };
        Ok(Command::RemoveRows {
            parent,
            first_row,
            rows,
            chord_ids,
        })
    }

    pub fn set_parameter(document: &Document, parameter: SongParameter, new: f64) -> Self {
        Command::SetParameter {
            parameter,
            old: document.parameter(parameter),
            new,
        }
    }

    pub fn redo(&self, document: &mut Document) -> DocumentResult {
        match self {
            Command::SetCell { address, new, .. } => {
                document.set_cell_directly(*address, new.clone())
            }
            Command::ReplaceCells {
                parent,
                first_row,
                left_column,
                right_column,
                new_rows,
                ..
            } => document.replace_cell_range_directly(
                *parent,
                *first_row,
                *left_column,
                *right_column,
                new_rows,
            ),
            Command::InsertRows {
                parent,
                first_row,
                rows,
                chord_ids,
            } => document.insert_rows_directly(*first_row, *parent, rows, chord_ids),
            Command::RemoveRows {
                parent,
                first_row,
                rows,
                ..
            } => remove_exact(document, *parent, *first_row, rows.len()),
            Command::SetParameter { parameter, new, .. } => {
                document.set_parameter_directly(*parameter, *new);
                Ok(())
            }
        }
    }

    pub fn undo(&self, document: &mut Document) -> DocumentResult {
        match self {
            Command::SetCell { address, old, .. } => {
                document.set_cell_directly(*address, old.clone())
            }
            Command::ReplaceCells {
                parent,
                first_row,
                left_column,
                right_column,
                old_rows,
                ..
            } => document.replace_cell_range_directly(
                *parent,
                *first_row,
                *left_column,
                *right_column,
                old_rows,
            ),
            Command::InsertRows {
                parent,
                first_row,
                rows,
                ..
            } => remove_exact(document, *parent, *first_row, rows.len()),
            Command::RemoveRows {
                parent,
                first_row,
                rows,
                chord_ids,
            } => document.insert_rows_directly(*first_row, *parent, rows, chord_ids),
            Command::SetParameter { parameter, old, .. } => {
                document.set_parameter_directly(*parameter, *old);
                Ok(())
            }
        }
    }

    pub fn merge_key(&self) -> Option<MergeKey> {
        match self {
            Command::SetParameter { parameter, .. } => Some(MergeKey::Parameter(*parameter)),
            _ => None,
        }
    }

    /// Fold `next` into `self`, keeping the first old value and the last new
    /// one. Returns `false` (leaving `self` untouched) if the keys differ.
    pub fn merge(&mut self, next: &Command) -> bool {
        match (self, next) {
            (
                Command::SetParameter { parameter, new, .. },
                Command::SetParameter {
                    parameter: next_parameter,
                    new: next_new,
                    ..
                },
            ) if *parameter == *next_parameter => {
                *new = *next_new;
                true
            }
            _ => false,
        }
    }

    /// Short label for undo/redo menu entries.
    pub fn describe(&self) -> String {
        match self {
            Command::SetCell { .. } => "set cell".to_string(),
            Command::ReplaceCells { parent, .. } => {
                format!("edit {}", parent.row_kind().plural_name())
            }
            Command::InsertRows { parent, .. } => {
                format!("insert {}", parent.row_kind().plural_name())
            }
            Command::RemoveRows { parent, .. } => {
                format!("remove {}", parent.row_kind().plural_name())
            }
            Command::SetParameter { parameter, .. } => format!("set {}", parameter.name()),
        }
    }
}

fn remove_exact(
    document: &mut Document,
    parent: RowsParent,
    first_row: usize,
    count: usize,
) -> DocumentResult {
    document.remove_rows_directly(first_row, count, parent)?;
    Ok(())
}
