use std::path::PathBuf;

use justly_types::{CellValue, SongParameter};

use crate::state::{CellAddress, CellRange, ModelChange, RowsParent};

/// A user edit, as sent by a front end.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    SetCell(CellAddress, CellValue),
    SetParameter(SongParameter, f64),
    /// The continuous control was released.
    FinishGesture,
    InsertRows {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    RemoveRows {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    CopyRows {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    PasteRows {
        parent: RowsParent,
        first_row: usize,
    },
    CopyCells(CellRange),
    CutCells(CellRange),
    DeleteCells(CellRange),
    PasteCells {
        parent: RowsParent,
        first_row: usize,
    },
    Undo,
    Redo,
    New,
    Open(PathBuf),
    Save(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Message for the status line.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub level: StatusLevel,
    pub message: String,
}

/// What a dispatched action did, for the front end to react to.
#[derive(Debug, Clone, Default)]
pub struct DispatchResult {
    pub status: Vec<StatusEvent>,
    pub changes: Vec<ModelChange>,
    /// The document differs from the last saved file.
    pub modified: bool,
}

impl DispatchResult {
    pub fn push_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status.push(StatusEvent {
            level,
            message: message.into(),
        });
    }

    pub fn has_error(&self) -> bool {
        self.status.iter().any(|s| s.level == StatusLevel::Error)
    }
}
