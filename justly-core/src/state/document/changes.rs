use justly_types::SongParameter;

use super::RowsParent;

/// Notification emitted by the raw document mutators. Structural edits are
/// bracketed by an `AboutTo*` / completed pair so observers can defer
/// recomputing selections and cached addresses until the tree is stable.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelChange {
    CellsChanged {
        parent: RowsParent,
        first_row: usize,
        last_row: usize,
        left_column: usize,
        right_column: usize,
    },
    RowsAboutToBeInserted {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    RowsInserted {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    RowsAboutToBeRemoved {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    RowsRemoved {
        parent: RowsParent,
        first_row: usize,
        count: usize,
    },
    ParameterChanged(SongParameter),
    /// The whole song was replaced (file load, new document).
    Reset,
}

impl ModelChange {
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            ModelChange::CellsChanged { .. } | ModelChange::ParameterChanged(_)
        )
    }
}
