use crate::action::{DispatchResult, EditAction, StatusLevel};
use crate::state::{EditResult, EditorState};

/// Apply `action` to `state`. Failures never panic: they are logged and
/// reported as an error status, and leave the document as it was.
pub fn dispatch_action(action: &EditAction, state: &mut EditorState) -> DispatchResult {
    let mut result = DispatchResult::default();

    match apply(action, state) {
        Ok(Some(message)) => result.push_status(StatusLevel::Info, message),
        Ok(None) => {}
        Err(e) => {
            log::warn!(target: "dispatch", "{:?} failed: {}", action, e);
            result.push_status(StatusLevel::Error, e.to_string());
        }
    }

    result.changes = state.take_changes();
    result.modified = state.is_modified();
    result
}

fn apply(action: &EditAction, state: &mut EditorState) -> EditResult<Option<String>> {
    match action {
        EditAction::SetCell(address, value) => state.set_cell(*address, value.clone())?,
        EditAction::SetParameter(parameter, value) => state.set_parameter(*parameter, *value)?,
        EditAction::FinishGesture => state.finish_gesture(),
        EditAction::InsertRows {
            parent,
            first_row,
            count,
        } => state.insert_rows(*parent, *first_row, *count)?,
        EditAction::RemoveRows {
            parent,
            first_row,
            count,
        } => state.remove_rows(*parent, *first_row, *count)?,
        EditAction::CopyRows {
            parent,
            first_row,
            count,
        } => state.copy_rows(*parent, *first_row, *count)?,
        EditAction::PasteRows { parent, first_row } => {
            let count = state.paste_rows(*parent, *first_row)?;
            return Ok(Some(format!("pasted {} {}", count, parent.row_kind().plural_name())));
        }
        EditAction::CopyCells(range) => state.copy_cells(*range)?,
        EditAction::CutCells(range) => state.cut_cells(*range)?,
        EditAction::DeleteCells(range) => state.delete_cells(*range)?,
        EditAction::PasteCells { parent, first_row } => {
            let count = state.paste_cells(*parent, *first_row)?;
            return Ok(Some(format!("pasted cells into {} rows", count)));
        }
        EditAction::Undo => {
            if !state.undo()? {
                return Ok(Some("nothing to undo".to_string()));
            }
        }
        EditAction::Redo => {
            if !state.redo()? {
                return Ok(Some("nothing to redo".to_string()));
            }
        }
        EditAction::New => state.new_document(),
        EditAction::Open(path) => {
            state.open_file(path)?;
            return Ok(Some(format!("opened {}", path.display())));
        }
        EditAction::Save(path) => {
            state.save_file(path)?;
            return Ok(Some(format!("saved {}", path.display())));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::StatusLevel;
    use crate::state::{ModelChange, RowsParent};

    #[test]
    fn insert_reports_changes() {
        let mut state = EditorState::new();
        let result = dispatch_action(
            &EditAction::InsertRows {
                parent: RowsParent::Song,
                first_row: 0,
                count: 2,
            },
            &mut state,
        );
        assert!(!result.has_error());
        assert!(result.modified);
        assert_eq!(
            result.changes.last(),
            Some(&ModelChange::RowsInserted {
                parent: RowsParent::Song,
                first_row: 0,
                count: 2
            })
        );
    }

    #[test]
    fn errors_become_status() {
        let mut state = EditorState::new();
        let result = dispatch_action(
            &EditAction::RemoveRows {
                parent: RowsParent::Song,
                first_row: 0,
                count: 1,
            },
            &mut state,
        );
        assert!(result.has_error());
        assert!(result.changes.is_empty());
        assert!(!result.modified);
    }

    #[test]
    fn undo_on_empty_history() {
        let mut state = EditorState::new();
        let result = dispatch_action(&EditAction::Undo, &mut state);
        assert_eq!(result.status[0].level, StatusLevel::Info);
        assert_eq!(result.status[0].message, "nothing to undo");
    }
}
