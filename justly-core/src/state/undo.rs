use std::collections::VecDeque;

use super::command::Command;
use super::document::{Document, DocumentResult};

/// Default number of entries kept before the oldest is dropped.
pub const DEFAULT_UNDO_DEPTH: usize = 500;

/// Undo/redo stacks of [`Command`]s.
///
/// Consecutive pushes with the same merge key fold into one entry while a
/// gesture is open; undo, redo and [`CommandLog::break_merge`] close it.
pub struct CommandLog {
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    max_depth: usize,
    merge_open: bool,
    /// Undo stack length at which the document matches the saved file, or
    /// `None` if that state can no longer be reached.
    clean_index: Option<usize>,
}

impl CommandLog {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            merge_open: false,
            clean_index: Some(0),
        }
    }

    /// Apply `command` and record it. Nothing is recorded if it fails.
    pub fn push(&mut self, command: Command, document: &mut Document) -> DocumentResult {
        command.redo(document)?;

        if self.clean_index.is_some_and(|clean| clean > self.undo_stack.len()) {
            self.clean_index = None;
        }
        self.redo_stack.clear();

        if self.merge_open && command.merge_key().is_some() {
            let top_index = self.undo_stack.len().checked_sub(1);
            if let Some(top) = self.undo_stack.back_mut() {
                if top.merge_key() == command.merge_key() && top.merge(&command) {
                    if self.clean_index == top_index.map(|i| i + 1) {
                        self.clean_index = None;
                    }
                    return Ok(());
                }
            }
        }

        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.pop_front();
            self.clean_index = self.clean_index.and_then(|clean| clean.checked_sub(1));
        }
        self.undo_stack.push_back(command);
        self.merge_open = true;
        Ok(())
    }

    /// Revert the most recent entry. Returns `false` if there was nothing
    /// to undo.
    pub fn undo(&mut self, document: &mut Document) -> DocumentResult<bool> {
        self.break_merge();
        let Some(command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = command.undo(document) {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Re-apply the most recently undone entry. Returns `false` if there was
    /// nothing to redo.
    pub fn redo(&mut self, document: &mut Document) -> DocumentResult<bool> {
        self.break_merge();
        let Some(command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = command.redo(document) {
            self.redo_stack.push(command);
            return Err(e);
        }
        self.undo_stack.push_back(command);
        Ok(true)
    }

    /// End the current continuous gesture.
    pub fn break_merge(&mut self) {
        self.merge_open = false;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_text(&self) -> Option<String> {
        self.undo_stack.back().map(Command::describe)
    }

    pub fn redo_text(&self) -> Option<String> {
        self.redo_stack.last().map(Command::describe)
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Mark the current state as matching the file on disk.
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
        self.break_merge();
    }

    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    /// Forget all history; the current state becomes clean.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = Some(0);
        self.break_merge();
    }
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::document::{CellAddress, RowBlock, RowsParent};
    use justly_types::columns::CHORD_WORDS_COLUMN;
    use justly_types::{CellValue, RowKind, SongParameter};

    fn set_words(document: &Document, row: usize, words: &str) -> Command {
        Command::set_cell(
            document,
            CellAddress::new(RowsParent::Song, row, CHORD_WORDS_COLUMN),
            CellValue::Words(words.to_string()),
        )
        .unwrap()
    }

    fn with_chords(count: usize) -> Document {
        let mut document = Document::new();
        let ids = document.reserve_chord_ids(count);
        document
            .insert_rows_directly(0, RowsParent::Song, &RowBlock::defaults(RowKind::Chord, count), &ids)
            .unwrap();
        document
    }

    #[test]
    fn push_applies_and_clears_redo() {
        let mut document = with_chords(1);
        let mut log = CommandLog::default();
        log.push(set_words(&document, 0, "a"), &mut document).unwrap();
        assert_eq!(document.to_song().chords[0].words, "a");

        assert!(log.undo(&mut document).unwrap());
        assert!(log.can_redo());
        log.push(set_words(&document, 0, "b"), &mut document).unwrap();
        assert!(!log.can_redo());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn undo_and_redo_on_empty_are_no_ops() {
        let mut document = with_chords(1);
        let mut log = CommandLog::default();
        assert!(!log.undo(&mut document).unwrap());
        assert!(!log.redo(&mut document).unwrap());
    }

    #[test]
    fn failed_push_records_nothing() {
        let mut document = with_chords(1);
        let mut log = CommandLog::default();
        let command = Command::SetCell {
            address: CellAddress::new(RowsParent::Song, 5, CHORD_WORDS_COLUMN),
            old: CellValue::Words(String::new()),
            new: CellValue::Words("x".into()),
        };
        assert!(log.push(command, &mut document).is_err());
        assert!(!log.can_undo());
    }

    #[test]
    fn parameter_gesture_merges_into_one_step() {
        let mut document = Document::new();
        let mut log = CommandLog::default();
        for value in [3.0, 4.0, 7.0] {
            let command = Command::set_parameter(&document, SongParameter::Gain, value);
            log.push(command, &mut document).unwrap();
        }
        assert_eq!(log.len(), 1);
        assert_eq!(document.parameter(SongParameter::Gain), 7.0);

        log.undo(&mut document).unwrap();
        assert_eq!(document.parameter(SongParameter::Gain), 5.0);
        log.redo(&mut document).unwrap();
        assert_eq!(document.parameter(SongParameter::Gain), 7.0);
    }

    #[test]
    fn different_parameters_do_not_merge() {
        let mut document = Document::new();
        let mut log = CommandLog::default();
        let gain = Command::set_parameter(&document, SongParameter::Gain, 3.0);
        log.push(gain, &mut document).unwrap();
        let tempo = Command::set_parameter(&document, SongParameter::StartingTempo, 120.0);
        log.push(tempo, &mut document).unwrap();
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn break_merge_starts_a_new_step() {
        let mut document = Document::new();
        let mut log = CommandLog::default();
        let first = Command::set_parameter(&document, SongParameter::StartingKey, 300.0);
        log.push(first, &mut document).unwrap();
        log.break_merge();
        let second = Command::set_parameter(&document, SongParameter::StartingKey, 330.0);
        log.push(second, &mut document).unwrap();
        assert_eq!(log.len(), 2);

        log.undo(&mut document).unwrap();
        assert_eq!(document.parameter(SongParameter::StartingKey), 300.0);
    }

    #[test]
    fn depth_limit_drops_oldest() {
        let mut document = with_chords(1);
        let mut log = CommandLog::new(2);
        for words in ["a", "b", "c"] {
            log.push(set_words(&document, 0, words), &mut document).unwrap();
        }
        assert_eq!(log.len(), 2);
        log.undo(&mut document).unwrap();
        log.undo(&mut document).unwrap();
        assert!(!log.can_undo());
        assert_eq!(document.to_song().chords[0].words, "a");
        assert!(!log.is_clean());
    }

    #[test]
    fn clean_tracking() {
        let mut document = with_chords(1);
        let mut log = CommandLog::default();
        assert!(log.is_clean());
        log.push(set_words(&document, 0, "a"), &mut document).unwrap();
        assert!(!log.is_clean());
        log.set_clean();
        assert!(log.is_clean());
        log.undo(&mut document).unwrap();
        assert!(!log.is_clean());
        log.redo(&mut document).unwrap();
        assert!(log.is_clean());

        log.undo(&mut document).unwrap();
        log.push(set_words(&document, 0, "z"), &mut document).unwrap();
        assert!(!log.is_clean());
        log.undo(&mut document).unwrap();
        assert!(!log.is_clean());
    }

    #[test]
    fn merging_into_the_saved_entry_makes_it_dirty() {
        let mut document = Document::new();
        let mut log = CommandLog::default();
        let command = Command::set_parameter(&document, SongParameter::Gain, 2.0);
        log.push(command, &mut document).unwrap();
        log.set_clean();
        // set_clean closes the gesture, so this is a new entry.
        let command = Command::set_parameter(&document, SongParameter::Gain, 3.0);
        log.push(command, &mut document).unwrap();
        assert_eq!(log.len(), 2);
        let command = Command::set_parameter(&document, SongParameter::Gain, 4.0);
        log.push(command, &mut document).unwrap();
        assert_eq!(log.len(), 2);
        log.undo(&mut document).unwrap();
        assert!(log.is_clean());
    }

    #[test]
    fn describe_entries() {
        let mut document = with_chords(2);
        let mut log = CommandLog::default();
        let remove = Command::remove_rows(&document, RowsParent::Song, 0, 1).unwrap();
        log.push(remove, &mut document).unwrap();
        assert_eq!(log.undo_text().as_deref(), Some("remove chords"));
        log.undo(&mut document).unwrap();
        assert_eq!(log.redo_text().as_deref(), Some("remove chords"));
        assert_eq!(log.undo_text(), None);
    }
}
