pub mod clipboard;
pub mod command;
pub mod document;
pub mod persistence;
pub mod undo;

pub use clipboard::{Clipboard, PayloadKind};
pub use command::{Command, MergeKey};
pub use document::{
    CellAddress, CellRange, ChordId, Document, DocumentError, ModelChange, RowBlock, RowsParent,
};
pub use persistence::{PersistenceError, ValidationError};
pub use undo::CommandLog;

use std::fmt;
use std::path::{Path, PathBuf};

use justly_types::{CellValue, Song, SongParameter};

use crate::config::Config;
use persistence::Parsed;

#[derive(Debug)]
pub enum EditError {
    Document(DocumentError),
    Validation(ValidationError),
    File(PersistenceError),
    ClipboardEmpty,
    WrongPayload {
        found: PayloadKind,
        expected: PayloadKind,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(e) => write!(f, "{}", e),
            Self::Validation(e) => write!(f, "{}", e),
            Self::File(e) => write!(f, "{}", e),
            Self::ClipboardEmpty => write!(f, "nothing to paste"),
            Self::WrongPayload { found, expected } => {
                write!(f, "cannot paste {} as {}", found, expected)
            }
        }
    }
}

impl std::error::Error for EditError {}

impl From<DocumentError> for EditError {
    fn from(e: DocumentError) -> Self {
        Self::Document(e)
    }
}

impl From<ValidationError> for EditError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<PersistenceError> for EditError {
    fn from(e: PersistenceError) -> Self {
        Self::File(e)
    }
}

pub type EditResult<T = ()> = Result<T, EditError>;

/// One open score: the document, its command log and the clipboard. Every
/// edit goes through [`CommandLog::push`] so the log and the document
/// change together.
pub struct EditorState {
    document: Document,
    history: CommandLog,
    pub clipboard: Clipboard,
    file_path: Option<PathBuf>,
    new_song: Song,
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_template(Song::new(), undo::DEFAULT_UNDO_DEPTH)
    }

    /// Blank document using the configured song defaults and undo depth.
    pub fn from_config(config: &Config) -> Self {
        Self::with_template(config.new_song(), config.undo_depth())
    }

    fn with_template(new_song: Song, undo_depth: usize) -> Self {
        Self {
            document: Document::from_song(new_song.clone()),
            history: CommandLog::new(undo_depth),
            clipboard: Clipboard::default(),
            file_path: None,
            new_song,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &CommandLog {
        &self.history
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Drain the document's change notifications.
    pub fn take_changes(&mut self) -> Vec<ModelChange> {
        self.document.take_changes()
    }

    fn push(&mut self, command: Command) -> EditResult {
        log::debug!(target: "editor", "{}", command.describe());
        self.history.push(command, &mut self.document)?;
        Ok(())
    }

    // ── cells and parameters ──────────────────────────────────────

    pub fn set_cell(&mut self, address: CellAddress, value: CellValue) -> EditResult {
        self.history.break_merge();
        let command = Command::set_cell(&self.document, address, value)?;
        self.push(command)
    }

    /// Set a song-level scalar (clamped). Successive calls for the same
    /// parameter form one undo step until [`EditorState::finish_gesture`].
    pub fn set_parameter(&mut self, parameter: SongParameter, value: f64) -> EditResult {
        let value = parameter.clamp(value);
        let command = Command::set_parameter(&self.document, parameter, value);
        self.push(command)
    }

    pub fn finish_gesture(&mut self) {
        self.history.break_merge();
    }

    // ── rows ──────────────────────────────────────────────────────

    /// Insert `count` templated rows before `first_row`.
    pub fn insert_rows(&mut self, parent: RowsParent, first_row: usize, count: usize) -> EditResult {
        self.history.break_merge();
        let rows = self.document.template_rows(parent, first_row, count)?;
        if rows.is_empty() {
            return Ok(());
        }
        let command = Command::insert_rows(&mut self.document, parent, first_row, rows);
        self.push(command)
    }

    pub fn remove_rows(&mut self, parent: RowsParent, first_row: usize, count: usize) -> EditResult {
        self.history.break_merge();
        let command = Command::remove_rows(&self.document, parent, first_row, count)?;
        if count == 0 {
            return Ok(());
        }
        self.push(command)
    }

    pub fn copy_rows(&mut self, parent: RowsParent, first_row: usize, count: usize) -> EditResult {
        let text = self.document.copy_range(parent, first_row, count)?;
        self.clipboard.set(PayloadKind::Rows(parent.row_kind()), text);
        Ok(())
    }

    /// Insert the clipboard rows before `first_row`. Returns how many rows
    /// were inserted.
    pub fn paste_rows(&mut self, parent: RowsParent, first_row: usize) -> EditResult<usize> {
        self.history.break_merge();
        let expected = PayloadKind::Rows(parent.row_kind());
        let rows = match self.parse_clipboard(expected)? {
            Parsed::Rows(rows) => rows,
            _ => return Err(self.wrong_payload(expected)),
        };
        let count = self.document.get_child_count(parent);
        if first_row > count {
            return Err(DocumentError::InsertOutOfRange {
                parent,
                first_row,
                count,
            }
            .into());
        }
        let inserted = rows.len();
        if inserted == 0 {
            return Ok(0);
        }
        let command = Command::insert_rows(&mut self.document, parent, first_row, rows);
        self.push(command)?;
        Ok(inserted)
    }

    // ── cell ranges ───────────────────────────────────────────────

    pub fn copy_cells(&mut self, range: CellRange) -> EditResult {
        Document::check_columns(range.parent.row_kind(), range.left_column, range.right_column)?;
        let rows = self
            .document
            .rows(range.parent, range.first_row, range.row_count)?;
        let text = persistence::cells_to_portable(&rows, range.left_column, range.right_column);
        self.clipboard
            .set(PayloadKind::Cells(range.parent.row_kind()), text);
        Ok(())
    }

    /// Reset the cells in `range` to their defaults as one undo step.
    pub fn delete_cells(&mut self, range: CellRange) -> EditResult {
        self.history.break_merge();
        let defaults = RowBlock::defaults(range.parent.row_kind(), range.row_count);
        let command = Command::replace_cells(
            &self.document,
            range.parent,
            range.first_row,
            range.left_column,
            range.right_column,
            defaults,
        )?;
        self.push(command)
    }

    pub fn cut_cells(&mut self, range: CellRange) -> EditResult {
        self.copy_cells(range)?;
        self.delete_cells(range)
    }

    /// Paste a ranged-cells payload over the rows starting at `first_row`,
    /// into the columns it was copied from. Rows past the end of `parent`
    /// are dropped. Returns how many rows were written.
    pub fn paste_cells(&mut self, parent: RowsParent, first_row: usize) -> EditResult<usize> {
        self.history.break_merge();
        let expected = PayloadKind::Cells(parent.row_kind());
        let payload = match self.parse_clipboard(expected)? {
            Parsed::Cells(payload) => payload,
            _ => return Err(self.wrong_payload(expected)),
        };
        let count = self.document.get_child_count(parent);
        if first_row > count {
            return Err(DocumentError::RangeOutOfBounds {
                parent,
                first_row,
                row_count: payload.rows.len(),
                count,
            }
            .into());
        }
        let mut rows = payload.rows;
        rows.truncate(count - first_row);
        if rows.is_empty() {
            return Ok(0);
        }
        let written = rows.len();
        let command = Command::replace_cells(
            &self.document,
            parent,
            first_row,
            payload.left_column,
            payload.right_column,
            rows,
        )?;
        self.push(command)?;
        Ok(written)
    }

    fn parse_clipboard(&self, expected: PayloadKind) -> EditResult<Parsed> {
        let (found, text) = self.clipboard.contents.as_ref().ok_or(EditError::ClipboardEmpty)?;
        if *found != expected {
            return Err(EditError::WrongPayload {
                found: *found,
                expected,
            });
        }
        Ok(persistence::validate_and_parse(text, expected.schema())?)
    }

    fn wrong_payload(&self, expected: PayloadKind) -> EditError {
        let found = self
            .clipboard
            .contents
            .as_ref()
            .map_or(expected, |(kind, _)| *kind);
        EditError::WrongPayload { found, expected }
    }

    // ── history ───────────────────────────────────────────────────

    pub fn undo(&mut self) -> EditResult<bool> {
        Ok(self.history.undo(&mut self.document)?)
    }

    pub fn redo(&mut self) -> EditResult<bool> {
        Ok(self.history.redo(&mut self.document)?)
    }

    // ── files ─────────────────────────────────────────────────────

    /// Replace the document with a validated song file. On error the
    /// current document is untouched.
    pub fn open_file(&mut self, path: &Path) -> EditResult {
        let song = persistence::load_song(path)?;
        self.document.replace_song(song);
        self.history.clear();
        self.file_path = Some(path.to_path_buf());
        log::info!(target: "editor", "opened {}", path.display());
        Ok(())
    }

    pub fn save_file(&mut self, path: &Path) -> EditResult {
        persistence::save_song(path, &self.document.to_song())?;
        self.history.set_clean();
        self.file_path = Some(path.to_path_buf());
        log::info!(target: "editor", "saved {}", path.display());
        Ok(())
    }

    pub fn new_document(&mut self) {
        self.document.replace_song(self.new_song.clone());
        self.history.clear();
        self.file_path = None;
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
