pub mod portable;
pub mod schema;
mod tests;

pub use portable::{
    cells_to_portable, parse_song, rows_to_portable, song_to_portable, to_portable,
    validate_and_parse, CellsPayload, Parsed, SchemaKind,
};
pub use schema::ValidationError;

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use justly_types::Song;

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Invalid(ValidationError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{}", e),
            Self::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<io::Error> for PersistenceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ValidationError> for PersistenceError {
    fn from(e: ValidationError) -> Self {
        Self::Invalid(e)
    }
}

/// Read and validate a song file.
pub fn load_song(path: &Path) -> Result<Song, PersistenceError> {
    let text = fs::read_to_string(path)?;
    let song = parse_song(&text)?;
    log::debug!(target: "persistence", "loaded {} ({} chords)", path.display(), song.chords.len());
    Ok(song)
}

/// Write a song as pretty JSON. The file is written next to its target and
/// renamed into place so a failed save leaves the previous file intact.
pub fn save_song(path: &Path, song: &Song) -> Result<(), PersistenceError> {
    let mut text = song_to_portable(song);
    text.push('\n');
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    fs::write(&temp, text)?;
    fs::rename(&temp, path)?;
    log::debug!(target: "persistence", "saved {}", path.display());
    Ok(())
}
