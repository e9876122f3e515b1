//! Text forms of songs, row lists and ranged-cell clipboard fragments.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use justly_types::{Chord, PitchedNote, RowKind, Song, UnpitchedNote};

use super::schema::{self, ValidationError};
use crate::state::document::RowBlock;

/// The logical shape a piece of text is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Song,
    /// A whole list of rows: chords, pitched notes or unpitched notes.
    Rows(RowKind),
    /// A `{left_column, right_column, rows}` envelope.
    Cells(RowKind),
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Song => f.write_str("song"),
            SchemaKind::Rows(kind) => f.write_str(kind.plural_name()),
            SchemaKind::Cells(RowKind::Chord) => f.write_str("chord cells"),
            SchemaKind::Cells(RowKind::PitchedNote) => f.write_str("pitched note cells"),
            SchemaKind::Cells(RowKind::UnpitchedNote) => f.write_str("unpitched note cells"),
        }
    }
}

/// Ranged cells: rows hold meaningful values only in
/// `left_column..=right_column`; the other columns are defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CellsPayload {
    pub left_column: usize,
    pub right_column: usize,
    pub rows: RowBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Song(Song),
    Rows(RowBlock),
    Cells(CellsPayload),
}

/// Check `text` against `kind` and build the values it describes.
pub fn validate_and_parse(text: &str, kind: SchemaKind) -> Result<Parsed, ValidationError> {
    let value: Value = serde_json::from_str(text)?;
    match kind {
        SchemaKind::Song => {
            schema::check_song(&value)?;
            Ok(Parsed::Song(from_checked(value)?))
        }
        SchemaKind::Rows(row_kind) => {
            schema::check_rows(&value, row_kind)?;
            Ok(Parsed::Rows(block_from_checked(value, row_kind)?))
        }
        SchemaKind::Cells(row_kind) => {
            let (left_column, right_column) = schema::check_cells(&value, row_kind)?;
            let rows = match value {
                Value::Object(mut map) => map.remove("rows").unwrap_or(Value::Array(Vec::new())),
                _ => Value::Array(Vec::new()),
            };
            Ok(Parsed::Cells(CellsPayload {
                left_column,
                right_column,
                rows: block_from_checked(rows, row_kind)?,
            }))
        }
    }
}

pub fn parse_song(text: &str) -> Result<Song, ValidationError> {
    match validate_and_parse(text, SchemaKind::Song)? {
        Parsed::Song(song) => Ok(song),
        _ => Err(ValidationError::Schema {
            path: String::new(),
            message: "expected a song".to_string(),
        }),
    }
}

fn from_checked<T: DeserializeOwned>(value: Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError::Schema {
        path: String::new(),
        message: e.to_string(),
    })
}

fn block_from_checked(value: Value, kind: RowKind) -> Result<RowBlock, ValidationError> {
    Ok(match kind {
        RowKind::Chord => RowBlock::Chords(from_checked::<Vec<Chord>>(value)?),
        RowKind::PitchedNote => RowBlock::PitchedNotes(from_checked::<Vec<PitchedNote>>(value)?),
        RowKind::UnpitchedNote => {
            RowBlock::UnpitchedNotes(from_checked::<Vec<UnpitchedNote>>(value)?)
        }
    })
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        log::error!(target: "persistence", "failed to serialize: {}", e);
        Value::Null
    })
}

fn block_to_values(rows: &RowBlock) -> Vec<Value> {
    let value = match rows {
        RowBlock::Chords(rows) => to_value(rows),
        RowBlock::PitchedNotes(rows) => to_value(rows),
        RowBlock::UnpitchedNotes(rows) => to_value(rows),
    };
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Serialize `rows`, either whole or restricted to an inclusive column
/// range (the ranged-cells envelope).
pub fn to_portable(rows: &RowBlock, columns: Option<(usize, usize)>) -> String {
    match columns {
        Some((left_column, right_column)) => cells_to_portable(rows, left_column, right_column),
        None => rows_to_portable(rows),
    }
}

pub fn rows_to_portable(rows: &RowBlock) -> String {
    Value::Array(block_to_values(rows)).to_string()
}

pub fn cells_to_portable(rows: &RowBlock, left_column: usize, right_column: usize) -> String {
    let names = rows.kind().column_names();
    let kept = names.get(left_column..=right_column).unwrap_or(&[]);
    let items: Vec<Value> = block_to_values(rows)
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(key, _)| kept.contains(&key.as_str()))
                    .collect::<Map<String, Value>>(),
            ),
            other => other,
        })
        .collect();
    json!({
        "left_column": left_column,
        "right_column": right_column,
        "rows": items,
    })
    .to_string()
}

pub fn song_to_portable(song: &Song) -> String {
    serde_json::to_string_pretty(song).unwrap_or_else(|e| {
        log::error!(target: "persistence", "failed to serialize song: {}", e);
        String::new()
    })
}
