//! Structural validation of JSON documents before they are deserialized.
//!
//! serde alone reports the first failure with a line/column; walking the
//! `Value` first lets errors name the field (`chords[2].interval.octave`)
//! and the rule that was broken.

use std::fmt;

use serde_json::{Map, Value};

use justly_types::interval::{MAX_OCTAVE, MIN_OCTAVE};
use justly_types::rational::{MAX_DENOMINATOR, MAX_NUMERATOR, MIN_DENOMINATOR, MIN_NUMERATOR};
use justly_types::{
    CatalogEntry, CatalogRef, Instrument, PercussionInstrument, PercussionSet, RowKind,
    SongParameter,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Not JSON at all.
    Syntax(String),
    /// JSON of the wrong shape. `path` is empty for the top-level value.
    Schema { path: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "invalid JSON: {}", e),
            Self::Schema { path, message } if path.is_empty() => write!(f, "{}", message),
            Self::Schema { path, message } => write!(f, "{}: {}", path, message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Syntax(e.to_string())
    }
}

type Check = Result<(), ValidationError>;

/// Location inside the document being checked.
#[derive(Clone, Default)]
struct JsonPath(String);

impl JsonPath {
    fn field(&self, name: &str) -> JsonPath {
        if self.0.is_empty() {
            JsonPath(name.to_string())
        } else {
            JsonPath(format!("{}.{}", self.0, name))
        }
    }

    fn index(&self, index: usize) -> JsonPath {
        JsonPath(format!("{}[{}]", self.0, index))
    }

    fn error(&self, message: impl Into<String>) -> ValidationError {
        ValidationError::Schema {
            path: self.0.clone(),
            message: message.into(),
        }
    }
}

fn object<'a>(value: &'a Value, path: &JsonPath) -> Result<&'a Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| path.error(format!("expected an object, found {}", type_name(value))))
}

fn array<'a>(value: &'a Value, path: &JsonPath) -> Result<&'a Vec<Value>, ValidationError> {
    value
        .as_array()
        .ok_or_else(|| path.error(format!("expected an array, found {}", type_name(value))))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn no_unknown_fields(map: &Map<String, Value>, path: &JsonPath, allowed: &[&str]) -> Check {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(path.field(key).error("unknown field")),
        None => Ok(()),
    }
}

fn integer_in(value: &Value, path: &JsonPath, min: i64, max: i64) -> Check {
    let number = value
        .as_i64()
        .ok_or_else(|| path.error(format!("expected an integer, found {}", type_name(value))))?;
    if !(min..=max).contains(&number) {
        return Err(path.error(format!("{} is outside {}..={}", number, min, max)));
    }
    Ok(())
}

fn number_in(value: &Value, path: &JsonPath, min: f64, max: f64) -> Check {
    let number = value
        .as_f64()
        .ok_or_else(|| path.error(format!("expected a number, found {}", type_name(value))))?;
    if !(min..=max).contains(&number) {
        return Err(path.error(format!("{} is outside {}..={}", number, min, max)));
    }
    Ok(())
}

fn string<'a>(value: &'a Value, path: &JsonPath) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| path.error(format!("expected a string, found {}", type_name(value))))
}

fn catalog_name<T: CatalogEntry>(value: &Value, path: &JsonPath) -> Check {
    let name = string(value, path)?;
    if CatalogRef::<T>::find(name).is_none() {
        return Err(path.error(format!("unknown {} \"{}\"", T::CATALOG_NAME, name)));
    }
    Ok(())
}

fn rational_fields(map: &Map<String, Value>, path: &JsonPath) -> Check {
    if let Some(value) = map.get("numerator") {
        integer_in(
            value,
            &path.field("numerator"),
            MIN_NUMERATOR.into(),
            MAX_NUMERATOR.into(),
        )?;
    }
    if let Some(value) = map.get("denominator") {
        integer_in(
            value,
            &path.field("denominator"),
            MIN_DENOMINATOR.into(),
            MAX_DENOMINATOR.into(),
        )?;
    }
    Ok(())
}

fn rational(value: &Value, path: &JsonPath) -> Check {
    let map = object(value, path)?;
    no_unknown_fields(map, path, &["numerator", "denominator"])?;
    rational_fields(map, path)
}

fn interval(value: &Value, path: &JsonPath) -> Check {
    let map = object(value, path)?;
    no_unknown_fields(map, path, &["numerator", "denominator", "octave"])?;
    rational_fields(map, path)?;
    if let Some(value) = map.get("octave") {
        integer_in(
            value,
            &path.field("octave"),
            MIN_OCTAVE.into(),
            MAX_OCTAVE.into(),
        )?;
    }
    Ok(())
}

/// Check one column value by column name.
fn column(name: &str, value: &Value, path: &JsonPath) -> Check {
    let path = path.field(name);
    match name {
        "instrument" => catalog_name::<Instrument>(value, &path),
        "percussion_set" => catalog_name::<PercussionSet>(value, &path),
        "percussion_instrument" => catalog_name::<PercussionInstrument>(value, &path),
        "interval" => interval(value, &path),
        "beats" | "velocity_ratio" | "tempo_ratio" => rational(value, &path),
        "words" => string(value, &path).map(|_| ()),
        _ => Err(path.error("unknown field")),
    }
}

/// Check a row whose keys are limited to `columns` (plus note lists for
/// whole chords).
fn row(value: &Value, path: &JsonPath, kind: RowKind, columns: &[&str], with_notes: bool) -> Check {
    let map = object(value, path)?;
    for (key, field) in map {
        if columns.contains(&key.as_str()) {
            column(key, field, path)?;
        } else if with_notes && kind == RowKind::Chord && key == "pitched_notes" {
            rows(field, &path.field(key), RowKind::PitchedNote)?;
        } else if with_notes && kind == RowKind::Chord && key == "unpitched_notes" {
            rows(field, &path.field(key), RowKind::UnpitchedNote)?;
        } else if kind.column_names().contains(&key.as_str()) {
            return Err(path
                .field(key)
                .error("column is outside the range given by left_column and right_column"));
        } else {
            return Err(path.field(key).error("unknown field"));
        }
    }
    Ok(())
}

/// Check a list of whole rows of `kind`.
fn rows(value: &Value, path_prefix: &JsonPath, kind: RowKind) -> Check {
    for (index, item) in array(value, path_prefix)?.iter().enumerate() {
        row(item, &path_prefix.index(index), kind, kind.column_names(), true)?;
    }
    Ok(())
}

pub fn check_rows(value: &Value, kind: RowKind) -> Check {
    rows(value, &JsonPath::default(), kind)
}

/// Check a whole song document.
pub fn check_song(value: &Value) -> Check {
    let root = JsonPath::default();
    let map = object(value, &root)?;
    no_unknown_fields(
        map,
        &root,
        &[
            "gain",
            "starting_key",
            "starting_velocity",
            "starting_tempo",
            "starting_instrument",
            "chords",
        ],
    )?;

    for parameter in SongParameter::ALL {
        let key = parameter_key(parameter);
        let (min, max) = parameter.range();
        match map.get(key) {
            Some(value) => number_in(value, &root.field(key), min, max)?,
            None if parameter == SongParameter::Gain => {}
            None => return Err(root.error(format!("missing required field {}", key))),
        }
    }
    if let Some(value) = map.get("starting_instrument") {
        catalog_name::<Instrument>(value, &root.field("starting_instrument"))?;
    }
    if let Some(value) = map.get("chords") {
        rows(value, &root.field("chords"), RowKind::Chord)?;
    }
    Ok(())
}

/// Check a ranged-cells envelope `{left_column, right_column, rows}`.
/// Returns the column range on success.
pub fn check_cells(value: &Value, kind: RowKind) -> Result<(usize, usize), ValidationError> {
    let root = JsonPath::default();
    let map = object(value, &root)?;
    no_unknown_fields(map, &root, &["left_column", "right_column", "rows"])?;

    let mut bounds = [0usize; 2];
    for (slot, key) in bounds.iter_mut().zip(["left_column", "right_column"]) {
        let value = map
            .get(key)
            .ok_or_else(|| root.error(format!("missing required field {}", key)))?;
        let last = kind.column_count() as i64 - 1;
        integer_in(value, &root.field(key), 0, i64::MAX)?;
        let column = value.as_u64().unwrap_or_default();
        if column as i64 > last {
            return Err(root.field(key).error(format!(
                "{} have no column {} (columns 0..={})",
                kind.plural_name(),
                column,
                last
            )));
        }
        *slot = column as usize;
    }
    let [left_column, right_column] = bounds;
    if left_column > right_column {
        return Err(root.error(format!(
            "left_column {} is after right_column {}",
            left_column, right_column
        )));
    }

    let columns = &kind.column_names()[left_column..=right_column];
    let rows_value = map
        .get("rows")
        .ok_or_else(|| root.error("missing required field rows"))?;
    let rows_path = root.field("rows");
    for (index, item) in array(rows_value, &rows_path)?.iter().enumerate() {
        row(item, &rows_path.index(index), kind, columns, false)?;
    }
    Ok((left_column, right_column))
}

pub(crate) fn parameter_key(parameter: SongParameter) -> &'static str {
    match parameter {
        SongParameter::Gain => "gain",
        SongParameter::StartingKey => "starting_key",
        SongParameter::StartingVelocity => "starting_velocity",
        SongParameter::StartingTempo => "starting_tempo",
    }
}
