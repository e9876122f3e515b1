use std::fmt;

/// A value that cannot exist in a score: out-of-range ratio parts, an
/// unknown catalog name, or a cell value of the wrong type for its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    NumeratorOutOfRange(i32),
    DenominatorOutOfRange(i32),
    OctaveOutOfRange(i32),
    UnknownName { catalog: &'static str, name: String },
    WrongCellType { column: &'static str, expected: &'static str },
    NoSuchColumn { kind: &'static str, column: usize },
    Parse(String),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::interval::{MAX_OCTAVE, MIN_OCTAVE};
        use crate::rational::{MAX_DENOMINATOR, MAX_NUMERATOR};
        match self {
            Self::NumeratorOutOfRange(n) => {
                write!(f, "numerator {} is outside 1..={}", n, MAX_NUMERATOR)
            }
            Self::DenominatorOutOfRange(d) => {
                write!(f, "denominator {} is outside 1..={}", d, MAX_DENOMINATOR)
            }
            Self::OctaveOutOfRange(o) => {
                write!(f, "octave {} is outside {}..={}", o, MIN_OCTAVE, MAX_OCTAVE)
            }
            Self::UnknownName { catalog, name } => write!(f, "unknown {} \"{}\"", catalog, name),
            Self::WrongCellType { column, expected } => {
                write!(f, "column {} expects {}", column, expected)
            }
            Self::NoSuchColumn { kind, column } => {
                write!(f, "{} have no column {}", kind, column)
            }
            Self::Parse(text) => write!(f, "cannot parse \"{}\"", text),
        }
    }
}

impl std::error::Error for ValueError {}
