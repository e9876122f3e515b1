//! In-process clipboard holding portable text.

use std::fmt;

use justly_types::RowKind;

use super::persistence::SchemaKind;

/// What the clipboard text describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Whole rows, pasted by insertion.
    Rows(RowKind),
    /// A column range of rows, pasted over existing rows.
    Cells(RowKind),
}

impl PayloadKind {
    pub fn schema(self) -> SchemaKind {
        match self {
            PayloadKind::Rows(kind) => SchemaKind::Rows(kind),
            PayloadKind::Cells(kind) => SchemaKind::Cells(kind),
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.schema().fmt(f)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    pub contents: Option<(PayloadKind, String)>,
}

impl Clipboard {
    pub fn set(&mut self, kind: PayloadKind, text: String) {
        self.contents = Some((kind, text));
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }
}
