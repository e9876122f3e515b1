//! # justly-types
//!
//! Shared type definitions for the Justly score editor: bounded ratios and
//! intervals, the instrument/percussion catalogs, the song tree, column
//! enumerations with typed cell access, and the read-only [`ScoreView`]
//! seam used by playback.

pub mod catalog;
pub mod columns;
mod error;
pub mod interval;
pub mod rational;
pub mod song;
mod view;

pub use catalog::{
    CatalogEntry, CatalogRef, Instrument, InstrumentRef, PercussionInstrument,
    PercussionInstrumentRef, PercussionSet, PercussionSetRef,
};
pub use columns::{CellValue, Row, RowKind};
pub use error::ValueError;
pub use interval::Interval;
pub use rational::Rational;
pub use song::{Chord, PitchedNote, Song, SongParameter, UnpitchedNote};
pub use view::ScoreView;
