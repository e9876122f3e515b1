use justly_types::{Chord, PitchedNote, UnpitchedNote};

use super::{Document, DocumentError, DocumentResult, RowBlock, RowsParent};

impl Document {
    /// Build `count` new rows to insert before `first_row`, pre-filled from
    /// the row just above the insert point (or, for notes, the parent chord).
    pub fn template_rows(
        &self,
        parent: RowsParent,
        first_row: usize,
        count: usize,
    ) -> DocumentResult<RowBlock> {
        let len = self.rows_len(parent)?;
        if first_row > len {
            return Err(DocumentError::InsertOutOfRange {
                parent,
                first_row,
                count: len,
            });
        }
        let previous = first_row.checked_sub(1);

        Ok(match parent {
            RowsParent::Song => {
                let chord = match previous.and_then(|row| self.chord_id(row)) {
                    Some(id) => chord_template(self.chord_by_id(id)?),
                    None => Chord::default(),
                };
                RowBlock::Chords(vec![chord; count])
            }
            RowsParent::PitchedNotes(id) => {
                let chord = self.chord_by_id(id)?;
                let note = match previous.and_then(|row| chord.pitched_notes.get(row)) {
                    Some(note) => PitchedNote {
                        instrument: note.instrument,
                        beats: note.beats,
                        velocity_ratio: note.velocity_ratio,
                        words: note.words.clone(),
                        ..PitchedNote::default()
                    },
                    None => PitchedNote {
                        beats: chord.beats,
                        velocity_ratio: chord.velocity_ratio,
                        words: chord.words.clone(),
                        ..PitchedNote::default()
                    },
                };
                RowBlock::PitchedNotes(vec![note; count])
            }
            RowsParent::UnpitchedNotes(id) => {
                let chord = self.chord_by_id(id)?;
                let note = match previous.and_then(|row| chord.unpitched_notes.get(row)) {
                    Some(note) => UnpitchedNote {
                        percussion_set: note.percussion_set,
                        percussion_instrument: note.percussion_instrument,
                        beats: note.beats,
                        velocity_ratio: note.velocity_ratio,
                        words: note.words.clone(),
                    },
                    None => UnpitchedNote {
                        beats: chord.beats,
                        velocity_ratio: chord.velocity_ratio,
                        words: chord.words.clone(),
                        ..UnpitchedNote::default()
                    },
                };
                RowBlock::UnpitchedNotes(vec![note; count])
            }
        })
    }
}

fn chord_template(previous: &Chord) -> Chord {
    Chord {
        beats: previous.beats,
        velocity_ratio: previous.velocity_ratio,
        tempo_ratio: previous.tempo_ratio,
        words: previous.words.clone(),
        ..Chord::default()
    }
}
