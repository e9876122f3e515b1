pub mod channels;
pub mod export;
pub mod midi_out;
pub mod pitch;
pub mod player;
pub mod scheduler;
pub mod sink;
pub mod warnings;

pub use export::{export, Export, ExportError, MidiFileRenderer, Renderer, BUFFER_MS};
pub use midi_out::{list_ports, MidiOutputSink, MidiPortInfo};
pub use player::Player;
pub use scheduler::{schedule, PassOutcome, PlayParent, PlayRange};
pub use sink::{
    EventKind, NullSink, RecordingSink, SharedRecordingSink, SinkError, SinkOp, SinkResult,
    SynthEvent, SynthSink,
};
pub use warnings::{NoteKind, NotePosition, PlaybackWarning, ReferenceKind};
