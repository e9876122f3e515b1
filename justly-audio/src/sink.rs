//! Synthesizer sink trait: the semantic operations a scheduling pass emits.
//!
//! `SynthSink` captures what playback *means* to do (select a program, bend,
//! start and end a note) independently of where the events go: a MIDI port,
//! a file renderer, or a recording for tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

pub type SinkResult<T = ()> = Result<T, SinkError>;

#[derive(Debug, Clone)]
pub struct SinkError(pub String);

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SinkError {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    ProgramSelect { bank: i16, preset: i16 },
    PitchBend { value: u16 },
    NoteOn { key: u8, velocity: u8 },
    NoteOff { key: u8 },
}

/// One timestamped channel event. `time` is in milliseconds on the sink's
/// clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SynthEvent {
    pub time: f64,
    pub channel: u8,
    #[serde(flatten)]
    pub kind: EventKind,
}

pub trait SynthSink: Send {
    /// Current time on the sink's clock, in milliseconds.
    fn current_time(&self) -> f64;

    /// Queue an event for delivery at `event.time`.
    fn send(&self, event: SynthEvent) -> SinkResult;

    /// Master gain, 0..=10.
    fn set_gain(&self, gain: f64) -> SinkResult;

    /// Drop every queued event and silence all channels. Safe to call when
    /// nothing is playing.
    fn stop(&self) -> SinkResult;

    fn program_select(&self, channel: u8, bank: i16, preset: i16, time: f64) -> SinkResult {
        self.send(SynthEvent {
            time,
            channel,
            kind: EventKind::ProgramSelect { bank, preset },
        })
    }

    fn pitch_bend(&self, channel: u8, value: u16, time: f64) -> SinkResult {
        self.send(SynthEvent {
            time,
            channel,
            kind: EventKind::PitchBend { value },
        })
    }

    fn note_on(&self, channel: u8, key: u8, velocity: u8, time: f64) -> SinkResult {
        self.send(SynthEvent {
            time,
            channel,
            kind: EventKind::NoteOn { key, velocity },
        })
    }

    fn note_off(&self, channel: u8, key: u8, time: f64) -> SinkResult {
        self.send(SynthEvent {
            time,
            channel,
            kind: EventKind::NoteOff { key },
        })
    }
}

// ─── Recording Sink ─────────────────────────────────────────────────

/// An operation recorded by `RecordingSink`.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkOp {
    Event(SynthEvent),
    SetGain(f64),
    Stop,
}

/// Records every operation. Used for offline export and for assertions in
/// tests. The clock stands still unless moved with [`RecordingSink::set_time`].
pub struct RecordingSink {
    ops: Mutex<Vec<SinkOp>>,
    time: Mutex<f64>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub fn starting_at(time: f64) -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
            time: Mutex::new(time),
        }
    }

    pub fn set_time(&self, time: f64) {
        *lock(&self.time) = time;
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<SinkOp> {
        lock(&self.ops).clone()
    }

    /// Recorded events in emission order.
    pub fn events(&self) -> Vec<SynthEvent> {
        lock(&self.ops)
            .iter()
            .filter_map(|op| match op {
                SinkOp::Event(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    /// Count events matching a predicate.
    pub fn count<F: Fn(&SynthEvent) -> bool>(&self, f: F) -> usize {
        self.events().iter().filter(|event| f(event)).count()
    }

    pub fn clear(&self) {
        lock(&self.ops).clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SynthSink for RecordingSink {
    fn current_time(&self) -> f64 {
        *lock(&self.time)
    }

    fn send(&self, event: SynthEvent) -> SinkResult {
        lock(&self.ops).push(SinkOp::Event(event));
        Ok(())
    }

    fn set_gain(&self, gain: f64) -> SinkResult {
        lock(&self.ops).push(SinkOp::SetGain(gain));
        Ok(())
    }

    fn stop(&self) -> SinkResult {
        lock(&self.ops).push(SinkOp::Stop);
        Ok(())
    }
}

/// Wraps `Arc<RecordingSink>` so a player can own its sink while tests
/// keep an `Arc` for assertions.
pub struct SharedRecordingSink(pub Arc<RecordingSink>);

impl SynthSink for SharedRecordingSink {
    fn current_time(&self) -> f64 {
        self.0.current_time()
    }
    fn send(&self, event: SynthEvent) -> SinkResult {
        self.0.send(event)
    }
    fn set_gain(&self, gain: f64) -> SinkResult {
        self.0.set_gain(gain)
    }
    fn stop(&self) -> SinkResult {
        self.0.stop()
    }
}

// ─── NullSink ───────────────────────────────────────────────────────

/// Discards everything. Used when no MIDI output is available.
pub struct NullSink;

impl SynthSink for NullSink {
    fn current_time(&self) -> f64 {
        0.0
    }
    fn send(&self, _: SynthEvent) -> SinkResult {
        Ok(())
    }
    fn set_gain(&self, _: f64) -> SinkResult {
        Ok(())
    }
    fn stop(&self) -> SinkResult {
        Ok(())
    }
}
