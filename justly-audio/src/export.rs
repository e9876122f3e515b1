//! Offline export: the same events a live pass would play, framed by
//! silence and handed to a [`Renderer`].

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use justly_types::ScoreView;
use midly::num::{u14, u15, u24, u28, u4, u7};
use midly::{
    Format, Header, MetaMessage, MidiMessage, PitchBend, Smf, Timing, TrackEvent, TrackEventKind,
};

use crate::channels::CHANNEL_COUNT;
use crate::scheduler::{schedule, PlayRange};
use crate::sink::{EventKind, RecordingSink, SinkError, SynthEvent};
use crate::warnings::PlaybackWarning;

/// Silence before the first event and after the last note ends.
pub const BUFFER_MS: f64 = 500.0;

#[derive(Debug)]
pub enum ExportError {
    Sink(SinkError),
    Io(io::Error),
    /// A time that cannot be written as a MIDI file tick.
    TimeOutOfRange(f64),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Sink(e) => write!(f, "scheduling failed: {}", e),
            ExportError::Io(e) => write!(f, "write failed: {}", e),
            ExportError::TimeOutOfRange(time) => {
                write!(f, "time {} ms is outside the MIDI file range", time)
            }
        }
    }
}

impl std::error::Error for ExportError {}

impl From<SinkError> for ExportError {
    fn from(e: SinkError) -> Self {
        ExportError::Sink(e)
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// A rendered-to-memory pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// Sorted by time; the earliest can be no sooner than [`BUFFER_MS`].
    pub events: Vec<SynthEvent>,
    /// Last note-off plus [`BUFFER_MS`].
    pub end_time: f64,
    pub gain: f64,
    pub warnings: Vec<PlaybackWarning>,
}

impl Export {
    pub fn render_with<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), ExportError> {
        renderer.render_until(&self.events, self.gain, self.end_time)
    }
}

/// Consumes an event stream offline, returning once everything up to
/// `end_time` has been rendered.
pub trait Renderer {
    fn render_until(
        &mut self,
        events: &[SynthEvent],
        gain: f64,
        end_time: f64,
    ) -> Result<(), ExportError>;
}

pub fn export<V: ScoreView + ?Sized>(view: &V, range: PlayRange) -> Result<Export, ExportError> {
    let sink = RecordingSink::starting_at(BUFFER_MS);
    let outcome = schedule(view, &sink, range)?;
    let mut events = sink.events();
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    log::debug!(target: "audio::export", "exported {} events", events.len());
    Ok(Export {
        events,
        end_time: outcome.final_time + BUFFER_MS,
        gain: view.gain(),
        warnings: outcome.warnings,
    })
}

// ─── Standard MIDI File ─────────────────────────────────────────────

/// One quarter note per 500 ms at 500 ticks per quarter: 1 tick = 1 ms.
const TICKS_PER_QUARTER: u16 = 500;
const MICROS_PER_QUARTER: u32 = 500_000;

/// Largest tick a 28-bit delta from zero can reach.
const MAX_TICK: u32 = 0x0FFF_FFFF;

const CC_BANK_MSB: u8 = 0;
const CC_VOLUME: u8 = 7;
const CC_BANK_LSB: u8 = 32;

/// Writes a single-track Standard MIDI File.
pub struct MidiFileRenderer {
    path: PathBuf,
}

impl MidiFileRenderer {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Renderer for MidiFileRenderer {
    fn render_until(
        &mut self,
        events: &[SynthEvent],
        gain: f64,
        end_time: f64,
    ) -> Result<(), ExportError> {
        let bytes = encode_smf(events, gain, end_time)?;
        std::fs::write(&self.path, bytes)?;
        log::info!(target: "audio::export", "wrote {}", self.path.display());
        Ok(())
    }
}

fn midi_event(channel: u8, message: MidiMessage) -> TrackEventKind<'static> {
    TrackEventKind::Midi {
        channel: u4::from(channel),
        message,
    }
}

fn controller(channel: u8, controller: u8, value: u8) -> TrackEventKind<'static> {
    midi_event(
        channel,
        MidiMessage::Controller {
            controller: u7::from(controller),
            value: u7::from(value),
        },
    )
}

/// The MIDI messages for one event, in sending order. Banks are sent as
/// bank = MSB * 128 + LSB, so the percussion bank 128 becomes MSB 1, LSB 0.
pub(crate) fn event_messages(event: &SynthEvent) -> Vec<TrackEventKind<'static>> {
    let channel = event.channel;
    match event.kind {
        EventKind::ProgramSelect { bank, preset } => {
            let bank = bank.clamp(0, 16383) as u16;
            vec![
                controller(channel, CC_BANK_MSB, (bank >> 7) as u8),
                controller(channel, CC_BANK_LSB, (bank & 0x7f) as u8),
                midi_event(
                    channel,
                    MidiMessage::ProgramChange {
                        program: u7::from(preset.clamp(0, 127) as u8),
                    },
                ),
            ]
        }
        EventKind::PitchBend { value } => vec![midi_event(
            channel,
            MidiMessage::PitchBend {
                bend: PitchBend(u14::from(value)),
            },
        )],
        EventKind::NoteOn { key, velocity } => vec![midi_event(
            channel,
            MidiMessage::NoteOn {
                key: u7::from(key),
                vel: u7::from(velocity),
            },
        )],
        EventKind::NoteOff { key } => vec![midi_event(
            channel,
            MidiMessage::NoteOff {
                key: u7::from(key),
                vel: u7::from(0),
            },
        )],
    }
}

/// Channel volume for a 0..=10 gain.
pub(crate) fn gain_to_volume(gain: f64) -> u8 {
    (gain.clamp(0.0, 10.0) / 10.0 * 127.0).round() as u8
}

fn tick(time: f64) -> Result<u32, ExportError> {
    if !time.is_finite() || !(0.0..=f64::from(MAX_TICK)).contains(&time.round()) {
        return Err(ExportError::TimeOutOfRange(time));
    }
    Ok(time.round() as u32)
}

fn encode_smf(events: &[SynthEvent], gain: f64, end_time: f64) -> Result<Vec<u8>, ExportError> {
    let mut track = Vec::with_capacity(events.len() * 2 + CHANNEL_COUNT + 2);
    track.push(TrackEvent {
        delta: u28::from(0_u32),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::from(MICROS_PER_QUARTER))),
    });
    let volume = gain_to_volume(gain);
    for channel in 0..CHANNEL_COUNT as u8 {
        track.push(TrackEvent {
            delta: u28::from(0_u32),
            kind: controller(channel, CC_VOLUME, volume),
        });
    }

    let mut previous_tick = 0_u32;
    for event in events {
        let tick = tick(event.time)?;
        let mut delta = tick.saturating_sub(previous_tick);
        for kind in event_messages(event) {
            track.push(TrackEvent {
                delta: u28::from(delta),
                kind,
            });
            delta = 0;
        }
        previous_tick = previous_tick.max(tick);
    }

    let end_tick = tick(end_time)?;
    track.push(TrackEvent {
        delta: u28::from(end_tick.saturating_sub(previous_tick)),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let header = Header {
        format: Format::SingleTrack,
        timing: Timing::Metrical(u15::from(TICKS_PER_QUARTER)),
    };
    let mut bytes = Vec::new();
    Smf {
        header,
        tracks: vec![track],
    }
    .write_std(&mut bytes)?;
    Ok(bytes)
}
