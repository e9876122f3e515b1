//! Turns a range of a score into timestamped synthesizer events.
//!
//! A pass walks the chords in order, multiplying the running key, velocity
//! and tempo by each chord's ratios, and gives every note the first channel
//! that is free at the chord's start time. Problems that do not stop
//! playback are collected as [`PlaybackWarning`]s.

use std::sync::LazyLock;

use justly_types::{
    Chord, InstrumentRef, PercussionInstrumentRef, PercussionSetRef, Rational, ScoreView,
};

use crate::channels::ChannelPool;
use crate::pitch::{beats_to_ms, key_and_bend, midi_float};
use crate::sink::{SinkResult, SynthSink};
use crate::warnings::{NoteKind, NotePosition, PlaybackWarning, ReferenceKind};

pub const MAX_VELOCITY: f64 = 127.0;

/// Longest a pass may run, measured from its start time. Notes ending
/// later are skipped and chords starting later are not played.
pub const MAX_PASS_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

static FALLBACK_INSTRUMENT: LazyLock<InstrumentRef> = LazyLock::new(|| {
    InstrumentRef::named("Marimba").expect("Marimba is a General MIDI instrument")
});

static FALLBACK_PERCUSSION_SET: LazyLock<PercussionSetRef> = LazyLock::new(|| {
    PercussionSetRef::named("Standard").expect("Standard is a General MIDI drum kit")
});

static FALLBACK_PERCUSSION_INSTRUMENT: LazyLock<PercussionInstrumentRef> = LazyLock::new(|| {
    PercussionInstrumentRef::named("Tambourine").expect("Tambourine is a General MIDI drum key")
});

/// Which rows to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayParent {
    Chords,
    PitchedNotes { chord_row: usize },
    UnpitchedNotes { chord_row: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayRange {
    pub parent: PlayParent,
    pub first_row: usize,
    pub count: usize,
}

impl PlayRange {
    pub fn chords(first_row: usize, count: usize) -> Self {
        Self {
            parent: PlayParent::Chords,
            first_row,
            count,
        }
    }

    pub fn whole_song<V: ScoreView + ?Sized>(view: &V) -> Self {
        Self::chords(0, view.chord_count())
    }

    pub fn pitched_notes(chord_row: usize, first_row: usize, count: usize) -> Self {
        Self {
            parent: PlayParent::PitchedNotes { chord_row },
            first_row,
            count,
        }
    }

    pub fn unpitched_notes(chord_row: usize, first_row: usize, count: usize) -> Self {
        Self {
            parent: PlayParent::UnpitchedNotes { chord_row },
            first_row,
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassOutcome {
    pub start_time: f64,
    /// Latest note-off time emitted (`start_time` if nothing played).
    pub final_time: f64,
    pub notes_played: usize,
    pub warnings: Vec<PlaybackWarning>,
}

/// Running values carried from chord to chord.
#[derive(Debug, Clone)]
struct Modulation {
    key: f64,
    velocity: f64,
    tempo: f64,
    instrument: Option<InstrumentRef>,
    percussion_set: Option<PercussionSetRef>,
    percussion_instrument: Option<PercussionInstrumentRef>,
}

impl Modulation {
    fn new<V: ScoreView + ?Sized>(view: &V) -> Self {
        Self {
            key: view.starting_key(),
            velocity: view.starting_velocity(),
            tempo: view.starting_tempo(),
            instrument: view.starting_instrument(),
            percussion_set: None,
            percussion_instrument: None,
        }
    }

    /// An empty reference on the chord keeps the current one.
    fn apply(&mut self, chord: &Chord) {
        self.key *= chord.interval.ratio();
        self.velocity *= chord.velocity_ratio.ratio();
        self.tempo *= chord.tempo_ratio.ratio();
        if chord.instrument.is_some() {
            self.instrument = chord.instrument;
        }
        if chord.percussion_set.is_some() {
            self.percussion_set = chord.percussion_set;
        }
        if chord.percussion_instrument.is_some() {
            self.percussion_instrument = chord.percussion_instrument;
        }
    }
}

struct Pass<'a, S: SynthSink + ?Sized> {
    sink: &'a S,
    modulation: Modulation,
    channels: ChannelPool,
    current_time: f64,
    time_limit: f64,
    outcome: PassOutcome,
}

/// Schedule `range` of `view` into `sink`, starting at the sink's current
/// time. Rows past the end of the score are ignored.
pub fn schedule<V, S>(view: &V, sink: &S, range: PlayRange) -> SinkResult<PassOutcome>
where
    V: ScoreView + ?Sized,
    S: SynthSink + ?Sized,
{
    let start_time = sink.current_time();
    let mut pass = Pass {
        sink,
        modulation: Modulation::new(view),
        channels: ChannelPool::new(start_time),
        current_time: start_time,
        time_limit: start_time + MAX_PASS_MS,
        outcome: PassOutcome {
            start_time,
            final_time: start_time,
            ..PassOutcome::default()
        },
    };

    match range.parent {
        PlayParent::Chords => {
            let chord_count = view.chord_count();
            let first_row = range.first_row.min(chord_count);
            let end_row = range.first_row.saturating_add(range.count).min(chord_count);
            if end_row - first_row < range.count {
                log::warn!(target: "audio::scheduler", "play range {}+{} clipped to {} chords", range.first_row, range.count, chord_count);
            }
            for row in 0..first_row {
                if let Some(chord) = view.chord(row) {
                    pass.modulation.apply(chord);
                }
            }
            for row in first_row..end_row {
                let Some(chord) = view.chord(row) else {
                    break;
                };
                if !pass.within_limit(pass.current_time) {
                    pass.warn(PlaybackWarning::PassTooLong { chord: row });
                    break;
                }
                pass.modulation.apply(chord);
                pass.play_pitched(row, chord, 0, chord.pitched_notes.len())?;
                pass.play_unpitched(row, chord, 0, chord.unpitched_notes.len())?;
                pass.current_time += beats_to_ms(pass.modulation.tempo, chord.beats.ratio());
            }
        }
        PlayParent::PitchedNotes { chord_row } | PlayParent::UnpitchedNotes { chord_row } => {
            let Some(chord) = view.chord(chord_row) else {
                log::warn!(target: "audio::scheduler", "no chord at row {}", chord_row);
                return Ok(pass.outcome);
            };
            for row in 0..chord_row {
                if let Some(earlier) = view.chord(row) {
                    pass.modulation.apply(earlier);
                }
            }
            pass.modulation.apply(chord);
            if matches!(range.parent, PlayParent::PitchedNotes { .. }) {
                pass.play_pitched(chord_row, chord, range.first_row, range.count)?;
            } else {
                pass.play_unpitched(chord_row, chord, range.first_row, range.count)?;
            }
        }
    }

    log::debug!(target: "audio::scheduler", "scheduled {} notes, {} warnings, ends at {:.0} ms", pass.outcome.notes_played, pass.outcome.warnings.len(), pass.outcome.final_time);
    Ok(pass.outcome)
}

impl<S: SynthSink + ?Sized> Pass<'_, S> {
    fn warn(&mut self, warning: PlaybackWarning) {
        log::warn!(target: "audio::scheduler", "{}", warning);
        self.outcome.warnings.push(warning);
    }

    fn velocity(&mut self, position: NotePosition, ratio: Rational) -> u8 {
        let velocity = self.modulation.velocity * ratio.ratio();
        if velocity > MAX_VELOCITY {
            self.warn(PlaybackWarning::VelocityClamped { position, velocity });
            return MAX_VELOCITY as u8;
        }
        velocity.round().max(0.0) as u8
    }

    fn within_limit(&self, time: f64) -> bool {
        time.is_finite() && time <= self.time_limit
    }

    /// End time of a note starting now, or `None` (with a warning) if it
    /// falls outside the pass.
    fn note_end(&mut self, position: NotePosition, beats: Rational) -> Option<f64> {
        let end_time = self.current_time + beats_to_ms(self.modulation.tempo, beats.ratio());
        if self.within_limit(end_time) {
            return Some(end_time);
        }
        self.warn(PlaybackWarning::DurationOutOfRange { position, end_time });
        None
    }

    fn finish_note(&mut self, channel: usize, key: u8, end_time: f64) -> SinkResult {
        self.sink.note_off(channel as u8, key, end_time)?;
        self.channels.reserve(channel, end_time);
        self.outcome.final_time = self.outcome.final_time.max(end_time);
        self.outcome.notes_played += 1;
        Ok(())
    }

    fn play_pitched(&mut self, row: usize, chord: &Chord, first: usize, count: usize) -> SinkResult {
        for (index, note) in chord.pitched_notes.iter().enumerate().skip(first).take(count) {
            let position = NotePosition {
                chord: row,
                kind: NoteKind::Pitched,
                note: index,
            };
            let Some(channel) = self.channels.find_free_for(self.current_time, NoteKind::Pitched)
            else {
                self.warn(PlaybackWarning::OutOfChannels(position));
                continue;
            };
            let midi = midi_float(self.modulation.key * note.interval.ratio());
            let Some((key, bend)) = key_and_bend(midi) else {
                self.warn(PlaybackWarning::PitchOutOfRange { position, midi });
                continue;
            };
            let Some(end_time) = self.note_end(position, note.beats) else {
                continue;
            };

            let instrument = match note.instrument.or(self.modulation.instrument) {
                Some(instrument) => instrument,
                None => {
                    let substitute = *FALLBACK_INSTRUMENT;
                    self.warn(PlaybackWarning::MissingReference {
                        position,
                        kind: ReferenceKind::Instrument,
                        substitute: substitute.name(),
                    });
                    substitute
                }
            };
            let velocity = self.velocity(position, note.velocity_ratio);

            let time = self.current_time;
            let midi_channel = channel as u8;
            self.sink.program_select(
                midi_channel,
                instrument.bank_number,
                instrument.preset_number,
                time,
            )?;
            self.sink.pitch_bend(midi_channel, bend, time + 1.0)?;
            self.sink.note_on(midi_channel, key, velocity, time + 2.0)?;
            self.finish_note(channel, key, end_time)?;
        }
        Ok(())
    }

    fn play_unpitched(&mut self, row: usize, chord: &Chord, first: usize, count: usize) -> SinkResult {
        for (index, note) in chord.unpitched_notes.iter().enumerate().skip(first).take(count) {
            let position = NotePosition {
                chord: row,
                kind: NoteKind::Unpitched,
                note: index,
            };
            let Some(channel) = self.channels.find_free_for(self.current_time, NoteKind::Unpitched)
            else {
                self.warn(PlaybackWarning::OutOfChannels(position));
                continue;
            };
            let Some(end_time) = self.note_end(position, note.beats) else {
                continue;
            };

            let percussion_set = match note.percussion_set.or(self.modulation.percussion_set) {
                Some(set) => set,
                None => {
                    let substitute = *FALLBACK_PERCUSSION_SET;
                    self.warn(PlaybackWarning::MissingReference {
                        position,
                        kind: ReferenceKind::PercussionSet,
                        substitute: substitute.name(),
                    });
                    substitute
                }
            };
            let percussion_instrument = match note
                .percussion_instrument
                .or(self.modulation.percussion_instrument)
            {
                Some(instrument) => instrument,
                None => {
                    let substitute = *FALLBACK_PERCUSSION_INSTRUMENT;
                    self.warn(PlaybackWarning::MissingReference {
                        position,
                        kind: ReferenceKind::PercussionInstrument,
                        substitute: substitute.name(),
                    });
                    substitute
                }
            };
            let key = percussion_instrument.midi_number.clamp(0, 127) as u8;
            let velocity = self.velocity(position, note.velocity_ratio);

            let time = self.current_time;
            let midi_channel = channel as u8;
            self.sink.program_select(
                midi_channel,
                percussion_set.bank_number,
                percussion_set.preset_number,
                time,
            )?;
            self.sink.note_on(midi_channel, key, velocity, time + 1.0)?;
            self.finish_note(channel, key, end_time)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{CHANNEL_COUNT, PERCUSSION_CHANNEL};
    use crate::sink::{EventKind, RecordingSink, SynthEvent};
    use justly_types::{Interval, PitchedNote, Song, UnpitchedNote};

    fn interval(numerator: i32, denominator: i32, octave: i32) -> Interval {
        Interval::new(numerator, denominator, octave).unwrap()
    }

    fn chord_with(interval: Interval, pitched: usize) -> Chord {
        Chord {
            interval,
            pitched_notes: vec![PitchedNote::default(); pitched],
            ..Chord::default()
        }
    }

    fn flute() -> InstrumentRef {
        InstrumentRef::named("Flute").unwrap()
    }

    fn note_ons(sink: &RecordingSink) -> Vec<SynthEvent> {
        sink.events()
            .into_iter()
            .filter(|event| matches!(event.kind, EventKind::NoteOn { .. }))
            .collect()
    }

    #[test]
    fn fifth_above_a440_bends_up() {
        let mut song = Song::new();
        song.starting_key = 440.0;
        song.starting_instrument = Some(flute());
        song.chords.push(chord_with(interval(3, 2, 0), 1));
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.notes_played, 1);
        assert_eq!(outcome.final_time, 600.0);
        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            SynthEvent {
                time: 0.0,
                channel: 0,
                kind: EventKind::ProgramSelect {
                    bank: flute().bank_number,
                    preset: flute().preset_number,
                },
            }
        );
        assert_eq!(events[1].kind, EventKind::PitchBend { value: 8272 });
        assert_eq!(events[1].time, 1.0);
        assert_eq!(events[2].kind, EventKind::NoteOn { key: 76, velocity: 10 });
        assert_eq!(events[2].time, 2.0);
        assert_eq!(events[3].kind, EventKind::NoteOff { key: 76 });
        assert_eq!(events[3].time, 600.0);
    }

    #[test]
    fn chord_ratios_cascade_into_later_chords() {
        let mut song = Song::new();
        song.starting_instrument = Some(flute());
        song.chords.push(chord_with(interval(3, 2, 0), 0));
        song.chords.push(chord_with(interval(5, 4, 0), 0));
        song.chords.push(chord_with(interval(1, 1, 1), 1));
        let sink = RecordingSink::new();

        // Only the last chord plays, but the first two still modulate it.
        schedule(&song, &sink, PlayRange::chords(2, 1)).unwrap();

        let expected = key_and_bend(midi_float(220.0 * 1.5 * 1.25 * 2.0)).unwrap();
        let ons = note_ons(&sink);
        assert_eq!(ons.len(), 1);
        assert_eq!(ons[0].time, 2.0);
        assert_eq!(
            ons[0].kind,
            EventKind::NoteOn {
                key: expected.0,
                velocity: 10
            }
        );
        assert!(sink.count(|event| event.kind == EventKind::PitchBend { value: expected.1 }) == 1);
    }

    #[test]
    fn tempo_ratio_changes_chord_length() {
        let mut song = Song::new();
        song.starting_instrument = Some(flute());
        let mut first = chord_with(Interval::default(), 1);
        first.tempo_ratio = Rational::new(2, 1).unwrap();
        song.chords.push(first);
        song.chords.push(chord_with(Interval::default(), 1));
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        // 200 bpm for both chords: 300 ms each.
        let ons = note_ons(&sink);
        assert_eq!(ons[1].time, 302.0);
        assert_eq!(outcome.final_time, 600.0);
    }

    #[test]
    fn seventeenth_note_runs_out_of_channels() {
        let mut song = Song::new();
        song.starting_instrument = Some(flute());
        song.chords.push(chord_with(Interval::default(), 17));
        song.chords.push(chord_with(Interval::default(), 1));
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        assert_eq!(
            outcome.warnings,
            vec![PlaybackWarning::OutOfChannels(NotePosition {
                chord: 0,
                kind: NoteKind::Pitched,
                note: 16,
            })]
        );
        let ons = note_ons(&sink);
        assert_eq!(ons.len(), 17);
        let channels: Vec<u8> = ons[..16].iter().map(|event| event.channel).collect();
        let mut expected: Vec<u8> = (0..CHANNEL_COUNT as u8)
            .filter(|&channel| usize::from(channel) != PERCUSSION_CHANNEL)
            .collect();
        expected.push(PERCUSSION_CHANNEL as u8);
        assert_eq!(channels, expected);
        // The next chord starts as the first chord's notes end.
        assert_eq!(ons[16].time, 602.0);
        assert_eq!(ons[16].channel, 0);
    }

    #[test]
    fn missing_references_fall_back() {
        let mut song = Song::new();
        let mut chord = chord_with(Interval::default(), 1);
        chord.unpitched_notes.push(UnpitchedNote::default());
        song.chords.push(chord);
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        let substitutes: Vec<_> = outcome
            .warnings
            .iter()
            .map(|warning| match warning {
                PlaybackWarning::MissingReference { kind, substitute, .. } => (*kind, *substitute),
                other => panic!("unexpected warning {other}"),
            })
            .collect();
        assert_eq!(
            substitutes,
            vec![
                (ReferenceKind::Instrument, "Marimba"),
                (ReferenceKind::PercussionSet, "Standard"),
                (ReferenceKind::PercussionInstrument, "Tambourine"),
            ]
        );

        let marimba = InstrumentRef::named("Marimba").unwrap();
        let standard = PercussionSetRef::named("Standard").unwrap();
        let tambourine = PercussionInstrumentRef::named("Tambourine").unwrap();
        let events = sink.events();
        assert_eq!(
            events[0].kind,
            EventKind::ProgramSelect {
                bank: marimba.bank_number,
                preset: marimba.preset_number
            }
        );
        let unpitched: Vec<_> = events.iter().filter(|event| usize::from(event.channel) == PERCUSSION_CHANNEL)
            .collect();
        assert_eq!(unpitched.len(), 3);
        assert_eq!(
            unpitched[0].kind,
            EventKind::ProgramSelect {
                bank: standard.bank_number,
                preset: standard.preset_number
            }
        );
        assert_eq!(unpitched[1].time, 1.0);
        assert_eq!(
            unpitched[1].kind,
            EventKind::NoteOn {
                key: tambourine.midi_number as u8,
                velocity: 10
            }
        );
    }

    #[test]
    fn chord_references_carry_forward() {
        let mut song = Song::new();
        let mut first = chord_with(Interval::default(), 0);
        first.instrument = Some(flute());
        song.chords.push(first);
        song.chords.push(chord_with(Interval::default(), 1));
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::chords(1, 1)).unwrap();

        assert!(outcome.warnings.is_empty());
        assert_eq!(
            sink.events()[0].kind,
            EventKind::ProgramSelect {
                bank: flute().bank_number,
                preset: flute().preset_number
            }
        );
    }

    #[test]
    fn loud_notes_clamp_to_127() {
        let mut song = Song::new();
        song.starting_velocity = 100.0;
        song.starting_instrument = Some(flute());
        let mut chord = chord_with(Interval::default(), 1);
        chord.velocity_ratio = Rational::new(2, 1).unwrap();
        song.chords.push(chord);
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        assert!(matches!(
            outcome.warnings.as_slice(),
            [PlaybackWarning::VelocityClamped { velocity, .. }] if *velocity == 200.0
        ));
        assert_eq!(
            note_ons(&sink)[0].kind,
            EventKind::NoteOn {
                key: 57,
                velocity: 127
            }
        );
    }

    #[test]
    fn unplayable_pitch_is_skipped() {
        let mut song = Song::new();
        song.starting_instrument = Some(flute());
        let mut chord = chord_with(Interval::default(), 2);
        chord.pitched_notes[0].interval = interval(199, 1, 9);
        song.chords.push(chord);
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        assert!(matches!(
            outcome.warnings.as_slice(),
            [PlaybackWarning::PitchOutOfRange { .. }]
        ));
        let ons = note_ons(&sink);
        assert_eq!(ons.len(), 1);
        assert_eq!(ons[0].channel, 0);
    }

    #[test]
    fn skipped_pitch_reports_only_the_pitch() {
        let mut song = Song::new();
        let mut chord = chord_with(Interval::default(), 1);
        chord.pitched_notes[0].interval = interval(199, 1, 9);
        song.chords.push(chord);
        let sink = RecordingSink::new();

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        assert!(matches!(
            outcome.warnings.as_slice(),
            [PlaybackWarning::PitchOutOfRange { .. }]
        ));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn triple_of_220_is_660() {
        let mut song = Song::new();
        song.starting_instrument = Some(flute());
        song.chords.push(chord_with(interval(3, 1, 0), 1));
        let sink = RecordingSink::new();

        schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        let events = sink.events();
        assert_eq!(events[1].kind, EventKind::PitchBend { value: 8272 });
        assert_eq!(events[2].kind, EventKind::NoteOn { key: 76, velocity: 10 });
    }

    fn slowing_chord() -> Chord {
        Chord {
            beats: Rational::new(199, 1).unwrap(),
            tempo_ratio: Rational::new(1, 199).unwrap(),
            pitched_notes: vec![PitchedNote {
                beats: Rational::new(199, 1).unwrap(),
                ..PitchedNote::default()
            }],
            ..Chord::default()
        }
    }

    #[test]
    fn runaway_slowdown_stops_at_the_time_limit() {
        let mut song = Song::new();
        song.starting_tempo = 25.0;
        song.starting_instrument = Some(flute());
        song.chords.push(chord_with(Interval::default(), 1));
        song.chords.extend(std::iter::repeat_with(slowing_chord).take(200));
        let sink = RecordingSink::starting_at(500.0);

        let outcome = schedule(&song, &sink, PlayRange::whole_song(&song)).unwrap();

        assert_eq!(outcome.notes_played, 1);
        assert_eq!(outcome.final_time, 500.0 + 2400.0);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [
                PlaybackWarning::DurationOutOfRange { position, .. },
                PlaybackWarning::PassTooLong { chord: 2 },
            ] if position.chord == 1
        ));
        assert!(sink
            .events()
            .iter()
            .all(|event| event.time.is_finite() && event.time <= 500.0 + MAX_PASS_MS));
    }

    #[test]
    fn note_range_plays_at_chord_start_with_modulation() {
        let mut song = Song::new();
        song.starting_instrument = Some(flute());
        song.chords.push(chord_with(interval(2, 1, 0), 1));
        let mut chord = chord_with(interval(3, 2, 0), 0);
        chord.pitched_notes.push(PitchedNote::default());
        chord.pitched_notes.push(PitchedNote {
            interval: interval(5, 4, 0),
            ..PitchedNote::default()
        });
        song.chords.push(chord);
        let sink = RecordingSink::starting_at(1000.0);

        let outcome = schedule(&song, &sink, PlayRange::pitched_notes(1, 1, 1)).unwrap();

        assert_eq!(outcome.notes_played, 1);
        let (key, _) = key_and_bend(midi_float(220.0 * 2.0 * 1.5 * 1.25)).unwrap();
        let ons = note_ons(&sink);
        assert_eq!(ons.len(), 1);
        assert_eq!(ons[0].time, 1002.0);
        assert_eq!(ons[0].kind, EventKind::NoteOn { key, velocity: 10 });
    }

    #[test]
    fn range_past_the_end_plays_nothing() {
        let mut song = Song::new();
        song.chords.push(chord_with(Interval::default(), 1));
        let sink = RecordingSink::starting_at(250.0);

        let outcome = schedule(&song, &sink, PlayRange::chords(4, 2)).unwrap();
        assert_eq!(outcome.final_time, 250.0);
        assert!(sink.events().is_empty());

        let outcome = schedule(&song, &sink, PlayRange::unpitched_notes(9, 0, 1)).unwrap();
        assert_eq!(outcome.notes_played, 0);
    }
}
