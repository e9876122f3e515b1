//! Frequency to MIDI key conversion with pitch-bend correction.

/// Concert A.
pub const CONCERT_A_FREQUENCY: f64 = 440.0;
pub const CONCERT_A_MIDI: f64 = 69.0;

/// Bend units per semitone with a ±2 semitone bend range.
pub const BEND_PER_SEMITONE: f64 = 4096.0;
pub const BEND_CENTRE: u16 = 8192;
pub const MAX_BEND: u16 = 16383;

/// Fractional MIDI key for `frequency`.
pub fn midi_float(frequency: f64) -> f64 {
    12.0 * (frequency / CONCERT_A_FREQUENCY).log2() + CONCERT_A_MIDI
}

/// Nearest MIDI key and the pitch-bend value that corrects it to
/// `midi_float`. `None` if the key falls outside 0..=127.
pub fn key_and_bend(midi_float: f64) -> Option<(u8, u16)> {
    let key = midi_float.round();
    if !(0.0..=127.0).contains(&key) {
        return None;
    }
    let fraction = midi_float - key;
    let bend = ((fraction + 2.0) * BEND_PER_SEMITONE).round();
    Some((key as u8, bend.clamp(0.0, f64::from(MAX_BEND)) as u16))
}

/// Milliseconds taken by `beats` at `tempo` beats per minute.
pub fn beats_to_ms(tempo: f64, beats: f64) -> f64 {
    beats * 60_000.0 / tempo
}
