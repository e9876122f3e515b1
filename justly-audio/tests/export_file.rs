use justly_audio::{export, EventKind, MidiFileRenderer, PlayRange, Renderer, BUFFER_MS};
use justly_types::{
    Chord, InstrumentRef, Interval, PercussionInstrumentRef, PercussionSetRef, PitchedNote, Song,
    UnpitchedNote,
};

fn song() -> Song {
    let mut song = Song::new();
    song.starting_instrument = InstrumentRef::find("Acoustic Grand Piano");
    for interval in [(1, 1), (5, 4), (6, 5)] {
        song.chords.push(Chord {
            interval: Interval::new(interval.0, interval.1, 0).unwrap(),
            pitched_notes: vec![
                PitchedNote::default(),
                PitchedNote {
                    interval: Interval::new(3, 2, 0).unwrap(),
                    ..PitchedNote::default()
                },
            ],
            unpitched_notes: vec![UnpitchedNote {
                percussion_set: PercussionSetRef::find("Standard"),
                percussion_instrument: PercussionInstrumentRef::find("Cowbell"),
                ..UnpitchedNote::default()
            }],
            ..Chord::default()
        });
    }
    song
}

#[test]
fn writes_a_standard_midi_file() {
    let song = song();
    let export = export(&song, PlayRange::whole_song(&song)).unwrap();
    assert!(export.warnings.is_empty());
    assert_eq!(
        export
            .events
            .iter()
            .filter(|event| matches!(event.kind, EventKind::NoteOn { .. }))
            .count(),
        9
    );
    assert_eq!(export.end_time, BUFFER_MS + 3.0 * 600.0 + BUFFER_MS);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.mid");
    let mut renderer = MidiFileRenderer::new(&path);
    renderer
        .render_until(&export.events, export.gain, export.end_time)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"MThd");
}

#[test]
fn export_matches_a_partial_range() {
    let song = song();
    let whole = export(&song, PlayRange::whole_song(&song)).unwrap();
    let last = export(&song, PlayRange::chords(2, 1)).unwrap();

    // The last chord sounds the same whether or not the earlier chords play.
    // Program selects share a timestamp with the previous chord's note-offs,
    // so compare what follows them.
    let whole_keys: Vec<_> = whole
        .events
        .iter()
        .filter(|event| event.time > BUFFER_MS + 1200.0)
        .map(|event| event.kind)
        .collect();
    let last_keys: Vec<_> = last
        .events
        .iter()
        .filter(|event| event.time > BUFFER_MS)
        .map(|event| event.kind)
        .collect();
    assert!(!last_keys.is_empty());
    assert_eq!(whole_keys, last_keys);
}
