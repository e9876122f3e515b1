#[cfg(test)]
mod tests {
    use crate::state::document::RowBlock;
    use crate::state::persistence::{
        cells_to_portable, load_song, parse_song, rows_to_portable, save_song, song_to_portable,
        validate_and_parse, Parsed, PersistenceError, SchemaKind, ValidationError,
    };
    use justly_types::{
        Chord, InstrumentRef, Interval, PercussionInstrumentRef, PercussionSetRef, PitchedNote,
        Rational, RowKind, Song, UnpitchedNote,
    };

    fn schema_error(result: Result<Parsed, ValidationError>) -> (String, String) {
        match result {
            Err(ValidationError::Schema { path, message }) => (path, message),
            other => panic!("expected a schema error, got {:?}", other),
        }
    }

    fn rich_song() -> Song {
        let mut song = Song::new();
        song.gain = 3.5;
        song.starting_key = 261.5;
        song.starting_instrument = InstrumentRef::find("Celesta");
        song.chords = vec![
            Chord {
                interval: Interval::new(3, 2, -1).unwrap(),
                beats: Rational::new(1, 2).unwrap(),
                tempo_ratio: Rational::new(4, 3).unwrap(),
                words: "hello".into(),
                pitched_notes: vec![
                    PitchedNote::default(),
                    PitchedNote {
                        instrument: InstrumentRef::find("Marimba"),
                        interval: Interval::new(5, 4, 1).unwrap(),
                        velocity_ratio: Rational::new(2, 1).unwrap(),
                        ..PitchedNote::default()
                    },
                ],
                unpitched_notes: vec![UnpitchedNote {
                    percussion_set: PercussionSetRef::find("Jazz"),
                    percussion_instrument: PercussionInstrumentRef::find("Cowbell"),
                    ..UnpitchedNote::default()
                }],
                ..Chord::default()
            },
            Chord::default(),
        ];
        song
    }

    #[test]
    fn song_round_trip() {
        let song = rich_song();
        assert_eq!(parse_song(&song_to_portable(&song)).unwrap(), song);
    }

    #[test]
    fn defaults_are_omitted() {
        let mut song = Song::new();
        song.chords = vec![Chord::default()];
        let value: serde_json::Value = serde_json::from_str(&song_to_portable(&song)).unwrap();
        assert_eq!(value["chords"], serde_json::json!([{}]));
        assert_eq!(parse_song(&song_to_portable(&song)).unwrap(), song);
    }

    #[test]
    fn missing_required_field() {
        let (path, message) = schema_error(validate_and_parse(
            r#"{"starting_key": 220, "starting_velocity": 10}"#,
            SchemaKind::Song,
        ));
        assert_eq!(path, "");
        assert_eq!(message, "missing required field starting_tempo");
    }

    #[test]
    fn errors_name_the_location() {
        let text = r#"{
            "starting_key": 220, "starting_velocity": 10, "starting_tempo": 100,
            "chords": [{}, {}, {"pitched_notes": [{"interval": {"numerator": 200}}]}]
        }"#;
        let (path, message) = schema_error(validate_and_parse(text, SchemaKind::Song));
        assert_eq!(path, "chords[2].pitched_notes[0].interval.numerator");
        assert_eq!(message, "200 is outside 1..=199");
    }

    #[test]
    fn rejects_unknown_names_and_fields() {
        let text = r#"[{"instrument": "Kazoo"}]"#;
        let (path, message) =
            schema_error(validate_and_parse(text, SchemaKind::Rows(RowKind::PitchedNote)));
        assert_eq!(path, "[0].instrument");
        assert_eq!(message, "unknown instrument \"Kazoo\"");

        let text = r#"[{"tempo_ratio": {}}]"#;
        let (path, _) =
            schema_error(validate_and_parse(text, SchemaKind::Rows(RowKind::PitchedNote)));
        assert_eq!(path, "[0].tempo_ratio");
    }

    #[test]
    fn out_of_range_scalar_is_rejected() {
        let text = r#"{"starting_key": 1000, "starting_velocity": 10, "starting_tempo": 100}"#;
        let (path, _) = schema_error(validate_and_parse(text, SchemaKind::Song));
        assert_eq!(path, "starting_key");
    }

    #[test]
    fn syntax_error() {
        assert!(matches!(
            validate_and_parse("{", SchemaKind::Song),
            Err(ValidationError::Syntax(_))
        ));
    }

    #[test]
    fn rows_round_trip() {
        let rows = RowBlock::UnpitchedNotes(rich_song().chords[0].unpitched_notes.clone());
        let parsed =
            validate_and_parse(&rows_to_portable(&rows), SchemaKind::Rows(RowKind::UnpitchedNote))
                .unwrap();
        assert_eq!(parsed, Parsed::Rows(rows));
    }

    #[test]
    fn chords_are_not_pitched_notes() {
        let rows = RowBlock::Chords(vec![Chord {
            tempo_ratio: Rational::new(2, 1).unwrap(),
            ..Chord::default()
        }]);
        let text = rows_to_portable(&rows);
        assert!(validate_and_parse(&text, SchemaKind::Rows(RowKind::PitchedNote)).is_err());
    }

    #[test]
    fn cells_keep_only_the_range() {
        let song = rich_song();
        let rows = RowBlock::PitchedNotes(song.chords[0].pitched_notes.clone());
        let text = cells_to_portable(&rows, 1, 2);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["left_column"], 1);
        assert_eq!(value["rows"][1], serde_json::json!({"interval": {"numerator": 5, "denominator": 4, "octave": 1}}));

        let Parsed::Cells(payload) =
            validate_and_parse(&text, SchemaKind::Cells(RowKind::PitchedNote)).unwrap()
        else {
            panic!("expected cells");
        };
        assert_eq!((payload.left_column, payload.right_column), (1, 2));
        let RowBlock::PitchedNotes(notes) = payload.rows else {
            panic!("expected pitched notes");
        };
        assert_eq!(notes[1].interval, Interval::new(5, 4, 1).unwrap());
        assert_eq!(notes[1].instrument, None);
    }

    #[test]
    fn cells_with_invalid_columns() {
        let text = r#"{"left_column": 3, "right_column": 7, "rows": []}"#;
        let (path, message) =
            schema_error(validate_and_parse(text, SchemaKind::Cells(RowKind::PitchedNote)));
        assert_eq!(path, "right_column");
        assert_eq!(message, "pitched notes have no column 7 (columns 0..=4)");

        let text = r#"{"left_column": 2, "right_column": 1, "rows": []}"#;
        assert!(validate_and_parse(text, SchemaKind::Cells(RowKind::Chord)).is_err());

        let text = r#"{"left_column": 0, "right_column": 0, "rows": [{"words": "x"}]}"#;
        let (path, _) = schema_error(validate_and_parse(text, SchemaKind::Cells(RowKind::Chord)));
        assert_eq!(path, "rows[0].words");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.json");
        let song = rich_song();
        save_song(&path, &song).unwrap();
        assert_eq!(load_song(&path).unwrap(), song);
    }

    #[test]
    fn load_reports_io_and_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_song(&missing), Err(PersistenceError::Io(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"starting_key": 220}"#).unwrap();
        assert!(matches!(load_song(&bad), Err(PersistenceError::Invalid(_))));
    }
}
