use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use justly_audio::{
    export, list_ports, MidiFileRenderer, MidiOutputSink, PlayRange, PlaybackWarning, Player,
    Renderer,
};
use justly_core::state::persistence::load_song;
use justly_core::types::Song;

const USAGE: &str = "usage: justly [-v|--verbose] <command>

commands:
  validate <song.json>                 check a song file against the schema
  events <song.json> [range]           print the scheduled events as JSON
  export <song.json> <out.mid> [range] write a Standard MIDI File
  play <song.json> [range] [--port NAME]
  ports                                list MIDI output ports

range: --first N --count N (chords; defaults to the whole song)";

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("justly")
        .join("justly.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let Ok(log_file) = File::create(&log_path)
        .or_else(|_| File::create(std::env::temp_dir().join("justly.log")))
    else {
        eprintln!("warning: cannot create log file; logging disabled");
        return;
    };

    if WriteLogger::init(log_level, Config::default(), log_file).is_err() {
        eprintln!("warning: logger already initialised");
        return;
    }

    log::info!("justly starting (log level: {:?})", log_level);
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_count(args: &[String], flag: &str) -> Result<Option<usize>, String> {
    flag_value(args, flag)
        .map(|value| {
            value
                .parse()
                .map_err(|_| format!("{} expects a row count, got \"{}\"", flag, value))
        })
        .transpose()
}

fn play_range(args: &[String], song: &Song) -> Result<PlayRange, String> {
    let first = parse_count(args, "--first")?.unwrap_or(0);
    let count = match parse_count(args, "--count")? {
        Some(count) => count,
        None => song.chords.len().saturating_sub(first),
    };
    Ok(PlayRange::chords(first, count))
}

fn open(path: &str) -> Result<Song, String> {
    load_song(Path::new(path)).map_err(|e| format!("{}: {}", path, e))
}

fn report(warnings: &[PlaybackWarning]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

fn run(command: &str, args: &[String]) -> Result<(), String> {
    let positional: Vec<&str> = args
        .iter()
        .enumerate()
        .filter(|(i, a)| {
            !a.starts_with("--") && (*i == 0 || !args[i - 1].starts_with("--"))
        })
        .map(|(_, a)| a.as_str())
        .collect();

    match command {
        "validate" => {
            let [path] = positional[..] else {
                return Err(USAGE.to_string());
            };
            let song = open(path)?;
            println!("{}: ok ({} chords)", path, song.chords.len());
            Ok(())
        }
        "events" => {
            let [path] = positional[..] else {
                return Err(USAGE.to_string());
            };
            let song = open(path)?;
            let export = export(&song, play_range(args, &song)?).map_err(|e| e.to_string())?;
            report(&export.warnings);
            let json = serde_json::to_string_pretty(&export.events).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(())
        }
        "export" => {
            let [path, out] = positional[..] else {
                return Err(USAGE.to_string());
            };
            let song = open(path)?;
            let export = export(&song, play_range(args, &song)?).map_err(|e| e.to_string())?;
            report(&export.warnings);
            let mut renderer = MidiFileRenderer::new(out);
            renderer
                .render_until(&export.events, export.gain, export.end_time)
                .map_err(|e| format!("{}: {}", out, e))?;
            println!("wrote {} ({:.1} s)", out, export.end_time / 1000.0);
            Ok(())
        }
        "play" => {
            let [path] = positional[..] else {
                return Err(USAGE.to_string());
            };
            let song = open(path)?;
            let range = play_range(args, &song)?;
            let config = justly_core::config::Config::load();
            let port = flag_value(args, "--port").or(config.midi_port());
            let sink = MidiOutputSink::connect(port).map_err(|e| e.to_string())?;
            println!("playing on {}", sink.port_name());

            let mut player = Player::new(sink);
            let outcome = player.play(&song, range).map_err(|e| e.to_string())?;
            report(&outcome.warnings);
            while player.is_playing() {
                thread::sleep(Duration::from_millis(50));
            }
            // Let the last note-offs reach the port.
            thread::sleep(Duration::from_millis(100));
            Ok(())
        }
        "ports" => {
            let ports = list_ports().map_err(|e| e.to_string())?;
            if ports.is_empty() {
                println!("no MIDI output ports");
            }
            for port in ports {
                println!("{}: {}", port.index, port.name);
            }
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let args: Vec<String> = args
        .into_iter()
        .filter(|a| a != "--verbose" && a != "-v")
        .collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    match run(command, rest) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{} failed: {}", command, message);
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
