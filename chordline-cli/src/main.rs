mod args;
mod output;

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use chordline_audio::{plan_cycle, LogTrigger, PlaybackFeedback, PlaybackHandle};
use chordline_core::config::Config;
use chordline_core::state::ProjectError;
use chordline_core::Editor;
use chordline_types::ProjectFile;

use args::{parse_args, Command, USAGE};
use output::{format_palette, format_schedule, PrintTrigger};

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("chordline")
        .join("chordline.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(_) => match File::create(std::env::temp_dir().join("chordline.log")) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("chordline: logging disabled: {}", e);
                return;
            }
        },
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("chordline: logging disabled: {}", e);
        return;
    }

    log::info!("chordline starting (log level: {:?})", log_level);
}

/// Load a project through an editor so it gets the same repair and key
/// handling as an interactive load.
fn load_song(path: &Path) -> Result<ProjectFile, ProjectError> {
    let redraw = || {};
    let audio = LogTrigger;
    let mut editor = Editor::new(Config::load().editor_settings(), &redraw, &audio);
    editor.load_from_path(path)?;
    Ok(editor.to_project())
}

fn schedule(path: &Path) -> Result<(), ProjectError> {
    let song = load_song(path)?;
    println!("{} at {} bpm in {}", path.display(), song.bpm, song.key);
    match plan_cycle(&song.blocks, f64::from(song.bpm)) {
        Some(plan) => {
            for line in format_schedule(&plan, &song.blocks) {
                println!("{}", line);
            }
        }
        None => println!("nothing to play"),
    }
    Ok(())
}

fn play(path: &Path, repeat: bool) -> Result<(), ProjectError> {
    let song = load_song(path)?;
    if song.blocks.is_empty() {
        println!("nothing to play");
        return Ok(());
    }
    println!("playing {} at {} bpm{}", path.display(), song.bpm, if repeat { " (repeat)" } else { "" });

    let mut handle = PlaybackHandle::new(Box::new(PrintTrigger));
    handle.update_song(song.blocks, f64::from(song.bpm));
    handle.set_repeat(repeat);
    handle.play();

    while let Some(feedback) = handle.recv_feedback() {
        match feedback {
            PlaybackFeedback::CycleComplete { cycle } => println!("-- cycle {} complete", cycle),
            PlaybackFeedback::Stopped { .. } => break,
            PlaybackFeedback::Started | PlaybackFeedback::Triggered { .. } => {}
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("chordline: {}\n\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Schedule(path) => schedule(&path),
        Command::Play { path, repeat } => play(&path, repeat),
        Command::Palette { octave } => {
            let octave = octave.unwrap_or_else(|| Config::load().editor_settings().octave);
            for line in format_palette(octave) {
                println!("{}", line);
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("{}", e);
            eprintln!("chordline: {}", e);
            ExitCode::FAILURE
        }
    }
}
