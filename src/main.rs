mod shared;
mod tui;
mod audio_api;
mod audio;
mod core;
mod dsp;
mod middle;
mod pipeline;
mod sequencer;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use anyhow::Context;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use middle::Middle;
use pipeline::config::EngineConfig;
use pipeline::persistence;
use pipeline::render::{self, RenderOptions};
use shared::InputEvent;

// flags that take a value; everything else starting with '-' is a switch
const VALUE_FLAGS: [&str; 5] = ["--render", "--input", "--seconds", "--pattern", "--tempo"];

#[derive(Debug, Default, PartialEq)]
struct Args {
    project_dir: Option<PathBuf>,
    verbose: bool,
    write_config: bool,
    render: Option<PathBuf>,
    input: Option<PathBuf>,
    seconds: Option<f64>,
    pattern: Option<String>,
    tempo: Option<f32>,
}

fn value_of<'a>(args: &'a [String], flag: &str) -> anyhow::Result<Option<&'a String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args.get(i + 1).map(Some).with_context(|| format!("{flag} needs a value")),
        None => Ok(None),
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {

    let mut positional = None;
    let mut i = 0;
    while i < args.len() {
        let a = &args[i];
        if VALUE_FLAGS.contains(&a.as_str()) {
            i += 2;
            continue;
        }
        if !a.starts_with('-') && positional.is_none() {
            positional = Some(PathBuf::from(a));
        }
        i += 1;
    }

    Ok(Args {
        project_dir: positional,
        verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
        write_config: args.iter().any(|a| a == "--write-config"),
        render: value_of(args, "--render")?.map(PathBuf::from),
        input: value_of(args, "--input")?.map(PathBuf::from),
        seconds: value_of(args, "--seconds")?
            .map(|s| s.parse::<f64>().with_context(|| format!("bad --seconds value {s:?}")))
            .transpose()?,
        pattern: value_of(args, "--pattern")?.cloned(),
        tempo: value_of(args, "--tempo")?
            .map(|s| s.parse::<f32>().with_context(|| format!("bad --tempo value {s:?}")))
            .transpose()?,
    })
}

fn init_logging(project_dir: &Path, verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let log_path = project_dir.join("stepcv.log");

    // the terminal is in raw mode while we run, so the log only ever goes to a file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("stepcv: cannot create {}: {e}, logging disabled", log_path.display());
            return;
        }
    };
    if WriteLogger::init(log_level, Config::default(), log_file).is_err() {
        return;
    }

    log::info!("stepcv starting (log level: {:?})", log_level);
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;

    let project_dir = match args.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("no current directory")?,
    };
    init_logging(&project_dir, args.verbose);

    let config = persistence::load_config(&project_dir);
    log::info!(
        "config: {} Hz, block {}, base {} Hz, tempo {}..{} BPM",
        config.sample_rate,
        config.block_size,
        config.base_frequency,
        config.min_tempo,
        config.max_tempo
    );

    if args.write_config {
        let path = persistence::save_config(&project_dir, &config)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    if let Some(output) = &args.render {
        return run_render(&config, &args, output.clone());
    }

    run_tui(&config)
}

fn run_render(config: &EngineConfig, args: &Args, output: PathBuf) -> anyhow::Result<()> {
    let mut options = RenderOptions::new(output);
    options.input = args.input.clone();
    if let Some(seconds) = args.seconds {
        options.seconds = seconds;
    }
    if let Some(bits) = &args.pattern {
        options.pattern = render::parse_pattern(bits)?;
    }
    if let Some(tempo) = args.tempo {
        options.tempo_bpm = tempo;
    }

    let diagnostics = render::render(config, &options)?;
    println!("{}: {}", options.output.display(), diagnostics.summary());
    Ok(())
}

fn run_tui(config: &EngineConfig) -> anyhow::Result<()> {
    terminal::enable_raw_mode()?;
    // Enable keyboard enhancement for real press/release detection.
    // Falls back gracefully if the terminal doesn't support it.
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    );
    let _guard = RawModeGuard; // auto drops when out of scope
    let audio = audio::start_audio(config)?;
    let mut middle = Middle::new(audio::Processor::new(config).snapshot());

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let blink_start = Instant::now();
    let mut tui_state = tui::mode::TuiState::default();

    loop {
        let blink_on = (blink_start.elapsed().as_millis() / 250) % 2 == 0;
        if let Some(snapshot) = audio.poll_snapshot() {
            middle.on_snapshot(snapshot);
        }
        let ds = middle.display_state();
        tui_state.mode = ds.mode;

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, &tui_state, blink_on);
        })?;

        let events = tui::input::poll_input(tick_rate, &mut tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                log::info!("shutting down: {}", middle.diagnostics().summary());
                drop(term);
                drop(audio);
                return Ok(());
            }
            for cmd in middle.handle_input(event) {
                audio.send(cmd);
            }
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn bare_project_dir() {
        let a = parse_args(&args("songs -v")).unwrap();
        assert_eq!(a.project_dir, Some(PathBuf::from("songs")));
        assert!(a.verbose);
        assert!(a.render.is_none());
    }

    #[test]
    fn render_flags_and_their_values() {
        let a = parse_args(&args("--render out.wav --input in.wav --seconds 2.5 --pattern 10000000 --tempo 90 proj")).unwrap();
        assert_eq!(a.render, Some(PathBuf::from("out.wav")));
        assert_eq!(a.input, Some(PathBuf::from("in.wav")));
        assert_eq!(a.seconds, Some(2.5));
        assert_eq!(a.pattern.as_deref(), Some("10000000"));
        assert_eq!(a.tempo, Some(90.0));
        // flag values are never taken for the project dir
        assert_eq!(a.project_dir, Some(PathBuf::from("proj")));
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(parse_args(&args("--seconds soon")).is_err());
        assert!(parse_args(&args("--render")).is_err());
        assert!(parse_args(&args("--write-config")).unwrap().write_config);
    }
}
