//! Invaders runner (default binary).
//!
//! Picks a front end, loads configuration and logging, then hands everything
//! to the [`Controller`].
//!
//! - `--view terminal` (default): interactive crossterm view
//! - `--view json`: headless, one JSON snapshot per frame on stdout

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use invaders::core::ports::NoInput;
use invaders::core::{LoopDriver, SimConfig};
use invaders::input::TerminalInput;
use invaders::term::{GameView, JsonLinesView, TerminalView};
use invaders::types::Difficulty;
use invaders::Controller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewKind {
    Terminal,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "invaders", version, about = "Fixed-formation terminal shooter")]
struct Args {
    /// Front end to attach.
    #[arg(long, value_enum, default_value_t = ViewKind::Terminal)]
    view: ViewKind,

    /// JSON configuration file; fields it omits keep their preset values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Difficulty preset (easy, normal, hard, rogue).
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// RNG seed.
    #[arg(long)]
    seed: Option<u32>,

    /// Simulation ticks per second.
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Frames to run in headless mode.
    #[arg(long, default_value_t = 3600)]
    frames: u64,

    /// Headless mode: emit compact summaries instead of full snapshots.
    #[arg(long)]
    summary: bool,

    /// Write logs to this file (required for logs in terminal mode).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}' (easy, normal, hard, rogue)"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = load_config(&args)?;
    info!(
        difficulty = args.difficulty.unwrap_or_default().as_str(),
        seed = config.seed,
        tick_hz = config.tick_rate_hz,
        "starting"
    );
    let driver = LoopDriver::new(config).context("invalid configuration")?;

    match args.view {
        ViewKind::Terminal => run_terminal(driver),
        ViewKind::Json => run_json(driver, &args),
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.view == ViewKind::Json {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .init();
    }
    // The terminal view owns the screen; without a log file nothing is logged.
    Ok(())
}

/// Difficulty preset, overlaid with the config file, overlaid with CLI flags.
fn load_config(args: &Args) -> Result<SimConfig> {
    let preset = SimConfig::for_difficulty(args.difficulty.unwrap_or_default());

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let patch: Value = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            let mut merged = serde_json::to_value(&preset)?;
            merge_json(&mut merged, patch);
            serde_json::from_value(merged)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => preset,
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rate) = args.tick_rate {
        config.tick_rate_hz = rate;
    }
    Ok(config)
}

/// Deep-merge `patch` into `base`; objects merge key by key, anything else replaces.
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

fn run_terminal(driver: LoopDriver) -> Result<()> {
    let mut view = TerminalView::new(GameView::default());
    view.enter()?;

    let mut input = TerminalInput::new();
    match input.enable_key_release_events() {
        Ok(true) => info!("key release events enabled"),
        Ok(false) => info!("key release events unsupported, using release timeout"),
        Err(e) => warn!("failed to enable key release events: {e}"),
    }

    let mut controller = Controller::new(driver, input, view);
    let result = controller.run();

    let snap = controller.driver().snapshot();
    info!(score = snap.score, level = snap.level, phase = snap.phase.as_str(), "exiting");

    let (_, mut input, mut view) = controller.into_parts();
    let _ = input.disable_key_release_events();
    // Always try to restore terminal state.
    let restored = view.exit();
    result?;
    restored
}

fn run_json(driver: LoopDriver, args: &Args) -> Result<()> {
    let frame_dt = driver.tick_duration();
    let view = if args.summary {
        JsonLinesView::stdout().summary_only()
    } else {
        JsonLinesView::stdout()
    };

    let mut controller = Controller::new(driver, NoInput, view);
    controller.run_headless(args.frames, frame_dt)?;

    let snap = controller.driver().snapshot();
    info!(
        frames = controller.frames(),
        ticks = snap.tick,
        score = snap.score,
        level = snap.level,
        phase = snap.phase.as_str(),
        "headless run finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overrides_nested_fields_only() {
        let mut base = json!({ "seed": 1, "formation": { "rows": 5, "cols": 10 } });
        merge_json(&mut base, json!({ "formation": { "rows": 2 } }));
        assert_eq!(base, json!({ "seed": 1, "formation": { "rows": 2, "cols": 10 } }));
    }

    #[test]
    fn merge_replaces_scalars_and_adds_keys() {
        let mut base = json!({ "max_level": 4 });
        merge_json(&mut base, json!({ "max_level": null, "seed": 9 }));
        assert_eq!(base, json!({ "max_level": null, "seed": 9 }));
    }

    #[test]
    fn cli_flags_override_preset() {
        let args = Args::parse_from(["invaders", "--difficulty", "hard", "--seed", "7", "--tick-rate", "30"]);
        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.tick_rate_hz, 30);
        assert_eq!(cfg.score_multiplier_percent, 200);
    }

    #[test]
    fn rogue_preset_plays_without_level_cap() {
        let args = Args::parse_from(["invaders", "--difficulty", "rogue"]);
        assert_eq!(args.difficulty, Some(Difficulty::Rogue));
        assert_eq!(load_config(&args).unwrap().max_level, None);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(Args::try_parse_from(["invaders", "--difficulty", "insane"]).is_err());
    }
}
