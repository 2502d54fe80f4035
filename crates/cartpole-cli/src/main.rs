// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Command-Line Runner
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `cartpole-fuzzy`: balance the reference cart-pole with a fuzzy rule base.
//!
//! One diagnostic line per cycle on stdout, logs on stderr.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cartpole_control::cycle::ControlCycle;
use cartpole_control::plant::CartPole;
use cartpole_control::realtime::{RtcConfig, RtcDriver};
use cartpole_control::signals::{ScriptedSignals, SignalEvent};
use cartpole_types::config::{CartPoleParams, ControllerConfig};
use cartpole_types::constants::NUDGE_FORCE;
use cartpole_types::state::CartPoleState;
use clap::Parser;
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "cartpole-fuzzy")]
#[command(version)]
#[command(about = "Fuzzy-logic cart-pole balancing session", long_about = None)]
struct Cli {
    /// Controller configuration (JSON); built-in two-rule controller if omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stepped cycles to run (0 runs until an exit)
    #[arg(short = 'n', long, default_value_t = 500)]
    cycles: u64,

    /// Start from rest at this pole angle (degrees) instead of a random state
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    initial_angle: Option<f64>,

    /// Seed for the random initial state and resets
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Pace cycles at the plant timestep instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Override the force at a loop iteration: ITER:FORCE, ITER:left or ITER:right
    #[arg(long = "kick", value_name = "ITER:FORCE", value_parser = parse_kick)]
    kicks: Vec<(u64, f64)>,

    /// Pause at this loop iteration
    #[arg(long, value_name = "ITER")]
    pause_at: Option<u64>,

    /// Resume at this loop iteration
    #[arg(long, value_name = "ITER", requires = "pause_at")]
    resume_at: Option<u64>,

    /// Reset the plant at this loop iteration (repeatable)
    #[arg(long = "reset-at", value_name = "ITER")]
    resets: Vec<u64>,

    /// Suppress the per-cycle diagnostic lines and all logs but errors
    #[arg(short, long)]
    quiet: bool,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the effective controller configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Write the session report (JSON) to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

/// `ITER:FORCE`, where FORCE is newtons or `left`/`right` for a full nudge.
fn parse_kick(s: &str) -> std::result::Result<(u64, f64), String> {
    let (iter, force) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ITER:FORCE, got '{s}'"))?;
    let iter = iter
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad iteration '{iter}': {e}"))?;
    let force = match force.trim() {
        "left" => -NUDGE_FORCE,
        "right" => NUDGE_FORCE,
        other => other
            .parse::<f64>()
            .map_err(|e| format!("bad force '{other}': {e}"))?,
    };
    if !force.is_finite() {
        return Err(format!("force must be finite, got {force}"));
    }
    Ok((iter, force))
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match verbose {
        _ if quiet => LevelFilter::ERROR,
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ControllerConfig> {
    match path {
        Some(path) => {
            let path_str = path.to_string_lossy();
            ControllerConfig::from_file(&path_str)
                .with_context(|| format!("Failed to load controller config: {}", path.display()))
        }
        None => Ok(ControllerConfig::default()),
    }
}

fn build_script(cli: &Cli) -> Result<ScriptedSignals> {
    let mut script = ScriptedSignals::new();
    for &(iter, force) in &cli.kicks {
        script.push(iter, SignalEvent::Override(force));
    }
    for &iter in &cli.resets {
        script.push(iter, SignalEvent::Reset);
    }
    if let Some(pause) = cli.pause_at {
        script.push(pause, SignalEvent::TogglePause);
        match cli.resume_at {
            Some(resume) if resume <= pause => {
                bail!("--resume-at ({resume}) must come after --pause-at ({pause})")
            }
            Some(resume) => script.push(resume, SignalEvent::TogglePause),
            None if cli.cycles > 0 => {
                bail!("--pause-at without --resume-at never resumes; add --resume-at or use --cycles 0")
            }
            None => {}
        }
    }
    Ok(script)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_ref())?;
    if cli.dump_config {
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{json}");
        return Ok(());
    }

    let cycle = ControlCycle::from_config(&config)
        .with_context(|| format!("Invalid controller config '{}'", config.name))?;
    let mut plant =
        CartPole::new(CartPoleParams::default(), cli.seed).context("Invalid plant parameters")?;
    if let Some(angle) = cli.initial_angle {
        plant = plant.with_initial_state(CartPoleState::new(0.0, 0.0, angle, 0.0));
    }

    let mut rtc = if cli.realtime {
        RtcConfig::paced_for(&plant)
    } else {
        RtcConfig {
            pause_poll: Duration::ZERO,
            ..RtcConfig::default()
        }
    };
    rtc.max_cycles = (cli.cycles > 0).then_some(cli.cycles);

    let mut script = build_script(&cli)?;
    let mut driver = RtcDriver::new(cycle, plant, rtc);

    let mut out = BufWriter::new(io::stdout().lock());
    let mut write_error: Option<io::Error> = None;
    let report = driver
        .run(&mut script, |c| {
            if cli.quiet || write_error.is_some() {
                return;
            }
            if let Err(e) = writeln!(out, "{c}") {
                write_error = Some(e);
            }
        })
        .context("Control session failed")?;
    if let Some(e) = write_error {
        return Err(e).context("Failed to write to stdout");
    }
    out.flush().context("Failed to write to stdout")?;

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }

    tracing::info!(
        cycles = report.cycles,
        max_abs_angle = report.max_abs_angle,
        final_angle = report.final_state.pole_angle,
        "done"
    );
    Ok(())
}
