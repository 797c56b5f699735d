//! slot-sim — headless runner for the three-reel slot game
//!
//! Usage:
//!   slot-sim --seed 42 --spins 20
//!   slot-sim --config game.yaml --instant --json
//!   slot-sim --script 0,0,0,0,0,0,0,0,0,0,1,0,0,1,0,0,1,0

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rf_slot_game::{
    Accent, AnimationOptions, AnimationTarget, CreditDisplay, Presentation, PropertyTarget,
    ScriptedRandom, SeededRandom, SlotConfig, SlotSession, SoundOptions, Symbol,
    TimingConfig,
};

#[derive(Parser)]
#[command(name = "slot-sim", about = "Run three-reel slot rounds headless")]
struct Cli {
    /// Seed for the symbol picks (OS entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of spins to run
    #[arg(short = 'n', long, default_value_t = 10)]
    spins: u32,

    /// Game config (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve every spin on the instant it is triggered
    #[arg(long)]
    instant: bool,

    /// Scripted symbol indices consumed before the seeded source
    #[arg(long, value_delimiter = ',')]
    script: Vec<usize>,

    /// Frame length used to drive the logical clock
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Print each round's stage trace as JSON
    #[arg(long)]
    json: bool,

    /// Log presentation calls
    #[arg(short, long)]
    verbose: bool,
}

/// Presentation that writes every call to the log
struct LogPresentation;

impl Presentation for LogPresentation {
    fn render_symbol_at(&mut self, reel: usize, slot: usize, symbol: &Symbol, position: f64) {
        log::trace!("render reel {reel} slot {slot}: {symbol} @ {position:.1}");
    }

    fn play_sound(&mut self, name: &str, options: &SoundOptions) {
        log::debug!(
            "play {name} (loop={}, volume={}, rate={})",
            options.looping,
            options.volume,
            options.rate
        );
    }

    fn stop_sound(&mut self, name: &str) {
        log::debug!("stop {name}");
    }

    fn animate(
        &mut self,
        target: AnimationTarget,
        properties: &[PropertyTarget],
        duration_ms: f64,
        options: &AnimationOptions,
    ) {
        log::trace!(
            "animate {target:?} {properties:?} over {duration_ms}ms ({})",
            options.ease
        );
    }

    fn cancel_animations(&mut self) {
        log::debug!("cancel animations");
    }

    fn set_frame_accent(&mut self, accent: Accent) {
        log::debug!("frame accent #{:06x} width {}", accent.color, accent.width);
    }

    fn show_credit(&mut self, display: &CreditDisplay) {
        log::debug!("credit '{}' ({})", display.text, display.color);
    }

    fn set_spin_label(&mut self, label: &str) {
        log::debug!("spin label '{label}'");
    }

    fn end_game(&mut self) {
        log::info!("end of game");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SlotConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SlotConfig::default(),
    };
    if cli.instant {
        config = config.with_timing(TimingConfig::instant());
    }

    let rng = ScriptedRandom::new(cli.script.iter().copied(), SeededRandom::new(cli.seed));
    if let Some(seed) = rng.inner().seed() {
        log::info!("Seed {seed}");
    }

    let mut session =
        SlotSession::new(config, LogPresentation, rng).context("Failed to start session")?;
    let frame_ms = cli.frame_ms.max(1.0);

    for _ in 0..cli.spins {
        if !session.trigger_spin().is_started() {
            break;
        }
        while session.pending_tasks() > 0 {
            session.advance(frame_ms);
        }

        if cli.json {
            if let Some(trace) = session.last_trace() {
                println!("{}", trace.to_json()?);
            }
        }
        if session.is_game_over() {
            break;
        }
    }

    let stats = session.stats();
    println!("Spins:    {}", stats.total_spins);
    println!("Wins:     {}", stats.wins);
    println!("Losses:   {}", stats.losses);
    println!("Hit rate: {:.1}%", stats.hit_rate());
    println!("Credit:   {}", session.credit());
    if session.is_game_over() {
        println!("Game over");
    }

    Ok(())
}
