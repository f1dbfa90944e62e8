//! Vireo: scratch-ticket value estimator.
//!
//! Single binary that:
//! 1. Analyzes a game state in expert or model mode
//! 2. Generates the synthetic training corpus
//! 3. Evaluates a trained artifact against a corpus
//! 4. Hosts the board-intake helpers (placeholder scan, ticket estimate)

mod config;
mod journal;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tracing::{info, warn};

use board_scanner::{estimate_tickets, BoardScanner, PlaceholderScanner};
use common::{AppConfig, GameState};
use journal::{resolve_journal_dir, AnalysisEntry};
use recommendation_engine::{AnalysisMode, AnalysisResponse, ModelState, RecommendationEngine};

/// Scratch-ticket value estimator
#[derive(Parser)]
#[command(name = "vireo", about = "Scratch-ticket expected value and recommendation engine")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one game state and print the recommendation.
    Analyze {
        /// Game state JSON, inline or as a file path.
        #[arg(long)]
        game: String,
        /// Cash the player is willing to commit.
        #[arg(long)]
        bankroll: f64,
        /// `expert` for the heuristic; anything else uses the trained model.
        #[arg(long, default_value = "model")]
        mode: String,
    },
    /// Write a labeled synthetic training corpus as CSV.
    Generate {
        #[arg(long)]
        samples: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Measure how often the trained model agrees with a labeled corpus.
    Evaluate {
        #[arg(long)]
        data: PathBuf,
    },
    /// Read a prize board image into a game state.
    ScanBoard {
        #[arg(long)]
        image: PathBuf,
    },
    /// Estimate tickets left from a dispenser fill ratio.
    EstimateTickets {
        #[arg(long)]
        fill_ratio: f64,
        #[arg(long)]
        total_tickets: u64,
    },
    /// Print the JSON Schema of the game state input.
    Schema,
}

fn read_game(raw: &str) -> Result<GameState> {
    let trimmed = raw.trim();
    let json = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        std::fs::read_to_string(trimmed)
            .with_context(|| format!("failed to read game state from {}", trimmed))?
    };
    let game: GameState = serde_json::from_str(&json).context("failed to parse game state")?;
    game.validate()?;
    Ok(game)
}

fn journal_analysis(
    config: &AppConfig,
    game_name: &str,
    bankroll: f64,
    mode: AnalysisMode,
    response: &AnalysisResponse,
) {
    if !config.journal.enabled {
        return;
    }
    let dir = resolve_journal_dir(&config.journal.dir);
    let entry = AnalysisEntry::new(game_name, bankroll, mode, response);
    match journal::append(&dir, &entry) {
        Ok(path) => info!("Journaled analysis {} to {}", entry.request_id, path.display()),
        Err(e) => warn!("Analysis journal write failed ({}): {}", dir.display(), e),
    }
}

/// The artifact is only read when the call actually needs the model.
fn engine_for(config: &AppConfig, mode: AnalysisMode) -> RecommendationEngine {
    match mode {
        AnalysisMode::Expert => RecommendationEngine::expert_only(),
        AnalysisMode::Model => {
            RecommendationEngine::from_state(&ModelState::load(&config.model.path))
        }
    }
}

fn run_analyze(config: &AppConfig, game: &str, bankroll: f64, mode: &str) -> Result<ExitCode> {
    let game = read_game(game)?;
    if !bankroll.is_finite() {
        bail!("bankroll must be a finite number");
    }
    let mode = AnalysisMode::from_selector(mode);

    let engine = engine_for(config, mode);
    let response = AnalysisResponse::from(engine.analyze(&game, bankroll, mode));
    journal_analysis(config, &game.game_name, bankroll, mode, &response);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(if response.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_generate(
    config: &AppConfig,
    samples: Option<usize>,
    seed: Option<u64>,
    out: Option<PathBuf>,
) -> Result<()> {
    let mut gen = config.generation.clone();
    if let Some(samples) = samples {
        gen.samples = samples;
    }
    if seed.is_some() {
        gen.seed = seed;
    }
    let out = out.unwrap_or_else(|| PathBuf::from(&gen.output_path));

    info!("Generating {} synthetic samples...", gen.samples);
    let mut rng = match gen.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let file = File::create(&out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    let report = synthetic_data::generate_dataset(&mut rng, &gen, &mut writer)?;

    info!("Saved dataset to {}", out.display());
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "output": out.display().to_string(),
            "report": report,
        }))?
    );
    Ok(())
}

fn run_evaluate(config: &AppConfig, data: &Path) -> Result<()> {
    let model = ModelState::load(&config.model.path);
    let Some(handle) = model.handle() else {
        bail!(
            "model artifact '{}' is {}; nothing to evaluate",
            config.model.path,
            model.status_label()
        );
    };

    let file = File::open(data).with_context(|| format!("failed to open {}", data.display()))?;
    let records = synthetic_data::read_records(BufReader::new(file))?;
    let report = synthetic_data::evaluate(&*handle, &records);
    info!(
        "Evaluated {} rows: agreement {:.4} ({} prediction failures)",
        report.total,
        report.agreement(),
        report.failures
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "agreement": report.agreement(),
            "report": report,
        }))?
    );
    Ok(())
}

fn run_scan_board(image: &Path) -> Result<()> {
    let bytes =
        std::fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.display().to_string());
    let game = PlaceholderScanner.scan(&name, &bytes)?;
    println!("{}", serde_json::to_string_pretty(&game)?);
    Ok(())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vireo=info,recommendation_engine=info,synthetic_data=info,board_scanner=info"
                    .into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Command::Analyze {
            game,
            bankroll,
            mode,
        } => return run_analyze(&config, &game, bankroll, &mode),
        Command::Generate { samples, seed, out } => run_generate(&config, samples, seed, out)?,
        Command::Evaluate { data } => run_evaluate(&config, &data)?,
        Command::ScanBoard { image } => run_scan_board(&image)?,
        Command::EstimateTickets {
            fill_ratio,
            total_tickets,
        } => {
            let estimated = estimate_tickets(
                fill_ratio,
                total_tickets,
                config.estimation.correction_factor,
            )?;
            println!("{}", json!({ "estimated_tickets": estimated }));
        }
        Command::Schema => {
            let schema = schemars::schema_for!(GameState);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
