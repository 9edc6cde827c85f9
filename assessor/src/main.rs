//! Interactive-fiction psychometric assessment runner.
//!
//! Turns a self-report scale (JSONL, one item per line) into a playable
//! story: a designer agent builds the game, a narrator and critic write each
//! scene around the current scale item, and a simulated player's choices are
//! scored positionally. Generation runs through a configurable external
//! command.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::warn;

use assessor::core::state::AssessmentInputs;
use assessor::exit_codes;
use assessor::io::config::{AssessorConfig, load_config, write_config};
use assessor::io::generator::ProcessGenerator;
use assessor::io::scale::load_scale_file;
use assessor::io::transcript::{TranscriptRecord, TranscriptWriter};
use assessor::run::{EmptyScaleError, RunEvent, run_assessment};

const DEFAULT_CONFIG_PATH: &str = "assessor.toml";

#[derive(Parser)]
#[command(
    name = "assessor",
    version,
    about = "Interactive-fiction psychometric assessment runner"
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `assessor.toml` if missing.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
    /// Check a scale file and the config without running anything.
    Validate {
        /// Scale file (JSONL, one item per line).
        #[arg(long)]
        scale: PathBuf,
    },
    /// Play a full assessment over a scale file and print the scores.
    Run {
        /// Scale file (JSONL, one item per line).
        #[arg(long)]
        scale: PathBuf,

        /// Psychological construct the scale measures.
        #[arg(long)]
        construct: String,

        /// Story genre for the designed game.
        #[arg(long)]
        genre: String,

        /// Story topic within the genre.
        #[arg(long)]
        topic: String,

        /// Write a JSONL transcript of the run to this path.
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
}

fn main() {
    assessor::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        let code = if err.downcast_ref::<EmptyScaleError>().is_some() {
            exit_codes::DESIGN_FAILED
        } else {
            exit_codes::INVALID
        };
        std::process::exit(code);
    }
    std::process::exit(exit_codes::OK);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Validate { scale } => cmd_validate(&cli.config, &scale),
        Command::Run {
            scale,
            construct,
            genre,
            topic,
            transcript,
        } => cmd_run(
            &cli.config,
            &scale,
            construct,
            genre,
            topic,
            transcript.as_deref(),
        ),
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &AssessorConfig::default())?;
    println!("wrote {}", config_path.display());
    Ok(())
}

fn cmd_validate(config_path: &Path, scale_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    config.validate()?;
    let payload = load_scale_file(scale_path)?;
    println!(
        "{}: {} items, config ok",
        scale_path.display(),
        payload.items.len()
    );
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    scale_path: &Path,
    construct: String,
    genre: String,
    topic: String,
    transcript_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    config.validate()?;

    if !config.allows(&genre, &topic) {
        bail!("genre {genre:?} with topic {topic:?} is not in the configured catalog");
    }
    if !config.knows_construct(&construct) {
        warn!(%construct, "construct is not in the configured catalog");
    }

    let payload = load_scale_file(scale_path)?;
    let generator = ProcessGenerator::new(&config.generation)?;
    let mut transcript = match transcript_path {
        Some(path) => Some(TranscriptWriter::create(path)?),
        None => None,
    };

    let inputs = AssessmentInputs {
        construct,
        scale_payload: payload.raw,
        genre,
        topic,
    };
    let outcome = run_assessment(inputs, &config, &generator, |event| {
        let Some(writer) = transcript.as_mut() else {
            return;
        };
        let record = match *event {
            RunEvent::Designed {
                title,
                outline,
                items,
            } => TranscriptRecord::Design {
                title,
                outline,
                items,
            },
            RunEvent::ItemPlayed(outcome) => TranscriptRecord::Item { outcome },
        };
        if let Err(err) = writer.write(&record) {
            warn!(error = %format!("{err:#}"), "transcript write failed");
        }
    })?;

    if let Some(writer) = transcript.as_mut() {
        writer.write(&TranscriptRecord::Summary {
            total_score: outcome.total_score,
            item_scores: &outcome.item_scores,
        })?;
    }

    println!("game: {}", outcome.title);
    println!("items played: {}", outcome.items_played);
    for (index, score) in outcome.item_scores.iter().enumerate() {
        println!("item {index}: {score}");
    }
    println!("total score: {}", outcome.total_score);
    Ok(())
}
