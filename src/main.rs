//! Bulario Gate - Main Entry Point
//!
//! CLI front-end for the medication QA gate: loads configuration, builds the
//! configured completion client, and runs questions through the full
//! plan-execute-judge lifecycle.

use bulario_gate::config::GateConfig;
use bulario_gate::judges::AnswerMode;
use bulario_gate::llm::factory::{build_client, build_judge_client};
use bulario_gate::observability::init_default_logging;
use bulario_gate::retrieval::InMemoryStore;
use bulario_gate::routing::{default_executors, default_registry};
use bulario_gate::service::AnswerService;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

/// Medication QA gate: plan, execute, judge
#[derive(Parser)]
#[command(name = "bulagate")]
#[command(about = "Evidence-gated medication question answering")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one medication question
    Ask {
        /// The question to answer
        question: String,

        /// Audience the answer is written for
        #[arg(long, value_enum, default_value_t = Mode::Patient)]
        mode: Mode,

        /// JSON file with an array of evidence documents
        #[arg(long, value_name = "FILE")]
        evidence: Option<PathBuf>,

        /// Emit the full outcome as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Patient,
    Professional,
}

impl From<Mode> for AnswerMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Patient => AnswerMode::Patient,
            Mode::Professional => AnswerMode::Professional,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Ask {
            question,
            mode,
            evidence,
            json,
        } => ask(config, &question, mode.into(), evidence.as_deref(), json).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(config_path: &Option<PathBuf>) -> Result<GateConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(GateConfig::load_from_file(path)?)
        }
        None => {
            let default_paths = ["bulagate.toml", "config/bulagate.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(GateConfig::load_from_file(&path)?);
                }
            }

            Err("No configuration file found. Provide one with -c/--config or create bulagate.toml".into())
        }
    }
}

async fn ask(
    config: GateConfig,
    question: &str,
    mode: AnswerMode,
    evidence: Option<&std::path::Path>,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(&config)?;
    info!(provider = client.name(), "Completion client ready");

    let judge_client = match config.judges.model {
        Some(_) => build_judge_client(&config)?,
        None => client.clone(),
    };

    let store = match evidence {
        Some(path) => Arc::new(InMemoryStore::load_from_file(path)?),
        None => Arc::new(InMemoryStore::default()),
    };

    let registry = Arc::new(default_registry()?);
    let executors = default_executors(store.clone());

    let service = AnswerService::new(client, registry, store, executors)
        .with_judge_client(judge_client)
        .with_config(&config)
        .with_mode(mode);

    let outcome = service.answer(question).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.answer);
        eprintln!(
            "[{:?}, score {}, confidence {:.2}]",
            outcome.judgment.final_decision, outcome.judgment.overall_score, outcome.judgment.confidence
        );
    }
    Ok(())
}

fn handle_config_command(config: GateConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}
