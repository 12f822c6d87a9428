//! amt CLI — the user-facing command-line interface.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};

use amt_core::config::AmtConfig;
use amt_core::error::AssessmentError;

mod commands;

#[derive(Parser)]
#[command(
    name = "amt",
    version,
    about = "Terminal assessment tool for machine-learning systems"
)]
struct Cli {
    /// Which action to perform
    #[arg(long, value_enum)]
    action: Action,

    /// Input folder containing questionnaires
    #[arg(long)]
    inputdir: Option<PathBuf>,

    /// Output folder containing answered assessments
    #[arg(long)]
    outputdir: Option<PathBuf>,

    /// Path of the model to explain (shap)
    #[arg(long, required_if_eq("action", "shap"))]
    model: Option<PathBuf>,

    /// Path of the data to explain the model on (shap)
    #[arg(long, required_if_eq("action", "shap"))]
    data: Option<PathBuf>,

    /// Path of the system card to render (required for report)
    #[arg(long)]
    card: Option<PathBuf>,

    /// Config file path (defaults to ./amt.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Fill out the questionnaires interactively
    Assessment,
    /// Explain a model with SHAP values
    Shap,
    /// Render an HTML report from a system card
    Report,
    /// Show questionnaires and saved answers without prompting
    Status,
    /// Create starter schemas and an example questionnaire
    Init,
}

fn main() {
    let cli = Cli::parse();

    let result = AmtConfig::load_or_default(cli.config.as_deref()).and_then(|mut config| {
        if let Some(dir) = cli.inputdir {
            config.questions_dir = dir;
        }
        if let Some(dir) = cli.outputdir {
            config.output_dir = dir;
        }
        init_logging(&config.log_dir);
        tracing::info!("amt started with action {:?}", cli.action);

        match cli.action {
            Action::Assessment => commands::assessment::execute(&config),
            Action::Status => commands::status::execute(&config),
            Action::Report => match cli.card {
                Some(card) => commands::report::execute(&config, &card),
                None => Err(anyhow::anyhow!("--card is required for the report action")),
            },
            Action::Init => commands::init::execute(&config),
            Action::Shap => Err(anyhow::anyhow!(
                "unsupported action shap: model explanation is not available in this build"
            )),
        }
    });

    if let Err(e) = result {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        if e
            .downcast_ref::<AssessmentError>()
            .is_some_and(|e| e.is_configuration())
        {
            eprintln!(
                "Check --inputdir, --outputdir and the schema files, \
                 or run `amt --action init` to create starter files."
            );
        }
        process::exit(1);
    }
}

/// Log to `<log_dir>/amt.log` so log lines do not interleave with prompts.
/// Falls back to stderr when the file cannot be opened.
fn init_logging(log_dir: &Path) {
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive("amt=info".parse().unwrap());

    let file = std::fs::create_dir_all(log_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("amt.log"))
    });

    match file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}
