//! # Passage QA CLI (`pqa`)
//!
//! Answers the questions listed in a TOML config about any passage.
//!
//! ## Usage
//!
//! ```bash
//! pqa --config ./config/qa.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pqa setup` | Download the model if it is not on disk yet |
//! | `pqa ask` | Answer every configured question about a passage |
//! | `pqa inspect "<text>"` | Show the tokens and tensors built from text |
//! | `pqa targets` | List configured target labels and questions |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use passage_qa::ask::{self, ContextSource};
use passage_qa::config;
use passage_qa::inspect;
use passage_qa::progress::ProgressMode;
use passage_qa::setup;
use passage_qa::targets;

/// Passage QA CLI — answer named questions about a passage with a
/// pretrained BiDAF model.
#[derive(Parser)]
#[command(
    name = "pqa",
    about = "Passage QA — answer named questions about a passage with a pretrained BiDAF model",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/qa.toml`. Targets, questions, model location
    /// and preprocessing settings are read from this file.
    #[arg(long, global = true, default_value = "./config/qa.toml")]
    config: PathBuf,

    /// Progress output on stderr. Defaults to `human` on a terminal, `off` otherwise.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Make sure the model file exists, downloading it if needed.
    ///
    /// Safe to run repeatedly: an existing model is never re-downloaded.
    Setup,

    /// Answer every configured question about a passage.
    ///
    /// The passage is read from `--context`, from `--file`, or from stdin
    /// when neither is given.
    Ask {
        /// Passage text.
        #[arg(long, conflicts_with = "file")]
        context: Option<String>,

        /// Read the passage from this file.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print answers as a JSON object instead of `label: answer` lines.
        #[arg(long)]
        json: bool,
    },

    /// Show the tokens, word tensor and character tensor built from text.
    ///
    /// Uses the `[preprocess]` settings from the config when it loads,
    /// built-in defaults otherwise. Does not need the model.
    Inspect {
        /// Text to preprocess.
        text: String,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List configured target labels and their questions.
    Targets,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let progress = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);

    // Commands that don't require a valid config
    if let Commands::Inspect { text, json } = &cli.command {
        let cfg = config::load_config(&cli.config).unwrap_or_else(|_| config::Config::minimal());
        inspect::run_inspect(&cfg.preprocess, text, *json)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Setup => {
            setup::run_setup(&cfg, progress)?;
        }
        Commands::Ask {
            context,
            file,
            json,
        } => {
            let source = match (&context, &file) {
                (Some(text), _) => ContextSource::Inline(text),
                (None, Some(path)) => ContextSource::File(path),
                (None, None) => ContextSource::Stdin,
            };
            ask::run_ask(&cfg, source, json, progress)?;
        }
        Commands::Targets => {
            targets::list_targets(&cfg)?;
        }
        Commands::Inspect { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
