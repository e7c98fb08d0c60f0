//! `pqa ask`: answer every configured question about one passage.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use passage_qa_core::models::Answers;

use crate::config::Config;
use crate::progress::ProgressMode;
use crate::runtime::BidafRuntime;

/// Where the passage comes from.
pub enum ContextSource<'a> {
    Inline(&'a str),
    File(&'a Path),
    Stdin,
}

impl ContextSource<'_> {
    pub fn read(&self) -> Result<String> {
        match self {
            ContextSource::Inline(text) => Ok(text.to_string()),
            ContextSource::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read context file: {}", path.display())),
            ContextSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read context from stdin")?;
                Ok(buf)
            }
        }
    }
}

pub fn run_ask(
    config: &Config,
    source: ContextSource<'_>,
    json: bool,
    progress: ProgressMode,
) -> Result<()> {
    let context = source.read()?;
    let mut runtime = BidafRuntime::from_config(config)?.with_reporter(progress.reporter());
    let answers = runtime.serve(&context)?;
    print_answers(&answers, json)
}

pub fn print_answers(answers: &Answers, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(answers)?);
        return Ok(());
    }
    for (label, answer) in answers.iter() {
        println!("{}: {}", label, answer);
    }
    Ok(())
}
