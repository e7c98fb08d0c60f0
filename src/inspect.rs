//! `pqa inspect`: show what the model would see for a piece of text.
//!
//! Prints one row per token with its word-tensor entry and its character
//! slots (`·` marks padding). Needs no model file.

use anyhow::Result;
use serde::Serialize;

use passage_qa_core::models::EncodedText;
use passage_qa_core::preprocess::Preprocessor;

use crate::config::PreprocessConfig;
use crate::tokenizer::tokenizer_for;

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub tokenizer: String,
    pub word_shape: [usize; 2],
    pub char_shape: [usize; 4],
    pub tokens: Vec<TokenRow>,
}

#[derive(Debug, Serialize)]
pub struct TokenRow {
    pub token: String,
    pub word: String,
    pub chars: Vec<String>,
}

pub fn inspect_text(config: &PreprocessConfig, text: &str) -> Result<InspectReport> {
    let preprocessor = Preprocessor::new(tokenizer_for(&config.tokenizer)?, config.char_width);
    let encoded = preprocessor.preprocess(text)?;
    Ok(report(preprocessor.tokenizer_name(), &encoded))
}

fn report(tokenizer: &str, encoded: &EncodedText) -> InspectReport {
    let tokens = encoded
        .tokens
        .iter()
        .zip(encoded.words.words())
        .zip(encoded.chars.rows())
        .map(|((token, word), chars)| TokenRow {
            token: token.clone(),
            word: word.clone(),
            chars: chars.to_vec(),
        })
        .collect();
    InspectReport {
        tokenizer: tokenizer.to_string(),
        word_shape: encoded.words.shape(),
        char_shape: encoded.chars.shape(),
        tokens,
    }
}

pub fn run_inspect(config: &PreprocessConfig, text: &str, json: bool) -> Result<()> {
    let report = inspect_text(config, text)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("tokenizer:  {}", report.tokenizer);
    println!("word shape: {:?}", report.word_shape);
    println!("char shape: {:?}", report.char_shape);
    println!();
    println!("{:<5} {:<20} {:<20} CHARS", "#", "TOKEN", "WORD");
    for (i, row) in report.tokens.iter().enumerate() {
        let slots: String = row
            .chars
            .iter()
            .map(|c| if c.is_empty() { "·" } else { c.as_str() })
            .collect();
        println!("{:<5} {:<20} {:<20} {}", i, row.token, row.word, slots);
    }
    Ok(())
}
