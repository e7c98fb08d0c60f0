use anyhow::Result;

use crate::config::Config;

pub fn list_targets(config: &Config) -> Result<()> {
    let width = config
        .targets
        .iter()
        .map(|t| t.len())
        .max()
        .unwrap_or(0)
        .max("TARGET".len());

    println!("{:<width$}  QUESTION", "TARGET", width = width);
    for target in &config.targets {
        let question = config.queries.get(target).map(String::as_str).unwrap_or("");
        println!("{:<width$}  {}", target, question, width = width);
    }
    Ok(())
}
