//! `pqa setup`: fetch the model ahead of time.

use anyhow::Result;

use crate::artifact::ModelStore;
use crate::config::Config;
use crate::progress::ProgressMode;

pub fn run_setup(config: &Config, progress: ProgressMode) -> Result<()> {
    let store = ModelStore::new(&config.model);
    let path = store.ensure(progress.reporter().as_ref())?;
    println!("Model ready: {}", path.display());
    Ok(())
}
