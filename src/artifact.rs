//! Model artifact store: locate the ONNX file, downloading it if absent.
//!
//! The file lives at `<model.dir>/<model.file_name>`. When it is missing it
//! is fetched from `model.url`, written to a `.part` sibling and renamed
//! into place, so an interrupted download never leaves a truncated model
//! behind. An existing file is trusted as-is: there is no checksum.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ModelConfig;
use crate::progress::{ProgressReporter, RuntimeEvent};

/// Streams the body behind a URL into a sink.
pub trait ArtifactFetcher: Send + Sync {
    /// Returns the number of bytes written.
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;
}

/// Blocking HTTP(S) fetcher. Non-2xx responses are errors.
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ArtifactFetcher for HttpFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Build HTTP client: {}", e))?;
        let mut resp = client
            .get(url)
            .send()
            .map_err(|e| anyhow::anyhow!("Download {}: {}", url, e))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Download {}: {}", url, e))?;
        resp.copy_to(sink)
            .map_err(|e| anyhow::anyhow!("Read body: {}", e))
    }
}

/// Where the model lives and how to obtain it.
pub struct ModelStore {
    dir: PathBuf,
    file_name: String,
    url: String,
    fetcher: Box<dyn ArtifactFetcher>,
}

impl ModelStore {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            file_name: config.file_name.clone(),
            url: config.url.clone(),
            fetcher: Box::new(HttpFetcher::new(Duration::from_secs(
                config.download_timeout_secs,
            ))),
        }
    }

    /// Replace the HTTP fetcher (tests, mirrors, offline bundles).
    pub fn with_fetcher(mut self, fetcher: Box<dyn ArtifactFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn is_cached(&self) -> bool {
        self.model_path().is_file()
    }

    /// Make sure the model file exists, downloading it if needed.
    ///
    /// Returns the model path. Never touches the network when the file is
    /// already present.
    pub fn ensure(&self, reporter: &dyn ProgressReporter) -> Result<PathBuf> {
        let path = self.model_path();
        if self.is_cached() {
            reporter.report(RuntimeEvent::ModelCached {
                path: path.display().to_string(),
            });
            return Ok(path);
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Create model dir: {}", self.dir.display()))?;

        reporter.report(RuntimeEvent::Downloading {
            url: self.url.clone(),
        });
        let partial = partial_path(&path);
        let bytes = match self.download_to(&partial) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = std::fs::remove_file(&partial);
                return Err(e);
            }
        };
        std::fs::rename(&partial, &path)
            .with_context(|| format!("Move model into place: {}", path.display()))?;
        reporter.report(RuntimeEvent::Downloaded {
            path: path.display().to_string(),
            bytes,
        });

        Ok(path)
    }

    fn download_to(&self, partial: &Path) -> Result<u64> {
        let file = File::create(partial)
            .with_context(|| format!("Write model: {}", partial.display()))?;
        let mut writer = BufWriter::new(file);
        let bytes = self.fetcher.fetch(&self.url, &mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Write model: {}", partial.display()))?;
        Ok(bytes)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    PathBuf::from(partial)
}
