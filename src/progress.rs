//! Runtime progress reporting.
//!
//! Model download, model loading and per-question answers are reported so
//! users can see what a `pqa` invocation is doing. Progress goes to
//! **stderr** so stdout stays parseable for scripts.

use std::io::Write;

/// A single event emitted by the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The model file was already on disk; nothing was fetched.
    ModelCached { path: String },
    /// Fetching the model artifact has started.
    Downloading { url: String },
    /// The artifact was written to `path`.
    Downloaded { path: String, bytes: u64 },
    /// The inference engine finished loading the model.
    ModelLoaded { path: String },
    /// A question was answered with span `[start, end]`.
    Answered {
        label: String,
        start: usize,
        end: usize,
    },
}

/// Receives runtime events. Implementations write to stderr (human or JSON).
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: RuntimeEvent);
}

/// Human-friendly lines on stderr: "model  downloaded  7,611,416 bytes -> model/bidaf.onnx".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: RuntimeEvent) {
        let line = match &event {
            RuntimeEvent::ModelCached { path } => format!("model  cached  {}\n", path),
            RuntimeEvent::Downloading { url } => format!("model  downloading  {}\n", url),
            RuntimeEvent::Downloaded { path, bytes } => format!(
                "model  downloaded  {} bytes -> {}\n",
                format_number(*bytes),
                path
            ),
            RuntimeEvent::ModelLoaded { path } => format!("model  loaded  {}\n", path),
            RuntimeEvent::Answered { label, start, end } => {
                format!("answer  {}  tokens {}..={}\n", label, start, end)
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: RuntimeEvent) {
        let obj = event_json(&event);
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

fn event_json(event: &RuntimeEvent) -> serde_json::Value {
    match event {
        RuntimeEvent::ModelCached { path } => serde_json::json!({
            "event": "model",
            "phase": "cached",
            "path": path
        }),
        RuntimeEvent::Downloading { url } => serde_json::json!({
            "event": "model",
            "phase": "downloading",
            "url": url
        }),
        RuntimeEvent::Downloaded { path, bytes } => serde_json::json!({
            "event": "model",
            "phase": "downloaded",
            "path": path,
            "bytes": bytes
        }),
        RuntimeEvent::ModelLoaded { path } => serde_json::json!({
            "event": "model",
            "phase": "loaded",
            "path": path
        }),
        RuntimeEvent::Answered { label, start, end } => serde_json::json!({
            "event": "answer",
            "label": label,
            "start": start,
            "end": end
        }),
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: RuntimeEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(7_611_416), "7,611,416");
    }

    #[test]
    fn answered_event_json_shape() {
        let obj = event_json(&RuntimeEvent::Answered {
            label: "capital".to_string(),
            start: 0,
            end: 0,
        });
        assert_eq!(obj["event"], "answer");
        assert_eq!(obj["label"], "capital");
        assert_eq!(obj["start"], 0);
    }

    #[test]
    fn downloaded_event_json_shape() {
        let obj = event_json(&RuntimeEvent::Downloaded {
            path: "model/bidaf.onnx".to_string(),
            bytes: 42,
        });
        assert_eq!(obj["phase"], "downloaded");
        assert_eq!(obj["bytes"], 42);
    }
}
