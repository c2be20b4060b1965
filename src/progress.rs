//! Sync progress reporting.
//!
//! Progress goes to **stderr** so stdout stays parseable (summary, `list`
//! output, rendered markdown). Human lines by default on a TTY, JSON lines
//! for scripts, or nothing.

use std::io::Write;

/// A single progress event for sync.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncProgressEvent {
    /// The index is being fetched; no total yet.
    Discovering { repo: String },
    /// One asset was stored for `item`.
    Asset { item: String, path: String },
    /// `n` of `total` items written.
    Item { item: String, n: u64, total: u64 },
}

/// Reports sync progress. Implementations write to stderr (human or JSON).
pub trait SyncProgressReporter: Send + Sync {
    fn report(&self, event: SyncProgressEvent);
}

/// Human-friendly progress on stderr: "sync cardano-foundation/CIPs  12 / 140 items  CIP-0012".
pub struct StderrProgress;

impl SyncProgressReporter for StderrProgress {
    fn report(&self, event: SyncProgressEvent) {
        let line = match &event {
            SyncProgressEvent::Discovering { repo } => {
                format!("sync {}  reading index...\n", repo)
            }
            SyncProgressEvent::Asset { item, path } => {
                format!("  {}  asset {}\n", item, path)
            }
            SyncProgressEvent::Item { item, n, total } => {
                format!(
                    "sync  {} / {} items  {}\n",
                    format_number(*n),
                    format_number(*total),
                    item
                )
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl SyncProgressReporter for JsonProgress {
    fn report(&self, event: SyncProgressEvent) {
        let obj = event_json(&event);
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

fn event_json(event: &SyncProgressEvent) -> serde_json::Value {
    match event {
        SyncProgressEvent::Discovering { repo } => serde_json::json!({
            "event": "progress",
            "phase": "discovering",
            "repo": repo
        }),
        SyncProgressEvent::Asset { item, path } => serde_json::json!({
            "event": "progress",
            "phase": "asset",
            "item": item,
            "path": path
        }),
        SyncProgressEvent::Item { item, n, total } => serde_json::json!({
            "event": "progress",
            "phase": "item",
            "item": item,
            "n": n,
            "total": total
        }),
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl SyncProgressReporter for NoProgress {
    fn report(&self, _event: SyncProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
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

    pub fn reporter(&self) -> Box<dyn SyncProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
