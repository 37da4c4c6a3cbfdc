//! Best-effort persistence of raw API responses for post-mortem debugging

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Writes raw responses as `<dir>/<name>.json`, indented with four spaces.
///
/// Failures are logged and swallowed; a missing log never affects the run.
#[derive(Debug, Clone, Default)]
pub struct ResponseLog {
    dir: Option<PathBuf>,
}

impl ResponseLog {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub async fn record(&self, name: &str, body: &serde_json::Value) {
        let Some(dir) = &self.dir else {
            return;
        };

        if let Err(e) = write_response(dir, name, body).await {
            tracing::warn!("Error saving log file {}: {}", name, e);
        }
    }
}

async fn write_response(dir: &Path, name: &str, body: &serde_json::Value) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    body.serialize(&mut serializer)?;

    tokio::fs::write(dir.join(format!("{}.json", name)), content).await
}
