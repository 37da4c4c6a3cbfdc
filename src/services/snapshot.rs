//! Drives one snapshot run: rate probe, page loop, normalization, write.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use strum::Display;
use tracing::{debug, info};

use crate::github::client::GraphQLExecutor;
use crate::github::error::TransportError;
use crate::services::normalize::{EntityNormalizer, NormalizeError};
use crate::services::page_fetcher::PageFetcher;
use crate::services::rate_limit::RateLimitProbe;
use crate::services::response_log::ResponseLog;
use crate::types::{PullRequest, Registries, RepositoryId, Snapshot};

/// How a run ended, as seen by the calling process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RunOutcome {
    #[strum(serialize = "success")]
    Success,
    #[strum(serialize = "request failure")]
    RequestFailure,
    #[strum(serialize = "parse failure")]
    ParseFailure,
    #[strum(serialize = "write failure")]
    WriteFailure,
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::RequestFailure => 1,
            Self::ParseFailure => 2,
            Self::WriteFailure => 3,
        }
    }
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        ExitCode::from(outcome.exit_code())
    }
}

#[derive(Debug)]
pub enum SnapshotError {
    Transport(TransportError),
    Normalize(NormalizeError),
    Serialize(serde_json::Error),
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SnapshotError {
    pub fn outcome(&self) -> RunOutcome {
        match self {
            Self::Transport(_) => RunOutcome::RequestFailure,
            Self::Normalize(_) => RunOutcome::ParseFailure,
            Self::Serialize(_) | Self::Write { .. } => RunOutcome::WriteFailure,
        }
    }
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Request failed: {}", e),
            Self::Normalize(e) => write!(f, "Unexpected pull request data: {}", e),
            Self::Serialize(e) => write!(f, "Failed to serialize snapshot: {}", e),
            Self::Write { path, source } => {
                write!(f, "Failed to write snapshot to {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Normalize(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<TransportError> for SnapshotError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<NormalizeError> for SnapshotError {
    fn from(e: NormalizeError) -> Self {
        Self::Normalize(e)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_fetched: u32,
    pub pull_count: usize,
    pub author_count: usize,
    pub team_count: usize,
    pub reviewer_count: usize,
    pub output_path: PathBuf,
}

pub struct SnapshotAssembler<'a, E: GraphQLExecutor> {
    executor: &'a E,
    repository_id: &'a RepositoryId,
    normalizer: EntityNormalizer,
    response_log: &'a ResponseLog,
}

impl<'a, E: GraphQLExecutor> SnapshotAssembler<'a, E> {
    pub fn new(
        executor: &'a E,
        repository_id: &'a RepositoryId,
        normalizer: EntityNormalizer,
        response_log: &'a ResponseLog,
    ) -> Self {
        Self {
            executor,
            repository_id,
            normalizer,
            response_log,
        }
    }

    /// Collects a snapshot and writes it to `output_path`.
    ///
    /// Nothing is written unless every page was fetched and normalized.
    pub async fn run(&self, output_path: &Path) -> Result<RunSummary, SnapshotError> {
        let (snapshot, pages_fetched) = self.collect().await?;

        info!("Saving snapshot to {}", output_path.display());
        write_snapshot(&snapshot, output_path).await?;

        Ok(RunSummary {
            pages_fetched,
            pull_count: snapshot.pulls.len(),
            author_count: snapshot.authors.len(),
            team_count: snapshot.teams.len(),
            reviewer_count: snapshot.reviewers.len(),
            output_path: output_path.to_path_buf(),
        })
    }

    async fn collect(&self) -> Result<(Snapshot, u32), SnapshotError> {
        let probe = RateLimitProbe::new(self.executor, self.response_log);

        info!("Checking API rates...");
        probe.check_rates().await?;

        let mut registries = Registries::default();
        let mut pulls: Vec<PullRequest> = Vec::new();
        let mut pages_fetched = 0;

        let mut fetcher = PageFetcher::new(self.executor, self.repository_id, self.response_log);
        while let Some(page) = fetcher.fetch_next().await? {
            pages_fetched += 1;

            for node in page.nodes {
                pulls.push(self.normalizer.normalize(node, &mut registries)?);
            }
            debug!(
                "Page {} normalized; {} pull requests so far",
                page.page,
                pulls.len()
            );
        }

        info!("Checking API rates...");
        probe.check_rates().await?;

        let generated_at = chrono::Utc::now().timestamp_millis();
        Ok((Snapshot::new(generated_at, registries, pulls), pages_fetched))
    }
}

/// Serializes `snapshot` to `path` through a temporary sibling file, so the
/// target is either the previous content or the complete new one.
pub async fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), SnapshotError> {
    let content = serde_json::to_vec(snapshot).map_err(SnapshotError::Serialize)?;
    let write_error = |source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let temp_path = temp_path_for(path);
    if let Err(e) = tokio::fs::write(&temp_path, &content).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(write_error(e));
    }
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(write_error(e));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    file_name.push(".tmp");
    path.with_file_name(file_name)
}
