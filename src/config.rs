//! Run configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command line flags. The API token never comes from the file; it is taken
//! from the command line or the `GRAPHQL_TOKEN` / `GITHUB_TOKEN` environment
//! variables, in that order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use url::Url;

use crate::github::client::{DEFAULT_GRAPHQL_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::types::RepositoryId;

pub const DEFAULT_REPOSITORY: &str = "godotengine/godot";
pub const DEFAULT_HOST: &str = "github.com";
pub const DEFAULT_OUTPUT_PATH: &str = "out/data.json";
pub const DEFAULT_RESPONSE_LOG_DIR: &str = "logs";

const TOKEN_ENV_VARS: [&str; 2] = ["GRAPHQL_TOKEN", "GITHUB_TOKEN"];

/// Contents of a `config.toml`; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub repository: Option<String>,
    pub host: Option<String>,
    pub api_url: Option<String>,
    pub output_path: Option<PathBuf>,
    pub response_log_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration file")
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In {}", path.display()))
    }
}

/// Values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repository: Option<String>,
    pub host: Option<String>,
    pub api_url: Option<String>,
    pub output_path: Option<PathBuf>,
    pub response_log_dir: Option<PathBuf>,
    pub no_response_log: bool,
    pub request_timeout_secs: Option<u64>,
    pub github_token: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SnapshotConfig {
    pub repository_id: RepositoryId,
    pub host: String,
    pub api_url: Url,
    pub output_path: PathBuf,
    /// `None` disables raw response logging
    pub response_log_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    pub github_token: Option<String>,
}

impl std::fmt::Debug for SnapshotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotConfig")
            .field("repository_id", &self.repository_id)
            .field("host", &self.host)
            .field("api_url", &self.api_url.as_str())
            .field("output_path", &self.output_path)
            .field("response_log_dir", &self.response_log_dir)
            .field("request_timeout", &self.request_timeout)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SnapshotConfig {
    /// Loads the configuration for a run.
    ///
    /// An explicit `config_path` must exist; otherwise the per-user default
    /// file is used when present.
    pub fn load(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => ConfigFile::read(path)?,
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => {
                    tracing::debug!("Using config file {}", path.display());
                    ConfigFile::read(&path)?
                }
                None => ConfigFile::default(),
            },
        };

        Self::resolve(file, overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve(
        file: ConfigFile,
        overrides: ConfigOverrides,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let repository = overrides
            .repository
            .or(file.repository)
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        let repository_id = RepositoryId::parse(&repository).map_err(|e| anyhow!(e))?;

        let host = overrides
            .host
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let api_url = match overrides.api_url.or(file.api_url) {
            Some(api_url) => api_url,
            None => default_api_url(&host),
        };
        let api_url =
            Url::parse(&api_url).with_context(|| format!("Invalid API URL '{}'", api_url))?;

        let output_path = overrides
            .output_path
            .or(file.output_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

        let response_log_dir = if overrides.no_response_log {
            None
        } else {
            Some(
                overrides
                    .response_log_dir
                    .or(file.response_log_dir)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_RESPONSE_LOG_DIR)),
            )
        };

        let request_timeout = overrides
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let github_token = overrides
            .github_token
            .or_else(|| TOKEN_ENV_VARS.iter().find_map(|key| env_lookup(key)))
            .filter(|token| !token.trim().is_empty());

        Ok(Self {
            repository_id,
            host,
            api_url,
            output_path,
            response_log_dir,
            request_timeout,
            github_token,
        })
    }
}

/// GraphQL endpoint for a host; GitHub Enterprise serves it under `/api/graphql`.
fn default_api_url(host: &str) -> String {
    if host == DEFAULT_HOST {
        DEFAULT_GRAPHQL_URL.to_string()
    } else {
        format!("https://{}/api/graphql", host)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pr-snapshot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config =
            SnapshotConfig::resolve(ConfigFile::default(), ConfigOverrides::default(), no_env)
                .unwrap();

        assert_eq!(config.repository_id, RepositoryId::new("godotengine", "godot"));
        assert_eq!(config.host, "github.com");
        assert_eq!(config.api_url.as_str(), DEFAULT_GRAPHQL_URL);
        assert_eq!(config.output_path, PathBuf::from("out/data.json"));
        assert_eq!(config.response_log_dir, Some(PathBuf::from("logs")));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.github_token, None);
    }

    #[test]
    fn test_file_values_and_overrides() {
        let file = ConfigFile::from_toml(
            r#"
repository = "foo/bar"
host = "git.example.com"
output_path = "public/data.json"
request_timeout_secs = 5
"#,
        )
        .unwrap();
        let overrides = ConfigOverrides {
            repository: Some("https://git.example.com/baz/qux".to_string()),
            no_response_log: true,
            ..Default::default()
        };

        let config = SnapshotConfig::resolve(file, overrides, no_env).unwrap();

        assert_eq!(config.repository_id, RepositoryId::new("baz", "qux"));
        assert_eq!(config.api_url.as_str(), "https://git.example.com/api/graphql");
        assert_eq!(config.output_path, PathBuf::from("public/data.json"));
        assert_eq!(config.response_log_dir, None);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_token_precedence() {
        let env = |key: &str| match key {
            "GRAPHQL_TOKEN" => Some("graphql-token".to_string()),
            "GITHUB_TOKEN" => Some("github-token".to_string()),
            _ => None,
        };
        let config =
            SnapshotConfig::resolve(ConfigFile::default(), ConfigOverrides::default(), env)
                .unwrap();
        assert_eq!(config.github_token.as_deref(), Some("graphql-token"));

        let github_only = |key: &str| (key == "GITHUB_TOKEN").then(|| "github-token".to_string());
        let config =
            SnapshotConfig::resolve(ConfigFile::default(), ConfigOverrides::default(), github_only)
                .unwrap();
        assert_eq!(config.github_token.as_deref(), Some("github-token"));

        let overrides = ConfigOverrides {
            github_token: Some("flag-token".to_string()),
            ..Default::default()
        };
        let config = SnapshotConfig::resolve(ConfigFile::default(), overrides, env).unwrap();
        assert_eq!(config.github_token.as_deref(), Some("flag-token"));
        assert!(!format!("{:?}", config).contains("flag-token"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let overrides = ConfigOverrides {
            repository: Some("not a repository".to_string()),
            ..Default::default()
        };
        assert!(SnapshotConfig::resolve(ConfigFile::default(), overrides, no_env).is_err());

        assert!(ConfigFile::from_toml("repo = \"foo/bar\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"http://127.0.0.1:9999/graphql\"\n").unwrap();

        let config = SnapshotConfig::load(Some(&path), ConfigOverrides::default()).unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:9999/graphql");

        let missing = temp_dir.path().join("missing.toml");
        assert!(SnapshotConfig::load(Some(&missing), ConfigOverrides::default()).is_err());
    }
}
