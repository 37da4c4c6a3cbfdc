//! Repository identification
//!
//! The home repository is the one whose open pull requests are snapshotted, and
//! the repository that short issue references (`#123`) resolve against.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HTTPS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?[^/]+/([^/]+)/([^/]+?)(?:\.git)?/?$")
        .expect("Failed to compile HTTPS regex")
});

static SIMPLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^/\s]+)/([^/\s]+)$").expect("Failed to compile simple regex"));

/// Owner name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repository name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryId {
    pub owner: Owner,
    pub repository_name: RepositoryName,
}

impl RepositoryId {
    pub fn new(owner: impl Into<String>, repository_name: impl Into<String>) -> Self {
        Self {
            owner: Owner(owner.into()),
            repository_name: RepositoryName(repository_name.into()),
        }
    }

    /// Parses `owner/name` or a repository URL such as `https://github.com/owner/name`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();

        if let Some(captures) = SIMPLE_REGEX.captures(input) {
            return Ok(Self::new(&captures[1], &captures[2]));
        }

        if let Some(captures) = HTTPS_REGEX.captures(input) {
            return Ok(Self::new(&captures[1], &captures[2]));
        }

        Err(format!(
            "Invalid repository '{}': expected owner/name or a repository URL",
            input
        ))
    }

    /// Returns `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository_name)
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
