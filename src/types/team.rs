//! Review teams
//!
//! Teams are the primary bucketing unit of the snapshot: every pull request
//! references at least one team, falling back to the "no team assigned"
//! sentinel when nothing was requested.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PullCounted;

const NO_TEAM_NAME: &str = "No team assigned";
const NO_TEAM_SLUG: &str = "_";

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-z_]+").expect("Failed to compile slug regex"));

/// Upstream node id of a team; the empty id is the "no team" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn no_team() -> Self {
        Self(String::new())
    }

    pub fn is_no_team(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team requested to review one or more pull requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub avatar: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_slug: Option<String>,
    pub pull_count: u32,
}

impl Team {
    pub fn new(id: TeamId, name: String, avatar: String, slug: String) -> Self {
        Self {
            id,
            name,
            avatar,
            slug,
            full_name: None,
            full_slug: None,
            pull_count: 0,
        }
    }

    /// Qualifies the name and slug with the parent team, `parent/child`.
    pub fn with_parent(mut self, parent_name: &str, parent_slug: &str) -> Self {
        self.full_name = Some(format!("{}/{}", parent_name, self.name));
        self.full_slug = Some(format!("{}/{}", parent_slug, self.slug));
        self
    }

    /// Sentinel bucket for pull requests without any requested team.
    pub fn no_team() -> Self {
        Self::new(
            TeamId::no_team(),
            NO_TEAM_NAME.to_string(),
            String::new(),
            NO_TEAM_SLUG.to_string(),
        )
    }
}

impl PullCounted for Team {
    fn record_pull(&mut self) {
        self.pull_count += 1;
    }
}

/// Derives a URL slug from a team display name.
///
/// Lowercases, replaces runs of characters outside `[0-9a-z_]` with `-` and
/// trims trailing dashes.
pub fn slugify_team_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_end_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_team_name() {
        assert_eq!(slugify_team_name("Core"), "core");
        assert_eq!(slugify_team_name("GDScript & VM!!"), "gdscript-vm");
        assert_eq!(slugify_team_name("build_system"), "build_system");
        assert_eq!(slugify_team_name("  Docs  "), "-docs");
    }

    #[test]
    fn test_team_with_parent() {
        let team = Team::new(
            TeamId("T_2".to_string()),
            "Rendering".to_string(),
            String::new(),
            "rendering".to_string(),
        )
        .with_parent("Engine", "engine");

        assert_eq!(team.full_name.as_deref(), Some("Engine/Rendering"));
        assert_eq!(team.full_slug.as_deref(), Some("engine/rendering"));
    }

    #[test]
    fn test_team_without_parent_omits_full_fields() {
        let json = serde_json::to_value(Team::no_team()).unwrap();
        assert_eq!(json["id"], "");
        assert_eq!(json["name"], "No team assigned");
        assert_eq!(json["slug"], "_");
        assert!(json.get("full_name").is_none());
        assert!(json.get("full_slug").is_none());
    }
}
