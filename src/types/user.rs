//! Pull request authors and individual reviewers
//!
//! Both are registered globally in the snapshot and carry the number of pull
//! requests that reference them.

use serde::{Deserialize, Serialize};

use super::PullCounted;

const GHOST_LOGIN: &str = "ghost";
const GHOST_AVATAR_URL: &str = "https://avatars.githubusercontent.com/u/10137?v=4";
const GHOST_PROFILE_URL: &str = "https://github.com/ghost";

/// Upstream node id of an author
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuthorId(pub String);

impl AuthorId {
    /// Id of the ghost author standing in for deleted accounts
    pub fn ghost() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of one or more pull requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    #[serde(rename = "user")]
    pub login: String,
    pub avatar: String,
    pub url: String,
    pub pull_count: u32,
}

impl Author {
    pub fn new(id: AuthorId, login: String, avatar: String, url: String) -> Self {
        Self {
            id,
            login,
            avatar,
            url,
            pull_count: 0,
        }
    }

    /// The fixed record used when the upstream author account no longer exists.
    pub fn ghost() -> Self {
        Self::new(
            AuthorId::ghost(),
            GHOST_LOGIN.to_string(),
            GHOST_AVATAR_URL.to_string(),
            GHOST_PROFILE_URL.to_string(),
        )
    }
}

impl PullCounted for Author {
    fn record_pull(&mut self) {
        self.pull_count += 1;
    }
}

/// Upstream node id of an individual reviewer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewerId(pub String);

impl ReviewerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Individual user requested to review a pull request.
///
/// Serialized with `name` and `slug` both holding the login, which is what the
/// dashboard groups and links reviewers by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub id: ReviewerId,
    #[serde(rename = "name")]
    pub login: String,
    pub avatar: String,
    pub slug: String,
    pub pull_count: u32,
}

impl Reviewer {
    pub fn new(id: ReviewerId, login: String, avatar: String) -> Self {
        Self {
            id,
            slug: login.clone(),
            login,
            avatar,
            pull_count: 0,
        }
    }
}

impl PullCounted for Reviewer {
    fn record_pull(&mut self) {
        self.pull_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_author_serialization() {
        let json = serde_json::to_value(Author::ghost()).unwrap();
        assert_eq!(json["id"], "");
        assert_eq!(json["user"], "ghost");
        assert_eq!(json["url"], "https://github.com/ghost");
        assert_eq!(json["pull_count"], 0);
    }

    #[test]
    fn test_reviewer_slug_is_login() {
        let reviewer = Reviewer::new(
            ReviewerId("U_1".to_string()),
            "octocat".to_string(),
            "https://avatars.example/octocat".to_string(),
        );
        let json = serde_json::to_value(&reviewer).unwrap();
        assert_eq!(json["name"], "octocat");
        assert_eq!(json["slug"], "octocat");
    }
}
