use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::issue_link::IssueLink;
use super::label::{Label, Milestone};
use super::team::TeamId;
use super::user::{AuthorId, ReviewerId};

/// Represents the state of a GitHub pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")] // For GraphQL API compatibility
pub enum PullRequestState {
    /// Pull request is open
    Open,
    /// Pull request is closed without merging
    Closed,
    /// Pull request is merged
    Merged,
}

/// Flat pull request record as stored in the snapshot.
///
/// Related authors, teams and reviewers are referenced by id and live in the
/// snapshot's registries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub public_id: u64,
    pub url: String,
    pub diff_url: String,
    pub patch_url: String,

    pub title: String,
    pub state: PullRequestState,
    pub is_draft: bool,
    pub authored_by: AuthorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub target_branch: String,

    pub mergeable_state: String,
    pub mergeable_reason: String,
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub links: Vec<IssueLink>,

    pub teams: Vec<TeamId>,
    pub reviewers: Vec<ReviewerId>,
}

impl PullRequest {
    pub fn diff_url_of(url: &str) -> String {
        format!("{}.diff", url)
    }

    pub fn patch_url_of(url: &str) -> String {
        format!("{}.patch", url)
    }
}
