use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::github::graphql::graphql_types::pager::PageInfo;
use crate::github::graphql::graphql_types::rate_limit::RateLimit;
use crate::github::graphql::graphql_types::user::{AuthorNode, TeamReviewerNode, UserReviewerNode};
use crate::github::graphql::graphql_types::{LabelsConnection, MilestoneNode};
use crate::types::PullRequestState;

/// GraphQL response for one page of open pull requests.
///
/// Pull request nodes stay raw here; they are decoded one by one during
/// normalization so that a malformed node is reported as a data problem rather
/// than a transport problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPullRequestsResponse {
    #[serde(rename = "rateLimit")]
    pub rate_limit: Option<RateLimit>,
    pub repository: OpenPullRequestsRepository,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPullRequestsRepository {
    #[serde(rename = "pullRequests")]
    pub pull_requests: RawPullRequestsConnection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPullRequestsConnection {
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    pub nodes: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub id: String,
    pub number: u64,
    pub url: String,
    pub title: String,
    pub state: PullRequestState,
    pub is_draft: bool,
    pub mergeable: String,
    pub merge_state_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: Option<String>,
    pub base_ref_name: String,
    pub author: Option<AuthorNode>,
    pub milestone: Option<MilestoneNode>,
    pub labels: Option<LabelsConnection>,
    pub review_requests: Option<ReviewRequestsConnection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequestsConnection {
    pub nodes: Vec<ReviewRequestNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequestNode {
    #[serde(rename = "requestedReviewer")]
    pub requested_reviewer: Option<RequestedReviewer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum RequestedReviewer {
    Team(TeamReviewerNode),
    User(UserReviewerNode),
    /// Bots, mannequins and any reviewer kind added upstream later
    #[serde(other)]
    Other,
}

/// Review requests of one pull request split by reviewer kind.
#[derive(Debug, Clone, Default)]
pub struct RequestedReviewers {
    pub teams: Vec<TeamReviewerNode>,
    pub users: Vec<UserReviewerNode>,
}

impl From<Option<ReviewRequestsConnection>> for RequestedReviewers {
    fn from(review_requests: Option<ReviewRequestsConnection>) -> Self {
        let mut requested = Self::default();

        let reviewers = review_requests
            .into_iter()
            .flat_map(|connection| connection.nodes)
            .filter_map(|node| node.requested_reviewer);

        for reviewer in reviewers {
            match reviewer {
                RequestedReviewer::Team(team) => requested.teams.push(team),
                RequestedReviewer::User(user) => requested.users.push(user),
                RequestedReviewer::Other => {}
            }
        }

        requested
    }
}
