use serde::{Deserialize, Serialize};

use crate::github::graphql::rate_limit::RATE_LIMIT_SELECTION;
use crate::types::RepositoryId;

/// Maximum page size GitHub accepts for a connection
pub const PULLS_PER_PAGE: u32 = 100;

const LABEL_LIMIT: u8 = 100;
const REVIEW_REQUEST_LIMIT: u8 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPullRequestsVariable {
    pub owner: String,
    pub repository_name: String,
    pub per_page: u32,
    /// `null` on the first page
    pub cursor: Option<String>,
}

impl OpenPullRequestsVariable {
    pub fn new(repository_id: &RepositoryId, cursor: Option<String>) -> Self {
        Self {
            owner: repository_id.owner.as_str().to_string(),
            repository_name: repository_id.repository_name.as_str().to_string(),
            per_page: PULLS_PER_PAGE,
            cursor,
        }
    }
}

pub fn pull_request_query_body() -> String {
    format!(
        r#"id
                    number
                    url
                    title
                    state
                    isDraft
                    mergeable
                    mergeStateStatus
                    createdAt
                    updatedAt
                    body
                    baseRefName
                    author {{
                      login
                      avatarUrl
                      url
                      ... on Node {{
                        id
                      }}
                    }}
                    milestone {{
                      id
                      title
                      url
                    }}
                    labels(first: {}) {{
                      nodes {{
                        id
                        name
                        color
                      }}
                    }}
                    reviewRequests(first: {}) {{
                      nodes {{
                        requestedReviewer {{
                          __typename
                          ... on Team {{
                            id
                            name
                            slug
                            avatarUrl
                            parentTeam {{
                              name
                              slug
                            }}
                          }}
                          ... on User {{
                            id
                            login
                            avatarUrl
                          }}
                        }}
                      }}
                    }}"#,
        LABEL_LIMIT, REVIEW_REQUEST_LIMIT,
    )
}

pub fn open_pull_requests_query() -> String {
    format!(
        r#"
        query OpenPullRequests($owner: String!, $repository_name: String!, $per_page: Int!, $cursor: String) {{
            {}
            repository(owner: $owner, name: $repository_name) {{
                pullRequests(first: $per_page, after: $cursor, states: OPEN) {{
                    totalCount
                    pageInfo {{
                        hasNextPage
                        endCursor
                    }}
                    nodes {{
                        {}
                    }}
                }}
            }}
        }}"#,
        RATE_LIMIT_SELECTION,
        pull_request_query_body()
    )
}
