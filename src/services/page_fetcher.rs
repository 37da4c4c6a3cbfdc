//! Forward-only cursor pagination over the open pull requests of a repository

use tracing::{error, info};

use crate::github::client::{GraphQLExecutor, decode_graphql_data};
use crate::github::error::TransportError;
use crate::github::graphql::graphql_types::{GraphQLPayload, GraphQLQuery, OpenPullRequestsResponse};
use crate::github::graphql::pull_request::{
    OpenPullRequestsVariable, PULLS_PER_PAGE, open_pull_requests_query,
};
use crate::services::response_log::ResponseLog;
use crate::types::RepositoryId;

const QUERY_NAME: &str = "open_pull_requests";

/// One page of raw pull request nodes.
#[derive(Debug, Clone)]
pub struct PullRequestPage {
    /// 1-based page number
    pub page: u32,
    pub nodes: Vec<serde_json::Value>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub total_count: u64,
}

impl PullRequestPage {
    /// Number of pages needed for `total_count` pull requests.
    pub fn page_count(&self) -> u32 {
        page_count_for(self.total_count)
    }
}

pub fn page_count_for(total_count: u64) -> u32 {
    total_count.div_ceil(u64::from(PULLS_PER_PAGE)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    NotStarted,
    /// The last page requested successfully
    Fetching { page: u32 },
    Done,
    Failed,
}

/// Fetches pages strictly in order; each cursor is only known from the
/// previous response. A failed request is terminal.
pub struct PageFetcher<'a, E: GraphQLExecutor> {
    executor: &'a E,
    repository_id: &'a RepositoryId,
    response_log: &'a ResponseLog,
    cursor: Option<String>,
    page_count: u32,
    state: FetchState,
}

impl<'a, E: GraphQLExecutor> PageFetcher<'a, E> {
    pub fn new(
        executor: &'a E,
        repository_id: &'a RepositoryId,
        response_log: &'a ResponseLog,
    ) -> Self {
        Self {
            executor,
            repository_id,
            response_log,
            cursor: None,
            // Unknown until the first response reports the total count.
            page_count: 1,
            state: FetchState::NotStarted,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Whether another page should be requested.
    pub fn has_more(&self) -> bool {
        match self.state {
            FetchState::NotStarted => true,
            FetchState::Fetching { page } => page < self.page_count,
            FetchState::Done | FetchState::Failed => false,
        }
    }

    /// Requests the next page, or returns `None` once pagination has ended.
    pub async fn fetch_next(&mut self) -> Result<Option<PullRequestPage>, TransportError> {
        if !self.has_more() {
            return Ok(None);
        }
        let page = match self.state {
            FetchState::Fetching { page } => page + 1,
            _ => 1,
        };

        if self.page_count > 1 {
            info!(
                "Requesting page {}/{} of pull request data",
                page, self.page_count
            );
        } else {
            info!("Requesting page {} of pull request data", page);
        }

        match self.fetch_page(page).await {
            Ok(fetched) => {
                self.cursor = fetched.end_cursor.clone();
                self.page_count = fetched.page_count();
                self.state = if fetched.has_next_page && page < self.page_count {
                    FetchState::Fetching { page }
                } else {
                    FetchState::Done
                };
                Ok(Some(fetched))
            }
            Err(e) => {
                error!(
                    "Failed to get pull requests for '{}': {}",
                    self.repository_id, e
                );
                self.state = FetchState::Failed;
                Err(e)
            }
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<PullRequestPage, TransportError> {
        let payload = GraphQLPayload {
            query: GraphQLQuery(open_pull_requests_query()),
            variables: Some(OpenPullRequestsVariable::new(
                self.repository_id,
                self.cursor.clone(),
            )),
        };

        let body = self
            .executor
            .execute_graphql(QUERY_NAME, payload)
            .await?
            .error_for_status()?;

        self.response_log
            .record(&format!("data_page_{}", page), &body)
            .await;

        let response: OpenPullRequestsResponse = decode_graphql_data(QUERY_NAME, &body)?;
        let connection = response.repository.pull_requests;

        match response.rate_limit {
            Some(rate_limit) => info!(
                "[${}] Retrieved {} pull requests; processing...",
                rate_limit.cost,
                connection.nodes.len()
            ),
            None => info!(
                "Retrieved {} pull requests; processing...",
                connection.nodes.len()
            ),
        }

        Ok(PullRequestPage {
            page,
            nodes: connection.nodes,
            end_cursor: connection.page_info.end_cursor,
            has_next_page: connection.page_info.has_next_page,
            total_count: connection.total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::GraphQLHttpResponse;
    use serde::Serialize;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses and records the cursor of each request.
    struct ScriptedExecutor {
        responses: RefCell<VecDeque<GraphQLHttpResponse>>,
        cursors: RefCell<Vec<Option<String>>>,
    }

    impl ScriptedExecutor {
        fn new(responses: Vec<GraphQLHttpResponse>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                cursors: RefCell::new(Vec::new()),
            }
        }
    }

    impl GraphQLExecutor for ScriptedExecutor {
        async fn execute_graphql<T: Serialize>(
            &self,
            _query_name: &str,
            payload: GraphQLPayload<T>,
        ) -> Result<GraphQLHttpResponse, TransportError> {
            let variables = serde_json::to_value(&payload.variables).unwrap();
            self.cursors
                .borrow_mut()
                .push(variables["cursor"].as_str().map(str::to_string));
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .expect("unexpected request"))
        }
    }

    fn page_response(total_count: u64, has_next_page: bool, end_cursor: &str, nodes: usize) -> GraphQLHttpResponse {
        let nodes: Vec<_> = (0..nodes).map(|i| json!({"number": i})).collect();
        GraphQLHttpResponse {
            status: 200,
            body: json!({"data": {
                "rateLimit": {"limit": 5000, "cost": 1, "remaining": 4000, "resetAt": "2024-05-01T10:00:00Z"},
                "repository": {"pullRequests": {
                    "totalCount": total_count,
                    "pageInfo": {"hasNextPage": has_next_page, "endCursor": end_cursor},
                    "nodes": nodes
                }}
            }}),
        }
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count_for(0), 0);
        assert_eq!(page_count_for(1), 1);
        assert_eq!(page_count_for(100), 1);
        assert_eq!(page_count_for(101), 2);
        assert_eq!(page_count_for(250), 3);
    }

    #[tokio::test]
    async fn test_pages_follow_cursor_until_page_count() {
        let executor = ScriptedExecutor::new(vec![
            page_response(150, true, "c1", 100),
            page_response(150, false, "c2", 50),
        ]);
        let repository_id = RepositoryId::new("foo", "bar");
        let log = ResponseLog::disabled();
        let mut fetcher = PageFetcher::new(&executor, &repository_id, &log);

        let mut fetched = Vec::new();
        while let Some(page) = fetcher.fetch_next().await.unwrap() {
            fetched.push(page);
        }

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].nodes.len(), 100);
        assert_eq!(fetched[1].page, 2);
        assert_eq!(fetcher.page_count(), 2);
        assert_eq!(fetcher.state(), FetchState::Done);
        assert_eq!(
            *executor.cursors.borrow(),
            vec![None, Some("c1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_repository_fetches_one_page() {
        let executor = ScriptedExecutor::new(vec![page_response(0, false, "", 0)]);
        let repository_id = RepositoryId::new("foo", "bar");
        let log = ResponseLog::disabled();
        let mut fetcher = PageFetcher::new(&executor, &repository_id, &log);

        let page = fetcher.fetch_next().await.unwrap().unwrap();
        assert!(page.nodes.is_empty());
        assert!(!fetcher.has_more());
        assert!(fetcher.fetch_next().await.unwrap().is_none());
        assert_eq!(executor.cursors.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_status_is_terminal() {
        let executor = ScriptedExecutor::new(vec![
            page_response(300, true, "c1", 100),
            GraphQLHttpResponse {
                status: 502,
                body: json!("Bad gateway"),
            },
        ]);
        let repository_id = RepositoryId::new("foo", "bar");
        let log = ResponseLog::disabled();
        let mut fetcher = PageFetcher::new(&executor, &repository_id, &log);

        fetcher.fetch_next().await.unwrap();
        assert_eq!(fetcher.page_count(), 3);
        assert!(fetcher.has_more());

        let error = fetcher.fetch_next().await.unwrap_err();
        assert!(matches!(error, TransportError::Status { status: 502, .. }));
        assert_eq!(fetcher.state(), FetchState::Failed);
        assert!(!fetcher.has_more());

        // A failed fetcher stays finished without issuing another request.
        assert!(fetcher.fetch_next().await.unwrap().is_none());
        assert_eq!(executor.cursors.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_transport_failure() {
        let executor = ScriptedExecutor::new(vec![GraphQLHttpResponse {
            status: 200,
            body: json!({"data": {"repository": {"pullRequests": {"nodes": []}}}}),
        }]);
        let repository_id = RepositoryId::new("foo", "bar");
        let log = ResponseLog::disabled();
        let mut fetcher = PageFetcher::new(&executor, &repository_id, &log);

        let error = fetcher.fetch_next().await.unwrap_err();
        assert!(matches!(error, TransportError::UnexpectedShape { .. }));
    }
}
