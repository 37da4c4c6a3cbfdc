use crate::github::error::TransportError;
use crate::github::graphql::graphql_types::{GraphQLPayload, GraphQLResponse};

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Public GitHub GraphQL endpoint
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Default timeout applied to every GraphQL request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT_VALUE: &str = "pr-snapshot";

/// Preview media type that exposes `mergeStateStatus` on pull requests
const MERGE_INFO_PREVIEW: &str = "application/vnd.github.merge-info-preview+json";

/// Raw outcome of one GraphQL round trip.
///
/// Non-2xx statuses are not errors at this level; callers decide what a failed
/// status means for the run.
#[derive(Debug, Clone)]
pub struct GraphQLHttpResponse {
    pub status: u16,
    /// Parsed JSON body, or the body text as a JSON string when a non-2xx
    /// response was not JSON
    pub body: serde_json::Value,
}

impl GraphQLHttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body of a 2xx response, or a status failure otherwise.
    pub fn error_for_status(self) -> std::result::Result<serde_json::Value, TransportError> {
        if self.is_success() {
            return Ok(self.body);
        }

        let message = match &self.body {
            serde_json::Value::String(text) => text.clone(),
            other => other
                .get("message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        };

        Err(TransportError::Status {
            status: self.status,
            message,
        })
    }
}

pub trait GraphQLExecutor {
    #[allow(async_fn_in_trait)]
    async fn execute_graphql<T: Serialize>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> std::result::Result<GraphQLHttpResponse, TransportError>;
}

#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: Url,
    token: Option<String>,
}

// The token must never end up in logs
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url.as_str())
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl GitHubClient {
    pub fn new(api_url: Url, token: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let timeout_duration = timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let connection_timeout = std::cmp::min(timeout_duration, Duration::from_secs(10));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .connect_timeout(connection_timeout)
            .timeout(timeout_duration)
            .build()
            .context("Failed to build GitHub client")?;

        if token.is_none() {
            warn!("No GitHub token configured; the anonymous rate limit applies");
        }

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

impl GraphQLExecutor for GitHubClient {
    async fn execute_graphql<T: Serialize>(
        &self,
        query_name: &str,
        payload: GraphQLPayload<T>,
    ) -> std::result::Result<GraphQLHttpResponse, TransportError> {
        debug!("Starting GraphQL request {} to {}", query_name, self.api_url);
        let start_time = std::time::Instant::now();

        let mut request = self
            .client
            .post(self.api_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, MERGE_INFO_PREVIEW)
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest_error(query_name, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest_error(query_name, e))?;

        info!(
            "GraphQL request {} completed with status {} in {:?}",
            query_name,
            status.as_u16(),
            start_time.elapsed()
        );

        let body = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(TransportError::InvalidBody(format!(
                    "{} response is not JSON: {}",
                    query_name, e
                )));
            }
            Err(_) => serde_json::Value::String(text),
        };

        Ok(GraphQLHttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Decodes the `data` member of a successful GraphQL response body.
///
/// Entries in `errors` are logged as warnings; they only fail the request when
/// the server returned no `data` at all.
pub fn decode_graphql_data<R: DeserializeOwned>(
    query_name: &str,
    body: &serde_json::Value,
) -> std::result::Result<R, TransportError> {
    let response: GraphQLResponse<serde_json::Value> =
        serde_json::from_value(body.clone()).map_err(|e| TransportError::UnexpectedShape {
            query_name: query_name.to_string(),
            message: e.to_string(),
        })?;

    let errors: Vec<String> = response
        .errors
        .unwrap_or_default()
        .into_iter()
        .map(|error| match error.error_type {
            Some(error_type) => format!("[{}] {}", error_type, error.message),
            None => error.message,
        })
        .collect();

    if !errors.is_empty() {
        warn!("Server handled the {} request, but there were errors:", query_name);
        for error in &errors {
            warn!("    {}", error);
        }
    }

    let data = match response.data {
        Some(data) if !data.is_null() => data,
        _ => {
            return Err(TransportError::MissingData {
                query_name: query_name.to_string(),
                errors,
            });
        }
    };

    serde_json::from_value(data).map_err(|e| TransportError::UnexpectedShape {
        query_name: query_name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::graphql::graphql_types::RateLimitResponse;
    use serde_json::json;

    #[test]
    fn test_error_for_status_extracts_message() {
        let response = GraphQLHttpResponse {
            status: 401,
            body: json!({"message": "Bad credentials"}),
        };
        assert_eq!(
            response.error_for_status(),
            Err(TransportError::Status {
                status: 401,
                message: "Bad credentials".to_string()
            })
        );

        let response = GraphQLHttpResponse {
            status: 502,
            body: json!("<html>Bad gateway</html>"),
        };
        assert!(matches!(
            response.error_for_status(),
            Err(TransportError::Status { status: 502, .. })
        ));
    }

    #[test]
    fn test_decode_graphql_data() {
        let body = json!({
            "data": {"rateLimit": {"limit": 5000, "cost": 1, "remaining": 4990, "resetAt": "2024-05-01T10:00:00Z"}},
            "errors": [{"type": "NOT_FOUND", "message": "something minor"}]
        });
        let decoded: RateLimitResponse = decode_graphql_data("rate_limit", &body).unwrap();
        assert_eq!(decoded.rate_limit.remaining, 4990);
    }

    #[test]
    fn test_decode_graphql_without_data_fails() {
        let body = json!({"data": null, "errors": [{"message": "Field 'x' doesn't exist"}]});
        let result: std::result::Result<RateLimitResponse, _> =
            decode_graphql_data("rate_limit", &body);
        assert_eq!(
            result.unwrap_err(),
            TransportError::MissingData {
                query_name: "rate_limit".to_string(),
                errors: vec!["Field 'x' doesn't exist".to_string()],
            }
        );
    }
}
