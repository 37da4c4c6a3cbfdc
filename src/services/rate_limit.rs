use tracing::{error, info};

use crate::github::client::{GraphQLExecutor, decode_graphql_data};
use crate::github::error::TransportError;
use crate::github::graphql::graphql_types::{
    GraphQLPayload, GraphQLQuery, RateLimit, RateLimitResponse,
};
use crate::github::graphql::rate_limit::rate_limit_query;
use crate::services::response_log::ResponseLog;

const QUERY_NAME: &str = "rate_limit";
const LOG_NAME: &str = "_rate_limit";

/// Reports the remaining API quota around a run.
///
/// Purely informational: a low quota never stops the run, the API rejects
/// over-quota requests on its own.
pub struct RateLimitProbe<'a, E: GraphQLExecutor> {
    executor: &'a E,
    response_log: &'a ResponseLog,
}

impl<'a, E: GraphQLExecutor> RateLimitProbe<'a, E> {
    pub fn new(executor: &'a E, response_log: &'a ResponseLog) -> Self {
        Self {
            executor,
            response_log,
        }
    }

    pub async fn check_rates(&self) -> Result<RateLimit, TransportError> {
        let payload: GraphQLPayload<()> = GraphQLPayload {
            query: GraphQLQuery(rate_limit_query()),
            variables: None,
        };

        let result = self.fetch_rates(payload).await;
        match &result {
            Ok(rate_limit) => info!(
                "[${}] Available API calls: {}/{}; resets at {}",
                rate_limit.cost, rate_limit.remaining, rate_limit.limit, rate_limit.reset_at
            ),
            Err(e) => error!("Failed to get the API rate limits: {}", e),
        }
        result
    }

    async fn fetch_rates(&self, payload: GraphQLPayload<()>) -> Result<RateLimit, TransportError> {
        let body = self
            .executor
            .execute_graphql(QUERY_NAME, payload)
            .await?
            .error_for_status()?;

        self.response_log.record(LOG_NAME, &body).await;

        let response: RateLimitResponse = decode_graphql_data(QUERY_NAME, &body)?;
        Ok(response.rate_limit)
    }
}
