pub mod graphql_types;
pub mod pull_request;
pub mod rate_limit;
