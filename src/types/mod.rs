//! Core type definitions and domain models
//!
//! These are the canonical shapes written to the snapshot file. Upstream
//! GraphQL payload types live in `crate::github::graphql::graphql_types` and
//! are converted into these at the ingestion boundary.

pub mod issue_link;
pub mod label;
pub mod pull_request;
pub mod repository;
pub mod snapshot;
pub mod team;
pub mod user;

pub use issue_link::*;
pub use label::*;
pub use pull_request::*;
pub use repository::*;
pub use snapshot::*;
pub use team::*;
pub use user::*;
