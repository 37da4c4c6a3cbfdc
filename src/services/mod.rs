//! The snapshot pipeline: rate probing, pagination, normalization and output

pub mod normalize;
pub mod page_fetcher;
pub mod rate_limit;
pub mod response_log;
pub mod snapshot;

pub use normalize::{EntityNormalizer, NormalizeError};
pub use page_fetcher::{FetchState, PageFetcher, PullRequestPage};
pub use rate_limit::RateLimitProbe;
pub use response_log::ResponseLog;
pub use snapshot::{RunOutcome, RunSummary, SnapshotAssembler, SnapshotError, write_snapshot};
