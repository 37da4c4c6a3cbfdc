use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    #[serde(rename = "rateLimit")]
    pub rate_limit: RateLimit,
}

/// API quota as reported by GitHub; `cost` is what the reporting query consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub limit: u32,
    pub cost: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}
