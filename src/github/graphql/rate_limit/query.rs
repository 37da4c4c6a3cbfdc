/// Selection shared by the standalone probe and every page request, so each
/// page reports what it cost.
pub const RATE_LIMIT_SELECTION: &str = r#"
    rateLimit {
      limit
      cost
      remaining
      resetAt
    }"#;

pub fn rate_limit_query() -> String {
    format!(
        r#"
        query RateLimit {{
            {}
        }}"#,
        RATE_LIMIT_SELECTION
    )
}
