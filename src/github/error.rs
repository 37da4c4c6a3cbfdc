/// Failure of a single GraphQL round trip.
///
/// None of these are retried: the caller aborts the run on the first one.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The request never produced a response (connect failure, timeout, TLS)
    Network(String),
    /// The server answered with a non-2xx status
    Status { status: u16, message: String },
    /// A 2xx response whose body is not JSON
    InvalidBody(String),
    /// A 2xx GraphQL response without `data`
    MissingData {
        query_name: String,
        errors: Vec<String>,
    },
    /// `data` is present but does not have the expected shape
    UnexpectedShape { query_name: String, message: String },
}

impl TransportError {
    /// Convert a reqwest error into a transport failure, logging its category
    pub fn from_reqwest_error(query_name: &str, error: reqwest::Error) -> Self {
        tracing::debug!("Raw reqwest error for {}: {:?}", query_name, error);

        let category = if error.is_timeout() {
            "request timed out"
        } else if error.is_connect() {
            "connection failed"
        } else if error.is_body() || error.is_decode() {
            "failed to read response body"
        } else {
            "request failed"
        };

        let message = format!("{} for {}: {}", category, query_name, error);
        tracing::error!("HTTP layer error: {}", message);
        Self::Network(message)
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "Network error: {}", message),
            Self::Status { status, message } => {
                write!(f, "Server responded with code {}: {}", status, message)
            }
            Self::InvalidBody(message) => write!(f, "Invalid response body: {}", message),
            Self::MissingData { query_name, errors } => {
                if errors.is_empty() {
                    write!(f, "No data in GraphQL {} response", query_name)
                } else {
                    write!(
                        f,
                        "No data in GraphQL {} response: {}",
                        query_name,
                        errors.join(", ")
                    )
                }
            }
            Self::UnexpectedShape {
                query_name,
                message,
            } => write!(
                f,
                "Unexpected GraphQL {} response shape: {}",
                query_name, message
            ),
        }
    }
}

impl std::error::Error for TransportError {}
