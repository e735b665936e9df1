use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// Connection-level failure (DNS, refused connection, TLS, broken body).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A catalog item lacks a field the output record cannot do without.
    #[error("catalog item is missing mandatory field `{field}`")]
    MissingField { field: &'static str },
}
