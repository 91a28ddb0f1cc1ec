use thiserror::Error;

/// Errors returned by the search-index client.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The index answered with a non-2xx status. `body` is the raw response.
    #[error("search index API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid index base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
