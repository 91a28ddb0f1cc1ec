use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcoError {
    /// Network, TLS, or timeout failure talking to the vision model.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vision API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("vision API response had no message content")]
    EmptyResponse,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model's reply is not valid JSON once code fences are stripped.
    #[error("model reply is not valid JSON: {source}")]
    Parse {
        payload: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model reply is not a JSON object")]
    NotAnObject,

    /// The reply parsed but lacks a field the scorer needs.
    #[error("model reply is missing eco attributes: {0}")]
    Attributes(#[source] serde_json::Error),

    #[error("record has no usable image_urls[0]")]
    MissingImage,

    #[error("record is not a JSON object")]
    InvalidRecord,

    #[error("invalid vision base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl EcoError {
    /// `true` for failures reaching or talking to the model endpoint, as
    /// opposed to failures interpreting what it said.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EcoError::Http(_) | EcoError::Api { .. } | EcoError::EmptyResponse
        )
    }
}
