//! HTTP client for the category search index.
//!
//! Speaks the index's REST dialect: a multi-index get-objects endpoint for
//! lookups, `POST /1/indexes/{index}` for inserts, and
//! `PUT /1/indexes/{index}/{objectID}` for add-or-replace writes. Any non-2xx
//! response is surfaced as [`IndexError::Api`] with the raw body.

use std::time::Duration;

use catalog_core::IndexConfig;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::IndexError;
use crate::types::{CategoryNode, GetObjectsRequest, GetObjectsResponse, ObjectRequest, WriteAck};

const API_KEY_HEADER: &str = "X-Algolia-API-Key";
const APP_ID_HEADER: &str = "X-Algolia-Application-Id";

/// Client for the category search index.
///
/// Use [`IndexClient::new`] with a loaded [`IndexConfig`], or
/// [`IndexClient::with_base_url`] to point at a mock server in tests.
pub struct IndexClient {
    client: Client,
    app_id: String,
    api_key: String,
    base_url: Url,
}

impl IndexClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`IndexError::InvalidBaseUrl`] if `config.base_url` does not parse.
    pub fn new(config: &IndexConfig) -> Result<Self, IndexError> {
        Self::with_base_url(
            &config.app_id,
            &config.api_key,
            config.request_timeout_secs,
            &config.base_url,
        )
    }

    /// Creates a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`IndexError::InvalidBaseUrl`] if `base_url` does not parse or
    /// cannot carry a path.
    pub fn with_base_url(
        app_id: &str,
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, IndexError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("catalog-enrich/0.1 (category-sync)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| IndexError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(IndexError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            app_id: app_id.to_owned(),
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// Looks up a single object by ID through the multi-index get endpoint.
    ///
    /// Returns `Ok(None)` when the index reports no result for the ID.
    ///
    /// # Errors
    ///
    /// - [`IndexError::Api`] on a non-2xx response.
    /// - [`IndexError::Http`] on network failure or timeout.
    /// - [`IndexError::Deserialize`] if the response shape is unexpected.
    pub async fn find_object(
        &self,
        index_name: &str,
        object_id: &str,
        attributes_to_retrieve: &[String],
    ) -> Result<Option<serde_json::Value>, IndexError> {
        let url = self.build_url(&["1", "indexes", "*", "objects"]);
        let body = GetObjectsRequest {
            requests: vec![ObjectRequest {
                object_id,
                index_name,
                attributes_to_retrieve,
            }],
        };

        let response: GetObjectsResponse = self
            .send_json(Method::POST, url, &body, &format!("getObjects({object_id})"))
            .await?;

        Ok(response.results.into_iter().flatten().next())
    }

    /// Inserts a category node. The index assigns nothing: the node's own
    /// `objectID` is part of the body.
    ///
    /// # Errors
    ///
    /// - [`IndexError::Api`] on a non-2xx response.
    /// - [`IndexError::Http`] on network failure or timeout.
    /// - [`IndexError::Deserialize`] if the acknowledgement is not JSON.
    pub async fn add_object(
        &self,
        index_name: &str,
        node: &CategoryNode,
    ) -> Result<WriteAck, IndexError> {
        tracing::debug!(index = index_name, object_id = %node.object_id, "adding object to index");
        let url = self.build_url(&["1", "indexes", index_name]);
        self.send_json(
            Method::POST,
            url,
            node,
            &format!("addObject({})", node.object_id),
        )
        .await
    }

    /// Adds or replaces a category node by its ID in one idempotent call.
    ///
    /// # Errors
    ///
    /// - [`IndexError::Api`] on a non-2xx response.
    /// - [`IndexError::Http`] on network failure or timeout.
    /// - [`IndexError::Deserialize`] if the acknowledgement is not JSON.
    pub async fn replace_object(
        &self,
        index_name: &str,
        node: &CategoryNode,
    ) -> Result<WriteAck, IndexError> {
        tracing::debug!(index = index_name, object_id = %node.object_id, "replacing object in index");
        let url = self.build_url(&["1", "indexes", index_name, &node.object_id]);
        self.send_json(
            Method::PUT,
            url,
            node,
            &format!("replaceObject({})", node.object_id),
        )
        .await
    }

    /// Appends percent-encoded path segments to the base URL.
    fn build_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `with_base_url`; a base that cannot carry a path is rejected there.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a JSON body with the auth headers, asserts a 2xx status, and
    /// decodes the JSON response.
    async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        body: &B,
        context: &str,
    ) -> Result<T, IndexError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_ID_HEADER, &self.app_id)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(IndexError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| IndexError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
