//! Per-record eco enrichment.

use catalog_core::record::first_image_url;
use catalog_core::{ProductMetadata, Record};
use serde::Deserialize;
use serde_json::Value;

use crate::client::VisionClient;
use crate::error::EcoError;
use crate::prompt::build_prompt;
use crate::response::parse_model_json;
use crate::scorer::compute_eco_score;
use crate::types::EcoAttributes;

/// Enriches one record with model-inferred `eco_details`.
///
/// 1. Build the prompt from the record's metadata.
/// 2. Ask the vision model about `image_urls[0]` (one call, no retry).
/// 3. Strip code fences and parse the reply as JSON.
/// 4. Score the attributes and attach the reply as `eco_details`, with
///    `eco_details.eco_score` added.
///
/// Fields the model returns beyond those the scorer reads are kept as-is.
///
/// # Errors
///
/// Any error aborts this record's enrichment and leaves nothing attached:
/// - [`EcoError::InvalidRecord`] if the record is not a JSON object.
/// - [`EcoError::MissingImage`] if there is no usable first image URL.
/// - transport failures from [`VisionClient::ask`].
/// - [`EcoError::Parse`], [`EcoError::NotAnObject`], or
///   [`EcoError::Attributes`] if the reply cannot be interpreted.
pub async fn enrich_record(client: &VisionClient, mut record: Record) -> Result<Record, EcoError> {
    if !record.is_object() {
        return Err(EcoError::InvalidRecord);
    }
    let image_url = first_image_url(&record)
        .ok_or(EcoError::MissingImage)?
        .to_owned();

    let prompt = build_prompt(&ProductMetadata::from_record(&record));
    let reply = client.ask(&prompt, &image_url).await.inspect_err(|e| {
        tracing::error!(image_url = %image_url, error = %e, "vision model call failed");
    })?;

    let details = attach_eco_score(parse_model_json(&reply)?)?;
    tracing::debug!(eco_score = %details["eco_score"], "record enriched");

    if let Some(fields) = record.as_object_mut() {
        fields.insert("eco_details".to_owned(), details);
    }
    Ok(record)
}

/// Scores parsed model output and returns it with `eco_score` added.
///
/// # Errors
///
/// Returns [`EcoError::NotAnObject`] if `details` is not an object, or
/// [`EcoError::Attributes`] if required numeric fields are missing or mistyped.
pub fn attach_eco_score(mut details: Value) -> Result<Value, EcoError> {
    if !details.is_object() {
        return Err(EcoError::NotAnObject);
    }
    let attrs = EcoAttributes::deserialize(&details).map_err(EcoError::Attributes)?;
    let score = compute_eco_score(&attrs);

    if let Some(fields) = details.as_object_mut() {
        fields.insert("eco_score".to_owned(), Value::from(score));
    }
    Ok(details)
}
