//! Eco-score enrichment for catalog records.
//!
//! Prompts a vision-capable language model with a product image and its
//! metadata, parses the structured sustainability attributes it returns, and
//! aggregates them into a bounded `eco_score` attached to the record.

pub mod client;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod scorer;
pub mod types;

pub use client::VisionClient;
pub use error::EcoError;
pub use pipeline::{attach_eco_score, enrich_record};
pub use prompt::build_prompt;
pub use response::{parse_model_json, strip_code_fence};
pub use scorer::{compute_eco_score, score_breakdown, PRIOR_MEAN};
pub use types::{EcoAttributes, EcoBreakdown, EcoImpact, WearLifecycle};
