//! Category taxonomy sync for catalog records.
//!
//! Turns a record's leveled `hierarchical_categories` into category nodes with
//! parent and leaf metadata, then upserts them into a search index over HTTP.

pub mod client;
pub mod error;
pub mod extract;
pub mod sync;
pub mod types;

pub use client::IndexClient;
pub use error::IndexError;
pub use extract::{
    category_object_id, extract_categories, generate_category_records, ExtractedCategory,
};
pub use sync::{sync_record_categories, upsert_category, SyncReport, UpsertOutcome};
pub use types::{CategoryNode, WriteAck};
