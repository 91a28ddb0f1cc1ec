//! Shared record contract and configuration for the catalog enrichment
//! transforms.

pub mod app_config;
pub mod config;
pub mod record;

use thiserror::Error;

pub use app_config::{IndexConfig, RuntimeConfig, UpsertMode, VisionConfig};
pub use config::{
    load_index_config, load_index_config_from_env, load_runtime_config,
    load_runtime_config_from_env, load_vision_config, load_vision_config_from_env,
};
pub use record::{first_image_url, HierarchicalCategories, ProductMetadata, Record, PATH_SEPARATOR};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
