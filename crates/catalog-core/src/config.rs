use std::env::VarError;
use std::str::FromStr;

use crate::app_config::{IndexConfig, RuntimeConfig, UpsertMode, VisionConfig};
use crate::ConfigError;

const DEFAULT_INDEX_NAME: &str = "ecommerce_transformed";
const DEFAULT_INDEX_ATTRIBUTES: &str = "author,title,content";
const DEFAULT_VISION_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";

/// Load search-index configuration, reading `.env` first.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_index_config() -> Result<IndexConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_index_config_from_env()
}

/// Load search-index configuration from the process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_index_config_from_env() -> Result<IndexConfig, ConfigError> {
    build_index_config(|key| std::env::var(key))
}

/// Load vision-model configuration, reading `.env` first.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_vision_config() -> Result<VisionConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_vision_config_from_env()
}

/// Load vision-model configuration from the process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_vision_config_from_env() -> Result<VisionConfig, ConfigError> {
    build_vision_config(|key| std::env::var(key))
}

/// Load runner configuration, reading `.env` first.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_runtime_config() -> Result<RuntimeConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_runtime_config_from_env()
}

/// Load runner configuration from the process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_runtime_config_from_env() -> Result<RuntimeConfig, ConfigError> {
    build_runtime_config(|key| std::env::var(key))
}

/// Typed accessors over an env-var lookup function.
///
/// Decoupled from the real environment so tests can pass a `HashMap` lookup.
struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    fn require(&self, var: &str) -> Result<String, ConfigError> {
        match (self.lookup)(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    }

    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).ok().filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        self.optional(var).unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.or_default(var, default);
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }
}

fn build_index_config<F>(lookup: F) -> Result<IndexConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = Env { lookup };

    let app_id = env.require("CATALOG_INDEX_APP_ID")?;
    let api_key = env.require("CATALOG_INDEX_API_KEY")?;
    let index_name = env.or_default("CATALOG_INDEX_NAME", DEFAULT_INDEX_NAME);
    let base_url = env
        .optional("CATALOG_INDEX_BASE_URL")
        .unwrap_or_else(|| format!("https://{app_id}.algolia.net"))
        .trim_end_matches('/')
        .to_string();
    let attributes_to_retrieve =
        parse_attribute_list(&env.or_default("CATALOG_INDEX_ATTRIBUTES", DEFAULT_INDEX_ATTRIBUTES));
    let upsert_mode: UpsertMode = env.parse("CATALOG_INDEX_UPSERT_MODE", "check-then-insert")?;
    let request_timeout_secs = parse_timeout(&env, "CATALOG_HTTP_TIMEOUT_SECS", "30")?;

    Ok(IndexConfig {
        app_id,
        api_key,
        index_name,
        base_url,
        attributes_to_retrieve,
        upsert_mode,
        request_timeout_secs,
    })
}

fn build_vision_config<F>(lookup: F) -> Result<VisionConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = Env { lookup };

    let api_key = env.require("OPENAI_API_KEY")?;
    let base_url = env
        .or_default("CATALOG_VISION_BASE_URL", DEFAULT_VISION_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    let model = env.or_default("CATALOG_VISION_MODEL", DEFAULT_VISION_MODEL);
    let max_tokens: u32 = env.parse("CATALOG_VISION_MAX_TOKENS", "200")?;
    let temperature = match env.optional("CATALOG_VISION_TEMPERATURE") {
        Some(_) => {
            let t: f32 = env.parse("CATALOG_VISION_TEMPERATURE", "")?;
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::InvalidEnvVar {
                    var: "CATALOG_VISION_TEMPERATURE".to_string(),
                    reason: format!("{t} is outside 0.0..=2.0"),
                });
            }
            Some(t)
        }
        None => None,
    };
    let request_timeout_secs = parse_timeout(&env, "CATALOG_HTTP_TIMEOUT_SECS", "30")?;

    Ok(VisionConfig {
        api_key,
        base_url,
        model,
        max_tokens,
        temperature,
        request_timeout_secs,
    })
}

fn build_runtime_config<F>(lookup: F) -> Result<RuntimeConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let env = Env { lookup };

    Ok(RuntimeConfig {
        log_level: env.or_default("CATALOG_LOG_LEVEL", "info"),
        record_timeout_secs: parse_timeout(&env, "CATALOG_RECORD_TIMEOUT_SECS", "120")?,
    })
}

/// Timeouts of zero would fail every request immediately.
fn parse_timeout<F>(env: &Env<F>, var: &str, default: &str) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let secs: u64 = env.parse(var, default)?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(secs)
}

fn parse_attribute_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
