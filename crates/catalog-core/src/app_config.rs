use std::str::FromStr;

/// How category nodes are written to the search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpsertMode {
    /// Look the object up by ID and insert it only when the lookup finds
    /// nothing. Not atomic: two concurrent runs can both insert.
    #[default]
    CheckThenInsert,
    /// Use the index's add-or-replace by ID and skip the lookup entirely.
    Replace,
}

impl std::fmt::Display for UpsertMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsertMode::CheckThenInsert => write!(f, "check-then-insert"),
            UpsertMode::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for UpsertMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check-then-insert" | "check_then_insert" => Ok(UpsertMode::CheckThenInsert),
            "replace" => Ok(UpsertMode::Replace),
            other => Err(format!(
                "unknown upsert mode '{other}' (expected 'check-then-insert' or 'replace')"
            )),
        }
    }
}

/// Connection and write settings for the category search index.
#[derive(Clone)]
pub struct IndexConfig {
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
    /// Root URL of the index API, without a trailing slash.
    pub base_url: String,
    pub attributes_to_retrieve: Vec<String>,
    pub upsert_mode: UpsertMode,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for IndexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexConfig")
            .field("app_id", &self.app_id)
            .field("api_key", &"[redacted]")
            .field("index_name", &self.index_name)
            .field("base_url", &self.base_url)
            .field("attributes_to_retrieve", &self.attributes_to_retrieve)
            .field("upsert_mode", &self.upsert_mode)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Settings for the vision-capable chat-completions endpoint.
#[derive(Clone)]
pub struct VisionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Sampling temperature; left out of the request when unset.
    pub temperature: Option<f32>,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Process-level settings for the command line runner.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    /// Upper bound on the time spent transforming a single record.
    pub record_timeout_secs: u64,
}
