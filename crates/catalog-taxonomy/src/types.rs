use serde::{Deserialize, Serialize};

/// A category entry as stored in the category index.
///
/// Built fresh for every record and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(rename = "objectID")]
    pub object_id: String,
    /// Last segment of `path`, e.g. `"Loafers"`.
    pub name: String,
    /// Full path, e.g. `"Women > Shoes > Loafers"`.
    pub path: String,
    pub level: u32,
    #[serde(rename = "isLeaf")]
    pub is_leaf: bool,
    /// Path of the level above, `None` at level 0.
    pub parent: Option<String>,
}

/// Body of the multi-index get-objects endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct GetObjectsRequest<'a> {
    pub requests: Vec<ObjectRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObjectRequest<'a> {
    #[serde(rename = "objectID")]
    pub object_id: &'a str,
    pub index_name: &'a str,
    pub attributes_to_retrieve: &'a [String],
}

/// Response of the get-objects endpoint. Missing objects come back as `null`.
#[derive(Debug, Deserialize)]
pub(crate) struct GetObjectsResponse {
    #[serde(default)]
    pub results: Vec<Option<serde_json::Value>>,
}

/// Acknowledgement returned by insert and replace calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteAck {
    #[serde(rename = "objectID", default)]
    pub object_id: Option<String>,
    #[serde(rename = "taskID", default)]
    pub task_id: Option<u64>,
    #[serde(rename = "createdAt", alias = "updatedAt", default)]
    pub timestamp: Option<String>,
}
