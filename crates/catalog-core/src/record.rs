//! The record contract shared by both transforms.
//!
//! Records arrive as arbitrary JSON objects. Only a handful of optional
//! fields are recognised; everything else passes through untouched.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// A pipeline record. Any JSON value is accepted; transforms that need to
/// attach fields require an object.
pub type Record = Value;

/// Separator between segments of a category path.
pub const PATH_SEPARATOR: &str = " > ";

/// Leveled category paths, e.g. `lvl1 -> "Women > Shoes"`.
///
/// Values are kept as raw JSON so malformed entries can be skipped silently
/// by consumers instead of rejecting the whole record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchicalCategories {
    levels: BTreeMap<String, Value>,
}

impl HierarchicalCategories {
    /// Reads `hierarchical_categories` from a record.
    ///
    /// Returns `None` when the field is absent, null, or not an object.
    #[must_use]
    pub fn from_record(record: &Record) -> Option<Self> {
        let map = record.get("hierarchical_categories")?.as_object()?;
        Some(Self {
            levels: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        })
    }

    /// Iterates raw `(key, value)` entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.levels.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the non-empty path stored under `lvl{level}`, if any.
    #[must_use]
    pub fn path_at(&self, level: u32) -> Option<&str> {
        self.levels
            .get(&format!("lvl{level}"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for HierarchicalCategories
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            levels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        }
    }
}

/// Product metadata handed to the vision model alongside the image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductMetadata {
    pub name: Option<Value>,
    pub brand: Option<Value>,
    /// `price.value` from the record.
    pub price: Option<Value>,
    /// `color.original_name` from the record.
    pub color: Option<Value>,
    pub gender: Option<Value>,
    /// `available_sizes` from the record.
    pub sizes: Option<Value>,
    /// The level-2 category path, when present and non-empty.
    pub category: Option<Value>,
}

impl ProductMetadata {
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let field = |key: &str| record.get(key).cloned();
        let nested = |outer: &str, inner: &str| {
            record
                .get(outer)
                .and_then(|o| o.get(inner))
                .cloned()
        };

        Self {
            name: field("name"),
            brand: field("brand"),
            price: nested("price", "value"),
            color: nested("color", "original_name"),
            gender: field("gender"),
            sizes: field("available_sizes"),
            category: nested("hierarchical_categories", "lvl2").filter(is_truthy),
        }
    }

    /// Renders the metadata as a JSON object. Absent fields are omitted;
    /// `category` is always present, `null` when unknown.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        let fields = [
            ("name", &self.name),
            ("brand", &self.brand),
            ("price", &self.price),
            ("color", &self.color),
            ("gender", &self.gender),
            ("sizes", &self.sizes),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                map.insert(key.to_string(), v.clone());
            }
        }
        map.insert(
            "category".to_string(),
            self.category.clone().unwrap_or(Value::Null),
        );
        Value::Object(map)
    }
}

/// Returns the first entry of `image_urls`, if it is a non-empty string.
#[must_use]
pub fn first_image_url(record: &Record) -> Option<&str> {
    record
        .get("image_urls")
        .and_then(|urls| urls.get(0))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}
