//! Category extraction from leveled category paths.
//!
//! Malformed levels are dropped without an error: a bad key, an empty value,
//! or a path with too few segments simply produces no entry.

use std::collections::HashSet;
use std::sync::LazyLock;

use catalog_core::{HierarchicalCategories, PATH_SEPARATOR};
use regex::Regex;

use crate::types::CategoryNode;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+>\s+").expect("valid separator regex"));

/// One level of a record's category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCategory {
    pub level: u32,
    pub full_path: String,
    /// The segment at index `level` of `full_path`.
    pub name: String,
    /// The path stored one level up, `None` at level 0 or when that level is absent.
    pub parent: Option<String>,
}

/// Extracts categories ordered by ascending numeric level.
///
/// Only keys of the form `lvl<number>` are considered. When two keys parse to
/// the same level (`lvl1`, `lvl01`) the first in key order wins.
#[must_use]
pub fn extract_categories(hierarchy: &HierarchicalCategories) -> Vec<ExtractedCategory> {
    let mut levels: Vec<(u32, &str)> = hierarchy
        .entries()
        .filter_map(|(key, value)| {
            let level = parse_level_key(key)?;
            let path = value.as_str().filter(|p| !p.is_empty())?;
            Some((level, path))
        })
        .collect();

    // Stable sort keeps key order among duplicate levels for the dedup below.
    levels.sort_by_key(|(level, _)| *level);
    levels.dedup_by_key(|(level, _)| *level);

    levels
        .into_iter()
        .filter_map(|(level, path)| {
            let Some(name) = segment_at(path, level) else {
                tracing::debug!(level, path, "category path has too few segments, skipping");
                return None;
            };
            let parent = level
                .checked_sub(1)
                .and_then(|above| hierarchy.path_at(above))
                .map(str::to_owned);
            Some(ExtractedCategory {
                level,
                full_path: path.to_owned(),
                name: name.to_owned(),
                parent,
            })
        })
        .collect()
}

/// Builds index records for a batch of extracted categories.
///
/// A node is a leaf unless some node in the batch names its path as parent.
/// Nodes whose ID was already produced earlier in the batch are dropped.
#[must_use]
pub fn generate_category_records(categories: &[ExtractedCategory]) -> Vec<CategoryNode> {
    let mut seen = HashSet::new();

    categories
        .iter()
        .filter_map(|category| {
            let object_id = category_object_id(&category.full_path);
            if !seen.insert(object_id.clone()) {
                return None;
            }
            let is_parent = categories
                .iter()
                .any(|c| c.parent.as_deref() == Some(category.full_path.as_str()));
            Some(CategoryNode {
                object_id,
                name: category.name.clone(),
                path: category.full_path.clone(),
                level: category.level,
                is_leaf: !is_parent,
                parent: category.parent.clone(),
            })
        })
        .collect()
}

/// Derives the index object ID for a category path.
///
/// `"Women > Shoes"` becomes `"category-women-shoes"`. Only the `>` separator
/// and the whitespace around it are replaced; spaces inside a segment stay.
#[must_use]
pub fn category_object_id(path: &str) -> String {
    let slug = SEPARATOR_RE.replace_all(path, "-").to_lowercase();
    format!("category-{slug}")
}

fn parse_level_key(key: &str) -> Option<u32> {
    let digits = key.strip_prefix("lvl")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn segment_at(path: &str, level: u32) -> Option<&str> {
    let index = usize::try_from(level).ok()?;
    path.split(PATH_SEPARATOR)
        .nth(index)
        .filter(|segment| !segment.is_empty())
}
