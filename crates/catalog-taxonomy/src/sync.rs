//! Per-record taxonomy sync: extract categories and upsert them into the index.
//!
//! In [`UpsertMode::CheckThenInsert`] every node is looked up first and only
//! inserted when the lookup finds nothing or fails. The two calls are not
//! atomic, so two runs handling the same new category at the same time will
//! both insert it. [`UpsertMode::Replace`] avoids the race by writing with the
//! index's add-or-replace call, at the cost of overwriting existing entries.
//!
//! Index failures never abort the record: each one is logged and reported as
//! [`UpsertOutcome::Failed`].

use catalog_core::{HierarchicalCategories, IndexConfig, Record, UpsertMode};

use crate::client::IndexClient;
use crate::extract::{extract_categories, generate_category_records};
use crate::types::CategoryNode;

/// What happened to one category node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    AlreadyPresent,
    Replaced,
    Failed(String),
}

/// Result of syncing one record's categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One entry per generated node, in level order.
    pub outcomes: Vec<(String, UpsertOutcome)>,
}

impl SyncReport {
    #[must_use]
    pub fn count(&self, wanted: fn(&UpsertOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| wanted(o)).count()
    }

    #[must_use]
    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, UpsertOutcome::Inserted | UpsertOutcome::Replaced))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, UpsertOutcome::Failed(_)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Syncs the categories of one record into the configured index.
///
/// Records without `hierarchical_categories` are a no-op and yield an empty
/// report. The record itself is never modified.
pub async fn sync_record_categories(
    client: &IndexClient,
    config: &IndexConfig,
    record: &Record,
) -> SyncReport {
    let Some(hierarchy) = HierarchicalCategories::from_record(record) else {
        tracing::debug!("record has no hierarchical_categories, skipping");
        return SyncReport::default();
    };

    let categories = extract_categories(&hierarchy);
    let nodes = generate_category_records(&categories);
    tracing::debug!(count = nodes.len(), "extracted category nodes");

    let mut report = SyncReport::default();
    for node in &nodes {
        let outcome = upsert_category(client, config, node).await;
        report.outcomes.push((node.object_id.clone(), outcome));
    }
    report
}

/// Writes a single node according to `config.upsert_mode`.
pub async fn upsert_category(
    client: &IndexClient,
    config: &IndexConfig,
    node: &CategoryNode,
) -> UpsertOutcome {
    match config.upsert_mode {
        UpsertMode::CheckThenInsert => check_then_insert(client, config, node).await,
        UpsertMode::Replace => match client.replace_object(&config.index_name, node).await {
            Ok(_) => UpsertOutcome::Replaced,
            Err(e) => {
                tracing::error!(object_id = %node.object_id, error = %e, "category replace failed");
                UpsertOutcome::Failed(e.to_string())
            }
        },
    }
}

async fn check_then_insert(
    client: &IndexClient,
    config: &IndexConfig,
    node: &CategoryNode,
) -> UpsertOutcome {
    let lookup = client
        .find_object(
            &config.index_name,
            &node.object_id,
            &config.attributes_to_retrieve,
        )
        .await;

    match lookup {
        Ok(Some(_)) => {
            tracing::debug!(object_id = %node.object_id, "category already in index");
            return UpsertOutcome::AlreadyPresent;
        }
        Ok(None) => {
            tracing::info!(object_id = %node.object_id, "category not found, adding to index");
        }
        Err(e) => {
            tracing::warn!(
                object_id = %node.object_id,
                error = %e,
                "category lookup failed, adding to index anyway"
            );
        }
    }

    match client.add_object(&config.index_name, node).await {
        Ok(_) => UpsertOutcome::Inserted,
        Err(e) => {
            tracing::error!(object_id = %node.object_id, error = %e, "category insert failed");
            UpsertOutcome::Failed(e.to_string())
        }
    }
}
