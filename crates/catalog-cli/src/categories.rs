//! `catalog categories`: sync record taxonomies into the search index.

use std::path::Path;
use std::time::Duration;

use catalog_core::{IndexConfig, RuntimeConfig};
use catalog_taxonomy::{sync_record_categories, IndexClient, SyncReport, UpsertOutcome};
use tokio::io::AsyncRead;

use crate::jsonl::RecordReader;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CategoryTotals {
    pub(crate) records: usize,
    pub(crate) nodes: usize,
    pub(crate) inserted: usize,
    pub(crate) already_present: usize,
    pub(crate) replaced: usize,
    pub(crate) failed: usize,
    pub(crate) timed_out: usize,
}

impl CategoryTotals {
    fn absorb(&mut self, report: &SyncReport) {
        self.nodes += report.outcomes.len();
        self.inserted += report.count(|o| matches!(o, UpsertOutcome::Inserted));
        self.already_present += report.count(|o| matches!(o, UpsertOutcome::AlreadyPresent));
        self.replaced += report.count(|o| matches!(o, UpsertOutcome::Replaced));
        self.failed += report.failed();
    }
}

/// Runs the category sync over every record in `input`.
pub(crate) async fn run_categories(
    runtime: &RuntimeConfig,
    config: &IndexConfig,
    input: Option<&Path>,
) -> anyhow::Result<CategoryTotals> {
    let client = IndexClient::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build index client: {e}"))?;
    tracing::info!(
        index = %config.index_name,
        mode = %config.upsert_mode,
        "syncing record categories"
    );

    let mut reader = RecordReader::open(input).await?;
    let deadline = Duration::from_secs(runtime.record_timeout_secs);
    let totals = sync_records(&client, config, deadline, &mut reader).await?;

    tracing::info!(
        records = totals.records,
        nodes = totals.nodes,
        inserted = totals.inserted,
        already_present = totals.already_present,
        replaced = totals.replaced,
        failed = totals.failed,
        timed_out = totals.timed_out,
        "category sync complete"
    );
    Ok(totals)
}

/// Syncs each record in turn.
///
/// Per-node write failures are counted but never abort the run. A record that
/// exceeds `deadline` is abandoned and counted as timed out.
pub(crate) async fn sync_records<R: AsyncRead + Unpin>(
    client: &IndexClient,
    config: &IndexConfig,
    deadline: Duration,
    reader: &mut RecordReader<R>,
) -> anyhow::Result<CategoryTotals> {
    let mut totals = CategoryTotals::default();

    while let Some((line, record)) = reader.next_record().await? {
        totals.records += 1;
        match tokio::time::timeout(deadline, sync_record_categories(client, config, &record)).await
        {
            Ok(report) => {
                if report.failed() > 0 {
                    tracing::warn!(line, failed = report.failed(), "some categories were not written");
                }
                totals.absorb(&report);
            }
            Err(_) => {
                tracing::error!(
                    line,
                    timeout_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                    "category sync timed out, skipping record"
                );
                totals.timed_out += 1;
            }
        }
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use catalog_core::UpsertMode;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn report(outcomes: Vec<UpsertOutcome>) -> SyncReport {
        SyncReport {
            outcomes: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, o)| (format!("category-{i}"), o))
                .collect(),
        }
    }

    fn index_config(base_url: &str) -> IndexConfig {
        IndexConfig {
            app_id: "APPID".to_owned(),
            api_key: "index-key".to_owned(),
            index_name: "categories_test".to_owned(),
            base_url: base_url.to_owned(),
            attributes_to_retrieve: vec!["title".to_owned()],
            upsert_mode: UpsertMode::CheckThenInsert,
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn absorb_tallies_each_outcome_kind() {
        let mut totals = CategoryTotals::default();
        totals.absorb(&report(vec![
            UpsertOutcome::Inserted,
            UpsertOutcome::AlreadyPresent,
            UpsertOutcome::Failed("403".to_owned()),
        ]));
        totals.absorb(&report(vec![UpsertOutcome::Replaced, UpsertOutcome::Inserted]));

        assert_eq!(
            totals,
            CategoryTotals {
                records: 0,
                nodes: 5,
                inserted: 2,
                already_present: 1,
                replaced: 1,
                failed: 1,
                timed_out: 0,
            }
        );
    }

    #[test]
    fn absorb_empty_report_changes_nothing() {
        let mut totals = CategoryTotals::default();
        totals.absorb(&SyncReport::default());
        assert_eq!(totals, CategoryTotals::default());
    }

    #[tokio::test]
    async fn sync_records_totals_add_up_across_records() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/indexes/*/objects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [null] })))
            .expect(3)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1/indexes/categories_test"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "taskID": 7 })))
            .expect(3)
            .mount(&server)
            .await;

        let config = index_config(&server.uri());
        let client = IndexClient::new(&config).unwrap();
        let input = concat!(
            r#"{"objectID":"a","hierarchical_categories":{"lvl0":"Women","lvl1":"Women > Shoes"}}"#,
            "\n",
            "not json\n",
            r#"{"objectID":"b","hierarchical_categories":{"lvl0":"Men"}}"#,
            "\n",
            r#"{"objectID":"c"}"#,
            "\n",
        );
        let mut reader = RecordReader::new(input.as_bytes());

        let totals = sync_records(&client, &config, Duration::from_secs(5), &mut reader)
            .await
            .unwrap();

        assert_eq!(
            totals,
            CategoryTotals {
                records: 3,
                nodes: 3,
                inserted: 3,
                ..CategoryTotals::default()
            }
        );
    }

    #[tokio::test]
    async fn sync_records_failed_writes_do_not_stop_the_run() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/indexes/*/objects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [null] })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/1/indexes/categories_test"))
            .respond_with(ResponseTemplate::new(403).set_body_string("invalid API key"))
            .mount(&server)
            .await;

        let config = index_config(&server.uri());
        let client = IndexClient::new(&config).unwrap();
        let input = concat!(
            r#"{"hierarchical_categories":{"lvl0":"Women"}}"#,
            "\n",
            r#"{"hierarchical_categories":{"lvl0":"Men"}}"#,
            "\n",
        );
        let mut reader = RecordReader::new(input.as_bytes());

        let totals = sync_records(&client, &config, Duration::from_secs(5), &mut reader)
            .await
            .unwrap();

        assert_eq!(totals.records, 2);
        assert_eq!(totals.failed, 2);
        assert_eq!(totals.inserted, 0);
    }

    #[tokio::test]
    async fn sync_records_abandons_slow_record_and_continues() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/indexes/*/objects"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "results": [null] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = index_config(&server.uri());
        let client = IndexClient::new(&config).unwrap();
        let input = concat!(
            r#"{"hierarchical_categories":{"lvl0":"Women"}}"#,
            "\n",
            r#"{"objectID":"no-categories"}"#,
            "\n",
        );
        let mut reader = RecordReader::new(input.as_bytes());

        let totals = sync_records(&client, &config, Duration::from_millis(200), &mut reader)
            .await
            .unwrap();

        assert_eq!(totals.records, 2, "run continues after the timeout");
        assert_eq!(totals.timed_out, 1);
        assert_eq!(totals.nodes, 0);
    }
}
