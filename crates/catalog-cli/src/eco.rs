//! `catalog eco`: enrich records with eco details.

use std::path::Path;
use std::time::Duration;

use catalog_core::{RuntimeConfig, VisionConfig};
use catalog_eco::{enrich_record, VisionClient};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::jsonl::{RecordReader, RecordWriter};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EcoTotals {
    pub(crate) enriched: usize,
    pub(crate) failed: usize,
    pub(crate) timed_out: usize,
}

/// Enriches every record in `input` and writes the successes to `output`.
pub(crate) async fn run_eco(
    runtime: &RuntimeConfig,
    config: &VisionConfig,
    input: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<EcoTotals> {
    let client = VisionClient::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build vision client: {e}"))?;
    tracing::info!(model = %config.model, "enriching records with eco scores");

    let mut reader = RecordReader::open(input).await?;
    let mut writer = RecordWriter::create(output).await?;
    let deadline = Duration::from_secs(runtime.record_timeout_secs);

    let totals = enrich_records(&client, deadline, &mut reader, &mut writer).await?;
    writer.finish().await?;

    tracing::info!(
        enriched = totals.enriched,
        failed = totals.failed,
        timed_out = totals.timed_out,
        "eco enrichment complete"
    );
    Ok(totals)
}

/// Enriches each record in turn, writing only the ones that succeed.
///
/// Records that fail enrichment or exceed `deadline` are logged and left out
/// of the output; the run carries on with the next record.
pub(crate) async fn enrich_records<R, W>(
    client: &VisionClient,
    deadline: Duration,
    reader: &mut RecordReader<R>,
    writer: &mut RecordWriter<W>,
) -> anyhow::Result<EcoTotals>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut totals = EcoTotals::default();

    while let Some((line, record)) = reader.next_record().await? {
        match tokio::time::timeout(deadline, enrich_record(client, record)).await {
            Ok(Ok(record)) => {
                writer.write_record(&record).await?;
                totals.enriched += 1;
            }
            Ok(Err(e)) => {
                tracing::error!(
                    line,
                    transport = e.is_transport(),
                    error = %e,
                    "eco enrichment failed, record omitted"
                );
                totals.failed += 1;
            }
            Err(_) => {
                tracing::error!(line, "eco enrichment timed out, record omitted");
                totals.timed_out += 1;
            }
        }
    }

    Ok(totals)
}
