//! `catalog score`: offline eco scoring of one attributes object.

use std::path::Path;

use anyhow::Context;
use catalog_eco::{parse_model_json, score_breakdown, EcoAttributes, EcoBreakdown};
use tokio::io::AsyncReadExt;

pub(crate) async fn run_score(input: Option<&Path>) -> anyhow::Result<()> {
    let text = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            buf
        }
    };

    let breakdown = breakdown_from_text(&text)?;
    println!("{}", serde_json::to_string_pretty(&breakdown)?);
    Ok(())
}

/// Accepts raw model output, fenced or not.
fn breakdown_from_text(text: &str) -> anyhow::Result<EcoBreakdown> {
    let value = parse_model_json(text)?;
    let attrs: EcoAttributes =
        serde_json::from_value(value).context("input is not a valid eco attributes object")?;
    Ok(score_breakdown(&attrs))
}
