// src/bin/load_once.rs
//
// Load one source through the reactive loader and print what gets published.
//
//   TABLOAD_SOURCE=data/a.csv [TABLOAD_CONFIG=loader.yaml] cargo run --bin load_once

use anyhow::{bail, Context, Result};
use std::env;
use tabload::{
    telemetry, Component, LoadOutcome, Loader, LoaderConfig, PropertyBag, SourceDescriptor,
};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    telemetry::init();

    // ─── 2) configure ────────────────────────────────────────────────
    let source = env::var("TABLOAD_SOURCE").context("TABLOAD_SOURCE must be set")?;
    let cfg = match env::var("TABLOAD_CONFIG") {
        Ok(path) => LoaderConfig::load(&path)?,
        Err(_) => LoaderConfig::default(),
    };
    info!(?cfg, "config");

    // ─── 3) build loader around an in-process property bag ───────────
    let bag = PropertyBag::new();
    let (tx, mut reports) = mpsc::unbounded_channel();
    let mut loader = Loader::new(cfg.build_fetcher()?, cfg.build_parser()?, bag.clone())
        .with_key(cfg.value_key.clone())
        .with_reports(tx);

    // ─── 4) trigger and wait for the single attempt ──────────────────
    loader.initialize(&SourceDescriptor::enabled(source));
    match reports.recv().await {
        Some(LoadOutcome::Published { generation, rows }) => {
            info!(generation, rows, "loaded");
        }
        Some(LoadOutcome::Failed { error, .. }) => return Err(error.into()),
        Some(other) => bail!("unexpected outcome {:?}", other),
        None => bail!("loader dropped its report channel"),
    }

    let records = bag
        .get(&cfg.value_key)
        .context("published value missing from property bag")?;
    println!("{}", serde_json::to_string_pretty(&*records)?);
    Ok(())
}
