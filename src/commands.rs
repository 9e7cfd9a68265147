use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cache::ChunkCache;
use crate::config::{Config, get_config_dir};
use crate::embeddings::OllamaClient;
use crate::extract::PlainTextExtractor;
use crate::pipeline::{Pipeline, RetryPolicy};
use crate::segment::RuleSegmenter;

fn load_config() -> Result<Config> {
    let config_dir = get_config_dir().context("Failed to resolve config directory")?;
    Config::load(&config_dir)
}

/// Chunk a batch of document files and print per-document and batch
/// summaries.
pub async fn process_documents(paths: Vec<String>) -> Result<()> {
    let config = load_config()?;
    // Invalid configuration is fatal before any document is touched
    config
        .validate()
        .context("Configuration validation failed")?;

    let client = OllamaClient::new(&config.ollama)?;
    // So is an unreachable embedding endpoint
    client
        .health_check()
        .context("Embedding endpoint health check failed")?;

    let cache = ChunkCache::new(config.cache_database_path())
        .await
        .context("Failed to open chunk cache")?;

    let pipeline = Pipeline::new(
        Arc::new(PlainTextExtractor::new()),
        Arc::new(RuleSegmenter::new()),
        Arc::new(client),
        cache,
        config.chunking.clone(),
        RetryPolicy::from_config(&config.retry),
    );

    info!("Processing {} documents", paths.len());

    let progress = ProgressBar::new(paths.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .context("Failed to build progress style")?,
    );

    let batch_started = std::time::Instant::now();
    let mut reports = Vec::with_capacity(paths.len());

    for path in &paths {
        progress.set_message(path.clone());
        reports.push(pipeline.process_document(path).await);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let elapsed = batch_started.elapsed().as_secs_f64();
    let total_chunks: usize = reports.iter().map(|r| r.chunks.len()).sum();
    let failed = reports
        .iter()
        .filter(|r| r.status == crate::pipeline::DocumentStatus::Failed)
        .count();

    for report in &reports {
        println!(
            "{}: {} ({} chunks, {:.2}s)",
            report.name,
            report.status,
            report.chunks.len(),
            report.elapsed_seconds
        );
    }

    println!();
    println!(
        "Batch: {} documents, {} chunks, {} failed, {:.2}s",
        reports.len(),
        total_chunks,
        failed,
        elapsed
    );

    if failed > 0 {
        anyhow::bail!("{failed} of {} documents failed", reports.len());
    }

    Ok(())
}

/// Wipe the chunk cache, forcing full recomputation on the next batch.
pub async fn clear_cache() -> Result<()> {
    let config = load_config()?;
    let cache = ChunkCache::new(config.cache_database_path())
        .await
        .context("Failed to open chunk cache")?;

    let cleared = cache.clear_all().await?;
    println!("Cleared {cleared} cache entries");

    Ok(())
}

/// Print the active configuration as TOML.
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    let rendered =
        toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
    println!("{rendered}");
    Ok(())
}

/// Write the default configuration file if none exists yet.
pub fn init_config() -> Result<()> {
    let config = load_config()?;
    config.save()?;
    println!(
        "Wrote configuration to {}",
        config.base_dir.join("config.toml").display()
    );
    Ok(())
}
