//! Comment Triage
//!
//! Reads a batch of comments, one per line, and sorts them into positive,
//! negative, neutral and spam buckets.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::path::PathBuf;
use tracing::info;
use triage_classifiers::TriageEngine;

mod config;
mod input;
mod report;

#[derive(Parser, Debug)]
#[command(name = "comment-triage")]
#[command(about = "Triage user comments into positive, negative, neutral and spam", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "triage.yaml")]
    config: PathBuf,

    /// File with one comment per line (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Spam similarity threshold
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Persisted embedding model path
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// Worker pool size
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-comment timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print collected metrics to stderr after the run
    #[arg(long)]
    metrics: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_format);

    run_detached(run(cli))?
}

/// Drive `future` to completion on a fresh runtime, then shut the runtime
/// down without waiting for blocking work still in flight.
///
/// Units abandoned after a timeout keep running on blocking threads; the
/// process must not wait for them once the report is printed.
fn run_detached<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load(&cli.config, &cli)?;
    info!(
        threshold = config.spam.threshold,
        workers = config.orchestrator.worker_pool_size,
        unit_timeout_secs = config.orchestrator.unit_timeout_secs,
        "Configuration loaded"
    );

    let metrics_handle = if cli.metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    let engine = TriageEngine::from_config(&config).context("Failed to initialize triage engine")?;

    let comments = input::read_comments(cli.input.as_deref())?;
    info!("Read {} comments", comments.len());

    let batch = engine.triage(&comments).await;

    let rendered = match cli.output {
        OutputFormat::Json => report::render_json(&batch)?,
        OutputFormat::Text => report::render_text(&batch),
    };
    println!("{}", rendered);

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }

    Ok(())
}

/// Initialize tracing/logging. Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("comment_triage=debug,triage_classifiers=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("comment_triage=info,triage_classifiers=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Install the metrics recorder and return a handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "comment_triage_units_total",
        "Classification units by outcome (completed, timed_out, failed)"
    );
    metrics::describe_counter!(
        "comment_triage_comments_total",
        "Triaged comments by category"
    );
    metrics::describe_histogram!(
        "comment_triage_batch_latency_us",
        metrics::Unit::Microseconds,
        "Batch triage latency in microseconds"
    );
    metrics::describe_counter!(
        "comment_triage_spam_fallback_total",
        "Spam checks answered by the keyword fallback"
    );

    info!("Metrics recorder initialized");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_run_detached_does_not_wait_for_abandoned_work() {
        let start = Instant::now();

        let output = run_detached(async {
            let slow = tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(3)));
            tokio::time::timeout(Duration::from_millis(20), slow)
                .await
                .is_err()
        })
        .unwrap();

        assert!(output, "the blocking task should have timed out");
        assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());
    }
}
