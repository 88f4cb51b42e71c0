//! Configuration loading with CLI overrides

use crate::Cli;
use std::path::Path;
use tracing::info;
use triage_classifiers::TriageConfig;

/// Load configuration from file and CLI overrides
pub fn load(config_path: &Path, cli: &Cli) -> anyhow::Result<TriageConfig> {
    // Try to load from file, or use defaults
    let mut config = if config_path.exists() {
        info!("Loading configuration from {}", config_path.display());
        TriageConfig::from_file(config_path)?
    } else {
        TriageConfig::default()
    };

    // Apply CLI overrides
    if let Some(threshold) = cli.threshold {
        config.spam.threshold = threshold;
    }

    if let Some(model_path) = &cli.model_path {
        config.embedding.model_path = Some(model_path.clone());
    }

    if let Some(workers) = cli.workers {
        config.orchestrator.worker_pool_size = workers;
    }

    if let Some(timeout_secs) = cli.timeout_secs {
        config.orchestrator.unit_timeout_secs = timeout_secs;
    }

    config.validate()?;
    Ok(config)
}
