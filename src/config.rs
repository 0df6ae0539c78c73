//! Configuration management for the fraud scoring pipeline

use crate::rules::RuleWeights;
use crate::types::score::SeverityThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming transactions
    pub transaction_subject: String,
    /// Subject for outgoing fraud alerts
    pub alert_subject: String,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the feature-scaler parameter file (JSON)
    pub scaler_path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Scoring configuration: the rule weight table and severity tiers.
///
/// Defaults reproduce the production tuning; the fraud verdict cutoff itself
/// is fixed at 0.5 and is deliberately not configurable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: RuleWeights,
    #[serde(default)]
    pub severity: SeverityThresholds,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrent scoring workers
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                transaction_subject: "upi.transactions".to_string(),
                alert_subject: "upi.fraud.alerts".to_string(),
            },
            model: ModelConfig {
                model_path: "models/fraud_cnn.onnx".to_string(),
                scaler_path: "models/scaler_params.json".to_string(),
                onnx_threads: 1,
            },
            scoring: ScoringConfig::default(),
            pipeline: PipelineConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.pipeline.workers, 4);
        assert_eq!(config.model.onnx_threads, 1);
    }

    #[test]
    fn test_default_scoring_weights_match_rule_table() {
        let config = AppConfig::default();

        assert_eq!(config.scoring.weights.extreme_amount, 0.5);
        assert_eq!(config.scoring.weights.high_amount, 0.3);
        assert_eq!(config.scoring.weights.missing_context, 0.35);
        assert_eq!(config.scoring.weights.self_transfer, 0.6);
        assert_eq!(config.scoring.severity.critical, 0.9);
        assert_eq!(config.scoring.severity.high, 0.5);
        assert_eq!(config.scoring.severity.medium, 0.3);
    }
}
