//! UPI Fraud Scoring Engine
//!
//! Assigns a fraud risk score to a single UPI transfer at creation time:
//! feature extraction, dual-path scoring (trained CNN via ONNX when the
//! model artifacts are present, a weighted rule table otherwise) and the
//! mapping from probability to verdict and alert severity.

pub mod config;
pub mod consumer;
pub mod detector;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod rules;
pub mod types;

pub use config::AppConfig;
pub use consumer::TransactionConsumer;
pub use detector::{DetectionPath, FraudDetector};
pub use error::EngineError;
pub use feature_extractor::FeatureExtractor;
pub use models::ModelHandle;
pub use producer::AlertProducer;
pub use rules::RuleScorer;
pub use types::{FraudAlert, ScoreResult, Transaction};
