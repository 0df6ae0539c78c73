//! Top-level fraud detection: path dispatch, scoring and decision mapping.

use crate::config::{AppConfig, ScoringConfig};
use crate::feature_extractor::FeatureExtractor;
use crate::models::{InferenceBackend, ModelHandle};
use crate::rules::RuleScorer;
use crate::types::score::{DetectionMethod, ScoreResult, SeverityThresholds};
use crate::types::transaction::Transaction;
use tracing::{debug, warn};

/// Which scoring path this process runs.
///
/// Resolved once at construction: either the learned model is present, or
/// every call is rule-based for the lifetime of the process. There is no
/// retry and no hot-reload.
pub enum DetectionPath {
    Model(Box<dyn InferenceBackend>),
    Rules,
}

/// The fraud scoring engine.
///
/// `predict` is synchronous, reentrant and side-effect-free; the only shared
/// state is the immutable model handle, so a single detector can be called
/// concurrently from any number of tasks.
pub struct FraudDetector {
    path: DetectionPath,
    extractor: FeatureExtractor,
    rules: RuleScorer,
    severity: SeverityThresholds,
}

impl FraudDetector {
    /// Build a detector from configuration, loading the model artifacts if
    /// they exist.
    pub fn new(config: &AppConfig) -> Self {
        let path = match ModelHandle::load(&config.model) {
            Some(handle) => DetectionPath::Model(Box::new(handle)),
            None => DetectionPath::Rules,
        };

        Self::with_path(path, &config.scoring)
    }

    /// Build a rule-path-only detector.
    pub fn rule_based(scoring: &ScoringConfig) -> Self {
        Self::with_path(DetectionPath::Rules, scoring)
    }

    /// Build a detector on an explicit path. This is the seam tests use to
    /// inject stub inference backends.
    pub fn with_path(path: DetectionPath, scoring: &ScoringConfig) -> Self {
        Self {
            path,
            extractor: FeatureExtractor::new(),
            rules: RuleScorer::new(&scoring.weights),
            severity: scoring.severity.clone(),
        }
    }

    /// Whether a learned model is loaded.
    pub fn has_model(&self) -> bool {
        matches!(self.path, DetectionPath::Model(_))
    }

    /// Wire name of the resolved path, for startup logging and status.
    pub fn detection_path_name(&self) -> &'static str {
        match self.path {
            DetectionPath::Model(_) => "cnn_model",
            DetectionPath::Rules => "rule_based",
        }
    }

    /// Score one transaction and decide the verdict.
    ///
    /// Model path when a model is loaded, with per-call degradation to the
    /// rule path if inference fails; rule path otherwise. Never panics and
    /// never returns an error: every valid transaction gets a `ScoreResult`.
    pub fn predict(&self, tx: &Transaction) -> ScoreResult {
        match &self.path {
            DetectionPath::Model(backend) => {
                let features = self.extractor.extract(tx);
                match backend.infer(&features) {
                    Ok(probability) => {
                        debug!(
                            transaction_id = %tx.transaction_id,
                            probability,
                            "Scored via model"
                        );
                        ScoreResult::new(
                            probability,
                            DetectionMethod::Model,
                            Vec::new(),
                            &self.severity,
                        )
                    }
                    Err(e) => {
                        warn!(
                            transaction_id = %tx.transaction_id,
                            error = %e,
                            "Model inference failed; falling back to rule-based scoring for this call"
                        );
                        self.score_with_rules(tx)
                    }
                }
            }
            DetectionPath::Rules => self.score_with_rules(tx),
        }
    }

    fn score_with_rules(&self, tx: &Transaction) -> ScoreResult {
        let (raw, reasons) = self.rules.score(tx);
        debug!(
            transaction_id = %tx.transaction_id,
            raw_score = raw,
            triggered = reasons.len(),
            "Scored via rules"
        );
        ScoreResult::new(raw, DetectionMethod::RuleBased, reasons, &self.severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::score::AlertSeverity;
    use crate::types::transaction::TransactionType;
    use anyhow::bail;
    use chrono::{TimeZone, Utc};

    struct FixedBackend(f64);

    impl InferenceBackend for FixedBackend {
        fn infer(&self, _features: &[f32]) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    struct FailingBackend;

    impl InferenceBackend for FailingBackend {
        fn infer(&self, _features: &[f32]) -> anyhow::Result<f64> {
            bail!("tensor shape mismatch")
        }
    }

    fn tx_at_hour(amount: f64, hour: u32, sender: &str, receiver: &str) -> Transaction {
        let mut tx = Transaction::new("tx_det", amount, sender, receiver, TransactionType::Send);
        tx.timestamp = Utc.with_ymd_and_hms(2025, 1, 15, hour, 30, 0).unwrap();
        tx.location = Some("12.9716,77.5946".to_string());
        tx.device_id = Some("device-1".to_string());
        tx
    }

    fn model_detector(backend: impl InferenceBackend + 'static) -> FraudDetector {
        FraudDetector::with_path(
            DetectionPath::Model(Box::new(backend)),
            &ScoringConfig::default(),
        )
    }

    #[test]
    fn test_model_path_returns_probability_without_reasons() {
        let detector = model_detector(FixedBackend(0.87));
        let result = detector.predict(&tx_at_hour(2500.0, 15, "alice@okaxis", "bob@paytm"));

        assert_eq!(result.detection_method, DetectionMethod::Model);
        assert!((result.fraud_probability - 0.87).abs() < 1e-9);
        assert!(result.is_fraud);
        assert!((result.confidence - 0.87).abs() < 1e-9);
        assert!(result.reasons.is_empty());
        assert_eq!(result.severity, AlertSeverity::High);
    }

    #[test]
    fn test_inference_failure_degrades_single_call_to_rules() {
        let detector = model_detector(FailingBackend);
        assert!(detector.has_model());

        let mut tx = tx_at_hour(60_500.0, 2, "alice@okaxis", "bob@paytm");
        tx.location = None;
        tx.device_id = None;

        let result = detector.predict(&tx);

        assert_eq!(result.detection_method, DetectionMethod::RuleBased);
        assert!((result.fraud_probability - 0.85).abs() < 1e-9);
        assert!(result.is_fraud);
        assert_eq!(result.severity, AlertSeverity::High);
        assert_eq!(result.reasons.len(), 3);
    }

    #[test]
    fn test_stub_model_at_boundary_is_safe() {
        let detector = model_detector(FixedBackend(0.5));
        let result = detector.predict(&tx_at_hour(2500.0, 15, "alice@okaxis", "bob@paytm"));

        assert!(!result.is_fraud);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_rule_path_when_no_model() {
        let detector = FraudDetector::rule_based(&ScoringConfig::default());
        assert!(!detector.has_model());
        assert_eq!(detector.detection_path_name(), "rule_based");

        let result = detector.predict(&tx_at_hour(2500.0, 15, "alice@okaxis", "bob@paytm"));

        assert_eq!(result.detection_method, DetectionMethod::RuleBased);
        assert_eq!(result.fraud_probability, 0.0);
        assert!(!result.is_fraud);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.severity, AlertSeverity::Low);
    }

    #[test]
    fn test_worked_example_self_transfer_round_amount() {
        let detector = FraudDetector::rule_based(&ScoringConfig::default());
        let result = detector.predict(&tx_at_hour(15_000.0, 14, "john@paytm", "john@paytm"));

        assert!((result.fraud_probability - 0.75).abs() < 1e-9);
        assert!(result.is_fraud);
        assert_eq!(result.severity, AlertSeverity::High);
    }

    #[test]
    fn test_worked_example_accumulation_clamps_to_critical() {
        let detector = FraudDetector::rule_based(&ScoringConfig::default());
        let mut tx = tx_at_hour(200_000.0, 3, "x1@y", "999999999@paytm");
        tx.location = None;

        let result = detector.predict(&tx);

        assert_eq!(result.fraud_probability, 1.0);
        assert!(result.is_fraud);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_medium_severity_labels_safe_transaction() {
        let detector = FraudDetector::rule_based(&ScoringConfig::default());
        let mut tx = tx_at_hour(2500.0, 15, "alice@okaxis", "bob@paytm");
        tx.device_id = None; // missing context only: 0.35

        let result = detector.predict(&tx);

        assert!(!result.is_fraud);
        assert_eq!(result.severity, AlertSeverity::Medium);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let detector = FraudDetector::rule_based(&ScoringConfig::default());
        let tx = tx_at_hour(60_500.0, 2, "test@okaxis", "bob@paytm");

        let first = detector.predict(&tx);
        let second = detector.predict(&tx);

        assert_eq!(first.fraud_probability, second.fraud_probability);
        assert_eq!(first.is_fraud, second.is_fraud);
        assert_eq!(first.reasons, second.reasons);
    }

    #[test]
    fn test_probability_always_in_unit_interval() {
        let detector = FraudDetector::rule_based(&ScoringConfig::default());

        let candidates = [
            tx_at_hour(2500.0, 15, "alice@okaxis", "bob@paytm"),
            tx_at_hour(200_000.0, 3, "test@fake", "test@fake"),
            tx_at_hour(300.0, 23, "9876543210@paytm", "ab@x"),
        ];

        for tx in &candidates {
            let result = detector.predict(tx);
            assert!((0.0..=1.0).contains(&result.fraud_probability));
            assert_eq!(result.is_fraud, result.fraud_probability > 0.5);
        }
    }
}
