//! Scoring output types: probability, verdict, severity

use serde::{Deserialize, Serialize};

/// Which scoring path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMethod {
    /// Learned-model inference over the extracted feature vector
    #[serde(rename = "cnn_model")]
    Model,
    /// Deterministic weighted rule table over the raw transaction
    #[serde(rename = "rule_based")]
    RuleBased,
}

/// Alert severity tier, derived solely from the fraud probability.
///
/// Informational triage metadata; the binary verdict is decided by the 0.5
/// cutoff alone, so `Medium` only ever labels a transaction that is safe but
/// worth watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Map a fraud probability onto a severity tier.
    pub fn from_probability(probability: f64, thresholds: &SeverityThresholds) -> Self {
        if probability >= thresholds.critical {
            AlertSeverity::Critical
        } else if probability >= thresholds.high {
            AlertSeverity::High
        } else if probability >= thresholds.medium {
            AlertSeverity::Medium
        } else {
            AlertSeverity::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

/// Configurable severity tier boundaries (inclusive lower bounds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            medium: 0.3,
            high: 0.5,
            critical: 0.9,
        }
    }
}

/// Full scoring outcome for one transaction, owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Fraud probability in [0, 1] (rule-path totals are clamped here)
    pub fraud_probability: f64,

    /// Verdict: probability strictly above 0.5
    pub is_fraud: bool,

    /// Path that produced the score
    pub detection_method: DetectionMethod,

    /// Certainty in the chosen class: the probability itself when fraud,
    /// its complement when safe
    pub confidence: f64,

    /// Severity tier derived from the probability
    pub severity: AlertSeverity,

    /// One human-readable reason per triggered rule, in rule-table order;
    /// empty on the model path
    pub reasons: Vec<String>,
}

impl ScoreResult {
    /// Assemble a result from a raw (possibly uncapped) score.
    ///
    /// Clamps to [0, 1], applies the 0.5 verdict cutoff and derives
    /// confidence and severity.
    pub fn new(
        raw_score: f64,
        detection_method: DetectionMethod,
        reasons: Vec<String>,
        thresholds: &SeverityThresholds,
    ) -> Self {
        let fraud_probability = raw_score.clamp(0.0, 1.0);
        let is_fraud = fraud_probability > 0.5;
        let confidence = if is_fraud {
            fraud_probability
        } else {
            1.0 - fraud_probability
        };
        let severity = AlertSeverity::from_probability(fraud_probability, thresholds);

        Self {
            fraud_probability,
            is_fraud,
            detection_method,
            confidence,
            severity,
            reasons,
        }
    }

    /// Human-readable summary: the risk percentage with the triggered-rule
    /// reasons joined by `", "`. Model-path results have no reason clause.
    pub fn summary(&self) -> String {
        if self.reasons.is_empty() {
            format!("Risk: {:.0}%", self.fraud_probability * 100.0)
        } else {
            format!(
                "Risk: {:.0}% - {}",
                self.fraud_probability * 100.0,
                self.reasons.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_probability() {
        let thresholds = SeverityThresholds::default();

        assert_eq!(
            AlertSeverity::from_probability(0.1, &thresholds),
            AlertSeverity::Low
        );
        assert_eq!(
            AlertSeverity::from_probability(0.3, &thresholds),
            AlertSeverity::Medium
        );
        assert_eq!(
            AlertSeverity::from_probability(0.5, &thresholds),
            AlertSeverity::High
        );
        assert_eq!(
            AlertSeverity::from_probability(0.89, &thresholds),
            AlertSeverity::High
        );
        assert_eq!(
            AlertSeverity::from_probability(0.9, &thresholds),
            AlertSeverity::Critical
        );
    }

    #[test]
    fn test_verdict_cutoff_is_strict() {
        let thresholds = SeverityThresholds::default();

        // Exactly 0.5 is safe; the boundary itself does not convict.
        let result = ScoreResult::new(0.5, DetectionMethod::RuleBased, vec![], &thresholds);
        assert!(!result.is_fraud);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.severity, AlertSeverity::High);

        let result = ScoreResult::new(0.51, DetectionMethod::RuleBased, vec![], &thresholds);
        assert!(result.is_fraud);
        assert_eq!(result.confidence, 0.51);
    }

    #[test]
    fn test_uncapped_score_clamps_to_one() {
        let thresholds = SeverityThresholds::default();

        let result = ScoreResult::new(
            1.85,
            DetectionMethod::RuleBased,
            vec!["Self-transfer detected (same UPI IDs)".to_string()],
            &thresholds,
        );

        assert_eq!(result.fraud_probability, 1.0);
        assert!(result.is_fraud);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_confidence_mirrors_distance_from_boundary() {
        let thresholds = SeverityThresholds::default();

        let safe = ScoreResult::new(0.2, DetectionMethod::Model, vec![], &thresholds);
        assert!(!safe.is_fraud);
        assert!((safe.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_summary_with_and_without_reasons() {
        let thresholds = SeverityThresholds::default();

        let model = ScoreResult::new(0.87, DetectionMethod::Model, vec![], &thresholds);
        assert_eq!(model.summary(), "Risk: 87%");

        let rules = ScoreResult::new(
            0.85,
            DetectionMethod::RuleBased,
            vec![
                "High transaction amount (>₹50,000)".to_string(),
                "Unusual transaction time (3 hrs)".to_string(),
            ],
            &thresholds,
        );
        assert_eq!(
            rules.summary(),
            "Risk: 85% - High transaction amount (>₹50,000), Unusual transaction time (3 hrs)"
        );
    }

    #[test]
    fn test_detection_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&DetectionMethod::Model).unwrap(),
            "\"cnn_model\""
        );
        assert_eq!(
            serde_json::to_string(&DetectionMethod::RuleBased).unwrap(),
            "\"rule_based\""
        );
    }
}
