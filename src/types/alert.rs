//! Fraud alert record built by the pipeline on a fraud verdict

use crate::types::score::{AlertSeverity, DetectionMethod, ScoreResult};
use crate::types::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert raised for a transaction the engine judged fraudulent.
///
/// The engine itself never creates alerts; the pipeline (the caller) builds
/// one from the returned [`ScoreResult`] when `is_fraud` is true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAlert {
    /// Unique alert identifier
    pub alert_id: String,

    /// Scored transaction this alert refers to
    pub transaction_id: String,

    /// Fraud probability that triggered the alert
    pub fraud_probability: f64,

    /// Severity tier for triage
    pub severity: AlertSeverity,

    /// Path that produced the score
    pub detection_method: DetectionMethod,

    /// Triggered-rule reasons (empty for model-path alerts)
    pub reasons: Vec<String>,

    /// Display message for dashboards and notifications
    pub message: String,

    /// Alert creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl FraudAlert {
    /// Build an alert from a transaction and its scoring result.
    pub fn from_score(transaction: &Transaction, result: &ScoreResult) -> Self {
        Self {
            alert_id: uuid::Uuid::new_v4().to_string(),
            transaction_id: transaction.transaction_id.clone(),
            fraud_probability: result.fraud_probability,
            severity: result.severity,
            detection_method: result.detection_method,
            reasons: result.reasons.clone(),
            message: format!("⚠️ FRAUD ALERT! {}", result.summary()),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::score::SeverityThresholds;
    use crate::types::transaction::TransactionType;

    #[test]
    fn test_alert_message_includes_reasons() {
        let tx = Transaction::new(
            "tx_42",
            60500.0,
            "alice@okaxis",
            "bob@paytm",
            TransactionType::Send,
        );
        let result = ScoreResult::new(
            0.85,
            DetectionMethod::RuleBased,
            vec![
                "High transaction amount (>₹50,000)".to_string(),
                "Unusual transaction time (2 hrs)".to_string(),
            ],
            &SeverityThresholds::default(),
        );

        let alert = FraudAlert::from_score(&tx, &result);

        assert_eq!(alert.transaction_id, "tx_42");
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(
            alert.message,
            "⚠️ FRAUD ALERT! Risk: 85% - High transaction amount (>₹50,000), Unusual transaction time (2 hrs)"
        );
    }

    #[test]
    fn test_model_path_alert_has_no_reason_clause() {
        let tx = Transaction::new(
            "tx_43",
            1000.0,
            "alice@okaxis",
            "bob@paytm",
            TransactionType::Send,
        );
        let result = ScoreResult::new(
            0.92,
            DetectionMethod::Model,
            vec![],
            &SeverityThresholds::default(),
        );

        let alert = FraudAlert::from_score(&tx, &result);

        assert_eq!(alert.message, "⚠️ FRAUD ALERT! Risk: 92%");
        assert!(alert.reasons.is_empty());
        assert_eq!(alert.severity, AlertSeverity::Critical);
    }

    #[test]
    fn test_alert_serialization_round_trip() {
        let tx = Transaction::new(
            "tx_44",
            500.0,
            "alice@okaxis",
            "alice@okaxis",
            TransactionType::Send,
        );
        let result = ScoreResult::new(
            0.7,
            DetectionMethod::RuleBased,
            vec!["Self-transfer detected (same UPI IDs)".to_string()],
            &SeverityThresholds::default(),
        );

        let alert = FraudAlert::from_score(&tx, &result);
        let json = serde_json::to_string(&alert).unwrap();
        let deserialized: FraudAlert = serde_json::from_str(&json).unwrap();

        assert_eq!(alert.alert_id, deserialized.alert_id);
        assert_eq!(alert.severity, deserialized.severity);
        assert_eq!(alert.reasons, deserialized.reasons);
    }
}
