//! Deterministic rule-based fraud scoring.
//!
//! The scorer evaluates an ordered, declarative table of weighted rules over
//! the raw transaction. Weights are additive and independent; the running
//! total is deliberately left uncapped here, so a transaction can accumulate
//! well past 1.0. Clamping to [0, 1] happens once, when the final
//! `ScoreResult` is assembled.

pub mod upi;

use crate::types::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use upi::UpiValidator;

const EXTREME_AMOUNT: f64 = 100_000.0;
const HIGH_AMOUNT: f64 = 50_000.0;
const ROUND_AMOUNT_UNIT: f64 = 1_000.0;
const ROUND_AMOUNT_FLOOR: f64 = 10_000.0;
const SMALL_AMOUNT_MIN: f64 = 100.0;
const SMALL_AMOUNT_MAX: f64 = 500.0;
const NIGHT_END_HOUR: u32 = 6;
const NIGHT_START_HOUR: u32 = 22;

/// Per-rule weight table.
///
/// The defaults reproduce the current production tuning; keeping them in
/// configuration lets a weight revision land without a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    pub extreme_amount: f64,
    pub high_amount: f64,
    pub unusual_hour: f64,
    pub round_amount: f64,
    pub small_test_amount: f64,
    pub missing_context: f64,
    pub self_transfer: f64,
    pub invalid_sender: f64,
    pub invalid_receiver: f64,
    pub suspicious_pattern: f64,
    pub numeric_local: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            extreme_amount: 0.5,
            high_amount: 0.3,
            unusual_hour: 0.2,
            round_amount: 0.15,
            small_test_amount: 0.1,
            missing_context: 0.35,
            self_transfer: 0.6,
            invalid_sender: 0.5,
            invalid_receiver: 0.5,
            suspicious_pattern: 0.25,
            numeric_local: 0.25,
        }
    }
}

type Check = Box<dyn Fn(&Transaction) -> Option<String> + Send + Sync>;

/// One entry of the scoring table: fires with a reason string, adds its
/// weight to the total.
struct Rule {
    name: &'static str,
    weight: f64,
    check: Check,
}

/// Weighted rule-table scorer (the deterministic, explainable path).
pub struct RuleScorer {
    rules: Vec<Rule>,
}

impl RuleScorer {
    /// Build the scoring table. Evaluation order is the table order below,
    /// which fixes the order reasons are reported in.
    pub fn new(weights: &RuleWeights) -> Self {
        let validator = Arc::new(UpiValidator::new());

        let rules = vec![
            // The two amount tiers are mutually exclusive: only the higher
            // one fires.
            Rule {
                name: "extreme_amount",
                weight: weights.extreme_amount,
                check: Box::new(|tx| {
                    (tx.amount > EXTREME_AMOUNT)
                        .then(|| "Extreme transaction amount (>₹1,00,000)".to_string())
                }),
            },
            Rule {
                name: "high_amount",
                weight: weights.high_amount,
                check: Box::new(|tx| {
                    (tx.amount > HIGH_AMOUNT && tx.amount <= EXTREME_AMOUNT)
                        .then(|| "High transaction amount (>₹50,000)".to_string())
                }),
            },
            Rule {
                name: "unusual_hour",
                weight: weights.unusual_hour,
                check: Box::new(|tx| {
                    let hour = tx.hour();
                    (hour < NIGHT_END_HOUR || hour >= NIGHT_START_HOUR)
                        .then(|| format!("Unusual transaction time ({hour} hrs)"))
                }),
            },
            Rule {
                name: "round_amount",
                weight: weights.round_amount,
                check: Box::new(|tx| {
                    (tx.amount % ROUND_AMOUNT_UNIT == 0.0 && tx.amount > ROUND_AMOUNT_FLOOR)
                        .then(|| format!("Round amount (₹{})", format_amount(tx.amount)))
                }),
            },
            Rule {
                name: "small_test_amount",
                weight: weights.small_test_amount,
                check: Box::new(|tx| {
                    (SMALL_AMOUNT_MIN..=SMALL_AMOUNT_MAX)
                        .contains(&tx.amount)
                        .then(|| "Small test-pattern amount".to_string())
                }),
            },
            Rule {
                name: "missing_context",
                weight: weights.missing_context,
                check: Box::new(|tx| {
                    (!tx.has_location() || !tx.has_device())
                        .then(|| "Missing or invalid location/device data".to_string())
                }),
            },
            Rule {
                name: "self_transfer",
                weight: weights.self_transfer,
                check: Box::new(|tx| {
                    tx.sender_upi
                        .eq_ignore_ascii_case(&tx.receiver_upi)
                        .then(|| "Self-transfer detected (same UPI IDs)".to_string())
                }),
            },
            Rule {
                name: "invalid_sender",
                weight: weights.invalid_sender,
                check: {
                    let validator = validator.clone();
                    Box::new(move |tx| {
                        (!validator.is_valid_format(&tx.sender_upi))
                            .then(|| "Invalid sender UPI format".to_string())
                    })
                },
            },
            Rule {
                name: "invalid_receiver",
                weight: weights.invalid_receiver,
                check: {
                    let validator = validator.clone();
                    Box::new(move |tx| {
                        (!validator.is_valid_format(&tx.receiver_upi))
                            .then(|| "Invalid receiver UPI format".to_string())
                    })
                },
            },
            // Suspicious-pattern penalty applies once per matching side.
            Rule {
                name: "suspicious_sender",
                weight: weights.suspicious_pattern,
                check: Box::new(|tx| {
                    upi::is_suspicious(&tx.sender_upi)
                        .then(|| "Suspicious UPI pattern detected".to_string())
                }),
            },
            Rule {
                name: "suspicious_receiver",
                weight: weights.suspicious_pattern,
                check: Box::new(|tx| {
                    upi::is_suspicious(&tx.receiver_upi)
                        .then(|| "Suspicious UPI pattern detected".to_string())
                }),
            },
            Rule {
                name: "numeric_local",
                weight: weights.numeric_local,
                check: Box::new(|tx| {
                    (upi::has_numeric_local(&tx.sender_upi)
                        || upi::has_numeric_local(&tx.receiver_upi))
                        .then(|| "Numeric UPI pattern".to_string())
                }),
            },
        ];

        Self { rules }
    }

    /// Evaluate the full table.
    ///
    /// Returns the uncapped weight total and one reason per triggered rule,
    /// in table order.
    pub fn score(&self, tx: &Transaction) -> (f64, Vec<String>) {
        let mut total = 0.0;
        let mut reasons = Vec::with_capacity(4);

        for rule in &self.rules {
            if let Some(reason) = (rule.check)(tx) {
                tracing::trace!(rule = rule.name, weight = rule.weight, "Rule triggered");
                total += rule.weight;
                reasons.push(reason);
            }
        }

        (total, reasons)
    }

    /// Number of table entries (suspicious-pattern counts once per side).
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleScorer {
    fn default() -> Self {
        Self::new(&RuleWeights::default())
    }
}

/// Format a rupee amount with thousands grouping (15000 -> "15,000").
fn format_amount(amount: f64) -> String {
    let digits = (amount.trunc() as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}
