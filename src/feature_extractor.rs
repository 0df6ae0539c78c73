//! Feature extraction for the learned-model scoring path.
//!
//! Produces the fixed 64-slot vector the CNN was trained against. The slot
//! order is part of the model contract and must stay stable:
//!
//! | slot | feature                                   | range        |
//! |------|-------------------------------------------|--------------|
//! | 0    | amount / 100000                           | [0, ∞) ~[0,1]|
//! | 1    | slot 0 × slot 3 (amount-hour interaction) | [0, ∞)       |
//! | 2    | transaction type ordinal / 2              | {0, 0.5, 1}  |
//! | 3    | hour of day / 24                          | [0, 1)       |
//! | 4    | day of week / 7                           | [0, 1)       |
//! | 5    | sender UPI length / 100                   | [0, ~1]      |
//! | 6    | receiver UPI length / 100                 | [0, ~1]      |
//! | 7    | location present                          | {0, 1}       |
//! | 8    | device id present                         | {0, 1}       |
//! | 9-63 | reserved, zero                            | {0}          |

use crate::types::transaction::Transaction;

/// Fixed feature-vector length (the CNN consumes an 8x8 grid).
pub const FEATURE_COUNT: usize = 64;

/// Divisor that puts typical rupee amounts roughly into [0, 1]. Larger
/// amounts simply exceed 1; no clamp.
const AMOUNT_DIVISOR: f64 = 100_000.0;

/// Normalization cap for UPI identifier lengths.
const UPI_LEN_CAP: f64 = 100.0;

/// Transforms a transaction into the model's input vector.
///
/// Pure and total: missing or malformed optional context is encoded as its
/// absent sentinel (0.0), never an error.
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the 64-slot feature vector for one transaction.
    pub fn extract(&self, tx: &Transaction) -> Vec<f32> {
        let amount_norm = tx.amount / AMOUNT_DIVISOR;
        let hour_norm = f64::from(tx.hour()) / 24.0;

        let mut features = Vec::with_capacity(FEATURE_COUNT);

        features.push(amount_norm as f32);
        features.push((amount_norm * hour_norm) as f32);
        features.push(f32::from(tx.transaction_type.ordinal()) / 2.0);
        features.push(hour_norm as f32);
        features.push(tx.day_of_week() as f32 / 7.0);
        features.push((tx.sender_upi.chars().count() as f64 / UPI_LEN_CAP) as f32);
        features.push((tx.receiver_upi.chars().count() as f64 / UPI_LEN_CAP) as f32);
        features.push(if tx.has_location() { 1.0 } else { 0.0 });
        features.push(if tx.has_device() { 1.0 } else { 0.0 });

        // Reserved slots for future signals; must be zero, never garbage.
        features.resize(FEATURE_COUNT, 0.0);

        features
    }

    /// Number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Names of the populated slots, in slot order. Trailing reserved slots
    /// are unnamed.
    pub fn feature_names(&self) -> Vec<&'static str> {
        vec![
            "amount_norm",
            "amount_hour_interaction",
            "transaction_type",
            "hour_of_day",
            "day_of_week",
            "sender_upi_len",
            "receiver_upi_len",
            "has_location",
            "has_device",
        ]
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
