//! Transaction data structures for UPI fraud scoring

use crate::error::EngineError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of UPI transfer.
///
/// Any other wire value is an input-contract violation and is rejected at
/// deserialization time with [`EngineError::InvalidTransactionType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionType {
    Send,
    Receive,
    Request,
}

impl TransactionType {
    /// Ordinal encoding used by the feature extractor (stable: SEND=0,
    /// RECEIVE=1, REQUEST=2).
    pub fn ordinal(self) -> u8 {
        match self {
            TransactionType::Send => 0,
            TransactionType::Receive => 1,
            TransactionType::Request => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Send => "SEND",
            TransactionType::Receive => "RECEIVE",
            TransactionType::Request => "REQUEST",
        }
    }
}

impl FromStr for TransactionType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEND" => Ok(TransactionType::Send),
            "RECEIVE" => Ok(TransactionType::Receive),
            "REQUEST" => Ok(TransactionType::Request),
            other => Err(EngineError::InvalidTransactionType(other.to_string())),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> String {
        t.as_str().to_string()
    }
}

/// A single UPI transfer to be scored.
///
/// This is the engine's read-only view of the upstream transaction record.
/// `location` and `device_id` are optional context captured by the client;
/// both may legitimately be absent, empty or malformed, and the engine
/// treats all of those as the missing-context signal rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier (caller-supplied, opaque)
    pub transaction_id: String,

    /// Transfer amount in rupees
    pub amount: f64,

    /// Sender UPI address (`local-part@provider`)
    pub sender_upi: String,

    /// Receiver UPI address
    pub receiver_upi: String,

    /// Transfer kind
    pub transaction_type: TransactionType,

    /// Creation time of the transfer
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Client-reported location, expected as a `"lat,lon"` pair
    #[serde(default)]
    pub location: Option<String>,

    /// Client device identifier
    #[serde(default)]
    pub device_id: Option<String>,
}

impl Transaction {
    /// Create a transaction with the required fields; optional context
    /// starts absent.
    pub fn new(
        transaction_id: impl Into<String>,
        amount: f64,
        sender_upi: impl Into<String>,
        receiver_upi: impl Into<String>,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount,
            sender_upi: sender_upi.into(),
            receiver_upi: receiver_upi.into(),
            transaction_type,
            timestamp: Utc::now(),
            location: None,
            device_id: None,
        }
    }

    /// Hour of day (0-23) the transfer was created.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week, 0 = Monday .. 6 = Sunday.
    pub fn day_of_week(&self) -> u32 {
        self.timestamp.weekday().num_days_from_monday()
    }

    /// Parse the reported location as a `"lat,lon"` coordinate pair.
    ///
    /// Sentinel strings from the capture layer ("Location unavailable",
    /// "Geolocation not supported", ...) and anything else unparseable
    /// yield `None`.
    pub fn location_coords(&self) -> Option<(f64, f64)> {
        let raw = self.location.as_deref()?;
        let (lat, lon) = raw.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        Some((lat, lon))
    }

    /// Whether usable location context is present.
    pub fn has_location(&self) -> bool {
        self.location_coords().is_some()
    }

    /// Whether a device identifier is present and non-empty.
    pub fn has_device(&self) -> bool {
        self.device_id
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_serialization() {
        let tx = Transaction::new(
            "tx_123",
            2500.0,
            "alice@okaxis",
            "bob@paytm",
            TransactionType::Send,
        );

        let json = serde_json::to_string(&tx).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(tx.transaction_id, deserialized.transaction_id);
        assert_eq!(tx.amount, deserialized.amount);
        assert_eq!(tx.transaction_type, deserialized.transaction_type);
    }

    #[test]
    fn test_transaction_type_rejects_unknown_value() {
        let json = r#"{
            "transaction_id": "tx_1",
            "amount": 100.0,
            "sender_upi": "alice@okaxis",
            "receiver_upi": "bob@paytm",
            "transaction_type": "TRANSFER"
        }"#;

        let err = serde_json::from_str::<Transaction>(json).unwrap_err();
        assert!(err.to_string().contains("invalid transaction type"));
    }

    #[test]
    fn test_optional_context_defaults_absent() {
        let json = r#"{
            "transaction_id": "tx_2",
            "amount": 100.0,
            "sender_upi": "alice@okaxis",
            "receiver_upi": "bob@paytm",
            "transaction_type": "RECEIVE"
        }"#;

        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert!(!tx.has_location());
        assert!(!tx.has_device());
    }

    #[test]
    fn test_location_parsing() {
        let mut tx = Transaction::new(
            "tx_3",
            100.0,
            "alice@okaxis",
            "bob@paytm",
            TransactionType::Send,
        );

        tx.location = Some("12.9716, 77.5946".to_string());
        assert_eq!(tx.location_coords(), Some((12.9716, 77.5946)));

        // Capture-layer sentinels and malformed values read as absent.
        tx.location = Some("Location unavailable".to_string());
        assert!(!tx.has_location());
        tx.location = Some(String::new());
        assert!(!tx.has_location());

        tx.device_id = Some("  ".to_string());
        assert!(!tx.has_device());
        tx.device_id = Some("device-9f2a".to_string());
        assert!(tx.has_device());
    }
}
