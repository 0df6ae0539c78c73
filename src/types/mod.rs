//! Type definitions for the fraud scoring engine

pub mod alert;
pub mod score;
pub mod transaction;

pub use alert::FraudAlert;
pub use score::{AlertSeverity, DetectionMethod, ScoreResult, SeverityThresholds};
pub use transaction::{Transaction, TransactionType};
