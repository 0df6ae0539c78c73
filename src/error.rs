//! Error types for the fraud scoring engine

use thiserror::Error;

/// Engine error
///
/// Scoring itself is total; the only hard failure the engine reports to a
/// caller is an input-contract violation from the upstream collaborator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Transaction type outside the defined domain
    #[error("invalid transaction type {0:?} (expected SEND, RECEIVE or REQUEST)")]
    InvalidTransactionType(String),
}
