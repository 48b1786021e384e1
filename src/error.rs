use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal configuration problems, raised before any payment is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fee payer secret #{0} is not a valid ed25519 secret seed")]
    InvalidFeePayerSecret(usize),
    #[error("source secret is not a valid ed25519 secret seed")]
    InvalidSourceSecret,
    #[error("default memo must be 1..=28 bytes of non-blank text")]
    InvalidDefaultMemo,
}

/// A strkey that failed to decode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyError {
    #[error("malformed ed25519 secret seed")]
    MalformedSecret,
}

/// Structured result codes returned by horizon when a transaction is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCodes {
    pub transaction: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<String>,
}

/// Errors surfaced by the ledger collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("transaction rejected: {}", .0.transaction)]
    Rejected(ResultCodes),
    #[error("account {0} not found")]
    AccountNotFound(String),
    #[error("horizon request failed: {0}")]
    Network(String),
}

impl LedgerError {
    /// Human-readable failure reason for a `PaymentOutcome`.
    ///
    /// A rejection carrying structured result codes renders as their JSON,
    /// anything else falls back to the error's display string.
    pub fn reason(&self) -> String {
        match self {
            LedgerError::Rejected(codes) => {
                serde_json::to_string(codes).unwrap_or_else(|_| codes.transaction.clone())
            }
            other => other.to_string(),
        }
    }
}

/// Errors surfaced by the address resolver collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("invalid federated address")]
    InvalidAddress,
    #[error("federation lookup failed: {0}")]
    Lookup(String),
}

/// Per-submission failures. `MemoInMultiItemBatch` signals a logic defect in
/// the router, not bad input, and is never silently dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("internal error: a memo requires a single-payment batch")]
    MemoInMultiItemBatch,
}

impl SubmitError {
    pub fn reason(&self) -> String {
        match self {
            SubmitError::Ledger(e) => e.reason(),
            other => other.to_string(),
        }
    }
}
