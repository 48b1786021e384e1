use crate::asset::Asset;
use crate::error::LedgerError;
use crate::keypair::Keypair;
use crate::memo::Memo;
use async_trait::async_trait;

/// Sequence-bearing account state loaded from the network.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub account_id: String,
    pub sequence: i64,
}

/// One payment operation inside a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOp {
    /// Account the funds move out of (the payment source, not the fee payer).
    pub source: String,
    pub destination: String,
    /// Amount rendered per asset precision.
    pub amount: String,
    pub asset: Asset,
}

/// A transaction ready for the collaborator to encode, sign and submit.
///
/// The source account is the fee payer whose sequence counter the
/// transaction consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEnvelope {
    pub source_account: String,
    pub sequence: i64,
    /// Total fee: per-operation base fee times operation count.
    pub fee: u32,
    pub memo: Option<Memo>,
    pub operations: Vec<PaymentOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub hash: String,
}

/// The ledger SDK seam. Binary encoding, signing and transport live behind
/// this trait; the pipeline only decides what to submit and with which keys.
#[async_trait]
pub trait HorizonClient: Send + Sync {
    async fn load_account(&self, account_id: &str) -> Result<AccountState, LedgerError>;

    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
        signers: &[Keypair],
    ) -> Result<SubmitResponse, LedgerError>;
}
