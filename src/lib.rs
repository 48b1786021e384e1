//! Batch many payment instructions into a minimal set of Stellar
//! transactions, submitted concurrently through a bounded pool of fee-paying
//! accounts.
//!
//! The pipeline validates records (resolving `name*domain` federated
//! addresses), routes memo-bearing payments into their own transactions,
//! groups memo-less payments into size-bounded batches, and submits batches
//! concurrently, one in-flight transaction per fee payer. Every input record
//! reaches exactly one [`PaymentOutcome`].
//!
//! The ledger SDK and the federation transport are injected behind the
//! [`HorizonClient`] and [`AddressResolver`] traits.

pub mod asset;
pub mod batcher;
pub mod config;
pub mod engine;
pub mod error;
pub mod federation;
pub mod horizon;
pub mod keypair;
pub mod memo;
pub mod payment;
pub mod pool;
pub mod reader;
pub mod submitter;
pub mod validator;

pub use asset::{Asset, AssetSpec};
pub use batcher::INVALID_DATA_ERROR;
pub use config::{Config, Network};
pub use engine::BatchPayment;
pub use error::{ConfigError, KeyError, LedgerError, ResolveError, ResultCodes, SubmitError};
pub use federation::{AddressResolver, Resolved};
pub use horizon::{AccountState, HorizonClient, PaymentOp, SubmitResponse, TransactionEnvelope};
pub use keypair::Keypair;
pub use memo::{Memo, MemoSpec};
pub use payment::{PaymentOutcome, PaymentRequest, RawPayment};
pub use pool::{PayerGuard, PayerPool};
pub use reader::PaymentReader;
