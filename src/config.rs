use serde::{Deserialize, Serialize};

/// Default and maximum number of operations per memo-less transaction.
pub const MAX_BATCH_SIZE: usize = 100;

/// Minimum per-operation fee, in stroops.
pub const BASE_FEE: u32 = 100;

pub const TESTNET_HORIZON_URI: &str = "https://horizon-testnet.stellar.org";
pub const PUBLIC_HORIZON_URI: &str = "https://horizon.stellar.org";
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Which horizon endpoint and network passphrase submissions target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Public,
    Custom {
        horizon_uri: String,
        passphrase: String,
    },
}

impl Network {
    pub fn horizon_uri(&self) -> &str {
        match self {
            Network::Testnet => TESTNET_HORIZON_URI,
            Network::Public => PUBLIC_HORIZON_URI,
            Network::Custom { horizon_uri, .. } => horizon_uri,
        }
    }

    pub fn passphrase(&self) -> &str {
        match self {
            Network::Testnet => TESTNET_PASSPHRASE,
            Network::Public => PUBLIC_PASSPHRASE,
            Network::Custom { passphrase, .. } => passphrase,
        }
    }
}

/// Batch payment options. Construction of [`BatchPayment`](crate::BatchPayment)
/// validates the fee payer secrets and the default memo; a `batch_size`
/// outside `(0, 100]` is clamped to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Max operations per memo-less transaction; also bounds federation
    /// resolution concurrency.
    pub batch_size: usize,
    /// Secrets funding transaction fees. Empty means the payment source's own
    /// signer pays the fees.
    pub fee_payers_secrets: Vec<String>,
    /// Text attached to multi-item memo-less transactions, if set.
    pub default_memo: Option<String>,
    /// Whether the default memo also applies to single-item memo-less
    /// transactions.
    pub default_memo_on_single: bool,
    /// Per-operation fee, in stroops.
    pub base_fee: u32,
    pub network: Network,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            fee_payers_secrets: Vec::new(),
            default_memo: None,
            default_memo_on_single: false,
            base_fee: BASE_FEE,
            network: Network::Testnet,
        }
    }
}

impl Config {
    /// `batch_size` with the `(0, 100]` clamp applied.
    pub(crate) fn effective_batch_size(&self) -> usize {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            MAX_BATCH_SIZE
        } else {
            self.batch_size
        }
    }
}
