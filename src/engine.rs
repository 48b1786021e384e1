use crate::batcher::spawn_router;
use crate::config::Config;
use crate::error::ConfigError;
use crate::federation::AddressResolver;
use crate::horizon::HorizonClient;
use crate::keypair::Keypair;
use crate::memo::{Memo, has_valid_memo_text_size};
use crate::payment::{PaymentOutcome, RawPayment};
use crate::pool::PayerPool;
use crate::submitter::{SubmitContext, spawn_submitter};
use crate::validator::spawn_validator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// One batch is handed to the submitter at a time; a second ready batch
/// blocks the router until a payer frees up.
const BATCH_HANDOFF_CAPACITY: usize = 1;

/// The batch payment pipeline.
///
/// Wires the validation, routing and submission stages over bounded channels
/// and merges their outcomes into a single output sequence. Collaborators for
/// the ledger and federation protocols are injected at construction.
pub struct BatchPayment {
    config: Config,
    horizon: Arc<dyn HorizonClient>,
    resolver: Arc<dyn AddressResolver>,
    payers: Vec<Keypair>,
    default_memo: Option<Memo>,
}

impl BatchPayment {
    /// Validates the configuration and builds the pipeline.
    ///
    /// Fails before any processing if a fee payer secret does not parse or
    /// the default memo violates the memo-text rule.
    pub fn new(
        config: Config,
        horizon: Arc<dyn HorizonClient>,
        resolver: Arc<dyn AddressResolver>,
    ) -> Result<Self, ConfigError> {
        let payers = config
            .fee_payers_secrets
            .iter()
            .enumerate()
            .map(|(index, secret)| {
                Keypair::from_secret(secret).map_err(|_| ConfigError::InvalidFeePayerSecret(index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let default_memo = match &config.default_memo {
            Some(text) if has_valid_memo_text_size(text) => Some(Memo::Text(text.clone())),
            Some(_) => return Err(ConfigError::InvalidDefaultMemo),
            None => None,
        };

        if config.batch_size != config.effective_batch_size() {
            debug!(
                requested = config.batch_size,
                effective = config.effective_batch_size(),
                "batch size out of range, clamped"
            );
        }

        Ok(Self {
            config,
            horizon,
            resolver,
            payers,
            default_memo,
        })
    }

    /// Pays an in-memory list of records and collects every outcome.
    ///
    /// The outcome item multiset equals the input multiset: each record lands
    /// in exactly one outcome.
    pub async fn pay(
        &self,
        source_secret: &str,
        payments: Vec<RawPayment>,
    ) -> Result<Vec<PaymentOutcome>, ConfigError> {
        let (input_tx, input_rx) = mpsc::channel(self.batch_size());
        let mut outcomes_rx = self.pay_stream(source_secret, input_rx)?;

        tokio::spawn(async move {
            for payment in payments {
                if input_tx.send(payment).await.is_err() {
                    break;
                }
            }
        });

        let mut outcomes = Vec::new();
        while let Some(outcome) = outcomes_rx.recv().await {
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Pays an open-ended stream of records.
    ///
    /// Outcomes arrive as batches settle, in no particular order across
    /// batches; the returned channel closes once every input record has
    /// reached its terminal outcome. Dropping the receiver cancels the
    /// pipeline.
    pub fn pay_stream(
        &self,
        source_secret: &str,
        input: mpsc::Receiver<RawPayment>,
    ) -> Result<mpsc::Receiver<PaymentOutcome>, ConfigError> {
        let source =
            Keypair::from_secret(source_secret).map_err(|_| ConfigError::InvalidSourceSecret)?;
        let batch_size = self.batch_size();

        // No configured fee payers: the source account pays its own fees.
        let payers = if self.payers.is_empty() {
            vec![source.clone()]
        } else {
            self.payers.clone()
        };
        let pool = PayerPool::new(payers);
        debug!(pool = pool.size(), batch_size, "starting batch payment pipeline");

        let (checked_tx, checked_rx) = mpsc::channel(batch_size);
        let (batch_tx, batch_rx) = mpsc::channel(BATCH_HANDOFF_CAPACITY);
        let (outcome_tx, outcome_rx) = mpsc::channel(batch_size);

        let ctx = Arc::new(SubmitContext {
            horizon: Arc::clone(&self.horizon),
            source,
            base_fee: self.config.base_fee,
            default_memo: self.default_memo.clone(),
            default_memo_on_single: self.config.default_memo_on_single,
        });

        spawn_validator(Arc::clone(&self.resolver), batch_size, input, checked_tx);
        spawn_router(batch_size, checked_rx, batch_tx, outcome_tx.clone());
        spawn_submitter(ctx, pool, batch_rx, outcome_tx);

        // The receiver observes end-of-stream once the router (invalid
        // aggregate) and every submission task have dropped their senders.
        Ok(outcome_rx)
    }

    fn batch_size(&self) -> usize {
        self.config.effective_batch_size()
    }
}
