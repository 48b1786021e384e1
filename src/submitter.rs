use crate::batcher::Batch;
use crate::error::SubmitError;
use crate::horizon::{HorizonClient, PaymentOp, SubmitResponse, TransactionEnvelope};
use crate::keypair::Keypair;
use crate::memo::Memo;
use crate::payment::{PaymentOutcome, format_amount};
use crate::pool::{PayerGuard, PayerPool};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error};

/// Everything a submission needs besides the batch itself.
pub(crate) struct SubmitContext {
    pub horizon: Arc<dyn HorizonClient>,
    pub source: Keypair,
    pub base_fee: u32,
    pub default_memo: Option<Memo>,
    pub default_memo_on_single: bool,
}

/// Spawns the submission stage.
///
/// The dispatcher checks out a payer before spawning each submission task, so
/// in-flight submissions never exceed the pool size and a saturated pool
/// pushes back through the batch channel into the router.
pub(crate) fn spawn_submitter(
    ctx: Arc<SubmitContext>,
    pool: PayerPool,
    mut batches: mpsc::Receiver<Batch>,
    outcomes: mpsc::Sender<PaymentOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut in_flight = JoinSet::new();
        while let Some(batch) = batches.recv().await {
            let payer = pool.acquire().await;
            let ctx = Arc::clone(&ctx);
            let outcomes = outcomes.clone();
            in_flight.spawn(submit_batch(ctx, batch, payer, outcomes));
        }
        while let Some(joined) = in_flight.join_next().await {
            if let Err(err) = joined {
                error!(error = %err, "submission task failed to join");
            }
        }
    })
}

/// Runs one submission end to end. The payer is released before the outcome
/// is emitted, on success and failure alike.
async fn submit_batch(
    ctx: Arc<SubmitContext>,
    batch: Batch,
    payer: PayerGuard,
    outcomes: mpsc::Sender<PaymentOutcome>,
) {
    debug!(payer = payer.public_key(), items = batch.items.len(), "submitting batch");
    let result = build_and_submit(&ctx, &batch, &payer).await;
    drop(payer);

    let outcome = match result {
        Ok(response) => {
            debug!(
                items = batch.items.len(),
                transaction_id = %response.hash,
                "batch paid"
            );
            PaymentOutcome::success(response.hash, batch.items)
        }
        Err(err) => {
            error!(error = %err, "batch submission failed");
            PaymentOutcome::failure(err.reason(), batch.items)
        }
    };
    let _ = outcomes.send(outcome).await;
}

async fn build_and_submit(
    ctx: &SubmitContext,
    batch: &Batch,
    payer: &PayerGuard,
) -> Result<SubmitResponse, SubmitError> {
    // The memo rule can fail without touching the network.
    let memo = batch_memo(ctx, batch)?;

    let account = ctx.horizon.load_account(payer.public_key()).await?;
    let operations: Vec<PaymentOp> = batch
        .items
        .iter()
        .map(|payment| PaymentOp {
            source: ctx.source.public_key().to_string(),
            destination: payment.destination.clone(),
            amount: format_amount(payment.amount),
            asset: payment.asset.clone(),
        })
        .collect();
    let envelope = TransactionEnvelope {
        source_account: account.account_id,
        sequence: account.sequence + 1,
        fee: ctx.base_fee.saturating_mul(operations.len() as u32),
        memo,
        operations,
    };

    let mut signers = vec![ctx.source.clone()];
    if !signers.contains(payer.keypair()) {
        signers.push(payer.keypair().clone());
    }

    let response = ctx.horizon.submit_transaction(&envelope, &signers).await?;
    Ok(response)
}

/// Memo selection per batch.
///
/// A single-item batch carries its own memo when present; the configured
/// default applies to memo-less batches with more than one item, and to
/// single-item ones only when `default_memo_on_single` is set. An item memo
/// inside a multi-item batch means the router misrouted it.
fn batch_memo(ctx: &SubmitContext, batch: &Batch) -> Result<Option<Memo>, SubmitError> {
    if let [only] = batch.items.as_slice() {
        if only.memo.is_some() {
            return Ok(only.memo.clone());
        }
        if ctx.default_memo_on_single {
            return Ok(ctx.default_memo.clone());
        }
        return Ok(None);
    }
    if batch.items.iter().any(|payment| payment.memo.is_some()) {
        return Err(SubmitError::MemoInMultiItemBatch);
    }
    Ok(ctx.default_memo.clone())
}
