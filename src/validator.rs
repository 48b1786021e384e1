use crate::asset::Asset;
use crate::federation::{AddressResolver, is_federated_address};
use crate::keypair::Keypair;
use crate::memo::Memo;
use crate::payment::{PaymentRequest, RawPayment, is_valid_amount};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use tracing::debug;

/// Validator output: every input record comes out exactly once, either
/// enriched or tagged invalid.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Checked {
    Valid(PaymentRequest),
    Invalid(PaymentRequest),
}

/// Spawns the validation stage.
///
/// Records with raw destinations pass through synchronously; federated
/// addresses resolve concurrently, at most `concurrency` lookups in flight.
/// Emission order is unspecified across records.
pub(crate) fn spawn_validator(
    resolver: Arc<dyn AddressResolver>,
    concurrency: usize,
    mut input: mpsc::Receiver<RawPayment>,
    output: mpsc::Sender<Checked>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("validating payment records");
        let lookups = Arc::new(Semaphore::new(concurrency));
        let mut pending = JoinSet::new();

        while let Some(raw) = input.recv().await {
            match normalize(raw) {
                Normalized::Done(checked) => {
                    if output.send(checked).await.is_err() {
                        return;
                    }
                }
                Normalized::NeedsResolution(request, address) => {
                    // Permit taken before the spawn: a saturated lookup set
                    // stalls intake here rather than queueing tasks.
                    let permit = Arc::clone(&lookups)
                        .acquire_owned()
                        .await
                        .expect("lookup semaphore is never closed");
                    let resolver = Arc::clone(&resolver);
                    let output = output.clone();
                    pending.spawn(async move {
                        let _permit = permit;
                        let checked = resolve_destination(&*resolver, request, &address).await;
                        let _ = output.send(checked).await;
                    });
                }
            }
        }

        while pending.join_next().await.is_some() {}
    })
}

enum Normalized {
    Done(Checked),
    /// Valid so far, pending an address lookup for the carried address.
    NeedsResolution(PaymentRequest, String),
}

/// Applies the synchronous rules: malformed memos default to none, the asset
/// spec must parse, the amount must be positive within precision, and the
/// destination must be a raw key or a federated address.
fn normalize(raw: RawPayment) -> Normalized {
    let memo = raw
        .memo
        .as_ref()
        .and_then(|spec| Memo::parse(spec).ok());
    let asset = Asset::parse(raw.asset.as_ref());
    let request = PaymentRequest {
        destination: raw.destination,
        amount: raw.amount,
        asset: asset.clone().unwrap_or(Asset::Native),
        memo,
    };

    if asset.is_err() || !is_valid_amount(request.amount) {
        return Normalized::Done(Checked::Invalid(request));
    }
    if Keypair::is_valid_public_key(&request.destination) {
        return Normalized::Done(Checked::Valid(request));
    }
    if is_federated_address(&request.destination) {
        let address = request.destination.clone();
        return Normalized::NeedsResolution(request, address);
    }
    Normalized::Done(Checked::Invalid(request))
}

async fn resolve_destination(
    resolver: &dyn AddressResolver,
    mut request: PaymentRequest,
    address: &str,
) -> Checked {
    match resolver.resolve(address).await {
        Ok(resolved) if Keypair::is_valid_public_key(&resolved.account_id) => {
            debug!(address, account = %resolved.account_id, "resolved federated address");
            request.destination = resolved.account_id;
            // A memo attached by the federation server wins over the record's.
            if resolved.memo.is_some() {
                request.memo = resolved.memo;
            }
            Checked::Valid(request)
        }
        Ok(resolved) => {
            debug!(address, account = %resolved.account_id, "resolved account id is malformed");
            Checked::Invalid(request)
        }
        Err(err) => {
            debug!(address, error = %err, "federation lookup failed");
            Checked::Invalid(request)
        }
    }
}
