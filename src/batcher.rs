use crate::payment::{PaymentOutcome, PaymentRequest};
use crate::validator::Checked;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Error string on the aggregate outcome collecting invalid records.
pub const INVALID_DATA_ERROR: &str = "invalid data";

/// An ordered group of payments sharing one transaction.
///
/// A memo-bearing batch holds exactly one item; memo-less batches hold up to
/// the configured batch size.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Batch {
    pub items: Vec<PaymentRequest>,
    pub has_memo: bool,
}

/// Spawns the router stage.
///
/// Memo-bearing payments leave immediately as single-item batches; memo-less
/// payments buffer and flush at `batch_size` or at end of input. Invalid
/// records accumulate into one aggregate failure outcome, emitted at the end
/// only if any exist. The `batches` channel should be shallow so a ready
/// batch blocks further intake until the submitter accepts it.
pub(crate) fn spawn_router(
    batch_size: usize,
    mut input: mpsc::Receiver<Checked>,
    batches: mpsc::Sender<Batch>,
    outcomes: mpsc::Sender<PaymentOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(batch_size, "building payment batches");
        let mut buffer: Vec<PaymentRequest> = Vec::with_capacity(batch_size);
        let mut invalid: Vec<PaymentRequest> = Vec::new();

        while let Some(checked) = input.recv().await {
            match checked {
                Checked::Invalid(request) => invalid.push(request),
                Checked::Valid(request) if request.has_memo() => {
                    let batch = Batch {
                        items: vec![request],
                        has_memo: true,
                    };
                    if batches.send(batch).await.is_err() {
                        return;
                    }
                }
                Checked::Valid(request) => {
                    buffer.push(request);
                    if buffer.len() == batch_size {
                        let batch = Batch {
                            items: std::mem::replace(
                                &mut buffer,
                                Vec::with_capacity(batch_size),
                            ),
                            has_memo: false,
                        };
                        if batches.send(batch).await.is_err() {
                            return;
                        }
                    }
                }
            }
        }

        if !buffer.is_empty() {
            let batch = Batch {
                items: buffer,
                has_memo: false,
            };
            if batches.send(batch).await.is_err() {
                return;
            }
        }

        if !invalid.is_empty() {
            debug!(count = invalid.len(), "tagging invalid payment records");
            let _ = outcomes
                .send(PaymentOutcome::failure(INVALID_DATA_ERROR.to_string(), invalid))
                .await;
        }
    })
}
