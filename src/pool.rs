use crate::keypair::Keypair;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

/// Fixed set of fee-paying signers gating submission concurrency.
///
/// `acquire` hands out a payer immediately when one is idle, otherwise the
/// caller suspends; waiters are served first-in-first-out (the semaphore is
/// fair). At most `size` payers are checked out at any instant, which caps
/// concurrent submissions and keeps each account's sequence counter consumed
/// by a single in-flight transaction.
#[derive(Clone)]
pub struct PayerPool {
    inner: Arc<PoolInner>,
    size: usize,
}

struct PoolInner {
    idle: Mutex<VecDeque<Keypair>>,
    permits: Arc<Semaphore>,
}

impl PayerPool {
    /// Builds a pool over a non-empty set of payer credentials.
    pub fn new(payers: Vec<Keypair>) -> Self {
        assert!(!payers.is_empty(), "payer pool requires at least one payer");
        let size = payers.len();
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(payers.into()),
                permits: Arc::new(Semaphore::new(size)),
            }),
            size,
        }
    }

    /// Hard upper bound on concurrently checked-out payers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks out a payer, suspending until one is released if all are in
    /// flight. Dropping the guard releases the payer, so release happens
    /// exactly once on every exit path.
    pub async fn acquire(&self) -> PayerGuard {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .expect("payer pool semaphore is never closed");
        let payer = self
            .inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .expect("permit held without an idle payer");
        debug!(payer = payer.public_key(), "locking payer");
        PayerGuard {
            payer: Some(payer),
            inner: Arc::clone(&self.inner),
            permit: Some(permit),
        }
    }

    /// Idle payers right now; only meaningful for diagnostics.
    pub fn idle_len(&self) -> usize {
        self.inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A checked-out payer. Returns itself to the pool on drop and wakes the
/// longest-waiting `acquire`, if any.
pub struct PayerGuard {
    payer: Option<Keypair>,
    inner: Arc<PoolInner>,
    permit: Option<OwnedSemaphorePermit>,
}

impl PayerGuard {
    pub fn keypair(&self) -> &Keypair {
        self.payer
            .as_ref()
            .expect("payer present until the guard drops")
    }

    pub fn public_key(&self) -> &str {
        self.keypair().public_key()
    }
}

impl Drop for PayerGuard {
    fn drop(&mut self) {
        if let Some(payer) = self.payer.take() {
            debug!(payer = payer.public_key(), "releasing payer");
            self.inner
                .idle
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(payer);
        }
        // The payer is back in the idle set before a waiter can wake.
        self.permit.take();
    }
}
