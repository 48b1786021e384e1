use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use stellar_batch_pay::error::{LedgerError, ResolveError, ResultCodes};
use stellar_batch_pay::federation::{AddressResolver, Resolved};
use stellar_batch_pay::horizon::{AccountState, HorizonClient, SubmitResponse, TransactionEnvelope};
use stellar_batch_pay::keypair::Keypair;
use stellar_batch_pay::payment::RawPayment;
use stellar_strkey::ed25519::{PrivateKey, PublicKey};

/// Logging for test debugging; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn secret(seed: u8) -> String {
    PrivateKey([seed; 32]).to_string()
}

pub fn account(seed: u8) -> String {
    PublicKey([seed; 32]).to_string()
}

pub fn payment(destination: &str, amount: rust_decimal::Decimal) -> RawPayment {
    RawPayment {
        destination: destination.to_string(),
        amount,
        asset: None,
        memo: None,
    }
}

#[derive(Debug)]
pub struct SubmittedTx {
    pub envelope: TransactionEnvelope,
    pub signer_keys: Vec<String>,
    pub hash: Option<String>,
}

/// In-memory stand-in for the ledger collaborator.
///
/// Tracks per-account sequence counters the way horizon would: a submission
/// must consume exactly `sequence + 1`, and two concurrent submissions from
/// one account are a race. Also records a high-water mark of concurrent
/// submissions so tests can assert the pool bound.
pub struct MockHorizon {
    sequences: Mutex<HashMap<String, i64>>,
    pub submitted: Mutex<Vec<SubmittedTx>>,
    in_flight_accounts: Mutex<HashSet<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub sequence_races: AtomicUsize,
    fail_destinations: Mutex<HashSet<String>>,
    hash_counter: AtomicUsize,
    delay: Duration,
}

impl MockHorizon {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(0))
    }

    /// A per-submission delay forces submissions to overlap in time.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            sequences: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            in_flight_accounts: Mutex::new(HashSet::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            sequence_races: AtomicUsize::new(0),
            fail_destinations: Mutex::new(HashSet::new()),
            hash_counter: AtomicUsize::new(0),
            delay,
        }
    }

    /// Any transaction paying one of these destinations gets rejected with
    /// structured result codes.
    pub fn fail_payments_to(&self, destination: &str) {
        self.fail_destinations
            .lock()
            .unwrap()
            .insert(destination.to_string());
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl HorizonClient for MockHorizon {
    async fn load_account(&self, account_id: &str) -> Result<AccountState, LedgerError> {
        let mut sequences = self.sequences.lock().unwrap();
        let sequence = *sequences.entry(account_id.to_string()).or_insert(1000);
        Ok(AccountState {
            account_id: account_id.to_string(),
            sequence,
        })
    }

    async fn submit_transaction(
        &self,
        envelope: &TransactionEnvelope,
        signers: &[Keypair],
    ) -> Result<SubmitResponse, LedgerError> {
        {
            let mut accounts = self.in_flight_accounts.lock().unwrap();
            if !accounts.insert(envelope.source_account.clone()) {
                self.sequence_races.fetch_add(1, Ordering::SeqCst);
                return Err(LedgerError::Network(
                    "concurrent submission for one source account".into(),
                ));
            }
        }
        let concurrent = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(concurrent, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = self.finish(envelope, signers);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.in_flight_accounts
            .lock()
            .unwrap()
            .remove(&envelope.source_account);
        result
    }
}

impl MockHorizon {
    fn finish(
        &self,
        envelope: &TransactionEnvelope,
        signers: &[Keypair],
    ) -> Result<SubmitResponse, LedgerError> {
        let signer_keys: Vec<String> = signers
            .iter()
            .map(|s| s.public_key().to_string())
            .collect();

        {
            let fail = self.fail_destinations.lock().unwrap();
            if envelope
                .operations
                .iter()
                .any(|op| fail.contains(&op.destination))
            {
                self.submitted.lock().unwrap().push(SubmittedTx {
                    envelope: envelope.clone(),
                    signer_keys,
                    hash: None,
                });
                return Err(LedgerError::Rejected(ResultCodes {
                    transaction: "tx_failed".into(),
                    operations: vec!["op_underfunded".into()],
                }));
            }
        }

        {
            let mut sequences = self.sequences.lock().unwrap();
            let sequence = sequences
                .entry(envelope.source_account.clone())
                .or_insert(1000);
            if envelope.sequence != *sequence + 1 {
                return Err(LedgerError::Rejected(ResultCodes {
                    transaction: "tx_bad_seq".into(),
                    operations: Vec::new(),
                }));
            }
            *sequence = envelope.sequence;
        }

        let hash = format!("tx-{:04}", self.hash_counter.fetch_add(1, Ordering::SeqCst));
        self.submitted.lock().unwrap().push(SubmittedTx {
            envelope: envelope.clone(),
            signer_keys,
            hash: Some(hash.clone()),
        });
        Ok(SubmitResponse { hash })
    }
}

/// In-memory federation server.
pub struct MockResolver {
    entries: Mutex<HashMap<String, Resolved>>,
    pub calls: AtomicUsize,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn register(&self, address: &str, resolved: Resolved) {
        self.entries
            .lock()
            .unwrap()
            .insert(address.to_string(), resolved);
    }
}

#[async_trait]
impl AddressResolver for MockResolver {
    async fn resolve(&self, address: &str) -> Result<Resolved, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| ResolveError::Lookup(format!("no federation record for {address}")))
    }
}
