use crate::asset::{Asset, AssetSpec};
use crate::memo::{Memo, MemoSpec};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Most fractional digits a ledger amount can carry.
pub const MAX_AMOUNT_SCALE: u32 = 7;

/// A payment record as it arrives from the caller or an ingestion adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPayment {
    /// Raw `G...` account key or `name*domain` federated address.
    pub destination: String,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<MemoSpec>,
}

impl RawPayment {
    /// Parses a serialized JSON record, the other input shape the pipeline
    /// accepts besides already-structured values.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// A normalized payment flowing through the pipeline. Validation enriches the
/// record in place: federated destinations are replaced by resolved account
/// keys and memos are reduced to their tagged form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub destination: String,
    pub amount: Decimal,
    pub asset: Asset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<Memo>,
}

impl PaymentRequest {
    pub fn has_memo(&self) -> bool {
        self.memo.is_some()
    }
}

/// Terminal outcome of one submission attempt, or the single aggregate of all
/// invalid records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentOutcome {
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub items: Vec<PaymentRequest>,
}

impl PaymentOutcome {
    pub(crate) fn success(transaction_id: String, items: Vec<PaymentRequest>) -> Self {
        Self {
            transaction_id: Some(transaction_id),
            error: None,
            items,
        }
    }

    pub(crate) fn failure(error: String, items: Vec<PaymentRequest>) -> Self {
        Self {
            transaction_id: None,
            error: Some(error),
            items,
        }
    }

    pub fn is_success(&self) -> bool {
        self.transaction_id.is_some()
    }
}

/// Positive and within the ledger's fractional precision.
pub fn is_valid_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && amount.normalize().scale() <= MAX_AMOUNT_SCALE
}

/// Renders an amount the way horizon expects it, trailing zeroes stripped.
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_must_be_positive() {
        assert!(is_valid_amount(dec!(0.0000001)));
        assert!(is_valid_amount(dec!(100)));
        assert!(!is_valid_amount(dec!(0)));
        assert!(!is_valid_amount(dec!(-1)));
    }

    #[test]
    fn amount_precision_is_bounded() {
        assert!(is_valid_amount(dec!(1.1234567)));
        assert!(!is_valid_amount(dec!(1.12345678)));
        // Trailing zeroes do not count against the precision budget.
        assert!(is_valid_amount(dec!(1.1000000000)));
    }

    #[test]
    fn amounts_format_normalized() {
        assert_eq!(format_amount(dec!(1.50)), "1.5");
        assert_eq!(format_amount(dec!(100)), "100");
        assert_eq!(format_amount(dec!(0.0000001)), "0.0000001");
    }

    #[test]
    fn raw_payment_parses_from_json() {
        let raw = RawPayment::from_json(
            br#"{"destination": "bob*stellar.org", "amount": "12.5", "memo": "thanks"}"#,
        )
        .unwrap();
        assert_eq!(raw.destination, "bob*stellar.org");
        assert_eq!(raw.amount, dec!(12.5));
        assert_eq!(raw.memo, Some(MemoSpec::Text("thanks".into())));
        assert!(raw.asset.is_none());
    }

    #[test]
    fn raw_payment_rejects_garbage() {
        assert!(RawPayment::from_json(b"not json").is_err());
        assert!(RawPayment::from_json(br#"{"amount": "1"}"#).is_err());
    }
}
