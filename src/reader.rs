use crate::asset::AssetSpec;
use crate::memo::MemoSpec;
use crate::payment::RawPayment;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One CSV row. Asset and memo arrive flattened into optional columns.
#[derive(Debug, Deserialize)]
struct CsvPayment {
    destination: String,
    amount: Decimal,
    #[serde(default)]
    asset_code: Option<String>,
    #[serde(default)]
    asset_issuer: Option<String>,
    #[serde(default)]
    memo_type: Option<String>,
    #[serde(default)]
    memo: Option<String>,
}

impl From<CsvPayment> for RawPayment {
    fn from(row: CsvPayment) -> Self {
        let asset = row.asset_code.filter(|code| !code.is_empty()).map(|code| AssetSpec {
            code,
            issuer: row.asset_issuer.filter(|issuer| !issuer.is_empty()),
        });
        let memo = match (row.memo_type.filter(|t| !t.is_empty()), row.memo) {
            (Some(r#type), Some(value)) => Some(MemoSpec::Typed {
                r#type,
                value: serde_json::Value::String(value),
            }),
            // A bare memo column is treated as memo text.
            (None, Some(value)) if !value.is_empty() => Some(MemoSpec::Text(value)),
            _ => None,
        };
        RawPayment {
            destination: row.destination,
            amount: row.amount,
            asset,
            memo,
        }
    }
}

/// Reads payment records from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// and yields records lazily so large files stream without loading fully
/// into memory.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a reader from any `Read` source (e.g. File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Iterator over `Result<RawPayment>`; malformed rows surface as errors
    /// without stopping the iteration.
    pub fn payments(self) -> impl Iterator<Item = Result<RawPayment, ReadError>> {
        self.reader
            .into_deserialize::<CsvPayment>()
            .map(|row| row.map(RawPayment::from).map_err(ReadError::from))
    }
}
