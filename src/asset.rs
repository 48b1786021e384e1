use crate::keypair::Keypair;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved asset code for the ledger's native asset.
pub const NATIVE_CODE: &str = "XLM";

/// Input form of an asset, as it appears on payment records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("asset code must be 1..=12 alphanumeric characters")]
    InvalidCode,
    #[error("issued asset requires a valid issuer account")]
    InvalidIssuer,
}

/// A payment asset: the native lumen or an issued `code:issuer` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Native,
    Issued { code: String, issuer: String },
}

impl Asset {
    /// Total parse from the record form. A missing spec means native, and the
    /// reserved code `XLM` (any case) means native regardless of issuer.
    pub fn parse(spec: Option<&AssetSpec>) -> Result<Self, AssetError> {
        let Some(spec) = spec else {
            return Ok(Asset::Native);
        };
        if spec.code.eq_ignore_ascii_case(NATIVE_CODE) {
            return Ok(Asset::Native);
        }
        let code_ok = !spec.code.is_empty()
            && spec.code.len() <= 12
            && spec.code.bytes().all(|b| b.is_ascii_alphanumeric());
        if !code_ok {
            return Err(AssetError::InvalidCode);
        }
        match &spec.issuer {
            Some(issuer) if Keypair::is_valid_public_key(issuer) => Ok(Asset::Issued {
                code: spec.code.clone(),
                issuer: issuer.clone(),
            }),
            _ => Err(AssetError::InvalidIssuer),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Issued { code, issuer } => write!(f, "{code}:{issuer}"),
        }
    }
}

impl std::str::FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "native" || s.eq_ignore_ascii_case(NATIVE_CODE) {
            return Ok(Asset::Native);
        }
        let (code, issuer) = s.split_once(':').ok_or(AssetError::InvalidCode)?;
        Asset::parse(Some(&AssetSpec {
            code: code.to_string(),
            issuer: Some(issuer.to_string()),
        }))
    }
}
