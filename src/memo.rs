use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest memo text horizon accepts, in bytes.
pub const MAX_MEMO_TEXT_BYTES: usize = 28;

/// Input form of a memo: either a bare string or a `{type, value}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoSpec {
    Text(String),
    Typed {
        r#type: String,
        value: serde_json::Value,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoError {
    #[error("unrecognized memo type `{0}`")]
    UnknownType(String),
    #[error("memo value does not fit type `{0}`")]
    InvalidValue(String),
    #[error("memo text must be 1..=28 bytes of non-blank text")]
    InvalidText,
}

/// A transaction memo, one explicit variant per wire type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Memo {
    Text(String),
    Id(u64),
    Hash(String),
    Return(String),
}

impl Memo {
    /// Total parse of the duck-typed input form. Unrecognized tags are an
    /// explicit error rather than a silently dropped memo.
    pub fn parse(spec: &MemoSpec) -> Result<Self, MemoError> {
        match spec {
            MemoSpec::Text(text) => Memo::text(text),
            MemoSpec::Typed { r#type, value } => {
                let tag = r#type.to_ascii_lowercase();
                match tag.as_str() {
                    "text" | "memo_text" => {
                        let text = value.as_str().ok_or(MemoError::InvalidValue(tag))?;
                        Memo::text(text)
                    }
                    "id" | "memo_id" => {
                        let id = match value {
                            serde_json::Value::Number(n) => n.as_u64(),
                            serde_json::Value::String(s) => s.parse().ok(),
                            _ => None,
                        };
                        id.map(Memo::Id).ok_or(MemoError::InvalidValue(tag))
                    }
                    "hash" | "memo_hash" => value
                        .as_str()
                        .map(|s| Memo::Hash(s.to_string()))
                        .ok_or(MemoError::InvalidValue(tag)),
                    "return" | "memo_return" => value
                        .as_str()
                        .map(|s| Memo::Return(s.to_string()))
                        .ok_or(MemoError::InvalidValue(tag)),
                    _ => Err(MemoError::UnknownType(r#type.clone())),
                }
            }
        }
    }

    /// Builds a text memo, enforcing the byte-length and non-blank rule.
    pub fn text(text: &str) -> Result<Self, MemoError> {
        if has_valid_memo_text_size(text) {
            Ok(Memo::Text(text.to_string()))
        } else {
            Err(MemoError::InvalidText)
        }
    }
}

/// 1..=28 bytes and not all whitespace.
pub fn has_valid_memo_text_size(text: &str) -> bool {
    !text.trim().is_empty() && text.len() <= MAX_MEMO_TEXT_BYTES
}
