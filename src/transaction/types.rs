/// Transaction payload types for PowLedger
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// The payload carried by every non-genesis record.
///
/// Field declaration order matches the lexicographic order of the serialized
/// keys (`amount`, `from`, `to`), so the serde form and the canonical encoding
/// agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub amount: f64,
    #[serde(rename = "from")]
    pub sender: String,
    #[serde(rename = "to")]
    pub receiver: String,
}

impl Transfer {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            amount,
            sender: sender.into(),
            receiver: receiver.into(),
        }
    }

    /// Deterministic JSON encoding used as hash input.
    ///
    /// Keys are emitted in a fixed lexicographic order and strings are escaped
    /// with JSON rules. A non-finite amount has no JSON number form and is
    /// written as `null`, so `inf`, `-inf` and `NaN` all encode alike; the
    /// ledger only expects finite amounts.
    pub fn canonical_json(&self) -> String {
        let amount = Number::from_f64(self.amount)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "null".to_string());
        format!(
            "{{\"amount\":{},\"from\":{},\"to\":{}}}",
            amount,
            Value::String(self.sender.clone()),
            Value::String(self.receiver.clone())
        )
    }
}

/// Canonical payload encoding for a record. Genesis has no payload and encodes
/// as `null`.
pub fn canonical_payload(payload: Option<&Transfer>) -> String {
    match payload {
        Some(tx) => tx.canonical_json(),
        None => "null".to_string(),
    }
}
