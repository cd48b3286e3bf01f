//! The replayable log of everything applied to a brain since the last clear.
//!
//! A saved calculator is nothing more than this log: restoring means clearing
//! a brain and feeding the entries back in order. The JSON encoding is
//! versioned so a log kept by the host (for example in an Android saved
//! instance bundle) can be rejected cleanly if the layout ever changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const PROGRAM_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("malformed program json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("program json has no version")]
    MissingVersion,
    #[error("unsupported program version {0}")]
    UnsupportedVersion(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProgramEntry {
    Operand(#[serde(with = "lenient_f64")] f64),
    /// A key symbol exactly as it was pressed, recognised or not.
    Operation(String),
    /// A random draw, stored with the value it produced.
    Random(f64),
}

impl From<f64> for ProgramEntry {
    fn from(value: f64) -> Self {
        ProgramEntry::Operand(value)
    }
}

impl From<&str> for ProgramEntry {
    fn from(symbol: &str) -> Self {
        ProgramEntry::Operation(symbol.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program(Vec<ProgramEntry>);

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    entries: &'a [ProgramEntry],
}

impl Program {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn entries(&self) -> &[ProgramEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProgramEntry> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, entry: ProgramEntry) {
        self.0.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub fn to_json(&self) -> Result<String, ProgramError> {
        let envelope = EnvelopeRef {
            version: PROGRAM_FORMAT_VERSION,
            entries: &self.0,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProgramError> {
        let mut envelope: Value = serde_json::from_str(json)?;
        let version = envelope
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(ProgramError::MissingVersion)?;
        if version != u64::from(PROGRAM_FORMAT_VERSION) {
            return Err(ProgramError::UnsupportedVersion(version));
        }
        let entries = envelope
            .get_mut("entries")
            .map(Value::take)
            .unwrap_or_else(|| Value::Array(Vec::new()));
        Ok(Self(serde_json::from_value(entries)?))
    }
}

impl FromIterator<ProgramEntry> for Program {
    fn from_iter<I: IntoIterator<Item = ProgramEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Program {
    type Item = ProgramEntry;
    type IntoIter = std::vec::IntoIter<ProgramEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a ProgramEntry;
    type IntoIter = std::slice::Iter<'a, ProgramEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Operands may be infinite or NaN after a division by zero is typed back
/// in; JSON has no literal for those, so they travel as strings.
mod lenient_f64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(de::Error::custom(format!("invalid operand `{other}`"))),
            },
        }
    }
}
