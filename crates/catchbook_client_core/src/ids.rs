//! Line identifiers. Opaque strings on the wire: lines created here get a fresh
//! UUID v4, lines loaded from the backend keep whatever id they were stored with.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineId(String);

impl LineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for LineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<LineId> for String {
    fn from(id: LineId) -> Self {
        id.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for LineId {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&self.0)
    }
}

// Numeric ids and blanks show up in hand-edited sheets; both still identify a line.
impl<'de> Deserialize<'de> for LineId {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(de)?;
        Ok(match value {
            serde_json::Value::String(s) if !s.is_empty() => Self(s),
            serde_json::Value::Number(n) => Self(n.to_string()),
            _ => Self::new(),
        })
    }
}
