use alloc::string::{String, ToString};
use core::fmt;

use serde_json::{Number, Value};

use crate::{Error, Result};

/// The `id` member of a request or response.
///
/// Wraps the raw JSON node so that absence, an explicit null, and invalid
/// shapes all survive a decode and are reported by
/// [`is_contextually_valid`](Self::is_contextually_valid) instead of failing
/// the decode. A message with no id at all is a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageId {
    node: Option<Value>,
}

impl MessageId {
    pub const fn absent() -> Self {
        Self { node: None }
    }

    pub const fn null() -> Self {
        Self {
            node: Some(Value::Null),
        }
    }

    /// True iff the member is present at all, even as an explicit JSON null.
    pub fn has_value(&self) -> bool {
        self.node.is_some()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node, Some(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.node.as_ref()
    }

    /// Absent, null, textual, and integer-tagged numeric ids are valid;
    /// booleans, arrays, objects, and float-tagged numbers are not.
    pub fn is_contextually_valid(&self) -> bool {
        match &self.node {
            None | Some(Value::Null) | Some(Value::String(_)) => true,
            Some(Value::Number(n)) => n.is_i64() || n.is_u64(),
            Some(_) => false,
        }
    }

    /// Stringifies any scalar id; `None` when absent, null, or non-scalar.
    pub fn as_string(&self) -> Option<String> {
        match &self.node {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric ids convert directly; textual ids are parsed as a number so
    /// that an id serialized as `"1"` still binds.
    pub fn as_f64(&self) -> Result<f64> {
        match &self.node {
            Some(Value::Number(n)) => n.as_f64().ok_or(Error::NumberOutOfRange("f64")),
            Some(Value::String(s)) => s.trim().parse().map_err(|e: core::num::ParseFloatError| {
                Error::Bind {
                    target: "id as f64",
                    cause: e.to_string(),
                }
            }),
            _ => Err(Error::UnsupportedIdShape),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match &self.node {
            Some(Value::Number(n)) => n.as_i64().ok_or(Error::NumberOutOfRange("i64")),
            Some(Value::String(s)) => {
                s.trim()
                    .parse()
                    .map_err(|e: core::num::ParseIntError| Error::Bind {
                        target: "id as i64",
                        cause: e.to_string(),
                    })
            }
            _ => Err(Error::UnsupportedIdShape),
        }
    }

    pub fn as_i32(&self) -> Result<i32> {
        let n = self.as_i64()?;

        i32::try_from(n).map_err(|_| Error::NumberOutOfRange("i32"))
    }

    /// Resets to the absent state; the member will be omitted on encode.
    pub fn clear(&mut self) {
        self.node = None;
    }

    pub(crate) fn to_node(&self) -> Option<Value> {
        self.node.clone()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            None => f.write_str("(absent)"),
            Some(node) => write!(f, "{}", node),
        }
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self {
            node: Some(Value::String(s.to_string())),
        }
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self {
            node: Some(Value::String(s)),
        }
    }
}

impl From<i64> for MessageId {
    fn from(n: i64) -> Self {
        Self {
            node: Some(Value::Number(n.into())),
        }
    }
}

impl From<i32> for MessageId {
    fn from(n: i32) -> Self {
        Self::from(n as i64)
    }
}

impl From<f64> for MessageId {
    /// Non-finite values cannot be represented as JSON and clear to absent.
    fn from(n: f64) -> Self {
        Self {
            node: Number::from_f64(n).map(Value::Number),
        }
    }
}

impl From<&Value> for MessageId {
    fn from(node: &Value) -> Self {
        Self {
            node: Some(node.clone()),
        }
    }
}

impl From<Value> for MessageId {
    fn from(node: Value) -> Self {
        Self { node: Some(node) }
    }
}
