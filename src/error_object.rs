use alloc::string::{String, ToString};
use core::{fmt, iter};

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Params};

/// Error codes reserved by the JSON-RPC 2.0 specification.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    /// Server-defined errors live in `SERVER_ERROR_MIN..=SERVER_ERROR_MAX`.
    pub const SERVER_ERROR_MIN: i64 = -32099;
    pub const SERVER_ERROR_MAX: i64 = -32000;
}

/// The `error` member of a response: `{code, message, data}`.
///
/// `code` is kept as the raw JSON node so a float-tagged encoding such as
/// `-32601.0` stays observable; `data` follows the same shape and conversion
/// contract as request params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorObject {
    pub code: Value,
    pub message: String,
    pub data: Params,
    pub unrecognized: Map<String, Value>,
}

impl ErrorObject {
    pub fn new<M: Into<String>>(code: i64, message: M) -> Self {
        Self {
            code: Value::Number(code.into()),
            message: message.into(),
            data: Params::absent(),
            unrecognized: Map::new(),
        }
    }

    pub fn parse_error() -> Self {
        Self::new(codes::PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(codes::INVALID_REQUEST, "Invalid request")
    }

    pub fn method_not_found() -> Self {
        Self::new(codes::METHOD_NOT_FOUND, "Method not found")
    }

    pub fn invalid_params() -> Self {
        Self::new(codes::INVALID_PARAMS, "Invalid params")
    }

    pub fn internal_error() -> Self {
        Self::new(codes::INTERNAL_ERROR, "Internal error")
    }

    /// Codes outside the reserved server range are clamped into it.
    pub fn server_error(code: i64) -> Self {
        Self::new(
            code.clamp(codes::SERVER_ERROR_MIN, codes::SERVER_ERROR_MAX),
            "Server error",
        )
    }

    pub fn with_message<M: Into<String>>(mut self, message: M) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_data(mut self, data: Params) -> Self {
        self.data = data;
        self
    }

    /// Present and not JSON null.
    pub fn has_data(&self) -> bool {
        self.data.is_present() && !self.data.is_null()
    }

    pub fn code_as_i64(&self) -> crate::Result<i64> {
        match &self.code {
            Value::Number(n) => n.as_i64().ok_or(Error::ExpectedIntegerCode),
            _ => Err(Error::ExpectedIntegerCode),
        }
    }

    /// True only for integer-tagged JSON numbers; `-32601.0` fails even
    /// though its value is integral.
    pub fn is_code_contextually_valid(&self) -> bool {
        matches!(&self.code, Value::Number(n) if n.is_i64() || n.is_u64())
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorObject {}

impl TryFrom<&Value> for ErrorObject {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_object().ok_or(Error::ExpectedObject("error object"))?;

        let mut error = ErrorObject {
            code: Value::Null,
            message: String::new(),
            data: Params::absent(),
            unrecognized: Map::new(),
        };

        for (name, node) in map {
            match name.as_str() {
                "code" => error.code = node.clone(),

                "message" => {
                    error.message = node
                        .as_str()
                        .ok_or(Error::ExpectedTextErrorMessage)?
                        .to_string()
                }

                // any shape is legal here, including a bare scalar
                "data" => error.data = Params::from_node(node),

                _ => {
                    error.unrecognized.insert(name.clone(), node.clone());
                }
            }
        }

        Ok(error)
    }
}

impl TryFrom<Value> for ErrorObject {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

impl From<&ErrorObject> for Value {
    /// Canonical member order `code, message, data`; `data` is omitted when
    /// absent, then unrecognized members are re-emitted.
    fn from(error: &ErrorObject) -> Self {
        let ErrorObject {
            code,
            message,
            data,
            unrecognized,
        } = error;

        let map = iter::once(Some(("code".to_string(), code.clone())))
            .chain(iter::once(Some((
                "message".to_string(),
                Value::String(message.clone()),
            ))))
            .chain(iter::once(
                data.to_node().map(|node| ("data".to_string(), node)),
            ))
            .flatten()
            .chain(unrecognized.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect();

        Value::Object(map)
    }
}

impl From<ErrorObject> for Value {
    fn from(error: ErrorObject) -> Self {
        Value::from(&error)
    }
}

impl Serialize for ErrorObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorObject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).and_then(|v| Self::try_from(&v).map_err(D::Error::custom))
    }
}
