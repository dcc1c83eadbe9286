use alloc::string::{String, ToString};
use core::iter;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, ErrorObject, MessageId, VERSION};

/// The mutually-exclusive payload of a response: a result value on success,
/// an error object on failure.
pub type Outcome = core::result::Result<Value, ErrorObject>;

/// A JSON-RPC 2.0 response.
///
/// A well-formed response carries exactly one of `result` and `error`. The
/// constructors enforce that; a decode does not, so malformed-but-parseable
/// payloads stay readable and the validation pass can report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub jsonrpc: String,
    pub result: Option<Value>,
    /// Raw `error` member; bind it with [`error_as`](Self::error_as) or
    /// [`error_as_default`](Self::error_as_default).
    pub error: Option<Value>,
    pub id: MessageId,
    pub unrecognized: Map<String, Value>,
}

impl Response {
    pub fn of<I: Into<MessageId>>(outcome: Outcome, id: I) -> Self {
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(error) => (None, Some(Value::from(error))),
        };

        Self {
            jsonrpc: VERSION.to_string(),
            result,
            error,
            id: id.into(),
            unrecognized: Map::new(),
        }
    }

    pub fn of_result<I: Into<MessageId>>(result: Value, id: I) -> Self {
        Self::of(Ok(result), id)
    }

    pub fn of_error<I: Into<MessageId>>(error: ErrorObject, id: I) -> Self {
        Self::of(Err(error), id)
    }

    /// Present and not JSON null.
    pub fn has_result(&self) -> bool {
        matches!(&self.result, Some(node) if !node.is_null())
    }

    /// Present and not JSON null.
    pub fn has_error(&self) -> bool {
        matches!(&self.error, Some(node) if !node.is_null())
    }

    pub fn has_id(&self) -> bool {
        self.id.has_value()
    }

    pub fn is_version_contextually_valid(&self) -> bool {
        self.jsonrpc == VERSION
    }

    pub fn result_as<T>(&self) -> crate::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match &self.result {
            None | Some(Value::Null) => Ok(None),
            Some(node) => serde_json::from_value(node.clone())
                .map(Some)
                .map_err(|e| Error::Bind {
                    target: "result",
                    cause: e.to_string(),
                }),
        }
    }

    /// Binds the error member as an application-defined error type.
    pub fn error_as<T>(&self) -> crate::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match &self.error {
            None | Some(Value::Null) => Ok(None),
            Some(node) => serde_json::from_value(node.clone())
                .map(Some)
                .map_err(|e| Error::Bind {
                    target: "error",
                    cause: e.to_string(),
                }),
        }
    }

    /// Binds the error member as the protocol's own error object shape.
    pub fn error_as_default(&self) -> crate::Result<Option<ErrorObject>> {
        match &self.error {
            None | Some(Value::Null) => Ok(None),
            Some(node) => ErrorObject::try_from(node).map(Some),
        }
    }

    /// Reads the payload back as the exclusive pair. A result wins when both
    /// members are present; `None` when neither is.
    pub fn outcome(&self) -> crate::Result<Option<Outcome>> {
        if self.has_result() {
            return Ok(self.result.clone().map(Ok));
        }

        match self.error_as_default()? {
            Some(error) => Ok(Some(Err(error))),
            None => Ok(None),
        }
    }
}

impl TryFrom<&Value> for Response {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_object().ok_or(Error::ExpectedObject("response"))?;

        let mut response = Response {
            jsonrpc: String::new(),
            result: None,
            error: None,
            id: MessageId::absent(),
            unrecognized: Map::new(),
        };

        for (name, node) in map {
            match name.as_str() {
                "jsonrpc" => response.jsonrpc = node.as_str().unwrap_or_default().to_string(),
                "result" => response.result = Some(node.clone()),
                "error" => response.error = Some(node.clone()),
                "id" => response.id = MessageId::from(node),

                _ => {
                    response.unrecognized.insert(name.clone(), node.clone());
                }
            }
        }

        Ok(response)
    }
}

impl TryFrom<Value> for Response {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

impl From<&Response> for Value {
    /// Canonical member order `jsonrpc, result, error, id`; absent members
    /// are omitted, then unrecognized members are re-emitted.
    fn from(response: &Response) -> Self {
        let Response {
            jsonrpc,
            result,
            error,
            id,
            unrecognized,
        } = response;

        let map = iter::once(Some((
            "jsonrpc".to_string(),
            Value::String(jsonrpc.clone()),
        )))
        .chain(iter::once(
            result.clone().map(|node| ("result".to_string(), node)),
        ))
        .chain(iter::once(
            error.clone().map(|node| ("error".to_string(), node)),
        ))
        .chain(iter::once(
            id.to_node().map(|node| ("id".to_string(), node)),
        ))
        .flatten()
        .chain(unrecognized.iter().map(|(k, v)| (k.clone(), v.clone())))
        .collect();

        Value::Object(map)
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        Value::from(&response)
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).and_then(|v| Self::try_from(&v).map_err(D::Error::custom))
    }
}
