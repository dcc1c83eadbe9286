use alloc::string::{String, ToString};
use core::iter;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, MessageId, Params, VERSION};

/// A JSON-RPC 2.0 request. A request without an `id` member is a
/// notification and never receives a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    pub params: Params,
    pub id: MessageId,
    /// Members not part of the request schema, preserved verbatim so the
    /// message re-encodes to the payload it was decoded from.
    pub unrecognized: Map<String, Value>,
}

impl Request {
    pub fn new<M: Into<String>>(method: M) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            method: method.into(),
            params: Params::absent(),
            id: MessageId::absent(),
            unrecognized: Map::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_id<I: Into<MessageId>>(mut self, id: I) -> Self {
        self.id = id.into();
        self
    }

    pub fn has_id(&self) -> bool {
        self.id.has_value()
    }

    pub fn is_notification(&self) -> bool {
        !self.has_id()
    }

    /// Method names prefixed with `rpc.` are reserved by the protocol.
    pub fn is_method_reserved_for_internal_use(&self) -> bool {
        self.method.starts_with("rpc.")
    }

    pub fn is_method_contextually_valid(&self) -> bool {
        !self.method.is_empty() && !self.is_method_reserved_for_internal_use()
    }

    pub fn is_version_contextually_valid(&self) -> bool {
        self.jsonrpc == VERSION
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new("")
    }
}

impl TryFrom<&Value> for Request {
    type Error = Error;

    /// Decodes leniently: shape mismatches that make field access
    /// meaningless fail here, everything else is captured for the
    /// validation pass to report.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_object().ok_or(Error::ExpectedObject("request"))?;

        let mut request = Request::new("");

        request.jsonrpc = String::new();

        for (name, node) in map {
            match name.as_str() {
                "jsonrpc" => request.jsonrpc = node.as_str().unwrap_or_default().to_string(),

                "method" => {
                    request.method = node.as_str().ok_or(Error::ExpectedTextMethod)?.to_string()
                }

                "params" => match node {
                    Value::Null | Value::Array(_) | Value::Object(_) => {
                        request.params = Params::from_node(node)
                    }
                    _ => return Err(Error::ExpectedStructuredParams),
                },

                "id" => request.id = MessageId::from(node),

                _ => {
                    request.unrecognized.insert(name.clone(), node.clone());
                }
            }
        }

        Ok(request)
    }
}

impl TryFrom<Value> for Request {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

impl From<&Request> for Value {
    /// Canonical member order `jsonrpc, method, params, id`; absent members
    /// are omitted entirely, then unrecognized members are re-emitted.
    fn from(request: &Request) -> Self {
        let Request {
            jsonrpc,
            method,
            params,
            id,
            unrecognized,
        } = request;

        let map = iter::once(Some((
            "jsonrpc".to_string(),
            Value::String(jsonrpc.clone()),
        )))
        .chain(iter::once(Some((
            "method".to_string(),
            Value::String(method.clone()),
        ))))
        .chain(iter::once(
            params.to_node().map(|node| ("params".to_string(), node)),
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

impl From<Request> for Value {
    fn from(request: Request) -> Self {
        Value::from(&request)
    }
}

impl Serialize for Request {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Value::deserialize(deserializer).and_then(|v| Self::try_from(&v).map_err(D::Error::custom))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_a_positional_request() {
        let payload = json!({"jsonrpc": "2.0", "method": "subtract", "params": [42, 23], "id": 1});

        let request = Request::try_from(&payload).unwrap();

        assert_eq!(request.method, "subtract");
        assert_eq!(
            request.params.as_typed_array::<i32>().unwrap(),
            Some(alloc::vec![42, 23])
        );
        assert_eq!(request.id.as_i32(), Ok(1));
        assert!(!request.is_notification());
    }

    #[test]
    fn request_without_id_is_a_notification() {
        let payload = json!({"jsonrpc": "2.0", "method": "update", "params": [1, 2, 3, 4, 5]});

        let request = Request::try_from(&payload).unwrap();

        assert!(request.is_notification());
        assert_eq!(
            request.params.as_typed_array::<i32>().unwrap(),
            Some(alloc::vec![1, 2, 3, 4, 5])
        );
    }

    #[test]
    fn null_id_still_expects_a_response() {
        let payload = json!({"jsonrpc": "2.0", "method": "probe", "id": null});

        let request = Request::try_from(&payload).unwrap();

        assert!(request.has_id());
        assert!(!request.is_notification());
    }

    #[test]
    fn scalar_params_fail_the_decode() {
        let payload = json!({"jsonrpc": "2.0", "method": "m", "params": true, "id": 1});

        assert_eq!(
            Request::try_from(&payload),
            Err(Error::ExpectedStructuredParams)
        );
    }

    #[test]
    fn non_object_payload_fails_the_decode() {
        assert_eq!(
            Request::try_from(&json!([1, 2])),
            Err(Error::ExpectedObject("request"))
        );
    }

    #[test]
    fn boolean_id_decodes_but_is_contextually_invalid() {
        let payload = json!({"jsonrpc": "2.0", "method": "m", "id": true});

        let request = Request::try_from(&payload).unwrap();

        assert!(request.has_id());
        assert!(!request.id.is_contextually_valid());
    }

    #[test]
    fn reserved_method_prefix_is_flagged() {
        let request = Request::new("rpc.discover");

        assert!(request.is_method_reserved_for_internal_use());
        assert!(!request.is_method_contextually_valid());
        assert!(Request::new("discover").is_method_contextually_valid());
        assert!(!Request::new("").is_method_contextually_valid());
    }

    #[test]
    fn round_trips_with_unrecognized_members() {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "subtract",
            "params": {"subtrahend": 23, "minuend": 42},
            "id": "req-9",
            "traceparent": "00-abc-def-01",
            "vendor": {"retries": 3},
        });

        let request = Request::try_from(&payload).unwrap();

        assert_eq!(request.unrecognized.len(), 2);
        assert_eq!(Value::from(&request), payload);
        assert_eq!(Request::try_from(&Value::from(&request)).unwrap(), request);
    }

    #[test]
    fn notification_encode_omits_the_id_member() {
        let mut request = Request::new("update");

        request.params.set_as_array([1, 2]).unwrap();

        let encoded = Value::from(&request);

        assert!(encoded.get("id").is_none());
        assert_eq!(encoded.get("method"), Some(&json!("update")));
    }

    #[cfg(feature = "std")]
    #[test]
    fn encodes_members_in_canonical_order() {
        let request = Request::new("subtract")
            .with_params([json!(42), json!(23)].into_iter().collect())
            .with_id(1i64);

        let text = serde_json::to_string(&request).unwrap();

        assert_eq!(
            text,
            r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#
        );
    }

    #[test]
    fn explicit_null_params_survive_the_round_trip() {
        let payload = json!({"jsonrpc": "2.0", "method": "m", "params": null, "id": 1});

        let request = Request::try_from(&payload).unwrap();

        assert!(request.params.is_null());
        assert_eq!(Value::from(&request), payload);
    }

    #[test]
    fn missing_method_decodes_empty_and_fails_the_predicate() {
        let payload = json!({"jsonrpc": "2.0", "id": 1});

        let request = Request::try_from(&payload).unwrap();

        assert_eq!(request.method, "");
        assert!(!request.is_method_contextually_valid());
    }
}
