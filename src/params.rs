use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// The `params` member of a request; the `data` member of a response error
/// shares the same shape and conversion contract.
///
/// Absence (member not on the wire) and an explicit JSON null are distinct
/// states and both survive a decode/encode round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    node: Option<Value>,
}

impl Params {
    pub const fn absent() -> Self {
        Self { node: None }
    }

    pub const fn null() -> Self {
        Self {
            node: Some(Value::Null),
        }
    }

    pub fn is_present(&self) -> bool {
        self.node.is_some()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.node, Some(Value::Null))
    }

    /// Request params must be absent, null, an array, or an object; scalars
    /// are rejected. Error `data` may legally hold a single scalar value and
    /// skips this check.
    pub fn is_contextually_valid(&self) -> bool {
        matches!(
            &self.node,
            None | Some(Value::Null) | Some(Value::Array(_)) | Some(Value::Object(_))
        )
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.node.as_ref()
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match &self.node {
            Some(Value::Array(a)) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match &self.node {
            Some(Value::Object(m)) => Some(m),
            _ => None,
        }
    }

    /// Binds positional params element-wise. A present non-array value (a
    /// single named object, or a bare value in the error-data case) binds
    /// once and is wrapped in a one-element vector. Absent and null yield
    /// `None`.
    pub fn as_typed_array<T>(&self) -> Result<Option<Vec<T>>>
    where
        T: DeserializeOwned,
    {
        let node = match &self.node {
            None | Some(Value::Null) => return Ok(None),
            Some(node) => node,
        };

        let items = match node {
            Value::Array(items) => items
                .iter()
                .map(|item| bind(item.clone(), "params element"))
                .collect::<Result<Vec<T>>>()?,
            other => alloc::vec![bind(other.clone(), "params")?],
        };

        Ok(Some(items))
    }

    /// Binds the whole member as a single value. Positional params only
    /// convert when `T` is itself a sequence type; otherwise this is a bind
    /// error. Absent and null yield `None`.
    pub fn as_typed_object<T>(&self) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match &self.node {
            None | Some(Value::Null) => Ok(None),
            Some(node) => bind(node.clone(), "params").map(Some),
        }
    }

    /// Replaces the member wholesale with a positional encoding of `items`.
    pub fn set_as_array<T, I>(&mut self, items: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let items = items
            .into_iter()
            .map(|item| {
                serde_json::to_value(item).map_err(|e| Error::Bind {
                    target: "params element",
                    cause: e.to_string(),
                })
            })
            .collect::<Result<Vec<Value>>>()?;

        self.node = Some(Value::Array(items));

        Ok(())
    }

    /// Replaces the member wholesale with the encoding of `value`. Last
    /// write wins between this and [`set_as_array`](Self::set_as_array).
    pub fn set_as_object<T: Serialize>(&mut self, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| Error::Bind {
            target: "params",
            cause: e.to_string(),
        })?;

        self.node = Some(value);

        Ok(())
    }

    /// Stores an explicit JSON null; the member stays on the wire.
    pub fn set_null(&mut self) {
        self.node = Some(Value::Null);
    }

    /// Removes the member entirely; nothing is emitted on encode.
    pub fn clear(&mut self) {
        self.node = None;
    }

    pub(crate) fn from_node(node: &Value) -> Self {
        Self {
            node: Some(node.clone()),
        }
    }

    pub(crate) fn to_node(&self) -> Option<Value> {
        self.node.clone()
    }
}

fn bind<T>(node: Value, target: &'static str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(node).map_err(|e| Error::Bind {
        target,
        cause: e.to_string(),
    })
}

impl From<Vec<Value>> for Params {
    fn from(a: Vec<Value>) -> Self {
        Self {
            node: Some(Value::Array(a)),
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(m: Map<String, Value>) -> Self {
        Self {
            node: Some(Value::Object(m)),
        }
    }
}

impl FromIterator<Value> for Params {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        iter.into_iter().collect::<Map<_, _>>().into()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Subtraction {
        subtrahend: i32,
        minuend: i32,
    }

    #[test]
    fn absent_and_null_are_distinct() {
        let absent = Params::absent();
        let null = Params::null();

        assert!(!absent.is_present());
        assert!(null.is_present());
        assert!(null.is_null());
        assert_ne!(absent, null);
    }

    #[test]
    fn scalars_are_contextually_invalid() {
        assert!(Params::from_node(&json!([1, 2])).is_contextually_valid());
        assert!(Params::from_node(&json!({"a": 1})).is_contextually_valid());
        assert!(Params::from_node(&json!(null)).is_contextually_valid());
        assert!(!Params::from_node(&json!(7)).is_contextually_valid());
        assert!(!Params::from_node(&json!("text")).is_contextually_valid());
        assert!(!Params::from_node(&json!(true)).is_contextually_valid());
    }

    #[test]
    fn set_as_array_round_trips_through_typed_access() {
        let mut params = Params::absent();

        params.set_as_array([1, 2, 3, 4, 5]).unwrap();

        assert_eq!(
            params.as_typed_array::<i32>().unwrap(),
            Some(alloc::vec![1, 2, 3, 4, 5])
        );
    }

    #[test]
    fn set_as_object_round_trips_through_typed_access() {
        let value = Subtraction {
            subtrahend: 23,
            minuend: 42,
        };
        let mut params = Params::absent();

        params.set_as_object(value.clone()).unwrap();

        assert_eq!(params.as_typed_object::<Subtraction>().unwrap(), Some(value));
    }

    #[test]
    fn named_object_binds_as_single_element_array() {
        let params = Params::from_node(&json!({"subtrahend": 23, "minuend": 42}));

        let bound = params.as_typed_array::<Subtraction>().unwrap().unwrap();

        assert_eq!(
            bound,
            alloc::vec![Subtraction {
                subtrahend: 23,
                minuend: 42,
            }]
        );
    }

    #[test]
    fn positional_params_bind_as_object_only_for_sequence_targets() {
        let params = Params::from_node(&json!([23, 42]));

        assert_eq!(
            params.as_typed_object::<Vec<i32>>().unwrap(),
            Some(alloc::vec![23, 42])
        );
        assert!(matches!(
            params.as_typed_object::<Subtraction>(),
            Err(Error::Bind { .. })
        ));
    }

    #[test]
    fn absent_and_null_bind_to_nothing() {
        assert_eq!(Params::absent().as_typed_array::<i32>().unwrap(), None);
        assert_eq!(Params::null().as_typed_array::<i32>().unwrap(), None);
        assert_eq!(
            Params::null().as_typed_object::<Subtraction>().unwrap(),
            None
        );
    }

    #[test]
    fn element_failure_surfaces_the_cause() {
        let params = Params::from_node(&json!([1, "two", 3]));

        match params.as_typed_array::<i32>() {
            Err(Error::Bind { target, cause }) => {
                assert_eq!(target, "params element");
                assert!(!cause.is_empty());
            }
            other => panic!("expected bind error, got {:?}", other),
        }
    }

    #[test]
    fn clear_and_set_null_differ_on_the_wire() {
        let mut params = Params::from(alloc::vec![json!(1)]);

        params.set_null();
        assert_eq!(params.to_node(), Some(Value::Null));

        params.clear();
        assert_eq!(params.to_node(), None);
    }

    #[test]
    fn collects_from_iterators_of_values_and_pairs() {
        let positional: Params = [json!(1), json!(2)].into_iter().collect();
        let named: Params = [("a".to_string(), json!(1))].into_iter().collect();

        assert_eq!(positional.as_array().map(<[Value]>::len), Some(2));
        assert_eq!(named.as_object().map(Map::len), Some(1));
    }
}
