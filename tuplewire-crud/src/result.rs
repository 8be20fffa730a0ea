//! Decoding of crud call replies.
//!
//! Crud functions return two values: the result, and an error object that is
//! nil on success.

use crate::error::{CrudError, ResultError};
use tuplewire_protocol::Value;

/// Result of `crud.count`.
pub type CountResult = NumberResult;

/// Result of `crud.len`.
pub type LenResult = NumberResult;

/// A single unsigned number returned by a crud function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberResult {
    pub value: u64,
}

impl NumberResult {
    /// Decodes the `[number, error]` values of a call reply.
    pub fn decode(values: &[Value]) -> Result<Self, ResultError> {
        if values.len() < 2 {
            return Err(ResultError::Malformed(format!(
                "expected [result, error], got {} values",
                values.len()
            )));
        }

        if !values[1].is_nil() {
            return Err(ResultError::Crud(CrudError::decode(&values[1])?));
        }

        let value = values[0].as_u64().ok_or_else(|| {
            ResultError::Malformed(format!("expected an unsigned number, got {}", values[0]))
        })?;
        Ok(Self { value })
    }
}

fn string_field(map: &[(Value, Value)], name: &str) -> Option<String> {
    field(map, name).and_then(Value::as_str).map(str::to_string)
}

fn field<'a>(map: &'a [(Value, Value)], name: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| k.as_str() == Some(name))
        .map(|(_, v)| v)
}

impl CrudError {
    /// Decodes a crud error object. Unknown keys are ignored.
    pub fn decode(value: &Value) -> Result<Self, ResultError> {
        let map = value
            .as_map()
            .ok_or_else(|| ResultError::Malformed(format!("expected an error map, got {}", value)))?;

        let err = string_field(map, "err")
            .ok_or_else(|| ResultError::Malformed("error map without 'err'".to_string()))?;

        Ok(Self {
            class_name: string_field(map, "class_name").unwrap_or_default(),
            err,
            file: string_field(map, "file"),
            line: field(map, "line").and_then(Value::as_u64),
            stack: string_field(map, "stack"),
            str: string_field(map, "str"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuplewire_protocol::CallResponse;

    fn crud_error() -> Value {
        Value::Map(vec![
            (Value::from("class_name"), Value::from("CountError")),
            (Value::from("err"), Value::from("Space \"customers\" doesn't exist")),
            (Value::from("file"), Value::from("/crud/count.lua")),
            (Value::from("line"), Value::from(294u64)),
            (
                Value::from("str"),
                Value::from("CountError: Space \"customers\" doesn't exist"),
            ),
        ])
    }

    #[test]
    fn test_count_result_from_reply() {
        let payload = CallResponse::ok(1, vec![Value::from(5u64), Value::Nil])
            .encode()
            .unwrap();
        let reply = CallResponse::decode(&payload).unwrap();

        let result = CountResult::decode(&reply.data).unwrap();
        assert_eq!(result.value, 5);
    }

    #[test]
    fn test_count_zero() {
        let result = CountResult::decode(&[Value::from(0u64), Value::Nil]).unwrap();
        assert_eq!(result, NumberResult { value: 0 });
    }

    #[test]
    fn test_crud_error_reply() {
        let payload = CallResponse::ok(2, vec![Value::Nil, crud_error()])
            .encode()
            .unwrap();
        let reply = CallResponse::decode(&payload).unwrap();

        match CountResult::decode(&reply.data) {
            Err(ResultError::Crud(err)) => {
                assert_eq!(err.class_name, "CountError");
                assert_eq!(err.err, "Space \"customers\" doesn't exist");
                assert_eq!(err.file.as_deref(), Some("/crud/count.lua"));
                assert_eq!(err.line, Some(294));
                assert_eq!(err.stack, None);
                assert_eq!(
                    err.to_string(),
                    "CountError: Space \"customers\" doesn't exist"
                );
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_short_reply_is_malformed() {
        assert!(matches!(
            CountResult::decode(&[Value::from(5u64)]),
            Err(ResultError::Malformed(_))
        ));
        assert!(matches!(
            LenResult::decode(&[]),
            Err(ResultError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_number_result_is_malformed() {
        assert!(matches!(
            CountResult::decode(&[Value::from("5"), Value::Nil]),
            Err(ResultError::Malformed(_))
        ));
        assert!(matches!(
            CountResult::decode(&[Value::Nil, Value::Nil]),
            Err(ResultError::Malformed(_))
        ));
    }

    #[test]
    fn test_error_without_message_is_malformed() {
        let err = Value::Map(vec![(Value::from("class_name"), Value::from("CountError"))]);
        assert!(matches!(
            CountResult::decode(&[Value::Nil, err]),
            Err(ResultError::Malformed(_))
        ));
        assert!(matches!(
            CountResult::decode(&[Value::Nil, Value::from("boom")]),
            Err(ResultError::Malformed(_))
        ));
    }
}
