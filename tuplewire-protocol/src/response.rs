//! Response decoding.
//!
//! A response payload is two consecutive msgpack maps: the header, keyed by
//! [`keys::REQUEST_TYPE`] and [`keys::SYNC`], and the body, carrying either
//! [`keys::DATA`] or an error message.
//!
//! Data requests (select, update) reply with rows of tuples and decode into
//! [`Response`]. Calls reply with a flat list of return values and decode into
//! [`CallResponse`].

use crate::error::{ErrorCode, ProtocolError};
use crate::keys;
use crate::MAX_DEPTH;
use rmpv::Value;

/// A decoded data response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Correlation id copied from the request.
    pub sync: u64,
    /// Status code; zero on success.
    pub code: u32,
    /// Server schema version, when the header carries it.
    pub schema_version: Option<u64>,
    /// Result rows (success only).
    pub data: Vec<Vec<Value>>,
    /// Error message (failure only).
    pub error: Option<String>,
}

/// A decoded call response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallResponse {
    pub sync: u64,
    pub code: u32,
    pub schema_version: Option<u64>,
    /// Values returned by the called function (success only).
    pub data: Vec<Value>,
    pub error: Option<String>,
}

type Entries = Vec<(Value, Value)>;

fn lookup(map: &Entries, key: u64) -> Option<&Value> {
    map.iter()
        .find(|(k, _)| k.as_u64() == Some(key))
        .map(|(_, v)| v)
}

fn into_map(value: Value, field: &'static str) -> Result<Entries, ProtocolError> {
    match value {
        Value::Map(entries) => Ok(entries),
        _ => Err(ProtocolError::InvalidField {
            field,
            expected: "map",
        }),
    }
}

fn require_u64(map: &Entries, key: u64, field: &'static str) -> Result<u64, ProtocolError> {
    lookup(map, key)
        .ok_or(ProtocolError::MissingField(field))?
        .as_u64()
        .ok_or(ProtocolError::InvalidField {
            field,
            expected: "unsigned integer",
        })
}

fn present(map: &Entries, key: u64) -> Option<&Value> {
    lookup(map, key).filter(|v| !v.is_nil())
}

/// Reads one value, refusing nesting deeper than [`MAX_DEPTH`].
fn read_bounded(rd: &mut &[u8]) -> Result<Value, ProtocolError> {
    Ok(rmpv::decode::read_value_with_max_depth(rd, MAX_DEPTH)?)
}

fn decode_rows(value: &Value) -> Result<Vec<Vec<Value>>, ProtocolError> {
    let invalid = || ProtocolError::InvalidField {
        field: "data",
        expected: "array of tuples",
    };
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|row| match row {
            Value::Array(fields) => Ok(fields.clone()),
            _ => Err(invalid()),
        })
        .collect()
}

fn decode_values(value: &Value) -> Result<Vec<Value>, ProtocolError> {
    value
        .as_array()
        .cloned()
        .ok_or(ProtocolError::InvalidField {
            field: "data",
            expected: "array",
        })
}

/// Message of the innermost reported error in an extended error stack.
fn stack_message(value: &Value) -> Option<String> {
    let map = value.as_map()?;
    let frames = lookup(map, keys::error_stack::STACK)?.as_array()?;
    let first = frames.first()?.as_map()?;
    lookup(first, keys::error_stack::MESSAGE)?
        .as_str()
        .map(str::to_string)
}

fn decode_error(body: &Entries) -> Result<String, ProtocolError> {
    if let Some(v) = present(body, keys::ERROR_24) {
        return v
            .as_str()
            .map(str::to_string)
            .ok_or(ProtocolError::InvalidField {
                field: "error",
                expected: "string",
            });
    }
    present(body, keys::ERROR)
        .and_then(stack_message)
        .ok_or(ProtocolError::MissingField("error"))
}

/// Header fields and the still uninterpreted body of a reply.
struct Envelope {
    sync: u64,
    code: u32,
    schema_version: Option<u64>,
    body: Entries,
}

impl Envelope {
    fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        let mut rd = payload;

        let header = into_map(read_bounded(&mut rd)?, "header")?;
        let sync = require_u64(&header, keys::SYNC, "sync")?;
        let code = require_u64(&header, keys::REQUEST_TYPE, "code")?;
        let code = u32::try_from(code).map_err(|_| ProtocolError::InvalidField {
            field: "code",
            expected: "u32",
        })?;
        let schema_version = match lookup(&header, keys::SCHEMA_VERSION) {
            Some(v) => Some(v.as_u64().ok_or(ProtocolError::InvalidField {
                field: "schema_version",
                expected: "unsigned integer",
            })?),
            None => None,
        };

        // Some responses end right after the header.
        let body = if rd.is_empty() {
            Entries::new()
        } else {
            into_map(read_bounded(&mut rd)?, "body")?
        };
        if !rd.is_empty() {
            return Err(ProtocolError::TrailingBytes(rd.len()));
        }

        Ok(Self {
            sync,
            code,
            schema_version,
            body,
        })
    }

    /// DATA of a successful reply. A failed reply must not carry any.
    fn data(&self) -> Result<Option<&Value>, ProtocolError> {
        let data = present(&self.body, keys::DATA);
        if self.code != keys::OK_CODE && data.is_some() {
            return Err(ProtocolError::UnexpectedData { code: self.code });
        }
        Ok(data)
    }

    fn error(&self) -> Result<Option<String>, ProtocolError> {
        if self.code == keys::OK_CODE {
            return Ok(None);
        }
        decode_error(&self.body).map(Some)
    }
}

fn encode_reply(
    sync: u64,
    code: u32,
    schema_version: Option<u64>,
    error: Option<&str>,
    data: Value,
) -> Result<Vec<u8>, ProtocolError> {
    let mut header = vec![
        (Value::from(keys::REQUEST_TYPE), Value::from(code)),
        (Value::from(keys::SYNC), Value::from(sync)),
    ];
    if let Some(version) = schema_version {
        header.push((Value::from(keys::SCHEMA_VERSION), Value::from(version)));
    }

    let body = match error {
        Some(message) => vec![(Value::from(keys::ERROR_24), Value::from(message))],
        None => vec![(Value::from(keys::DATA), data)],
    };

    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, &Value::Map(header))?;
    rmpv::encode::write_value(&mut buf, &Value::Map(body))?;
    Ok(buf)
}

impl Response {
    /// Builds a successful response.
    pub fn ok(sync: u64, data: Vec<Vec<Value>>) -> Self {
        Self {
            sync,
            code: keys::OK_CODE,
            schema_version: None,
            data,
            error: None,
        }
    }

    /// Builds a failed response for a server error number.
    pub fn error(sync: u64, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            sync,
            code: code.to_status(),
            schema_version: None,
            data: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Decodes a header map followed by a body map.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        let envelope = Envelope::decode(payload)?;
        let data = match envelope.data()? {
            Some(rows) => decode_rows(rows)?,
            None => Vec::new(),
        };
        let error = envelope.error()?;

        Ok(Response {
            sync: envelope.sync,
            code: envelope.code,
            schema_version: envelope.schema_version,
            data,
            error,
        })
    }

    /// Encodes the response as header and body maps.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let rows = Value::Array(self.data.iter().cloned().map(Value::Array).collect());
        encode_reply(
            self.sync,
            self.code,
            self.schema_version,
            self.error.as_deref(),
            rows,
        )
    }

    pub fn is_ok(&self) -> bool {
        self.code == keys::OK_CODE
    }

    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    /// Server error number, for failed responses.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_status(self.code)
    }

    /// Error message, or the empty string on success.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

impl CallResponse {
    pub fn ok(sync: u64, data: Vec<Value>) -> Self {
        Self {
            sync,
            code: keys::OK_CODE,
            schema_version: None,
            data,
            error: None,
        }
    }

    pub fn error(sync: u64, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            sync,
            code: code.to_status(),
            schema_version: None,
            data: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Decodes a call reply. DATA values are kept as returned.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        let envelope = Envelope::decode(payload)?;
        let data = match envelope.data()? {
            Some(values) => decode_values(values)?,
            None => Vec::new(),
        };
        let error = envelope.error()?;

        Ok(CallResponse {
            sync: envelope.sync,
            code: envelope.code,
            schema_version: envelope.schema_version,
            data,
            error,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode_reply(
            self.sync,
            self.code,
            self.schema_version,
            self.error.as_deref(),
            Value::Array(self.data.clone()),
        )
    }

    pub fn is_ok(&self) -> bool {
        self.code == keys::OK_CODE
    }

    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_status(self.code)
    }
}
