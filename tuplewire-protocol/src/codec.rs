//! Encoder and decoder for protocol packets.

use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::keys::{self, RequestCode};
use crate::response::Response;
use bytes::{Bytes, BytesMut};
use rmpv::Value;

/// Encodes request packets.
pub struct Encoder;

impl Encoder {
    /// Builds the header map for a request.
    pub fn request_header(sync: u64, code: RequestCode) -> Value {
        Value::Map(vec![
            (Value::from(keys::REQUEST_TYPE), Value::from(code.as_u32())),
            (Value::from(keys::SYNC), Value::from(sync)),
        ])
    }

    /// Encodes a request body into a complete, length-prefixed packet.
    pub fn encode_request(
        sync: u64,
        code: RequestCode,
        body: &Value,
    ) -> Result<BytesMut, ProtocolError> {
        let frame = Frame::from_parts(&Self::request_header(sync, code), body)?;
        frame.encode()
    }

    /// Encodes a response into a complete, length-prefixed packet.
    pub fn encode_response(response: &Response) -> Result<BytesMut, ProtocolError> {
        let frame = Frame::new(Bytes::from(response.encode()?));
        frame.encode()
    }
}

/// Splits a reply byte stream into data responses.
#[derive(Default)]
pub struct Decoder {
    buffer: BytesMut,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Decodes the next complete response, or `None` if more bytes are needed.
    pub fn decode_response(&mut self) -> Result<Option<Response>, ProtocolError> {
        match Frame::decode(&mut self.buffer)? {
            Some(frame) => Ok(Some(Response::decode(&frame.payload)?)),
            None => Ok(None),
        }
    }
}
