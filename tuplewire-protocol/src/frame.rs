//! Length-prefixed packet framing.
//!
//! Packet layout (msgpack uint length + payload):
//!
//! ```text
//! +----------------+----------------+----------------+
//! | length (uint)  | header (map)   | body (map)     |
//! | 1..9 bytes     |        length bytes             |
//! +----------------+---------------------------------+
//! ```
//!
//! Outgoing frames always use the 5-byte `0xce` form. Incoming frames accept
//! any msgpack unsigned integer encoding of the length.

use crate::error::ProtocolError;
use crate::MAX_PAYLOAD_SIZE;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use rmpv::Value;

/// Size of the length prefix written by [`Frame::encode`].
pub const LENGTH_PREFIX_SIZE: usize = 5;

const MARKER_U8: u8 = 0xcc;
const MARKER_U16: u8 = 0xcd;
const MARKER_U32: u8 = 0xce;
const MARKER_U64: u8 = 0xcf;

/// A single protocol packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Header and body maps, back to back.
    pub payload: Bytes,
}

impl Frame {
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    /// Creates a frame from header and body values.
    pub fn from_parts(header: &Value, body: &Value) -> Result<Self, ProtocolError> {
        let mut payload = Vec::new();
        rmpv::encode::write_value(&mut payload, header)?;
        rmpv::encode::write_value(&mut payload, body)?;
        Ok(Self::new(Bytes::from(payload)))
    }

    /// Encodes the frame into bytes.
    pub fn encode(&self) -> Result<BytesMut, ProtocolError> {
        let payload_len = self.payload.len() as u64;
        if payload_len > u64::from(MAX_PAYLOAD_SIZE) {
            return Err(ProtocolError::FrameTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + self.payload.len());
        buf.put_u8(MARKER_U32);
        buf.put_u32(payload_len as u32);
        buf.put_slice(&self.payload);
        Ok(buf)
    }

    /// Decodes a frame from bytes.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on protocol errors.
    pub fn decode(buf: &mut BytesMut) -> Result<Option<Self>, ProtocolError> {
        let Some(&marker) = buf.first() else {
            return Ok(None);
        };

        let prefix_len = match marker {
            0x00..=0x7f => 1,
            MARKER_U8 => 2,
            MARKER_U16 => 3,
            MARKER_U32 => 5,
            MARKER_U64 => 9,
            other => return Err(ProtocolError::InvalidLength(other)),
        };
        if buf.len() < prefix_len {
            return Ok(None);
        }

        // Peek at the length without consuming
        let mut prefix = &buf[1..prefix_len];
        let payload_len = match marker {
            0x00..=0x7f => u64::from(marker),
            MARKER_U8 => u64::from(prefix.get_u8()),
            MARKER_U16 => u64::from(prefix.get_u16()),
            MARKER_U32 => u64::from(prefix.get_u32()),
            _ => prefix.get_u64(),
        };

        if payload_len > u64::from(MAX_PAYLOAD_SIZE) {
            return Err(ProtocolError::FrameTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        let payload_len = payload_len as usize;

        if buf.len() < prefix_len + payload_len {
            return Ok(None);
        }

        buf.advance(prefix_len);
        let payload = buf.split_to(payload_len).freeze();

        Ok(Some(Self { payload }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_roundtrip() {
        let payload = Bytes::from_static(b"\x82\x00\x00\x01\x05\x80");
        let frame = Frame::new(payload.clone());

        let encoded = frame.encode().unwrap();
        assert_eq!(encoded[0], 0xce);
        assert_eq!(encoded.len(), LENGTH_PREFIX_SIZE + payload.len());

        let mut buf = encoded;
        let decoded = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.payload, payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_short_length_forms() {
        // fixint length
        let mut buf = BytesMut::from(&b"\x02\x80\x80"[..]);
        let frame = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.payload.as_ref(), b"\x80\x80");

        // uint8 length
        let mut buf = BytesMut::from(&b"\xcc\x01\x80"[..]);
        let frame = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.payload.as_ref(), b"\x80");

        // uint16 length
        let mut buf = BytesMut::from(&b"\xcd\x00\x01\x80"[..]);
        let frame = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.payload.as_ref(), b"\x80");
    }

    #[test]
    fn test_invalid_length_marker() {
        // fixmap is not a valid length
        let mut buf = BytesMut::from(&b"\x81\x00\x00"[..]);
        let result = Frame::decode(&mut buf);
        assert!(matches!(result, Err(ProtocolError::InvalidLength(0x81))));
    }

    #[test]
    fn test_incomplete_frame() {
        let mut buf = BytesMut::new();
        assert!(Frame::decode(&mut buf).unwrap().is_none());

        // Prefix cut short
        let mut buf = BytesMut::from(&b"\xce\x00\x00"[..]);
        assert!(Frame::decode(&mut buf).unwrap().is_none());

        // Payload cut short
        let mut buf = BytesMut::from(&b"\xce\x00\x00\x00\x04\x80\x80"[..]);
        assert!(Frame::decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_frame_too_large() {
        let huge_payload = vec![0u8; (MAX_PAYLOAD_SIZE + 1) as usize];
        let frame = Frame::new(Bytes::from(huge_payload));
        let result = frame.encode();
        assert!(matches!(result, Err(ProtocolError::FrameTooLarge { .. })));

        let mut buf = BytesMut::from(&b"\xcf\x00\x00\x00\x01\x00\x00\x00\x00"[..]);
        let result = Frame::decode(&mut buf);
        assert!(matches!(result, Err(ProtocolError::FrameTooLarge { .. })));
    }

    #[test]
    fn test_from_parts() {
        let header = Value::Map(vec![(Value::from(0u64), Value::from(64u64))]);
        let body = Value::Map(vec![]);
        let frame = Frame::from_parts(&header, &body).unwrap();
        assert_eq!(frame.payload.as_ref(), b"\x81\x00\x40\x80");
    }

    #[test]
    fn test_multiple_frames_in_buffer() {
        let frame1 = Frame::new(Bytes::from_static(b"\x80\x01"));
        let frame2 = Frame::new(Bytes::from_static(b"\x80\x02"));

        let mut buf = BytesMut::new();
        buf.extend_from_slice(&frame1.encode().unwrap());
        buf.extend_from_slice(&frame2.encode().unwrap());

        let decoded1 = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded1, frame1);

        let decoded2 = Frame::decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded2, frame2);

        assert!(Frame::decode(&mut buf).unwrap().is_none());
    }
}
