//! Transport seam.
//!
//! The transport owns the socket, correlation id allocation, multiplexing and
//! timeouts. The client hands it one complete packet and gets back the reply
//! payload.

use crate::error::ClientError;
use bytes::Bytes;
use tuplewire_protocol::Context;

pub trait Transport {
    /// Allocates the correlation id for the next request.
    fn next_sync(&self) -> u64;

    /// Sends a length-prefixed packet and waits for the matching reply.
    ///
    /// Returns the reply payload (header and body maps) without its length
    /// prefix. `context` is passed through from the request unexamined.
    fn round_trip(&self, packet: Bytes, context: Option<&Context>) -> Result<Bytes, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn next_sync(&self) -> u64 {
        (**self).next_sync()
    }

    fn round_trip(&self, packet: Bytes, context: Option<&Context>) -> Result<Bytes, ClientError> {
        (**self).round_trip(packet, context)
    }
}
