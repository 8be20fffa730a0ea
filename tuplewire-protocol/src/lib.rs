//! # tuplewire-protocol
//!
//! Wire protocol implementation for tuplewire.
//!
//! This crate provides:
//! - Length-prefixed msgpack packet framing
//! - Request bodies for select, update, call and ping
//! - Sparse, declaration-ordered option encoding
//! - Response decoding for data and call replies, with error surfacing
//! - Protocol constants and server error codes

pub mod codec;
pub mod error;
pub mod frame;
pub mod keys;
pub mod options;
pub mod request;
pub mod response;
pub mod schema;

pub use codec::{Decoder, Encoder};
pub use error::{ErrorCode, ProtocolError};
pub use frame::{Frame, LENGTH_PREFIX_SIZE};
pub use keys::{IteratorType, RequestCode};
pub use options::{declare, encode_options, OptionDecl, OptionMap, OptionSet, Scalar};
pub use request::{
    CallRequest, Context, IndexRef, Operations, PingRequest, Request, SelectRequest, UpdateRequest,
};
pub use response::{CallResponse, Response};
pub use rmpv::Value;
pub use schema::{SchemaError, SchemaResolver, StaticSchema};

/// Maximum frame payload size (16 MiB).
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Maximum msgpack nesting depth accepted in a reply.
pub const MAX_DEPTH: usize = 128;
