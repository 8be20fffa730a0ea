//! Protocol constant table: map keys, request codes and iterators.
//!
//! Header and body maps use small integer keys. The values below are part of
//! the wire contract and must not change.

/// Header key carrying the request type (in requests) or status code (in responses).
pub const REQUEST_TYPE: u64 = 0x00;
/// Header key carrying the correlation id.
pub const SYNC: u64 = 0x01;
/// Header key carrying the server schema version.
pub const SCHEMA_VERSION: u64 = 0x05;

pub const SPACE_ID: u64 = 0x10;
pub const INDEX_ID: u64 = 0x11;
pub const LIMIT: u64 = 0x12;
pub const OFFSET: u64 = 0x13;
pub const ITERATOR: u64 = 0x14;
pub const KEY: u64 = 0x20;
pub const TUPLE: u64 = 0x21;
pub const FUNCTION_NAME: u64 = 0x22;

/// Body key holding the result rows.
pub const DATA: u64 = 0x30;
/// Body key holding the plain error message.
pub const ERROR_24: u64 = 0x31;
/// Body key holding the extended error stack.
pub const ERROR: u64 = 0x52;

/// Keys inside an extended error stack.
pub mod error_stack {
    /// Array of error frames, innermost first.
    pub const STACK: u64 = 0x00;
    /// Message of one frame.
    pub const MESSAGE: u64 = 0x03;
}

/// Status code of a successful response.
pub const OK_CODE: u32 = 0x00;
/// Bit set in the status code of every error response.
pub const ERROR_TYPE_BIT: u32 = 0x8000;

/// Request type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RequestCode {
    Select = 1,
    Insert = 2,
    Replace = 3,
    Update = 4,
    Delete = 5,
    Call = 10,
    Ping = 64,
}

impl RequestCode {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Index iterator types used by select requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum IteratorType {
    #[default]
    Eq = 0,
    Req = 1,
    All = 2,
    Lt = 3,
    Le = 4,
    Ge = 5,
    Gt = 6,
}

impl IteratorType {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}
