//! Protocol error types and server error codes.

use std::fmt;
use thiserror::Error;

/// Protocol-level errors that can occur while encoding requests or decoding frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("msgpack encode error: {0}")]
    Encode(#[from] rmpv::encode::Error),

    #[error("msgpack decode error: {0}")]
    Decode(#[from] rmpv::decode::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid field {field}: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid frame length prefix: marker {0:#04x}")]
    InvalidLength(u8),

    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: u64, max: u32 },

    #[error("{0} trailing bytes after response body")]
    TrailingBytes(usize),

    #[error("response with status {code:#x} carries data rows")]
    UnexpectedData { code: u32 },
}

impl ProtocolError {
    /// Returns whether the error means the bytes did not have the expected shape.
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            ProtocolError::Decode(_)
                | ProtocolError::MissingField(_)
                | ProtocolError::InvalidField { .. }
                | ProtocolError::InvalidLength(_)
                | ProtocolError::FrameTooLarge { .. }
                | ProtocolError::TrailingBytes(_)
        )
    }
}

/// Well-known server error numbers.
///
/// The server puts `ERROR_TYPE_BIT | number` in the status code of a failed
/// response. Numbers without a named variant are kept in [`ErrorCode::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unknown,
    IllegalParams,
    TupleFound,
    Unsupported,
    Readonly,
    InvalidMsgpack,
    ProcLua,
    NoSuchProc,
    NoSuchIndex,
    NoSuchSpace,
    WalIo,
    MoreThanOneTuple,
    AccessDenied,
    Other(u32),
}

impl ErrorCode {
    pub fn from_u32(number: u32) -> Self {
        match number {
            0 => ErrorCode::Unknown,
            1 => ErrorCode::IllegalParams,
            3 => ErrorCode::TupleFound,
            5 => ErrorCode::Unsupported,
            7 => ErrorCode::Readonly,
            20 => ErrorCode::InvalidMsgpack,
            32 => ErrorCode::ProcLua,
            33 => ErrorCode::NoSuchProc,
            35 => ErrorCode::NoSuchIndex,
            36 => ErrorCode::NoSuchSpace,
            40 => ErrorCode::WalIo,
            41 => ErrorCode::MoreThanOneTuple,
            42 => ErrorCode::AccessDenied,
            other => ErrorCode::Other(other),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            ErrorCode::Unknown => 0,
            ErrorCode::IllegalParams => 1,
            ErrorCode::TupleFound => 3,
            ErrorCode::Unsupported => 5,
            ErrorCode::Readonly => 7,
            ErrorCode::InvalidMsgpack => 20,
            ErrorCode::ProcLua => 32,
            ErrorCode::NoSuchProc => 33,
            ErrorCode::NoSuchIndex => 35,
            ErrorCode::NoSuchSpace => 36,
            ErrorCode::WalIo => 40,
            ErrorCode::MoreThanOneTuple => 41,
            ErrorCode::AccessDenied => 42,
            ErrorCode::Other(n) => *n,
        }
    }

    /// Extracts the error number from a response status code.
    ///
    /// Returns `None` for a success status.
    pub fn from_status(status: u32) -> Option<Self> {
        if status == crate::keys::OK_CODE {
            return None;
        }
        Some(Self::from_u32(status & !crate::keys::ERROR_TYPE_BIT))
    }

    /// Builds the status code a server would send for this error.
    pub fn to_status(&self) -> u32 {
        crate::keys::ERROR_TYPE_BIT | self.as_u32()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Unknown => write!(f, "UNKNOWN"),
            ErrorCode::IllegalParams => write!(f, "ILLEGAL_PARAMS"),
            ErrorCode::TupleFound => write!(f, "TUPLE_FOUND"),
            ErrorCode::Unsupported => write!(f, "UNSUPPORTED"),
            ErrorCode::Readonly => write!(f, "READONLY"),
            ErrorCode::InvalidMsgpack => write!(f, "INVALID_MSGPACK"),
            ErrorCode::ProcLua => write!(f, "PROC_LUA"),
            ErrorCode::NoSuchProc => write!(f, "NO_SUCH_PROC"),
            ErrorCode::NoSuchIndex => write!(f, "NO_SUCH_INDEX_ID"),
            ErrorCode::NoSuchSpace => write!(f, "NO_SUCH_SPACE"),
            ErrorCode::WalIo => write!(f, "WAL_IO"),
            ErrorCode::MoreThanOneTuple => write!(f, "MORE_THAN_ONE_TUPLE"),
            ErrorCode::AccessDenied => write!(f, "ACCESS_DENIED"),
            ErrorCode::Other(n) => write!(f, "ERROR_{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_roundtrip() {
        for n in 0..64 {
            assert_eq!(ErrorCode::from_u32(n).as_u32(), n);
        }
    }

    #[test]
    fn test_error_code_from_status() {
        assert_eq!(ErrorCode::from_status(0), None);
        assert_eq!(ErrorCode::from_status(0x8024), Some(ErrorCode::NoSuchSpace));
        assert_eq!(ErrorCode::from_status(0x8021), Some(ErrorCode::NoSuchProc));
        // Status codes without the error bit are still failures.
        assert_eq!(ErrorCode::from_status(1), Some(ErrorCode::IllegalParams));
        assert_eq!(ErrorCode::NoSuchSpace.to_status(), 0x8024);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::NoSuchSpace), "NO_SUCH_SPACE");
        assert_eq!(format!("{}", ErrorCode::NoSuchIndex), "NO_SUCH_INDEX_ID");
        assert_eq!(format!("{}", ErrorCode::AccessDenied), "ACCESS_DENIED");
        assert_eq!(format!("{}", ErrorCode::Other(77)), "ERROR_77");
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::MissingField("sync");
        assert!(err.to_string().contains("sync"));

        let err = ProtocolError::InvalidField {
            field: "code",
            expected: "u32",
        };
        let msg = err.to_string();
        assert!(msg.contains("code"));
        assert!(msg.contains("u32"));

        let err = ProtocolError::FrameTooLarge { size: 100, max: 50 };
        assert!(err.to_string().contains("100"));

        let err = ProtocolError::InvalidLength(0xa1);
        assert!(err.to_string().contains("0xa1"));

        let err = ProtocolError::UnexpectedData { code: 0x8024 };
        assert!(err.to_string().contains("0x8024"));
    }

    #[test]
    fn test_is_decoding() {
        assert!(ProtocolError::MissingField("sync").is_decoding());
        assert!(ProtocolError::TrailingBytes(3).is_decoding());
        assert!(!ProtocolError::UnexpectedData { code: 1 }.is_decoding());
    }
}
