//! Client error types.

use thiserror::Error;
use tuplewire_protocol::{ErrorCode, ProtocolError, SchemaError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("server error: {code} - {message}")]
    Server { code: ErrorCode, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response sync {actual} does not match request sync {expected}")]
    SyncMismatch { expected: u64, actual: u64 },

    #[error("session setting {setting} not found")]
    NotFound { setting: String },

    #[error("unexpected session settings response: {0}")]
    Malformed(String),

    #[error("session settings are not supported: {source}")]
    Unsupported {
        #[source]
        source: Box<ClientError>,
    },
}

/// Coarse classification of a [`ClientError`], for matching by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bytes did not decode, or decoded into an invalid structure.
    Protocol,
    /// The addressed space does not exist, locally or on the server.
    SpaceNotFound,
    /// Any other schema lookup failure.
    Schema,
    /// Any other server-reported error.
    Server,
    Transport,
    NotFound,
    Unsupported,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Protocol(_) | ClientError::SyncMismatch { .. } => ErrorKind::Protocol,
            ClientError::Malformed(_) => ErrorKind::Protocol,
            ClientError::Schema(SchemaError::SpaceNotFound(_)) => ErrorKind::SpaceNotFound,
            ClientError::Schema(_) => ErrorKind::Schema,
            ClientError::Server {
                code: ErrorCode::NoSuchSpace,
                ..
            } => ErrorKind::SpaceNotFound,
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    /// Server error number, if the server reported one.
    pub fn server_code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Server { code, .. } => Some(*code),
            ClientError::Unsupported { source } => source.server_code(),
            _ => None,
        }
    }
}
