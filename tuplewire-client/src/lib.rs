//! # tuplewire-client
//!
//! Client layer for tuplewire.
//!
//! This crate provides:
//! - A transport seam for sending one packet and receiving its reply
//! - A client that encodes requests and decodes responses per call
//! - Session settings on top of select and update
//! - Client errors with kind-based classification

pub mod client;
pub mod error;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use client::Client;
pub use error::{ClientError, ErrorKind};
pub use session::SessionSetting;
pub use transport::Transport;
