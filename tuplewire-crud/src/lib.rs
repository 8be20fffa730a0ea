//! # tuplewire-crud
//!
//! Request builders for the sharded crud module.
//!
//! This crate provides:
//! - `crud.count` and `crud.len` requests and their results
//! - Filter conditions
//! - Typed option sets encoded sparsely on the wire
//! - YAML/environment configuration of default options

pub mod condition;
pub mod config;
pub mod count;
pub mod error;
pub mod len;
pub mod options;
pub mod result;

pub use condition::{Condition, Operator};
pub use config::CrudConfig;
pub use count::{CountOpts, CountRequest};
pub use error::{ConfigError, CrudError, ResultError};
pub use len::{LenOpts, LenRequest};
pub use options::Mode;
pub use result::{CountResult, LenResult, NumberResult};
