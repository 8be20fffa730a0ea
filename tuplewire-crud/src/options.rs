//! Wire names of crud options and shared option value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tuplewire_protocol::Scalar;

pub const TIMEOUT: &str = "timeout";
pub const VSHARD_ROUTER: &str = "vshard_router";
pub const MODE: &str = "mode";
pub const PREFER_REPLICA: &str = "prefer_replica";
pub const BALANCE: &str = "balance";
pub const YIELD_EVERY: &str = "yield_every";
pub const BUCKET_ID: &str = "bucket_id";
pub const FORCE_MAP_CALL: &str = "force_map_call";
pub const FULLSCAN: &str = "fullscan";

/// Target of a routed call: the master (`write`) or any replica (`read`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Write,
    Read,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Write => "write",
            Mode::Read => "read",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "write" => Ok(Mode::Write),
            "read" => Ok(Mode::Read),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

impl From<Mode> for Scalar {
    fn from(mode: Mode) -> Self {
        Scalar::Str(mode.as_str().to_string())
    }
}
