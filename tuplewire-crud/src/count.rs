//! `crud.count` request.

use crate::condition::{conditions_value, Condition};
use crate::options::{self, Mode};
use tuplewire_protocol::keys::RequestCode;
use tuplewire_protocol::{
    declare, CallRequest, Context, OptionDecl, OptionSet, Request, SchemaError, SchemaResolver,
    Value,
};

/// Name of the server-side function.
pub const COUNT_FUNCTION: &str = "crud.count";

/// Options for `crud.count`. Unset fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountOpts {
    /// Call and master discovery timeout, in seconds.
    pub timeout: Option<u64>,
    /// vshard group name or router instance name.
    pub vshard_router: Option<String>,
    pub mode: Option<Mode>,
    pub prefer_replica: Option<bool>,
    pub balance: Option<bool>,
    /// Number of tuples processed between yields.
    pub yield_every: Option<u64>,
    pub bucket_id: Option<u64>,
    /// Run a map call even when the conditions pin a single bucket.
    pub force_map_call: Option<bool>,
    /// Skip the critical log entry on a potentially long count.
    pub fullscan: Option<bool>,
}

impl OptionSet for CountOpts {
    fn declarations(&self) -> Vec<OptionDecl> {
        vec![
            declare(options::TIMEOUT, &self.timeout),
            declare(options::VSHARD_ROUTER, &self.vshard_router),
            declare(options::MODE, &self.mode),
            declare(options::PREFER_REPLICA, &self.prefer_replica),
            declare(options::BALANCE, &self.balance),
            declare(options::YIELD_EVERY, &self.yield_every),
            declare(options::BUCKET_ID, &self.bucket_id),
            declare(options::FORCE_MAP_CALL, &self.force_map_call),
            declare(options::FULLSCAN, &self.fullscan),
        ]
    }
}

/// Counts rows of a space matching a list of conditions.
#[derive(Debug, Clone)]
pub struct CountRequest {
    space: String,
    conditions: Vec<Condition>,
    opts: CountOpts,
    context: Option<Context>,
}

impl CountRequest {
    pub fn new(space: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            conditions: Vec::new(),
            opts: CountOpts::default(),
            context: None,
        }
    }

    pub fn conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn opts(mut self, opts: CountOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn space(&self) -> &str {
        &self.space
    }

    /// Positional arguments: `[space, conditions, opts]`.
    pub fn args(&self) -> Vec<Value> {
        vec![
            Value::from(self.space.as_str()),
            conditions_value(&self.conditions),
            self.opts.option_map().into_value(),
        ]
    }
}

impl Request for CountRequest {
    fn code(&self) -> RequestCode {
        RequestCode::Call
    }

    fn body(&self, resolver: &dyn SchemaResolver) -> Result<Value, SchemaError> {
        resolver.resolve_space(&self.space)?;
        CallRequest::new(COUNT_FUNCTION)
            .args(self.args())
            .body(resolver)
    }

    fn call_context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}
