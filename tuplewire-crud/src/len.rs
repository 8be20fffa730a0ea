//! `crud.len` request.

use crate::options;
use tuplewire_protocol::keys::RequestCode;
use tuplewire_protocol::{
    declare, CallRequest, Context, OptionDecl, OptionSet, Request, SchemaError, SchemaResolver,
    Value,
};

pub const LEN_FUNCTION: &str = "crud.len";

/// Options for `crud.len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LenOpts {
    pub timeout: Option<u64>,
    pub vshard_router: Option<String>,
}

impl OptionSet for LenOpts {
    fn declarations(&self) -> Vec<OptionDecl> {
        vec![
            declare(options::TIMEOUT, &self.timeout),
            declare(options::VSHARD_ROUTER, &self.vshard_router),
        ]
    }
}

/// Total number of rows in a space.
#[derive(Debug, Clone)]
pub struct LenRequest {
    space: String,
    opts: LenOpts,
    context: Option<Context>,
}

impl LenRequest {
    pub fn new(space: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            opts: LenOpts::default(),
            context: None,
        }
    }

    pub fn opts(mut self, opts: LenOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Positional arguments: `[space, opts]`.
    pub fn args(&self) -> Vec<Value> {
        vec![
            Value::from(self.space.as_str()),
            self.opts.option_map().into_value(),
        ]
    }
}

impl Request for LenRequest {
    fn code(&self) -> RequestCode {
        RequestCode::Call
    }

    fn body(&self, resolver: &dyn SchemaResolver) -> Result<Value, SchemaError> {
        resolver.resolve_space(&self.space)?;
        CallRequest::new(LEN_FUNCTION).args(self.args()).body(resolver)
    }

    fn call_context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}
