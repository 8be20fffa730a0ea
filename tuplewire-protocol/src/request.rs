//! Request value objects and their wire bodies.
//!
//! Every request is configured by value: each setter consumes the request and
//! returns the updated one. Producing the body borrows the request and leaves
//! it untouched.

use crate::keys::{self, IteratorType, RequestCode};
use crate::schema::{SchemaError, SchemaResolver};
use rmpv::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Opaque cancellation handle handed to the transport with a request.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A request that can be serialized into a protocol body.
pub trait Request {
    /// Request type placed in the header.
    fn code(&self) -> RequestCode;

    /// Builds the body map, resolving names through `resolver`.
    fn body(&self, resolver: &dyn SchemaResolver) -> Result<Value, SchemaError>;

    /// Cancellation context for the transport, if any.
    fn call_context(&self) -> Option<&Context> {
        None
    }
}

/// Index reference by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexRef {
    Id(u32),
    Name(String),
}

impl Default for IndexRef {
    fn default() -> Self {
        IndexRef::Id(0)
    }
}

impl From<u32> for IndexRef {
    fn from(id: u32) -> Self {
        IndexRef::Id(id)
    }
}

impl From<&str> for IndexRef {
    fn from(name: &str) -> Self {
        IndexRef::Name(name.to_string())
    }
}

impl IndexRef {
    fn resolve(&self, resolver: &dyn SchemaResolver, space: &str) -> Result<u32, SchemaError> {
        match self {
            IndexRef::Id(id) => Ok(*id),
            IndexRef::Name(name) => resolver.resolve_index(space, name),
        }
    }
}

fn entry(key: u64, value: impl Into<Value>) -> (Value, Value) {
    (Value::from(key), value.into())
}

/// Point or range read from a space.
#[derive(Debug, Clone)]
pub struct SelectRequest {
    space: String,
    index: IndexRef,
    key: Vec<Value>,
    iterator: IteratorType,
    offset: u32,
    limit: u32,
    context: Option<Context>,
}

impl SelectRequest {
    pub fn new(space: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            index: IndexRef::default(),
            key: Vec::new(),
            iterator: IteratorType::Eq,
            offset: 0,
            limit: u32::MAX,
            context: None,
        }
    }

    pub fn index(mut self, index: impl Into<IndexRef>) -> Self {
        self.index = index.into();
        self
    }

    pub fn key(mut self, key: Vec<Value>) -> Self {
        self.key = key;
        self
    }

    pub fn iterator(mut self, iterator: IteratorType) -> Self {
        self.iterator = iterator;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn space(&self) -> &str {
        &self.space
    }
}

impl Request for SelectRequest {
    fn code(&self) -> RequestCode {
        RequestCode::Select
    }

    fn body(&self, resolver: &dyn SchemaResolver) -> Result<Value, SchemaError> {
        let space_id = resolver.resolve_space(&self.space)?;
        let index_id = self.index.resolve(resolver, &self.space)?;
        Ok(Value::Map(vec![
            entry(keys::SPACE_ID, space_id),
            entry(keys::INDEX_ID, index_id),
            entry(keys::ITERATOR, self.iterator.as_u32()),
            entry(keys::OFFSET, self.offset),
            entry(keys::LIMIT, self.limit),
            entry(keys::KEY, self.key.clone()),
        ]))
    }

    fn call_context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

/// A single update operation: `[op, field, argument]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub op: &'static str,
    pub field: u32,
    pub arg: Value,
}

/// Ordered list of update operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operations {
    ops: Vec<Operation>,
}

impl Operations {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, op: &'static str, field: u32, arg: Value) -> Self {
        self.ops.push(Operation { op, field, arg });
        self
    }

    /// Sets field `field` to `value`.
    pub fn assign(self, field: u32, value: impl Into<Value>) -> Self {
        self.push("=", field, value.into())
    }

    pub fn add(self, field: u32, value: impl Into<Value>) -> Self {
        self.push("+", field, value.into())
    }

    pub fn subtract(self, field: u32, value: impl Into<Value>) -> Self {
        self.push("-", field, value.into())
    }

    /// Inserts `value` before field `field`.
    pub fn insert(self, field: u32, value: impl Into<Value>) -> Self {
        self.push("!", field, value.into())
    }

    /// Deletes `count` fields starting at `field`.
    pub fn delete(self, field: u32, count: u32) -> Self {
        self.push("#", field, Value::from(count))
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(
            self.ops
                .iter()
                .map(|o| {
                    Value::Array(vec![Value::from(o.op), Value::from(o.field), o.arg.clone()])
                })
                .collect(),
        )
    }
}

/// Point update of a single row located by key.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    space: String,
    index: IndexRef,
    key: Vec<Value>,
    ops: Operations,
    context: Option<Context>,
}

impl UpdateRequest {
    pub fn new(space: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            index: IndexRef::default(),
            key: Vec::new(),
            ops: Operations::new(),
            context: None,
        }
    }

    pub fn index(mut self, index: impl Into<IndexRef>) -> Self {
        self.index = index.into();
        self
    }

    pub fn key(mut self, key: Vec<Value>) -> Self {
        self.key = key;
        self
    }

    pub fn operations(mut self, ops: Operations) -> Self {
        self.ops = ops;
        self
    }

    pub fn context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn space(&self) -> &str {
        &self.space
    }
}

impl Request for UpdateRequest {
    fn code(&self) -> RequestCode {
        RequestCode::Update
    }

    fn body(&self, resolver: &dyn SchemaResolver) -> Result<Value, SchemaError> {
        let space_id = resolver.resolve_space(&self.space)?;
        let index_id = self.index.resolve(resolver, &self.space)?;
        Ok(Value::Map(vec![
            entry(keys::SPACE_ID, space_id),
            entry(keys::INDEX_ID, index_id),
            entry(keys::KEY, self.key.clone()),
            entry(keys::TUPLE, self.ops.to_value()),
        ]))
    }

    fn call_context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

/// Stored procedure call: function name plus a positional argument tuple.
#[derive(Debug, Clone)]
pub struct CallRequest {
    function: String,
    args: Vec<Value>,
    context: Option<Context>,
}

impl CallRequest {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: Vec::new(),
            context: None,
        }
    }

    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn arguments(&self) -> &[Value] {
        &self.args
    }
}

impl Request for CallRequest {
    fn code(&self) -> RequestCode {
        RequestCode::Call
    }

    fn body(&self, _resolver: &dyn SchemaResolver) -> Result<Value, SchemaError> {
        Ok(Value::Map(vec![
            entry(keys::FUNCTION_NAME, self.function.as_str()),
            entry(keys::TUPLE, self.args.clone()),
        ]))
    }

    fn call_context(&self) -> Option<&Context> {
        self.context.as_ref()
    }
}

/// Liveness check with an empty body.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingRequest;

impl Request for PingRequest {
    fn code(&self) -> RequestCode {
        RequestCode::Ping
    }

    fn body(&self, _resolver: &dyn SchemaResolver) -> Result<Value, SchemaError> {
        Ok(Value::Map(Vec::new()))
    }
}
