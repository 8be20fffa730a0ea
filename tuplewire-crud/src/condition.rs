//! Filter conditions for crud requests.

use std::fmt;
use tuplewire_protocol::Value;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `[operator, field, value]` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub operator: Operator,
    /// Field or index name.
    pub field: String,
    pub value: Value,
}

impl Condition {
    pub fn new(operator: Operator, field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            operator,
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Operator::Eq, field, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Operator::Lt, field, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Operator::Le, field, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Operator::Gt, field, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Operator::Ge, field, value)
    }

    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(self.operator.as_str()),
            Value::from(self.field.as_str()),
            self.value.clone(),
        ])
    }
}

/// Encodes a condition list as an array of triples.
pub fn conditions_value(conditions: &[Condition]) -> Value {
    Value::Array(conditions.iter().map(Condition::to_value).collect())
}
