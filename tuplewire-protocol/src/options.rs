//! Sparse option encoding.
//!
//! An operation declares its options as an ordered table of
//! `(wire name, optional value)` pairs. Encoding keeps only the values the
//! caller set, in declaration order.

use rmpv::Value;

/// A primitive option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Uint(u64),
    Str(String),
    Bool(bool),
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::Uint(v)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Uint(v.into())
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Uint(v) => Value::from(v),
            Scalar::Str(v) => Value::from(v),
            Scalar::Bool(v) => Value::from(v),
        }
    }
}

/// One row of an option declaration table.
pub type OptionDecl = (&'static str, Option<Scalar>);

/// Builds a declaration row from a typed optional field.
pub fn declare<T>(name: &'static str, value: &Option<T>) -> OptionDecl
where
    T: Clone + Into<Scalar>,
{
    (name, value.clone().map(Into::into))
}

/// Types that carry a declared, ordered table of options.
pub trait OptionSet {
    /// Returns the declaration table in wire order.
    fn declarations(&self) -> Vec<OptionDecl>;

    /// Encodes the set options.
    fn option_map(&self) -> OptionMap {
        encode_options(self.declarations())
    }
}

/// Encodes a declaration table, dropping every unset entry.
pub fn encode_options<I>(table: I) -> OptionMap
where
    I: IntoIterator<Item = OptionDecl>,
{
    let entries = table
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
    OptionMap { entries }
}

/// Ordered name → value map containing only the options that were set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<(&'static str, Scalar)>,
}

impl OptionMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl std::iter::Iterator<Item = (&'static str, &Scalar)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    /// Converts the map into a msgpack map with string keys.
    pub fn into_value(self) -> Value {
        Value::Map(
            self.entries
                .into_iter()
                .map(|(n, v)| (Value::from(n), Value::from(v)))
                .collect(),
        )
    }
}
