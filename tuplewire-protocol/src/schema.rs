//! Space and index name resolution.
//!
//! Request bodies address spaces and indexes by numeric id. The mapping from
//! names comes from the server schema, which is owned by the connection; this
//! crate only defines the seam.

use std::collections::HashMap;
use thiserror::Error;

/// Id of the system space holding per-session settings.
pub const SESSION_SETTINGS_SPACE_ID: u32 = 380;

/// Errors raised while resolving names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("space not found: {0}")]
    SpaceNotFound(String),

    #[error("index not found: {space}.{index}")]
    IndexNotFound { space: String, index: String },
}

/// Resolves space and index names to the ids used on the wire.
pub trait SchemaResolver {
    fn resolve_space(&self, space: &str) -> Result<u32, SchemaError>;

    fn resolve_index(&self, space: &str, index: &str) -> Result<u32, SchemaError>;
}

/// A fixed, in-memory schema.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    spaces: HashMap<String, u32>,
    indexes: HashMap<(String, String), u32>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema pre-populated with the system spaces this crate addresses.
    pub fn with_system_spaces() -> Self {
        Self::new()
            .with_space("_session_settings", SESSION_SETTINGS_SPACE_ID)
            .with_index("_session_settings", "primary", 0)
    }

    pub fn with_space(mut self, name: impl Into<String>, id: u32) -> Self {
        self.spaces.insert(name.into(), id);
        self
    }

    pub fn with_index(mut self, space: impl Into<String>, index: impl Into<String>, id: u32) -> Self {
        self.indexes.insert((space.into(), index.into()), id);
        self
    }
}

impl SchemaResolver for StaticSchema {
    fn resolve_space(&self, space: &str) -> Result<u32, SchemaError> {
        self.spaces
            .get(space)
            .copied()
            .ok_or_else(|| SchemaError::SpaceNotFound(space.to_string()))
    }

    fn resolve_index(&self, space: &str, index: &str) -> Result<u32, SchemaError> {
        self.resolve_space(space)?;
        self.indexes
            .get(&(space.to_string(), index.to_string()))
            .copied()
            .ok_or_else(|| SchemaError::IndexNotFound {
                space: space.to_string(),
                index: index.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_schema_lookup() {
        let schema = StaticSchema::new()
            .with_space("users", 512)
            .with_index("users", "primary", 0)
            .with_index("users", "email", 1);

        assert_eq!(schema.resolve_space("users"), Ok(512));
        assert_eq!(schema.resolve_index("users", "email"), Ok(1));
        assert_eq!(
            schema.resolve_space("orders"),
            Err(SchemaError::SpaceNotFound("orders".to_string()))
        );
        assert_eq!(
            schema.resolve_index("users", "name"),
            Err(SchemaError::IndexNotFound {
                space: "users".to_string(),
                index: "name".to_string()
            })
        );
    }

    #[test]
    fn test_index_lookup_checks_space_first() {
        let schema = StaticSchema::new();
        assert_eq!(
            schema.resolve_index("users", "primary"),
            Err(SchemaError::SpaceNotFound("users".to_string()))
        );
    }

    #[test]
    fn test_system_spaces() {
        let schema = StaticSchema::with_system_spaces();
        assert_eq!(
            schema.resolve_space("_session_settings"),
            Ok(SESSION_SETTINGS_SPACE_ID)
        );
    }
}
