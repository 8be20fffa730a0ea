//! Session settings.
//!
//! The server exposes per-session settings as rows of the `_session_settings`
//! system space: `[name, value]`, keyed by name. Reading is a select with
//! limit 1, writing is an update assigning field 1.

use crate::client::Client;
use crate::error::{ClientError, ErrorKind};
use crate::transport::Transport;
use std::fmt;
use tuplewire_protocol::{
    Operations, Response, SchemaResolver, SelectRequest, UpdateRequest, Value,
};

/// Name of the system space holding session settings.
pub const SESSION_SETTINGS_SPACE: &str = "_session_settings";

/// Offset of the value in a `[name, value]` row.
pub const SESSION_SETTING_VALUE_FIELD: u32 = 1;

/// A session setting name.
///
/// Names the server adds later are carried by [`SessionSetting::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionSetting {
    /// Whether error objects have a special structure. Added in 2.4.1,
    /// dropped in 2.10.0. Default `false`.
    ErrorMarshalingEnabled,
    /// Default storage engine for new SQL tables. Default `"memtx"`.
    SqlDefaultEngine,
    /// Whether foreign-key checks can wait till commit. Default `false`.
    SqlDeferForeignKeys,
    /// Whether full column names are shown in result set metadata. Default `false`.
    SqlFullColumnNames,
    /// Whether result set metadata has more than name and type. Default `false`.
    SqlFullMetadata,
    /// Show parser steps. Debug builds only. Default `false`.
    SqlParserDebug,
    /// Whether a triggered statement can activate a trigger. Default `true`.
    SqlRecursiveTriggers,
    /// Whether rows come in reverse order without ORDER BY. Default `false`.
    SqlReverseUnorderedSelects,
    /// Show execution steps during SELECT. Debug builds only. Default `false`.
    SqlSelectDebug,
    /// VDBE debug mode. Debug builds only. Default `false`.
    SqlVdbeDebug,
    Other(String),
}

impl SessionSetting {
    pub fn as_str(&self) -> &str {
        match self {
            SessionSetting::ErrorMarshalingEnabled => "error_marshaling_enabled",
            SessionSetting::SqlDefaultEngine => "sql_default_engine",
            SessionSetting::SqlDeferForeignKeys => "sql_defer_foreign_keys",
            SessionSetting::SqlFullColumnNames => "sql_full_column_names",
            SessionSetting::SqlFullMetadata => "sql_full_metadata",
            SessionSetting::SqlParserDebug => "sql_parser_debug",
            SessionSetting::SqlRecursiveTriggers => "sql_recursive_triggers",
            SessionSetting::SqlReverseUnorderedSelects => "sql_reverse_unordered_selects",
            SessionSetting::SqlSelectDebug => "sql_select_debug",
            SessionSetting::SqlVdbeDebug => "sql_vdbe_debug",
            SessionSetting::Other(name) => name,
        }
    }

    /// Single-field key tuple used to address the setting's row.
    pub fn key(&self) -> Vec<Value> {
        vec![Value::from(self.as_str())]
    }
}

impl From<&str> for SessionSetting {
    fn from(name: &str) -> Self {
        match name {
            "error_marshaling_enabled" => SessionSetting::ErrorMarshalingEnabled,
            "sql_default_engine" => SessionSetting::SqlDefaultEngine,
            "sql_defer_foreign_keys" => SessionSetting::SqlDeferForeignKeys,
            "sql_full_column_names" => SessionSetting::SqlFullColumnNames,
            "sql_full_metadata" => SessionSetting::SqlFullMetadata,
            "sql_parser_debug" => SessionSetting::SqlParserDebug,
            "sql_recursive_triggers" => SessionSetting::SqlRecursiveTriggers,
            "sql_reverse_unordered_selects" => SessionSetting::SqlReverseUnorderedSelects,
            "sql_select_debug" => SessionSetting::SqlSelectDebug,
            "sql_vdbe_debug" => SessionSetting::SqlVdbeDebug,
            other => SessionSetting::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SessionSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts the setting value from a settings response.
pub fn session_setting_value(
    setting: &SessionSetting,
    response: Response,
) -> Result<Value, ClientError> {
    let mut rows = response.data;

    if rows.is_empty() {
        return Err(ClientError::NotFound {
            setting: setting.to_string(),
        });
    }

    if rows.len() != 1 {
        return Err(ClientError::Malformed(format!(
            "expected one row, got {}",
            rows.len()
        )));
    }

    // (name, value) row expected
    let mut row = rows.swap_remove(0);
    let offset = SESSION_SETTING_VALUE_FIELD as usize;
    if row.len() <= offset {
        return Err(ClientError::Malformed(format!(
            "too few fields in the row (got {})",
            row.len()
        )));
    }

    Ok(row.swap_remove(offset))
}

/// Reports a missing settings space as an unsupported feature.
fn wrap_session_error(err: ClientError) -> ClientError {
    if err.kind() == ErrorKind::SpaceNotFound {
        tracing::debug!("Session settings space missing: {}", err);
        return ClientError::Unsupported {
            source: Box::new(err),
        };
    }
    err
}

impl<T: Transport, S: SchemaResolver> Client<T, S> {
    /// Reads the current value of a session setting.
    pub fn session_setting(&self, setting: &SessionSetting) -> Result<Value, ClientError> {
        tracing::debug!("Reading session setting {}", setting);
        let request = SelectRequest::new(SESSION_SETTINGS_SPACE)
            .key(setting.key())
            .limit(1);

        let response = self.execute(&request).map_err(wrap_session_error)?;
        session_setting_value(setting, response)
    }

    /// Sets a session setting and returns the value the server stored.
    pub fn set_session_setting(
        &self,
        setting: &SessionSetting,
        value: impl Into<Value>,
    ) -> Result<Value, ClientError> {
        tracing::debug!("Updating session setting {}", setting);
        let request = UpdateRequest::new(SESSION_SETTINGS_SPACE)
            .key(setting.key())
            .operations(Operations::new().assign(SESSION_SETTING_VALUE_FIELD, value));

        let response = self.execute(&request).map_err(wrap_session_error)?;
        session_setting_value(setting, response)
    }
}
