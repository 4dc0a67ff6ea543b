//! Error types for database test helpers.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors returned by [`crate::Database`] operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A schema name was empty after trimming whitespace.
    #[error("Schema name must not be empty")]
    EmptySchemaName,

    /// A schema statement (set / create / drop) was rejected by the server.
    #[error("Could not {action} schema {schema}: {source}")]
    Schema {
        action: SchemaAction,
        schema: String,
        #[source]
        source: sqlx::Error,
    },

    /// The folder given to `execute_folder` could not be listed.
    #[error("Could not read folder {}: {source}", .path.display())]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A SQL file could not be read from disk.
    #[error("Could not read file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A SQL file was read but executing it failed.
    #[error("Could not execute file {}: {source}", .path.display())]
    Execute {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    /// Executing a SQL file took longer than the configured timeout.
    #[error("Executing file {} timed out after {timeout:?}", .path.display())]
    Timeout { path: PathBuf, timeout: Duration },
}

/// The schema statement that failed, used in [`Error::Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    Set,
    Create,
    Drop,
}

impl std::fmt::Display for SchemaAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            SchemaAction::Set => "set",
            SchemaAction::Create => "create",
            SchemaAction::Drop => "drop",
        };
        f.write_str(verb)
    }
}
