//! Postgres helpers for integration tests.
//!
//! [`Database`] wraps a `sqlx` pool and provides the chores most database test
//! suites repeat: generating unique schema names, switching / creating /
//! dropping schemas and running SQL files (optionally with `$VAR` expansion)
//! as part of setup and teardown.
//!
//! ```no_run
//! use testkit_db::{Database, ExecOptions};
//!
//! # async fn example(pool: sqlx::PgPool) -> Result<(), testkit_db::Error> {
//! let db = Database::new(pool);
//!
//! let schema = db.name_gen("tenant");
//! db.create_schema(&schema).await?;
//! db.execute_folder(
//!     "testdata/migrations",
//!     &ExecOptions::new().with_value("schema", &schema),
//! )
//! .await?;
//! db.drop_schema(&schema).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use sqlx::PgPool;
use tracing::{debug, info};

pub mod errors;
pub mod expand;
pub mod options;

pub use errors::{Error, SchemaAction};
pub use expand::expand;
pub use options::ExecOptions;

/// Result alias for database helpers.
pub type Result<T> = std::result::Result<T, Error>;

/// Test database handle.
#[derive(Debug)]
pub struct Database {
    pool: PgPool,
    schema_counter: AtomicU32,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema_counter: AtomicU32::new(0),
        }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Generate `{prefix}_{n}` where `n` counts up from 1 for this handle.
    ///
    /// Safe to call concurrently; every call yields a distinct name.
    pub fn name_gen(&self, prefix: &str) -> String {
        let n = self.schema_counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}_{}", prefix, n)
    }

    /// Run `SET search_path TO {schema}`.
    ///
    /// The setting is per connection: it applies to whichever pooled
    /// connection ran the statement. Suites relying on it should use a pool
    /// with a single connection or qualify table names.
    pub async fn set_schema(&self, schema: &str) -> Result<()> {
        let schema = trim_schema(schema)?;
        info!(schema = schema, "Setting search path");

        self.schema_statement(SchemaAction::Set, schema, format!("SET search_path TO {}", schema))
            .await
    }

    /// Run `CREATE SCHEMA {schema}`.
    pub async fn create_schema(&self, schema: &str) -> Result<()> {
        let schema = trim_schema(schema)?;
        info!(schema = schema, "Creating schema");

        self.schema_statement(SchemaAction::Create, schema, format!("CREATE SCHEMA {}", schema))
            .await
    }

    /// Run `DROP SCHEMA IF EXISTS {schema} CASCADE`.
    pub async fn drop_schema(&self, schema: &str) -> Result<()> {
        let schema = trim_schema(schema)?;
        info!(schema = schema, "Dropping schema");

        self.schema_statement(
            SchemaAction::Drop,
            schema,
            format!("DROP SCHEMA IF EXISTS {} CASCADE", schema),
        )
        .await
    }

    /// Execute every regular file in `folder`, ordered by file name.
    ///
    /// Sub-directories are skipped.
    pub async fn execute_folder(
        &self,
        folder: impl AsRef<Path>,
        options: &ExecOptions,
    ) -> Result<()> {
        let files = sql_files_in(folder.as_ref())?;
        self.execute_files(&files, options).await
    }

    /// Execute SQL files in order, stopping at the first failure.
    ///
    /// Each file is sent as a single multi-statement batch after variable
    /// expansion (see [`ExecOptions::values`]).
    pub async fn execute_files<P: AsRef<Path>>(
        &self,
        files: &[P],
        options: &ExecOptions,
    ) -> Result<()> {
        for file in files {
            let path = file.as_ref();
            info!(file = %path.display(), "Executing SQL file");

            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| Error::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })?;
            let sql = options.render(content);

            let execution = sqlx::raw_sql(&sql).execute(&self.pool);
            let result = match options.timeout {
                Some(timeout) => tokio::time::timeout(timeout, execution)
                    .await
                    .map_err(|_| Error::Timeout {
                        path: path.to_path_buf(),
                        timeout,
                    })?,
                None => execution.await,
            };

            let done = result.map_err(|source| Error::Execute {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(
                file = %path.display(),
                rows_affected = done.rows_affected(),
                "SQL file executed"
            );
        }

        Ok(())
    }

    async fn schema_statement(&self, action: SchemaAction, schema: &str, sql: String) -> Result<()> {
        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|source| Error::Schema {
                action,
                schema: schema.to_string(),
                source,
            })?;

        Ok(())
    }
}

fn trim_schema(schema: &str) -> Result<&str> {
    let schema = schema.trim();
    if schema.is_empty() {
        return Err(Error::EmptySchemaName);
    }
    Ok(schema)
}

/// List the non-directory entries of `folder`, sorted by name.
fn sql_files_in(folder: &Path) -> Result<Vec<PathBuf>> {
    let read_folder_err = |source| Error::ReadFolder {
        path: folder.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(read_folder_err)? {
        let entry = entry.map_err(read_folder_err)?;
        if entry.file_type().map_err(read_folder_err)?.is_dir() {
            continue;
        }
        files.push(entry.path());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
