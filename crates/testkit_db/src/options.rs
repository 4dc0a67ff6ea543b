//! Options for executing SQL files.

use std::collections::HashMap;
use std::time::Duration;

/// Controls how [`crate::Database::execute_files`] runs each file.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Values substituted for `$name` / `${name}` references in file content.
    /// When empty the content is executed verbatim.
    pub values: HashMap<String, String>,

    /// Upper bound for executing a single file.
    pub timeout: Option<Duration>,
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all substitution values.
    pub fn with_values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Add a single substitution value.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Set the per-file execution timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Apply the substitution values to `content`.
    pub(crate) fn render(&self, content: String) -> String {
        if self.values.is_empty() {
            return content;
        }

        crate::expand(&content, |name| self.values.get(name).cloned())
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
