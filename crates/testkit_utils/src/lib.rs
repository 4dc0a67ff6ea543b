//! Shared helpers for integration test suites.
//!
//! This crate holds the small pieces every other testkit crate leans on:
//! container label derivation from the environment, Docker host resolution,
//! CI workflow context detection, pair iterators with assertions and logging
//! setup for test binaries.

use std::env;
use std::fmt::Display;
use std::sync::Once;

pub mod env_labels;
pub mod iter;

pub use env_labels::{LABEL_ENV_PREFIX, docker_host, docker_host_from, env_to_labels, labels_from_vars};
pub use iter::{check_pairs, pairs};

static INIT_LOGGING: Once = Once::new();

/// Extract the CI workflow context from the GitHub Actions environment.
///
/// Returns:
/// - `pr{number}` for pull request workflows (e.g., "pr123")
/// - `main` for pushes to main/master branch
/// - the branch name with `/` replaced by `-` for other branch pushes
/// - `local` for local development
///
/// The value ends up as a container label so a CI run's containers can be
/// found again by the cleanup tooling.
pub fn workflow_context() -> String {
    workflow_context_from(env::var("GITHUB_REF").ok().as_deref())
}

/// Same as [`workflow_context`] but driven by an explicit `GITHUB_REF` value.
pub fn workflow_context_from(github_ref: Option<&str>) -> String {
    if let Some(github_ref) = github_ref {
        if let Some(rest) = github_ref.strip_prefix("refs/pull/") {
            // refs/pull/{number}/merge
            if let Some(pr_num) = rest.split('/').next().filter(|n| !n.is_empty()) {
                return format!("pr{}", pr_num);
            }
        } else if let Some(branch) = github_ref.strip_prefix("refs/heads/") {
            if branch == "main" || branch == "master" {
                return "main".to_string();
            }
            return branch.replace('/', "-");
        }
    }

    "local".to_string()
}

/// Unwrap a result inside a test, failing at the caller's location.
///
/// ```
/// let value: u32 = testkit_utils::must("42".parse::<u32>());
/// assert_eq!(value, 42);
/// ```
#[track_caller]
pub fn must<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{}", err),
    }
}

/// Initialize logging for test binaries.
///
/// Safe to call from every test; only the first call installs the subscriber.
/// Honors `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
