//! Container labels and Docker host resolution from the process environment.

use std::collections::BTreeMap;
use std::env;

use url::Url;

/// Environment variables starting with this prefix become container labels.
pub const LABEL_ENV_PREFIX: &str = "TEST_LABEL_";

const DEFAULT_HOST: &str = "localhost";

/// Convert `TEST_LABEL_*` environment variables into container labels.
///
/// The prefix is stripped, underscores become dots and the key is lower-cased;
/// the variable value becomes the label value. `TEST_LABEL_TEAM_NAME=payments`
/// yields the label `team.name=payments`.
pub fn env_to_labels() -> BTreeMap<String, String> {
    labels_from_vars(env::vars())
}

/// Label conversion over an arbitrary set of `(name, value)` pairs.
pub fn labels_from_vars<I, K, V>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            let suffix = key.as_ref().strip_prefix(LABEL_ENV_PREFIX)?;
            if suffix.is_empty() {
                return None;
            }

            Some((suffix.replace('_', ".").to_lowercase(), value.into()))
        })
        .collect()
}

/// Host name under which containers started by this process are reachable.
///
/// Mirrors the host resolution of testcontainers so an address announced by a
/// service inside a container matches what the container runtime hands back
/// after startup.
pub fn docker_host() -> String {
    docker_host_from(
        env::var("TESTCONTAINERS_HOST_OVERRIDE").ok().as_deref(),
        env::var("DOCKER_HOST").ok().as_deref(),
    )
}

/// [`docker_host`] with explicit `TESTCONTAINERS_HOST_OVERRIDE` and
/// `DOCKER_HOST` values.
pub fn docker_host_from(host_override: Option<&str>, docker_host: Option<&str>) -> String {
    if let Some(host) = host_override.filter(|h| !h.is_empty()) {
        return host.to_string();
    }

    let Some(docker_host) = docker_host.filter(|h| !h.is_empty()) else {
        return DEFAULT_HOST.to_string();
    };

    if docker_host.starts_with("unix://") || docker_host.starts_with("npipe://") {
        return DEFAULT_HOST.to_string();
    }

    match Url::parse(docker_host) {
        Ok(url) => match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => DEFAULT_HOST.to_string(),
        },
        Err(_) => DEFAULT_HOST.to_string(),
    }
}

#[cfg(test)]
#[path = "env_labels_tests.rs"]
mod tests;
