//! Container cleanup utilities.
//!
//! Removes containers left behind by testkit test runs, found through the
//! labels every testkit container carries. It can be used both
//! programmatically (from test code) and via CLI binaries.

use std::collections::HashMap;

use anyhow::{Context, Result};
use bollard::Docker;
use bollard::container::{ListContainersOptions, RemoveContainerOptions};
use bollard::models::ContainerSummary;
use chrono::{DateTime, TimeDelta, Utc};
use testkit_containers::{CONTEXT_LABEL, MANAGED_LABEL};
use tracing::{debug, info, warn};

/// Build the Docker `label` filter selecting testkit containers, optionally
/// narrowed to one workflow context.
pub fn label_filters(context: Option<&str>) -> HashMap<String, Vec<String>> {
    let mut labels = vec![format!("{}=true", MANAGED_LABEL)];
    if let Some(context) = context {
        labels.push(format!("{}={}", CONTEXT_LABEL, context));
    }

    HashMap::from([("label".to_string(), labels)])
}

/// Whether a container created at `created` is older than `max_age_hours`
/// at `now`.
pub fn is_expired(created: DateTime<Utc>, now: DateTime<Utc>, max_age_hours: u64) -> bool {
    let cutoff = i64::try_from(max_age_hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .and_then(|max_age| now.checked_sub_signed(max_age));

    match cutoff {
        Some(cutoff) => created < cutoff,
        None => false,
    }
}

/// Removes testkit containers through the Docker API.
pub struct ContainerCleanup {
    docker: Docker,
}

impl ContainerCleanup {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Connect to the local Docker daemon (`DOCKER_HOST` or the default
    /// socket).
    pub fn connect() -> Result<Self> {
        let docker =
            Docker::connect_with_local_defaults().context("Failed to connect to Docker daemon")?;
        Ok(Self::new(docker))
    }

    /// Remove testkit containers older than `max_age_hours`.
    ///
    /// Returns the names of the removed containers.
    pub async fn cleanup_orphaned_containers(&self, max_age_hours: u64) -> Result<Vec<String>> {
        info!(
            max_age_hours = max_age_hours,
            "Searching for orphaned testkit containers"
        );

        let now = Utc::now();
        let containers = self.list(None).await?;
        let expired = containers.into_iter().filter(|container| {
            match container.created.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
                Some(created) => {
                    let expired = is_expired(created, now, max_age_hours);
                    if !expired {
                        debug!(
                            container = %display_name(container),
                            created_at = %created,
                            age_hours = (now - created).num_hours(),
                            "Container is too new, skipping"
                        );
                    }
                    expired
                }
                None => {
                    warn!(
                        container = %display_name(container),
                        "Container has no creation time, skipping"
                    );
                    false
                }
            }
        });

        let removed = self.remove_all(expired).await;
        info!(removed_count = removed.len(), "Cleanup completed");
        Ok(removed)
    }

    /// Remove every testkit container started from the given workflow
    /// context, regardless of age.
    pub async fn cleanup_context_containers(&self, context: &str) -> Result<Vec<String>> {
        info!(context = context, "Searching for testkit containers from context");

        let containers = self.list(Some(context)).await?;
        let removed = self.remove_all(containers).await;

        info!(
            context = context,
            removed_count = removed.len(),
            "Cleanup completed"
        );
        Ok(removed)
    }

    async fn list(&self, context: Option<&str>) -> Result<Vec<ContainerSummary>> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all: true,
                filters: label_filters(context),
                ..Default::default()
            }))
            .await
            .context("Failed to list containers")?;

        debug!(count = containers.len(), "Found testkit containers");
        Ok(containers)
    }

    /// Force-remove containers; failures are logged and skipped.
    async fn remove_all(
        &self,
        containers: impl IntoIterator<Item = ContainerSummary>,
    ) -> Vec<String> {
        let mut removed = Vec::new();

        for container in containers {
            let Some(id) = container.id.as_deref() else {
                continue;
            };
            let name = display_name(&container);

            match self
                .docker
                .remove_container(
                    id,
                    Some(RemoveContainerOptions {
                        force: true,
                        v: true,
                        ..Default::default()
                    }),
                )
                .await
            {
                Ok(()) => {
                    info!(container = %name, id = id, "Removed container");
                    removed.push(name);
                }
                Err(err) => {
                    warn!(
                        container = %name,
                        id = id,
                        error = %err,
                        "Failed to remove container"
                    );
                }
            }
        }

        removed
    }
}

/// First container name without Docker's leading `/`, or the short id.
fn display_name(container: &ContainerSummary) -> String {
    container
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|name| name.trim_start_matches('/').to_string())
        .or_else(|| container.id.as_ref().map(|id| id.chars().take(12).collect()))
        .unwrap_or_default()
}

/// Initialize logging for the cleanup binaries.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
