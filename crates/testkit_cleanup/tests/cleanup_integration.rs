//! Cleanup tests against a real Docker daemon.
//!
//! ```bash
//! cargo test -p testkit_cleanup --test cleanup_integration -- --ignored
//! ```

use testcontainers::core::WaitFor;
use testcontainers::{GenericImage, ImageExt, runners::AsyncRunner};
use testkit_cleanup::ContainerCleanup;
use testkit_containers::{CONTEXT_LABEL, MANAGED_LABEL};

#[tokio::test]
#[ignore = "Requires Docker daemon running"]
async fn test_cleanup_context_removes_labelled_containers() -> anyhow::Result<()> {
    let context = format!("cleanup-it-{}", std::process::id());

    let container = GenericImage::new("alpine", "3.20")
        .with_wait_for(WaitFor::Nothing)
        .with_cmd(["sleep", "300"])
        .with_labels([(MANAGED_LABEL, "true"), (CONTEXT_LABEL, context.as_str())])
        .start()
        .await?;

    let cleanup = ContainerCleanup::connect()?;

    // An age nothing can reach leaves every container in place
    let swept = cleanup.cleanup_orphaned_containers(u64::MAX).await?;
    assert!(swept.is_empty());

    let removed = cleanup.cleanup_context_containers(&context).await?;
    assert_eq!(removed.len(), 1);

    let again = cleanup.cleanup_context_containers(&context).await?;
    assert!(again.is_empty());

    drop(container);

    Ok(())
}
