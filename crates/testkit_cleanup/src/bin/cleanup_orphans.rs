//! Cleanup orphaned testkit containers.
//!
//! This binary removes testkit containers older than a specified age.
//! It's designed to be run from CI or manually for maintenance.
//!
//! Usage:
//!   cleanup-orphans [max_age_hours]
//!
//! The Docker daemon is found through `DOCKER_HOST` or the default socket.

use std::env;
use testkit_cleanup::ContainerCleanup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    testkit_cleanup::init_logging();

    // Default to 1 hour
    let max_age_hours: u64 = env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(1);

    println!("🧹 Testkit Container Cleanup");
    println!("============================");
    println!();
    println!("📋 Max age: {} hours", max_age_hours);
    println!();

    let cleanup = ContainerCleanup::connect()?;

    println!("🔍 Searching for orphaned testkit containers...");
    let removed = cleanup.cleanup_orphaned_containers(max_age_hours).await?;

    println!();
    println!("✅ Cleanup completed!");
    println!("   Removed {} containers", removed.len());

    if !removed.is_empty() {
        println!();
        println!("📋 Removed containers:");
        for name in &removed {
            println!("   - {}", name);
        }
    } else {
        println!("   No containers found older than {} hours", max_age_hours);
    }

    Ok(())
}
