//! Cleanup testkit containers started from one workflow context.
//!
//! Removes every container labelled with the given context (`pr42`,
//! `main`, a branch name, ...) regardless of age. It's designed to be run
//! from CI when a pull request is closed or merged.
//!
//! Usage:
//!   cleanup-context <context>

use std::env;
use testkit_cleanup::ContainerCleanup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    testkit_cleanup::init_logging();

    let Some(context) = env::args().nth(1).filter(|s| !s.trim().is_empty()) else {
        anyhow::bail!("Usage: cleanup-context <context>");
    };

    println!("🧹 Testkit Context Container Cleanup");
    println!("====================================");
    println!();
    println!("📋 Context: {}", context);
    println!();

    let cleanup = ContainerCleanup::connect()?;

    println!("🔍 Searching for containers from context {}...", context);
    let removed = cleanup.cleanup_context_containers(&context).await?;

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
        println!("   No containers found for context {}", context);
    }

    Ok(())
}
