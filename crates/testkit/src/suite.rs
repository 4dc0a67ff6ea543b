//! Suite harness: set up shared services once, run the tests, always tear
//! down.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::{error, info};

/// Services shared by every test in a suite.
#[async_trait]
pub trait Fixture: Send + Sync + Sized + 'static {
    /// Start the services.
    async fn setup() -> anyhow::Result<Self>;

    /// Stop the services.
    ///
    /// Receives the fixture after the suite body has finished and dropped its
    /// handle, so `Arc::try_unwrap` normally succeeds.
    async fn teardown(self: Arc<Self>) -> anyhow::Result<()>;
}

/// Run `body` between [`Fixture::setup`] and [`Fixture::teardown`].
///
/// Teardown runs even when the body fails or panics. A panic is resumed
/// after teardown. The body's error takes precedence over a teardown error.
pub async fn run_suite<F, B, Fut, R>(body: B) -> anyhow::Result<R>
where
    F: Fixture,
    B: FnOnce(Arc<F>) -> Fut,
    Fut: Future<Output = anyhow::Result<R>>,
{
    let fixture = match F::setup().await {
        Ok(fixture) => Arc::new(fixture),
        Err(err) => {
            error!(error = %err, "Suite setup failed");
            return Err(err);
        }
    };
    info!("Suite setup complete");

    let outcome = AssertUnwindSafe(body(Arc::clone(&fixture)))
        .catch_unwind()
        .await;

    let teardown = fixture.teardown().await;
    match &teardown {
        Ok(()) => info!("Suite teardown complete"),
        Err(err) => error!(error = %err, "Suite teardown failed"),
    }

    match outcome {
        Err(payload) => panic::resume_unwind(payload),
        Ok(Err(err)) => Err(err),
        Ok(Ok(value)) => teardown.map(|()| value),
    }
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
