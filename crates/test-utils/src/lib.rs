//! Shared fixtures for taskwire's integration tests.

pub mod builders;
pub mod fake_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Same variable the binary reads, so `TASKWIRE_LOG=debug` works for tests too.
pub const LOG_ENV: &str = "TASKWIRE_LOG";

/// Upper bound for any single task run in tests; real subprocesses included.
pub const TASK_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-captured subscriber once per test binary.
///
/// Output only shows for failing tests (or with `--nocapture`). Child process
/// lines are logged at debug, so `TASKWIRE_LOG=debug` surfaces them.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Await a task run, failing the test if it outlives [`TASK_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TASK_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("task run did not finish within {TASK_TIMEOUT:?}"),
    }
}
