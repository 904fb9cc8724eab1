//! Eventual consistency helpers for timing-dependent steps.
//!
//! The checks themselves never retry. The only caller is teardown, which
//! waits for a deleted namespace to disappear before reporting success.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Categories of eventual consistency with documented deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyCategory {
    /// Kubernetes resource updates, including namespace finalization (60s)
    K8sResourceUpdate,

    /// Explicit deadline
    Within(Duration),
}

impl ConsistencyCategory {
    /// Get the maximum timeout for this consistency category.
    pub fn timeout(&self) -> Duration {
        match self {
            ConsistencyCategory::K8sResourceUpdate => Duration::from_secs(60),
            ConsistencyCategory::Within(timeout) => *timeout,
        }
    }

    /// Get the initial retry delay for exponential backoff.
    fn initial_delay(&self) -> Duration {
        Duration::from_millis(500).min(self.timeout())
    }
}

/// Assert that a condition becomes true within the timeout for the given consistency category.
///
/// Uses exponential backoff with the following strategy:
/// - Initial delay: 500ms
/// - Exponential multiplier: 2x
/// - Maximum attempts: Until timeout is reached
pub async fn assert_eventually<F, Fut>(
    category: ConsistencyCategory,
    mut condition: F,
) -> Result<(), String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let timeout = category.timeout();
    let mut delay = category.initial_delay();
    let start = Instant::now();

    loop {
        if condition().await {
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(format!(
                "Condition not met within {:?} (category: {:?})",
                timeout, category
            ));
        }

        sleep(delay).await;

        delay *= 2;

        // Cap delay at remaining time
        let remaining = timeout.saturating_sub(start.elapsed());
        if delay > remaining {
            delay = remaining;
        }
    }
}
