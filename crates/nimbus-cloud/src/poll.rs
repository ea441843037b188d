//! Completion tracking for long-running operations
//!
//! Mutating compute calls return immediately with an [`Operation`]
//! handle; the poller re-fetches it on a fixed cadence until the
//! provider reports a terminal state or the wall-clock deadline passes.

use crate::error::{CloudError, Result};
use crate::operation::{Operation, OperationService};
use std::time::Duration;
use tokio::time::Instant;

/// Polling cadence and deadline for a tracked operation
///
/// Deadlines apply independently per operation; there is no
/// cross-operation cancellation. A caller that stops awaiting simply
/// stops polling, the provider-side operation continues remotely.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Sleep between consecutive status fetches
    pub interval: Duration,

    /// Wall-clock budget before the poll gives up
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Polls an operation to its terminal state
#[derive(Debug, Clone, Default)]
pub struct OperationPoller {
    config: PollConfig,
}

impl OperationPoller {
    pub fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Poll until the operation reaches `DONE`, returning the final snapshot.
    ///
    /// A `DONE` operation carrying an HTTP error is returned as `Ok`:
    /// whether a completed-but-failed mutation is fatal is the caller's
    /// policy (see [`await_success`](Self::await_success) for the fatal
    /// variant). Transport errors from the fetch propagate immediately;
    /// exceeding the deadline yields [`CloudError::OperationTimeout`]
    /// carrying the last-known snapshot.
    pub async fn await_completion<S>(&self, operation: Operation, service: &S) -> Result<Operation>
    where
        S: OperationService + ?Sized,
    {
        let deadline = Instant::now() + self.config.timeout;
        let mut current = operation;

        loop {
            current = service.fetch(&current.name).await?;

            if current.is_done() {
                tracing::debug!("operation {} done", current.name);
                return Ok(current);
            }

            if Instant::now() >= deadline {
                tracing::warn!("timeout waiting for operation: {}", current.name);
                return Err(CloudError::OperationTimeout { operation: current });
            }

            tracing::debug!(
                "operation {} still {}, polling again in {:?}",
                current.name,
                current.status,
                self.config.interval
            );
            tokio::time::sleep(self.config.interval).await;
        }
    }

    /// Poll to completion and treat completed-but-failed as an error
    pub async fn await_success<S>(&self, operation: Operation, service: &S) -> Result<Operation>
    where
        S: OperationService + ?Sized,
    {
        let done = self.await_completion(operation, service).await?;
        if done.error_code().is_some() {
            return Err(CloudError::OperationFailed { operation: done });
        }
        Ok(done)
    }
}
