//! Batching index writer
//!
//! Flushes points in small fixed-size batches, each retried under the
//! configured policy. A batch that exhausts its attempts is logged and
//! dropped rather than failing the run; the affected URL stays absent from
//! the store and is retried in full by a future run's dedup check.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::shutdown::Shutdown;
use crate::types::IndexPoint;

use super::{with_retry, PointStore, RetryPolicy};

/// Points durably written vs. dropped after exhausting retries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub written: u64,
    pub dropped: u64,
}

/// Writes points through a `PointStore` in bounded, retried batches
pub struct IndexWriter {
    store: Arc<dyn PointStore>,
    batch_size: usize,
    policy: RetryPolicy,
    shutdown: Shutdown,
}

impl IndexWriter {
    pub fn new(store: Arc<dyn PointStore>, config: &StorageConfig, shutdown: Shutdown) -> Self {
        Self {
            store,
            batch_size: config.batch_size.max(1),
            policy: RetryPolicy::new(
                config.max_attempts,
                Duration::from_secs(config.backoff_base_secs),
            ),
            shutdown,
        }
    }

    /// Write every point, in order, in batches of the configured size
    pub async fn write(&self, points: &[IndexPoint]) -> WriteOutcome {
        let mut outcome = WriteOutcome::default();
        for batch in points.chunks(self.batch_size) {
            if self.write_batch(batch).await {
                outcome.written += batch.len() as u64;
            } else {
                outcome.dropped += batch.len() as u64;
            }
        }
        outcome
    }

    /// One batch under the retry policy; false means dropped
    async fn write_batch(&self, batch: &[IndexPoint]) -> bool {
        let result = with_retry(&self.policy, &self.shutdown, || self.store.upsert(batch)).await;
        match result {
            Ok(()) => {
                debug!("upserted batch of {} points", batch.len());
                true
            }
            Err(e) => {
                warn!(
                    "dropping batch of {} points after {} attempts: {}",
                    batch.len(),
                    self.policy.max_attempts,
                    e
                );
                false
            }
        }
    }
}
