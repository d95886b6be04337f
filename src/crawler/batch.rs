//! Batched fan-out with a hard barrier between batches
//!
//! Work items are cut into consecutive batches of at most `batch_size`. All
//! tasks of one batch are polled together on the calling task, and the next
//! batch does not start until every task of the current one has finished.
//! This bounds in-flight requests to `batch_size` without spawning.
//!
//! Results are handed back in submission order, not completion order.

use futures::future::join_all;
use std::future::Future;
use std::ops::Range;
use std::time::Duration;

/// Runs work in fixed-size concurrent batches
#[derive(Debug, Clone)]
pub struct BatchRunner {
    batch_size: usize,
    pause: Duration,
}

impl BatchRunner {
    /// Creates a runner issuing at most `batch_size` tasks at once
    ///
    /// A batch size of zero is treated as one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            pause: Duration::ZERO,
        }
    }

    /// Sleeps for `pause` after every batch, including the last one
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Index ranges of the batches `total` items are split into
    pub fn plan(&self, total: usize) -> Vec<Range<usize>> {
        (0..total)
            .step_by(self.batch_size)
            .map(|start| start..(start + self.batch_size).min(total))
            .collect()
    }

    /// Runs `task` over `items` batch by batch
    ///
    /// After each batch settles, `settle` receives the batch number (from 0)
    /// and the task outputs in item order. An error from `settle` stops the
    /// run before the next batch and before the pause.
    ///
    /// Returns the number of batches that ran.
    pub async fn run<'a, T, F, Fut, S, E>(
        &self,
        items: &'a [T],
        task: F,
        mut settle: S,
    ) -> Result<usize, E>
    where
        F: Fn(&'a T) -> Fut,
        Fut: Future,
        S: FnMut(usize, Vec<Fut::Output>) -> Result<(), E>,
    {
        let mut batches = 0;

        for (index, chunk) in items.chunks(self.batch_size).enumerate() {
            tracing::trace!("Starting batch {} ({} tasks)", index, chunk.len());

            let outputs = join_all(chunk.iter().map(&task)).await;
            batches += 1;
            settle(index, outputs)?;

            if !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        Ok(batches)
    }
}
