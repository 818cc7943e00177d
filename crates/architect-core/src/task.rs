//! Background network work owned by a controller.
//!
//! Each spawned task carries the generation of the controller that started
//! it, so a result that arrives after a reset can be recognised and dropped.

use std::future::Future;

use futures_util::FutureExt;
use tokio::task::{JoinError, JoinHandle};

#[derive(Debug)]
pub struct PendingTask<T> {
    generation: u64,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> PendingTask<T> {
    pub fn spawn<F>(generation: u64, future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            generation,
            handle: tokio::spawn(future),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Take the result if the task has completed, without blocking.
    pub fn try_take(&mut self) -> Option<Result<T, JoinError>> {
        if !self.handle.is_finished() {
            return None;
        }
        (&mut self.handle).now_or_never()
    }

    /// Wait for the task to finish. The result can only be taken once; the
    /// caller drops the task afterwards.
    pub async fn wait(&mut self) -> Result<T, JoinError> {
        (&mut self.handle).await
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}
