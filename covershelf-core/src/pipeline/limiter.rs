//! Process-wide bound on concurrent cover resizing.

use std::{fmt, sync::Arc};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{CoverError, Result};

/// Counting semaphore shared by every refresh in the process.
///
/// Construct one at startup and hand clones to each service; clones share
/// the same permits.
#[derive(Clone)]
pub struct ResizeLimiter {
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// Held for the duration of a resize pass. Dropping it returns the slot.
#[derive(Debug)]
pub struct ResizePermit {
    _permit: OwnedSemaphorePermit,
}

impl fmt::Debug for ResizeLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeLimiter")
            .field("capacity", &self.capacity)
            .field("available", &self.permits.available_permits())
            .finish()
    }
}

impl ResizeLimiter {
    /// Half the logical CPUs, rounded up. Resizing is CPU-bound and may lack
    /// hardware acceleration.
    pub fn for_host() -> Self {
        Self::new(default_resize_concurrency(num_cpus::get()))
    }

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn acquire(&self) -> Result<ResizePermit> {
        let permit =
            self.permits.clone().acquire_owned().await.map_err(|_| {
                CoverError::Internal("resize limiter closed".into())
            })?;
        Ok(ResizePermit { _permit: permit })
    }
}

/// `ceil(cpus / 2)`, at least one.
pub fn default_resize_concurrency(logical_cpus: usize) -> usize {
    logical_cpus.div_ceil(2).max(1)
}
