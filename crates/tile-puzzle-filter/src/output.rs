//! Output picture collaborators: the host side that hands out destination
//! buffers and displays finished frames.

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tile_puzzle_core::{Picture, PictureFormat};
use tracing::warn;

/// Destination picture provider and display sink.
pub trait PictureOutput: Send + Sync {
    /// Hands out an empty destination picture.
    ///
    /// # Returns
    /// - `Ok(Some(_))` when a buffer is available.
    /// - `Ok(None)` when none is free right now; callers retry later.
    ///
    /// # Errors
    /// Returns [`OutputError`] when the output can no longer serve pictures.
    fn acquire(&self) -> Result<Option<Picture>, OutputError>;

    /// Queues a finished picture for display.
    ///
    /// # Errors
    /// Returns [`OutputError`] when the picture cannot be displayed.
    fn display(&self, picture: Picture) -> Result<(), OutputError>;

    /// Returns an acquired picture that will not be displayed.
    fn discard(&self, picture: Picture) {
        drop(picture);
    }
}

/// Opens the real output a filter instance renders into.
pub trait OutputFactory {
    /// Output type produced by this factory.
    type Output: PictureOutput;

    /// Opens an output for pictures laid out as `format`.
    ///
    /// # Errors
    /// Returns [`OutputError::OpenFailed`] when the output cannot be created.
    fn open(&self, format: &PictureFormat) -> Result<Self::Output, OutputError>;
}

/// In-process output with a bounded buffer pool.
///
/// Displayed pictures are kept until [`MemoryOutput::take_displayed`] drains
/// them, which also returns their buffers to the pool.
#[derive(Debug)]
pub struct MemoryOutput {
    format: PictureFormat,
    pool: Mutex<MemoryPool>,
}

#[derive(Debug)]
struct MemoryPool {
    free: usize,
    displayed: Vec<Picture>,
}

impl MemoryOutput {
    /// Creates an output able to lend `capacity` pictures at once.
    pub fn new(format: PictureFormat, capacity: usize) -> Self {
        Self {
            format,
            pool: Mutex::new(MemoryPool {
                free: capacity,
                displayed: Vec::new(),
            }),
        }
    }

    /// Picture layout served by this output.
    pub fn format(&self) -> &PictureFormat {
        &self.format
    }

    /// Drains displayed pictures in display order and frees their buffers.
    ///
    /// # Errors
    /// Returns [`OutputError::Backend`] when the pool lock is poisoned.
    pub fn take_displayed(&self) -> Result<Vec<Picture>, OutputError> {
        let mut pool = self.lock_pool()?;
        let displayed = std::mem::take(&mut pool.displayed);
        pool.free += displayed.len();
        Ok(displayed)
    }

    /// Number of buffers currently available.
    ///
    /// # Errors
    /// Returns [`OutputError::Backend`] when the pool lock is poisoned.
    pub fn free_buffers(&self) -> Result<usize, OutputError> {
        Ok(self.lock_pool()?.free)
    }

    fn lock_pool(&self) -> Result<std::sync::MutexGuard<'_, MemoryPool>, OutputError> {
        self.pool
            .lock()
            .map_err(|_| OutputError::Backend("memory output pool lock poisoned".to_string()))
    }
}

impl PictureOutput for MemoryOutput {
    fn acquire(&self) -> Result<Option<Picture>, OutputError> {
        let mut pool = self.lock_pool()?;
        if pool.free == 0 {
            return Ok(None);
        }

        let picture = Picture::blank(&self.format, 0)
            .map_err(|error| OutputError::Backend(error.to_string()))?;
        pool.free -= 1;
        Ok(Some(picture))
    }

    fn display(&self, picture: Picture) -> Result<(), OutputError> {
        self.lock_pool()?.displayed.push(picture);
        Ok(())
    }

    fn discard(&self, picture: Picture) {
        drop(picture);
        // The free counter stays consistent even if a holder panicked.
        let mut pool = self.pool.lock().unwrap_or_else(|poisoned| {
            warn!("memory output pool lock poisoned; reclaiming discarded buffer");
            PoisonError::into_inner(poisoned)
        });
        pool.free += 1;
    }
}

/// Factory for [`MemoryOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryOutputFactory {
    capacity: usize,
}

impl MemoryOutputFactory {
    /// Factory whose outputs lend up to `capacity` pictures at once.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl Default for MemoryOutputFactory {
    fn default() -> Self {
        Self::new(4)
    }
}

impl OutputFactory for MemoryOutputFactory {
    type Output = MemoryOutput;

    fn open(&self, format: &PictureFormat) -> Result<MemoryOutput, OutputError> {
        if self.capacity == 0 {
            return Err(OutputError::OpenFailed(
                "memory output needs at least one buffer".to_string(),
            ));
        }
        if format.planes.is_empty() {
            return Err(OutputError::OpenFailed(
                "picture format has no planes".to_string(),
            ));
        }
        for plane in &format.planes {
            plane
                .buffer_len()
                .map_err(|error| OutputError::OpenFailed(error.to_string()))?;
        }

        Ok(MemoryOutput::new(format.clone(), self.capacity))
    }
}

/// Output collaborator error type.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output could not be created.
    #[error("cannot open video output: {0}")]
    OpenFailed(String),
    /// Output failed while serving or displaying pictures.
    #[error("video output failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for the in-process output pool.

    use super::*;

    #[test]
    fn pool_runs_dry_and_refills_after_drain() {
        let output = MemoryOutputFactory::new(1)
            .open(&PictureFormat::gray8(4, 4))
            .expect("output should open");

        let picture = output
            .acquire()
            .expect("acquire should work")
            .expect("one buffer should be free");
        assert!(output.acquire().expect("acquire should work").is_none());

        output.display(picture).expect("display should work");
        assert_eq!(output.take_displayed().expect("drain should work").len(), 1);
        assert_eq!(output.free_buffers().expect("pool should be readable"), 1);
    }

    #[test]
    fn discard_returns_buffer_after_pool_poisoning() {
        let output = MemoryOutputFactory::new(1)
            .open(&PictureFormat::gray8(4, 4))
            .expect("output should open");
        let picture = output
            .acquire()
            .expect("acquire should work")
            .expect("one buffer should be free");

        std::thread::scope(|scope| {
            let poisoner = scope.spawn(|| {
                let _pool = output.pool.lock().expect("pool should lock");
                panic!("holder panics while owning the pool");
            });
            assert!(poisoner.join().is_err());
        });
        assert!(output.free_buffers().is_err(), "pool should be poisoned");

        output.discard(picture);

        let pool = output.pool.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(pool.free, 1, "discarded buffer must not leak");
    }

    #[test]
    fn factory_rejects_zero_capacity() {
        let result = MemoryOutputFactory::new(0).open(&PictureFormat::gray8(4, 4));
        assert!(matches!(result, Err(OutputError::OpenFailed(_))));
    }
}
