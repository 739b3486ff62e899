//! Buffer allocation for the simulated download phase

use crate::{Result, SpeedSimError};

/// Source of payload buffers.
///
/// Implementations must return a buffer of exactly `size` bytes or an
/// [`SpeedSimError::Allocation`] error; they must never abort the process.
pub trait BufferAllocator: Send + Sync {
    fn allocate(&self, size: usize) -> Result<Vec<u8>>;
}

/// Heap allocator backed by `Vec::try_reserve_exact`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate(&self, size: usize) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|e| SpeedSimError::Allocation {
                requested: size,
                reason: e.to_string(),
            })?;
        buffer.resize(size, 0);
        Ok(buffer)
    }
}

/// Allocator that refuses buffers larger than `limit` bytes
#[derive(Debug, Clone, Copy)]
pub struct CappedAllocator {
    limit: usize,
}

impl CappedAllocator {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl BufferAllocator for CappedAllocator {
    fn allocate(&self, size: usize) -> Result<Vec<u8>> {
        if size > self.limit {
            return Err(SpeedSimError::Allocation {
                requested: size,
                reason: format!("exceeds payload limit of {} bytes", self.limit),
            });
        }
        SystemAllocator.allocate(size)
    }
}

impl<A: BufferAllocator + ?Sized> BufferAllocator for Box<A> {
    fn allocate(&self, size: usize) -> Result<Vec<u8>> {
        (**self).allocate(size)
    }
}
