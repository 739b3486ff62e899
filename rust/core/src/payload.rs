//! Random payload generation

use crate::{BufferAllocator, Result};
use rand::RngCore;

/// Overwrite every byte of `buffer` with uniformly drawn values
pub fn fill_random<R: RngCore + ?Sized>(buffer: &mut [u8], rng: &mut R) {
    rng.fill_bytes(buffer);
}

/// Allocate a buffer of exactly `size` bytes and fill it with random data
pub fn generate<A, R>(size: usize, allocator: &A, rng: &mut R) -> Result<Vec<u8>>
where
    A: BufferAllocator + ?Sized,
    R: RngCore + ?Sized,
{
    let mut buffer = allocator.allocate(size)?;
    fill_random(&mut buffer, rng);
    Ok(buffer)
}
