use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{SBenchError, Result};

const WORD: usize = std::mem::size_of::<u64>();

/// Fixed-size heap buffer used as the write source or the read destination
pub struct IoBuffer {
    data: Vec<u8>,
}

impl IoBuffer {
    /// Allocate a zeroed buffer of `size` bytes
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SBenchError::Config(
                "Buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            data: vec![0u8; size],
        })
    }

    /// Allocate a buffer of `size` bytes filled with random data
    pub fn random(size: usize) -> Result<Self> {
        let mut buffer = Self::new(size)?;
        buffer.fill_random();
        Ok(buffer)
    }

    /// Overwrite the whole buffer with uniformly random 64-bit words.
    ///
    /// The generator is seeded from the operating system's entropy source, so
    /// two runs never produce the same contents.
    pub fn fill_random(&mut self) {
        let mut rng = StdRng::from_entropy();
        for chunk in self.data.chunks_mut(WORD) {
            let word = rng.gen::<u64>().to_ne_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    /// Get immutable access to the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable access to the buffer
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the buffer size; never zero
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }
}
