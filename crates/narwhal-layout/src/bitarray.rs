//! Compacted dynamic arrays of booleans.
//!
//! Storing one `bool` per element wastes seven bits out of every byte, which adds up for the
//! visited/settled marks kept by traversals over large graphs. [`BitArray`] packs eight elements
//! per byte instead, at the cost of a shift and a mask per access.
//!
//! `BitArray::default()` is a valid zero-length array; no allocation happens until the first
//! growing [`BitArray::resize`].

use crate::error::Result;

/// Backing buffer size (in bytes) of the first allocation.
const MIN_CAPACITY: usize = 128;

/// A growable array of booleans stored eight per byte.
///
/// The backing buffer is only ever zero-filled when it is first allocated. Shrinking forgets the
/// trailing elements without clearing them, so growing again without crossing the allocated
/// capacity re-exposes whatever was stored there before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitArray {
    /// Allocated bytes; `base.len()` is the capacity.
    base: Vec<u8>,
    len_bits: usize,
}

impl BitArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an array of `len_bits` cleared elements.
    pub fn with_len(len_bits: usize) -> Result<Self> {
        let mut out = Self::new();
        out.resize(len_bits)?;
        Ok(out)
    }

    /// Number of elements in use.
    pub fn len(&self) -> usize {
        self.len_bits
    }

    pub fn is_empty(&self) -> bool {
        self.len_bits == 0
    }

    /// Allocated extent in bytes.
    pub fn capacity(&self) -> usize {
        self.base.len()
    }

    /// Increases or decreases the element length of this array.
    ///
    /// Growing beyond the current capacity doubles the buffer (starting at 128 bytes), or jumps
    /// straight to the exact size when doubling is not enough. Only the newly allocated bytes are
    /// cleared.
    pub fn resize(&mut self, len_bits: usize) -> Result<()> {
        if len_bits <= self.len_bits {
            self.len_bits = len_bits;
            return Ok(());
        }

        let needed = len_bits.div_ceil(8);
        let current = self.base.len();
        if needed > current {
            let mut capacity = if current == 0 {
                MIN_CAPACITY
            } else {
                current.saturating_mul(2)
            };
            if capacity < needed {
                capacity = needed;
            }

            self.base.try_reserve_exact(capacity - current)?;
            self.base.resize(capacity, 0);
        }

        self.len_bits = len_bits;
        Ok(())
    }

    /// [`BitArray::resize`] for callers that cannot handle failure: on allocation failure this
    /// reports `out of memory` and terminates the process.
    pub fn resize_or_exit(&mut self, len_bits: usize) {
        if let Err(err) = self.resize(len_bits) {
            tracing::error!(len_bits, %err, "bit array resize failed");
            eprintln!("out of memory");
            std::process::exit(1);
        }
    }

    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.len_bits, "out of bounds access");
        (self.base[index / 8] >> (index % 8)) & 1 == 1
    }

    pub fn set(&mut self, index: usize, value: bool) {
        debug_assert!(index < self.len_bits, "out of bounds access");
        let mask = 1u8 << (index % 8);
        if value {
            self.base[index / 8] |= mask;
        } else {
            self.base[index / 8] &= !mask;
        }
    }

    /// Releases the backing buffer and leaves the array empty.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
