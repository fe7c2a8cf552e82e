//! Stable seeding for reseeded pseudo-random draws.
//!
//! `std::collections::hash_map::DefaultHasher` is randomized per process,
//! which would break offers promised across restarts. FNV-1a over the
//! little-endian bytes of each input is stable and order-sensitive.

use std::hash::Hasher;

/// A deterministic FNV-1a 64-bit hasher.
#[derive(Debug)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    /// Create a hasher at the FNV offset basis.
    pub const fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Fold a tuple of integers into one seed. `[a, b]` and `[b, a]` differ.
pub fn stable_seed(parts: &[u64]) -> u64 {
    let mut hasher = FnvHasher::new();
    for part in parts {
        hasher.write(&part.to_le_bytes());
    }
    hasher.finish()
}
