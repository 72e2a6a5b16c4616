//! Deterministic hashers.
//!
//! `FixedHasher` is `foldhash` with a fixed seed, so the same input hashes
//! to the same value in every process. Class identities rely on this.
//!
//! `PassHasher` forwards an integer key as the hash value.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x95EE04C4F326B271);

/// A hasher whose output depends only on its input.
pub type FixedHasher = FoldHasher<'static>;

/// Builds [`FixedHasher`]s.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use atelier_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("Transform");
/// let b = FixedHashState.hash_one("Transform");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

/// Hashes raw bytes with [`FixedHashState`].
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = FixedHashState.build_hasher();
    hasher.write(bytes);
    hasher.finish()
}

/// Hashes a string's bytes with [`FixedHashState`].
///
/// Unlike `str as Hash`, no terminator is written, so the result equals
/// [`hash_bytes`] of the same bytes.
#[inline]
pub fn hash_str(s: &str) -> u64 {
    hash_bytes(s.as_bytes())
}

// -----------------------------------------------------------------------------
// PassHasher

/// Passes an integer key straight through as the hash.
#[derive(Copy, Clone, Default, Debug)]
pub struct PassHasher {
    hash: u64,
}

impl Hasher for PassHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        // Spread the bits, hashbrown uses the top 7 bits as control bytes.
        self.hash = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Builds [`PassHasher`]s.
#[derive(Copy, Clone, Default, Debug)]
pub struct PassHashState;

impl BuildHasher for PassHashState {
    type Hasher = PassHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        PassHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Tests
