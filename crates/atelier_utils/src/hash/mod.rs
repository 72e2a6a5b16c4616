//! Hash containers, re-exports *hashbrown* and *foldhash*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{PassHashState, PassHasher};
pub use hasher::{hash_bytes, hash_str};

/// A [`hashbrown::HashMap`] with a deterministic hasher by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] with a deterministic hasher by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// A map keyed by values that are already hashes, such as class UIDs.
pub type PassHashMap<K, V> = hashbrown::HashMap<K, V, PassHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
