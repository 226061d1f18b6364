//! The type name hash and the hash tables keyed by names or name hashes.
//!
//! Re-exports `hashbrown` and `foldhash` so dependents name one version.

mod hasher;
mod murmur;

pub use hasher::{FixedHashState, FixedHasher, NoOpHashState, NoOpHasher};
pub use murmur::{NAME_HASH_SEED, murmur_hash2};

pub use foldhash;
pub use hashbrown;

/// [`hashbrown::HashMap`] with the seeded [`FixedHashState`].
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// [`hashbrown::HashSet`] with the seeded [`FixedHashState`].
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// Map keyed by name hashes, which are MurmurHash2 outputs already.
pub type NoOpHashMap<K, V> = hashbrown::HashMap<K, V, NoOpHashState>;
