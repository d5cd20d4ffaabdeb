//! Hash collections shared by the keywire crates.
//!
//! Protocol tables and the shortcut cache are keyed by small integers and
//! short words, so they use FxHash. Config alias tables use [`IndexMap`] so
//! warnings and lookups follow file order.

pub use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

/// Insertion-ordered hash map with FxHash.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;
