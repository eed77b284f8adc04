//! Collection type aliases tuned for the engines.
//!
//! Hashing here is internal and non-adversarial (keys are engine-generated
//! ids), so the fast non-cryptographic hasher is the right default.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// `HashMap` keyed by trusted internal data, using `rustc_hash::FxHasher`.
///
/// Not DoS-resistant; do not use with attacker-controlled keys.
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// `HashSet` counterpart of [`FastHashMap`].
pub type FastHashSet<T> = FxHashSet<T>;

/// Small-optimized Vec: stack-allocated up to `N` elements, heap beyond.
///
/// Used for the short per-site vertex lists of Voronoi cells, which rarely
/// exceed a handful of entries.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;
