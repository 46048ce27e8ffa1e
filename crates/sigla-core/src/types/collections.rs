//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec sized for the sign run of a typical word (usually <5 signs).
pub type SignRun<T> = SmallVec<[T; 4]>;

/// SmallVec sized for a formula slot fill (usually a single token).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
