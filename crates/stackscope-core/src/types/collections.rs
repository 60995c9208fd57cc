//! Re-exports of the collection types used across the engine.
//!
//! `Fx*` maps are for internal counting only. Anything that ends up in an emitted
//! result uses `BTreeMap`/`BTreeSet` so serialized output is order-stable.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use std::collections::{BTreeMap, BTreeSet};
