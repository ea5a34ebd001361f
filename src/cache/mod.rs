//! Content-addressed cache volumes
//!
//! A cache volume is selected by a key derived from the contents of the files
//! that govern what the cache holds (for pre-commit, its config file). Same
//! file contents = same key = same volume, on any machine and in any run.
//!
//! The volume itself lives in the container engine's storage. Its retention
//! and eviction are the engine's business, not ours.

pub mod key;
pub mod volume;

pub use key::{derive_cache_key, CacheKey};
pub use volume::{CacheMount, CacheVolume};
