//! Infrastructure adapters for the onboarding engine: persisted key-value
//! storage, wall clock and random source.

pub mod kv;
pub mod random;
pub mod time;

pub use kv::{FileKeyValueStore, InMemoryKeyValueStore};
pub use random::{FixedRandomSource, OsRandomSource};
pub use time::{ManualClock, SystemClock};
