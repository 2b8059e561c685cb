mod os_random;

pub use os_random::{FixedRandomSource, OsRandomSource};
