#![forbid(unsafe_code)]

pub mod persistence;
pub mod record;
pub mod repository;
pub mod sqlite;

pub use persistence::{PROGRESS_KEY, ProgressPersistence};
pub use repository::{InMemoryKeyValueStore, KeyValueStore, Storage, StorageError};
