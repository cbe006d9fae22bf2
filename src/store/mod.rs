//! Persistent key-value storage behind the attempt gates.
//!
//! Implement [`KeyValueStore`] to plug in whatever the host offers
//! (browser local storage, a profile directory, an embedded database).
//!
//! | Type | Description |
//! |------|-------------|
//! | [`InMemoryStore`] | Process-local map with an optional byte quota |
//! | [`FileStore`] | One file per key inside a directory |
//! | [`ScopedStore`] | Prefixes every key of an inner store |
//!
//! Writes are last-write-wins. Nothing here locks across processes.

mod file;
mod memory;
mod scoped;

pub use file::FileStore;
pub use memory::InMemoryStore;
pub use scoped::ScopedStore;

use crate::AuthError;

/// A bounded string store keyed by string.
///
/// Implementations must report failure through the returned `Result`
/// and never panic: a full store answers `set` with
/// [`AuthError::QuotaExceeded`], a missing key answers `get` with `Ok(None)`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;

    /// Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<(), AuthError>;
}
