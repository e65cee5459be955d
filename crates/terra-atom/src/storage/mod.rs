//! Key/value backends for storage-backed atoms
//!
//! Values are stored as JSON strings under static keys chosen by each call
//! site. There is no versioning; readers fall back to their defaults when a
//! stored value no longer decodes.

use crate::error::Result;

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemStorage;
pub use memory::MemoryStorage;

/// Trait for string key/value storage backends
pub trait Storage {
    /// Get the raw value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All stored keys, sorted
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove every stored key
    fn clear(&self) -> Result<()>;

    /// Backend name for diagnostics
    fn name(&self) -> &'static str;
}
