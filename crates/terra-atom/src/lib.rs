//! # Terra Atom
//!
//! Shared UI state primitives:
//! - [`Atom`]: observable single-value container with synchronous,
//!   ordered change notification
//! - [`StoredAtom`]: an atom mirrored to a [`Storage`] backend as JSON,
//!   with `reset()` to a configured default
//! - [`MemoryStorage`] and [`FilesystemStorage`] backends
//!
//! Everything here is single-threaded. Atoms are meant to be constructed
//! once by the application bootstrap and handed to whoever needs them.

pub mod atom;
pub mod error;
pub mod storage;
pub mod stored;

pub use atom::{Atom, Subscription};
pub use error::StorageError;
pub use storage::{FilesystemStorage, MemoryStorage, Storage};
pub use stored::StoredAtom;
