//! Storage
//!
//! Key/value persistence for cart records. A store only ever holds serialized text under a
//! small set of named keys, the way browser local storage does.

use std::io;

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a [`CartStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key cannot be used as a record name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backing store is not available.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// IO error reading or writing a record.
    #[error("storage IO error: {0}")]
    Io(#[from] io::Error),
}

/// Named text records that outlive a session.
pub trait CartStore {
    /// Read a record, returning `None` if nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the record stored under `key`. Removing a missing record succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record exists but cannot be removed.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: CartStore + ?Sized> CartStore for &mut S {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Check that a key is usable as a record name.
///
/// Keys must be non-empty, must not start with `.`, and may only contain ASCII alphanumerics,
/// `-`, `_` and `.`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] for anything else.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_key_accepts_simple_names() {
        assert!(validate_key("cart").is_ok());
        assert!(validate_key("cart-guest_01.v2").is_ok());
    }

    #[test]
    fn validate_key_rejects_paths_and_blanks() {
        for key in ["", ".cart", "../cart", "carts/guest", "cart key"] {
            assert!(
                matches!(validate_key(key), Err(StoreError::InvalidKey(_))),
                "expected {key:?} to be rejected"
            );
        }
    }
}
