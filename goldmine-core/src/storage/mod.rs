//! Save Data
//!
//! Persistence for game state as a flat map of short string keys to numbers.
//!
//! - [`KeyValueStore`] is where the serialized save lives: in memory
//!   ([`MemoryStore`]) or on disk ([`FileStore`]).
//! - [`StorageDevice`] owns the bindings between save keys and observable
//!   values (or custom load/save function pairs), loads the previous session
//!   and writes new saves.
//!
//! A save that cannot be parsed is treated as no save at all.

mod device;
mod store;

pub use device::{SaveData, StorageDevice};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use thiserror::Error;

/// Failures while binding, reading or writing save data.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("storage I/O failed for `{key}`")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Save data could not be encoded.
    #[error("failed to encode save data")]
    Encode(#[from] serde_json::Error),

    /// A binding with this key already exists.
    #[error("binding key `{key}` is already in use")]
    DuplicateKey { key: String },

    /// The value is already bound under another key.
    #[error("value bound to `{key}` is already bound to `{existing}`")]
    DuplicateValue { key: String, existing: String },

    /// Keys must be non-empty and made of ASCII letters, digits, `_` or `-`.
    #[error("`{key}` is not a valid storage key")]
    InvalidKey { key: String },
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}
