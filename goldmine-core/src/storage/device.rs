//! Storage Device
//!
//! Binds save keys to game state and moves that state in and out of a
//! [`KeyValueStore`].
//!
//! # Lifecycle
//!
//! 1. `open` reads the previous session's blob. A missing blob and a blob
//!    that fails to parse both mean "no previous save".
//!
//! 2. Each `bind*` call applies the loaded entry for its key right away, so
//!    state is restored as the game wires itself up.
//!
//! 3. `save` collects every binding into a flat JSON object and writes it.
//!    `load` re-reads the store and applies whatever keys are present.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{validate_key, KeyValueStore, StorageError};
use crate::reactive::ObservableValue;

/// Serialized form of a save: key to number, in binding order.
pub type SaveData = IndexMap<String, f64>;

enum Binding {
    Value(ObservableValue),
    Custom {
        load: Box<dyn Fn(f64)>,
        save: Box<dyn Fn() -> f64>,
    },
}

impl Binding {
    fn apply(&self, data: f64) {
        match self {
            Self::Value(value) => value.set(data),
            Self::Custom { load, .. } => load(data),
        }
    }

    fn current(&self) -> f64 {
        match self {
            Self::Value(value) => value.get(),
            Self::Custom { save, .. } => save(),
        }
    }
}

/// Saves and restores bound game state under a single storage key.
pub struct StorageDevice<S: KeyValueStore> {
    store: S,
    storage_key: String,
    loaded: Option<SaveData>,
    bindings: IndexMap<String, Binding>,
}

impl<S: KeyValueStore> StorageDevice<S> {
    /// Open the device and read the previous session's save, if any.
    pub fn open(store: S, storage_key: &str) -> Result<Self, StorageError> {
        validate_key(storage_key)?;
        let loaded = read_save(&store, storage_key)?;
        if let Some(data) = &loaded {
            debug!(key = storage_key, entries = data.len(), "loaded previous save");
        }

        Ok(Self {
            store,
            storage_key: storage_key.to_string(),
            loaded,
            bindings: IndexMap::new(),
        })
    }

    /// Bind `value` to `key`, restoring it from the loaded save if present.
    pub fn bind_value(&mut self, key: &str, value: &ObservableValue) -> Result<(), StorageError> {
        self.check_key(key)?;
        let existing = self.bindings.iter().find_map(|(bound_key, binding)| match binding {
            Binding::Value(bound) if bound.ptr_eq(value) => Some(bound_key.clone()),
            _ => None,
        });
        if let Some(existing) = existing {
            return Err(StorageError::DuplicateValue {
                key: key.to_string(),
                existing,
            });
        }

        self.insert(key, Binding::Value(value.clone()));
        Ok(())
    }

    /// Bind `key` to a custom loader and save-value supplier.
    ///
    /// The loader runs right away if the loaded save has the key. Use this
    /// for state that has to be rebuilt in steps, such as replaying upgrade
    /// levels.
    pub fn bind<L, F>(&mut self, key: &str, load: L, save: F) -> Result<(), StorageError>
    where
        L: Fn(f64) + 'static,
        F: Fn() -> f64 + 'static,
    {
        self.check_key(key)?;
        self.insert(
            key,
            Binding::Custom {
                load: Box::new(load),
                save: Box::new(save),
            },
        );
        Ok(())
    }

    /// Current state of every binding, skipping non-finite numbers.
    pub fn snapshot(&self) -> SaveData {
        let mut data = SaveData::with_capacity(self.bindings.len());
        for (key, binding) in &self.bindings {
            let number = binding.current();
            if number.is_finite() {
                data.insert(key.clone(), number);
            } else {
                warn!(key = key.as_str(), "non-finite save value skipped");
            }
        }
        data
    }

    /// Serialize every binding and write it to the store.
    pub fn save(&self) -> Result<(), StorageError> {
        let data = self.snapshot();
        let blob = serde_json::to_string(&data)?;
        self.store.write(&self.storage_key, &blob)?;
        info!(key = self.storage_key.as_str(), entries = data.len(), "game saved");
        Ok(())
    }

    /// Re-read the store and apply every key present to its binding.
    ///
    /// Custom loaders run again, so a loader that replays steps should only
    /// see a `load` on fresh state. Returns the number of bindings applied.
    pub fn load(&mut self) -> Result<usize, StorageError> {
        self.loaded = read_save(&self.store, &self.storage_key)?;
        let Some(data) = &self.loaded else {
            return Ok(0);
        };

        let mut applied = 0;
        for (key, binding) in &self.bindings {
            if let Some(number) = data.get(key) {
                binding.apply(*number);
                applied += 1;
            }
        }
        debug!(key = self.storage_key.as_str(), applied, "applied save data");
        Ok(applied)
    }

    /// The entry for `key` in the last loaded save.
    pub fn loaded_entry(&self, key: &str) -> Option<f64> {
        self.loaded.as_ref().and_then(|data| data.get(key).copied())
    }

    /// Check whether a previous save was found.
    pub fn has_loaded_save(&self) -> bool {
        self.loaded.is_some()
    }

    /// Bound keys, in binding order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// The key the save is stored under.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn check_key(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if self.bindings.contains_key(key) {
            return Err(StorageError::DuplicateKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, key: &str, binding: Binding) {
        if let Some(number) = self.loaded_entry(key) {
            binding.apply(number);
        }
        self.bindings.insert(key.to_string(), binding);
    }
}

impl<S: KeyValueStore> fmt::Debug for StorageDevice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageDevice")
            .field("storage_key", &self.storage_key)
            .field("keys", &self.bindings.keys().collect::<Vec<_>>())
            .field("has_loaded_save", &self.loaded.is_some())
            .finish()
    }
}

fn read_save<S: KeyValueStore + ?Sized>(
    store: &S,
    storage_key: &str,
) -> Result<Option<SaveData>, StorageError> {
    let Some(blob) = store.read(storage_key)? else {
        return Ok(None);
    };
    Ok(parse_save(storage_key, &blob))
}

fn parse_save(storage_key: &str, blob: &str) -> Option<SaveData> {
    let raw: IndexMap<String, Value> = match serde_json::from_str(blob) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key = storage_key, error = %err, "corrupt save ignored");
            return None;
        }
    };

    let mut data = SaveData::with_capacity(raw.len());
    for (key, value) in raw {
        match value.as_f64() {
            Some(number) => {
                data.insert(key, number);
            }
            None => warn!(key = key.as_str(), "non-numeric save entry skipped"),
        }
    }
    Some(data)
}
