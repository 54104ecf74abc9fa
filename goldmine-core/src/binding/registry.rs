//! View Registry
//!
//! Maps root keys to the closed set of observable values each root exposes,
//! and resolves dotted paths against that map. Everything is validated when
//! a root is defined, so resolution is a pair of lookups.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use super::path::{validate_name, BindingPath};
use super::BindingError;
use crate::reactive::ObservableValue;
use crate::render::RenderSurface;

/// An object that exposes named observable values for binding.
pub trait BindingRoot {
    /// The values this root exposes, by field name.
    fn exposed_values(&self) -> Vec<(&'static str, ObservableValue)>;
}

/// Registered roots and their exposed fields.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    roots: IndexMap<String, IndexMap<String, ObservableValue>>,
}

impl ViewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root under `key`.
    pub fn define(&mut self, key: &str, root: &dyn BindingRoot) -> Result<(), BindingError> {
        self.define_fields(key, root.exposed_values())
    }

    /// Register a root under `key` from explicit `(field, value)` pairs.
    ///
    /// Fails on an invalid or duplicate root key, and on invalid or
    /// duplicate field names. Nothing is registered on failure.
    pub fn define_fields<'a, I>(&mut self, key: &str, fields: I) -> Result<(), BindingError>
    where
        I: IntoIterator<Item = (&'a str, ObservableValue)>,
    {
        validate_name(key)?;
        if self.roots.contains_key(key) {
            return Err(BindingError::DuplicateRoot {
                root: key.to_string(),
            });
        }

        let mut exposed = IndexMap::new();
        for (field, value) in fields {
            validate_name(field)?;
            if exposed.insert(field.to_string(), value).is_some() {
                return Err(BindingError::DuplicateField {
                    root: key.to_string(),
                    field: field.to_string(),
                });
            }
        }

        debug!(root = key, fields = exposed.len(), "defined binding root");
        self.roots.insert(key.to_string(), exposed);
        Ok(())
    }

    /// Resolve a dotted path to the value it names.
    pub fn resolve(&self, path: &str) -> Result<ObservableValue, BindingError> {
        let path = BindingPath::parse(path)?;
        self.resolve_path(&path)
    }

    /// Resolve an already parsed path.
    pub fn resolve_path(&self, path: &BindingPath) -> Result<ObservableValue, BindingError> {
        let fields = self
            .roots
            .get(path.root())
            .ok_or_else(|| BindingError::UnknownRoot {
                root: path.root().to_string(),
            })?;

        fields
            .get(path.field())
            .cloned()
            .ok_or_else(|| BindingError::UnknownField {
                root: path.root().to_string(),
                field: path.field().to_string(),
            })
    }

    /// Resolve `path` and attach `surface` to the value it names.
    ///
    /// Returns whether the surface was newly attached.
    pub fn attach(&self, path: &str, surface: Rc<dyn RenderSurface>) -> Result<bool, BindingError> {
        let value = self.resolve(path)?;
        Ok(value.attach_surface(surface))
    }

    /// Attach a batch of surfaces, stopping at the first bad path.
    ///
    /// Returns the number of surfaces newly attached.
    pub fn attach_all<'a, I>(&self, bindings: I) -> Result<usize, BindingError>
    where
        I: IntoIterator<Item = (&'a str, Rc<dyn RenderSurface>)>,
    {
        let mut attached = 0;
        for (path, surface) in bindings {
            if self.attach(path, surface)? {
                attached += 1;
            }
        }
        debug!(attached, "attached render surfaces");
        Ok(attached)
    }

    /// Every bindable path, in definition order.
    pub fn paths(&self) -> Vec<BindingPath> {
        self.roots
            .iter()
            .flat_map(|(root, fields)| {
                fields.keys().map(move |field| BindingPath::new(root, field))
            })
            .filter_map(Result::ok)
            .collect()
    }

    /// Check whether a root key is registered.
    pub fn contains_root(&self, key: &str) -> bool {
        self.roots.contains_key(key)
    }
}
