//! Binding and Projection
//!
//! The external-facing layer that connects observable values to the
//! display:
//!
//! - [`ViewRegistry`] resolves `<root>.<field>` paths to values and attaches
//!   render surfaces to them.
//! - [`Projection`] derives UI state (button enablement and the like) from
//!   one or more values.
//!
//! Roots declare their bindable fields up front through [`BindingRoot`], so
//! a bad path is reported as a [`BindingError`] at setup time.

mod path;
mod projection;
mod registry;

pub use path::BindingPath;
pub use projection::Projection;
pub use registry::{BindingRoot, ViewRegistry};

use thiserror::Error;

/// Setup-time binding failures. These indicate programming errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The path is not of the form `<root>.<field>`.
    #[error("expected path of the form `<root>.<field>`, got `{path}`")]
    MalformedPath { path: String },

    /// No root is registered under the path's first segment.
    #[error("unresolved path: no root named `{root}`")]
    UnknownRoot { root: String },

    /// The root exists but exposes no value under that name.
    #[error("`{root}.{field}` does not map to an observable value")]
    UnknownField { root: String, field: String },

    /// A root with this key is already registered.
    #[error("binding root `{root}` is already defined")]
    DuplicateRoot { root: String },

    /// A root exposes the same field name twice.
    #[error("root `{root}` exposes `{field}` more than once")]
    DuplicateField { root: String, field: String },

    /// A root key or field name contains characters a path cannot hold.
    #[error("`{name}` is not a valid binding name")]
    InvalidName { name: String },
}
