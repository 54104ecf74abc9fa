//! Render surfaces: the display endpoints values and buttons write into.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

/// Something a node can write text or style into, such as a DOM element.
pub trait RenderSurface {
    /// Replace the surface's text content.
    fn set_text(&self, text: &str);

    /// Set a single style property. Surfaces without styling ignore it.
    fn set_style(&self, _property: &str, _value: &str) {}
}

#[derive(Debug, Default)]
struct SurfaceState {
    text: RefCell<String>,
    styles: RefCell<IndexMap<String, String>>,
    writes: Cell<usize>,
}

/// In-memory surface that records what was written to it.
///
/// Clones share the same state, so one clone can be attached to a value
/// while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    state: Rc<SurfaceState>,
}

impl TextSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text content.
    pub fn text(&self) -> String {
        self.state.text.borrow().clone()
    }

    /// The current value of a style property.
    pub fn style(&self, property: &str) -> Option<String> {
        self.state.styles.borrow().get(property).cloned()
    }

    /// Number of text and style writes received.
    pub fn writes(&self) -> usize {
        self.state.writes.get()
    }

    /// Check whether two handles refer to the same surface.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl RenderSurface for TextSurface {
    fn set_text(&self, text: &str) {
        let mut current = self.state.text.borrow_mut();
        current.clear();
        current.push_str(text);
        self.state.writes.set(self.state.writes.get() + 1);
    }

    fn set_style(&self, property: &str, value: &str) {
        self.state
            .styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
        self.state.writes.set(self.state.writes.get() + 1);
    }
}
