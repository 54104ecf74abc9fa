//! A single tooltip surface shared by every hoverable element.
//!
//! Content is either fixed text or a function re-evaluated on every
//! [`Tooltip::refresh`], which the game loop calls periodically so progress
//! shown in a visible tooltip stays current.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::render::RenderSurface;

enum Content {
    Static,
    Dynamic(Rc<dyn Fn() -> String>),
}

/// The tooltip surface and whatever it is currently showing.
pub struct Tooltip {
    surface: Rc<dyn RenderSurface>,
    content: RefCell<Option<Content>>,
}

impl Tooltip {
    /// Use `surface` as the tooltip.
    pub fn new(surface: Rc<dyn RenderSurface>) -> Self {
        Self {
            surface,
            content: RefCell::new(None),
        }
    }

    /// Show fixed text.
    pub fn show_text(&self, text: &str) {
        self.surface.set_text(text);
        self.surface.set_style("display", "block");
        *self.content.borrow_mut() = Some(Content::Static);
    }

    /// Show text produced by `text`, re-evaluated on every refresh.
    pub fn show_dynamic<F>(&self, text: F)
    where
        F: Fn() -> String + 'static,
    {
        self.surface.set_text(&text());
        self.surface.set_style("display", "block");
        *self.content.borrow_mut() = Some(Content::Dynamic(Rc::new(text)));
    }

    /// Hide the tooltip and drop its content.
    pub fn hide(&self) {
        self.surface.set_style("display", "none");
        self.surface.set_text("");
        *self.content.borrow_mut() = None;
    }

    /// Re-evaluate dynamic content. Does nothing for hidden or fixed
    /// tooltips.
    pub fn refresh(&self) {
        let getter = match &*self.content.borrow() {
            Some(Content::Dynamic(getter)) => Rc::clone(getter),
            _ => return,
        };
        self.surface.set_text(&getter());
    }

    /// Check whether the tooltip is showing.
    pub fn is_visible(&self) -> bool {
        self.content.borrow().is_some()
    }
}

impl fmt::Debug for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = match &*self.content.borrow() {
            None => "hidden",
            Some(Content::Static) => "static",
            Some(Content::Dynamic(_)) => "dynamic",
        };
        f.debug_struct("Tooltip").field("content", &content).finish()
    }
}
