//! Two-state buttons whose color follows a boolean, such as "affordable".

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::node::{DisplayNode, NodeId, QueueLink};
use super::scheduler::RenderScheduler;
use super::surface::RenderSurface;

/// Style property written by [`ToggleButton`].
pub const BUTTON_COLOR_PROPERTY: &str = "background-color";

struct ButtonNode {
    id: NodeId,
    link: QueueLink,
    state: Cell<Option<bool>>,
    rendered_state: Cell<Option<bool>>,
    surface: Rc<dyn RenderSurface>,
    on_color: String,
    off_color: String,
}

impl DisplayNode for ButtonNode {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn queue_link(&self) -> &QueueLink {
        &self.link
    }

    fn render(&self) {
        let state = self.state.get();
        if state == self.rendered_state.get() {
            return;
        }
        if let Some(on) = state {
            let color = if on { &self.on_color } else { &self.off_color };
            self.surface.set_style(BUTTON_COLOR_PROPERTY, color);
        }
        self.rendered_state.set(state);
    }
}

/// A button whose background color reflects an on/off state.
///
/// State changes are deferred to the next flush, and a flush only writes to
/// the surface when the state differs from what was last drawn.
#[derive(Clone)]
pub struct ToggleButton {
    node: Rc<ButtonNode>,
    scheduler: RenderScheduler,
}

impl ToggleButton {
    /// Create a button with no state yet.
    pub fn new(
        surface: Rc<dyn RenderSurface>,
        on_color: impl Into<String>,
        off_color: impl Into<String>,
        scheduler: &RenderScheduler,
    ) -> Self {
        Self {
            node: Rc::new(ButtonNode {
                id: NodeId::new(),
                link: QueueLink::new(),
                state: Cell::new(None),
                rendered_state: Cell::new(None),
                surface,
                on_color: on_color.into(),
                off_color: off_color.into(),
            }),
            scheduler: scheduler.clone(),
        }
    }

    /// Set the state, queueing a render if it changed.
    pub fn set_state(&self, state: bool) {
        if self.node.state.get() == Some(state) {
            return;
        }
        self.node.state.set(Some(state));
        self.scheduler
            .enqueue(Rc::clone(&self.node) as Rc<dyn DisplayNode>);
    }

    /// The latest state, if one was ever set.
    pub fn state(&self) -> Option<bool> {
        self.node.state.get()
    }

    /// Check whether the button is queued for render.
    pub fn is_dirty(&self) -> bool {
        self.node.link.is_dirty()
    }
}

impl fmt::Debug for ToggleButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleButton")
            .field("id", &self.node.id)
            .field("state", &self.node.state.get())
            .field("rendered_state", &self.node.rendered_state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextSurface;

    fn button(scheduler: &RenderScheduler) -> (ToggleButton, TextSurface) {
        let surface = TextSurface::new();
        let button = ToggleButton::new(Rc::new(surface.clone()), "green", "red", scheduler);
        (button, surface)
    }

    #[test]
    fn state_change_renders_on_flush() {
        let scheduler = RenderScheduler::new();
        let (button, surface) = button(&scheduler);

        button.set_state(true);
        assert!(button.is_dirty());
        assert_eq!(surface.style(BUTTON_COLOR_PROPERTY), None);

        scheduler.flush();
        assert_eq!(surface.style(BUTTON_COLOR_PROPERTY).as_deref(), Some("green"));
        assert_eq!(button.state(), Some(true));
    }

    #[test]
    fn same_state_is_not_requeued() {
        let scheduler = RenderScheduler::new();
        let (button, _surface) = button(&scheduler);

        button.set_state(false);
        scheduler.flush();
        button.set_state(false);
        assert!(!button.is_dirty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn flip_flop_within_a_tick_writes_nothing() {
        let scheduler = RenderScheduler::new();
        let (button, surface) = button(&scheduler);

        button.set_state(true);
        scheduler.flush();
        assert_eq!(surface.writes(), 1);

        button.set_state(false);
        button.set_state(true);
        scheduler.flush();
        assert_eq!(surface.writes(), 1);
        assert_eq!(surface.style(BUTTON_COLOR_PROPERTY).as_deref(), Some("green"));
    }
}
