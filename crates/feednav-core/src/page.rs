//! Boundary onto the externally owned document tree.
//!
//! The navigation layer never owns the page. It reads structure through
//! [`PageAccessor`], applies presentation-only changes through
//! [`PageEffects`], and asks to be told about direct-child insertions and
//! removals through [`ChildListObserver`]. Node handles are only meaningful
//! for the turn in which they were obtained.

use std::fmt::Debug;

/// Read-only structural queries over the host document.
pub trait PageAccessor {
    /// Handle to one element of the document.
    type Node: Clone + PartialEq + Debug;

    /// Element carrying the given identifier, if any.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Every element in document order carrying `marker`.
    fn elements_with_marker(&self, marker: &str) -> Vec<Self::Node>;

    /// Structural (element) children of `node`, in order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Whether `node` currently carries `marker`.
    fn has_marker(&self, node: &Self::Node, marker: &str) -> bool;

    /// Descendants of `node` (excluding itself) carrying `marker`, in document order.
    fn descendants_with_marker(&self, node: &Self::Node, marker: &str) -> Vec<Self::Node>;

    /// Outbound destination associated with `node`: its own link, or the
    /// first link among its descendants.
    fn link_target(&self, node: &Self::Node) -> Option<String>;
}

/// Presentation-only mutations. None of these change the tree's structure.
pub trait PageEffects: PageAccessor {
    /// Add `marker` to `node`. Adding a marker that is already present is a no-op.
    fn set_marker(&mut self, node: &Self::Node, marker: &str);

    /// Remove `marker` from `node`, if present.
    fn clear_marker(&mut self, node: &Self::Node, marker: &str);

    /// Scroll so that `node` is visible.
    fn bring_into_view(&mut self, node: &Self::Node);

    /// Leave the current page for `destination`.
    fn navigate_to(&mut self, destination: &str);
}

/// Named observation slots. At most one observation is active per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WatchSlot {
    /// Content root, waiting for the page shell.
    Shell,
    /// App body, waiting for the page content.
    Content,
    /// Dynamic feed, waiting for categories appended by infinite scroll.
    Feed,
}

/// Summary of one batch of direct-child mutations on an observed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChildListChange {
    pub added: usize,
    pub removed: usize,
}

impl ChildListChange {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Registration of direct-child observations (not subtree, not attributes).
///
/// Notifications are delivered later, on a separate turn, by whoever drives
/// the session (see [`crate::session::Session::on_child_list`]).
pub trait ChildListObserver: PageAccessor {
    /// Start observing `target`, replacing any observation already in `slot`.
    fn observe(&mut self, slot: WatchSlot, target: &Self::Node);

    /// Stop observing `slot`. Pending, undelivered notifications are dropped.
    fn disconnect(&mut self, slot: WatchSlot);
}
