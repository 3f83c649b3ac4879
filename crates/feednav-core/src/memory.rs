//! In-process document used for tests and offline replays.
//!
//! HTML is parsed with `scraper` and copied into an `ego_tree::Tree` of
//! [`PageNode`]s that keeps only what the navigation layer can see: tag,
//! identifier, classes and link target. Structural edits queue child-list
//! notifications for observed nodes the way a MutationObserver batches its
//! records: one coalesced notification per slot until it is taken.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html};
use tracing::trace;

use crate::page::{ChildListChange, ChildListObserver, PageAccessor, PageEffects, WatchSlot};
use crate::session::Session;

/// Element data retained from parsed HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub href: Option<String>,
}

impl PageNode {
    fn document() -> Self {
        Self {
            tag: "#document".to_string(),
            id: None,
            classes: Vec::new(),
            href: None,
        }
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        Self {
            tag: value.name().to_string(),
            id: value.attr("id").map(str::to_string),
            classes: value.classes().map(str::to_string).collect(),
            href: value.attr("href").map(str::to_string),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Mutable in-memory document implementing every page boundary trait.
#[derive(Debug)]
pub struct MemoryPage {
    tree: Tree<PageNode>,
    observed: BTreeMap<WatchSlot, NodeId>,
    pending: BTreeMap<WatchSlot, ChildListChange>,
    scrolled: Vec<NodeId>,
    navigations: Vec<String>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// An empty document.
    pub fn new() -> Self {
        Self {
            tree: Tree::new(PageNode::document()),
            observed: BTreeMap::new(),
            pending: BTreeMap::new(),
            scrolled: Vec::new(),
            navigations: Vec::new(),
        }
    }

    /// Build a document from an HTML fragment.
    pub fn from_html(html: &str) -> Result<Self> {
        let mut page = Self::new();
        let root = page.root();
        let added = page.insert_html(root, html)?;
        if added.is_empty() {
            return Err(anyhow!("HTML fragment contains no elements"));
        }
        Ok(page)
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn node(&self, id: NodeId) -> Option<&PageNode> {
        self.tree.get(id).map(|node| node.value())
    }

    /// Append the elements of `html` as children of `parent`, notifying any
    /// observer of `parent`. Returns the new top-level nodes.
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>> {
        let added = self.insert_html(parent, html)?;
        self.record(
            parent,
            ChildListChange {
                added: added.len(),
                removed: 0,
            },
        );
        Ok(added)
    }

    /// Detach `node` from its parent, notifying any observer of the parent.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let parent = self
            .tree
            .get(node)
            .and_then(|n| n.parent())
            .map(|p| p.id())
            .ok_or_else(|| anyhow!("node {node:?} is not attached"))?;
        if let Some(mut target) = self.tree.get_mut(node) {
            target.detach();
        }
        self.record(parent, ChildListChange { added: 0, removed: 1 });
        Ok(())
    }

    /// Drain queued notifications, at most one per observed slot.
    pub fn take_notifications(&mut self) -> Vec<(WatchSlot, ChildListChange)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn is_observed(&self, slot: WatchSlot) -> bool {
        self.observed.contains_key(&slot)
    }

    /// Nodes passed to `bring_into_view`, oldest first.
    pub fn scrolled_into_view(&self) -> &[NodeId] {
        &self.scrolled
    }

    /// Destinations passed to `navigate_to`, oldest first.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Every attached node carrying `class`.
    pub fn nodes_with_class(&self, class: &str) -> Vec<NodeId> {
        self.elements_with_marker(class)
    }

    fn insert_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>> {
        if self.tree.get(parent).is_none() {
            return Err(anyhow!("unknown parent node {parent:?}"));
        }
        let fragment = Html::parse_fragment(html);
        let mut added = Vec::new();
        for element in fragment.root_element().children().filter_map(ElementRef::wrap) {
            added.push(self.copy_element(parent, element));
        }
        Ok(added)
    }

    fn copy_element(&mut self, parent: NodeId, element: ElementRef<'_>) -> NodeId {
        let id = match self.tree.get_mut(parent) {
            Some(mut parent) => parent.append(PageNode::from_element(element)).id(),
            None => return parent,
        };
        for child in element.children().filter_map(ElementRef::wrap) {
            self.copy_element(id, child);
        }
        id
    }

    fn record(&mut self, target: NodeId, change: ChildListChange) {
        if change.is_empty() {
            return;
        }
        let slots: Vec<WatchSlot> = self
            .observed
            .iter()
            .filter(|(_, observed)| **observed == target)
            .map(|(slot, _)| *slot)
            .collect();
        for slot in slots {
            let entry = self.pending.entry(slot).or_default();
            entry.added += change.added;
            entry.removed += change.removed;
        }
    }

    fn attached(&self, id: NodeId) -> Option<NodeRef<'_, PageNode>> {
        let node = self.tree.get(id)?;
        let root = self.tree.root().id();
        if node.id() == root || node.ancestors().any(|a| a.id() == root) {
            Some(node)
        } else {
            None
        }
    }
}

impl PageAccessor for MemoryPage {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .root()
            .descendants()
            .find(|node| node.value().id.as_deref() == Some(id))
            .map(|node| node.id())
    }

    fn elements_with_marker(&self, marker: &str) -> Vec<NodeId> {
        self.tree
            .root()
            .descendants()
            .filter(|node| node.value().has_class(marker))
            .map(|node| node.id())
            .collect()
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.attached(*node)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    fn has_marker(&self, node: &NodeId, marker: &str) -> bool {
        self.node(*node).is_some_and(|n| n.has_class(marker))
    }

    fn descendants_with_marker(&self, node: &NodeId, marker: &str) -> Vec<NodeId> {
        self.attached(*node)
            .map(|n| {
                n.descendants()
                    .skip(1)
                    .filter(|d| d.value().has_class(marker))
                    .map(|d| d.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn link_target(&self, node: &NodeId) -> Option<String> {
        let node = self.attached(*node)?;
        node.descendants().find_map(|d| d.value().href.clone())
    }
}

impl PageEffects for MemoryPage {
    fn set_marker(&mut self, node: &NodeId, marker: &str) {
        if let Some(mut target) = self.tree.get_mut(*node) {
            let value = target.value();
            if !value.has_class(marker) {
                value.classes.push(marker.to_string());
            }
        }
    }

    fn clear_marker(&mut self, node: &NodeId, marker: &str) {
        if let Some(mut target) = self.tree.get_mut(*node) {
            target.value().classes.retain(|c| c != marker);
        }
    }

    fn bring_into_view(&mut self, node: &NodeId) {
        self.scrolled.push(*node);
    }

    fn navigate_to(&mut self, destination: &str) {
        self.navigations.push(destination.to_string());
    }
}

impl ChildListObserver for MemoryPage {
    fn observe(&mut self, slot: WatchSlot, target: &NodeId) {
        trace!(?slot, ?target, "observe");
        self.pending.remove(&slot);
        self.observed.insert(slot, *target);
    }

    fn disconnect(&mut self, slot: WatchSlot) {
        trace!(?slot, "disconnect");
        self.observed.remove(&slot);
        self.pending.remove(&slot);
    }
}

/// Deliver queued notifications to `session` until the page is quiescent.
///
/// Returns the number of notifications delivered.
pub fn settle(session: &mut Session, page: &mut MemoryPage) -> usize {
    let mut delivered = 0;
    loop {
        let batch = page.take_notifications();
        if batch.is_empty() {
            return delivered;
        }
        for (slot, change) in batch {
            session.on_child_list(page, slot, change);
            delivered += 1;
        }
    }
}
