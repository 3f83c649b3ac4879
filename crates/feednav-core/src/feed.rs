//! Validated rows-of-columns view over the host page.
//!
//! Nothing here is cached. Infinite scroll can insert or reorder categories
//! between any two events, so every call walks the tree again and the
//! returned handles are only good for the current turn. [`FeedReader`]
//! borrows the page immutably, which keeps derived handles from being held
//! across a notification boundary.

use feednav_config::MarkerConfig;
use tracing::trace;

use crate::error::{Lookup, StructuralMismatch};
use crate::page::PageAccessor;

/// Number of structural children a valid feed region has.
pub const FEED_CHILD_COUNT: usize = 3;
/// Position of the dynamic feed among the feed region's children.
pub const DYNAMIC_FEED_INDEX: usize = 1;

/// Validated reference into the feed region.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedAnchor<N> {
    pub feed: N,
    pub dynamic_feed: N,
}

/// Per-turn reader over the feed. Cheap to build; build a new one per event.
pub struct FeedReader<'a, P: PageAccessor> {
    page: &'a P,
    markers: &'a MarkerConfig,
}

impl<'a, P: PageAccessor> FeedReader<'a, P> {
    pub fn new(page: &'a P, markers: &'a MarkerConfig) -> Self {
        Self { page, markers }
    }

    /// Find and validate the single feed region.
    pub fn locate_feed(&self) -> Result<FeedAnchor<P::Node>, StructuralMismatch> {
        let mut feeds = self.page.elements_with_marker(&self.markers.feed);
        if feeds.len() != 1 {
            return Err(StructuralMismatch::FeedCount { found: feeds.len() });
        }
        let feed = feeds.remove(0);
        let mut children = self.page.children(&feed);
        if children.len() != FEED_CHILD_COUNT {
            return Err(StructuralMismatch::FeedChildCount {
                found: children.len(),
            });
        }
        let dynamic_feed = children.swap_remove(DYNAMIC_FEED_INDEX);
        if !self.page.has_marker(&dynamic_feed, &self.markers.dynamic_feed) {
            return Err(StructuralMismatch::DynamicFeedMissing);
        }
        Ok(FeedAnchor { feed, dynamic_feed })
    }

    /// Categories the content filter left visible, in document order.
    pub fn rows(&self) -> Lookup<Vec<P::Node>> {
        let anchor = self.locate_feed()?;
        let rows: Vec<P::Node> = self
            .page
            .children(&anchor.dynamic_feed)
            .into_iter()
            .filter(|row| !self.page.has_marker(row, &self.markers.hidden))
            .collect();
        if rows.is_empty() {
            trace!("no navigable rows");
            return Ok(None);
        }
        Ok(Some(rows))
    }

    /// Resolve one row. `None` means the first row.
    pub fn row(&self, row: Option<usize>) -> Lookup<P::Node> {
        let Some(rows) = self.rows()? else {
            return Ok(None);
        };
        Ok(pick(rows, row))
    }

    /// Cards of one row. `None` means the first row.
    pub fn columns(&self, row: Option<usize>) -> Lookup<Vec<P::Node>> {
        let Some(row_node) = self.row(row)? else {
            trace!(?row, "row out of range");
            return Ok(None);
        };
        let cards = self
            .page
            .descendants_with_marker(&row_node, &self.markers.card);
        if cards.is_empty() {
            trace!(?row, "row has no cards");
            return Ok(None);
        }
        Ok(Some(cards))
    }

    /// One card. `None` for either index means the first.
    pub fn column(&self, row: Option<usize>, column: Option<usize>) -> Lookup<P::Node> {
        let Some(cards) = self.columns(row)? else {
            return Ok(None);
        };
        let card = pick(cards, column);
        if card.is_none() {
            trace!(?row, ?column, "column out of range");
        }
        Ok(card)
    }
}

fn pick<N>(mut items: Vec<N>, index: Option<usize>) -> Option<N> {
    let index = index.unwrap_or(0);
    if index < items.len() {
        Some(items.swap_remove(index))
    } else {
        None
    }
}
