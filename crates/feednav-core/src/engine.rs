//! Navigation engine: cursor moves, highlight side effects and confirm.
//!
//! The engine owns the cursor and nothing else. Every event builds a fresh
//! [`FeedReader`], resolves what it needs and drops it before returning.

use feednav_config::MarkerConfig;
use tracing::{debug, info, trace, warn};

use crate::cursor::{Cursor, Move, Target};
use crate::error::Lookup;
use crate::feed::FeedReader;
use crate::filter::{ContentFilter, FilterReport};
use crate::input::{EventResult, NavInput};
use crate::page::{ChildListChange, PageEffects};

#[derive(Debug)]
pub struct NavigationEngine {
    markers: MarkerConfig,
    cursor: Cursor,
}

impl NavigationEngine {
    pub fn new(markers: MarkerConfig) -> Self {
        Self {
            markers,
            cursor: Cursor::default(),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn markers(&self) -> &MarkerConfig {
        &self.markers
    }

    /// Validate the feed and run the content filter once. Returns the dynamic
    /// feed so the caller can watch it for infinite-scroll additions.
    pub fn start<P: PageEffects>(&mut self, page: &mut P) -> Option<P::Node> {
        let anchor = match FeedReader::new(page, &self.markers).locate_feed() {
            Ok(anchor) => anchor,
            Err(mismatch) => {
                warn!(error = %mismatch, "feed not usable, navigation disabled");
                return None;
            }
        };
        let report = ContentFilter::new(&self.markers).apply(page, &anchor.dynamic_feed);
        info!(rows = report.navigable, "navigation engine started");
        Some(anchor.dynamic_feed)
    }

    /// React to direct-child changes of the dynamic feed. Pure removals need
    /// no re-filtering.
    pub fn on_feed_change<P: PageEffects>(
        &mut self,
        page: &mut P,
        change: ChildListChange,
    ) -> Option<FilterReport> {
        if change.added == 0 {
            trace!(removed = change.removed, "feed change without additions ignored");
            return None;
        }
        let anchor = match FeedReader::new(page, &self.markers).locate_feed() {
            Ok(anchor) => anchor,
            Err(mismatch) => {
                warn!(error = %mismatch, "feed changed shape, filter skipped");
                return None;
            }
        };
        Some(ContentFilter::new(&self.markers).apply(page, &anchor.dynamic_feed))
    }

    pub fn handle_input<P: PageEffects>(&mut self, page: &mut P, input: NavInput) -> EventResult {
        match input {
            NavInput::Move(mv) => self.apply_move(page, mv),
            NavInput::Confirm => self.confirm(page),
        }
    }

    /// Apply one directional move. `Ignored` leaves the cursor untouched.
    pub fn apply_move<P: PageEffects>(&mut self, page: &mut P, mv: Move) -> EventResult {
        let Some(target) = self.cursor.plan(mv) else {
            trace!(?mv, cursor = ?self.cursor, "move blocked at first entry");
            return EventResult::Ignored;
        };

        let (previous, next) = {
            let reader = FeedReader::new(&*page, &self.markers);
            let next = if mv.is_row_move() {
                match settle(reader.row(Some(target.row))) {
                    Some(_) => settle(reader.column(Some(target.row), Some(target.column))),
                    None => return miss(mv, target),
                }
            } else {
                match settle(reader.column(Some(target.row), Some(target.column))) {
                    Some(card) => Some(card),
                    None => return miss(mv, target),
                }
            };
            let previous = if self.cursor.is_set() {
                settle(reader.column(self.cursor.row, self.cursor.column))
            } else {
                None
            };
            (previous, next)
        };

        // Rows may have been inserted or hidden since the last move, in which
        // case the stored indices no longer point at the highlighted card.
        let mut stale = page.elements_with_marker(&self.markers.selected);
        if let Some(previous) = previous {
            if !stale.contains(&previous) {
                stale.push(previous);
            }
        }
        for node in &stale {
            page.clear_marker(node, &self.markers.selected);
        }
        match next {
            Some(card) => {
                page.set_marker(&card, &self.markers.selected);
                page.bring_into_view(&card);
            }
            None => debug!(row = target.row, "row selected without a card to highlight"),
        }
        self.cursor.commit(target);
        trace!(cursor = ?self.cursor, "cursor moved");
        EventResult::Handled
    }

    /// Follow the link of the card under the cursor. An unset cursor resolves
    /// to the first card.
    pub fn confirm<P: PageEffects>(&mut self, page: &mut P) -> EventResult {
        let destination = {
            let reader = FeedReader::new(&*page, &self.markers);
            settle(reader.column(self.cursor.row, self.cursor.column))
                .and_then(|card| page.link_target(&card))
        };
        match destination {
            Some(destination) => {
                info!(%destination, "navigating");
                page.navigate_to(&destination);
                EventResult::Handled
            }
            None => {
                trace!(cursor = ?self.cursor, "nothing to confirm");
                EventResult::Ignored
            }
        }
    }
}

/// Collapse a lookup to an option, reporting structural mismatches.
fn settle<T>(lookup: Lookup<T>) -> Option<T> {
    match lookup {
        Ok(found) => found,
        Err(mismatch) => {
            warn!(error = %mismatch, "feed structure mismatch");
            None
        }
    }
}

fn miss(mv: Move, target: Target) -> EventResult {
    trace!(?mv, row = target.row, column = target.column, "move target unresolved");
    EventResult::Ignored
}
