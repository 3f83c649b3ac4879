//! Content filter for the dynamic feed.
//!
//! Banners, news/editorial widgets and anything else that is not a
//! title-plus-cards category get the hidden marker. Nodes are never detached;
//! the host page keeps its own bookkeeping over them.

use feednav_config::MarkerConfig;
use tracing::{debug, info};

use crate::page::{PageAccessor, PageEffects};

/// Structural children of a navigable category's wrapper (title + card list).
pub const CATEGORY_CHILD_COUNT: usize = 2;

/// Classification of one dynamic-feed child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Navigable,
    Hidden(HideReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// The candidate does not wrap exactly one element.
    ChildCount(usize),
    /// The wrapped element is a news/editorial widget.
    Editorial,
    /// The wrapped element is not title + card list.
    MalformedCategory(usize),
}

/// Totals for one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub examined: usize,
    pub navigable: usize,
    pub hidden: usize,
    /// Candidates that received the hidden marker during this pass.
    pub newly_hidden: usize,
}

pub struct ContentFilter<'a> {
    markers: &'a MarkerConfig,
}

impl<'a> ContentFilter<'a> {
    pub fn new(markers: &'a MarkerConfig) -> Self {
        Self { markers }
    }

    /// Classify one candidate. First matching rule wins.
    pub fn classify<P: PageAccessor>(&self, page: &P, candidate: &P::Node) -> Verdict {
        let children = page.children(candidate);
        let [wrapper] = children.as_slice() else {
            return Verdict::Hidden(HideReason::ChildCount(children.len()));
        };
        if page.has_marker(wrapper, &self.markers.editorial) {
            return Verdict::Hidden(HideReason::Editorial);
        }
        let parts = page.children(wrapper).len();
        if parts != CATEGORY_CHILD_COUNT {
            return Verdict::Hidden(HideReason::MalformedCategory(parts));
        }
        Verdict::Navigable
    }

    /// Mark every non-navigable child of `dynamic_feed` hidden.
    ///
    /// Running it again over an unchanged tree changes nothing.
    pub fn apply<P: PageEffects>(&self, page: &mut P, dynamic_feed: &P::Node) -> FilterReport {
        let mut report = FilterReport::default();
        for candidate in page.children(dynamic_feed) {
            report.examined += 1;
            match self.classify(page, &candidate) {
                Verdict::Navigable => report.navigable += 1,
                Verdict::Hidden(reason) => {
                    report.hidden += 1;
                    if !page.has_marker(&candidate, &self.markers.hidden) {
                        debug!(?candidate, ?reason, "hiding feed entry");
                        page.set_marker(&candidate, &self.markers.hidden);
                        report.newly_hidden += 1;
                    }
                }
            }
        }
        info!(
            examined = report.examined,
            navigable = report.navigable,
            hidden = report.hidden,
            newly_hidden = report.newly_hidden,
            "content filter applied"
        );
        report
    }
}
