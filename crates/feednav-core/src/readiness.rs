//! Two-stage readiness detection.
//!
//! The host page fills its shell in two asynchronous phases and a single
//! watch cannot tell "shell appeared" from "content appeared". The detector
//! therefore arms a one-shot child-list watch on the content root, and when
//! that fires re-arms a fresh one on the app body. The second firing means
//! the page is ready. No polling and no timeouts: a missing anchor is a
//! permanent failure.

use feednav_config::MarkerConfig;
use tracing::{debug, error};

use crate::error::StructuralMismatch;
use crate::page::{ChildListChange, ChildListObserver, WatchSlot};

/// State of a one-shot watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Armed,
    Fired,
}

/// Child-list watch that fires at most once and deregisters as it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneShotWatch {
    slot: WatchSlot,
    state: WatchState,
}

impl OneShotWatch {
    /// Register the observation and return the armed watch.
    pub fn arm<P: ChildListObserver>(page: &mut P, slot: WatchSlot, target: &P::Node) -> Self {
        page.observe(slot, target);
        Self {
            slot,
            state: WatchState::Armed,
        }
    }

    pub fn slot(&self) -> WatchSlot {
        self.slot
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// `Armed → Fired`, disconnecting on the way out. Returns `true` exactly
    /// once; repeated notifications from the same batch are swallowed.
    pub fn fire<P: ChildListObserver>(&mut self, page: &mut P) -> bool {
        match self.state {
            WatchState::Armed => {
                page.disconnect(self.slot);
                self.state = WatchState::Fired;
                true
            }
            WatchState::Fired => false,
        }
    }
}

/// Result of feeding a notification to the detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Still waiting, or the notification was not for an armed stage.
    Pending,
    /// Content has arrived. Yielded once per detector.
    Ready,
    /// The page no longer has the expected shape. Yielded once; the detector
    /// never becomes ready afterwards.
    Failed(StructuralMismatch),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingShell(OneShotWatch),
    AwaitingContent(OneShotWatch),
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct ReadinessDetector {
    markers: MarkerConfig,
    phase: Phase,
}

impl ReadinessDetector {
    pub fn new(markers: MarkerConfig) -> Self {
        Self {
            markers,
            phase: Phase::Idle,
        }
    }

    /// Start watching the content root. Without a content root the detector
    /// stays idle and never fires. Calling this again after the first stage
    /// was armed has no effect.
    pub fn arm<P: ChildListObserver>(&mut self, page: &mut P) {
        if self.phase != Phase::Idle {
            return;
        }
        match page.element_by_id(&self.markers.content_root_id) {
            Some(root) => {
                debug!(id = %self.markers.content_root_id, "waiting for page shell");
                self.phase = Phase::AwaitingShell(OneShotWatch::arm(page, WatchSlot::Shell, &root));
            }
            None => {
                debug!(id = %self.markers.content_root_id, "content root not present, detector idle");
            }
        }
    }

    /// Handle a child-list notification for `slot`.
    pub fn notify<P: ChildListObserver>(
        &mut self,
        page: &mut P,
        slot: WatchSlot,
        _change: ChildListChange,
    ) -> Readiness {
        match &mut self.phase {
            Phase::AwaitingShell(watch) if watch.slot() == slot => {
                if !watch.fire(page) {
                    return Readiness::Pending;
                }
                let Some(app_body) = page
                    .elements_with_marker(&self.markers.app_body)
                    .into_iter()
                    .next()
                else {
                    let mismatch = StructuralMismatch::AppBodyMissing;
                    error!(error = %mismatch, "readiness detection aborted");
                    self.phase = Phase::Failed;
                    return Readiness::Failed(mismatch);
                };
                debug!("page shell loaded, waiting for content");
                self.phase =
                    Phase::AwaitingContent(OneShotWatch::arm(page, WatchSlot::Content, &app_body));
                Readiness::Pending
            }
            Phase::AwaitingContent(watch) if watch.slot() == slot => {
                if !watch.fire(page) {
                    return Readiness::Pending;
                }
                debug!("page content loaded");
                self.phase = Phase::Ready;
                Readiness::Ready
            }
            _ => Readiness::Pending,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn has_failed(&self) -> bool {
        self.phase == Phase::Failed
    }
}
