//! Wires readiness detection, the feed watcher and key handling together.
//!
//! A `Session` is driven entirely from outside: `start` once per page load,
//! `on_child_list` for every delivered notification and `on_key` for every key
//! press. It never blocks and never polls.

use feednav_config::FeedNavConfig;
use tracing::{debug, info};

use crate::engine::NavigationEngine;
use crate::input::{EventResult, KeyMap, KeyStroke, NavInput};
use crate::page::{ChildListChange, ChildListObserver, PageEffects, WatchSlot};
use crate::readiness::{Readiness, ReadinessDetector};

/// Everything the navigation layer needs from the host page.
pub trait PageHost: PageEffects + ChildListObserver {}

impl<T: PageEffects + ChildListObserver> PageHost for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the page to finish loading.
    Loading,
    /// Engine running and the feed watched.
    Running,
    /// Readiness succeeded but the feed was unusable, or readiness failed.
    Inert,
}

#[derive(Debug)]
pub struct Session {
    detector: ReadinessDetector,
    engine: NavigationEngine,
    keymap: KeyMap,
    state: SessionState,
}

impl Session {
    pub fn new(config: &FeedNavConfig) -> Self {
        Self {
            detector: ReadinessDetector::new(config.markers.clone()),
            engine: NavigationEngine::new(config.markers.clone()),
            keymap: KeyMap::from_bindings(&config.keys),
            state: SessionState::Loading,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    /// Arm the first readiness stage.
    pub fn start<P: PageHost>(&mut self, page: &mut P) {
        self.detector.arm(page);
    }

    /// Deliver one batch of child-list changes observed in `slot`.
    pub fn on_child_list<P: PageHost>(
        &mut self,
        page: &mut P,
        slot: WatchSlot,
        change: ChildListChange,
    ) {
        match slot {
            WatchSlot::Feed => {
                if self.state == SessionState::Running {
                    self.engine.on_feed_change(page, change);
                }
            }
            WatchSlot::Shell | WatchSlot::Content => {
                match self.detector.notify(page, slot, change) {
                    Readiness::Pending => {}
                    Readiness::Ready => self.begin(page),
                    Readiness::Failed(_) => self.state = SessionState::Inert,
                }
            }
        }
    }

    /// Handle a key press. `Ignored` means the host should run its default action.
    pub fn on_key<P: PageHost>(&mut self, page: &mut P, stroke: &KeyStroke) -> EventResult {
        if self.state != SessionState::Running {
            return EventResult::Ignored;
        }
        match self.keymap.resolve(stroke) {
            Some(input) => self.on_input(page, input),
            None => EventResult::Ignored,
        }
    }

    /// Handle an already decoded input.
    pub fn on_input<P: PageHost>(&mut self, page: &mut P, input: NavInput) -> EventResult {
        if self.state != SessionState::Running {
            return EventResult::Ignored;
        }
        self.engine.handle_input(page, input)
    }

    fn begin<P: PageHost>(&mut self, page: &mut P) {
        match self.engine.start(page) {
            Some(dynamic_feed) => {
                // Lives as long as the page; never disconnected.
                page.observe(WatchSlot::Feed, &dynamic_feed);
                self.state = SessionState::Running;
                info!("keyboard navigation active");
            }
            None => {
                debug!("page ready but feed unusable");
                self.state = SessionState::Inert;
            }
        }
    }
}
