//! [`WebPage`]: the live DOM behind the core page traits.

use std::collections::HashMap;
use std::rc::Rc;

use feednav_config::{HighlightConfig, ScrollBlock};
use feednav_core::{ChildListChange, ChildListObserver, PageAccessor, PageEffects, WatchSlot};
use tracing::{error, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlCollection, MutationObserver, MutationObserverInit, MutationRecord,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

/// Receives child-list batches for a slot, on the observer's own turn.
pub type Dispatch = Rc<dyn Fn(WatchSlot, ChildListChange)>;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

struct ActiveObserver {
    observer: MutationObserver,
    _callback: ObserverCallback,
}

pub struct WebPage {
    window: Window,
    document: Document,
    highlight: HighlightConfig,
    dispatch: Dispatch,
    observers: HashMap<WatchSlot, ActiveObserver>,
    // A disconnect usually happens inside the slot's own callback, so the
    // closure has to outlive the call that retires it.
    retired: Vec<ActiveObserver>,
}

impl WebPage {
    pub fn new(
        window: Window,
        document: Document,
        highlight: HighlightConfig,
        dispatch: Dispatch,
    ) -> Self {
        Self {
            window,
            document,
            highlight,
            dispatch,
            observers: HashMap::new(),
            retired: Vec::new(),
        }
    }

    fn register(&self, slot: WatchSlot, target: &Element) -> Result<ActiveObserver, JsValue> {
        let dispatch = Rc::clone(&self.dispatch);
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                dispatch(slot, summarize(&records));
            },
        ) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        observer.observe_with_options(target, &init)?;
        Ok(ActiveObserver {
            observer,
            _callback: callback,
        })
    }
}

fn summarize(records: &js_sys::Array) -> ChildListChange {
    let mut change = ChildListChange::default();
    for record in records.iter() {
        if let Ok(record) = record.dyn_into::<MutationRecord>() {
            change.added += record.added_nodes().length() as usize;
            change.removed += record.removed_nodes().length() as usize;
        }
    }
    change
}

fn collect(collection: &HtmlCollection) -> Vec<Element> {
    (0..collection.length())
        .filter_map(|index| collection.item(index))
        .collect()
}

impl PageAccessor for WebPage {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_with_marker(&self, marker: &str) -> Vec<Element> {
        collect(&self.document.get_elements_by_class_name(marker))
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        collect(&node.children())
    }

    fn has_marker(&self, node: &Element, marker: &str) -> bool {
        node.class_list().contains(marker)
    }

    fn descendants_with_marker(&self, node: &Element, marker: &str) -> Vec<Element> {
        collect(&node.get_elements_by_class_name(marker))
    }

    fn link_target(&self, node: &Element) -> Option<String> {
        if let Some(href) = node.get_attribute("href") {
            return Some(href);
        }
        node.query_selector("a[href]")
            .ok()
            .flatten()
            .and_then(|link| link.get_attribute("href"))
    }
}

impl PageEffects for WebPage {
    fn set_marker(&mut self, node: &Element, marker: &str) {
        if let Err(err) = node.class_list().add_1(marker) {
            warn!(?err, marker, "failed to add marker");
        }
    }

    fn clear_marker(&mut self, node: &Element, marker: &str) {
        if let Err(err) = node.class_list().remove_1(marker) {
            warn!(?err, marker, "failed to remove marker");
        }
    }

    fn bring_into_view(&mut self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(if self.highlight.smooth_scroll {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        options.set_block(match self.highlight.scroll_block {
            ScrollBlock::Start => ScrollLogicalPosition::Start,
            ScrollBlock::Center => ScrollLogicalPosition::Center,
            ScrollBlock::End => ScrollLogicalPosition::End,
            ScrollBlock::Nearest => ScrollLogicalPosition::Nearest,
        });
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn navigate_to(&mut self, destination: &str) {
        if let Err(err) = self.window.location().set_href(destination) {
            error!(?err, destination, "navigation failed");
        }
    }
}

impl ChildListObserver for WebPage {
    fn observe(&mut self, slot: WatchSlot, target: &Element) {
        self.disconnect(slot);
        match self.register(slot, target) {
            Ok(active) => {
                trace!(?slot, "observer connected");
                self.observers.insert(slot, active);
            }
            Err(err) => error!(?err, ?slot, "failed to observe element"),
        }
    }

    fn disconnect(&mut self, slot: WatchSlot) {
        if let Some(active) = self.observers.remove(&slot) {
            // Also discards records queued but not yet delivered.
            active.observer.disconnect();
            trace!(?slot, "observer disconnected");
            self.retired.push(active);
        }
    }
}
