//! Browser entry point for feednav.
//!
//! Builds a [`Session`] over the live document, routes `MutationObserver`
//! batches and `keydown` events into it, and suppresses the browser's default
//! action for every key the session handles.

pub mod style;

#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
pub mod page;

#[cfg(target_arch = "wasm32")]
pub use app::start;

#[cfg(target_arch = "wasm32")]
mod app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use feednav_config::FeedNavConfig;
    use feednav_core::{ChildListChange, KeyStroke, Session, WatchSlot};
    use tracing::{Level, info, warn};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent};

    use crate::logging;
    use crate::page::WebPage;
    use crate::style;

    const EMBEDDED_CONFIG: &str = include_str!("../feednav.toml");

    struct App {
        session: Session,
        page: WebPage,
    }

    impl App {
        fn deliver(app: &Weak<RefCell<App>>, slot: WatchSlot, change: ChildListChange) {
            let Some(app) = app.upgrade() else { return };
            let Ok(mut app) = app.try_borrow_mut() else {
                warn!(?slot, "child-list batch dropped, session busy");
                return;
            };
            let App { session, page } = &mut *app;
            session.on_child_list(page, slot, change);
        }

        fn key(app: &Weak<RefCell<App>>, event: &KeyboardEvent) {
            if event.default_prevented() || is_editable_target(event) {
                return;
            }
            let Some(app) = app.upgrade() else { return };
            let Ok(mut app) = app.try_borrow_mut() else { return };
            let stroke = KeyStroke {
                key: event.key(),
                ctrl: event.ctrl_key(),
                alt: event.alt_key(),
                meta: event.meta_key(),
                shift: event.shift_key(),
            };
            let App { session, page } = &mut *app;
            if session.on_key(page, &stroke).is_handled() {
                event.prevent_default();
            }
        }
    }

    fn is_editable_target(event: &KeyboardEvent) -> bool {
        let Some(target) = event.target() else {
            return false;
        };
        let Some(element) = target.dyn_ref::<HtmlElement>() else {
            return false;
        };
        element.is_content_editable()
            || matches!(element.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
    }

    fn load_config() -> FeedNavConfig {
        FeedNavConfig::from_toml_str(EMBEDDED_CONFIG).unwrap_or_else(|err| {
            warn!(%err, "embedded config rejected, using defaults");
            FeedNavConfig::default()
        })
    }

    fn install_styles(document: &Document, config: &FeedNavConfig) -> Result<(), JsValue> {
        let sheet = document.create_element("style")?;
        sheet.set_text_content(Some(&style::stylesheet(&config.markers, &config.highlight)));
        let head = document
            .head()
            .ok_or_else(|| JsValue::from_str("document has no head"))?;
        head.append_child(&sheet)?;
        Ok(())
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        logging::init(if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        });

        let config = load_config();
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        install_styles(&document, &config)?;

        let app = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
            let weak = weak.clone();
            let dispatch = Rc::new(move |slot: WatchSlot, change: ChildListChange| {
                App::deliver(&weak, slot, change)
            });
            RefCell::new(App {
                session: Session::new(&config),
                page: WebPage::new(window, document.clone(), config.highlight.clone(), dispatch),
            })
        });

        let weak = Rc::downgrade(&app);
        let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            App::key(&weak, &event);
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document
            .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
        on_keydown.forget();

        {
            let mut guard = app.borrow_mut();
            let App { session, page } = &mut *guard;
            session.start(page);
        }

        // The page lives until unload; so does the session.
        std::mem::forget(app);
        info!("feednav loaded");
        Ok(())
    }
}
