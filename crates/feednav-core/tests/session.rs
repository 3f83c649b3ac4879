use anyhow::{Context, Result};
use ego_tree::NodeId;
use feednav_config::FeedNavConfig;
use feednav_core::memory::settle;
use feednav_core::{
    Cursor, EventResult, KeyStroke, MemoryPage, Move, NavInput, PageAccessor, Session,
    SessionState, WatchSlot,
};

const HOME_FEED: &str = include_str!("../fixtures/home_feed.html");
const FEED_PAGE_2: &str = include_str!("../fixtures/feed_page_2.html");

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Page with only the content root, session armed.
fn loading_page(config: &FeedNavConfig) -> Result<(MemoryPage, Session)> {
    init_logging();
    let mut page = MemoryPage::from_html(r#"<div id="content"></div>"#)?;
    let mut session = Session::new(config);
    session.start(&mut page);
    Ok((page, session))
}

/// Drive both load stages and return the running session.
fn loaded_page(config: &FeedNavConfig) -> Result<(MemoryPage, Session)> {
    let (mut page, mut session) = loading_page(config)?;
    let root = page.element_by_id("content").context("content root")?;
    let body = page.append_html(root, r#"<div class="app-body-wrapper"></div>"#)?[0];
    settle(&mut session, &mut page);
    page.append_html(body, HOME_FEED)?;
    settle(&mut session, &mut page);
    Ok((page, session))
}

fn id_of(page: &MemoryPage, node: NodeId) -> Option<String> {
    page.node(node).and_then(|n| n.id.clone())
}

fn selected_ids(page: &MemoryPage) -> Vec<String> {
    page.nodes_with_class("feednav-selected")
        .into_iter()
        .filter_map(|n| id_of(page, n))
        .collect()
}

fn key(session: &mut Session, page: &mut MemoryPage, name: &str) -> EventResult {
    session.on_key(page, &KeyStroke::plain(name))
}

#[test]
fn navigation_starts_after_both_load_stages() -> Result<()> {
    let config = FeedNavConfig::default();
    let (mut page, mut session) = loading_page(&config)?;
    assert!(page.is_observed(WatchSlot::Shell));
    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Ignored);

    let root = page.element_by_id("content").context("content root")?;
    let body = page.append_html(root, r#"<div class="app-body-wrapper"></div>"#)?[0];
    assert_eq!(settle(&mut session, &mut page), 1);
    assert_eq!(session.state(), SessionState::Loading);
    assert!(!page.is_observed(WatchSlot::Shell));
    assert!(page.is_observed(WatchSlot::Content));

    page.append_html(body, HOME_FEED)?;
    settle(&mut session, &mut page);
    assert_eq!(session.state(), SessionState::Running);
    assert!(!page.is_observed(WatchSlot::Content));
    assert!(page.is_observed(WatchSlot::Feed));
    Ok(())
}

#[test]
fn later_shell_mutations_do_not_restart_the_engine() -> Result<()> {
    let config = FeedNavConfig::default();
    let (mut page, mut session) = loaded_page(&config)?;
    key(&mut session, &mut page, "ArrowDown");
    let root = page.element_by_id("content").context("content root")?;
    page.append_html(root, "<div></div>")?;
    assert_eq!(settle(&mut session, &mut page), 0);
    assert_eq!(session.engine().cursor(), Cursor::new(0, 0));
    Ok(())
}

#[test]
fn missing_app_body_leaves_page_untouched() -> Result<()> {
    let config = FeedNavConfig::default();
    let (mut page, mut session) = loading_page(&config)?;
    let root = page.element_by_id("content").context("content root")?;
    page.append_html(root, r#"<div class="unexpected-shell"></div>"#)?;
    settle(&mut session, &mut page);
    assert_eq!(session.state(), SessionState::Inert);
    assert!(!page.is_observed(WatchSlot::Content));
    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Ignored);
    Ok(())
}

#[test]
fn filter_hides_non_category_rows() -> Result<()> {
    let config = FeedNavConfig::default();
    let (page, _session) = loaded_page(&config)?;
    let hidden = page.nodes_with_class("feednav-hidden");
    assert_eq!(hidden.len(), 3, "banner, news and music rows");
    let dynamic = page.elements_with_marker("dynamic-feed-wrapper")[0];
    assert_eq!(page.children(&dynamic).len(), 6, "nothing detached");
    Ok(())
}

#[test]
fn arrows_walk_rows_and_cards() -> Result<()> {
    let config = FeedNavConfig::default();
    let (mut page, mut session) = loaded_page(&config)?;

    assert_eq!(key(&mut session, &mut page, "ArrowRight"), EventResult::Handled);
    assert_eq!(selected_ids(&page), vec!["tp-0"]);
    key(&mut session, &mut page, "ArrowRight");
    key(&mut session, &mut page, "ArrowRight");
    assert_eq!(selected_ids(&page), vec!["tp-2"]);

    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Handled);
    assert_eq!(selected_ids(&page), vec!["sc-0"]);
    key(&mut session, &mut page, "ArrowDown");
    assert_eq!(selected_ids(&page), vec!["cw-0"]);
    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Ignored);
    assert_eq!(session.engine().cursor(), Cursor::new(2, 0));

    key(&mut session, &mut page, "ArrowUp");
    key(&mut session, &mut page, "ArrowUp");
    assert_eq!(selected_ids(&page), vec!["tp-0"]);
    assert_eq!(key(&mut session, &mut page, "ArrowUp"), EventResult::Ignored);
    assert_eq!(key(&mut session, &mut page, "ArrowLeft"), EventResult::Ignored);
    assert_eq!(key(&mut session, &mut page, "PageDown"), EventResult::Ignored);
    Ok(())
}

#[test]
fn infinite_scroll_rows_become_navigable() -> Result<()> {
    let config = FeedNavConfig::default();
    let (mut page, mut session) = loaded_page(&config)?;
    for _ in 0..3 {
        key(&mut session, &mut page, "ArrowDown");
    }
    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Ignored);

    let dynamic = page.elements_with_marker("dynamic-feed-wrapper")[0];
    page.append_html(dynamic, FEED_PAGE_2)?;
    assert_eq!(settle(&mut session, &mut page), 1);
    assert_eq!(page.nodes_with_class("feednav-hidden").len(), 5);

    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Handled);
    assert_eq!(selected_ids(&page), vec!["is-0"]);
    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Ignored);
    Ok(())
}

#[test]
fn enter_opens_selected_series() -> Result<()> {
    let config = FeedNavConfig::default();
    let (mut page, mut session) = loaded_page(&config)?;
    key(&mut session, &mut page, "ArrowDown");
    key(&mut session, &mut page, "ArrowDown");
    key(&mut session, &mut page, "ArrowRight");
    assert_eq!(key(&mut session, &mut page, "Enter"), EventResult::Handled);
    assert_eq!(page.navigations(), ["/series/G9VHN9PPW/solo-leveling".to_string()]);
    Ok(())
}

#[test]
fn custom_bindings_and_chords() -> Result<()> {
    let mut config = FeedNavConfig::default();
    config.keys.row_forward = vec!["j".to_string()];
    let (mut page, mut session) = loaded_page(&config)?;
    assert_eq!(key(&mut session, &mut page, "ArrowDown"), EventResult::Ignored);
    let mut chord = KeyStroke::plain("j");
    chord.ctrl = true;
    assert_eq!(session.on_key(&mut page, &chord), EventResult::Ignored);
    assert_eq!(key(&mut session, &mut page, "j"), EventResult::Handled);
    assert_eq!(
        session.on_input(&mut page, NavInput::Move(Move::ColumnForward)),
        EventResult::Handled
    );
    assert_eq!(selected_ids(&page), vec!["tp-1"]);
    Ok(())
}

#[test]
fn custom_markers_are_honoured() -> Result<()> {
    let mut config = FeedNavConfig::default();
    config.markers.selected = "is-focused".to_string();
    let (mut page, mut session) = loaded_page(&config)?;
    key(&mut session, &mut page, "ArrowRight");
    assert_eq!(page.nodes_with_class("is-focused").len(), 1);
    assert!(page.nodes_with_class("feednav-selected").is_empty());
    Ok(())
}
