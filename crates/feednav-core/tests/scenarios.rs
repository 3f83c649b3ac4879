//! End-to-end behaviour of the navigation engine against small hand-built feeds.

use anyhow::{Context, Result};
use feednav_config::MarkerConfig;
use feednav_core::feed::FeedReader;
use feednav_core::filter::{ContentFilter, HideReason, Verdict};
use feednav_core::{
    Cursor, EventResult, MemoryPage, Move, NavigationEngine, PageAccessor, StructuralMismatch,
};

fn card(id: &str) -> String {
    format!(r#"<div class="browse-card" id="{id}"><a href="/series/{id}">{id}</a></div>"#)
}

fn category(title: &str, ids: &[&str]) -> String {
    let cards: String = ids.iter().map(|id| card(id)).collect();
    format!(r#"<div><div><h2>{title}</h2><div>{cards}</div></div></div>"#)
}

fn feed(categories: &str) -> Result<MemoryPage> {
    MemoryPage::from_html(&format!(
        r#"<div class="erc-feed"><div class="hero"></div><div class="dynamic-feed-wrapper">{categories}</div><div class="loading"></div></div>"#
    ))
}

fn selected(page: &MemoryPage) -> Vec<String> {
    page.nodes_with_class("feednav-selected")
        .into_iter()
        .filter_map(|n| page.node(n).and_then(|n| n.id.clone()))
        .collect()
}

#[test]
fn unmarked_middle_child_disables_navigation() -> Result<()> {
    let mut page = MemoryPage::from_html(
        r#"<div class="erc-feed"><div></div><div class="not-the-feed"></div><div></div></div>"#,
    )?;
    let markers = MarkerConfig::default();
    let reader = FeedReader::new(&page, &markers);
    assert_eq!(reader.locate_feed(), Err(StructuralMismatch::DynamicFeedMissing));
    assert_eq!(reader.row(None), Err(StructuralMismatch::DynamicFeedMissing));

    let mut engine = NavigationEngine::new(markers.clone());
    assert!(engine.start(&mut page).is_none());
    assert_eq!(engine.apply_move(&mut page, Move::RowForward), EventResult::Ignored);
    assert!(page.nodes_with_class("feednav-hidden").is_empty());
    Ok(())
}

#[test]
fn filter_keeps_only_well_formed_categories() -> Result<()> {
    let categories = [
        "<div></div>".to_string(),
        category("Top picks", &["a0", "a1"]),
        r#"<div><div class="news-and-editorial"></div></div>"#.to_string(),
        category("Simulcasts", &["b0"]),
    ]
    .concat();
    let mut page = feed(&categories)?;
    let markers = MarkerConfig::default();
    let dynamic = page.elements_with_marker("dynamic-feed-wrapper")[0];
    let children = page.children(&dynamic);

    let filter = ContentFilter::new(&markers);
    assert_eq!(filter.classify(&page, &children[0]), Verdict::Hidden(HideReason::ChildCount(0)));
    assert_eq!(filter.classify(&page, &children[2]), Verdict::Hidden(HideReason::Editorial));

    let report = filter.apply(&mut page, &dynamic);
    assert_eq!(report.hidden, 2);
    assert!(page.has_marker(&children[0], "feednav-hidden"));
    assert!(page.has_marker(&children[2], "feednav-hidden"));

    let rows = FeedReader::new(&page, &markers).rows()?.context("rows")?;
    assert_eq!(rows, vec![children[1], children[3]]);

    // A second pass changes nothing.
    let again = filter.apply(&mut page, &dynamic);
    assert_eq!(again.newly_hidden, 0);
    assert_eq!(again.hidden, 2);
    assert_eq!(page.children(&dynamic).len(), 4);
    Ok(())
}

#[test]
fn column_forward_at_last_card_is_not_consumed() -> Result<()> {
    let categories = [
        category("one", &["r0"]),
        category("two", &["r1"]),
        category("three", &["c0", "c1", "c2", "c3"]),
    ]
    .concat();
    let mut page = feed(&categories)?;
    let mut engine = NavigationEngine::new(MarkerConfig::default());
    engine.start(&mut page).context("feed")?;

    let script = [
        Move::ColumnForward,
        Move::RowForward,
        Move::RowForward,
        Move::ColumnForward,
        Move::ColumnForward,
        Move::ColumnForward,
    ];
    for mv in script {
        assert_eq!(engine.apply_move(&mut page, mv), EventResult::Handled, "{mv:?}");
    }
    assert_eq!(engine.cursor(), Cursor::new(2, 3));
    assert_eq!(selected(&page), vec!["c3"]);

    assert_eq!(engine.apply_move(&mut page, Move::ColumnForward), EventResult::Ignored);
    assert_eq!(engine.cursor(), Cursor::new(2, 3));
    assert_eq!(selected(&page), vec!["c3"]);
    Ok(())
}

#[test]
fn confirm_before_any_move_opens_first_card() -> Result<()> {
    let categories = [category("one", &["x0", "x1"]), category("two", &["y0"])].concat();
    let mut page = feed(&categories)?;
    let mut engine = NavigationEngine::new(MarkerConfig::default());
    engine.start(&mut page).context("feed")?;

    assert_eq!(engine.cursor(), Cursor::default());
    assert_eq!(engine.confirm(&mut page), EventResult::Handled);
    assert_eq!(page.navigations(), ["/series/x0".to_string()]);
    assert!(selected(&page).is_empty());
    Ok(())
}

#[test]
fn hidden_categories_are_skipped_by_row_moves() -> Result<()> {
    let categories = [
        category("one", &["p0"]),
        r#"<div><div class="news-and-editorial"></div></div>"#.to_string(),
        "<div><div><h2>broken</h2></div></div>".to_string(),
        category("two", &["q0"]),
    ]
    .concat();
    let mut page = feed(&categories)?;
    let mut engine = NavigationEngine::new(MarkerConfig::default());
    engine.start(&mut page).context("feed")?;

    engine.apply_move(&mut page, Move::RowForward);
    engine.apply_move(&mut page, Move::RowForward);
    assert_eq!(engine.cursor(), Cursor::new(1, 0));
    assert_eq!(selected(&page), vec!["q0"]);
    Ok(())
}
