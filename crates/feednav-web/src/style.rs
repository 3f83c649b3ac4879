//! Stylesheet injected for the hidden and selected markers.
//!
//! Kept free of browser types so it can be tested on the host.

use feednav_config::{HighlightConfig, MarkerConfig};

/// CSS rules for the hidden and selected markers.
pub fn stylesheet(markers: &MarkerConfig, highlight: &HighlightConfig) -> String {
    format!(
        ".{} {{ {} }}\n.{} {{ {} }}\n",
        markers.hidden, highlight.hidden_style, markers.selected, highlight.selected_style
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_targets_configured_markers() {
        let mut markers = MarkerConfig::default();
        markers.selected = "is-focused".to_string();
        let css = stylesheet(&markers, &HighlightConfig::default());
        assert!(css.contains(".feednav-hidden { display: none !important; }"));
        assert!(css.starts_with(".feednav-hidden"));
        assert!(css.contains(".is-focused { outline"));
    }
}

