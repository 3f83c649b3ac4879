//! feednav configuration system
//!
//! This crate loads the lookup keys, key bindings and highlight styling used by
//! the navigation layer from `feednav.toml`, with `FEEDNAV_*` environment
//! variables taking precedence.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, resolved against the working directory.
pub const CONFIG_FILE_NAME: &str = "feednav.toml";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid TOML for [`FeedNavConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for feednav
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FeedNavConfig {
    /// Opaque lookup keys used to locate regions of the host page
    pub markers: MarkerConfig,
    /// Key names mapped to navigation inputs
    pub keys: KeyBindings,
    /// Presentation of the selected and hidden markers
    pub highlight: HighlightConfig,
}

/// Lookup keys for the host page.
///
/// Every value except `content_root_id` is a class-style marker; the core
/// never interprets them beyond equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkerConfig {
    /// Identifier of the element the host page renders its shell into
    pub content_root_id: String,
    /// Region that appears once the shell has loaded
    pub app_body: String,
    /// Region holding hero banner, dynamic feed and loading state
    pub feed: String,
    /// Region whose children are the categories
    pub dynamic_feed: String,
    /// News/editorial widgets that cannot be navigated
    pub editorial: String,
    /// Series cards inside a category
    pub card: String,
    /// Applied to categories the filter rejects
    pub hidden: String,
    /// Applied to the card under the cursor
    pub selected: String,
}

/// Keyboard bindings, expressed as `KeyboardEvent.key` names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    pub row_backward: Vec<String>,
    pub row_forward: Vec<String>,
    pub column_backward: Vec<String>,
    pub column_forward: Vec<String>,
    pub confirm: Vec<String>,
}

/// Where a selected card lands when it is brought into view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

impl ScrollBlock {
    /// Parse the lowercase name used in TOML and the environment.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Some(ScrollBlock::Start),
            "center" => Some(ScrollBlock::Center),
            "end" => Some(ScrollBlock::End),
            "nearest" => Some(ScrollBlock::Nearest),
            _ => None,
        }
    }
}

/// Highlight configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightConfig {
    /// Vertical alignment used when scrolling the selected card into view
    pub scroll_block: ScrollBlock,
    /// Animate scrolling instead of jumping
    pub smooth_scroll: bool,
    /// CSS declarations applied to the selected marker
    pub selected_style: String,
    /// CSS declarations applied to the hidden marker
    pub hidden_style: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            content_root_id: "content".to_string(),
            app_body: "app-body-wrapper".to_string(),
            feed: "erc-feed".to_string(),
            dynamic_feed: "dynamic-feed-wrapper".to_string(),
            editorial: "news-and-editorial".to_string(),
            card: "browse-card".to_string(),
            hidden: "feednav-hidden".to_string(),
            selected: "feednav-selected".to_string(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        fn keys(names: &[&str]) -> Vec<String> {
            names.iter().map(|name| name.to_string()).collect()
        }
        Self {
            row_backward: keys(&["ArrowUp"]),
            row_forward: keys(&["ArrowDown"]),
            column_backward: keys(&["ArrowLeft"]),
            column_forward: keys(&["ArrowRight"]),
            confirm: keys(&["Enter"]),
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            scroll_block: ScrollBlock::Center,
            smooth_scroll: true,
            selected_style: "outline: 4px solid #f47521; outline-offset: 2px;".to_string(),
            hidden_style: "display: none !important;".to_string(),
        }
    }
}

impl FeedNavConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location (feednav.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE_NAME).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        let markers = &mut self.markers;
        let overrides: [(&str, &mut String); 8] = [
            ("FEEDNAV_CONTENT_ROOT_ID", &mut markers.content_root_id),
            ("FEEDNAV_APP_BODY", &mut markers.app_body),
            ("FEEDNAV_FEED", &mut markers.feed),
            ("FEEDNAV_DYNAMIC_FEED", &mut markers.dynamic_feed),
            ("FEEDNAV_EDITORIAL", &mut markers.editorial),
            ("FEEDNAV_CARD", &mut markers.card),
            ("FEEDNAV_HIDDEN", &mut markers.hidden),
            ("FEEDNAV_SELECTED", &mut markers.selected),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    *slot = value.trim().to_string();
                }
            }
        }

        if let Ok(val) = std::env::var("FEEDNAV_SCROLL_BLOCK") {
            if let Some(block) = ScrollBlock::parse(&val) {
                self.highlight.scroll_block = block;
            }
        }
        if let Ok(val) = std::env::var("FEEDNAV_SMOOTH_SCROLL") {
            self.highlight.smooth_scroll = val == "1" || val.eq_ignore_ascii_case("true");
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from feednav.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
