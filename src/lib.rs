//! feednav: keyboard navigation for a streaming site's home feed.
//!
//! Re-exports the navigation core and its configuration. The browser build
//! lives in the `feednav-web` crate.

pub use feednav_config as config;
pub use feednav_core::*;
