//! Keyboard navigation over a host page's dynamically loaded feed.
//!
//! The host page is never owned: it is read through [`page::PageAccessor`],
//! decorated through [`page::PageEffects`] and observed through
//! [`page::ChildListObserver`]. [`session::Session`] ties readiness
//! detection, the content filter and the cursor engine together.

pub mod cursor;
pub mod engine;
pub mod error;
pub mod feed;
pub mod filter;
pub mod input;
pub mod memory;
pub mod page;
pub mod readiness;
pub mod session;

pub use cursor::{Cursor, Move};
pub use engine::NavigationEngine;
pub use error::{Lookup, StructuralMismatch};
pub use input::{EventResult, KeyMap, KeyStroke, NavInput};
pub use memory::MemoryPage;
pub use page::{ChildListChange, ChildListObserver, PageAccessor, PageEffects, WatchSlot};
pub use session::{PageHost, Session, SessionState};
