//! Directional input and its key bindings.

use std::collections::HashMap;

use feednav_config::KeyBindings;

use crate::cursor::Move;

/// Discrete navigation inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavInput {
    Move(Move),
    Confirm,
}

/// Whether the input was consumed. `Ignored` lets the host page's default
/// behaviour (native scrolling, link activation) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled and its default action should be suppressed
    Handled,
    /// Event was not handled, continue propagation
    Ignored,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }
}

/// One key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyStroke {
    /// `KeyboardEvent.key` name, e.g. `ArrowDown`
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyStroke {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Chords involving Ctrl, Alt or Meta belong to the browser.
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Lookup from key name to navigation input.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<String, NavInput>,
}

impl KeyMap {
    /// Build from configured bindings. When a key is bound twice the later
    /// entry in field order wins.
    pub fn from_bindings(keys: &KeyBindings) -> Self {
        let groups = [
            (&keys.row_backward, NavInput::Move(Move::RowBackward)),
            (&keys.row_forward, NavInput::Move(Move::RowForward)),
            (&keys.column_backward, NavInput::Move(Move::ColumnBackward)),
            (&keys.column_forward, NavInput::Move(Move::ColumnForward)),
            (&keys.confirm, NavInput::Confirm),
        ];
        let mut bindings = HashMap::new();
        for (names, input) in groups {
            for name in names {
                bindings.insert(name.clone(), input);
            }
        }
        Self { bindings }
    }

    pub fn resolve(&self, stroke: &KeyStroke) -> Option<NavInput> {
        if stroke.is_chord() {
            return None;
        }
        self.bindings.get(&stroke.key).copied()
    }
}
