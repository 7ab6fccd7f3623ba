//! Keyboard shortcuts as owned subscriptions.
//!
//! A [`Keymap`] hands out a [`Binding`] for every chord it binds. The binding
//! lives as long as its owner keeps it; dropping it frees the chord. A chord
//! can only be bound once at a time, so a second owner cannot silently take
//! over someone else's shortcut.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::{CitySearchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    ArrowUp,
    ArrowDown,
}

/// A key plus modifiers. `command` is Ctrl or Cmd, whichever the platform
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    key: Key,
    command: bool,
    shift: bool,
}

impl Chord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
            shift: false,
        }
    }
    /// Ctrl/Cmd with a letter, case-insensitive.
    pub fn command(letter: char) -> Self {
        Self {
            key: Key::Char(letter.to_ascii_lowercase()),
            command: true,
            shift: false,
        }
    }
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
    /// Normalises letter case so `K` and `k` are the same chord.
    fn normalised(self) -> Self {
        match self.key {
            Key::Char(c) => Self {
                key: Key::Char(c.to_ascii_lowercase()),
                ..self
            },
            _ => self,
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.command {
            write!(f, "Ctrl+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleSearch,
    CloseSearch,
    SelectNext,
    SelectPrevious,
    AcceptSuggestion,
}

type Bindings = RefCell<HashMap<Chord, Action>>;

#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Rc<Bindings>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn bind(&self, chord: Chord, action: Action) -> Result<Binding> {
        let chord = chord.normalised();
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(&chord) {
            return Err(CitySearchError::ShortcutTaken(chord.to_string()));
        }
        bindings.insert(chord, action);
        debug!(%chord, ?action, "shortcut bound");
        Ok(Binding {
            chord,
            bindings: Rc::downgrade(&self.bindings),
        })
    }
    /// The action bound to `chord`, if any.
    pub fn dispatch(&self, chord: Chord) -> Option<Action> {
        self.bindings.borrow().get(&chord.normalised()).copied()
    }
    pub fn is_bound(&self, chord: Chord) -> bool {
        self.dispatch(chord).is_some()
    }
    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a chord bound until dropped.
#[derive(Debug)]
pub struct Binding {
    chord: Chord,
    bindings: Weak<Bindings>,
}

impl Binding {
    pub fn chord(&self) -> Chord {
        self.chord
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Some(bindings) = self.bindings.upgrade() {
            bindings.borrow_mut().remove(&self.chord);
        }
    }
}
