//! The owning context of an interactive session: one loaded city, the
//! shortcuts the session registered, the search overlay while it is open and
//! the citizen cards the user opened.

use std::sync::Arc;

use tracing::debug;

use crate::document::HumanId;
use crate::error::Result;
use crate::index::CityIndex;
use crate::keymap::{Action, Binding, Chord, Key, Keymap};
use crate::overlay::SearchOverlay;

const SEARCH_TOGGLES: [char; 2] = ['k', 'f'];

struct OpenOverlay {
    overlay: SearchOverlay,
    // dropped with the overlay, which frees the chords
    _bindings: Vec<Binding>,
}

pub struct Session {
    city: Arc<CityIndex>,
    keymap: Keymap,
    _toggles: Vec<Binding>,
    overlay: Option<OpenOverlay>,
    cards: Vec<HumanId>,
}

impl Session {
    pub fn new(city: Arc<CityIndex>, keymap: Keymap) -> Result<Self> {
        let toggles = SEARCH_TOGGLES
            .iter()
            .map(|c| keymap.bind(Chord::command(*c), Action::ToggleSearch))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            city,
            keymap,
            _toggles: toggles,
            overlay: None,
            cards: Vec::new(),
        })
    }
    pub fn city(&self) -> &CityIndex {
        &self.city
    }
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }
    pub fn overlay(&self) -> Option<&SearchOverlay> {
        self.overlay.as_ref().map(|open| &open.overlay)
    }
    pub fn is_search_open(&self) -> bool {
        self.overlay.is_some()
    }
    /// Citizen cards in the order they were opened.
    pub fn cards(&self) -> &[HumanId] {
        &self.cards
    }

    /// Runs whatever `chord` is bound to. Returns the action taken.
    pub fn handle_key(&mut self, chord: Chord) -> Result<Option<Action>> {
        let Some(action) = self.keymap.dispatch(chord) else {
            return Ok(None);
        };
        match action {
            Action::ToggleSearch => {
                if self.overlay.is_some() {
                    self.close_search();
                } else {
                    self.open_search()?;
                }
            }
            Action::CloseSearch => self.close_search(),
            Action::SelectNext => self.with_overlay(|o, _| o.select_next()),
            Action::SelectPrevious => self.with_overlay(|o, _| o.select_previous()),
            Action::AcceptSuggestion => self.with_overlay(|o, city| {
                o.accept_selected(city);
            }),
        }
        Ok(Some(action))
    }

    pub fn open_search(&mut self) -> Result<()> {
        if self.overlay.is_some() {
            return Ok(());
        }
        let bindings = [
            (Key::Escape, Action::CloseSearch),
            (Key::ArrowDown, Action::SelectNext),
            (Key::ArrowUp, Action::SelectPrevious),
            (Key::Enter, Action::AcceptSuggestion),
        ]
        .into_iter()
        .map(|(key, action)| self.keymap.bind(Chord::plain(key), action))
        .collect::<Result<Vec<_>>>()?;
        self.overlay = Some(OpenOverlay {
            overlay: SearchOverlay::open(&self.city),
            _bindings: bindings,
        });
        debug!("search opened");
        Ok(())
    }

    pub fn close_search(&mut self) {
        if self.overlay.take().is_some() {
            debug!("search closed");
        }
    }

    /// Types into the search box, if it is open.
    pub fn type_input(&mut self, raw: &str) {
        self.with_overlay(|o, city| o.set_input(raw, city));
    }

    /// Opens the card of a search result and closes the search.
    pub fn select_result(&mut self, human_id: HumanId) {
        self.open_card(human_id);
        self.close_search();
    }

    /// Opens a citizen card unless one is already open for them.
    pub fn open_card(&mut self, human_id: HumanId) {
        if !self.cards.contains(&human_id) {
            self.cards.push(human_id);
        }
    }

    pub fn close_card(&mut self, human_id: HumanId) {
        self.cards.retain(|id| *id != human_id);
    }

    fn with_overlay(&mut self, f: impl FnOnce(&mut SearchOverlay, &CityIndex)) {
        if let Some(open) = self.overlay.as_mut() {
            f(&mut open.overlay, &self.city);
        }
    }
}
