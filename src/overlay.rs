//! State behind the citizen search box: what has been typed, the
//! autocomplete list and its selection, and what the input finds.

use crate::engine::{Engine, SearchResults};
use crate::index::CityIndex;
use crate::query::{self, ParsedQuery};
use crate::suggest::{self, Suggestions};

#[derive(Debug, Clone)]
pub struct SearchOverlay {
    input: String,
    suggestions: Suggestions,
}

impl SearchOverlay {
    /// Opens with every key suggested.
    pub fn open(city: &CityIndex) -> Self {
        Self {
            input: String::new(),
            suggestions: suggest::suggest("", city.schema()),
        }
    }
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn suggestions(&self) -> &Suggestions {
        &self.suggestions
    }
    /// Replaces the input, as on every keystroke.
    pub fn set_input(&mut self, raw: &str, city: &CityIndex) {
        self.input = raw.to_string();
        self.suggestions = suggest::suggest(raw, city.schema());
    }
    pub fn select_next(&mut self) {
        self.suggestions.select_next();
    }
    pub fn select_previous(&mut self) {
        self.suggestions.select_previous();
    }
    /// Accepts the selected suggestion. Returns false when nothing is
    /// selected.
    pub fn accept_selected(&mut self, city: &CityIndex) -> bool {
        let Some(candidate) = self.suggestions.selected_candidate().map(str::to_string) else {
            return false;
        };
        self.accept(&candidate, city);
        true
    }
    pub fn accept(&mut self, candidate: &str, city: &CityIndex) {
        let accepted = suggest::accept(&self.input, candidate, city.schema());
        self.input = accepted.input;
        self.suggestions = accepted.suggestions;
    }
    /// The filters the input currently applies, for display as chips.
    pub fn active_filters(&self, city: &CityIndex) -> ParsedQuery {
        query::parse(&self.input, city.schema())
    }
    pub fn results(&self, city: &CityIndex) -> SearchResults {
        Engine::new(city).search(&self.input)
    }
}
