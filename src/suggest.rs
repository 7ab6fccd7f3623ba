//! Autocomplete for the query language: keys while the last token has no
//! colon, values of that key once it does.

use serde::{Serialize, Serializer};

use crate::schema::{FilterKey, FilterSchema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    candidates: Vec<String>,
    #[serde(rename = "selectedIndex", serialize_with = "selected_or_none")]
    selected: Option<usize>,
}

/// -1 stands for no selection on the wire.
fn selected_or_none<S: Serializer>(
    selected: &Option<usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(selected.and_then(|i| i64::try_from(i).ok()).unwrap_or(-1))
}

impl Suggestions {
    pub fn new(candidates: Vec<String>) -> Self {
        let selected = if candidates.is_empty() { None } else { Some(0) };
        Self {
            candidates,
            selected,
        }
    }
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }
    pub fn selected_candidate(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.candidates.get(i))
            .map(String::as_str)
    }
    /// The selected index, or -1 when nothing is selected.
    pub fn selected_index(&self) -> i64 {
        self.selected
            .and_then(|i| i64::try_from(i).ok())
            .unwrap_or(-1)
    }
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
    pub fn select_next(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some((i + 1) % self.candidates.len());
        }
    }
    pub fn select_previous(&mut self) {
        if let Some(i) = self.selected {
            let len = self.candidates.len();
            self.selected = Some((i + len - 1) % len);
        }
    }
    pub fn select(&mut self, index: usize) {
        if index < self.candidates.len() {
            self.selected = Some(index);
        }
    }
}

/// The last token of the input, trailing whitespace ignored.
fn last_token(raw: &str) -> &str {
    raw.split_whitespace().last().unwrap_or("")
}

pub fn suggest(raw: &str, schema: &FilterSchema) -> Suggestions {
    let token = last_token(raw);
    let mut parts = token.split(':');
    let key = parts.next().unwrap_or("");
    match parts.next() {
        None => {
            let typed = token.to_lowercase();
            Suggestions::new(
                schema
                    .keys()
                    .filter(|k| k.to_lowercase().starts_with(&typed))
                    .map(str::to_string)
                    .collect(),
            )
        }
        Some(value) => {
            let typed = value.to_lowercase();
            Suggestions::new(
                schema
                    .values(&FilterKey::resolve(key))
                    .iter()
                    .filter(|v| v.to_lowercase().starts_with(&typed))
                    .cloned()
                    .collect(),
            )
        }
    }
}

/// The input after accepting a candidate, with the suggestions that follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accepted {
    pub input: String,
    pub suggestions: Suggestions,
}

/// Rewrites the last token with `candidate`. A key becomes `key:` ready for a
/// value; a value completes `key:value` and adds a separator.
pub fn accept(raw: &str, candidate: &str, schema: &FilterSchema) -> Accepted {
    let mut parts: Vec<&str> = raw.split_whitespace().collect();
    let last = parts.pop().unwrap_or("");
    let head = parts.join(" ");
    let joined = |token: String| {
        if head.is_empty() {
            token
        } else {
            format!("{head} {token}")
        }
    };
    match last.split_once(':') {
        None => {
            let key = FilterKey::resolve(candidate);
            Accepted {
                input: joined(format!("{candidate}:")),
                suggestions: Suggestions::new(schema.values(&key).to_vec()),
            }
        }
        Some((key, _)) => Accepted {
            input: joined(format!("{}:{candidate} ", FilterKey::resolve(key))),
            suggestions: Suggestions::default(),
        },
    }
}
