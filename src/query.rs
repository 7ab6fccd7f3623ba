//! The citizen query language.
//!
//! A query is whitespace separated tokens. `key:value` tokens are filters,
//! everything else is free text matched against citizen names. Values may
//! span several tokens when the words keep forming (a prefix of) a value the
//! schema knows for that key, e.g. `jobTitle:Head Chef`.
//!
//! ```
//! use citysearch::query::parse;
//! use citysearch::schema::{FilterKey, FilterSchema};
//! let schema = FilterSchema::new().with_job_titles(["Head Chef"]);
//! let query = parse("silva jobTitle:head chef gender:female", &schema);
//! assert_eq!(query.free_text(), ["silva"]);
//! assert_eq!(query.values(&FilterKey::JobTitle), ["head chef"]);
//! assert_eq!(query.values(&FilterKey::Gender), ["female"]);
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::schema::{FilterKey, FilterSchema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    filters: IndexMap<FilterKey, Vec<String>>,
    free_text: Vec<String>,
}

impl ParsedQuery {
    /// Filters in the order their keys first appeared. Values under one key
    /// are alternatives; different keys must all hold.
    pub fn filters(&self) -> &IndexMap<FilterKey, Vec<String>> {
        &self.filters
    }
    pub fn values(&self, key: &FilterKey) -> &[String] {
        self.filters.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
    pub fn free_text(&self) -> &[String] {
        &self.free_text
    }
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.free_text.is_empty()
    }
}

/// Parses the whole raw input. Pure: the same input and schema always give
/// the same result, and no input is rejected.
pub fn parse(raw: &str, schema: &FilterSchema) -> ParsedQuery {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut query = ParsedQuery::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        match token.find(':') {
            Some(colon) if colon > 0 => {
                let key = FilterKey::resolve(&token[..colon]);
                let (value, next) = read_value(&tokens, i, &token[colon + 1..], schema.values(&key));
                query
                    .filters
                    .entry(key)
                    .or_default()
                    .push(value.trim().to_string());
                i = next;
            }
            _ => {
                query.free_text.push(token.to_string());
                i += 1;
            }
        }
    }
    query
}

// Grows the value over the following tokens while it stays a prefix of an
// allowed value. Returns the value and the index of the first unread token.
fn read_value(tokens: &[&str], at: usize, start: &str, allowed: &[String]) -> (String, usize) {
    let mut current = start.to_string();
    let mut next = at + 1;
    if allowed.is_empty() {
        return (current, next);
    }
    let allowed: Vec<String> = allowed.iter().map(|v| v.to_lowercase()).collect();
    let is_exact = |candidate: &str| allowed.contains(&candidate.to_lowercase());
    let mut best = is_exact(&current).then(|| current.clone());
    while next < tokens.len() {
        let grown = format!("{} {}", current, tokens[next]);
        let grown_lower = grown.to_lowercase();
        if !allowed.iter().any(|a| a.starts_with(&grown_lower)) {
            break;
        }
        current = grown;
        if is_exact(&current) {
            best = Some(current.clone());
        }
        next += 1;
    }
    // an exact value seen on the way beats a longer partial one
    (best.unwrap_or(current), next)
}
