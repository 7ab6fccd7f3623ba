use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use roaring::RoaringBitmap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::document::{Citizen, HumanId};
use crate::error::{CitySearchError, Result};
use crate::index::{CityIndex, OtherHasher};
use crate::predicate;
use crate::query::{self, ParsedQuery};

/// How many citizens a search returns at most.
pub const RESULT_CAP: usize = 50;

// ------------- ResultSet -------------
/// A set of citizen positions. Iteration is in ascending position, which is
/// document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    members: RoaringBitmap,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }
    /// Every position below `len`.
    pub fn all(len: usize) -> Self {
        let mut members = RoaringBitmap::new();
        members.insert_range(0..u32::try_from(len).unwrap_or(u32::MAX));
        Self { members }
    }
    pub fn push(&mut self, position: usize) {
        if let Ok(position) = u32::try_from(position) {
            self.members.insert(position);
        }
    }
    pub fn contains(&self, position: usize) -> bool {
        u32::try_from(position).is_ok_and(|p| self.members.contains(p))
    }
    pub fn intersect_with(&mut self, other: &ResultSet) {
        self.members &= &other.members;
    }
    pub fn union_with(&mut self, other: &ResultSet) {
        self.members |= &other.members;
    }
    /// The members for which `keep` holds.
    pub fn select(&self, mut keep: impl FnMut(usize) -> bool) -> ResultSet {
        Self {
            members: self
                .members
                .iter()
                .filter(|p| keep(*p as usize))
                .collect(),
        }
    }
    pub fn len(&self) -> u64 {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(|p| p as usize)
    }
}

// ------------- SearchResults -------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitizenRow {
    #[serde(rename = "humanID")]
    pub human_id: Option<HumanId>,
    pub citizen_name: Option<String>,
}

impl CitizenRow {
    pub fn of(citizen: &Citizen) -> Self {
        Self {
            human_id: citizen.human_id(),
            citizen_name: citizen.name().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    query: ParsedQuery,
    positions: Vec<usize>,
    matched: u64,
    limited: bool,
}

impl SearchResults {
    pub fn query(&self) -> &ParsedQuery {
        &self.query
    }
    /// Positions of the returned citizens, in document order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
    /// How many citizens matched before the cap was applied.
    pub fn matched(&self) -> u64 {
        self.matched
    }
    pub fn limited(&self) -> bool {
        self.limited
    }
    pub fn len(&self) -> usize {
        self.positions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
    pub fn citizens<'c>(&self, city: &'c CityIndex) -> Vec<&'c Citizen> {
        self.positions
            .iter()
            .filter_map(|p| city.citizen(*p))
            .collect()
    }
    pub fn rows(&self, city: &CityIndex) -> Vec<CitizenRow> {
        self.citizens(city).into_iter().map(CitizenRow::of).collect()
    }
}

// ------------- Engine -------------
pub struct Engine<'c> {
    city: &'c CityIndex,
    cap: usize,
}

impl<'c> Engine<'c> {
    pub fn new(city: &'c CityIndex) -> Self {
        Self {
            city,
            cap: RESULT_CAP,
        }
    }
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }
    /// Parses and runs a raw query. Blank input finds nobody.
    pub fn search(&self, raw: &str) -> SearchResults {
        if raw.trim().is_empty() {
            return SearchResults::default();
        }
        let parsed = query::parse(raw, self.city.schema());
        self.search_parsed(parsed)
    }
    pub fn search_parsed(&self, parsed: ParsedQuery) -> SearchResults {
        let city = self.city;
        let citizens = city.citizens();
        let mut candidates = ResultSet::all(citizens.len());
        if !parsed.free_text().is_empty() {
            candidates = candidates
                .select(|p| predicate::matches_text(&citizens[p], parsed.free_text()));
        }
        for (key, values) in parsed.filters() {
            let mut key_matches = ResultSet::new();
            for value in values {
                key_matches.union_with(
                    &candidates.select(|p| predicate::matches_key(&citizens[p], key, value, city)),
                );
            }
            candidates.intersect_with(&key_matches);
        }
        let positions: Vec<usize> = candidates.iter().take(self.cap).collect();
        let matched = candidates.len();
        debug!(matched, returned = positions.len(), "search complete");
        SearchResults {
            limited: matched > positions.len() as u64,
            query: parsed,
            positions,
            matched,
        }
    }
}

// ------------- QueryCache -------------
/// Memoised search results for one loaded city, keyed on the raw query.
/// Emptied wholesale once it reaches capacity.
#[derive(Debug)]
pub struct QueryCache {
    capacity: usize,
    kept: Mutex<HashMap<String, Arc<SearchResults>, OtherHasher>>,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            kept: Mutex::new(HashMap::default()),
        }
    }
    /// The lock is not held while `search` runs. Two racing misses on one
    /// key both search and the later insert wins.
    pub fn get_or_insert_with(
        &self,
        raw: &str,
        search: impl FnOnce() -> SearchResults,
    ) -> Result<Arc<SearchResults>> {
        if let Some(hit) = self.get(raw)? {
            return Ok(hit);
        }
        let results = Arc::new(search());
        if self.capacity > 0 {
            let mut kept = self.lock()?;
            if kept.len() >= self.capacity && !kept.contains_key(raw) {
                kept.clear();
            }
            kept.insert(raw.to_string(), Arc::clone(&results));
        }
        Ok(results)
    }
    pub fn get(&self, raw: &str) -> Result<Option<Arc<SearchResults>>> {
        Ok(self.lock()?.get(raw).map(Arc::clone))
    }
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<SearchResults>, OtherHasher>>> {
        self.kept
            .lock()
            .map_err(|e| CitySearchError::Lock(e.to_string()))
    }
    pub fn len(&self) -> usize {
        self.kept.lock().map(|kept| kept.len()).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ------------- LoadedCity -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySummary {
    pub city_name: Option<String>,
    pub population: Option<String>,
    pub seed: Option<String>,
    pub citizens: usize,
    pub buildings: usize,
    pub fingerprint: String,
}

/// A decoded document with its indexes, ready to be queried.
#[derive(Debug)]
pub struct LoadedCity {
    index: CityIndex,
    fingerprint: String,
    cap: usize,
    cache: QueryCache,
}

impl LoadedCity {
    pub fn new(index: CityIndex, fingerprint: String) -> Self {
        Self {
            index,
            fingerprint,
            cap: RESULT_CAP,
            cache: QueryCache::new(0),
        }
    }
    pub fn from_value(value: Value, fingerprint: String) -> Self {
        Self::new(CityIndex::from_value(value), fingerprint)
    }
    pub fn with_limits(mut self, cap: usize, cache_capacity: usize) -> Self {
        self.cap = cap;
        self.cache = QueryCache::new(cache_capacity);
        self
    }
    pub fn index(&self) -> &CityIndex {
        &self.index
    }
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
    pub fn search(&self, raw: &str) -> Result<Arc<SearchResults>> {
        self.cache.get_or_insert_with(raw, || {
            Engine::new(&self.index).with_cap(self.cap).search(raw)
        })
    }
    pub fn summary(&self) -> CitySummary {
        let document = self.index.document();
        CitySummary {
            city_name: document.city_name().map(str::to_string),
            population: document.population().map(ToString::to_string),
            seed: document.seed().map(ToString::to_string),
            citizens: document.citizens().len(),
            buildings: self.index.residents().buildings().len(),
            fingerprint: self.fingerprint.clone(),
        }
    }
    pub fn log_loaded(&self) {
        let summary = self.summary();
        info!(
            city = summary.city_name.as_deref().unwrap_or("Unknown"),
            population = summary.population.as_deref().unwrap_or("?"),
            citizens = summary.citizens,
            fingerprint = %summary.fingerprint,
            "city loaded"
        );
    }
}
