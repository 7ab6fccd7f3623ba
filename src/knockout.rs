//! Tracking which citizens have been knocked out in a save, against the
//! roster of the loaded city.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::document::{Citizen, HumanId};
use crate::index::{CityIndex, ResidenceKey, compare_names};

const HOMELESS: &str = "Homeless";
const UNKNOWN: &str = "Unknown";

/// The knocked-out citizens, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Knockouts {
    ids: IndexSet<HumanId>,
}

impl Knockouts {
    pub fn new() -> Self {
        Self::default()
    }
    /// Reads `spareNoOneReference` from a decoded save. Anything that is not
    /// a list of integers counts as nobody knocked out.
    pub fn from_save(save: &Value) -> Self {
        let ids: IndexSet<HumanId> = save
            .get("spareNoOneReference")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default();
        debug!(knocked = ids.len(), "knockouts read from save");
        Self { ids }
    }
    /// Flips one citizen. Returns whether they are knocked out afterwards.
    pub fn toggle(&mut self, human_id: HumanId) -> bool {
        if self.ids.shift_remove(&human_id) {
            false
        } else {
            self.ids.insert(human_id);
            true
        }
    }
    pub fn contains(&self, human_id: HumanId) -> bool {
        self.ids.contains(&human_id)
    }
    pub fn ids(&self) -> impl Iterator<Item = HumanId> + '_ {
        self.ids.iter().copied()
    }
    pub fn len(&self) -> usize {
        self.ids.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<HumanId> for Knockouts {
    fn from_iter<I: IntoIterator<Item = HumanId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Name,
    Residence,
}

impl FromStr for SortMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "residence" => Ok(Self::Residence),
            other => Err(format!("unknown sort mode '{other}', expected name or residence")),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Residence => write!(f, "residence"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    /// Case-insensitive substring of the citizen name.
    pub query: String,
    /// Only citizens living in this building.
    pub residence: Option<String>,
    pub hide_knocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    #[serde(rename = "humanID")]
    pub human_id: Option<HumanId>,
    pub citizen_name: String,
    pub building: String,
    pub address: String,
    pub knocked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub all: usize,
    pub knocked: usize,
    pub remaining: usize,
}

pub struct KnockoutRoster<'c> {
    city: &'c CityIndex,
    knockouts: Knockouts,
}

impl<'c> KnockoutRoster<'c> {
    pub fn new(city: &'c CityIndex, knockouts: Knockouts) -> Self {
        Self { city, knockouts }
    }
    pub fn knockouts(&self) -> &Knockouts {
        &self.knockouts
    }
    pub fn toggle(&mut self, human_id: HumanId) -> bool {
        self.knockouts.toggle(human_id)
    }

    pub fn rows(&self, sort: SortMode, filter: &RosterFilter) -> Vec<RosterRow> {
        let wanted = filter.query.trim().to_lowercase();
        let mut rows: Vec<RosterRow> = self
            .city
            .citizens()
            .iter()
            .map(|citizen| self.row(citizen))
            .filter(|row| wanted.is_empty() || row.citizen_name.to_lowercase().contains(&wanted))
            .filter(|row| {
                filter
                    .residence
                    .as_deref()
                    .is_none_or(|residence| residence.is_empty() || row.building == residence)
            })
            .filter(|row| !(filter.hide_knocked && row.knocked))
            .collect();
        match sort {
            SortMode::Name => rows.sort_by(|a, b| compare_names(&a.citizen_name, &b.citizen_name)),
            SortMode::Residence => rows.sort_by(by_residence),
        }
        rows
    }

    /// Buildings where at least one housed citizen lives, by name.
    pub fn residences(&self) -> Vec<String> {
        let occupied: BTreeSet<&str> = self
            .city
            .citizens()
            .iter()
            .filter(|citizen| !citizen.is_homeless())
            .filter_map(|citizen| self.city.home_of(citizen))
            .map(|entry| entry.building_name())
            .collect();
        let mut residences: Vec<String> = occupied.into_iter().map(str::to_string).collect();
        residences.sort_by(|a, b| compare_names(a, b));
        residences
    }

    pub fn totals(&self) -> Totals {
        let all = self.city.citizens().len();
        let knocked = self.knockouts.len();
        Totals {
            all,
            knocked,
            remaining: all.saturating_sub(knocked),
        }
    }

    fn row(&self, citizen: &Citizen) -> RosterRow {
        let (building, address) = if citizen.is_homeless() {
            (HOMELESS.to_string(), HOMELESS.to_string())
        } else {
            self.city
                .home_of(citizen)
                .map(|entry| {
                    (
                        entry.building_name().to_string(),
                        entry.address_name().to_string(),
                    )
                })
                .unwrap_or_else(|| (UNKNOWN.to_string(), UNKNOWN.to_string()))
        };
        RosterRow {
            human_id: citizen.human_id(),
            citizen_name: citizen.name_or_empty().to_string(),
            building,
            address,
            knocked: citizen
                .human_id()
                .is_some_and(|id| self.knockouts.contains(id)),
        }
    }
}

// building first, then the address in residence order
fn by_residence(a: &RosterRow, b: &RosterRow) -> Ordering {
    compare_names(&a.building, &b.building)
        .then_with(|| ResidenceKey::new(&a.address).cmp(&ResidenceKey::new(&b.address)))
}
