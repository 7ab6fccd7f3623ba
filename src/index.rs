//! Derived lookups over a loaded city, built once per document.
//!
//! * [`AddressIndex`] – address id → building, address display name, floor.
//! * [`ResidentIndex`] – building name → residents, in residence order.
//! * [`JobIndex`] – roster entry id → workplace and job title.
//!
//! [`CityIndex`] owns the document together with all of them, so every
//! consumer (search, directory, profile, knockout roster) reuses one pass
//! over the tree instead of walking it again per citizen.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use lazy_static::lazy_static;
use regex::Regex;
use seahash::SeaHasher;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::document::{AddressId, Citizen, CityDocument, HumanId, JobId};
use crate::schema::FilterSchema;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

lazy_static! {
    static ref FIRST_NUMBER: Regex = Regex::new(r"[0-9]+").expect("valid number pattern");
}

// ------------- Addresses -------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressEntry {
    building_name: String,
    address_name: String,
    floor_number: Option<i64>,
}

impl AddressEntry {
    pub fn building_name(&self) -> &str {
        &self.building_name
    }
    pub fn address_name(&self) -> &str {
        &self.address_name
    }
    pub fn floor_number(&self) -> Option<i64> {
        self.floor_number
    }
}

#[derive(Debug, Default)]
pub struct AddressIndex {
    kept: HashMap<AddressId, AddressEntry, OtherHasher>,
}

impl AddressIndex {
    /// Addresses without an id, or in a building without a name, are skipped.
    /// A repeated id keeps the last entry seen.
    pub fn build(document: &CityDocument) -> Self {
        let mut kept = HashMap::<AddressId, AddressEntry, OtherHasher>::default();
        for (building, floor, address) in document.addresses() {
            let (Some(id), Some(building_name)) = (address.id(), building.name()) else {
                continue;
            };
            kept.insert(
                id.clone(),
                AddressEntry {
                    building_name: building_name.to_string(),
                    address_name: address.name().unwrap_or(building_name).to_string(),
                    floor_number: floor.number(),
                },
            );
        }
        Self { kept }
    }
    pub fn lookup(&self, id: &AddressId) -> Option<&AddressEntry> {
        self.kept.get(id)
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

// ------------- Residence order -------------
/// Sort key of an address display name: basements first, then the first
/// number in the name, then the name itself, all case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResidenceKey {
    above_ground: bool,
    number: u64,
    name: String,
}

impl ResidenceKey {
    pub fn new(address_name: &str) -> Self {
        let name = address_name.to_lowercase();
        let number = FIRST_NUMBER
            .find(&name)
            .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self {
            above_ground: !name.contains("basement"),
            number,
            name,
        }
    }
}

/// Case-insensitive comparison used for names throughout the directory.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// ------------- Residents -------------
#[derive(Debug, Default)]
pub struct ResidentIndex {
    kept: HashMap<String, Vec<usize>, OtherHasher>,
    names: Vec<String>,
}

impl ResidentIndex {
    /// Groups citizen positions by the building their home resolves to.
    pub fn build(citizens: &[Citizen], addresses: &AddressIndex) -> Self {
        let mut grouped = HashMap::<String, Vec<(ResidenceKey, usize)>, OtherHasher>::default();
        for (position, citizen) in citizens.iter().enumerate() {
            let Some(entry) = citizen.home().and_then(|home| addresses.lookup(home)) else {
                continue;
            };
            grouped
                .entry(entry.building_name.clone())
                .or_default()
                .push((ResidenceKey::new(&entry.address_name), position));
        }
        let mut kept = HashMap::<String, Vec<usize>, OtherHasher>::default();
        for (building, mut residents) in grouped {
            // stable, so equal keys keep document order
            residents.sort_by(|(a_key, a), (b_key, b)| {
                a_key.cmp(b_key).then_with(|| {
                    compare_names(citizens[*a].name_or_empty(), citizens[*b].name_or_empty())
                })
            });
            kept.insert(building, residents.into_iter().map(|(_, p)| p).collect());
        }
        let mut names: Vec<String> = kept.keys().cloned().collect();
        names.sort_by(|a, b| compare_names(a, b).then_with(|| a.cmp(b)));
        Self { kept, names }
    }
    /// Resident positions of `building`, in residence order.
    pub fn residents(&self, building: &str) -> &[usize] {
        self.kept.get(building).map(Vec::as_slice).unwrap_or(&[])
    }
    /// Buildings with at least one resident, by case-insensitive name.
    pub fn buildings(&self) -> &[String] {
        &self.names
    }
}

// ------------- Jobs -------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPlacement {
    workplace_name: Option<String>,
    job_title: Option<String>,
}

impl JobPlacement {
    /// The address name of the employer, or its building's name.
    pub fn workplace_name(&self) -> Option<&str> {
        self.workplace_name.as_deref()
    }
    pub fn job_title(&self) -> Option<&str> {
        self.job_title.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct JobIndex {
    kept: HashMap<JobId, JobPlacement, OtherHasher>,
    titles: Vec<String>,
}

impl JobIndex {
    /// The first roster entry seen for an id, in document order, wins.
    pub fn build(document: &CityDocument) -> Self {
        let mut kept = HashMap::<JobId, JobPlacement, OtherHasher>::default();
        let mut titles = Vec::new();
        for (building, _floor, address) in document.addresses() {
            let Some(company) = address.company() else {
                continue;
            };
            for entry in company.roster() {
                if let Some(title) = entry.name() {
                    titles.push(title.to_string());
                }
                if let Some(id) = entry.id() {
                    kept.entry(id.clone()).or_insert_with(|| JobPlacement {
                        workplace_name: address.display_name(building).map(str::to_string),
                        job_title: entry.name().map(str::to_string),
                    });
                }
            }
        }
        Self { kept, titles }
    }
    pub fn lookup(&self, job: &JobId) -> Option<&JobPlacement> {
        self.kept.get(job)
    }
    /// Unemployed citizens resolve to nothing without a lookup.
    pub fn resolve(&self, citizen: &Citizen) -> Option<&JobPlacement> {
        citizen.job().and_then(|job| self.lookup(job))
    }
    /// Every roster title in document order, duplicates included.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

// ------------- CityIndex -------------
#[derive(Debug)]
pub struct CityIndex {
    document: CityDocument,
    addresses: AddressIndex,
    residents: ResidentIndex,
    jobs: JobIndex,
    schema: FilterSchema,
    by_human_id: HashMap<HumanId, usize, OtherHasher>,
}

impl CityIndex {
    pub fn build(document: CityDocument) -> Self {
        let addresses = AddressIndex::build(&document);
        let residents = ResidentIndex::build(document.citizens(), &addresses);
        let jobs = JobIndex::build(&document);
        let schema = FilterSchema::new().with_job_titles(jobs.titles().iter().cloned());
        let mut by_human_id = HashMap::<HumanId, usize, OtherHasher>::default();
        for (position, citizen) in document.citizens().iter().enumerate() {
            if let Some(id) = citizen.human_id() {
                by_human_id.entry(id).or_insert(position);
            }
        }
        debug!(
            addresses = addresses.len(),
            buildings = residents.buildings().len(),
            jobs = jobs.len(),
            citizens = document.citizens().len(),
            "city indexed"
        );
        Self {
            document,
            addresses,
            residents,
            jobs,
            schema,
            by_human_id,
        }
    }
    pub fn from_value(value: Value) -> Self {
        Self::build(CityDocument::from_value(value))
    }
    pub fn document(&self) -> &CityDocument {
        &self.document
    }
    pub fn citizens(&self) -> &[Citizen] {
        self.document.citizens()
    }
    pub fn citizen(&self, position: usize) -> Option<&Citizen> {
        self.document.citizens().get(position)
    }
    pub fn position_of(&self, human_id: HumanId) -> Option<usize> {
        self.by_human_id.get(&human_id).copied()
    }
    pub fn citizen_by_id(&self, human_id: HumanId) -> Option<&Citizen> {
        self.position_of(human_id)
            .and_then(|position| self.citizen(position))
    }
    pub fn addresses(&self) -> &AddressIndex {
        &self.addresses
    }
    pub fn residents(&self) -> &ResidentIndex {
        &self.residents
    }
    pub fn jobs(&self) -> &JobIndex {
        &self.jobs
    }
    pub fn schema(&self) -> &FilterSchema {
        &self.schema
    }
    /// Where a citizen lives, if their home resolves.
    pub fn home_of(&self, citizen: &Citizen) -> Option<&AddressEntry> {
        citizen.home().and_then(|home| self.addresses.lookup(home))
    }
    pub fn job_of(&self, citizen: &Citizen) -> Option<&JobPlacement> {
        self.jobs.resolve(citizen)
    }
}
