//! Building directory: who lives in a building and which businesses it
//! houses.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::document::{Address, Floor, HumanId};
use crate::index::{CityIndex, compare_names};

lazy_static! {
    static ref NUMBERED_UNIT: Regex = Regex::new(r"^[0-9]{2,4}\s").expect("valid unit pattern");
    static ref NOT_A_BUSINESS: Regex =
        Regex::new(r"(?i)vacant|bathroom|pavement|lobby|tower|management|landlord")
            .expect("valid exclusion pattern");
    static ref OUTSIDE: Regex = Regex::new(r"(?i)outside|street-side").expect("valid outside pattern");
}

// where unknown floors sort
const UNKNOWN_FLOOR: i64 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingListing {
    pub name: String,
    pub residents: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    #[serde(rename = "humanID")]
    pub human_id: Option<HumanId>,
    pub citizen_name: Option<String>,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub name: String,
    pub preset: String,
    pub location: String,
    pub floor_number: Option<i64>,
}

pub fn buildings(city: &CityIndex) -> Vec<BuildingListing> {
    let residents = city.residents();
    residents
        .buildings()
        .iter()
        .map(|name| BuildingListing {
            name: name.clone(),
            residents: residents.residents(name).len(),
        })
        .collect()
}

/// Residents of `building` in residence order.
pub fn residents(city: &CityIndex, building: &str) -> Vec<Resident> {
    city.residents()
        .residents(building)
        .iter()
        .filter_map(|p| city.citizen(*p))
        .map(|citizen| Resident {
            human_id: citizen.human_id(),
            citizen_name: citizen.name().map(str::to_string),
            address: city
                .home_of(citizen)
                .map(|entry| entry.address_name().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

/// Businesses in every building named `building`, lowest floor first.
pub fn businesses(city: &CityIndex, building: &str) -> Vec<Business> {
    let mut found: Vec<Business> = city
        .document()
        .addresses()
        .filter(|(b, _, _)| b.name() == Some(building))
        .filter_map(|(_, floor, address)| business(floor, address))
        .collect();
    found.sort_by(|a, b| {
        let a_floor = a.floor_number.unwrap_or(UNKNOWN_FLOOR);
        let b_floor = b.floor_number.unwrap_or(UNKNOWN_FLOOR);
        a_floor
            .cmp(&b_floor)
            .then_with(|| compare_names(&a.name, &b.name))
    });
    found
}

fn business(floor: &Floor, address: &Address) -> Option<Business> {
    let company = address.company()?;
    let name = address.name()?.trim();
    let preset = company.preset().unwrap_or("");
    let lowered = preset.to_lowercase();
    if name.is_empty()
        || NUMBERED_UNIT.is_match(name)
        || NOT_A_BUSINESS.is_match(name)
        || lowered.is_empty()
        || lowered.contains("residence")
        || lowered.contains("apartment")
        || lowered.starts_with("streetfoodvendor")
    {
        return None;
    }
    Some(Business {
        name: name.to_string(),
        preset: preset.to_string(),
        location: location(floor, address, name),
        floor_number: floor.number(),
    })
}

fn location(floor: &Floor, address: &Address, name: &str) -> String {
    if address.is_outside() || OUTSIDE.is_match(name) {
        return "Outside".to_string();
    }
    match floor.number() {
        Some(n) if n < 0 => format!("Basement {}", n.unsigned_abs()),
        Some(0) => "Ground floor".to_string(),
        Some(n) => format!("Floor {n}"),
        None => floor.name().unwrap_or("Unknown floor").to_string(),
    }
}
