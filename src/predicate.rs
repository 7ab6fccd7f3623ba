//! Decides whether a citizen satisfies a parsed query.
//!
//! Free text terms must all appear in the citizen's name. Filters are ANDed
//! across keys and ORed across the values given for one key. A missing field
//! never matches; nothing here fails.

use crate::document::{Citizen, Descriptors};
use crate::index::CityIndex;
use crate::labels;
use crate::query::ParsedQuery;
use crate::schema::FilterKey;

pub fn matches(citizen: &Citizen, query: &ParsedQuery, city: &CityIndex) -> bool {
    matches_text(citizen, query.free_text())
        && query
            .filters()
            .iter()
            .all(|(key, values)| matches_any(citizen, key, values, city))
}

/// Every term is a case-insensitive substring of the name.
pub fn matches_text(citizen: &Citizen, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let name = citizen.name_or_empty().to_lowercase();
    terms.iter().all(|term| name.contains(&term.to_lowercase()))
}

/// At least one of `values` satisfies `key`.
pub fn matches_any(citizen: &Citizen, key: &FilterKey, values: &[String], city: &CityIndex) -> bool {
    values.iter().any(|value| matches_key(citizen, key, value, city))
}

pub fn matches_key(citizen: &Citizen, key: &FilterKey, value: &str, city: &CityIndex) -> bool {
    let wanted = value.to_lowercase();
    let descriptors = citizen.descriptors();
    match key {
        FilterKey::HairColour => descriptors.is_some_and(|d| {
            labelled(d.hair_colour_name(), d.hair_colour(), labels::HAIR_COLOUR, &wanted)
        }),
        FilterKey::HairType => descriptors
            .is_some_and(|d| labelled(None, d.hair_type(), labels::HAIR_TYPE, &wanted)),
        FilterKey::EyeColour => descriptors.is_some_and(|d| {
            labelled(d.eye_colour_label(), d.eye_colour(), labels::EYE_COLOUR, &wanted)
        }),
        FilterKey::Height => descriptors.is_some_and(|d| height(d, &wanted)),
        FilterKey::Gender => enumerated(citizen.gender(), labels::GENDER, 0, &wanted),
        // stored 1-based, listed 0-based
        FilterKey::Blood => enumerated(citizen.blood(), labels::BLOOD_TYPE, 1, &wanted),
        FilterKey::FacialFeature => descriptors.is_some_and(|d| facial_feature(d, &wanted)),
        FilterKey::ShoeSize => descriptors
            .and_then(Descriptors::shoe_size)
            .is_some_and(|size| size.as_str().to_lowercase().contains(&wanted)),
        FilterKey::JobTitle => city
            .job_of(citizen)
            .and_then(|placement| placement.job_title())
            .is_some_and(|title| title.to_lowercase().contains(&wanted)),
        FilterKey::Unknown(_) => false,
    }
}

// A precomputed label wins over re-deriving one from the index.
fn labelled(
    precomputed: Option<&str>,
    index: Option<i64>,
    table: &'static [&'static str],
    wanted: &str,
) -> bool {
    precomputed
        .or_else(|| index.and_then(|i| labels::label(table, i)))
        .is_some_and(|label| label.to_lowercase().contains(wanted))
}

fn height(descriptors: &Descriptors, wanted: &str) -> bool {
    if descriptors.height_label().is_some() || descriptors.height().is_some() {
        return labelled(
            descriptors.height_label(),
            descriptors.height(),
            labels::HEIGHT,
            wanted,
        );
    }
    descriptors
        .height_cm()
        .is_some_and(|cm| cm.as_str().to_lowercase().contains(wanted))
}

// Exact position in the label list when the value names a label, otherwise a
// substring of the raw number.
fn enumerated(stored: Option<i64>, table: &[&str], offset: i64, wanted: &str) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    match labels::position(table, wanted) {
        Some(position) => i64::try_from(position).is_ok_and(|p| stored == p + offset),
        None => stored.to_string().contains(wanted),
    }
}

fn facial_feature(descriptors: &Descriptors, wanted: &str) -> bool {
    let features = descriptors.facial_features();
    let by_label = features.iter().any(|f| {
        f.feature()
            .and_then(|i| labels::label(labels::FACIAL_FEATURE, i))
            .is_some_and(|label| label.to_lowercase().contains(wanted))
    });
    if by_label {
        return true;
    }
    labels::position(labels::FACIAL_FEATURE, wanted)
        .and_then(|p| i64::try_from(p).ok())
        .is_some_and(|p| features.iter().any(|f| f.feature() == Some(p)))
}
