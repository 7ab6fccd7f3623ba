//! Everything the citizen card shows about one person.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::document::{Citizen, HumanId};
use crate::engine::CitizenRow;
use crate::index::CityIndex;
use crate::labels;

lazy_static! {
    // traits ending in a year are bookkeeping, not personality
    static ref YEAR_SUFFIX: Regex = Regex::new(r"[0-9]{4}$").expect("valid year pattern");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitizenProfile {
    #[serde(rename = "humanID")]
    pub human_id: Option<HumanId>,
    pub citizen_name: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<&'static str>,
    pub partner: Option<CitizenRow>,
    pub sexuality: &'static str,
    pub hair: Option<String>,
    pub facial_features: Vec<&'static str>,
    pub eyes: Option<String>,
    pub height_cm: Option<String>,
    pub height: Option<String>,
    pub shoe_size: Option<String>,
    pub blood: Option<&'static str>,
    pub home_address: String,
    pub workplace: String,
    pub job_title: String,
    pub password: String,
    pub traits: Vec<String>,
}

impl CitizenProfile {
    pub fn build(citizen: &Citizen, city: &CityIndex) -> Self {
        let descriptors = citizen.descriptors();
        let hair_type = descriptors
            .and_then(|d| d.hair_type())
            .and_then(|i| labels::label(labels::HAIR_TYPE, i));
        let hair_colour = descriptors.and_then(|d| {
            d.hair_colour_name()
                .or_else(|| d.hair_colour().and_then(|i| labels::label(labels::HAIR_COLOUR, i)))
        });
        let hair = match (hair_type, hair_colour) {
            (None, None) => None,
            (hair_type, hair_colour) => Some(format!(
                "{}, {}",
                hair_type.unwrap_or("Unknown"),
                hair_colour.unwrap_or("Unknown hair colour")
            )),
        };
        let placement = city.job_of(citizen);
        Self {
            human_id: citizen.human_id(),
            citizen_name: citizen.name().map(str::to_string),
            birthday: citizen.birthday().map(ToString::to_string),
            gender: citizen
                .gender()
                .and_then(|g| labels::label(labels::GENDER, g)),
            partner: citizen
                .partner()
                .and_then(|id| city.citizen_by_id(id))
                .map(CitizenRow::of),
            sexuality: sexuality(citizen),
            hair,
            facial_features: descriptors
                .map(|d| {
                    d.facial_features()
                        .iter()
                        .filter_map(|f| f.feature())
                        .filter_map(|i| labels::label(labels::FACIAL_FEATURE, i))
                        .collect()
                })
                .unwrap_or_default(),
            eyes: descriptors
                .and_then(|d| {
                    d.eye_colour_label()
                        .or_else(|| d.eye_colour().and_then(|i| labels::label(labels::EYE_COLOUR, i)))
                })
                .map(str::to_string),
            height_cm: descriptors
                .and_then(|d| d.height_cm())
                .map(ToString::to_string),
            height: descriptors
                .and_then(|d| {
                    d.height_label()
                        .or_else(|| d.height().and_then(|i| labels::label(labels::HEIGHT, i)))
                })
                .map(str::to_string),
            shoe_size: descriptors
                .and_then(|d| d.shoe_size())
                .map(ToString::to_string),
            blood: citizen.blood().and_then(labels::blood_label),
            home_address: home_address(citizen, city),
            workplace: placement
                .map(|p| p.workplace_name().unwrap_or("Unknown workplace"))
                .unwrap_or("Unemployed")
                .to_string(),
            job_title: placement
                .map(|p| p.job_title().unwrap_or("Unknown title"))
                .unwrap_or("-")
                .to_string(),
            password: citizen
                .password()
                .map(|p| p.reveal())
                .unwrap_or_default(),
            traits: visible_traits(citizen),
        }
    }
}

fn home_address(citizen: &Citizen, city: &CityIndex) -> String {
    match city.home_of(citizen) {
        Some(entry) => entry.address_name().to_string(),
        None if citizen.is_homeless() => "Homeless".to_string(),
        None => "Unknown".to_string(),
    }
}

pub fn visible_traits(citizen: &Citizen) -> Vec<String> {
    citizen
        .traits()
        .iter()
        .filter_map(|t| t.name())
        .filter(|name| !YEAR_SUFFIX.is_match(name.trim()))
        .map(str::to_string)
        .collect()
}

pub fn sexuality(citizen: &Citizen) -> &'static str {
    if !citizen.has_traits() {
        return "Unknown";
    }
    let attracted = |marker: &str| {
        citizen
            .traits()
            .iter()
            .filter_map(|t| t.name())
            .any(|name| name.contains(marker))
    };
    let men = attracted("Sex-AttractedToMen");
    let women = attracted("Sex-AttractedToWomen");
    let non_binary = attracted("Sex-AttractedToNonBinary");
    let is_man = citizen.gender() == Some(0);
    match (men, women, non_binary) {
        (true, true, true) => "Pansexual",
        (true, true, false) => "Bisexual",
        (true, false, true) => "Attracted to men & non-binary",
        (false, true, true) => "Attracted to women & non-binary",
        (true, false, false) if is_man => "Gay",
        (true, false, false) => "Straight",
        (false, true, false) if is_man => "Straight",
        (false, true, false) => "Lesbian",
        (false, false, true) => "Attracted to non-binary",
        (false, false, false) => "Asexual",
    }
}
