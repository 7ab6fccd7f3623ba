//! Typed, partial view of an exported city document.
//!
//! Every field is optional. A field holding the wrong JSON type reads as
//! absent, and list elements that cannot be read are skipped, so a damaged or
//! half-written export still loads. Records are immutable once read; the
//! accessors are the only way in.

use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use tracing::warn;

// ------------- Scalar -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    Number,
    Bool,
}

/// A JSON string, number or boolean kept as text. Equality includes the kind,
/// so the number `5` and the string `"5"` are different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scalar {
    kind: ScalarKind,
    text: String,
}

impl Scalar {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: ScalarKind::Text,
            text: value.into(),
        }
    }
    pub fn number(value: i64) -> Self {
        Self {
            kind: ScalarKind::Number,
            text: value.to_string(),
        }
    }
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
    pub fn as_str(&self) -> &str {
        &self.text
    }
    /// Zero, the empty string and `false` do not identify anything.
    pub fn is_truthy(&self) -> bool {
        match self.kind {
            ScalarKind::Text => !self.text.is_empty(),
            ScalarKind::Number => self.text != "0",
            ScalarKind::Bool => self.text == "true",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(Self::text(text)),
            Value::Number(number) => Ok(Self {
                kind: ScalarKind::Number,
                text: number_text(&number),
            }),
            Value::Bool(flag) => Ok(Self {
                kind: ScalarKind::Bool,
                text: flag.to_string(),
            }),
            other => Err(D::Error::custom(format!("expected a scalar, found {other}"))),
        }
    }
}

/// Renders a number the way the game's UI would: integral floats lose `.0`.
pub fn number_text(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => number.to_string(),
    }
}

pub type AddressId = Scalar;
pub type JobId = Scalar;
pub type HumanId = i64;

// ------------- Lenient readers -------------
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

// Like `lenient_list`, but keeps "not a list" apart from "an empty list".
fn lenient_optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

// ------------- City -------------
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDocument {
    #[serde(default, deserialize_with = "lenient_text")]
    city_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    population: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    seed: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_list")]
    city_tiles: Vec<Tile>,
    #[serde(default, deserialize_with = "lenient_list")]
    tiles: Vec<Tile>,
    #[serde(default, deserialize_with = "lenient_list")]
    citizens: Vec<Citizen>,
}

impl CityDocument {
    /// Reads a decoded JSON document. Anything that is not an object yields an
    /// empty city.
    pub fn from_value(value: Value) -> Self {
        match Self::deserialize(value) {
            Ok(city) => city,
            Err(e) => {
                warn!(error = %e, "document root is not a city, treating it as empty");
                Self::default()
            }
        }
    }
    pub fn city_name(&self) -> Option<&str> {
        self.city_name.as_deref()
    }
    pub fn population(&self) -> Option<&Scalar> {
        self.population.as_ref()
    }
    pub fn seed(&self) -> Option<&Scalar> {
        self.seed.as_ref()
    }
    /// Tiles in document order, read from `cityTiles` when present.
    pub fn tiles(&self) -> &[Tile] {
        if self.city_tiles.is_empty() {
            &self.tiles
        } else {
            &self.city_tiles
        }
    }
    pub fn citizens(&self) -> &[Citizen] {
        &self.citizens
    }
    /// Every `(building, floor, address)` in tile, floor, address order.
    pub fn addresses(&self) -> impl Iterator<Item = (&Building, &Floor, &Address)> {
        self.tiles()
            .iter()
            .filter_map(Tile::building)
            .flat_map(|building| {
                building.floors().iter().flat_map(move |floor| {
                    floor
                        .addresses()
                        .iter()
                        .map(move |address| (building, floor, address))
                })
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tile {
    #[serde(default, deserialize_with = "lenient")]
    building: Option<Building>,
}

impl Tile {
    pub fn building(&self) -> Option<&Building> {
        self.building.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Building {
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    floors: Vec<Floor>,
}

impl Building {
    /// The building's name, when present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Floor {
    #[serde(default, deserialize_with = "lenient_int")]
    floor: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    addresses: Vec<Address>,
}

impl Floor {
    pub fn number(&self) -> Option<i64> {
        self.floor
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<AddressId>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    is_outside: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    company: Option<Company>,
}

impl Address {
    pub fn id(&self) -> Option<&AddressId> {
        self.id.as_ref().filter(|id| id.is_truthy())
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
    pub fn is_outside(&self) -> bool {
        self.is_outside == Some(true)
    }
    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()
    }
    /// The address name, or the building's when the address has none.
    pub fn display_name<'a>(&'a self, building: &'a Building) -> Option<&'a str> {
        self.name().or_else(|| building.name())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, deserialize_with = "lenient_text")]
    preset: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    company_roster: Vec<RosterEntry>,
}

impl Company {
    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }
    pub fn roster(&self) -> &[RosterEntry] {
        &self.company_roster
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterEntry {
    #[serde(default, deserialize_with = "lenient")]
    id: Option<JobId>,
    #[serde(default, deserialize_with = "lenient_text")]
    name: Option<String>,
}

impl RosterEntry {
    pub fn id(&self) -> Option<&JobId> {
        self.id.as_ref()
    }
    /// The job title, when present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

// ------------- Citizen -------------
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    #[serde(rename = "humanID", default, deserialize_with = "lenient_int")]
    human_id: Option<HumanId>,
    #[serde(default, deserialize_with = "lenient_text")]
    citizen_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    home: Option<AddressId>,
    #[serde(default, deserialize_with = "lenient")]
    homeless: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    job: Option<JobId>,
    #[serde(default, deserialize_with = "lenient_int")]
    gender: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    blood: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    partner: Option<HumanId>,
    #[serde(default, deserialize_with = "lenient")]
    birthday: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    descriptors: Option<Descriptors>,
    #[serde(default, deserialize_with = "lenient_optional_list")]
    traits: Option<Vec<Trait>>,
    #[serde(default, deserialize_with = "lenient")]
    password: Option<Password>,
}

impl Citizen {
    pub fn human_id(&self) -> Option<HumanId> {
        self.human_id
    }
    pub fn name(&self) -> Option<&str> {
        self.citizen_name.as_deref()
    }
    /// The name, or an empty string, for comparisons and text search.
    pub fn name_or_empty(&self) -> &str {
        self.name().unwrap_or("")
    }
    pub fn home(&self) -> Option<&AddressId> {
        self.home.as_ref().filter(|id| id.is_truthy())
    }
    pub fn is_homeless(&self) -> bool {
        self.homeless == Some(true)
    }
    /// The roster entry this citizen works, absent for the unemployed.
    pub fn job(&self) -> Option<&JobId> {
        self.job.as_ref().filter(|id| id.is_truthy())
    }
    pub fn gender(&self) -> Option<i64> {
        self.gender
    }
    /// Blood type, 1-based.
    pub fn blood(&self) -> Option<i64> {
        self.blood
    }
    pub fn partner(&self) -> Option<HumanId> {
        self.partner.filter(|partner| *partner > 0)
    }
    pub fn birthday(&self) -> Option<&Scalar> {
        self.birthday.as_ref()
    }
    pub fn descriptors(&self) -> Option<&Descriptors> {
        self.descriptors.as_ref()
    }
    pub fn traits(&self) -> &[Trait] {
        self.traits.as_deref().unwrap_or(&[])
    }
    /// Whether the document lists traits at all, even an empty list.
    pub fn has_traits(&self) -> bool {
        self.traits.is_some()
    }
    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptors {
    #[serde(default, deserialize_with = "lenient_int")]
    hair_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    hair_colour_category: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    hair_colour_category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    eye_colour: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    eye_colour_label: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    height: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    height_label: Option<String>,
    #[serde(rename = "heightCM", default, deserialize_with = "lenient")]
    height_cm: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    shoe_size: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_list")]
    facial_features: Vec<FacialFeature>,
}

impl Descriptors {
    pub fn hair_type(&self) -> Option<i64> {
        self.hair_type
    }
    pub fn hair_colour(&self) -> Option<i64> {
        self.hair_colour_category
    }
    /// Label the exporter may have written next to the index.
    pub fn hair_colour_name(&self) -> Option<&str> {
        self.hair_colour_category_name.as_deref().filter(|l| !l.is_empty())
    }
    pub fn eye_colour(&self) -> Option<i64> {
        self.eye_colour
    }
    pub fn eye_colour_label(&self) -> Option<&str> {
        self.eye_colour_label.as_deref().filter(|l| !l.is_empty())
    }
    pub fn height(&self) -> Option<i64> {
        self.height
    }
    pub fn height_label(&self) -> Option<&str> {
        self.height_label.as_deref().filter(|l| !l.is_empty())
    }
    pub fn height_cm(&self) -> Option<&Scalar> {
        self.height_cm.as_ref()
    }
    pub fn shoe_size(&self) -> Option<&Scalar> {
        self.shoe_size.as_ref()
    }
    pub fn facial_features(&self) -> &[FacialFeature] {
        &self.facial_features
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacialFeature {
    #[serde(default, deserialize_with = "lenient_int")]
    feature: Option<i64>,
}

impl FacialFeature {
    pub fn feature(&self) -> Option<i64> {
        self.feature
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trait {
    #[serde(rename = "trait", default, deserialize_with = "lenient_text")]
    name: Option<String>,
}

impl Trait {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Password {
    Digits {
        #[serde(default, deserialize_with = "lenient_list")]
        digits: Vec<Scalar>,
    },
    Plain(Scalar),
}

impl Password {
    /// Digits joined together, or the plain value.
    pub fn reveal(&self) -> String {
        match self {
            Password::Digits { digits } => digits.iter().map(Scalar::as_str).collect(),
            Password::Plain(value) => value.to_string(),
        }
    }
}
