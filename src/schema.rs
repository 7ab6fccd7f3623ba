//! The filter schema: which `key:value` filters the query language knows, and
//! the values each key accepts.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::labels;

// ------------- FilterKey -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    HairColour,
    HairType,
    Height,
    Gender,
    Blood,
    EyeColour,
    FacialFeature,
    ShoeSize,
    JobTitle,
    /// A key the schema does not know, kept lowercased. Never matches.
    Unknown(String),
}

impl FilterKey {
    /// The known keys in schema order.
    pub fn known() -> [FilterKey; 9] {
        [
            FilterKey::HairColour,
            FilterKey::HairType,
            FilterKey::Height,
            FilterKey::Gender,
            FilterKey::Blood,
            FilterKey::EyeColour,
            FilterKey::FacialFeature,
            FilterKey::ShoeSize,
            FilterKey::JobTitle,
        ]
    }

    /// Resolves any casing of a key to the key itself.
    pub fn resolve(raw: &str) -> FilterKey {
        let lowered = raw.to_lowercase();
        Self::known()
            .into_iter()
            .find(|key| key.name().to_lowercase() == lowered)
            .unwrap_or(FilterKey::Unknown(lowered))
    }

    pub fn name(&self) -> &str {
        match self {
            FilterKey::HairColour => "hairColour",
            FilterKey::HairType => "hairType",
            FilterKey::Height => "height",
            FilterKey::Gender => "gender",
            FilterKey::Blood => "blood",
            FilterKey::EyeColour => "eyeColour",
            FilterKey::FacialFeature => "facialFeature",
            FilterKey::ShoeSize => "shoeSize",
            FilterKey::JobTitle => "jobTitle",
            FilterKey::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, FilterKey::Unknown(_))
    }

    fn static_values(&self) -> &'static [&'static str] {
        match self {
            FilterKey::HairColour => labels::HAIR_COLOUR,
            FilterKey::HairType => labels::HAIR_TYPE,
            FilterKey::Height => labels::HEIGHT,
            FilterKey::Gender => labels::GENDER,
            FilterKey::Blood => labels::BLOOD_TYPE,
            FilterKey::EyeColour => labels::EYE_COLOUR,
            FilterKey::FacialFeature => labels::FACIAL_FEATURE,
            FilterKey::ShoeSize => labels::SHOE_SIZE,
            FilterKey::JobTitle | FilterKey::Unknown(_) => &[],
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for FilterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ------------- FilterSchema -------------
#[derive(Debug, Clone)]
pub struct FilterSchema {
    values: IndexMap<FilterKey, Vec<String>>,
}

impl FilterSchema {
    /// The static table; `jobTitle` starts out empty.
    pub fn new() -> Self {
        let values = FilterKey::known()
            .into_iter()
            .map(|key| {
                let values = key.static_values().iter().map(|v| v.to_string()).collect();
                (key, values)
            })
            .collect();
        Self { values }
    }

    /// Fills `jobTitle` with the distinct titles given, sorted.
    pub fn with_job_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = titles
            .into_iter()
            .map(Into::into)
            .filter(|title| !title.is_empty())
            .collect();
        self.values
            .insert(FilterKey::JobTitle, distinct.into_iter().collect());
        self
    }

    /// Canonical key names in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(FilterKey::name)
    }

    /// Accepted values for `key`; empty for unknown keys.
    pub fn values(&self, key: &FilterKey) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn job_titles(&self) -> &[String] {
        self.values(&FilterKey::JobTitle)
    }
}

impl Default for FilterSchema {
    fn default() -> Self {
        Self::new()
    }
}
