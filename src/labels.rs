//! Label tables for the small integer enums found on citizens.
//! Positions in each table are the enum values, except blood which is stored
//! 1-based in documents.

pub const HAIR_TYPE: &[&str] = &["A bald head", "Short", "Long"];

pub const HAIR_COLOUR: &[&str] = &[
    "Black", "Brown", "Blonde", "Ginger", "Red", "Blue", "Green", "Purple", "Pink", "Grey", "White",
];

pub const EYE_COLOUR: &[&str] = &["Blue", "Brown", "Green", "Grey"];

pub const FACIAL_FEATURE: &[&str] = &[
    "Scarring",
    "Beard",
    "Moustache",
    "Piercing",
    "Tattoo",
    "Glasses",
    "Mole",
];

pub const BLOOD_TYPE: &[&str] = &["A+", "A-", "B+", "B-", "O+", "O-", "AB+", "AB-"];

pub const HEIGHT: &[&str] = &["Very short", "Short", "Average", "Tall", "Very tall"];

pub const GENDER: &[&str] = &["Male", "Female", "Non-binary"];

pub const SHOE_SIZE: &[&str] = &["5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15"];

/// Label at `index`, if the index is inside the table.
pub fn label(table: &'static [&'static str], index: i64) -> Option<&'static str> {
    usize::try_from(index).ok().and_then(|i| table.get(i).copied())
}

/// Blood label for a 1-based blood value.
pub fn blood_label(blood: i64) -> Option<&'static str> {
    blood.checked_sub(1).and_then(|index| label(BLOOD_TYPE, index))
}

/// Position of `value` in `table`, compared case-insensitively.
pub fn position(table: &[impl AsRef<str>], value: &str) -> Option<usize> {
    table
        .iter()
        .position(|entry| entry.as_ref().to_lowercase() == value.to_lowercase())
}
