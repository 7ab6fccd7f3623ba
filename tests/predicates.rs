mod common;

use citysearch::index::CityIndex;
use serde_json::json;

use common::ids;

fn pair() -> CityIndex {
    CityIndex::from_value(json!({
        "citizens": [
            { "humanID": 1, "citizenName": "Ana Silva", "gender": 1, "blood": 5 },
            { "humanID": 2, "citizenName": "Ben Silva", "gender": 0, "blood": 1 }
        ]
    }))
}

#[test]
fn free_text_and_gender() {
    assert_eq!(ids(&pair(), "silva gender:female"), [1]);
    assert_eq!(ids(&pair(), "silva"), [1, 2]);
}

#[test]
fn blood_is_stored_one_based() {
    assert_eq!(ids(&pair(), "blood:O+"), [1], "O+ is the fifth label, stored as 5");
    assert_eq!(ids(&pair(), "blood:A+"), [2], "A+ is stored as 1");
}

#[test]
fn enumerated_keys_fall_back_to_the_raw_number() {
    assert_eq!(ids(&pair(), "gender:1"), [1]);
    assert_eq!(ids(&pair(), "blood:5"), [1]);
}

#[test]
fn gender_is_exact_not_substring() {
    // "male" is a substring of "female" but names the first label
    assert_eq!(ids(&pair(), "gender:male"), [2]);
}

#[test]
fn values_under_one_key_are_alternatives() {
    assert_eq!(ids(&pair(), "gender:male gender:female"), [1, 2]);
}

#[test]
fn different_keys_must_all_hold() {
    assert!(ids(&pair(), "gender:male blood:O+").is_empty());
}

#[test]
fn unknown_keys_never_match() {
    assert!(ids(&pair(), "mood:happy").is_empty());
    assert!(ids(&pair(), "silva mood:").is_empty());
}

#[test]
fn label_keys_match_by_substring() {
    let city = common::city();
    assert_eq!(ids(&city, "hairColour:ging"), [1]);
    assert_eq!(ids(&city, "hairType:long"), [1]);
    assert_eq!(ids(&city, "eyeColour:green"), [1]);
    assert_eq!(ids(&city, "eyeColour:hazel"), [3], "a precomputed label is used as is");
    assert_eq!(ids(&city, "height:tall"), [1], "Ana is Tall, Ben is Short");
}

#[test]
fn height_falls_back_to_centimetres() {
    let city = common::city();
    assert_eq!(ids(&city, "height:165"), [3]);
}

#[test]
fn facial_features_and_shoe_size() {
    let city = common::city();
    assert_eq!(ids(&city, "facialFeature:glasses"), [1]);
    assert_eq!(ids(&city, "facialFeature:beard"), [1]);
    assert!(ids(&city, "facialFeature:tattoo").is_empty());
    assert_eq!(ids(&city, "shoeSize:10"), [2]);
    assert_eq!(ids(&city, "shoeSize:1"), [2], "shoe size matches as a substring");
}

#[test]
fn job_title_is_a_substring_of_the_resolved_title() {
    let city = common::city();
    assert_eq!(ids(&city, "jobTitle:Head Chef"), [1]);
    assert_eq!(ids(&city, "jobTitle:Head"), [1, 3], "the prefix filters differently");
    assert_eq!(ids(&city, "jobTitle:lawyer"), [2]);
}

#[test]
fn missing_fields_never_match() {
    let city = common::city();
    // Eli has no descriptors, gender or job at all
    for raw in ["hairColour:black", "gender:male", "jobTitle:chef", "blood:A+"] {
        assert!(!ids(&city, raw).contains(&5), "{raw} should not match Eli");
    }
}
