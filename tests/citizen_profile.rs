mod common;

use citysearch::index::CityIndex;
use citysearch::profile::{CitizenProfile, sexuality};
use serde_json::json;

fn profile(id: i64) -> CitizenProfile {
    let city = common::city();
    let citizen = city.citizen_by_id(id).expect("citizen exists");
    CitizenProfile::build(citizen, &city)
}

#[test]
fn full_profile() {
    let ana = profile(1);
    assert_eq!(ana.citizen_name.as_deref(), Some("Ana Silva"));
    assert_eq!(ana.gender, Some("Female"));
    assert_eq!(ana.blood, Some("O+"));
    assert_eq!(ana.hair.as_deref(), Some("Long, Ginger"));
    assert_eq!(ana.eyes.as_deref(), Some("Green"));
    assert_eq!(ana.height.as_deref(), Some("Tall"));
    assert_eq!(ana.height_cm.as_deref(), Some("181"));
    assert_eq!(ana.shoe_size.as_deref(), Some("7"));
    assert_eq!(ana.facial_features, ["Beard", "Glasses"]);
    assert_eq!(ana.home_address, "Unit 3");
    assert_eq!(ana.workplace, "Diner");
    assert_eq!(ana.job_title, "Head Chef");
    assert_eq!(ana.password, "1234");
    assert_eq!(ana.birthday.as_deref(), Some("12/3/1990"));
    assert_eq!(ana.partner.and_then(|p| p.citizen_name).as_deref(), Some("Ben Silva"));
}

#[test]
fn traits_ending_in_a_year_are_hidden() {
    let ana = profile(1);
    assert_eq!(ana.traits, ["Sex-AttractedToWomen", "Quick-Learner"]);
}

#[test]
fn homeless_unknown_and_unemployed() {
    let eli = profile(5);
    assert_eq!(eli.home_address, "Homeless");
    assert_eq!(eli.workplace, "Unemployed");
    assert_eq!(eli.job_title, "-");
    assert_eq!(eli.sexuality, "Unknown", "no traits listed at all");
    let dev = profile(4);
    assert_eq!(dev.home_address, "Basement 2");
    assert_eq!(dev.workplace, "Unemployed");
    let fay = profile(6);
    assert_eq!(fay.home_address, "101 Harbour");
    assert_eq!(fay.workplace, "Unemployed", "job 999 is on no roster");
}

#[test]
fn sexuality_from_traits_and_gender() {
    assert_eq!(profile(1).sexuality, "Lesbian", "woman attracted to women");
    assert_eq!(profile(2).sexuality, "Straight", "man attracted to women");
    assert_eq!(profile(3).sexuality, "Pansexual");

    let city = CityIndex::from_value(json!({ "citizens": [
        { "humanID": 1, "gender": 0, "traits": [ { "trait": "Sex-AttractedToMen" } ] },
        { "humanID": 2, "gender": 1, "traits": [ { "trait": "Sex-AttractedToMen" } ] },
        { "humanID": 3, "traits": [ { "trait": "Sex-AttractedToMen" }, { "trait": "Sex-AttractedToWomen" } ] },
        { "humanID": 4, "traits": [ { "trait": "Sex-AttractedToNonBinary" } ] },
        { "humanID": 5, "traits": [ { "trait": "Sex-AttractedToWomen" }, { "trait": "Sex-AttractedToNonBinary" } ] },
        { "humanID": 6, "traits": [] }
    ] }));
    let found: Vec<&str> = city.citizens().iter().map(sexuality).collect();
    assert_eq!(
        found,
        [
            "Gay",
            "Straight",
            "Bisexual",
            "Attracted to non-binary",
            "Attracted to women & non-binary",
            "Asexual"
        ]
    );
}

#[test]
fn profile_serializes_with_document_names() {
    let value = serde_json::to_value(profile(2)).expect("serializable");
    assert_eq!(value["humanID"], 2);
    assert_eq!(value["jobTitle"], "Lawyer");
    assert_eq!(value["homeAddress"], "Unit 10");
}
