#![allow(dead_code)]

use citysearch::index::CityIndex;
use serde_json::{Value, json};

/// A small city: one tower with basements, units and a few businesses, one
/// house, and six citizens covering the awkward cases (homeless, no home,
/// no job, a job id nobody has).
pub fn city_json() -> Value {
    json!({
        "cityName": "Testville",
        "population": 6,
        "seed": "abc123",
        "cityTiles": [
            { "building": {
                "name": "Tower A",
                "floors": [
                    { "floor": -1, "addresses": [
                        { "id": 11, "name": "Basement 2" },
                        { "id": 10, "name": "Basement 1" },
                        { "id": 20, "name": "Gym", "company": {
                            "preset": "Gym",
                            "companyRoster": [ { "id": 501, "name": "Trainer" } ]
                        } }
                    ] },
                    { "floor": 0, "addresses": [
                        { "id": 12, "name": "Unit 10" },
                        { "id": 13, "name": "Unit 3" },
                        { "id": 21, "name": "Diner", "company": {
                            "preset": "AmericanDiner",
                            "companyRoster": [
                                { "id": 502, "name": "Head Chef" },
                                { "id": 503, "name": "Head" },
                                { "id": 504, "name": "Chef" }
                            ]
                        } },
                        { "id": 22, "name": "Street-side Cart", "isOutside": true, "company": {
                            "preset": "StreetFoodVendorCart",
                            "companyRoster": []
                        } },
                        { "id": 23, "name": "Lobby", "company": { "preset": "Lobby" } }
                    ] },
                    { "floor": 3, "addresses": [
                        { "id": 24, "name": "Law Office", "company": {
                            "preset": "LawFirm",
                            "companyRoster": [ { "id": 505, "name": "Lawyer" } ]
                        } }
                    ] }
                ]
            } },
            { "building": {
                "name": "Harbour House",
                "floors": [
                    { "floor": 1, "addresses": [ { "id": "hh-1", "name": "101 Harbour" } ] }
                ]
            } },
            { "building": null }
        ],
        "citizens": [
            {
                "humanID": 1, "citizenName": "Ana Silva", "gender": 1, "blood": 5,
                "home": 13, "job": 502, "partner": 2, "birthday": "12/3/1990",
                "descriptors": {
                    "hairType": 2, "hairColourCategory": 3, "eyeColour": 2, "height": 3,
                    "heightCM": 181, "shoeSize": 7,
                    "facialFeatures": [ { "feature": 1 }, { "feature": 5 } ]
                },
                "traits": [
                    { "trait": "Sex-AttractedToWomen" },
                    { "trait": "Quick-Learner" },
                    { "trait": "Born1990" }
                ],
                "password": { "digits": [1, 2, 3, 4] }
            },
            {
                "humanID": 2, "citizenName": "Ben Silva", "gender": 0, "blood": 1,
                "home": 12, "job": 505, "partner": 1,
                "descriptors": {
                    "hairType": 1, "hairColourCategory": 0, "eyeColour": 0, "height": 1,
                    "shoeSize": 10
                },
                "traits": [ { "trait": "Sex-AttractedToWomen" } ]
            },
            {
                "humanID": 3, "citizenName": "Cleo Marsh", "gender": 2, "blood": 7,
                "home": 10, "job": 503,
                "descriptors": { "heightCM": 165, "eyeColourLabel": "Hazel" },
                "traits": [
                    { "trait": "Sex-AttractedToMen" },
                    { "trait": "Sex-AttractedToWomen" },
                    { "trait": "Sex-AttractedToNonBinary" }
                ]
            },
            { "humanID": 4, "citizenName": "Dev Okafor", "gender": 0, "home": 11, "job": 0 },
            { "humanID": 5, "citizenName": "Eli Marsh", "homeless": true, "home": 0 },
            { "humanID": 6, "citizenName": "Fay Quill", "home": "hh-1", "job": 999 }
        ]
    })
}

pub fn city() -> CityIndex {
    CityIndex::from_value(city_json())
}

/// `count` identical citizens named "Citizen N" with no other fields.
pub fn crowd(count: usize) -> CityIndex {
    let citizens: Vec<Value> = (1..=count)
        .map(|i| json!({ "humanID": i, "citizenName": format!("Citizen {i}"), "gender": i % 2 }))
        .collect();
    CityIndex::from_value(json!({ "citizens": citizens }))
}

/// Human ids of the rows a search returned, in order.
pub fn ids(city: &CityIndex, raw: &str) -> Vec<i64> {
    citysearch::engine::Engine::new(city)
        .search(raw)
        .rows(city)
        .into_iter()
        .filter_map(|row| row.human_id)
        .collect()
}

pub fn brotli(bytes: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut out = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 5, 22);
        writer.write_all(bytes).expect("compress");
    }
    out
}
