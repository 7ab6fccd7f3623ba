mod common;

use citysearch::directory::{businesses, buildings, residents};

#[test]
fn buildings_list_resident_counts() {
    let city = common::city();
    let listing = buildings(&city);
    let pairs: Vec<(&str, usize)> = listing.iter().map(|b| (b.name.as_str(), b.residents)).collect();
    assert_eq!(pairs, [("Harbour House", 1), ("Tower A", 4)]);
}

#[test]
fn residents_carry_their_address() {
    let city = common::city();
    let rows = residents(&city, "Tower A");
    let addresses: Vec<&str> = rows.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addresses, ["Basement 1", "Basement 2", "Unit 3", "Unit 10"]);
    assert_eq!(rows[0].human_id, Some(3));
    assert!(residents(&city, "Nowhere").is_empty());
}

#[test]
fn businesses_skip_homes_vendors_and_fixtures() {
    let city = common::city();
    let found = businesses(&city, "Tower A");
    let names: Vec<&str> = found.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Gym", "Diner", "Law Office"], "lowest floor first");
}

#[test]
fn business_locations() {
    let city = common::city();
    let found = businesses(&city, "Tower A");
    let locations: Vec<&str> = found.iter().map(|b| b.location.as_str()).collect();
    assert_eq!(locations, ["Basement 1", "Ground floor", "Floor 3"]);
    assert_eq!(found[1].preset, "AmericanDiner");
}

#[test]
fn outside_business_and_unknown_floor() {
    let city = citysearch::index::CityIndex::from_value(serde_json::json!({
        "tiles": [ { "building": { "name": "Plaza", "floors": [
            { "addresses": [ { "id": 1, "name": "Kiosk", "company": { "preset": "NewsStand" } } ] },
            { "floor": 2, "addresses": [
                { "id": 2, "name": "Terrace Bar", "isOutside": true, "company": { "preset": "Bar" } },
                { "id": 3, "name": "Vacant Unit", "company": { "preset": "Shop" } },
                { "id": 4, "name": "204 Plaza", "company": { "preset": "Shop" } }
            ] }
        ] } } ]
    }));
    let found = businesses(&city, "Plaza");
    let rows: Vec<(&str, &str)> = found.iter().map(|b| (b.name.as_str(), b.location.as_str())).collect();
    assert_eq!(rows, [("Terrace Bar", "Outside"), ("Kiosk", "Unknown floor")]);
}
