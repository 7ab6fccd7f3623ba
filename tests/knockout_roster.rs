mod common;

use citysearch::knockout::{KnockoutRoster, Knockouts, RosterFilter, SortMode};
use serde_json::json;

fn names(rows: &[citysearch::knockout::RosterRow]) -> Vec<&str> {
    rows.iter().map(|r| r.citizen_name.as_str()).collect()
}

#[test]
fn knockouts_come_from_the_save() {
    let knockouts = Knockouts::from_save(&json!({ "spareNoOneReference": [3, "x", 1, 3] }));
    assert_eq!(knockouts.ids().collect::<Vec<_>>(), [3, 1], "non-ids skipped, repeats once");
    assert!(Knockouts::from_save(&json!({ "spareNoOneReference": "all" })).is_empty());
    assert!(Knockouts::from_save(&json!({})).is_empty());
}

#[test]
fn toggle_flips_membership() {
    let mut knockouts = Knockouts::new();
    assert!(knockouts.toggle(4));
    assert!(knockouts.contains(4));
    assert!(!knockouts.toggle(4));
    assert!(knockouts.is_empty());
}

#[test]
fn rows_sorted_by_name() {
    let city = common::city();
    let roster = KnockoutRoster::new(&city, Knockouts::new());
    let rows = roster.rows(SortMode::Name, &RosterFilter::default());
    assert_eq!(
        names(&rows),
        ["Ana Silva", "Ben Silva", "Cleo Marsh", "Dev Okafor", "Eli Marsh", "Fay Quill"]
    );
    let eli = &rows[4];
    assert_eq!((eli.building.as_str(), eli.address.as_str()), ("Homeless", "Homeless"));
}

#[test]
fn rows_sorted_by_residence() {
    let city = common::city();
    let roster = KnockoutRoster::new(&city, Knockouts::new());
    let rows = roster.rows(SortMode::Residence, &RosterFilter::default());
    assert_eq!(
        names(&rows),
        ["Fay Quill", "Eli Marsh", "Cleo Marsh", "Dev Okafor", "Ana Silva", "Ben Silva"],
        "Harbour House, Homeless, then Tower A basements before units"
    );
}

#[test]
fn filters_combine() {
    let city = common::city();
    let knocked: Knockouts = [1, 3].into_iter().collect();
    let roster = KnockoutRoster::new(&city, knocked);
    let filter = RosterFilter {
        query: " MARSH ".to_string(),
        ..RosterFilter::default()
    };
    assert_eq!(names(&roster.rows(SortMode::Name, &filter)), ["Cleo Marsh", "Eli Marsh"]);

    let filter = RosterFilter {
        residence: Some("Tower A".to_string()),
        hide_knocked: true,
        ..RosterFilter::default()
    };
    assert_eq!(names(&roster.rows(SortMode::Name, &filter)), ["Ben Silva", "Dev Okafor"]);
}

#[test]
fn occupied_residences_exclude_the_homeless() {
    let city = common::city();
    let roster = KnockoutRoster::new(&city, Knockouts::new());
    assert_eq!(roster.residences(), ["Harbour House", "Tower A"]);
}

#[test]
fn totals_never_go_negative() {
    let city = common::city();
    let mut roster = KnockoutRoster::new(&city, (1..=10).collect());
    let totals = roster.totals();
    assert_eq!((totals.all, totals.knocked, totals.remaining), (6, 10, 0));
    roster.toggle(10);
    assert_eq!(roster.totals().knocked, 9);
}

#[test]
fn sort_mode_parses() {
    assert_eq!("Residence".parse::<SortMode>(), Ok(SortMode::Residence));
    assert!("age".parse::<SortMode>().is_err());
    assert_eq!(SortMode::Name.to_string(), "name");
}
