use citysearch::query::parse;
use citysearch::schema::{FilterKey, FilterSchema};

fn schema() -> FilterSchema {
    FilterSchema::new().with_job_titles(["Head Chef", "Head", "Chef", "Head of Security"])
}

#[test]
fn filters_and_free_text_are_split() {
    let q = parse("ana hairColour:Blonde silva", &schema());
    assert_eq!(q.free_text(), ["ana", "silva"]);
    assert_eq!(q.values(&FilterKey::HairColour), ["Blonde"]);
}

#[test]
fn keys_resolve_case_insensitively() {
    let q = parse("HAIRCOLOUR:red haircolour:Blue", &schema());
    assert_eq!(q.filters().len(), 1, "both spellings are one key");
    assert_eq!(q.values(&FilterKey::HairColour), ["red", "Blue"]);
}

#[test]
fn leading_colon_is_free_text() {
    let q = parse(":female", &schema());
    assert!(q.filters().is_empty());
    assert_eq!(q.free_text(), [":female"]);
}

#[test]
fn value_is_everything_after_the_first_colon() {
    let q = parse("shoeSize:1:2", &schema());
    assert_eq!(q.values(&FilterKey::ShoeSize), ["1:2"]);
}

#[test]
fn unknown_keys_are_kept() {
    let q = parse("mood:happy", &schema());
    let key = FilterKey::resolve("Mood");
    assert!(!key.is_known());
    assert_eq!(q.values(&key), ["happy"]);
}

#[test]
fn multi_word_values_prefer_the_exact_match() {
    let q = parse("jobTitle:Head Chef", &schema());
    assert_eq!(q.values(&FilterKey::JobTitle), ["Head Chef"]);
    assert!(q.free_text().is_empty(), "Chef was consumed by the value");

    let q = parse("jobTitle:Head of", &schema());
    assert_eq!(
        q.values(&FilterKey::JobTitle),
        ["Head"],
        "the exact match seen on the way wins over the partial 'Head of'"
    );
    assert!(q.free_text().is_empty(), "consumed tokens stay consumed");
}

#[test]
fn growth_stops_at_the_first_non_prefix() {
    let q = parse("jobTitle:head silva gender:female", &schema());
    assert_eq!(q.values(&FilterKey::JobTitle), ["head"]);
    assert_eq!(q.free_text(), ["silva"]);
    assert_eq!(q.values(&FilterKey::Gender), ["female"]);
}

#[test]
fn empty_value_is_kept() {
    let q = parse("gender:", &schema());
    assert_eq!(q.values(&FilterKey::Gender), [""]);
}

#[test]
fn blank_input_parses_to_nothing() {
    assert!(parse("   ", &schema()).is_empty());
}

#[test]
fn parsing_is_repeatable() {
    let schema = schema();
    for raw in ["ana jobTitle:Head of Security blood:O+ silva", "  ", "mood:grim GENDER:male x"] {
        assert_eq!(parse(raw, &schema), parse(raw, &schema), "{raw:?} parses the same twice");
    }
}
