mod common;

use citysearch::schema::FilterSchema;
use citysearch::suggest::{Suggestions, accept, suggest};

fn schema() -> FilterSchema {
    FilterSchema::new().with_job_titles(["Head Chef", "Head", "Chef"])
}

#[test]
fn empty_input_suggests_every_key() {
    let s = suggest("", &schema());
    assert_eq!(s.candidates().len(), 9);
    assert_eq!(s.candidates()[0], "hairColour");
    assert_eq!(s.selected(), Some(0));
}

#[test]
fn keys_are_matched_by_prefix() {
    let s = suggest("ana h", &schema());
    assert_eq!(s.candidates(), ["hairColour", "hairType", "height"]);
    let s = suggest("EYE", &schema());
    assert_eq!(s.candidates(), ["eyeColour"]);
}

#[test]
fn values_follow_the_colon() {
    let s = suggest("jobTitle:Head", &schema());
    assert_eq!(
        s.candidates(),
        ["Head", "Head Chef"],
        "the prefix still suggests the longer title"
    );
    let s = suggest("blood:a", &schema());
    assert_eq!(s.candidates(), ["A+", "A-", "AB+", "AB-"]);
}

#[test]
fn unknown_key_or_nothing_matching_selects_nothing() {
    let s = suggest("mood:", &schema());
    assert!(s.is_empty());
    assert_eq!(s.selected_index(), -1);
    assert!(suggest("zzz", &schema()).is_empty());
}

#[test]
fn trailing_space_still_completes_the_last_token() {
    let s = suggest("gender:fe ", &schema());
    assert_eq!(s.candidates(), ["Female"]);
}

#[test]
fn selection_wraps_around() {
    let mut s = Suggestions::new(vec!["a".into(), "b".into(), "c".into()]);
    s.select_previous();
    assert_eq!(s.selected_candidate(), Some("c"));
    s.select_next();
    assert_eq!(s.selected_candidate(), Some("a"));
    s.select(1);
    assert_eq!(s.selected_index(), 1);

    let mut none = Suggestions::default();
    none.select_next();
    assert_eq!(none.selected(), None, "navigation without candidates is a no-op");
}

#[test]
fn accepting_a_key_starts_a_value() {
    let accepted = accept("silva gen", "gender", &schema());
    assert_eq!(accepted.input, "silva gender:");
    assert_eq!(accepted.suggestions.candidates(), ["Male", "Female", "Non-binary"]);
}

#[test]
fn accepting_a_value_completes_the_token() {
    let accepted = accept("silva JOBTITLE:he", "Head Chef", &schema());
    assert_eq!(accepted.input, "silva jobTitle:Head Chef ");
    assert!(accepted.suggestions.is_empty());
}

#[test]
fn accepted_multi_word_value_parses_back() {
    let city = common::city();
    let accepted = accept("jobTitle:hea", "Head Chef", city.schema());
    assert_eq!(common::ids(&city, &accepted.input), [1]);
}

#[test]
fn selection_is_sent_as_an_index() {
    let body = serde_json::to_value(suggest("mood:", &schema())).expect("serializable");
    assert_eq!(body, serde_json::json!({ "candidates": [], "selectedIndex": -1 }));
    let mut s = suggest("gender:", &schema());
    s.select_next();
    let body = serde_json::to_value(&s).expect("serializable");
    assert_eq!(body["selectedIndex"], 1);
    assert!(body.get("selected").is_none());
}
