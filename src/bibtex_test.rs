//! Tests for BibTeX parsing.

use super::*;

const TWO_ENTRIES: &str = r#"
@article{smith2020,
    title = {A Study of Things},
    author = {Smith, Jane and Doe, John},
    year = {2020},
    journal = {Journal of Things},
    doi = {10.1000/xyz123}
}

@inproceedings{jones2019,
    title = "Conference Findings",
    author = {Jones, Alex},
    year = 2019,
    booktitle = {Proceedings of Stuff}
}
"#;

// ============================================================================
// Entry Splitting Tests
// ============================================================================

#[test]
fn split_finds_every_entry() {
    let entries = split_bib_entries(TWO_ENTRIES);
    assert_eq!(entries.len(), 2);
    assert!(entries[0].starts_with("@article{smith2020"));
    assert!(entries[1].starts_with("@inproceedings{jones2019"));
}

#[test]
fn split_keeps_nested_braces_inside_one_entry() {
    let content = r"@article{a, title = {The {Big} Result}} @misc{b, note = {x}}";
    let entries = split_bib_entries(content);
    assert_eq!(entries.len(), 2, "nested braces must not end the entry early");
    assert!(entries[0].contains("{Big}"));
}

#[test]
fn split_skips_directives() {
    let content = r#"
@comment{this is not an entry}
@string{jot = "Journal of Things"}
@preamble{"\newcommand{\noop}[1]{}"}
@article{real2021, title = {Kept}}
"#;
    let entries = split_bib_entries(content);
    assert_eq!(entries.len(), 1, "directives must be dropped: {:?}", entries);
    assert!(entries[0].contains("real2021"));
}

#[test]
fn split_ignores_prose_between_entries() {
    let content = "Some preamble text.\n@misc{a, note = {x}}\ntrailing prose";
    let entries = split_bib_entries(content);
    assert_eq!(entries.len(), 1);
}

#[test]
fn split_empty_input_yields_nothing() {
    assert!(split_bib_entries("").is_empty());
    assert!(split_bib_entries("no entries at all").is_empty());
}

// ============================================================================
// Entry Parsing Tests
// ============================================================================

#[test]
fn parse_entry_extracts_key_and_type() {
    let (key, record) = parse_bib_entry("@ARTICLE{Smith2020, title = {T}}").unwrap();
    assert_eq!(key, "Smith2020");
    assert_eq!(record.entry_type, "article", "entry type is lowercased");
}

#[test]
fn parse_entry_brace_values_lose_grouping_braces() {
    let (_, record) =
        parse_bib_entry("@article{a, title = {The {Big} Result}}").unwrap();
    assert_eq!(record.field("title"), Some("The Big Result"));
}

#[test]
fn parse_entry_quoted_and_bare_values() {
    let (_, record) =
        parse_bib_entry("@article{a, title = \"Quoted Title\", year = 2019, pages = 12}").unwrap();
    assert_eq!(record.field("title"), Some("Quoted Title"));
    assert_eq!(record.field("year"), Some("2019"));
    assert_eq!(record.field("pages"), Some("12"));
}

#[test]
fn parse_entry_collapses_multiline_values() {
    let raw = "@article{a, author = {Smith,\n        Jane and\n        Doe, John}}";
    let (_, record) = parse_bib_entry(raw).unwrap();
    assert_eq!(record.field("author"), Some("Smith, Jane and Doe, John"));
}

#[test]
fn parse_entry_field_names_are_case_insensitive() {
    let (_, record) = parse_bib_entry("@article{a, TiTlE = {T}}").unwrap();
    assert_eq!(record.field("title"), Some("T"));
    assert_eq!(record.field("TITLE"), Some("T"));
}

#[test]
fn parse_entry_fieldless_without_trailing_comma() {
    let (key, record) = parse_bib_entry("@misc{lonely}").unwrap();
    assert_eq!(key, "lonely");
    assert!(record.fields.is_empty());
}

#[test]
fn parse_entry_without_header_is_none() {
    assert!(parse_bib_entry("@article{}").is_none());
    assert!(parse_bib_entry("not an entry").is_none());
    assert!(parse_bib_entry("@{nokey, title = {T}}").is_none());
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn load_file_indexes_entries_by_key() {
    let bib = parse_bib_file(TWO_ENTRIES).unwrap();
    assert_eq!(bib.len(), 2);

    let smith = bib.get("smith2020").expect("smith2020 present");
    assert_eq!(smith.field("doi"), Some("10.1000/xyz123"));
    assert_eq!(smith.field("journal"), Some("Journal of Things"));

    let jones = bib.get("jones2019").expect("jones2019 present");
    assert_eq!(jones.field("booktitle"), Some("Proceedings of Stuff"));
}

#[test]
fn load_file_keys_are_case_sensitive() {
    let content = "@misc{Key, note = {upper}}\n@misc{key, note = {lower}}";
    let bib = parse_bib_file(content).unwrap();
    assert_eq!(bib.len(), 2);
    assert_eq!(bib.get("Key").unwrap().field("note"), Some("upper"));
    assert_eq!(bib.get("key").unwrap().field("note"), Some("lower"));
    assert!(bib.get("KEY").is_none());
}

#[test]
fn load_empty_file_is_an_error() {
    assert_eq!(parse_bib_file(""), Err(BibError::Empty));
    assert_eq!(parse_bib_file("just prose"), Err(BibError::Empty));
}

#[test]
fn load_file_accepts_fieldless_entries() {
    let content = "@misc{lonely}\n@article{smith2020, title = {T}}";
    let bib = parse_bib_file(content).unwrap();
    assert_eq!(bib.len(), 2);
    assert!(bib.get("lonely").is_some());
}

#[test]
fn load_with_malformed_entry_fails_wholesale() {
    let content = "@article{good, title = {T}}\n@article{}";
    let err = parse_bib_file(content).unwrap_err();
    assert!(
        matches!(err, BibError::Malformed { index: 2, .. }),
        "got {:?}",
        err
    );
}
