//! Tests for the duplicate table-id save gate

use std::time::Instant;

use table_progress_tracking::{
    ProcessingError, check_page_save, find_duplicate_table_ids, has_duplicate_tables,
};

#[test]
fn test_realistic_page_with_duplicates() {
    let page = r#"
== Weapons ==
<table-progress-tracking table-id="weapons" unique-column-index="1">
{| class="wikitable"
! Name !! Location
|-
| Sword || Cave
|}
</table-progress-tracking>

== Armour ==
<table-progress-tracking header-label="Owned" table-id='armour'>
{| class="wikitable"
|}
</table-progress-tracking>

== Weapons (DLC) ==
<table-progress-tracking unique-column-index="1" table-id="weapons">
{| |}
</table-progress-tracking>
"#;
    assert!(has_duplicate_tables(page));
    assert_eq!(find_duplicate_table_ids(page), vec!["weapons".to_string()]);
    assert_eq!(
        check_page_save(page),
        Err(ProcessingError::DuplicateTableIds(vec!["weapons".into()]))
    );
}

#[test]
fn test_other_tags_are_ignored() {
    let page = r#"<div table-id="a"></div><div table-id="a"></div>
<table-progress-tracking table-id="a"></table-progress-tracking>"#;
    assert!(!has_duplicate_tables(page));
}

#[test]
fn test_several_duplicates_are_sorted() {
    let page = "<table-progress-tracking table-id=\"b\">\
                <table-progress-tracking table-id=\"a\">\
                <table-progress-tracking table-id=\"b\">\
                <table-progress-tracking table-id=\"a\">\
                <table-progress-tracking table-id=\"c\">";
    assert_eq!(find_duplicate_table_ids(page), vec!["a".to_string(), "b".to_string()]);
}

/// The `regex` crate cannot backtrack catastrophically, but adversarial page
/// text should still be scanned quickly
#[test]
fn test_redos_resistance_unterminated_tag() {
    let adversarial = "<table-progress-tracking ".to_string() + &"table-id=".repeat(10_000);
    let start = Instant::now();
    let _ = has_duplicate_tables(&adversarial);
    let elapsed = start.elapsed();

    println!("Unterminated tag test: {elapsed:?}");
    assert!(
        elapsed.as_millis() < 500,
        "ReDoS vulnerability detected: took {elapsed:?}"
    );
}

#[test]
fn test_redos_resistance_many_tags() {
    let adversarial = "<table-progress-tracking table-id=\"x\" ".repeat(5_000);
    let start = Instant::now();
    let _ = find_duplicate_table_ids(&adversarial);
    let elapsed = start.elapsed();

    println!("Many tags test: {elapsed:?}");
    assert!(
        elapsed.as_millis() < 500,
        "ReDoS vulnerability detected: took {elapsed:?}"
    );
}
