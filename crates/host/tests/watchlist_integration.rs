mod common;

use common::TestHarness;
use sensus_web_host::store;
use sensus_web_watchlist::render::{ERROR_HTML, NO_DATA_HTML};
use sensus_web_watchlist::{render_outcome, Outcome};

const SAMPLE_TEXT: &str = "Alpha one. Beta two! Gamma three? Delta four.";
const SAMPLE_URLS: &str = "https://a.example, https://b.example";

/// Newest NATO row wins; rows for other countries are ignored
#[test]
fn latest_nato_row_is_selected() {
    let harness = TestHarness::new().unwrap();
    harness.insert("NATO", "2024-01-10", "Old entry.", "https://old.example");
    harness.insert("NATO", "2024-01-15", SAMPLE_TEXT, SAMPLE_URLS);
    harness.insert("UK", "2024-03-01", "Not this one.", "https://uk.example");

    let outcome = store::latest_outcome(&harness.db_path, "NATO");
    let Outcome::Success(record) = &outcome else {
        panic!("expected a record, got {outcome:?}");
    };
    assert_eq!(record.date_added, "2024-01-15");
    assert_eq!(record.country, "NATO");

    let html = render_outcome(&outcome);
    assert!(html.starts_with("<h2>NATO Watchlist for Monday 15 January 2024</h2>"));
    assert!(html.contains(
        "<p>Alpha one. Beta two! Gamma three?</p><p>Delta four.</p>"
    ));
    assert!(html.contains(
        r#"<li><a href="https://a.example" target="_blank">https://a.example</a></li>"#
    ));
    assert!(html.contains(
        r#"<li><a href="https://b.example" target="_blank">https://b.example</a></li>"#
    ));
    assert!(!html.contains("Old entry"));
    assert!(!html.contains("uk.example"));
}

#[test]
fn other_countries_only_yields_no_data() {
    let harness = TestHarness::new().unwrap();
    harness.insert("UK", "2024-03-01", "Not this one.", "https://uk.example");

    let outcome = store::latest_outcome(&harness.db_path, "NATO");
    assert_eq!(outcome, Outcome::Empty);
    assert_eq!(render_outcome(&outcome), NO_DATA_HTML);
}

#[test]
fn configured_country_is_used() {
    let harness = TestHarness::new().unwrap();
    harness.insert("NATO", "2024-01-15", SAMPLE_TEXT, SAMPLE_URLS);
    harness.insert("UK", "2024-03-01", "Kingdom entry.", "https://uk.example");

    let html = render_outcome(&store::latest_outcome(&harness.db_path, "UK"));
    assert!(html.starts_with("<h2>UK Watchlist for Friday 1 March 2024</h2>"));
    assert!(html.contains("<p>Kingdom entry.</p>"));
}

#[test]
fn corrupt_database_yields_error_message() {
    let harness = TestHarness::new().unwrap();
    harness.corrupt(b"this is not an SQLite database image at all");

    let outcome = store::latest_outcome(&harness.db_path, "NATO");
    assert_eq!(outcome, Outcome::Failure);
    assert_eq!(render_outcome(&outcome), ERROR_HTML);
}

#[test]
fn missing_table_yields_error_message() {
    let harness = TestHarness::new().unwrap();
    let conn = rusqlite::Connection::open(&harness.db_path).unwrap();
    conn.execute_batch("DROP TABLE watchlist; CREATE TABLE other (x);")
        .unwrap();
    drop(conn);

    assert_eq!(
        render_outcome(&store::latest_outcome(&harness.db_path, "NATO")),
        ERROR_HTML
    );
}

#[test]
fn missing_file_yields_error_message() {
    let harness = TestHarness::without_database().unwrap();
    assert_eq!(
        render_outcome(&store::latest_outcome(&harness.db_path, "NATO")),
        ERROR_HTML
    );
}

#[test]
fn unparseable_date_still_renders() {
    let harness = TestHarness::new().unwrap();
    harness.insert("NATO", "someday", "Only sentence.", "");

    let html = render_outcome(&store::latest_outcome(&harness.db_path, "NATO"));
    assert!(html.starts_with("<h2>NATO Watchlist for Invalid Date</h2>"));
    assert!(html.contains(r#"<ul class="sources-list"></ul>"#));
}
