use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use dict_cli::history::{HistoryItem, SearchHistory};

fn store(dir: &TempDir) -> (SearchHistory, PathBuf) {
    let path = dir.path().join("history.json");
    (SearchHistory::with_file(path.clone(), 20), path)
}

#[test]
fn test_missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);

    assert!(history.get_history().is_empty());
}

#[test]
fn test_corrupt_file_reads_as_empty_and_stays_usable() {
    let dir = TempDir::new().unwrap();
    let (history, path) = store(&dir);
    fs::write(&path, "not json at all {{{").unwrap();

    assert!(history.get_history().is_empty());

    // A later write recovers the store.
    history.add_search("curious");
    assert_eq!(history.get_history().len(), 1);
}

#[test]
fn test_add_search_prepends_new_terms() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);

    history.add_search("cat");
    history.add_search("dog");

    let items = history.get_history();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].term, "dog");
    assert_eq!(items[0].count, 1);
    assert_eq!(items[1].term, "cat");
}

#[test]
fn test_repeat_search_increments_count_and_moves_to_front() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);

    history.add_search("cat");
    history.add_search("dog");
    history.add_search("cat");

    let items = history.get_history();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].term, "cat");
    assert_eq!(items[0].count, 2);
    assert_eq!(items[1].term, "dog");
    assert_eq!(items[1].count, 1);
}

#[test]
fn test_history_is_bounded() {
    let dir = TempDir::new().unwrap();
    let history = SearchHistory::with_file(dir.path().join("history.json"), 5);

    for i in 0..8 {
        history.add_search(&format!("word{}", i));
    }

    let items = history.get_history();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].term, "word7");
    assert_eq!(items[4].term, "word3");
}

#[test]
fn test_remove_search_filters_matching_term() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    history.add_search("cat");
    history.add_search("dog");

    history.remove_search("cat");

    let items = history.get_history();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].term, "dog");
}

#[test]
fn test_clear_history_deletes_the_store() {
    let dir = TempDir::new().unwrap();
    let (history, path) = store(&dir);
    history.add_search("cat");

    history.clear_history();

    assert!(!path.exists());
    assert!(history.get_history().is_empty());
}

#[test]
fn test_suggestions_rank_by_count_with_substring_match() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    for _ in 0..5 {
        history.add_search("cat");
    }
    for _ in 0..2 {
        history.add_search("car");
    }
    for _ in 0..9 {
        history.add_search("dog");
    }

    assert_eq!(history.get_suggestions("ca"), vec!["cat", "car"]);
}

#[test]
fn test_suggestions_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    history.add_search("Catalog");

    assert_eq!(history.get_suggestions("cAt"), vec!["Catalog"]);
}

#[test]
fn test_blank_query_yields_no_suggestions() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    history.add_search("cat");

    assert!(history.get_suggestions("").is_empty());
    assert!(history.get_suggestions("   ").is_empty());
}

#[test]
fn test_suggestions_are_capped_at_five() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    for i in 0..7 {
        history.add_search(&format!("cater{}", i));
    }

    assert_eq!(history.get_suggestions("cater").len(), 5);
}

#[test]
fn test_export_import_round_trip_is_identity() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    history.add_search("cat");
    history.add_search("dog");
    history.add_search("cat");
    let before = history.get_history();

    let payload = history.export_history();
    history.import_history(&payload);

    assert_eq!(history.get_history(), before);
}

#[test]
fn test_import_replaces_rather_than_merges() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    history.add_search("old");

    history.import_history(r#"[{"term":"new","timestamp":1700000000000,"count":3}]"#);

    let items = history.get_history();
    assert_eq!(
        items,
        vec![HistoryItem {
            term: "new".to_string(),
            timestamp: 1_700_000_000_000,
            count: 3,
        }]
    );
}

#[test]
fn test_import_rejects_values_the_reader_cannot_parse_back() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    history.add_search("cat");
    let before = history.get_history();

    // A fractional count is a JSON number, but the stored format cannot
    // represent it. Accepting it would overwrite the file with a payload
    // that reads back empty, losing everything.
    history.import_history(r#"[{"term":"new","timestamp":1700000000000,"count":2.5}]"#);
    assert_eq!(history.get_history(), before);

    history.import_history(r#"[{"term":"new","timestamp":1700000000000,"count":-3}]"#);
    assert_eq!(history.get_history(), before);
}

#[test]
fn test_malformed_import_leaves_history_unchanged() {
    let dir = TempDir::new().unwrap();
    let (history, _) = store(&dir);
    history.add_search("cat");
    let before = history.get_history();

    // Not JSON at all.
    history.import_history("{{{");
    assert_eq!(history.get_history(), before);

    // Not an array.
    history.import_history(r#"{"term":"x","timestamp":1,"count":1}"#);
    assert_eq!(history.get_history(), before);

    // Array with a wrongly-typed element.
    history.import_history(r#"[{"term":1,"timestamp":"no","count":1}]"#);
    assert_eq!(history.get_history(), before);

    // Array with a missing field.
    history.import_history(r#"[{"term":"x","count":1}]"#);
    assert_eq!(history.get_history(), before);
}
