use pubcatalog::export::{read_publications, write_json};
use pubcatalog::filter::PubFilter;
use pubcatalog::models::Publication;
use pubcatalog::search::{SearchEngine, SearchOptions};
use pubcatalog::settings::Settings;
use pubcatalog::store::{PersistenceMode, PublicationStore};

#[test]
fn in_memory_mode_allows_basic_operations() {
    let store = PublicationStore::new(PersistenceMode::InMemory).expect("store");
    assert_eq!(store.count().unwrap(), 0);
    store.add_entry(&Publication::new("10.5555/mem"), false).unwrap();
    assert!(store.pub_exists("10.5555/mem").unwrap());
    // a second in-memory store shares nothing with the first
    let other = PublicationStore::new(PersistenceMode::InMemory).expect("store");
    assert_eq!(other.count().unwrap(), 0);
}

#[test]
fn file_mode_survives_reopening() {
    let path = "test_pubcatalog_temp.db".to_string();
    // Ensure clean start
    let _ = std::fs::remove_file(&path);
    {
        let store = PublicationStore::new(PersistenceMode::File(path.clone())).expect("store");
        let mut publication = Publication::new("10.5555/file");
        publication.published = Some("7 July 2007".into());
        publication.fill_normalized_dates();
        store.add_entry(&publication, false).unwrap();
    }
    let store = PublicationStore::new(PersistenceMode::File(path.clone())).expect("reopened store");
    let stored = store.get_pub("10.5555/FILE").unwrap().expect("row persisted to file");
    assert_eq!(stored.normalized_published.as_deref(), Some("2007-07-07"));
    drop(store);
    // Clean up
    let _ = std::fs::remove_file(&path);
}

#[test]
fn memory_path_selects_in_memory_mode() {
    assert_eq!(PersistenceMode::from_path(":memory:"), PersistenceMode::InMemory);
    assert_eq!(PersistenceMode::from_path("pubs.db"), PersistenceMode::File("pubs.db".to_string()));
}

#[test]
fn settings_fall_back_to_defaults() {
    let settings = Settings::load("test_pubcatalog_absent_settings").expect("missing file is fine");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.persistence_mode(), PersistenceMode::File("pubcatalog.db".to_string()));
    assert_eq!(settings.log_level, "warn");
}

#[test]
fn settings_file_overrides_defaults() {
    let path = "test_pubcatalog_settings.json";
    std::fs::write(path, r#"{"database_file_and_path": ":memory:", "log_level": "debug"}"#).unwrap();
    let settings = Settings::load(path).expect("settings");
    let _ = std::fs::remove_file(path);
    assert_eq!(settings.persistence_mode(), PersistenceMode::InMemory);
    assert_eq!(settings.log_level, "debug");
}

#[test]
fn exported_results_read_back_as_json() {
    let store = PublicationStore::new(PersistenceMode::InMemory).unwrap();
    let source = "test_pubcatalog_import.json";
    std::fs::write(
        source,
        r#"[
            {"doi": "10.5555/one", "normalized_publisher": "Elsevier", "received": "2001-02", "title": "One"},
            {"doi": "10.5555/two", "normalized_publisher": "Elsevier", "received": "3rd March 2001"}
        ]"#,
    )
    .unwrap();
    let publications = read_publications(source).expect("valid import file");
    let _ = std::fs::remove_file(source);
    for mut publication in publications {
        publication.fill_normalized_dates();
        store.add_entry(&publication, false).unwrap();
    }

    let results = SearchEngine::new(&store)
        .search(&PubFilter::new().max_received("2001-02-28"), SearchOptions::default())
        .unwrap();
    assert_eq!(results.len(), 1);

    let target = "test_pubcatalog_export.json";
    write_json(target, &results).expect("export");
    let text = std::fs::read_to_string(target).unwrap();
    let _ = std::fs::remove_file(target);
    let exported: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(exported[0]["doi"], "10.5555/one");
    assert_eq!(exported[0]["normalized_received"], "2001-02-01");
    assert!(exported[0].get("title").is_none());
}
