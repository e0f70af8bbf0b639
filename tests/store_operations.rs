use pubcatalog::CatalogError;
use pubcatalog::models::Publication;
use pubcatalog::store::{InsertOutcome, PersistenceMode, PublicationStore};

fn article(doi: &str, journal: &str, publication_type: Option<&str>, received: Option<&str>, published: Option<&str>) -> Publication {
    let mut publication = Publication::new(doi);
    publication.normalized_publisher = Some("Nature Portfolio".into());
    publication.normalized_journal = Some(journal.into());
    publication.publication_type = publication_type.map(str::to_string);
    publication.received = received.map(str::to_string);
    publication.published = published.map(str::to_string);
    publication.fill_normalized_dates();
    publication
}

fn setup() -> PublicationStore {
    let store = PublicationStore::new(PersistenceMode::InMemory).unwrap();
    for publication in [
        article("10.1038/n1", "Nature", Some("Letter"), Some("3 March 1999"), Some("1999-09")),
        article("10.1038/n2", "Nature", Some("Article"), Some("1998"), Some("2001-02-03")),
        article("10.1038/n3", "Nature", Some("Article"), None, Some("2000")),
        article("10.1038/p1", "Nature Physics", None, Some("12th May 2010"), None),
    ] {
        store.add_entry(&publication, false).unwrap();
    }
    let mut other = Publication::new("10.1016/c1");
    other.normalized_publisher = Some("Elsevier".into());
    other.normalized_journal = Some("Cell".into());
    store.add_entry(&other, false).unwrap();
    store
}

#[test]
fn duplicate_doi_is_skipped_unless_overwriting() {
    let store = setup();
    let mut again = article("10.1038/N1", "Nature", Some("Review"), None, None);
    again.title = Some("Replacement".into());

    let outcome = store.add_entry(&again, false).unwrap();
    assert_eq!(outcome, InsertOutcome { duplicate: true, inserted: false });
    let stored = store.get_pub("10.1038/n1").unwrap().expect("still stored");
    assert_eq!(stored.title, None, "skipped duplicate leaves the row untouched");

    let outcome = store.add_entry(&again, true).unwrap();
    assert_eq!(outcome, InsertOutcome { duplicate: true, inserted: true });
    let stored = store.get_pub("10.1038/n1").unwrap().expect("replaced");
    assert_eq!(stored.title.as_deref(), Some("Replacement"));
    assert_eq!(stored.normalized_received, None, "rows are replaced wholesale");
    assert_eq!(store.count().unwrap(), 5);
}

#[test]
fn doi_lookup_ignores_case() {
    let store = setup();
    assert!(store.pub_exists("10.1038/N2").unwrap());
    assert!(store.pub_exists("10.1016/C1").unwrap());
    assert!(!store.pub_exists("10.1038/n9").unwrap());
    assert_eq!(store.get_pub("10.1038/n9").unwrap(), None);
}

#[test]
fn updates_are_refused() {
    let store = setup();
    let mut changed = store.get_pub("10.1038/n2").unwrap().unwrap();
    changed.title = Some("Edited".into());
    let err = store.update_entry(&changed).unwrap_err();
    assert!(matches!(err, CatalogError::DisallowedMutation(_)));
    assert_eq!(store.get_pub("10.1038/n2").unwrap().unwrap().title, None);
}

#[test]
fn delete_removes_only_existing_rows() {
    let store = setup();
    assert!(store.delete_entry("10.1038/P1").unwrap());
    assert!(!store.pub_exists("10.1038/p1").unwrap());
    assert!(!store.delete_entry("10.1038/p1").unwrap());
    assert_eq!(store.count().unwrap(), 4);
}

#[test]
fn normalized_dates_are_derived_on_import() {
    let store = setup();
    let n1 = store.get_pub("10.1038/n1").unwrap().unwrap();
    assert_eq!(n1.normalized_received.as_deref(), Some("1999-03-03"));
    assert_eq!(n1.normalized_published.as_deref(), Some("1999-09-01"));
    assert_eq!(n1.received.as_deref(), Some("3 March 1999"), "raw text is kept as extracted");
}

#[test]
fn distinct_publishers_and_journals_are_sorted() {
    let store = setup();
    assert_eq!(store.unique_publishers().unwrap(), ["Elsevier", "Nature Portfolio"]);
    assert_eq!(
        store.unique_journals("Nature Portfolio").unwrap(),
        Some(vec!["Nature".to_string(), "Nature Physics".to_string()])
    );
    assert_eq!(store.unique_journals("Springer").unwrap(), None);
}

#[test]
fn publisher_summary_aggregates_per_journal() {
    let store = setup();
    let summaries = store.publisher_summary("Nature Portfolio").unwrap().expect("known publisher");
    assert_eq!(summaries.len(), 2);

    let nature = &summaries[0];
    assert_eq!(nature.name, "Nature");
    assert_eq!(nature.count, 3);
    assert_eq!(nature.publication_types, "Article|Letter");
    assert_eq!(nature.min_received.as_deref(), Some("1998-01-01"));
    assert_eq!(nature.max_received.as_deref(), Some("1999-03-03"));
    assert_eq!(nature.min_published.as_deref(), Some("1999-09-01"));
    assert_eq!(nature.max_published.as_deref(), Some("2001-02-03"));
    assert_eq!(nature.min_accepted, None);

    let physics = &summaries[1];
    assert_eq!(physics.name, "Nature Physics");
    assert_eq!(physics.count, 1);
    assert_eq!(physics.publication_types, "");
    assert_eq!(physics.min_received, physics.max_received);
}

#[test]
fn journal_summary_matches_publisher_summary_row() {
    let store = setup();
    let summaries = store.publisher_summary("Nature Portfolio").unwrap().unwrap();
    let nature = store.journal_summary("Nature Portfolio", "Nature").unwrap();
    assert_eq!(nature.as_ref(), summaries.first());
}

#[test]
fn unknown_names_have_no_summary() {
    let store = setup();
    assert_eq!(store.publisher_summary("Springer").unwrap(), None);
    assert_eq!(store.journal_summary("Springer", "Nature").unwrap(), None);
    assert_eq!(store.journal_summary("Nature Portfolio", "Cell").unwrap(), None);
    assert!(store.journal_summary("Elsevier", "Cell").unwrap().is_some());
}

#[test]
fn rows_without_journal_stay_out_of_journal_views() {
    let store = setup();
    let mut loose = Publication::new("10.1016/loose");
    loose.normalized_publisher = Some("Elsevier".into());
    loose.publication_type = Some("Editorial".into());
    store.add_entry(&loose, false).unwrap();

    let journals = store.unique_journals("Elsevier").unwrap().expect("known publisher");
    let summaries = store.publisher_summary("Elsevier").unwrap().expect("known publisher");
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, journals, "summaries cover exactly the listed journals");
    assert_eq!(names, ["Cell"]);
    assert_eq!(summaries[0].count, 1, "the journal-less row is not counted under Cell");
    assert_eq!(summaries[0].publication_types, "");
    assert_eq!(store.journal_summary("Elsevier", "").unwrap(), None);

    // a publisher whose rows all lack a journal still exists, with no journals
    let mut orphan = Publication::new("10.9999/orphan");
    orphan.normalized_publisher = Some("Springer".into());
    store.add_entry(&orphan, false).unwrap();
    assert_eq!(store.unique_journals("Springer").unwrap(), Some(vec![]));
    assert_eq!(store.publisher_summary("Springer").unwrap(), Some(vec![]));
}
