//! Pubcatalog – search, filter and summarize a store of scholarly publication metadata.
//!
//! Each stored publication is keyed by its DOI and carries publisher, journal,
//! title and the received / accepted / published dates of its lifecycle, both
//! as extracted and in canonical `YYYY-MM-DD` form.
//!
//! ## Modules
//! * [`datetext`] – Recognition of `<day> <month name> <year>` fragments and
//!   normalization of free-text and partial (`YYYY`, `YYYY-MM`) dates.
//! * [`filter`] – Compiles any combination of publisher, journal, type and
//!   date-bound criteria into one parameterized `where` clause.
//! * [`store`] – SQLite persistence of publications, distinct-value queries and
//!   per-journal aggregate summaries.
//! * [`search`] – Runs a filter against the store and shapes the rows into
//!   [`models::FilteredPub`] records with day-count intervals.
//! * [`report`] – Counts, date extrema and interval averages over a result,
//!   plus the plain-text reports.
//! * [`export`] – JSON export of results and import of records.
//! * [`settings`] – Settings file and environment handling.
//!
//! ## Canonical dates
//! Dates are stored and compared as `YYYY-MM-DD` strings. Since that form is
//! zero padded and big-endian, string order is chronological order, which lets
//! SQL `min`/`max` and range predicates work on plain text columns.
//!
//! ## Quick Start
//! ```
//! use pubcatalog::{filter::PubFilter, models::Publication, report,
//!     search::{SearchEngine, SearchOptions}, store::{PersistenceMode, PublicationStore}};
//! let store = PublicationStore::new(PersistenceMode::InMemory).unwrap();
//! let mut publication = Publication::new("10.1000/xyz123");
//! publication.normalized_publisher = Some("Nature Portfolio".into());
//! publication.normalized_journal = Some("Nature".into());
//! publication.received = Some("1st Feb 1993".into());
//! publication.published = Some("1993-05".into());
//! publication.fill_normalized_dates();
//! store.add_entry(&publication, false).unwrap();
//!
//! let engine = SearchEngine::new(&store);
//! let filter = PubFilter::new().publishers(["Nature Portfolio"]).min_received("1993");
//! let results = engine.search(&filter, SearchOptions::default()).unwrap();
//! assert_eq!(results[0].received_2_published, Some(89));
//! let summary = report::analyze(&results).unwrap();
//! assert_eq!(summary.no_of_pubs, 1);
//! ```

pub mod datetext;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod report;
pub mod search;
pub mod settings;
pub mod store;

pub use error::{CatalogError, Result};
