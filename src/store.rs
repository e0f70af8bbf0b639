// used for persistence
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, named_params, params, params_from_iter};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::filter::CompiledFilter;
use crate::models::{JournalSummary, Publication};

/// Where the publication table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    InMemory,
    File(String),
}

impl PersistenceMode {
    /// `:memory:` selects an in-memory database, anything else is a file path.
    pub fn from_path(path: &str) -> Self {
        if path == ":memory:" {
            PersistenceMode::InMemory
        } else {
            PersistenceMode::File(path.to_string())
        }
    }
}

/// What happened to a record handed to [`PublicationStore::add_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertOutcome {
    /// A record with the same DOI (ignoring case) was already stored.
    pub duplicate: bool,
    /// The record is now stored, either fresh or replacing the duplicate.
    pub inserted: bool,
}

/// Executes compiled filters against a row store.
pub trait PublicationSource {
    /// Every stored publication matching `filter`, in DOI order.
    fn filtered(&self, filter: &CompiledFilter) -> Result<Vec<Publication>>;
}

const COLUMNS: &str = "
    doi,
    publisher,
    journal,
    title,
    publication_type,
    no_of_authors,
    affiliations,
    received,
    accepted,
    published,
    normalized_received,
    normalized_accepted,
    normalized_published,
    normalized_publisher,
    normalized_journal";

const VALUES: &str = "
    :doi,
    :publisher,
    :journal,
    :title,
    :publication_type,
    :no_of_authors,
    :affiliations,
    :received,
    :accepted,
    :published,
    :normalized_received,
    :normalized_accepted,
    :normalized_published,
    :normalized_publisher,
    :normalized_journal";

const AGGREGATES: &str = "
    count(*),
    min(normalized_received),
    max(normalized_received),
    min(normalized_accepted),
    max(normalized_accepted),
    min(normalized_published),
    max(normalized_published)";

// ------------- Persistence -------------
pub struct PublicationStore {
    connection: Connection,
}

impl PublicationStore {
    pub fn new(mode: PersistenceMode) -> Result<Self> {
        let connection = match &mode {
            PersistenceMode::InMemory => Connection::open_in_memory()?,
            PersistenceMode::File(path) => Connection::open(path)?,
        };
        debug!(?mode, "opened publication store");
        Self::from_connection(connection)
    }
    /// Takes ownership of an open connection and makes sure the table exists.
    pub fn from_connection(connection: Connection) -> Result<Self> {
        let store = Self { connection };
        store.initialize()?;
        Ok(store)
    }
    pub fn initialize(&self) -> Result<()> {
        // DOIs are compared without regard to case, also by the primary key
        self.connection.execute_batch(
            "
            create table if not exists pub (
                doi text not null collate nocase,
                publisher text null,
                journal text null,
                title text null,
                publication_type text null,
                no_of_authors integer null,
                affiliations text null,
                received text null,
                accepted text null,
                published text null,
                normalized_received text null,
                normalized_accepted text null,
                normalized_published text null,
                normalized_publisher text null,
                normalized_journal text null,
                constraint unique_and_referenceable_doi primary key (
                    doi
                )
            );
            create index if not exists pub_by_publisher_and_journal on pub (
                normalized_publisher,
                normalized_journal
            );
            ",
        )?;
        Ok(())
    }

    fn write(&self, verb: &str, publication: &Publication) -> rusqlite::Result<usize> {
        let mut statement = self
            .connection
            .prepare_cached(&format!("{} into pub ({}) values ({})", verb, COLUMNS, VALUES))?;
        statement.execute(named_params! {
            ":doi": publication.doi,
            ":publisher": publication.publisher,
            ":journal": publication.journal,
            ":title": publication.title,
            ":publication_type": publication.publication_type,
            ":no_of_authors": publication.no_of_authors,
            ":affiliations": publication.affiliations,
            ":received": publication.received,
            ":accepted": publication.accepted,
            ":published": publication.published,
            ":normalized_received": publication.normalized_received,
            ":normalized_accepted": publication.normalized_accepted,
            ":normalized_published": publication.normalized_published,
            ":normalized_publisher": publication.normalized_publisher,
            ":normalized_journal": publication.normalized_journal,
        })
    }

    /// Stores a whole record.
    ///
    /// When the DOI is already present the record is skipped, unless
    /// `overwrite` is set, in which case the stored row is replaced wholesale.
    /// Neither case is an error; the outcome says what happened.
    pub fn add_entry(&self, publication: &Publication, overwrite: bool) -> Result<InsertOutcome> {
        match self.write("insert", publication) {
            Ok(_) => {
                info!(doi = %publication.doi, "inserted publication");
                Ok(InsertOutcome { duplicate: false, inserted: true })
            }
            Err(rusqlite::Error::SqliteFailure(failure, _)) if failure.code == ErrorCode::ConstraintViolation => {
                if overwrite {
                    self.write("insert or replace", publication)?;
                    info!(doi = %publication.doi, "replaced publication");
                    Ok(InsertOutcome { duplicate: true, inserted: true })
                } else {
                    debug!(doi = %publication.doi, "skipped duplicate publication");
                    Ok(InsertOutcome { duplicate: true, inserted: false })
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Always refused: a stored record may only be replaced as a whole,
    /// through [`PublicationStore::add_entry`] with `overwrite` set.
    pub fn update_entry(&self, publication: &Publication) -> Result<()> {
        Err(CatalogError::DisallowedMutation(format!(
            "directly updating '{}' is not permitted; add it again with overwrite instead",
            publication.doi
        )))
    }

    /// Removes the record with the given DOI; `false` if there was none.
    pub fn delete_entry(&self, doi: &str) -> Result<bool> {
        let removed = self.connection.execute("delete from pub where doi = ?", params![doi])?;
        if removed > 0 {
            info!(%doi, "removed publication");
        } else {
            debug!(%doi, "nothing to remove");
        }
        Ok(removed > 0)
    }

    pub fn pub_exists(&self, doi: &str) -> Result<bool> {
        Ok(self.get_pub(doi)?.is_some())
    }

    pub fn get_pub(&self, doi: &str) -> Result<Option<Publication>> {
        let mut statement = self
            .connection
            .prepare_cached(&format!("select {} from pub where doi = ?", COLUMNS))?;
        Ok(statement.query_row(params![doi], publication_from_row).optional()?)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.connection.query_row("select count(*) from pub", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    /// Distinct normalized publishers, alphabetically.
    pub fn unique_publishers(&self) -> Result<Vec<String>> {
        let mut statement = self.connection.prepare_cached(
            "
            select distinct normalized_publisher
              from pub
             where normalized_publisher is not null
             order by normalized_publisher
            ",
        )?;
        let publishers = statement
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(publishers)
    }

    fn publisher_exists(&self, publisher: &str) -> Result<bool> {
        Ok(self.connection.query_row(
            "select exists (select 1 from pub where normalized_publisher = ?)",
            params![publisher],
            |row| row.get(0),
        )?)
    }

    /// Distinct normalized journals of `publisher`; `None` if the publisher is unknown.
    pub fn unique_journals(&self, publisher: &str) -> Result<Option<Vec<String>>> {
        if !self.publisher_exists(publisher)? {
            return Ok(None);
        }
        let mut statement = self.connection.prepare_cached(
            "
            select distinct normalized_journal
              from pub
             where normalized_publisher = ?
               and normalized_journal is not null
             order by normalized_journal
            ",
        )?;
        let journals = statement
            .query_map(params![publisher], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(Some(journals))
    }

    // distinct publication types per journal of a publisher, joined by '|'
    fn publication_types(&self, publisher: &str) -> Result<BTreeMap<String, String>> {
        let mut statement = self.connection.prepare_cached(
            "
            select distinct normalized_journal, publication_type
              from pub
             where normalized_publisher = ?
               and normalized_journal is not null
               and publication_type is not null
             order by normalized_journal, publication_type
            ",
        )?;
        let mut types: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let pairs = statement.query_map(params![publisher], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for pair in pairs {
            let (journal, publication_type) = pair?;
            types.entry(journal).or_default().push(publication_type);
        }
        Ok(types.into_iter().map(|(journal, types)| (journal, types.join("|"))).collect())
    }

    /// One summary per journal of `publisher`, ordered by journal.
    ///
    /// Rows without a journal are left out, so the summaries cover exactly
    /// the journals listed by [`PublicationStore::unique_journals`]. `None`
    /// means the publisher has no rows at all.
    pub fn publisher_summary(&self, publisher: &str) -> Result<Option<Vec<JournalSummary>>> {
        if !self.publisher_exists(publisher)? {
            return Ok(None);
        }
        let types = self.publication_types(publisher)?;
        let mut statement = self.connection.prepare_cached(&format!(
            "
            select normalized_journal, {}
              from pub
             where normalized_publisher = ?
               and normalized_journal is not null
             group by normalized_journal
             order by normalized_journal
            ",
            AGGREGATES
        ))?;
        let rows = statement.query_map(params![publisher], |row| {
            let journal: String = row.get(0)?;
            let journal_types = types.get(&journal);
            summary_from_row(row, journal, journal_types)
        })?;
        let summaries = rows.collect::<rusqlite::Result<Vec<JournalSummary>>>()?;
        Ok(Some(summaries))
    }

    /// The summary of one journal of one publisher; `None` if either is unknown.
    pub fn journal_summary(&self, publisher: &str, journal: &str) -> Result<Option<JournalSummary>> {
        match self.unique_journals(publisher)? {
            Some(journals) if journals.iter().any(|j| j == journal) => {}
            _ => return Ok(None),
        }
        let types = self.publication_types(publisher)?;
        let mut statement = self.connection.prepare_cached(&format!(
            "
            select normalized_journal, {}
              from pub
             where normalized_publisher = ?1
               and normalized_journal = ?2
            ",
            AGGREGATES
        ))?;
        let summary = statement.query_row(params![publisher, journal], |row| {
            summary_from_row(row, journal.to_string(), types.get(journal))
        })?;
        Ok(Some(summary))
    }
}

impl PublicationSource for PublicationStore {
    fn filtered(&self, filter: &CompiledFilter) -> Result<Vec<Publication>> {
        let mut statement = self
            .connection
            .prepare(&format!("select {} from pub{} order by doi", COLUMNS, filter.clause()))?;
        let publications = statement
            .query_map(params_from_iter(filter.args()), publication_from_row)?
            .collect::<rusqlite::Result<Vec<Publication>>>()?;
        debug!(rows = publications.len(), "filtered publications");
        Ok(publications)
    }
}

fn publication_from_row(row: &Row) -> rusqlite::Result<Publication> {
    Ok(Publication {
        doi: row.get("doi")?,
        publisher: row.get("publisher")?,
        journal: row.get("journal")?,
        title: row.get("title")?,
        publication_type: row.get("publication_type")?,
        no_of_authors: row.get("no_of_authors")?,
        affiliations: row.get("affiliations")?,
        received: row.get("received")?,
        accepted: row.get("accepted")?,
        published: row.get("published")?,
        normalized_received: row.get("normalized_received")?,
        normalized_accepted: row.get("normalized_accepted")?,
        normalized_published: row.get("normalized_published")?,
        normalized_publisher: row.get("normalized_publisher")?,
        normalized_journal: row.get("normalized_journal")?,
    })
}

// expects the journal in column 0 followed by AGGREGATES
fn summary_from_row(row: &Row, name: String, types: Option<&String>) -> rusqlite::Result<JournalSummary> {
    let count: i64 = row.get(1)?;
    Ok(JournalSummary {
        name,
        count: count as usize,
        publication_types: types.cloned().unwrap_or_default(),
        min_received: row.get(2)?,
        max_received: row.get(3)?,
        min_accepted: row.get(4)?,
        max_accepted: row.get(5)?,
        min_published: row.get(6)?,
        max_published: row.get(7)?,
    })
}
