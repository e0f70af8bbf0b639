//! Records exchanged with the store and handed back to callers.
//!
//! A [`Publication`] is what gets persisted, one row per DOI. [`FilteredPub`]
//! and [`JournalSummary`] are derived per request and never written back.

use serde::{Deserialize, Serialize};

use crate::datetext::canonical_date;

/// One persisted publication, keyed by its (case-insensitive) DOI.
///
/// Rows are always written whole; see [`crate::store::PublicationStore::add_entry`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Publication {
    pub doi: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Free text as found in the source document; not normalized.
    #[serde(default)]
    pub publication_type: Option<String>,
    #[serde(default)]
    pub no_of_authors: Option<u32>,
    #[serde(default)]
    pub affiliations: Option<String>,
    #[serde(default)]
    pub received: Option<String>,
    #[serde(default)]
    pub accepted: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub normalized_received: Option<String>,
    #[serde(default)]
    pub normalized_accepted: Option<String>,
    #[serde(default)]
    pub normalized_published: Option<String>,
    #[serde(default)]
    pub normalized_publisher: Option<String>,
    #[serde(default)]
    pub normalized_journal: Option<String>,
}

impl Publication {
    pub fn new(doi: impl Into<String>) -> Self {
        Self { doi: doi.into(), ..Default::default() }
    }
    /// Derives any missing `normalized_*` date from its raw counterpart.
    ///
    /// Dates already normalized are left untouched.
    pub fn fill_normalized_dates(&mut self) {
        fn fill(raw: &Option<String>, normalized: &mut Option<String>) {
            if normalized.is_none() {
                *normalized = raw.as_deref().and_then(canonical_date);
            }
        }
        fill(&self.received, &mut self.normalized_received);
        fill(&self.accepted, &mut self.normalized_accepted);
        fill(&self.published, &mut self.normalized_published);
    }
}

/// One row of a search result.
///
/// The four trailing fields are only filled in when the search asked for them;
/// otherwise they stay `None` and are left out of the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredPub {
    pub doi: String,
    pub publisher: Option<String>,
    pub journal: Option<String>,
    pub normalized_received: Option<String>,
    pub normalized_accepted: Option<String>,
    pub normalized_published: Option<String>,
    pub received_2_accepted: Option<i64>,
    pub received_2_published: Option<i64>,
    pub accepted_2_published: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_of_authors: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliations: Option<String>,
}

/// Aggregates over all rows of one journal of one publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSummary {
    pub name: String,
    pub count: usize,
    /// Distinct publication types joined with `|`, in alphabetical order.
    pub publication_types: String,
    pub min_received: Option<String>,
    pub max_received: Option<String>,
    pub min_accepted: Option<String>,
    pub max_accepted: Option<String>,
    pub min_published: Option<String>,
    pub max_published: Option<String>,
}
