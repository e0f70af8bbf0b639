//! Filtered searches over the publication store.
//!
//! A search compiles its [`PubFilter`], runs it against a [`PublicationSource`]
//! and shapes every matching row into a [`FilteredPub`]. Results are ordered by
//! publisher, journal, received date and accepted date, with absent values
//! last, so rows of one publisher and journal are always contiguous.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::{debug, warn};

use crate::datetext::days_between;
use crate::error::{CatalogError, FilterFault, Result};
use crate::filter::{Criterion, PubFilter};
use crate::models::{FilteredPub, Publication};
use crate::store::PublicationSource;

/// Which optional fields to carry into each [`FilteredPub`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub get_title: bool,
    pub get_publication_type: bool,
    pub get_no_of_authors: bool,
    pub get_affiliations: bool,
}

/// Criteria and inclusion flags of one search, as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub filter: PubFilter,
    pub options: SearchOptions,
}

impl SearchRequest {
    /// Reads a request from one flat mapping holding both the filter keys and
    /// the `get_*` flags, e.g. `{"min_published": "2000", "get_title": true}`.
    pub fn from_json(value: &Value) -> Result<SearchRequest> {
        let Value::Object(map) = value else {
            return Err(CatalogError::invalid_filter("filters", FilterFault::NotAMapping));
        };
        let mut request = SearchRequest::default();
        for (key, value) in map {
            let flag = match key.as_str() {
                "get_title" => &mut request.options.get_title,
                "get_publication_type" => &mut request.options.get_publication_type,
                "get_no_of_authors" => &mut request.options.get_no_of_authors,
                "get_affiliations" => &mut request.options.get_affiliations,
                _ => {
                    let criterion = Criterion::from_key(key)
                        .ok_or_else(|| CatalogError::invalid_filter(key.as_str(), FilterFault::Unknown))?;
                    request.filter.set_json(criterion, value)?;
                    continue;
                }
            };
            *flag = match value {
                Value::Bool(b) => *b,
                Value::Null => false,
                _ => return Err(CatalogError::invalid_filter(key.as_str(), FilterFault::NotBoolean)),
            };
        }
        Ok(request)
    }
}

pub struct SearchEngine<'s, S: PublicationSource> {
    source: &'s S,
}

impl<'s, S: PublicationSource> SearchEngine<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self { source }
    }

    pub fn run(&self, request: &SearchRequest) -> Result<Vec<FilteredPub>> {
        self.search(&request.filter, request.options)
    }

    /// Runs one search. An invalid criterion fails the whole search before
    /// anything is read from the store.
    pub fn search(&self, filter: &PubFilter, options: SearchOptions) -> Result<Vec<FilteredPub>> {
        let compiled = filter.compile()?;
        let publications = self.source.filtered(&compiled)?;
        let mut results: Vec<FilteredPub> = publications
            .into_iter()
            .map(|publication| shape(publication, options))
            .collect();
        results.sort_by(|a, b| {
            absent_last(&a.publisher, &b.publisher)
                .then_with(|| absent_last(&a.journal, &b.journal))
                .then_with(|| absent_last(&a.normalized_received, &b.normalized_received))
                .then_with(|| absent_last(&a.normalized_accepted, &b.normalized_accepted))
        });
        debug!(results = results.len(), "search complete");
        Ok(results)
    }
}

fn absent_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn interval(doi: &str, start: &Option<String>, end: &Option<String>) -> Option<i64> {
    let (Some(start), Some(end)) = (start, end) else {
        return None;
    };
    let days = days_between(start, end);
    if days.is_none() {
        warn!(%doi, %start, %end, "stored date is not canonical; interval left empty");
    }
    days
}

fn shape(publication: Publication, options: SearchOptions) -> FilteredPub {
    let doi = publication.doi.as_str();
    let received_2_accepted =
        interval(doi, &publication.normalized_received, &publication.normalized_accepted);
    let received_2_published =
        interval(doi, &publication.normalized_received, &publication.normalized_published);
    let accepted_2_published =
        interval(doi, &publication.normalized_accepted, &publication.normalized_published);
    FilteredPub {
        received_2_accepted,
        received_2_published,
        accepted_2_published,
        title: publication.title.filter(|_| options.get_title),
        publication_type: publication.publication_type.filter(|_| options.get_publication_type),
        no_of_authors: publication.no_of_authors.filter(|_| options.get_no_of_authors),
        affiliations: publication.affiliations.filter(|_| options.get_affiliations),
        publisher: publication.normalized_publisher,
        journal: publication.normalized_journal,
        normalized_received: publication.normalized_received,
        normalized_accepted: publication.normalized_accepted,
        normalized_published: publication.normalized_published,
        doi: publication.doi,
    }
}
