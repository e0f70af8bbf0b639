//! Statistics over search results and the plain-text reports built from them.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use crate::datetext::{earliest_date, latest_date, parse_iso};
use crate::models::{FilteredPub, JournalSummary};

/// Aggregate view of one search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSummary {
    pub no_of_pubs: usize,
    /// Occurrences per publisher; `None` counts rows without one.
    pub publishers: BTreeMap<Option<String>, usize>,
    /// Occurrences per journal; `None` counts rows without one.
    pub journals: BTreeMap<Option<String>, usize>,
    pub min_received: Option<String>,
    pub max_received: Option<String>,
    pub min_accepted: Option<String>,
    pub max_accepted: Option<String>,
    pub min_published: Option<String>,
    pub max_published: Option<String>,
    pub average_received_2_accepted: Option<f64>,
    pub average_received_2_published: Option<f64>,
    pub average_accepted_2_published: Option<f64>,
}

impl SearchSummary {
    pub fn no_of_publishers(&self) -> usize {
        self.publishers.len()
    }
    pub fn no_of_journals(&self) -> usize {
        self.journals.len()
    }
}

/// Summarizes `pubs`, or returns `None` when there is nothing to summarize.
///
/// Absent dates and intervals are skipped, so an extremum or average is only
/// `None` when no row carries that value at all.
pub fn analyze(pubs: &[FilteredPub]) -> Option<SearchSummary> {
    if pubs.is_empty() {
        return None;
    }
    let mut publishers = BTreeMap::new();
    let mut journals = BTreeMap::new();
    for p in pubs {
        *publishers.entry(p.publisher.clone()).or_insert(0) += 1;
        *journals.entry(p.journal.clone()).or_insert(0) += 1;
    }
    let (min_received, max_received) = extrema(pubs, |p| &p.normalized_received);
    let (min_accepted, max_accepted) = extrema(pubs, |p| &p.normalized_accepted);
    let (min_published, max_published) = extrema(pubs, |p| &p.normalized_published);
    Some(SearchSummary {
        no_of_pubs: pubs.len(),
        publishers,
        journals,
        min_received,
        max_received,
        min_accepted,
        max_accepted,
        min_published,
        max_published,
        average_received_2_accepted: average(pubs.iter().filter_map(|p| p.received_2_accepted)),
        average_received_2_published: average(pubs.iter().filter_map(|p| p.received_2_published)),
        average_accepted_2_published: average(pubs.iter().filter_map(|p| p.accepted_2_published)),
    })
}

fn extrema(
    pubs: &[FilteredPub],
    date: impl Fn(&FilteredPub) -> &Option<String>,
) -> (Option<String>, Option<String>) {
    let dates: Vec<&str> = pubs
        .iter()
        .filter_map(|p| date(p).as_deref())
        .filter(|d| parse_iso(d).is_ok())
        .collect();
    (earliest_date(&dates).ok(), latest_date(&dates).ok())
}

fn average(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

struct Shown<'a>(&'a Option<String>);

impl fmt::Display for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "-"),
        }
    }
}

struct Days(Option<f64>);

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(days) => write!(f, "{:.2}", days),
            None => write!(f, "-"),
        }
    }
}

fn histogram(out: &mut String, title: &str, counts: &BTreeMap<Option<String>, usize>) -> fmt::Result {
    let mut rows: Vec<(&Option<String>, &usize)> = counts.iter().collect();
    // most frequent first, ties alphabetically
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    writeln!(out, "{}:", title)?;
    for (name, count) in rows {
        match name {
            Some(name) => writeln!(out, "    {:>6}  {}", count, name)?,
            None => writeln!(out, "    {:>6}  (none)", count)?,
        }
    }
    Ok(())
}

impl fmt::Display for SearchSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = String::new();
        writeln!(
            out,
            "Found {} publication(s) from {} publisher(s) in {} journal(s).",
            self.no_of_pubs,
            self.no_of_publishers(),
            self.no_of_journals()
        )?;
        writeln!(out)?;
        histogram(&mut out, "Publishers", &self.publishers)?;
        writeln!(out)?;
        histogram(&mut out, "Journals", &self.journals)?;
        writeln!(out)?;
        writeln!(out, "Received:   {} to {}", Shown(&self.min_received), Shown(&self.max_received))?;
        writeln!(out, "Accepted:   {} to {}", Shown(&self.min_accepted), Shown(&self.max_accepted))?;
        writeln!(out, "Published:  {} to {}", Shown(&self.min_published), Shown(&self.max_published))?;
        writeln!(out)?;
        writeln!(out, "Average days from received to accepted:  {}", Days(self.average_received_2_accepted))?;
        writeln!(out, "Average days from received to published: {}", Days(self.average_received_2_published))?;
        write!(out, "Average days from accepted to published: {}", Days(self.average_accepted_2_published))?;
        f.write_str(&out)
    }
}

/// The text shown after a search that was not exported.
pub fn search_report(summary: Option<&SearchSummary>) -> String {
    match summary {
        Some(summary) => summary.to_string(),
        None => "No publications matched the search.".to_string(),
    }
}

pub fn publishers_report(publishers: &[String]) -> String {
    if publishers.is_empty() {
        return "No publishers found in the database.".to_string();
    }
    let mut out = format!("Publishers ({}):\n", publishers.len());
    for publisher in publishers {
        out.push_str(&format!("    {}\n", publisher));
    }
    out
}

pub fn journals_report(publisher: &str, journals: Option<&[String]>) -> String {
    let Some(journals) = journals else {
        return format!("Publisher \"{}\" does not exist in the database.", publisher);
    };
    let mut out = format!("Journals of {} ({}):\n", publisher, journals.len());
    for journal in journals {
        out.push_str(&format!("    {}\n", journal));
    }
    out
}

struct JournalBlock<'a>(&'a JournalSummary);

impl fmt::Display for JournalBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let summary = self.0;
        let types = if summary.publication_types.is_empty() { "-" } else { summary.publication_types.as_str() };
        writeln!(f, "{}", summary.name)?;
        writeln!(f, "    Publications:       {}", summary.count)?;
        writeln!(f, "    Publication types:  {}", types)?;
        writeln!(f, "    Received:           {} to {}", Shown(&summary.min_received), Shown(&summary.max_received))?;
        writeln!(f, "    Accepted:           {} to {}", Shown(&summary.min_accepted), Shown(&summary.max_accepted))?;
        writeln!(f, "    Published:          {} to {}", Shown(&summary.min_published), Shown(&summary.max_published))
    }
}

pub fn publisher_summary_report(publisher: &str, summaries: Option<&[JournalSummary]>) -> String {
    let Some(summaries) = summaries else {
        return format!("Publisher \"{}\" does not exist in the database.", publisher);
    };
    let total: usize = summaries.iter().map(|s| s.count).sum();
    let mut out = format!(
        "{}: {} publication(s) in {} journal(s)\n\n",
        publisher,
        total,
        summaries.len()
    );
    for summary in summaries {
        out.push_str(&format!("{}\n", JournalBlock(summary)));
    }
    out
}

pub fn journal_summary_report(publisher: &str, journal: &str, summary: Option<&JournalSummary>) -> String {
    let Some(summary) = summary else {
        return format!(
            "Journal \"{}\" of publisher \"{}\" does not exist in the database.",
            journal, publisher
        );
    };
    format!("{}\n{}", publisher, JournalBlock(summary))
}
