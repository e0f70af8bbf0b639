//! Compilation of optional search criteria into one SQL predicate.
//!
//! Every criterion is independent and optional. The present ones are turned
//! into clause fragments, in the fixed order of [`Criterion::ALL`], and joined
//! with `and`. The positional arguments are collected in the same pass, so the
//! n-th `?` in the clause is always bound to the n-th argument.
//!
//! ```
//! use pubcatalog::filter::PubFilter;
//! let compiled = PubFilter::new()
//!     .publishers(["Nature Portfolio"])
//!     .min_published("2000")
//!     .compile()
//!     .unwrap();
//! assert_eq!(compiled.clause(), " where normalized_publisher in (?) and normalized_published >= ?");
//! assert_eq!(compiled.args(), ["Nature Portfolio", "2000-01-01"]);
//! ```

use serde_json::Value;
use tracing::debug;

use crate::datetext::{DateError, normalize_partial_date};
use crate::error::{CatalogError, FilterFault, Result};

/// A filterable dimension, named by its key in the filter mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Publisher,
    Journal,
    MinReceived,
    MaxReceived,
    MinAccepted,
    MaxAccepted,
    MinPublished,
    MaxPublished,
    PublicationType,
}

impl Criterion {
    /// Compilation order. Clause fragments and arguments follow it exactly.
    pub const ALL: [Criterion; 9] = [
        Criterion::Publisher,
        Criterion::Journal,
        Criterion::MinReceived,
        Criterion::MaxReceived,
        Criterion::MinAccepted,
        Criterion::MaxAccepted,
        Criterion::MinPublished,
        Criterion::MaxPublished,
        Criterion::PublicationType,
    ];
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Publisher => "normalized_publisher",
            Criterion::Journal => "normalized_journal",
            Criterion::MinReceived => "min_received",
            Criterion::MaxReceived => "max_received",
            Criterion::MinAccepted => "min_accepted",
            Criterion::MaxAccepted => "max_accepted",
            Criterion::MinPublished => "min_published",
            Criterion::MaxPublished => "max_published",
            Criterion::PublicationType => "publication_type",
        }
    }
    pub fn from_key(key: &str) -> Option<Criterion> {
        Criterion::ALL.into_iter().find(|c| c.key() == key)
    }
    /// Whether the criterion takes a list of names rather than a date bound.
    pub fn is_list(self) -> bool {
        matches!(self, Criterion::Publisher | Criterion::Journal | Criterion::PublicationType)
    }
    fn column(self) -> &'static str {
        match self {
            Criterion::Publisher => "normalized_publisher",
            Criterion::Journal => "normalized_journal",
            Criterion::MinReceived | Criterion::MaxReceived => "normalized_received",
            Criterion::MinAccepted | Criterion::MaxAccepted => "normalized_accepted",
            Criterion::MinPublished | Criterion::MaxPublished => "normalized_published",
            // free text, matched verbatim
            Criterion::PublicationType => "publication_type",
        }
    }
    fn operator(self) -> &'static str {
        match self {
            Criterion::Publisher | Criterion::Journal | Criterion::PublicationType => "in",
            Criterion::MinReceived | Criterion::MinAccepted | Criterion::MinPublished => ">=",
            Criterion::MaxReceived | Criterion::MaxAccepted | Criterion::MaxPublished => "<=",
        }
    }
}

/// The value supplied for one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'f> {
    Names(&'f [String]),
    Bound(&'f str),
}

/// The set of criteria for one search. Absent criteria do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PubFilter {
    pub normalized_publisher: Option<Vec<String>>,
    pub normalized_journal: Option<Vec<String>>,
    pub publication_type: Option<Vec<String>>,
    pub min_received: Option<String>,
    pub max_received: Option<String>,
    pub min_accepted: Option<String>,
    pub max_accepted: Option<String>,
    pub min_published: Option<String>,
    pub max_published: Option<String>,
}

fn names<I, S>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Some(values.into_iter().map(Into::into).collect())
}

impl PubFilter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn publishers<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.normalized_publisher = names(values);
        self
    }
    pub fn journals<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.normalized_journal = names(values);
        self
    }
    pub fn publication_types<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.publication_type = names(values);
        self
    }
    pub fn min_received(mut self, date: impl Into<String>) -> Self {
        self.min_received = Some(date.into());
        self
    }
    pub fn max_received(mut self, date: impl Into<String>) -> Self {
        self.max_received = Some(date.into());
        self
    }
    pub fn min_accepted(mut self, date: impl Into<String>) -> Self {
        self.min_accepted = Some(date.into());
        self
    }
    pub fn max_accepted(mut self, date: impl Into<String>) -> Self {
        self.max_accepted = Some(date.into());
        self
    }
    pub fn min_published(mut self, date: impl Into<String>) -> Self {
        self.min_published = Some(date.into());
        self
    }
    pub fn max_published(mut self, date: impl Into<String>) -> Self {
        self.max_published = Some(date.into());
        self
    }

    pub fn operand(&self, criterion: Criterion) -> Option<Operand<'_>> {
        match criterion {
            Criterion::Publisher => self.normalized_publisher.as_deref().map(Operand::Names),
            Criterion::Journal => self.normalized_journal.as_deref().map(Operand::Names),
            Criterion::PublicationType => self.publication_type.as_deref().map(Operand::Names),
            Criterion::MinReceived => bound(&self.min_received),
            Criterion::MaxReceived => bound(&self.max_received),
            Criterion::MinAccepted => bound(&self.min_accepted),
            Criterion::MaxAccepted => bound(&self.max_accepted),
            Criterion::MinPublished => bound(&self.min_published),
            Criterion::MaxPublished => bound(&self.max_published),
        }
    }

    fn slot(&mut self, criterion: Criterion) -> Slot<'_> {
        match criterion {
            Criterion::Publisher => Slot::Names(&mut self.normalized_publisher),
            Criterion::Journal => Slot::Names(&mut self.normalized_journal),
            Criterion::PublicationType => Slot::Names(&mut self.publication_type),
            Criterion::MinReceived => Slot::Bound(&mut self.min_received),
            Criterion::MaxReceived => Slot::Bound(&mut self.max_received),
            Criterion::MinAccepted => Slot::Bound(&mut self.min_accepted),
            Criterion::MaxAccepted => Slot::Bound(&mut self.max_accepted),
            Criterion::MinPublished => Slot::Bound(&mut self.min_published),
            Criterion::MaxPublished => Slot::Bound(&mut self.max_published),
        }
    }

    /// Compiles the present criteria into one `where` clause.
    ///
    /// Date bounds go through [`normalize_partial_date`]. The first invalid
    /// criterion aborts compilation; nothing partial is returned.
    pub fn compile(&self) -> Result<CompiledFilter> {
        let mut compiled = CompiledFilter::default();
        for criterion in Criterion::ALL {
            match self.operand(criterion) {
                None => {}
                Some(Operand::Names(values)) => {
                    if values.is_empty() {
                        return Err(CatalogError::invalid_filter(criterion.key(), FilterFault::NotStrings));
                    }
                    let placeholders = vec!["?"; values.len()].join(", ");
                    compiled.push(
                        format!("{} {} ({})", criterion.column(), criterion.operator(), placeholders),
                        values.iter().cloned(),
                    );
                }
                Some(Operand::Bound(date)) => {
                    let date = normalize_partial_date(date)
                        .map_err(|e| CatalogError::invalid_filter(criterion.key(), e))?;
                    compiled.push(format!("{} {} ?", criterion.column(), criterion.operator()), [date]);
                }
            }
        }
        debug!(clause = %compiled.clause, args = compiled.args.len(), "compiled filter");
        Ok(compiled)
    }

    /// Reads criteria from a mapping such as `{"normalized_publisher": ["A"], "min_received": "2000"}`.
    ///
    /// A single string stands for a one-element list, and `null` is the same
    /// as leaving the key out. Anything else that is not a string is rejected.
    pub fn from_json(value: &Value) -> Result<PubFilter> {
        let Value::Object(map) = value else {
            return Err(CatalogError::invalid_filter("filters", FilterFault::NotAMapping));
        };
        let mut filter = PubFilter::new();
        for (key, value) in map {
            let criterion = Criterion::from_key(key)
                .ok_or_else(|| CatalogError::invalid_filter(key.as_str(), FilterFault::Unknown))?;
            filter.set_json(criterion, value)?;
        }
        Ok(filter)
    }

    pub(crate) fn set_json(&mut self, criterion: Criterion, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let invalid = |fault: FilterFault| CatalogError::invalid_filter(criterion.key(), fault);
        match self.slot(criterion) {
            Slot::Names(slot) => {
                let values = match value {
                    Value::String(s) => vec![s.clone()],
                    Value::Array(items) if !items.is_empty() => items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| invalid(FilterFault::NotStrings))?,
                    _ => return Err(invalid(FilterFault::NotStrings)),
                };
                *slot = Some(values);
            }
            Slot::Bound(slot) => {
                let date = value
                    .as_str()
                    .ok_or_else(|| invalid(DateError::Shape(value.to_string()).into()))?;
                *slot = Some(date.to_string());
            }
        }
        Ok(())
    }
}

fn bound(date: &Option<String>) -> Option<Operand<'_>> {
    date.as_deref().map(Operand::Bound)
}

enum Slot<'f> {
    Names(&'f mut Option<Vec<String>>),
    Bound(&'f mut Option<String>),
}

/// A `where` clause and its positional arguments, kept in lock-step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilter {
    clause: String,
    args: Vec<String>,
}

impl CompiledFilter {
    fn push(&mut self, fragment: String, args: impl IntoIterator<Item = String>) {
        self.clause.push_str(if self.clause.is_empty() { " where " } else { " and " });
        self.clause.push_str(&fragment);
        self.args.extend(args);
    }
    /// The clause, starting with ` where `, or empty when nothing constrains.
    pub fn clause(&self) -> &str {
        &self.clause
    }
    pub fn args(&self) -> &[String] {
        &self.args
    }
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }
}
