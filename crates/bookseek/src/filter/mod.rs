//! Reduces raw catalog records to the books the user asked for.
//!
//! Every record goes through the same pipeline: title words, then the volume token and the price
//! range when the query has them, and finally ISBN deduplication against what was already
//! accepted for the query.

mod volume;

use std::collections::HashSet;

use log::trace;

pub use volume::{VolumeMatcher, DEFAULT_TEMPLATES, TOKEN};

use crate::{
    record::{CatalogRecord, ResultRecord},
    query::SearchQuery,
};

/// Why a record was left out of the results.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// A word of the query title is missing from the book title.
    Title,
    /// The book title does not mention the requested volume.
    Volume,
    /// The price is outside the requested range or unknown.
    Price,
    /// A book with the same ISBN was already accepted.
    Duplicate,
}

/// The record filtering pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    volume: VolumeMatcher,
}

impl Filter {
    /// A filter using `volume` to match volume tokens.
    #[must_use]
    pub const fn new(volume: VolumeMatcher) -> Self {
        Self { volume }
    }

    /// Runs `record` through the pipeline for `query`.
    ///
    /// `seen` holds the ISBNs already accepted for this query.
    ///
    /// # Errors
    ///
    /// The first stage that rejects the record is returned as the `Err` value.
    pub fn accept(
        &self,
        record: CatalogRecord,
        query: &SearchQuery,
        seen: &HashSet<String>,
    ) -> Result<ResultRecord, Rejection> {
        if !title_matches(&record.title, query) {
            return Err(Rejection::Title);
        }

        if let Some(token) = query.volume() {
            if !self.volume.matches(&record.title, token) {
                return Err(Rejection::Volume);
            }
        }

        if query.has_price_range() && !price_matches(record.price, query) {
            return Err(Rejection::Price);
        }

        if seen.contains(&record.isbn) {
            return Err(Rejection::Duplicate);
        }

        Ok(record.into())
    }
}

fn title_matches(title: &str, query: &SearchQuery) -> bool {
    let title = title.to_lowercase();
    query
        .title_tokens()
        .iter()
        .all(|token| title.contains(token.as_str()))
}

// An unknown price can never be shown to satisfy a bound.
fn price_matches(price: Option<u32>, query: &SearchQuery) -> bool {
    let Some(price) = price else {
        return false;
    };

    query.min_price().map_or(true, |min| price >= min)
        && query.max_price().map_or(true, |max| price <= max)
}

/// The accepted records of one query, in the order they were fetched.
#[derive(Debug, Default)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
    seen: HashSet<String>,
}

impl ResultSet {
    /// Filters one page of records into the set and returns how many were accepted.
    pub fn absorb<I>(&mut self, filter: &Filter, query: &SearchQuery, page: I) -> usize
    where
        I: IntoIterator<Item = CatalogRecord>,
    {
        let before = self.records.len();

        for record in page {
            let title = record.title.clone();
            match filter.accept(record, query, &self.seen) {
                Ok(result) => {
                    self.seen.insert(result.isbn.clone());
                    self.records.push(result);
                }
                Err(reason) => trace!("Skipping '{title}': {reason:?}"),
            }
        }

        self.records.len() - before
    }

    /// Number of accepted records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the set, returning the records in fetch order.
    #[must_use]
    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }
}
