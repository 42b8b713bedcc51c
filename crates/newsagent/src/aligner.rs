//! Event alignment against a reference date series
//!
//! Used to overlay news on a price chart: every article is snapped to the
//! price date closest to its own publication date.

use crate::error::{NewsError, Result};
use crate::models::{Article, PriceBar};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Parse a timestamp as RFC 3339 or plain `YYYY-MM-DD`, keeping only the date
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    // Naive timestamps such as `2024-01-01T00:00:00`
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// An article snapped to its nearest reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedEvent {
    pub event: Article,
    pub snapped_date: NaiveDate,
}

/// Events grouped by their nearest reference date
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment<T> {
    /// Payloads per reference date, in input order
    pub buckets: BTreeMap<NaiveDate, Vec<T>>,
    /// Events dropped for lack of a date
    pub rejected: usize,
}

impl<T> Alignment<T> {
    /// Number of aligned events
    pub fn aligned(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Nearest-date lookup over a fixed reference series
#[derive(Debug, Clone)]
pub struct EventAligner {
    /// Ascending, deduplicated
    reference: Vec<NaiveDate>,
}

impl EventAligner {
    /// Build an aligner; fails with `EmptyReference` when there are no dates
    pub fn new(reference: impl IntoIterator<Item = NaiveDate>) -> Result<Self> {
        let mut reference: Vec<NaiveDate> = reference.into_iter().collect();
        if reference.is_empty() {
            return Err(NewsError::EmptyReference);
        }
        reference.sort_unstable();
        reference.dedup();
        Ok(Self { reference })
    }

    /// Build an aligner over the dates of a price series
    pub fn from_prices(bars: &[PriceBar]) -> Result<Self> {
        Self::new(bars.iter().map(|bar| bar.timestamp))
    }

    /// Reference dates, ascending
    pub fn reference(&self) -> &[NaiveDate] {
        &self.reference
    }

    /// Reference date with the smallest absolute day distance to `date`
    ///
    /// Equidistant candidates resolve to the earlier date.
    pub fn nearest(&self, date: NaiveDate) -> NaiveDate {
        let mut best = self.reference[0];
        let mut best_distance = (best - date).num_days().abs();

        for &candidate in &self.reference[1..] {
            let distance = (candidate - date).num_days().abs();
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        best
    }

    /// Group payloads by their nearest reference date
    ///
    /// Events without a date are dropped and counted in `rejected`.
    pub fn align<T>(&self, events: impl IntoIterator<Item = (Option<NaiveDate>, T)>) -> Alignment<T> {
        let mut buckets: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
        let mut rejected = 0;

        for (date, payload) in events {
            match date {
                Some(date) => buckets.entry(self.nearest(date)).or_default().push(payload),
                None => rejected += 1,
            }
        }

        Alignment { buckets, rejected }
    }

    /// Snap articles to the reference series by their publication date
    ///
    /// Returns the aligned events in chronological order of their snapped
    /// date and the number of articles without a parseable date.
    pub fn align_articles(&self, articles: &[Article]) -> (Vec<AlignedEvent>, usize) {
        let alignment = self.align(articles.iter().map(|article| {
            let date = article.published_at.as_deref().and_then(parse_event_date);
            (date, article.clone())
        }));

        debug!(
            "Aligned {} articles, rejected {}",
            alignment.aligned(),
            alignment.rejected
        );

        let events = alignment
            .buckets
            .into_iter()
            .flat_map(|(snapped_date, articles)| {
                articles.into_iter().map(move |event| AlignedEvent { event, snapped_date })
            })
            .collect();

        (events, alignment.rejected)
    }
}
