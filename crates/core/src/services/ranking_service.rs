use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::percent_change;
use crate::models::pick::{OutcomeStatus, Pick, Sentiment};
use crate::models::watchlist::WatchlistEntry;

/// Key a list of picks or watchlist entries can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// `final_confidence`, falling back to `confidence`
    Confidence,
    /// Percent change from entry to the current (or exit) price
    Change,
    /// Creation / add time
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Categorical predicate applied before sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordFilter {
    All,
    Sentiment(Sentiment),
    /// Created within the last N days (inclusive of the boundary instant)
    WithinDays(u32),
    /// Records whose outcome equals the given status
    Outcome(OutcomeStatus),
}

/// A filter plus an ordering, as selected in a table header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankQuery {
    pub filter: RecordFilter,
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for RankQuery {
    fn default() -> Self {
        Self {
            filter: RecordFilter::All,
            key: SortKey::Confidence,
            direction: SortDirection::Desc,
        }
    }
}

/// The fields the ranking pipeline needs from a record.
pub trait Rankable {
    fn ranking_confidence(&self) -> f64;

    /// Always finite.
    fn percent_change(&self) -> f64;

    fn timestamp(&self) -> DateTime<Utc>;

    fn sentiment(&self) -> Sentiment;

    fn outcome(&self) -> Option<OutcomeStatus>;
}

impl Rankable for Pick {
    fn ranking_confidence(&self) -> f64 {
        self.effective_confidence()
    }

    fn percent_change(&self) -> f64 {
        percent_change(self.entry_price, self.current_price)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    fn outcome(&self) -> Option<OutcomeStatus> {
        self.outcome
    }
}

impl Rankable for WatchlistEntry {
    /// Watchlist entries carry no confidence of their own.
    fn ranking_confidence(&self) -> f64 {
        0.0
    }

    fn percent_change(&self) -> f64 {
        WatchlistEntry::percent_change(self)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.added_at
    }

    fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    /// Open entries count as `Active`; closed entries as `Win` or `Loss`
    /// depending on whether they exited in profit.
    fn outcome(&self) -> Option<OutcomeStatus> {
        if !self.is_closed() {
            Some(OutcomeStatus::Active)
        } else if self.return_pct() > 0.0 {
            Some(OutcomeStatus::Win)
        } else {
            Some(OutcomeStatus::Loss)
        }
    }
}

fn compare<T: Rankable>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::Confidence => a.ranking_confidence().total_cmp(&b.ranking_confidence()),
        SortKey::Change => a.percent_change().total_cmp(&b.percent_change()),
        SortKey::Time => a.timestamp().cmp(&b.timestamp()),
    }
}

/// Order records by `key`. The input is left untouched; ties keep their
/// input order in both directions.
pub fn sort_records<T: Rankable>(records: &[T], key: SortKey, direction: SortDirection) -> Vec<&T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    match direction {
        SortDirection::Asc => sorted.sort_by(|a, b| compare(*a, *b, key)),
        SortDirection::Desc => sorted.sort_by(|a, b| compare(*b, *a, key)),
    }
    sorted
}

/// Whether a single record passes `filter` at `now`.
pub fn matches<T: Rankable>(record: &T, filter: &RecordFilter, now: DateTime<Utc>) -> bool {
    match filter {
        RecordFilter::All => true,
        RecordFilter::Sentiment(s) => record.sentiment() == *s,
        // A window reaching past the earliest representable date keeps everything
        RecordFilter::WithinDays(days) => match now.checked_sub_signed(Duration::days(i64::from(*days))) {
            Some(cutoff) => record.timestamp() >= cutoff,
            None => true,
        },
        RecordFilter::Outcome(o) => record.outcome() == Some(*o),
    }
}

/// Subsequence of records passing `filter`, order preserved.
pub fn filter_records<'a, T: Rankable>(
    records: &'a [T],
    filter: &RecordFilter,
    now: DateTime<Utc>,
) -> Vec<&'a T> {
    records.iter().filter(|r| matches(*r, filter, now)).collect()
}

/// Filter, then sort.
pub fn rank<'a, T: Rankable>(records: &'a [T], query: &RankQuery, now: DateTime<Utc>) -> Vec<&'a T> {
    let mut ranked = filter_records(records, &query.filter, now);
    match query.direction {
        SortDirection::Asc => ranked.sort_by(|a, b| compare(*a, *b, query.key)),
        SortDirection::Desc => ranked.sort_by(|a, b| compare(*b, *a, query.key)),
    }
    ranked
}

/// The first `n` records of [`rank`].
pub fn top_n<'a, T: Rankable>(
    records: &'a [T],
    query: &RankQuery,
    now: DateTime<Utc>,
    n: usize,
) -> Vec<&'a T> {
    let mut ranked = rank(records, query, now);
    ranked.truncate(n);
    ranked
}
