// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Star history aggregation.
//!
//! Star grants and repository creations are merged into a single cumulative
//! series with one point per distinct calendar day. Every creation date is
//! forced into the series, even without stars that day, so creation markers
//! always have a plottable position.
//!
//! Synthetic backfill events keep the final total equal to the declared star
//! counts but clump the padding at the fallback date. Padded series are fine
//! for a display chart and are not ground truth for growth-rate analysis.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::error::Error;

/// Kind of dated occurrence feeding the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum EventKind
{
    /// A user starred the repository.
    Star,
    /// The repository was created.
    Creation,
}

/// A single dated occurrence tagged with its source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct Event
{
    pub date:       NaiveDate,
    pub repository: String,
    pub kind:       EventKind,
}

impl Event
{
    pub fn star(date: NaiveDate, repository: impl Into<String,>,) -> Self
    {
        Self {
            date, repository: repository.into(), kind: EventKind::Star,
        }
    }

    pub fn creation(date: NaiveDate, repository: impl Into<String,>,) -> Self
    {
        Self {
            date, repository: repository.into(), kind: EventKind::Creation,
        }
    }
}

/// Number of star events per calendar day.
pub type DailyCount = BTreeMap<NaiveDate, u64,>;

/// Repositories created per calendar day.
///
/// Names keep their insertion order; inserting a name twice for the same day
/// is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize,)]
#[serde(transparent)]
pub struct CreationIndex
{
    days: BTreeMap<NaiveDate, Vec<String,>,>,
}

impl CreationIndex
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Records that `repository` was created on `date`.
    pub fn insert(&mut self, date: NaiveDate, repository: impl Into<String,>,)
    {
        let repository = repository.into();
        let names = self.days.entry(date,).or_default();
        if !names.contains(&repository,) {
            names.push(repository,);
        }
    }

    /// Repositories created on `date`, if any.
    pub fn get(&self, date: &NaiveDate,) -> Option<&[String],>
    {
        self.days.get(date,).map(Vec::as_slice,)
    }

    pub fn contains(&self, date: &NaiveDate,) -> bool
    {
        self.days.contains_key(date,)
    }

    /// Dates with at least one creation, ascending.
    pub fn dates(&self,) -> impl Iterator<Item = &NaiveDate,> + '_
    {
        self.days.keys()
    }

    /// Number of distinct creation days.
    pub fn len(&self,) -> usize
    {
        self.days.len()
    }

    pub fn is_empty(&self,) -> bool
    {
        self.days.is_empty()
    }

    /// Total number of repositories across all days.
    pub fn repository_count(&self,) -> usize
    {
        self.days.values().map(Vec::len,).sum()
    }
}

/// One point of the cumulative series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
pub struct SeriesPoint
{
    pub date:  NaiveDate,
    pub total: u64,
}

/// Running star total per distinct date.
///
/// Dates are strictly increasing and totals never decrease.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize,)]
pub struct CumulativeSeries
{
    points: Vec<SeriesPoint,>,
}

impl CumulativeSeries
{
    pub fn points(&self,) -> &[SeriesPoint]
    {
        &self.points
    }

    pub fn len(&self,) -> usize
    {
        self.points.len()
    }

    pub fn is_empty(&self,) -> bool
    {
        self.points.is_empty()
    }

    pub fn first(&self,) -> Option<&SeriesPoint,>
    {
        self.points.first()
    }

    pub fn last(&self,) -> Option<&SeriesPoint,>
    {
        self.points.last()
    }

    /// Final running total, zero for an empty series.
    pub fn total(&self,) -> u64
    {
        self.points.last().map_or(0, |point| point.total,)
    }

    /// Largest running total, equal to [`total`](Self::total) by monotonicity.
    pub fn max_total(&self,) -> u64
    {
        self.points.iter().map(|point| point.total,).max().unwrap_or(0,)
    }

    /// Whether the series has enough points to draw a chart.
    pub fn is_chartable(&self,) -> bool
    {
        self.points.len() >= 2
    }
}

/// Buckets star events by date.
pub fn daily_counts(events: &[Event],) -> DailyCount
{
    let mut daily = DailyCount::new();
    for event in events {
        let count = daily.entry(event.date,).or_insert(0,);
        if event.kind == EventKind::Star {
            *count += 1;
        }
    }
    daily
}

/// Merges star events and creation dates into a cumulative series.
///
/// Events may be unsorted and may contain duplicates. Creation-kind events and
/// every date of `creations` contribute a zero-count day so they appear in the
/// series with the total carried forward from the previous day. Without any
/// star event the series is empty, whatever creation dates are known.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use profile_readme::{CreationIndex, Event, aggregate};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d,).expect("valid date",);
/// let events = vec![
///     Event::star(day(2,), "b",),
///     Event::star(day(1,), "a",),
///     Event::star(day(2,), "a",),
/// ];
/// let series = aggregate(&events, &CreationIndex::new(),);
/// let totals: Vec<u64> = series.points().iter().map(|p| p.total,).collect();
/// assert_eq!(totals, vec![1, 3]);
/// ```
pub fn aggregate(events: &[Event], creations: &CreationIndex,) -> CumulativeSeries
{
    if !events.iter().any(|event| event.kind == EventKind::Star,) {
        return CumulativeSeries::default();
    }

    let mut daily = daily_counts(events,);
    for date in creations.dates() {
        daily.entry(*date,).or_insert(0,);
    }

    let mut running = 0u64;
    let points = daily
        .into_iter()
        .map(|(date, count,)| {
            running += count;
            SeriesPoint {
                date, total: running,
            }
        },)
        .collect();

    CumulativeSeries {
        points,
    }
}

/// Parses an API timestamp into its calendar day.
///
/// Accepts RFC 3339 timestamps (`2024-01-03T10:00:00Z`) and bare dates
/// (`2024-01-03`). Anything else is rejected rather than skipped, since a
/// corrupt date would misorder the series.
///
/// # Errors
///
/// Returns [`Error::MalformedTimestamp`] when neither format matches.
pub fn parse_event_date(raw: &str,) -> Result<NaiveDate, Error,>
{
    let trimmed = raw.trim();
    if let Ok(timestamp,) = DateTime::parse_from_rfc3339(trimmed,) {
        return Ok(timestamp.date_naive(),);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d",)
        .map_err(|_| Error::malformed_timestamp(raw,),)
}

/// Returns the real star events for `repository` padded with synthetic events
/// dated at `fallback_date` until `declared_stars` events exist.
///
/// When more real dates than declared stars were retrieved the real dates are
/// kept as-is.
pub fn backfill(
    repository: &str,
    declared_stars: u64,
    real_dates: &[NaiveDate],
    fallback_date: NaiveDate,
) -> Vec<Event,>
{
    let real = real_dates.len() as u64;
    let missing = declared_stars.saturating_sub(real,);

    let mut events = Vec::with_capacity((real + missing) as usize,);
    events.extend(real_dates.iter().map(|date| Event::star(*date, repository,),),);
    events.extend((0..missing).map(|_| Event::star(fallback_date, repository,),),);
    events
}

/// Headline numbers shown next to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct SeriesSummary
{
    pub first:         SeriesPoint,
    pub last:          SeriesPoint,
    /// Inclusive number of days between the first and last point.
    pub days_span:     i64,
    pub growth:        u64,
    pub average_daily: f64,
}

/// Summarizes a series, `None` when it is empty.
pub fn summarize(series: &CumulativeSeries,) -> Option<SeriesSummary,>
{
    let first = *series.first()?;
    let last = *series.last()?;
    let days_span = (last.date - first.date).num_days() + 1;
    let growth = last.total.saturating_sub(first.total,);

    Some(SeriesSummary {
        first,
        last,
        days_span,
        growth,
        average_daily: growth as f64 / days_span as f64,
    },)
}
