// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Generates a GitHub profile README with a cumulative star growth chart.
//!
//! The library pulls public repository metadata through a [`ProfileSource`],
//! ranks repositories by stars and pin status, aggregates star and creation
//! events into a [`CumulativeSeries`], lays the series out with
//! non-overlapping creation labels and renders both the SVG chart and the
//! Markdown document. Aggregation and layout are pure functions; all I/O
//! lives in the source, cache and artifact modules.

mod artifact;
mod cache;
mod chart;
mod config;
mod error;
mod history;
mod identifier;
mod layout;
mod model;
mod pipeline;
mod ranking;
mod readme;
mod source;

pub use artifact::{chart_file_name, prune_charts, write_chart, write_document};
pub use cache::{load as load_cache, store as store_cache};
pub use chart::{escape_xml, render_svg};
pub use config::{
    Badge, FallbackProfile, Link, Personalization, Preferences, ProfileExtras, Settings,
};
pub use error::{Error, artifact_io_error, io_error};
pub use history::{
    CreationIndex, CumulativeSeries, DailyCount, Event, EventKind, SeriesPoint, SeriesSummary,
    aggregate, backfill, daily_counts, parse_event_date, summarize,
};
pub use identifier::Login;
pub use layout::{
    Anchor, Canvas, ChartLayout, LabelBox, LabelLine, LabelMetrics, LineKind, Marker, MarkerKind,
    OFFSET_MULTIPLIERS, Padding, PlacedLabel, PlotPoint, layout, place_label,
};
pub use model::{Repository, UserProfile};
pub use pipeline::{
    Collector, ListingOrigin, ProfileSnapshot, StarHistory, collect_star_dates, fetch_repositories,
};
pub use ranking::{RankedRepository, rank, top, total_stars};
pub use readme::{ReadmeInput, render_readme};
pub use source::{GithubSource, MockSource, ProfileSource};
