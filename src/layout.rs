// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Chart geometry and label placement.
//!
//! Points are spaced uniformly by their index in the series, not by date, and
//! the y axis is inverted so a total of zero sits on the bottom edge of the
//! plot area. Every creation day gets a multi-line label. Labels are placed by
//! trying a fixed list of vertical offsets and keeping the first one whose box
//! does not intersect a previously placed box.
//!
//! The search is bounded. When every candidate collides the last candidate is
//! used anyway, so dense clusters of creation days can still produce
//! overlapping labels. [`PlacedLabel::collision_free`] reports which labels
//! fell back.

use chrono::NaiveDate;
use serde::Serialize;

use crate::history::{CreationIndex, CumulativeSeries};

/// Vertical offsets tried in order, in units of one label step.
pub const OFFSET_MULTIPLIERS: [i32; 17] = [0, 1, -1, 2, -2, 3, -3, 4, -4, 5, -5, 6, -6, 7, -7, 8, -8];

/// Roughly how many plain markers are drawn across the whole series.
const PLAIN_MARKER_TARGET: usize = 20;

/// Space reserved around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct Padding
{
    pub left:   f64,
    pub right:  f64,
    pub top:    f64,
    pub bottom: f64,
}

/// Sizing rules for creation labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct LabelMetrics
{
    /// Height of one text line.
    pub line_height: f64,
    /// Gap kept between a label's text and its box edge.
    pub padding:     f64,
    pub min_width:   f64,
    pub max_width:   f64,
    /// Approximate advance of one character.
    pub char_width:  f64,
    /// Horizontal distance between the marker and the label text.
    pub marker_gap:  f64,
}

impl Default for LabelMetrics
{
    fn default() -> Self
    {
        Self {
            line_height: 12.0,
            padding:     4.0,
            min_width:   80.0,
            max_width:   220.0,
            char_width:  6.0,
            marker_gap:  12.0,
        }
    }
}

/// Drawing surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct Canvas
{
    pub width:   f64,
    pub height:  f64,
    pub padding: Padding,
    pub labels:  LabelMetrics,
}

impl Default for Canvas
{
    fn default() -> Self
    {
        Self {
            width:   900.0,
            height:  400.0,
            padding: Padding {
                left: 60.0, right: 40.0, top: 60.0, bottom: 80.0,
            },
            labels:  LabelMetrics::default(),
        }
    }
}

impl Canvas
{
    pub fn chart_width(&self,) -> f64
    {
        self.width - self.padding.left - self.padding.right
    }

    pub fn chart_height(&self,) -> f64
    {
        self.height - self.padding.top - self.padding.bottom
    }

    /// y coordinate of the bottom edge of the plot area.
    pub fn baseline(&self,) -> f64
    {
        self.padding.top + self.chart_height()
    }
}

/// Axis-aligned rectangle reserving canvas space for a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct LabelBox
{
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl LabelBox
{
    /// Two boxes overlap unless one lies entirely left of, right of, above or
    /// below the other. Shared edges count as overlap.
    pub fn overlaps(&self, other: &LabelBox,) -> bool
    {
        !(self.x_max < other.x_min
            || self.x_min > other.x_max
            || self.y_max < other.y_min
            || self.y_min > other.y_max)
    }
}

/// Side of the marker the label text extends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum Anchor
{
    /// Text starts at the anchor and extends right.
    Start,
    /// Text ends at the anchor and extends left.
    End,
}

impl Anchor
{
    /// Value of the SVG `text-anchor` attribute.
    pub fn as_svg(self,) -> &'static str
    {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum LineKind
{
    Repository,
    Date,
}

/// One positioned line of label text.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct LabelLine
{
    pub text: String,
    pub kind: LineKind,
    /// Baseline of the line.
    pub y:    f64,
}

/// Final placement of a creation label.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct PlacedLabel
{
    pub date:           NaiveDate,
    pub repositories:   Vec<String,>,
    /// Marker position the label annotates.
    pub marker_x:       f64,
    pub marker_y:       f64,
    /// x coordinate passed to the text elements.
    pub text_x:         f64,
    pub anchor:         Anchor,
    pub top:            f64,
    pub width:          f64,
    /// `lines.len() * line_height`.
    pub height:         f64,
    pub lines:          Vec<LabelLine,>,
    /// Footprint including padding, used for collision checks.
    pub bounds:         LabelBox,
    /// `false` when every candidate offset collided and the last one was used.
    pub collision_free: bool,
}

/// A series point mapped onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct PlotPoint
{
    pub date:  NaiveDate,
    pub total: u64,
    pub x:     f64,
    pub y:     f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind
{
    /// Thinned star-count marker.
    Plain,
    /// Repository creation marker with an attached label.
    Creation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct Marker
{
    pub x:     f64,
    pub y:     f64,
    pub index: usize,
    pub kind:  MarkerKind,
}

/// Everything a renderer needs to draw the chart without further placement.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct ChartLayout
{
    pub canvas:    Canvas,
    pub points:    Vec<PlotPoint,>,
    pub markers:   Vec<Marker,>,
    pub labels:    Vec<PlacedLabel,>,
    pub max_total: u64,
}

impl ChartLayout
{
    /// Polyline through every series point, unaffected by marker thinning.
    pub fn polyline(&self,) -> impl Iterator<Item = (f64, f64,),> + '_
    {
        self.points.iter().map(|point| (point.x, point.y,),)
    }
}

/// Affine mapping from (index, total) to canvas coordinates.
struct Scale<'canvas,>
{
    canvas:    &'canvas Canvas,
    intervals: f64,
    range:     f64,
}

impl Scale<'_,>
{
    fn x(&self, index: usize,) -> f64
    {
        self.canvas.padding.left + (index as f64 / self.intervals) * self.canvas.chart_width()
    }

    fn y(&self, total: u64,) -> f64
    {
        self.canvas.baseline() - (total as f64 / self.range) * self.canvas.chart_height()
    }
}

/// Computes point geometry, thinned markers and label placements.
///
/// A single-point series is placed on the left edge; callers normally skip
/// charts for series shorter than two points.
pub fn layout(series: &CumulativeSeries, creations: &CreationIndex, canvas: &Canvas,) -> ChartLayout
{
    let count = series.len();
    let max_total = series.max_total();
    let scale = Scale {
        canvas,
        intervals: count.saturating_sub(1,).max(1,) as f64,
        range: max_total.max(1,) as f64,
    };
    let stride = (count / PLAIN_MARKER_TARGET).max(1,);

    let mut points = Vec::with_capacity(count,);
    let mut markers = Vec::new();
    let mut labels = Vec::with_capacity(creations.len(),);
    let mut placed = Vec::with_capacity(creations.len(),);

    for (index, point,) in series.points().iter().enumerate() {
        let plot = PlotPoint {
            date:  point.date,
            total: point.total,
            x:     scale.x(index,),
            y:     scale.y(point.total,),
        };
        points.push(plot,);

        if let Some(repositories,) = creations.get(&point.date,) {
            markers.push(Marker {
                x: plot.x, y: plot.y, index, kind: MarkerKind::Creation,
            },);
            labels.push(place_label(&plot, repositories, canvas, &mut placed,),);
        } else if index % stride == 0 || index + 1 == count {
            markers.push(Marker {
                x: plot.x, y: plot.y, index, kind: MarkerKind::Plain,
            },);
        }
    }

    ChartLayout {
        canvas: *canvas,
        points,
        markers,
        labels,
        max_total,
    }
}

/// Places one creation label and records its box in `placed`.
pub fn place_label(
    point: &PlotPoint,
    repositories: &[String],
    canvas: &Canvas,
    placed: &mut Vec<LabelBox,>,
) -> PlacedLabel
{
    let metrics = &canvas.labels;
    let mut texts: Vec<(String, LineKind,),> = repositories
        .iter()
        .map(|name| (format!("📦 {name}"), LineKind::Repository,),)
        .collect();
    texts.push((point.date.format("%Y-%m-%d",).to_string(), LineKind::Date,),);

    let height = metrics.line_height * texts.len() as f64;
    let width = label_width(texts.iter().map(|(text, _,)| text.as_str(),), metrics,);

    let place_right = point.x < canvas.width - (width + canvas.padding.right);
    let (text_x, anchor, x_min, x_max,) = if place_right {
        let text_x = point.x + metrics.marker_gap;
        (text_x, Anchor::Start, text_x, text_x + width,)
    } else {
        let text_x = point.x - metrics.marker_gap;
        (text_x, Anchor::End, text_x - width, text_x,)
    };

    let min_top = canvas.padding.top + metrics.padding;
    let max_top = canvas.baseline() - height - metrics.padding;
    let clamp_top = |top: f64| top.min(max_top,).max(min_top,);
    let base_top = clamp_top(point.y - height / 2.0,);
    let step = height + metrics.padding * 2.0;
    let footprint = |top: f64| LabelBox {
        x_min,
        x_max,
        y_min: top - metrics.padding,
        y_max: top + height + metrics.padding,
    };

    let mut top = base_top;
    let mut collision_free = false;
    for multiplier in OFFSET_MULTIPLIERS {
        top = clamp_top(base_top + f64::from(multiplier,) * step,);
        let candidate = footprint(top,);
        if !placed.iter().any(|existing| candidate.overlaps(existing,),) {
            collision_free = true;
            break;
        }
    }

    let bounds = footprint(top,);
    placed.push(bounds,);

    let lines = texts
        .into_iter()
        .enumerate()
        .map(|(index, (text, kind,),)| LabelLine {
            text,
            kind,
            y: top + metrics.line_height * (index + 1) as f64,
        },)
        .collect();

    PlacedLabel {
        date: point.date,
        repositories: repositories.to_vec(),
        marker_x: point.x,
        marker_y: point.y,
        text_x,
        anchor,
        top,
        width,
        height,
        lines,
        bounds,
        collision_free,
    }
}

/// Longest line length times the character advance, clamped to the
/// configured width range.
fn label_width<'line,>(lines: impl Iterator<Item = &'line str,>, metrics: &LabelMetrics,) -> f64
{
    let longest = lines.map(|line| line.chars().count(),).max().unwrap_or(0,);
    (longest as f64 * metrics.char_width).max(metrics.min_width,).min(metrics.max_width,)
}
