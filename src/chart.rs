// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! SVG rendering of a computed [`ChartLayout`].
//!
//! The renderer performs no placement of its own; every coordinate comes from
//! the layout. All dynamic text passes through [`escape_xml`].

use std::{borrow::Cow, fmt::Write as _};

use chrono::NaiveDate;

use crate::layout::{ChartLayout, LineKind, MarkerKind, PlacedLabel};

const TITLE: &str = "⭐ Total Stars Growth Trend / 总星标增长趋势";
const TREND_COLOR: &str = "#4CAF50";
const CREATION_COLOR: &str = "#FF5722";

/// Renders `layout` as a standalone SVG document.
///
/// `repositories_created` and `generated` only feed the stats footer.
pub fn render_svg(layout: &ChartLayout, repositories_created: usize, generated: NaiveDate) -> String {
    let canvas = &layout.canvas;
    let left = canvas.padding.left;
    let top = canvas.padding.top;
    let right = left + canvas.chart_width();
    let baseline = canvas.baseline();
    let middle = top + canvas.chart_height() / 2.0;

    let mut buffer = String::with_capacity(4096);
    let _ = writeln!(
        buffer,
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">",
        w = canvas.width,
        h = canvas.height,
    );
    let _ = writeln!(
        buffer,
        "  <rect width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>",
        canvas.width, canvas.height,
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"{}\" y=\"30\" text-anchor=\"middle\" font-size=\"18\" font-weight=\"bold\" fill=\"#333\">{}</text>",
        canvas.width / 2.0,
        escape_xml(TITLE),
    );

    for (value, y) in [
        (layout.max_total, top),
        (layout.max_total / 2, middle),
        (0, baseline),
    ] {
        let _ = writeln!(
            buffer,
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"12\" fill=\"#666\">{value}</text>",
            left - 10.0,
            fmt_coord(y),
        );
    }

    let _ = writeln!(
        buffer,
        "  <line x1=\"{left}\" y1=\"{top}\" x2=\"{right}\" y2=\"{top}\" stroke=\"#e0e0e0\" stroke-width=\"1\"/>",
    );
    let _ = writeln!(
        buffer,
        "  <line x1=\"{left}\" y1=\"{m}\" x2=\"{right}\" y2=\"{m}\" stroke=\"#e0e0e0\" stroke-width=\"1\" stroke-dasharray=\"5,5\"/>",
        m = fmt_coord(middle),
    );
    let _ = writeln!(
        buffer,
        "  <line x1=\"{left}\" y1=\"{baseline}\" x2=\"{right}\" y2=\"{baseline}\" stroke=\"#666\" stroke-width=\"2\"/>",
    );
    let _ = writeln!(
        buffer,
        "  <line x1=\"{left}\" y1=\"{top}\" x2=\"{left}\" y2=\"{baseline}\" stroke=\"#666\" stroke-width=\"2\"/>",
    );

    if let (Some(first), Some(last)) = (layout.points.first(), layout.points.last()) {
        let date_y = canvas.height - canvas.padding.bottom + 20.0;
        let _ = writeln!(
            buffer,
            "  <text x=\"{left}\" y=\"{date_y}\" text-anchor=\"start\" font-size=\"11\" fill=\"#999\">{}</text>",
            first.date,
        );
        let _ = writeln!(
            buffer,
            "  <text x=\"{right}\" y=\"{date_y}\" text-anchor=\"end\" font-size=\"11\" fill=\"#999\">{}</text>",
            last.date,
        );
    }

    let _ = writeln!(
        buffer,
        "  <path d=\"{}\" stroke=\"{TREND_COLOR}\" stroke-width=\"3\" fill=\"none\"/>",
        path_data(layout),
    );

    buffer.push_str("  <g>\n");
    let mut labels = layout.labels.iter();
    for marker in &layout.markers {
        match marker.kind {
            MarkerKind::Creation => {
                if let Some(label) = labels.next() {
                    write_creation(&mut buffer, label);
                }
            }
            MarkerKind::Plain => {
                let _ = writeln!(
                    buffer,
                    "    <circle cx=\"{}\" cy=\"{}\" r=\"3\" fill=\"{TREND_COLOR}\"/>",
                    fmt_coord(marker.x),
                    fmt_coord(marker.y),
                );
            }
        }
    }
    buffer.push_str("  </g>\n");

    write_legend(&mut buffer, canvas.width, canvas.height);

    let h = canvas.height;
    let _ = writeln!(
        buffer,
        "  <text x=\"20\" y=\"{}\" font-size=\"11\" fill=\"#666\">Total: {} ⭐</text>",
        h - 40.0,
        layout.max_total,
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"20\" y=\"{}\" font-size=\"11\" fill=\"#666\">Repos created: {repositories_created}</text>",
        h - 25.0,
    );
    let _ = writeln!(
        buffer,
        "  <text x=\"20\" y=\"{}\" font-size=\"11\" fill=\"#999\">Generated: {}</text>",
        h - 10.0,
        generated.format("%Y-%m-%d"),
    );
    buffer.push_str("</svg>\n");

    buffer
}

fn path_data(layout: &ChartLayout) -> String {
    let mut data = String::new();
    for (index, (x, y)) in layout.polyline().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        if index > 0 {
            data.push(' ');
        }
        let _ = write!(data, "{command} {} {}", fmt_coord(x), fmt_coord(y));
    }
    data
}

fn write_creation(buffer: &mut String, label: &PlacedLabel) {
    let names = label.repositories.join(", ");
    let _ = writeln!(
        buffer,
        "    <circle cx=\"{}\" cy=\"{}\" r=\"8\" fill=\"{CREATION_COLOR}\" stroke=\"#fff\" stroke-width=\"2\">",
        fmt_coord(label.marker_x),
        fmt_coord(label.marker_y),
    );
    let _ = writeln!(
        buffer,
        "      <title>Created: {} ({})</title>\n    </circle>",
        escape_xml(&names),
        label.date,
    );
    for line in &label.lines {
        let (size, fill, weight) = match line.kind {
            LineKind::Repository => (10, CREATION_COLOR, "bold"),
            LineKind::Date => (9, "#999", "normal"),
        };
        let _ = writeln!(
            buffer,
            "    <text x=\"{}\" y=\"{}\" font-size=\"{size}\" fill=\"{fill}\" font-weight=\"{weight}\" text-anchor=\"{}\">{}</text>",
            fmt_coord(label.text_x),
            fmt_coord(line.y),
            label.anchor.as_svg(),
            escape_xml(&line.text),
        );
    }
}

fn write_legend(buffer: &mut String, width: f64, height: f64) {
    let x = width - 200.0;
    let text_x = width - 190.0;
    let _ = writeln!(
        buffer,
        "  <g>\n    <circle cx=\"{x}\" cy=\"{}\" r=\"3\" fill=\"{TREND_COLOR}\"/>\n    <text x=\"{text_x}\" y=\"{}\" font-size=\"12\" fill=\"#666\">Star count</text>",
        height - 40.0,
        height - 36.0,
    );
    let _ = writeln!(
        buffer,
        "    <circle cx=\"{x}\" cy=\"{}\" r=\"8\" fill=\"{CREATION_COLOR}\" stroke=\"#fff\" stroke-width=\"2\"/>\n    <text x=\"{text_x}\" y=\"{}\" font-size=\"12\" fill=\"#666\">Repo created</text>\n  </g>",
        height - 20.0,
        height - 16.0,
    );
}

/// Rounds to two decimals and drops trailing zeros.
fn fmt_coord(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    if text == "-0" { "0".to_owned() } else { text }
}

/// Escapes the five XML special characters.
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .any(|character| matches!(character, '&' | '<' | '>' | '\"' | '\''))
    {
        let mut escaped = String::with_capacity(value.len());
        for character in value.chars() {
            match character {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '\"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                other => escaped.push(other)
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}
