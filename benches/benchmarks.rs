// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use chrono::{Days, NaiveDate};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use profile_readme::{Canvas, CreationIndex, Event, aggregate, layout, render_svg};

fn start() -> NaiveDate
{
    NaiveDate::from_ymd_opt(2023, 1, 1,).unwrap_or_default()
}

fn history(days: u64, repositories: u64,) -> (Vec<Event,>, CreationIndex,)
{
    let mut creations = CreationIndex::new();
    let mut events = Vec::new();
    for repo in 0..repositories {
        let name = format!("repo-{repo}");
        let created = start() + Days::new(repo * days / repositories.max(1,),);
        creations.insert(created, name.as_str(),);
        events.push(Event::creation(created, name.as_str(),),);
        for day in (0..days).step_by(3,) {
            events.push(Event::star(start() + Days::new((day + repo) % days,), name.as_str(),),);
        }
    }
    (events, creations,)
}

fn benchmark_aggregate(c: &mut Criterion,)
{
    let (events, creations,) = history(365, 10,);

    c.bench_function("aggregate_one_year", |b| {
        b.iter(|| aggregate(black_box(&events,), black_box(&creations,),),)
    },);
}

fn benchmark_layout_dense_creations(c: &mut Criterion,)
{
    let (events, creations,) = history(60, 40,);
    let series = aggregate(&events, &creations,);
    let canvas = Canvas::default();

    c.bench_function("layout_40_creations", |b| {
        b.iter(|| layout(black_box(&series,), black_box(&creations,), &canvas,),)
    },);
}

fn benchmark_render(c: &mut Criterion,)
{
    let (events, creations,) = history(365, 10,);
    let series = aggregate(&events, &creations,);
    let chart = layout(&series, &creations, &Canvas::default(),);

    c.bench_function("render_svg_one_year", |b| {
        b.iter(|| render_svg(black_box(&chart,), creations.repository_count(), start(),),)
    },);
}

criterion_group!(benches, benchmark_aggregate, benchmark_layout_dense_creations, benchmark_render);
criterion_main!(benches);
