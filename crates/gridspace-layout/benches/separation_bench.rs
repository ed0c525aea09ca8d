//! Benchmarks for detection and batch separation.
//!
//! Run with: cargo bench -p gridspace-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridspace_layout::{
    DetectorOptions, SeparationOptions, Widget, analyze_layout, separate_all_touching_widgets,
};
use std::hint::black_box;

/// Tile `n` widgets into rows of a 24-column grid with every neighbour touching.
fn make_dashboard(n: usize) -> Vec<Widget> {
    let mut widgets = Vec::with_capacity(n);
    let (mut x, mut y) = (0u32, 0u32);
    for i in 0..n {
        let w = 2 + (i % 4) as u32;
        let h = 1 + (i % 3) as u32;
        if x + w > 24 {
            x = 0;
            y += 3;
        }
        widgets.push(Widget::at(format!("widget-{i}"), x, y, w, h));
        x += w;
    }
    widgets
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision/analyze_layout");
    let options = DetectorOptions::default();

    for n in [8, 32, 128] {
        let widgets = make_dashboard(n);
        group.bench_with_input(BenchmarkId::new("tiled", n), &widgets, |b, widgets| {
            b.iter(|| black_box(analyze_layout(widgets, &options)))
        });
    }

    group.finish();
}

fn bench_separate_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("separation/separate_all");
    let options = SeparationOptions::default();

    for n in [8, 32, 128] {
        let widgets = make_dashboard(n);
        group.bench_with_input(BenchmarkId::new("tiled", n), &widgets, |b, widgets| {
            b.iter(|| black_box(separate_all_touching_widgets(widgets, &options)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analyze, bench_separate_all);
criterion_main!(benches);
