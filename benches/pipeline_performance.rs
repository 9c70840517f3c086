use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lapchart::chart::render;
use lapchart::laps::{default_selection, filter_drivers, project, summarize};
use lapchart::LapRecord;
use std::time::Duration;

const DRIVER_COUNT: usize = 20;

fn create_sample_laps(laps_per_driver: u32) -> Vec<LapRecord> {
    let mut laps = Vec::new();
    for lap_number in 1..=laps_per_driver {
        for driver in 0..DRIVER_COUNT {
            laps.push(LapRecord {
                driver: Some(format!("D{:02}", driver)),
                lap_number: Some(lap_number),
                // every 10th lap is missing its time, like an in/out lap
                lap_time: (lap_number % 10 != 0).then(|| {
                    Duration::from_millis(82_000 + driver as u64 * 120 + lap_number as u64)
                }),
                ..Default::default()
            });
        }
    }
    laps
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for laps_per_driver in [20, 70] {
        let laps = create_sample_laps(laps_per_driver);
        group.bench_function(format!("project_{}_laps", laps.len()), |b| {
            b.iter(|| black_box(project(&laps)));
        });
    }

    group.finish();
}

fn bench_filter_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_render");

    let points = project(&create_sample_laps(70));
    let selection = default_selection(&points);

    group.bench_function("default_selection", |b| {
        b.iter(|| black_box(default_selection(&points)));
    });

    group.bench_function("filter_drivers", |b| {
        b.iter(|| black_box(filter_drivers(&points, &selection)));
    });

    let selected = filter_drivers(&points, &selection);
    group.bench_function("render_chart", |b| {
        b.iter(|| black_box(render(&selected)));
    });

    group.bench_function("summarize", |b| {
        b.iter(|| black_box(summarize(&selected)));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(100);
    targets = bench_projection, bench_filter_and_render
}
criterion_main!(benches);
