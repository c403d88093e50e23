use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use glam::Vec2;

use rdw_guard::Grid2d;
use rdw_guard::iterators::polygon::PolygonIterator;
use rdw_guard::types::MapInfo;

fn bench_polygon_iter(c: &mut Criterion) {
    let info = MapInfo {
        width: 256,
        height: 256,
        resolution: 1.0,
        ..Default::default()
    };
    let grid = Grid2d::<u8>::filled(info, 0).expect("grid should build");

    let square = vec![
        Vec2::new(10.0, 10.0),
        Vec2::new(110.0, 10.0),
        Vec2::new(110.0, 110.0),
        Vec2::new(10.0, 110.0),
    ];
    // L-shaped room.
    let concave = vec![
        Vec2::new(10.0, 10.0),
        Vec2::new(200.0, 10.0),
        Vec2::new(200.0, 60.0),
        Vec2::new(60.0, 60.0),
        Vec2::new(60.0, 200.0),
        Vec2::new(10.0, 200.0),
    ];

    c.bench_function("polygon_iter_rectangle_100x100", |b| {
        b.iter_batched(
            || square.clone(),
            |pts| {
                let count = PolygonIterator::new(&grid, &pts).unwrap().count();
                black_box(count);
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("polygon_iter_concave", |b| {
        b.iter_batched(
            || concave.clone(),
            |pts| {
                let count = PolygonIterator::new(&grid, &pts).unwrap().count();
                black_box(count);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_polygon_iter);
criterion_main!(benches);
