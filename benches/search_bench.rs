use criterion::{criterion_group, criterion_main, Criterion};
use grid_astar::{astar, Grid, Heuristic, Point, SearchConfig, SearchStatus, StepwiseDriver, Vec2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

const N: i32 = 64;

fn random_grid(rng: &mut StdRng) -> Grid {
    Grid::from_fn(N, N, |p| {
        p != Point::new(0, 0) && p != Point::new(N - 1, N - 1) && rng.gen_bool(0.25)
    })
    .unwrap()
}

fn random_grids(count: usize) -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..count).map(|_| random_grid(&mut rng)).collect()
}

fn heuristic_bench(c: &mut Criterion) {
    let grids = random_grids(16);
    let start = Point::new(0, 0);
    let goal = Point::new(N - 1, N - 1);
    for heuristic in [Heuristic::Diagonal, Heuristic::Euclidean, Heuristic::Manhattan] {
        let config = SearchConfig::new(heuristic);
        c.bench_function(format!("{N}x{N} random, {heuristic:?}").as_str(), |b| {
            b.iter(|| {
                for grid in &grids {
                    black_box(astar(grid, start, goal, config));
                }
            })
        });
    }
}

fn heuristic_factor_bench(c: &mut Criterion) {
    let grids = random_grids(16);
    let start = Point::new(0, 0);
    let goal = Point::new(N - 1, N - 1);
    for factor in [0.0, 1.0, 1.5] {
        let config = SearchConfig::default().with_factor(factor);
        c.bench_function(format!("{N}x{N} random, factor {factor}").as_str(), |b| {
            b.iter(|| {
                for grid in &grids {
                    black_box(astar(grid, start, goal, config));
                }
            })
        });
    }
}

fn stepwise_bench(c: &mut Criterion) {
    let grids = random_grids(16);
    let start = Point::new(0, 0);
    let goal = Point::new(N - 1, N - 1);
    c.bench_function(format!("{N}x{N} random, stepwise").as_str(), |b| {
        b.iter(|| {
            let mut progress = 0usize;
            for grid in &grids {
                let mut driver = StepwiseDriver::new(grid, SearchConfig::default());
                let mut observer = |path: &[Vec2]| progress += path.len();
                driver.start(start, goal, &mut observer);
                while driver.resume(&mut observer) == Some(SearchStatus::Running) {}
            }
            black_box(progress)
        })
    });
}

criterion_group!(
    benches,
    heuristic_bench,
    heuristic_factor_bench,
    stepwise_bench
);
criterion_main!(benches);
