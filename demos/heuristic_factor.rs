use grid_astar::{astar, Grid, Heuristic, Point, SearchConfig};

// The heuristic_factor can be set to scale the heuristic, causing nodes that are closer to the
// goal (ignoring obstacles) to be evaluated sooner than in normal operation. This is called
// Weighted A* and it can speed up the algorithm in certain scenarios.

fn main() {
    const N: i32 = 30;
    let grid = Grid::from_fn(N, N, |p| {
        let in_block = |x0: i32, y0: i32, w: i32, h: i32| {
            p.x >= x0 && p.x < x0 + w && p.y >= y0 && p.y < y0 + h
        };
        in_block(8, 8, 8, 8) || in_block(0, 3, 6, 6) || in_block(10, 0, 6, 6)
    })
    .expect("valid grid");
    println!("{}", grid);
    let start = Point::new(1, 1);
    let end = Point::new(N - 3, N - 3);
    for heuristic in [Heuristic::Diagonal, Heuristic::Euclidean, Heuristic::Manhattan] {
        for factor in [0.0, 1.0, 1.3] {
            let config = SearchConfig::new(heuristic).with_factor(factor);
            let result = astar(&grid, start, end, config);
            println!(
                "{:?} x {}: cost {:?}, {} cells expanded",
                heuristic, factor, result.cost, result.expanded
            );
        }
    }
}
