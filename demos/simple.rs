use grid_astar::{astar, Grid, Point, SearchConfig};

// In this example a path is found on a grid with shape
// S.#..
// .##.#
// ...#.
// .#...
// ....E
// S marks the start
// E marks the end
fn main() {
    let grid: Grid = "..#..\n.##.#\n...#.\n.#...\n....."
        .parse()
        .expect("valid grid");
    let start = Point::new(0, 0);
    let end = Point::new(4, 4);
    let result = astar(&grid, start, end, SearchConfig::default());
    if result.found() {
        println!("A path with cost {:?} has been found:", result.cost);
        for p in result.path {
            println!("{:?}", p);
        }
    } else {
        println!("No path exists");
    }
}
