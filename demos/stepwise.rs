use grid_astar::{Grid, GridConfig, PathObserver, Pathfinder, SearchConfig, SearchStatus, Vec2};

// Samples a grid from a world-space obstacle (a disc), then explores a search one opened cell
// per "tick" and draws the explored area and the final path.

struct Canvas {
    width: usize,
    height: usize,
    spacing: f32,
    tiles: Vec<char>,
}

impl Canvas {
    fn plot(&mut self, position: Vec2, tile: char) {
        let x = (position.x / self.spacing).round() as usize;
        let y = (position.y / self.spacing).round() as usize;
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = tile;
        }
    }

    fn show(&self) {
        for row in self.tiles.chunks(self.width).rev() {
            println!("{}", row.iter().collect::<String>());
        }
    }
}

impl PathObserver for Canvas {
    fn on_path_updated(&mut self, path: &[Vec2]) {
        for p in path {
            self.plot(*p, '*');
        }
    }

    fn on_progress(&mut self, position: Vec2) {
        self.plot(position, 'o');
    }

    fn on_progress_cleared(&mut self) {
        self.tiles.iter_mut().filter(|t| **t == 'o').for_each(|t| *t = '.');
    }
}

fn main() {
    let config = GridConfig::from_scale(Vec2::new(12.0, 8.0), 0.5);
    let centre = Vec2::new(6.0, 4.0);
    let grid = Grid::build(&config, |pos, radius| pos.distance(centre) < 2.0 + radius)
        .expect("valid grid");
    let mut canvas = Canvas {
        width: grid.width(),
        height: grid.height(),
        spacing: grid.cell_spacing(),
        tiles: grid
            .cells()
            .iter()
            .map(|c| if c.is_wall { '#' } else { '.' })
            .collect(),
    };

    let pathfinder = Pathfinder::new(grid, SearchConfig::default());
    let mut driver = pathfinder.stepwise();
    driver.start_world(Vec2::new(1.0, 4.0), Vec2::new(11.0, 4.5), &mut canvas);
    let mut ticks = 0;
    while driver.resume(&mut canvas) == Some(SearchStatus::Running) {
        ticks += 1;
    }
    println!("Search finished after {} ticks: {:?}", ticks, driver.status());
    canvas.show();
}
