use crate::error::GridError;
use core::fmt;
use glam::Vec2;
use grid_util::point::Point;
use itertools::iproduct;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::str::FromStr;

/// Upper bound on the number of neighbours a cell can have on an 8-connected grid.
pub const N_SMALLVEC_SIZE: usize = 8;

/// Describes how a grid is laid over world space. Cell `(x, y)` is centred on
/// `origin + (x, y) * cell_spacing` and is probed with a sphere of `probe_radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub cell_spacing: f32,
    pub probe_radius: f32,
    pub origin: Vec2,
}

impl GridConfig {
    /// Unit-spaced grid at the world origin, probing half a cell around each centre.
    pub fn new(width: i32, height: i32) -> GridConfig {
        GridConfig {
            width,
            height,
            cell_spacing: 1.0,
            probe_radius: 0.5,
            origin: Vec2::ZERO,
        }
    }

    /// Derives the dimensions from the extent of the area to cover, so a `scale` of 10x5 world
    /// units with a spacing of 0.5 gives a 20x10 grid.
    pub fn from_scale(scale: Vec2, cell_spacing: f32) -> GridConfig {
        let dims = (scale / cell_spacing).round();
        GridConfig::new(dims.x as i32, dims.y as i32).with_spacing(cell_spacing)
    }

    /// Sets the spacing and resets the probe radius to half of it.
    pub fn with_spacing(mut self, cell_spacing: f32) -> GridConfig {
        self.cell_spacing = cell_spacing;
        self.probe_radius = cell_spacing * 0.5;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> GridConfig {
        self.origin = origin;
        self
    }
}

/// A single grid cell. Only static data lives here; per-search costs are kept by the
/// [SearchState](crate::search::SearchState) so that a [Grid] never changes after it is built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub point: Point,
    pub world_position: Vec2,
    pub is_wall: bool,
}

impl Cell {
    pub fn x(&self) -> i32 {
        self.point.x
    }
    pub fn y(&self) -> i32 {
        self.point.y
    }
}

/// [Grid] is a fixed-size row-major array of [Cell]s together with the mapping between world
/// space and grid coordinates. Connected components of walkable cells are computed once on
/// construction using a [UnionFind] structure, so reachability can be queried without searching.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_spacing: f32,
    origin: Vec2,
    cells: Vec<Cell>,
    components: UnionFind<usize>,
}

impl Grid {
    /// Builds a grid by asking `is_blocked` once for every cell centre whether the world is
    /// blocked within `config.probe_radius` of it.
    pub fn build<F>(config: &GridConfig, mut is_blocked: F) -> Result<Grid, GridError>
    where
        F: FnMut(Vec2, f32) -> bool,
    {
        if config.width <= 0 || config.height <= 0 {
            return Err(GridError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        if !config.cell_spacing.is_finite() || config.cell_spacing <= 0.0 {
            return Err(GridError::InvalidSpacing(config.cell_spacing));
        }
        let w = config.width as usize;
        let h = config.height as usize;
        let cells = iproduct!(0..h, 0..w)
            .map(|(y, x)| {
                let world_position =
                    config.origin + Vec2::new(x as f32, y as f32) * config.cell_spacing;
                Cell {
                    point: Point::new(x as i32, y as i32),
                    world_position,
                    is_wall: is_blocked(world_position, config.probe_radius),
                }
            })
            .collect::<Vec<Cell>>();
        let mut grid = Grid {
            width: w,
            height: h,
            cell_spacing: config.cell_spacing,
            origin: config.origin,
            cells,
            components: UnionFind::new(w * h),
        };
        grid.generate_components();
        info!(
            "Built {}x{} grid with {} walls",
            grid.width,
            grid.height,
            grid.wall_count()
        );
        Ok(grid)
    }

    /// Builds a unit-spaced grid at the world origin from a predicate on grid coordinates.
    pub fn from_fn<F>(width: i32, height: i32, mut blocked: F) -> Result<Grid, GridError>
    where
        F: FnMut(Point) -> bool,
    {
        Grid::build(&GridConfig::new(width, height), |pos, _| {
            blocked(Point::new(pos.x as i32, pos.y as i32))
        })
    }

    /// Returns the cell closest to a world position. Positions outside the grid are clamped to
    /// the nearest border cell rather than rejected.
    pub fn cell_at(&self, world: Vec2) -> &Cell {
        let local = (world - self.origin) / self.cell_spacing;
        let x = (local.x.round_ties_even() as i32).clamp(0, self.width as i32 - 1);
        let y = (local.y.round_ties_even() as i32).clamp(0, self.height as i32 - 1);
        &self.cells[self.get_ix(x, y)]
    }

    /// The in-bounds cells at Chebyshev distance 1, walls included. The order is fixed: `dx`
    /// outer and `dy` inner, each running from -1 to 1.
    pub fn neighbors(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        iproduct!(-1i32..=1, -1i32..=1)
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.in_bounds(p))
            .collect()
    }

    pub fn cell(&self, point: &Point) -> Option<&Cell> {
        if self.in_bounds(point) {
            Some(&self.cells[self.get_ix_point(point)])
        } else {
            None
        }
    }

    /// Points off the grid are not walls, but they cannot be moved to either.
    pub fn is_wall(&self, point: &Point) -> bool {
        self.cell(point).is_some_and(|c| c.is_wall)
    }

    /// Whether a point lies on the grid and is not a wall.
    pub fn can_move_to(&self, point: &Point) -> bool {
        self.cell(point).is_some_and(|c| !c.is_wall)
    }

    pub fn in_bounds(&self, point: &Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    /// World position of a cell centre. Also defined for points off the grid.
    pub fn world_position(&self, point: &Point) -> Vec2 {
        self.origin + Vec2::new(point.x as f32, point.y as f32) * self.cell_spacing
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_spacing(&self) -> f32 {
        self.cell_spacing
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_wall).count()
    }

    fn get_ix(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    pub(crate) fn get_ix_point(&self, point: &Point) -> usize {
        self.get_ix(point.x, point.y)
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.in_bounds(point)
            .then(|| self.components.find(self.get_ix_point(point)))
    }

    /// Checks if a walkable path connects start and goal. Walls each form their own component, so
    /// a wall is only reachable from itself.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        if !self.in_bounds(start) || !self.in_bounds(goal) {
            return false;
        }
        start == goal
            || self
                .components
                .equiv(self.get_ix_point(start), self.get_ix_point(goal))
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }

    /// Links up walkable 8-neighbours into the same components. Each cell only looks forward
    /// (east, south-east, south, north-east) since unions are symmetric.
    fn generate_components(&mut self) {
        let mut components = UnionFind::new(self.len());
        for cell in self.cells.iter().filter(|c| !c.is_wall) {
            let p = cell.point;
            let parent_ix = self.get_ix_point(&p);
            [
                Point::new(p.x + 1, p.y),
                Point::new(p.x + 1, p.y + 1),
                Point::new(p.x, p.y + 1),
                Point::new(p.x + 1, p.y - 1),
            ]
            .iter()
            .filter(|n| self.can_move_to(n))
            .for_each(|n| {
                components.union(parent_ix, self.get_ix_point(n));
            });
        }
        self.components = components;
        debug!("Generated connected components for {} cells", self.len());
    }
}

impl fmt::Display for Grid {
    /// Renders one line per row starting at `y = 0`, `#` for walls and `.` for open cells. The
    /// output parses back with [FromStr].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line = row
                .iter()
                .map(|c| if c.is_wall { '#' } else { '.' })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parses a unit-spaced grid from rows of `#` (wall) and `.` (open). Blank lines and
    /// surrounding whitespace are ignored; the first row is `y = 0`.
    fn from_str(s: &str) -> Result<Grid, GridError> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut walls = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridError::RaggedRows {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, tile) in row.chars().enumerate() {
                match tile {
                    '#' => walls.push(true),
                    '.' => walls.push(false),
                    _ => return Err(GridError::UnknownTile { tile, x, y }),
                }
            }
        }
        Grid::from_fn(width as i32, rows.len() as i32, |p| {
            walls[p.y as usize * width + p.x as usize]
        })
    }
}
