use crate::grid::Grid;
use crate::path::to_world;
use crate::search::{astar, SearchConfig, SearchResult};
use crate::stepwise::{PathObserver, StepwiseDriver};
use glam::Vec2;
use grid_util::point::Point;
use log::{debug, info};

/// [Pathfinder] owns a [Grid] and answers path queries posed in world coordinates. It remembers
/// the last query handed to [update](Self::update) so that a caller polling every frame only
/// pays for a search when the endpoints actually move.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    grid: Grid,
    config: SearchConfig,
    last_query: Option<(Vec2, Vec2)>,
}

impl Pathfinder {
    pub fn new(grid: Grid, config: SearchConfig) -> Pathfinder {
        Pathfinder {
            grid,
            config,
            last_query: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Changes the search settings. The next [update](Self::update) searches again even if the
    /// endpoints did not move.
    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Forgets the last query.
    pub fn invalidate(&mut self) {
        self.last_query = None;
    }

    /// The cells the two world positions resolve to.
    pub fn resolve(&self, start: Vec2, end: Vec2) -> (Point, Point) {
        (self.grid.cell_at(start).point, self.grid.cell_at(end).point)
    }

    /// Searches a path between two world positions.
    pub fn find_path(&self, start: Vec2, end: Vec2) -> SearchResult {
        let (start, goal) = self.resolve(start, end);
        astar(&self.grid, start, goal, self.config)
    }

    /// Searches and reports the path to `observer`, unless the positions equal those of the
    /// previous call. Returns whether a search was run.
    pub fn update<O: PathObserver>(&mut self, start: Vec2, end: Vec2, observer: &mut O) -> bool {
        if self.last_query == Some((start, end)) {
            return false;
        }
        self.last_query = Some((start, end));
        let result = self.find_path(start, end);
        if result.found() {
            info!(
                "Path of {} cells with cost {:?} after expanding {} cells",
                result.path.len(),
                result.cost,
                result.expanded
            );
        } else {
            debug!("No path between {} and {}", start, end);
        }
        observer.on_path_updated(&to_world(&self.grid, &result.path));
        true
    }

    /// A driver for exploring searches over this grid incrementally.
    pub fn stepwise(&self) -> StepwiseDriver<'_> {
        StepwiseDriver::new(&self.grid, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Heuristic;

    fn pathfinder() -> Pathfinder {
        let grid: Grid = "....\n.##.\n....".parse().unwrap();
        Pathfinder::new(grid, SearchConfig::default())
    }

    #[test]
    fn update_skips_repeated_queries() {
        let mut pathfinder = pathfinder();
        let mut reported = Vec::new();
        let mut observer = |path: &[Vec2]| reported.push(path.to_vec());
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 2.0);
        assert!(pathfinder.update(a, b, &mut observer));
        assert!(!pathfinder.update(a, b, &mut observer));
        assert!(pathfinder.update(a, Vec2::new(3.0, 1.9), &mut observer));
        pathfinder.set_config(SearchConfig::new(Heuristic::Euclidean));
        assert!(pathfinder.update(a, Vec2::new(3.0, 1.9), &mut observer));
        assert_eq!(reported.len(), 3);
        assert_eq!(reported[0].last(), Some(&b));
        assert_eq!(reported[0], reported[1]);
    }

    #[test]
    fn resolves_and_clamps_query_points() {
        let pathfinder = pathfinder();
        let (start, goal) = pathfinder.resolve(Vec2::new(-5.0, -5.0), Vec2::new(9.0, 0.2));
        assert_eq!(start, Point::new(0, 0));
        assert_eq!(goal, Point::new(3, 0));
        let result = pathfinder.find_path(Vec2::new(-5.0, -5.0), Vec2::new(9.0, 0.2));
        assert!(result.found());
        assert_eq!(result.cost, Some(30));
    }

    #[test]
    fn stepwise_matches_direct_search() {
        let pathfinder = pathfinder();
        let a = Vec2::new(0.0, 2.0);
        let b = Vec2::new(3.0, 0.0);
        let direct = pathfinder.find_path(a, b);
        let mut driver = pathfinder.stepwise();
        let mut paths = Vec::new();
        let mut observer = |path: &[Vec2]| paths.push(path.to_vec());
        driver.start_world(a, b, &mut observer);
        driver.run_to_end(&mut observer);
        assert_eq!(paths, vec![to_world(pathfinder.grid(), &direct.path)]);
    }
}
