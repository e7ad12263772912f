//! A* over a [Grid], written as a resumable state machine.
//!
//! [AStarSearch::step] advances the search until it either opens a cell it had not seen before
//! or terminates, so a caller can interleave exploration with other work.
//! [AStarSearch::run] simply steps until the search is finished, which keeps the synchronous
//! and the stepwise search on exactly the same sequence of states.
pub mod state;

use crate::grid::{Grid, N_SMALLVEC_SIZE};
use crate::heuristic::{step_cost, Heuristic};
use crate::path::reconstruct;
use glam::Vec2;
use grid_util::point::Point;
use log::{debug, info, trace, warn};
use smallvec::SmallVec;

pub use state::{Node, Relaxation, SearchState};

/// Tunables of a search. The default is an unweighted search with the [Heuristic::Diagonal]
/// heuristic, which finds optimal paths.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    /// Scales the heuristic. Values above 1.0 give weighted A*, which usually expands fewer
    /// cells but may return a longer path.
    pub heuristic_factor: f32,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            heuristic: Heuristic::Diagonal,
            heuristic_factor: 1.0,
        }
    }
}

impl SearchConfig {
    pub fn new(heuristic: Heuristic) -> SearchConfig {
        SearchConfig {
            heuristic,
            ..SearchConfig::default()
        }
    }

    pub fn with_factor(mut self, heuristic_factor: f32) -> SearchConfig {
        self.heuristic_factor = heuristic_factor;
        self
    }

    fn estimate(&self, from: &Point, to: &Point) -> i32 {
        self.heuristic.weighted(from, to, self.heuristic_factor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    Running,
    Succeeded,
    Failed,
}

impl SearchStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, SearchStatus::Running)
    }
}

/// What a single call to [AStarSearch::step] ended on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A cell entered the open set for the first time.
    Opened(Point),
    Succeeded,
    Failed,
}

/// The cell currently being expanded and how far its neighbourhood has been processed.
struct Expansion {
    index: usize,
    point: Point,
    g: i32,
    neighbours: SmallVec<[Point; N_SMALLVEC_SIZE]>,
    next: usize,
}

pub struct AStarSearch<'g> {
    grid: &'g Grid,
    start: Point,
    goal: Point,
    config: SearchConfig,
    state: SearchState,
    expansion: Option<Expansion>,
    status: SearchStatus,
    goal_index: Option<usize>,
}

impl<'g> AStarSearch<'g> {
    /// Prepares a search from `start` to `goal` with only the start cell open. A start or goal
    /// outside the grid yields a search that has already failed.
    pub fn new(
        grid: &'g Grid,
        start: Point,
        goal: Point,
        config: SearchConfig,
    ) -> AStarSearch<'g> {
        let mut search = AStarSearch {
            grid,
            start,
            goal,
            config,
            state: SearchState::with_capacity(grid.len()),
            expansion: None,
            status: SearchStatus::Running,
            goal_index: None,
        };
        if !grid.in_bounds(&start) || !grid.in_bounds(&goal) {
            warn!("Search from {} to {} leaves the grid", start, goal);
            search.status = SearchStatus::Failed;
            return search;
        }
        info!("Searching path from {} to {}", start, goal);
        let h = config.estimate(&start, &goal);
        search.state.relax(start, 0, None, || h);
        search
    }

    /// Resolves both world positions to their cells first, see [Grid::cell_at].
    pub fn from_world(
        grid: &'g Grid,
        start: Vec2,
        goal: Vec2,
        config: SearchConfig,
    ) -> AStarSearch<'g> {
        let start = grid.cell_at(start).point;
        let goal = grid.cell_at(goal).point;
        AStarSearch::new(grid, start, goal, config)
    }

    /// Advances to the next newly opened cell, or to the end of the search. Once the search has
    /// finished this keeps returning the final outcome.
    pub fn step(&mut self) -> Step {
        while self.status == SearchStatus::Running {
            let next = self.expansion.as_mut().and_then(|e| {
                let neighbour = *e.neighbours.get(e.next)?;
                e.next += 1;
                Some((e.index, e.point, e.g, neighbour))
            });
            match next {
                Some((parent, from, g, neighbour)) => {
                    if self.relax(parent, &from, g, neighbour) == Relaxation::Opened {
                        return Step::Opened(neighbour);
                    }
                }
                None => self.expand_next(),
            }
        }
        match self.status {
            SearchStatus::Succeeded => Step::Succeeded,
            _ => Step::Failed,
        }
    }

    /// Runs the search to completion.
    pub fn run(&mut self) -> SearchStatus {
        while let Step::Opened(_) = self.step() {}
        self.status
    }

    fn relax(&mut self, parent: usize, from: &Point, g: i32, neighbour: Point) -> Relaxation {
        if !self.grid.can_move_to(&neighbour) {
            return Relaxation::Unchanged;
        }
        let config = self.config;
        let goal = self.goal;
        self.state.relax(
            neighbour,
            g + step_cost(from, &neighbour),
            Some(parent),
            || config.estimate(&neighbour, &goal),
        )
    }

    /// Closes the most promising open cell and queues its neighbourhood, or finishes the search.
    fn expand_next(&mut self) {
        self.expansion = None;
        let Some(index) = self.state.pop_min() else {
            warn!(
                "No path from {} to {} after expanding {} cells",
                self.start,
                self.goal,
                self.expanded()
            );
            self.status = SearchStatus::Failed;
            return;
        };
        let Some((&point, &node)) = self.state.get_index(index) else {
            self.status = SearchStatus::Failed;
            return;
        };
        trace!("Expanding {} (g: {}, h: {})", point, node.g, node.h);
        if point == self.goal {
            debug!(
                "Reached {} with cost {} after expanding {} cells",
                point,
                node.g,
                self.expanded()
            );
            self.goal_index = Some(index);
            self.status = SearchStatus::Succeeded;
            return;
        }
        self.expansion = Some(Expansion {
            index,
            point,
            g: node.g,
            neighbours: self.grid.neighbors(&point),
            next: 0,
        });
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The goal once it has been reached.
    pub fn goal_reached(&self) -> Option<Point> {
        self.goal_index.map(|_| self.goal)
    }

    /// Cost of the path to the goal once it has been reached.
    pub fn cost(&self) -> Option<i32> {
        self.goal_index
            .and_then(|ix| self.state.get_index(ix))
            .map(|(_, node)| node.g)
    }

    /// Number of cells moved to the closed set so far.
    pub fn expanded(&self) -> usize {
        self.state.closed_len()
    }

    /// The path found so far: empty unless the search succeeded.
    pub fn path(&self) -> Vec<Point> {
        reconstruct(&self.state, &self.start, self.goal_reached(), self.grid.len())
    }

    pub fn result(&self) -> SearchResult {
        SearchResult {
            status: self.status,
            path: self.path(),
            cost: self.cost(),
            expanded: self.expanded(),
        }
    }
}

/// Outcome of a finished search. The path runs from the cell after the start up to and
/// including the goal, so it is empty both when no path exists and when start equals goal;
/// [status](Self::status) tells the two apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub status: SearchStatus,
    pub path: Vec<Point>,
    pub cost: Option<i32>,
    pub expanded: usize,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.status == SearchStatus::Succeeded
    }
}

/// Runs a complete search from `start` to `goal`.
pub fn astar(grid: &Grid, start: Point, goal: Point, config: SearchConfig) -> SearchResult {
    let mut search = AStarSearch::new(grid, start, goal, config);
    search.run();
    search.result()
}
