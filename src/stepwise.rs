use crate::grid::Grid;
use crate::path::to_world;
use crate::search::{AStarSearch, SearchConfig, SearchStatus, Step};
use glam::Vec2;
use grid_util::point::Point;
use log::{debug, warn};

/// Receives the results of a search, typically to draw them.
pub trait PathObserver {
    /// Called once per finished search with the cell centres from just after the start up to
    /// the goal. Empty if no path exists.
    fn on_path_updated(&mut self, path: &[Vec2]);

    /// Called for every cell a stepwise search opens, in discovery order.
    fn on_progress(&mut self, _position: Vec2) {}

    /// Called when a new stepwise search starts, so progress from an earlier one can be removed.
    fn on_progress_cleared(&mut self) {}
}

impl<F> PathObserver for F
where
    F: FnMut(&[Vec2]),
{
    fn on_path_updated(&mut self, path: &[Vec2]) {
        self(path)
    }
}

struct ActiveSearch<'g> {
    search: AStarSearch<'g>,
    reported: bool,
}

/// Runs one search at a time in small increments. Each [resume](Self::resume) advances the
/// search to the next cell it opens and reports that cell, so exploration can be spread over
/// timer ticks. Starting a search replaces whatever was in flight.
pub struct StepwiseDriver<'g> {
    grid: &'g Grid,
    config: SearchConfig,
    active: Option<ActiveSearch<'g>>,
}

impl<'g> StepwiseDriver<'g> {
    pub fn new(grid: &'g Grid, config: SearchConfig) -> StepwiseDriver<'g> {
        StepwiseDriver {
            grid,
            config,
            active: None,
        }
    }

    pub fn start<O: PathObserver>(&mut self, start: Point, goal: Point, observer: &mut O) {
        if self.is_running() {
            warn!("Discarding unfinished search for a new one from {} to {}", start, goal);
        }
        observer.on_progress_cleared();
        self.active = Some(ActiveSearch {
            search: AStarSearch::new(self.grid, start, goal, self.config),
            reported: false,
        });
    }

    /// Like [start](Self::start), resolving the world positions with [Grid::cell_at].
    pub fn start_world<O: PathObserver>(&mut self, start: Vec2, goal: Vec2, observer: &mut O) {
        let start = self.grid.cell_at(start).point;
        let goal = self.grid.cell_at(goal).point;
        self.start(start, goal, observer);
    }

    /// Advances the current search by one opened cell. When the search finishes, the path is
    /// reported once and later calls only return the final status. Returns [None] if no search
    /// was started.
    pub fn resume<O: PathObserver>(&mut self, observer: &mut O) -> Option<SearchStatus> {
        let grid = self.grid;
        let active = self.active.as_mut()?;
        match active.search.step() {
            Step::Opened(point) => {
                observer.on_progress(grid.world_position(&point));
                Some(SearchStatus::Running)
            }
            Step::Succeeded | Step::Failed => {
                if !active.reported {
                    active.reported = true;
                    let path = active.search.path();
                    debug!(
                        "Stepwise search finished: {:?}, {} cells in path",
                        active.search.status(),
                        path.len()
                    );
                    observer.on_path_updated(&to_world(grid, &path));
                }
                Some(active.search.status())
            }
        }
    }

    /// Resumes until the current search finishes.
    pub fn run_to_end<O: PathObserver>(&mut self, observer: &mut O) -> Option<SearchStatus> {
        loop {
            match self.resume(observer)? {
                SearchStatus::Running => continue,
                status => return Some(status),
            }
        }
    }

    /// Drops the current search without reporting a path.
    pub fn cancel(&mut self) {
        if self.active.take().is_some_and(|a| !a.reported) {
            debug!("Cancelled unfinished search");
        }
    }

    /// Status of the current search, or [None] if there is none.
    pub fn status(&self) -> Option<SearchStatus> {
        self.active.as_ref().map(|a| a.search.status())
    }

    /// Whether a search is in flight and has not reported its path yet.
    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.reported)
    }

    pub fn search(&self) -> Option<&AStarSearch<'g>> {
        self.active.as_ref().map(|a| &a.search)
    }
}
