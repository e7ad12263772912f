//! # grid_astar
//!
//! Shortest paths on static, 8-connected grids using
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm). A [Grid] is sampled once from a
//! world-space "is this point blocked" predicate and stays fixed afterwards; every search keeps
//! its own [SearchState], so the grid can be shared freely between searches.
//!
//! Straight moves cost [STRAIGHT_COST] and diagonal moves [DIAGONAL_COST], an integer
//! approximation of `STRAIGHT_COST * sqrt(2)`. The [Heuristic] used to guide the search can be
//! chosen per search through [SearchConfig].
//!
//! Searches either run to completion ([astar], [Pathfinder::find_path]) or are advanced one
//! newly opened cell at a time ([AStarSearch::step], [StepwiseDriver]), which lets a caller
//! visualise the exploration as it happens. Both produce the same path.
//!
//! ```
//! use grid_astar::{astar, Grid, Point, SearchConfig};
//!
//! let grid: Grid = "....\n.##.\n....".parse().unwrap();
//! let result = astar(&grid, Point::new(0, 1), Point::new(3, 1), SearchConfig::default());
//! assert!(result.found());
//! assert_eq!(result.path.last(), Some(&Point::new(3, 1)));
//! ```
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod path;
pub mod pathfinder;
pub mod search;
pub mod stepwise;

pub use error::GridError;
pub use glam::Vec2;
pub use grid::{Cell, Grid, GridConfig};
pub use grid_util::point::Point;
pub use heuristic::Heuristic;
pub use path::{path_cost, reconstruct};
pub use pathfinder::Pathfinder;
pub use search::{astar, AStarSearch, SearchConfig, SearchResult, SearchState, SearchStatus, Step};
pub use stepwise::{PathObserver, StepwiseDriver};

/// Cost of a move along a row or column.
pub const STRAIGHT_COST: i32 = 10;
/// Cost of a diagonal move.
pub const DIAGONAL_COST: i32 = 14;
