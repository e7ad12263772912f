use crate::grid::Grid;
use crate::heuristic::step_cost;
use crate::search::SearchState;
use glam::Vec2;
use grid_util::point::Point;
use itertools::Itertools;

/// Follows parent links from `goal` back to `start` and returns the cells in travel order,
/// excluding `start` and including `goal`. A missing goal (failed search) gives an empty path.
///
/// # Panics
///
/// If the chain of parents does not arrive at `start` within `limit` steps, or breaks off
/// before reaching it. Both mean the search state is corrupted.
pub fn reconstruct(
    state: &SearchState,
    start: &Point,
    goal: Option<Point>,
    limit: usize,
) -> Vec<Point> {
    let Some(goal) = goal else {
        return Vec::new();
    };
    let mut path = Vec::new();
    let mut current = goal;
    while current != *start {
        if path.len() >= limit {
            panic!(
                "parent chain from {} does not reach {} within {} steps",
                goal, start, limit
            );
        }
        path.push(current);
        current = match state.parent(&current) {
            Some(parent) => parent,
            None => panic!("parent chain from {} breaks off at {}", goal, current),
        };
    }
    path.reverse();
    path
}

/// Sums the step costs along `path`, which is expected to continue from `start`.
pub fn path_cost(start: &Point, path: &[Point]) -> i32 {
    std::iter::once(start)
        .chain(path)
        .tuple_windows()
        .map(|(a, b)| step_cost(a, b))
        .sum()
}

/// Checks that every cell of `path` is walkable and one move away from the cell before it,
/// the first one being adjacent to `start`.
pub fn is_valid(grid: &Grid, start: &Point, path: &[Point]) -> bool {
    path.iter().all(|p| grid.can_move_to(p))
        && std::iter::once(start)
            .chain(path)
            .tuple_windows()
            .all(|(a, b)| a != b && (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1)
}

/// World positions of the cell centres along a path.
pub fn to_world(grid: &Grid, path: &[Point]) -> Vec<Vec2> {
    path.iter().map(|p| grid.world_position(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DIAGONAL_COST, STRAIGHT_COST};

    fn chain(points: &[(i32, i32)]) -> (SearchState, Vec<Point>) {
        let mut state = SearchState::new();
        let points = points
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect::<Vec<_>>();
        for (i, p) in points.iter().enumerate() {
            let parent = i.checked_sub(1);
            state.relax(*p, 0, parent, || 0);
        }
        (state, points)
    }

    #[test]
    fn walks_back_and_reverses() {
        let (state, points) = chain(&[(0, 0), (1, 1), (2, 1), (3, 2)]);
        let path = reconstruct(&state, &points[0], Some(points[3]), 16);
        assert_eq!(path, points[1..].to_vec());
    }

    #[test]
    fn failed_search_gives_empty_path() {
        let (state, points) = chain(&[(0, 0), (1, 1)]);
        assert!(reconstruct(&state, &points[0], None, 16).is_empty());
        assert!(reconstruct(&state, &points[0], Some(points[0]), 16).is_empty());
    }

    #[test]
    #[should_panic(expected = "breaks off")]
    fn broken_chain_panics() {
        let (state, points) = chain(&[(0, 0), (1, 1)]);
        reconstruct(&state, &Point::new(5, 5), Some(points[1]), 16);
    }

    #[test]
    #[should_panic(expected = "within 2 steps")]
    fn overlong_chain_panics() {
        let (state, points) = chain(&[(0, 0), (1, 0), (2, 0), (3, 0)]);
        reconstruct(&state, &points[0], Some(points[3]), 2);
    }

    #[test]
    fn costs_along_path() {
        let start = Point::new(0, 0);
        let path = [Point::new(1, 1), Point::new(2, 1), Point::new(2, 2)];
        assert_eq!(path_cost(&start, &path), DIAGONAL_COST + 2 * STRAIGHT_COST);
        assert_eq!(path_cost(&start, &[]), 0);
    }

    #[test]
    fn validity() {
        let grid: Grid = "..#\n...".parse().unwrap();
        let start = Point::new(0, 0);
        assert!(is_valid(&grid, &start, &[Point::new(1, 1), Point::new(2, 1)]));
        assert!(!is_valid(&grid, &start, &[Point::new(1, 0), Point::new(2, 0)]));
        assert!(!is_valid(&grid, &start, &[Point::new(2, 1)]));
    }

    #[test]
    fn world_projection() {
        let config = crate::GridConfig::new(4, 4).with_spacing(0.5);
        let grid = Grid::build(&config, |_, _| false).unwrap();
        let world = to_world(&grid, &[Point::new(1, 0), Point::new(2, 3)]);
        assert_eq!(world, vec![Vec2::new(0.5, 0.0), Vec2::new(1.0, 1.5)]);
    }
}
