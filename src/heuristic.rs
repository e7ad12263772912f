use grid_util::point::Point;

use crate::{DIAGONAL_COST, STRAIGHT_COST};

/// Estimate of the remaining cost between two cells, in the same units as the step costs
/// ([STRAIGHT_COST] for a cardinal move, [DIAGONAL_COST] for a diagonal one).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// Sum of the axis distances. Overestimates whenever a diagonal shortcut exists, so paths
    /// found with it are not guaranteed to be optimal on an 8-connected grid.
    Manhattan,
    /// Straight-line distance rounded to whole cells.
    Euclidean,
    /// Octile distance: as many diagonal steps as possible, then straight ones. Equals the true
    /// cost on a grid without walls.
    #[default]
    Diagonal,
}

impl Heuristic {
    pub fn estimate(&self, from: &Point, to: &Point) -> i32 {
        let delta_x = (from.x - to.x).abs();
        let delta_y = (from.y - to.y).abs();
        match self {
            Heuristic::Manhattan => (delta_x + delta_y) * STRAIGHT_COST,
            Heuristic::Euclidean => {
                let dist = ((delta_x * delta_x + delta_y * delta_y) as f64).sqrt();
                dist.round() as i32 * STRAIGHT_COST
            }
            Heuristic::Diagonal => {
                let short = delta_x.min(delta_y);
                let long = delta_x.max(delta_y);
                DIAGONAL_COST * short + STRAIGHT_COST * (long - short)
            }
        }
    }

    /// [estimate](Self::estimate) scaled by a weight, as used by weighted A*.
    pub fn weighted(&self, from: &Point, to: &Point, factor: f32) -> i32 {
        let h = self.estimate(from, to);
        if factor == 1.0 {
            h
        } else {
            (h as f32 * factor) as i32
        }
    }
}

/// Cost of a single move between two adjacent cells.
pub fn step_cost(from: &Point, to: &Point) -> i32 {
    debug_assert!((from.x - to.x).abs() <= 1 && (from.y - to.y).abs() <= 1);
    if from.x == to.x || from.y == to.y {
        STRAIGHT_COST
    } else {
        DIAGONAL_COST
    }
}
