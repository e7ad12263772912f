//! Open and closed set bookkeeping for a single search.
//!
//! Every cell a search discovers gets one record in an insertion-ordered map, so a record's map
//! index doubles as its discovery order and parent links are plain indices into the same table.
//! The open set is a binary heap of map indices; a cell whose cost improves gets a fresh heap
//! entry and the outdated one is discarded when it surfaces.
use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

const NO_PARENT: usize = usize::MAX;

/// Per-cell search scratch: cost from the start, heuristic estimate to the goal and the
/// predecessor on the best known route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub g: i32,
    pub h: i32,
    parent: usize,
    closed: bool,
}

impl Node {
    pub fn f(&self) -> i32 {
        self.g + self.h
    }
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

struct SmallestCostHolder {
    estimated_cost: i32,
    cost: i32,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost
            && self.cost == other.cost
            && self.index == other.index
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest f first. On equal f the larger g has the smaller h and wins, after that the
        // cell discovered first.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Outcome of offering a cell a new route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relaxation {
    /// First time the cell was seen; it is now open.
    Opened,
    /// The cell was open and the new route is cheaper.
    Improved,
    /// The cell was open and the new route is no better.
    Unchanged,
    /// The cell is closed and cannot be revisited.
    Closed,
}

#[derive(Default)]
pub struct SearchState {
    nodes: FxIndexMap<Point, Node>,
    to_see: BinaryHeap<SmallestCostHolder>,
    open_count: usize,
}

impl SearchState {
    pub fn new() -> SearchState {
        SearchState::default()
    }

    pub fn with_capacity(capacity: usize) -> SearchState {
        SearchState {
            nodes: FxIndexMap::with_capacity_and_hasher(capacity, FxBuildHasher::default()),
            to_see: BinaryHeap::with_capacity(capacity),
            open_count: 0,
        }
    }

    /// Forgets every record so the state can back another search.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.to_see.clear();
        self.open_count = 0;
    }

    /// Offers `point` a route of cost `g` through the cell at map index `parent`. The heuristic
    /// is only evaluated when the cell is seen for the first time, since it does not depend on
    /// the route taken.
    pub fn relax<FH>(
        &mut self,
        point: Point,
        g: i32,
        parent: Option<usize>,
        heuristic: FH,
    ) -> Relaxation
    where
        FH: FnOnce() -> i32,
    {
        let parent = parent.unwrap_or(NO_PARENT);
        let (index, node) = match self.nodes.entry(point) {
            Vacant(e) => {
                let index = e.index();
                let node = *e.insert(Node {
                    g,
                    h: heuristic(),
                    parent,
                    closed: false,
                });
                self.open_count += 1;
                self.push(index, &node);
                return Relaxation::Opened;
            }
            Occupied(mut e) => {
                let index = e.index();
                let node = e.get_mut();
                if node.closed {
                    return Relaxation::Closed;
                }
                if g >= node.g {
                    return Relaxation::Unchanged;
                }
                node.g = g;
                node.parent = parent;
                (index, *node)
            }
        };
        self.push(index, &node);
        Relaxation::Improved
    }

    fn push(&mut self, index: usize, node: &Node) {
        self.to_see.push(SmallestCostHolder {
            estimated_cost: node.f(),
            cost: node.g,
            index,
        });
    }

    /// Moves the open cell with the lowest `f` to the closed set and returns its map index.
    pub fn pop_min(&mut self) -> Option<usize> {
        while let Some(SmallestCostHolder { cost, index, .. }) = self.to_see.pop() {
            let Some((_, node)) = self.nodes.get_index_mut(index) else {
                continue;
            };
            // Cells may sit in the heap several times if a cheaper route was found later;
            // only the entry matching the current cost counts.
            if node.closed || cost != node.g {
                continue;
            }
            node.closed = true;
            self.open_count -= 1;
            return Some(index);
        }
        None
    }

    pub fn index_of(&self, point: &Point) -> Option<usize> {
        self.nodes.get_index_of(point)
    }

    pub fn get_index(&self, index: usize) -> Option<(&Point, &Node)> {
        self.nodes.get_index(index)
    }

    pub fn node(&self, point: &Point) -> Option<&Node> {
        self.nodes.get(point)
    }

    pub fn g(&self, point: &Point) -> Option<i32> {
        self.node(point).map(|n| n.g)
    }

    pub fn h(&self, point: &Point) -> Option<i32> {
        self.node(point).map(|n| n.h)
    }

    pub fn f(&self, point: &Point) -> Option<i32> {
        self.node(point).map(Node::f)
    }

    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.nodes
            .get_index(index)
            .map(|(_, n)| n.parent)
            .filter(|&p| p != NO_PARENT)
    }

    pub fn parent(&self, point: &Point) -> Option<Point> {
        let index = self.index_of(point)?;
        let parent = self.parent_index(index)?;
        self.nodes.get_index(parent).map(|(p, _)| *p)
    }

    pub fn is_open(&self, point: &Point) -> bool {
        self.node(point).is_some_and(|n| !n.closed)
    }

    pub fn is_closed(&self, point: &Point) -> bool {
        self.node(point).is_some_and(|n| n.closed)
    }

    pub fn open_len(&self) -> usize {
        self.open_count
    }

    pub fn closed_len(&self) -> usize {
        self.nodes.len() - self.open_count
    }

    /// Number of cells ever opened, equal to the number of records.
    pub fn discovered(&self) -> usize {
        self.nodes.len()
    }

    /// All records in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&Point, &Node)> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(state: &mut SearchState, x: i32, g: i32, h: i32) -> Relaxation {
        state.relax(Point::new(x, 0), g, None, || h)
    }

    #[test]
    fn pops_lowest_f() {
        let mut state = SearchState::new();
        open(&mut state, 0, 10, 30);
        open(&mut state, 1, 5, 20);
        open(&mut state, 2, 0, 50);
        assert_eq!(state.pop_min(), Some(1));
        assert_eq!(state.pop_min(), Some(0));
        assert_eq!(state.pop_min(), Some(2));
        assert_eq!(state.pop_min(), None);
        assert_eq!(state.closed_len(), 3);
    }

    #[test]
    fn ties_prefer_lower_h_then_discovery_order() {
        let mut state = SearchState::new();
        open(&mut state, 0, 10, 30);
        open(&mut state, 1, 20, 20);
        open(&mut state, 2, 20, 20);
        open(&mut state, 3, 0, 40);
        assert_eq!(state.pop_min(), Some(1));
        assert_eq!(state.pop_min(), Some(2));
        assert_eq!(state.pop_min(), Some(0));
        assert_eq!(state.pop_min(), Some(3));
    }

    #[test]
    fn improvement_keeps_h_and_discovery_order() {
        let mut state = SearchState::new();
        let p = Point::new(4, 0);
        assert_eq!(open(&mut state, 9, 0, 100), Relaxation::Opened);
        assert_eq!(state.relax(p, 50, Some(0), || 20), Relaxation::Opened);
        assert_eq!(state.relax(p, 60, Some(0), || 0), Relaxation::Unchanged);
        assert_eq!(state.relax(p, 30, None, || 999), Relaxation::Improved);
        assert_eq!(state.g(&p), Some(30));
        assert_eq!(state.h(&p), Some(20));
        assert_eq!(state.f(&p), Some(50));
        assert_eq!(state.index_of(&p), Some(1));
        assert_eq!(state.parent(&p), None);
        assert_eq!(state.open_len(), 2);
        // The stale entry with g = 50 must not pop the cell twice
        assert_eq!(state.pop_min(), Some(1));
        assert_eq!(state.pop_min(), Some(0));
        assert_eq!(state.pop_min(), None);
    }

    #[test]
    fn closed_cells_are_final() {
        let mut state = SearchState::new();
        let p = Point::new(0, 0);
        open(&mut state, 0, 10, 0);
        assert_eq!(state.pop_min(), Some(0));
        assert!(state.is_closed(&p));
        assert!(!state.is_open(&p));
        assert_eq!(state.relax(p, 0, None, || 0), Relaxation::Closed);
        assert_eq!(state.g(&p), Some(10));
    }

    #[test]
    fn parents_resolve_through_indices() {
        let mut state = SearchState::new();
        let a = Point::new(0, 0);
        let b = Point::new(1, 1);
        state.relax(a, 0, None, || 0);
        state.relax(b, 14, Some(0), || 0);
        assert_eq!(state.parent(&b), Some(a));
        assert_eq!(state.parent_index(1), Some(0));
        assert_eq!(state.parent_index(0), None);
        state.clear();
        assert_eq!(state.discovered(), 0);
        assert_eq!(state.pop_min(), None);
    }
}
