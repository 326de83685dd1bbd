//! Breadth-first routing over walkable cells.
//!
//! The [`PathGraph`] is built once per level from its [`GridMap`]. The
//! [`Pathfinder`] answers "which cell do I step to next" queries and memoizes
//! every answer for as long as it lives. A level owns its pathfinder, so the
//! memo never outlives the map it was computed on.

use std::collections::hash_map::Entry;
use std::collections::VecDeque;

use ahash::AHashMap;
use gridshot_common::CellCoord;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::grid_map::GridMap;

/// How neighbour cells outside the layout rectangle are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Any cell that is not a wall is a neighbour, even outside the layout.
    /// Layouts with a gap in their border therefore leak paths outward.
    #[default]
    Unchecked,
    /// Neighbours must lie inside the layout rectangle.
    WithinLayout,
}

/// Adjacency of walkable cells, 8-connected.
#[derive(Debug, Clone, Default)]
pub struct PathGraph {
    adjacency: AHashMap<CellCoord, Vec<CellCoord>>,
}

impl PathGraph {
    /// Builds the graph for every floor cell of the layout.
    #[must_use]
    pub fn build(map: &GridMap, policy: BoundsPolicy) -> Self {
        let adjacency = map
            .cells()
            .filter(|&cell| !map.is_wall(cell))
            .map(|cell| {
                let neighbors = cell
                    .neighbors()
                    .filter(|&n| !map.is_wall(n))
                    .filter(|&n| policy == BoundsPolicy::Unchecked || map.in_bounds(n))
                    .collect();
                (cell, neighbors)
            })
            .collect();
        Self { adjacency }
    }

    /// Walkable neighbours of a cell, in expansion order.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> &[CellCoord] {
        self.adjacency.get(&cell).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether the cell is a node of the graph.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.adjacency.contains_key(&cell)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Runs BFS from `start` until `goal` is dequeued and returns the
    /// predecessor map.
    fn search(&self, start: CellCoord, goal: CellCoord) -> AHashMap<CellCoord, Option<CellCoord>> {
        let mut came_from = AHashMap::new();
        let mut queue = VecDeque::new();
        came_from.insert(start, None);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            if cell == goal {
                break;
            }
            for &next in self.neighbors(cell) {
                if let Entry::Vacant(entry) = came_from.entry(next) {
                    entry.insert(Some(cell));
                    queue.push_back(next);
                }
            }
        }
        came_from
    }

    /// Full route from `start` to `goal`, excluding `start`.
    ///
    /// Empty when `start == goal`, `None` when the goal is unreachable.
    #[must_use]
    pub fn route(&self, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
        if start == goal {
            return Some(Vec::new());
        }

        let came_from = self.search(start, goal);
        if !came_from.contains_key(&goal) {
            return None;
        }

        let mut path = vec![goal];
        let mut step = came_from.get(&goal).copied().flatten();
        while let Some(cell) = step {
            if cell == start {
                break;
            }
            path.push(cell);
            step = came_from.get(&cell).copied().flatten();
        }
        path.reverse();
        Some(path)
    }
}

/// Memoizing next-step oracle over a [`PathGraph`].
#[derive(Debug, Clone, Default)]
pub struct Pathfinder {
    graph: PathGraph,
    cache: AHashMap<(CellCoord, CellCoord), CellCoord>,
}

impl Pathfinder {
    /// Creates a pathfinder with an empty cache.
    #[must_use]
    pub fn new(graph: PathGraph) -> Self {
        Self {
            graph,
            cache: AHashMap::new(),
        }
    }

    /// Builds the graph for `map` and wraps it.
    #[must_use]
    pub fn for_map(map: &GridMap, policy: BoundsPolicy) -> Self {
        Self::new(PathGraph::build(map, policy))
    }

    /// Next cell to step to on a shortest path from `start` to `goal`.
    ///
    /// Returns `start` itself when `start == goal`, when the goal is
    /// unreachable, or when `start` is not walkable.
    pub fn find_path(&mut self, start: CellCoord, goal: CellCoord) -> CellCoord {
        if let Some(&hop) = self.cache.get(&(start, goal)) {
            return hop;
        }

        let hop = self
            .graph
            .route(start, goal)
            .and_then(|path| path.first().copied())
            .unwrap_or(start);
        trace!("path {start} -> {goal}: next {hop}");
        self.cache.insert((start, goal), hop);
        hop
    }

    /// Full route from `start` to `goal`, excluding `start`. Not memoized.
    #[must_use]
    pub fn full_path(&self, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
        self.graph.route(start, goal)
    }

    /// Number of steps on a shortest route, or `None` if unreachable.
    #[must_use]
    pub fn path_length(&self, start: CellCoord, goal: CellCoord) -> Option<usize> {
        self.full_path(start, goal).map(|path| path.len())
    }

    /// Forgets every memoized answer.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of memoized (start, goal) pairs.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> CellCoord {
        CellCoord::new(x, y)
    }

    fn pathfinder(rows: &[&str]) -> Pathfinder {
        let map = GridMap::parse(rows).expect("valid layout");
        Pathfinder::for_map(&map, BoundsPolicy::Unchecked)
    }

    #[test]
    fn test_corridor_first_hop() {
        let mut pf = pathfinder(&["111111", "1....1", "111111"]);
        assert_eq!(pf.find_path(c(1, 1), c(4, 1)), c(2, 1));
        assert_eq!(pf.find_path(c(4, 1), c(1, 1)), c(3, 1));
        assert_eq!(pf.path_length(c(1, 1), c(4, 1)), Some(3));
    }

    #[test]
    fn test_goal_equals_start() {
        let mut pf = pathfinder(&["111", "1.1", "111"]);
        assert_eq!(pf.find_path(c(1, 1), c(1, 1)), c(1, 1));
        assert_eq!(pf.full_path(c(1, 1), c(1, 1)), Some(Vec::new()));
    }

    #[test]
    fn test_isolated_goal_returns_start() {
        let mut pf = pathfinder(&["11111", "1.1.1", "11111"]);
        assert_eq!(pf.find_path(c(1, 1), c(3, 1)), c(1, 1));
        assert_eq!(pf.path_length(c(1, 1), c(3, 1)), None);
    }

    #[test]
    fn test_wall_start_returns_start() {
        let mut pf = pathfinder(&["111", "1.1", "111"]);
        assert_eq!(pf.find_path(c(0, 0), c(1, 1)), c(0, 0));
    }

    #[test]
    fn test_diagonal_moves_allowed() {
        let mut pf = pathfinder(&["11111", "1...1", "1...1", "1...1", "11111"]);
        assert_eq!(pf.find_path(c(1, 1), c(3, 3)), c(2, 2));
        assert_eq!(pf.path_length(c(1, 1), c(3, 3)), Some(2));
    }

    #[test]
    fn test_route_around_wall() {
        let mut pf = pathfinder(&["11111", "1.1.1", "1...1", "11111"]);
        let path = pf.full_path(c(1, 1), c(3, 1)).expect("reachable");
        assert_eq!(path, vec![c(2, 2), c(3, 1)]);
        assert_eq!(pf.find_path(c(1, 1), c(3, 1)), c(2, 2));
    }

    #[test]
    fn test_cache_is_populated_and_cleared() {
        let mut pf = pathfinder(&["111111", "1....1", "111111"]);
        assert_eq!(pf.cache_len(), 0);
        pf.find_path(c(1, 1), c(4, 1));
        pf.find_path(c(1, 1), c(4, 1));
        assert_eq!(pf.cache_len(), 1);
        pf.clear_cache();
        assert_eq!(pf.cache_len(), 0);
    }

    #[test]
    fn test_bounds_policy_on_open_border() {
        let map = GridMap::parse(&["1.1", "1.1", "111"]).expect("valid layout");

        let unchecked = PathGraph::build(&map, BoundsPolicy::Unchecked);
        assert!(unchecked.neighbors(c(1, 0)).contains(&c(1, -1)));

        let bounded = PathGraph::build(&map, BoundsPolicy::WithinLayout);
        assert!(!bounded.neighbors(c(1, 0)).contains(&c(1, -1)));
        assert_eq!(bounded.neighbors(c(1, 0)), &[c(1, 1)]);
    }

    #[test]
    fn test_neighbor_expansion_order_breaks_ties() {
        // (2, 3) and (2, 2) both reach (1, 2) in two steps; (2, 3) is expanded first.
        let mut pf = pathfinder(&["11111", "1...1", "1...1", "1...1", "11111"]);
        assert_eq!(pf.find_path(c(3, 3), c(1, 2)), c(2, 3));
    }
}
