//! Helpers shared by every solver: the distance heuristic, predecessor-map path reconstruction
//! and reduction of a cell-by-cell staircase to its turn vertices.
use grid_util::point::Point;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use crate::cost::{EdgeCost, Heading, TurnPenalty};
use crate::grid_mapper::{GridMapper, Position};
use crate::obstacles::Obstacles;

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) in cells. Never
/// overestimates the cost of a 4-connected route with unit edges.
pub fn heuristic(a: &Point, b: &Point) -> f64 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as f64
}

/// Walks predecessor links back from `goal` until a node without a predecessor, then reverses.
/// Meant for callers that keep their own predecessor map. The searches in
/// this crate walk the parent links of their own node arenas instead.
pub fn reconstruct_path<N, S>(predecessors: &HashMap<N, N, S>, goal: N) -> Vec<N>
where
    N: Eq + Hash + Clone,
    S: BuildHasher,
{
    let limit = predecessors.len() + 1;
    let mut path: Vec<N> = std::iter::successors(Some(goal), |node| predecessors.get(node).cloned())
        .take(limit)
        .collect();
    path.reverse();
    path
}

fn signum(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn direction(a: Position, b: Position) -> (i8, i8) {
    (signum(b.x - a.x), signum(b.y - a.y))
}

/// Drops every interior point whose incoming and outgoing directions have the same sign on both
/// axes. The first and last points are always kept.
pub fn simplify(waypoints: &[Position]) -> Vec<Position> {
    let (first, last) = match waypoints {
        [first, .., last] if waypoints.len() > 2 => (*first, *last),
        _ => return waypoints.to_vec(),
    };
    let mut simplified = vec![first];
    for w in waypoints.windows(3) {
        if direction(w[0], w[1]) != direction(w[1], w[2]) {
            simplified.push(w[1]);
        }
    }
    simplified.push(last);
    simplified
}

/// Number of direction changes along a polyline.
pub fn count_bends(waypoints: &[Position]) -> usize {
    waypoints
        .windows(3)
        .filter(|w| direction(w[0], w[1]) != direction(w[1], w[2]))
        .count()
}

/// True if every segment moves along exactly one axis.
pub fn is_orthogonal(waypoints: &[Position]) -> bool {
    waypoints
        .windows(2)
        .all(|w| (w[0].x == w[1].x) != (w[0].y == w[1].y))
}

/// Turns axis-aligned turn vertices back into a route on the grid that can be followed step by
/// step. Non-orthogonal segments are walked along x first.
pub fn waypoints_to_path(waypoints: &[Point]) -> Vec<Point> {
    let mut iter = waypoints.iter().copied();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };
    let mut path = vec![current];
    for next in iter {
        while current != next {
            let dx = (next.x - current.x).signum();
            current = if dx != 0 {
                Point::new(current.x + dx, current.y)
            } else {
                Point::new(current.x, current.y + (next.y - current.y).signum())
            };
            path.push(current);
        }
    }
    path
}

/// Cost of following a route cell by cell under the given turn penalty and edge costs. Returns
/// [None] if two consecutive cells are not 4-neighbours.
pub fn path_cost<E: EdgeCost + ?Sized>(
    path: &[Point],
    turn: &TurnPenalty,
    edge_cost: &E,
) -> Option<f64> {
    let mut total = 0.0;
    let mut heading = None;
    let mut bends = 0;
    for w in path.windows(2) {
        let next = Heading::between(w[0], w[1])?;
        let (penalty, b) = turn.apply(heading, next, bends);
        total += edge_cost.edge_cost(&w[0], &w[1]) + penalty;
        heading = Some(next);
        bends = b;
    }
    Some(total)
}

/// Re-verifies a returned route against the obstacles, e.g. to tell a genuine straight route
/// from the fallback line. Diagonal segments are never clear.
pub fn route_is_clear<O: Obstacles + ?Sized>(
    waypoints: &[Position],
    mapper: &GridMapper,
    obstacles: &O,
) -> bool {
    let cells = waypoints
        .iter()
        .map(|p| mapper.to_grid(*p))
        .collect::<Vec<_>>();
    if cells.windows(2).any(|w| w[0].x != w[1].x && w[0].y != w[1].y) {
        return false;
    }
    waypoints_to_path(&cells)
        .iter()
        .all(|cell| !obstacles.is_blocked(cell))
}
