use fxhash::FxHashMap;
use grid_util::point::Point;
use log::{debug, info};
use ordered_float::OrderedFloat;
use std::time::{Duration, Instant};

use crate::best_first::best_first;
use crate::cost::EdgeCost;
use crate::grid_mapper::{GridMapper, Position};
use crate::obstacles::Obstacles;
use crate::path::simplify;
use crate::routing_grid::{RoutingGrid, SearchState};
use crate::Algorithm;

pub mod astar;
pub mod dijkstra;
pub mod idastar;

/// How a call to [GridSolver::find_path] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteStatus {
    /// An obstacle-free route was found.
    Routed,
    /// The search space was exhausted without reaching the goal.
    Unreachable,
    /// The expansion or pass cap was hit first.
    LimitReached,
}

/// Raw output of a search over grid cells, before mapping back to positions.
#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    /// The cell route from start to goal and its cost.
    pub path: Option<(Vec<Point>, f64)>,
    pub expansions: usize,
    pub passes: usize,
    pub limit_reached: bool,
    pub cost_map: Option<FxHashMap<Point, f64>>,
}

/// Everything one routing call produced. Diagnostics travel with the result so solvers stay
/// stateless and can be shared between threads.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub algorithm: Algorithm,
    /// Starts at the literal start position and ends at the literal end position. On failure this
    /// is exactly `[start, end]`, which is not checked against the obstacles.
    pub waypoints: Vec<Position>,
    pub status: RouteStatus,
    /// Total cost of the route, when one was found.
    pub cost: Option<f64>,
    pub runtime: Duration,
    /// Cells expanded by the best-first searches, node visits summed over all passes for IDA*.
    pub expansions: usize,
    /// Always 1 for the best-first searches, threshold passes for IDA*.
    pub passes: usize,
    /// Best known cost per reached cell, best-first searches only.
    pub cost_map: Option<FxHashMap<Point, f64>>,
}

impl SearchResult {
    pub fn is_routed(&self) -> bool {
        self.status == RouteStatus::Routed
    }
    pub fn runtime_seconds(&self) -> f64 {
        self.runtime.as_secs_f64()
    }
    /// The per-algorithm iteration count: outer passes for IDA*, expansions otherwise.
    pub fn iteration_count(&self) -> usize {
        match self.algorithm {
            Algorithm::IdaStar => self.passes,
            Algorithm::AStar | Algorithm::Dijkstra => self.expansions,
        }
    }
}

/// Maps a cell route back to continuous waypoints that start at the literal start position, end
/// at the literal end position and keep only turn vertices. Endpoints that sit off their cell
/// centre are joined to the route with an elbow, so every segment stays axis-aligned.
pub fn cells_to_waypoints(
    cells: &[Point],
    mapper: &GridMapper,
    start: Position,
    end: Position,
) -> Vec<Position> {
    let (first, second) = match cells {
        [first, second, ..] => (*first, *second),
        _ => {
            return if start == end {
                vec![start]
            } else if start.x == end.x || start.y == end.y {
                vec![start, end]
            } else {
                vec![start, Position::new(end.x, start.y), end]
            };
        }
    };
    let (last, before_last) = (cells[cells.len() - 1], cells[cells.len() - 2]);
    let mut positions = Vec::with_capacity(cells.len() + 2);
    // Project each endpoint onto the line of the adjoining route segment
    let entry = onto_segment(mapper.to_position(first), first.y == second.y, start);
    if entry != start {
        positions.push(start);
    }
    positions.push(entry);
    positions.extend(
        cells[1..cells.len() - 1]
            .iter()
            .map(|c| mapper.to_position(*c)),
    );
    let exit = onto_segment(mapper.to_position(last), last.y == before_last.y, end);
    positions.push(exit);
    if exit != end {
        positions.push(end);
    }
    simplify(&positions)
}

/// The point on the horizontal (or vertical) line through `centre` closest to `p`.
fn onto_segment(centre: Position, horizontal: bool, p: Position) -> Position {
    if horizontal {
        Position::new(p.x, centre.y)
    } else {
        Position::new(centre.x, p.y)
    }
}

/// Best-first search with one node per grid cell. Each node carries the heading and bend count
/// it was reached with, since the turn penalty of the next move depends on them. Arrivals of equal
/// cost keep the one with fewer bends, then the lower heading, which makes the result independent
/// of expansion order.
pub(crate) fn best_first_search<S, O, E>(
    solver: &S,
    grid: &RoutingGrid<O, E>,
    start: Point,
    goal: Point,
    max_expansions: usize,
) -> SearchOutcome
where
    S: GridSolver + ?Sized,
    O: Obstacles + ?Sized,
    E: EdgeCost + ?Sized,
{
    let run = best_first(
        SearchState::start(start),
        |state| state.cell,
        |state| {
            grid.successors(state)
                .into_iter()
                .map(|(s, c)| (s, OrderedFloat(c)))
        },
        |state| OrderedFloat(solver.heuristic(&state.cell, &goal)),
        |state| state.cell == goal,
        |a, b| (a.bends, a.heading).cmp(&(b.bends, b.heading)),
        max_expansions,
    );
    let cost_map = run
        .nodes
        .iter()
        .map(|(cell, node)| (*cell, node.cost.0))
        .collect::<FxHashMap<_, _>>();
    SearchOutcome {
        path: run.path.map(|(states, cost)| {
            (states.into_iter().map(|s| s.cell).collect(), cost.0)
        }),
        expansions: run.expansions,
        passes: 1,
        limit_reached: run.limit_reached,
        cost_map: Some(cost_map),
    }
}

pub trait GridSolver {
    fn algorithm(&self) -> Algorithm;

    fn heuristic(&self, p1: &Point, p2: &Point) -> f64;

    /// Searches from `start` to `goal` on the grid. Must not keep any state between calls.
    fn search<O, E>(&self, grid: &RoutingGrid<O, E>, start: Point, goal: Point) -> SearchOutcome
    where
        O: Obstacles + ?Sized,
        E: EdgeCost + ?Sized;

    /// Routes between two continuous positions. Falls back to the straight line `[start, end]`
    /// when no route is found.
    fn find_path<O, E>(&self, grid: &RoutingGrid<O, E>, start: Position, end: Position) -> SearchResult
    where
        O: Obstacles + ?Sized,
        E: EdgeCost + ?Sized,
    {
        let timer = Instant::now();
        let algorithm = self.algorithm();
        let start_cell = grid.mapper.to_grid(start);
        let goal_cell = grid.mapper.to_grid(end);
        debug!("Routing {} -> {} with {}", start_cell, goal_cell, algorithm);
        let outcome = self.search(grid, start_cell, goal_cell);
        let (waypoints, status, cost) = match outcome.path {
            Some((cells, cost)) => (
                cells_to_waypoints(&cells, &grid.mapper, start, end),
                RouteStatus::Routed,
                Some(cost),
            ),
            None => {
                let status = if outcome.limit_reached {
                    RouteStatus::LimitReached
                } else {
                    info!("{} is not reachable from {}", goal_cell, start_cell);
                    RouteStatus::Unreachable
                };
                (vec![start, end], status, None)
            }
        };
        debug!(
            "{} finished: {:?}, {} expansions, {} passes",
            algorithm, status, outcome.expansions, outcome.passes
        );
        SearchResult {
            algorithm,
            waypoints,
            status,
            cost,
            runtime: timer.elapsed(),
            expansions: outcome.expansions,
            passes: outcome.passes,
            cost_map: outcome.cost_map,
        }
    }
}
