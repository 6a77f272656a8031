//! [Iterative deepening A*](https://en.wikipedia.org/wiki/Iterative_deepening_A*) with the
//! depth-first part driven by an explicit frame stack, so route length is not limited by the
//! thread's call stack.
use fxhash::FxHashMap;
use grid_util::point::Point;
use log::warn;
use smallvec::SmallVec;

use crate::config::DEFAULT_MAX_PASSES;
use crate::cost::{EdgeCost, Heading};
use crate::obstacles::Obstacles;
use crate::path::heuristic;
use crate::routing_grid::{RoutingGrid, SearchState};
use crate::solver::{GridSolver, SearchOutcome};
use crate::{Algorithm, N_SMALLVEC_SIZE};

#[derive(Clone, Debug)]
pub struct IdaStarSolver {
    pub max_passes: usize,
}

impl IdaStarSolver {
    pub fn new() -> IdaStarSolver {
        IdaStarSolver {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl Default for IdaStarSolver {
    fn default() -> Self {
        Self::new()
    }
}

enum PassResult {
    Found(Vec<Point>, f64),
    /// Smallest estimate that exceeded the threshold.
    Exceeded(f64),
    /// Nothing exceeded the threshold and the goal was not reached.
    Exhausted,
}

struct Frame {
    state: SearchState,
    cost: f64,
    successors: SmallVec<[(SearchState, f64); N_SMALLVEC_SIZE]>,
    next: usize,
}

/// One depth-first pass bounded by `threshold`.
struct Pass<'g, 'a, O: ?Sized, E: ?Sized> {
    grid: &'g RoutingGrid<'a, O, E>,
    goal: Point,
    threshold: f64,
    stack: Vec<Frame>,
    visited: FxHashMap<(Point, Option<Heading>), f64>,
    /// Smallest over-threshold estimate seen per (cell, heading).
    exceeded: FxHashMap<(Point, Option<Heading>), f64>,
    expansions: usize,
}

impl<'g, 'a, O, E> Pass<'g, 'a, O, E>
where
    O: Obstacles + ?Sized,
    E: EdgeCost + ?Sized,
{
    fn new(grid: &'g RoutingGrid<'a, O, E>, goal: Point, threshold: f64) -> Self {
        Pass {
            grid,
            goal,
            threshold,
            stack: Vec::new(),
            visited: FxHashMap::default(),
            exceeded: FxHashMap::default(),
            expansions: 0,
        }
    }

    fn estimate(&self, cell: &Point) -> f64 {
        heuristic(cell, &self.goal)
    }

    /// Visits `state`, pushing a frame if its subtree still needs exploring. Returns the route
    /// when `state` is the goal.
    fn enter(&mut self, state: SearchState, cost: f64) -> Option<(Vec<Point>, f64)> {
        self.expansions += 1;
        let key = (state.cell, state.heading);
        let f = cost + self.estimate(&state.cell);
        if f > self.threshold {
            self.exceeded
                .entry(key)
                .and_modify(|m| *m = m.min(f))
                .or_insert(f);
            return None;
        }
        if state.cell == self.goal {
            let mut path = self
                .stack
                .iter()
                .map(|frame| frame.state.cell)
                .collect::<Vec<_>>();
            path.push(state.cell);
            return Some((path, cost));
        }
        if self.visited.get(&key).is_some_and(|&c| c <= cost) {
            return None;
        }
        self.visited.insert(key, cost);
        let mut successors = self.grid.successors(&state);
        successors.sort_by(|(a, ca), (b, cb)| {
            (ca + self.estimate(&a.cell)).total_cmp(&(cb + self.estimate(&b.cell)))
        });
        self.stack.push(Frame {
            state,
            cost,
            successors,
            next: 0,
        });
        None
    }

    fn run(mut self, start: Point) -> (PassResult, usize) {
        if let Some((path, cost)) = self.enter(SearchState::start(start), 0.0) {
            return (PassResult::Found(path, cost), self.expansions);
        }
        while let Some(top) = self.stack.last_mut() {
            if top.next < top.successors.len() {
                let (state, step) = top.successors[top.next];
                top.next += 1;
                let cost = top.cost + step;
                if let Some((path, cost)) = self.enter(state, cost) {
                    return (PassResult::Found(path, cost), self.expansions);
                }
            } else {
                self.stack.pop();
            }
        }
        // An over-threshold arrival at a pair this pass did explore is costlier than the
        // explored one and would be pruned, so it cannot justify another pass.
        let next = self
            .exceeded
            .iter()
            .filter(|(key, _)| !self.visited.contains_key(*key))
            .map(|(_, &f)| f)
            .min_by(f64::total_cmp);
        let result = match next {
            Some(next) => PassResult::Exceeded(next),
            None => PassResult::Exhausted,
        };
        (result, self.expansions)
    }
}

impl GridSolver for IdaStarSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::IdaStar
    }

    /// Manhattan distance to the goal.
    fn heuristic(&self, p1: &Point, p2: &Point) -> f64 {
        heuristic(p1, p2)
    }

    fn search<O, E>(&self, grid: &RoutingGrid<O, E>, start: Point, goal: Point) -> SearchOutcome
    where
        O: Obstacles + ?Sized,
        E: EdgeCost + ?Sized,
    {
        let mut outcome = SearchOutcome::default();
        let mut threshold = self.heuristic(&start, &goal);
        loop {
            if outcome.passes >= self.max_passes {
                warn!("Search gave up after {} passes", outcome.passes);
                outcome.limit_reached = true;
                return outcome;
            }
            outcome.passes += 1;
            let (result, expansions) = Pass::new(grid, goal, threshold).run(start);
            outcome.expansions += expansions;
            match result {
                PassResult::Found(path, cost) => {
                    outcome.path = Some((path, cost));
                    return outcome;
                }
                PassResult::Exceeded(next) => threshold = next,
                PassResult::Exhausted => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fxhash::FxHashSet;

    use crate::cost::{TurnPenalty, UnitEdgeCost};
    use crate::grid_mapper::{Bounds, GridMapper, Position};
    use crate::path::count_bends;
    use crate::solver::RouteStatus;

    use super::*;

    fn grid(blocked: &FxHashSet<Point>, size: f64) -> RoutingGrid<'_, FxHashSet<Point>, UnitEdgeCost> {
        RoutingGrid::new(
            GridMapper::new(1.0),
            Bounds::new(0.0, 0.0, size, size),
            blocked,
            TurnPenalty::new(2.0),
            &UnitEdgeCost,
        )
    }

    #[test]
    fn equal_start_goal() {
        let blocked = FxHashSet::default();
        let p = Position::new(2.0, 2.0);
        let result = IdaStarSolver::new().find_path(&grid(&blocked, 5.0), p, p);
        assert_eq!(result.waypoints, vec![p]);
        assert_eq!(result.passes, 1);
        assert_eq!(result.iteration_count(), 1);
        assert!(result.cost_map.is_none());
    }

    #[test]
    fn straight_route_in_one_pass() {
        let blocked = FxHashSet::default();
        let result = IdaStarSolver::new().find_path(
            &grid(&blocked, 9.0),
            Position::new(0.0, 4.0),
            Position::new(7.0, 4.0),
        );
        assert_eq!(
            result.waypoints,
            vec![Position::new(0.0, 4.0), Position::new(7.0, 4.0)]
        );
        assert_eq!(result.passes, 1);
        assert_eq!(result.cost, Some(7.0));
    }

    #[test]
    fn deepens_around_a_wall() {
        let mut blocked = FxHashSet::default();
        for y in 0..6 {
            blocked.insert(Point::new(4, y));
        }
        let result = IdaStarSolver::new().find_path(
            &grid(&blocked, 9.0),
            Position::new(0.0, 0.0),
            Position::new(8.0, 0.0),
        );
        assert!(result.is_routed());
        assert_eq!(result.cost, Some(26.0));
        assert_eq!(count_bends(&result.waypoints), 2);
        assert!(result.passes > 1);
        assert!(result.expansions >= result.passes);
    }

    #[test]
    fn exhausts_enclosed_start() {
        let mut blocked = FxHashSet::default();
        for p in [(1, 0), (1, 1), (0, 2), (1, 2)] {
            blocked.insert(Point::new(p.0, p.1));
        }
        let result = IdaStarSolver::new().find_path(
            &grid(&blocked, 9.0),
            Position::new(0.0, 0.0),
            Position::new(8.0, 8.0),
        );
        assert_eq!(result.status, RouteStatus::Unreachable);
        assert!(result.passes < IdaStarSolver::new().max_passes);
    }

    #[test]
    fn pass_cap_reports_limit() {
        let mut blocked = FxHashSet::default();
        for y in 0..6 {
            blocked.insert(Point::new(4, y));
        }
        let solver = IdaStarSolver { max_passes: 2 };
        let result = solver.find_path(
            &grid(&blocked, 9.0),
            Position::new(0.0, 0.0),
            Position::new(8.0, 0.0),
        );
        assert_eq!(result.status, RouteStatus::LimitReached);
        assert_eq!(result.passes, 2);
        assert_eq!(result.iteration_count(), 2);
    }
}
