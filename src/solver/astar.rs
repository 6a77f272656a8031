use grid_util::point::Point;

use crate::config::DEFAULT_MAX_EXPANSIONS;
use crate::cost::EdgeCost;
use crate::obstacles::Obstacles;
use crate::path::heuristic;
use crate::routing_grid::RoutingGrid;
use crate::solver::{best_first_search, GridSolver, SearchOutcome};
use crate::Algorithm;

#[derive(Clone, Debug)]
pub struct AstarSolver {
    pub max_expansions: usize,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

impl Default for AstarSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GridSolver for AstarSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
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
        best_first_search(self, grid, start, goal, self.max_expansions)
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

    fn route(
        blocked: &FxHashSet<Point>,
        start: (f64, f64),
        end: (f64, f64),
    ) -> crate::solver::SearchResult {
        let grid = RoutingGrid::new(
            GridMapper::new(1.0),
            Bounds::new(0.0, 0.0, 9.0, 9.0),
            blocked,
            TurnPenalty::new(2.0),
            &UnitEdgeCost,
        );
        AstarSolver::new().find_path(&grid, start.into(), end.into())
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let result = route(&FxHashSet::default(), (3.0, 3.0), (3.0, 3.0));
        assert_eq!(result.waypoints, vec![Position::new(3.0, 3.0)]);
        assert_eq!(result.status, RouteStatus::Routed);
        assert_eq!(result.cost, Some(0.0));
        assert_eq!(result.expansions, 1);
    }

    /// Asserts that the cheapest route around a single obstacle takes one bend.
    #[test]
    fn solve_simple_problem() {
        //  ___
        // |  E|
        // | # |
        // |S  |
        //  ___
        let mut blocked = FxHashSet::default();
        blocked.insert(Point::new(1, 1));
        let result = route(&blocked, (0.0, 0.0), (2.0, 2.0));
        assert!(result.is_routed());
        assert_eq!(result.cost, Some(6.0));
        assert_eq!(count_bends(&result.waypoints), 1);
        assert_eq!(result.waypoints.len(), 3);
    }

    #[test]
    fn prefers_fewer_bends_over_staircase() {
        let result = route(&FxHashSet::default(), (0.0, 0.0), (4.0, 4.0));
        assert_eq!(count_bends(&result.waypoints), 1);
        assert_eq!(result.cost, Some(10.0));
    }

    #[test]
    fn reports_cost_map() {
        let result = route(&FxHashSet::default(), (0.0, 0.0), (3.0, 0.0));
        let costs = result.cost_map.unwrap();
        assert_eq!(costs[&Point::new(0, 0)], 0.0);
        assert_eq!(costs[&Point::new(3, 0)], 3.0);
        assert_eq!(result.waypoints, vec![Position::new(0.0, 0.0), Position::new(3.0, 0.0)]);
    }

    #[test]
    fn blocked_goal_falls_back() {
        let mut blocked = FxHashSet::default();
        blocked.insert(Point::new(5, 5));
        let result = route(&blocked, (0.0, 0.0), (5.0, 5.0));
        assert_eq!(result.status, RouteStatus::Unreachable);
        assert_eq!(
            result.waypoints,
            vec![Position::new(0.0, 0.0), Position::new(5.0, 5.0)]
        );
        assert_eq!(result.cost, None);
    }
}
