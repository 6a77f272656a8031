use grid_util::point::Point;

use crate::config::DEFAULT_MAX_EXPANSIONS;
use crate::cost::EdgeCost;
use crate::obstacles::Obstacles;
use crate::routing_grid::RoutingGrid;
use crate::solver::{best_first_search, GridSolver, SearchOutcome};
use crate::Algorithm;

/// Uniform-cost search. Expands in order of cost so far alone, which makes it a ground truth for
/// the cost of the other solvers' routes.
#[derive(Clone, Debug)]
pub struct DijkstraSolver {
    pub max_expansions: usize,
}

impl DijkstraSolver {
    pub fn new() -> DijkstraSolver {
        DijkstraSolver {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

impl Default for DijkstraSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GridSolver for DijkstraSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dijkstra
    }

    fn heuristic(&self, _: &Point, _: &Point) -> f64 {
        0.0
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
    use crate::solver::astar::AstarSolver;
    use crate::solver::RouteStatus;

    use super::*;

    #[test]
    fn matches_astar_cost() {
        let mut blocked = FxHashSet::default();
        for y in 0..6 {
            blocked.insert(Point::new(4, y));
        }
        let grid = RoutingGrid::new(
            GridMapper::new(1.0),
            Bounds::new(0.0, 0.0, 9.0, 9.0),
            &blocked,
            TurnPenalty::new(2.0),
            &UnitEdgeCost,
        );
        let start = Position::new(0.0, 0.0);
        let end = Position::new(8.0, 0.0);
        let dijkstra = DijkstraSolver::new().find_path(&grid, start, end);
        let astar = AstarSolver::new().find_path(&grid, start, end);
        assert!(dijkstra.is_routed() && astar.is_routed());
        // Up 6, right 8, down 6 with two turns
        assert_eq!(dijkstra.cost, Some(26.0));
        assert_eq!(dijkstra.cost, astar.cost);
        assert_eq!(dijkstra.waypoints.len(), 4);
    }

    #[test]
    fn cap_reports_limit() {
        let blocked = FxHashSet::default();
        let grid = RoutingGrid::new(
            GridMapper::new(1.0),
            Bounds::new(0.0, 0.0, 50.0, 50.0),
            &blocked,
            TurnPenalty::new(2.0),
            &UnitEdgeCost,
        );
        let solver = DijkstraSolver { max_expansions: 20 };
        let result = solver.find_path(&grid, Position::new(0.0, 0.0), Position::new(40.0, 40.0));
        assert_eq!(result.status, RouteStatus::LimitReached);
        assert_eq!(result.expansions, 20);
        assert_eq!(result.iteration_count(), 20);
        assert_eq!(
            result.waypoints,
            vec![Position::new(0.0, 0.0), Position::new(40.0, 40.0)]
        );
    }
}
