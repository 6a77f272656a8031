//! # ortho_router
//!
//! Routes orthogonal wires between two points on a uniform grid while avoiding blocked cells.
//! Three interchangeable searches are provided:
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm),
//! [uniform-cost search](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) and
//! [IDA*](https://en.wikipedia.org/wiki/Iterative_deepening_A*). Every move costs one unit and
//! every change of direction adds an exponentially growing bend penalty, which biases routes
//! towards long straight runs. Returned waypoints only contain the turn vertices.
//!
//! When no route exists, or the search gives up at its expansion cap, the straight line between
//! the two endpoints is returned and [RouteStatus] says why.
mod best_first;
pub mod config;
pub mod cost;
pub mod error;
pub mod grid_mapper;
pub mod obstacles;
pub mod path;
pub mod routing_grid;
pub mod solver;

use core::fmt;
use std::str::FromStr;

pub use crate::config::RoutingConfig;
pub use crate::cost::{EdgeCost, Heading, NetAwareEdgeCost, TurnPenalty, UnitEdgeCost};
pub use crate::error::ConfigError;
pub use crate::grid_mapper::{Bounds, GridMapper, Position};
pub use crate::obstacles::{BlockedFn, ClearedTerminals, NoObstacles, Obstacles};
pub use crate::routing_grid::RoutingGrid;
pub use crate::solver::{
    astar::AstarSolver, dijkstra::DijkstraSolver, idastar::IdaStarSolver, GridSolver,
    RouteStatus, SearchResult,
};
pub use grid_util::point::Point;

/// Inline capacity for successor lists, one per heading.
pub(crate) const N_SMALLVEC_SIZE: usize = 4;

/// Which search a [Router] runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    #[default]
    AStar,
    Dijkstra,
    IdaStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::AStar, Algorithm::Dijkstra, Algorithm::IdaStar];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "astar",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::IdaStar => "idastar",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "astar" | "a*" => Ok(Algorithm::AStar),
            "dijkstra" | "ucs" => Ok(Algorithm::Dijkstra),
            "idastar" | "ida*" => Ok(Algorithm::IdaStar),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Entry point for routing. Holds configuration only, so one router can serve concurrent calls.
#[derive(Clone, Debug)]
pub struct Router<E = UnitEdgeCost> {
    config: RoutingConfig,
    edge_cost: E,
}

impl Router {
    pub fn new(config: RoutingConfig) -> Result<Router, ConfigError> {
        config.validate()?;
        Ok(Router {
            config,
            edge_cost: UnitEdgeCost,
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Router {
            config: RoutingConfig::default(),
            edge_cost: UnitEdgeCost,
        }
    }
}

impl<E: EdgeCost> Router<E> {
    /// Replaces the constant unit edge cost, e.g. with a [NetAwareEdgeCost].
    pub fn with_edge_cost<F: EdgeCost>(self, edge_cost: F) -> Router<F> {
        Router {
            config: self.config,
            edge_cost,
        }
    }
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }
    pub fn mapper(&self) -> GridMapper {
        GridMapper::new(self.config.cell_size)
    }
    pub fn grid<'a, O: Obstacles + ?Sized>(
        &'a self,
        obstacles: &'a O,
        bounds: Bounds,
    ) -> RoutingGrid<'a, O, E> {
        RoutingGrid::new(
            self.mapper(),
            bounds,
            obstacles,
            TurnPenalty::new(self.config.turn_penalty_base),
            &self.edge_cost,
        )
    }

    /// Routes from `start` to `end` inside `bounds` around `obstacles` with the chosen search.
    /// Positions outside `bounds` are not checked.
    pub fn find_path<O: Obstacles + ?Sized>(
        &self,
        start: Position,
        end: Position,
        obstacles: &O,
        bounds: Bounds,
        algorithm: Algorithm,
    ) -> SearchResult {
        let grid = self.grid(obstacles, bounds);
        match algorithm {
            Algorithm::AStar => AstarSolver {
                max_expansions: self.config.max_expansions,
            }
            .find_path(&grid, start, end),
            Algorithm::Dijkstra => DijkstraSolver {
                max_expansions: self.config.max_expansions,
            }
            .find_path(&grid, start, end),
            Algorithm::IdaStar => IdaStarSolver {
                max_passes: self.config.max_passes,
            }
            .find_path(&grid, start, end),
        }
    }
}
