use core::fmt;
use grid_util::point::Point;
use smallvec::SmallVec;

use crate::cost::{EdgeCost, Heading, TurnPenalty};
use crate::grid_mapper::{Bounds, GridMapper};
use crate::obstacles::Obstacles;
use crate::N_SMALLVEC_SIZE;

/// A visited cell together with how it was reached. The turn penalty of the next move depends on
/// both, so searches carry the heading and bend count along with the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchState {
    pub cell: Point,
    pub heading: Option<Heading>,
    pub bends: u32,
}

impl SearchState {
    pub fn start(cell: Point) -> SearchState {
        SearchState {
            cell,
            heading: None,
            bends: 0,
        }
    }
}

/// [RoutingGrid] is the read-only view a single search runs against: the cell mapping, the
/// routing rectangle, the caller's obstacles and the cost model. It lives for one call only.
pub struct RoutingGrid<'a, O: ?Sized, E: ?Sized> {
    pub mapper: GridMapper,
    pub bounds: Bounds,
    pub obstacles: &'a O,
    pub turn: TurnPenalty,
    pub edge_cost: &'a E,
}

impl<'a, O, E> RoutingGrid<'a, O, E>
where
    O: Obstacles + ?Sized,
    E: EdgeCost + ?Sized,
{
    pub fn new(
        mapper: GridMapper,
        bounds: Bounds,
        obstacles: &'a O,
        turn: TurnPenalty,
        edge_cost: &'a E,
    ) -> Self {
        RoutingGrid {
            mapper,
            bounds,
            obstacles,
            turn,
            edge_cost,
        }
    }
    pub fn in_bounds(&self, cell: Point) -> bool {
        self.bounds.contains(self.mapper.to_position(cell))
    }
    pub fn can_move_to(&self, cell: Point) -> bool {
        self.in_bounds(cell) && !self.obstacles.is_blocked(&cell)
    }
    /// The 4-connected successors of `state` with the cost of each move: edge cost plus the turn
    /// penalty relative to the heading `state` was reached with.
    pub fn successors(
        &self,
        state: &SearchState,
    ) -> SmallVec<[(SearchState, f64); N_SMALLVEC_SIZE]> {
        Heading::ALL
            .into_iter()
            .filter_map(|heading| {
                let cell = heading.step(state.cell);
                if !self.can_move_to(cell) {
                    return None;
                }
                let (penalty, bends) = self.turn.apply(state.heading, heading, state.bends);
                let cost = self.edge_cost.edge_cost(&state.cell, &cell) + penalty;
                Some((
                    SearchState {
                        cell,
                        heading: Some(heading),
                        bends,
                    },
                    cost,
                ))
            })
            .collect()
    }
    /// Inclusive range of cells whose positions fall inside the bounds.
    pub fn cell_range(&self) -> (Point, Point) {
        let s = self.mapper.cell_size();
        let b = &self.bounds;
        (
            Point::new((b.x / s).ceil() as i32, (b.y / s).ceil() as i32),
            Point::new(
                ((b.x + b.width) / s).floor() as i32,
                ((b.y + b.height) / s).floor() as i32,
            ),
        )
    }
}

impl<O, E> fmt::Display for RoutingGrid<'_, O, E>
where
    O: Obstacles + ?Sized,
    E: EdgeCost + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (min, max) = self.cell_range();
        for y in (min.y..=max.y).rev() {
            let row = (min.x..=max.x)
                .map(|x| {
                    if self.obstacles.is_blocked(&Point::new(x, y)) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::UnitEdgeCost;
    use crate::grid_mapper::Bounds;
    use fxhash::FxHashSet;

    fn grid<'a>(
        blocked: &'a FxHashSet<Point>,
    ) -> RoutingGrid<'a, FxHashSet<Point>, UnitEdgeCost> {
        RoutingGrid::new(
            GridMapper::new(10.0),
            Bounds::new(0.0, 0.0, 30.0, 20.0),
            blocked,
            TurnPenalty::new(2.0),
            &UnitEdgeCost,
        )
    }

    #[test]
    fn successors_respect_bounds_and_obstacles() {
        let mut blocked = FxHashSet::default();
        blocked.insert(Point::new(1, 0));
        let grid = grid(&blocked);
        let succ = grid.successors(&SearchState::start(Point::new(0, 0)));
        // (1, 0) is blocked, (-1, 0) and (0, -1) are out of bounds
        assert_eq!(succ.len(), 1);
        assert_eq!(succ[0].0.cell, Point::new(0, 1));
        assert_eq!(succ[0].1, 1.0);
    }

    #[test]
    fn successors_charge_turns() {
        let blocked = FxHashSet::default();
        let grid = grid(&blocked);
        let state = SearchState {
            cell: Point::new(1, 1),
            heading: Some(Heading::Right),
            bends: 1,
        };
        for (next, cost) in grid.successors(&state) {
            if next.heading == Some(Heading::Right) {
                assert_eq!((cost, next.bends), (1.0, 1));
            } else {
                assert_eq!((cost, next.bends), (5.0, 2));
            }
        }
    }

    #[test]
    fn renders_obstacles() {
        let mut blocked = FxHashSet::default();
        blocked.insert(Point::new(1, 2));
        let grid = grid(&blocked);
        assert_eq!(format!("{}", grid), ".#..\n....\n....\n");
    }
}
