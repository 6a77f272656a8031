use grid_util::point::Point;

/// Unit moves on the 4-connected routing grid. The ordering only serves as a deterministic
/// tie-break between equally good arrivals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Heading {
    Right,
    Up,
    Left,
    Down,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Right, Heading::Up, Heading::Left, Heading::Down];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Right => (1, 0),
            Heading::Up => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Down => (0, -1),
        }
    }
    pub fn step(self, cell: Point) -> Point {
        let (dx, dy) = self.delta();
        Point::new(cell.x + dx, cell.y + dy)
    }
    /// The heading of a unit move from `a` to `b`, if it is one.
    pub fn between(a: Point, b: Point) -> Option<Heading> {
        match (b.x - a.x, b.y - a.y) {
            (1, 0) => Some(Heading::Right),
            (0, 1) => Some(Heading::Up),
            (-1, 0) => Some(Heading::Left),
            (0, -1) => Some(Heading::Down),
            _ => None,
        }
    }
}

/// Exponential bend penalty: the n-th change of heading along a route costs `base^n` on top of
/// the edge cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnPenalty {
    pub base: f64,
}

impl TurnPenalty {
    pub fn new(base: f64) -> TurnPenalty {
        TurnPenalty { base }
    }
    /// Penalty and bend count for moving in `next` after arriving with `incoming` having made
    /// `bends` turns so far. Leaving the start cell (no incoming heading) is free.
    pub fn apply(&self, incoming: Option<Heading>, next: Heading, bends: u32) -> (f64, u32) {
        match incoming {
            Some(h) if h != next => {
                let bends = bends + 1;
                (self.base.powi(bends as i32), bends)
            }
            _ => (0.0, bends),
        }
    }
}

/// Per-edge cost hook. Searches add the [TurnPenalty] on top of whatever this returns.
pub trait EdgeCost {
    fn edge_cost(&self, from: &Point, to: &Point) -> f64;
}

impl<T: EdgeCost + ?Sized> EdgeCost for &T {
    fn edge_cost(&self, from: &Point, to: &Point) -> f64 {
        (**self).edge_cost(from, to)
    }
}

/// Constant unit cost per move.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitEdgeCost;

impl EdgeCost for UnitEdgeCost {
    #[inline]
    fn edge_cost(&self, _: &Point, _: &Point) -> f64 {
        1.0
    }
}

/// What occupies a cell, from the point of view of the wire being routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Free,
    /// An already-routed wire on the same net.
    SameNet,
    /// An already-routed wire on a different net.
    OtherNet,
    /// Inside a component body.
    Body,
    /// A terminal belonging to a different net.
    ForeignTerminal,
}

pub trait CellClassifier {
    fn classify(&self, cell: &Point) -> CellKind;
}

impl<F> CellClassifier for F
where
    F: Fn(&Point) -> CellKind,
{
    fn classify(&self, cell: &Point) -> CellKind {
        self(cell)
    }
}

/// Net-aware weighting of the cell a move enters. Not used unless a router is explicitly built
/// with it; a same-net bonus below the unit cost makes the Manhattan heuristic inadmissible.
#[derive(Clone, Debug)]
pub struct NetAwareEdgeCost<C> {
    pub classifier: C,
    pub base_cost: f64,
    pub same_net_bonus: f64,
    pub cross_net_penalty: f64,
    pub body_crossing_penalty: f64,
    pub terminal_crossing_penalty: f64,
}

/// Floor keeping every edge strictly positive.
pub const MIN_EDGE_COST: f64 = 0.1;

impl<C: CellClassifier> NetAwareEdgeCost<C> {
    pub fn new(classifier: C) -> NetAwareEdgeCost<C> {
        NetAwareEdgeCost {
            classifier,
            base_cost: 1.0,
            same_net_bonus: 0.5,
            cross_net_penalty: 5.0,
            body_crossing_penalty: 50.0,
            terminal_crossing_penalty: 20.0,
        }
    }
}

impl<C: CellClassifier> EdgeCost for NetAwareEdgeCost<C> {
    fn edge_cost(&self, _from: &Point, to: &Point) -> f64 {
        let cost = match self.classifier.classify(to) {
            CellKind::Free => self.base_cost,
            CellKind::SameNet => self.base_cost - self.same_net_bonus,
            CellKind::OtherNet => self.base_cost + self.cross_net_penalty,
            CellKind::Body => self.base_cost + self.body_crossing_penalty,
            CellKind::ForeignTerminal => self.base_cost + self.terminal_crossing_penalty,
        };
        cost.max(MIN_EDGE_COST)
    }
}
