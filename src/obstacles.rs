//! The narrow capability the search core needs from whatever rasterizes component and wire
//! geometry: "is this cell blocked for the current request".
use grid_util::point::Point;
use std::collections::HashSet;
use std::hash::BuildHasher;

/// Membership test over grid cells. Implementations are only read during a search and must
/// not change for the duration of one call.
pub trait Obstacles {
    fn is_blocked(&self, cell: &Point) -> bool;
}

impl<T: Obstacles + ?Sized> Obstacles for &T {
    fn is_blocked(&self, cell: &Point) -> bool {
        (**self).is_blocked(cell)
    }
}

impl<S: BuildHasher> Obstacles for HashSet<Point, S> {
    fn is_blocked(&self, cell: &Point) -> bool {
        self.contains(cell)
    }
}

impl Obstacles for [Point] {
    fn is_blocked(&self, cell: &Point) -> bool {
        self.contains(cell)
    }
}

impl Obstacles for Vec<Point> {
    fn is_blocked(&self, cell: &Point) -> bool {
        self.as_slice().is_blocked(cell)
    }
}

/// Nothing is blocked.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacles;

impl Obstacles for NoObstacles {
    fn is_blocked(&self, _: &Point) -> bool {
        false
    }
}

/// Wraps a closure as an [Obstacles] implementation.
#[derive(Clone, Copy, Debug)]
pub struct BlockedFn<F>(pub F);

impl<F> Obstacles for BlockedFn<F>
where
    F: Fn(&Point) -> bool,
{
    fn is_blocked(&self, cell: &Point) -> bool {
        (self.0)(cell)
    }
}

/// Keeps the terminals of the wire being routed free, even when the footprint of their owning
/// components would otherwise cover them.
#[derive(Clone, Debug)]
pub struct ClearedTerminals<O> {
    inner: O,
    terminals: Vec<Point>,
}

impl<O: Obstacles> ClearedTerminals<O> {
    pub fn new(inner: O, terminals: impl IntoIterator<Item = Point>) -> ClearedTerminals<O> {
        ClearedTerminals {
            inner,
            terminals: terminals.into_iter().collect(),
        }
    }
    pub fn terminals(&self) -> &[Point] {
        &self.terminals
    }
}

impl<O: Obstacles> Obstacles for ClearedTerminals<O> {
    fn is_blocked(&self, cell: &Point) -> bool {
        !self.terminals.contains(cell) && self.inner.is_blocked(cell)
    }
}
