use core::fmt;
use grid_util::point::Point;

/// A position in the continuous plane that components and wires live in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Position {
        Position { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Position {
        Position::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned routing rectangle in continuous coordinates. Containment is inclusive on every
/// edge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Bounds {
        Bounds {
            x,
            y,
            width,
            height,
        }
    }
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }
}

/// Converts between continuous positions and integer grid cells for a fixed, positive cell size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridMapper {
    cell_size: f64,
}

impl GridMapper {
    pub fn new(cell_size: f64) -> GridMapper {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        GridMapper { cell_size }
    }
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
    /// Divides by the cell size and rounds to the nearest cell. Halves round away from zero.
    pub fn to_grid(&self, pos: Position) -> Point {
        Point::new(
            (pos.x / self.cell_size).round() as i32,
            (pos.y / self.cell_size).round() as i32,
        )
    }
    pub fn to_position(&self, cell: Point) -> Position {
        Position::new(
            cell.x as f64 * self.cell_size,
            cell.y as f64 * self.cell_size,
        )
    }
}
