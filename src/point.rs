use std::fmt;
use std::hash::{Hash, Hasher};

/// Side of a cell where a boundary crossing lies
///
/// Rows grow downwards, so `Top` is the side shared with the cell in the
/// previous row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// A point in output coordinate space
///
/// Two points are equal only when both coordinates have identical bit
/// patterns. Ring closure and adjacency lookups key on this, so every
/// coordinate that must coincide has to come out of the same arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Create a point from its coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Get x coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Get y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Coordinates as a GeoJSON position, `[x, y]`, optionally rounded to
    /// `precision` decimal places
    pub fn to_position(&self, precision: Option<u32>) -> Vec<f64> {
        match precision {
            Some(p) => vec![
                round_coord_with_precision(self.x, p),
                round_coord_with_precision(self.y, p),
            ],
            None => vec![self.x, self.y],
        }
    }
}

/// Round a coordinate value to `precision` decimal places
fn round_coord_with_precision(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    (value * factor).round() / factor
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
