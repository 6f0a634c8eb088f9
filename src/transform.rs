//! Affine mapping from grid positions to output coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{ContourError, Result};
use crate::point::Point;

/// Six-coefficient affine transform `(c, a, b, f, d, e)`
///
/// A grid position `(x, y)` = `(column, row)` maps to
///
/// ```text
/// X = c + a * (x + 0.5) + b * (y + 0.5)
/// Y = f + d * (x + 0.5) + e * (y + 0.5)
/// ```
///
/// The half-cell offset puts each sample at the centre of its raster cell.
/// The coefficient order is the one GDAL uses for geotransforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub c: f64,
    pub a: f64,
    pub b: f64,
    pub f: f64,
    pub d: f64,
    pub e: f64,
}

impl AffineTransform {
    /// Create a transform, rejecting non-finite or singular coefficients
    pub fn new(c: f64, a: f64, b: f64, f: f64, d: f64, e: f64) -> Result<Self> {
        let transform = Self { c, a, b, f, d, e };
        transform.validate()?;
        Ok(transform)
    }

    /// Build from a coefficient slice in `(c, a, b, f, d, e)` order
    ///
    /// # Example
    ///
    /// ```
    /// use geo_contour_polygons::AffineTransform;
    ///
    /// let t = AffineTransform::from_coefficients(&[0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
    /// assert_eq!(t, AffineTransform::identity());
    /// assert!(AffineTransform::from_coefficients(&[0.0, 1.0]).is_err());
    /// ```
    pub fn from_coefficients(coefficients: &[f64]) -> Result<Self> {
        match *coefficients {
            [c, a, b, f, d, e] => Self::new(c, a, b, f, d, e),
            _ => Err(ContourError::configuration(format!(
                "affine transform needs 6 coefficients, got {}",
                coefficients.len()
            ))),
        }
    }

    /// Transform with unit cells: `X = x + 0.5`, `Y = y + 0.5`
    pub fn identity() -> Self {
        Self {
            c: 0.0,
            a: 1.0,
            b: 0.0,
            f: 0.0,
            d: 0.0,
            e: 1.0,
        }
    }

    /// Coefficients in `(c, a, b, f, d, e)` order
    pub fn coefficients(&self) -> [f64; 6] {
        [self.c, self.a, self.b, self.f, self.d, self.e]
    }

    /// Check that every coefficient is finite and the linear part is invertible
    pub fn validate(&self) -> Result<()> {
        if self.coefficients().iter().any(|v| !v.is_finite()) {
            return Err(ContourError::configuration(format!(
                "affine transform has non-finite coefficients: {:?}",
                self.coefficients()
            )));
        }
        if self.determinant() == 0.0 {
            return Err(ContourError::configuration(
                "affine transform is singular (a*e - b*d == 0)",
            ));
        }
        Ok(())
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Whether the mapping keeps counter-clockwise rings counter-clockwise
    pub fn preserves_orientation(&self) -> bool {
        self.determinant() > 0.0
    }

    /// Map a grid position (column, row) to output coordinates
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> Point {
        let px = x + 0.5;
        let py = y + 0.5;
        Point::new(
            self.c + self.a * px + self.b * py,
            self.f + self.d * px + self.e * py,
        )
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}
