//! Oriented boundary segments and the per-cell generator
//!
//! Every crossing point is computed from the side it lies on, with the two
//! grid positions of that side taken in a fixed order: horizontal sides left
//! to right, vertical sides top to bottom. The two cells sharing a side
//! therefore evaluate the same expression on the same operands and get a
//! bit-identical point, which is what lets the adjacency map join them.

use arrayvec::ArrayVec;

use crate::cell::Cell;
use crate::grid::PaddedGrid;
use crate::point::{Point, Side};
use crate::transform::AffineTransform;

/// A directed boundary piece, above-level region on its left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    start: Point,
    end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Get the start point of this segment
    pub fn start(&self) -> Point {
        self.start
    }

    /// Get the end point of this segment
    pub fn end(&self) -> Point {
        self.end
    }

    /// Zero-length segments carry no boundary
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// The same segment walked the other way
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

/// Locate the level crossing between two grid positions
///
/// Snaps to `p1` or `p2` when the level is within `epsilon` of that sample,
/// falls back to `p1` on a flat side, and interpolates linearly otherwise.
#[inline]
pub fn interpolate(
    p1: (f64, f64),
    v1: f64,
    p2: (f64, f64),
    v2: f64,
    level: f64,
    epsilon: f64,
) -> (f64, f64) {
    if (level - v1).abs() < epsilon {
        return p1;
    }
    if (level - v2).abs() < epsilon {
        return p2;
    }
    if v1 == v2 {
        return p1;
    }
    let t = (level - v1) / (v2 - v1);
    (p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

/// Sample-grid position of a padded index
#[inline]
fn grid_position(col: usize, row: usize) -> (f64, f64) {
    (col as f64 - 1.0, row as f64 - 1.0)
}

/// Turns classified cells of one level into output-space segments
pub struct SegmentGenerator<'a> {
    grid: &'a PaddedGrid,
    transform: &'a AffineTransform,
    level: f64,
    epsilon: f64,
    reverse: bool,
}

impl<'a> SegmentGenerator<'a> {
    pub fn new(
        grid: &'a PaddedGrid,
        transform: &'a AffineTransform,
        level: f64,
        epsilon: f64,
    ) -> Self {
        Self {
            grid,
            transform,
            level,
            epsilon,
            // A mirroring transform would turn exteriors into holes
            reverse: !transform.preserves_orientation(),
        }
    }

    /// Classify the padded cell whose top-left corner is `(col, row)`
    pub fn cell(&self, col: usize, row: usize) -> Cell {
        Cell::classify(
            col,
            row,
            self.grid.get(col, row),
            self.grid.get(col + 1, row),
            self.grid.get(col + 1, row + 1),
            self.grid.get(col, row + 1),
            self.level,
        )
    }

    /// Output-space segments of one cell (zero, one or two)
    pub fn segments(&self, cell: &Cell) -> ArrayVec<Segment, 2> {
        let mut out = ArrayVec::new();
        for &(from, to) in cell.sides() {
            let segment = Segment::new(self.crossing(cell, from), self.crossing(cell, to));
            out.push(if self.reverse {
                segment.reversed()
            } else {
                segment
            });
        }
        out
    }

    /// Visit every segment of the level in row-major cell order
    pub fn for_each_segment<F>(&self, mut f: F)
    where
        F: FnMut(Segment, (usize, usize)),
    {
        for row in 0..self.grid.cell_rows() {
            for col in 0..self.grid.cell_cols() {
                let cell = self.cell(col, row);
                if cell.is_uniform() {
                    continue;
                }
                for segment in self.segments(&cell) {
                    f(segment, (col, row));
                }
            }
        }
    }

    /// Crossing point on one side of a cell, in output coordinates
    fn crossing(&self, cell: &Cell, side: Side) -> Point {
        let (col, row) = cell.position();
        let (tl, tr, br, bl) = cell.corner_values();

        let ((c1, r1, v1), (c2, r2, v2)) = match side {
            Side::Top => ((col, row, tl), (col + 1, row, tr)),
            Side::Bottom => ((col, row + 1, bl), (col + 1, row + 1, br)),
            Side::Left => ((col, row, tl), (col, row + 1, bl)),
            Side::Right => ((col + 1, row, tr), (col + 1, row + 1, br)),
        };

        let (x, y) = interpolate(
            grid_position(c1, r1),
            v1,
            grid_position(c2, r2),
            v2,
            self.level,
            self.epsilon,
        );
        self.transform.apply(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SampleGrid;

    const EPS: f64 = 1e-10;

    #[test]
    fn test_interpolate_midpoint() {
        let p = interpolate((0.0, 0.0), 0.0, (1.0, 0.0), 10.0, 5.0, EPS);
        assert_eq!(p, (0.5, 0.0));
    }

    #[test]
    fn test_interpolate_fraction() {
        let p = interpolate((2.0, 3.0), 0.0, (2.0, 4.0), 4.0, 1.0, EPS);
        assert_eq!(p, (2.0, 3.25));
    }

    #[test]
    fn test_interpolate_snaps_to_endpoints() {
        assert_eq!(
            interpolate((0.0, 0.0), 5.0, (1.0, 0.0), 10.0, 5.0, EPS),
            (0.0, 0.0)
        );
        assert_eq!(
            interpolate((0.0, 0.0), 0.0, (1.0, 0.0), 5.0 + 1e-12, 5.0, EPS),
            (1.0, 0.0)
        );
    }

    #[test]
    fn test_interpolate_flat_side() {
        let p = interpolate((3.0, 1.0), 2.0, (4.0, 1.0), 2.0, 7.0, EPS);
        assert_eq!(p, (3.0, 1.0));
        assert!(p.0.is_finite() && p.1.is_finite());
    }

    #[test]
    fn test_segment_reversed() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let r = s.reversed();
        assert_eq!(r.start(), s.end());
        assert_eq!(r.end(), s.start());
        assert!(!s.is_degenerate());
        assert!(Segment::new(Point::new(2.0, 2.0), Point::new(2.0, 2.0)).is_degenerate());
    }

    #[test]
    fn test_single_peak_cells() {
        // One sample above the level: four cells around it emit one segment each
        let grid = SampleGrid::from_rows(&[vec![10.0]]).unwrap();
        let padded = PaddedGrid::new(&grid);
        let transform = AffineTransform::identity();
        let generator = SegmentGenerator::new(&padded, &transform, 5.0, EPS);

        let mut segments = Vec::new();
        generator.for_each_segment(|segment, cell| segments.push((segment, cell)));

        assert_eq!(segments.len(), 4);
        let cells: Vec<_> = segments.iter().map(|(_, cell)| *cell).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_shared_side_gives_identical_points() {
        let grid = SampleGrid::from_rows(&[
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 7.3, 2.9, 0.0],
            vec![0.0, 4.1, 9.7, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ])
        .unwrap();
        let padded = PaddedGrid::new(&grid);
        let transform = AffineTransform::new(100.0, 0.3, 0.0, 50.0, 0.0, 0.7).unwrap();
        let generator = SegmentGenerator::new(&padded, &transform, 3.3, EPS);

        let mut starts = Vec::new();
        let mut ends = Vec::new();
        generator.for_each_segment(|segment, _| {
            starts.push(segment.start());
            ends.push(segment.end());
        });

        // Every end is the start of exactly one other segment
        for end in &ends {
            assert_eq!(starts.iter().filter(|s| *s == end).count(), 1);
        }
    }

    #[test]
    fn test_mirroring_transform_reverses_segments() {
        let grid = SampleGrid::from_rows(&[
            vec![0.0, 0.0, 0.0],
            vec![0.0, 10.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let padded = PaddedGrid::new(&grid);
        let identity = AffineTransform::identity();
        let flipped = AffineTransform::new(0.0, 1.0, 0.0, 0.0, 0.0, -1.0).unwrap();

        let upright = SegmentGenerator::new(&padded, &identity, 5.0, EPS);
        let mirrored = SegmentGenerator::new(&padded, &flipped, 5.0, EPS);

        // Padded cell (1, 1) has the peak in its bottom-right corner
        let cell = upright.cell(1, 1);
        assert_eq!(cell.case(), 0b0010);

        let a = upright.segments(&cell)[0];
        let b = mirrored.segments(&cell)[0];

        assert_eq!(a.start(), Point::new(1.0, 1.5));
        assert_eq!(a.end(), Point::new(1.5, 1.0));
        assert_eq!(b.start(), Point::new(1.5, -1.0));
        assert_eq!(b.end(), Point::new(1.0, -1.5));
    }
}
