//! Ring reconstruction and orientation
//!
//! This module drains an [`AdjacencyMap`] into closed rings and classifies
//! each ring as an exterior boundary or a hole from the sign of its shoelace
//! sum.

use std::collections::HashSet;

use crate::adjacency::AdjacencyMap;
use crate::error::{ContourError, Result};
use crate::point::Point;

/// Which side of a polygon a ring bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Outer boundary, shoelace sum `<= 0`
    Exterior,
    /// Hole, shoelace sum `> 0`
    Interior,
}

/// Where a point lies relative to a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BBox {
    /// Check if this bbox lies within another bbox
    pub fn is_inside(&self, other: &BBox) -> bool {
        self.min_x >= other.min_x
            && self.max_x <= other.max_x
            && self.min_y >= other.min_y
            && self.max_y <= other.max_y
    }
}

/// A closed sequence of points; the first point is repeated at the end
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    points: Vec<Point>,
}

impl LinearRing {
    /// Build a ring, appending the first point if the sequence is open
    pub fn new(mut points: Vec<Point>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        Self { points }
    }

    /// All points, closing point included
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Points without the repeated closing point
    pub fn vertices(&self) -> &[Point] {
        &self.points[..self.points.len().saturating_sub(1)]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() >= 2 && self.points.first() == self.points.last()
    }

    /// Number of distinct vertices
    pub fn distinct_points(&self) -> usize {
        self.vertices().iter().collect::<HashSet<_>>().len()
    }

    /// `Σ (x1 - x0) * (y1 + y0)` over consecutive points
    ///
    /// Equals minus twice the signed area: positive for clockwise rings in a
    /// y-up frame.
    pub fn shoelace_sum(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].x() - w[0].x()) * (w[1].y() + w[0].y()))
            .sum()
    }

    /// Signed area, positive for counter-clockwise rings in a y-up frame
    pub fn signed_area(&self) -> f64 {
        -0.5 * self.shoelace_sum()
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Exterior when the shoelace sum is not positive, hole otherwise
    pub fn orientation(&self) -> Orientation {
        if self.shoelace_sum() > 0.0 {
            Orientation::Interior
        } else {
            Orientation::Exterior
        }
    }

    pub fn is_hole(&self) -> bool {
        self.orientation() == Orientation::Interior
    }

    /// Compute bounding box from ring points
    pub fn bbox(&self) -> BBox {
        let mut bbox = BBox {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for point in &self.points {
            bbox.min_x = bbox.min_x.min(point.x());
            bbox.max_x = bbox.max_x.max(point.x());
            bbox.min_y = bbox.min_y.min(point.y());
            bbox.max_y = bbox.max_y.max(point.y());
        }
        bbox
    }

    /// Locate a point against this ring
    ///
    /// Boundary hits are exact: the point must lie on an edge with no
    /// tolerance. Otherwise ray casting decides.
    /// Reference: http://www.ecse.rpi.edu/Homepages/wrf/Research/Short_Notes/pnpoly.html
    pub fn locate(&self, point: Point) -> Location {
        let (px, py) = (point.x(), point.y());
        let mut inside = false;

        for w in self.points.windows(2) {
            let (one, two) = (w[0], w[1]);
            if on_segment(one, two, point) {
                return Location::Boundary;
            }
            if ((one.y() > py) != (two.y() > py))
                && (px < (two.x() - one.x()) * (py - one.y()) / (two.y() - one.y()) + one.x())
            {
                inside = !inside;
            }
        }

        if inside {
            Location::Inside
        } else {
            Location::Outside
        }
    }

    /// Strict or boundary containment of a single point
    pub fn contains_point(&self, point: Point) -> bool {
        self.locate(point) != Location::Outside
    }

    /// The same ring walked the other way
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// The same ring started `n` vertices later
    pub fn rotated(&self, n: usize) -> Self {
        let mut vertices = self.vertices().to_vec();
        if !vertices.is_empty() {
            let n = n % vertices.len();
            vertices.rotate_left(n);
        }
        Self::new(vertices)
    }

    /// Coordinates as GeoJSON positions, optionally rounded
    pub fn to_positions(&self, precision: Option<u32>) -> Vec<Vec<f64>> {
        self.points.iter().map(|p| p.to_position(precision)).collect()
    }
}

/// Whether `p` lies exactly on the segment `a`-`b`
fn on_segment(a: Point, b: Point, p: Point) -> bool {
    let cross = (b.x() - a.x()) * (p.y() - a.y()) - (b.y() - a.y()) * (p.x() - a.x());
    cross == 0.0
        && p.x() >= a.x().min(b.x())
        && p.x() <= a.x().max(b.x())
        && p.y() >= a.y().min(b.y())
        && p.y() <= a.y().max(b.y())
}

/// Counters collected while tracing one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Segments pulled out of the adjacency map
    pub segments_consumed: usize,
    /// Rings returned
    pub rings: usize,
    /// Closed chains dropped for having no area
    pub discarded: usize,
}

/// Drains an adjacency map into closed rings
pub struct RingTracer {
    map: AdjacencyMap,
    level: f64,
    stats: TraceStats,
}

impl RingTracer {
    /// Create a tracer that owns the level's segments
    pub fn new(map: AdjacencyMap, level: f64) -> Self {
        Self {
            map,
            level,
            stats: TraceStats::default(),
        }
    }

    /// Counters for the rings traced so far
    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Consume every segment and return the rings they form
    ///
    /// Each chain grows forward from the seed's end and backward from its
    /// start until neither direction finds a continuation. Every isoline is
    /// closed by the padding, so a chain whose ends do not meet means the
    /// segment graph is broken.
    pub fn trace(&mut self) -> Result<Vec<LinearRing>> {
        let mut rings = Vec::new();

        while let Some((seed_id, seed)) = self.map.take_any() {
            let mut consumed = 1;
            let mut forward = vec![seed.end()];
            let mut backward = vec![seed.start()];
            let mut head = Some(seed.end());
            let mut tail = Some(seed.start());

            while head.is_some() || tail.is_some() {
                if let Some(point) = head {
                    head = self.map.take_starting_at(point).map(|next| {
                        forward.push(next.end());
                        consumed += 1;
                        next.end()
                    });
                }
                if let Some(point) = tail {
                    tail = self.map.take_ending_at(point).map(|prev| {
                        backward.push(prev.start());
                        consumed += 1;
                        prev.start()
                    });
                }
            }

            self.stats.segments_consumed += consumed;

            backward.reverse();
            backward.extend(forward);
            let points = backward;

            if points.first() != points.last() {
                let dangling = points.last().copied().unwrap_or_else(|| seed.end());
                return Err(ContourError::AlgorithmInvariantViolation {
                    level: self.level,
                    point: dangling,
                    cell: self.map.origin(seed_id).unwrap_or_default(),
                });
            }

            let ring = LinearRing { points };
            if ring.distinct_points() < 3 || ring.shoelace_sum() == 0.0 {
                tracing::trace!(
                    level = self.level,
                    points = ring.len(),
                    "discarding zero-area ring"
                );
                self.stats.discarded += 1;
                continue;
            }

            self.stats.rings += 1;
            rings.push(ring);
        }

        Ok(rings)
    }
}
