//! Polygon nesting resolution
//!
//! Rings arrive from the tracer already classified by orientation. Holes are
//! attached to the exterior that contains them; exteriors are visited from
//! the smallest area up so that a hole inside an island inside a lake ends up
//! on the island, not on the outer shore.

use crate::ring::{LinearRing, Location};

/// An exterior ring with the holes cut out of it
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: LinearRing,
    interiors: Vec<LinearRing>,
}

impl Polygon {
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    pub fn exterior(&self) -> &LinearRing {
        &self.exterior
    }

    pub fn interiors(&self) -> &[LinearRing] {
        &self.interiors
    }

    /// All rings, exterior first
    pub fn rings(&self) -> impl Iterator<Item = &LinearRing> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// Exterior area minus the area of the holes
    pub fn area(&self) -> f64 {
        self.exterior.area() - self.interiors.iter().map(LinearRing::area).sum::<f64>()
    }

    /// GeoJSON polygon coordinates, exterior ring first
    pub fn to_rings(&self, precision: Option<u32>) -> Vec<Vec<Vec<f64>>> {
        self.rings().map(|ring| ring.to_positions(precision)).collect()
    }
}

/// Polygons of one level plus the holes no exterior claimed
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub polygons: Vec<Polygon>,
    pub orphans: Vec<LinearRing>,
}

/// Test whether `hole` lies within `container`
///
/// Boundary contact counts as containment. The first hole vertex strictly
/// off the container boundary decides; a hole lying entirely on the boundary
/// is contained.
pub fn ring_in_ring(hole: &LinearRing, container: &LinearRing) -> bool {
    for &point in hole.vertices() {
        match container.locate(point) {
            Location::Boundary => continue,
            Location::Inside => return true,
            Location::Outside => return false,
        }
    }
    true
}

/// Group classified rings into polygons
///
/// The order of the returned polygons follows the order the exteriors were
/// traced in. Holes keep their traced order within each polygon.
pub fn assemble_polygons(rings: Vec<LinearRing>) -> Assembly {
    let (holes, exteriors): (Vec<_>, Vec<_>) = rings.into_iter().partition(LinearRing::is_hole);

    let hole_bboxes: Vec<_> = holes.iter().map(LinearRing::bbox).collect();
    let mut owner: Vec<Option<usize>> = vec![None; holes.len()];

    let mut by_area: Vec<usize> = (0..exteriors.len()).collect();
    by_area.sort_by(|&i, &j| exteriors[i].area().total_cmp(&exteriors[j].area()));

    let mut unattached = holes.len();
    for &e in &by_area {
        if unattached == 0 {
            break;
        }
        let exterior = &exteriors[e];
        let bbox = exterior.bbox();

        for (h, hole) in holes.iter().enumerate() {
            if owner[h].is_some() {
                continue;
            }
            // Fast rejection before the ring test
            if !hole_bboxes[h].is_inside(&bbox) {
                continue;
            }
            if ring_in_ring(hole, exterior) {
                owner[h] = Some(e);
                unattached -= 1;
            }
        }
    }

    let mut interiors: Vec<Vec<LinearRing>> = vec![Vec::new(); exteriors.len()];
    let mut orphans = Vec::new();
    for (hole, owner) in holes.into_iter().zip(owner) {
        match owner {
            Some(e) => interiors[e].push(hole),
            None => orphans.push(hole),
        }
    }

    let polygons = exteriors
        .into_iter()
        .zip(interiors)
        .map(|(exterior, interiors)| Polygon::new(exterior, interiors))
        .collect();

    Assembly { polygons, orphans }
}
