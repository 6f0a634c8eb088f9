//! # geo-contour-polygons
//!
//! A Rust implementation of the marching squares algorithm for generating
//! filled contour polygons from 2D scalar fields.
//!
//! For every requested level the library returns the regions where the field
//! is at or above that level, as polygons with an exterior ring and zero or
//! more holes. Output coordinates come from a six-coefficient affine
//! transform, so they can be pixel positions, projected meters or lon/lat.
//!
//! ## Pipeline
//!
//! Each level runs through the same steps:
//!
//! 1. The sample grid is padded with a sentinel far below any level, so every
//!    region touching the raster edge closes into a ring.
//! 2. Each cell is classified against the level (16 cases, saddles resolved by
//!    the cell mean) and emits oriented segments with the above-level region
//!    on their left.
//! 3. Segments go into an adjacency map keyed by exact endpoint and are
//!    traced back into closed rings.
//! 4. The sign of each ring's shoelace sum tells exteriors from holes, and
//!    holes are attached to the smallest exterior that contains them.
//!
//! ## Example
//!
//! ```
//! use geo_contour_polygons::{contour, AffineTransform, ContourOptions, SampleGrid};
//!
//! // A ring of high values around a low centre
//! let grid = SampleGrid::from_rows(&[
//!     vec![0.0, 0.0, 0.0, 0.0, 0.0],
//!     vec![0.0, 9.0, 9.0, 9.0, 0.0],
//!     vec![0.0, 9.0, 0.0, 9.0, 0.0],
//!     vec![0.0, 9.0, 9.0, 9.0, 0.0],
//!     vec![0.0, 0.0, 0.0, 0.0, 0.0],
//! ])?;
//!
//! // 0.25 degree cells, north-up, top-left corner at (-100, 40)
//! let transform = AffineTransform::new(-100.0, 0.25, 0.0, 40.0, 0.0, -0.25)?;
//!
//! let set = contour(&grid, &transform, &[5.0], &ContourOptions::default())?;
//! let polygon = &set.results()[0].polygons()[0];
//! assert_eq!(polygon.interiors().len(), 1);
//! # Ok::<(), geo_contour_polygons::ContourError>(())
//! ```
//!
//! ## GeoJSON output
//!
//! ```
//! use geo_contour_polygons::{contour_into, AffineTransform, ContourOptions, GeoJsonSink, SampleGrid};
//!
//! let grid = SampleGrid::from_row_major(&[0.0, 4.0, 8.0, 12.0], 2, 2)?;
//! let mut sink = GeoJsonSink::new().with_precision(5);
//! contour_into(
//!     &grid,
//!     &AffineTransform::identity(),
//!     &[2.0, 6.0, 10.0],
//!     &ContourOptions::default(),
//!     &mut sink,
//! )?;
//!
//! let collection = sink.into_feature_collection();
//! assert_eq!(collection.features.len(), 3);
//! # Ok::<(), geo_contour_polygons::ContourError>(())
//! ```
//!
//! ## Performance
//!
//! - **Parallel processing**: one rayon task per level
//! - **Shared input**: tasks only read the padded grid and transform
//! - **Ordered output**: results line up with the requested levels

mod adjacency;
mod cell;
mod config;
mod error;
mod grid;
mod marching_squares;
mod point;
mod polygon;
mod ring;
mod segment;
mod sink;
mod transform;

pub use adjacency::{AdjacencyMap, SegmentId};
pub use cell::{Cell, CASE_TABLE};
pub use config::{ContourOptions, DEFAULT_EPSILON};
pub use error::{ContourError, Result};
pub use grid::{PaddedGrid, SampleGrid, MAX_SAMPLE_MAGNITUDE, PADDING_SENTINEL};
pub use marching_squares::{
    contour, contour_into, generate_levels, process_level, ContourSet, LevelResult, LevelStats,
    MAX_GENERATED_LEVELS,
};
pub use point::{Point, Side};
pub use polygon::{assemble_polygons, ring_in_ring, Assembly, Polygon};
pub use ring::{BBox, LinearRing, Location, Orientation, RingTracer, TraceStats};
pub use segment::{interpolate, Segment, SegmentGenerator};
pub use sink::{GeoJsonSink, PolygonSink};
pub use transform::AffineTransform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_pipeline_by_hand() {
        // Same steps `process_level` runs, driven through the public types
        let grid = SampleGrid::from_rows(&[vec![0.0, 0.0], vec![0.0, 8.0]]).unwrap();
        let padded = PaddedGrid::new(&grid);
        let transform = AffineTransform::identity();
        let generator = SegmentGenerator::new(&padded, &transform, 4.0, DEFAULT_EPSILON);

        let mut map = AdjacencyMap::new();
        generator.for_each_segment(|segment, cell| {
            map.insert(segment, cell);
        });
        // Crossings towards the padding land on the peak itself, so the
        // corner cell's segment collapses and is dropped
        assert_eq!(map.len(), 3);
        assert_eq!(map.ignored(), 1);

        let rings = RingTracer::new(map, 4.0).trace().unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].orientation(), Orientation::Exterior);

        let assembly = assemble_polygons(rings);
        assert_eq!(assembly.polygons.len(), 1);
        assert!(assembly.orphans.is_empty());
    }

    #[test]
    fn test_struct_sizes() {
        use std::mem::size_of;
        eprintln!("=== Struct Sizes ===");
        eprintln!("Point: {} bytes", size_of::<Point>());
        eprintln!("Segment: {} bytes", size_of::<Segment>());
        eprintln!("Cell: {} bytes", size_of::<Cell>());
        eprintln!("Option<Segment>: {} bytes", size_of::<Option<Segment>>());
        assert_eq!(size_of::<Segment>(), 2 * size_of::<Point>());
    }
}
