//! Consumers of per-level polygons
//!
//! [`contour_into`](crate::contour_into) hands each level to a
//! [`PolygonSink`] in request order. [`GeoJsonSink`] collects the levels into
//! a GeoJSON `FeatureCollection`, one `MultiPolygon` feature per level.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoValue};

use crate::error::{ContourError, Result};
use crate::polygon::Polygon;

/// Receives the polygons of each level
pub trait PolygonSink {
    /// Accept the polygons of one level; an error aborts the run
    fn accept(&mut self, level: f64, polygons: &[Polygon]) -> Result<()>;
}

/// Builds a GeoJSON FeatureCollection from contoured levels
///
/// Each level becomes a Feature with MultiPolygon geometry and a `"level"`
/// property. Rings are written closed, exterior first.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonSink {
    precision: Option<u32>,
    include_empty: bool,
    features: Vec<Feature>,
}

impl GeoJsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round output coordinates to `precision` decimal places
    ///
    /// 5 decimals is roughly 1 meter for lon/lat output.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Also emit features for levels without polygons
    pub fn include_empty_levels(mut self, include: bool) -> Self {
        self.include_empty = include;
        self
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn into_feature_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            foreign_members: None,
            features: self.features,
        }
    }
}

impl PolygonSink for GeoJsonSink {
    fn accept(&mut self, level: f64, polygons: &[Polygon]) -> Result<()> {
        if polygons.is_empty() && !self.include_empty {
            return Ok(());
        }

        let mut multi_polygon = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            let bad = polygon
                .rings()
                .flat_map(|ring| ring.points())
                .find(|p| !p.is_finite());
            if let Some(p) = bad {
                return Err(ContourError::sink(level, format!("non-finite coordinate {p}")));
            }
            multi_polygon.push(polygon.to_rings(self.precision));
        }

        let mut properties = JsonObject::new();
        properties.insert("level".to_string(), serde_json::json!(level));

        self.features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::MultiPolygon(multi_polygon))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
        Ok(())
    }
}
