//! Geographic to planar coordinate projection.
//!
//! OSM stores positions as latitude/longitude. Distances in the graph are
//! Euclidean, so every node is first projected onto a local plane using an
//! equirectangular approximation centred on the dataset's bounding box. This
//! is only accurate for small extracts (a city or a region of one) away from
//! the poles; it is not a general-purpose map projection.

use serde::Serialize;
use tracing::debug;

use crate::graph::Coord;

/// Length of one degree of latitude in meters.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Geographic bounding box of a dataset, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Midpoint of the box as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Whether the box has zero extent on either axis.
    pub fn is_degenerate(&self) -> bool {
        self.min_lat == self.max_lat || self.min_lon == self.max_lon
    }
}

/// Projection parameters for one dataset.
///
/// Built once from the dataset's [`Bounds`] and passed by value through
/// ingestion, so independent ingestions never share projection state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    center_lat: f64,
    center_lon: f64,
    lon_scale: f64,
}

impl Projector {
    pub fn from_bounds(bounds: &Bounds) -> Self {
        let (center_lat, center_lon) = bounds.center();
        let lon_scale = center_lat.to_radians().cos() * METERS_PER_DEGREE_LAT;
        debug!(
            center_lat,
            center_lon, lon_scale, "configured equirectangular projection"
        );

        Self {
            center_lat,
            center_lon,
            lon_scale,
        }
    }

    /// Reference point as `(lat, lon)`; it projects to the origin.
    pub fn center(&self) -> (f64, f64) {
        (self.center_lat, self.center_lon)
    }

    /// Meters per degree of longitude at the reference latitude.
    pub fn lon_scale(&self) -> f64 {
        self.lon_scale
    }

    pub fn project(&self, lat: f64, lon: f64) -> Coord {
        Coord {
            x: (lon - self.center_lon) * self.lon_scale,
            y: (lat - self.center_lat) * METERS_PER_DEGREE_LAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Bounds {
        Bounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    #[test]
    fn center_projects_to_origin() {
        let projector = Projector::from_bounds(&bounds(-23.6, -23.4, -46.8, -46.6));
        let (lat, lon) = projector.center();
        let origin = projector.project(lat, lon);
        assert!(origin.x.abs() < 1e-9);
        assert!(origin.y.abs() < 1e-9);
    }

    #[test]
    fn equator_scales_longitude_like_latitude() {
        let projector = Projector::from_bounds(&bounds(-1.0, 1.0, -1.0, 1.0));
        assert!((projector.lon_scale() - METERS_PER_DEGREE_LAT).abs() < 1e-6);

        let coord = projector.project(0.5, 0.25);
        assert!((coord.x - 0.25 * METERS_PER_DEGREE_LAT).abs() < 1e-6);
        assert!((coord.y - 0.5 * METERS_PER_DEGREE_LAT).abs() < 1e-6);
    }

    #[test]
    fn longitude_shrinks_with_latitude() {
        let projector = Projector::from_bounds(&bounds(59.0, 61.0, 10.0, 11.0));
        let expected = 60.0_f64.to_radians().cos() * METERS_PER_DEGREE_LAT;
        assert!((projector.lon_scale() - expected).abs() < 1e-6);

        let coord = projector.project(60.0, 11.5);
        assert!((coord.x - expected).abs() < 1e-6);
        assert!(coord.y.abs() < 1e-9);
    }

    #[test]
    fn zero_extent_bounds_are_degenerate() {
        assert!(bounds(0.0, 0.0, 0.0, 0.0).is_degenerate());
        assert!(!bounds(0.0, 1.0, 0.0, 1.0).is_degenerate());
    }
}
