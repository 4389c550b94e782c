use geo_types::{Coord, LineString};

/// A 2D coordinate pair `[x, y]`
pub type Coordinate = [f64; 2];

/// Ordered boundary of a polygon. May or may not repeat its first coordinate.
pub type Ring = Vec<Coordinate>;

/// Ring 0 is the exterior, rings 1..n are holes
pub type Polygon = Vec<Ring>;

pub type MultiPolygon = Vec<Polygon>;

/// Geometry carried by a feature.
///
/// Only `Polygon` and `MultiPolygon` are sieve targets; `Point` and `Other`
/// travel through the pipeline untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    Point(Coordinate),
    Other(geo_types::Geometry<f64>),
}

impl Geometry {
    /// Human readable name of the variant, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::Point(_) => "Point",
            Self::Other(_) => "Other",
        }
    }
}

/// The single-point polygon used in place of a sieved shape
pub fn point_polygon(coordinate: Coordinate) -> Polygon {
    vec![vec![coordinate]]
}

/// True when no ring of the polygon holds a coordinate
pub fn is_empty(polygon: &[Ring]) -> bool {
    polygon.iter().all(|ring| ring.is_empty())
}

/// Convert a ring to a geo-types LineString
pub fn to_line_string(ring: &[Coordinate]) -> LineString<f64> {
    ring.iter().map(|&[x, y]| Coord { x, y }).collect()
}
