use geo::Centroid;

use crate::types::{Coordinate, Ring, to_line_string};

/// Unsigned area of a ring using the shoelace formula.
///
/// The ring is treated as closed (the last coordinate connects back to the
/// first), so an explicitly repeated closing coordinate does not change the
/// result. Rings with fewer than two coordinates have no area.
///
/// <https://en.wikipedia.org/wiki/Shoelace_formula>
pub fn ring_area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut previous = ring[ring.len() - 1];
    for &current in ring {
        sum += previous[1] * current[0] - previous[0] * current[1];
        previous = current;
    }
    (sum / 2.0).abs()
}

/// Area of the exterior ring minus the area of every hole
pub fn polygon_area(polygon: &[Ring]) -> f64 {
    match polygon.split_first() {
        None => 0.0,
        Some((exterior, holes)) => {
            let interior: f64 = holes.iter().map(|hole| ring_area(hole)).sum();
            ring_area(exterior) - interior
        }
    }
}

/// Area-weighted centroid of the polygon's outer boundary.
///
/// Holes are not taken into account. A polygon without coordinates yields
/// `[0.0, 0.0]`; degenerate boundaries (a single point, collinear points)
/// fall back to the centroid of their points or segments.
pub fn centroid(polygon: &[Ring]) -> Coordinate {
    // an empty leading ring is skipped so the first ring with coordinates acts as the boundary
    let Some(exterior) = polygon.iter().find(|ring| !ring.is_empty()) else {
        return [0.0, 0.0];
    };

    let boundary = geo_types::Polygon::new(to_line_string(exterior), vec![]);
    match boundary.centroid() {
        Some(point) if point.x().is_finite() && point.y().is_finite() => [point.x(), point.y()],
        _ => [0.0, 0.0],
    }
}
