use crate::{
    algorithms::area::{polygon_area, ring_area},
    types::{MultiPolygon, Polygon, Ring, is_empty},
};

/// Outcome of sieving a polygon or multi-polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction<G> {
    pub geometry: G,
    /// The geometry (or at least one member of it) must be replaced by its centroid
    pub needs_substitution: bool,
}

impl<G> Reduction<G> {
    fn kept(geometry: G) -> Self {
        Self {
            geometry,
            needs_substitution: false,
        }
    }

    fn substitute(geometry: G) -> Self {
        Self {
            geometry,
            needs_substitution: true,
        }
    }
}

/// Whether a polygon falls at or below the area threshold.
///
/// A zero threshold disables sieving and empty polygons have nothing to
/// substitute, so neither is ever sieved.
pub fn is_sieved(polygon: &[Ring], min_area: f64) -> bool {
    min_area > 0.0 && !is_empty(polygon) && polygon_area(polygon) <= min_area
}

/// Sieve a single polygon against `min_area`.
///
/// A surviving polygon keeps its exterior and only the holes whose own area
/// exceeds `min_area`. A sieved polygon is returned untouched and flagged for
/// centroid substitution.
pub fn reduce_polygon(polygon: Polygon, min_area: f64) -> Reduction<Polygon> {
    if min_area <= 0.0 {
        return Reduction::kept(polygon);
    }
    if is_sieved(&polygon, min_area) {
        return Reduction::substitute(polygon);
    }
    if polygon.len() <= 1 {
        return Reduction::kept(polygon);
    }

    let mut rings = polygon.into_iter();
    let mut sieved: Polygon = rings.next().into_iter().collect();
    sieved.extend(rings.filter(|hole| ring_area(hole) > min_area));
    Reduction::kept(sieved)
}

/// Sieve every member of a multi-polygon independently.
///
/// Members needing substitution are left in place (the centroid stage replaces
/// them); the flag is raised when any member needs it.
pub fn reduce_multi_polygon(multi_polygon: MultiPolygon, min_area: f64) -> Reduction<MultiPolygon> {
    let mut needs_substitution = false;
    let members = multi_polygon
        .into_iter()
        .map(|polygon| {
            let reduction = reduce_polygon(polygon, min_area);
            needs_substitution |= reduction.needs_substitution;
            reduction.geometry
        })
        .collect();

    Reduction {
        geometry: members,
        needs_substitution,
    }
}
