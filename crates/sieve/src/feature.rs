use serde_json::Value;

use crate::types::Geometry;

/// A logical table (layer, collection) of the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    /// Ordered attribute column names; feature values follow this order
    pub columns: Vec<String>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// One record of a table: opaque column values plus an optional geometry.
///
/// Column values are carried verbatim from the source to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    columns: Vec<Value>,
    geometry: Option<Geometry>,
    reduced: bool,
}

impl Feature {
    pub fn new(columns: Vec<Value>, geometry: Option<Geometry>) -> Self {
        Self {
            columns,
            geometry,
            reduced: false,
        }
    }

    pub fn columns(&self) -> &[Value] {
        &self.columns
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Move the geometry out, leaving the feature without one
    pub fn take_geometry(&mut self) -> Option<Geometry> {
        self.geometry.take()
    }

    pub fn update_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    /// Whether the sieve routed this feature for centroid substitution
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    pub fn mark_reduced(&mut self, reduced: bool) {
        self.reduced = reduced;
    }
}

impl From<Geometry> for Feature {
    fn from(geometry: Geometry) -> Self {
        Self::new(Vec::new(), Some(geometry))
    }
}
