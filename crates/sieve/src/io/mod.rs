pub mod geojson;

pub use self::geojson::{GeoJsonSource, GeoJsonTarget};
