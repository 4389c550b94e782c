//! # Polygon Sieve Library
//!
//! Filters polygon geometries of a spatial dataset against an area threshold.
//! Polygons and holes with an area at or below `resolution²` are sieved:
//! holes are dropped, whole polygons are replaced by their centroid (or
//! removed when centroid replacement is turned off).
//!
//! ## Core Features
//!
//! - **Area Reduction**: shoelace ring area, polygon area and centroid math
//! - **Concurrent Pipeline**: reader, sieve filter, centroid processor and
//!   writer run as separate stages connected by bounded channels
//! - **Pluggable Datasets**: implement [`Source`] and [`Target`] for any store
//! - **GeoJSON Support**: read and write FeatureCollections out of the box
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sieve::{GeoJsonSource, GeoJsonTarget, SieveConfig, run_sieve};
//!
//! # async fn example() -> sieve::Result<()> {
//! let config = SieveConfig {
//!     resolution: 10.0,
//!     ..Default::default()
//! };
//!
//! let source = GeoJsonSource::open("parcels/")?;
//! let target = GeoJsonTarget::new("sieved/", config.page_size);
//! let report = run_sieve(source, target, &config).await?;
//! println!("{} features written", report.total_features());
//! # Ok(())
//! # }
//! ```
//!
//! ## Sieving Geometry Directly
//!
//! ```rust
//! use sieve::algorithms::{polygon_area, reduce_polygon};
//!
//! let square = vec![vec![[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]];
//! assert_eq!(polygon_area(&square), 100.0);
//! assert!(reduce_polygon(square, 11.0 * 11.0).needs_substitution);
//! ```

pub mod error;
pub mod types;
pub mod feature;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;

// Re-exports for convenience
pub use error::{Result, SieveError};
pub use types::{Coordinate, Geometry, MultiPolygon, Polygon, Ring};
pub use feature::{Feature, Table};
pub use config::SieveConfig;
pub use traits::{FeatureIter, Source, Target};
pub use pipeline::{
    PipelineState, Stage, run_sieve, sieve_table,
    report::{FilterStats, ProcessorStats, SieveReport, TableReport, WriterStats},
};
pub use io::{GeoJsonSource, GeoJsonTarget};
