//! The four stages of the sieve pipeline.
//!
//! Every stage runs on its own blocking thread and talks to its neighbours
//! through bounded channels only. A stage stops when its input closes or when
//! the stage it sends to has gone away, dropping its own channel ends so the
//! shutdown travels through the whole pipeline.

use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{debug, trace, warn};

use crate::{
    algorithms::{centroid, is_sieved, reduce_multi_polygon, reduce_polygon},
    error::Result,
    feature::{Feature, Table},
    pipeline::{
        Stage,
        report::{FilterStats, ProcessorStats, WriterStats},
    },
    traits::{Source, Target},
    types::{Geometry, point_polygon},
};

/// Where the sieve filter sends a feature
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Ready to be written
    Direct(Feature),
    /// Needs the centroid processor
    Substitute(Feature),
}

/// Sieve the geometry of one feature and decide its route.
pub fn sieve_feature(mut feature: Feature, min_area: f64, stats: &mut FilterStats) -> Route {
    stats.total += 1;

    let needs_substitution = match feature.take_geometry() {
        Some(Geometry::Polygon(polygon)) => {
            let reduction = reduce_polygon(polygon, min_area);
            feature.update_geometry(Geometry::Polygon(reduction.geometry));
            reduction.needs_substitution
        }
        Some(Geometry::MultiPolygon(multi_polygon)) => {
            stats.multi_polygon += 1;
            let reduction = reduce_multi_polygon(multi_polygon, min_area);
            feature.update_geometry(Geometry::MultiPolygon(reduction.geometry));
            reduction.needs_substitution
        }
        other => {
            stats.non_polygon += 1;
            if let Some(geometry) = other {
                trace!(kind = geometry.kind(), "passing through non-polygon geometry");
                feature.update_geometry(geometry);
            }
            false
        }
    };

    feature.mark_reduced(needs_substitution);
    if needs_substitution {
        stats.routed += 1;
        Route::Substitute(feature)
    } else {
        stats.passed += 1;
        Route::Direct(feature)
    }
}

/// Replace the sieved parts of a routed feature by their centroid.
///
/// A polygon is replaced as a whole; a multi-polygon only has its sieved
/// members replaced, in place. With `replace_with_centroid` off the sieved
/// parts are dropped instead.
pub fn substitute_feature(
    mut feature: Feature,
    min_area: f64,
    replace_with_centroid: bool,
    stats: &mut ProcessorStats,
) -> Feature {
    stats.features += 1;

    match feature.take_geometry() {
        Some(Geometry::Polygon(polygon)) => {
            let replacement = if replace_with_centroid {
                stats.substituted += 1;
                point_polygon(centroid(&polygon))
            } else {
                stats.dropped += 1;
                Vec::new()
            };
            feature.update_geometry(Geometry::Polygon(replacement));
        }
        Some(Geometry::MultiPolygon(multi_polygon)) => {
            let members = multi_polygon
                .into_iter()
                .filter_map(|polygon| {
                    if !is_sieved(&polygon, min_area) {
                        Some(polygon)
                    } else if replace_with_centroid {
                        stats.substituted += 1;
                        Some(point_polygon(centroid(&polygon)))
                    } else {
                        stats.dropped += 1;
                        None
                    }
                })
                .collect();
            feature.update_geometry(Geometry::MultiPolygon(members));
        }
        other => {
            // only polygons are routed here; anything else is forwarded as is
            if let Some(geometry) = other {
                feature.update_geometry(geometry);
            }
        }
    }

    feature
}

/// Source reader: pull the table's features from the source into the pipeline.
pub(crate) fn read_stage<S: Source>(source: &mut S, table: &Table, output: Sender<Feature>) -> Result<u64> {
    let mut count = 0;
    for feature in source.read_features(table)? {
        if output.blocking_send(feature?).is_err() {
            warn!(table = %table.name, stage = %Stage::Reader, "downstream closed, stopping early");
            break;
        }
        count += 1;
    }
    debug!(table = %table.name, features = count, "source exhausted");
    Ok(count)
}

/// Sieve filter: route each feature to the writer or the centroid processor.
pub(crate) fn filter_stage(
    mut input: Receiver<Feature>,
    direct: Sender<Feature>,
    substitute: Sender<Feature>,
    min_area: f64,
) -> FilterStats {
    let mut stats = FilterStats::default();
    while let Some(feature) = input.blocking_recv() {
        let sent = match sieve_feature(feature, min_area, &mut stats) {
            Route::Direct(feature) => direct.blocking_send(feature),
            Route::Substitute(feature) => substitute.blocking_send(feature),
        };
        if sent.is_err() {
            warn!(stage = %Stage::Filter, "downstream closed, stopping early");
            break;
        }
    }
    stats
}

/// Centroid processor: substitute the sieved polygons of routed features.
pub(crate) fn processor_stage(
    mut input: Receiver<Feature>,
    output: Sender<Feature>,
    min_area: f64,
    replace_with_centroid: bool,
) -> ProcessorStats {
    let mut stats = ProcessorStats::default();
    while let Some(feature) = input.blocking_recv() {
        let feature = substitute_feature(feature, min_area, replace_with_centroid, &mut stats);
        if output.blocking_send(feature).is_err() {
            warn!(stage = %Stage::Processor, "downstream closed, stopping early");
            break;
        }
    }
    stats
}

/// Target writer: collect features into pages and commit them to the target.
pub(crate) fn write_stage<T: Target>(
    target: &mut T,
    table: &Table,
    mut input: Receiver<Feature>,
) -> Result<WriterStats> {
    let page_size = target.page_size().max(1);
    let mut stats = WriterStats::default();

    target.begin_table(table)?;
    let mut page = Vec::with_capacity(page_size);
    while let Some(feature) = input.blocking_recv() {
        page.push(feature);
        if page.len() >= page_size {
            let full = std::mem::replace(&mut page, Vec::with_capacity(page_size));
            commit_page(target, table, full, &mut stats)?;
        }
    }
    if !page.is_empty() {
        commit_page(target, table, page, &mut stats)?;
    }
    target.finish_table(table)?;

    Ok(stats)
}

fn commit_page<T: Target>(target: &mut T, table: &Table, page: Vec<Feature>, stats: &mut WriterStats) -> Result<()> {
    let len = page.len() as u64;
    target.write_page(table, page)?;
    stats.features += len;
    stats.pages += 1;
    debug!(table = %table.name, page = stats.pages, features = len, "page committed");
    Ok(())
}
