use serde::{Deserialize, Serialize};
use tracing::info;

/// Counters kept by the sieve filter stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Features received from the reader
    pub total: u64,
    /// Features without a polygon geometry
    pub non_polygon: u64,
    pub multi_polygon: u64,
    /// Features handed straight to the writer
    pub passed: u64,
    /// Features routed to the centroid processor
    pub routed: u64,
}

/// Counters kept by the centroid processor stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorStats {
    pub features: u64,
    /// Polygons (or multi-polygon members) replaced by their centroid
    pub substituted: u64,
    /// Polygons (or multi-polygon members) removed without replacement
    pub dropped: u64,
}

/// Counters kept by the target writer stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterStats {
    pub features: u64,
    pub pages: u64,
}

/// Summary of one table that went through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub filter: FilterStats,
    pub processor: ProcessorStats,
    pub writer: WriterStats,
}

impl TableReport {
    pub fn log(&self) {
        info!(table = %self.table, "    total features: {}", self.filter.total);
        info!(table = %self.table, "      non-polygons: {}", self.filter.non_polygon);
        if self.filter.total != self.filter.non_polygon {
            info!(table = %self.table, "     multipolygons: {}", self.filter.multi_polygon);
        }
        info!(table = %self.table, "       not reduced: {}", self.filter.passed);
        if self.filter.routed > 0 {
            info!(
                table = %self.table,
                "           reduced: {} ({} substituted, {} dropped)",
                self.filter.routed,
                self.processor.substituted,
                self.processor.dropped
            );
        }
        info!(
            table = %self.table,
            "           written: {} in {} pages",
            self.writer.features,
            self.writer.pages
        );
    }
}

/// Summary of a whole sieve run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SieveReport {
    pub tables: Vec<TableReport>,
}

impl SieveReport {
    pub fn total_features(&self) -> u64 {
        self.tables.iter().map(|table| table.writer.features).sum()
    }
}
