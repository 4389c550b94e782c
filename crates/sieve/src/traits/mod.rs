use crate::{
    error::Result,
    feature::{Feature, Table},
};

/// Features of one table, in dataset order
pub type FeatureIter<'a> = Box<dyn Iterator<Item = Result<Feature>> + Send + 'a>;

/// A dataset the sieve reads from
pub trait Source: Send {
    /// Discover the tables that hold features
    fn tables(&self) -> Result<Vec<Table>>;

    /// Read every feature of `table`.
    ///
    /// An `Err` item ends the read early; features already produced are kept.
    fn read_features<'a>(&'a mut self, table: &Table) -> Result<FeatureIter<'a>>;
}

/// A dataset the sieve writes to
pub trait Target: Send {
    /// Prepare the target to receive the given tables
    fn init(&mut self, tables: &[Table]) -> Result<()>;

    /// Number of features committed per page
    fn page_size(&self) -> usize;

    /// Optional memory limit in megabytes, informational only
    fn memory_limit(&self) -> Option<f64> {
        None
    }

    fn begin_table(&mut self, table: &Table) -> Result<()>;

    /// Commit one page of features as a unit
    fn write_page(&mut self, table: &Table, page: Vec<Feature>) -> Result<()>;

    fn finish_table(&mut self, table: &Table) -> Result<()>;
}
