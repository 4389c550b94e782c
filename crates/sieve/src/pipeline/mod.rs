pub mod report;
pub mod stages;

use strum::Display;
use tokio::{sync::mpsc, task};
use tracing::{debug, error, info, warn};

use crate::{
    config::SieveConfig,
    error::{Result, SieveError},
    feature::Table,
    traits::{Source, Target},
};
use report::{SieveReport, TableReport};

/// The concurrently running stages of a table pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Reader,
    Filter,
    Processor,
    Writer,
}

/// Lifecycle of a table pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PipelineState {
    Idle,
    /// All four stages are running
    Running,
    /// The reader is exhausted; closure is travelling down the pipeline
    Draining,
    /// The writer has flushed its last page
    Done,
}

struct StateTracker<'a> {
    table: &'a str,
    state: PipelineState,
}

impl<'a> StateTracker<'a> {
    fn new(table: &'a str) -> Self {
        Self {
            table,
            state: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(table = self.table, from = %self.state, to = %next, "pipeline state");
        self.state = next;
    }
}

fn join_error(stage: Stage, err: task::JoinError) -> SieveError {
    error!(stage = %stage, "pipeline stage did not complete: {}", err);
    SieveError::StagePanicked(stage)
}

/// Sieve one table: run the reader, filter, centroid processor and writer
/// concurrently and wait until the writer has committed everything.
///
/// The source and target are moved into their stages and handed back once the
/// table is done. Every stage is joined before returning, and the first
/// failure in pipeline order is reported.
///
/// Pages are cut at [`Target::page_size`]. `config.page_size` is only the value
/// targets are built with; when the two disagree the target wins.
pub async fn sieve_table<S, T>(
    mut source: S,
    mut target: T,
    table: &Table,
    config: &SieveConfig,
) -> Result<(S, T, TableReport)>
where
    S: Source + 'static,
    T: Target + 'static,
{
    config.validate()?;
    let min_area = config.min_area();
    let replace_with_centroid = config.replace_with_centroid;
    let mut tracker = StateTracker::new(&table.name);
    if target.page_size() != config.page_size {
        warn!(
            table = %table.name,
            target = target.page_size(),
            config = config.page_size,
            "target page size differs from the configured one, using the target's"
        );
    }

    let (pre_sieve_tx, pre_sieve_rx) = mpsc::channel(config.channel_capacity);
    let (centroid_tx, centroid_rx) = mpsc::channel(config.channel_capacity);
    let (post_sieve_tx, post_sieve_rx) = mpsc::channel(config.channel_capacity);

    let writer_table = table.clone();
    let writer = task::spawn_blocking(move || {
        let result = stages::write_stage(&mut target, &writer_table, post_sieve_rx);
        (target, result)
    });

    let processor_tx = post_sieve_tx.clone();
    let processor = task::spawn_blocking(move || {
        stages::processor_stage(centroid_rx, processor_tx, min_area, replace_with_centroid)
    });

    let filter = task::spawn_blocking(move || {
        stages::filter_stage(pre_sieve_rx, post_sieve_tx, centroid_tx, min_area)
    });

    let reader_table = table.clone();
    let reader = task::spawn_blocking(move || {
        let result = stages::read_stage(&mut source, &reader_table, pre_sieve_tx);
        (source, result)
    });
    tracker.advance(PipelineState::Running);

    let reader = reader.await.map_err(|err| join_error(Stage::Reader, err));
    tracker.advance(PipelineState::Draining);
    let filter = filter.await.map_err(|err| join_error(Stage::Filter, err));
    let processor = processor.await.map_err(|err| join_error(Stage::Processor, err));
    let writer = writer.await.map_err(|err| join_error(Stage::Writer, err));
    tracker.advance(PipelineState::Done);

    let (source, read_result) = reader?;
    let filter = filter?;
    let processor = processor?;
    let (target, write_result) = writer?;

    if let Err(err) = &read_result {
        error!(table = %table.name, "reading features failed: {}", err);
    }
    if let Err(err) = &write_result {
        error!(table = %table.name, "writing features failed: {}", err);
    }
    read_result?;
    let writer = write_result?;

    let report = TableReport {
        table: table.name.clone(),
        filter,
        processor,
        writer,
    };
    Ok((source, target, report))
}

/// Sieve every table of `source` into `target`, one table at a time.
pub async fn run_sieve<S, T>(mut source: S, mut target: T, config: &SieveConfig) -> Result<SieveReport>
where
    S: Source + 'static,
    T: Target + 'static,
{
    config.validate()?;

    let tables = source.tables()?;
    target.init(&tables)?;

    info!("=== start sieving ===");
    let mut report = SieveReport::default();
    for table in &tables {
        info!("  sieving {}", table.name);
        let (next_source, next_target, table_report) = sieve_table(source, target, table, config).await?;
        source = next_source;
        target = next_target;

        table_report.log();
        info!("  finished {}", table.name);
        report.tables.push(table_report);
    }
    info!("=== done sieving ===");

    Ok(report)
}
