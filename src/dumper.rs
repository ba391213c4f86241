//! # Dump Coordinator
//!
//! Orchestrates one dump run: count the table, plan the ranges, fan the
//! work out across the pool, and collect the final report.

use crate::config::DumpSettings;
use crate::error::{DumpError, Result};
use crate::exporter::RangeExporter;
use crate::planner;
use crate::pool::WorkerPool;
use crate::report::DumpReport;
use crate::source::TableSource;
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Dumps one table into gzip-compressed CSV slices.
///
/// The base file name is a UTC timestamp fixed at construction, so every
/// range of a run shares it and differs only by ordinal. Two runs started
/// within the same second share the base name; range files are opened
/// create-truncate, so the later run replaces the earlier one's files.
pub struct Dumper {
    source: Arc<dyn TableSource>,
    concurrency: usize,
    slice_size: u64,
    compression: flate2::Compression,
    base_name: String,
}

impl Dumper {
    pub fn new(source: Arc<dyn TableSource>, settings: &DumpSettings) -> Self {
        let base_name = chrono::Utc::now()
            .format("%Y-%m-%d_%H-%M-%S")
            .to_string();
        Self {
            source,
            concurrency: settings.concurrency,
            slice_size: settings.slice_size,
            compression: settings.compression(),
            base_name,
        }
    }

    /// Runs the full dump and returns the report, in submission order.
    ///
    /// A failing row-count query aborts with `SourceUnavailable` before any
    /// range is planned; a zero slice size aborts with
    /// `InvalidConfiguration`. Per-range failures never propagate: they
    /// surface only as populated `error` fields in the report.
    ///
    /// The row count is read once. If the table is mutated during the run,
    /// individual ranges may read more or fewer rows than planned.
    pub fn dump(&self, out_dir: &Path) -> Result<DumpReport> {
        let total_rows = self
            .source
            .count_rows()
            .map_err(|e| DumpError::SourceUnavailable(e.to_string()))?;
        info!(
            "Table holds {} rows; slicing into windows of {}",
            total_rows, self.slice_size
        );

        let ranges = planner::plan(total_rows, self.slice_size, out_dir, &self.base_name)?;
        if ranges.is_empty() {
            info!("Nothing to dump");
            return Ok(DumpReport::default());
        }

        let workers = self.concurrency.min(ranges.len());
        info!(
            "Dumping {} ranges with {} workers ({} CPUs available)",
            ranges.len(),
            workers,
            num_cpus::get()
        );

        let exporter = RangeExporter::new(Arc::clone(&self.source), self.compression);
        let pool = WorkerPool::new(self.concurrency);
        let outcomes = pool.run(ranges, |range| exporter.export(range));

        let report = DumpReport::new(outcomes);
        info!(
            "Dump finished: {} ranges, {} rows written, {} failed",
            report.len(),
            report.total_rows(),
            report.failed_count()
        );
        Ok(report)
    }
}
