//! # Range Exporter
//!
//! Handles the low-level "read and save" operation for a single range.
//!
//! Streams the range's query result through an RFC-4180 CSV encoder into a
//! gzip-compressed file, counting rows as they go. Memory stays bounded by
//! the slice size, never by the table size, and a failure mid-range still
//! leaves a syntactically valid file up to the failure point.

use crate::error::{DumpError, Result};
use crate::planner::Range;
use crate::report::RangeOutcome;
use crate::source::{RowSink, TableSource};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

/// Literal token written for SQL NULL cells. An actual empty string is
/// written as an empty field and stays distinguishable.
const NULL_TOKEN: &str = "NULL";

type CompressedCsvWriter = csv::Writer<GzEncoder<BufWriter<File>>>;

/// Exports one range at a time; shared read-only across workers.
pub struct RangeExporter {
    source: Arc<dyn TableSource>,
    compression: Compression,
}

/// Sink feeding rows into the compressed CSV writer. The row counter is
/// owned here, by the single worker processing the range.
struct CsvSink {
    writer: CompressedCsvWriter,
    rows_written: u64,
}

impl RowSink for CsvSink {
    fn write_header(&mut self, columns: &[String]) -> Result<()> {
        self.writer.write_record(columns)?;
        Ok(())
    }

    fn write_row(&mut self, cells: &[Option<String>]) -> Result<()> {
        self.writer
            .write_record(cells.iter().map(|c| c.as_deref().unwrap_or(NULL_TOKEN)))?;
        self.rows_written += 1;
        Ok(())
    }
}

impl RangeExporter {
    pub fn new(source: Arc<dyn TableSource>, compression: Compression) -> Self {
        Self {
            source,
            compression,
        }
    }

    /// Exports one range. Never panics or propagates an error: every failure
    /// (file open, query, row encode) is captured into the outcome, together
    /// with the rows written up to that point. Other ranges are unaffected.
    pub fn export(&self, range: &Range) -> RangeOutcome {
        debug!(
            "range {}: exporting rows [{}, {}) to {}",
            range.index,
            range.offset,
            range.offset + range.size,
            range.output_path.display()
        );

        let mut rows_written = 0;
        let error = self.export_inner(range, &mut rows_written).err();
        RangeOutcome {
            range: range.clone(),
            rows_written,
            error,
        }
    }

    fn export_inner(&self, range: &Range, rows_out: &mut u64) -> Result<()> {
        // Create-truncate, not append: a rerun with the same base name
        // replaces the file instead of corrupting it.
        let file = File::create(&range.output_path)?;
        let encoder = GzEncoder::new(BufWriter::new(file), self.compression);
        let mut sink = CsvSink {
            writer: csv::WriterBuilder::new().from_writer(encoder),
            rows_written: 0,
        };

        let copied = self
            .source
            .copy_range(range.offset, range.size, &mut sink);
        *rows_out = sink.rows_written;

        // Resources are released innermost-first whether or not the copy
        // succeeded; the first error wins.
        let closed = close_writer(sink.writer);
        copied.and(closed)
    }
}

/// Flushes and closes encoder, compressor, and file, in that order.
fn close_writer(writer: CompressedCsvWriter) -> Result<()> {
    let encoder = writer
        .into_inner()
        .map_err(|e| DumpError::Encode(e.to_string()))?;
    let mut buffered = encoder.finish()?;
    buffered.flush()?;
    Ok(())
}
