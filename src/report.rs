//! Per-range outcomes and the final dump report.

use crate::error::{DumpError, Result};
use crate::planner::Range;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The result of processing one range: rows written and/or an error.
///
/// Owned by exactly one worker while in flight, immutable once handed back.
/// A failed range still reports however many rows it wrote before failing;
/// its output file may exist but be incomplete.
#[derive(Debug)]
pub struct RangeOutcome {
    pub range: Range,
    pub rows_written: u64,
    pub error: Option<DumpError>,
}

impl RangeOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// One-line summary, printed per range on stdout:
    /// `<filePath>: <rowCount>` or `<filePath> (error: '<message>'): <rowCount>`.
    pub fn summary_line(&self) -> String {
        let path = self.range.output_path.display();
        match &self.error {
            Some(e) => format!("{} (error: '{}'): {}", path, e, self.rows_written),
            None => format!("{}: {}", path, self.rows_written),
        }
    }
}

/// The ordered collection of all outcomes for one dump run.
///
/// Outcomes appear in submission (offset) order, one per planned range,
/// regardless of which worker finished first. Built only after every range
/// has completed; never partially observable.
#[derive(Debug, Default)]
pub struct DumpReport {
    outcomes: Vec<RangeOutcome>,
}

impl DumpReport {
    pub fn new(outcomes: Vec<RangeOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[RangeOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Sum of rows written across all ranges, failed ones included.
    pub fn total_rows(&self) -> u64 {
        self.outcomes.iter().map(|o| o.rows_written).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Writes a JSON run report next to the dump files and returns its path.
    pub fn write_json(&self, out_dir: &Path, duration_secs: f64) -> Result<PathBuf> {
        let details: Vec<serde_json::Value> = self
            .outcomes
            .iter()
            .map(|o| {
                serde_json::json!({
                    "range": o.range,
                    "rows_written": o.rows_written,
                    "status": if o.is_success() { "SUCCESS" } else { "FAILURE" },
                    "error": o.error.as_ref().map(|e| e.to_string()),
                })
            })
            .collect();

        let report = serde_json::json!({
            "summary": {
                "total_ranges": self.len(),
                "success": self.len() - self.failed_count(),
                "failed": self.failed_count(),
                "total_rows": self.total_rows(),
                "total_duration_seconds": duration_secs,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "details": details,
        });

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = out_dir.join(format!("report_{}.json", timestamp));
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, &report)
            .map_err(|e| DumpError::Encode(e.to_string()))?;
        info!("Run report written to {}", path.display());
        Ok(path)
    }
}
