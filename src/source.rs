//! # Table Source
//!
//! The seam between the dump engine and the database driver.
//!
//! Anything that implements `TableSource` can feed the engine: it must
//! report a total row count and stream one bounded row window at a time
//! into a `RowSink`. The production implementation lives in
//! `mysql_source`; tests plug in an in-memory fake.

use crate::error::Result;

/// Receives the streamed content of one range, row by row.
///
/// Cells arrive as `Option<String>`: `None` is SQL NULL, `Some("")` is an
/// actual empty string. The two must stay distinguishable downstream.
pub trait RowSink {
    /// Called once per range, before any row, with the result-set column names.
    fn write_header(&mut self, columns: &[String]) -> Result<()>;

    /// Called once per source row, in result order.
    fn write_row(&mut self, cells: &[Option<String>]) -> Result<()>;
}

/// A relational table that can be counted and read in bounded windows.
///
/// Implementations are shared across worker threads; every call must be
/// safe to run concurrently with other calls (each worker issues its own
/// independent query).
pub trait TableSource: Send + Sync {
    /// Total number of rows, read once before planning.
    fn count_rows(&self) -> Result<u64>;

    /// Streams the window `[offset, offset + limit)` into `sink`: header
    /// first, then each row. Must not buffer the full result set.
    fn copy_range(&self, offset: u64, limit: u64, sink: &mut dyn RowSink) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{RowSink, TableSource};
    use crate::error::{DumpError, Result};
    use std::collections::HashMap;

    /// In-memory table for exercising the engine without a database.
    pub(crate) struct FakeTable {
        pub columns: Vec<String>,
        pub rows: Vec<Vec<Option<String>>>,
        /// When set, `count_rows` fails with this message.
        pub count_error: Option<String>,
        /// offset -> (rows delivered before failing, error message).
        pub range_failures: HashMap<u64, (usize, String)>,
    }

    impl FakeTable {
        pub fn with_rows(columns: &[&str], rows: Vec<Vec<Option<String>>>) -> Self {
            Self {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
                count_error: None,
                range_failures: HashMap::new(),
            }
        }

        /// A two-column table `(id, name)` with `total` generated rows; every
        /// third name is NULL so NULL handling is exercised end to end.
        pub fn numbered(total: usize) -> Self {
            let rows = (0..total)
                .map(|i| {
                    let name = if i % 3 == 0 {
                        None
                    } else {
                        Some(format!("row-{}", i))
                    };
                    vec![Some(i.to_string()), name]
                })
                .collect();
            Self::with_rows(&["id", "name"], rows)
        }

        pub fn fail_range_at(mut self, offset: u64, after_rows: usize, message: &str) -> Self {
            self.range_failures
                .insert(offset, (after_rows, message.to_string()));
            self
        }
    }

    impl TableSource for FakeTable {
        fn count_rows(&self) -> Result<u64> {
            if let Some(msg) = &self.count_error {
                return Err(DumpError::Database(msg.clone()));
            }
            Ok(self.rows.len() as u64)
        }

        fn copy_range(&self, offset: u64, limit: u64, sink: &mut dyn RowSink) -> Result<()> {
            sink.write_header(&self.columns)?;
            let start = (offset as usize).min(self.rows.len());
            let end = ((offset + limit) as usize).min(self.rows.len());
            for (delivered, row) in self.rows[start..end].iter().enumerate() {
                if let Some((after, msg)) = self.range_failures.get(&offset) {
                    if delivered == *after {
                        return Err(DumpError::Database(msg.clone()));
                    }
                }
                sink.write_row(row)?;
            }
            Ok(())
        }
    }
}
