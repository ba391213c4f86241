//! Range planning: splits a table into fixed-size, non-overlapping row
//! windows, each mapped to its own output file.

use crate::error::{DumpError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A contiguous window of source rows, the unit of parallel work.
///
/// Ranges partition `[0, total_rows)` into consecutive `slice_size` windows;
/// the last range may be shorter. Immutable once planned.
#[derive(Debug, Clone, Serialize)]
pub struct Range {
    /// Ordinal within the plan, also the file name suffix.
    pub index: usize,
    /// First row of the window (`OFFSET` in the range query).
    pub offset: u64,
    /// Number of rows in the window (`LIMIT` in the range query).
    pub size: u64,
    /// Destination file for this range, exclusive to it.
    pub output_path: PathBuf,
}

/// Builds the ordered range list for a dump run.
///
/// Produces `ceil(total_rows / slice_size)` ranges with strictly increasing,
/// contiguous offsets. Output paths are `<base_dir>/<base_name>_<index>.csv.gz`,
/// so ranges of one run never collide with each other.
///
/// The row count is taken once, before planning. If the table is mutated
/// while the dump runs, later ranges may read more or fewer rows than
/// planned; that is accepted behavior, not a defect.
pub fn plan(
    total_rows: u64,
    slice_size: u64,
    base_dir: &Path,
    base_name: &str,
) -> Result<Vec<Range>> {
    if slice_size == 0 {
        return Err(DumpError::InvalidConfiguration(
            "slice size must be greater than zero".to_string(),
        ));
    }

    let slice_count = (total_rows + slice_size - 1) / slice_size;
    let mut ranges = Vec::with_capacity(slice_count as usize);
    for i in 0..slice_count {
        let offset = i * slice_size;
        let size = slice_size.min(total_rows - offset);
        ranges.push(Range {
            index: i as usize,
            offset,
            size,
            output_path: base_dir.join(format!("{}_{}.csv.gz", base_name, i)),
        });
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_sizes(total: u64, slice: u64) -> Vec<u64> {
        plan(total, slice, Path::new("/tmp/out"), "dump")
            .unwrap()
            .iter()
            .map(|r| r.size)
            .collect()
    }

    #[test]
    fn test_plan_length_is_ceiling() {
        assert_eq!(plan_sizes(2500, 1000).len(), 3);
        assert_eq!(plan_sizes(2000, 1000).len(), 2);
        assert_eq!(plan_sizes(1, 1000).len(), 1);
    }

    #[test]
    fn test_empty_table_yields_empty_plan() {
        assert!(plan_sizes(0, 1000).is_empty());
    }

    #[test]
    fn test_zero_slice_size_is_invalid() {
        for total in [0, 1, 1000] {
            let err = plan(total, 0, Path::new("/tmp/out"), "dump").unwrap_err();
            assert!(matches!(err, DumpError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_ranges_are_contiguous_and_cover_all_rows() {
        let ranges = plan(2500, 1000, Path::new("/tmp/out"), "dump").unwrap();
        for (i, r) in ranges.iter().enumerate() {
            assert_eq!(r.index, i);
            assert_eq!(r.offset, i as u64 * 1000);
        }
        for pair in ranges.windows(2) {
            assert_eq!(pair[1].offset, pair[0].offset + pair[0].size);
        }
        assert_eq!(ranges.iter().map(|r| r.size).sum::<u64>(), 2500);
    }

    #[test]
    fn test_last_range_holds_remainder() {
        assert_eq!(plan_sizes(2500, 1000), vec![1000, 1000, 500]);
        assert_eq!(plan_sizes(3000, 1000), vec![1000, 1000, 1000]);
    }

    #[test]
    fn test_output_paths_encode_ordinal() {
        let ranges = plan(2500, 1000, Path::new("/data"), "2024-01-01_00-00-00").unwrap();
        assert_eq!(
            ranges[2].output_path,
            Path::new("/data/2024-01-01_00-00-00_2.csv.gz")
        );
        let mut paths: Vec<_> = ranges.iter().map(|r| &r.output_path).collect();
        paths.dedup();
        assert_eq!(paths.len(), 3);
    }
}
