//! Column boundaries from vertical whitespace
use crate::models::{Bitmap, Interval};

/// Split a bitmap into columns at ink-free pixel columns
///
/// Walks the gap columns left to right, closing `[prev_gap, gap)` whenever
/// it is wider than `min_column_width`; `prev_gap` follows every gap seen.
/// A trailing `[prev_gap, width)` is added at the end. Returns nothing
/// when the bitmap has no gap column at all.
pub fn detect_columns(bitmap: &Bitmap, min_column_width: usize) -> Vec<Interval> {
    ColumnDetector::new(min_column_width).detect(bitmap)
}

/// Column detection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDetector {
    /// A column must be strictly wider than this to be closed
    pub min_column_width: usize,
    /// Ink-free columns count as gaps only in runs at least this long
    pub min_gap_run: usize,
    /// Report one full-width column when no gap exists
    pub full_width_fallback: bool,
}

impl ColumnDetector {
    /// Detector with the given minimum width, single-pixel gaps and no fallback
    pub fn new(min_column_width: usize) -> Self {
        Self {
            min_column_width,
            min_gap_run: 1,
            full_width_fallback: false,
        }
    }

    /// Set the minimum gap run length
    pub fn with_min_gap_run(mut self, run: usize) -> Self {
        self.min_gap_run = run.max(1);
        self
    }

    /// Enable or disable the full-width fallback
    pub fn with_full_width_fallback(mut self, enabled: bool) -> Self {
        self.full_width_fallback = enabled;
        self
    }

    /// Column intervals, left to right
    pub fn detect(&self, bitmap: &Bitmap) -> Vec<Interval> {
        let width = bitmap.width();
        let gaps = gap_columns(&bitmap.column_projection(), self.min_gap_run);

        if gaps.is_empty() {
            if self.full_width_fallback {
                log::debug!("no gap columns, treating full width as one column");
                return Interval::new(0, width).into_iter().collect();
            }
            return Vec::new();
        }

        let mut columns = Vec::new();
        let mut prev_gap = 0usize;
        for &gap in &gaps {
            if gap - prev_gap > self.min_column_width {
                columns.extend(Interval::new(prev_gap, gap));
            }
            prev_gap = gap;
        }
        columns.extend(Interval::new(prev_gap, width));

        log::debug!(
            "{} gap columns -> {} column intervals",
            gaps.len(),
            columns.len()
        );
        columns
    }
}

/// Indices of ink-free columns belonging to a run of at least `min_run`
fn gap_columns(projection: &[usize], min_run: usize) -> Vec<usize> {
    let mut gaps = Vec::new();
    let mut run_start = None;

    for x in 0..=projection.len() {
        let empty = projection.get(x).is_some_and(|&c| c == 0);
        match (empty, run_start) {
            (true, None) => run_start = Some(x),
            (false, Some(start)) => {
                if x - start >= min_run {
                    gaps.extend(start..x);
                }
                run_start = None;
            }
            _ => {}
        }
    }

    gaps
}
