//! Batch driver over a list of page images
//!
//! A page that fails to load, segment or save is reported in its own
//! [`PageOutcome`]; the remaining pages are still processed.

use crate::error::Result;
use crate::pipeline::{PageSegmenter, SegmentTelemetry};
use crate::tools::{load_grayscale, page_base_name, save_block};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// What one successfully processed page produced
#[derive(Debug, Clone)]
pub struct PageReport {
    /// Page-level columns detected
    pub columns: usize,
    /// Files written, in emission order
    pub blocks: Vec<PathBuf>,
    /// Stage counters
    pub telemetry: SegmentTelemetry,
}

/// Result for one input page
#[derive(Debug)]
pub struct PageOutcome {
    /// Input path
    pub path: PathBuf,
    /// Report, or the error that stopped this page
    pub result: Result<PageReport>,
}

/// Outcomes of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// One entry per input page
    pub pages: Vec<PageOutcome>,
}

impl BatchSummary {
    /// Pages segmented without error
    pub fn processed(&self) -> usize {
        self.pages.iter().filter(|p| p.result.is_ok()).count()
    }

    /// Pages that failed
    pub fn failed(&self) -> usize {
        self.pages.len() - self.processed()
    }

    /// Total blocks written
    pub fn blocks_written(&self) -> usize {
        self.pages
            .iter()
            .filter_map(|p| p.result.as_ref().ok())
            .map(|r| r.blocks.len())
            .sum()
    }

    /// Failed pages with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &crate::Error)> {
        self.pages
            .iter()
            .filter_map(|p| p.result.as_ref().err().map(|e| (p.path.as_path(), e)))
    }
}

/// Load, segment and save one page
///
/// Blocks are written to `output_dir` as
/// `{stem}_column_{c}_paragraph_{p}[...].png`.
pub fn process_page(
    segmenter: &PageSegmenter,
    path: &Path,
    output_dir: &Path,
) -> Result<PageReport> {
    let page = load_grayscale(path)?;
    let base_name = page_base_name(path);

    let mut blocks = Vec::new();
    let telemetry = segmenter.segment(&page, |block| blocks.push(block))?;

    let mut written = Vec::with_capacity(blocks.len());
    for block in &blocks {
        written.push(save_block(block, output_dir, &base_name)?);
    }

    log::info!(
        "Processed {} with {} columns",
        path.display(),
        telemetry.columns
    );

    Ok(PageReport {
        columns: telemetry.columns,
        blocks: written,
        telemetry,
    })
}

/// Segment every page in `pages`, writing blocks under `output_dir`
///
/// Creating `output_dir` is the only failure that aborts the batch.
/// With `parallel` set, pages are distributed over the rayon thread pool;
/// outcomes are returned in input order either way.
pub fn run_batch(
    segmenter: &PageSegmenter,
    pages: &[PathBuf],
    output_dir: &Path,
    parallel: bool,
) -> Result<BatchSummary> {
    fs::create_dir_all(output_dir)?;

    let run = |path: &PathBuf| {
        let result = process_page(segmenter, path, output_dir);
        if let Err(err) = &result {
            log::warn!("Skipping {}: {}", path.display(), err);
        }
        PageOutcome {
            path: path.clone(),
            result,
        }
    };

    let outcomes: Vec<PageOutcome> = if parallel {
        log::debug!("Processing {} pages in parallel", pages.len());
        pages.par_iter().map(run).collect()
    } else {
        pages.iter().map(run).collect()
    };

    let summary = BatchSummary { pages: outcomes };
    log::info!(
        "Batch done: {} processed, {} failed, {} blocks",
        summary.processed(),
        summary.failed(),
        summary.blocks_written()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn write_page(path: &Path) {
        // One column of text in two paragraphs
        let img = image::GrayImage::from_fn(240, 300, |x, y| {
            let text = (20..60).contains(&y) || (180..220).contains(&y);
            if text && (x + y) % 2 == 0 {
                image::Luma([0u8])
            } else {
                image::Luma([255u8])
            }
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_bad_page_does_not_stop_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("blocks");

        let broken = input.path().join("001.png");
        fs::write(&broken, b"not an image").unwrap();
        let good = input.path().join("002.png");
        write_page(&good);

        let segmenter = PageSegmenter::default();
        for parallel in [false, true] {
            let summary =
                run_batch(&segmenter, &[broken.clone(), good.clone()], &out_dir, parallel)
                    .unwrap();
            assert_eq!(summary.processed(), 1);
            assert_eq!(summary.failed(), 1);
            assert!(matches!(summary.pages[0].result, Err(Error::Load { .. })));

            let report = summary.pages[1].result.as_ref().unwrap();
            assert_eq!(report.columns, 1);
            assert_eq!(report.blocks.len(), 2);
            assert!(report.blocks[0].ends_with("002_column_1_paragraph_1.png"));
            assert!(report.blocks.iter().all(|p| p.exists()));
            assert_eq!(summary.failures().count(), 1);
        }
    }

    #[test]
    fn test_missing_page_is_load_error() {
        let output = tempfile::tempdir().unwrap();
        let err = process_page(
            &PageSegmenter::default(),
            Path::new("missing/page.png"),
            output.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
        assert!(err.is_page_local());
    }
}
