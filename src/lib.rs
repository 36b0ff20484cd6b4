//! RustParaseg - paragraph segmentation for scanned document pages
//!
//! Splits a grayscale page into paragraph blocks using projection
//! histograms: dense rows are masked as tables, ink-free pixel columns
//! separate text columns, and empty row runs separate paragraphs. Large
//! blocks are split again with the same detectors.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Page-list driver with per-page failure isolation
pub mod batch;
/// Segmentation settings and environment overrides
pub mod config;
/// Error type shared by every stage
pub mod error;
/// Table, column, paragraph and block detection stages
pub mod layout;
/// Core data structures (PageImage, Bitmap, Interval, Block, etc.)
pub mod models;
/// Page segmentation orchestrator
pub mod pipeline;
/// Image I/O and dataset helpers
pub mod tools;
/// Utility functions (binarization)
pub mod utils;

pub use batch::{BatchSummary, PageOutcome, PageReport, process_page, run_batch};
pub use config::{SegmentConfig, ThresholdMode};
pub use error::{Error, Result};
pub use models::{Bitmap, Block, Interval, Mask, PageImage, Provenance, Region};
pub use pipeline::{PageLayout, PageSegmenter, SegmentTelemetry};

/// Segment a page with the default settings
///
/// `sink` is called once per accepted block, in column, paragraph,
/// sub-column, sub-paragraph order.
///
/// # Returns
/// Number of page-level columns detected
///
/// # Example
/// ```
/// use rust_paraseg::{PageImage, segment_page};
///
/// let page = PageImage::new(64, 64, vec![255u8; 64 * 64]).unwrap();
/// let mut blocks = Vec::new();
/// let columns = segment_page(&page, |b| blocks.push(b)).unwrap();
/// assert!(blocks.is_empty());
/// assert_eq!(columns, 1);
/// ```
pub fn segment_page<F>(page: &PageImage, sink: F) -> Result<usize>
where
    F: FnMut(Block),
{
    let telemetry = PageSegmenter::default().segment(page, sink)?;
    Ok(telemetry.columns)
}
