//! Layout detection stages
//!
//! Each stage works on projection histograms of an ink bitmap:
//! - Table band removal (dense rows)
//! - Column detection (ink-free pixel columns)
//! - Paragraph detection (clusters of text rows)
//! - Block classification (table/picture rejection, size-triggered recursion)

/// Accept/reject/recurse rules for candidate blocks
pub mod classifier;
/// Column boundaries from vertical whitespace
pub mod columns;
/// Paragraph bands from horizontal whitespace
pub mod paragraphs;
/// Table band detection and masking
pub mod tables;

pub use classifier::{BlockClassifier, RejectReason, Verdict};
pub use columns::{ColumnDetector, detect_columns};
pub use paragraphs::{ParagraphDetector, detect_paragraphs};
pub use tables::{TableRemoval, remove_tables};
