//! Accept, reject or re-segment a candidate paragraph block
use crate::models::Bitmap;

use super::tables::dense_rows;

/// Why a block was not emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A row is dense enough to be a table rule
    TableLike,
    /// A long run of inked rows, likely an embedded figure
    PictureLike,
    /// A re-segmented sub-block below the minimum size
    TooSmall,
}

/// Outcome of classifying one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Hand the block to the output sink
    Emit,
    /// Split the block again with column and paragraph detection
    Recurse,
    /// Drop the block
    Reject(RejectReason),
}

impl Verdict {
    /// Whether the block is emitted as is
    pub fn emits(&self) -> bool {
        matches!(self, Verdict::Emit)
    }

    /// Whether the block is re-segmented
    pub fn recurses(&self) -> bool {
        matches!(self, Verdict::Recurse)
    }
}

/// Block filtering rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockClassifier {
    /// Row density above which a block is a residual table
    pub table_density: f32,
    /// Rows with more ink pixels than this count toward a picture run
    pub picture_row_min_ink: usize,
    /// Reject blocks with a run of inked rows longer than this; `None` disables the rule
    pub picture_max_run: Option<usize>,
    /// Blocks strictly larger than (width, height) on both axes are re-segmented
    pub recursion_trigger: (usize, usize),
    /// Sub-blocks smaller than (width, height) on either axis are dropped
    pub min_block: (usize, usize),
    /// Re-segmentation levels allowed below the page
    pub max_depth: usize,
}

impl Default for BlockClassifier {
    fn default() -> Self {
        Self {
            table_density: 0.8,
            picture_row_min_ink: 5,
            picture_max_run: None,
            recursion_trigger: (700, 700),
            min_block: (40, 40),
            max_depth: 1,
        }
    }
}

impl BlockClassifier {
    /// Classify a block found at re-segmentation `depth` (0 = page level)
    ///
    /// Page-level blocks go through the table and picture rules; sub-blocks
    /// through the minimum size rule. At any depth below `max_depth` an
    /// oversized block is re-segmented instead of emitted.
    pub fn classify(&self, block: &Bitmap, depth: usize) -> Verdict {
        if depth == 0 {
            let projection = block.row_projection();
            if !dense_rows(&projection, block.width(), self.table_density).is_empty() {
                return Verdict::Reject(RejectReason::TableLike);
            }
            if self.is_picture_like(&projection) {
                return Verdict::Reject(RejectReason::PictureLike);
            }
        } else if block.width() < self.min_block.0 || block.height() < self.min_block.1 {
            return Verdict::Reject(RejectReason::TooSmall);
        }

        if depth < self.max_depth && self.is_oversized(block) {
            return Verdict::Recurse;
        }
        Verdict::Emit
    }

    /// Both dimensions strictly exceed the recursion trigger
    pub fn is_oversized(&self, block: &Bitmap) -> bool {
        block.width() > self.recursion_trigger.0 && block.height() > self.recursion_trigger.1
    }

    fn is_picture_like(&self, row_projection: &[usize]) -> bool {
        let Some(max_run) = self.picture_max_run else {
            return false;
        };
        longest_run(row_projection, self.picture_row_min_ink) > max_run
    }
}

/// Longest run of consecutive rows with more than `min_ink` ink pixels
pub fn longest_run(row_projection: &[usize], min_ink: usize) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &count in row_projection {
        if count > min_ink {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
