//! Page segmentation driver
//!
//! One page goes through
//! `binarize -> remove tables -> detect columns -> per column: crop, detect
//! paragraphs -> per paragraph: crop, classify (-> re-segment)`. Blocks are
//! handed to the sink in column, paragraph, sub-column, sub-paragraph order.

use crate::config::{SegmentConfig, ThresholdMode};
use crate::error::Result;
use crate::layout::{
    BlockClassifier, ColumnDetector, ParagraphDetector, RejectReason, TableRemoval, Verdict,
    remove_tables,
};
use crate::models::{Bitmap, Block, Interval, Mask, PageImage, Provenance, Region};
use crate::utils::binarization::{binarize, otsu_threshold};

/// Per-page counters collected while segmenting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTelemetry {
    /// Page-level columns detected
    pub columns: usize,
    /// Rows masked out as a table band
    pub table_band: Option<Interval>,
    /// Paragraph bands found at every level
    pub paragraphs: usize,
    /// Blocks handed to the sink
    pub emitted: usize,
    /// Blocks rejected as residual tables
    pub rejected_table_like: usize,
    /// Blocks rejected as embedded pictures
    pub rejected_picture_like: usize,
    /// Sub-blocks dropped for size
    pub rejected_too_small: usize,
    /// Blocks split again
    pub recursions: usize,
}

impl SegmentTelemetry {
    fn record_reject(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::TableLike => self.rejected_table_like += 1,
            RejectReason::PictureLike => self.rejected_picture_like += 1,
            RejectReason::TooSmall => self.rejected_too_small += 1,
        }
    }
}

/// Page-level analysis before any block is emitted
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Threshold actually used
    pub threshold: u8,
    /// Ink bitmap of the whole page
    pub binary: Bitmap,
    /// Table-free bitmap, mask and band
    pub tables: TableRemoval,
    /// Page-level column intervals
    pub columns: Vec<Interval>,
}

/// Configured segmentation pipeline
#[derive(Debug, Clone)]
pub struct PageSegmenter {
    config: SegmentConfig,
    columns: ColumnDetector,
    paragraphs: ParagraphDetector,
    classifier: BlockClassifier,
}

impl PageSegmenter {
    /// Build a segmenter; fails if the configuration is invalid
    pub fn new(config: SegmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            columns: config.column_detector(),
            paragraphs: config.paragraph_detector(),
            classifier: config.classifier(),
            config,
        })
    }

    /// Settings in use
    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Binarize, remove tables and find the page columns
    pub fn analyze(&self, page: &PageImage) -> Result<PageLayout> {
        let threshold = match self.config.threshold_mode {
            ThresholdMode::Fixed => self.config.threshold,
            ThresholdMode::Otsu => otsu_threshold(page.samples()),
        };
        let binary = binarize(page, threshold)?;
        let tables = remove_tables(&binary, self.config.table_density);
        let columns = self.columns.detect(&tables.clean);

        log::debug!(
            "page {}x{}: threshold {}, {} ink pixels, {} columns",
            page.width(),
            page.height(),
            threshold,
            binary.count_ones(),
            columns.len()
        );

        Ok(PageLayout {
            threshold,
            binary,
            tables,
            columns,
        })
    }

    /// Segment one page, calling `sink` once per accepted block
    pub fn segment<F>(&self, page: &PageImage, mut sink: F) -> Result<SegmentTelemetry>
    where
        F: FnMut(Block),
    {
        let layout = self.analyze(page)?;
        let clean = &layout.tables.clean;
        let mask = &layout.tables.mask;

        let mut telemetry = SegmentTelemetry {
            columns: layout.columns.len(),
            table_band: layout.tables.band,
            ..SegmentTelemetry::default()
        };

        for (col_idx, column) in layout.columns.iter().enumerate() {
            let Some(cols) = column.padded(self.config.column_padding, clean.width()) else {
                continue;
            };
            let column_bitmap = clean.crop_columns(cols);
            let column_mask = (!mask.is_clear()).then(|| mask.crop_columns(cols));
            let bands = self.paragraphs.detect(&column_bitmap, column_mask.as_ref())?;
            log::debug!("column {} {}: {} paragraphs", col_idx + 1, cols, bands.len());
            telemetry.paragraphs += bands.len();

            for (para_idx, rows) in bands.into_iter().enumerate() {
                let region = Region::new(rows, cols);
                let block = clean.crop(&region);
                let provenance = Provenance::root(col_idx, para_idx);
                self.place_block(block, region, provenance, 0, &mut sink, &mut telemetry)?;
            }
        }

        Ok(telemetry)
    }

    /// Re-segment a block found at `depth`, emitting its sub-blocks
    ///
    /// `region` locates `block` in page coordinates; sub-blocks extend
    /// `provenance` with their sub-column and sub-paragraph index.
    pub fn resegment<F>(
        &self,
        block: &Bitmap,
        region: Region,
        provenance: &Provenance,
        depth: usize,
        sink: &mut F,
        telemetry: &mut SegmentTelemetry,
    ) -> Result<()>
    where
        F: FnMut(Block),
    {
        telemetry.recursions += 1;
        let sub_columns = self.columns.detect(block);
        log::debug!(
            "re-segmenting {} at depth {}: {} sub-columns",
            provenance,
            depth,
            sub_columns.len()
        );

        for (sub_col, column) in sub_columns.iter().enumerate() {
            let Some(cols) = column.padded(self.config.column_padding, block.width()) else {
                continue;
            };
            let column_bitmap = block.crop_columns(cols);
            let bands = self.paragraphs.detect(&column_bitmap, None::<&Mask>)?;
            telemetry.paragraphs += bands.len();

            for (sub_para, rows) in bands.into_iter().enumerate() {
                let local = Region::new(rows, cols);
                let sub_block = block.crop(&local);
                self.place_block(
                    sub_block,
                    region.nest(&local),
                    provenance.child(sub_col, sub_para),
                    depth + 1,
                    sink,
                    telemetry,
                )?;
            }
        }
        Ok(())
    }

    fn place_block<F>(
        &self,
        block: Bitmap,
        region: Region,
        provenance: Provenance,
        depth: usize,
        sink: &mut F,
        telemetry: &mut SegmentTelemetry,
    ) -> Result<()>
    where
        F: FnMut(Block),
    {
        match self.classifier.classify(&block, depth) {
            Verdict::Emit => {
                telemetry.emitted += 1;
                sink(Block {
                    region,
                    provenance,
                    ink: block,
                });
            }
            Verdict::Recurse => {
                self.resegment(&block, region, &provenance, depth, sink, telemetry)?;
            }
            Verdict::Reject(reason) => {
                log::debug!("block {} at {} rejected: {:?}", provenance, region, reason);
                telemetry.record_reject(reason);
            }
        }
        Ok(())
    }
}

impl Default for PageSegmenter {
    fn default() -> Self {
        let config = SegmentConfig::default();
        Self {
            columns: config.column_detector(),
            paragraphs: config.paragraph_detector(),
            classifier: config.classifier(),
            config,
        }
    }
}
