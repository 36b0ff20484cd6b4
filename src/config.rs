//! Segmentation settings

use crate::error::{Error, Result};
use crate::layout::{BlockClassifier, ColumnDetector, ParagraphDetector};

/// How the binarization threshold is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Use `SegmentConfig::threshold`
    #[default]
    Fixed,
    /// Pick a threshold per page with Otsu's method
    Otsu,
}

/// All tunables of the segmentation pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConfig {
    /// Samples below this are ink
    pub threshold: u8,
    /// Fixed or per-page threshold
    pub threshold_mode: ThresholdMode,
    /// Row density (fraction of width) that marks a table row
    pub table_density: f32,
    /// Columns must be strictly wider than this
    pub min_column_width: usize,
    /// Shortest run of ink-free pixel columns that counts as a gap
    pub min_gap_run: usize,
    /// Pixels added left and right of each column before paragraph detection
    pub column_padding: usize,
    /// Treat a page without gaps as a single full-width column
    pub single_column_fallback: bool,
    /// Largest row gap inside one paragraph
    pub max_row_gap: usize,
    /// Rows added above and below each paragraph
    pub paragraph_padding: usize,
    /// Row density (fraction of block width) that rejects a block as a table
    pub block_table_density: f32,
    /// Rows with more ink than this count toward a picture run
    pub picture_row_min_ink: usize,
    /// Longest allowed run of inked rows; `None` disables picture rejection
    pub picture_max_run: Option<usize>,
    /// (width, height) a block must exceed on both axes to be re-segmented
    pub recursion_trigger: (usize, usize),
    /// (width, height) below which re-segmented sub-blocks are dropped
    pub min_block: (usize, usize),
    /// Re-segmentation levels below the page
    pub max_depth: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            threshold_mode: ThresholdMode::Fixed,
            table_density: 0.8,
            min_column_width: 50,
            min_gap_run: 1,
            column_padding: 30,
            single_column_fallback: true,
            max_row_gap: 30,
            paragraph_padding: 30,
            block_table_density: 0.8,
            picture_row_min_ink: 5,
            picture_max_run: None,
            recursion_trigger: (700, 700),
            min_block: (40, 40),
            max_depth: 1,
        }
    }
}

impl SegmentConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `PARASEG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; unparsable values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let parse_usize = |name: &str| lookup(name).and_then(|v| v.trim().parse::<usize>().ok());
        let parse_f32 = |name: &str| lookup(name).and_then(|v| v.trim().parse::<f32>().ok());
        let parse_bool = |name: &str| {
            lookup(name).map(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
        };

        if let Some(v) = lookup("PARASEG_THRESHOLD").and_then(|v| v.trim().parse::<u8>().ok()) {
            config.threshold = v;
        }
        if let Some(true) = parse_bool("PARASEG_OTSU") {
            config.threshold_mode = ThresholdMode::Otsu;
        }
        if let Some(v) = parse_f32("PARASEG_TABLE_DENSITY") {
            config.table_density = v;
            config.block_table_density = v;
        }
        if let Some(v) = parse_usize("PARASEG_MIN_COLUMN_WIDTH") {
            config.min_column_width = v;
        }
        if let Some(v) = parse_usize("PARASEG_MIN_GAP_RUN") {
            config.min_gap_run = v;
        }
        if let Some(v) = parse_usize("PARASEG_COLUMN_PADDING") {
            config.column_padding = v;
        }
        if let Some(v) = parse_bool("PARASEG_SINGLE_COLUMN_FALLBACK") {
            config.single_column_fallback = v;
        }
        if let Some(v) = parse_usize("PARASEG_MAX_ROW_GAP") {
            config.max_row_gap = v;
        }
        if let Some(v) = parse_usize("PARASEG_PARAGRAPH_PADDING") {
            config.paragraph_padding = v;
        }
        if let Some(v) = parse_usize("PARASEG_PICTURE_MAX_RUN") {
            config.picture_max_run = if v == 0 { None } else { Some(v) };
        }
        if let Some(v) = parse_usize("PARASEG_MAX_DEPTH") {
            config.max_depth = v;
        }
        config
    }

    /// Set a fixed binarization threshold.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self.threshold_mode = ThresholdMode::Fixed;
        self
    }

    /// Choose the threshold per page with Otsu's method.
    pub fn otsu(mut self) -> Self {
        self.threshold_mode = ThresholdMode::Otsu;
        self
    }

    /// Set the page-level table density threshold.
    pub fn with_table_density(mut self, density: f32) -> Self {
        self.table_density = density;
        self
    }

    /// Set the minimum column width.
    pub fn with_min_column_width(mut self, width: usize) -> Self {
        self.min_column_width = width;
        self
    }

    /// Set the minimum gap run.
    pub fn with_min_gap_run(mut self, run: usize) -> Self {
        self.min_gap_run = run;
        self
    }

    /// Set the column padding.
    pub fn with_column_padding(mut self, padding: usize) -> Self {
        self.column_padding = padding;
        self
    }

    /// Enable or disable the single-column fallback.
    pub fn with_single_column_fallback(mut self, enabled: bool) -> Self {
        self.single_column_fallback = enabled;
        self
    }

    /// Set the maximum row gap inside a paragraph.
    pub fn with_max_row_gap(mut self, gap: usize) -> Self {
        self.max_row_gap = gap;
        self
    }

    /// Set the paragraph padding.
    pub fn with_paragraph_padding(mut self, padding: usize) -> Self {
        self.paragraph_padding = padding;
        self
    }

    /// Enable picture rejection for runs of inked rows longer than `run`.
    pub fn with_picture_max_run(mut self, run: usize) -> Self {
        self.picture_max_run = Some(run);
        self
    }

    /// Set the recursion trigger size.
    pub fn with_recursion_trigger(mut self, width: usize, height: usize) -> Self {
        self.recursion_trigger = (width, height);
        self
    }

    /// Set the minimum sub-block size.
    pub fn with_min_block(mut self, width: usize, height: usize) -> Self {
        self.min_block = (width, height);
        self
    }

    /// Set the maximum re-segmentation depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Reject settings that would make every page degenerate.
    pub fn validate(&self) -> Result<()> {
        fn fraction(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )))
            }
        }
        fn positive(name: &str, value: usize) -> Result<()> {
            if value > 0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{name} must be positive")))
            }
        }

        if self.threshold_mode == ThresholdMode::Fixed && self.threshold == 0 {
            return Err(Error::InvalidConfig(
                "threshold 0 marks no pixel as ink".into(),
            ));
        }
        fraction("table_density", self.table_density)?;
        fraction("block_table_density", self.block_table_density)?;
        positive("min_column_width", self.min_column_width)?;
        positive("min_gap_run", self.min_gap_run)?;
        positive("max_row_gap", self.max_row_gap)?;
        positive("recursion_trigger width", self.recursion_trigger.0)?;
        positive("recursion_trigger height", self.recursion_trigger.1)?;
        positive("min_block width", self.min_block.0)?;
        positive("min_block height", self.min_block.1)?;
        if let Some(run) = self.picture_max_run {
            positive("picture_max_run", run)?;
        }
        Ok(())
    }

    /// Column detector for these settings.
    pub fn column_detector(&self) -> ColumnDetector {
        ColumnDetector::new(self.min_column_width)
            .with_min_gap_run(self.min_gap_run)
            .with_full_width_fallback(self.single_column_fallback)
    }

    /// Paragraph detector for these settings.
    pub fn paragraph_detector(&self) -> ParagraphDetector {
        ParagraphDetector::new(self.max_row_gap).with_padding(self.paragraph_padding)
    }

    /// Block classifier for these settings.
    pub fn classifier(&self) -> BlockClassifier {
        BlockClassifier {
            table_density: self.block_table_density,
            picture_row_min_ink: self.picture_row_min_ink,
            picture_max_run: self.picture_max_run,
            recursion_trigger: self.recursion_trigger,
            min_block: self.min_block,
            max_depth: self.max_depth,
        }
    }
}
