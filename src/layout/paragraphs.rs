//! Paragraph bands inside one column
use crate::error::{Error, Result};
use crate::models::{Bitmap, Interval, Mask};

/// Paragraph bands of a column with the default 30-row padding
pub fn detect_paragraphs(
    column: &Bitmap,
    max_row_gap: usize,
    mask: Option<&Mask>,
) -> Result<Vec<Interval>> {
    ParagraphDetector::new(max_row_gap).detect(column, mask)
}

/// Paragraph detection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphDetector {
    /// Text rows at most this far apart belong to the same paragraph
    pub max_row_gap: usize,
    /// Rows added above and below each paragraph
    pub padding: usize,
}

impl ParagraphDetector {
    /// Detector with the given row gap and 30 rows of padding
    pub fn new(max_row_gap: usize) -> Self {
        Self {
            max_row_gap,
            padding: 30,
        }
    }

    /// Set the band padding
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Padded paragraph bands, top to bottom, non-overlapping
    ///
    /// When a mask is given, a paragraph is dropped if its full padded range
    /// touches any masked cell; the survivors are then split where their
    /// padding overlaps.
    pub fn detect(&self, column: &Bitmap, mask: Option<&Mask>) -> Result<Vec<Interval>> {
        if let Some(mask) = mask {
            if mask.dimensions() != column.dimensions() {
                return Err(Error::DimensionMismatch {
                    expected: column.dimensions(),
                    actual: mask.dimensions(),
                });
            }
        }

        let height = column.height();
        let text_rows: Vec<usize> = column
            .row_projection()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(y, _)| y)
            .collect();

        let mut clusters = self.cluster(&text_rows);
        if let Some(mask) = mask {
            let before = clusters.len();
            clusters.retain(|&(first, last)| {
                self.padded(first, last, height)
                    .is_none_or(|band| !mask.intersects_rows(band))
            });
            if clusters.len() < before {
                log::debug!(
                    "dropped {} paragraph bands touching the table mask",
                    before - clusters.len()
                );
            }
        }

        let mut bands: Vec<Interval> = Vec::with_capacity(clusters.len());
        for (i, &(first, last)) in clusters.iter().enumerate() {
            let Some(band) = self.padded(first, last, height) else {
                continue;
            };
            let (mut top, mut bottom) = (band.start(), band.end());

            // Overlapping padding is split at the middle of the empty gap
            if i > 0 {
                let prev_last = clusters[i - 1].1;
                top = top.max((prev_last + 1 + first) / 2);
            }
            if let Some(&(next_first, _)) = clusters.get(i + 1) {
                bottom = bottom.min((last + 1 + next_first) / 2);
            }

            bands.extend(Interval::new(top, bottom));
        }
        Ok(bands)
    }

    /// `[first - padding, last + padding)` clipped to the column
    fn padded(&self, first: usize, last: usize, height: usize) -> Option<Interval> {
        Interval::clipped(
            first.saturating_sub(self.padding),
            last + self.padding,
            height,
        )
    }

    /// Group ascending text-row indices into (first, last) runs
    fn cluster(&self, text_rows: &[usize]) -> Vec<(usize, usize)> {
        let mut clusters: Vec<(usize, usize)> = Vec::new();
        for &row in text_rows {
            match clusters.last_mut() {
                Some((_, last)) if row - *last <= self.max_row_gap => *last = row,
                _ => clusters.push((row, row)),
            }
        }
        clusters
    }
}
