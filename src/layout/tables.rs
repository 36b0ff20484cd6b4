//! Table band removal by row density
use crate::models::{Bitmap, Interval, Mask};

/// Result of [`remove_tables`]
#[derive(Debug, Clone)]
pub struct TableRemoval {
    /// Input with the table band cleared
    pub clean: Bitmap,
    /// Full-width mask over the table band (all clear if none)
    pub mask: Mask,
    /// Rows covered by the mask
    pub band: Option<Interval>,
}

/// Indices of rows whose ink count exceeds `density_threshold * width`
pub fn dense_rows(projection: &[usize], width: usize, density_threshold: f32) -> Vec<usize> {
    let limit = density_threshold as f64 * width as f64;
    projection
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count as f64 > limit)
        .map(|(y, _)| y)
        .collect()
}

/// Mask out the table band of a bitmap
///
/// Every row from the topmost to the bottommost dense row (inclusive) is
/// masked across the full width, so gaps and thin rules inside a table
/// go with it.
pub fn remove_tables(bitmap: &Bitmap, density_threshold: f32) -> TableRemoval {
    let (width, height) = bitmap.dimensions();
    let rows = dense_rows(&bitmap.row_projection(), width, density_threshold);

    let band = match (rows.first(), rows.last()) {
        (Some(&top), Some(&bottom)) => Interval::new(top, bottom + 1),
        _ => None,
    };

    let Some(band) = band else {
        return TableRemoval {
            clean: bitmap.clone(),
            mask: Mask::empty(width, height),
            band: None,
        };
    };

    log::debug!(
        "table band {} ({} dense rows) masked out",
        band,
        rows.len()
    );

    let mut clean = bitmap.clone();
    for y in band.start()..band.end() {
        for x in 0..width {
            clean.set(x, y, false);
        }
    }

    TableRemoval {
        clean,
        mask: Mask::band(width, height, band),
        band: Some(band),
    }
}
