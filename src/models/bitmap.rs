use super::interval::{Interval, Region};
use crate::error::{Error, Result};

/// Packed boolean grid; `true` = ink
///
/// Bits are stored row-major, eight per byte. Unused trailing bits of the
/// last byte are always zero so that equality compares pixels only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Create an all-background bitmap with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut bitmap = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    bitmap.set(x, y, true);
                }
            }
        }
        bitmap
    }

    /// Bitmap width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bitmap height
    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get pixel at (x, y); out of bounds reads as background
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set pixel at (x, y); out of bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let byte_index = index / 8;
        let bit_index = index % 8;
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Set every pixel of the given rows, full width
    pub fn fill_rows(&mut self, rows: Interval) {
        for y in rows.start()..rows.end().min(self.height) {
            for x in 0..self.width {
                self.set(x, y, true);
            }
        }
    }

    /// Total number of ink pixels
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Ink count of every row (horizontal projection histogram)
    pub fn row_projection(&self) -> Vec<usize> {
        (0..self.height)
            .map(|y| (0..self.width).filter(|&x| self.get(x, y)).count())
            .collect()
    }

    /// Ink count of every column (vertical projection histogram)
    pub fn column_projection(&self) -> Vec<usize> {
        let mut projection = vec![0usize; self.width];
        for y in 0..self.height {
            for (x, count) in projection.iter_mut().enumerate() {
                if self.get(x, y) {
                    *count += 1;
                }
            }
        }
        projection
    }

    /// Whether any pixel in the given rows is set
    pub fn any_in_rows(&self, rows: Interval) -> bool {
        (rows.start()..rows.end().min(self.height))
            .any(|y| (0..self.width).any(|x| self.get(x, y)))
    }

    /// Copy out a rectangle; the region is clipped to the bitmap first
    pub fn crop(&self, region: &Region) -> Bitmap {
        let Some(region) = region.clipped(self.width, self.height) else {
            return Bitmap::new(0, 0);
        };
        let (x0, y0) = (region.cols.start(), region.rows.start());
        Bitmap::from_fn(region.width(), region.height(), |x, y| {
            self.get(x0 + x, y0 + y)
        })
    }

    /// Copy out a full-height vertical strip
    pub fn crop_columns(&self, cols: Interval) -> Bitmap {
        match Interval::new(0, self.height) {
            Some(rows) => self.crop(&Region::new(rows, cols)),
            None => Bitmap::new(0, 0),
        }
    }

    /// Pixel-wise NOT
    pub fn invert(&self) -> Bitmap {
        Bitmap::from_fn(self.width, self.height, |x, y| !self.get(x, y))
    }

    /// Pixel-wise `self AND NOT other`; both must share dimensions
    pub fn and_not(&self, other: &Bitmap) -> Result<Bitmap> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a & !b)
            .collect();
        Ok(Bitmap {
            width: self.width,
            height: self.height,
            data,
        })
    }

    /// Get raw data as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Exclusion mask over a bitmap of identical dimensions (table regions)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bitmap: Bitmap,
}

impl Mask {
    /// Mask with nothing excluded
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            bitmap: Bitmap::new(width, height),
        }
    }

    /// Mask excluding a full-width band of rows
    pub fn band(width: usize, height: usize, rows: Interval) -> Self {
        let mut bitmap = Bitmap::new(width, height);
        bitmap.fill_rows(rows);
        Self { bitmap }
    }

    /// Wrap an arbitrary bitmap as a mask
    pub fn from_bitmap(bitmap: Bitmap) -> Self {
        Self { bitmap }
    }

    /// Mask width
    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    /// Mask height
    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        self.bitmap.dimensions()
    }

    /// Whether (x, y) is excluded
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bitmap.get(x, y)
    }

    /// True if nothing is excluded
    pub fn is_clear(&self) -> bool {
        self.bitmap.count_ones() == 0
    }

    /// Whether any excluded cell lies in the given rows
    pub fn intersects_rows(&self, rows: Interval) -> bool {
        self.bitmap.any_in_rows(rows)
    }

    /// Smallest row interval containing every excluded cell
    pub fn row_span(&self) -> Option<Interval> {
        let projection = self.bitmap.row_projection();
        let first = projection.iter().position(|&c| c > 0)?;
        let last = projection.iter().rposition(|&c| c > 0)?;
        Interval::new(first, last + 1)
    }

    /// Full-height vertical strip of the mask
    pub fn crop_columns(&self, cols: Interval) -> Mask {
        Mask {
            bitmap: self.bitmap.crop_columns(cols),
        }
    }

    /// Underlying bitmap
    pub fn as_bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_get_set() {
        let mut bitmap = Bitmap::new(8, 8);
        assert_eq!(bitmap.dimensions(), (8, 8));

        bitmap.set(3, 4, true);
        assert!(bitmap.get(3, 4));
        assert!(!bitmap.get(3, 3));

        bitmap.set(3, 4, false);
        assert!(!bitmap.get(3, 4));
        assert_eq!(bitmap.count_ones(), 0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut bitmap = Bitmap::new(8, 8);
        bitmap.set(10, 10, true); // Should not panic
        assert!(!bitmap.get(10, 10));
    }

    #[test]
    fn test_projections() {
        // Diagonal plus a full bottom row
        let bitmap = Bitmap::from_fn(4, 3, |x, y| x == y || y == 2);
        assert_eq!(bitmap.row_projection(), vec![1, 1, 4]);
        assert_eq!(bitmap.column_projection(), vec![2, 2, 1, 1]);
    }

    #[test]
    fn test_double_invert_is_identity() {
        // 5x3 leaves padding bits in the last byte
        let bitmap = Bitmap::from_fn(5, 3, |x, y| (x * 7 + y) % 3 == 0);
        let inverted = bitmap.invert();
        assert_eq!(inverted.count_ones(), 15 - bitmap.count_ones());
        assert_eq!(inverted.invert(), bitmap);
    }

    #[test]
    fn test_crop_clips_region() {
        let bitmap = Bitmap::from_fn(10, 10, |x, y| x >= 5 && y >= 5);
        let region = Region::new(Interval::new(4, 20).unwrap(), Interval::new(4, 6).unwrap());
        let crop = bitmap.crop(&region);
        assert_eq!(crop.dimensions(), (2, 6));
        assert!(!crop.get(0, 0));
        assert!(crop.get(1, 1));
        assert_eq!(crop.count_ones(), 5);
    }

    #[test]
    fn test_and_not_requires_matching_dimensions() {
        let a = Bitmap::from_fn(4, 4, |_, _| true);
        let b = Bitmap::from_fn(4, 4, |_, y| y == 1);
        let clean = a.and_not(&b).unwrap();
        assert_eq!(clean.count_ones(), 12);
        assert!(!clean.get(2, 1));

        let err = a.and_not(&Bitmap::new(4, 5)).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_mask_band() {
        let mask = Mask::band(6, 10, Interval::new(3, 5).unwrap());
        assert_eq!(mask.row_span(), Interval::new(3, 5));
        assert!(mask.intersects_rows(Interval::new(0, 4).unwrap()));
        assert!(!mask.intersects_rows(Interval::new(5, 10).unwrap()));
        assert!(Mask::empty(6, 10).is_clear());
        assert_eq!(Mask::empty(6, 10).row_span(), None);

        let strip = mask.crop_columns(Interval::new(2, 4).unwrap());
        assert_eq!(strip.dimensions(), (2, 10));
        assert_eq!(strip.row_span(), Interval::new(3, 5));
    }
}
