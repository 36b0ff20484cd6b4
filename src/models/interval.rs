use std::fmt;

/// Half-open index range `[start, end)` along one axis
///
/// Construction discards empty ranges, so every `Interval` has `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    start: usize,
    end: usize,
}

impl Interval {
    /// Create an interval, or `None` if `start >= end`
    pub fn new(start: usize, end: usize) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Interval clipped to `[0, limit)`, or `None` if nothing remains
    pub fn clipped(start: usize, end: usize, limit: usize) -> Option<Self> {
        Self::new(start.min(limit), end.min(limit))
    }

    /// First index covered
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last index covered
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of indices covered (always > 0)
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the interval covers no index; never true
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies in the interval
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Whether the two intervals share at least one index
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Grow by `pad` on both sides, clipped to `[0, limit)`
    pub fn padded(&self, pad: usize, limit: usize) -> Option<Self> {
        Self::clipped(self.start.saturating_sub(pad), self.end.saturating_add(pad), limit)
    }

    /// Shift both ends by `offset`
    pub fn offset(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Axis-aligned rectangle: a row interval and a column interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Vertical extent
    pub rows: Interval,
    /// Horizontal extent
    pub cols: Interval,
}

impl Region {
    /// Create a region from its two extents
    pub fn new(rows: Interval, cols: Interval) -> Self {
        Self { rows, cols }
    }

    /// Region covering a whole `width` x `height` grid
    pub fn full(width: usize, height: usize) -> Option<Self> {
        Some(Self {
            rows: Interval::new(0, height)?,
            cols: Interval::new(0, width)?,
        })
    }

    /// Region clipped to a `width` x `height` grid
    pub fn clipped(&self, width: usize, height: usize) -> Option<Self> {
        Some(Self {
            rows: Interval::clipped(self.rows.start, self.rows.end, height)?,
            cols: Interval::clipped(self.cols.start, self.cols.end, width)?,
        })
    }

    /// Region width in pixels
    pub fn width(&self) -> usize {
        self.cols.len()
    }

    /// Region height in pixels
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Translate a region expressed relative to this one into this region's parent space
    pub fn nest(&self, inner: &Region) -> Region {
        Region {
            rows: inner.rows.offset(self.rows.start),
            cols: inner.cols.offset(self.cols.start),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {} cols {} ({}x{})",
            self.rows,
            self.cols,
            self.width(),
            self.height()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_interval_discarded() {
        assert!(Interval::new(5, 5).is_none());
        assert!(Interval::new(6, 5).is_none());
        let iv = Interval::new(2, 7).unwrap();
        assert_eq!(iv.len(), 5);
        assert!(iv.contains(2));
        assert!(!iv.contains(7));
    }

    #[test]
    fn test_padded_clips_to_limit() {
        let iv = Interval::new(10, 20).unwrap();
        assert_eq!(iv.padded(30, 100), Interval::new(0, 50));
        assert_eq!(iv.padded(30, 35), Interval::new(0, 35));
        assert_eq!(iv.padded(0, 5), None);
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let a = Interval::new(0, 10).unwrap();
        let b = Interval::new(10, 20).unwrap();
        let c = Interval::new(9, 11).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_region_nest() {
        let outer = Region::new(Interval::new(100, 200).unwrap(), Interval::new(50, 150).unwrap());
        let inner = Region::new(Interval::new(10, 20).unwrap(), Interval::new(0, 5).unwrap());
        let nested = outer.nest(&inner);
        assert_eq!(nested.rows, Interval::new(110, 120).unwrap());
        assert_eq!(nested.cols, Interval::new(50, 55).unwrap());
    }

    #[test]
    fn test_region_clipped() {
        let r = Region::new(Interval::new(0, 500).unwrap(), Interval::new(90, 130).unwrap());
        let clipped = r.clipped(100, 300).unwrap();
        assert_eq!(clipped.height(), 300);
        assert_eq!(clipped.width(), 10);
        assert!(r.clipped(50, 300).is_none());
    }
}
