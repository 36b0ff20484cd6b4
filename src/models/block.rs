use std::fmt;

use super::bitmap::Bitmap;
use super::interval::Region;

/// Path of (column, paragraph) indices from the page down to a block
///
/// Indices are zero-based; the first step is the page-level column and
/// paragraph, each further step one level of re-segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Provenance {
    steps: Vec<(usize, usize)>,
}

impl Provenance {
    /// Page-level provenance
    pub fn root(column: usize, paragraph: usize) -> Self {
        Self {
            steps: vec![(column, paragraph)],
        }
    }

    /// Provenance of a sub-block found by re-segmenting this block
    pub fn child(&self, sub_column: usize, sub_paragraph: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push((sub_column, sub_paragraph));
        Self { steps }
    }

    /// Number of re-segmentation levels below the page (0 for page-level blocks)
    pub fn depth(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Page-level column index
    pub fn column(&self) -> usize {
        self.steps.first().map_or(0, |s| s.0)
    }

    /// Page-level paragraph index
    pub fn paragraph(&self) -> usize {
        self.steps.first().map_or(0, |s| s.1)
    }

    /// All (column, paragraph) steps, outermost first
    pub fn steps(&self) -> &[(usize, usize)] {
        &self.steps
    }

    /// Output file name for a block from page `base_name`
    ///
    /// `001_column_2_paragraph_1.png`, or for nested blocks
    /// `001_column_2_paragraph_1_sub-column_1_sub-paragraph_3.png`.
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{base_name}_{self}.png")
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, (column, paragraph)) in self.steps.iter().enumerate() {
            if level == 0 {
                write!(f, "column_{}_paragraph_{}", column + 1, paragraph + 1)?;
            } else {
                write!(
                    f,
                    "_sub-column_{}_sub-paragraph_{}",
                    column + 1,
                    paragraph + 1
                )?;
            }
        }
        Ok(())
    }
}

/// An accepted paragraph block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Where the block sits in page coordinates
    pub region: Region,
    /// Where the block came from in the segmentation tree
    pub provenance: Provenance,
    /// Cropped ink bitmap (ink = true)
    pub ink: Bitmap,
}

impl Block {
    /// Block width
    pub fn width(&self) -> usize {
        self.ink.width()
    }

    /// Block height
    pub fn height(&self) -> usize {
        self.ink.height()
    }

    /// Render as ink-on-light grayscale: ink = 0, background = 255
    pub fn to_gray_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            if self.ink.get(x as usize, y as usize) {
                image::Luma([0u8])
            } else {
                image::Luma([255u8])
            }
        })
    }

    /// Output file name, see [`Provenance::file_name`]
    pub fn file_name(&self, base_name: &str) -> String {
        self.provenance.file_name(base_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interval;

    #[test]
    fn test_root_file_name_is_one_based() {
        let p = Provenance::root(0, 2);
        assert_eq!(p.file_name("004"), "004_column_1_paragraph_3.png");
        assert_eq!(p.depth(), 0);
    }

    #[test]
    fn test_nested_file_name() {
        let p = Provenance::root(1, 0).child(0, 4);
        assert_eq!(
            p.file_name("page"),
            "page_column_2_paragraph_1_sub-column_1_sub-paragraph_5.png"
        );
        assert_eq!(p.depth(), 1);
        assert_eq!(p.column(), 1);
        assert_eq!(p.paragraph(), 0);
        assert_ne!(p, Provenance::root(1, 0).child(1, 4));
    }

    #[test]
    fn test_gray_rendering_is_ink_on_light() {
        let ink = Bitmap::from_fn(3, 2, |x, _| x == 1);
        let block = Block {
            region: Region::new(Interval::new(0, 2).unwrap(), Interval::new(0, 3).unwrap()),
            provenance: Provenance::root(0, 0),
            ink,
        };
        let img = block.to_gray_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 0).0[0], 0);
        assert_eq!(img.get_pixel(0, 1).0[0], 255);
    }
}
