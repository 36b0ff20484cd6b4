//! Image I/O and dataset helpers used by the batch runner and the CLI

use crate::error::{Error, Result};
use crate::models::{Bitmap, Block, PageImage};
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Load an image file as an 8-bit grayscale page.
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<PageImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;
    PageImage::from_luma(img.to_luma8())
}

/// Write a block as an ink-on-light PNG into `dir`, returning its path.
pub fn save_block<P: AsRef<Path>>(block: &Block, dir: P, base_name: &str) -> Result<PathBuf> {
    let path = dir.as_ref().join(block.file_name(base_name));
    block
        .to_gray_image()
        .save(&path)
        .map_err(|source| Error::Save {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// File stem used to name the blocks of a page.
pub fn page_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for an ink bitmap.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of ink pixels.
    pub ink_pixels: usize,
    /// Total pixels in the bitmap.
    pub total_pixels: usize,
    /// Ratio of ink pixels to total pixels.
    pub ink_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if gray.is_empty() {
        0
    } else {
        (sum / gray.len() as u64) as u8
    };
    GrayStats { min, max, avg }
}

/// Compute ink pixel stats for a bitmap.
pub fn binary_stats(binary: &Bitmap) -> BinaryStats {
    let ink = binary.count_ones();
    let total = binary.width() * binary.height();
    let ratio = if total == 0 {
        0.0
    } else {
        ink as f64 / total as f64
    };
    BinaryStats {
        ink_pixels: ink,
        total_pixels: total,
        ink_ratio: ratio,
    }
}

/// Expand files and directories into an ordered list of page images.
///
/// Files are taken as given, whatever their extension, so that unreadable
/// inputs surface as load errors; directories are searched recursively
/// for image files.
pub fn collect_pages<P: AsRef<Path>>(inputs: &[P], limit: Option<usize>) -> Vec<PathBuf> {
    let mut pages = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            pages.extend(collect_images(input));
        } else {
            pages.push(input.to_path_buf());
        }
    }
    if let Some(limit) = limit {
        pages.truncate(limit);
    }
    pages
}

/// Recursively find image files under `root`, sorted by path.
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Skipping directory {}: {}", dir.display(), err);
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                    images.push(path);
                }
            }
        }
    }

    images.sort();
    images
}
