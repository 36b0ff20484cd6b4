use crate::error::{Error, Result};
use crate::models::{Bitmap, PageImage};

/// Threshold a page into an ink bitmap
///
/// Samples strictly below `threshold` (dark) become ink (`true`), samples
/// at or above it become background. A threshold of 128 matches an
/// inverse binary threshold at 127.
pub fn binarize(page: &PageImage, threshold: u8) -> Result<Bitmap> {
    let (width, height) = (page.width(), page.height());
    if width == 0 || height == 0 {
        return Err(Error::EmptyInput { width, height });
    }

    let mut binary = Bitmap::new(width, height);
    let samples = page.samples();
    for y in 0..height {
        let row = &samples[y * width..(y + 1) * width];
        for (x, &sample) in row.iter().enumerate() {
            if sample < threshold {
                binary.set(x, y, true);
            }
        }
    }

    Ok(binary)
}

/// Binarize with a threshold chosen by Otsu's method
pub fn otsu_binarize(page: &PageImage) -> Result<Bitmap> {
    binarize(page, otsu_threshold(page.samples()))
}

/// Calculate Otsu's optimal threshold
///
/// Returned value splits the histogram as `< threshold` / `>= threshold`,
/// the same convention [`binarize`] uses.
pub fn otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    let total_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as u64 * c)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut class1_pixels = 0u64;
    let mut class1_sum = 0u64;

    // Running sums: class1 = intensities < threshold
    for threshold in 1..=255usize {
        class1_pixels += histogram[threshold - 1];
        class1_sum += (threshold as u64 - 1) * histogram[threshold - 1];
        let class2_pixels = gray.len() as u64 - class1_pixels;

        if class1_pixels == 0 || class2_pixels == 0 {
            continue;
        }

        let class1_mean = class1_sum as f64 / class1_pixels as f64;
        let class2_mean = (total_sum - class1_sum) as f64 / class2_pixels as f64;

        let weight1 = class1_pixels as f64 / total_pixels;
        let weight2 = class2_pixels as f64 / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}
