//! Pixel-level helpers
//!
//! - Binarization (fixed threshold and Otsu's method)

pub mod binarization;
