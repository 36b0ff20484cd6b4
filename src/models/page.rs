use crate::error::{Error, Result};

/// Single-channel 8-bit page, row-major, origin top-left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl PageImage {
    /// Wrap a grayscale buffer; rejects zero-sized pages and short buffers
    pub fn new(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyInput { width, height });
        }
        let expected = width * height;
        if samples.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a page by evaluating `f(x, y)` for every sample
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> u8,
    {
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self::new(width, height, samples)
    }

    /// Take ownership of a decoded `image::GrayImage`
    pub fn from_luma(image: image::GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width as usize, height as usize, image.into_raw())
    }

    /// Page width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Page height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at (x, y), `None` outside the page
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.samples[y * self.width + x])
    }

    /// Raw row-major samples
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}
