pub mod bitmap;
pub mod block;
pub mod interval;
pub mod page;

pub use bitmap::{Bitmap, Mask};
pub use block::{Block, Provenance};
pub use interval::{Interval, Region};
pub use page::PageImage;
