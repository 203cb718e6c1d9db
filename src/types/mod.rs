//! Value types shared across the graph: formats, ranges and resource
//! descriptions.

mod buffer;
mod format;
mod image;
mod range;

pub use buffer::{BufferDescription, BufferInfo, BufferUsage};
pub use format::ImageFormat;
pub use image::{ImageDescription, ImageInfo, ImageInitState, ImageUsage};
pub use range::{ByteRange, SliceRange};
