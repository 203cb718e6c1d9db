//! Image descriptions and usage flags.

use bitflags::bitflags;

use super::ImageFormat;

bitflags! {
    /// Usage flags for images.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageUsage: u32 {
        /// Image can be bound as a color attachment.
        const COLOR_ATTACHMENT = 1 << 0;
        /// Image can be bound as a depth/stencil attachment.
        const DEPTH_ATTACHMENT = 1 << 1;
        /// Image can be bound as an input attachment.
        const INPUT_ATTACHMENT = 1 << 2;
        /// Image can be sampled in a shader.
        const SAMPLED_IMAGE = 1 << 3;
        /// Image can be bound as a storage image.
        const STORAGE_IMAGE = 1 << 4;
        /// Image can be copied from.
        const COPY_SRC = 1 << 5;
        /// Image can be copied to.
        const COPY_DST = 1 << 6;
    }
}

impl Default for ImageUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Content state an image is expected to be in when a frame begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageInitState {
    /// Contents are undefined and may be discarded.
    #[default]
    Undefined,
    /// Contents must be cleared before first use.
    Clear,
}

/// Description of an image owned outside the graph, as reported by the
/// resource registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth in pixels; 1 for 2D images.
    pub depth: u32,
    /// Number of array layers.
    pub array_layers: u32,
    /// Number of mip levels.
    pub mip_levels: u32,
    /// Pixel format.
    pub format: ImageFormat,
}

impl ImageInfo {
    /// Describe a single-layer, single-mip 2D image.
    pub fn new_2d(width: u32, height: u32, format: ImageFormat) -> Self {
        Self {
            width,
            height,
            depth: 1,
            array_layers: 1,
            mip_levels: 1,
            format,
        }
    }

    /// Set the array layer count.
    pub fn with_array_layers(mut self, count: u32) -> Self {
        self.array_layers = count;
        self
    }

    /// Set the mip level count.
    pub fn with_mip_levels(mut self, count: u32) -> Self {
        self.mip_levels = count;
        self
    }
}

/// Mutable per-frame description of an image resource.
///
/// Every image in the graph carries one of these, whether the image is
/// created by a pass or imported from the registry. Requested usage
/// accumulates as passes declare views onto the image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageDescription {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth in pixels; 1 for 2D images.
    pub depth: u32,
    /// Number of array layers.
    pub array_layers: u32,
    /// Number of mip levels.
    pub mip_levels: u32,
    /// Pixel format.
    pub format: ImageFormat,
    /// Expected content state at the start of the frame.
    pub initial_state: ImageInitState,
    /// Usage accumulated from the views declared onto this image.
    pub requested_usage: ImageUsage,
    /// Usage the underlying allocation is allowed to serve.
    pub permitted_usage: ImageUsage,
}

impl ImageDescription {
    /// Describe a single-layer, single-mip 2D image.
    pub fn new_2d(width: u32, height: u32, format: ImageFormat) -> Self {
        Self {
            width,
            height,
            depth: 1,
            array_layers: 1,
            mip_levels: 1,
            format,
            initial_state: ImageInitState::Undefined,
            requested_usage: ImageUsage::empty(),
            permitted_usage: ImageUsage::all(),
        }
    }

    /// Set the array layer count.
    pub fn with_array_layers(mut self, count: u32) -> Self {
        self.array_layers = count;
        self
    }

    /// Set the mip level count.
    pub fn with_mip_levels(mut self, count: u32) -> Self {
        self.mip_levels = count;
        self
    }

    /// Set the initial content state.
    pub fn with_initial_state(mut self, state: ImageInitState) -> Self {
        self.initial_state = state;
        self
    }

    /// Restrict the permitted usage.
    pub fn with_permitted_usage(mut self, usage: ImageUsage) -> Self {
        self.permitted_usage = usage;
        self
    }

    /// Whether the description denotes a realizable image.
    pub fn is_valid(&self) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.depth >= 1
            && self.array_layers >= 1
            && self.mip_levels >= 1
    }
}

impl Default for ImageDescription {
    fn default() -> Self {
        Self::new_2d(1, 1, ImageFormat::Undefined)
    }
}

impl From<ImageInfo> for ImageDescription {
    fn from(info: ImageInfo) -> Self {
        Self {
            width: info.width,
            height: info.height,
            depth: info.depth,
            array_layers: info.array_layers,
            mip_levels: info.mip_levels,
            format: info.format,
            initial_state: ImageInitState::Undefined,
            requested_usage: ImageUsage::empty(),
            permitted_usage: ImageUsage::all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_builder() {
        let desc = ImageDescription::new_2d(1920, 1080, ImageFormat::Rgba8Unorm)
            .with_array_layers(4)
            .with_mip_levels(3)
            .with_initial_state(ImageInitState::Clear);
        assert_eq!(desc.depth, 1);
        assert_eq!(desc.array_layers, 4);
        assert_eq!(desc.mip_levels, 3);
        assert_eq!(desc.initial_state, ImageInitState::Clear);
        assert!(desc.is_valid());
    }

    #[test]
    fn test_invalid_description() {
        let mut desc = ImageDescription::new_2d(64, 64, ImageFormat::Rgba8Unorm);
        desc.mip_levels = 0;
        assert!(!desc.is_valid());
    }

    #[test]
    fn test_from_info_keeps_extents() {
        let info = ImageInfo::new_2d(256, 256, ImageFormat::Depth32Float).with_mip_levels(9);
        let desc = ImageDescription::from(info);
        assert_eq!(desc.width, 256);
        assert_eq!(desc.mip_levels, 9);
        assert_eq!(desc.format, ImageFormat::Depth32Float);
        assert!(desc.requested_usage.is_empty());
    }
}
