//! Buffer descriptions and usage flags.

use bitflags::bitflags;

bitflags! {
    /// Usage flags for buffers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        /// Buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 0;
        /// Buffer can be bound as an index buffer.
        const INDEX = 1 << 1;
        /// Buffer can be bound as a uniform buffer.
        const UNIFORM = 1 << 2;
        /// Buffer can be bound as a storage buffer.
        const STORAGE = 1 << 3;
        /// Buffer can be copied from.
        const COPY_SRC = 1 << 4;
        /// Buffer can be copied to.
        const COPY_DST = 1 << 5;
    }
}

impl Default for BufferUsage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Description of a buffer owned outside the graph, as reported by the
/// resource registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferInfo {
    /// Size in bytes.
    pub size: u64,
    /// Usage the buffer was allocated for.
    pub usage: BufferUsage,
}

impl BufferInfo {
    /// Describe a buffer of `size` bytes.
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self { size, usage }
    }
}

/// Mutable per-frame description of a buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferDescription {
    /// Size in bytes.
    pub size: u64,
    /// Usage accumulated from the views declared onto this buffer.
    pub requested_usage: BufferUsage,
    /// Usage the underlying allocation is allowed to serve.
    pub permitted_usage: BufferUsage,
}

impl BufferDescription {
    /// Describe a buffer of `size` bytes.
    pub fn new(size: u64) -> Self {
        Self {
            size,
            requested_usage: BufferUsage::empty(),
            permitted_usage: BufferUsage::all(),
        }
    }

    /// Restrict the permitted usage.
    pub fn with_permitted_usage(mut self, usage: BufferUsage) -> Self {
        self.permitted_usage = usage;
        self
    }
}

impl Default for BufferDescription {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<BufferInfo> for BufferDescription {
    fn from(info: BufferInfo) -> Self {
        Self {
            size: info.size,
            requested_usage: BufferUsage::empty(),
            permitted_usage: info.usage,
        }
    }
}
