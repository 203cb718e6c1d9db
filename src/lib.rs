//! # framegraph
//!
//! A frame graph resource-dependency engine. Render passes declare, per
//! frame, the virtual images, buffers and views they create, import, read
//! and write; the graph links every view to its parent and subjacent root
//! resource, deduplicates equivalent views, validates subresource read and
//! write hazards, and collects the attachments a render pass builder
//! consumes.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GraphBuilder`] / [`Graph`] - declarative build phase and ordered execute phase
//! - [`PassBuilder`] - the declaration API handed to each pass's setup
//! - [`ResourceArena`] - append-only storage for one frame's virtual resources
//! - [`AttachmentCollection`] - color/depth/input attachment bookkeeping
//! - [`ResourceRegistry`] - lookup of resources owned outside the graph
//!
//! ## Example
//!
//! ```ignore
//! use framegraph::{GraphBuilder, MemoryRegistry};
//!
//! let mut builder = GraphBuilder::<RenderContext>::new();
//! builder.add_callback_pass::<GBufferData>("gbuffer", setup, execute);
//! let graph = builder.build(&registry)?;
//! graph.execute(&mut context)?;
//! ```

pub mod error;
pub mod graph;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use error::{HazardKind, RenderGraphError};
pub use graph::{
    AccessMode, AttachmentCollection, CallbackPass, Graph, GraphBuilder, GraphPass, HazardScope,
    Pass, PassBuilder, PassUid, PipelineConfig, ReadFlags, RenderPassUid, Resource, ResourceArena,
    ResourceDesc, ResourceId, ResourceInfo, ResourceType, ValidationConfig, ValidationMode,
    ViewBinding, ViewPurpose, WriteFlags, WriteTarget,
};
pub use registry::{ExternalId, MaterialDescription, MemoryRegistry, ResourceRegistry};
pub use types::{
    BufferDescription, BufferInfo, BufferUsage, ByteRange, ImageDescription, ImageFormat,
    ImageInfo, ImageInitState, ImageUsage, SliceRange,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the frame graph subsystem.
///
/// Optional; only emits a startup log line.
pub fn init() {
    log::info!("framegraph v{} initialized", VERSION);
}
