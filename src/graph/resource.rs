//! Resource records stored in the graph arena.
//!
//! Every declaration a pass makes (an image, a view onto it, a buffer, a
//! mesh, ...) becomes one [`Resource`]: a common [`ResourceInfo`] header
//! plus a kind-specific [`ResourceDesc`] payload. The payload is a closed
//! sum type, so consumers match exhaustively instead of downcasting.

use bitflags::bitflags;
use static_assertions::assert_impl_all;

use crate::error::RenderGraphError;
use crate::registry::{ExternalId, MaterialDescription};
use crate::types::{BufferDescription, ByteRange, ImageDescription, ImageFormat, ImageUsage, SliceRange};

/// Identifier of a resource within one graph build.
///
/// Ids are arena indices, assigned densely from zero and never reused
/// within a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub(crate) u64);

impl ResourceId {
    /// Position of the resource in the arena.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a pass within one graph build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassUid(pub(crate) u64);

impl PassUid {
    /// Position of the pass in declaration order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifier of the render pass grouping a set of passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderPassUid(pub(crate) u64);

assert_impl_all!(ResourceId: Copy, Send, Sync);
assert_impl_all!(PassUid: Copy, Send, Sync);
assert_impl_all!(RenderPassUid: Copy, Send, Sync);

bitflags! {
    /// How a view accesses its subjacent resource.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessMode: u8 {
        /// The view reads the covered range.
        const READ = 1 << 0;
        /// The view writes the covered range.
        const WRITE = 1 << 1;
    }
}

/// What an image view is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewPurpose {
    /// Not yet determined.
    #[default]
    Undefined,
    /// Bound as a color attachment.
    ColorAttachment,
    /// Bound as a depth/stencil attachment.
    DepthAttachment,
    /// Bound as an input attachment.
    InputAttachment,
    /// Sampled or fetched in a shader outside the attachment set.
    ShaderInput,
}

impl ViewPurpose {
    /// Usage the subjacent image must support to serve this purpose.
    pub fn required_usage(&self) -> ImageUsage {
        match self {
            Self::Undefined => ImageUsage::empty(),
            Self::ColorAttachment => ImageUsage::COLOR_ATTACHMENT,
            Self::DepthAttachment => ImageUsage::DEPTH_ATTACHMENT,
            Self::InputAttachment => ImageUsage::INPUT_ATTACHMENT,
            Self::ShaderInput => ImageUsage::SAMPLED_IMAGE,
        }
    }
}

/// Whether an image is produced by the graph or borrowed from outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Created by a pass; the allocator may alias its memory.
    GraphLocal,
    /// Imported from the resource registry under this name.
    Imported(ExternalId),
}

/// An image resource: a per-frame description plus its origin.
///
/// Imported images carry a description mirrored from the registry so that
/// range and usage validation work uniformly for both origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    /// Extents, format and usage of the image.
    pub description: ImageDescription,
    /// Where the image comes from.
    pub origin: ImageOrigin,
}

/// A view selecting a subresource window of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageViewResource {
    /// Array layers covered, absolute within the subjacent image.
    pub array_range: SliceRange,
    /// Mip levels covered, absolute within the subjacent image.
    pub mip_range: SliceRange,
    /// View format; `Automatic` inherits the image format.
    pub format: ImageFormat,
    /// What the view is bound as.
    pub purpose: ViewPurpose,
    /// How the view accesses the covered range.
    pub mode: AccessMode,
}

/// Whether a buffer is produced by the graph or borrowed from outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferOrigin {
    /// Created by a pass.
    GraphLocal,
    /// Imported from the resource registry under this name.
    Imported(ExternalId),
}

/// A buffer resource: a per-frame description plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferResource {
    /// Size and usage of the buffer.
    pub description: BufferDescription,
    /// Where the buffer comes from.
    pub origin: BufferOrigin,
}

/// A view selecting a byte window of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferViewResource {
    /// Bytes covered within the subjacent buffer.
    pub range: ByteRange,
    /// How the view accesses the covered range.
    pub mode: AccessMode,
}

/// A mesh referenced from outside the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshResource {
    /// The external mesh asset.
    pub mesh: ExternalId,
}

/// Pipeline state settings a pass may override per material.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineConfig {}

/// A material resource and the graph views created for its bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialResource {
    /// The registry description the material was imported from.
    pub description: MaterialDescription,
    /// Pipeline configuration the using pass selected.
    pub pipeline_config: PipelineConfig,
    /// Buffer views created for the material's buffer bindings.
    pub buffer_views: Vec<ResourceId>,
    /// Image views created for the material's image bindings.
    pub image_views: Vec<ResourceId>,
}

/// A pipeline referenced from outside the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResource {
    /// The external pipeline object.
    pub pipeline: ExternalId,
    /// Configuration applied when binding the pipeline.
    pub config: PipelineConfig,
}

/// Kind tag of a resource, derived from its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// An image.
    Image,
    /// A view onto an image.
    ImageView,
    /// A buffer.
    Buffer,
    /// A view onto a buffer.
    BufferView,
    /// An external mesh.
    Mesh,
    /// An external material.
    Material,
    /// An external pipeline.
    Pipeline,
}

/// Kind-specific payload of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceDesc {
    /// An image.
    Image(ImageResource),
    /// A view onto an image.
    ImageView(ImageViewResource),
    /// A buffer.
    Buffer(BufferResource),
    /// A view onto a buffer.
    BufferView(BufferViewResource),
    /// An external mesh.
    Mesh(MeshResource),
    /// An external material.
    Material(MaterialResource),
    /// An external pipeline.
    Pipeline(PipelineResource),
}

impl ResourceDesc {
    /// Kind tag of the payload.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Image(_) => ResourceType::Image,
            Self::ImageView(_) => ResourceType::ImageView,
            Self::Buffer(_) => ResourceType::Buffer,
            Self::BufferView(_) => ResourceType::BufferView,
            Self::Mesh(_) => ResourceType::Mesh,
            Self::Material(_) => ResourceType::Material,
            Self::Pipeline(_) => ResourceType::Pipeline,
        }
    }
}

/// Fields common to all resources.
#[derive(Debug, Clone)]
pub struct ResourceInfo {
    /// Arena id of the resource.
    pub id: ResourceId,
    /// Human-readable name, used in logs and errors.
    pub name: String,
    /// The pass that declared the resource.
    pub assigned_pass: PassUid,
    /// The render pass grouping the declaring pass.
    pub assigned_render_pass: RenderPassUid,
    /// The resource this one was derived from; `None` for chain roots.
    pub parent: Option<ResourceId>,
    /// The root of the derivation chain. Roots point at themselves.
    pub subjacent: ResourceId,
    /// How many declarations reference the resource.
    pub reference_count: u32,
    /// Whether the underlying object lives outside the graph.
    pub external: bool,
}

impl ResourceInfo {
    /// Whether the resource is the root of its derivation chain.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// One record in the graph arena.
#[derive(Debug, Clone)]
pub struct Resource {
    /// Common header.
    pub info: ResourceInfo,
    /// Kind-specific payload.
    pub desc: ResourceDesc,
}

impl Resource {
    fn wrong_type(&self, expected: ResourceType) -> RenderGraphError {
        RenderGraphError::WrongResourceType {
            id: self.info.id,
            expected,
            found: self.desc.resource_type(),
        }
    }

    /// The image payload, or an error if the resource is of another kind.
    pub fn image(&self) -> Result<&ImageResource, RenderGraphError> {
        match &self.desc {
            ResourceDesc::Image(image) => Ok(image),
            _ => Err(self.wrong_type(ResourceType::Image)),
        }
    }

    /// Mutable image payload.
    pub fn image_mut(&mut self) -> Result<&mut ImageResource, RenderGraphError> {
        match self.desc {
            ResourceDesc::Image(ref mut image) => Ok(image),
            _ => Err(self.wrong_type(ResourceType::Image)),
        }
    }

    /// The image view payload, or an error if the resource is of another kind.
    pub fn image_view(&self) -> Result<&ImageViewResource, RenderGraphError> {
        match &self.desc {
            ResourceDesc::ImageView(view) => Ok(view),
            _ => Err(self.wrong_type(ResourceType::ImageView)),
        }
    }

    /// The buffer payload, or an error if the resource is of another kind.
    pub fn buffer(&self) -> Result<&BufferResource, RenderGraphError> {
        match &self.desc {
            ResourceDesc::Buffer(buffer) => Ok(buffer),
            _ => Err(self.wrong_type(ResourceType::Buffer)),
        }
    }

    /// Mutable buffer payload.
    pub fn buffer_mut(&mut self) -> Result<&mut BufferResource, RenderGraphError> {
        match self.desc {
            ResourceDesc::Buffer(ref mut buffer) => Ok(buffer),
            _ => Err(self.wrong_type(ResourceType::Buffer)),
        }
    }

    /// The buffer view payload, or an error if the resource is of another kind.
    pub fn buffer_view(&self) -> Result<&BufferViewResource, RenderGraphError> {
        match &self.desc {
            ResourceDesc::BufferView(view) => Ok(view),
            _ => Err(self.wrong_type(ResourceType::BufferView)),
        }
    }

    /// The mesh payload, or an error if the resource is of another kind.
    pub fn mesh(&self) -> Result<&MeshResource, RenderGraphError> {
        match &self.desc {
            ResourceDesc::Mesh(mesh) => Ok(mesh),
            _ => Err(self.wrong_type(ResourceType::Mesh)),
        }
    }

    /// The material payload, or an error if the resource is of another kind.
    pub fn material(&self) -> Result<&MaterialResource, RenderGraphError> {
        match &self.desc {
            ResourceDesc::Material(material) => Ok(material),
            _ => Err(self.wrong_type(ResourceType::Material)),
        }
    }

    /// The pipeline payload, or an error if the resource is of another kind.
    pub fn pipeline(&self) -> Result<&PipelineResource, RenderGraphError> {
        match &self.desc {
            ResourceDesc::Pipeline(pipeline) => Ok(pipeline),
            _ => Err(self.wrong_type(ResourceType::Pipeline)),
        }
    }
}

/// Outcome of declaring an image view: a fresh view or a reuse of an
/// equivalent one declared earlier in the same build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewBinding {
    /// A new view was added to the arena.
    Created(ResourceId),
    /// An equivalent existing view was reused.
    Reused(ResourceId),
}

impl ViewBinding {
    /// The bound view id, whether created or reused.
    pub fn id(&self) -> ResourceId {
        match self {
            Self::Created(id) | Self::Reused(id) => *id,
        }
    }

    /// Whether an existing view was reused.
    pub fn is_reused(&self) -> bool {
        matches!(self, Self::Reused(_))
    }
}
