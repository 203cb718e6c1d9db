//! External resource lookup.
//!
//! The graph does not own GPU memory. Images, buffers and materials that
//! exist outside a single frame are referenced by [`ExternalId`] and their
//! descriptions are fetched from a [`ResourceRegistry`] during the build
//! phase, so the graph can mirror extents and usage into its own arena.

use std::collections::HashMap;
use std::fmt;

use crate::types::{BufferInfo, ImageInfo};

/// Name of a resource owned outside the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalId(String);

impl ExternalId {
    /// Wrap a resource name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The wrapped name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExternalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ExternalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Description of a material and the external resources it is composed of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialDescription {
    /// The material itself.
    pub material: ExternalId,
    /// Base material this one is derived from, if any.
    pub shared_material: Option<ExternalId>,
    /// Uniform/storage buffers the material binds.
    pub buffers: Vec<ExternalId>,
    /// Images the material samples.
    pub images: Vec<ExternalId>,
}

impl MaterialDescription {
    /// Describe a material with no bound resources.
    pub fn new(material: impl Into<ExternalId>) -> Self {
        Self {
            material: material.into(),
            shared_material: None,
            buffers: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Add a buffer binding.
    pub fn with_buffer(mut self, id: impl Into<ExternalId>) -> Self {
        self.buffers.push(id.into());
        self
    }

    /// Add an image binding.
    pub fn with_image(mut self, id: impl Into<ExternalId>) -> Self {
        self.images.push(id.into());
        self
    }

    /// Set the base material.
    pub fn with_shared_material(mut self, id: impl Into<ExternalId>) -> Self {
        self.shared_material = Some(id.into());
        self
    }
}

/// Source of descriptions for resources owned outside the graph.
///
/// Implemented by whatever manages long-lived GPU resources in the host
/// application. Lookups return `None` for unknown ids; the pass builder
/// turns that into [`RenderGraphError::ExternalResourceNotFound`](crate::RenderGraphError::ExternalResourceNotFound).
pub trait ResourceRegistry {
    /// Description of an external image, if known.
    fn image_description(&self, id: &ExternalId) -> Option<ImageInfo>;

    /// Description of an external buffer, if known.
    fn buffer_description(&self, id: &ExternalId) -> Option<BufferInfo>;

    /// Description of a material, if known.
    fn material_description(&self, id: &ExternalId) -> Option<MaterialDescription>;
}

/// In-memory [`ResourceRegistry`] for tests and CPU-side embedders.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    images: HashMap<ExternalId, ImageInfo>,
    buffers: HashMap<ExternalId, BufferInfo>,
    materials: HashMap<ExternalId, MaterialDescription>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image description.
    pub fn add_image(&mut self, id: impl Into<ExternalId>, info: ImageInfo) -> &mut Self {
        self.images.insert(id.into(), info);
        self
    }

    /// Register a buffer description.
    pub fn add_buffer(&mut self, id: impl Into<ExternalId>, info: BufferInfo) -> &mut Self {
        self.buffers.insert(id.into(), info);
        self
    }

    /// Register a material description under its own material id.
    pub fn add_material(&mut self, desc: MaterialDescription) -> &mut Self {
        self.materials.insert(desc.material.clone(), desc);
        self
    }
}

impl ResourceRegistry for MemoryRegistry {
    fn image_description(&self, id: &ExternalId) -> Option<ImageInfo> {
        self.images.get(id).cloned()
    }

    fn buffer_description(&self, id: &ExternalId) -> Option<BufferInfo> {
        self.buffers.get(id).cloned()
    }

    fn material_description(&self, id: &ExternalId) -> Option<MaterialDescription> {
        self.materials.get(id).cloned()
    }
}
