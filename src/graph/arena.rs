//! Append-only resource storage for one graph build.

use crate::error::RenderGraphError;
use crate::graph::resource::{Resource, ResourceDesc, ResourceId, ResourceInfo, ResourceType};
use crate::graph::{PassUid, RenderPassUid};

/// Arena holding every resource declared during one graph build.
///
/// Resources are appended and never removed; a [`ResourceId`] is the index
/// of the record. A per-kind id index supports scans over all resources of
/// one kind, used by view deduplication and hazard detection.
#[derive(Debug, Default)]
pub struct ResourceArena {
    resources: Vec<Resource>,
    images: Vec<ResourceId>,
    image_views: Vec<ResourceId>,
    buffers: Vec<ResourceId>,
    buffer_views: Vec<ResourceId>,
    meshes: Vec<ResourceId>,
    materials: Vec<ResourceId>,
    pipelines: Vec<ResourceId>,
}

impl ResourceArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource and return a mutable reference to it.
    ///
    /// The new record starts as the root of its own chain with a zero
    /// reference count; the caller fills in pass assignment and parentage.
    pub(crate) fn spawn(
        &mut self,
        name: impl Into<String>,
        assigned_pass: PassUid,
        assigned_render_pass: RenderPassUid,
        desc: ResourceDesc,
    ) -> &mut Resource {
        let id = ResourceId(self.resources.len() as u64);
        self.kind_index_mut(desc.resource_type()).push(id);
        self.resources.push(Resource {
            info: ResourceInfo {
                id,
                name: name.into(),
                assigned_pass,
                assigned_render_pass,
                parent: None,
                subjacent: id,
                reference_count: 0,
                external: false,
            },
            desc,
        });
        log::trace!("arena: spawned resource #{}", id.0);
        &mut self.resources[id.index()]
    }

    /// Look up a resource.
    pub fn get(&self, id: ResourceId) -> Result<&Resource, RenderGraphError> {
        self.resources
            .get(id.index())
            .ok_or(RenderGraphError::NotFound(id))
    }

    /// Look up a resource mutably.
    pub fn get_mut(&mut self, id: ResourceId) -> Result<&mut Resource, RenderGraphError> {
        self.resources
            .get_mut(id.index())
            .ok_or(RenderGraphError::NotFound(id))
    }

    /// Ids of every resource of the given kind, in declaration order.
    pub fn ids_of_type(&self, kind: ResourceType) -> &[ResourceId] {
        match kind {
            ResourceType::Image => &self.images,
            ResourceType::ImageView => &self.image_views,
            ResourceType::Buffer => &self.buffers,
            ResourceType::BufferView => &self.buffer_views,
            ResourceType::Mesh => &self.meshes,
            ResourceType::Material => &self.materials,
            ResourceType::Pipeline => &self.pipelines,
        }
    }

    /// Ids of every image.
    pub fn image_ids(&self) -> &[ResourceId] {
        &self.images
    }

    /// Ids of every image view.
    pub fn image_view_ids(&self) -> &[ResourceId] {
        &self.image_views
    }

    /// Ids of every buffer.
    pub fn buffer_ids(&self) -> &[ResourceId] {
        &self.buffers
    }

    /// Ids of every buffer view.
    pub fn buffer_view_ids(&self) -> &[ResourceId] {
        &self.buffer_views
    }

    /// Number of resources in the arena.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the arena holds no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterate over all resources in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    fn kind_index_mut(&mut self, kind: ResourceType) -> &mut Vec<ResourceId> {
        match kind {
            ResourceType::Image => &mut self.images,
            ResourceType::ImageView => &mut self.image_views,
            ResourceType::Buffer => &mut self.buffers,
            ResourceType::BufferView => &mut self.buffer_views,
            ResourceType::Mesh => &mut self.meshes,
            ResourceType::Material => &mut self.materials,
            ResourceType::Pipeline => &mut self.pipelines,
        }
    }
}
