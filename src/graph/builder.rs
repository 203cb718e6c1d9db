//! The pass builder: the API passes declare their resources through.
//!
//! A [`PassBuilder`] is handed to each pass's setup callback during the
//! build phase. It is the only way to add resources to the arena, so all
//! bookkeeping (parent/subjacent links, reference counts, usage
//! accumulation, attachment registration) funnels through one place.
//!
//! Views are deduplicated: requesting a view equivalent to one already
//! declared on the same subjacent image reuses the existing view instead
//! of adding a new arena record.

use crate::error::RenderGraphError;
use crate::graph::arena::ResourceArena;
use crate::graph::attachments::AttachmentCollection;
use crate::graph::pass::Pass;
use crate::graph::resource::{
    AccessMode, BufferOrigin, BufferResource, BufferViewResource, ImageOrigin, ImageResource,
    ImageViewResource, MaterialResource, MeshResource, PipelineConfig, PipelineResource,
    ResourceDesc, ResourceId, ResourceType, ViewBinding, ViewPurpose,
};
use crate::graph::validation::{self, ValidationConfig};
use crate::graph::{PassUid, RenderPassUid};
use crate::registry::{ExternalId, ResourceRegistry};
use crate::types::{
    BufferDescription, ByteRange, ImageDescription, ImageFormat, ImageUsage, SliceRange,
};

/// Parameters for a read declaration on an image or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFlags {
    /// Format the view is read as; `Automatic` inherits the image format.
    pub format: ImageFormat,
    /// Array layers to read, relative to the source resource.
    pub array_range: SliceRange,
    /// Mip levels to read, relative to the source resource.
    pub mip_range: SliceRange,
}

impl Default for ReadFlags {
    fn default() -> Self {
        Self {
            format: ImageFormat::Automatic,
            array_range: SliceRange::default(),
            mip_range: SliceRange::default(),
        }
    }
}

impl ReadFlags {
    /// Set the view format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the array layer range.
    pub fn with_array_range(mut self, range: SliceRange) -> Self {
        self.array_range = range;
        self
    }

    /// Set the mip level range.
    pub fn with_mip_range(mut self, range: SliceRange) -> Self {
        self.mip_range = range;
        self
    }
}

/// Which attachment slot a write declaration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteTarget {
    /// A color attachment.
    #[default]
    Color,
    /// The depth/stencil attachment.
    Depth,
}

/// Parameters for a write declaration on an image or view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteFlags {
    /// Format the view is written as; `Automatic` inherits the image format.
    pub format: ImageFormat,
    /// Array layers to write, relative to the source resource.
    pub array_range: SliceRange,
    /// Mip levels to write, relative to the source resource.
    pub mip_range: SliceRange,
    /// Attachment slot the write targets.
    pub target: WriteTarget,
}

impl WriteFlags {
    /// Set the view format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the array layer range.
    pub fn with_array_range(mut self, range: SliceRange) -> Self {
        self.array_range = range;
        self
    }

    /// Set the mip level range.
    pub fn with_mip_range(mut self, range: SliceRange) -> Self {
        self.mip_range = range;
        self
    }

    /// Target the depth/stencil attachment.
    pub fn as_depth(mut self) -> Self {
        self.target = WriteTarget::Depth;
        self
    }
}

/// Declares one pass's resources into the shared build state.
///
/// Holds the pass record mutably for the duration of setup; passes never
/// touch the arena or the attachment collection directly.
pub struct PassBuilder<'a> {
    pass: &'a mut Pass,
    render_pass: RenderPassUid,
    arena: &'a mut ResourceArena,
    attachments: &'a mut AttachmentCollection,
    registry: &'a dyn ResourceRegistry,
    validation: ValidationConfig,
}

impl<'a> PassBuilder<'a> {
    pub(crate) fn new(
        pass: &'a mut Pass,
        render_pass: RenderPassUid,
        arena: &'a mut ResourceArena,
        attachments: &'a mut AttachmentCollection,
        registry: &'a dyn ResourceRegistry,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            pass,
            render_pass,
            arena,
            attachments,
            registry,
            validation,
        }
    }

    /// Uid of the pass being set up.
    pub fn pass_uid(&self) -> PassUid {
        self.pass.uid()
    }

    /// Declare a graph-local image.
    pub fn create_image(
        &mut self,
        name: impl Into<String>,
        description: ImageDescription,
    ) -> Result<ResourceId, RenderGraphError> {
        let name = name.into();
        if self.validation.is_enabled() && !description.is_valid() {
            log::error!("invalid image description for '{name}'");
            return Err(RenderGraphError::InvalidDescription { name });
        }
        let resource = self.arena.spawn(
            name,
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::Image(ImageResource {
                description,
                origin: ImageOrigin::GraphLocal,
            }),
        );
        let id = resource.info.id;
        self.pass.register_resource(id);
        Ok(id)
    }

    /// Bring an image owned outside the graph into the frame.
    ///
    /// The registry description is mirrored into the arena so views onto
    /// the import validate like views onto graph-local images. Imported
    /// images are assumed samplable.
    pub fn import_image(
        &mut self,
        name: impl Into<String>,
        external: impl Into<ExternalId>,
    ) -> Result<ResourceId, RenderGraphError> {
        let external = external.into();
        let info = self
            .registry
            .image_description(&external)
            .ok_or_else(|| RenderGraphError::ExternalResourceNotFound(external.clone()))?;
        let mut description = ImageDescription::from(info);
        description.requested_usage |= ImageUsage::SAMPLED_IMAGE;
        description.permitted_usage |= ImageUsage::SAMPLED_IMAGE;
        let resource = self.arena.spawn(
            name,
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::Image(ImageResource {
                description,
                origin: ImageOrigin::Imported(external),
            }),
        );
        resource.info.external = true;
        let id = resource.info.id;
        self.pass.register_resource(id);
        Ok(id)
    }

    /// Declare a view directly onto an image.
    ///
    /// Ranges are relative to the whole image. The new view becomes both
    /// child and leaf of the image; usage implied by `purpose` is added to
    /// the image's requested usage.
    pub fn use_image(
        &mut self,
        image: ResourceId,
        purpose: ViewPurpose,
        format: ImageFormat,
        array_range: SliceRange,
        mip_range: SliceRange,
        mode: AccessMode,
    ) -> Result<ResourceId, RenderGraphError> {
        let (name, subjacent_array, subjacent_mip) = {
            let resource = self.arena.get(image)?;
            let img = resource.image()?;
            (
                resource.info.name.clone(),
                SliceRange::from_start(img.description.array_layers),
                SliceRange::from_start(img.description.mip_levels),
            )
        };
        let (array, mip) = validation::adjust_slice_ranges(
            &name,
            subjacent_array,
            subjacent_mip,
            subjacent_array,
            subjacent_mip,
            array_range,
            mip_range,
            &self.validation,
        )?;
        validation::check_subresource_hazards(
            self.arena,
            &self.validation,
            self.pass.uid(),
            image,
            image,
            &name,
            array,
            mip,
            mode,
        )?;
        self.spawn_image_view(image, image, &name, purpose, format, array, mip, mode)
    }

    /// Declare a view derived from an existing view.
    ///
    /// Ranges are relative to the source view and are translated into
    /// absolute ranges within the subjacent image. If an equivalent view
    /// already exists it is reused instead of declared again.
    pub fn use_image_view(
        &mut self,
        view: ResourceId,
        purpose: ViewPurpose,
        format: ImageFormat,
        array_range: SliceRange,
        mip_range: SliceRange,
        mode: AccessMode,
    ) -> Result<ViewBinding, RenderGraphError> {
        let (name, source_array, source_mip, subjacent_id) = {
            let resource = self.arena.get(view)?;
            let source = resource.image_view()?;
            (
                resource.info.name.clone(),
                source.array_range,
                source.mip_range,
                resource.info.subjacent,
            )
        };
        let (subjacent_array, subjacent_mip) = {
            let resource = self.arena.get(subjacent_id)?;
            let img = resource.image()?;
            (
                SliceRange::from_start(img.description.array_layers),
                SliceRange::from_start(img.description.mip_levels),
            )
        };
        let (array, mip) = validation::adjust_slice_ranges(
            &name,
            subjacent_array,
            subjacent_mip,
            source_array,
            source_mip,
            array_range,
            mip_range,
            &self.validation,
        )?;
        validation::check_subresource_hazards(
            self.arena,
            &self.validation,
            self.pass.uid(),
            view,
            subjacent_id,
            &name,
            array,
            mip,
            mode,
        )?;

        if let Some(existing) = self.find_equivalent_view(subjacent_id, purpose, format, array, mip, mode)
        {
            self.pass.register_resource(existing);
            self.arena.get_mut(existing)?.info.reference_count += 1;
            log::trace!(
                "pass '{}': reusing view #{} on subjacent #{}",
                self.pass.name(),
                existing.index(),
                subjacent_id.index()
            );
            return Ok(ViewBinding::Reused(existing));
        }

        let created =
            self.spawn_image_view(view, subjacent_id, &name, purpose, format, array, mip, mode)?;
        Ok(ViewBinding::Created(created))
    }

    /// Declare a write to a color or depth attachment.
    ///
    /// `target` may be an image or an existing view; the resulting write
    /// view is registered in the attachment collection under the current
    /// pass. Returns the write view's id, which later passes can read
    /// from.
    pub fn write_attachment(
        &mut self,
        target: ResourceId,
        flags: &WriteFlags,
    ) -> Result<ResourceId, RenderGraphError> {
        let purpose = match flags.target {
            WriteTarget::Color => ViewPurpose::ColorAttachment,
            WriteTarget::Depth => ViewPurpose::DepthAttachment,
        };
        let view_id = self
            .use_image_or_view(
                target,
                purpose,
                flags.format,
                flags.array_range,
                flags.mip_range,
                AccessMode::WRITE,
            )
            .map_err(|error| RenderGraphError::WriteResourceFailed(Box::new(error)))?;
        let image_id = self.arena.get(view_id)?.info.subjacent;
        match flags.target {
            WriteTarget::Color => {
                self.attachments
                    .add_color_attachment(self.pass.uid(), image_id, view_id)
            }
            WriteTarget::Depth => {
                self.attachments
                    .add_depth_attachment(self.pass.uid(), image_id, view_id)
            }
        }
        Ok(view_id)
    }

    /// Declare a read through an input attachment.
    ///
    /// `source` may be an image or an existing view, typically the write
    /// view returned by an earlier pass's [`write_attachment`](Self::write_attachment).
    pub fn read_attachment(
        &mut self,
        source: ResourceId,
        flags: &ReadFlags,
    ) -> Result<ResourceId, RenderGraphError> {
        let view_id = self
            .use_image_or_view(
                source,
                ViewPurpose::InputAttachment,
                flags.format,
                flags.array_range,
                flags.mip_range,
                AccessMode::READ,
            )
            .map_err(|error| RenderGraphError::ReadResourceFailed(Box::new(error)))?;
        let image_id = self.arena.get(view_id)?.info.subjacent;
        self.attachments
            .add_input_attachment(self.pass.uid(), image_id, view_id);
        Ok(view_id)
    }

    /// Declare a shader read of an image outside the attachment set.
    pub fn read_image(
        &mut self,
        image: ResourceId,
        flags: &ReadFlags,
    ) -> Result<ResourceId, RenderGraphError> {
        self.use_image(
            image,
            ViewPurpose::ShaderInput,
            flags.format,
            flags.array_range,
            flags.mip_range,
            AccessMode::READ,
        )
        .map_err(|error| RenderGraphError::ReadResourceFailed(Box::new(error)))
    }

    /// Declare a graph-local buffer.
    pub fn create_buffer(
        &mut self,
        name: impl Into<String>,
        description: BufferDescription,
    ) -> Result<ResourceId, RenderGraphError> {
        let resource = self.arena.spawn(
            name,
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::Buffer(BufferResource {
                description,
                origin: BufferOrigin::GraphLocal,
            }),
        );
        let id = resource.info.id;
        self.pass.register_resource(id);
        Ok(id)
    }

    /// Bring a buffer owned outside the graph into the frame.
    pub fn import_buffer(
        &mut self,
        name: impl Into<String>,
        external: impl Into<ExternalId>,
    ) -> Result<ResourceId, RenderGraphError> {
        let external = external.into();
        let info = self
            .registry
            .buffer_description(&external)
            .ok_or_else(|| RenderGraphError::ExternalResourceNotFound(external.clone()))?;
        let resource = self.arena.spawn(
            name,
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::Buffer(BufferResource {
                description: BufferDescription::from(info),
                origin: BufferOrigin::Imported(external),
            }),
        );
        resource.info.external = true;
        let id = resource.info.id;
        self.pass.register_resource(id);
        Ok(id)
    }

    /// Declare a read of a byte range of a buffer.
    pub fn read_buffer(
        &mut self,
        buffer: ResourceId,
        range: ByteRange,
    ) -> Result<ResourceId, RenderGraphError> {
        let (name, size) = {
            let resource = self.arena.get(buffer)?;
            (resource.info.name.clone(), resource.buffer()?.description.size)
        };
        if self.validation.is_enabled() && range.end() > size {
            log::error!("byte range {range} out of bounds on '{name}' ({size} bytes)");
            return Err(RenderGraphError::ByteRangeOutOfBounds { name, range, size });
        }
        let view = self.arena.spawn(
            format!("view of '{name}' (read)"),
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::BufferView(BufferViewResource {
                range,
                mode: AccessMode::READ,
            }),
        );
        view.info.parent = Some(buffer);
        view.info.subjacent = buffer;
        let view_id = view.info.id;
        self.arena.get_mut(buffer)?.info.reference_count += 1;
        self.pass.register_resource(view_id);
        self.arena.get_mut(view_id)?.info.reference_count += 1;
        Ok(view_id)
    }

    /// Reference an external mesh from this pass.
    pub fn use_mesh(&mut self, mesh: impl Into<ExternalId>) -> Result<ResourceId, RenderGraphError> {
        let external = mesh.into();
        let resource = self.arena.spawn(
            external.to_string(),
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::Mesh(MeshResource {
                mesh: external,
            }),
        );
        resource.info.external = true;
        let id = resource.info.id;
        self.pass.register_resource(id);
        Ok(id)
    }

    /// Reference an external material, importing and reading every buffer
    /// and image it binds.
    ///
    /// The created material resource records the view ids of all its
    /// bindings so the execute phase can resolve them without another
    /// registry round trip.
    pub fn use_material(
        &mut self,
        material: impl Into<ExternalId>,
        pipeline_config: PipelineConfig,
    ) -> Result<ResourceId, RenderGraphError> {
        let external = material.into();
        let description = self
            .registry
            .material_description(&external)
            .ok_or_else(|| RenderGraphError::ExternalResourceNotFound(external.clone()))?;

        let mut buffer_views = Vec::with_capacity(description.buffers.len());
        for buffer_id in &description.buffers {
            let buffer = self.import_buffer(buffer_id.as_str(), buffer_id.clone())?;
            let size = self.arena.get(buffer)?.buffer()?.description.size;
            buffer_views.push(self.read_buffer(buffer, ByteRange::new(0, size))?);
        }

        let mut image_views = Vec::with_capacity(description.images.len());
        for image_id in &description.images {
            let image = self.import_image(image_id.as_str(), image_id.clone())?;
            image_views.push(self.read_image(image, &ReadFlags::default())?);
        }

        let resource = self.arena.spawn(
            external.to_string(),
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::Material(MaterialResource {
                description,
                pipeline_config,
                buffer_views,
                image_views,
            }),
        );
        resource.info.external = true;
        let id = resource.info.id;
        self.pass.register_resource(id);
        Ok(id)
    }

    /// Reference an external pipeline with the given configuration.
    pub fn use_pipeline(
        &mut self,
        pipeline: impl Into<ExternalId>,
        config: PipelineConfig,
    ) -> Result<ResourceId, RenderGraphError> {
        let external = pipeline.into();
        let resource = self.arena.spawn(
            external.to_string(),
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::Pipeline(PipelineResource {
                pipeline: external,
                config,
            }),
        );
        let id = resource.info.id;
        self.pass.register_resource(id);
        Ok(id)
    }

    fn use_image_or_view(
        &mut self,
        target: ResourceId,
        purpose: ViewPurpose,
        format: ImageFormat,
        array_range: SliceRange,
        mip_range: SliceRange,
        mode: AccessMode,
    ) -> Result<ResourceId, RenderGraphError> {
        match self.arena.get(target)?.desc.resource_type() {
            ResourceType::Image => {
                self.use_image(target, purpose, format, array_range, mip_range, mode)
            }
            ResourceType::ImageView => self
                .use_image_view(target, purpose, format, array_range, mip_range, mode)
                .map(|binding| binding.id()),
            found => Err(RenderGraphError::WrongResourceType {
                id: target,
                expected: ResourceType::Image,
                found,
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_image_view(
        &mut self,
        parent: ResourceId,
        subjacent: ResourceId,
        parent_name: &str,
        purpose: ViewPurpose,
        format: ImageFormat,
        array: SliceRange,
        mip: SliceRange,
        mode: AccessMode,
    ) -> Result<ResourceId, RenderGraphError> {
        let access_tag = if mode.contains(AccessMode::WRITE) {
            "write"
        } else {
            "read"
        };
        let view = self.arena.spawn(
            format!("view of '{parent_name}' ({access_tag})"),
            self.pass.uid(),
            self.render_pass,
            ResourceDesc::ImageView(ImageViewResource {
                array_range: array,
                mip_range: mip,
                format,
                purpose,
                mode,
            }),
        );
        view.info.parent = Some(parent);
        view.info.subjacent = subjacent;
        let view_id = view.info.id;

        let image = self.arena.get_mut(subjacent)?;
        image.image_mut()?.description.requested_usage |= purpose.required_usage();
        image.info.reference_count += 1;

        self.pass.register_resource(view_id);
        self.arena.get_mut(view_id)?.info.reference_count += 1;
        Ok(view_id)
    }

    fn find_equivalent_view(
        &self,
        subjacent: ResourceId,
        purpose: ViewPurpose,
        format: ImageFormat,
        array: SliceRange,
        mip: SliceRange,
        mode: AccessMode,
    ) -> Option<ResourceId> {
        for &id in self.arena.image_view_ids() {
            let Ok(resource) = self.arena.get(id) else {
                continue;
            };
            let Ok(candidate) = resource.image_view() else {
                continue;
            };
            if resource.info.subjacent != subjacent
                || candidate.purpose != purpose
                || !candidate.format.is_compatible_with(&format)
                || !candidate.mode.contains(mode)
            {
                continue;
            }
            if candidate.array_range == array && candidate.mip_range == mip {
                return Some(id);
            }
        }
        None
    }
}

impl std::fmt::Debug for PassBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassBuilder")
            .field("pass", &self.pass.uid())
            .field("render_pass", &self.render_pass)
            .field("validation", &self.validation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HazardKind;
    use crate::graph::validation::HazardScope;
    use crate::registry::{MaterialDescription, MemoryRegistry};
    use crate::types::{BufferInfo, BufferUsage, ImageInfo};

    struct Harness {
        pass: Pass,
        arena: ResourceArena,
        attachments: AttachmentCollection,
        registry: MemoryRegistry,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                pass: Pass::new(PassUid(0), "test pass"),
                arena: ResourceArena::new(),
                attachments: AttachmentCollection::new(),
                registry: MemoryRegistry::new(),
            }
        }

        fn builder(&mut self) -> PassBuilder<'_> {
            self.builder_with(ValidationConfig::enabled())
        }

        fn builder_with(&mut self, validation: ValidationConfig) -> PassBuilder<'_> {
            PassBuilder::new(
                &mut self.pass,
                RenderPassUid(0),
                &mut self.arena,
                &mut self.attachments,
                &self.registry,
                validation,
            )
        }
    }

    fn gbuffer_image() -> ImageDescription {
        ImageDescription::new_2d(1920, 1080, ImageFormat::Rgba8Unorm)
            .with_array_layers(8)
            .with_mip_levels(4)
    }

    #[test]
    fn test_created_image_is_chain_root() {
        let mut h = Harness::new();
        let image = h.builder().create_image("gbuffer0", gbuffer_image()).unwrap();
        let resource = h.arena.get(image).unwrap();
        assert!(resource.info.is_root());
        assert_eq!(resource.info.subjacent, image);
        assert!(!resource.info.external);
        assert_eq!(h.pass.registered_resources(), &[image]);
    }

    #[test]
    fn test_invalid_image_description_is_rejected() {
        let mut h = Harness::new();
        let mut desc = gbuffer_image();
        desc.mip_levels = 0;
        let err = h.builder().create_image("broken", desc).unwrap_err();
        assert!(matches!(err, RenderGraphError::InvalidDescription { .. }));
    }

    #[test]
    fn test_import_image_mirrors_registry_description() {
        let mut h = Harness::new();
        h.registry.add_image(
            "backbuffer",
            ImageInfo::new_2d(1280, 720, ImageFormat::Bgra8Unorm).with_mip_levels(2),
        );
        let image = h.builder().import_image("backbuffer", "backbuffer").unwrap();
        let resource = h.arena.get(image).unwrap();
        assert!(resource.info.external);
        let img = resource.image().unwrap();
        assert_eq!(img.description.mip_levels, 2);
        assert!(img.description.requested_usage.contains(ImageUsage::SAMPLED_IMAGE));
        assert!(matches!(img.origin, ImageOrigin::Imported(_)));
    }

    #[test]
    fn test_import_unknown_image_fails() {
        let mut h = Harness::new();
        let err = h.builder().import_image("missing", "missing").unwrap_err();
        assert!(matches!(
            err,
            RenderGraphError::ExternalResourceNotFound(_)
        ));
    }

    #[test]
    fn test_use_image_links_and_counts() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let image = builder.create_image("gbuffer0", gbuffer_image()).unwrap();
        let view = builder
            .use_image(
                image,
                ViewPurpose::ColorAttachment,
                ImageFormat::Automatic,
                SliceRange::new(0, 4),
                SliceRange::new(0, 1),
                AccessMode::WRITE,
            )
            .unwrap();

        let view_resource = h.arena.get(view).unwrap();
        assert_eq!(view_resource.info.parent, Some(image));
        assert_eq!(view_resource.info.subjacent, image);
        assert_eq!(view_resource.info.reference_count, 1);

        let image_resource = h.arena.get(image).unwrap();
        assert_eq!(image_resource.info.reference_count, 1);
        assert!(image_resource
            .image()
            .unwrap()
            .description
            .requested_usage
            .contains(ImageUsage::COLOR_ATTACHMENT));
    }

    #[test]
    fn test_cascaded_view_stays_within_image() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let image = builder.create_image("gbuffer0", gbuffer_image()).unwrap();
        let write = builder
            .write_attachment(
                image,
                &WriteFlags::default()
                    .with_array_range(SliceRange::new(2, 6))
                    .with_mip_range(SliceRange::new(0, 4)),
            )
            .unwrap();
        let binding = builder
            .use_image_view(
                write,
                ViewPurpose::InputAttachment,
                ImageFormat::Automatic,
                SliceRange::new(1, 2),
                SliceRange::new(1, 1),
                AccessMode::READ,
            )
            .unwrap();

        // ranges are absolute within the subjacent image
        let resource = h.arena.get(binding.id()).unwrap();
        let view = resource.image_view().unwrap();
        assert_eq!(view.array_range, SliceRange::new(3, 2));
        assert_eq!(view.mip_range, SliceRange::new(1, 1));

        // parent is the source view, subjacent is the image
        assert_eq!(resource.info.parent, Some(write));
        assert_eq!(resource.info.subjacent, image);

        // the whole parent chain resolves to the same root
        let mut current = resource.info.clone();
        while let Some(parent) = current.parent {
            current = h.arena.get(parent).unwrap().info.clone();
        }
        assert_eq!(current.id, image);
    }

    #[test]
    fn test_cascaded_view_cannot_escape_source() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let image = builder.create_image("gbuffer0", gbuffer_image()).unwrap();
        let write = builder
            .write_attachment(
                image,
                &WriteFlags::default()
                    .with_array_range(SliceRange::new(2, 4))
                    .with_mip_range(SliceRange::new(0, 1)),
            )
            .unwrap();
        let err = builder
            .use_image_view(
                write,
                ViewPurpose::InputAttachment,
                ImageFormat::Automatic,
                SliceRange::new(5, 3),
                SliceRange::new(0, 1),
                AccessMode::READ,
            )
            .unwrap_err();
        assert!(matches!(err, RenderGraphError::RangeOutOfBounds { .. }));
    }

    #[test]
    fn test_equivalent_views_are_deduplicated() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let image = builder.create_image("gbuffer0", gbuffer_image()).unwrap();
        let write = builder
            .write_attachment(
                image,
                &WriteFlags::default()
                    .with_array_range(SliceRange::new(0, 4))
                    .with_mip_range(SliceRange::new(0, 1)),
            )
            .unwrap();

        let request = |builder: &mut PassBuilder<'_>| {
            builder.use_image_view(
                write,
                ViewPurpose::InputAttachment,
                ImageFormat::Automatic,
                SliceRange::new(0, 2),
                SliceRange::new(0, 1),
                AccessMode::READ,
            )
        };

        let first = request(&mut builder).unwrap();
        let arena_len = h.arena.len();

        let mut builder = h.builder();
        let second = request(&mut builder).unwrap();

        assert!(matches!(first, ViewBinding::Created(_)));
        assert!(matches!(second, ViewBinding::Reused(_)));
        assert_eq!(first.id(), second.id());
        // no new arena record, only the reference count moved
        assert_eq!(h.arena.len(), arena_len);
        assert_eq!(h.arena.get(first.id()).unwrap().info.reference_count, 2);
    }

    #[test]
    fn test_overlapping_read_after_write_is_a_hazard() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let image = builder.create_image("gbuffer0", gbuffer_image()).unwrap();
        builder
            .write_attachment(
                image,
                &WriteFlags::default()
                    .with_array_range(SliceRange::new(0, 4))
                    .with_mip_range(SliceRange::new(0, 1)),
            )
            .unwrap();

        let err = builder
            .read_attachment(
                image,
                &ReadFlags::default()
                    .with_array_range(SliceRange::new(2, 4))
                    .with_mip_range(SliceRange::new(0, 1)),
            )
            .unwrap_err();
        assert!(matches!(err, RenderGraphError::ReadResourceFailed(_)));
        assert!(matches!(
            err.root_cause(),
            RenderGraphError::HazardDetected {
                kind: HazardKind::ReadWhileWritten,
                ..
            }
        ));

        // a disjoint range on the same image is fine
        builder
            .read_attachment(
                image,
                &ReadFlags::default()
                    .with_array_range(SliceRange::new(4, 4))
                    .with_mip_range(SliceRange::new(0, 1)),
            )
            .unwrap();
    }

    #[test]
    fn test_cascaded_read_from_read_view_is_reused() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let image = builder.create_image("gbuffer0", gbuffer_image()).unwrap();
        let read_view = builder.read_image(image, &ReadFlags::default()).unwrap();

        // an identically-ranged read derived from a read view is not a
        // collision, it resolves to the existing view
        let binding = builder
            .use_image_view(
                read_view,
                ViewPurpose::ShaderInput,
                ImageFormat::Automatic,
                SliceRange::new(0, 1),
                SliceRange::new(0, 1),
                AccessMode::READ,
            )
            .unwrap();
        assert!(matches!(binding, ViewBinding::Reused(_)));
        assert_eq!(binding.id(), read_view);
        assert_eq!(h.arena.get(read_view).unwrap().info.reference_count, 2);
    }

    #[test]
    fn test_write_over_read_range_is_a_hazard() {
        let mut h = Harness::new();
        let config = ValidationConfig {
            read_scope: HazardScope::Any,
            ..ValidationConfig::enabled()
        };
        let mut builder = h.builder_with(config);
        let image = builder.create_image("gbuffer0", gbuffer_image()).unwrap();
        builder.read_image(image, &ReadFlags::default()).unwrap();

        let err = builder
            .write_attachment(image, &WriteFlags::default())
            .unwrap_err();
        assert!(matches!(err, RenderGraphError::WriteResourceFailed(_)));
        assert!(matches!(
            err.root_cause(),
            RenderGraphError::HazardDetected {
                kind: HazardKind::WrittenWhileRead,
                ..
            }
        ));
    }

    #[test]
    fn test_attachments_are_bucketed_by_target() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let color = builder.create_image("color", gbuffer_image()).unwrap();
        let depth = builder
            .create_image(
                "depth",
                ImageDescription::new_2d(1920, 1080, ImageFormat::Depth32Float),
            )
            .unwrap();

        let color_view = builder
            .write_attachment(
                color,
                &WriteFlags::default()
                    .with_array_range(SliceRange::new(0, 1))
                    .with_mip_range(SliceRange::new(0, 1)),
            )
            .unwrap();
        let depth_view = builder
            .write_attachment(
                depth,
                &WriteFlags::default()
                    .with_array_range(SliceRange::new(0, 1))
                    .with_mip_range(SliceRange::new(0, 1))
                    .as_depth(),
            )
            .unwrap();

        let colors: Vec<_> = h.attachments.color_attachment_pairs().collect();
        let depths: Vec<_> = h.attachments.depth_attachment_pairs().collect();
        assert_eq!(colors, vec![(color, color_view)]);
        assert_eq!(depths, vec![(depth, depth_view)]);
        assert_eq!(h.attachments.pass_attachments(PassUid(0)).len(), 2);
        assert_eq!(h.attachments.image_of_view(color_view), Some(color));

        let depth_resource = h.arena.get(depth).unwrap();
        assert!(depth_resource
            .image()
            .unwrap()
            .description
            .requested_usage
            .contains(ImageUsage::DEPTH_ATTACHMENT));
    }

    #[test]
    fn test_write_attachment_rejects_non_image_targets() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let buffer = builder
            .create_buffer("staging", BufferDescription::new(64))
            .unwrap();
        let err = builder
            .write_attachment(buffer, &WriteFlags::default())
            .unwrap_err();
        assert!(matches!(err, RenderGraphError::WriteResourceFailed(_)));
        assert!(matches!(
            err.root_cause(),
            RenderGraphError::WrongResourceType { .. }
        ));
    }

    #[test]
    fn test_reference_counts_grow_per_use() {
        let mut h = Harness::new();
        let image = h.builder().create_image("gbuffer0", gbuffer_image()).unwrap();
        assert_eq!(h.arena.get(image).unwrap().info.reference_count, 0);

        for i in 0..3u32 {
            h.builder()
                .read_image(
                    image,
                    &ReadFlags::default()
                        .with_array_range(SliceRange::new(i, 1))
                        .with_mip_range(SliceRange::new(0, 1)),
                )
                .unwrap();
            assert_eq!(h.arena.get(image).unwrap().info.reference_count, i + 1);
        }
    }

    #[test]
    fn test_read_buffer_checks_bounds_and_counts() {
        let mut h = Harness::new();
        h.registry
            .add_buffer("camera", BufferInfo::new(256, BufferUsage::UNIFORM));
        let mut builder = h.builder();
        let buffer = builder.import_buffer("camera", "camera").unwrap();

        let err = builder
            .read_buffer(buffer, ByteRange::new(192, 128))
            .unwrap_err();
        assert!(matches!(
            err,
            RenderGraphError::ByteRangeOutOfBounds { size: 256, .. }
        ));

        let view = builder.read_buffer(buffer, ByteRange::new(0, 256)).unwrap();
        let resource = h.arena.get(view).unwrap();
        assert_eq!(resource.info.parent, Some(buffer));
        assert_eq!(resource.info.subjacent, buffer);
        assert_eq!(resource.info.reference_count, 1);
        assert_eq!(h.arena.get(buffer).unwrap().info.reference_count, 1);
    }

    #[test]
    fn test_use_material_imports_all_bindings() {
        let mut h = Harness::new();
        h.registry
            .add_buffer("pbr_params", BufferInfo::new(128, BufferUsage::UNIFORM));
        h.registry
            .add_image("pbr_albedo", ImageInfo::new_2d(1024, 1024, ImageFormat::Rgba8UnormSrgb));
        h.registry
            .add_image("pbr_normal", ImageInfo::new_2d(1024, 1024, ImageFormat::Rgba8Unorm));
        h.registry.add_material(
            MaterialDescription::new("pbr")
                .with_buffer("pbr_params")
                .with_image("pbr_albedo")
                .with_image("pbr_normal"),
        );

        let mut builder = h.builder();
        let material = builder
            .use_material("pbr", PipelineConfig::default())
            .unwrap();

        let resource = h.arena.get(material).unwrap();
        assert!(resource.info.external);
        let data = resource.material().unwrap();
        assert_eq!(data.buffer_views.len(), 1);
        assert_eq!(data.image_views.len(), 2);

        // one buffer + one buffer view + two images + two image views + the material
        assert_eq!(h.arena.len(), 7);
        for &view in &data.image_views {
            assert_eq!(h.arena.get(view).unwrap().info.reference_count, 1);
        }
    }

    #[test]
    fn test_use_material_unknown_id_fails() {
        let mut h = Harness::new();
        let err = h
            .builder()
            .use_material("missing", PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RenderGraphError::ExternalResourceNotFound(_)
        ));
    }

    #[test]
    fn test_use_mesh_and_pipeline_register() {
        let mut h = Harness::new();
        let mut builder = h.builder();
        let mesh = builder.use_mesh("suzanne").unwrap();
        let pipeline = builder
            .use_pipeline("forward_opaque", PipelineConfig::default())
            .unwrap();

        assert!(h.arena.get(mesh).unwrap().info.external);
        assert!(!h.arena.get(pipeline).unwrap().info.external);
        assert_eq!(h.pass.registered_resources(), &[mesh, pipeline]);
    }
}
