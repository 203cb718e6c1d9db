//! Render graph construction and execution.
//!
//! A frame is described declaratively: passes are added to a
//! [`GraphBuilder`], each pass's setup callback declares the resources it
//! creates, imports, reads and writes through a [`PassBuilder`], and
//! [`GraphBuilder::build`] resolves the declarations into a [`Graph`]
//! holding the resource arena and the attachment collection. Executing the
//! graph runs every pass's execute callback against the frozen arena and
//! the caller's render context.
//!
//! ```
//! use framegraph::{
//!     GraphBuilder, ImageDescription, ImageFormat, MemoryRegistry, ResourceId, WriteFlags,
//! };
//!
//! #[derive(Debug, Default)]
//! struct GBufferData {
//!     color: Option<ResourceId>,
//! }
//!
//! let mut builder = GraphBuilder::<()>::new();
//! builder.add_callback_pass::<GBufferData>(
//!     "gbuffer",
//!     |builder, data| {
//!         let image = builder.create_image(
//!             "gbuffer0",
//!             ImageDescription::new_2d(1920, 1080, ImageFormat::Rgba8Unorm),
//!         )?;
//!         data.color = Some(builder.write_attachment(image, &WriteFlags::default())?);
//!         Ok(())
//!     },
//!     |_, _, _| Ok(()),
//! );
//! let graph = builder.build(&MemoryRegistry::new()).unwrap();
//! assert_eq!(graph.attachments().color_attachments().len(), 1);
//! ```

pub mod arena;
pub mod attachments;
pub mod builder;
pub mod pass;
pub mod resource;
pub mod validation;

pub use arena::ResourceArena;
pub use attachments::AttachmentCollection;
pub use builder::{PassBuilder, ReadFlags, WriteFlags, WriteTarget};
pub use pass::{CallbackPass, GraphPass, Pass};
pub use resource::{
    AccessMode, BufferOrigin, BufferResource, BufferViewResource, ImageOrigin, ImageResource,
    ImageViewResource, MaterialResource, MeshResource, PassUid, PipelineConfig, PipelineResource,
    RenderPassUid, Resource, ResourceDesc, ResourceId, ResourceInfo, ResourceType, ViewBinding,
    ViewPurpose,
};
pub use validation::{HazardScope, ValidationConfig, ValidationMode};

use crate::error::RenderGraphError;
use crate::registry::ResourceRegistry;

/// Collects passes and resolves their declarations into a [`Graph`].
pub struct GraphBuilder<C> {
    records: Vec<Pass>,
    nodes: Vec<Box<dyn GraphPass<C>>>,
    render_pass: RenderPassUid,
    validation: ValidationConfig,
}

impl<C: 'static> GraphBuilder<C> {
    /// Create an empty builder with default validation settings.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            nodes: Vec::new(),
            render_pass: RenderPassUid(0),
            validation: ValidationConfig::default(),
        }
    }

    /// Override the validation settings for this build.
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Add a pass. Passes run in the order they are added.
    pub fn add_pass(&mut self, name: impl Into<String>, pass: Box<dyn GraphPass<C>>) -> PassUid {
        let uid = PassUid(self.records.len() as u64);
        self.records.push(Pass::new(uid, name));
        self.nodes.push(pass);
        uid
    }

    /// Add a [`CallbackPass`] assembled from the two closures.
    pub fn add_callback_pass<D>(
        &mut self,
        name: impl Into<String>,
        setup: impl FnOnce(&mut PassBuilder<'_>, &mut D) -> Result<(), RenderGraphError> + 'static,
        execute: impl Fn(&D, &ResourceArena, &mut C) -> Result<(), RenderGraphError> + 'static,
    ) -> PassUid
    where
        D: Default + 'static,
    {
        self.add_pass(name, Box::new(CallbackPass::new(setup, execute)))
    }

    /// Run every pass's setup in declaration order and freeze the result.
    ///
    /// External resources are resolved through `registry`. The first setup
    /// error aborts the whole build.
    pub fn build(mut self, registry: &dyn ResourceRegistry) -> Result<Graph<C>, RenderGraphError> {
        let mut arena = ResourceArena::new();
        let mut attachments = AttachmentCollection::new();

        for (record, node) in self.records.iter_mut().zip(self.nodes.iter_mut()) {
            log::debug!("setting up pass '{}'", record.name());
            let mut pass_builder = PassBuilder::new(
                record,
                self.render_pass,
                &mut arena,
                &mut attachments,
                registry,
                self.validation,
            );
            let result = node.setup(&mut pass_builder);
            if let Err(error) = result {
                log::error!("setup of pass '{}' failed: {error}", record.name());
                return Err(RenderGraphError::PassSetupFailed {
                    pass: record.name().to_string(),
                    source: Box::new(error),
                });
            }
        }

        log::debug!(
            "graph built: {} passes, {} resources, {} attachments",
            self.records.len(),
            arena.len(),
            attachments.len()
        );
        Ok(Graph {
            records: self.records,
            nodes: self.nodes,
            arena,
            attachments,
        })
    }
}

impl<C: 'static> Default for GraphBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for GraphBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("passes", &self.records)
            .field("validation", &self.validation)
            .finish()
    }
}

/// A built render graph: frozen resource declarations plus the passes that
/// made them.
pub struct Graph<C> {
    records: Vec<Pass>,
    nodes: Vec<Box<dyn GraphPass<C>>>,
    arena: ResourceArena,
    attachments: AttachmentCollection,
}

impl<C> Graph<C> {
    /// Every resource declared during the build.
    pub fn resources(&self) -> &ResourceArena {
        &self.arena
    }

    /// The attachments declared during the build.
    pub fn attachments(&self) -> &AttachmentCollection {
        &self.attachments
    }

    /// Bookkeeping records of all passes, in execution order.
    pub fn passes(&self) -> &[Pass] {
        &self.records
    }

    /// Pass uids in the order execute callbacks run.
    pub fn execution_order(&self) -> impl Iterator<Item = PassUid> + '_ {
        self.records.iter().map(Pass::uid)
    }

    /// Ids of the resources a pass declared or reused, in declaration
    /// order.
    pub fn pass_resources(&self, uid: PassUid) -> Option<&[ResourceId]> {
        self.records
            .get(uid.index())
            .map(Pass::registered_resources)
    }

    /// Run every pass's execute callback in order against `context`.
    ///
    /// The first failure stops execution; the arena is never mutated by
    /// the execute phase.
    pub fn execute(&self, context: &mut C) -> Result<(), RenderGraphError> {
        for (record, node) in self.records.iter().zip(self.nodes.iter()) {
            log::debug!("executing pass '{}'", record.name());
            if let Err(error) = node.execute(&self.arena, context) {
                log::error!("execution of pass '{}' failed: {error}", record.name());
                return Err(RenderGraphError::PassExecutionFailed {
                    pass: record.name().to_string(),
                    source: Box::new(error),
                });
            }
        }
        Ok(())
    }
}

impl<C> std::fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("passes", &self.records)
            .field("resources", &self.arena.len())
            .field("attachments", &self.attachments.len())
            .finish()
    }
}
