//! Pass records and the pass trait.

use crate::error::RenderGraphError;
use crate::graph::arena::ResourceArena;
use crate::graph::builder::PassBuilder;
use crate::graph::resource::ResourceId;
use crate::graph::PassUid;

/// Bookkeeping record for one declared pass.
///
/// Collects the ids of every resource the pass declared or reused during
/// setup, in declaration order.
#[derive(Debug)]
pub struct Pass {
    uid: PassUid,
    name: String,
    registered: Vec<ResourceId>,
}

impl Pass {
    pub(crate) fn new(uid: PassUid, name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            registered: Vec::new(),
        }
    }

    /// Uid assigned to the pass.
    pub fn uid(&self) -> PassUid {
        self.uid
    }

    /// Name assigned to the pass.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ids of every resource the pass references, in declaration order.
    pub fn registered_resources(&self) -> &[ResourceId] {
        &self.registered
    }

    pub(crate) fn register_resource(&mut self, id: ResourceId) {
        self.registered.push(id);
    }
}

/// A pass of the render graph.
///
/// `setup` runs once during the build phase and declares the pass's
/// resources through the builder. `execute` runs during the execute phase
/// against the frozen arena and the caller's render context `C`.
pub trait GraphPass<C> {
    /// Declare the pass's resources.
    fn setup(&mut self, builder: &mut PassBuilder<'_>) -> Result<(), RenderGraphError>;

    /// Record the pass's work into the render context.
    fn execute(&self, resources: &ResourceArena, context: &mut C)
        -> Result<(), RenderGraphError>;
}

type SetupCallback<D> =
    dyn FnOnce(&mut PassBuilder<'_>, &mut D) -> Result<(), RenderGraphError>;
type ExecuteCallback<D, C> =
    dyn Fn(&D, &ResourceArena, &mut C) -> Result<(), RenderGraphError>;

/// A [`GraphPass`] assembled from two closures, avoiding a named type per
/// pass.
///
/// The setup callback populates a fresh `D` with the handles the pass
/// declared; on success the populated data is stored and handed to the
/// execute callback every frame.
pub struct CallbackPass<D, C> {
    data: D,
    setup: Option<Box<SetupCallback<D>>>,
    execute: Box<ExecuteCallback<D, C>>,
}

impl<D: Default, C> CallbackPass<D, C> {
    /// Build a pass from a setup and an execute callback.
    pub fn new<S, E>(setup: S, execute: E) -> Self
    where
        S: FnOnce(&mut PassBuilder<'_>, &mut D) -> Result<(), RenderGraphError> + 'static,
        E: Fn(&D, &ResourceArena, &mut C) -> Result<(), RenderGraphError> + 'static,
    {
        Self {
            data: D::default(),
            setup: Some(Box::new(setup)),
            execute: Box::new(execute),
        }
    }

    /// The pass data populated during setup.
    pub fn data(&self) -> &D {
        &self.data
    }
}

impl<D: Default, C> GraphPass<C> for CallbackPass<D, C> {
    fn setup(&mut self, builder: &mut PassBuilder<'_>) -> Result<(), RenderGraphError> {
        let Some(callback) = self.setup.take() else {
            log::warn!("pass setup invoked twice, ignoring");
            return Ok(());
        };
        let mut data = D::default();
        callback(builder, &mut data)?;
        self.data = data;
        Ok(())
    }

    fn execute(
        &self,
        resources: &ResourceArena,
        context: &mut C,
    ) -> Result<(), RenderGraphError> {
        (self.execute)(&self.data, resources, context)
    }
}

impl<D: std::fmt::Debug, C> std::fmt::Debug for CallbackPass<D, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackPass")
            .field("data", &self.data)
            .field("setup_pending", &self.setup.is_some())
            .finish()
    }
}
