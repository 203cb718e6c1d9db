//! Attachment bookkeeping for the render pass builder.

use std::collections::HashMap;

use crate::graph::resource::ResourceId;
use crate::graph::PassUid;

/// The attachments declared across all passes of one build.
///
/// Attachments are stored as one flat list of (image id, view id) pairs.
/// The color, depth and input lists hold indices into the flat list, so a
/// render pass builder can address attachments per kind while sharing one
/// numbering. Per-pass assignment records which flat indices each pass
/// declared.
#[derive(Debug, Default)]
pub struct AttachmentCollection {
    image_ids: Vec<ResourceId>,
    view_ids: Vec<ResourceId>,
    color: Vec<usize>,
    depth: Vec<usize>,
    input: Vec<usize>,
    pass_assignment: HashMap<PassUid, Vec<usize>>,
    view_to_image: HashMap<ResourceId, ResourceId>,
}

impl AttachmentCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_color_attachment(
        &mut self,
        pass: PassUid,
        image: ResourceId,
        view: ResourceId,
    ) {
        let index = self.add_attachment(pass, image, view);
        self.color.push(index);
    }

    pub(crate) fn add_depth_attachment(
        &mut self,
        pass: PassUid,
        image: ResourceId,
        view: ResourceId,
    ) {
        let index = self.add_attachment(pass, image, view);
        self.depth.push(index);
    }

    pub(crate) fn add_input_attachment(
        &mut self,
        pass: PassUid,
        image: ResourceId,
        view: ResourceId,
    ) {
        let index = self.add_attachment(pass, image, view);
        self.input.push(index);
    }

    fn add_attachment(&mut self, pass: PassUid, image: ResourceId, view: ResourceId) -> usize {
        let index = self.view_ids.len();
        self.image_ids.push(image);
        self.view_ids.push(view);
        self.pass_assignment.entry(pass).or_default().push(index);
        self.view_to_image.insert(view, image);
        index
    }

    /// Image ids of all attachments, in declaration order.
    pub fn image_ids(&self) -> &[ResourceId] {
        &self.image_ids
    }

    /// View ids of all attachments, in declaration order.
    pub fn view_ids(&self) -> &[ResourceId] {
        &self.view_ids
    }

    /// Indices of the color attachments within the flat lists.
    pub fn color_attachments(&self) -> &[usize] {
        &self.color
    }

    /// Indices of the depth attachments within the flat lists.
    pub fn depth_attachments(&self) -> &[usize] {
        &self.depth
    }

    /// Indices of the input attachments within the flat lists.
    pub fn input_attachments(&self) -> &[usize] {
        &self.input
    }

    /// Flat indices of the attachments a pass declared, in declaration
    /// order. Empty for passes without attachments.
    pub fn pass_attachments(&self, pass: PassUid) -> &[usize] {
        self.pass_assignment
            .get(&pass)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The image an attachment view was created on.
    pub fn image_of_view(&self, view: ResourceId) -> Option<ResourceId> {
        self.view_to_image.get(&view).copied()
    }

    /// (image id, view id) pairs of the color attachments.
    pub fn color_attachment_pairs(&self) -> impl Iterator<Item = (ResourceId, ResourceId)> + '_ {
        self.color
            .iter()
            .map(move |&i| (self.image_ids[i], self.view_ids[i]))
    }

    /// (image id, view id) pairs of the depth attachments.
    pub fn depth_attachment_pairs(&self) -> impl Iterator<Item = (ResourceId, ResourceId)> + '_ {
        self.depth
            .iter()
            .map(move |&i| (self.image_ids[i], self.view_ids[i]))
    }

    /// (image id, view id) pairs of the input attachments.
    pub fn input_attachment_pairs(&self) -> impl Iterator<Item = (ResourceId, ResourceId)> + '_ {
        self.input
            .iter()
            .map(move |&i| (self.image_ids[i], self.view_ids[i]))
    }

    /// Total number of attachments.
    pub fn len(&self) -> usize {
        self.view_ids.len()
    }

    /// Whether no attachments were declared.
    pub fn is_empty(&self) -> bool {
        self.view_ids.is_empty()
    }
}
