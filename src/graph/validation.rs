//! Range adjustment and same-pass hazard detection.
//!
//! View requests are expressed relative to their source resource and
//! adjusted here into absolute ranges within the subjacent image. Hazard
//! detection then scans the views already declared in the same pass for
//! overlapping accesses of the same subjacent image. Only opposing
//! accesses collide: a read request is checked against declared writes and
//! a write request against declared reads, so repeated reads of one range
//! stay eligible for view reuse.
//!
//! The read and write scans filter candidate views by identity against the
//! source resource of the request. Historically the read scan only
//! considered views of the source resource itself while the write scan only
//! considered views of *other* resources; whether that asymmetry is
//! intended is an open product question, so both scopes are configurable
//! and the defaults reproduce the historical behavior.

use crate::error::{HazardKind, RenderGraphError};
use crate::graph::arena::ResourceArena;
use crate::graph::resource::{AccessMode, ResourceDesc, ResourceId};
use crate::graph::PassUid;
use crate::types::SliceRange;

/// Whether builder-side validation runs at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Range and hazard checks run on every declaration.
    Enabled,
    /// Declarations are accepted unchecked.
    Disabled,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Which views a hazard scan compares the request against, by identity of
/// the request's source resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardScope {
    /// Only views of the source resource itself.
    SameResource,
    /// Only views of resources other than the source.
    OtherResources,
    /// Every view of the subjacent image.
    Any,
}

/// Validation settings for one graph build.
#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    /// Whether validation runs.
    pub mode: ValidationMode,
    /// Identity filter for the scan over reading views.
    pub read_scope: HazardScope,
    /// Identity filter for the scan over writing views.
    pub write_scope: HazardScope,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            read_scope: HazardScope::SameResource,
            write_scope: HazardScope::OtherResources,
        }
    }
}

impl ValidationConfig {
    /// Configuration with all checks on.
    pub fn enabled() -> Self {
        Self {
            mode: ValidationMode::Enabled,
            ..Self::default()
        }
    }

    /// Configuration with all checks off.
    pub fn disabled() -> Self {
        Self {
            mode: ValidationMode::Disabled,
            ..Self::default()
        }
    }

    /// Whether checks run.
    pub fn is_enabled(&self) -> bool {
        self.mode == ValidationMode::Enabled
    }
}

/// Translate ranges relative to a source view into absolute ranges within
/// the subjacent image, validating bounds when enabled.
///
/// The requested offset is relative to the source range; the adjusted
/// range must not exceed the source length nor the subjacent extent.
#[allow(clippy::too_many_arguments)]
pub(crate) fn adjust_slice_ranges(
    name: &str,
    subjacent_array: SliceRange,
    subjacent_mip: SliceRange,
    source_array: SliceRange,
    source_mip: SliceRange,
    requested_array: SliceRange,
    requested_mip: SliceRange,
    config: &ValidationConfig,
) -> Result<(SliceRange, SliceRange), RenderGraphError> {
    // an overflowed offset can never denote a real subresource, so this
    // fails even with validation off instead of wrapping
    let (adjusted_array, adjusted_mip) = match (
        source_array.offset.checked_add(requested_array.offset),
        source_mip.offset.checked_add(requested_mip.offset),
    ) {
        (Some(array_offset), Some(mip_offset)) => (
            SliceRange::new(array_offset, requested_array.length),
            SliceRange::new(mip_offset, requested_mip.length),
        ),
        _ => {
            log::error!("subresource offset overflow on '{name}'");
            return Err(RenderGraphError::RangeOutOfBounds {
                name: name.to_string(),
                array: requested_array,
                mip: requested_mip,
            });
        }
    };

    if config.is_enabled() {
        let array_ok = requested_array.length <= source_array.length
            && adjusted_array.end() <= subjacent_array.end();
        let mip_ok = requested_mip.length <= source_mip.length
            && adjusted_mip.end() <= subjacent_mip.end();
        if !array_ok || !mip_ok {
            log::error!(
                "subresource range out of bounds on '{name}': array {adjusted_array} of {subjacent_array}, mips {adjusted_mip} of {subjacent_mip}"
            );
            return Err(RenderGraphError::RangeOutOfBounds {
                name: name.to_string(),
                array: adjusted_array,
                mip: adjusted_mip,
            });
        }
    }

    Ok((adjusted_array, adjusted_mip))
}

/// Reject the requested access if it collides with an opposing view
/// already declared in the same pass on an overlapping range of the same
/// subjacent image.
///
/// `mode` is the requested access: writes are checked against declared
/// reads and reads against declared writes. Matching accesses never
/// collide, so a repeated read of one range falls through to view reuse.
#[allow(clippy::too_many_arguments)]
pub(crate) fn check_subresource_hazards(
    arena: &ResourceArena,
    config: &ValidationConfig,
    current_pass: PassUid,
    subject: ResourceId,
    subjacent: ResourceId,
    name: &str,
    array: SliceRange,
    mip: SliceRange,
    mode: AccessMode,
) -> Result<(), RenderGraphError> {
    if !config.is_enabled() {
        return Ok(());
    }

    if mode.contains(AccessMode::WRITE)
        && scan_views(
            arena,
            AccessMode::READ,
            config.read_scope,
            current_pass,
            subject,
            subjacent,
            array,
            mip,
        )
    {
        log::error!("hazard on '{name}': array {array}, mips {mip} is being read in this pass");
        return Err(RenderGraphError::HazardDetected {
            kind: HazardKind::WrittenWhileRead,
            name: name.to_string(),
            array,
            mip,
        });
    }

    if mode.contains(AccessMode::READ)
        && scan_views(
            arena,
            AccessMode::WRITE,
            config.write_scope,
            current_pass,
            subject,
            subjacent,
            array,
            mip,
        )
    {
        log::error!("hazard on '{name}': array {array}, mips {mip} is being written in this pass");
        return Err(RenderGraphError::HazardDetected {
            kind: HazardKind::ReadWhileWritten,
            name: name.to_string(),
            array,
            mip,
        });
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn scan_views(
    arena: &ResourceArena,
    mode: AccessMode,
    scope: HazardScope,
    current_pass: PassUid,
    subject: ResourceId,
    subjacent: ResourceId,
    array: SliceRange,
    mip: SliceRange,
) -> bool {
    for &view_id in arena.image_view_ids() {
        let Ok(resource) = arena.get(view_id) else {
            continue;
        };
        let ResourceDesc::ImageView(view) = &resource.desc else {
            continue;
        };
        if !view.mode.contains(mode) {
            continue;
        }
        if resource.info.assigned_pass != current_pass {
            continue;
        }
        let identity_matches = match scope {
            HazardScope::SameResource => resource.info.id == subject,
            HazardScope::OtherResources => resource.info.id != subject,
            HazardScope::Any => true,
        };
        if !identity_matches || resource.info.subjacent != subjacent {
            continue;
        }
        if view.array_range.overlaps(&array) && view.mip_range.overlaps(&mip) {
            return true;
        }
    }
    false
}
