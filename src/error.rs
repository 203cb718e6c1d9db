//! Render graph error types.

use std::fmt;

use thiserror::Error;

use crate::graph::{ResourceId, ResourceType};
use crate::registry::ExternalId;
use crate::types::{ByteRange, SliceRange};

/// Which kind of outstanding access a requested access collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardKind {
    /// The requested access overlaps a view that writes the range.
    ReadWhileWritten,
    /// The requested access overlaps a view that reads the range.
    WrittenWhileRead,
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadWhileWritten => write!(f, "range is being written"),
            Self::WrittenWhileRead => write!(f, "range is being read"),
        }
    }
}

/// Errors that can occur while building or executing a render graph.
#[derive(Debug, Error)]
pub enum RenderGraphError {
    /// No resource with the given id exists in the arena.
    #[error("resource {0:?} not found in the arena")]
    NotFound(ResourceId),

    /// The resource exists but holds a different kind of payload.
    #[error("resource {id:?} is a {found:?}, expected a {expected:?}")]
    WrongResourceType {
        /// The id that was looked up.
        id: ResourceId,
        /// The kind the caller asked for.
        expected: ResourceType,
        /// The kind actually stored.
        found: ResourceType,
    },

    /// The resource registry does not know the named external resource.
    #[error("external resource '{0}' is not known to the resource registry")]
    ExternalResourceNotFound(ExternalId),

    /// A created resource's description does not denote a realizable
    /// object.
    #[error("invalid description for resource '{name}'")]
    InvalidDescription {
        /// Name the resource was declared under.
        name: String,
    },

    /// A requested subresource range does not fit its source view or the
    /// subjacent image.
    #[error("subresource range out of bounds on '{name}': array {array}, mips {mip}")]
    RangeOutOfBounds {
        /// Name of the resource the view was requested on.
        name: String,
        /// Adjusted array layer range.
        array: SliceRange,
        /// Adjusted mip level range.
        mip: SliceRange,
    },

    /// A requested byte range does not fit its buffer.
    #[error("byte range {range} out of bounds on '{name}' ({size} bytes)")]
    ByteRangeOutOfBounds {
        /// Name of the buffer the view was requested on.
        name: String,
        /// Requested byte range.
        range: ByteRange,
        /// Size of the buffer in bytes.
        size: u64,
    },

    /// Two accesses in the same pass collide on an overlapping subresource
    /// range of the same subjacent image.
    #[error("hazard on '{name}': {kind} (array {array}, mips {mip})")]
    HazardDetected {
        /// What the requested access collided with.
        kind: HazardKind,
        /// Name of the resource the access was requested on.
        name: String,
        /// Adjusted array layer range of the request.
        array: SliceRange,
        /// Adjusted mip level range of the request.
        mip: SliceRange,
    },

    /// A write declaration failed; the underlying cause is attached.
    #[error("failed to declare a resource write")]
    WriteResourceFailed(#[source] Box<RenderGraphError>),

    /// A read declaration failed; the underlying cause is attached.
    #[error("failed to declare a resource read")]
    ReadResourceFailed(#[source] Box<RenderGraphError>),

    /// A pass setup callback failed; the whole build is aborted.
    #[error("setup of pass '{pass}' failed")]
    PassSetupFailed {
        /// Name of the failing pass.
        pass: String,
        /// The error returned by the setup callback.
        #[source]
        source: Box<RenderGraphError>,
    },

    /// A pass execute callback failed.
    #[error("execution of pass '{pass}' failed")]
    PassExecutionFailed {
        /// Name of the failing pass.
        pass: String,
        /// The error returned by the execute callback.
        #[source]
        source: Box<RenderGraphError>,
    },

    /// A pass execute callback reported an application-defined failure.
    #[error("pass error: {0}")]
    PassError(String),
}

impl RenderGraphError {
    /// Walk the `source` chain down to the innermost render graph error.
    ///
    /// Useful for matching the root cause of wrapped read/write failures.
    pub fn root_cause(&self) -> &RenderGraphError {
        match self {
            Self::WriteResourceFailed(inner) | Self::ReadResourceFailed(inner) => {
                inner.root_cause()
            }
            Self::PassSetupFailed { source, .. } | Self::PassExecutionFailed { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}
