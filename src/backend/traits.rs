//! Collaborator contracts consumed by the frame graph.
//!
//! The graph never talks to a GPU API directly. Physical storage comes from a
//! [`Backend`], and synchronization is handed to a [`CommandSink`] as opaque
//! [`TransitionDirective`]s.

use thiserror::Error;

use crate::graph::{ResourceDescriptor, TransitionDirective};
use crate::types::Extent2d;

/// Backend error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Out of GPU memory")]
    OutOfMemory,
    #[error("Failed to create buffer: {0}")]
    BufferCreationFailed(String),
    #[error("Failed to create view: {0}")]
    ViewCreationFailed(String),
    #[error("Unknown buffer handle {0:?}")]
    UnknownBuffer(BufferHandle),
    #[error("View kind {kind:?} not enabled for buffer {buffer:?}")]
    ViewNotSupported { buffer: BufferHandle, kind: ViewKind },
    #[error("Device lost")]
    DeviceLost,
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Handle to a backend-allocated buffer (texture storage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub(crate) u64);

impl BufferHandle {
    /// Wrap a backend-specific id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The backend-specific id.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Handle to a view of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub(crate) u64);

impl ViewHandle {
    /// Wrap a backend-specific id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The backend-specific id.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// The ways a buffer can be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Bound as a color render target.
    ColorTarget,
    /// Bound as a depth/stencil target.
    DepthTarget,
    /// Sampled in a shader.
    ShaderRead,
    /// Bound as a read/write storage texture.
    StorageReadWrite,
}

impl ViewKind {
    /// All view kinds, in cache order.
    pub const ALL: [ViewKind; 4] = [
        ViewKind::ColorTarget,
        ViewKind::DepthTarget,
        ViewKind::ShaderRead,
        ViewKind::StorageReadWrite,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            ViewKind::ColorTarget => 0,
            ViewKind::DepthTarget => 1,
            ViewKind::ShaderRead => 2,
            ViewKind::StorageReadWrite => 3,
        }
    }
}

/// Allocates and destroys physical storage for graph resources.
pub trait Backend {
    /// Allocate one buffer matching `descriptor` at the resolved `extent`.
    fn allocate(
        &mut self,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> BackendResult<BufferHandle>;

    /// Destroy a buffer previously returned by [`Backend::allocate`].
    fn destroy(&mut self, buffer: BufferHandle);

    /// Create (or fetch) a view of `buffer`.
    ///
    /// Only kinds enabled by the descriptor the buffer was allocated with are
    /// requested; backends may reject anything else.
    fn view(&mut self, buffer: BufferHandle, kind: ViewKind) -> BackendResult<ViewHandle>;
}

/// Receives synchronization and clear commands in encoding order.
pub trait CommandSink {
    /// Encode the synchronization needed for `directive`.
    fn encode_transition(&mut self, directive: &TransitionDirective);

    /// Encode a full clear of `buffer`.
    fn encode_clear(&mut self, buffer: BufferHandle);
}
