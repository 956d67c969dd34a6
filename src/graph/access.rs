//! Access state tracking and transition synthesis.
//!
//! Every physical buffer carries the abstract access state it was last left
//! in. Before a stage runs, the executor asks the [`AccessStateTracker`] to
//! move each referenced buffer into the state the stage needs; the tracker
//! answers with a [`TransitionDirective`] only when the state actually
//! changes. Directives are opaque here and are encoded by a
//! [`CommandSink`](crate::backend::CommandSink).

use crate::backend::{BufferHandle, ViewKind};

/// Abstract access intent of a physical buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessState {
    /// Freshly allocated; contents are undefined.
    Uninitialized,
    /// Written as color render target.
    ColorWrite,
    /// Written as depth/stencil render target.
    DepthWrite,
    /// Sampled in a shader.
    ShaderRead,
    /// Read/write as storage texture.
    StorageReadWrite,
    /// Handed to the presentation engine.
    PresentSource,
}

impl AccessState {
    /// Check if this state is a write operation.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Self::ColorWrite | Self::DepthWrite | Self::StorageReadWrite
        )
    }

    /// Check if this state is a read operation.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            Self::ShaderRead | Self::StorageReadWrite | Self::PresentSource
        )
    }

    /// The view a stage binds to access a buffer in this state.
    pub fn view_kind(self) -> Option<ViewKind> {
        match self {
            Self::ColorWrite => Some(ViewKind::ColorTarget),
            Self::DepthWrite => Some(ViewKind::DepthTarget),
            Self::ShaderRead => Some(ViewKind::ShaderRead),
            Self::StorageReadWrite => Some(ViewKind::StorageReadWrite),
            Self::Uninitialized | Self::PresentSource => None,
        }
    }
}

/// The minimal instruction moving a buffer between two access states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionDirective {
    /// The buffer being transitioned.
    pub buffer: BufferHandle,
    /// State before the transition.
    pub before: AccessState,
    /// State after the transition.
    pub after: AccessState,
}

impl TransitionDirective {
    /// True when the buffer is leaving `Uninitialized`.
    ///
    /// Callers may use this to force a clear on first use.
    pub fn is_first_use(&self) -> bool {
        self.before == AccessState::Uninitialized
    }
}

/// A physical buffer together with its last-known access state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedBuffer {
    handle: BufferHandle,
    state: AccessState,
}

impl TrackedBuffer {
    /// Track a freshly allocated buffer.
    pub fn new(handle: BufferHandle) -> Self {
        Self::with_state(handle, AccessState::Uninitialized)
    }

    /// Track a buffer whose current state is already known.
    pub fn with_state(handle: BufferHandle, state: AccessState) -> Self {
        Self { handle, state }
    }

    /// The backend handle.
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// The last-known access state.
    pub fn state(&self) -> AccessState {
        self.state
    }
}

/// Synthesizes transition directives and counts them.
#[derive(Debug, Default)]
pub struct AccessStateTracker {
    emitted: u64,
    skipped: u64,
}

impl AccessStateTracker {
    /// Create a tracker with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the transition from `current` to `desired`, if any.
    ///
    /// Returns `None` when the states are equal. Leaving `Uninitialized`
    /// always produces a transition.
    pub fn transition(
        current: AccessState,
        desired: AccessState,
    ) -> Option<(AccessState, AccessState)> {
        if current == desired {
            None
        } else {
            Some((current, desired))
        }
    }

    /// Move `buffer` into `desired`, returning the directive to encode.
    ///
    /// Repeated calls with the same desired state return `None` after the
    /// first one.
    pub fn require_access(
        &mut self,
        buffer: &mut TrackedBuffer,
        desired: AccessState,
    ) -> Option<TransitionDirective> {
        debug_assert!(
            desired != AccessState::Uninitialized,
            "buffers cannot transition back to Uninitialized"
        );

        match Self::transition(buffer.state, desired) {
            Some((before, after)) => {
                buffer.state = after;
                self.emitted += 1;
                let directive = TransitionDirective {
                    buffer: buffer.handle,
                    before,
                    after,
                };
                log::trace!(
                    "transition {:?}: {:?} -> {:?}",
                    directive.buffer,
                    before,
                    after
                );
                Some(directive)
            }
            None => {
                self.skipped += 1;
                None
            }
        }
    }

    /// Number of directives emitted since the last reset.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Number of requests that needed no transition since the last reset.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Zero the counters.
    pub fn reset_counters(&mut self) {
        self.emitted = 0;
        self.skipped = 0;
    }
}
