//! Dummy backend and command sink for testing and development.
//!
//! [`DummyBackend`] hands out fake handles but keeps full bookkeeping of what
//! is alive, so tests can check that the graph never leaks or double-frees.
//! [`RecordingSink`] stores everything it is asked to encode.

use std::collections::BTreeMap;

use crate::graph::{ResourceDescriptor, TransitionDirective};
use crate::types::Extent2d;

use super::{Backend, BackendError, BackendResult, BufferHandle, CommandSink, ViewHandle, ViewKind};

#[derive(Debug)]
struct LiveBuffer {
    descriptor: ResourceDescriptor,
    extent: Extent2d,
    bytes: u64,
}

/// Dummy GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    next_id: u64,
    live: BTreeMap<BufferHandle, LiveBuffer>,
    allocation_limit: Option<usize>,
    memory_budget: Option<u64>,
    used_bytes: u64,
    allocations: usize,
    destroyed: usize,
    invalid_destroys: usize,
    views: usize,
}

impl DummyBackend {
    /// Create a new dummy backend with unlimited memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail allocations with `OutOfMemory` once `limit` buffers are alive.
    pub fn with_allocation_limit(mut self, limit: usize) -> Self {
        self.allocation_limit = Some(limit);
        self
    }

    /// Fail allocations with `OutOfMemory` once `bytes` would be exceeded.
    pub fn with_memory_budget(mut self, bytes: u64) -> Self {
        self.memory_budget = Some(bytes);
        self
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    /// Number of buffers currently alive.
    pub fn live_buffer_count(&self) -> usize {
        self.live.len()
    }

    /// Number of successful allocations so far.
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Number of buffers destroyed so far.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    /// Number of `destroy` calls for buffers that were not alive.
    pub fn invalid_destroy_count(&self) -> usize {
        self.invalid_destroys
    }

    /// Number of views created so far.
    pub fn view_count(&self) -> usize {
        self.views
    }

    /// Estimated bytes held by live buffers.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn is_live(&self, buffer: BufferHandle) -> bool {
        self.live.contains_key(&buffer)
    }

    /// The descriptor a live buffer was allocated with.
    pub fn descriptor_of(&self, buffer: BufferHandle) -> Option<&ResourceDescriptor> {
        self.live.get(&buffer).map(|live| &live.descriptor)
    }

    /// The extent a live buffer was allocated with.
    pub fn extent_of(&self, buffer: BufferHandle) -> Option<Extent2d> {
        self.live.get(&buffer).map(|live| live.extent)
    }
}

impl Backend for DummyBackend {
    fn allocate(
        &mut self,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> BackendResult<BufferHandle> {
        if let Some(limit) = self.allocation_limit {
            if self.live.len() >= limit {
                log::trace!("DummyBackend: allocation limit {} reached", limit);
                return Err(BackendError::OutOfMemory);
            }
        }

        // One buffer per call; history versions are separate allocations.
        let bytes = descriptor.estimated_bytes(extent) / descriptor.version_count() as u64;
        if let Some(budget) = self.memory_budget {
            if self.used_bytes + bytes > budget {
                log::trace!(
                    "DummyBackend: {} bytes requested, {} of {} in use",
                    bytes,
                    self.used_bytes,
                    budget
                );
                return Err(BackendError::OutOfMemory);
            }
        }

        self.next_id += 1;
        let handle = BufferHandle::new(self.next_id);
        log::trace!(
            "DummyBackend: allocating {:?} {:?} ({}, {:?})",
            handle,
            descriptor.label,
            extent,
            descriptor.format
        );

        self.live.insert(
            handle,
            LiveBuffer {
                descriptor: descriptor.clone(),
                extent,
                bytes,
            },
        );
        self.used_bytes += bytes;
        self.allocations += 1;
        Ok(handle)
    }

    fn destroy(&mut self, buffer: BufferHandle) {
        match self.live.remove(&buffer) {
            Some(live) => {
                log::trace!("DummyBackend: destroying {:?}", buffer);
                self.used_bytes -= live.bytes;
                self.destroyed += 1;
            }
            None => {
                log::warn!("DummyBackend: destroy of unknown buffer {:?}", buffer);
                self.invalid_destroys += 1;
            }
        }
    }

    fn view(&mut self, buffer: BufferHandle, kind: ViewKind) -> BackendResult<ViewHandle> {
        let live = self
            .live
            .get(&buffer)
            .ok_or(BackendError::UnknownBuffer(buffer))?;
        if !live.descriptor.supports_view(kind) {
            return Err(BackendError::ViewNotSupported { buffer, kind });
        }

        self.views += 1;
        Ok(ViewHandle::new(buffer.raw() * 4 + kind.index() as u64))
    }
}

/// A command captured by [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCommand {
    Transition(TransitionDirective),
    Clear(BufferHandle),
}

/// Command sink that records everything in encoding order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Vec<SinkCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command recorded so far.
    pub fn commands(&self) -> &[SinkCommand] {
        &self.commands
    }

    /// Recorded transitions, skipping clears.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionDirective> {
        self.commands.iter().filter_map(|command| match command {
            SinkCommand::Transition(directive) => Some(directive),
            SinkCommand::Clear(_) => None,
        })
    }

    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, SinkCommand::Clear(_)))
            .count()
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Take the recorded commands, leaving the sink empty.
    pub fn take(&mut self) -> Vec<SinkCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl CommandSink for RecordingSink {
    fn encode_transition(&mut self, directive: &TransitionDirective) {
        log::trace!(
            "RecordingSink: transition {:?} {:?} -> {:?}",
            directive.buffer,
            directive.before,
            directive.after
        );
        self.commands.push(SinkCommand::Transition(*directive));
    }

    fn encode_clear(&mut self, buffer: BufferHandle) {
        log::trace!("RecordingSink: clear {:?}", buffer);
        self.commands.push(SinkCommand::Clear(buffer));
    }
}
