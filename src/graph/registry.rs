//! Slot registry: logical keys to physical storage.
//!
//! The registry owns every backend buffer the graph allocates. Each named
//! slot (or anonymous stage output) maps to at most one [`PhysicalResource`],
//! which in turn owns `history_depth + 1` buffers arranged as a ring.
//! Scratch resources live in a separate pool and are rebound on every build.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::backend::{Backend, BackendError, BufferHandle, ViewHandle, ViewKind};
use crate::error::{GraphError, GraphResult};
use crate::graph::{AccessState, ResourceDescriptor, ResourceFlags, ResourceKey, TrackedBuffer};
use crate::types::{Extent2d, TextureFormat};

/// Physical handles of one resource version, as seen by rendering code.
///
/// Handles stay valid until the resource is retired or the registry is
/// reset. Using one afterwards is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceHandle {
    buffer: BufferHandle,
    extent: Extent2d,
    format: TextureFormat,
    views: [Option<ViewHandle>; 4],
}

impl ResourceHandle {
    pub(crate) fn new(
        buffer: BufferHandle,
        extent: Extent2d,
        format: TextureFormat,
        views: [Option<ViewHandle>; 4],
    ) -> Self {
        Self {
            buffer,
            extent,
            format,
            views,
        }
    }

    /// The backend buffer.
    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    /// Resolved size in pixels.
    pub fn extent(&self) -> Extent2d {
        self.extent
    }

    /// Texel format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// The cached view of `kind`, if the descriptor enabled it.
    pub fn view(&self, kind: ViewKind) -> Option<ViewHandle> {
        self.views[kind.index()]
    }
}

/// One buffer of a history ring.
#[derive(Debug)]
struct Version {
    tracked: TrackedBuffer,
    views: [Option<ViewHandle>; 4],
}

/// Backend storage bound to one registry key.
#[derive(Debug)]
pub struct PhysicalResource {
    descriptor: ResourceDescriptor,
    extent: Extent2d,
    versions: Vec<Version>,
    /// Index of the version written this frame (history offset 0).
    current: usize,
    imported: bool,
}

impl PhysicalResource {
    /// Allocate every version of `descriptor`.
    ///
    /// On failure, buffers allocated so far are destroyed before returning.
    pub(crate) fn allocate<B: Backend + ?Sized>(
        backend: &mut B,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> Result<Self, BackendError> {
        let mut versions = Vec::with_capacity(descriptor.version_count());
        for _ in 0..descriptor.version_count() {
            match Self::allocate_version(backend, descriptor, extent) {
                Ok(version) => versions.push(version),
                Err(err) => {
                    for version in versions {
                        backend.destroy(version.tracked.handle());
                    }
                    return Err(err);
                }
            }
        }

        Ok(Self {
            descriptor: descriptor.clone(),
            extent,
            versions,
            current: 0,
            imported: false,
        })
    }

    fn allocate_version<B: Backend + ?Sized>(
        backend: &mut B,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> Result<Version, BackendError> {
        let handle = backend.allocate(descriptor, extent)?;
        let mut views = [None; 4];
        for kind in descriptor.enabled_views() {
            match backend.view(handle, kind) {
                Ok(view) => views[kind.index()] = Some(view),
                Err(err) => {
                    backend.destroy(handle);
                    return Err(err);
                }
            }
        }
        Ok(Version {
            tracked: TrackedBuffer::new(handle),
            views,
        })
    }

    /// Wrap a buffer owned by the caller.
    pub(crate) fn imported(
        buffer: BufferHandle,
        extent: Extent2d,
        format: TextureFormat,
        state: AccessState,
        views: &[(ViewKind, ViewHandle)],
    ) -> Self {
        let mut flags = ResourceFlags::empty();
        let mut cached = [None; 4];
        for &(kind, view) in views {
            cached[kind.index()] = Some(view);
            match kind {
                ViewKind::ColorTarget => flags |= ResourceFlags::COLOR_TARGET,
                ViewKind::DepthTarget => flags |= ResourceFlags::DEPTH_TARGET,
                ViewKind::StorageReadWrite => flags |= ResourceFlags::STORAGE,
                ViewKind::ShaderRead => {}
            }
        }

        Self {
            descriptor: ResourceDescriptor::with_capabilities(format, flags)
                .with_size(extent.width, extent.height),
            extent,
            versions: vec![Version {
                tracked: TrackedBuffer::with_state(buffer, state),
                views: cached,
            }],
            current: 0,
            imported: true,
        }
    }

    /// The descriptor this resource was created with.
    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Resolved size in pixels.
    pub fn extent(&self) -> Extent2d {
        self.extent
    }

    /// Number of past frames retained.
    pub fn history_depth(&self) -> u32 {
        (self.versions.len() - 1) as u32
    }

    /// True if the buffer belongs to the caller.
    pub fn is_imported(&self) -> bool {
        self.imported
    }

    /// True if this resource can serve `descriptor` at `extent` unchanged.
    pub fn matches(&self, descriptor: &ResourceDescriptor, extent: Extent2d) -> bool {
        self.extent == extent && self.descriptor.same_shape(descriptor)
    }

    fn version_index(&self, history_offset: u32) -> Option<usize> {
        let len = self.versions.len();
        let offset = history_offset as usize;
        (offset < len).then(|| (self.current + len - offset) % len)
    }

    /// Handles of the version `history_offset` frames ago.
    pub fn handle(&self, history_offset: u32) -> Option<ResourceHandle> {
        let version = &self.versions[self.version_index(history_offset)?];
        Some(ResourceHandle::new(
            version.tracked.handle(),
            self.extent,
            self.descriptor.format,
            version.views,
        ))
    }

    /// Access state of the version `history_offset` frames ago.
    pub fn state(&self, history_offset: u32) -> Option<AccessState> {
        let index = self.version_index(history_offset)?;
        Some(self.versions[index].tracked.state())
    }

    pub(crate) fn tracked_mut(&mut self, history_offset: u32) -> Option<&mut TrackedBuffer> {
        let index = self.version_index(history_offset)?;
        Some(&mut self.versions[index].tracked)
    }

    /// Make last frame's current version offset 1 and start writing the
    /// oldest one.
    fn rotate(&mut self) {
        self.current = (self.current + 1) % self.versions.len();
    }

    fn owned_buffer_count(&self) -> usize {
        if self.imported {
            0
        } else {
            self.versions.len()
        }
    }

    fn destroy<B: Backend + ?Sized>(self, backend: &mut B) {
        if self.imported {
            return;
        }
        for version in self.versions {
            backend.destroy(version.tracked.handle());
        }
    }
}

/// Stage-scoped scratch resources, pooled by shape.
#[derive(Debug, Default)]
struct ScratchPool {
    entries: Vec<PhysicalResource>,
    free: Vec<usize>,
    /// (stage, index) -> entry
    bindings: BTreeMap<(u32, u32), usize>,
}

impl ScratchPool {
    fn begin_build(&mut self) {
        self.bindings.clear();
        self.free = (0..self.entries.len()).collect();
    }

    fn acquire<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        stage: u32,
        index: u32,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> Result<(), BackendError> {
        let reusable = self
            .free
            .iter()
            .position(|&entry| self.entries[entry].matches(descriptor, extent));

        let entry = match reusable {
            Some(position) => self.free.remove(position),
            None => {
                let resource = PhysicalResource::allocate(backend, descriptor, extent)?;
                log::debug!(
                    "allocated scratch {} of stage {} ({:?}, {})",
                    index,
                    stage,
                    descriptor.format,
                    extent
                );
                self.entries.push(resource);
                self.entries.len() - 1
            }
        };
        self.bindings.insert((stage, index), entry);
        Ok(())
    }

    fn release_stage(&mut self, stage: u32) {
        let released = self
            .bindings
            .range((stage, 0)..=(stage, u32::MAX))
            .map(|(_, &entry)| entry);
        self.free.extend(released);
    }

    /// Destroy pool entries no stage bound during this build.
    fn finish_build<B: Backend + ?Sized>(&mut self, backend: &mut B) {
        let bound: HashSet<usize> = self.bindings.values().copied().collect();
        let mut remap = vec![None; self.entries.len()];
        let mut kept = Vec::with_capacity(bound.len());

        for (index, entry) in self.entries.drain(..).enumerate() {
            if bound.contains(&index) {
                remap[index] = Some(kept.len());
                kept.push(entry);
            } else {
                log::debug!("destroying unused scratch resource");
                entry.destroy(backend);
            }
        }

        self.entries = kept;
        for entry in self.bindings.values_mut() {
            if let Some(new_index) = remap[*entry] {
                *entry = new_index;
            }
        }
        self.free.clear();
    }

    fn get(&self, stage: u32, index: u32) -> Option<&PhysicalResource> {
        let entry = *self.bindings.get(&(stage, index))?;
        self.entries.get(entry)
    }

    fn get_mut(&mut self, stage: u32, index: u32) -> Option<&mut PhysicalResource> {
        let entry = *self.bindings.get(&(stage, index))?;
        self.entries.get_mut(entry)
    }

    fn clear<B: Backend + ?Sized>(&mut self, backend: &mut B) {
        for entry in self.entries.drain(..) {
            entry.destroy(backend);
        }
        self.free.clear();
        self.bindings.clear();
    }
}

/// Maps registry keys to physical resources.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    slots: HashMap<ResourceKey, PhysicalResource>,
    /// Replaced resources awaiting the next frame boundary.
    retired: Vec<PhysicalResource>,
    scratch: ScratchPool,
}

impl SlotRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the resource bound to `key`, allocating or replacing it if
    /// needed.
    ///
    /// An existing resource is returned unchanged when its descriptor has the
    /// same shape and its extent matches, so several stages can write the
    /// same slot in place. A mismatching resource is retired and destroyed at
    /// the next [`advance_frame`](Self::advance_frame). Imported resources
    /// are always returned as they are.
    pub fn get_or_allocate<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        key: ResourceKey,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> GraphResult<&mut PhysicalResource> {
        debug_assert!(!key.is_scratch(), "scratch keys are pooled separately");

        match self.slots.entry(key) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get();
                if existing.is_imported() || existing.matches(descriptor, extent) {
                    return Ok(entry.into_mut());
                }

                let resource = PhysicalResource::allocate(backend, descriptor, extent)
                    .map_err(|source| GraphError::Allocation { key, source })?;
                log::debug!(
                    "reallocated {} ({:?}, {}, history {})",
                    key,
                    descriptor.format,
                    extent,
                    descriptor.history_depth
                );
                let old = entry.insert(resource);
                self.retired.push(old);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let resource = PhysicalResource::allocate(backend, descriptor, extent)
                    .map_err(|source| GraphError::Allocation { key, source })?;
                log::debug!(
                    "allocated {} ({:?}, {}, history {})",
                    key,
                    descriptor.format,
                    extent,
                    descriptor.history_depth
                );
                Ok(entry.insert(resource))
            }
        }
    }

    /// Seed `key` with a buffer owned by the caller.
    pub fn import(
        &mut self,
        key: ResourceKey,
        buffer: BufferHandle,
        extent: Extent2d,
        format: TextureFormat,
        state: AccessState,
        views: &[(ViewKind, ViewHandle)],
    ) {
        let resource = PhysicalResource::imported(buffer, extent, format, state, views);
        if let Some(old) = self.slots.insert(key, resource) {
            self.retired.push(old);
        }
        log::debug!("imported {:?} as {}", buffer, key);
    }

    /// The resource bound to `key`, if any.
    pub fn get(&self, key: ResourceKey) -> Option<&PhysicalResource> {
        match key {
            ResourceKey::Scratch { stage, index } => self.scratch.get(stage, index),
            _ => self.slots.get(&key),
        }
    }

    /// True if `key` holds a buffer seeded with [`import`](Self::import).
    pub fn is_imported(&self, key: ResourceKey) -> bool {
        self.slots.get(&key).is_some_and(PhysicalResource::is_imported)
    }

    /// Every keyed resource, excluding scratch.
    pub fn keys(&self) -> impl Iterator<Item = ResourceKey> + '_ {
        self.slots.keys().copied()
    }

    fn get_mut(&mut self, key: ResourceKey) -> Option<&mut PhysicalResource> {
        match key {
            ResourceKey::Scratch { stage, index } => self.scratch.get_mut(stage, index),
            _ => self.slots.get_mut(&key),
        }
    }

    /// Handles of `key`, `history_offset` frames ago.
    pub fn resolve(&self, key: ResourceKey, history_offset: u32) -> GraphResult<ResourceHandle> {
        let resource = self.get(key).ok_or(GraphError::UnresolvedSlot(key))?;
        resource
            .handle(history_offset)
            .ok_or(GraphError::HistoryOutOfRange {
                key,
                offset: history_offset,
                depth: resource.history_depth(),
            })
    }

    /// Mutable access-state view of one version of `key`.
    pub(crate) fn tracked_mut(
        &mut self,
        key: ResourceKey,
        history_offset: u32,
    ) -> GraphResult<&mut TrackedBuffer> {
        let resource = self.get_mut(key).ok_or(GraphError::UnresolvedSlot(key))?;
        let depth = resource.history_depth();
        resource
            .tracked_mut(history_offset)
            .ok_or(GraphError::HistoryOutOfRange {
                key,
                offset: history_offset,
                depth,
            })
    }

    pub(crate) fn begin_build(&mut self) {
        self.scratch.begin_build();
    }

    pub(crate) fn acquire_scratch<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        stage: u32,
        index: u32,
        descriptor: &ResourceDescriptor,
        extent: Extent2d,
    ) -> GraphResult<()> {
        self.scratch
            .acquire(backend, stage, index, descriptor, extent)
            .map_err(|source| GraphError::Allocation {
                key: ResourceKey::Scratch { stage, index },
                source,
            })
    }

    /// Return the scratch resources of `stage` to the pool so later stages
    /// with the same shape can reuse them.
    pub(crate) fn release_scratch(&mut self, stage: u32) {
        self.scratch.release_stage(stage);
    }

    pub(crate) fn finish_build<B: Backend + ?Sized>(&mut self, backend: &mut B) {
        self.scratch.finish_build(backend);
    }

    /// Rotate every history ring and destroy retired resources.
    pub fn advance_frame<B: Backend + ?Sized>(&mut self, backend: &mut B) {
        for resource in self.slots.values_mut() {
            if resource.versions.len() > 1 {
                resource.rotate();
            }
        }
        for resource in self.retired.drain(..) {
            resource.destroy(backend);
        }
    }

    /// Destroy every owned resource and forget imported ones.
    pub fn clear<B: Backend + ?Sized>(&mut self, backend: &mut B) {
        for (_, resource) in self.slots.drain() {
            resource.destroy(backend);
        }
        for resource in self.retired.drain(..) {
            resource.destroy(backend);
        }
        self.scratch.clear(backend);
    }

    /// Number of keyed resources plus pooled scratch resources.
    pub fn resource_count(&self) -> usize {
        self.slots.len() + self.scratch.entries.len()
    }

    /// Number of backend buffers owned by the registry.
    pub fn owned_buffer_count(&self) -> usize {
        self.slots
            .values()
            .chain(self.retired.iter())
            .chain(self.scratch.entries.iter())
            .map(PhysicalResource::owned_buffer_count)
            .sum()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.retired.is_empty() && self.scratch.entries.is_empty()
    }
}
