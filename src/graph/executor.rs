//! Frame graph executor

use std::collections::{HashMap, HashSet};

use crate::backend::{Backend, BufferHandle, CommandSink, ViewHandle, ViewKind};
use crate::config::FrameGraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::registry::{ResourceHandle, SlotRegistry};
use crate::graph::stage::{OutputTarget, StageDescriptor, StageInput};
use crate::graph::{
    AccessState, AccessStateTracker, DescriptorError, ResourceDescriptor, ResourceKey, SlotId,
    TrackedBuffer, TransitionDirective,
};
use crate::types::{Extent2d, TextureFormat};

/// Counters describing the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Index of the frame being built, starting at 0
    pub frame_index: u64,
    /// Physical resources held by the registry
    pub resources: usize,
    /// Backend buffers owned by the registry
    pub buffers: usize,
    /// Transition directives emitted this frame
    pub transitions_emitted: u64,
    /// Access requests that needed no transition this frame
    pub transitions_skipped: u64,
}

/// The swapchain buffer bound for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct PresentSurface {
    tracked: TrackedBuffer,
    view: ViewHandle,
    extent: Extent2d,
    format: TextureFormat,
}

impl PresentSurface {
    pub fn buffer(&self) -> BufferHandle {
        self.tracked.handle()
    }

    pub fn view(&self) -> ViewHandle {
        self.view
    }

    pub fn extent(&self) -> Extent2d {
        self.extent
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn state(&self) -> AccessState {
        self.tracked.state()
    }
}

/// An input resolved to a registry key.
#[derive(Debug, Clone, Copy)]
struct PlannedInput {
    key: ResourceKey,
    history_offset: u32,
    /// Produced by an earlier stage of the same build, or imported.
    produced: bool,
}

/// A stage with every declaration resolved to a registry key.
#[derive(Debug)]
struct StagePlan {
    name: String,
    inputs: Vec<PlannedInput>,
    /// (key, write state)
    outputs: Vec<(ResourceKey, AccessState)>,
    scratch: Vec<(ResourceKey, AccessState)>,
    present_output: Option<u32>,
}

/// Orchestrates physical resources and transitions for an ordered list of
/// stages.
///
/// Typical frame:
/// 1. [`make_resources`](Self::make_resources) with the stage list
/// 2. per stage, [`emit_transitions`](Self::emit_transitions) (or
///    [`record_transitions`](Self::record_transitions)) followed by the
///    stage's own work, using [`resolve`](Self::resolve) for handles
/// 3. [`end_frame`](Self::end_frame)
pub struct GraphExecutor {
    config: FrameGraphConfig,
    canvas: Extent2d,
    registry: SlotRegistry,
    tracker: AccessStateTracker,
    plans: Vec<StagePlan>,
    /// Keys declared by the last successful build.
    declared: HashSet<ResourceKey>,
    present: Option<PresentSurface>,
    frame_index: u64,
}

impl GraphExecutor {
    pub fn new(config: FrameGraphConfig) -> Self {
        Self {
            canvas: config.canvas,
            config,
            registry: SlotRegistry::new(),
            tracker: AccessStateTracker::new(),
            plans: Vec::new(),
            declared: HashSet::new(),
            present: None,
            frame_index: 0,
        }
    }

    pub fn config(&self) -> &FrameGraphConfig {
        &self.config
    }

    /// Current canvas size.
    pub fn canvas(&self) -> Extent2d {
        self.canvas
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Number of stages from the last successful `make_resources`.
    pub fn stage_count(&self) -> usize {
        self.plans.len()
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    /// Create or reuse the physical resources of every stage output and
    /// scratch declaration.
    ///
    /// An input at history offset 0 must be written by a strictly earlier
    /// stage of `stages` or imported; a history read needs the slot written
    /// anywhere in `stages`. Unproduced inputs are logged here and fail when
    /// their transitions are emitted or they are resolved. An error aborts the
    /// build and leaves the executor without stages until the next successful
    /// call.
    pub fn make_resources<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        stages: &[StageDescriptor],
    ) -> GraphResult<()> {
        self.plans.clear();
        self.declared.clear();
        self.registry.begin_build();

        let mut plans = Vec::with_capacity(stages.len());
        let mut written: HashMap<ResourceKey, ResourceDescriptor> = HashMap::new();
        let mut declared = HashSet::new();
        let history_sources: HashSet<ResourceKey> = stages
            .iter()
            .flat_map(|stage| stage.outputs())
            .filter_map(|output| match output.target() {
                OutputTarget::Slot(slot) => Some(ResourceKey::Named(slot)),
                OutputTarget::NextStage => None,
            })
            .collect();

        for (index, stage) in stages.iter().enumerate() {
            let stage_index = index as u32;

            let mut inputs = Vec::with_capacity(stage.inputs().len());
            for input in stage.inputs() {
                let mut planned = self.input_key(stages, index, *input)?;
                planned.produced = match input {
                    StageInput::PreviousOutput(_) => true,
                    _ if self.registry.is_imported(planned.key) => true,
                    _ if planned.history_offset == 0 => written.contains_key(&planned.key),
                    _ => history_sources.contains(&planned.key),
                };
                if !planned.produced {
                    log::warn!(
                        "stage '{}' reads {} before any stage writes it",
                        stage.name(),
                        planned.key
                    );
                }
                inputs.push(planned);
            }

            let mut outputs = Vec::with_capacity(stage.outputs().len());
            let mut anonymous = 0;
            for output in stage.outputs() {
                let key = match output.target() {
                    OutputTarget::Slot(slot) => ResourceKey::Named(slot),
                    OutputTarget::NextStage => {
                        anonymous += 1;
                        ResourceKey::StageOutput {
                            stage: stage_index,
                            index: anonymous - 1,
                        }
                    }
                };

                let descriptor = output.descriptor();
                let access = output.write_state();
                self.validate(key, descriptor, access, false)?;

                if let Some(previous) = written.get(&key) {
                    if !previous.same_shape(descriptor) {
                        log::warn!(
                            "stage '{}' redeclares {} with a different shape",
                            stage.name(),
                            key
                        );
                    }
                }
                written.insert(key, descriptor.clone());
                declared.insert(key);

                let extent = descriptor.resolve_extent(self.canvas);
                self.registry.get_or_allocate(backend, key, descriptor, extent)?;
                outputs.push((key, access));
            }

            let mut scratch = Vec::with_capacity(stage.scratch().len());
            for (scratch_index, descriptor) in stage.scratch().iter().enumerate() {
                let key = ResourceKey::Scratch {
                    stage: stage_index,
                    index: scratch_index as u32,
                };
                let access = descriptor.write_state();
                self.validate(key, descriptor, access, true)?;

                let extent = descriptor.resolve_extent(self.canvas);
                self.registry.acquire_scratch(
                    backend,
                    stage_index,
                    scratch_index as u32,
                    descriptor,
                    extent,
                )?;
                declared.insert(key);
                scratch.push((key, access));
            }
            if self.config.reuse_scratch {
                self.registry.release_scratch(stage_index);
            }

            plans.push(StagePlan {
                name: stage.name().to_string(),
                inputs,
                outputs,
                scratch,
                present_output: stage.present_output(),
            });
        }

        self.registry.finish_build(backend);
        self.plans = plans;

        let stale: Vec<String> = self
            .registry
            .keys()
            .filter(|key| !declared.contains(key) && !self.registry.is_imported(*key))
            .map(|key| key.to_string())
            .collect();
        if !stale.is_empty() {
            log::debug!(
                "frame {}: holding {} resources not declared by this build: {}",
                self.frame_index,
                stale.len(),
                stale.join(", ")
            );
        }
        self.declared = declared;

        log::debug!(
            "frame {}: built {} stages over {} resources",
            self.frame_index,
            self.plans.len(),
            self.registry.resource_count()
        );
        Ok(())
    }

    fn input_key(
        &self,
        stages: &[StageDescriptor],
        index: usize,
        input: StageInput,
    ) -> GraphResult<PlannedInput> {
        match input {
            StageInput::Slot {
                slot,
                history_offset,
            } => Ok(PlannedInput {
                key: ResourceKey::Named(slot),
                history_offset,
                produced: false,
            }),
            StageInput::PreviousOutput(output) => {
                let previous = index.saturating_sub(1);
                let key = ResourceKey::StageOutput {
                    stage: previous as u32,
                    index: output,
                };
                let available = match index {
                    0 => 0,
                    _ => stages[previous].next_stage_output_count(),
                };
                if output as usize >= available {
                    log::error!(
                        "stage '{}' reads previous output {} but the preceding stage provides {}",
                        stages[index].name(),
                        output,
                        available
                    );
                    return Err(GraphError::UnresolvedSlot(key));
                }
                Ok(PlannedInput {
                    key,
                    history_offset: 0,
                    produced: true,
                })
            }
        }
    }

    fn validate(
        &self,
        key: ResourceKey,
        descriptor: &ResourceDescriptor,
        access: AccessState,
        scratch: bool,
    ) -> GraphResult<()> {
        let max = self.config.max_history_depth;
        let checked = if scratch {
            descriptor.validate_scratch(max)
        } else {
            descriptor.validate(max)
        };

        checked
            .and_then(|()| {
                if descriptor.supports_write(access) {
                    Ok(())
                } else {
                    Err(DescriptorError::UnsupportedAccess {
                        access,
                        flags: descriptor.flags,
                    })
                }
            })
            .map_err(|source| GraphError::InvalidDescriptor { key, source })
    }

    fn plan(&self, stage: usize) -> GraphResult<&StagePlan> {
        self.plans.get(stage).ok_or(GraphError::StageOutOfRange {
            index: stage,
            count: self.plans.len(),
        })
    }

    /// Move every input of `stage` to `ShaderRead`.
    pub fn emit_input_transitions(
        &mut self,
        stage: usize,
    ) -> GraphResult<Vec<TransitionDirective>> {
        let count = self.plans.len();
        let plan = self
            .plans
            .get(stage)
            .ok_or(GraphError::StageOutOfRange {
                index: stage,
                count,
            })?;

        let mut directives = Vec::new();
        for input in &plan.inputs {
            if !input.produced {
                log::error!("stage '{}': {} was not produced before it", plan.name, input.key);
                return Err(GraphError::UnresolvedSlot(input.key));
            }
            let tracked = match self.registry.tracked_mut(input.key, input.history_offset) {
                Ok(tracked) => tracked,
                Err(err) => {
                    log::error!("stage '{}': {}", plan.name, err);
                    return Err(err);
                }
            };
            directives.extend(self.tracker.require_access(tracked, AccessState::ShaderRead));
        }
        Ok(directives)
    }

    /// Move the outputs, the presentation surface and the scratch resources
    /// of `stage` to their write states, in that order.
    pub fn emit_output_transitions(
        &mut self,
        stage: usize,
    ) -> GraphResult<Vec<TransitionDirective>> {
        let count = self.plans.len();
        let plan = self
            .plans
            .get(stage)
            .ok_or(GraphError::StageOutOfRange {
                index: stage,
                count,
            })?;

        let mut directives = Vec::new();
        for &(key, access) in &plan.outputs {
            let tracked = self.registry.tracked_mut(key, 0)?;
            directives.extend(self.tracker.require_access(tracked, access));
        }

        if plan.present_output.is_some() {
            let Some(surface) = self.present.as_mut() else {
                log::error!("stage '{}' presents without a bound surface", plan.name);
                return Err(GraphError::MissingPresentSurface(plan.name.clone()));
            };
            directives.extend(
                self.tracker
                    .require_access(&mut surface.tracked, AccessState::ColorWrite),
            );
        }

        for &(key, access) in &plan.scratch {
            let tracked = self.registry.tracked_mut(key, 0)?;
            directives.extend(self.tracker.require_access(tracked, access));
        }
        Ok(directives)
    }

    /// All transitions `stage` needs: inputs, outputs, presentation, scratch.
    pub fn emit_transitions(&mut self, stage: usize) -> GraphResult<Vec<TransitionDirective>> {
        let mut directives = self.emit_input_transitions(stage)?;
        directives.extend(self.emit_output_transitions(stage)?);
        Ok(directives)
    }

    /// Emit the transitions of `stage` and encode them into `sink`.
    ///
    /// With `clear_on_first_use`, buffers leaving `Uninitialized` are cleared
    /// right after their transition. Returns the number of directives encoded.
    pub fn record_transitions<S: CommandSink + ?Sized>(
        &mut self,
        stage: usize,
        sink: &mut S,
    ) -> GraphResult<usize> {
        let directives = self.emit_transitions(stage)?;
        for directive in &directives {
            sink.encode_transition(directive);
            if self.config.clear_on_first_use && directive.is_first_use() {
                sink.encode_clear(directive.buffer);
            }
        }
        Ok(directives.len())
    }

    /// Handles of `slot` as it was `history_offset` frames ago.
    pub fn resolve(&self, slot: SlotId, history_offset: u32) -> GraphResult<ResourceHandle> {
        self.resolve_key(ResourceKey::Named(slot), history_offset)
    }

    /// Handles of any registry key, including anonymous outputs and scratch.
    ///
    /// Fails with `UnresolvedSlot` unless the last build declared `key` or it
    /// was imported.
    pub fn resolve_key(
        &self,
        key: ResourceKey,
        history_offset: u32,
    ) -> GraphResult<ResourceHandle> {
        if !self.declared.contains(&key) && !self.registry.is_imported(key) {
            log::error!("{} was not declared by the current build", key);
            return Err(GraphError::UnresolvedSlot(key));
        }
        self.registry.resolve(key, history_offset).map_err(|err| {
            log::error!("{}", err);
            err
        })
    }

    /// Handles of input `index` of `stage`, in declaration order.
    pub fn resolve_input(&self, stage: usize, index: usize) -> GraphResult<ResourceHandle> {
        let plan = self.plan(stage)?;
        let input = plan.inputs.get(index).ok_or(GraphError::BindingOutOfRange {
            stage,
            kind: "inputs",
            index,
            count: plan.inputs.len(),
        })?;
        if !input.produced {
            log::error!("stage '{}': {} was not produced before it", plan.name, input.key);
            return Err(GraphError::UnresolvedSlot(input.key));
        }
        self.resolve_key(input.key, input.history_offset)
    }

    /// Handles of output `index` of `stage`, in declaration order.
    pub fn resolve_output(&self, stage: usize, index: usize) -> GraphResult<ResourceHandle> {
        let plan = self.plan(stage)?;
        let &(key, _) = plan.outputs.get(index).ok_or(GraphError::BindingOutOfRange {
            stage,
            kind: "outputs",
            index,
            count: plan.outputs.len(),
        })?;
        self.resolve_key(key, 0)
    }

    /// Handles of scratch resource `index` of `stage`.
    pub fn resolve_scratch(&self, stage: usize, index: usize) -> GraphResult<ResourceHandle> {
        let plan = self.plan(stage)?;
        let &(key, _) = plan.scratch.get(index).ok_or(GraphError::BindingOutOfRange {
            stage,
            kind: "scratch resources",
            index,
            count: plan.scratch.len(),
        })?;
        self.resolve_key(key, 0)
    }

    /// Seed `slot` with a buffer owned by the caller.
    ///
    /// The buffer is never destroyed by the executor and is forgotten on
    /// [`reset`](Self::reset).
    pub fn import(
        &mut self,
        slot: SlotId,
        buffer: BufferHandle,
        extent: Extent2d,
        format: TextureFormat,
        state: AccessState,
        views: &[(ViewKind, ViewHandle)],
    ) {
        self.registry.import(
            ResourceKey::Named(slot),
            buffer,
            extent,
            format,
            state,
            views,
        );
    }

    /// Bind this frame's presentation surface. It starts in `PresentSource`.
    pub fn set_present_surface(
        &mut self,
        buffer: BufferHandle,
        view: ViewHandle,
        extent: Extent2d,
        format: TextureFormat,
    ) {
        self.present = Some(PresentSurface {
            tracked: TrackedBuffer::with_state(buffer, AccessState::PresentSource),
            view,
            extent,
            format,
        });
    }

    pub fn present_surface(&self) -> Option<&PresentSurface> {
        self.present.as_ref()
    }

    /// Hand the presentation surface back to the presentation engine.
    ///
    /// Returns `None` if no surface is bound or it is already in
    /// `PresentSource`.
    pub fn finish_presentation(&mut self) -> Option<TransitionDirective> {
        let surface = self.present.as_mut()?;
        self.tracker
            .require_access(&mut surface.tracked, AccessState::PresentSource)
    }

    /// Close the frame: rotate history rings, destroy retired resources and
    /// unbind the presentation surface.
    pub fn end_frame<B: Backend + ?Sized>(&mut self, backend: &mut B) {
        self.registry.advance_frame(backend);

        if let Some(surface) = self.present.take() {
            if surface.state() != AccessState::PresentSource {
                log::warn!(
                    "frame {} ended with the presentation surface in {:?}",
                    self.frame_index,
                    surface.state()
                );
            }
        }

        log::trace!(
            "frame {} done: {} transitions, {} skipped",
            self.frame_index,
            self.tracker.emitted(),
            self.tracker.skipped()
        );
        self.tracker.reset_counters();
        self.frame_index += 1;
    }

    /// Drop every physical resource. `resolve` fails until the next
    /// `make_resources`.
    pub fn reset<B: Backend + ?Sized>(&mut self, backend: &mut B) {
        let buffers = self.registry.owned_buffer_count();
        self.registry.clear(backend);
        self.plans.clear();
        self.declared.clear();
        self.present = None;
        log::info!("frame graph reset, released {} buffers", buffers);
    }

    /// Reset and resolve canvas-relative resources against `canvas` from now
    /// on.
    pub fn resize<B: Backend + ?Sized>(&mut self, backend: &mut B, canvas: Extent2d) {
        self.reset(backend);
        self.canvas = canvas;
        log::info!("frame graph canvas resized to {}", canvas);
    }

    /// Release every resource and consume the executor.
    pub fn destroy<B: Backend + ?Sized>(mut self, backend: &mut B) {
        self.registry.clear(backend);
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frame_index: self.frame_index,
            resources: self.registry.resource_count(),
            buffers: self.registry.owned_buffer_count(),
            transitions_emitted: self.tracker.emitted(),
            transitions_skipped: self.tracker.skipped(),
        }
    }
}

impl Default for GraphExecutor {
    fn default() -> Self {
        Self::new(FrameGraphConfig::default())
    }
}

impl Drop for GraphExecutor {
    fn drop(&mut self) {
        let buffers = self.registry.owned_buffer_count();
        if buffers > 0 {
            log::warn!(
                "GraphExecutor dropped with {} live buffers; call destroy() to release them",
                buffers
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyBackend, RecordingSink, SinkCommand};
    use crate::graph::StageOutput;

    const COLOR: SlotId = SlotId::new(0);
    const BLURRED: SlotId = SlotId::new(1);

    fn color() -> ResourceDescriptor {
        ResourceDescriptor::color(TextureFormat::Rgba8Unorm)
    }

    #[test]
    fn test_stage_out_of_range() {
        let mut executor = GraphExecutor::default();
        assert_eq!(
            executor.emit_transitions(0),
            Err(GraphError::StageOutOfRange { index: 0, count: 0 })
        );
    }

    #[test]
    fn test_record_clears_on_first_use() {
        let mut backend = DummyBackend::new();
        let mut sink = RecordingSink::new();
        let mut executor = GraphExecutor::default();
        let stages = vec![StageDescriptor::new("Fill").write(COLOR, color())];

        executor.make_resources(&mut backend, &stages).unwrap();
        assert_eq!(executor.record_transitions(0, &mut sink).unwrap(), 1);

        let buffer = executor.resolve(COLOR, 0).unwrap().buffer();
        assert_eq!(sink.commands().len(), 2);
        assert_eq!(sink.commands()[1], SinkCommand::Clear(buffer));

        // Already in ColorWrite, nothing to record.
        sink.clear();
        assert_eq!(executor.record_transitions(0, &mut sink).unwrap(), 0);
        assert!(sink.commands().is_empty());

        executor.destroy(&mut backend);
    }

    #[test]
    fn test_record_without_clear() {
        let mut backend = DummyBackend::new();
        let mut sink = RecordingSink::new();
        let mut executor = GraphExecutor::new(FrameGraphConfig {
            clear_on_first_use: false,
            ..FrameGraphConfig::default()
        });
        let stages = vec![StageDescriptor::new("Fill").write(COLOR, color())];

        executor.make_resources(&mut backend, &stages).unwrap();
        executor.record_transitions(0, &mut sink).unwrap();
        assert_eq!(sink.clear_count(), 0);

        executor.destroy(&mut backend);
    }

    #[test]
    fn test_invalid_output_access() {
        let mut backend = DummyBackend::new();
        let mut executor = GraphExecutor::default();
        let output = StageOutput::slot(COLOR, color()).written_as(AccessState::StorageReadWrite);
        let stages = vec![StageDescriptor::new("Compute").with_output(output)];

        let err = executor.make_resources(&mut backend, &stages).unwrap_err();
        assert!(matches!(
            err,
            GraphError::InvalidDescriptor {
                source: DescriptorError::UnsupportedAccess { .. },
                ..
            }
        ));
        assert_eq!(backend.live_buffer_count(), 0);
    }

    #[test]
    fn test_resolve_by_declaration() {
        let mut backend = DummyBackend::new();
        let mut executor = GraphExecutor::default();
        let stages = vec![
            StageDescriptor::new("A").write(COLOR, color()),
            StageDescriptor::new("B")
                .read(COLOR)
                .write(BLURRED, color())
                .with_scratch(color().with_resolution_rate(0.5)),
        ];
        executor.make_resources(&mut backend, &stages).unwrap();

        assert_eq!(
            executor.resolve_input(1, 0).unwrap(),
            executor.resolve(COLOR, 0).unwrap()
        );
        assert_eq!(
            executor.resolve_output(1, 0).unwrap(),
            executor.resolve(BLURRED, 0).unwrap()
        );
        assert_eq!(
            executor.resolve_scratch(1, 0).unwrap().extent(),
            Extent2d::new(640, 360)
        );
        assert_eq!(
            executor.resolve_input(1, 1),
            Err(GraphError::BindingOutOfRange {
                stage: 1,
                kind: "inputs",
                index: 1,
                count: 1
            })
        );

        executor.destroy(&mut backend);
    }

    #[test]
    fn test_undeclared_keys_kept_but_unresolvable() {
        let mut backend = DummyBackend::new();
        let mut executor = GraphExecutor::default();
        let full = vec![
            StageDescriptor::new("A").write(COLOR, color()),
            StageDescriptor::new("B").read(COLOR).write(BLURRED, color()),
        ];
        executor.make_resources(&mut backend, &full).unwrap();
        executor.end_frame(&mut backend);

        let shrunk = vec![StageDescriptor::new("A").write(COLOR, color())];
        executor.make_resources(&mut backend, &shrunk).unwrap();

        let mut keys: Vec<_> = executor.registry().keys().collect();
        keys.sort_by_key(|key| key.to_string());
        assert_eq!(
            keys,
            vec![ResourceKey::Named(COLOR), ResourceKey::Named(BLURRED)]
        );
        assert!(executor.resolve(COLOR, 0).is_ok());
        assert_eq!(
            executor.resolve(BLURRED, 0),
            Err(GraphError::UnresolvedSlot(ResourceKey::Named(BLURRED)))
        );

        executor.destroy(&mut backend);
    }

    #[test]
    fn test_stats_reset_each_frame() {
        let mut backend = DummyBackend::new();
        let mut executor = GraphExecutor::default();
        let stages = vec![StageDescriptor::new("A").write(COLOR, color().with_history(1))];
        executor.make_resources(&mut backend, &stages).unwrap();
        executor.emit_transitions(0).unwrap();
        executor.emit_transitions(0).unwrap();

        let stats = executor.stats();
        assert_eq!(stats.frame_index, 0);
        assert_eq!(stats.resources, 1);
        assert_eq!(stats.buffers, 2);
        assert_eq!(stats.transitions_emitted, 1);
        assert_eq!(stats.transitions_skipped, 1);

        executor.end_frame(&mut backend);
        let stats = executor.stats();
        assert_eq!(stats.frame_index, 1);
        assert_eq!(stats.transitions_emitted, 0);

        executor.destroy(&mut backend);
    }
}
