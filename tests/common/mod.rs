//! Common utilities for frame graph integration tests.

#![allow(dead_code)]

use redlilium_framegraph::{
    BufferHandle, DummyBackend, Extent2d, FrameGraphConfig, GraphExecutor, GraphResult,
    RecordingSink, ResourceDescriptor, ResourceFlags, SlotId, StageDescriptor, TextureFormat,
    TransitionDirective, ViewHandle,
};

// ============================================================================
// Slots
// ============================================================================

pub const GBUFFER: SlotId = SlotId::new(0);
pub const DEPTH: SlotId = SlotId::new(1);
pub const AMBIENT_OCCLUSION: SlotId = SlotId::new(2);
pub const LIGHT_RESULT: SlotId = SlotId::new(3);
pub const TAA_HISTORY: SlotId = SlotId::new(4);

pub const COLOR: SlotId = SlotId::new(10);
pub const BLURRED: SlotId = SlotId::new(11);

/// Buffer handle used for the fake swapchain image.
pub const SWAPCHAIN: BufferHandle = BufferHandle::new(1_000_000);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Pipelines
// ============================================================================

/// `[A: out Color] [B: in Color, out Blurred] [C: in Blurred, present 0]`
pub fn linear_chain() -> Vec<StageDescriptor> {
    let color = ResourceDescriptor::color(TextureFormat::Rgba8Unorm);
    vec![
        StageDescriptor::new("A").write(COLOR, color.clone()),
        StageDescriptor::new("B").read(COLOR).write(BLURRED, color),
        StageDescriptor::new("C").read(BLURRED).present_to(0),
    ]
}

/// A deferred pipeline with an in-place overwrite, an anonymous output,
/// scratch resources and a temporal history slot.
pub fn deferred_pipeline() -> Vec<StageDescriptor> {
    let hdr = ResourceDescriptor::color(TextureFormat::Rgba16Float).with_label("LightResult");
    let history = ResourceDescriptor::color(TextureFormat::Rgba16Float)
        .with_label("TaaHistory")
        .with_history(1);

    vec![
        StageDescriptor::new("GBuffer")
            .write(GBUFFER, ResourceDescriptor::color(TextureFormat::Rgba8Unorm))
            .write(DEPTH, ResourceDescriptor::depth(TextureFormat::Depth32Float)),
        StageDescriptor::new("LinearDepth")
            .read(DEPTH)
            .write_next(ResourceDescriptor::storage(TextureFormat::R32Float)),
        StageDescriptor::new("Ssao")
            .read_previous(0)
            .read(GBUFFER)
            .write(
                AMBIENT_OCCLUSION,
                ResourceDescriptor::storage(TextureFormat::R32Float),
            )
            .with_scratch(
                ResourceDescriptor::storage(TextureFormat::R32Float).with_resolution_rate(0.5),
            ),
        StageDescriptor::new("Lighting")
            .read(GBUFFER)
            .read(AMBIENT_OCCLUSION)
            .read(DEPTH)
            .write(LIGHT_RESULT, hdr.clone()),
        StageDescriptor::new("Water")
            .read(DEPTH)
            .write(LIGHT_RESULT, hdr),
        StageDescriptor::new("Taa")
            .read(LIGHT_RESULT)
            .read_history(TAA_HISTORY, 1)
            .write(TAA_HISTORY, history),
        StageDescriptor::new("Tonemap")
            .read(TAA_HISTORY)
            .with_scratch(
                ResourceDescriptor::with_capabilities(
                    TextureFormat::R32Float,
                    ResourceFlags::STORAGE,
                )
                .with_size(16, 1),
            )
            .present_to(0),
    ]
}

// ============================================================================
// Test context
// ============================================================================

/// An executor with a dummy backend and a recording sink.
pub struct TestContext {
    pub backend: DummyBackend,
    pub sink: RecordingSink,
    pub executor: GraphExecutor,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(FrameGraphConfig::default())
    }

    pub fn with_config(config: FrameGraphConfig) -> Self {
        init_logging();
        Self {
            backend: DummyBackend::new(),
            sink: RecordingSink::new(),
            executor: GraphExecutor::new(config),
        }
    }

    pub fn with_backend(backend: DummyBackend) -> Self {
        init_logging();
        Self {
            backend,
            sink: RecordingSink::new(),
            executor: GraphExecutor::new(FrameGraphConfig::default()),
        }
    }

    pub fn make_resources(&mut self, stages: &[StageDescriptor]) -> GraphResult<()> {
        self.executor.make_resources(&mut self.backend, stages)
    }

    pub fn bind_swapchain(&mut self) {
        let canvas = self.executor.canvas();
        self.executor.set_present_surface(
            SWAPCHAIN,
            ViewHandle::new(SWAPCHAIN.raw()),
            canvas,
            TextureFormat::Bgra8UnormSrgb,
        );
    }

    /// Build resources and emit the transitions of every stage, returning
    /// them per stage. Ends the frame on success.
    pub fn run_frame(
        &mut self,
        stages: &[StageDescriptor],
    ) -> GraphResult<Vec<Vec<TransitionDirective>>> {
        self.make_resources(stages)?;
        self.bind_swapchain();

        let mut per_stage = Vec::with_capacity(stages.len());
        for stage in 0..stages.len() {
            per_stage.push(self.executor.emit_transitions(stage)?);
        }
        self.executor.finish_presentation();
        self.executor.end_frame(&mut self.backend);
        Ok(per_stage)
    }

    pub fn end_frame(&mut self) {
        self.executor.end_frame(&mut self.backend);
    }

    pub fn reset(&mut self) {
        self.executor.reset(&mut self.backend);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.executor
            .resize(&mut self.backend, Extent2d::new(width, height));
    }

    /// Release every executor resource and return the backend for
    /// inspection.
    pub fn finish(self) -> DummyBackend {
        let Self {
            mut backend,
            executor,
            ..
        } = self;
        executor.destroy(&mut backend);
        backend
    }
}
