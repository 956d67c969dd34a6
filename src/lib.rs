//! # RedLilium Frame Graph
//!
//! Render-stage resource dependency graph for RedLilium.
//!
//! ## Overview
//!
//! A rendering pipeline is described as an ordered list of stages, each
//! declaring the logical resources it reads and writes. This crate provides:
//! - [`StageDescriptor`] - Inputs, outputs, scratch resources and
//!   presentation binding of one stage
//! - [`GraphExecutor`] - Allocates physical storage per frame, keeps history
//!   rings for temporal effects and emits the access transitions each stage
//!   needs
//! - [`Backend`] / [`CommandSink`] - Collaborator traits for the GPU layer,
//!   with a [`DummyBackend`] for testing and an optional wgpu implementation
//!
//! ## Example
//!
//! ```
//! use redlilium_framegraph::{
//!     DummyBackend, FrameGraphConfig, GraphExecutor, RecordingSink, ResourceDescriptor,
//!     SlotId, StageDescriptor, TextureFormat,
//! };
//!
//! const COLOR: SlotId = SlotId::new(0);
//!
//! let stages = vec![
//!     StageDescriptor::new("Scene")
//!         .write(COLOR, ResourceDescriptor::color(TextureFormat::Rgba16Float)),
//!     StageDescriptor::new("Tonemap").read(COLOR),
//! ];
//!
//! let mut backend = DummyBackend::new();
//! let mut sink = RecordingSink::new();
//! let mut executor = GraphExecutor::new(FrameGraphConfig::default());
//!
//! executor.make_resources(&mut backend, &stages)?;
//! for stage in 0..stages.len() {
//!     executor.record_transitions(stage, &mut sink)?;
//!     let _color = executor.resolve(COLOR, 0)?;
//! }
//! executor.end_frame(&mut backend);
//! executor.destroy(&mut backend);
//! # Ok::<(), redlilium_framegraph::GraphError>(())
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod graph;
pub mod types;

// Re-export main types for convenience
pub use backend::{
    Backend, BackendError, BackendResult, BufferHandle, CommandSink, DummyBackend, RecordingSink,
    SinkCommand, ViewHandle, ViewKind,
};
pub use config::FrameGraphConfig;
pub use error::{GraphError, GraphResult};
pub use graph::{
    AccessState, AccessStateTracker, DescriptorError, FrameStats, GraphExecutor, OutputTarget,
    PhysicalResource, PresentSurface, ResourceDescriptor, ResourceFlags, ResourceHandle,
    ResourceKey, ResourceSize, SlotId, SlotRegistry, StageDescriptor, StageInput, StageOutput,
    TrackedBuffer, TransitionDirective,
};
pub use types::{Extent2d, TextureFormat};

#[cfg(feature = "wgpu-backend")]
pub use backend::{WgpuBackend, WgpuCommandSink};

/// Frame graph library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the frame graph subsystem.
///
/// Only logs the version; call once after the logger is set up.
pub fn init() {
    log::info!("RedLilium Frame Graph v{} initialized", VERSION);
}
