//! Backend abstraction layer
//!
//! Collaborator traits the frame graph is written against, plus a dummy
//! implementation for tests and an optional wgpu implementation.

pub mod dummy;
pub mod traits;

#[cfg(feature = "wgpu-backend")]
pub mod wgpu_backend;

pub use dummy::{DummyBackend, RecordingSink, SinkCommand};
pub use traits::*;

#[cfg(feature = "wgpu-backend")]
pub use wgpu_backend::{WgpuBackend, WgpuCommandSink};
