//! Frame graph: stage declarations resolved to physical resources.
//!
//! The application describes its pipeline as an ordered list of
//! [`StageDescriptor`]s. Each stage names the slots it reads and writes;
//! the [`GraphExecutor`] allocates backing storage through the
//! [`SlotRegistry`] and synthesizes the access transitions each stage needs
//! before it runs.
//!
//! Resources written by one stage and read by a later one are addressed by
//! [`SlotId`]. A slot with `history_depth > 0` keeps that many past frames
//! alive, readable with a history offset.

mod access;
mod descriptor;
mod executor;
mod registry;
mod slot;
mod stage;

pub use access::{AccessState, AccessStateTracker, TrackedBuffer, TransitionDirective};
pub use descriptor::{DescriptorError, ResourceDescriptor, ResourceFlags, ResourceSize};
pub use executor::{FrameStats, GraphExecutor, PresentSurface};
pub use registry::{PhysicalResource, ResourceHandle, SlotRegistry};
pub use slot::{ResourceKey, SlotId};
pub use stage::{OutputTarget, StageDescriptor, StageInput, StageOutput};
