//! Executor configuration.

use crate::types::Extent2d;

/// Configuration for a [`GraphExecutor`](crate::GraphExecutor).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGraphConfig {
    /// Initial canvas size; canvas-relative resources resolve against it
    pub canvas: Extent2d,
    /// Clear buffers the first time they leave `Uninitialized` in
    /// `record_transitions`
    pub clear_on_first_use: bool,
    /// Share scratch buffers of identical shape between stages
    pub reuse_scratch: bool,
    /// Largest accepted `history_depth`
    pub max_history_depth: u32,
}

impl FrameGraphConfig {
    /// Default configuration with the given canvas size.
    pub fn with_canvas(width: u32, height: u32) -> Self {
        Self {
            canvas: Extent2d::new(width, height),
            ..Self::default()
        }
    }
}

impl Default for FrameGraphConfig {
    fn default() -> Self {
        Self {
            canvas: Extent2d::new(1280, 720),
            clear_on_first_use: true,
            reuse_scratch: true,
            max_history_depth: 8,
        }
    }
}
