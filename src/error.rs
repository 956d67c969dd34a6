//! Frame graph error types.

use thiserror::Error;

use crate::backend::BackendError;
use crate::graph::{DescriptorError, ResourceKey};

/// Errors that can occur while building or executing a frame.
///
/// `Allocation` aborts the frame being built. The remaining variants are
/// authoring errors in the stage list and should be fixed, not retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Failed to allocate {key}: {source}")]
    Allocation {
        key: ResourceKey,
        #[source]
        source: BackendError,
    },
    #[error("Unresolved {0}: no stage produced it since the last reset")]
    UnresolvedSlot(ResourceKey),
    #[error("History offset {offset} of {key} exceeds configured depth {depth}")]
    HistoryOutOfRange {
        key: ResourceKey,
        offset: u32,
        depth: u32,
    },
    #[error("Invalid descriptor for {key}: {source}")]
    InvalidDescriptor {
        key: ResourceKey,
        #[source]
        source: DescriptorError,
    },
    #[error("Stage '{0}' presents but no presentation surface is bound")]
    MissingPresentSurface(String),
    #[error("Stage index {index} out of range ({count} stages built)")]
    StageOutOfRange { index: usize, count: usize },
    #[error("Stage {stage} declares {count} {kind}, index {index} out of range")]
    BindingOutOfRange {
        stage: usize,
        kind: &'static str,
        index: usize,
        count: usize,
    },
}

pub type GraphResult<T> = Result<T, GraphError>;
