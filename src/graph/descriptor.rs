//! Resource descriptors: the shape of a logical graph resource.

use bitflags::bitflags;
use thiserror::Error;

use crate::backend::ViewKind;
use crate::graph::AccessState;
use crate::types::{Extent2d, TextureFormat};

bitflags! {
    /// Write capabilities of a graph resource.
    ///
    /// Every resource can be sampled by later stages; these flags enable the
    /// additional ways a stage may write it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResourceFlags: u32 {
        /// Read/write storage texture.
        const STORAGE = 1 << 0;
        /// Color render target.
        const COLOR_TARGET = 1 << 1;
        /// Depth/stencil render target.
        const DEPTH_TARGET = 1 << 2;
    }
}

impl Default for ResourceFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Size of a graph resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceSize {
    /// Fixed size in pixels.
    Absolute(Extent2d),
    /// Fraction of the canvas (1.0 = full canvas).
    CanvasRelative(f32),
}

impl Default for ResourceSize {
    fn default() -> Self {
        Self::CanvasRelative(1.0)
    }
}

/// Reasons a descriptor is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("mip level count must be non-zero")]
    ZeroMipLevels,
    #[error("sample count must be non-zero")]
    ZeroSamples,
    #[error("resolution rate {0} must be positive")]
    InvalidResolutionRate(f32),
    #[error("absolute size must be non-empty")]
    EmptySize,
    #[error("no write capability enabled")]
    NotWritable,
    #[error("depth target requires a depth format, got {0:?}")]
    DepthFormatRequired(TextureFormat),
    #[error("color target cannot use depth format {0:?}")]
    ColorFormatRequired(TextureFormat),
    #[error("storage resources must be single-sampled")]
    MultisampledStorage,
    #[error("history depth {depth} exceeds maximum {max}")]
    HistoryTooDeep { depth: u32, max: u32 },
    #[error("scratch resources cannot retain history")]
    ScratchHistory,
    #[error("access {access:?} is not a write enabled by {flags:?}")]
    UnsupportedAccess {
        access: AccessState,
        flags: ResourceFlags,
    },
}

/// Describes a logical graph resource.
///
/// Two descriptors describe the same physical shape when everything except
/// the label matches; see [`ResourceDescriptor::same_shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    /// Debug label passed to the backend.
    pub label: Option<String>,
    /// Texel format.
    pub format: TextureFormat,
    /// Absolute or canvas-relative size.
    pub size: ResourceSize,
    /// Mip level count.
    pub mip_levels: u32,
    /// Sample count for multisampling.
    pub sample_count: u32,
    /// Enabled write capabilities.
    pub flags: ResourceFlags,
    /// Number of past frames retained in addition to the current one.
    pub history_depth: u32,
}

impl ResourceDescriptor {
    /// A canvas-sized color target.
    pub fn color(format: TextureFormat) -> Self {
        Self::with_capabilities(format, ResourceFlags::COLOR_TARGET)
    }

    /// A canvas-sized depth target.
    pub fn depth(format: TextureFormat) -> Self {
        Self::with_capabilities(format, ResourceFlags::DEPTH_TARGET)
    }

    /// A canvas-sized storage texture.
    pub fn storage(format: TextureFormat) -> Self {
        Self::with_capabilities(format, ResourceFlags::STORAGE)
    }

    /// A canvas-sized resource with the given capabilities.
    pub fn with_capabilities(format: TextureFormat, flags: ResourceFlags) -> Self {
        Self {
            label: None,
            format,
            size: ResourceSize::default(),
            mip_levels: 1,
            sample_count: 1,
            flags,
            history_depth: 0,
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Use a fixed size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = ResourceSize::Absolute(Extent2d::new(width, height));
        self
    }

    /// Use a size relative to the canvas.
    pub fn with_resolution_rate(mut self, rate: f32) -> Self {
        self.size = ResourceSize::CanvasRelative(rate);
        self
    }

    /// Set the mip level count.
    pub fn with_mip_levels(mut self, count: u32) -> Self {
        self.mip_levels = count;
        self
    }

    /// Set the sample count.
    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }

    /// Add write capabilities.
    pub fn with_flags(mut self, flags: ResourceFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Retain `depth` past frames.
    pub fn with_history(mut self, depth: u32) -> Self {
        self.history_depth = depth;
        self
    }

    /// Number of physical buffers backing this resource.
    pub fn version_count(&self) -> usize {
        self.history_depth as usize + 1
    }

    /// Resolve the size against the current canvas.
    pub fn resolve_extent(&self, canvas: Extent2d) -> Extent2d {
        match self.size {
            ResourceSize::Absolute(extent) => extent,
            ResourceSize::CanvasRelative(rate) => canvas.scaled(rate),
        }
    }

    /// True if both descriptors produce interchangeable physical storage.
    pub fn same_shape(&self, other: &ResourceDescriptor) -> bool {
        self.format == other.format
            && self.size == other.size
            && self.mip_levels == other.mip_levels
            && self.sample_count == other.sample_count
            && self.flags == other.flags
            && self.history_depth == other.history_depth
    }

    /// The access state a stage writing this resource requires.
    ///
    /// Depth targets win over color targets, which win over storage.
    pub fn write_state(&self) -> AccessState {
        if self.flags.contains(ResourceFlags::DEPTH_TARGET) {
            AccessState::DepthWrite
        } else if self.flags.contains(ResourceFlags::COLOR_TARGET) {
            AccessState::ColorWrite
        } else {
            AccessState::StorageReadWrite
        }
    }

    /// Check whether a stage may write this resource with `access`.
    pub fn supports_write(&self, access: AccessState) -> bool {
        match access {
            AccessState::ColorWrite => self.flags.contains(ResourceFlags::COLOR_TARGET),
            AccessState::DepthWrite => self.flags.contains(ResourceFlags::DEPTH_TARGET),
            AccessState::StorageReadWrite => self.flags.contains(ResourceFlags::STORAGE),
            _ => false,
        }
    }

    /// Check whether a view of `kind` may be created for this resource.
    pub fn supports_view(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::ShaderRead => true,
            ViewKind::ColorTarget => self.flags.contains(ResourceFlags::COLOR_TARGET),
            ViewKind::DepthTarget => self.flags.contains(ResourceFlags::DEPTH_TARGET),
            ViewKind::StorageReadWrite => self.flags.contains(ResourceFlags::STORAGE),
        }
    }

    /// Iterate over the view kinds this descriptor enables.
    pub fn enabled_views(&self) -> impl Iterator<Item = ViewKind> + '_ {
        ViewKind::ALL
            .into_iter()
            .filter(move |&kind| self.supports_view(kind))
    }

    /// Validate the descriptor.
    pub fn validate(&self, max_history_depth: u32) -> Result<(), DescriptorError> {
        if self.mip_levels == 0 {
            return Err(DescriptorError::ZeroMipLevels);
        }
        if self.sample_count == 0 {
            return Err(DescriptorError::ZeroSamples);
        }
        match self.size {
            ResourceSize::CanvasRelative(rate) if !(rate > 0.0) => {
                return Err(DescriptorError::InvalidResolutionRate(rate));
            }
            ResourceSize::Absolute(extent) if extent.is_empty() => {
                return Err(DescriptorError::EmptySize);
            }
            _ => {}
        }
        if self.flags.is_empty() {
            return Err(DescriptorError::NotWritable);
        }
        if self.flags.contains(ResourceFlags::DEPTH_TARGET) && !self.format.is_depth_stencil() {
            return Err(DescriptorError::DepthFormatRequired(self.format));
        }
        if self.flags.contains(ResourceFlags::COLOR_TARGET) && self.format.is_depth_stencil() {
            return Err(DescriptorError::ColorFormatRequired(self.format));
        }
        if self.flags.contains(ResourceFlags::STORAGE) && self.sample_count > 1 {
            return Err(DescriptorError::MultisampledStorage);
        }
        if self.history_depth > max_history_depth {
            return Err(DescriptorError::HistoryTooDeep {
                depth: self.history_depth,
                max: max_history_depth,
            });
        }
        Ok(())
    }

    /// Validate a descriptor used for a scratch resource.
    pub fn validate_scratch(&self, max_history_depth: u32) -> Result<(), DescriptorError> {
        if self.history_depth != 0 {
            return Err(DescriptorError::ScratchHistory);
        }
        self.validate(max_history_depth)
    }

    /// Approximate storage size in bytes, counting every retained version.
    pub fn estimated_bytes(&self, extent: Extent2d) -> u64 {
        let mut level = extent;
        let mut bytes = 0u64;
        for _ in 0..self.mip_levels {
            bytes += level.area() * self.format.block_size() as u64;
            level = Extent2d::new((level.width / 2).max(1), (level.height / 2).max(1));
        }
        bytes * self.sample_count as u64 * self.version_count() as u64
    }
}
