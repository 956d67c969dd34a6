//! Common value types shared across the frame graph.

/// Two-dimensional extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2d {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent2d {
    /// Create a new extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scale both dimensions by `rate`, truncating toward zero.
    ///
    /// The result is clamped to at least one pixel per side so a small
    /// rate on a small canvas never produces an empty resource.
    pub fn scaled(&self, rate: f32) -> Self {
        let width = ((self.width as f32) * rate) as u32;
        let height = ((self.height as f32) * rate) as u32;
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Number of pixels covered by this extent.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl std::fmt::Display for Extent2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
