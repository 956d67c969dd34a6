//! Logical resource identifiers.

/// Stable logical name for a graph resource.
///
/// A `SlotId` identifies a resource independently of which stage writes it,
/// so several stages may read and overwrite the same slot in one frame.
/// Applications usually declare their slots as constants:
///
/// ```
/// use redlilium_framegraph::SlotId;
///
/// const GBUFFER0: SlotId = SlotId::new(0);
/// const LIGHT_RESULT: SlotId = SlotId::new(1);
/// assert_ne!(GBUFFER0, LIGHT_RESULT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u16);

impl SlotId {
    /// Create a slot id from a raw index.
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// The raw index of this slot.
    pub fn index(self) -> u16 {
        self.0
    }
}

impl From<u16> for SlotId {
    fn from(index: u16) -> Self {
        Self(index)
    }
}

/// Key of a physical resource inside the registry.
///
/// Named slots come from the application. Stage outputs without a name
/// ("for the next stage") and scratch resources are keyed by the index of the
/// stage that declared them in the list handed to
/// [`GraphExecutor::make_resources`](crate::GraphExecutor::make_resources).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    /// An application-named slot.
    Named(SlotId),
    /// Anonymous output `index` of stage `stage`.
    StageOutput { stage: u32, index: u32 },
    /// Scratch resource `index` of stage `stage`.
    Scratch { stage: u32, index: u32 },
}

impl ResourceKey {
    /// Returns true for scratch keys.
    pub fn is_scratch(&self) -> bool {
        matches!(self, Self::Scratch { .. })
    }
}

impl From<SlotId> for ResourceKey {
    fn from(slot: SlotId) -> Self {
        Self::Named(slot)
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(slot) => write!(f, "slot {}", slot.0),
            Self::StageOutput { stage, index } => write!(f, "output {index} of stage {stage}"),
            Self::Scratch { stage, index } => write!(f, "scratch {index} of stage {stage}"),
        }
    }
}
