//! Stage declarations.
//!
//! A [`StageDescriptor`] lists what one pipeline stage reads, writes and
//! needs as temporary storage. Stages are declared once and handed to the
//! executor as an ordered list; their order is the execution order.

use crate::graph::{AccessState, ResourceDescriptor, SlotId};

/// A resource read by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageInput {
    /// A named slot, `history_offset` frames ago.
    Slot { slot: SlotId, history_offset: u32 },
    /// Anonymous output `index` of the immediately preceding stage.
    PreviousOutput(u32),
}

impl StageInput {
    /// Read the current version of `slot`.
    pub fn slot(slot: SlotId) -> Self {
        Self::history(slot, 0)
    }

    /// Read the version of `slot` written `history_offset` frames ago.
    pub fn history(slot: SlotId, history_offset: u32) -> Self {
        Self::Slot {
            slot,
            history_offset,
        }
    }

    /// Read anonymous output `index` of the preceding stage.
    pub fn previous_output(index: u32) -> Self {
        Self::PreviousOutput(index)
    }
}

/// Where a stage output is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// A named slot, visible to every later stage.
    Slot(SlotId),
    /// An anonymous resource, readable by the next stage only.
    NextStage,
}

/// A resource written by a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    target: OutputTarget,
    descriptor: ResourceDescriptor,
    access: Option<AccessState>,
}

impl StageOutput {
    /// Write the named `slot`.
    pub fn slot(slot: SlotId, descriptor: ResourceDescriptor) -> Self {
        Self {
            target: OutputTarget::Slot(slot),
            descriptor,
            access: None,
        }
    }

    /// Write an anonymous resource for the next stage.
    pub fn next_stage(descriptor: ResourceDescriptor) -> Self {
        Self {
            target: OutputTarget::NextStage,
            descriptor,
            access: None,
        }
    }

    /// Write with an explicit access instead of the descriptor's default.
    ///
    /// Useful for a color target that one stage renders and another writes
    /// from a compute shader. Validated against the descriptor flags.
    pub fn written_as(mut self, access: AccessState) -> Self {
        self.access = Some(access);
        self
    }

    pub fn target(&self) -> OutputTarget {
        self.target
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// The access state this output is moved into before the stage runs.
    pub fn write_state(&self) -> AccessState {
        self.access.unwrap_or_else(|| self.descriptor.write_state())
    }
}

/// Declares the resources of one pipeline stage.
///
/// ```
/// use redlilium_framegraph::{ResourceDescriptor, SlotId, StageDescriptor, TextureFormat};
///
/// const COLOR: SlotId = SlotId::new(0);
///
/// let stage = StageDescriptor::new("Tonemap")
///     .read(COLOR)
///     .with_scratch(ResourceDescriptor::storage(TextureFormat::R32Float).with_size(16, 1))
///     .present_to(0);
/// assert_eq!(stage.inputs().len(), 1);
/// assert_eq!(stage.present_output(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StageDescriptor {
    name: String,
    inputs: Vec<StageInput>,
    outputs: Vec<StageOutput>,
    scratch: Vec<ResourceDescriptor>,
    present_output: Option<u32>,
}

impl StageDescriptor {
    /// Create a stage with no resources.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            scratch: Vec::new(),
            present_output: None,
        }
    }

    /// Read the current version of `slot`.
    pub fn read(self, slot: SlotId) -> Self {
        self.with_input(StageInput::slot(slot))
    }

    /// Read `slot` as it was `history_offset` frames ago.
    pub fn read_history(self, slot: SlotId, history_offset: u32) -> Self {
        self.with_input(StageInput::history(slot, history_offset))
    }

    /// Read anonymous output `index` of the preceding stage.
    pub fn read_previous(self, index: u32) -> Self {
        self.with_input(StageInput::previous_output(index))
    }

    pub fn with_input(mut self, input: StageInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Write `slot` with `descriptor`.
    pub fn write(self, slot: SlotId, descriptor: ResourceDescriptor) -> Self {
        self.with_output(StageOutput::slot(slot, descriptor))
    }

    /// Write an anonymous resource for the next stage.
    pub fn write_next(self, descriptor: ResourceDescriptor) -> Self {
        self.with_output(StageOutput::next_stage(descriptor))
    }

    pub fn with_output(mut self, output: StageOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Declare a temporary resource private to this stage.
    pub fn with_scratch(mut self, descriptor: ResourceDescriptor) -> Self {
        self.scratch.push(descriptor);
        self
    }

    /// Render into the presentation surface as color attachment `attachment`.
    pub fn present_to(mut self, attachment: u32) -> Self {
        self.present_output = Some(attachment);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[StageInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[StageOutput] {
        &self.outputs
    }

    pub fn scratch(&self) -> &[ResourceDescriptor] {
        &self.scratch
    }

    /// Color attachment index of the presentation surface, if bound.
    pub fn present_output(&self) -> Option<u32> {
        self.present_output
    }

    /// Number of anonymous outputs, i.e. how many `previous_output` indices
    /// the next stage may use.
    pub fn next_stage_output_count(&self) -> usize {
        self.outputs
            .iter()
            .filter(|output| output.target == OutputTarget::NextStage)
            .count()
    }
}
