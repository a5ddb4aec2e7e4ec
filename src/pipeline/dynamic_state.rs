use super::{DynamicState, GraphicsPipelineBuilder, StageBuilder};
use ash::vk;

impl DynamicState {
    /// Add `state` unless it is already dynamic.
    pub fn push(&mut self, state: vk::DynamicState) {
        if !self.states.contains(&state) {
            self.states.push(state);
        }
    }

    pub fn build_pipeline_dynamic_state(&self) -> DynamicState {
        self.clone()
    }
}

/// Lists the states set at draw time instead of pipeline creation.
///
/// Each state is listed once, in the order it was first added.
pub struct DynamicStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> DynamicStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().dynamic();
        Self { root }
    }

    pub fn state(self, state: vk::DynamicState) -> Self {
        self.root.session().dynamic().push(state);
        self
    }

    pub fn viewport(self) -> Self {
        self.state(vk::DynamicState::VIEWPORT)
    }

    pub fn scissor(self) -> Self {
        self.state(vk::DynamicState::SCISSOR)
    }

    pub fn line_width(self) -> Self {
        self.state(vk::DynamicState::LINE_WIDTH)
    }

    pub fn depth_bias(self) -> Self {
        self.state(vk::DynamicState::DEPTH_BIAS)
    }

    pub fn blend_constants(self) -> Self {
        self.state(vk::DynamicState::BLEND_CONSTANTS)
    }

    pub fn depth_bounds(self) -> Self {
        self.state(vk::DynamicState::DEPTH_BOUNDS)
    }

    pub fn stencil_compare_mask(self) -> Self {
        self.state(vk::DynamicState::STENCIL_COMPARE_MASK)
    }

    pub fn stencil_write_mask(self) -> Self {
        self.state(vk::DynamicState::STENCIL_WRITE_MASK)
    }

    pub fn stencil_reference(self) -> Self {
        self.state(vk::DynamicState::STENCIL_REFERENCE)
    }

    pub fn clear(self) -> Self {
        self.root.session().dynamic().states.clear();
        self
    }

    pub fn build_pipeline_dynamic_state(&mut self) -> DynamicState {
        self.root.session().dynamic().build_pipeline_dynamic_state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for DynamicStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
