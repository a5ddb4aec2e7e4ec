use super::{GraphicsPipelineBuilder, StageBuilder, TessellationState};
use ash::vk;

/// Sets the tessellation state.
///
/// The state is only part of the pipeline once this builder was reached.
pub struct TessellationStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> TessellationStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().tessellation();
        Self { root }
    }

    fn state(&mut self) -> &mut TessellationState {
        self.root.session().tessellation()
    }

    pub fn patch_control_points(mut self, count: u32) -> Self {
        self.state().patch_control_points = count;
        self
    }

    /// Origin of the tessellation domain. [`vk::TessellationDomainOrigin::LOWER_LEFT`] flips
    /// the V coordinate seen by the evaluation shader.
    pub fn domain_origin(mut self, origin: vk::TessellationDomainOrigin) -> Self {
        self.state().domain_origin = origin;
        self
    }

    pub fn clear(mut self) -> Self {
        *self.state() = TessellationState::default();
        self
    }

    pub fn build_tessellation_state(&mut self) -> TessellationState {
        *self.state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for TessellationStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
