use super::{GraphicsPipelineBuilder, InputAssemblyState, StageBuilder};
use ash::vk;

/// Sets the primitive topology.
///
/// Defaults to a triangle list without primitive restart.
pub struct InputAssemblyStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> InputAssemblyStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().input_assembly();
        Self { root }
    }

    fn state(&mut self) -> &mut InputAssemblyState {
        self.root.session().input_assembly()
    }

    pub fn topology(mut self, topology: vk::PrimitiveTopology) -> Self {
        self.state().topology = topology;
        self
    }

    pub fn points(self) -> Self {
        self.topology(vk::PrimitiveTopology::POINT_LIST)
    }

    pub fn lines(self) -> Self {
        self.topology(vk::PrimitiveTopology::LINE_LIST)
    }

    pub fn line_strip(self) -> Self {
        self.topology(vk::PrimitiveTopology::LINE_STRIP)
    }

    pub fn triangles(self) -> Self {
        self.topology(vk::PrimitiveTopology::TRIANGLE_LIST)
    }

    pub fn triangle_strip(self) -> Self {
        self.topology(vk::PrimitiveTopology::TRIANGLE_STRIP)
    }

    pub fn triangle_fan(self) -> Self {
        self.topology(vk::PrimitiveTopology::TRIANGLE_FAN)
    }

    pub fn lines_with_adjacency(self) -> Self {
        self.topology(vk::PrimitiveTopology::LINE_LIST_WITH_ADJACENCY)
    }

    pub fn line_strip_with_adjacency(self) -> Self {
        self.topology(vk::PrimitiveTopology::LINE_STRIP_WITH_ADJACENCY)
    }

    pub fn triangles_with_adjacency(self) -> Self {
        self.topology(vk::PrimitiveTopology::TRIANGLE_LIST_WITH_ADJACENCY)
    }

    pub fn triangle_strip_with_adjacency(self) -> Self {
        self.topology(vk::PrimitiveTopology::TRIANGLE_STRIP_WITH_ADJACENCY)
    }

    /// Patch list, required by tessellation shaders.
    pub fn patches(self) -> Self {
        self.topology(vk::PrimitiveTopology::PATCH_LIST)
    }

    pub fn enable_primitive_restart(mut self) -> Self {
        self.state().primitive_restart_enable = true;
        self
    }

    pub fn disable_primitive_restart(mut self) -> Self {
        self.state().primitive_restart_enable = false;
        self
    }

    pub fn build_input_assembly_state(&mut self) -> InputAssemblyState {
        *self.state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for InputAssemblyStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
