use super::{GraphicsPipelineBuilder, RasterizationState, StageBuilder};
use ash::vk;

/// Sets the rasterization state.
///
/// Line widths other than 1.0, depth clamping and non solid polygon modes need device features
/// that are checked when the pipeline is created.
pub struct RasterizationStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> RasterizationStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().rasterization();
        Self { root }
    }

    fn state(&mut self) -> &mut RasterizationState {
        self.root.session().rasterization()
    }

    pub fn enable_depth_clamp(mut self) -> Self {
        self.state().depth_clamp_enable = true;
        self
    }

    pub fn disable_depth_clamp(mut self) -> Self {
        self.state().depth_clamp_enable = false;
        self
    }

    pub fn enable_rasterizer_discard(mut self) -> Self {
        self.state().rasterizer_discard_enable = true;
        self
    }

    pub fn disable_rasterizer_discard(mut self) -> Self {
        self.state().rasterizer_discard_enable = false;
        self
    }

    pub fn polygon_mode(mut self, mode: vk::PolygonMode) -> Self {
        self.state().polygon_mode = mode;
        self
    }

    pub fn polygon_mode_fill(self) -> Self {
        self.polygon_mode(vk::PolygonMode::FILL)
    }

    pub fn polygon_mode_line(self) -> Self {
        self.polygon_mode(vk::PolygonMode::LINE)
    }

    pub fn polygon_mode_point(self) -> Self {
        self.polygon_mode(vk::PolygonMode::POINT)
    }

    pub fn cull_mode(mut self, mode: vk::CullModeFlags) -> Self {
        self.state().cull_mode = mode;
        self
    }

    pub fn cull_none(self) -> Self {
        self.cull_mode(vk::CullModeFlags::NONE)
    }

    pub fn cull_front_face(self) -> Self {
        self.cull_mode(vk::CullModeFlags::FRONT)
    }

    pub fn cull_back_face(self) -> Self {
        self.cull_mode(vk::CullModeFlags::BACK)
    }

    pub fn cull_front_and_back_face(self) -> Self {
        self.cull_mode(vk::CullModeFlags::FRONT_AND_BACK)
    }

    pub fn front_face(mut self, front_face: vk::FrontFace) -> Self {
        self.state().front_face = front_face;
        self
    }

    pub fn front_face_counter_clockwise(self) -> Self {
        self.front_face(vk::FrontFace::COUNTER_CLOCKWISE)
    }

    pub fn front_face_clockwise(self) -> Self {
        self.front_face(vk::FrontFace::CLOCKWISE)
    }

    pub fn enable_depth_bias(mut self) -> Self {
        self.state().depth_bias_enable = true;
        self
    }

    pub fn disable_depth_bias(mut self) -> Self {
        self.state().depth_bias_enable = false;
        self
    }

    pub fn depth_bias_constant_factor(mut self, factor: f32) -> Self {
        self.state().depth_bias_constant_factor = factor;
        self
    }

    pub fn depth_bias_clamp(mut self, clamp: f32) -> Self {
        self.state().depth_bias_clamp = clamp;
        self
    }

    pub fn depth_bias_slope_factor(mut self, factor: f32) -> Self {
        self.state().depth_bias_slope_factor = factor;
        self
    }

    pub fn line_width(mut self, width: f32) -> Self {
        self.state().line_width = width;
        self
    }

    pub fn build_rasterization_state(&mut self) -> RasterizationState {
        *self.state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for RasterizationStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
