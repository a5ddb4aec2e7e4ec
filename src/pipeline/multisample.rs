use super::{GraphicsPipelineBuilder, MultisampleState, StageBuilder};
use ash::vk;

/// Sets the multisample state. Defaults to one sample per pixel.
pub struct MultisampleStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> MultisampleStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().multisample();
        Self { root }
    }

    fn state(&mut self) -> &mut MultisampleState {
        self.root.session().multisample()
    }

    pub fn rasterization_samples(mut self, samples: vk::SampleCountFlags) -> Self {
        self.state().rasterization_samples = samples;
        self
    }

    /// Enable sample shading with the minimum fraction of samples to shade.
    pub fn enable_sample_shading(mut self, min_sample_shading: f32) -> Self {
        let state = self.state();
        state.sample_shading_enable = true;
        state.min_sample_shading = min_sample_shading;
        self
    }

    pub fn disable_sample_shading(mut self) -> Self {
        self.state().sample_shading_enable = false;
        self
    }

    /// Set the sample mask, one word per 32 samples. An empty mask disables it.
    pub fn sample_mask(mut self, mask: &[vk::SampleMask]) -> Self {
        self.state().sample_mask = mask.to_vec();
        self
    }

    pub fn enable_alpha_to_coverage(mut self) -> Self {
        self.state().alpha_to_coverage_enable = true;
        self
    }

    pub fn disable_alpha_to_coverage(mut self) -> Self {
        self.state().alpha_to_coverage_enable = false;
        self
    }

    pub fn enable_alpha_to_one(mut self) -> Self {
        self.state().alpha_to_one_enable = true;
        self
    }

    pub fn disable_alpha_to_one(mut self) -> Self {
        self.state().alpha_to_one_enable = false;
        self
    }

    pub fn build_multisample_state(&mut self) -> MultisampleState {
        self.state().clone()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for MultisampleStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
