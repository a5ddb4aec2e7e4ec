use super::{GraphicsPipelineBuilder, StageBuilder};
use crate::{Device, PipelineResult};
use ash::vk;

/// Descriptor set layouts and push constant ranges of the pipeline layout.
#[derive(Debug, Clone, Default)]
pub(crate) struct PipelineLayoutStage {
    set_layouts: Vec<vk::DescriptorSetLayout>,
    push_constant_ranges: Vec<vk::PushConstantRange>,
}

impl PipelineLayoutStage {
    pub(crate) fn build_pipeline_layout(
        &self,
        device: &dyn Device,
    ) -> PipelineResult<vk::PipelineLayout> {
        device.create_pipeline_layout(&self.set_layouts, &self.push_constant_ranges)
    }
}

/// Describes the pipeline layout created with the pipeline.
///
/// ```ignore
/// builder
///     .layout()
///     .add_descriptor_set_layout(descriptor_set_layout)
///     .add_push_constant_range(vk::ShaderStageFlags::VERTEX, 0, 64);
/// ```
pub struct PipelineLayoutBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> PipelineLayoutBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().layout();
        Self { root }
    }

    fn stage(&mut self) -> &mut PipelineLayoutStage {
        self.root.session().layout()
    }

    pub fn add_descriptor_set_layout(mut self, layout: vk::DescriptorSetLayout) -> Self {
        self.stage().set_layouts.push(layout);
        self
    }

    pub fn add_descriptor_set_layouts(mut self, layouts: &[vk::DescriptorSetLayout]) -> Self {
        self.stage().set_layouts.extend_from_slice(layouts);
        self
    }

    /// Add a push constant range.
    ///
    /// # Arguments
    ///
    /// * `stage_flags` - The stages reading the range.
    /// * `offset` - The range offset in bytes.
    /// * `size` - The range size in bytes.
    pub fn add_push_constant_range(
        self,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        size: u32,
    ) -> Self {
        self.add_push_constant(vk::PushConstantRange {
            stage_flags,
            offset,
            size,
        })
    }

    pub fn add_push_constant(mut self, range: vk::PushConstantRange) -> Self {
        self.stage().push_constant_ranges.push(range);
        self
    }

    pub fn clear(mut self) -> Self {
        *self.stage() = PipelineLayoutStage::default();
        self
    }

    pub fn clear_ranges(mut self) -> Self {
        self.stage().push_constant_ranges.clear();
        self
    }

    pub fn clear_layouts(mut self) -> Self {
        self.stage().set_layouts.clear();
        self
    }

    /// Create a pipeline layout from the current configuration.
    ///
    /// The caller owns the returned layout.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If the device fails to create the layout.
    ///
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn build_pipeline_layout(&mut self) -> PipelineResult<vk::PipelineLayout> {
        let device = self.root.device();
        self.stage().build_pipeline_layout(device)
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for PipelineLayoutBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
