//! Plain data snapshot of a graphics pipeline.
//!
//! These types are what the stage builders finalize into and what a [`Device`] receives when
//! asked to create a pipeline. They hold no raw pointers so they can be cloned, inspected and
//! sent across threads; the native create-info structs are only assembled by the device.
//!
//! [`Device`]: crate::Device

use ash::vk;
use std::ffi::CString;

/// Entry point used for every shader stage.
pub const DEFAULT_ENTRY_POINT: &str = "main";

/// One programmable stage of the pipeline.
#[derive(Debug, Clone)]
pub struct ShaderStageInfo {
    pub stage: vk::ShaderStageFlags,
    pub module: vk::ShaderModule,
    pub entry_point: CString,
}

#[derive(Debug, Clone, Default)]
pub struct VertexInputState {
    pub bindings: Vec<vk::VertexInputBindingDescription>,
    pub attributes: Vec<vk::VertexInputAttributeDescription>,
}

#[derive(Debug, Clone, Copy)]
pub struct InputAssemblyState {
    pub topology: vk::PrimitiveTopology,
    pub primitive_restart_enable: bool,
}

impl Default for InputAssemblyState {
    fn default() -> Self {
        Self {
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            primitive_restart_enable: false,
        }
    }
}

/// Tessellation state. The domain origin is chained to the native create info through
/// `VkPipelineTessellationDomainOriginStateCreateInfo`.
#[derive(Debug, Clone, Copy)]
pub struct TessellationState {
    pub patch_control_points: u32,
    pub domain_origin: vk::TessellationDomainOrigin,
}

impl Default for TessellationState {
    fn default() -> Self {
        Self {
            patch_control_points: 3,
            domain_origin: vk::TessellationDomainOrigin::UPPER_LEFT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    pub viewports: Vec<vk::Viewport>,
    pub scissors: Vec<vk::Rect2D>,
}

#[derive(Debug, Clone, Copy)]
pub struct RasterizationState {
    pub depth_clamp_enable: bool,
    pub rasterizer_discard_enable: bool,
    pub polygon_mode: vk::PolygonMode,
    pub cull_mode: vk::CullModeFlags,
    pub front_face: vk::FrontFace,
    pub depth_bias_enable: bool,
    pub depth_bias_constant_factor: f32,
    pub depth_bias_clamp: f32,
    pub depth_bias_slope_factor: f32,
    pub line_width: f32,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            depth_clamp_enable: false,
            rasterizer_discard_enable: false,
            polygon_mode: vk::PolygonMode::FILL,
            cull_mode: vk::CullModeFlags::NONE,
            front_face: vk::FrontFace::COUNTER_CLOCKWISE,
            depth_bias_enable: false,
            depth_bias_constant_factor: 0.0,
            depth_bias_clamp: 0.0,
            depth_bias_slope_factor: 0.0,
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MultisampleState {
    pub rasterization_samples: vk::SampleCountFlags,
    pub sample_shading_enable: bool,
    pub min_sample_shading: f32,
    /// Empty means no sample mask.
    pub sample_mask: Vec<vk::SampleMask>,
    pub alpha_to_coverage_enable: bool,
    pub alpha_to_one_enable: bool,
}

impl Default for MultisampleState {
    fn default() -> Self {
        Self {
            rasterization_samples: vk::SampleCountFlags::TYPE_1,
            sample_shading_enable: false,
            min_sample_shading: 1.0,
            sample_mask: Vec::new(),
            alpha_to_coverage_enable: false,
            alpha_to_one_enable: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DepthStencilState {
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: vk::CompareOp,
    pub depth_bounds_test_enable: bool,
    pub stencil_test_enable: bool,
    pub front: vk::StencilOpState,
    pub back: vk::StencilOpState,
    pub min_depth_bounds: f32,
    pub max_depth_bounds: f32,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_test_enable: false,
            depth_write_enable: false,
            depth_compare_op: vk::CompareOp::NEVER,
            depth_bounds_test_enable: false,
            stencil_test_enable: false,
            front: vk::StencilOpState::default(),
            back: vk::StencilOpState::default(),
            min_depth_bounds: 0.0,
            max_depth_bounds: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColorBlendState {
    pub logic_op_enable: bool,
    pub logic_op: vk::LogicOp,
    pub attachments: Vec<vk::PipelineColorBlendAttachmentState>,
    pub blend_constants: [f32; 4],
}

impl Default for ColorBlendState {
    fn default() -> Self {
        Self {
            logic_op_enable: false,
            logic_op: vk::LogicOp::COPY,
            attachments: Vec::new(),
            blend_constants: [0.0; 4],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DynamicState {
    pub states: Vec<vk::DynamicState>,
}

/// Attachment formats used in place of a render pass with `VK_KHR_dynamic_rendering`.
#[cfg(feature = "dynamic-rendering")]
#[derive(Debug, Clone, Default)]
pub struct RenderingFormats {
    pub color_attachment_formats: Vec<vk::Format>,
    pub depth_attachment_format: vk::Format,
    pub stencil_attachment_format: vk::Format,
}

/// One binding of a descriptor set layout.
#[derive(Debug, Clone)]
pub struct DescriptorSetLayoutBinding {
    pub binding: u32,
    pub descriptor_type: vk::DescriptorType,
    pub descriptor_count: u32,
    pub stage_flags: vk::ShaderStageFlags,
    pub immutable_samplers: Vec<vk::Sampler>,
}

impl DescriptorSetLayoutBinding {
    pub(crate) fn new(binding: u32) -> Self {
        Self {
            binding,
            descriptor_type: vk::DescriptorType::UNIFORM_BUFFER,
            descriptor_count: 0,
            stage_flags: vk::ShaderStageFlags::empty(),
            immutable_samplers: Vec::new(),
        }
    }
}

/// Everything needed to create one graphics pipeline.
#[derive(Debug, Clone)]
pub struct PipelineDescription {
    pub flags: vk::PipelineCreateFlags,
    pub stages: Vec<ShaderStageInfo>,
    pub vertex_input: VertexInputState,
    pub input_assembly: InputAssemblyState,
    pub tessellation: Option<TessellationState>,
    pub viewport: ViewportState,
    pub rasterization: RasterizationState,
    pub multisample: MultisampleState,
    pub depth_stencil: DepthStencilState,
    pub color_blend: ColorBlendState,
    /// `None` when no state is dynamic.
    pub dynamic: Option<DynamicState>,
    pub layout: vk::PipelineLayout,
    pub render_pass: vk::RenderPass,
    pub subpass: u32,
    pub base_pipeline_handle: vk::Pipeline,
    /// Always -1, base pipelines are referenced by handle.
    pub base_pipeline_index: i32,
    #[cfg(feature = "dynamic-rendering")]
    pub rendering: Option<RenderingFormats>,
}

impl PipelineDescription {
    /// Return the name of the first device feature required by this description that is not
    /// enabled in `features`.
    pub fn missing_feature(&self, features: &vk::PhysicalDeviceFeatures) -> Option<&'static str> {
        let disabled = |feature: vk::Bool32| feature == vk::FALSE;
        let dynamic_line_width = self
            .dynamic
            .as_ref()
            .map_or(false, |d| d.states.contains(&vk::DynamicState::LINE_WIDTH));
        let has_stage = |stage: vk::ShaderStageFlags| self.stages.iter().any(|s| s.stage == stage);

        if !dynamic_line_width
            && self.rasterization.line_width != 1.0
            && disabled(features.wide_lines)
        {
            return Some("wideLines");
        }
        if self.rasterization.depth_clamp_enable && disabled(features.depth_clamp) {
            return Some("depthClamp");
        }
        if self.rasterization.polygon_mode != vk::PolygonMode::FILL
            && disabled(features.fill_mode_non_solid)
        {
            return Some("fillModeNonSolid");
        }
        if self.depth_stencil.depth_bounds_test_enable && disabled(features.depth_bounds) {
            return Some("depthBounds");
        }
        if self.multisample.sample_shading_enable && disabled(features.sample_rate_shading) {
            return Some("sampleRateShading");
        }
        if self.multisample.alpha_to_one_enable && disabled(features.alpha_to_one) {
            return Some("alphaToOne");
        }
        if has_stage(vk::ShaderStageFlags::GEOMETRY) && disabled(features.geometry_shader) {
            return Some("geometryShader");
        }
        if (has_stage(vk::ShaderStageFlags::TESSELLATION_CONTROL)
            || has_stage(vk::ShaderStageFlags::TESSELLATION_EVALUATION))
            && disabled(features.tessellation_shader)
        {
            return Some("tessellationShader");
        }
        if self.color_blend.logic_op_enable && disabled(features.logic_op) {
            return Some("logicOp");
        }
        if self.color_blend.attachments.iter().any(uses_dual_source)
            && disabled(features.dual_src_blend)
        {
            return Some("dualSrcBlend");
        }
        None
    }
}

fn uses_dual_source(attachment: &vk::PipelineColorBlendAttachmentState) -> bool {
    const DUAL_SOURCE: [vk::BlendFactor; 4] = [
        vk::BlendFactor::SRC1_COLOR,
        vk::BlendFactor::ONE_MINUS_SRC1_COLOR,
        vk::BlendFactor::SRC1_ALPHA,
        vk::BlendFactor::ONE_MINUS_SRC1_ALPHA,
    ];
    attachment.blend_enable == vk::TRUE
        && [
            attachment.src_color_blend_factor,
            attachment.dst_color_blend_factor,
            attachment.src_alpha_blend_factor,
            attachment.dst_alpha_blend_factor,
        ]
        .iter()
        .any(|factor| DUAL_SOURCE.contains(factor))
}
