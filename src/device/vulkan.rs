//! Vulkan device.
//!
//! [`Device`] implementation on top of Ash, and the assembly of a [`PipelineDescription`]
//! into the native `vk::GraphicsPipelineCreateInfo`.
//!
//! [`Device`]: trait.Device.html

use super::Device;
use crate::{DescriptorSetLayoutBinding, PipelineDescription, PipelineError, PipelineResult};
use ash::{extensions::ext::DebugUtils, vk};
use std::ffi::CString;

/// Ash backed device.
///
/// Holds the set of features enabled on the logical device so unsupported configurations are
/// reported as [`PipelineError::UnsupportedFeature`] instead of reaching the driver.
pub struct VulkanDevice {
    device: ash::Device,
    enabled_features: vk::PhysicalDeviceFeatures,
    debug_utils: Option<DebugUtils>,
}

impl VulkanDevice {
    /// Wrap a logical device.
    ///
    /// # Arguments
    ///
    /// * `device` - The Vulkan logical device.
    /// * `enabled_features` - The features the device was created with.
    pub fn new(device: ash::Device, enabled_features: vk::PhysicalDeviceFeatures) -> Self {
        Self {
            device,
            enabled_features,
            debug_utils: None,
        }
    }

    /// Use `VK_EXT_debug_utils` to name created objects.
    pub fn with_debug_utils(mut self, debug_utils: DebugUtils) -> Self {
        self.debug_utils = Some(debug_utils);
        self
    }

    /// Return a reference to the Ash device.
    pub fn raw(&self) -> &ash::Device {
        &self.device
    }

    pub fn enabled_features(&self) -> &vk::PhysicalDeviceFeatures {
        &self.enabled_features
    }
}

impl Device for VulkanDevice {
    fn create_shader_module(&self, code: &[u32]) -> PipelineResult<vk::ShaderModule> {
        log::debug!("Creating vulkan shader module");
        let create_info = vk::ShaderModuleCreateInfo::builder().code(code);
        unsafe { Ok(self.device.create_shader_module(&create_info, None)?) }
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        log::debug!("Destroying vulkan shader module");
        unsafe { self.device.destroy_shader_module(module, None) };
    }

    fn create_descriptor_set_layout(
        &self,
        bindings: &[DescriptorSetLayoutBinding],
        flags: vk::DescriptorSetLayoutCreateFlags,
    ) -> PipelineResult<vk::DescriptorSetLayout> {
        log::debug!("Creating vulkan descriptor set layout");
        let vk_bindings = bindings
            .iter()
            .map(|binding| {
                let mut builder = vk::DescriptorSetLayoutBinding::builder();
                if !binding.immutable_samplers.is_empty() {
                    builder = builder.immutable_samplers(&binding.immutable_samplers);
                }
                builder
                    .binding(binding.binding)
                    .descriptor_type(binding.descriptor_type)
                    .descriptor_count(binding.descriptor_count)
                    .stage_flags(binding.stage_flags)
                    .build()
            })
            .collect::<Vec<_>>();

        let create_info = vk::DescriptorSetLayoutCreateInfo::builder()
            .flags(flags)
            .bindings(&vk_bindings);

        unsafe { Ok(self.device.create_descriptor_set_layout(&create_info, None)?) }
    }

    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) {
        log::debug!("Destroying vulkan descriptor set layout");
        unsafe { self.device.destroy_descriptor_set_layout(layout, None) };
    }

    fn create_pipeline_layout(
        &self,
        set_layouts: &[vk::DescriptorSetLayout],
        push_constant_ranges: &[vk::PushConstantRange],
    ) -> PipelineResult<vk::PipelineLayout> {
        log::debug!("Creating vulkan pipeline layout");
        let layout_info = vk::PipelineLayoutCreateInfo::builder()
            .set_layouts(set_layouts)
            .push_constant_ranges(push_constant_ranges);
        let pipeline_layout = unsafe { self.device.create_pipeline_layout(&layout_info, None)? };
        Ok(pipeline_layout)
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        log::debug!("Destroying vulkan pipeline layout");
        unsafe { self.device.destroy_pipeline_layout(layout, None) };
    }

    fn create_graphics_pipeline(
        &self,
        description: &PipelineDescription,
        cache: vk::PipelineCache,
    ) -> PipelineResult<vk::Pipeline> {
        if let Some(feature) = description.missing_feature(&self.enabled_features) {
            return Err(PipelineError::UnsupportedFeature(feature.to_owned()));
        }

        log::debug!("Creating vulkan graphics pipeline");
        with_graphics_pipeline_create_info(description, |pipeline_info| {
            let pipeline = unsafe {
                self.device
                    .create_graphics_pipelines(cache, std::slice::from_ref(pipeline_info), None)
                    .map_err(|e| e.1)?[0]
            };
            Ok(pipeline)
        })
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        log::debug!("Destroying vulkan pipeline");
        unsafe { self.device.destroy_pipeline(pipeline, None) };
    }

    fn set_debug_name(&self, object_type: vk::ObjectType, handle: u64, name: &str) {
        let debug_utils = match &self.debug_utils {
            Some(debug_utils) => debug_utils,
            None => {
                log::warn!("Cannot name {:?} '{}': debug utils not loaded", object_type, name);
                return;
            }
        };
        let name = match CString::new(name) {
            Ok(name) => name,
            Err(_) => {
                log::warn!("Debug name '{}' contains a nul byte", name.escape_debug());
                return;
            }
        };

        let name_info = vk::DebugUtilsObjectNameInfoEXT::builder()
            .object_type(object_type)
            .object_handle(handle)
            .object_name(&name);
        let result = unsafe {
            debug_utils.set_debug_utils_object_name(self.device.handle(), &name_info)
        };
        if let Err(err) = result {
            log::warn!("Failed to name {:?}: {}", object_type, err);
        }
    }
}

/// Assemble the native create info for `description` and pass it to `f`.
///
/// The create info points into locals of this function so it is only valid inside `f`.
pub(crate) fn with_graphics_pipeline_create_info<R, F>(description: &PipelineDescription, f: F) -> R
where
    F: FnOnce(&vk::GraphicsPipelineCreateInfo) -> R,
{
    let shader_states_infos = description
        .stages
        .iter()
        .map(|stage| {
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(stage.stage)
                .module(stage.module)
                .name(&stage.entry_point)
                .build()
        })
        .collect::<Vec<_>>();

    let vertex_input_info = vk::PipelineVertexInputStateCreateInfo::builder()
        .vertex_binding_descriptions(&description.vertex_input.bindings)
        .vertex_attribute_descriptions(&description.vertex_input.attributes);

    let input_assembly_info = vk::PipelineInputAssemblyStateCreateInfo::builder()
        .topology(description.input_assembly.topology)
        .primitive_restart_enable(description.input_assembly.primitive_restart_enable);

    let mut domain_origin_info = vk::PipelineTessellationDomainOriginStateCreateInfo::builder()
        .domain_origin(
            description
                .tessellation
                .map_or(vk::TessellationDomainOrigin::UPPER_LEFT, |t| t.domain_origin),
        )
        .build();
    let tessellation_info = description.tessellation.map(|tessellation| {
        vk::PipelineTessellationStateCreateInfo::builder()
            .patch_control_points(tessellation.patch_control_points)
            .push_next(&mut domain_origin_info)
            .build()
    });

    let viewport_info = vk::PipelineViewportStateCreateInfo::builder()
        .viewports(&description.viewport.viewports)
        .scissors(&description.viewport.scissors);

    let raster = &description.rasterization;
    let rasterizer_info = vk::PipelineRasterizationStateCreateInfo::builder()
        .depth_clamp_enable(raster.depth_clamp_enable)
        .rasterizer_discard_enable(raster.rasterizer_discard_enable)
        .polygon_mode(raster.polygon_mode)
        .line_width(raster.line_width)
        .cull_mode(raster.cull_mode)
        .front_face(raster.front_face)
        .depth_bias_enable(raster.depth_bias_enable)
        .depth_bias_constant_factor(raster.depth_bias_constant_factor)
        .depth_bias_clamp(raster.depth_bias_clamp)
        .depth_bias_slope_factor(raster.depth_bias_slope_factor);

    let multisample = &description.multisample;
    let mut multisampling_info = vk::PipelineMultisampleStateCreateInfo::builder()
        .sample_shading_enable(multisample.sample_shading_enable)
        .rasterization_samples(multisample.rasterization_samples)
        .min_sample_shading(multisample.min_sample_shading)
        .alpha_to_coverage_enable(multisample.alpha_to_coverage_enable)
        .alpha_to_one_enable(multisample.alpha_to_one_enable);
    if !multisample.sample_mask.is_empty() {
        multisampling_info = multisampling_info.sample_mask(&multisample.sample_mask);
    }

    let depth_stencil = &description.depth_stencil;
    let depth_stencil_state_create_info = vk::PipelineDepthStencilStateCreateInfo::builder()
        .depth_test_enable(depth_stencil.depth_test_enable)
        .depth_write_enable(depth_stencil.depth_write_enable)
        .depth_compare_op(depth_stencil.depth_compare_op)
        .depth_bounds_test_enable(depth_stencil.depth_bounds_test_enable)
        .stencil_test_enable(depth_stencil.stencil_test_enable)
        .front(depth_stencil.front)
        .back(depth_stencil.back)
        .min_depth_bounds(depth_stencil.min_depth_bounds)
        .max_depth_bounds(depth_stencil.max_depth_bounds);

    let color_blend = &description.color_blend;
    let color_blending_info = vk::PipelineColorBlendStateCreateInfo::builder()
        .logic_op_enable(color_blend.logic_op_enable)
        .logic_op(color_blend.logic_op)
        .attachments(&color_blend.attachments)
        .blend_constants(color_blend.blend_constants);

    let dynamic_states_info = description.dynamic.as_ref().map(|dynamic| {
        vk::PipelineDynamicStateCreateInfo::builder()
            .dynamic_states(&dynamic.states)
            .build()
    });

    #[cfg(feature = "dynamic-rendering")]
    let mut rendering_info = description.rendering.as_ref().map(|rendering| {
        vk::PipelineRenderingCreateInfo::builder()
            .color_attachment_formats(&rendering.color_attachment_formats)
            .depth_attachment_format(rendering.depth_attachment_format)
            .stencil_attachment_format(rendering.stencil_attachment_format)
            .build()
    });

    let mut pipeline_info = vk::GraphicsPipelineCreateInfo::builder()
        .flags(description.flags)
        .stages(&shader_states_infos)
        .vertex_input_state(&vertex_input_info)
        .input_assembly_state(&input_assembly_info)
        .rasterization_state(&rasterizer_info)
        .viewport_state(&viewport_info)
        .multisample_state(&multisampling_info)
        .color_blend_state(&color_blending_info)
        .depth_stencil_state(&depth_stencil_state_create_info)
        .layout(description.layout)
        .render_pass(description.render_pass)
        .subpass(description.subpass)
        .base_pipeline_handle(description.base_pipeline_handle)
        .base_pipeline_index(description.base_pipeline_index);

    if let Some(tessellation_info) = &tessellation_info {
        pipeline_info = pipeline_info.tessellation_state(tessellation_info);
    }
    if let Some(dynamic_states_info) = &dynamic_states_info {
        pipeline_info = pipeline_info.dynamic_state(dynamic_states_info);
    }

    #[cfg(feature = "dynamic-rendering")]
    let pipeline_info = match rendering_info.as_mut() {
        Some(rendering_info) => pipeline_info.push_next(rendering_info),
        None => pipeline_info,
    };

    f(&*pipeline_info)
}
