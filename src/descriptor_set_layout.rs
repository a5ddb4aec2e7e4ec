use crate::{DescriptorSetLayoutBinding, Device, PipelineError, PipelineResult};
use ash::vk::{self, Handle};
use std::collections::HashSet;

/// Builder for descriptor set layouts.
///
/// Independent from [`GraphicsPipelineBuilder`]; the created layouts are usually handed to
/// its pipeline layout stage.
///
/// ```ignore
/// let layout = device
///     .descriptor_set_layout_builder()
///     .binding(0)
///         .descriptor_type(vk::DescriptorType::UNIFORM_BUFFER)
///         .descriptor_count(1)
///         .shader_stages(vk::ShaderStageFlags::VERTEX)
///     .binding(1)
///         .descriptor_type(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
///         .descriptor_count(1)
///         .shader_stages(vk::ShaderStageFlags::FRAGMENT)
///     .name("material")
///     .create_layout()?;
/// ```
///
/// [`GraphicsPipelineBuilder`]: struct.GraphicsPipelineBuilder.html
pub struct DescriptorSetLayoutBuilder<'d> {
    device: &'d dyn Device,
    bindings: Vec<DescriptorSetLayoutBinding>,
    name: Option<String>,
}

impl<'d> DescriptorSetLayoutBuilder<'d> {
    pub fn new(device: &'d dyn Device) -> Self {
        Self {
            device,
            bindings: Vec::new(),
            name: None,
        }
    }

    /// Start describing binding `binding`.
    ///
    /// The binding starts as a uniform buffer with no descriptor, visible to no stage.
    pub fn binding(&mut self, binding: u32) -> DescriptorSetLayoutBindingBuilder<'_, 'd> {
        self.bindings.push(DescriptorSetLayoutBinding::new(binding));
        DescriptorSetLayoutBindingBuilder { builder: self }
    }

    /// Debug name given to the created layouts.
    pub fn name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn bindings(&self) -> &[DescriptorSetLayoutBinding] {
        &self.bindings
    }

    /// Remove every binding described so far.
    pub fn clear(&mut self) -> &mut Self {
        self.bindings.clear();
        self
    }

    /// Check that every binding has at least one descriptor and that no binding index is
    /// used twice.
    pub fn validate(&self) -> PipelineResult<()> {
        let mut seen = HashSet::new();
        for binding in &self.bindings {
            if binding.descriptor_count < 1 {
                return Err(PipelineError::InvalidBinding {
                    binding: binding.binding,
                    descriptor_count: binding.descriptor_count,
                });
            }
            if !seen.insert(binding.binding) {
                return Err(PipelineError::DuplicateBinding(binding.binding));
            }
        }
        Ok(())
    }

    pub fn create_layout(&mut self) -> PipelineResult<vk::DescriptorSetLayout> {
        self.create_layout_with_flags(vk::DescriptorSetLayoutCreateFlags::empty())
    }

    /// Create the descriptor set layout.
    ///
    /// The bindings are cleared once the layout is created so the builder can describe
    /// another one. They are also cleared when a binding is invalid, the whole layout has to
    /// be described again. The caller owns the returned layout.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If a binding is invalid. Nothing is created.
    /// * [`PipelineError`] - If the device fails to create the layout. The bindings are kept.
    ///
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn create_layout_with_flags(
        &mut self,
        flags: vk::DescriptorSetLayoutCreateFlags,
    ) -> PipelineResult<vk::DescriptorSetLayout> {
        if let Err(err) = self.validate() {
            log::warn!("Discarding descriptor set layout bindings: {}", err);
            self.bindings.clear();
            return Err(err);
        }

        let layout = self
            .device
            .create_descriptor_set_layout(&self.bindings, flags)?;
        self.bindings.clear();

        if let Some(name) = &self.name {
            self.device
                .set_debug_name(vk::ObjectType::DESCRIPTOR_SET_LAYOUT, layout.as_raw(), name);
        }

        Ok(layout)
    }
}

/// Describes one binding of a descriptor set layout.
pub struct DescriptorSetLayoutBindingBuilder<'b, 'd> {
    builder: &'b mut DescriptorSetLayoutBuilder<'d>,
}

impl<'b, 'd> DescriptorSetLayoutBindingBuilder<'b, 'd> {
    fn current(&mut self) -> &mut DescriptorSetLayoutBinding {
        let index = self.builder.bindings.len() - 1;
        &mut self.builder.bindings[index]
    }

    pub fn descriptor_count(mut self, count: u32) -> Self {
        self.current().descriptor_count = count;
        self
    }

    pub fn descriptor_type(mut self, descriptor_type: vk::DescriptorType) -> Self {
        self.current().descriptor_type = descriptor_type;
        self
    }

    pub fn shader_stages(mut self, stages: vk::ShaderStageFlags) -> Self {
        self.current().stage_flags = stages;
        self
    }

    /// Set the immutable samplers of the binding. The descriptor count becomes the number of
    /// samplers.
    pub fn immutable_samplers(mut self, samplers: &[vk::Sampler]) -> Self {
        let binding = self.current();
        binding.immutable_samplers = samplers.to_vec();
        binding.descriptor_count = samplers.len() as u32;
        self
    }

    /// Finish this binding and start describing binding `binding`.
    pub fn binding(self, binding: u32) -> Self {
        let builder = self.builder;
        builder.binding(binding)
    }

    pub fn name<S: Into<String>>(self, name: S) -> Self {
        self.builder.name(name);
        self
    }

    pub fn create_layout(self) -> PipelineResult<vk::DescriptorSetLayout> {
        self.builder.create_layout()
    }

    pub fn create_layout_with_flags(
        self,
        flags: vk::DescriptorSetLayoutCreateFlags,
    ) -> PipelineResult<vk::DescriptorSetLayout> {
        self.builder.create_layout_with_flags(flags)
    }
}
