use super::{GraphicsPipelineBuilder, StageBuilder, VertexInputState};
use crate::{PipelineError, PipelineResult};
use ash::vk;

impl VertexInputState {
    /// Check that there are bindings and attributes and that every binding is read by at least
    /// one attribute.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.bindings.is_empty() {
            return Err(PipelineError::NoBindings);
        }
        if self.attributes.is_empty() {
            return Err(PipelineError::NoAttributes);
        }
        if let Some(unbound) = self.bindings.iter().find(|binding| {
            !self
                .attributes
                .iter()
                .any(|attribute| attribute.binding == binding.binding)
        }) {
            return Err(PipelineError::UnboundAttribute(unbound.binding));
        }
        Ok(())
    }

    pub fn build_vertex_input_state(&self) -> PipelineResult<VertexInputState> {
        self.validate()?;
        Ok(self.clone())
    }
}

/// Describes the vertex buffers read by the pipeline.
pub struct VertexInputStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> VertexInputStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        Self { root }
    }

    fn state(&mut self) -> &mut VertexInputState {
        self.root.session().vertex_input()
    }

    /// Add a vertex buffer binding.
    ///
    /// # Arguments
    ///
    /// * `binding` - The binding index.
    /// * `stride` - The distance in bytes between two consecutive elements.
    /// * `input_rate` - Whether elements are read per vertex or per instance.
    pub fn add_vertex_binding_description(
        self,
        binding: u32,
        stride: u32,
        input_rate: vk::VertexInputRate,
    ) -> Self {
        self.add_vertex_binding(vk::VertexInputBindingDescription {
            binding,
            stride,
            input_rate,
        })
    }

    pub fn add_vertex_binding(mut self, binding: vk::VertexInputBindingDescription) -> Self {
        self.state().bindings.push(binding);
        self
    }

    /// Add a vertex attribute.
    ///
    /// # Arguments
    ///
    /// * `location` - The shader input location.
    /// * `binding` - The binding the attribute is read from.
    /// * `format` - The attribute format.
    /// * `offset` - The byte offset of the attribute in one element.
    pub fn add_vertex_attribute_description(
        self,
        location: u32,
        binding: u32,
        format: vk::Format,
        offset: u32,
    ) -> Self {
        self.add_vertex_attribute(vk::VertexInputAttributeDescription {
            location,
            binding,
            format,
            offset,
        })
    }

    pub fn add_vertex_attribute(mut self, attribute: vk::VertexInputAttributeDescription) -> Self {
        self.state().attributes.push(attribute);
        self
    }

    /// Remove every binding and attribute.
    pub fn clear(mut self) -> Self {
        *self.state() = VertexInputState::default();
        self
    }

    pub fn validate(&self) -> PipelineResult<()> {
        self.root.session.vertex_input.validate()
    }

    pub fn build_vertex_input_state(&self) -> PipelineResult<VertexInputState> {
        self.root.session.vertex_input.build_vertex_input_state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for VertexInputStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
