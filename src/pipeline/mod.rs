mod color_blend;
mod depth_stencil;
pub(crate) mod description;
mod dynamic_state;
mod fragments;
mod input_assembly;
mod layout;
mod multisample;
mod rasterization;
mod shader_stage;
mod tessellation;
mod vertex_input;
mod viewport;

pub use self::{
    color_blend::*, depth_stencil::*, description::*, dynamic_state::*, fragments::*,
    input_assembly::*, layout::*, multisample::*, rasterization::*, shader_stage::*,
    tessellation::*, vertex_input::*, viewport::*,
};

use crate::{Device, PipelineError, PipelineResult};
use ash::vk::{self, Handle};

/// Fluent builder for graphics pipelines.
///
/// The builder owns one configuration session: a set of stage builders, each responsible for
/// one sub-state of the pipeline. Stage builders are reached with the navigation accessors
/// ([`shader_stage`], [`vertex_input_state`], [`color_blend_state`], ...) which are available
/// on the root and, through the [`StageBuilder`] trait, on every stage builder so a single call
/// chain can move from one stage to the next.
///
/// Navigating commits pending entries of multi-entry stages (viewports, scissors and color
/// blend attachments), see [`ViewportBuilder`] and [`ColorBlendAttachmentStateBuilder`].
///
/// [`build`] can be called any number of times. Stages that are not reconfigured between two
/// calls keep their configuration, which is how pipeline variants and derivatives are made.
///
/// # Example
///
/// ```ignore
/// let pipeline = device
///     .graphics_pipeline_builder()
///     .allow_derivatives()
///     .shader_stage()
///         .vertex_shader("shader.vert.spv")?
///         .fragment_shader("shader.frag.spv")?
///     .vertex_input_state()
///         .add_vertex_binding_description(0, 32, vk::VertexInputRate::VERTEX)
///         .add_vertex_attribute_description(0, 0, vk::Format::R32G32B32_SFLOAT, 0)
///     .viewport_state()
///         .viewport()
///             .origin(0.0, 0.0)
///             .extent(extent)
///         .scissor()
///             .extent(extent.width, extent.height)
///             .add()?
///     .color_blend_state()
///         .attachment()
///         .add()
///     .render_pass(render_pass)
///     .build()?;
/// ```
///
/// [`shader_stage`]: #method.shader_stage
/// [`vertex_input_state`]: #method.vertex_input_state
/// [`color_blend_state`]: #method.color_blend_state
/// [`build`]: #method.build
/// [`StageBuilder`]: trait.StageBuilder.html
/// [`ViewportBuilder`]: struct.ViewportBuilder.html
/// [`ColorBlendAttachmentStateBuilder`]: struct.ColorBlendAttachmentStateBuilder.html
pub struct GraphicsPipelineBuilder<'d> {
    device: &'d dyn Device,
    session: PipelineSession,
    flags: vk::PipelineCreateFlags,
    base_pipeline: vk::Pipeline,
    render_pass: vk::RenderPass,
    subpass: u32,
    pipeline_layout: Option<vk::PipelineLayout>,
    pipeline_cache: vk::PipelineCache,
    name: Option<String>,
    #[cfg(feature = "dynamic-rendering")]
    rendering: Option<RenderingFormats>,
    destroyed: bool,
}

/// The stage states of one configuration session.
///
/// Shader stages and vertex input are needed by every pipeline and exist from the start, the
/// other stages are created the first time they are navigated to.
#[derive(Default)]
pub(crate) struct PipelineSession {
    shader_stage: ShaderStages,
    vertex_input: VertexInputState,
    input_assembly: Option<InputAssemblyState>,
    tessellation: Option<TessellationState>,
    viewport: Option<ViewportStage>,
    rasterization: Option<RasterizationState>,
    multisample: Option<MultisampleState>,
    depth_stencil: Option<DepthStencilState>,
    color_blend: Option<ColorBlendStage>,
    dynamic: Option<DynamicState>,
    layout: Option<PipelineLayoutStage>,
}

impl PipelineSession {
    /// Commit pending scratchpads. Called by every navigation accessor.
    pub(crate) fn checkpoint(&mut self) {
        if let Some(viewport) = self.viewport.as_mut() {
            viewport.checkpoint();
        }
        if let Some(color_blend) = self.color_blend.as_mut() {
            color_blend.checkpoint();
        }
    }

    pub(crate) fn shader_stage(&mut self) -> &mut ShaderStages {
        &mut self.shader_stage
    }

    pub(crate) fn vertex_input(&mut self) -> &mut VertexInputState {
        &mut self.vertex_input
    }

    pub(crate) fn input_assembly(&mut self) -> &mut InputAssemblyState {
        self.input_assembly.get_or_insert_with(Default::default)
    }

    pub(crate) fn tessellation(&mut self) -> &mut TessellationState {
        self.tessellation.get_or_insert_with(Default::default)
    }

    pub(crate) fn viewport(&mut self) -> &mut ViewportStage {
        self.viewport.get_or_insert_with(Default::default)
    }

    pub(crate) fn rasterization(&mut self) -> &mut RasterizationState {
        self.rasterization.get_or_insert_with(Default::default)
    }

    pub(crate) fn multisample(&mut self) -> &mut MultisampleState {
        self.multisample.get_or_insert_with(Default::default)
    }

    pub(crate) fn depth_stencil(&mut self) -> &mut DepthStencilState {
        self.depth_stencil.get_or_insert_with(Default::default)
    }

    pub(crate) fn color_blend(&mut self) -> &mut ColorBlendStage {
        self.color_blend.get_or_insert_with(Default::default)
    }

    pub(crate) fn dynamic(&mut self) -> &mut DynamicState {
        self.dynamic.get_or_insert_with(Default::default)
    }

    pub(crate) fn layout(&mut self) -> &mut PipelineLayoutStage {
        self.layout.get_or_insert_with(Default::default)
    }
}

impl<'d> GraphicsPipelineBuilder<'d> {
    /// Start a new configuration session.
    pub fn new(device: &'d dyn Device) -> Self {
        Self {
            device,
            session: PipelineSession::default(),
            flags: vk::PipelineCreateFlags::empty(),
            base_pipeline: vk::Pipeline::null(),
            render_pass: vk::RenderPass::null(),
            subpass: 0,
            pipeline_layout: None,
            pipeline_cache: vk::PipelineCache::null(),
            name: None,
            #[cfg(feature = "dynamic-rendering")]
            rendering: None,
            destroyed: false,
        }
    }

    pub(crate) fn device(&self) -> &'d dyn Device {
        self.device
    }

    pub(crate) fn session(&mut self) -> &mut PipelineSession {
        &mut self.session
    }

    pub(crate) fn ensure_alive(&self) -> PipelineResult<()> {
        if self.destroyed {
            return Err(PipelineError::InvalidState(
                "the pipeline builder was destroyed",
            ));
        }
        Ok(())
    }

    /// Commit pending scratchpads before moving to another stage.
    fn navigate(&mut self) {
        if self.destroyed {
            log::warn!("Configuring a destroyed pipeline builder, the settings will not be used");
        }
        self.session.checkpoint();
    }

    pub fn shader_stage(&mut self) -> ShaderStageBuilder<'_, 'd> {
        self.navigate();
        ShaderStageBuilder::new(self)
    }

    pub fn vertex_input_state(&mut self) -> VertexInputStateBuilder<'_, 'd> {
        self.navigate();
        VertexInputStateBuilder::new(self)
    }

    pub fn input_assembly_state(&mut self) -> InputAssemblyStateBuilder<'_, 'd> {
        self.navigate();
        InputAssemblyStateBuilder::new(self)
    }

    pub fn tessellation_state(&mut self) -> TessellationStateBuilder<'_, 'd> {
        self.navigate();
        TessellationStateBuilder::new(self)
    }

    pub fn viewport_state(&mut self) -> ViewportStateBuilder<'_, 'd> {
        self.navigate();
        ViewportStateBuilder::new(self)
    }

    pub fn rasterization_state(&mut self) -> RasterizationStateBuilder<'_, 'd> {
        self.navigate();
        RasterizationStateBuilder::new(self)
    }

    pub fn multisample_state(&mut self) -> MultisampleStateBuilder<'_, 'd> {
        self.navigate();
        MultisampleStateBuilder::new(self)
    }

    pub fn depth_stencil_state(&mut self) -> DepthStencilStateBuilder<'_, 'd> {
        self.navigate();
        DepthStencilStateBuilder::new(self)
    }

    pub fn color_blend_state(&mut self) -> ColorBlendStateBuilder<'_, 'd> {
        self.navigate();
        ColorBlendStateBuilder::new(self)
    }

    pub fn dynamic_state(&mut self) -> DynamicStateBuilder<'_, 'd> {
        self.navigate();
        DynamicStateBuilder::new(self)
    }

    /// Configure the pipeline layout the builder creates.
    ///
    /// Ignored when a layout is supplied with [`pipeline_layout`].
    ///
    /// [`pipeline_layout`]: #method.pipeline_layout
    pub fn layout(&mut self) -> PipelineLayoutBuilder<'_, 'd> {
        self.navigate();
        PipelineLayoutBuilder::new(self)
    }

    /// Mark the pipeline as a possible base for derivatives.
    pub fn allow_derivatives(&mut self) -> &mut Self {
        self.flags = (self.flags & !vk::PipelineCreateFlags::DERIVATIVE)
            | vk::PipelineCreateFlags::ALLOW_DERIVATIVES;
        self
    }

    /// Mark the pipeline as derived from the one given to [`base_pipeline`].
    ///
    /// [`base_pipeline`]: #method.base_pipeline
    pub fn set_derivatives(&mut self) -> &mut Self {
        self.flags = (self.flags & !vk::PipelineCreateFlags::ALLOW_DERIVATIVES)
            | vk::PipelineCreateFlags::DERIVATIVE;
        self
    }

    /// Derive the next pipelines from `pipeline`.
    ///
    /// The pipeline is referenced by handle, the create info base index is always -1.
    pub fn base_pipeline(&mut self, pipeline: vk::Pipeline) -> &mut Self {
        self.base_pipeline = pipeline;
        self.set_derivatives()
    }

    pub fn subpass(&mut self, subpass: u32) -> &mut Self {
        self.subpass = subpass;
        self
    }

    pub fn render_pass(&mut self, render_pass: vk::RenderPass) -> &mut Self {
        self.render_pass = render_pass;
        self
    }

    /// Use an existing pipeline layout instead of creating one from [`layout`].
    ///
    /// The caller keeps ownership of the layout.
    ///
    /// [`layout`]: #method.layout
    pub fn pipeline_layout(&mut self, layout: vk::PipelineLayout) -> &mut Self {
        self.pipeline_layout = Some(layout);
        self
    }

    pub fn pipeline_cache(&mut self, cache: vk::PipelineCache) -> &mut Self {
        self.pipeline_cache = cache;
        self
    }

    /// Debug name given to the created pipelines.
    pub fn name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Target dynamic rendering with the given attachment formats instead of a render pass.
    #[cfg(feature = "dynamic-rendering")]
    pub fn rendering_formats(
        &mut self,
        color_attachment_formats: &[vk::Format],
        depth_attachment_format: vk::Format,
        stencil_attachment_format: vk::Format,
    ) -> &mut Self {
        self.rendering = Some(RenderingFormats {
            color_attachment_formats: color_attachment_formats.to_vec(),
            depth_attachment_format,
            stencil_attachment_format,
        });
        self
    }

    /// Clear the shader stages and the vertex input to build a sibling pipeline.
    ///
    /// Every other stage keeps its configuration.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If the method is call after [`destroy`] was called.
    ///
    /// [`destroy`]: #method.destroy
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn reuse(&mut self) -> PipelineResult<&mut Self> {
        self.ensure_alive()?;
        self.session.shader_stage.clear(self.device);
        self.session.vertex_input = VertexInputState::default();
        Ok(self)
    }

    /// Finalize every stage and return the resulting description.
    ///
    /// Stages that were never navigated to use their default state. The layout of the
    /// description is the one given to [`pipeline_layout`], or null when the builder will
    /// create it. No device call is made.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If any stage configuration is invalid.
    ///
    /// [`pipeline_layout`]: #method.pipeline_layout
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn description(&self) -> PipelineResult<PipelineDescription> {
        let session = &self.session;

        let stages = session.shader_stage.build_shader_stage()?;
        let vertex_input = session.vertex_input.build_vertex_input_state()?;
        let input_assembly = session.input_assembly.unwrap_or_default();
        let viewport = session
            .viewport
            .as_ref()
            .ok_or(PipelineError::NoViewports)?
            .build_viewport_state()?;
        let rasterization = session.rasterization.unwrap_or_default();
        let multisample = session.multisample.clone().unwrap_or_default();
        let depth_stencil = session.depth_stencil.unwrap_or_default();
        let color_blend = session
            .color_blend
            .as_ref()
            .map(ColorBlendStage::build_color_blend_state)
            .unwrap_or_default();
        let dynamic = session
            .dynamic
            .as_ref()
            .map(DynamicState::build_pipeline_dynamic_state)
            .filter(|dynamic| !dynamic.states.is_empty());

        let derivative = self.flags.contains(vk::PipelineCreateFlags::DERIVATIVE);
        if derivative && self.base_pipeline == vk::Pipeline::null() {
            return Err(PipelineError::InvalidState(
                "a derivative pipeline requires a base pipeline",
            ));
        }

        let tessellates = stages.iter().any(|stage| {
            stage.stage == vk::ShaderStageFlags::TESSELLATION_CONTROL
                || stage.stage == vk::ShaderStageFlags::TESSELLATION_EVALUATION
        });
        if tessellates && input_assembly.topology != vk::PrimitiveTopology::PATCH_LIST {
            log::warn!(
                "Tessellation shaders are set but topology is {:?}",
                input_assembly.topology
            );
        }
        let tessellation = if tessellates {
            Some(session.tessellation.unwrap_or_default())
        } else {
            session.tessellation
        };

        Ok(PipelineDescription {
            flags: self.flags,
            stages,
            vertex_input,
            input_assembly,
            tessellation,
            viewport,
            rasterization,
            multisample,
            depth_stencil,
            color_blend,
            dynamic,
            layout: self.pipeline_layout.unwrap_or_else(vk::PipelineLayout::null),
            render_pass: self.render_pass,
            subpass: self.subpass,
            base_pipeline_handle: if derivative {
                self.base_pipeline
            } else {
                vk::Pipeline::null()
            },
            base_pipeline_index: -1,
            #[cfg(feature = "dynamic-rendering")]
            rendering: self.rendering.clone(),
        })
    }

    /// Create the pipeline.
    ///
    /// Pending viewports, scissors and color blend attachments are committed first, then every
    /// stage is finalized and the pipeline is created. Unless a layout was supplied with
    /// [`pipeline_layout`], a new pipeline layout is created from [`layout`] and returned
    /// with the pipeline.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If any stage configuration is invalid. Nothing is created.
    /// * [`PipelineError`] - If the device fails to create the layout or the pipeline.
    /// * [`PipelineError`] - If the method is call after [`destroy`] was called.
    ///
    /// [`pipeline_layout`]: #method.pipeline_layout
    /// [`layout`]: #method.layout
    /// [`destroy`]: #method.destroy
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn build(&mut self) -> PipelineResult<GraphicsPipeline> {
        self.ensure_alive()?;
        self.session.checkpoint();

        let mut description = self.description()?;

        let (layout, owns_layout) = match self.pipeline_layout {
            Some(layout) => (layout, false),
            None => {
                let layout = match &self.session.layout {
                    Some(stage) => stage.build_pipeline_layout(self.device)?,
                    None => PipelineLayoutStage::default().build_pipeline_layout(self.device)?,
                };
                (layout, true)
            }
        };
        description.layout = layout;

        let pipeline = match self
            .device
            .create_graphics_pipeline(&description, self.pipeline_cache)
        {
            Ok(pipeline) => pipeline,
            Err(err) => {
                if owns_layout {
                    self.device.destroy_pipeline_layout(layout);
                }
                return Err(match err {
                    PipelineError::UnsupportedFeature(feature) => {
                        PipelineError::UnsupportedFeature(feature)
                    }
                    err => PipelineError::PipelineCreation(err.to_string()),
                });
            }
        };

        if let Some(name) = &self.name {
            self.device
                .set_debug_name(vk::ObjectType::PIPELINE, pipeline.as_raw(), name);
        }

        Ok(GraphicsPipeline {
            pipeline,
            layout,
            owns_layout,
        })
    }

    /// Release the shader modules held by the builder.
    ///
    /// Pipelines created by the builder are not affected. Called on drop if needed.
    /// Afterwards [`build`], [`reuse`] and the shader setters fail, the other setters are
    /// inert and log a warning when navigated to.
    ///
    /// [`build`]: #method.build
    /// [`reuse`]: #method.reuse
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If the method is call after [`destroy`] was called.
    ///
    /// [`destroy`]: #method.destroy
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn destroy(&mut self) -> PipelineResult<()> {
        self.ensure_alive()?;
        self.session.shader_stage.clear(self.device);
        self.destroyed = true;
        Ok(())
    }
}

impl Drop for GraphicsPipelineBuilder<'_> {
    fn drop(&mut self) {
        if !self.destroyed {
            self.session.shader_stage.clear(self.device);
        }
    }
}

/// Navigation shared by every stage builder.
///
/// Each method commits pending scratchpads and moves the call chain to another stage, or
/// forwards a pipeline wide setting to the root builder.
pub trait StageBuilder<'a, 'd: 'a>: Sized {
    /// Give back the root builder.
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d>;

    fn shader_stage(self) -> ShaderStageBuilder<'a, 'd> {
        self.root().shader_stage()
    }

    fn vertex_input_state(self) -> VertexInputStateBuilder<'a, 'd> {
        self.root().vertex_input_state()
    }

    fn input_assembly_state(self) -> InputAssemblyStateBuilder<'a, 'd> {
        self.root().input_assembly_state()
    }

    fn tessellation_state(self) -> TessellationStateBuilder<'a, 'd> {
        self.root().tessellation_state()
    }

    fn viewport_state(self) -> ViewportStateBuilder<'a, 'd> {
        self.root().viewport_state()
    }

    fn rasterization_state(self) -> RasterizationStateBuilder<'a, 'd> {
        self.root().rasterization_state()
    }

    fn multisample_state(self) -> MultisampleStateBuilder<'a, 'd> {
        self.root().multisample_state()
    }

    fn depth_stencil_state(self) -> DepthStencilStateBuilder<'a, 'd> {
        self.root().depth_stencil_state()
    }

    fn color_blend_state(self) -> ColorBlendStateBuilder<'a, 'd> {
        self.root().color_blend_state()
    }

    fn dynamic_state(self) -> DynamicStateBuilder<'a, 'd> {
        self.root().dynamic_state()
    }

    fn layout(self) -> PipelineLayoutBuilder<'a, 'd> {
        self.root().layout()
    }

    fn allow_derivatives(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().allow_derivatives()
    }

    fn set_derivatives(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().set_derivatives()
    }

    fn base_pipeline(self, pipeline: vk::Pipeline) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().base_pipeline(pipeline)
    }

    fn subpass(self, subpass: u32) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().subpass(subpass)
    }

    fn render_pass(self, render_pass: vk::RenderPass) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().render_pass(render_pass)
    }

    fn pipeline_layout(self, layout: vk::PipelineLayout) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().pipeline_layout(layout)
    }

    fn pipeline_cache(self, cache: vk::PipelineCache) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().pipeline_cache(cache)
    }

    fn name<S: Into<String>>(self, name: S) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root().name(name)
    }

    fn build(self) -> PipelineResult<GraphicsPipeline> {
        self.root().build()
    }
}

/// A created pipeline and the layout it was created with.
#[derive(Debug)]
pub struct GraphicsPipeline {
    pub pipeline: vk::Pipeline,
    pub layout: vk::PipelineLayout,
    owns_layout: bool,
}

impl GraphicsPipeline {
    /// Whether the layout was created by the builder and is destroyed with the pipeline.
    pub fn owns_layout(&self) -> bool {
        self.owns_layout
    }

    /// Destroy the pipeline, and its layout if it owns it.
    pub fn destroy(self, device: &dyn Device) {
        device.destroy_pipeline(self.pipeline);
        if self.owns_layout {
            device.destroy_pipeline_layout(self.layout);
        }
    }
}
