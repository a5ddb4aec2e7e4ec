use super::{GraphicsPipelineBuilder, ShaderStageInfo, StageBuilder, DEFAULT_ENTRY_POINT};
use crate::{Device, PipelineError, PipelineResult, ShaderSource};
use ash::vk;
use std::ffi::CString;

/// Shader modules of the session, at most one per stage.
#[derive(Debug, Default)]
pub(crate) struct ShaderStages {
    vertex: Option<vk::ShaderModule>,
    fragment: Option<vk::ShaderModule>,
    geometry: Option<vk::ShaderModule>,
    tessellation_control: Option<vk::ShaderModule>,
    tessellation_evaluation: Option<vk::ShaderModule>,
}

impl ShaderStages {
    fn supports(stage: vk::ShaderStageFlags) -> bool {
        ShaderStages::default().slot(stage).is_some()
    }

    fn slot(&mut self, stage: vk::ShaderStageFlags) -> Option<&mut Option<vk::ShaderModule>> {
        match stage {
            vk::ShaderStageFlags::VERTEX => Some(&mut self.vertex),
            vk::ShaderStageFlags::FRAGMENT => Some(&mut self.fragment),
            vk::ShaderStageFlags::GEOMETRY => Some(&mut self.geometry),
            vk::ShaderStageFlags::TESSELLATION_CONTROL => Some(&mut self.tessellation_control),
            vk::ShaderStageFlags::TESSELLATION_EVALUATION => {
                Some(&mut self.tessellation_evaluation)
            }
            _ => None,
        }
    }

    /// Store `module` for `stage` and give back the module it replaces.
    pub(crate) fn replace(
        &mut self,
        stage: vk::ShaderStageFlags,
        module: vk::ShaderModule,
    ) -> Option<vk::ShaderModule> {
        self.slot(stage).and_then(|slot| slot.replace(module))
    }

    /// Release every module.
    pub(crate) fn clear(&mut self, device: &dyn Device) {
        let slots = [
            &mut self.vertex,
            &mut self.fragment,
            &mut self.geometry,
            &mut self.tessellation_control,
            &mut self.tessellation_evaluation,
        ];
        for slot in slots {
            if let Some(module) = slot.take() {
                device.destroy_shader_module(module);
            }
        }
    }

    pub(crate) fn validate(&self) -> PipelineResult<()> {
        if self.vertex.is_none() {
            return Err(PipelineError::MissingVertexShader);
        }
        if self.tessellation_control.is_some() && self.tessellation_evaluation.is_none() {
            return Err(PipelineError::IncompleteTessellationStage);
        }
        Ok(())
    }

    /// Validate and list the stages in pipeline order, vertex first.
    pub(crate) fn build_shader_stage(&self) -> PipelineResult<Vec<ShaderStageInfo>> {
        self.validate()?;

        let entry_point = CString::new(DEFAULT_ENTRY_POINT)
            .map_err(|_| PipelineError::InvalidState("shader entry point contains a nul byte"))?;

        let stages = [
            (vk::ShaderStageFlags::VERTEX, self.vertex),
            (vk::ShaderStageFlags::FRAGMENT, self.fragment),
            (vk::ShaderStageFlags::GEOMETRY, self.geometry),
            (
                vk::ShaderStageFlags::TESSELLATION_EVALUATION,
                self.tessellation_evaluation,
            ),
            (
                vk::ShaderStageFlags::TESSELLATION_CONTROL,
                self.tessellation_control,
            ),
        ];

        Ok(stages
            .iter()
            .filter_map(|(stage, module)| {
                module.map(|module| ShaderStageInfo {
                    stage: *stage,
                    module,
                    entry_point: entry_point.clone(),
                })
            })
            .collect())
    }
}

/// Sets the shader modules of the pipeline.
///
/// Each setter loads the SPIR-V code, creates the shader module with the device and releases
/// the module it replaces, if any.
pub struct ShaderStageBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> ShaderStageBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        Self { root }
    }

    pub fn vertex_shader<'s, S: Into<ShaderSource<'s>>>(self, source: S) -> PipelineResult<Self> {
        self.shader(vk::ShaderStageFlags::VERTEX, source)
    }

    pub fn fragment_shader<'s, S: Into<ShaderSource<'s>>>(
        self,
        source: S,
    ) -> PipelineResult<Self> {
        self.shader(vk::ShaderStageFlags::FRAGMENT, source)
    }

    pub fn geometry_shader<'s, S: Into<ShaderSource<'s>>>(
        self,
        source: S,
    ) -> PipelineResult<Self> {
        self.shader(vk::ShaderStageFlags::GEOMETRY, source)
    }

    pub fn tessellation_control_shader<'s, S: Into<ShaderSource<'s>>>(
        self,
        source: S,
    ) -> PipelineResult<Self> {
        self.shader(vk::ShaderStageFlags::TESSELLATION_CONTROL, source)
    }

    pub fn tessellation_evaluation_shader<'s, S: Into<ShaderSource<'s>>>(
        self,
        source: S,
    ) -> PipelineResult<Self> {
        self.shader(vk::ShaderStageFlags::TESSELLATION_EVALUATION, source)
    }

    /// Set the shader of one stage.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If `stage` is not a graphics stage, if the code cannot be loaded
    /// or the module cannot be created, or if the pipeline builder was destroyed.
    ///
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn shader<'s, S: Into<ShaderSource<'s>>>(
        self,
        stage: vk::ShaderStageFlags,
        source: S,
    ) -> PipelineResult<Self> {
        self.root.ensure_alive()?;
        if !ShaderStages::supports(stage) {
            return Err(PipelineError::InvalidState("not a graphics shader stage"));
        }

        let code = source.into().load()?;
        let device = self.root.device();
        let module = device.create_shader_module(&code)?;
        log::debug!("Created {:?} shader module {:?}", stage, module);

        if let Some(previous) = self.root.session().shader_stage().replace(stage, module) {
            log::debug!("Replacing {:?} shader module {:?}", stage, previous);
            device.destroy_shader_module(previous);
        }
        Ok(self)
    }

    /// Release every shader module set so far.
    pub fn clear(self) -> Self {
        let device = self.root.device();
        self.root.session().shader_stage().clear(device);
        self
    }

    /// Check that a vertex shader is set and that a tessellation control shader comes with a
    /// tessellation evaluation shader.
    pub fn validate(&self) -> PipelineResult<()> {
        self.root.session.shader_stage.validate()
    }

    pub fn build_shader_stage(&self) -> PipelineResult<Vec<ShaderStageInfo>> {
        self.root.session.shader_stage.build_shader_stage()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for ShaderStageBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn module(raw: u64) -> vk::ShaderModule {
        vk::ShaderModule::from_raw(raw)
    }

    #[test]
    fn vertex_shader_is_required() {
        let mut stages = ShaderStages::default();
        stages.replace(vk::ShaderStageFlags::FRAGMENT, module(1));
        assert!(matches!(
            stages.build_shader_stage(),
            Err(PipelineError::MissingVertexShader)
        ));
    }

    #[test]
    fn tessellation_control_needs_evaluation() {
        let mut stages = ShaderStages::default();
        stages.replace(vk::ShaderStageFlags::VERTEX, module(1));
        stages.replace(vk::ShaderStageFlags::TESSELLATION_CONTROL, module(2));
        assert!(matches!(
            stages.validate(),
            Err(PipelineError::IncompleteTessellationStage)
        ));

        stages.replace(vk::ShaderStageFlags::TESSELLATION_EVALUATION, module(3));
        assert!(stages.validate().is_ok());
    }

    #[test]
    fn stages_are_listed_vertex_first() {
        let mut stages = ShaderStages::default();
        stages.replace(vk::ShaderStageFlags::FRAGMENT, module(2));
        stages.replace(vk::ShaderStageFlags::GEOMETRY, module(3));
        stages.replace(vk::ShaderStageFlags::VERTEX, module(1));

        let infos = stages.build_shader_stage().unwrap();
        let kinds: Vec<_> = infos.iter().map(|info| info.stage).collect();
        assert_eq!(
            kinds,
            vec![
                vk::ShaderStageFlags::VERTEX,
                vk::ShaderStageFlags::FRAGMENT,
                vk::ShaderStageFlags::GEOMETRY
            ]
        );
        assert_eq!(infos[0].module, module(1));
        assert_eq!(infos[0].entry_point.to_str().unwrap(), "main");
    }

    #[test]
    fn replacing_a_stage_returns_the_previous_module() {
        let mut stages = ShaderStages::default();
        assert_eq!(stages.replace(vk::ShaderStageFlags::VERTEX, module(1)), None);
        assert_eq!(
            stages.replace(vk::ShaderStageFlags::VERTEX, module(2)),
            Some(module(1))
        );
        assert_eq!(stages.replace(vk::ShaderStageFlags::COMPUTE, module(3)), None);
    }
}
