#![allow(dead_code)]

use ash::vk::{self, Handle};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex, MutexGuard,
    },
};
use vk_pipeline_builder::{
    DescriptorSetLayoutBinding, Device, PipelineDescription, PipelineError, PipelineResult,
};

/// Smallest word sequence accepted as SPIR-V: magic number and header.
pub const SPIRV: [u32; 5] = [0x0723_0203, 0x0001_0000, 0, 1, 0];

pub fn init_logger() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Trace)
        .init();
}

/// Write a SPIR-V file in a fresh temporary directory and return its path.
pub fn write_shader(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "vk-pipeline-builder-{}-{}",
        std::process::id(),
        name.replace('.', "-")
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let bytes: Vec<u8> = SPIRV.iter().flat_map(|w| w.to_le_bytes()).collect();
    std::fs::write(&path, bytes).unwrap();
    path
}

#[derive(Default)]
pub struct Records {
    pub shader_modules: Vec<vk::ShaderModule>,
    pub destroyed_shader_modules: Vec<vk::ShaderModule>,
    pub descriptor_set_layouts: Vec<(
        Vec<DescriptorSetLayoutBinding>,
        vk::DescriptorSetLayoutCreateFlags,
    )>,
    pub pipeline_layouts: Vec<(
        vk::PipelineLayout,
        Vec<vk::DescriptorSetLayout>,
        Vec<vk::PushConstantRange>,
    )>,
    pub destroyed_pipeline_layouts: Vec<vk::PipelineLayout>,
    pub pipelines: Vec<(vk::Pipeline, PipelineDescription, vk::PipelineCache)>,
    pub destroyed_pipelines: Vec<vk::Pipeline>,
    pub names: Vec<(vk::ObjectType, u64, String)>,
}

impl Records {
    pub fn live_shader_modules(&self) -> usize {
        self.shader_modules.len() - self.destroyed_shader_modules.len()
    }

    pub fn last_description(&self) -> &PipelineDescription {
        &self.pipelines.last().expect("no pipeline created").1
    }
}

/// Device handing out fake handles and recording every call.
#[derive(Default)]
pub struct MockDevice {
    next_handle: AtomicU64,
    fail_pipelines: AtomicBool,
    features: Option<vk::PhysicalDeviceFeatures>,
    records: Mutex<Records>,
}

impl MockDevice {
    pub fn new() -> Self {
        init_logger();
        Self::default()
    }

    /// Reject pipelines needing a feature not enabled in `features`.
    pub fn with_features(features: vk::PhysicalDeviceFeatures) -> Self {
        Self {
            features: Some(features),
            ..Self::new()
        }
    }

    pub fn fail_pipelines(&self, fail: bool) {
        self.fail_pipelines.store(fail, Ordering::SeqCst);
    }

    pub fn records(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap()
    }

    fn next_handle<H: Handle>(&self) -> H {
        H::from_raw(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Device for MockDevice {
    fn create_shader_module(&self, code: &[u32]) -> PipelineResult<vk::ShaderModule> {
        assert_eq!(code[0], SPIRV[0]);
        let module = self.next_handle();
        self.records().shader_modules.push(module);
        Ok(module)
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.records().destroyed_shader_modules.push(module);
    }

    fn create_descriptor_set_layout(
        &self,
        bindings: &[DescriptorSetLayoutBinding],
        flags: vk::DescriptorSetLayoutCreateFlags,
    ) -> PipelineResult<vk::DescriptorSetLayout> {
        self.records()
            .descriptor_set_layouts
            .push((bindings.to_vec(), flags));
        Ok(self.next_handle())
    }

    fn destroy_descriptor_set_layout(&self, _layout: vk::DescriptorSetLayout) {}

    fn create_pipeline_layout(
        &self,
        set_layouts: &[vk::DescriptorSetLayout],
        push_constant_ranges: &[vk::PushConstantRange],
    ) -> PipelineResult<vk::PipelineLayout> {
        let layout = self.next_handle();
        self.records().pipeline_layouts.push((
            layout,
            set_layouts.to_vec(),
            push_constant_ranges.to_vec(),
        ));
        Ok(layout)
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        self.records().destroyed_pipeline_layouts.push(layout);
    }

    fn create_graphics_pipeline(
        &self,
        description: &PipelineDescription,
        cache: vk::PipelineCache,
    ) -> PipelineResult<vk::Pipeline> {
        if let Some(features) = &self.features {
            if let Some(feature) = description.missing_feature(features) {
                return Err(PipelineError::UnsupportedFeature(feature.to_owned()));
            }
        }
        if self.fail_pipelines.load(Ordering::SeqCst) {
            return Err(PipelineError::Vulkan(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY));
        }
        let pipeline = self.next_handle();
        self.records()
            .pipelines
            .push((pipeline, description.clone(), cache));
        Ok(pipeline)
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.records().destroyed_pipelines.push(pipeline);
    }

    fn set_debug_name(&self, object_type: vk::ObjectType, handle: u64, name: &str) {
        self.records()
            .names
            .push((object_type, handle, name.to_owned()));
    }
}
