mod vulkan;

pub use self::vulkan::*;

use crate::{
    DescriptorSetLayoutBinding, DescriptorSetLayoutBuilder, GraphicsPipelineBuilder,
    PipelineDescription, PipelineResult,
};
use ash::vk;
use std::{
    fs::File,
    io::Cursor,
    path::{Path, PathBuf},
};

/// Trait providing the device operations the builders need.
///
/// [`VulkanDevice`] implements it on top of an `ash::Device`. Every call is synchronous and
/// reports failures through [`PipelineResult`].
///
/// [`VulkanDevice`]: struct.VulkanDevice.html
/// [`PipelineResult`]: type.PipelineResult.html
pub trait Device: Send + Sync {
    /// Create a shader module from SPIR-V words.
    fn create_shader_module(&self, code: &[u32]) -> PipelineResult<vk::ShaderModule>;

    fn destroy_shader_module(&self, module: vk::ShaderModule);

    /// Create a descriptor set layout.
    ///
    /// # Arguments
    ///
    /// * `bindings` - The bindings of the layout, already validated.
    /// * `flags` - The layout create flags.
    fn create_descriptor_set_layout(
        &self,
        bindings: &[DescriptorSetLayoutBinding],
        flags: vk::DescriptorSetLayoutCreateFlags,
    ) -> PipelineResult<vk::DescriptorSetLayout>;

    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout);

    /// Create a pipeline layout.
    fn create_pipeline_layout(
        &self,
        set_layouts: &[vk::DescriptorSetLayout],
        push_constant_ranges: &[vk::PushConstantRange],
    ) -> PipelineResult<vk::PipelineLayout>;

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout);

    /// Create a graphics pipeline from a complete description.
    ///
    /// # Arguments
    ///
    /// * `description` - The pipeline description.
    /// * `cache` - The pipeline cache to use, may be null.
    fn create_graphics_pipeline(
        &self,
        description: &PipelineDescription,
        cache: vk::PipelineCache,
    ) -> PipelineResult<vk::Pipeline>;

    fn destroy_pipeline(&self, pipeline: vk::Pipeline);

    /// Attach a debug name to an object.
    ///
    /// This is best effort, implementations that cannot name objects should do nothing.
    fn set_debug_name(&self, object_type: vk::ObjectType, handle: u64, name: &str);

    /// Start configuring a graphics pipeline.
    fn graphics_pipeline_builder(&self) -> GraphicsPipelineBuilder<'_>
    where
        Self: Sized,
    {
        GraphicsPipelineBuilder::new(self)
    }

    /// Start describing a descriptor set layout.
    fn descriptor_set_layout_builder(&self) -> DescriptorSetLayoutBuilder<'_>
    where
        Self: Sized,
    {
        DescriptorSetLayoutBuilder::new(self)
    }
}

/// Where a shader stage gets its SPIR-V from.
#[derive(Debug, Clone)]
pub enum ShaderSource<'a> {
    /// A SPIR-V file on disk.
    Path(PathBuf),
    /// SPIR-V bytes, in either byte order.
    Bytes(&'a [u8]),
    /// Already decoded SPIR-V words.
    Words(&'a [u32]),
}

impl ShaderSource<'_> {
    /// Load and decode the SPIR-V words.
    pub fn load(&self) -> PipelineResult<Vec<u32>> {
        match self {
            ShaderSource::Path(path) => load_shader(path),
            ShaderSource::Bytes(bytes) => read_shader_from_source(bytes),
            ShaderSource::Words(words) => Ok(words.to_vec()),
        }
    }
}

impl<'a> From<&'a str> for ShaderSource<'a> {
    fn from(path: &'a str) -> Self {
        ShaderSource::Path(PathBuf::from(path))
    }
}

impl<'a> From<&'a Path> for ShaderSource<'a> {
    fn from(path: &'a Path) -> Self {
        ShaderSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ShaderSource<'_> {
    fn from(path: PathBuf) -> Self {
        ShaderSource::Path(path)
    }
}

impl<'a> From<&'a [u8]> for ShaderSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ShaderSource::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ShaderSource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        ShaderSource::Bytes(bytes)
    }
}

impl<'a> From<&'a [u32]> for ShaderSource<'a> {
    fn from(words: &'a [u32]) -> Self {
        ShaderSource::Words(words)
    }
}

impl<'a> From<&'a Vec<u32>> for ShaderSource<'a> {
    fn from(words: &'a Vec<u32>) -> Self {
        ShaderSource::Words(words)
    }
}

/// Read a SPIR-V file.
pub fn load_shader<P: AsRef<Path>>(path: P) -> PipelineResult<Vec<u32>> {
    log::debug!("Loading shader {}", path.as_ref().display());
    let mut file = File::open(path)?;
    Ok(ash::util::read_spv(&mut file)?)
}

fn read_shader_from_source(source: &[u8]) -> PipelineResult<Vec<u32>> {
    let mut cursor = Cursor::new(source);
    Ok(ash::util::read_spv(&mut cursor)?)
}
