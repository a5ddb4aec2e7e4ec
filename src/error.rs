use ash::vk;
use thiserror::Error;

/// Convenient return type for function that can return a [`PipelineError`].
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Crates error type.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Errors coming from calls to Vulkan functions.
    #[error("A Vulkan error occured: {0}")]
    Vulkan(#[from] vk::Result),

    /// Io errors, including malformed SPIR-V.
    #[error("A io error occured: {0}")]
    Io(#[from] std::io::Error),

    #[error("At least a vertex shader should be provided")]
    MissingVertexShader,

    #[error("A tessellation evaluation shader is required when a tessellation control shader is provided")]
    IncompleteTessellationStage,

    #[error("No vertex binding descriptions defined for vertex input state")]
    NoBindings,

    #[error("No vertex attribute descriptions defined for vertex input state")]
    NoAttributes,

    /// A vertex binding that no attribute reads from.
    #[error("No vertex attribute description defined for binding {0}")]
    UnboundAttribute(u32),

    #[error("At least one viewport should be provided")]
    NoViewports,

    #[error("At least one scissor should be provided")]
    NoScissors,

    #[error("Viewport width and height must be positive, got {width}x{height}")]
    InvalidViewportDimensions { width: f32, height: f32 },

    #[error("Scissor width and height must be positive, got {width}x{height}")]
    InvalidScissorExtent { width: u32, height: u32 },

    /// Descriptor set layout binding with an invalid descriptor count.
    #[error("Invalid descriptor set layout binding {binding}: descriptor count {descriptor_count}")]
    InvalidBinding { binding: u32, descriptor_count: u32 },

    #[error("Descriptor set layout binding {0} is defined more than once")]
    DuplicateBinding(u32),

    /// The configuration needs a device feature that is not enabled.
    #[error("Device feature '{0}' is required but not enabled")]
    UnsupportedFeature(String),

    /// The device rejected the pipeline description.
    #[error("Failed to create graphics pipeline: {0}")]
    PipelineCreation(String),

    /// Operation not allowed in the builder's current state.
    #[error("Invalid builder state: {0}")]
    InvalidState(&'static str),
}
