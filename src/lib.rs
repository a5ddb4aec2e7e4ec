//! # vk-pipeline-builder
//!
//! A fluent builder for Vulkan graphics pipelines using [Ash][ash].
//!
//! ## How it works
//!
//! A graphics pipeline bundles a dozen independent sub-states. The crate gives each of them
//! its own stage builder and lets a single call chain move from one stage to another.
//!
//! - Stage builders
//!
//! [`GraphicsPipelineBuilder`] owns the configuration session. Stage builders
//! ([`ShaderStageBuilder`], [`VertexInputStateBuilder`], [`ViewportStateBuilder`], ...) are
//! short lived views over it. Every stage builder implements [`StageBuilder`] which provides
//! the accessors to reach the other stages and the pipeline wide setters, so bring it in scope
//! with `use vk_pipeline_builder::prelude::*`.
//!
//! - Commit on navigate
//!
//! Viewports, scissors and color blend attachments are edited one at a time. The entry being
//! edited is committed by its `add` method or when the chain moves to any other stage, as
//! long as it is complete. A complete viewport has a positive width and height and a non
//! empty depth range, a complete scissor has a positive extent and a color blend attachment is
//! complete as soon as one of its setters was called.
//!
//! - Validation
//!
//! Configuration errors (missing vertex shader, vertex bindings that no attribute reads,
//! invalid viewports, ...) are reported before anything is sent to the device.
//!
//! - Derivatives
//!
//! `build` does not consume the builder. Reconfigure a few stages and call it again to create
//! pipeline variants, optionally marking them as derivatives of the first one.
//!
//! - Device
//!
//! Device calls go through the [`Device`] trait. [`VulkanDevice`] implements it on top of an
//! `ash::Device`; tests can provide their own implementation.
//!
//! ## Features
//!
//! ### dynamic-rendering
//!
//! This feature is useful if you want to create pipelines for an app making use of Vulkan's
//! dynamic rendering. It adds `GraphicsPipelineBuilder::rendering_formats` which takes the
//! formats of the attachments the pipeline will render to, in place of a render pass.
//!
//! ## Integration
//!
//! ```rust,ignore
//! use vk_pipeline_builder::prelude::*;
//!
//! let device = VulkanDevice::new(device.clone(), enabled_features);
//!
//! let mut builder = GraphicsPipelineBuilder::new(&device);
//! let pipeline = builder
//!     .allow_derivatives()
//!     .shader_stage()
//!         .vertex_shader("shaders/shader.vert.spv")?
//!         .fragment_shader("shaders/shader.frag.spv")?
//!     .vertex_input_state()
//!         .add_vertex_binding_description(0, 32, vk::VertexInputRate::VERTEX)
//!         .add_vertex_attribute_description(0, 0, vk::Format::R32G32B32_SFLOAT, 0)
//!         .add_vertex_attribute_description(1, 0, vk::Format::R32G32B32_SFLOAT, 12)
//!     .viewport_state()
//!         .viewport()
//!             .origin(0.0, 0.0)
//!             .dimension(800.0, 600.0)
//!         .scissor()
//!             .extent(800, 600)
//!             .add()?
//!     .depth_stencil_state()
//!         .enable_depth_test()
//!         .enable_depth_write()
//!         .compare_op_less()
//!     .color_blend_state()
//!         .attachment()
//!         .add()
//!     .render_pass(render_pass)
//!     .build()?;
//!
//! // Same pipeline, drawing lines
//! let lines = builder
//!     .base_pipeline(pipeline.pipeline)
//!     .input_assembly_state()
//!         .lines()
//!     .build()?;
//! ```
//!
//! [ash]: https://github.com/MaikKlein/ash

mod descriptor_set_layout;
mod device;
mod error;
mod pipeline;

pub use descriptor_set_layout::*;
pub use device::*;
pub use error::*;
pub use pipeline::*;

/// Everything needed to drive the builders, including the [`StageBuilder`] trait.
pub mod prelude {
    pub use crate::{
        DescriptorSetLayoutBuilder, Device, GraphicsPipeline, GraphicsPipelineBuilder,
        PipelineError, PipelineResult, ShaderSource, StageBuilder, VulkanDevice,
    };
    pub use ash::vk;
}
