mod common;

use ash::vk::Handle;
use common::{write_shader, MockDevice, SPIRV};
use vk_pipeline_builder::prelude::*;

fn configure(builder: &mut GraphicsPipelineBuilder<'_>) -> PipelineResult<()> {
    builder
        .shader_stage()
        .vertex_shader(&SPIRV[..])?
        .fragment_shader(&SPIRV[..])?
        .vertex_input_state()
        .add_vertex_binding_description(0, 32, vk::VertexInputRate::VERTEX)
        .add_vertex_attribute_description(0, 0, vk::Format::R32G32B32_SFLOAT, 0)
        .add_vertex_attribute_description(1, 0, vk::Format::R32G32B32_SFLOAT, 12)
        .viewport_state()
        .viewport()
        .origin(0.0, 0.0)
        .dimension(800.0, 600.0)
        .scissor()
        .extent(800, 600)
        .add()?
        .color_blend_state()
        .attachment()
        .add();
    Ok(())
}

#[test]
fn builds_a_complete_pipeline() -> PipelineResult<()> {
    let device = MockDevice::new();
    let vertex = write_shader("v.spv");
    let fragment = write_shader("f.spv");
    let render_pass = vk::RenderPass::from_raw(1000);

    let pipeline = GraphicsPipelineBuilder::new(&device)
        .shader_stage()
        .vertex_shader(vertex.as_path())?
        .fragment_shader(fragment.as_path())?
        .vertex_input_state()
        .add_vertex_binding_description(0, 32, vk::VertexInputRate::VERTEX)
        .add_vertex_attribute_description(0, 0, vk::Format::R32G32B32_SFLOAT, 0)
        .add_vertex_attribute_description(1, 0, vk::Format::R32G32B32_SFLOAT, 12)
        .input_assembly_state()
        .triangles()
        .viewport_state()
        .viewport()
        .origin(0.0, 0.0)
        .dimension(800.0, 600.0)
        .depth_range(0.0, 1.0)
        .scissor()
        .offset(0, 0)
        .extent(800, 600)
        .add()?
        .depth_stencil_state()
        .enable_depth_test()
        .enable_depth_write()
        .compare_op_less()
        .color_blend_state()
        .attachment()
        .add()
        .render_pass(render_pass)
        .subpass(0)
        .build()?;

    assert_ne!(pipeline.pipeline, vk::Pipeline::null());
    assert!(pipeline.owns_layout());

    let records = device.records();
    assert_eq!(records.pipelines.len(), 1);
    assert_eq!(records.pipelines[0].0, pipeline.pipeline);
    assert_eq!(records.pipelines[0].2, vk::PipelineCache::null());

    let description = records.last_description();
    let stages: Vec<_> = description.stages.iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![vk::ShaderStageFlags::VERTEX, vk::ShaderStageFlags::FRAGMENT]
    );
    assert_eq!(description.vertex_input.bindings.len(), 1);
    assert_eq!(description.vertex_input.bindings[0].stride, 32);
    assert_eq!(description.vertex_input.attributes.len(), 2);
    assert_eq!(
        description.input_assembly.topology,
        vk::PrimitiveTopology::TRIANGLE_LIST
    );
    assert_eq!(description.viewport.viewports.len(), 1);
    assert_eq!(description.viewport.viewports[0].width, 800.0);
    assert_eq!(description.viewport.viewports[0].height, 600.0);
    assert_eq!(description.viewport.viewports[0].max_depth, 1.0);
    assert_eq!(description.viewport.scissors.len(), 1);
    assert_eq!(description.viewport.scissors[0].extent.width, 800);
    assert!(description.depth_stencil.depth_test_enable);
    assert!(description.depth_stencil.depth_write_enable);
    assert_eq!(
        description.depth_stencil.depth_compare_op,
        vk::CompareOp::LESS
    );
    assert_eq!(description.color_blend.attachments.len(), 1);
    assert!(description.tessellation.is_none());
    assert!(description.dynamic.is_none());
    assert_eq!(description.render_pass, render_pass);
    assert_eq!(description.subpass, 0);
    assert_eq!(description.base_pipeline_index, -1);

    assert_eq!(records.pipeline_layouts.len(), 1);
    let (layout, set_layouts, ranges) = &records.pipeline_layouts[0];
    assert_eq!(*layout, pipeline.layout);
    assert_eq!(description.layout, pipeline.layout);
    assert!(set_layouts.is_empty());
    assert!(ranges.is_empty());
    Ok(())
}

#[test]
fn missing_vertex_input_fails_before_device_calls() {
    let device = MockDevice::new();
    let result = GraphicsPipelineBuilder::new(&device)
        .shader_stage()
        .vertex_shader(&SPIRV[..])
        .and_then(|stage| stage.fragment_shader(&SPIRV[..]))
        .and_then(|stage| {
            stage
                .viewport_state()
                .viewport()
                .dimension(800.0, 600.0)
                .scissor()
                .extent(800, 600)
                .add()
        })
        .and_then(|scissor| scissor.build());

    assert!(matches!(result, Err(PipelineError::NoBindings)));
    let records = device.records();
    assert!(records.pipelines.is_empty());
    assert!(records.pipeline_layouts.is_empty());
}

#[test]
fn missing_viewport_is_reported() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;
    builder.viewport_state().clear();

    assert!(matches!(builder.build(), Err(PipelineError::NoViewports)));
    Ok(())
}

#[test]
fn derivatives_keep_untouched_stages() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    let base = builder.allow_derivatives().build()?;
    let derived = builder
        .base_pipeline(base.pipeline)
        .input_assembly_state()
        .triangle_strip()
        .build()?;

    assert_ne!(base.pipeline, derived.pipeline);

    let records = device.records();
    let base_description = &records.pipelines[0].1;
    let derived_description = &records.pipelines[1].1;

    assert_eq!(
        base_description.flags,
        vk::PipelineCreateFlags::ALLOW_DERIVATIVES
    );
    assert_eq!(base_description.base_pipeline_handle, vk::Pipeline::null());
    assert_eq!(derived_description.flags, vk::PipelineCreateFlags::DERIVATIVE);
    assert_eq!(derived_description.base_pipeline_handle, base.pipeline);
    assert_eq!(derived_description.base_pipeline_index, -1);

    assert_eq!(
        base_description.input_assembly.topology,
        vk::PrimitiveTopology::TRIANGLE_LIST
    );
    assert_eq!(
        derived_description.input_assembly.topology,
        vk::PrimitiveTopology::TRIANGLE_STRIP
    );

    assert_eq!(derived_description.stages.len(), 2);
    assert_eq!(
        derived_description.stages[0].module,
        base_description.stages[0].module
    );
    assert_eq!(derived_description.vertex_input.attributes.len(), 2);
    assert_eq!(derived_description.viewport.viewports.len(), 1);
    assert_eq!(derived_description.viewport.scissors.len(), 1);
    assert_eq!(derived_description.color_blend.attachments.len(), 1);
    Ok(())
}

#[test]
fn derivative_without_base_pipeline_is_rejected() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    assert!(matches!(
        builder.set_derivatives().build(),
        Err(PipelineError::InvalidState(_))
    ));
    assert!(device.records().pipelines.is_empty());

    builder.allow_derivatives().build()?;
    Ok(())
}

#[test]
fn external_layout_is_used_and_not_owned() -> PipelineResult<()> {
    let device = MockDevice::new();
    let layout = vk::PipelineLayout::from_raw(500);
    let cache = vk::PipelineCache::from_raw(600);
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    let pipeline = builder
        .pipeline_layout(layout)
        .pipeline_cache(cache)
        .build()?;

    assert_eq!(pipeline.layout, layout);
    assert!(!pipeline.owns_layout());

    pipeline.destroy(&device);

    let records = device.records();
    assert!(records.pipeline_layouts.is_empty());
    assert_eq!(records.last_description().layout, layout);
    assert_eq!(records.pipelines[0].2, cache);
    assert_eq!(records.destroyed_pipelines.len(), 1);
    assert!(records.destroyed_pipeline_layouts.is_empty());
    Ok(())
}

#[test]
fn layout_stage_is_created_with_the_pipeline() -> PipelineResult<()> {
    let device = MockDevice::new();
    let set_layout = vk::DescriptorSetLayout::from_raw(700);
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    let pipeline = builder
        .layout()
        .add_descriptor_set_layout(set_layout)
        .add_push_constant_range(vk::ShaderStageFlags::VERTEX, 0, 64)
        .build()?;

    {
        let records = device.records();
        let (layout, set_layouts, ranges) = &records.pipeline_layouts[0];
        assert_eq!(*layout, pipeline.layout);
        assert_eq!(set_layouts, &vec![set_layout]);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].size, 64);
        assert_eq!(ranges[0].stage_flags, vk::ShaderStageFlags::VERTEX);
    }

    let layout = pipeline.layout;
    pipeline.destroy(&device);
    assert_eq!(device.records().destroyed_pipeline_layouts, vec![layout]);
    Ok(())
}

#[test]
fn failed_creation_releases_the_layout_and_keeps_the_builder() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    device.fail_pipelines(true);
    assert!(matches!(
        builder.build(),
        Err(PipelineError::PipelineCreation(_))
    ));
    {
        let records = device.records();
        assert_eq!(records.pipeline_layouts.len(), 1);
        assert_eq!(
            records.destroyed_pipeline_layouts,
            vec![records.pipeline_layouts[0].0]
        );
    }

    device.fail_pipelines(false);
    builder.build()?;
    assert_eq!(device.records().pipelines.len(), 1);
    Ok(())
}

#[test]
fn unsupported_feature_is_reported_as_is() -> PipelineResult<()> {
    let device = MockDevice::with_features(vk::PhysicalDeviceFeatures::default());
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    let result = builder.rasterization_state().line_width(2.0).build();
    match result {
        Err(PipelineError::UnsupportedFeature(feature)) => assert_eq!(feature, "wideLines"),
        other => panic!("unexpected result {:?}", other),
    }

    builder
        .rasterization_state()
        .line_width(1.0)
        .dynamic_state()
        .line_width()
        .build()?;
    Ok(())
}

#[test]
fn named_pipelines_get_a_debug_name() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    let pipeline = builder.name("opaque").build()?;

    let records = device.records();
    assert_eq!(
        records.names,
        vec![(
            vk::ObjectType::PIPELINE,
            pipeline.pipeline.as_raw(),
            "opaque".to_owned()
        )]
    );
    Ok(())
}

#[test]
fn shader_modules_are_released() -> PipelineResult<()> {
    let device = MockDevice::new();
    {
        let mut builder = GraphicsPipelineBuilder::new(&device);
        builder
            .shader_stage()
            .vertex_shader(&SPIRV[..])?
            .vertex_shader(&SPIRV[..])?
            .fragment_shader(&SPIRV[..])?;

        let records = device.records();
        assert_eq!(records.shader_modules.len(), 3);
        assert_eq!(records.destroyed_shader_modules, vec![records.shader_modules[0]]);
    }
    assert_eq!(device.records().live_shader_modules(), 0);
    Ok(())
}

#[test]
fn destroyed_builder_rejects_further_use() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    builder.destroy()?;
    assert_eq!(device.records().live_shader_modules(), 0);

    assert!(matches!(
        builder.build(),
        Err(PipelineError::InvalidState(_))
    ));
    assert!(matches!(
        builder.shader_stage().vertex_shader(&SPIRV[..]),
        Err(PipelineError::InvalidState(_))
    ));
    assert!(matches!(
        builder.reuse(),
        Err(PipelineError::InvalidState(_))
    ));
    assert!(matches!(
        builder.destroy(),
        Err(PipelineError::InvalidState(_))
    ));
    assert_eq!(device.records().shader_modules.len(), 2);
    Ok(())
}

#[test]
fn reuse_clears_shaders_and_vertex_input_only() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;
    builder.build()?;

    builder.reuse()?;
    assert_eq!(device.records().live_shader_modules(), 0);
    assert!(matches!(
        builder.build(),
        Err(PipelineError::MissingVertexShader)
    ));

    builder
        .shader_stage()
        .vertex_shader(&SPIRV[..])?
        .vertex_input_state()
        .add_vertex_binding_description(0, 16, vk::VertexInputRate::INSTANCE)
        .add_vertex_attribute_description(0, 0, vk::Format::R32G32B32A32_SFLOAT, 0)
        .build()?;

    let records = device.records();
    let description = records.last_description();
    assert_eq!(description.stages.len(), 1);
    assert_eq!(
        description.vertex_input.bindings[0].input_rate,
        vk::VertexInputRate::INSTANCE
    );
    assert_eq!(description.viewport.viewports.len(), 1);
    assert_eq!(description.color_blend.attachments.len(), 1);
    Ok(())
}

#[test]
fn tessellation_shaders_get_a_default_tessellation_state() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    builder
        .shader_stage()
        .tessellation_control_shader(&SPIRV[..])?
        .tessellation_evaluation_shader(&SPIRV[..])?
        .input_assembly_state()
        .patches()
        .build()?;

    let records = device.records();
    let tessellation = records
        .last_description()
        .tessellation
        .expect("tessellation state");
    assert_eq!(tessellation.patch_control_points, 3);
    assert_eq!(
        tessellation.domain_origin,
        vk::TessellationDomainOrigin::UPPER_LEFT
    );
    Ok(())
}

#[test]
fn tessellation_state_is_included_once_configured() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    builder
        .shader_stage()
        .tessellation_control_shader(&SPIRV[..])?
        .tessellation_evaluation_shader(&SPIRV[..])?
        .input_assembly_state()
        .patches()
        .tessellation_state()
        .patch_control_points(4)
        .domain_origin(vk::TessellationDomainOrigin::LOWER_LEFT)
        .build()?;

    let records = device.records();
    let description = records.last_description();
    let tessellation = description.tessellation.expect("tessellation state");
    assert_eq!(tessellation.patch_control_points, 4);
    assert_eq!(
        tessellation.domain_origin,
        vk::TessellationDomainOrigin::LOWER_LEFT
    );
    let stages: Vec<_> = description.stages.iter().map(|s| s.stage).collect();
    assert_eq!(
        stages,
        vec![
            vk::ShaderStageFlags::VERTEX,
            vk::ShaderStageFlags::FRAGMENT,
            vk::ShaderStageFlags::TESSELLATION_EVALUATION,
            vk::ShaderStageFlags::TESSELLATION_CONTROL,
        ]
    );
    Ok(())
}

#[test]
fn dynamic_states_are_listed_once() -> PipelineResult<()> {
    let device = MockDevice::new();
    let mut builder = GraphicsPipelineBuilder::new(&device);
    configure(&mut builder)?;

    builder
        .dynamic_state()
        .viewport()
        .scissor()
        .viewport()
        .build()?;

    let records = device.records();
    let dynamic = records.last_description().dynamic.clone().expect("dynamic");
    assert_eq!(
        dynamic.states,
        vec![vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]
    );
    Ok(())
}
