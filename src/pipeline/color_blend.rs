use super::{
    BlendFactorSelector, BlendOpSelector, ColorBlendState, GraphicsPipelineBuilder,
    LogicOpSelector, StageBuilder,
};
use ash::vk;

/// Color blend configuration of the session, with the attachment being edited.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColorBlendStage {
    state: ColorBlendState,
    pending: Option<vk::PipelineColorBlendAttachmentState>,
}

/// Blending disabled, every channel written.
pub fn default_color_blend_attachment() -> vk::PipelineColorBlendAttachmentState {
    vk::PipelineColorBlendAttachmentState {
        blend_enable: vk::FALSE,
        src_color_blend_factor: vk::BlendFactor::ONE,
        dst_color_blend_factor: vk::BlendFactor::ZERO,
        color_blend_op: vk::BlendOp::ADD,
        src_alpha_blend_factor: vk::BlendFactor::ONE,
        dst_alpha_blend_factor: vk::BlendFactor::ZERO,
        alpha_blend_op: vk::BlendOp::ADD,
        color_write_mask: vk::ColorComponentFlags::R
            | vk::ColorComponentFlags::G
            | vk::ColorComponentFlags::B
            | vk::ColorComponentFlags::A,
    }
}

impl ColorBlendStage {
    /// Commit the pending attachment if any setter was called on it.
    pub(crate) fn checkpoint(&mut self) {
        if let Some(attachment) = self.pending.take() {
            log::trace!("Committing color blend attachment {:?}", attachment);
            self.state.attachments.push(attachment);
        }
    }

    fn pending(&mut self) -> &mut vk::PipelineColorBlendAttachmentState {
        self.pending
            .get_or_insert_with(default_color_blend_attachment)
    }

    fn add(&mut self) {
        let attachment = self
            .pending
            .take()
            .unwrap_or_else(default_color_blend_attachment);
        self.state.attachments.push(attachment);
    }

    fn clear(&mut self) {
        self.state.attachments.clear();
        self.pending = None;
    }

    pub(crate) fn build_color_blend_state(&self) -> ColorBlendState {
        self.state.clone()
    }
}

/// Sets the global blend settings and gives access to the per attachment settings.
pub struct ColorBlendStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> ColorBlendStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().color_blend();
        Self { root }
    }

    fn stage(&mut self) -> &mut ColorBlendStage {
        self.root.session().color_blend()
    }

    /// Edit a new attachment state.
    pub fn attachment(self) -> ColorBlendAttachmentStateBuilder<'a, 'd> {
        self.root.session().checkpoint();
        ColorBlendAttachmentStateBuilder { root: self.root }
    }

    /// Add `count` default attachment states.
    pub fn attachments(mut self, count: usize) -> Self {
        let attachments = &mut self.stage().state.attachments;
        attachments.extend(std::iter::repeat(default_color_blend_attachment()).take(count));
        self
    }

    /// Enable, disable or select the logic operation.
    pub fn logic_op(self) -> LogicOpSelector<Self> {
        LogicOpSelector::new(self, |builder, enable, op| {
            let state = &mut builder.stage().state;
            state.logic_op_enable = enable;
            if let Some(op) = op {
                state.logic_op = op;
            }
        })
    }

    pub fn blend_constants(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.stage().state.blend_constants = [r, g, b, a];
        self
    }

    /// Remove every attachment state, committed or pending.
    pub fn clear(mut self) -> Self {
        self.stage().clear();
        self
    }

    pub fn build_color_blend_state(&mut self) -> ColorBlendState {
        self.stage().build_color_blend_state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for ColorBlendStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}

/// Edits the blend state of one color attachment.
///
/// The attachment is committed by [`add`] or, once a setter was called, when navigating away.
///
/// [`add`]: #method.add
pub struct ColorBlendAttachmentStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> ColorBlendAttachmentStateBuilder<'a, 'd> {
    fn pending(&mut self) -> &mut vk::PipelineColorBlendAttachmentState {
        self.root.session().color_blend().pending()
    }

    pub fn enable_blend(mut self) -> Self {
        self.pending().blend_enable = vk::TRUE;
        self
    }

    pub fn disable_blend(mut self) -> Self {
        self.pending().blend_enable = vk::FALSE;
        self
    }

    pub fn src_color_blend_factor(self) -> BlendFactorSelector<Self> {
        BlendFactorSelector::new(self, |builder, factor| {
            builder.pending().src_color_blend_factor = factor
        })
    }

    pub fn dst_color_blend_factor(self) -> BlendFactorSelector<Self> {
        BlendFactorSelector::new(self, |builder, factor| {
            builder.pending().dst_color_blend_factor = factor
        })
    }

    pub fn src_alpha_blend_factor(self) -> BlendFactorSelector<Self> {
        BlendFactorSelector::new(self, |builder, factor| {
            builder.pending().src_alpha_blend_factor = factor
        })
    }

    pub fn dst_alpha_blend_factor(self) -> BlendFactorSelector<Self> {
        BlendFactorSelector::new(self, |builder, factor| {
            builder.pending().dst_alpha_blend_factor = factor
        })
    }

    pub fn color_blend_op(self) -> BlendOpSelector<Self> {
        BlendOpSelector::new(self, |builder, op| builder.pending().color_blend_op = op)
    }

    pub fn alpha_blend_op(self) -> BlendOpSelector<Self> {
        BlendOpSelector::new(self, |builder, op| builder.pending().alpha_blend_op = op)
    }

    pub fn color_write_mask(mut self, mask: vk::ColorComponentFlags) -> Self {
        self.pending().color_write_mask = mask;
        self
    }

    /// Commit the attachment, a default one if no setter was called, and start a new one.
    pub fn add(self) -> Self {
        self.root.session().color_blend().add();
        self
    }

    /// Commit the attachment if a setter was called and start a new one.
    pub fn attachment(self) -> ColorBlendAttachmentStateBuilder<'a, 'd> {
        ColorBlendStateBuilder::new(self.root).attachment()
    }

    /// Remove every attachment state, committed or pending.
    pub fn clear(self) -> Self {
        self.root.session().color_blend().clear();
        self
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for ColorBlendAttachmentStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
