use super::{
    CompareOpSelector, DepthStencilState, GraphicsPipelineBuilder, StageBuilder,
    StencilOpSelector,
};
use ash::vk;

macro_rules! compare_ops {
    ($($method:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $method(self) -> Self {
                self.compare_op(vk::CompareOp::$op)
            }
        )*
    };
}

/// Sets the depth and stencil tests.
pub struct DepthStencilStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> DepthStencilStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().depth_stencil();
        Self { root }
    }

    fn state(&mut self) -> &mut DepthStencilState {
        self.root.session().depth_stencil()
    }

    pub fn enable_depth_test(mut self) -> Self {
        self.state().depth_test_enable = true;
        self
    }

    pub fn disable_depth_test(mut self) -> Self {
        self.state().depth_test_enable = false;
        self
    }

    pub fn enable_depth_write(mut self) -> Self {
        self.state().depth_write_enable = true;
        self
    }

    pub fn disable_depth_write(mut self) -> Self {
        self.state().depth_write_enable = false;
        self
    }

    /// Depth compare operation. Defaults to [`vk::CompareOp::NEVER`].
    pub fn compare_op(mut self, op: vk::CompareOp) -> Self {
        self.state().depth_compare_op = op;
        self
    }

    compare_ops!(
        compare_op_never => NEVER,
        compare_op_less => LESS,
        compare_op_equal => EQUAL,
        compare_op_less_or_equal => LESS_OR_EQUAL,
        compare_op_greater => GREATER,
        compare_op_not_equal => NOT_EQUAL,
        compare_op_greater_or_equal => GREATER_OR_EQUAL,
        compare_op_always => ALWAYS,
    );

    pub fn enable_depth_bounds_test(mut self) -> Self {
        self.state().depth_bounds_test_enable = true;
        self
    }

    pub fn disable_depth_bounds_test(mut self) -> Self {
        self.state().depth_bounds_test_enable = false;
        self
    }

    pub fn min_depth_bounds(mut self, min: f32) -> Self {
        self.state().min_depth_bounds = min;
        self
    }

    pub fn max_depth_bounds(mut self, max: f32) -> Self {
        self.state().max_depth_bounds = max;
        self
    }

    pub fn depth_bounds(self, min: f32, max: f32) -> Self {
        self.min_depth_bounds(min).max_depth_bounds(max)
    }

    pub fn enable_stencil_test(mut self) -> Self {
        self.state().stencil_test_enable = true;
        self
    }

    pub fn disable_stencil_test(mut self) -> Self {
        self.state().stencil_test_enable = false;
        self
    }

    /// Configure the stencil operations of front facing primitives.
    pub fn front(self) -> StencilOpStateBuilder<'a, 'd> {
        self.root.session().checkpoint();
        StencilOpStateBuilder {
            root: self.root,
            face: Face::Front,
        }
    }

    /// Configure the stencil operations of back facing primitives.
    pub fn back(self) -> StencilOpStateBuilder<'a, 'd> {
        self.root.session().checkpoint();
        StencilOpStateBuilder {
            root: self.root,
            face: Face::Back,
        }
    }

    pub fn build_depth_stencil_state(&mut self) -> DepthStencilState {
        *self.state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for DepthStencilStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Front,
    Back,
}

/// Sets the stencil operations of one face.
///
/// ```ignore
/// builder
///     .depth_stencil_state()
///     .enable_stencil_test()
///     .front()
///         .fail().keep()
///         .pass().replace()
///         .compare().always()
///         .reference(1)
///     .back()
///         .fail_op(vk::StencilOp::KEEP);
/// ```
pub struct StencilOpStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
    face: Face,
}

impl<'a, 'd> StencilOpStateBuilder<'a, 'd> {
    fn op_state(&mut self) -> &mut vk::StencilOpState {
        let state = self.root.session().depth_stencil();
        match self.face {
            Face::Front => &mut state.front,
            Face::Back => &mut state.back,
        }
    }

    pub fn fail(self) -> StencilOpSelector<Self> {
        StencilOpSelector::new(self, |builder, op| builder.op_state().fail_op = op)
    }

    pub fn pass(self) -> StencilOpSelector<Self> {
        StencilOpSelector::new(self, |builder, op| builder.op_state().pass_op = op)
    }

    pub fn depth_fail(self) -> StencilOpSelector<Self> {
        StencilOpSelector::new(self, |builder, op| builder.op_state().depth_fail_op = op)
    }

    pub fn compare(self) -> CompareOpSelector<Self> {
        CompareOpSelector::new(self, |builder, op| builder.op_state().compare_op = op)
    }

    pub fn fail_op(self, op: vk::StencilOp) -> Self {
        self.fail().value(op)
    }

    pub fn pass_op(self, op: vk::StencilOp) -> Self {
        self.pass().value(op)
    }

    pub fn depth_fail_op(self, op: vk::StencilOp) -> Self {
        self.depth_fail().value(op)
    }

    pub fn compare_op(self, op: vk::CompareOp) -> Self {
        self.compare().value(op)
    }

    pub fn compare_mask(mut self, mask: u32) -> Self {
        self.op_state().compare_mask = mask;
        self
    }

    pub fn write_mask(mut self, mask: u32) -> Self {
        self.op_state().write_mask = mask;
        self
    }

    pub fn reference(mut self, reference: u32) -> Self {
        self.op_state().reference = reference;
        self
    }

    pub fn front(self) -> StencilOpStateBuilder<'a, 'd> {
        DepthStencilStateBuilder::new(self.root).front()
    }

    pub fn back(self) -> StencilOpStateBuilder<'a, 'd> {
        DepthStencilStateBuilder::new(self.root).back()
    }

    pub fn build_stencil_op_state(&mut self) -> vk::StencilOpState {
        *self.op_state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for StencilOpStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}
