//! Enum selectors shared by several stage builders.
//!
//! A selector borrows the builder that created it and gives it back once a value is picked,
//! so `.src_color_blend_factor().one()` continues the chain on the attachment builder.

use ash::vk;

macro_rules! selector {
    ($(#[$meta:meta])* $name:ident, $ty:ty, { $($method:ident => $value:ident),* $(,)? }) => {
        $(#[$meta])*
        pub struct $name<C> {
            caller: C,
            assign: fn(&mut C, $ty),
        }

        impl<C> $name<C> {
            pub(crate) fn new(caller: C, assign: fn(&mut C, $ty)) -> Self {
                Self { caller, assign }
            }

            /// Select `value` and return to the caller.
            pub fn value(mut self, value: $ty) -> C {
                (self.assign)(&mut self.caller, value);
                self.caller
            }

            $(
                pub fn $method(self) -> C {
                    self.value(<$ty>::$value)
                }
            )*
        }
    };
}

selector!(
    /// Selects one of the blend factors.
    BlendFactorSelector, vk::BlendFactor, {
        zero => ZERO,
        one => ONE,
        src_color => SRC_COLOR,
        one_minus_src_color => ONE_MINUS_SRC_COLOR,
        dst_color => DST_COLOR,
        one_minus_dst_color => ONE_MINUS_DST_COLOR,
        src_alpha => SRC_ALPHA,
        one_minus_src_alpha => ONE_MINUS_SRC_ALPHA,
        dst_alpha => DST_ALPHA,
        one_minus_dst_alpha => ONE_MINUS_DST_ALPHA,
        constant_color => CONSTANT_COLOR,
        one_minus_constant_color => ONE_MINUS_CONSTANT_COLOR,
        constant_alpha => CONSTANT_ALPHA,
        one_minus_constant_alpha => ONE_MINUS_CONSTANT_ALPHA,
        src_alpha_saturate => SRC_ALPHA_SATURATE,
        src1_color => SRC1_COLOR,
        one_minus_src1_color => ONE_MINUS_SRC1_COLOR,
        src1_alpha => SRC1_ALPHA,
        one_minus_src1_alpha => ONE_MINUS_SRC1_ALPHA,
    }
);

selector!(
    /// Selects one of the blend operations.
    BlendOpSelector, vk::BlendOp, {
        add => ADD,
        subtract => SUBTRACT,
        reverse_subtract => REVERSE_SUBTRACT,
        min => MIN,
        max => MAX,
    }
);

selector!(
    /// Selects one of the compare operations.
    CompareOpSelector, vk::CompareOp, {
        never => NEVER,
        less => LESS,
        equal => EQUAL,
        less_or_equal => LESS_OR_EQUAL,
        greater => GREATER,
        not_equal => NOT_EQUAL,
        greater_or_equal => GREATER_OR_EQUAL,
        always => ALWAYS,
    }
);

selector!(
    /// Selects one of the stencil operations.
    StencilOpSelector, vk::StencilOp, {
        keep => KEEP,
        zero => ZERO,
        replace => REPLACE,
        increment_and_clamp => INCREMENT_AND_CLAMP,
        decrement_and_clamp => DECREMENT_AND_CLAMP,
        invert => INVERT,
        increment_and_wrap => INCREMENT_AND_WRAP,
        decrement_and_wrap => DECREMENT_AND_WRAP,
    }
);

/// Enables, disables or selects the logic operation of the color blend state.
///
/// Selecting an operation also enables it.
pub struct LogicOpSelector<C> {
    caller: C,
    assign: fn(&mut C, bool, Option<vk::LogicOp>),
}

impl<C> LogicOpSelector<C> {
    pub(crate) fn new(caller: C, assign: fn(&mut C, bool, Option<vk::LogicOp>)) -> Self {
        Self { caller, assign }
    }

    fn apply(mut self, enable: bool, op: Option<vk::LogicOp>) -> C {
        (self.assign)(&mut self.caller, enable, op);
        self.caller
    }

    /// Enable the logic operation, keeping the selected one.
    pub fn enable(self) -> C {
        self.apply(true, None)
    }

    pub fn disable(self) -> C {
        self.apply(false, None)
    }

    /// Enable and select `op`.
    pub fn value(self, op: vk::LogicOp) -> C {
        self.apply(true, Some(op))
    }

    pub fn clear(self) -> C {
        self.value(vk::LogicOp::CLEAR)
    }

    pub fn and(self) -> C {
        self.value(vk::LogicOp::AND)
    }

    pub fn and_reverse(self) -> C {
        self.value(vk::LogicOp::AND_REVERSE)
    }

    pub fn copy(self) -> C {
        self.value(vk::LogicOp::COPY)
    }

    pub fn and_inverted(self) -> C {
        self.value(vk::LogicOp::AND_INVERTED)
    }

    pub fn no_op(self) -> C {
        self.value(vk::LogicOp::NO_OP)
    }

    pub fn xor(self) -> C {
        self.value(vk::LogicOp::XOR)
    }

    pub fn or(self) -> C {
        self.value(vk::LogicOp::OR)
    }

    pub fn nor(self) -> C {
        self.value(vk::LogicOp::NOR)
    }

    pub fn equivalent(self) -> C {
        self.value(vk::LogicOp::EQUIVALENT)
    }

    pub fn invert(self) -> C {
        self.value(vk::LogicOp::INVERT)
    }

    pub fn or_reverse(self) -> C {
        self.value(vk::LogicOp::OR_REVERSE)
    }

    pub fn copy_inverted(self) -> C {
        self.value(vk::LogicOp::COPY_INVERTED)
    }

    pub fn or_inverted(self) -> C {
        self.value(vk::LogicOp::OR_INVERTED)
    }

    pub fn nand(self) -> C {
        self.value(vk::LogicOp::NAND)
    }

    pub fn set(self) -> C {
        self.value(vk::LogicOp::SET)
    }
}
