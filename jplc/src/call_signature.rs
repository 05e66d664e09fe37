//! SysV argument classification for a JPL function call.
//!
//! `bool`/`int` parameters share one counter against the integer
//! argument registers; `float` parameters use a separate counter
//! against the SSE registers; arrays and tuples always spill to the
//! stack (JPL never passes an aggregate in registers). A function
//! returning an array or tuple reserves `rdi` for a hidden pointer to
//! caller-allocated storage, shifting every integer-class parameter
//! down by one register.

use jplc_parser::ResolvedType;

pub const INT_ARG_REGS: [&str; 6] = ["rdi", "rsi", "rdx", "rcx", "r8", "r9"];
pub const SSE_ARG_REGS: [&str; 8] = [
    "xmm0", "xmm1", "xmm2", "xmm3", "xmm4", "xmm5", "xmm6", "xmm7",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamClass {
    Int(&'static str),
    Sse(&'static str),
    Stack,
}

#[derive(Debug, Clone)]
pub struct CallSignature {
    pub classes: Vec<ParamClass>,
    pub bytes_on_stack: u64,
    /// Index order (into `classes`/the original parameter list) the
    /// caller should push argument values in, working from an already
    /// stack-machine-evaluated operand for each. Stack-bound arguments
    /// are reversed among themselves, then register-bound arguments are
    /// reversed among themselves — two independent reversals, since the
    /// two groups are laid out and consumed separately.
    pub push_order: Vec<usize>,
    pub hidden_return: bool,
}

impl CallSignature {
    pub fn classify(param_types: &[ResolvedType], ret_type: &ResolvedType) -> CallSignature {
        let hidden_return = ret_type.is_array() || ret_type.is_tuple();
        let mut int_idx = if hidden_return { 1 } else { 0 };
        let mut sse_idx = 0usize;
        let mut classes = Vec::with_capacity(param_types.len());
        let mut bytes_on_stack = 0u64;

        for ty in param_types {
            let class = if ty.is_array() || ty.is_tuple() {
                bytes_on_stack += ty.size();
                ParamClass::Stack
            } else if matches!(ty, ResolvedType::Float) {
                if sse_idx < SSE_ARG_REGS.len() {
                    let reg = SSE_ARG_REGS[sse_idx];
                    sse_idx += 1;
                    ParamClass::Sse(reg)
                } else {
                    bytes_on_stack += ty.size();
                    ParamClass::Stack
                }
            } else if int_idx < INT_ARG_REGS.len() {
                let reg = INT_ARG_REGS[int_idx];
                int_idx += 1;
                ParamClass::Int(reg)
            } else {
                bytes_on_stack += ty.size();
                ParamClass::Stack
            };
            classes.push(class);
        }

        let mut stack_indices: Vec<usize> = classes
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, ParamClass::Stack))
            .map(|(i, _)| i)
            .collect();
        stack_indices.reverse();
        let mut reg_indices: Vec<usize> = classes
            .iter()
            .enumerate()
            .filter(|(_, c)| !matches!(c, ParamClass::Stack))
            .map(|(i, _)| i)
            .collect();
        reg_indices.reverse();

        let mut push_order = stack_indices;
        push_order.extend(reg_indices);

        CallSignature {
            classes,
            bytes_on_stack,
            push_order,
            hidden_return,
        }
    }

    /// Assembly that pops a freshly-pushed operand into its ABI home.
    /// Integer-class values come off the stack whole; SSE values are
    /// loaded with `movsd` first since `pop` cannot target an `xmm`
    /// register, then the stack slot is reclaimed separately.
    pub fn pop_assem(class: ParamClass) -> Vec<String> {
        match class {
            ParamClass::Int(reg) => vec![format!("pop {}", reg)],
            ParamClass::Sse(reg) => vec![format!("movsd {}, [rsp]", reg), "add rsp, 8".to_string()],
            ParamClass::Stack => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_and_int_share_the_integer_counter() {
        let sig = CallSignature::classify(
            &[ResolvedType::Bool, ResolvedType::Int],
            &ResolvedType::Int,
        );
        assert_eq!(sig.classes, vec![ParamClass::Int("rdi"), ParamClass::Int("rsi")]);
        assert_eq!(sig.bytes_on_stack, 0);
    }

    #[test]
    fn floats_use_a_separate_counter() {
        let sig = CallSignature::classify(
            &[ResolvedType::Float, ResolvedType::Int],
            &ResolvedType::Int,
        );
        assert_eq!(sig.classes, vec![ParamClass::Sse("xmm0"), ParamClass::Int("rdi")]);
    }

    #[test]
    fn aggregates_always_spill_to_the_stack() {
        let array_ty = ResolvedType::array(ResolvedType::Int, 1);
        let sig = CallSignature::classify(&[array_ty.clone()], &ResolvedType::Int);
        assert_eq!(sig.classes, vec![ParamClass::Stack]);
        assert_eq!(sig.bytes_on_stack, array_ty.size());
    }

    #[test]
    fn aggregate_return_reserves_rdi() {
        let ret = ResolvedType::array(ResolvedType::Int, 1);
        let sig = CallSignature::classify(&[ResolvedType::Int], &ret);
        assert!(sig.hidden_return);
        assert_eq!(sig.classes, vec![ParamClass::Int("rsi")]);
    }

    #[test]
    fn push_order_reverses_stack_then_register_groups_independently() {
        let array_ty = ResolvedType::array(ResolvedType::Int, 1);
        let sig = CallSignature::classify(
            &[array_ty.clone(), ResolvedType::Int, array_ty, ResolvedType::Int],
            &ResolvedType::Int,
        );
        // stack-bound indices [0, 2] reversed -> [2, 0]
        // register-bound indices [1, 3] reversed -> [3, 1]
        assert_eq!(sig.push_order, vec![2, 0, 3, 1]);
    }
}
