//! Lowering for calls to user-defined JPL functions.

use jplc_parser::{Expr, ResolvedType};

use super::{function_label, CodeGenerator, CodegenError, CodegenResult};
use crate::call_signature::{CallSignature, ParamClass};
use crate::symbol_table::Symbol;

impl<'a> CodeGenerator<'a> {
    pub(super) fn emit_call(&mut self, name: &str, args: &[Expr]) -> CodegenResult<()> {
        let Some(Symbol::Function(param_types, ret_type)) = self.resolver.symbols().lookup(name) else {
            return Err(CodegenError::Internal(format!("call to undeclared function '{name}'")));
        };
        let param_types = param_types.clone();
        let ret_type = ret_type.clone();
        let sig = CallSignature::classify(&param_types, &ret_type);

        if sig.hidden_return {
            self.write_line(format!("sub rsp, {}", ret_type.size()));
            self.stack.push(ret_type.size());
        }

        for &idx in &sig.push_order {
            self.emit_expr(&args[idx])?;
        }

        let register_bound: Vec<usize> = sig
            .push_order
            .iter()
            .copied()
            .rev()
            .filter(|&idx| !matches!(sig.classes[idx], ParamClass::Stack))
            .collect();
        for idx in register_bound {
            for line in CallSignature::pop_assem(sig.classes[idx]) {
                self.write_line(line);
            }
            self.stack.pop();
        }

        let padded = self.stack.needs_alignment();
        if padded {
            self.write_line("sub rsp, 8");
            self.stack.push(8);
        }
        if sig.hidden_return {
            let pad_extra = if padded { 8 } else { 0 };
            self.write_line(format!("lea rdi, [rsp + {}]", sig.bytes_on_stack + pad_extra));
        }
        self.write_line(format!("call {}", function_label(name)));
        if padded {
            self.write_line("add rsp, 8");
            self.stack.pop();
        }

        if sig.bytes_on_stack > 0 {
            self.write_line(format!("add rsp, {}", sig.bytes_on_stack));
        }
        let stack_bound_count = sig
            .classes
            .iter()
            .filter(|c| matches!(c, ParamClass::Stack))
            .count();
        for _ in 0..stack_bound_count {
            self.stack.pop();
        }

        if !sig.hidden_return {
            if ret_type == ResolvedType::Float {
                self.write_line("sub rsp, 8");
                self.write_line("movsd [rsp], xmm0");
            } else {
                self.write_line("push rax");
            }
            self.stack.push(8);
        }

        Ok(())
    }
}
