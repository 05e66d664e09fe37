//! Statement lowering (`assert`, `let`, `return`) and the prologue/
//! epilogue that wraps a user-defined function's body.

use jplc_parser::{Binding, Expr, LValue, ResolvedType, Stmt};

use super::{function_label, CodeGenerator, CodegenError, CodegenResult};
use crate::call_signature::{CallSignature, ParamClass};
use crate::stack_model::StackModel;

impl<'a> CodeGenerator<'a> {
    /// `let` binding shared by top-level commands and function bodies:
    /// evaluate the value, then declare the pattern directly against
    /// the bytes that evaluation just pushed, with no extra copying.
    pub(super) fn emit_let(&mut self, lvalue: &LValue, value: &Expr) -> CodegenResult<()> {
        let ty = value.resolved_type();
        self.emit_expr(value)?;
        let offset = self.stack.depth() as i64;
        self.declare_lvalue_at(lvalue, &ty, offset);
        Ok(())
    }

    /// `assert` shared by top-level commands and function bodies: abort
    /// via `_fail_assertion` when the condition is false.
    pub(super) fn emit_assert(&mut self, cond: &Expr, message: &str) -> CodegenResult<()> {
        self.emit_expr(cond)?;
        self.write_line("pop rax");
        self.stack.pop();
        self.write_line("cmp rax, 0");
        let ok = self.new_jump_label();
        self.write_line(format!("jne {}", ok));
        let msg_const = self.pool.intern_str(message);
        if self.stack.needs_alignment() {
            self.write_line("sub rsp, 8");
        }
        self.write_line(format!("lea rdi, [rel {}]", msg_const));
        self.write_line("call _fail_assertion");
        self.label(&ok);
        Ok(())
    }

    /// Emits `name`'s body as a standalone labeled subroutine: its own
    /// fresh frame (the abstract stack model and scope stack reset, so
    /// `rbp`-relative offsets start again from zero), a prologue that
    /// reads every parameter into a permanent slot per the call's ABI
    /// classification, the body's statements, and (via the body's
    /// final `return`, guaranteed present by resolution) the epilogue.
    pub(super) fn emit_function(&mut self, name: &str, params: &[Binding], body: &[Stmt]) -> CodegenResult<()> {
        let Some(crate::symbol_table::Symbol::Function(param_types, ret_type)) = self.resolver.symbols().lookup(name)
        else {
            return Err(CodegenError::Internal(format!("function '{name}' missing from its own symbol table")));
        };
        let param_types = param_types.clone();
        let ret_type = ret_type.clone();
        let sig = CallSignature::classify(&param_types, &ret_type);

        self.stack = StackModel::new();
        self.scopes = vec![std::collections::HashMap::new()];
        self.current_return = Some(ret_type.clone());

        self.label(&function_label(name));
        self.write_line("push rbp");
        self.write_line("mov rbp, rsp");

        if sig.hidden_return {
            self.write_line("push rdi");
            self.stack.push(8);
            self.declare_slot_at("$ret_ptr", ResolvedType::Int, self.stack.depth() as i64);
        }

        let mut stack_cursor: i64 = 16;
        for (binding, (class, ty)) in params.iter().zip(sig.classes.iter().zip(&param_types)) {
            match class {
                ParamClass::Int(reg) => {
                    self.write_line(format!("push {}", reg));
                    self.stack.push(8);
                    self.declare_binding_at(binding, ty, self.stack.depth() as i64);
                }
                ParamClass::Sse(reg) => {
                    self.write_line("sub rsp, 8");
                    self.write_line(format!("movsd [rsp], {}", reg));
                    self.stack.push(8);
                    self.declare_binding_at(binding, ty, self.stack.depth() as i64);
                }
                ParamClass::Stack => {
                    let offset = -stack_cursor;
                    self.declare_binding_at(binding, ty, offset);
                    stack_cursor += ty.size() as i64;
                }
            }
        }

        for stmt in body {
            self.emit_stmt(stmt)?;
        }

        self.current_return = None;
        Ok(())
    }

    fn emit_stmt(&mut self, stmt: &Stmt) -> CodegenResult<()> {
        match stmt {
            Stmt::Assert(cond, message) => self.emit_assert(cond, message),
            Stmt::Let(lvalue, value) => self.emit_let(lvalue, value),
            Stmt::Return(value) => self.emit_return(value),
        }
    }

    /// The last statement of every function body, per resolution's
    /// "not all paths return" check. Writes the value either through
    /// the hidden return pointer (arrays/tuples) or into `rax`/`xmm0`,
    /// then tears down the frame unconditionally with `mov rsp, rbp`
    /// rather than tracking how far it grew.
    fn emit_return(&mut self, value: &Expr) -> CodegenResult<()> {
        let ret_ty = self
            .current_return
            .clone()
            .ok_or_else(|| CodegenError::Internal("return statement outside a function body".to_string()))?;
        self.emit_expr(value)?;

        if ret_ty.is_array() || ret_ty.is_tuple() {
            let ret_ptr_slot = self.lookup_var("$ret_ptr");
            let ret_ptr_addr = self.slot_word_addr(&ret_ptr_slot, 0);
            self.write_line(format!("mov rbx, {}", ret_ptr_addr));
            let words = ret_ty.size() / 8;
            for k in 0..words {
                self.write_line(format!("mov rax, [rsp + {}]", k * 8));
                self.write_line(format!("mov [rbx + {}], rax", k * 8));
            }
        } else if ret_ty == ResolvedType::Float {
            self.write_line("movsd xmm0, [rsp]");
        } else {
            self.write_line("mov rax, [rsp]");
        }

        self.write_line("mov rsp, rbp");
        self.write_line("pop rbp");
        self.write_line("ret");
        Ok(())
    }
}
