//! Expression lowering: every case pushes exactly
//! `expr.resolved_type().size()` bytes onto the native stack.

use jplc_parser::{BinopKind, Expr, ExprKind, ResolvedType, UnopKind};

use super::{CodeGenerator, CodegenError, CodegenResult};

impl<'a> CodeGenerator<'a> {
    pub(super) fn emit_expr(&mut self, expr: &Expr) -> CodegenResult<()> {
        match &expr.kind {
            ExprKind::Int(v) => self.emit_int_literal(*v),
            ExprKind::Float(v) => self.emit_float_literal(*v),
            ExprKind::True => self.emit_bool_literal(true),
            ExprKind::False => self.emit_bool_literal(false),
            ExprKind::Var(name) => self.emit_var_load(name),
            ExprKind::Unop(op, operand) => self.emit_unop(*op, operand),
            ExprKind::Binop(op, lhs, rhs) => self.emit_binop(*op, lhs, rhs),
            ExprKind::If(cond, then_branch, else_branch) => self.emit_if(cond, then_branch, else_branch),
            ExprKind::Call(name, args) => self.emit_call(name, args),
            ExprKind::ArrayIndex(base, indices) => self.emit_array_index(base, indices),
            ExprKind::TupleIndex(base, index) => self.emit_tuple_index(base, *index),
            ExprKind::ArrayLiteral(elements) => self.emit_array_literal(elements),
            ExprKind::TupleLiteral(fields) => self.emit_tuple_literal(fields),
            ExprKind::ArrayLoop(bindings, body) => self.emit_array_loop(bindings, body),
            ExprKind::SumLoop(bindings, body) => self.emit_sum_loop(bindings, body),
        }
    }

    fn emit_int_literal(&mut self, value: i64) -> CodegenResult<()> {
        let name = self.pool.intern_int(value);
        self.write_line(format!("mov rax, [rel {}]", name));
        self.write_line("push rax");
        self.stack.push(8);
        Ok(())
    }

    fn emit_float_literal(&mut self, value: f64) -> CodegenResult<()> {
        let name = self.pool.intern_float(value);
        self.write_line(format!("movsd xmm0, [rel {}]", name));
        self.write_line("sub rsp, 8");
        self.write_line("movsd [rsp], xmm0");
        self.stack.push(8);
        Ok(())
    }

    fn emit_bool_literal(&mut self, value: bool) -> CodegenResult<()> {
        self.write_line(format!("push qword {}", if value { 1 } else { 0 }));
        self.stack.push(8);
        Ok(())
    }

    fn emit_var_load(&mut self, name: &str) -> CodegenResult<()> {
        let slot = self.lookup_var(name);
        let words = slot.ty.size() / 8;
        for k in (0..words).rev() {
            let addr = self.slot_word_addr(&slot, k);
            self.write_line(format!("push qword {}", addr));
        }
        self.stack.push(words * 8);
        Ok(())
    }

    fn emit_unop(&mut self, op: UnopKind, operand: &Expr) -> CodegenResult<()> {
        self.emit_expr(operand)?;
        match op {
            UnopKind::Not => {
                self.write_line("pop rax");
                self.stack.pop();
                self.write_line("xor rax, 1");
                self.write_line("push rax");
                self.stack.push(8);
            }
            UnopKind::Neg => {
                if operand.resolved_type() == ResolvedType::Float {
                    self.write_line("movsd xmm0, [rsp]");
                    self.write_line("add rsp, 8");
                    self.stack.pop();
                    self.write_line("xorpd xmm1, xmm1");
                    self.write_line("subsd xmm1, xmm0");
                    self.write_line("sub rsp, 8");
                    self.write_line("movsd [rsp], xmm1");
                    self.stack.push(8);
                } else {
                    self.write_line("pop rax");
                    self.stack.pop();
                    self.write_line("neg rax");
                    self.write_line("push rax");
                    self.stack.push(8);
                }
            }
        }
        Ok(())
    }

    fn emit_binop(&mut self, op: BinopKind, lhs: &Expr, rhs: &Expr) -> CodegenResult<()> {
        if matches!(op, BinopKind::And | BinopKind::Or) {
            return self.emit_short_circuit(op, lhs, rhs);
        }
        self.emit_expr(lhs)?;
        self.emit_expr(rhs)?;
        if lhs.resolved_type() == ResolvedType::Float {
            self.emit_float_binop(op)
        } else {
            self.emit_int_binop(op)
        }
    }

    fn emit_short_circuit(&mut self, op: BinopKind, lhs: &Expr, rhs: &Expr) -> CodegenResult<()> {
        let skip = self.new_jump_label();
        let end = self.new_jump_label();
        self.emit_expr(lhs)?;
        self.write_line("pop rax");
        self.stack.pop();
        self.write_line("cmp rax, 0");
        match op {
            BinopKind::And => self.write_line(format!("je {}", skip)),
            BinopKind::Or => self.write_line(format!("jne {}", skip)),
            _ => unreachable!("only && and || short-circuit"),
        }
        self.emit_expr(rhs)?;
        self.write_line("pop rax");
        self.stack.pop();
        self.write_line(format!("jmp {}", end));
        self.label(&skip);
        let short_value = if op == BinopKind::And { 0 } else { 1 };
        self.write_line(format!("mov rax, {}", short_value));
        self.label(&end);
        self.write_line("push rax");
        self.stack.push(8);
        Ok(())
    }

    fn emit_int_binop(&mut self, op: BinopKind) -> CodegenResult<()> {
        self.write_line("pop rbx");
        self.write_line("pop rax");
        self.stack.pop();
        self.stack.pop();
        match op {
            BinopKind::Add => self.write_line("add rax, rbx"),
            BinopKind::Sub => self.write_line("sub rax, rbx"),
            BinopKind::Mul => self.write_line("imul rax, rbx"),
            BinopKind::Div => {
                self.emit_div_zero_check("divide by zero");
                self.write_line("cqo");
                self.write_line("idiv rbx");
            }
            BinopKind::Mod => {
                self.emit_div_zero_check("mod by zero");
                self.write_line("cqo");
                self.write_line("idiv rbx");
                self.write_line("mov rax, rdx");
            }
            BinopKind::Lt => self.emit_setcc("setl"),
            BinopKind::Gt => self.emit_setcc("setg"),
            BinopKind::Le => self.emit_setcc("setle"),
            BinopKind::Ge => self.emit_setcc("setge"),
            BinopKind::Eq => self.emit_setcc("sete"),
            BinopKind::Ne => self.emit_setcc("setne"),
            BinopKind::And | BinopKind::Or => unreachable!("handled by emit_short_circuit"),
        }
        self.write_line("push rax");
        self.stack.push(8);
        Ok(())
    }

    fn emit_setcc(&mut self, set_instr: &str) {
        self.write_line("cmp rax, rbx");
        self.write_line(format!("{} al", set_instr));
        self.write_line("movzx rax, al");
    }

    /// `rbx` must already hold the divisor. Fatally aborts, padding the
    /// call for alignment only if the abstract stack currently shows
    /// misalignment — this call never returns, so no symmetric unpad is
    /// needed afterward.
    fn emit_div_zero_check(&mut self, message: &str) {
        let ok = self.new_jump_label();
        self.write_line("cmp rbx, 0");
        self.write_line(format!("jne {}", ok));
        let msg = self.pool.intern_str(message);
        if self.stack.needs_alignment() {
            self.write_line("sub rsp, 8");
        }
        self.write_line(format!("lea rdi, [rel {}]", msg));
        self.write_line("call _fail_assertion");
        self.label(&ok);
    }

    fn emit_float_binop(&mut self, op: BinopKind) -> CodegenResult<()> {
        self.write_line("movsd xmm1, [rsp]");
        self.write_line("add rsp, 8");
        self.write_line("movsd xmm0, [rsp]");
        self.write_line("add rsp, 8");
        self.stack.pop();
        self.stack.pop();
        let is_comparison = op.is_ordering() || op.is_equality();
        match op {
            BinopKind::Add => self.write_line("addsd xmm0, xmm1"),
            BinopKind::Sub => self.write_line("subsd xmm0, xmm1"),
            BinopKind::Mul => self.write_line("mulsd xmm0, xmm1"),
            BinopKind::Div => self.write_line("divsd xmm0, xmm1"),
            BinopKind::Lt => self.emit_float_setcc("setb"),
            BinopKind::Gt => self.emit_float_setcc("seta"),
            BinopKind::Le => self.emit_float_setcc("setbe"),
            BinopKind::Ge => self.emit_float_setcc("setae"),
            BinopKind::Eq => self.emit_float_setcc("sete"),
            BinopKind::Ne => self.emit_float_setcc("setne"),
            BinopKind::Mod => self.emit_call_with_alignment("_fmod"),
            BinopKind::And | BinopKind::Or => unreachable!("handled by emit_short_circuit"),
        }
        if is_comparison {
            self.write_line("push rax");
        } else {
            self.write_line("sub rsp, 8");
            self.write_line("movsd [rsp], xmm0");
        }
        self.stack.push(8);
        Ok(())
    }

    fn emit_float_setcc(&mut self, set_instr: &str) {
        self.write_line("comisd xmm0, xmm1");
        self.write_line(format!("{} al", set_instr));
        self.write_line("movzx rax, al");
    }

    fn emit_if(&mut self, cond: &Expr, then_branch: &Expr, else_branch: &Expr) -> CodegenResult<()> {
        let else_label = self.new_jump_label();
        let end_label = self.new_jump_label();
        self.emit_expr(cond)?;
        self.write_line("pop rax");
        self.stack.pop();
        self.write_line("cmp rax, 0");
        self.write_line(format!("je {}", else_label));
        self.emit_expr(then_branch)?;
        self.write_line(format!("jmp {}", end_label));
        self.label(&else_label);
        // Only one branch's instructions actually run, but both push an
        // equal-sized result (checked by resolution), so the abstract
        // stack model must see exactly one push regardless of path: undo
        // the then-branch's accounting before emitting the else branch.
        self.stack.pop();
        self.emit_expr(else_branch)?;
        self.label(&end_label);
        Ok(())
    }

    /// Shrinks the top of the native stack from `base_size` bytes down
    /// to just the `field_size`-byte value currently living at
    /// `field_offset` bytes from `rsp`, relocating it to the new top.
    /// Copying high-to-low is always safe here: the destination
    /// (`gap` bytes from `rsp`) is always at or above the source, so
    /// copying the highest word first never overwrites data still to
    /// be read, regardless of whether source and destination overlap.
    fn relocate_to_top(&mut self, field_offset: i64, field_size: i64, base_size: i64) {
        let gap = base_size - field_size;
        if gap > 0 {
            let words = field_size / 8;
            for k in (0..words).rev() {
                self.write_line(format!("mov rax, [rsp + {}]", field_offset + k * 8));
                self.write_line(format!("mov [rsp + {}], rax", gap + k * 8));
            }
            self.write_line(format!("add rsp, {}", gap));
        }
    }

    fn emit_tuple_index(&mut self, base: &Expr, index: u32) -> CodegenResult<()> {
        self.emit_expr(base)?;
        let base_ty = base.resolved_type();
        let ResolvedType::Tuple(fields) = &base_ty else {
            return Err(CodegenError::Internal("tuple index on a non-tuple".to_string()));
        };
        let field_ty = fields[index as usize].clone();
        let field_offset = base_ty.tuple_offset(index as usize) as i64;
        let field_size = field_ty.size() as i64;
        let base_size = base_ty.size() as i64;

        // The field already sits inside base's memory; relocate it
        // rather than copying it to a fresh location.
        self.relocate_to_top(field_offset, field_size, base_size);
        self.stack.pop();
        self.stack.push(field_size as u64);
        Ok(())
    }

    fn emit_array_index(&mut self, base: &Expr, indices: &[Expr]) -> CodegenResult<()> {
        self.emit_expr(base)?;
        let base_ty = base.resolved_type();
        let ResolvedType::Array { element, .. } = &base_ty else {
            return Err(CodegenError::Internal("array index on a non-array".to_string()));
        };
        let elem_size = element.size();
        let elem_words = elem_size / 8;

        self.push_scope();

        // Stash the header's base address in a permanent frame slot
        // (not a register): the index expressions below may themselves
        // lower a nested array index that would clobber any scratch
        // register this one is still relying on.
        self.write_line("mov rax, rsp");
        self.write_line("push rax");
        self.stack.push(8);
        let base_addr_offset = self.declare_var("$idx_base", ResolvedType::Int);
        self.write_line("push qword 0");
        self.stack.push(8);
        let linear_offset = self.declare_var("$idx_linear", ResolvedType::Int);

        for (j, index_expr) in indices.iter().enumerate() {
            self.emit_expr(index_expr)?;
            self.write_line("pop rax");
            self.stack.pop();
            self.write_line(format!("mov rbx, [rbp - {}]", base_addr_offset));
            let dim_addr = format!("[rbx + {}]", (j as i64 + 1) * 8);
            self.emit_array_bounds_check(&dim_addr);
            if j > 0 {
                self.write_line(format!("mov rcx, [rbp - {}]", linear_offset));
                self.write_line(format!("imul rcx, qword [rbx + {}]", (j as i64 + 1) * 8));
                self.write_line("add rcx, rax");
                self.write_line(format!("mov [rbp - {}], rcx", linear_offset));
            } else {
                self.write_line(format!("mov [rbp - {}], rax", linear_offset));
            }
        }

        self.write_line(format!("mov rbx, [rbp - {}]", base_addr_offset));
        self.write_line("mov rbx, [rbx]"); // data pointer is header word 0
        self.write_line(format!("mov rax, [rbp - {}]", linear_offset));
        self.write_line(format!("imul rax, {}", elem_size));
        self.write_line("add rbx, rax");

        // `rbx` is now a heap address, independent of the native stack,
        // so the base's header and this call's two bookkeeping slots
        // can be reclaimed before pushing the element: this expression
        // must grow the frame by exactly `elem_words * 8` bytes, not by
        // however much scratch it needed to get there.
        let scratch_bytes = base_ty.size() + 16;
        self.write_line(format!("add rsp, {}", scratch_bytes));
        self.stack.pop(); // $idx_linear
        self.stack.pop(); // $idx_base
        self.stack.pop(); // base header
        for k in (0..elem_words).rev() {
            self.write_line(format!("push qword [rbx + {}]", k * 8));
        }
        self.stack.push(elem_words * 8);

        self.pop_scope();
        Ok(())
    }

    /// `rax` holds the candidate index, `dim_addr` the bound to check
    /// against. Aborts (never returns) on an out-of-range index.
    fn emit_array_bounds_check(&mut self, dim_addr: &str) {
        let ok = self.new_jump_label();
        let fail = self.new_jump_label();
        self.write_line("cmp rax, 0");
        self.write_line(format!("jl {}", fail));
        self.write_line(format!("cmp rax, {}", dim_addr));
        self.write_line(format!("jl {}", ok));
        self.label(&fail);
        let msg = self.pool.intern_str("array index out of bounds");
        if self.stack.needs_alignment() {
            self.write_line("sub rsp, 8");
        }
        self.write_line(format!("lea rdi, [rel {}]", msg));
        self.write_line("call _fail_assertion");
        self.label(&ok);
    }

    fn emit_tuple_literal(&mut self, fields: &[Expr]) -> CodegenResult<()> {
        // Pushed in reverse so field 0 ends up at the lowest address,
        // matching every other multi-word value's word-0-low layout.
        let before = self.stack.depth();
        for field in fields.iter().rev() {
            self.emit_expr(field)?;
        }
        // Every other expression form leaves exactly one model entry
        // behind regardless of its word count; collapse this literal's
        // one-entry-per-field pushes the same way, so a caller that
        // discards a whole tuple value (an untaken `if` branch, a
        // spilled call argument) can do it with a single `pop()`.
        let total = self.stack.depth() - before;
        while self.stack.depth() > before {
            self.stack.pop();
        }
        self.stack.push(total);
        Ok(())
    }

    fn emit_array_literal(&mut self, elements: &[Expr]) -> CodegenResult<()> {
        let Some(first) = elements.first() else {
            return Err(CodegenError::Internal("empty array literal reached codegen".to_string()));
        };
        let elem_ty = first.resolved_type();
        let elem_size = elem_ty.size();
        let elem_words = elem_size / 8;
        let total_bytes = elem_size * elements.len() as u64;

        self.push_scope();
        self.write_line(format!("mov rdi, {}", total_bytes));
        self.emit_call_with_alignment("_jpl_alloc");
        self.write_line("push rax");
        self.stack.push(8);
        // Kept in a frame slot, not a register: an element expression
        // may itself be an array literal whose own allocation would
        // otherwise clobber a register this one is still relying on.
        let buf_offset = self.declare_var("$buffer", ResolvedType::Int);

        for (i, element) in elements.iter().enumerate() {
            self.emit_expr(element)?;
            self.write_line(format!("mov rbx, [rbp - {}]", buf_offset));
            for k in 0..elem_words {
                self.write_line("pop rax");
                self.write_line(format!("mov [rbx + {}], rax", i as u64 * elem_size + k * 8));
            }
            // `element` left exactly one model entry regardless of its
            // word count.
            self.stack.pop();
        }

        self.write_line(format!("mov rax, {}", elements.len()));
        self.write_line("push rax");
        self.write_line(format!("push qword [rbp - {}]", buf_offset));
        self.stack.push(16);
        // Reclaim the now-redundant `$buffer` slot: this expression
        // must grow the frame by exactly the 16-byte header, not by the
        // header plus its own scratch.
        self.relocate_to_top(0, 16, 24);
        self.stack.pop(); // header
        self.stack.pop(); // $buffer
        self.stack.push(16);
        self.pop_scope();
        Ok(())
    }

    /// Evaluates each comprehension bound in turn and keeps it as a
    /// permanent frame slot, returning their `rbp` offsets.
    fn emit_loop_bounds(&mut self, bindings: &[(String, Expr)]) -> CodegenResult<Vec<i64>> {
        let mut dim_offsets = Vec::with_capacity(bindings.len());
        for (j, (_, bound)) in bindings.iter().enumerate() {
            self.emit_expr(bound)?;
            let offset = self.declare_var(&format!("$dim{j}"), ResolvedType::Int);
            dim_offsets.push(offset);
        }
        Ok(dim_offsets)
    }

    /// Drives a nested loop over `bindings` (outermost index varies
    /// slowest) given already-evaluated bounds, calling `on_iteration`
    /// once per combination. The running linear index is recomputed into
    /// a permanent frame slot before each call rather than kept in a
    /// register, since `on_iteration` may itself lower arbitrary nested
    /// expressions that are free to clobber any scratch register.
    fn emit_nested_loop(
        &mut self,
        bindings: &[(String, Expr)],
        dim_offsets: &[i64],
        mut on_iteration: impl FnMut(&mut Self, i64) -> CodegenResult<()>,
    ) -> CodegenResult<()> {
        self.write_line("push qword 0");
        self.stack.push(8);
        let linear_offset = self.declare_var("$linear_index", ResolvedType::Int);

        let mut index_offsets = Vec::with_capacity(bindings.len());
        for (name, _) in bindings {
            self.write_line("push qword 0");
            self.stack.push(8);
            let offset = self.declare_var(name, ResolvedType::Int);
            index_offsets.push(offset);
        }

        let mut loop_starts = Vec::with_capacity(bindings.len());
        let mut loop_ends = Vec::with_capacity(bindings.len());
        for (i, &dim_offset) in dim_offsets.iter().enumerate() {
            let start = self.new_jump_label();
            let end = self.new_jump_label();
            self.label(&start);
            self.write_line(format!("mov rax, [rbp - {}]", index_offsets[i]));
            self.write_line(format!("cmp rax, [rbp - {}]", dim_offset));
            self.write_line(format!("jge {}", end));
            loop_starts.push(start);
            loop_ends.push(end);
        }

        // Linear index = ((i0 * n1 + i1) * n2 + i2) ... in row-major order.
        self.write_line("mov rax, 0");
        for (i, &index_offset) in index_offsets.iter().enumerate() {
            if i > 0 {
                self.write_line(format!("imul rax, qword [rbp - {}]", dim_offsets[i]));
            }
            self.write_line(format!("add rax, [rbp - {}]", index_offset));
        }
        self.write_line(format!("mov [rbp - {}], rax", linear_offset));

        on_iteration(self, linear_offset)?;

        for (i, (start, end)) in loop_starts.iter().zip(loop_ends.iter()).enumerate().rev() {
            self.write_line(format!("inc qword [rbp - {}]", index_offsets[i]));
            self.write_line(format!("jmp {}", start));
            self.label(end);
        }
        Ok(())
    }

    fn emit_array_loop(&mut self, bindings: &[(String, Expr)], body: &Expr) -> CodegenResult<()> {
        let elem_ty = body.resolved_type();
        let elem_size = elem_ty.size();
        let elem_words = elem_size / 8;

        self.push_scope();
        let dim_offsets = self.emit_loop_bounds(bindings)?;

        self.write_line("mov rax, 1");
        for &offset in &dim_offsets {
            self.write_line(format!("imul rax, qword [rbp - {}]", offset));
        }
        self.write_line(format!("imul rax, {}", elem_size));
        self.write_line("mov rdi, rax");
        self.emit_call_with_alignment("_jpl_alloc");
        self.write_line("push rax");
        self.stack.push(8);
        let buf_offset = self.declare_var("$buffer", ResolvedType::Int);

        self.emit_nested_loop(bindings, &dim_offsets, |gen, linear_offset| {
            gen.emit_expr(body)?;
            gen.write_line(format!("mov rbx, [rbp - {}]", buf_offset));
            gen.write_line(format!("mov rcx, [rbp - {}]", linear_offset));
            gen.write_line(format!("imul rcx, {}", elem_size));
            for k in 0..elem_words {
                gen.write_line("pop rax");
                gen.write_line(format!("mov [rbx + rcx + {}], rax", k * 8));
            }
            // `body` left exactly one model entry (of `elem_size` bytes)
            // regardless of how many real `pop`s draining it took.
            gen.stack.pop();
            Ok(())
        })?;

        // Pointer-first header: [data_ptr, dim1, ..., dimk]. Pushed in
        // reverse so the pointer ends up at the lowest address (word 0).
        for &offset in dim_offsets.iter().rev() {
            self.write_line(format!("push qword [rbp - {}]", offset));
        }
        self.write_line(format!("push qword [rbp - {}]", buf_offset));
        let result_size = (dim_offsets.len() as u64 + 1) * 8;
        self.stack.push(result_size);

        // Reclaim this comprehension's own bookkeeping (dims, buffer
        // pointer, linear index, loop indices): the expression as a
        // whole must grow the frame by exactly the result header, not
        // by the header plus everything it took to build it.
        let rank = dim_offsets.len() as u64;
        let scratch_bytes = 16 * rank + 16;
        self.relocate_to_top(0, result_size as i64, (result_size + scratch_bytes) as i64);
        for _ in 0..(2 * dim_offsets.len() + 3) {
            self.stack.pop();
        }
        self.stack.push(result_size);

        self.pop_scope();
        Ok(())
    }

    fn emit_sum_loop(&mut self, bindings: &[(String, Expr)], body: &Expr) -> CodegenResult<()> {
        let body_ty = body.resolved_type();
        let is_float = body_ty == ResolvedType::Float;

        self.push_scope();
        let dim_offsets = self.emit_loop_bounds(bindings)?;

        if is_float {
            self.write_line("xorpd xmm0, xmm0");
            self.write_line("sub rsp, 8");
            self.write_line("movsd [rsp], xmm0");
        } else {
            self.write_line("push qword 0");
        }
        self.stack.push(8);
        let acc_ty = if is_float { ResolvedType::Float } else { ResolvedType::Int };
        let acc_offset = self.declare_var("$accumulator", acc_ty);

        self.emit_nested_loop(bindings, &dim_offsets, |gen, _linear_offset| {
            gen.emit_expr(body)?;
            if is_float {
                gen.write_line("movsd xmm0, [rsp]");
                gen.write_line("add rsp, 8");
                gen.stack.pop();
                gen.write_line(format!("movsd xmm1, [rbp - {}]", acc_offset));
                gen.write_line("addsd xmm1, xmm0");
                gen.write_line(format!("movsd [rbp - {}], xmm1", acc_offset));
            } else {
                gen.write_line("pop rax");
                gen.stack.pop();
                gen.write_line(format!("add [rbp - {}], rax", acc_offset));
            }
            Ok(())
        })?;

        if is_float {
            self.write_line(format!("movsd xmm0, [rbp - {}]", acc_offset));
            self.write_line("sub rsp, 8");
            self.write_line("movsd [rsp], xmm0");
        } else {
            self.write_line(format!("mov rax, [rbp - {}]", acc_offset));
            self.write_line("push rax");
        }
        self.stack.push(8);

        // Reclaim this comprehension's own bookkeeping (dims,
        // accumulator, linear index, loop indices): the expression as a
        // whole must grow the frame by exactly the 8-byte accumulator.
        let rank = dim_offsets.len() as u64;
        let scratch_bytes = 16 * rank + 16;
        self.relocate_to_top(0, 8, (8 + scratch_bytes) as i64);
        for _ in 0..(2 * dim_offsets.len() + 3) {
            self.stack.pop();
        }
        self.stack.push(8);

        self.pop_scope();
        Ok(())
    }
}
