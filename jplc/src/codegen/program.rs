//! Top-level program emission: `_jpl_main` runs every non-`fn`
//! command in source order; each `fn` becomes its own labeled
//! subroutine, emitted afterward so their order in the output doesn't
//! have to match where they were declared.

use jplc_parser::{Command, Program, ResolvedType};

use super::{CodeGenerator, CodegenResult};

impl<'a> CodeGenerator<'a> {
    pub(super) fn emit_program(&mut self, program: &Program) -> CodegenResult<()> {
        self.emit_main(program)?;

        for command in program {
            if let Command::Fn(name, params, _ret_type, body) = command {
                self.blank_line();
                self.emit_function(name, params, body)?;
            }
        }
        Ok(())
    }

    fn emit_main(&mut self, program: &Program) -> CodegenResult<()> {
        self.label("_jpl_main");
        self.write_line("push rbp");
        self.write_line("mov rbp, rsp");

        // `argnum`/`args` are seeded into every program's symbol table
        // ahead of user code; parsing `argv` into `args`'s elements is
        // out of scope here, so `args` starts out empty and `argnum`
        // reports the raw argument count handed to `_jpl_main`.
        self.write_line("mov rax, rdi");
        self.write_line("dec rax");
        self.write_line("push rax");
        self.stack.push(8);
        self.declare_var("argnum", ResolvedType::Int);
        self.write_line("push qword 0"); // args: dim1
        self.stack.push(8);
        self.write_line("push qword 0"); // args: data pointer (word 0)
        self.stack.push(8);
        self.declare_var("args", ResolvedType::array(ResolvedType::Int, 1));

        for command in program {
            if matches!(command, Command::Fn(..)) {
                continue;
            }
            self.emit_command(command)?;
        }

        self.write_line("mov rsp, rbp");
        self.write_line("pop rbp");
        self.write_line("mov rax, 0");
        self.write_line("ret");
        Ok(())
    }

    fn emit_command(&mut self, command: &Command) -> CodegenResult<()> {
        match command {
            Command::Let(lvalue, value) => self.emit_let(lvalue, value),
            Command::Assert(cond, message) => self.emit_assert(cond, message),
            Command::Fn(..) => Ok(()),
            Command::Type(..) => Ok(()),
            Command::Print(text) => {
                let msg_const = self.pool.intern_str(text);
                self.write_line(format!("lea rdi, [rel {}]", msg_const));
                self.emit_call_with_alignment("_print");
                Ok(())
            }
            Command::Show(value) => {
                let ty = value.resolved_type();
                self.emit_expr(value)?;
                let type_const = self.pool.intern_str(&ty.s_expression());
                self.write_line(format!("lea rdi, [rel {}]", type_const));
                self.write_line("mov rsi, rsp");
                self.emit_call_with_alignment("_show");
                self.write_line(format!("add rsp, {}", ty.size()));
                self.stack.pop();
                Ok(())
            }
            Command::Read(path, target) => {
                let ty = ResolvedType::image_type();
                self.write_line(format!("sub rsp, {}", ty.size()));
                self.stack.push(ty.size());
                let path_const = self.pool.intern_str(path);
                self.write_line("mov rdi, rsp");
                self.write_line(format!("lea rsi, [rel {}]", path_const));
                self.emit_call_with_alignment("_read_image");
                let offset = self.stack.depth() as i64;
                self.declare_arg_at(target, &ty, offset);
                Ok(())
            }
            Command::Write(value, path) => {
                let ty = value.resolved_type();
                self.emit_expr(value)?;
                let path_const = self.pool.intern_str(path);
                self.write_line("mov rdi, rsp");
                self.write_line(format!("lea rsi, [rel {}]", path_const));
                self.emit_call_with_alignment("_write_image");
                self.write_line(format!("add rsp, {}", ty.size()));
                self.stack.pop();
                Ok(())
            }
            Command::Time(inner) => {
                self.emit_call_with_alignment("_get_time");
                self.write_line("sub rsp, 8");
                self.write_line("movsd [rsp], xmm0");
                self.stack.push(8);
                self.emit_command(inner)?;
                self.emit_call_with_alignment("_get_time");
                self.write_line("movsd xmm1, [rsp]");
                self.write_line("add rsp, 8");
                self.stack.pop();
                self.write_line("subsd xmm0, xmm1");
                self.emit_call_with_alignment("_print_time");
                Ok(())
            }
        }
    }
}
