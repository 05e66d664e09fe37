//! x86-64 (NASM, System V) code generation.
//!
//! Every expression lowers to pushing exactly `sizeof(resolved_type)`
//! bytes onto the native stack (the "stack machine" model): operators
//! pop their operands' words back off, compute, and push the result's
//! words. A `let` binding never pops its value back off — the address
//! it occupies becomes that name's permanent home for the rest of the
//! enclosing function, addressed as a fixed offset from `rbp` (which
//! never moves once a function's prologue runs).

mod call;
mod error;
mod expr;
mod program;
mod stmt;

use std::collections::HashMap;

use jplc_parser::{Arg, Binding, LValue, ResolvedType};

pub use error::{CodegenError, CodegenResult};

use crate::constant_pool::ConstantPool;
use crate::resolve::Resolver;
use crate::stack_model::StackModel;

#[derive(Debug, Clone)]
struct VarSlot {
    /// Bytes from `rbp` down to the low (first) address of this value:
    /// the value occupies `[rbp - offset, rbp - offset + size)`.
    offset: i64,
    ty: ResolvedType,
}

pub struct CodeGenerator<'a> {
    text: String,
    indent_level: usize,
    pool: ConstantPool,
    stack: StackModel,
    scopes: Vec<HashMap<String, VarSlot>>,
    resolver: &'a Resolver,
    current_return: Option<ResolvedType>,
}

impl<'a> CodeGenerator<'a> {
    fn new(resolver: &'a Resolver) -> Self {
        CodeGenerator {
            text: String::new(),
            indent_level: 0,
            pool: ConstantPool::new(),
            stack: StackModel::new(),
            scopes: vec![HashMap::new()],
            resolver,
            current_return: None,
        }
    }

    fn write_line(&mut self, line: impl AsRef<str>) {
        for _ in 0..self.indent_level {
            self.text.push_str("    ");
        }
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    fn label(&mut self, name: impl AsRef<str>) {
        self.text.push_str(name.as_ref());
        self.text.push_str(":\n");
    }

    fn blank_line(&mut self) {
        self.text.push('\n');
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "cannot pop the function's root scope");
        self.scopes.pop();
    }

    /// Names the value that was *just* pushed (the caller must have
    /// already emitted the push): records its address as `name`'s
    /// permanent home for the rest of the enclosing function. Between
    /// statements `self.stack.depth()` always equals the frame's
    /// permanent size, since every temporary push this generator emits
    /// is popped in balance before the statement ends.
    fn declare_var(&mut self, name: &str, ty: ResolvedType) -> i64 {
        let offset = self.stack.depth() as i64;
        self.declare_slot_at(name, ty, offset);
        offset
    }

    /// Records `name`'s address directly, without assuming anything was
    /// just pushed. Used for incoming stack-passed parameters, whose
    /// slot sits *above* `rbp` rather than growing down from it.
    fn declare_slot_at(&mut self, name: &str, ty: ResolvedType, offset: i64) {
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name.to_string(), VarSlot { offset, ty });
    }

    /// Declares an `Arg` pattern against a value whose low-address word
    /// sits at `offset` bytes from `rbp`. An `Arg::Array` additionally
    /// binds each dimension name as its own `int` slot, pointing
    /// straight at the matching word of the array's own header.
    fn declare_arg_at(&mut self, arg: &Arg, ty: &ResolvedType, offset: i64) {
        match arg {
            Arg::Var(name) => self.declare_slot_at(name, ty.clone(), offset),
            Arg::Array(name, dims) => {
                self.declare_slot_at(name, ty.clone(), offset);
                for (j, dim) in dims.iter().enumerate() {
                    let dim_offset = offset - (j as i64 + 1) * 8;
                    self.declare_slot_at(dim, ResolvedType::Int, dim_offset);
                }
            }
        }
    }

    /// Declares a function-parameter `Binding` against a value at
    /// `offset`, recursing into tuple patterns using the same
    /// low-address-word-0 offset arithmetic as every other multi-word
    /// value.
    fn declare_binding_at(&mut self, binding: &Binding, ty: &ResolvedType, offset: i64) {
        match binding {
            Binding::Var(arg, _) => self.declare_arg_at(arg, ty, offset),
            Binding::Tuple(fields) => {
                let ResolvedType::Tuple(field_tys) = ty else {
                    panic!("codegen bug: tuple binding against a non-tuple type");
                };
                for (i, field_binding) in fields.iter().enumerate() {
                    let field_offset = offset - ty.tuple_offset(i) as i64;
                    self.declare_binding_at(field_binding, &field_tys[i], field_offset);
                }
            }
        }
    }

    /// Declares a `let` `LValue` against an already-pushed value at
    /// `offset`. Tuple patterns bind names directly into the pushed
    /// value's own memory rather than copying anything out of it.
    fn declare_lvalue_at(&mut self, lvalue: &LValue, ty: &ResolvedType, offset: i64) {
        match lvalue {
            LValue::Arg(arg) => self.declare_arg_at(arg, ty, offset),
            LValue::Tuple(fields) => {
                let ResolvedType::Tuple(field_tys) = ty else {
                    panic!("codegen bug: tuple lvalue against a non-tuple type");
                };
                for (i, field_lvalue) in fields.iter().enumerate() {
                    let field_offset = offset - ty.tuple_offset(i) as i64;
                    self.declare_lvalue_at(field_lvalue, &field_tys[i], field_offset);
                }
            }
        }
    }

    fn lookup_var(&self, name: &str) -> VarSlot {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
            .unwrap_or_else(|| panic!("codegen bug: '{name}' has no stack slot (resolver should have rejected this)"))
    }

    /// The operand string for word `word` (0-based, counting up from
    /// the value's low-address end) of a slot. Incoming stack
    /// parameters live above `rbp` and so carry a negative `offset`;
    /// the displacement is formatted with its own sign rather than
    /// relying on NASM to parse a double negative.
    fn slot_word_addr(&self, slot: &VarSlot, word: u64) -> String {
        let disp = slot.offset - (word as i64) * 8;
        if disp >= 0 {
            format!("[rbp - {}]", disp)
        } else {
            format!("[rbp + {}]", -disp)
        }
    }

    fn new_jump_label(&mut self) -> String {
        self.pool.next_jump_label()
    }

    /// Emits `call target`, padding the stack by 8 bytes first when the
    /// abstract stack model shows misalignment, and undoing the pad
    /// afterward. Used for both user-function calls and runtime-helper
    /// calls, since both must meet the SysV 16-byte alignment rule at
    /// the `call` instruction.
    fn emit_call_with_alignment(&mut self, target: &str) {
        let padded = self.stack.needs_alignment();
        if padded {
            self.write_line("sub rsp, 8");
            self.stack.push(8);
        }
        self.write_line(format!("call {}", target));
        if padded {
            self.write_line("add rsp, 8");
            self.stack.pop();
        }
    }

    fn finish(self) -> String {
        let mut out = String::new();
        for ext in EXTERN_RUNTIME_SYMBOLS {
            out.push_str(&format!("extern {}\n", ext));
        }
        out.push('\n');
        out.push_str("section .data\n");
        for (name, constant) in self.pool.entries() {
            match constant {
                crate::constant_pool::Constant::Int(v) => {
                    out.push_str(&format!("{} dq {}\n", name, v));
                }
                crate::constant_pool::Constant::Float(v) => {
                    out.push_str(&format!(
                        "{} dq {}\n",
                        name,
                        crate::constant_pool::format_float_literal(*v)
                    ));
                }
                crate::constant_pool::Constant::Str(s) => {
                    out.push_str(&format!("{} db `{}`, 0\n", name, escape_nasm_string(s)));
                }
            }
        }
        out.push('\n');
        out.push_str("section .text\n");
        out.push_str("global _jpl_main\n\n");
        out.push_str(&self.text);
        out
    }
}

/// Runtime helpers this compiler's output assumes are provided by the
/// linked-in runtime library.
const EXTERN_RUNTIME_SYMBOLS: &[&str] = &[
    "_jpl_alloc",
    "_fail_assertion",
    "_show",
    "_print",
    "_print_time",
    "_get_time",
    "_read_image",
    "_write_image",
    "_fmod",
];

fn escape_nasm_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('`', "\\`")
}

/// The assembly label for a user-defined JPL function, kept distinct
/// from both the runtime's `_`-prefixed helpers and `_jpl_main`.
fn function_label(name: &str) -> String {
    format!("_fn_{}", name)
}

pub fn generate(program: &jplc_parser::Program, resolver: &Resolver) -> CodegenResult<String> {
    let mut generator = CodeGenerator::new(resolver);
    generator.emit_program(program)?;
    Ok(generator.finish())
}
