//! A generic post-order walk over the AST, used as a stable extension
//! point. No concrete pass is implemented on top of it here — the
//! optional constant-propagation and tensor-contraction-recognition
//! visitors are out of scope, but anything implementing `Visitor` can
//! be driven by `walk_program` without touching the walker itself.

use jplc_parser::{Command, Expr, ExprKind, Program, Stmt};

pub trait Visitor {
    fn visit_expr(&mut self, expr: &Expr) {
        let _ = expr;
    }
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for command in program {
        walk_command(visitor, command);
    }
}

pub fn walk_command<V: Visitor>(visitor: &mut V, command: &Command) {
    match command {
        Command::Assert(cond, _) => walk_expr(visitor, cond),
        Command::Let(_, value) => walk_expr(visitor, value),
        Command::Fn(_, _, _, body) => {
            for stmt in body {
                walk_stmt(visitor, stmt);
            }
        }
        Command::Print(_) => {}
        Command::Read(_, _) => {}
        Command::Show(value) => walk_expr(visitor, value),
        Command::Time(inner) => walk_command(visitor, inner),
        Command::Type(_, _) => {}
        Command::Write(value, _) => walk_expr(visitor, value),
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Assert(cond, _) => walk_expr(visitor, cond),
        Stmt::Let(_, value) => walk_expr(visitor, value),
        Stmt::Return(value) => walk_expr(visitor, value),
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::True
        | ExprKind::False
        | ExprKind::Var(_) => {}
        ExprKind::Unop(_, operand) => walk_expr(visitor, operand),
        ExprKind::Binop(_, lhs, rhs) => {
            walk_expr(visitor, lhs);
            walk_expr(visitor, rhs);
        }
        ExprKind::If(cond, then_branch, else_branch) => {
            walk_expr(visitor, cond);
            walk_expr(visitor, then_branch);
            walk_expr(visitor, else_branch);
        }
        ExprKind::Call(_, args) => {
            for arg in args {
                walk_expr(visitor, arg);
            }
        }
        ExprKind::ArrayIndex(base, indices) => {
            walk_expr(visitor, base);
            for index in indices {
                walk_expr(visitor, index);
            }
        }
        ExprKind::TupleIndex(base, _) => walk_expr(visitor, base),
        ExprKind::ArrayLiteral(elements) | ExprKind::TupleLiteral(elements) => {
            for element in elements {
                walk_expr(visitor, element);
            }
        }
        ExprKind::ArrayLoop(bindings, body) | ExprKind::SumLoop(bindings, body) => {
            for (_, bound) in bindings {
                walk_expr(visitor, bound);
            }
            walk_expr(visitor, body);
        }
    }
    visitor.visit_expr(expr);
}

#[cfg(test)]
mod tests {
    use super::*;
    use jplc_parser::parse;

    struct Counter(usize);
    impl Visitor for Counter {
        fn visit_expr(&mut self, _expr: &Expr) {
            self.0 += 1;
        }
    }

    #[test]
    fn visits_every_expression_exactly_once() {
        let program = parse("show 1 + 2 * 3\n").unwrap();
        let mut counter = Counter(0);
        walk_program(&mut counter, &program);
        // 1, 2, 3, (2*3), (1+(2*3))
        assert_eq!(counter.0, 5);
    }
}
