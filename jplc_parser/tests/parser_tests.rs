use jplc_parser::{parse, BinopKind, Command, ExprKind, Stmt};

#[test]
fn parses_let_and_show() {
    let program = parse("let x = 5\nshow x\n").unwrap();
    assert_eq!(program.len(), 2);
    match &program[0] {
        Command::Let(_, expr) => assert!(matches!(expr.kind, ExprKind::Int(5))),
        other => panic!("expected let, got {other:?}"),
    }
    match &program[1] {
        Command::Show(expr) => assert!(matches!(expr.kind, ExprKind::Var(ref n) if n == "x")),
        other => panic!("expected show, got {other:?}"),
    }
}

#[test]
fn respects_arithmetic_precedence() {
    let program = parse("show 1 + 2 * 3\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    match &expr.kind {
        ExprKind::Binop(BinopKind::Add, lhs, rhs) => {
            assert!(matches!(lhs.kind, ExprKind::Int(1)));
            assert!(matches!(rhs.kind, ExprKind::Binop(BinopKind::Mul, _, _)));
        }
        other => panic!("expected +, got {other:?}"),
    }
}

#[test]
fn left_associates_same_precedence_level() {
    let program = parse("show 10 - 3 - 2\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    // (10 - 3) - 2, not 10 - (3 - 2)
    match &expr.kind {
        ExprKind::Binop(BinopKind::Sub, lhs, rhs) => {
            assert!(matches!(rhs.kind, ExprKind::Int(2)));
            assert!(matches!(lhs.kind, ExprKind::Binop(BinopKind::Sub, _, _)));
        }
        other => panic!("expected -, got {other:?}"),
    }
}

#[test]
fn unary_minus_binds_tighter_than_multiplication() {
    let program = parse("show -2 * 3\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    assert!(matches!(expr.kind, ExprKind::Binop(BinopKind::Mul, _, _)));
}

#[test]
fn boolean_operators_are_loosest() {
    let program = parse("show 1 < 2 && 3 > 4\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    match &expr.kind {
        ExprKind::Binop(BinopKind::And, lhs, rhs) => {
            assert!(matches!(lhs.kind, ExprKind::Binop(BinopKind::Lt, _, _)));
            assert!(matches!(rhs.kind, ExprKind::Binop(BinopKind::Gt, _, _)));
        }
        other => panic!("expected &&, got {other:?}"),
    }
}

#[test]
fn parses_if_then_else() {
    let program = parse("show if 1 < 2 then 3 else 4\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    assert!(matches!(expr.kind, ExprKind::If(_, _, _)));
}

#[test]
fn parses_array_comprehension() {
    let program = parse("show array[i : 10, j : 20] i + j\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    match &expr.kind {
        ExprKind::ArrayLoop(bindings, body) => {
            assert_eq!(bindings.len(), 2);
            assert_eq!(bindings[0].0, "i");
            assert_eq!(bindings[1].0, "j");
            assert!(matches!(body.kind, ExprKind::Binop(BinopKind::Add, _, _)));
        }
        other => panic!("expected array loop, got {other:?}"),
    }
}

#[test]
fn parses_sum_comprehension() {
    let program = parse("show sum[i : n] a[i]\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    assert!(matches!(expr.kind, ExprKind::SumLoop(_, _)));
}

#[test]
fn parses_array_index_and_tuple_index_postfix() {
    let program = parse("show a[0, 1]{2}\n").unwrap();
    let Command::Show(expr) = &program[0] else {
        panic!("expected show")
    };
    match &expr.kind {
        ExprKind::TupleIndex(inner, 2) => {
            assert!(matches!(inner.kind, ExprKind::ArrayIndex(_, ref idx) if idx.len() == 2));
        }
        other => panic!("expected tuple index, got {other:?}"),
    }
}

#[test]
fn parses_function_call_vs_bare_variable() {
    let program = parse("show f(1, 2)\nshow y\n").unwrap();
    assert!(matches!(
        &program[0],
        Command::Show(e) if matches!(e.kind, ExprKind::Call(ref name, ref args) if name == "f" && args.len() == 2)
    ));
    assert!(matches!(
        &program[1],
        Command::Show(e) if matches!(e.kind, ExprKind::Var(ref n) if n == "y")
    ));
}

#[test]
fn parses_function_definition() {
    let src = "fn add(x : int, y : int) : int {\nreturn x + y\n}\n";
    let program = parse(src).unwrap();
    match &program[0] {
        Command::Fn(name, params, ret_ty, body) => {
            assert_eq!(name, "add");
            assert_eq!(params.len(), 2);
            assert_eq!(*ret_ty, jplc_parser::TypeExpr::Int);
            assert_eq!(body.len(), 1);
            assert!(matches!(body[0], Stmt::Return(_)));
        }
        other => panic!("expected fn, got {other:?}"),
    }
}

#[test]
fn parses_tuple_and_array_types_with_rank() {
    let src = "fn f(a : array[int, 2], t : {int, float}) : bool {\nreturn true\n}\n";
    let program = parse(src).unwrap();
    let Command::Fn(_, params, _, _) = &program[0] else {
        panic!("expected fn")
    };
    match &params[0] {
        jplc_parser::Binding::Var(_, jplc_parser::TypeExpr::Array(elem, rank)) => {
            assert_eq!(**elem, jplc_parser::TypeExpr::Int);
            assert_eq!(*rank, 2);
        }
        other => panic!("expected array type, got {other:?}"),
    }
}

#[test]
fn parses_read_and_write_image() {
    let program = parse("read image \"in.png\" to x\nwrite image x to \"out.png\"\n").unwrap();
    assert!(matches!(&program[0], Command::Read(path, _) if path == "in.png"));
    assert!(matches!(&program[1], Command::Write(_, path) if path == "out.png"));
}

#[test]
fn parses_time_wrapping_a_command() {
    let program = parse("time show 1\n").unwrap();
    match &program[0] {
        Command::Time(inner) => assert!(matches!(**inner, Command::Show(_))),
        other => panic!("expected time, got {other:?}"),
    }
}

#[test]
fn parses_assert_and_type_alias() {
    let program = parse("assert 1 < 2, \"ok\"\ntype pixel = {float, float, float, float}\n").unwrap();
    assert!(matches!(&program[0], Command::Assert(_, msg) if msg == "ok"));
    assert!(matches!(&program[1], Command::Type(name, _) if name == "pixel"));
}

#[test]
fn reports_fatal_error_on_missing_then() {
    let err = parse("show if 1 < 2 3 else 4\n").unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn reports_error_on_malformed_let() {
    let err = parse("let = 5\n").unwrap_err();
    assert!(err.is_fatal());
}
