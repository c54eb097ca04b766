use formel_ast::ast::{BinOp, Expr, UnOp};
use formel_parse::parse_str;

fn val(src: &str) -> Expr {
    let mut program = parse_str(src, false).unwrap();
    program.stmts.remove(0)
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    // ((2 + 20) + (21,1 * 2)) + 1
    let Expr::Binary {
        op: BinOp::Add,
        lhs,
        rhs,
        ..
    } = val("2 + 20 + 21,1 * 2 + 1")
    else {
        panic!("top should be Add");
    };
    assert!(matches!(*rhs, Expr::Literal(_, _)));
    let Expr::Binary {
        op: BinOp::Add,
        rhs: inner_rhs,
        ..
    } = *lhs
    else {
        panic!("lhs should be Add");
    };
    assert!(matches!(*inner_rhs, Expr::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn power_binds_tighter_than_subtraction() {
    let Expr::Binary {
        op: BinOp::Sub,
        lhs,
        ..
    } = val("2 ** 10 -1")
    else {
        panic!("top should be Sub");
    };
    assert!(matches!(*lhs, Expr::Binary { op: BinOp::Pow, .. }));
}

#[test]
fn power_is_right_associative() {
    let Expr::Binary {
        op: BinOp::Pow,
        lhs,
        rhs,
        ..
    } = val("2 ** 3 ** 2")
    else {
        panic!("top should be Pow");
    };
    assert!(matches!(*lhs, Expr::Literal(_, _)));
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::Pow, .. }));
}

#[test]
fn root_is_left_associative() {
    let Expr::Binary {
        op: BinOp::Root,
        lhs,
        ..
    } = val(r"64 \ 2 \ 3")
    else {
        panic!("top should be Root");
    };
    assert!(matches!(*lhs, Expr::Binary { op: BinOp::Root, .. }));
}

#[test]
fn shifts_bind_looser_than_additive() {
    let Expr::Binary {
        op: BinOp::Shl,
        rhs,
        ..
    } = val("1 << 2 + 3")
    else {
        panic!("top should be Shl");
    };
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::Add, .. }));
}

#[test]
fn bitwise_or_is_loosest_of_the_bit_operators() {
    let Expr::Binary {
        op: BinOp::BitOr,
        rhs,
        ..
    } = val("1 | 2 & 3")
    else {
        panic!("top should be BitOr");
    };
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::BitAnd, .. }));
}

#[test]
fn assignment_is_right_associative() {
    let Expr::Assign { name, value, .. } = val("a = b = 2") else {
        panic!("top should be Assign");
    };
    assert_eq!(name.text, "a");
    assert!(matches!(*value, Expr::Assign { .. }));
}

#[test]
fn postfix_factorial_binds_tighter_than_prefix_minus() {
    let Expr::Unary {
        op: UnOp::Neg,
        expr,
        ..
    } = val("-3//")
    else {
        panic!("top should be Neg");
    };
    assert!(matches!(
        *expr,
        Expr::Unary {
            op: UnOp::Faculty,
            ..
        }
    ));
}

#[test]
fn prefix_bang_is_the_other_factorial_spelling() {
    assert!(matches!(
        val("!4"),
        Expr::Unary {
            op: UnOp::Faculty,
            ..
        }
    ));
}

#[test]
fn grouping_overrides_precedence() {
    let Expr::Binary {
        op: BinOp::Mul,
        lhs,
        ..
    } = val("(2 + 3) * 4")
    else {
        panic!("top should be Mul");
    };
    assert!(matches!(*lhs, Expr::Binary { op: BinOp::Add, .. }));
}

#[test]
fn prefix_minus_binds_tighter_than_multiplication() {
    let Expr::Binary {
        op: BinOp::Mul,
        rhs,
        ..
    } = val("23*-1")
    else {
        panic!("top should be Mul");
    };
    assert!(matches!(*rhs, Expr::Unary { op: UnOp::Neg, .. }));
}

#[test]
fn statements_split_on_semicolons() {
    let program = parse_str("1; 2; 3", false).unwrap();
    assert_eq!(program.stmts.len(), 3);

    // trailing separator is fine
    let program = parse_str("1;", false).unwrap();
    assert_eq!(program.stmts.len(), 1);
}
