mod common;

use cmmc::ast::{BinaryOp::*, Decl, Stmt, TypeSpec};
use cmmc::SemanticError::*;
use common::*;

macro_rules! case {
    ($name:ident, [$($decl:expr),* $(,)?], [$($err:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert_eq!(errors(vec![$($decl),*]), vec![$($err),*]);
        }
    };
}

/// `void main() { <decls> <stmts> }` after the given globals.
fn main_with(globals: Vec<Decl>, decls: Vec<cmmc::ast::VarDecl>, stmts: Vec<Stmt>) -> Vec<Decl> {
    let mut all = globals;
    all.push(func(TypeSpec::Void, "main", 10, vec![], decls, stmts));
    all
}

macro_rules! body_case {
    ($name:ident, [$($g:expr),* $(,)?], [$($d:expr),* $(,)?], [$($s:expr),* $(,)?], [$($err:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert_eq!(
                errors(main_with(vec![$($g),*], vec![$($d),*], vec![$($s),*])),
                vec![$($err),*]
            );
        }
    };
}

fn int_x() -> Decl {
    global(TypeSpec::Int, "x", 1, 5)
}

fn bool_b() -> Decl {
    global(TypeSpec::Bool, "b", 2, 6)
}

fn f_int_bool() -> Decl {
    func(
        TypeSpec::Int,
        "f",
        3,
        vec![formal(TypeSpec::Int, "a", 3, 11), formal(TypeSpec::Bool, "c", 3, 19)],
        vec![],
        vec![ret(Some(ident("a", 4, 12)), 4, 5)],
    )
}

fn v() -> Decl {
    func(TypeSpec::Void, "v", 5, vec![], vec![], vec![])
}

fn point() -> Decl {
    structure("P", 6, vec![var(TypeSpec::Int, "x", 7, 9)])
}

// Assignment
body_case!(assign_ok, [int_x()], [], [set(ident("x", 11, 5), int(3, 11, 9))], []);
body_case!(
    assign_mismatch,
    [bool_b()],
    [],
    [set(ident("b", 11, 5), int(3, 11, 9))],
    [(11, 5, TypeMismatch)]
);
body_case!(
    assign_functions,
    [v()],
    [],
    [set(ident("v", 11, 5), ident("v", 11, 9))],
    [(11, 5, FunctionAssignment)]
);
body_case!(
    assign_struct_names,
    [point()],
    [],
    [set(ident("P", 11, 5), ident("P", 11, 9))],
    [(11, 5, StructNameAssignment)]
);
body_case!(
    assign_struct_variables,
    [point(), global(struct_t("P", 8, 8), "p", 8, 10), global(struct_t("P", 9, 8), "q", 9, 10)],
    [],
    [set(ident("p", 11, 5), ident("q", 11, 9))],
    [(11, 5, StructVariableAssignment)]
);
body_case!(
    chained_assign_reports_once,
    [int_x(), bool_b()],
    [],
    [set(ident("x", 11, 5), assign(ident("b", 11, 9), int(1, 11, 13)))],
    [(11, 9, TypeMismatch)]
);

// Operators
body_case!(
    arithmetic_both_sides,
    [bool_b()],
    [],
    [Stmt::Write(bin(Add, ident("b", 11, 14), tru(11, 18)))],
    [(11, 14, ArithmeticNonNumeric), (11, 18, ArithmeticNonNumeric)]
);
body_case!(
    relational,
    [bool_b()],
    [],
    [Stmt::Write(bin(Le, int(1, 11, 14), ident("b", 11, 19)))],
    [(11, 19, RelationalNonNumeric)]
);
body_case!(
    logical,
    [int_x()],
    [],
    [Stmt::Write(bin(And, ident("x", 11, 14), tru(11, 19)))],
    [(11, 14, LogicalNonBool)]
);
body_case!(
    not_on_int,
    [],
    [],
    [Stmt::Write(not(int(4, 11, 15)))],
    [(11, 15, LogicalNonBool)]
);
body_case!(
    negate_bool,
    [],
    [],
    [Stmt::Write(neg(fls(11, 15)))],
    [(11, 15, ArithmeticNonNumeric)]
);
body_case!(
    nested_error_reported_once,
    [bool_b()],
    [],
    [Stmt::Write(bin(Mul, bin(Add, ident("b", 11, 15), int(1, 11, 19)), int(2, 11, 24)))],
    [(11, 15, ArithmeticNonNumeric)]
);
body_case!(
    post_increment_bool,
    [bool_b()],
    [],
    [Stmt::PostInc(ident("b", 11, 5))],
    [(11, 5, ArithmeticNonNumeric)]
);

// Equality
body_case!(
    equality_void_calls,
    [v()],
    [],
    [Stmt::Write(bin(Eq, call("v", 11, 14, vec![]), call("v", 11, 21, vec![])))],
    [(11, 14, EqualityVoidFunctions)]
);
body_case!(
    equality_functions,
    [v()],
    [],
    [Stmt::Write(bin(Ne, ident("v", 11, 14), ident("v", 11, 19)))],
    [(11, 14, EqualityFunctions)]
);
body_case!(
    equality_struct_names,
    [point()],
    [],
    [Stmt::Write(bin(Eq, ident("P", 11, 14), ident("P", 11, 19)))],
    [(11, 14, EqualityStructNames)]
);
body_case!(
    equality_struct_variables,
    [point(), global(struct_t("P", 8, 8), "p", 8, 10)],
    [],
    [Stmt::Write(bin(Eq, ident("p", 11, 14), ident("p", 11, 19)))],
    [(11, 14, EqualityStructVariables)]
);
body_case!(
    equality_mismatch,
    [int_x()],
    [],
    [Stmt::Write(bin(Eq, ident("x", 11, 14), tru(11, 19)))],
    [(11, 14, TypeMismatch)]
);
body_case!(
    string_equality,
    [],
    [],
    [Stmt::Write(bin(Eq, string("a", 11, 14), string("b", 11, 21)))],
    []
);

// Conditions
body_case!(
    if_int_condition,
    [],
    [],
    [Stmt::If(int(1, 11, 9), block(vec![], vec![]))],
    [(11, 9, NonBoolIfCondition)]
);
body_case!(
    if_else_condition,
    [int_x()],
    [],
    [Stmt::IfElse(ident("x", 11, 9), block(vec![], vec![]), block(vec![], vec![]))],
    [(11, 9, NonBoolIfCondition)]
);
body_case!(
    while_condition,
    [],
    [],
    [Stmt::While(int(0, 11, 12), block(vec![], vec![]))],
    [(11, 12, NonBoolWhileCondition)]
);
body_case!(
    errors_inside_branches,
    [bool_b()],
    [],
    [Stmt::While(
        ident("b", 11, 12),
        block(vec![], vec![set(ident("b", 12, 9), int(1, 12, 13))])
    )],
    [(12, 9, TypeMismatch)]
);

// I/O
body_case!(
    read_targets,
    [v(), point(), global(struct_t("P", 8, 8), "p", 8, 10)],
    [],
    [
        Stmt::Read(ident("v", 11, 12)),
        Stmt::Read(ident("P", 12, 12)),
        Stmt::Read(ident("p", 13, 12)),
    ],
    [(11, 12, ReadFunction), (12, 12, ReadStructName), (13, 12, ReadStructVariable)]
);
body_case!(
    write_targets,
    [v(), point(), global(struct_t("P", 8, 8), "p", 8, 10)],
    [],
    [
        Stmt::Write(ident("v", 11, 13)),
        Stmt::Write(ident("P", 12, 13)),
        Stmt::Write(ident("p", 13, 13)),
        Stmt::Write(call("v", 14, 13, vec![])),
    ],
    [
        (11, 13, WriteFunction),
        (12, 13, WriteStructName),
        (13, 13, WriteStructVariable),
        (14, 13, WriteVoid)
    ]
);

// Calls
body_case!(
    call_ok,
    [f_int_bool()],
    [],
    [Stmt::Write(call("f", 11, 13, vec![int(1, 11, 15), tru(11, 18)]))],
    []
);
body_case!(
    call_non_function,
    [int_x()],
    [],
    [Stmt::Call(call("x", 11, 5, vec![]))],
    [(11, 5, CallNonFunction)]
);
body_case!(
    wrong_arg_count,
    [f_int_bool()],
    [],
    [Stmt::Write(call("f", 11, 13, vec![int(1, 11, 15)]))],
    [(11, 13, WrongArgCount)]
);
body_case!(
    wrong_arg_count_keeps_return_type,
    [f_int_bool(), bool_b()],
    [],
    [set(ident("b", 11, 5), call("f", 11, 9, vec![]))],
    [(11, 9, WrongArgCount), (11, 5, TypeMismatch)]
);
body_case!(
    actual_mismatch_per_position,
    [f_int_bool()],
    [],
    [Stmt::Write(call("f", 11, 13, vec![tru(11, 15), int(2, 11, 21)]))],
    [(11, 15, ActualFormalMismatch), (11, 21, ActualFormalMismatch)]
);
body_case!(
    bad_formal_accepts_any_actual,
    [
        bool_b(),
        func(TypeSpec::Void, "g", 4, vec![formal(TypeSpec::Void, "a", 4, 12)], vec![], vec![]),
    ],
    [],
    [
        Stmt::Call(call("g", 11, 5, vec![int(1, 11, 7)])),
        set(ident("b", 12, 5), int(3, 12, 9)),
    ],
    [(4, 12, NonFunctionVoid), (12, 5, TypeMismatch)]
);

// Returns
case!(
    missing_return_value,
    [func(
        TypeSpec::Int,
        "f",
        1,
        vec![formal(TypeSpec::Int, "a", 1, 11)],
        vec![],
        vec![ret(None, 1, 16)]
    )],
    [(1, 16, MissingReturnValue)]
);
case!(
    return_value_in_void,
    [func(TypeSpec::Void, "f", 1, vec![], vec![], vec![ret(Some(int(1, 2, 12)), 2, 5)])],
    [(2, 12, ReturnValueInVoid)]
);
case!(
    bad_return_value,
    [func(TypeSpec::Bool, "f", 1, vec![], vec![], vec![ret(Some(int(1, 2, 12)), 2, 5)])],
    [(2, 12, BadReturnValue)]
);
case!(
    return_checked_in_nested_blocks,
    [func(
        TypeSpec::Int,
        "f",
        1,
        vec![],
        vec![],
        vec![Stmt::If(tru(2, 9), block(vec![], vec![ret(Some(fls(3, 16)), 3, 9)]))]
    )],
    [(3, 16, BadReturnValue)]
);

// Error suppression
body_case!(
    undeclared_in_arithmetic,
    [int_x(), bool_b()],
    [],
    [
        set(ident("x", 11, 5), bin(Add, ident("y", 11, 9), int(1, 11, 13))),
        set(ident("b", 12, 5), int(3, 12, 9)),
    ],
    [(11, 9, UndeclaredIdentifier), (12, 5, TypeMismatch)]
);
body_case!(
    undeclared_in_assignment,
    [bool_b()],
    [],
    [
        set(ident("y", 11, 5), int(3, 11, 9)),
        set(ident("b", 12, 5), assign(ident("z", 12, 9), tru(12, 13))),
        Stmt::Write(bin(Or, ident("b", 13, 14), int(0, 13, 19))),
    ],
    [
        (11, 5, UndeclaredIdentifier),
        (12, 9, UndeclaredIdentifier),
        (13, 19, LogicalNonBool)
    ]
);
body_case!(
    undeclared_in_call_arg,
    [f_int_bool(), bool_b()],
    [],
    [
        Stmt::Write(call("f", 11, 13, vec![ident("y", 11, 15), tru(11, 18)])),
        set(ident("b", 12, 5), int(3, 12, 9)),
    ],
    [(11, 15, UndeclaredIdentifier), (12, 5, TypeMismatch)]
);
body_case!(
    undeclared_arg_beside_bad_arg,
    [f_int_bool()],
    [],
    [Stmt::Write(call("f", 11, 13, vec![ident("y", 11, 15), int(2, 11, 18)]))],
    [(11, 15, UndeclaredIdentifier), (11, 18, ActualFormalMismatch)]
);
body_case!(
    undeclared_callee,
    [bool_b()],
    [],
    [
        Stmt::Call(call("nope", 11, 5, vec![tru(11, 10)])),
        set(ident("b", 12, 5), call("nope", 12, 9, vec![])),
    ],
    [(11, 5, UndeclaredIdentifier), (12, 9, UndeclaredIdentifier)]
);

/// Each pass on its own: resolution reports the names, checking reports
/// only what does not depend on them.
#[test]
fn error_type_suppresses_dependents() {
    let mut program = cmmc::Program::new(main_with(
        vec![f_int_bool(), int_x()],
        vec![],
        vec![
            set(ident("x", 11, 5), bin(Add, ident("y", 11, 9), int(1, 11, 13))),
            Stmt::Write(call("f", 12, 13, vec![ident("y", 12, 15), tru(12, 18)])),
            Stmt::Write(call("f", 13, 13, vec![ident("y", 13, 15)])),
            Stmt::Call(call("nope", 14, 5, vec![int(1, 14, 10)])),
        ],
    ));
    let mut diags = cmmc::Diagnostics::new();
    let symbols = cmmc::resolve(&mut program, &mut diags).unwrap();
    assert_eq!(
        diags.errors(),
        vec![
            UndeclaredIdentifier,
            UndeclaredIdentifier,
            UndeclaredIdentifier,
            UndeclaredIdentifier
        ]
    );

    let mut diags = cmmc::Diagnostics::new();
    let types = cmmc::check(&program, &symbols, &mut diags).unwrap();
    // only the arity fault is independent of the undeclared names
    assert_eq!(diags.errors(), vec![WrongArgCount]);
    assert_eq!(types.len(), program.expr_count());
}
