use mcc::grammer::ast::{BinaryOp, Expr, ExprKind, Literal, StmtKind, Type};
use mcc::grammer::parse;
use mcc::Error;

fn assert(code: &str) {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    match parse(code) {
        Ok(program) => println!("{}", program),
        Err(e) => panic!("{}", e),
    }
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
}

/// Expect the first error to be of `$kind` on `$line`, mentioning `$msg`.
macro_rules! fails {
    ($name:ident, $code:expr, $kind:ident, $line:expr, $msg:expr) => {
        #[test]
        fn $name() {
            match parse($code) {
                Err(Error::$kind(line, msg)) => {
                    assert_eq!(line, $line, "{}", msg);
                    assert!(msg.contains($msg), "{}", msg);
                }
                other => panic!("expected {}, got {:?}", stringify!($kind), other),
            }
        }
    };
}

// Declarations
case!(decl_scalars, "int a = 1;\nfloat b = 2.5;\nstring s = \"x\";\nchar c = 'c';\nbool t = True;");
case!(decl_without_init, "int a;\na = 3;");
case!(decl_array, "[ ] int xs = {1, 2, 3};\nwrite(xs[1]);");
case!(decl_empty_array, "[ ] float xs = {};");
case!(decl_global, "global int g = 1;\nfunc f() int { return g; }\nwrite(f());");
case!(no_semicolons, "int a = 1\nwrite(a)");

// Expressions
case!(expr_grouping, "int a = (1 + 2) * 3;");
case!(expr_negative, "int a = -3 - -4;");
case!(expr_unary_ident, "int a = 1;\nint b = -a;");
case!(expr_string_concat, "string s = \"a\" + \"b\";");
case!(expr_char_compare, "bool b = 'a' < 'b';");

// Control flow
case!(if_else, "int a = 1;\nif (a > 0) {\n  write(a);\n} else {\n  write(0);\n}");
case!(if_else_if, "int a = 1;\nif (a > 1) { write(1); } else if (a > 0) { write(2); } else { write(3); }");
case!(for_loop, "for (int i = 0; i < 3; i = i + 1) {\n  write(i);\n}");
case!(for_loop_assign_init, "int i;\nfor (i = 0; i < 3; i = i + 1) { write(i); }");
case!(while_loop, "int i = 0;\nwhile (i < 3) {\n  i = i + 1;\n}");

// Functions
case!(func_void, "func hello() {\n  write(\"hello\");\n}\nhello();");
case!(func_args, "func add(int a, int b) int {\n  return a + b;\n}\nint c = add(1, 2);");
case!(func_array_param, "func first([ ] int xs) int { return xs[0]; }\nwrite(first({4, 5}));");
case!(func_nested_call, "func inc(int a) int { return a + 1; }\nwrite(inc(inc(1)));");

// Scope
fails!(dup_variable, "int x;\nint x;", Scope, 2, "x has already been declared");
fails!(dup_kinds, "int x;\n[ ] int x;", Scope, 2, "x has already been declared");
fails!(dup_function, "int f;\nfunc f() { }", Scope, 2, "f has already been declared");
fails!(dup_param_global, "global int g;\nfunc f(int g) { }", Scope, 2, "g has already been declared");
fails!(undeclared, "int a = 1;\nwrite(b);", Scope, 2, "b has not been declared");
fails!(assign_undeclared, "y = 3;", Scope, 1, "y has not been declared");
fails!(private_toplevel, "int x = 1;\nfunc f() int { return x; }", Scope, 2, "x has not been declared");
fails!(self_recursion, "func f(int n) int {\n  return f(n);\n}", Scope, 2, "f has not been declared");

// Types
fails!(mismatch_arith, "int a = 1;\nfloat b = 2.0;\nwrite(a + b);", Type, 3, "different types");
fails!(mismatch_compare, "bool b = 1 < 'a';", Type, 1, "different types");
fails!(mod_float, "float f = 1.0 % 2.0;", Type, 1, "'%'");
fails!(sub_string, "string s = \"a\" - \"b\";", Type, 1, "'-'");
fails!(decl_mismatch, "int a = \"x\";", Type, 1, "cannot initialize");
fails!(assign_mismatch, "int a;\na = 1.5;", Type, 2, "cannot assign");
fails!(array_elems, "[ ] int xs = {1, 'a'};", Type, 1, "array elements");
fails!(cond_not_bool, "if (1) { write(1); }", Type, 1, "condition must be bool");
fails!(return_in_void, "func f() {\n  return 1;\n}", Type, 2, "returns nothing");
fails!(return_mismatch, "func f() int {\n  return 'c';\n}", Type, 2, "returns int");
fails!(arg_type, "func f(int a) { }\nf(1.0);", Type, 2, "argument 1 of f");
fails!(void_as_value, "func f() { }\nint a = f();", Type, 2, "does not return a value");
fails!(write_array, "[ ] int xs = {1};\nwrite(xs);", Type, 2, "cannot write");

// Syntax
fails!(arity, "func f(int a) { }\nf(1, 2);", Syntax, 2, "expects 1 arguments but got 2");
fails!(write_arity, "write(1, 2);", Syntax, 1, "write expects 1 argument");
fails!(write_value, "int a = write(1);", Syntax, 1, "write cannot be used as a value");
fails!(dangling_else, "else { write(1); }", Syntax, 1, "else without a preceding if");
fails!(missing_paren, "if (1 < 2 { write(1); }", Syntax, 1, "expected ')'");
fails!(unclosed_group, "int a = (1 + 2;", Syntax, 1, "unmatched bracket");
fails!(nested_function, "func f() {\n  func g() { }\n}", Syntax, 2, "global scope");
fails!(bare_expression, "int a;\na + 1;", Syntax, 2, "call or an assignment");
fails!(return_outside, "return 1;", Syntax, 1, "outside of a function");
fails!(unmatched_curly, "int a;\n}", Syntax, 2, "unmatched");

#[test]
fn first_occurrence_split_groups_right() {
    let program = parse("int a = 8 - 4 - 2;").unwrap();
    let StmtKind::Declare { init: Some(init), .. } = &program.body[0].kind else {
        panic!("{:?}", program.body[0]);
    };
    let lit = |v| Box::new(Expr::literal(Literal::Int(v)));
    let inner = Expr::new(Type::Int, ExprKind::Binary(BinaryOp::Sub, lit(4), lit(2)));
    assert_eq!(
        init,
        &Expr::new(Type::Int, ExprKind::Binary(BinaryOp::Sub, lit(8), Box::new(inner)))
    );
}

#[test]
fn loop_keeps_init_cond_and_step() {
    let program = parse("for (int i = 0; i < 2; i = i + 1) { write(i); }").unwrap();
    let stmt = &program.body[0];
    let StmtKind::For { init, step, body, .. } = &stmt.kind else {
        panic!("{:?}", stmt);
    };
    assert!(init.is_some() && step.is_some());
    assert_eq!(body.len(), 1);
    // init, body, step
    assert_eq!(stmt.children().len(), 3);
}

#[test]
fn function_records_its_scope() {
    let program = parse("global int g;\nfunc f(int a) int {\n  int b = a;\n  return b + g;\n}").unwrap();
    let StmtKind::Function(func) = &program.body[1].kind else {
        panic!("{:?}", program.body[1]);
    };
    let names: Vec<&str> = func.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    let globals: Vec<&str> = program.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(globals, vec!["g", "f"]);
}
