use mcc::eval::optimize;
use mcc::grammer::ast::{Program, StmtKind};
use mcc::grammer::parse;
use mcc::Error;

fn fold(code: &str) -> Program {
    let program = parse(code).unwrap_or_else(|e| panic!("{}", e));
    let optimized = optimize(&program).unwrap_or_else(|e| panic!("{}", e));
    println!("{}", optimized);
    optimized
}

/// Arguments of every `write` left in the optimized program, in order
fn writes(program: &Program) -> Vec<String> {
    let mut out = Vec::new();
    for stmt in &program.body {
        stmt.walk(&mut |s| {
            if let StmtKind::Write(arg) = &s.kind {
                out.push(arg.to_string());
            }
        });
    }
    out
}

fn assert(code: &str, expects: &[&str]) {
    assert_eq!(writes(&fold(code)), expects);
}

macro_rules! case {
    ($name:ident, $code:expr, $expects:expr) => {
        #[test]
        fn $name() {
            assert($code, &$expects);
        }
    };
}

macro_rules! fails {
    ($name:ident, $code:expr, $line:expr, $msg:expr) => {
        #[test]
        fn $name() {
            let program = parse($code).unwrap();
            match optimize(&program) {
                Err(Error::Fold(line, msg)) => {
                    assert_eq!(line, $line, "{}", msg);
                    assert!(msg.contains($msg), "{}", msg);
                }
                other => panic!("expected a fold error, got {:?}", other),
            }
        }
    };
}

// Folding and propagation
case!(straight_line, "int a = 2; int b = 3; write(a + b);", ["5"]);
case!(reassignment, "int a = 1;\na = a + 1;\na = a * 10;\nwrite(a);", ["20"]);
case!(chained_sub_groups_right, "write(8 - 4 - 2);", ["6"]);
case!(class_order, "write(2 + 3 * 4);", ["20"]);
case!(truncating_div, "write(7 / 2);", ["3"]);
case!(modulo, "write(17 % 5);", ["2"]);
case!(float_arith, "float f = 1.5 * 2.0;\nwrite(f);", ["3.0"]);
case!(string_concat, "string s = \"ab\" + \"cd\";\nwrite(s);", ["\"abcd\""]);
case!(int_compare, "bool b = 3 >= 2;\nwrite(b);", ["True"]);
case!(float_compare_stays, "bool b = 1.0 < 2.0;\nwrite(b);", ["(1.0 < 2.0)"]);
case!(array_index, "[ ] int xs = {10, 20, 30};\nwrite(xs[1 + 1]);", ["30"]);
case!(negative, "int a = -5;\nwrite(a - -5);", ["0"]);

// Branch elimination
case!(if_false, "if (1 > 2) { write(1); } else { write(2); }", ["2"]);
case!(if_true, "if (2 > 1) { write(1); } else { write(2); }", ["1"]);
case!(else_if, "int a = 5;\nif (a < 3) { write(1); } else if (a < 6) { write(2); } else { write(3); }", ["2"]);

// Unrolling
case!(for_loop, "for (int i = 0; i < 3; i = i + 1) { write(i); }", ["0", "1", "2"]);
case!(for_loop_step, "for (int i = 1; i < 10; i = i + 3) { write(i); }", ["1", "4", "7"]);
case!(for_loop_empty, "for (int i = 5; i < 3; i = i + 1) { write(i); }", []);
case!(
    while_loop,
    "int i = 0;\nwhile (i < 3) {\n  write(i * 10);\n  i = i + 1;\n}",
    ["0", "10", "20"]
);
case!(
    nested_loops,
    "for (int i = 0; i < 2; i = i + 1) {\n  for (int j = 0; j < 2; j = j + 1) {\n    write((i * 10) + j);\n  }\n}",
    ["0", "1", "10", "11"]
);
case!(
    loop_with_branch,
    "for (int i = 0; i < 4; i = i + 1) {\n  if (i % 2 == 0) { write(i); }\n}",
    ["0", "2"]
);

// Inlining
case!(call_value, "func add(int a, int b) int {\n  return a + b;\n}\nwrite(add(2, 3));", ["5"]);
case!(call_nested, "func sq(int a) int { return a * a; }\nwrite(sq(sq(3)));", ["81"]);
case!(call_effects, "func hi(int n) {\n  write(n);\n  write(n + 1);\n}\nhi(4);", ["4", "5"]);
case!(
    call_effects_come_first,
    "func f(int n) int {\n  write(n);\n  return n * 2;\n}\nwrite(f(3));",
    ["3", "6"]
);
case!(
    call_updates_global,
    "global int g = 1;\nfunc bump() {\n  g = g + 1;\n}\nbump();\nbump();\nwrite(g);",
    ["3"]
);
case!(
    call_with_loop,
    "func sum(int n) int {\n  int s = 0;\n  for (int i = 0; i < n; i = i + 1) { s = s + i; }\n  return s;\n}\nwrite(sum(4));",
    ["6"]
);
case!(
    call_early_return,
    "func sign(int n) int {\n  if (n < 0) { return -1; }\n  return 1;\n}\nwrite(sign(-3));\nwrite(sign(3));",
    ["-1", "1"]
);
case!(
    call_array_arg,
    "func second([ ] int xs) int { return xs[1]; }\nwrite(second({7, 8, 9}));",
    ["8"]
);

// Runtime values
case!(
    residual_if_forgets,
    "int x;\nint y = 1;\nif (x > 0) {\n  y = 2;\n}\nwrite(y);",
    ["y"]
);
case!(
    call_in_residual_if_forgets_global,
    "global int g = 0;\nfunc bump() {\n  g = 5;\n}\nint x;\nif (x > 0) {\n  bump();\n}\nwrite(g);",
    ["g"]
);
case!(
    call_effects_in_residual_if,
    "func hi(int n) {\n  write(n);\n  write(n * 2);\n}\nint x;\nif (x > 0) {\n  hi(7);\n}",
    ["7", "14"]
);
case!(
    residual_if_inside_callee,
    "func show(int n) {\n  if (n > 0) {\n    write(n);\n  }\n}\nint x;\nshow(x);\nshow(3);",
    ["x", "3"]
);
case!(
    callee_branch_local_stays_inside,
    "func f(int n) {\n  if (n > 0) {\n    int k = 2;\n    k = k + 1;\n    write(k);\n  }\n}\nint x;\nf(x);",
    ["3"]
);

#[test]
fn call_effects_stay_in_their_branch() {
    let program = fold("func hi(int n) {\n  write(n);\n}\nint x;\nif (x > 0) {\n  hi(1);\n} else {\n  hi(2);\n}");
    assert_eq!(program.body.len(), 1);
    match &program.body[0].kind {
        StmtKind::If {
            then_body,
            else_body,
            ..
        } => {
            assert_eq!(then_body.len(), 1);
            assert_eq!(else_body.len(), 1);
        }
        other => panic!("expected a conditional, got {:?}", other),
    }
}

#[test]
fn callee_locals_are_not_kept() {
    let program = fold("func f() int {\n  int t = 5;\n  return t;\n}\nwrite(f());");
    assert_eq!(program.body.len(), 1);
    assert_eq!(writes(&program), ["5"]);
}

#[test]
fn empty_array_is_dropped() {
    let program = fold("[ ] int xs = {};");
    assert!(program.body.is_empty());
}

#[test]
fn residual_if_is_kept() {
    let program = fold("int x;\nif (x == 1) { write(1); } else { write(2); }");
    assert!(matches!(program.body[0].kind, StmtKind::If { .. }));
}

fails!(div_by_zero, "int a = 5; int b = a / 0;", 1, "division by zero");
fails!(mod_by_zero, "int a = 0;\nwrite(3 % a);", 2, "modulo by zero");
fails!(index_out_of_range, "[ ] int xs = {1};\nwrite(xs[3]);", 2, "out of range");
fails!(
    unresolvable_bound,
    "int n;\nfor (int i = 0; i < n; i = i + 1) {\n  write(i);\n}",
    2,
    "unresolvable loop bound"
);
fails!(runaway_loop, "int i = 0;\nwhile (i < 1) {\n  write(i);\n}", 2, "10000 iterations");
fails!(
    return_in_runtime_branch,
    "func f(int a) int {\n  if (a > 0) {\n    return 1;\n  }\n  return 0;\n}\nint x;\nwrite(f(x));",
    3,
    "return inside a condition"
);
fails!(
    div_by_zero_in_callee,
    "func f(int a) int {\n  return 10 / a;\n}\nwrite(f(0));",
    2,
    "division by zero"
);
fails!(
    callee_local_set_in_runtime_branch,
    "func f(float x) int {\n  int y = 0;\n  if (x < 2.0) {\n    y = 1;\n  }\n  return y;\n}\nwrite(f(1.0));",
    4,
    "a local of an inlined call"
);
fails!(
    callee_local_without_value,
    "func f() int {\n  int y;\n  return y;\n}\nwrite(f());",
    3,
    "no value known at compile time"
);
