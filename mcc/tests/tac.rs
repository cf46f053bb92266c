use mcc::compile::lower::lower;
use mcc::grammer::parse;
use mcc::{compile_source, Error};

fn assert(code: &str, expect: &str) {
    let artifacts = compile_source(code).unwrap_or_else(|e| panic!("{}", e));
    let tac = artifacts.tac.to_string();
    println!("{}", tac);
    assert_eq!(tac, expect);
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($code, $expect);
        }
    };
}

case!(
    straight_line,
    "int a = 2; int b = 3; write(a + b);",
    "t1 = 5\ncall write t1\n"
);
case!(dead_copies, "int a = 2;\nint b = a;\nwrite(b);", "t1 = 2\ncall write t1\n");
case!(
    runtime_value,
    "int x;\nint y = x + 1;\nwrite(y);",
    "t2 = x + 1\ncall write t2\n"
);
case!(
    unrolled_loop,
    "for (int i = 0; i < 2; i = i + 1) { write(i); }",
    "t1 = 0\ncall write t1\nt2 = 1\ncall write t2\n"
);
case!(string_variable_written_in_place, "string s;\nwrite(s);", "call write s\n");
case!(
    global_set_by_call_in_branch,
    "global int g = 0;\nfunc bump() {\n  g = 5;\n}\nint x;\nif (x > 0) {\n  bump();\n}\nwrite(g);",
    "g = 0\nt1 = x > 0\nif t1 goto L1\ngoto L2\nL1:\ng = 5\ngoto L2\nL2:\nt2 = g\ncall write t2\n"
);
case!(
    residual_if_else,
    "int x;\nif (x > 0) { write(1); } else { write(2); }",
    "t1 = x > 0\nif t1 goto L1\ngoto L2\nL1:\nt2 = 1\ncall write t2\ngoto L3\nL2:\nt3 = 2\ncall write t3\nL3:\n"
);
case!(
    residual_if,
    "int x;\nif (x == 3) { write(x); }",
    "t1 = x == 3\nif t1 goto L1\ngoto L2\nL1:\nt2 = x\ncall write t2\ngoto L2\nL2:\n"
);
case!(
    folded_constant_survives_branch,
    "int x;\nint y = 4;\nif (x > 0) { write(1); }\nwrite(y + x);",
    "t1 = x > 0\nif t1 goto L1\ngoto L2\nL1:\nt2 = 1\ncall write t2\ngoto L2\nL2:\nt3 = 4 + x\ncall write t3\n"
);

#[test]
fn functions_lower_before_optimization() {
    let program = parse("func f(int a) int {\n  return a;\n}").unwrap();
    let tac = lower(&program).unwrap();
    assert_eq!(tac.to_string(), "func f:\nreturn a\nend func\n");
}

#[test]
fn loops_do_not_lower() {
    let program = parse("int i = 0;\nwhile (i < 3) { i = i + 1; }").unwrap();
    assert!(matches!(lower(&program), Err(Error::Emit(_))));
}

#[test]
fn unresolved_index_is_rejected() {
    let result = compile_source("[ ] int xs = {1, 2};\nint x;\nif (x > 0) {\n  xs = {3};\n}\nwrite(xs[0]);");
    match result {
        Err(Error::Emit(msg)) => assert!(msg.contains("cannot be resolved"), "{}", msg),
        other => panic!("expected an emit error, got {:?}", other.map(|a| a.tac)),
    }
}
