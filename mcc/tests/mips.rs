use mcc::{compile_source, Error};

fn emit(code: &str) -> mips::Program {
    let artifacts = compile_source(code).unwrap_or_else(|e| panic!("{}", e));
    println!("{}", artifacts.asm);
    artifacts.asm
}

/// The `.text` lines between `main:` and the exit syscall
fn body(code: &str) -> Vec<String> {
    let asm = emit(code);
    let text: Vec<String> = asm.text.iter().map(|i| i.to_string().trim().to_string()).collect();
    assert_eq!(text[text.len() - 2..], ["li $v0, 10", "syscall"]);
    text[..text.len() - 2].to_vec()
}

macro_rules! case {
    ($name:ident, $code:expr, $expects:expr) => {
        #[test]
        fn $name() {
            assert_eq!(body($code), $expects);
        }
    };
}

macro_rules! fails {
    ($name:ident, $code:expr, $msg:expr) => {
        #[test]
        fn $name() {
            match compile_source($code) {
                Err(Error::Emit(msg)) => assert!(msg.contains($msg), "{}", msg),
                other => panic!("expected an emit error, got {:?}", other.map(|a| a.tac)),
            }
        }
    };
}

#[test]
fn straight_line_program() {
    let asm = emit("int a = 2; int b = 3; write(a + b);");
    assert_eq!(
        asm.to_string(),
        ".data\nt1: .word 0\n\n.text\nmain:\n    li $t0, 5\n    sw $t0, t1\n    lw $a0, t1\n    li $v0, 1\n    syscall\n    li $v0, 10\n    syscall\n"
    );
}

case!(
    write_string,
    "write(\"hi\");",
    ["la $a0, t1", "li $v0, 4", "syscall"]
);
case!(
    write_string_variable,
    "string s;\nwrite(s);",
    ["la $a0, v_s", "li $v0, 4", "syscall"]
);
case!(
    write_float,
    "write(2.5);",
    ["l.s $f0, flt_0", "s.s $f0, t1", "l.s $f12, t1", "li $v0, 2", "syscall"]
);
case!(
    write_char,
    "write('a');",
    ["li $t0, 97", "sb $t0, t1", "lb $a0, t1", "li $v0, 11", "syscall"]
);
case!(
    write_bool,
    "write(True);",
    ["li $t0, 1", "sw $t0, t1", "lw $a0, t1", "li $v0, 1", "syscall"]
);
case!(
    int_compare_and_branch,
    "int x;\nif (x > 0) { write(1); }",
    [
        "lw $t0, v_x",
        "li $t1, 0",
        "sgt $t2, $t0, $t1",
        "sw $t2, t1",
        "lw $t0, t1",
        "bne $t0, $zero, L1",
        "j L2",
        "L1:",
        "li $t0, 1",
        "sw $t0, t2",
        "lw $a0, t2",
        "li $v0, 1",
        "syscall",
        "j L2",
        "L2:",
    ]
);
case!(
    int_division,
    "int x;\nwrite(x / 3);",
    ["lw $t0, v_x", "li $t1, 3", "div $t0, $t1", "mflo $t2", "sw $t2, t1", "lw $a0, t1", "li $v0, 1", "syscall"]
);
case!(
    int_modulo,
    "int x;\nwrite(x % 3);",
    ["lw $t0, v_x", "li $t1, 3", "div $t0, $t1", "mfhi $t2", "sw $t2, t1", "lw $a0, t1", "li $v0, 1", "syscall"]
);
case!(
    float_arith,
    "float f;\nwrite(f * 2.0);",
    [
        "l.s $f0, v_f",
        "l.s $f1, flt_0",
        "mul.s $f2, $f0, $f1",
        "s.s $f2, t1",
        "l.s $f12, t1",
        "li $v0, 2",
        "syscall"
    ]
);
case!(
    float_compare,
    "float f;\nbool b = f >= 1.5;\nwrite(b);",
    [
        "l.s $f0, v_f",
        "l.s $f1, flt_0",
        "li $t2, 0",
        "li $t1, 1",
        "c.le.s $f1, $f0",
        "movt $t2, $t1",
        "sw $t2, t2",
        "lw $a0, t2",
        "li $v0, 1",
        "syscall"
    ]
);

#[test]
fn data_is_ordered_for_alignment() {
    let asm = emit("write(\"s\");\nwrite('c');\nwrite(1);\nwrite(1.5);");
    let labels: Vec<&str> = asm.data.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, ["t3", "t4", "flt_0", "t2", "t1"]);
    assert_eq!(asm.data[4].to_string(), "t1: .asciiz \"s\"");
}

#[test]
fn straight_line_uses_one_slot() {
    let asm = emit("int a = 2;\nint b = 3;\nwrite(a + b);");
    assert_eq!(asm.data.len(), 1);
}

fails!(
    string_compare,
    "string s;\nif (s == \"a\") { write(1); }",
    "string is not supported"
);
fails!(
    string_reassigned,
    "string s;\nint x;\nif (x > 0) { s = \"a\"; } else { s = \"b\"; }\nwrite(s);",
    "assigned both"
);
fails!(
    array_access_after_branch,
    "[ ] int xs = {1, 2};\nint x;\nif (x > 0) { xs = {3}; }\n[ ] int ys = xs;\nwrite(ys[0]);",
    "cannot be resolved"
);

#[test]
fn unassigned_string_gets_empty_slot() {
    let asm = emit("string s;\nwrite(s);");
    assert_eq!(asm.data.len(), 1);
    assert_eq!(asm.data[0].to_string(), "v_s: .asciiz \"\"");
}
