// Integration tests for the pseudocode interpreter

use pretty_assertions::assert_eq;
use pseudostep::config::Limits;
use pseudostep::interpreter::Interpreter;
use pseudostep::snippets::EXAMPLE_PROGRAM;

fn run(source: &str) -> String {
    let mut interpreter = Interpreter::default();
    interpreter.interpret(source)
}

#[test]
fn test_if_prints_when_condition_holds() {
    let source = "DECLARE x:INTEGER\nx ← 3\nIF x > 2 THEN\nOUTPUT \"big\"\nENDIF";
    assert_eq!(run(source), "big");
}

#[test]
fn test_for_loop_counts_inclusive() {
    let source = "DECLARE i:INTEGER\nFOR i ← 1 TO 3\nOUTPUT i\nNEXT i";
    assert_eq!(run(source), "1\n2\n3");
}

#[test]
fn test_for_loop_with_start_after_end_is_empty() {
    let source = "FOR i ← 5 TO 1\nOUTPUT i\nNEXT i\nOUTPUT \"done\"";
    assert_eq!(run(source), "done");
}

#[test]
fn test_for_bounds_are_evaluated_once() {
    let source = r#"
DECLARE n:INTEGER
n ← 3
FOR i ← 1 TO n
    n ← 10
    OUTPUT i
NEXT i
"#;
    assert_eq!(run(source), "1\n2\n3");
}

#[test]
fn test_else_branch() {
    let source = "IF 1 > 2 THEN\nOUTPUT \"a\"\nELSE\nOUTPUT \"b\"\nENDIF";
    assert_eq!(run(source), "b");
}

#[test]
fn test_nested_loops_of_same_kind() {
    let source = r#"
FOR i ← 1 TO 2
    FOR j ← 1 TO 2
        OUTPUT i * 10 + j
    NEXT j
NEXT i
"#;
    assert_eq!(run(source), "11\n12\n21\n22");
}

#[test]
fn test_while_loop_and_scoping() {
    let source = r#"
DECLARE n:INTEGER
n ← 0
WHILE n < 3 DO
    DECLARE seen:BOOLEAN
    seen ← TRUE
    n ← n + 1
ENDWHILE
OUTPUT n
"#;
    let mut interpreter = Interpreter::default();
    assert_eq!(interpreter.interpret(source), "3");

    let variables = interpreter.get_all_variables();
    assert!(!variables.contains_key("seen"));
    assert_eq!(variables["n"].value, "3");
}

#[test]
fn test_out_of_bounds_store_leaves_array_unchanged() {
    let source = r#"
ARRAY a[1:3] OF INTEGER
a[1] ← 7
a[4] ← 9
OUTPUT a
"#;
    let mut interpreter = Interpreter::default();
    let output = interpreter.interpret(source);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(
        lines[0],
        "Error on line 4 [top level]: Index 4 is out of bounds for array 'a' [1:3] | variables: {a: [7, unset, unset]}"
    );
    assert_eq!(lines[1], "[7, unset, unset]");

    let variables = interpreter.get_all_variables();
    assert_eq!(variables["a"].value, "[7, unset, unset]");
    assert_eq!(variables["a"].var_type, "ARRAY[1:3] OF INTEGER");
}

#[test]
fn test_array_cells_widen_integers_to_real() {
    let source = "ARRAY r[0:1] OF REAL\nr[0] ← 2\nOUTPUT r[0]";
    assert_eq!(run(source), "2.0");
}

#[test]
fn test_mismatched_next_names_outer_loop() {
    let source = "FOR i ← 1 TO 2\nFOR j ← 1 TO 2\nOUTPUT i\nNEXT i\nNEXT j";
    let output = run(source);
    let first = output.lines().next().expect("Expected a diagnostic");

    assert!(first.starts_with("Error on line 1 [top level]: "), "{}", first);
    assert!(first.contains("NEXT j on line 5 does not match FOR i opened on line 1"));
}

#[test]
fn test_arity_mismatch_leaves_caller_scope_unchanged() {
    let source = r#"
DECLARE x:INTEGER
x ← 1
PROCEDURE p(a, b)
    x ← a + b
ENDPROCEDURE
p(5)
OUTPUT x
"#;
    let mut interpreter = Interpreter::default();
    let output = interpreter.interpret(source);

    assert_eq!(
        output,
        "Error on line 7 [top level]: Procedure 'p' expects 2 arguments, got 1 | variables: {x: 1}\n1"
    );
    let variables = interpreter.get_all_variables();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables["x"].value, "1");
}

#[test]
fn test_procedure_sees_caller_scope() {
    let source = r#"
DECLARE total:INTEGER
total ← 0
PROCEDURE add(n:INTEGER)
    total ← total + n
ENDPROCEDURE
add(3)
CALL add(4)
OUTPUT total
"#;
    assert_eq!(run(source), "7");
}

#[test]
fn test_procedure_arguments_are_copied() {
    let source = r#"
ARRAY a[1:2] OF INTEGER
a[1] ← 1
PROCEDURE change(arr)
    arr[1] ← 99
    OUTPUT arr[1]
ENDPROCEDURE
change(a)
OUTPUT a[1]
"#;
    assert_eq!(run(source), "99\n1");
}

#[test]
fn test_error_inside_loop_only_skips_that_statement() {
    let source = r#"FOR i ← 1 TO 3
IF i = 2 THEN
OUTPUT missing
ENDIF
OUTPUT i
NEXT i"#;
    assert_eq!(
        run(source),
        "1\nError on line 3 [FOR i, iteration 2]: Undefined variable 'missing' | variables: {i: 2}\n2\n3"
    );
}

#[test]
fn test_procedure_context_in_diagnostics() {
    let source = "PROCEDURE p()\nOUTPUT 1 / 0\nENDPROCEDURE\np()\nOUTPUT \"after\"";
    assert_eq!(
        run(source),
        "Error on line 2 [PROCEDURE p]: Invalid expression: Division by zero | variables: {}\nafter"
    );
}

#[test]
fn test_unterminated_block_reports_opening_line() {
    let source = "IF TRUE THEN\nOUTPUT 1";
    assert_eq!(
        run(source),
        "Error on line 1 [top level]: IF block opened on line 1 is never closed with ENDIF | variables: {}\n1"
    );
}

#[test]
fn test_undeclared_assignment_is_reference_error() {
    let mut interpreter = Interpreter::default();
    let output = interpreter.interpret("y ← 1\nOUTPUT \"next\"");

    assert!(output.starts_with("Error on line 1 [top level]: Undefined variable 'y'"));
    assert!(output.ends_with("next"));
    assert!(interpreter.last_error().is_some());
}

#[test]
fn test_dynamic_retyping_on_assignment() {
    let mut interpreter = Interpreter::default();
    interpreter.interpret("DECLARE x:INTEGER\nx ← 2.5");

    let variables = interpreter.get_all_variables();
    assert_eq!(variables["x"].value, "2.5");
    assert_eq!(variables["x"].var_type, "REAL");
}

#[test]
fn test_output_list_and_printed_forms() {
    let source = r#"
DECLARE ok:BOOLEAN
ok ← 3 >= 3
OUTPUT "ok=", ok, " half=", 1 / 2, " c=", 'z'
PRINT 7 MOD 3
"#;
    assert_eq!(run(source), "ok=TRUE half=0.5 c=z\n1");
}

#[test]
fn test_string_plus_is_an_error() {
    let output = run("OUTPUT \"a\" + \"b\"");
    assert!(output.starts_with("Error on line 1 [top level]: Invalid expression: Cannot apply '+'"));
}

#[test]
fn test_input_uses_queued_lines() {
    let mut interpreter = Interpreter::default();
    interpreter.provide_input("Ada");
    let output = interpreter.interpret("DECLARE name:STRING\nINPUT name\nOUTPUT \"Hi \", name");
    assert_eq!(output, "Hi Ada");
}

#[test]
fn test_input_without_lines_is_reported() {
    let output = run("DECLARE name:STRING\nINPUT name");
    assert_eq!(
        output,
        "Error on line 2 [top level]: No input available for 'name' | variables: {name: unset}"
    );
}

#[test]
fn test_recursion_limit_is_fatal() {
    let source = "PROCEDURE r(n)\nr(n + 1)\nENDPROCEDURE\nr(1)\nOUTPUT \"after\"";
    let mut interpreter = Interpreter::new(Limits {
        max_call_depth: 10,
        ..Limits::default()
    });
    let output = interpreter.interpret(source);

    assert_eq!(output, "Fatal error on line 2: Recursion limit of 10 exceeded calling 'r'");
    assert!(interpreter.get_all_variables().is_empty());
}

#[test]
fn test_iteration_limit_is_fatal() {
    let mut interpreter = Interpreter::new(Limits {
        max_loop_iterations: 100,
        ..Limits::default()
    });
    let output = interpreter.interpret("WHILE TRUE DO\nENDWHILE\nOUTPUT \"after\"");
    assert_eq!(output, "Fatal error on line 1: Loop exceeded 100 iterations");
}

#[test]
fn test_trace_limit_is_fatal() {
    let source = (1..=10).map(|n| format!("OUTPUT {}", n)).collect::<Vec<_>>().join("\n");
    let mut interpreter = Interpreter::new(Limits {
        max_trace_steps: 5,
        ..Limits::default()
    });
    let output = interpreter.interpret(&source);

    assert_eq!(
        output,
        "1\n2\n3\n4\n5\nFatal error on line 6: Execution trace limit of 5 steps exceeded"
    );
    assert_eq!(interpreter.trace().len(), 5);
}

#[test]
fn test_deep_recursion_within_limit() {
    let source = r#"
DECLARE count:INTEGER
count ← 0
PROCEDURE down(n)
    count ← count + 1
    IF n > 0 THEN
        down(n - 1)
    ENDIF
ENDPROCEDURE
down(150)
OUTPUT count
"#;
    assert_eq!(run(source), "151");
}

#[test]
fn test_state_persists_until_reset() {
    let mut interpreter = Interpreter::default();
    interpreter.interpret("DECLARE x:INTEGER\nx ← 4\nPROCEDURE p()\nOUTPUT x\nENDPROCEDURE");

    assert_eq!(interpreter.interpret("p()"), "4");
    assert_eq!(interpreter.procedure_names(), vec!["p".to_string()]);

    interpreter.reset_execution();
    assert!(interpreter.get_all_variables().is_empty());
    assert!(interpreter.procedure_names().is_empty());
    assert!(interpreter.output_lines().is_empty());
}

#[test]
fn test_comments_and_blank_lines_keep_line_numbers() {
    let source = "# heading\n\nOUTPUT missing";
    assert!(run(source).starts_with("Error on line 3 "));
}

#[test]
fn test_example_program() {
    let mut interpreter = Interpreter::default();
    interpreter.provide_input("World");
    let output = interpreter.interpret(EXAMPLE_PROGRAM);

    let expected = [
        "x is greater than y",
        "The value of x is 10",
        "Current count: 0",
        "Current count: 1",
        "Current count: 2",
        "Current count: 3",
        "Current count: 4",
        "Counting from 1 to 3:",
        "1",
        "2",
        "3",
        "The result of (x + y) * 2 is: 30",
        "Adding two numbers: 12",
        "Array elements:",
        "10",
        "20",
        "30",
        "40",
        "50",
        "Sum of array elements: 150",
        "Hello, World",
    ]
    .join("\n");

    assert_eq!(output, expected);
    assert_eq!(interpreter.last_error(), None);
    assert_eq!(
        interpreter.procedure_names(),
        vec!["add".to_string(), "array_sum".to_string()]
    );
}

#[test]
fn test_oversized_array_is_recoverable() {
    let output = run("ARRAY a[0:4000000000000000000] OF INTEGER\nOUTPUT 1");
    assert_eq!(
        output,
        "Error on line 1 [top level]: Array 'a' would hold 4000000000000000001 cells, more than the limit of 1000000 | variables: {}\n1"
    );

    let output = run("ARRAY w[-9223372036854775808:9223372036854775807] OF CHAR\nOUTPUT 2");
    assert!(output.contains("would hold 18446744073709551616 cells"), "{}", output);
    assert!(output.ends_with("\n2"));
}

#[test]
fn test_array_cell_limit_is_configurable() {
    let mut interpreter = Interpreter::new(Limits {
        max_array_cells: 10,
        ..Limits::default()
    });
    let output = interpreter.interpret("ARRAY a[1:10] OF INTEGER\nARRAY b[1:11] OF INTEGER");

    assert_eq!(
        output,
        "Error on line 2 [top level]: Array 'b' would hold 11 cells, more than the limit of 10 | variables: {a: [unset, unset, unset, unset, unset, unset, unset, unset, unset, unset]}"
    );
    let variables = interpreter.get_all_variables();
    assert!(variables.contains_key("a"));
    assert!(!variables.contains_key("b"));
}

#[test]
fn test_deeply_nested_line_is_recoverable() {
    let source = format!(
        "OUTPUT {}1{}\nOUTPUT \"after\"",
        "(".repeat(200_000),
        ")".repeat(200_000)
    );
    let output = run(&source);
    assert!(output.starts_with("Error on line 1 [top level]: Line has "), "{}", &output[..80]);
    assert!(output.ends_with("\nafter"));

    let source = format!("OUTPUT {}TRUE", "NOT ".repeat(300));
    assert!(run(&source).starts_with(
        "Error on line 1 [top level]: Invalid expression: Expression nests deeper than 256 levels"
    ));
}

#[test]
fn test_moderate_nesting_still_runs() {
    let parens = format!("OUTPUT {}1{}", "(".repeat(200), ")".repeat(200));
    assert_eq!(run(&parens), "1");

    let nots = format!("OUTPUT {}TRUE", "NOT ".repeat(200));
    assert_eq!(run(&nots), "TRUE");

    let sum = format!("OUTPUT {}", vec!["1"; 2000].join(" + "));
    assert_eq!(run(&sum), "2000");
}

#[test]
fn test_trace_memory_limit_is_fatal() {
    let source = r#"ARRAY a[1:100] OF INTEGER
FOR i ← 1 TO 100
    a[i] ← i
NEXT i
WHILE TRUE DO
ENDWHILE
OUTPUT "after""#;
    let mut interpreter = Interpreter::new(Limits {
        max_trace_bytes: 200_000,
        ..Limits::default()
    });
    let output = interpreter.interpret(source);

    assert!(output.starts_with("Fatal error on line "), "{}", output);
    assert!(output.ends_with("Execution trace exceeded its memory limit of 200000 bytes"));
    // Only the fatal message itself lands after the ceiling
    assert!(interpreter.trace().memory_usage() <= 200_000 + output.len());
    assert!(interpreter.get_all_variables().contains_key("a"));
}

#[test]
fn test_real_printing_keeps_fraction() {
    assert_eq!(run("OUTPUT 10.0 ^ 20"), "100000000000000000000.0");
    assert_eq!(run("OUTPUT 6 / 3, \" \", 0.25"), "2.0 0.25");

    let output = run("OUTPUT (0 - 8.0) ^ 0.5");
    assert!(output.contains("is not a finite number"), "{}", output);
}

#[test]
fn test_minimum_integer_literal() {
    let source = "DECLARE m:INTEGER\nm ← -9223372036854775808\nOUTPUT m";
    assert_eq!(run(source), "-9223372036854775808");

    let output = run("OUTPUT 9223372036854775808");
    assert!(output.contains("Integer literal 9223372036854775808 is out of range"), "{}", output);
}
