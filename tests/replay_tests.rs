// Step trace and replay tests

use pretty_assertions::assert_eq;
use pseudostep::interpreter::Interpreter;
use pseudostep::snapshot::ExecutionStep;
use pseudostep::snippets::EXAMPLE_PROGRAM;

fn replay(interpreter: &mut Interpreter) -> Vec<ExecutionStep> {
    let mut steps = Vec::new();
    while let Some(step) = interpreter.next_step() {
        steps.push(step);
    }
    steps
}

fn line_numbers(source: &str) -> Vec<usize> {
    let mut interpreter = Interpreter::default();
    interpreter.interpret(source);
    replay(&mut interpreter)
        .iter()
        .map(|step| step.line_number)
        .collect()
}

fn concatenated_output(steps: &[ExecutionStep]) -> String {
    steps
        .iter()
        .filter_map(|step| step.output.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_straight_line_program_steps_in_source_order() {
    let source = "DECLARE x:INTEGER\nx ← 3\nOUTPUT x";
    let mut interpreter = Interpreter::default();
    interpreter.interpret(source);
    let steps = replay(&mut interpreter);

    let numbers: Vec<usize> = steps.iter().map(|s| s.line_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(steps[1].line, "x ← 3");

    // Each step shows the state before its statement ran
    assert_eq!(steps[1].variables["x"].value, "unset");
    assert_eq!(steps[2].variables["x"].value, "3");
    assert_eq!(steps[2].output.as_deref(), Some("3"));
    assert_eq!(steps[0].output, None);
}

#[test]
fn test_if_records_closing_step() {
    assert_eq!(line_numbers("IF TRUE THEN\nOUTPUT 1\nENDIF"), vec![1, 2, 3]);
    assert_eq!(line_numbers("IF FALSE THEN\nOUTPUT 1\nENDIF"), vec![1, 3]);
    assert_eq!(
        line_numbers("IF FALSE THEN\nOUTPUT 1\nELSE\nOUTPUT 2\nENDIF"),
        vec![1, 4, 5]
    );
}

#[test]
fn test_for_records_next_per_iteration() {
    let mut interpreter = Interpreter::default();
    interpreter.interpret("FOR i ← 1 TO 2\nOUTPUT i\nNEXT i");
    let steps = replay(&mut interpreter);

    let numbers: Vec<usize> = steps.iter().map(|s| s.line_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 2, 3]);
    assert_eq!(steps[2].variables["i"].value, "1");
    assert_eq!(steps[4].variables["i"].value, "2");
    assert!(!steps[0].variables.contains_key("i"));
}

#[test]
fn test_procedure_call_steps_into_body() {
    let source = "PROCEDURE p()\nOUTPUT 1\nENDPROCEDURE\np()";
    assert_eq!(line_numbers(source), vec![1, 4, 2, 3]);
}

#[test]
fn test_step_outputs_concatenate_to_full_output() {
    let sources = [
        "FOR i ← 1 TO 3\nIF i = 2 THEN\nOUTPUT missing\nENDIF\nOUTPUT i\nNEXT i",
        "OUTPUT 1\nOUTPUT 2 / 0\nx ← 4\nOUTPUT \"end\"",
        "DECLARE n:INTEGER\nn ← 0\nWHILE n < 3 DO\nn ← n + 1\nOUTPUT n\nENDWHILE",
    ];

    for source in sources {
        let mut interpreter = Interpreter::default();
        let full = interpreter.interpret(source);
        let steps = replay(&mut interpreter);
        assert_eq!(concatenated_output(&steps), full, "source: {}", source);
    }
}

#[test]
fn test_replay_is_forward_only() {
    let mut interpreter = Interpreter::default();
    interpreter.interpret("OUTPUT 1\nOUTPUT 2");

    assert_eq!(interpreter.next_step().map(|s| s.line_number), Some(1));
    assert_eq!(interpreter.next_step().map(|s| s.line_number), Some(2));
    assert!(interpreter.next_step().is_none());
    assert!(interpreter.next_step().is_none());
    assert_eq!(interpreter.trace().position(), 2);
}

#[test]
fn test_new_run_restarts_the_trace() {
    let mut interpreter = Interpreter::default();
    interpreter.interpret("OUTPUT 1\nOUTPUT 2");
    let _ = replay(&mut interpreter);

    interpreter.interpret("OUTPUT 3");
    let steps = replay(&mut interpreter);
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].output.as_deref(), Some("3"));

    interpreter.reset_execution();
    assert!(interpreter.next_step().is_none());
}

#[test]
fn test_fatal_error_lands_on_last_step() {
    let mut interpreter = Interpreter::default();
    let full = interpreter.interpret("PROCEDURE r()\nr()\nENDPROCEDURE\nr()");
    let steps = replay(&mut interpreter);

    assert!(full.starts_with("Fatal error on line 2: Recursion limit of 200"));
    let last = steps.last().expect("Expected recorded steps");
    assert_eq!(last.output.as_deref(), Some(full.as_str()));
}

#[test]
fn test_consistency_check_on_example_program() {
    let mut interpreter = Interpreter::default();
    let report = interpreter.check_consistency(EXAMPLE_PROGRAM, &["Ada".to_string()]);

    assert!(report.is_consistent(), "{:?}", report);
    assert!(report.full_output.ends_with("Hello, Ada"));
    assert_eq!(report.steps, interpreter.trace().len());
}

#[test]
fn test_consistency_check_reuses_input_per_run() {
    let source = "DECLARE a:STRING\nINPUT a\nOUTPUT a";
    let mut interpreter = Interpreter::default();
    let report = interpreter.check_consistency(source, &["first".to_string()]);

    assert!(report.is_consistent());
    assert_eq!(report.full_output, "first");
    assert_eq!(report.step_output, "first");
}

#[test]
fn test_step_serializes_with_type_field() {
    let mut interpreter = Interpreter::default();
    interpreter.interpret("DECLARE x:INTEGER\nx ← 3\nOUTPUT x");
    let step = interpreter.trace().get(2).expect("Expected a third step");

    let json = serde_json::to_value(step).expect("Serialization failed");
    assert_eq!(json["line_number"], 3);
    assert_eq!(json["variables"]["x"]["value"], "3");
    assert_eq!(json["variables"]["x"]["type"], "INTEGER");
    assert_eq!(json["output"], "3");
}
